//! The [`Encoder`] type, and the buffer sizing helpers that go with it.

use rle_bitstream::{BitWriter, MAX_VLQ_BYTE_LEN, bit_width_to_bytes};

use crate::error::RleEncoderError;

/// A group of 8 bit-packed literal values occupies exactly this many logical values.
const VALUES_PER_GROUP: u32 = 8;

/// Number of groups a single literal run may hold before its one-byte indicator would
/// overflow (`(63 << 1) | 1` is the largest value that still fits in a single VLQ byte).
const MAX_GROUPS_PER_LITERAL_RUN: u32 = 63;

/// Largest number of logical values a single literal run can hold: `63` groups of `8`.
const MAX_VALUES_PER_LITERAL_RUN: usize = MAX_GROUPS_PER_LITERAL_RUN as usize * VALUES_PER_GROUP as usize;

/// Returns the minimum buffer size, in bytes, that [`Encoder::new`] must be given for the
/// specified `bit_width`.
///
/// This is the worst-case size of a single run: either a fully-populated literal run (a
/// one-byte indicator followed by `63` groups of `8` bit-packed values) or a maximal
/// repeated run (a VLQ indicator followed by one byte-aligned value). An encoder can always
/// accept at least one more value as long as its buffer has this much room left, which is
/// exactly the property [`Encoder`]'s internal `buffer_full` check relies on.
#[must_use]
pub const fn min_buffer_size(bit_width: u32) -> usize {
	// 504 = 63 * 8 is always an exact multiple of 8, so this is already an integer
	// number of bytes; no rounding needed.
	let literal_run_worst_case = 1 + MAX_GROUPS_PER_LITERAL_RUN as usize * bit_width as usize;
	let repeated_run_worst_case = MAX_VLQ_BYTE_LEN + bit_width_to_bytes(bit_width);

	if literal_run_worst_case > repeated_run_worst_case {
		literal_run_worst_case
	} else {
		repeated_run_worst_case
	}
}

/// Returns an upper bound, in bytes, on the encoded size of `n` values at the specified
/// `bit_width`.
///
/// A stream that mixes short literal groups with repeated runs can pay one indicator byte
/// per run far more often than an all-literal encoding of the same `n` would, so the bound
/// is *not* "every value packed as a literal": it is every run rounded up to the largest a
/// single run can ever be (a full `63`-group literal run), which can only overstate the true
/// worst case. This mirrors the original `RleEncoder::MaxBufferSize`.
#[must_use]
pub const fn max_buffer_size(bit_width: u32, n: usize) -> usize {
	let bytes_per_run = MAX_GROUPS_PER_LITERAL_RUN as usize * bit_width as usize;
	let num_runs = n.div_ceil(MAX_VALUES_PER_LITERAL_RUN);
	let literal_max = num_runs + num_runs * bytes_per_run;

	if literal_max > min_buffer_size(bit_width) {
		literal_max
	} else {
		min_buffer_size(bit_width)
	}
}

/// Encodes a stream of fixed-width unsigned integers into a caller-owned buffer, choosing
/// between bit-packed literal runs and run-length encoded repeats.
///
/// The encoder never allocates: every byte it produces lands directly in the buffer passed
/// to [`Encoder::new`]. Once the buffer cannot hold another maximal run, [`Encoder::put`]
/// starts returning `false` and continues to do so until [`Encoder::clear`] is called; see
/// [`Encoder::flush`] for how to finalize a stream.
pub struct Encoder<'a> {
	writer: BitWriter<'a>,
	bit_width: u32,
	max_run_byte_size: usize,
	buffered_values: [u64; VALUES_PER_GROUP as usize],
	num_buffered_values: u8,
	has_current_value: bool,
	current_value: u64,
	repeat_count: u32,
	literal_count: u32,
	literal_indicator_offset: Option<usize>,
	buffer_full: bool,
	flushed: bool
}

impl<'a> Encoder<'a> {
	/// Creates an encoder that packs values of `bit_width` bits into `buffer`.
	///
	/// `buffer` should be at least [`min_buffer_size(bit_width)`](min_buffer_size) bytes
	/// long for [`Encoder::put`] to be able to accept even a single value.
	///
	/// # Panics
	///
	/// Panics (in debug builds only) if `bit_width` is greater than 64.
	pub fn new(buffer: &'a mut [u8], bit_width: u32) -> Self {
		debug_assert!(bit_width <= 64, "bit width out of range: {bit_width}");

		Self {
			writer: BitWriter::new(buffer),
			bit_width,
			max_run_byte_size: min_buffer_size(bit_width),
			buffered_values: [0; VALUES_PER_GROUP as usize],
			num_buffered_values: 0,
			has_current_value: false,
			current_value: 0,
			repeat_count: 0,
			literal_count: 0,
			literal_indicator_offset: None,
			buffer_full: false,
			flushed: false
		}
	}

	/// Like [`Encoder::new`], but reports an out-of-range `bit_width` as an
	/// [`RleEncoderError`] instead of relying on a debug assertion.
	pub fn new_checked(buffer: &'a mut [u8], bit_width: u32) -> Result<Self, RleEncoderError> {
		if bit_width > 64 {
			return Err(RleEncoderError::InvalidBitWidth(bit_width));
		}

		Ok(Self::new(buffer, bit_width))
	}

	/// Returns the prefix of the underlying buffer written so far, including any run left
	/// open (not yet finalized by [`Encoder::flush`]).
	#[must_use]
	pub fn buffer(&self) -> &[u8] {
		self.writer.buffer()
	}

	/// Number of bytes written to the underlying buffer so far.
	#[must_use]
	pub fn len(&self) -> usize {
		self.writer.bytes_written()
	}

	/// Whether no bytes have been written yet.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Offers `value` to the encoder. Returns `true` if it was accepted (possibly only
	/// buffered so far), or `false` if the buffer has no room left for another maximal run.
	///
	/// Once this returns `false`, it keeps returning `false` until [`Encoder::clear`] is
	/// called.
	///
	/// # Panics
	///
	/// Panics (in debug builds only) if `value` does not fit in the encoder's configured
	/// bit width.
	pub fn put(&mut self, value: u64) -> bool {
		debug_assert!(
			self.bit_width == 64 || value >> self.bit_width == 0,
			"value {value} does not fit in {} bits",
			self.bit_width
		);

		if self.buffer_full {
			return false;
		}

		if self.has_current_value && value == self.current_value {
			self.repeat_count += 1;
			if self.repeat_count > VALUES_PER_GROUP {
				// Already part of a committed repeating tail; the fast path never
				// touches buffered_values.
				return true;
			}
		} else {
			if self.repeat_count >= VALUES_PER_GROUP {
				self.flush_repeated_run();
			}
			self.current_value = value;
			self.repeat_count = 1;
			self.has_current_value = true;
		}

		self.buffered_values[self.num_buffered_values as usize] = value;
		self.num_buffered_values += 1;
		if self.num_buffered_values == VALUES_PER_GROUP as u8 {
			self.flush_buffered_values(false);
		}

		true
	}

	/// Like [`Encoder::put`], but reports precondition violations as an
	/// [`RleEncoderError`] instead of relying on a debug assertion, and a full buffer as
	/// `Err` instead of `Ok(false)`.
	pub fn put_checked(&mut self, value: u64) -> Result<(), RleEncoderError> {
		if self.flushed {
			return Err(RleEncoderError::PutAfterFlush);
		}
		if self.bit_width < 64 && value >> self.bit_width != 0 {
			return Err(RleEncoderError::ValueExceedsBitWidth {
				value,
				bit_width: self.bit_width
			});
		}

		if self.put(value) {
			Ok(())
		} else {
			Err(RleEncoderError::BufferFull)
		}
	}

	/// Finalizes the stream: commits any pending buffered values or open run, and flushes
	/// the underlying bit writer. Returns the total number of bytes written.
	///
	/// No further [`Encoder::put`] call is valid after this; the encoder behaves as if its
	/// buffer is permanently full until [`Encoder::clear`] is called.
	pub fn flush(&mut self) -> usize {
		if self.literal_count > 0 || self.repeat_count > 0 || self.num_buffered_values > 0 {
			// A trailing repeat that never got long enough to be flushed early still
			// classifies as a repeated run here, covering both the "every buffered
			// value is part of it" case and the "no buffered values at all" case (the
			// fast path, which never touches the buffer).
			let all_repeat = self.literal_count == 0
				&& (self.repeat_count == u32::from(self.num_buffered_values)
					|| self.num_buffered_values == 0);

			if all_repeat {
				self.flush_repeated_run();
			} else {
				// Only pad when something is actually buffered: if the last group
				// already landed on an 8-value boundary, num_buffered_values is
				// already 0 and there is nothing left to pad or add to
				// literal_count - only the pending indicator commit below applies.
				if self.num_buffered_values != 0 {
					for slot in &mut self.buffered_values[self.num_buffered_values as usize..] {
						*slot = 0;
					}
					self.num_buffered_values = VALUES_PER_GROUP as u8;
				}
				self.literal_count += u32::from(self.num_buffered_values);
				self.flush_literal_run(true);
				self.repeat_count = 0;
			}
		}

		self.writer.flush();
		self.flushed = true;
		self.buffer_full = true;

		self.writer.bytes_written()
	}

	/// Like [`Encoder::flush`], but reports a repeated call as an [`RleEncoderError`]
	/// instead of silently behaving as a no-op.
	pub fn flush_checked(&mut self) -> Result<usize, RleEncoderError> {
		if self.flushed {
			return Err(RleEncoderError::AlreadyFlushed);
		}

		Ok(self.flush())
	}

	/// Resets the encoder to its initial state, rewinding the underlying buffer cursor
	/// without touching its contents.
	pub fn clear(&mut self) {
		self.writer.clear();
		self.buffered_values = [0; VALUES_PER_GROUP as usize];
		self.num_buffered_values = 0;
		self.has_current_value = false;
		self.current_value = 0;
		self.repeat_count = 0;
		self.literal_count = 0;
		self.literal_indicator_offset = None;
		self.buffer_full = false;
		self.flushed = false;
	}

	fn flush_buffered_values(&mut self, done: bool) {
		debug_assert_eq!(self.num_buffered_values, VALUES_PER_GROUP as u8);

		if self.repeat_count >= VALUES_PER_GROUP {
			// The whole buffer is a continuation of the value currently repeating;
			// nothing to pack as literals.
			self.num_buffered_values = 0;
			if self.literal_count != 0 {
				self.flush_literal_run(true);
			}
			return;
		}

		self.literal_count += VALUES_PER_GROUP;
		let groups = self.literal_count / VALUES_PER_GROUP;
		if groups >= MAX_GROUPS_PER_LITERAL_RUN {
			// One more group would overflow the one-byte indicator; close the run now.
			self.flush_literal_run(true);
		} else {
			self.flush_literal_run(done);
		}
		self.repeat_count = 0;
	}

	fn flush_literal_run(&mut self, update_indicator: bool) {
		if self.literal_indicator_offset.is_none() {
			let offset = self.writer.reserve_byte();
			debug_assert!(
				offset.is_some(),
				"check_buffer_full should guarantee room for the indicator byte"
			);
			self.literal_indicator_offset = offset;
		}

		for &value in &self.buffered_values[..self.num_buffered_values as usize] {
			let accepted = self.writer.put_value(value, self.bit_width);
			debug_assert!(accepted, "check_buffer_full should guarantee room for a literal group");
		}
		self.num_buffered_values = 0;

		if update_indicator {
			if let Some(offset) = self.literal_indicator_offset.take() {
				let indicator = ((self.literal_count / VALUES_PER_GROUP) << 1) | 1;
				self.writer.set_reserved_byte(offset, indicator as u8);
			}
			self.literal_count = 0;
			self.check_buffer_full();
		}
	}

	fn flush_repeated_run(&mut self) {
		let indicator = u64::from(self.repeat_count) << 1;
		let accepted = self.writer.put_vlq_int(indicator);
		debug_assert!(accepted, "check_buffer_full should guarantee room for a repeat indicator");

		let byte_width = bit_width_to_bytes(self.bit_width);
		let accepted = self.writer.put_aligned(self.current_value, byte_width);
		debug_assert!(accepted, "check_buffer_full should guarantee room for a repeated value");

		self.num_buffered_values = 0;
		self.repeat_count = 0;
		self.check_buffer_full();
	}

	fn check_buffer_full(&mut self) {
		if self.writer.bytes_written() + self.max_run_byte_size > self.writer.buffer_len() {
			self.buffer_full = true;
			log::trace!(
				"rle encoder entering sticky buffer-full state after {} bytes",
				self.writer.bytes_written()
			);
		}
	}
}
