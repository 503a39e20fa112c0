//! The [`Decoder`] type.

use rle_bitstream::{BitReader, bit_width_to_bytes};

use crate::error::RleDecoderError;

/// Decodes a stream produced by [`crate::Encoder`], yielding one value at a time and
/// transparently expanding literal and repeated runs.
///
/// The decoder does not track how many logical values the stream holds; the caller is
/// expected to know that out-of-band. [`Decoder::get`] returns `None` once the underlying
/// buffer is exhausted, which is indistinguishable from a stream truncated exactly at a run
/// boundary — see the codec's design notes on EOF ambiguity.
pub struct Decoder<'a> {
	reader: BitReader<'a>,
	bit_width: u32,
	current_value: u64,
	repeat_count: u64,
	literal_count: u64
}

/// Outcome of decoding the next run's indicator, used internally to share logic between
/// [`Decoder::get`] (which only needs a `bool`) and [`Decoder::get_checked`] (which reports
/// why decoding stopped).
enum NextCountsOutcome {
	Ok,
	/// No bytes were left to even start decoding an indicator: a clean end of stream.
	Eof,
	/// An indicator decoded to a run of zero elements.
	Malformed,
	/// At least one byte of a run was read before the buffer ran out.
	Truncated
}

impl<'a> Decoder<'a> {
	/// Creates a decoder over `buffer`, reading values packed at `bit_width` bits.
	///
	/// # Panics
	///
	/// Panics (in debug builds only) if `bit_width` is greater than 64.
	pub fn new(buffer: &'a [u8], bit_width: u32) -> Self {
		debug_assert!(bit_width <= 64, "bit width out of range: {bit_width}");

		Self {
			reader: BitReader::new(buffer),
			bit_width,
			current_value: 0,
			repeat_count: 0,
			literal_count: 0
		}
	}

	/// Like [`Decoder::new`], but reports an out-of-range `bit_width` as an
	/// [`RleDecoderError`] instead of relying on a debug assertion.
	pub fn new_checked(buffer: &'a [u8], bit_width: u32) -> Result<Self, RleDecoderError> {
		if bit_width > 64 {
			return Err(RleDecoderError::InvalidBitWidth(bit_width));
		}

		Ok(Self::new(buffer, bit_width))
	}

	/// Re-points this decoder at a new byte range and bit width, discarding any run
	/// currently in progress.
	///
	/// # Panics
	///
	/// Panics (in debug builds only) if `bit_width` is greater than 64.
	pub fn reset(&mut self, buffer: &'a [u8], bit_width: u32) {
		debug_assert!(bit_width <= 64, "bit width out of range: {bit_width}");

		self.reader.reset(buffer);
		self.bit_width = bit_width;
		self.current_value = 0;
		self.repeat_count = 0;
		self.literal_count = 0;
	}

	/// Returns the next decoded value, or `None` once the stream is exhausted.
	pub fn get(&mut self) -> Option<u64> {
		if self.repeat_count == 0 && self.literal_count == 0 && !self.next_counts() {
			return None;
		}

		if self.repeat_count > 0 {
			self.repeat_count -= 1;
			Some(self.current_value)
		} else {
			debug_assert!(self.literal_count > 0);
			self.literal_count -= 1;
			self.reader.get_value(self.bit_width)
		}
	}

	/// Like [`Decoder::get`], but distinguishes a clean end of stream from a structurally
	/// detectable malformed or truncated one.
	pub fn get_checked(&mut self) -> Result<Option<u64>, RleDecoderError> {
		if self.repeat_count == 0 && self.literal_count == 0 {
			match self.next_counts_checked() {
				NextCountsOutcome::Ok => {}
				NextCountsOutcome::Eof => return Ok(None),
				NextCountsOutcome::Malformed => return Err(RleDecoderError::MalformedIndicator),
				NextCountsOutcome::Truncated => return Err(RleDecoderError::Truncated)
			}
		}

		Ok(self.get_after_counts_known())
	}

	fn get_after_counts_known(&mut self) -> Option<u64> {
		if self.repeat_count > 0 {
			self.repeat_count -= 1;
			Some(self.current_value)
		} else {
			debug_assert!(self.literal_count > 0);
			self.literal_count -= 1;
			self.reader.get_value(self.bit_width)
		}
	}

	fn next_counts(&mut self) -> bool {
		matches!(self.next_counts_checked(), NextCountsOutcome::Ok)
	}

	fn next_counts_checked(&mut self) -> NextCountsOutcome {
		let had_bytes_remaining = self.reader.remaining_bits() > 0;

		let Some(indicator) = self.reader.get_vlq_int() else {
			return if had_bytes_remaining {
				log::trace!("rle decoder: stream truncated partway through an indicator");
				NextCountsOutcome::Truncated
			} else {
				NextCountsOutcome::Eof
			};
		};

		if indicator & 1 == 1 {
			let groups = indicator >> 1;
			if groups == 0 {
				log::trace!("rle decoder: malformed indicator, zero literal group count");
				return NextCountsOutcome::Malformed;
			}
			self.literal_count = groups * 8;
		} else {
			let repeat_count = indicator >> 1;
			if repeat_count == 0 {
				log::trace!("rle decoder: malformed indicator, zero repeat count");
				return NextCountsOutcome::Malformed;
			}

			let byte_width = bit_width_to_bytes(self.bit_width);
			let Some(value) = self.reader.get_aligned(byte_width) else {
				log::trace!("rle decoder: stream truncated partway through a repeated value");
				return NextCountsOutcome::Truncated;
			};

			self.repeat_count = repeat_count;
			self.current_value = value;
		}

		NextCountsOutcome::Ok
	}
}

impl Iterator for Decoder<'_> {
	type Item = u64;

	fn next(&mut self) -> Option<u64> {
		self.get()
	}
}
