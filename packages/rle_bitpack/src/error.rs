//! Checked-mode error types.
//!
//! [`Encoder::put`](crate::Encoder::put) and [`Decoder::get`](crate::Decoder::get) keep the
//! codec's minimal `bool`/`Option` hot-path contract: programmer errors (an out-of-range bit
//! width, a value that overflows it, calling `put` after `flush`) are contract violations
//! checked with debug assertions, and undefined in release, exactly like the source this
//! codec is modeled on. [`Encoder::put_checked`](crate::Encoder::put_checked) and
//! [`Decoder::get_checked`](crate::Decoder::get_checked) wrap the same state machines with
//! the checks made explicit, returning one of these enums instead. They exist for fuzzing
//! and debug tooling that cannot tolerate a silently-triggered debug assertion slipping
//! through in a release build.

use thiserror::Error;

/// A precondition violation reported by [`crate::Encoder::put_checked`] or
/// [`crate::Encoder::flush_checked`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RleEncoderError {
	/// `bit_width` was greater than 64.
	#[error("bit width {0} is out of range: must be between 0 and 64 inclusive")]
	InvalidBitWidth(u32),
	/// The value passed to `put_checked` does not fit in the configured bit width.
	#[error("value {value} does not fit in {bit_width} bits")]
	ValueExceedsBitWidth {
		/// The rejected value.
		value: u64,
		/// The encoder's configured bit width.
		bit_width: u32
	},
	/// `put_checked` was called after `flush_checked` already finalized the stream.
	#[error("put called after the encoder was already flushed")]
	PutAfterFlush,
	/// `flush_checked` was called more than once.
	#[error("flush called more than once")]
	AlreadyFlushed,
	/// The output buffer has no room for another value.
	#[error("the output buffer is full")]
	BufferFull
}

/// A precondition violation, or a structurally detectable malformed stream condition,
/// reported by [`crate::Decoder::get_checked`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RleDecoderError {
	/// `bit_width` was greater than 64.
	#[error("bit width {0} is out of range: must be between 0 and 64 inclusive")]
	InvalidBitWidth(u32),
	/// An indicator decoded to a run of zero elements, which the format never produces.
	#[error("malformed indicator: decoded a run of zero elements")]
	MalformedIndicator,
	/// The buffer ended partway through a run, after at least one of its bytes was read.
	///
	/// Unlike a clean end of stream (no bytes left to start a new run), this can only
	/// happen if the stream was truncated.
	#[error("stream truncated partway through a run")]
	Truncated
}
