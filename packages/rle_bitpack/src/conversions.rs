//! Narrow-type convenience methods layered on top of the `u64`-based core API.
//!
//! The wire format and the core [`Encoder`]/[`Decoder`] API only ever deal in `u64`. Several
//! realistic callers (definition levels as `i16`, boolean dictionary indices as `bool`) would
//! rather decode directly into their narrower native type instead of doing an intermediate
//! `u64` and a truncating cast at every call site. [`Decoder::get_as`] and
//! [`Encoder::put_as`] provide that without touching the core API or the wire format: they
//! are a thin conversion layer, not an alternate encoding.

use crate::{Decoder, Encoder};

impl Encoder<'_> {
	/// Converts `value` to `u64` and offers it to the encoder, exactly like
	/// [`Encoder::put`].
	pub fn put_as<T>(&mut self, value: T) -> bool
	where
		T: Into<u64>
	{
		self.put(value.into())
	}
}

impl Decoder<'_> {
	/// Like [`Decoder::get`], but converts the decoded `u64` into `T`, returning `None`
	/// both on end of stream and if the value does not fit in `T`.
	pub fn get_as<T>(&mut self) -> Option<T>
	where
		T: TryFrom<u64>
	{
		self.get().and_then(|value| T::try_from(value).ok())
	}
}
