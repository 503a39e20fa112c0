//! A hybrid run-length / bit-packed encoder and decoder for sequences of fixed-width
//! unsigned integer values, each fitting in 1 to 64 bits.
//!
//! This is the storage format used by columnar data pages: a homogeneous stream of small
//! integers (definition levels, repetition levels, dictionary indices, booleans) is encoded
//! into a compact byte sequence that adaptively chooses, per group of 8 values, between
//! bit-packed literal groups and run-length encoded repeats.
//!
//! # Format
//!
//! The encoded stream is a concatenation of runs with no framing header and no trailer.
//! Each run starts with an unsigned base-128 (VLQ) indicator whose least significant bit
//! picks the run kind:
//!
//! - **Literal run** (indicator LSB = 1): the remaining indicator bits are a group count
//!   `G`, `1 <= G <= 63`. The run body is `8 * G` values, each `bit_width` bits, packed
//!   least-significant-bit first with no padding between groups. Only the very last group
//!   of the entire stream may contain fewer than 8 logically valid values; its unused slots
//!   are zero bits, and the stream itself does not record how many of them are valid - that
//!   count comes from external metadata.
//! - **Repeated run** (indicator LSB = 0): the remaining indicator bits are a repeat count
//!   `R >= 1`. The run body is one value, byte-aligned, in `ceil(bit_width / 8)`
//!   little-endian bytes, standing for `R` copies of it.
//!
//! # No allocation
//!
//! Both [`Encoder`] and [`Decoder`] operate directly on a caller-owned `&mut [u8]` /
//! `&[u8]` buffer; neither allocates, and this crate is `#![no_std]`. [`encoder::min_buffer_size`]
//! tells callers how large a buffer an encoder needs.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://crates.io/crates/log) crate for diagnostic
//! breadcrumbs: when the encoder enters its sticky buffer-full state, when a literal run's
//! indicator byte is committed, and when the decoder rejects a malformed indicator. These
//! are trace-level and never change control flow; they compile to nothing when no logger is
//! installed.
//!
//! # Error handling
//!
//! [`Encoder::put`], [`Encoder::flush`] and [`Decoder::get`] keep a minimal `bool`/`Option`
//! contract: precondition violations (an out-of-range bit width, a value overflowing it,
//! `put` after `flush`) are debug-assertion-only contract violations, matching the source
//! this codec is modeled on. [`Encoder::put_checked`], [`Encoder::flush_checked`] and
//! [`Decoder::get_checked`] wrap the same logic with a [`thiserror`]-based error enum for
//! callers, such as fuzz harnesses, that need those violations surfaced instead of debug-only
//! asserted.

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]
#![forbid(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]
#![warn(clippy::empty_enum)]
#![warn(clippy::enum_glob_use)]
#![warn(clippy::float_cmp_const)]
#![warn(clippy::invalid_upcast_comparisons)]
#![warn(clippy::multiple_inherent_impl)]
#![warn(clippy::use_self)]
#![warn(clippy::used_underscore_binding)]

mod conversions;
mod decoder;
mod encoder;
pub mod error;

pub use decoder::Decoder;
pub use encoder::{Encoder, max_buffer_size, min_buffer_size};
