//! PNG chunk level tools.
//!
//! A PNG is an eight byte signature followed by a series of "chunks". Every
//! chunk has the same framing:
//! * a 4-byte big-endian length,
//! * a 4-byte ascii type tag,
//! * `length` bytes of payload,
//! * a 4-byte big-endian CRC-32 computed over the type tag and payload.
//!
//! APNG adds three chunk types on top of plain PNG:
//! * [`acTL`] - animation control, must come before any image data.
//! * [`fcTL`] - frame control, one per frame.
//! * [`fdAT`] - frame data, an `IDAT` with a sequence number on the front.
//!
//! The [`RawPngChunkIter`] splits the bytes into [`RawPngChunk`] values, and
//! [`PngChunk::try_from`] classifies each one. Building whole frames out of
//! those chunks happens in the [`apng`](crate::apng) module.

use core::{
  fmt::Debug,
  time::Duration,
};

use alloc::vec::Vec;
use bytemuck::{Pod, Zeroable};

use crate::{ApngError, ApngResult, AsciiArray, U16BE, U32BE};

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the PNG's initial 8 bytes are correct.
#[inline]
#[must_use]
pub const fn is_png_header_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}

mod crc32;
pub use crc32::*;

mod raw_chunk;
pub use raw_chunk::*;

mod chunk_buf;
pub use chunk_buf::*;

mod ihdr;
pub use ihdr::*;

mod actl;
pub use actl::*;

mod fctl;
pub use fctl::*;

mod fdat;
pub use fdat::*;

mod iend;
pub use iend::*;

mod png_chunk;
pub use png_chunk::*;

#[cfg(feature = "miniz_oxide")]
mod decode;
#[cfg(feature = "miniz_oxide")]
pub use decode::*;
