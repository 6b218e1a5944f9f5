//! Rebuilding the frame structure of an APNG.
//!
//! [`ApngImage::from_png_bytes`] walks the chunks of a PNG/APNG once, front to
//! back, and sorts them into a default image and a list of animation
//! [`Frame`]s. Each frame can then write itself out as a standalone PNG that
//! any ordinary PNG decoder can handle.

use core::time::Duration;

use alloc::{sync::Arc, vec::Vec};

use crate::{
  png::{
    acTL, fcTL, iend_chunk, ChunkBuf, PngChunk, RawPngChunkIter, IHDR, PNG_SIGNATURE,
  },
  ApngError, ApngResult, Rect,
};

mod frame;
pub use frame::*;

mod apng_image;
pub use apng_image::*;
