#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

//! A crate for playing Animated PNG (APNG) images.
//!
//! * [`ApngImage::from_png_bytes`] parses the chunk structure of a PNG or
//!   APNG and splits it into a default image and a list of animation
//!   [`Frame`](apng::Frame)s.
//! * Every frame can write itself out as a standalone PNG, which is then
//!   turned into pixels by a [`Rasterize`] implementation. With the
//!   `miniz_oxide` feature (on by default) the crate has its own,
//!   [`ImagineRasterizer`].
//! * A [`Compositor`] draws each frame onto a running canvas according to the
//!   frame's blend and dispose rules, and a [`Player`] loops over the composed
//!   canvases as many times as the file asks for.
//!
//! ```no_run
//! # #[cfg(feature = "miniz_oxide")]
//! # fn main() -> Result<(), animagine::ApngError> {
//! use animagine::{ApngImage, ImagineRasterizer, Player};
//! let bytes: &[u8] = &[];
//! let image = ApngImage::from_png_bytes(bytes)?;
//! for composed in Player::new(&image, ImagineRasterizer::default()).take(100) {
//!   let composed = composed?;
//!   let _ = (composed.bitmap.as_bytes(), composed.delay);
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "miniz_oxide"))]
//! # fn main() {}
//! ```
//!
//! Nothing here logs unless the application installs a [`log`] logger.

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

pub use pixel_formats::r8g8b8a8_Srgb;

pub mod ascii_array;
pub use ascii_array::*;

pub mod int_endian;
pub use int_endian::*;

pub mod error;
pub use error::*;

pub mod png;

pub mod apng;
pub use apng::ApngImage;

pub mod bitmap;
pub use bitmap::*;

pub mod blend;

pub mod raster;
pub use raster::*;

pub mod compose;
pub use compose::*;

#[cfg(test)]
mod test_fixtures;
