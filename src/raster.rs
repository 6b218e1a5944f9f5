//! Turning a standalone PNG into pixels.
//!
//! The compositor never decodes image data itself, it hands each frame's
//! standalone PNG bytes to a [`Rasterize`] implementation. Any closure of the
//! right shape works, which is handy for tests or for plugging in some other
//! PNG library.

use core::fmt::Display;

use crate::Bitmap;

/// Decodes one complete, non-animated PNG into a bitmap.
pub trait Rasterize {
  /// What goes wrong. It's only ever displayed, never inspected.
  type Error: Display;

  /// Decodes the PNG.
  fn rasterize(&self, png: &[u8]) -> Result<Bitmap, Self::Error>;
}

impl<F, E> Rasterize for F
where
  F: Fn(&[u8]) -> Result<Bitmap, E>,
  E: Display,
{
  type Error = E;
  #[inline]
  fn rasterize(&self, png: &[u8]) -> Result<Bitmap, E> {
    self(png)
  }
}

/// Limits on what the built-in rasterizer will decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterLimits {
  /// The largest width or height accepted.
  pub max_dimension: u32,
}
impl RasterLimits {
  /// The default limit on either side.
  pub const DEFAULT_MAX_DIMENSION: u32 = 17_000;
}
impl Default for RasterLimits {
  #[inline]
  fn default() -> Self {
    Self { max_dimension: Self::DEFAULT_MAX_DIMENSION }
  }
}

/// The rasterizer that ships with the crate.
///
/// It handles every PNG color type and bit depth, including interlaced
/// images, and always gives [`r8g8b8a8_Srgb`](crate::r8g8b8a8_Srgb) output
/// with straight alpha. Gamma and color profile chunks are ignored.
#[cfg(feature = "miniz_oxide")]
#[cfg_attr(docs_rs, doc(cfg(feature = "miniz_oxide")))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ImagineRasterizer {
  /// Checked against each PNG's header before anything is allocated.
  pub limits: RasterLimits,
}
#[cfg(feature = "miniz_oxide")]
impl ImagineRasterizer {
  /// A rasterizer with non-default limits.
  #[inline]
  #[must_use]
  pub const fn with_limits(limits: RasterLimits) -> Self {
    Self { limits }
  }
}
#[cfg(feature = "miniz_oxide")]
impl Rasterize for ImagineRasterizer {
  type Error = crate::png::DecodeError;
  #[inline]
  fn rasterize(&self, png: &[u8]) -> Result<Bitmap, Self::Error> {
    crate::png::decode_png_to_bitmap(png, self.limits.max_dimension)
  }
}
