#![forbid(unsafe_code)]

//! Provides the heap-allocated canvas type.

use alloc::vec::Vec;

use crate::r8g8b8a8_Srgb;

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// Shorthand for building a pixel.
#[inline]
#[must_use]
pub(crate) const fn rgba(r: u8, g: u8, b: u8, a: u8) -> r8g8b8a8_Srgb {
  r8g8b8a8_Srgb { r, g, b, a }
}

/// A rectangle on a bitmap.
///
/// The position is signed so that a rectangle can hang off the top or left
/// edge, any part outside of a bitmap is clipped by whatever uses the rect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct Rect {
  pub x: i32,
  pub y: i32,
  pub width: u32,
  pub height: u32,
}
impl Rect {
  #[inline]
  #[must_use]
  pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
    Self { x, y, width, height }
  }

  /// If the rect has no area.
  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.width == 0 || self.height == 0
  }

  /// The part of this rect that lies within `0..width` and `0..height`, as
  /// half-open `(x_range, y_range)`, or `None` when nothing overlaps.
  #[inline]
  #[must_use]
  pub fn clip_to(&self, width: u32, height: u32) -> Option<(core::ops::Range<u32>, core::ops::Range<u32>)> {
    let x0 = i64::from(self.x).max(0);
    let y0 = i64::from(self.y).max(0);
    let x1 = (i64::from(self.x) + i64::from(self.width)).min(i64::from(width));
    let y1 = (i64::from(self.y) + i64::from(self.height)).min(i64::from(height));
    if x0 < x1 && y0 < y1 {
      Some((x0 as u32..x1 as u32, y0 as u32..y1 as u32))
    } else {
      None
    }
  }
}

/// A direct-color RGBA image.
///
/// The fields are public, but the methods assume that
/// `pixels.len() == width * height` and might panic if that's not so.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct Bitmap {
  pub width: u32,
  pub height: u32,
  pub pixels: Vec<r8g8b8a8_Srgb>,
}
impl Bitmap {
  /// A fully transparent bitmap.
  #[inline]
  #[must_use]
  pub fn new(width: u32, height: u32) -> Self {
    Self { width, height, pixels: alloc::vec![r8g8b8a8_Srgb::TRANSPARENT_BLACK; (width as usize) * (height as usize)] }
  }

  /// A fully transparent bitmap, reporting allocation failure instead of
  /// aborting.
  #[inline]
  pub fn try_new(width: u32, height: u32) -> Result<Self, alloc::collections::TryReserveError> {
    let count = (width as usize).saturating_mul(height as usize);
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(count)?;
    pixels.resize(count, r8g8b8a8_Srgb::TRANSPARENT_BLACK);
    Ok(Self { width, height, pixels })
  }

  /// The rect covering the whole bitmap.
  #[inline]
  #[must_use]
  pub const fn full_rect(&self) -> Rect {
    Rect::new(0, 0, self.width, self.height)
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<&r8g8b8a8_Srgb> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut r8g8b8a8_Srgb> {
    if x < self.width && y < self.height {
      let i = xy_width_to_index(x, y, self.width);
      self.pixels.get_mut(i)
    } else {
      None
    }
  }

  /// One row of pixels.
  ///
  /// ## Panics
  /// * If `y` is out of bounds.
  #[inline]
  #[must_use]
  pub fn row(&self, y: u32) -> &[r8g8b8a8_Srgb] {
    let start = xy_width_to_index(0, y, self.width);
    &self.pixels[start..start + self.width as usize]
  }

  /// One row of pixels.
  ///
  /// ## Panics
  /// * If `y` is out of bounds.
  #[inline]
  #[must_use]
  pub fn row_mut(&mut self, y: u32) -> &mut [r8g8b8a8_Srgb] {
    let start = xy_width_to_index(0, y, self.width);
    &mut self.pixels[start..start + self.width as usize]
  }

  /// The pixel data as bytes, `[r, g, b, a, r, g, b, a, ...]`.
  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.pixels)
  }

  /// Sets every pixel within `rect` to fully transparent.
  ///
  /// Parts of the rect outside of the bitmap are ignored.
  pub fn clear_rect(&mut self, rect: Rect) {
    if let Some((xs, ys)) = rect.clip_to(self.width, self.height) {
      for y in ys {
        self.row_mut(y)[xs.start as usize..xs.end as usize].fill(r8g8b8a8_Srgb::TRANSPARENT_BLACK);
      }
    }
  }
}
