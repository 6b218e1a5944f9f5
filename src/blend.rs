//! Copies a (possibly scaled, possibly tinted) region of one bitmap onto
//! another.
//!
//! This is the only drawing operation the compositor needs: each animation
//! frame gets blended onto the canvas at its offset, and nothing more.

use crate::{r8g8b8a8_Srgb, Bitmap, Rect};

/// How source pixels combine with the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
  /// Source pixels replace destination pixels.
  #[default]
  None,
  /// Source pixels replace destination pixels unless the source pixel is
  /// fully transparent (alpha 0), in which case the destination shows
  /// through. The color channels of a transparent pixel don't matter, so
  /// straight alpha sources such as `(255, 255, 255, 0)` are skipped too.
  ///
  /// This is an on/off mask, partially transparent source pixels are *not*
  /// mixed with what's under them.
  Alpha,
}

/// `(a * b) / 255`, for `a` and `b` in `0..=255`.
///
/// The multiply-shift form is exact over that whole domain.
#[inline]
#[must_use]
pub const fn mul_div_255(a: u32, b: u32) -> u32 {
  (a * b * 0x8081) >> 23
}

/// Applies `tint` to a single pixel.
///
/// A source pixel with zero alpha is left alone. Otherwise the alpha is
/// multiplied by the tint alpha, and each color channel is multiplied by the
/// tint's channel and then also by the tint alpha.
#[inline]
#[must_use]
pub const fn tint_pixel(px: r8g8b8a8_Srgb, tint: r8g8b8a8_Srgb) -> r8g8b8a8_Srgb {
  if px.a == 0 {
    return px;
  }
  let ta = tint.a as u32;
  r8g8b8a8_Srgb {
    r: mul_div_255(mul_div_255(px.r as u32, tint.r as u32), ta) as u8,
    g: mul_div_255(mul_div_255(px.g as u32, tint.g as u32), ta) as u8,
    b: mul_div_255(mul_div_255(px.b as u32, tint.b as u32), ta) as u8,
    a: mul_div_255(px.a as u32, ta) as u8,
  }
}

/// Draws `src_rect` of `src` into `dest_rect` of `dest`.
///
/// * When the rects differ in size, the source is scaled with nearest
///   neighbor sampling.
/// * Anything that would land outside of `dest`, or sample from outside of
///   `src`, is skipped.
/// * A tint with zero alpha makes the whole call a no-op.
///   [`r8g8b8a8_Srgb::OPAQUE_WHITE`] is "no tint".
///
/// Unscaled, untinted, [`BlendMode::None`] blends go row by row as a plain
/// slice copy.
pub fn blend(
  dest: &mut Bitmap, dest_rect: Rect, src: &Bitmap, src_rect: Rect, tint: r8g8b8a8_Srgb,
  mode: BlendMode,
) {
  if tint.a == 0 || dest_rect.is_empty() || src_rect.is_empty() {
    return;
  }
  let same_size = dest_rect.width == src_rect.width && dest_rect.height == src_rect.height;
  if mode == BlendMode::None && tint == r8g8b8a8_Srgb::OPAQUE_WHITE && same_size {
    copy_rows(dest, dest_rect, src, src_rect);
  } else {
    blend_general(dest, dest_rect, src, src_rect, tint, mode);
  }
}

/// The columns `i` in `0..width` for which both `dest_x + i` and `src_x + i`
/// are in bounds.
#[inline]
fn shared_span(width: u32, dest_x: i32, dest_w: u32, src_x: i32, src_w: u32) -> Option<(u32, u32)> {
  let lo = 0_i64.max(-i64::from(dest_x)).max(-i64::from(src_x));
  let hi = i64::from(width)
    .min(i64::from(dest_w) - i64::from(dest_x))
    .min(i64::from(src_w) - i64::from(src_x));
  if lo < hi {
    Some((lo as u32, hi as u32))
  } else {
    None
  }
}

fn copy_rows(dest: &mut Bitmap, dest_rect: Rect, src: &Bitmap, src_rect: Rect) {
  let Some((lo, hi)) = shared_span(dest_rect.width, dest_rect.x, dest.width, src_rect.x, src.width)
  else {
    return;
  };
  let Some((row_lo, row_hi)) =
    shared_span(dest_rect.height, dest_rect.y, dest.height, src_rect.y, src.height)
  else {
    return;
  };
  let dest_x = (i64::from(dest_rect.x) + i64::from(lo)) as usize;
  let src_x = (i64::from(src_rect.x) + i64::from(lo)) as usize;
  let count = (hi - lo) as usize;
  for j in row_lo..row_hi {
    let dest_y = (i64::from(dest_rect.y) + i64::from(j)) as u32;
    let src_y = (i64::from(src_rect.y) + i64::from(j)) as u32;
    dest.row_mut(dest_y)[dest_x..dest_x + count]
      .copy_from_slice(&src.row(src_y)[src_x..src_x + count]);
  }
}

/// Fixed point steps, 16 fractional bits.
const FRAC_BITS: u32 = 16;

fn blend_general(
  dest: &mut Bitmap, dest_rect: Rect, src: &Bitmap, src_rect: Rect, tint: r8g8b8a8_Srgb,
  mode: BlendMode,
) {
  let tinted = tint != r8g8b8a8_Srgb::OPAQUE_WHITE;
  let step_x = (u64::from(src_rect.width) << FRAC_BITS) / u64::from(dest_rect.width);
  let step_y = (u64::from(src_rect.height) << FRAC_BITS) / u64::from(dest_rect.height);

  let mut acc_y = 0_u64;
  for j in 0..dest_rect.height {
    let dy = i64::from(dest_rect.y) + i64::from(j);
    let sy = i64::from(src_rect.y) + (acc_y >> FRAC_BITS) as i64;
    acc_y += step_y;
    if dy < 0 || dy >= i64::from(dest.height) || sy < 0 || sy >= i64::from(src.height) {
      continue;
    }
    let src_row = src.row(sy as u32);
    let dest_row = dest.row_mut(dy as u32);

    let mut acc_x = 0_u64;
    for i in 0..dest_rect.width {
      let dx = i64::from(dest_rect.x) + i64::from(i);
      let sx = i64::from(src_rect.x) + (acc_x >> FRAC_BITS) as i64;
      acc_x += step_x;
      if dx < 0 || dx >= dest_row.len() as i64 || sx < 0 || sx >= src_row.len() as i64 {
        continue;
      }
      let mut px = src_row[sx as usize];
      if tinted {
        px = tint_pixel(px, tint);
      }
      match mode {
        BlendMode::None => dest_row[dx as usize] = px,
        BlendMode::Alpha => {
          if px.a != 0 {
            dest_row[dx as usize] = px;
          }
        }
      }
    }
  }
}
