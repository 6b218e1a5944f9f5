//! A plain (non-animated) PNG decoder that produces a [`Bitmap`].
//!
//! This is what the compositor uses by default to turn each frame's
//! standalone PNG bytes into pixels. The steps are the usual ones:
//! 1) Walk the chunks, keeping the `IHDR`, `PLTE`, `tRNS`, and every `IDAT`.
//! 2) Inflate the concatenated `IDAT` data with `miniz_oxide`. Because each
//!    filtered line carries an extra filter-type byte you *cannot* inflate
//!    directly into the final pixel buffer.
//! 3) Unfilter each line in place, one reduced image at a time when the data
//!    is Adam7 interlaced.
//! 4) Expand each pixel to [`r8g8b8a8_Srgb`] and put it at its full image position.

use bitfrob::u8_replicate_bits;

use super::*;
use crate::{r8g8b8a8_Srgb, rgba, Bitmap};

/// Palette chunk tag.
const PLTE: PngChunkTy = PngChunkTy(AsciiArray(*b"PLTE"));
/// Transparency chunk tag.
const TRNS: PngChunkTy = PngChunkTy(AsciiArray(*b"tRNS"));

/// The ways that PNG decoding can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
  /// The chunk structure itself was bad.
  #[error(transparent)]
  Chunk(#[from] ApngError),

  /// The stream ended without ever giving an `IHDR`.
  #[error("no IHDR chunk")]
  NoHeader,

  /// The color type or bit depth isn't a combination that PNG allows, or the
  /// compression/filter method is not 0.
  #[error("unsupported format: color type {color_type}, bit depth {bit_depth}")]
  UnsupportedFormat {
    /// from the header
    color_type: u8,
    /// from the header
    bit_depth: u8,
  },

  /// The image is larger than the configured limit.
  #[error("image is {width}x{height}, but the limit is {limit} on either side")]
  DimensionsTooLarge {
    /// from the header
    width: u32,
    /// from the header
    height: u32,
    /// the configured limit
    limit: u32,
  },

  /// Couldn't get memory for the decompression buffer or the bitmap.
  #[error("allocation failed")]
  Alloc,

  /// The zlib stream was damaged or incomplete.
  #[error("zlib decompression failed: {0:?}")]
  Decompress(miniz_oxide::inflate::TINFLStatus),

  /// A filtered line started with a filter type outside of `0..=4`.
  #[error("unknown filter type {0}")]
  UnknownFilter(u8),
}

/// The kinds of pixel a PNG can store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data. There may optionally be a transparency
  /// chunk.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y | Self::Index => 1,
      Self::YA => 2,
      Self::RGB => 3,
      Self::RGBA => 4,
    }
  }

  /// If the bit depth is allowed with this color type.
  #[inline]
  #[must_use]
  pub const fn allows_bit_depth(self, bit_depth: u8) -> bool {
    match self {
      Self::Y => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
      Self::Index => matches!(bit_depth, 1 | 2 | 4 | 8),
      Self::RGB | Self::YA | Self::RGBA => matches!(bit_depth, 8 | 16),
    }
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = ();
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      _ => return Err(()),
    })
  }
}

/// `(x_start, y_start, x_step, y_step)` for Adam7 passes 1 through 7.
///
/// ```txt
/// 1 6 4 6 2 6 4 6
/// 7 7 7 7 7 7 7 7
/// 5 6 5 6 5 6 5 6
/// 7 7 7 7 7 7 7 7
/// 3 6 4 6 3 6 4 6
/// 7 7 7 7 7 7 7 7
/// 5 6 5 6 5 6 5 6
/// 7 7 7 7 7 7 7 7
/// ```
const ADAM7_PASSES: [(u32, u32, u32, u32); 7] =
  [(0, 0, 8, 8), (4, 0, 8, 8), (0, 4, 4, 8), (2, 0, 4, 4), (0, 2, 2, 4), (1, 0, 2, 2), (0, 1, 1, 2)];

/// A non-interlaced image is one "pass" that covers everything.
const FULL_PASS: [(u32, u32, u32, u32); 1] = [(0, 0, 1, 1)];

/// Size of the reduced image that a pass covers, possibly 0 in either
/// direction.
#[inline]
#[must_use]
const fn pass_dimensions(
  (x_start, y_start, x_step, y_step): (u32, u32, u32, u32), full_width: u32, full_height: u32,
) -> (u32, u32) {
  let w = if full_width > x_start { (full_width - x_start + x_step - 1) / x_step } else { 0 };
  let h = if full_height > y_start { (full_height - y_start + y_step - 1) / y_step } else { 0 };
  (w, h)
}

/// The info from the header that decoding needs, after validation.
#[derive(Debug, Clone, Copy)]
struct Layout {
  width: u32,
  height: u32,
  color_type: PngColorType,
  bit_depth: u8,
  interlaced: bool,
}
impl Layout {
  fn from_ihdr(ihdr: &IHDR, max_dimension: u32) -> Result<Self, DecodeError> {
    let unsupported =
      DecodeError::UnsupportedFormat { color_type: ihdr.color_type, bit_depth: ihdr.bit_depth };
    let color_type = PngColorType::try_from(ihdr.color_type).map_err(|_| unsupported.clone())?;
    if !color_type.allows_bit_depth(ihdr.bit_depth)
      || ihdr.compression_method != 0
      || ihdr.filter_method != 0
      || ihdr.interlace_method > 1
    {
      return Err(unsupported);
    }
    // the header parser already rejects non-positive sizes.
    let width = ihdr.width as u32;
    let height = ihdr.height as u32;
    if width > max_dimension || height > max_dimension {
      return Err(DecodeError::DimensionsTooLarge { width, height, limit: max_dimension });
    }
    Ok(Self { width, height, color_type, bit_depth: ihdr.bit_depth, interlaced: ihdr.is_interlaced() })
  }

  #[inline]
  fn passes(&self) -> &'static [(u32, u32, u32, u32)] {
    if self.interlaced {
      &ADAM7_PASSES
    } else {
      &FULL_PASS
    }
  }

  #[inline]
  const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.channel_count()
  }

  /// Filtering works per byte of a pixel, or per byte when pixels are less
  /// than a byte each.
  #[inline]
  const fn filter_chunk_size(&self) -> usize {
    let bytes = self.bits_per_pixel() / 8;
    if bytes == 0 {
      1
    } else {
      bytes
    }
  }

  /// One filter-type byte plus the pixel data, rounded up to whole bytes.
  #[inline]
  const fn bytes_per_filterline(&self, width: u32) -> usize {
    1 + ((self.bits_per_pixel() * (width as usize)) + 7) / 8
  }

  fn zlib_decompression_requirement(&self) -> usize {
    self
      .passes()
      .iter()
      .map(|&pass| {
        let (w, h) = pass_dimensions(pass, self.width, self.height);
        if w == 0 {
          0
        } else {
          self.bytes_per_filterline(w).saturating_mul(h as usize)
        }
      })
      .fold(0_usize, usize::saturating_add)
  }
}

/// Decodes a PNG into an r8g8b8a8_Srgb bitmap.
///
/// Only the first frame's worth of data is looked at: any `acTL`/`fcTL`/`fdAT`
/// is skipped just like any other ancillary chunk. Chunks after `IEND` are
/// ignored.
pub fn decode_png_to_bitmap(png: &[u8], max_dimension: u32) -> Result<Bitmap, DecodeError> {
  let mut ihdr: Option<IHDR> = None;
  let mut plte: &[u8] = &[];
  let mut trns: Option<&[u8]> = None;
  let mut idat: Vec<&[u8]> = Vec::new();
  for raw in RawPngChunkIter::new(png)? {
    let raw = raw?;
    match raw.chunk_ty() {
      PngChunkTy::IHDR => ihdr = Some(IHDR::try_from(raw.data())?),
      PngChunkTy::IDAT => idat.push(raw.data()),
      PngChunkTy::IEND => break,
      PLTE => plte = raw.data(),
      TRNS => trns = Some(raw.data()),
      _ => (),
    }
  }
  let layout = Layout::from_ihdr(&ihdr.ok_or(DecodeError::NoHeader)?, max_dimension)?;
  log::trace!("decoding {}x{} {:?} at {} bits", layout.width, layout.height, layout.color_type, layout.bit_depth);

  let zlib_len = layout.zlib_decompression_requirement();
  let mut zlib_buffer: Vec<u8> = Vec::new();
  zlib_buffer.try_reserve(zlib_len).map_err(|_| DecodeError::Alloc)?;
  zlib_buffer.resize(zlib_len, 0);
  miniz_oxide::inflate::decompress_slice_iter_to_slice(
    &mut zlib_buffer,
    idat.iter().copied(),
    true,
    true,
  )
  .map_err(DecodeError::Decompress)?;

  let mut bitmap = Bitmap::try_new(layout.width, layout.height).map_err(|_| DecodeError::Alloc)?;
  let expand = PixelExpander::new(&layout, plte, trns);
  let mut decompressed: &mut [u8] = &mut zlib_buffer;
  for &pass in layout.passes() {
    let (reduced_width, reduced_height) = pass_dimensions(pass, layout.width, layout.height);
    if reduced_width == 0 || reduced_height == 0 {
      // a reduced image can be empty even though the full image isn't.
      continue;
    }
    let bytes_per_filterline = layout.bytes_per_filterline(reduced_width);
    let bytes_used = bytes_per_filterline * (reduced_height as usize);
    let (these_bytes, more_bytes) = core::mem::take(&mut decompressed).split_at_mut(bytes_used);
    decompressed = more_bytes;
    unfilter_lines(these_bytes, bytes_per_filterline, layout.filter_chunk_size())?;

    let (x_start, y_start, x_step, y_step) = pass;
    for (reduced_y, line) in these_bytes.chunks_exact(bytes_per_filterline).enumerate() {
      let y = y_start + (reduced_y as u32) * y_step;
      let samples = &line[1..];
      for reduced_x in 0..reduced_width {
        let x = x_start + reduced_x * x_step;
        if let Some(p) = bitmap.get_mut(x, y) {
          *p = expand.pixel(samples, reduced_x as usize);
        }
      }
    }
  }
  Ok(bitmap)
}

#[inline]
#[must_use]
const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // The order of these tests is part of the PNG format, don't change it.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Unfilters every line of one (reduced) image in place.
///
/// Each line's filter byte is set to 0 once that line is done. The line
/// before the first line is an implied line of zeroes.
fn unfilter_lines(
  mut lines: &mut [u8], bytes_per_filterline: usize, filter_chunk_size: usize,
) -> Result<(), DecodeError> {
  let mut prior: &[u8] = &[];
  while !lines.is_empty() {
    let (line, more) = core::mem::take(&mut lines).split_at_mut(bytes_per_filterline);
    lines = more;
    let Some((filter, row)) = line.split_first_mut() else { break };
    let bpp = filter_chunk_size;
    match *filter {
      0 => (),
      1 => {
        for i in bpp..row.len() {
          row[i] = row[i].wrapping_add(row[i - bpp]);
        }
      }
      2 => {
        row.iter_mut().zip(prior.iter().copied()).for_each(|(p, b)| *p = p.wrapping_add(b));
      }
      3 => {
        for i in 0..row.len() {
          let a = if i >= bpp { row[i - bpp] } else { 0 };
          let b = prior.get(i).copied().unwrap_or(0);
          row[i] = row[i].wrapping_add(((u16::from(a) + u16::from(b)) / 2) as u8);
        }
      }
      4 => {
        for i in 0..row.len() {
          let a = if i >= bpp { row[i - bpp] } else { 0 };
          let b = prior.get(i).copied().unwrap_or(0);
          let c = if i >= bpp { prior.get(i - bpp).copied().unwrap_or(0) } else { 0 };
          row[i] = row[i].wrapping_add(paeth_predict(a, b, c));
        }
      }
      unknown => return Err(DecodeError::UnknownFilter(unknown)),
    }
    *filter = 0;
    prior = row;
  }
  Ok(())
}

/// Turns unfiltered samples into [`r8g8b8a8_Srgb`] values.
struct PixelExpander<'b> {
  color_type: PngColorType,
  bit_depth: u8,
  plte: &'b [u8],
  /// The alpha table for indexed color.
  trns_alphas: &'b [u8],
  /// The fully transparent color key for greyscale or RGB, at the image's
  /// full bit depth.
  trns_key: Option<[u16; 3]>,
}
impl<'b> PixelExpander<'b> {
  fn new(layout: &Layout, plte: &'b [u8], trns: Option<&'b [u8]>) -> Self {
    let trns = trns.unwrap_or(&[]);
    let trns_key = match (layout.color_type, trns) {
      (PngColorType::Y, [y0, y1, ..]) => {
        let y = u16::from_be_bytes([*y0, *y1]);
        Some([y, y, y])
      }
      (PngColorType::RGB, [r0, r1, g0, g1, b0, b1, ..]) => Some([
        u16::from_be_bytes([*r0, *r1]),
        u16::from_be_bytes([*g0, *g1]),
        u16::from_be_bytes([*b0, *b1]),
      ]),
      _ => None,
    };
    let trns_alphas = if layout.color_type == PngColorType::Index { trns } else { &[] };
    Self { color_type: layout.color_type, bit_depth: layout.bit_depth, plte, trns_alphas, trns_key }
  }

  /// Reads sample number `index` of a line, at the image's bit depth.
  #[inline]
  fn sample(&self, samples: &[u8], index: usize) -> u16 {
    match self.bit_depth {
      16 => u16::from_be_bytes([samples[index * 2], samples[index * 2 + 1]]),
      8 => u16::from(samples[index]),
      bits => {
        let bits = usize::from(bits);
        let bit_pos = index * bits;
        let shift = 8 - bits - (bit_pos % 8);
        u16::from((samples[bit_pos / 8] >> shift) & ((1 << bits) - 1) as u8)
      }
    }
  }

  /// Narrows a sample to 8 bits. Low bit depths are spread over the whole
  /// byte, so that the highest value becomes 255.
  #[inline]
  fn to_u8(&self, sample: u16) -> u8 {
    match self.bit_depth {
      16 => (sample >> 8) as u8,
      8 => sample as u8,
      depth => u8_replicate_bits(u32::from(depth), sample as u8),
    }
  }

  fn pixel(&self, samples: &[u8], x: usize) -> r8g8b8a8_Srgb {
    let channels = self.color_type.channel_count();
    let s = |c: usize| self.sample(samples, x * channels + c);
    match self.color_type {
      PngColorType::Y => {
        let y = s(0);
        let a = if self.trns_key == Some([y, y, y]) { 0 } else { 255 };
        let y8 = self.to_u8(y);
        rgba(y8, y8, y8, a)
      }
      PngColorType::YA => {
        let y8 = self.to_u8(s(0));
        rgba(y8, y8, y8, self.to_u8(s(1)))
      }
      PngColorType::RGB => {
        let full = [s(0), s(1), s(2)];
        let a = if self.trns_key == Some(full) { 0 } else { 255 };
        rgba(self.to_u8(full[0]), self.to_u8(full[1]), self.to_u8(full[2]), a)
      }
      PngColorType::RGBA => {
        rgba(self.to_u8(s(0)), self.to_u8(s(1)), self.to_u8(s(2)), self.to_u8(s(3)))
      }
      PngColorType::Index => {
        let i = usize::from(s(0));
        // out of range entries are opaque black
        let (r, g, b) = match self.plte.get(i * 3..i * 3 + 3) {
          Some([r, g, b]) => (*r, *g, *b),
          _ => (0, 0, 0),
        };
        let a = self.trns_alphas.get(i).copied().unwrap_or(255);
        rgba(r, g, b, a)
      }
    }
  }
}

#[test]
fn test_pass_dimensions() {
  let dims = |w: u32, h: u32, pass: usize| pass_dimensions(ADAM7_PASSES[pass], w, h);
  // width of each pass for full widths 1 through 8 (and the same for heights)
  let expected_widths: [[u32; 8]; 7] = [
    [1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 1, 1, 1, 1],
    [1, 1, 1, 1, 2, 2, 2, 2],
    [0, 0, 1, 1, 1, 1, 2, 2],
    [1, 1, 2, 2, 3, 3, 4, 4],
    [0, 1, 1, 2, 2, 3, 3, 4],
    [1, 2, 3, 4, 5, 6, 7, 8],
  ];
  let expected_heights: [[u32; 8]; 7] = [
    [1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 1, 1, 1, 1],
    [1, 1, 1, 1, 2, 2, 2, 2],
    [0, 0, 1, 1, 1, 1, 2, 2],
    [1, 1, 2, 2, 3, 3, 4, 4],
    [0, 1, 1, 2, 2, 3, 3, 4],
  ];
  for pass in 0..7 {
    for n in 1..=8_u32 {
      assert_eq!(dims(n, 1, pass).0, expected_widths[pass][n as usize - 1], "pass {pass}, w {n}");
      assert_eq!(dims(1, n, pass).1, expected_heights[pass][n as usize - 1], "pass {pass}, h {n}");
    }
  }
  let all: [(u32, u32); 7] = core::array::from_fn(|pass| dims(8, 8, pass));
  assert_eq!(all, [(1, 1), (1, 1), (2, 1), (2, 2), (4, 2), (4, 4), (8, 4)]);
  assert_eq!(pass_dimensions(FULL_PASS[0], 5, 3), (5, 3));
}

#[test]
fn test_samples_narrow_to_full_bytes() {
  let grey = |bit_depth| PixelExpander {
    color_type: PngColorType::Y,
    bit_depth,
    plte: &[],
    trns_alphas: &[],
    trns_key: None,
  };
  assert_eq!(grey(1).to_u8(0), 0);
  assert_eq!(grey(1).to_u8(1), 255);
  assert_eq!(grey(2).to_u8(0b10), 0xAA);
  assert_eq!(grey(4).to_u8(0x7), 0x77);
  assert_eq!(grey(8).to_u8(0x42), 0x42);
  assert_eq!(grey(16).to_u8(0xABCD), 0xAB);
}

#[test]
fn test_paeth_predict() {
  assert_eq!(paeth_predict(0, 0, 0), 0);
  assert_eq!(paeth_predict(10, 0, 0), 10);
  assert_eq!(paeth_predict(0, 10, 0), 10);
  assert_eq!(paeth_predict(10, 20, 10), 20);
  assert_eq!(paeth_predict(20, 10, 10), 20);
  assert_eq!(paeth_predict(5, 5, 5), 5);
}
