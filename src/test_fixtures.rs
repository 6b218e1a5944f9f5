//! Builders for the small PNG and APNG streams used in the unit tests.

use alloc::vec::Vec;

use crate::{
  png::{fcTL, BlendOp, ChunkBuf, DisposeOp, PngChunkTy, RawPngChunkIter, IHDR, PNG_SIGNATURE},
  r8g8b8a8_Srgb, rgba, Bitmap,
};

/// Appends chunks to a signature.
pub(crate) struct PngBuilder {
  bytes: Vec<u8>,
}
impl PngBuilder {
  pub(crate) fn new() -> Self {
    Self { bytes: PNG_SIGNATURE.to_vec() }
  }

  pub(crate) fn chunk(mut self, chunk: ChunkBuf) -> Self {
    chunk.write_to(&mut self.bytes);
    self
  }

  pub(crate) fn raw(self, ty: &[u8; 4], data: &[u8]) -> Self {
    self.chunk(ChunkBuf::new(PngChunkTy::from(*ty), data.to_vec()))
  }

  /// An 8-bit RGBA header.
  pub(crate) fn ihdr(self, width: u32, height: u32) -> Self {
    self.chunk(rgba_ihdr(width, height).to_chunk())
  }

  pub(crate) fn actl(self, num_frames: u32, num_plays: u32) -> Self {
    let mut data = Vec::new();
    data.extend_from_slice(&num_frames.to_be_bytes());
    data.extend_from_slice(&num_plays.to_be_bytes());
    self.raw(b"acTL", &data)
  }

  pub(crate) fn fctl(self, fctl: fcTL) -> Self {
    self.chunk(fctl.to_chunk())
  }

  pub(crate) fn idat(self, data: &[u8]) -> Self {
    self.raw(b"IDAT", data)
  }

  pub(crate) fn fdat(self, sequence_number: u32, data: &[u8]) -> Self {
    let mut payload = sequence_number.to_be_bytes().to_vec();
    payload.extend_from_slice(data);
    self.raw(b"fdAT", &payload)
  }

  pub(crate) fn iend(self) -> Self {
    self.raw(b"IEND", &[])
  }

  pub(crate) fn build(self) -> Vec<u8> {
    self.bytes
  }
}

pub(crate) fn rgba_ihdr(width: u32, height: u32) -> IHDR {
  IHDR {
    width: width as i32,
    height: height as i32,
    bit_depth: 8,
    color_type: 6,
    compression_method: 0,
    filter_method: 0,
    interlace_method: 0,
  }
}

/// A frame control with a 1/10th second delay.
pub(crate) fn fctl(
  sequence_number: u32, [x, y, width, height]: [u32; 4], dispose_op: DisposeOp, blend_op: BlendOp,
) -> fcTL {
  fcTL {
    sequence_number,
    width,
    height,
    x_offset: x,
    y_offset: y,
    delay_num: 1,
    delay_den: 10,
    dispose_op,
    blend_op,
  }
}

pub(crate) fn solid(width: u32, height: u32, color: r8g8b8a8_Srgb) -> Bitmap {
  Bitmap { width, height, pixels: alloc::vec![color; (width * height) as usize] }
}

/// "Rasterizes" a PNG whose image data is uncompressed r8g8b8a8_Srgb pixels.
///
/// This lets the compositor tests check blending without also testing zlib.
pub(crate) fn raw_rgba_rasterizer(png: &[u8]) -> Result<Bitmap, &'static str> {
  let mut size = None;
  let mut pixel_bytes = Vec::new();
  for raw in RawPngChunkIter::new(png).map_err(|_| "bad signature")? {
    let raw = raw.map_err(|_| "truncated")?;
    match raw.chunk_ty() {
      PngChunkTy::IHDR => {
        let ihdr = IHDR::try_from(raw.data()).map_err(|_| "bad header")?;
        size = Some((ihdr.width as u32, ihdr.height as u32));
      }
      PngChunkTy::IDAT => pixel_bytes.extend_from_slice(raw.data()),
      _ => (),
    }
  }
  let (width, height) = size.ok_or("no header")?;
  if pixel_bytes.len() != (width * height * 4) as usize {
    return Err("wrong amount of pixel data");
  }
  let pixels = pixel_bytes.chunks_exact(4).map(|c| rgba(c[0], c[1], c[2], c[3])).collect();
  Ok(Bitmap { width, height, pixels })
}

/// The pixels as uncompressed IDAT payload, for [`raw_rgba_rasterizer`].
pub(crate) fn raw_rgba(bitmap: &Bitmap) -> Vec<u8> {
  bitmap.as_bytes().to_vec()
}

/// The pixels as real, zlib compressed, 8-bit RGBA image data. Every line
/// uses filter type 0.
#[cfg(feature = "miniz_oxide")]
pub(crate) fn zlib_rgba(bitmap: &Bitmap) -> Vec<u8> {
  let mut filtered = Vec::new();
  for y in 0..bitmap.height {
    filtered.push(0);
    filtered.extend_from_slice(bytemuck::cast_slice(bitmap.row(y)));
  }
  miniz_oxide::deflate::compress_to_vec_zlib(&filtered, 6)
}
