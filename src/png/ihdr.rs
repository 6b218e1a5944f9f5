use super::*;

/// The on-disk layout of an `IHDR` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Zeroable, Pod)]
#[repr(C)]
struct IhdrPayload {
  width: U32BE,
  height: U32BE,
  bit_depth: u8,
  color_type: u8,
  compression_method: u8,
  filter_method: u8,
  interlace_method: u8,
}

/// Image Header
///
/// * There's exactly one per image and it's the first chunk.
/// * The width and height are positive values that fit in an `i32`.
/// * The other fields are kept as the raw bytes, it's up to the rasterizer to
///   decide if it supports that combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: i32,
  /// height in pixels
  pub height: i32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: u8,
  pub compression_method: u8,
  pub filter_method: u8,
  /// 0 for progressive scanlines, 1 for Adam7.
  pub interlace_method: u8,
}
impl TryFrom<&[u8]> for IHDR {
  type Error = ApngError;
  #[inline]
  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    let payload: IhdrPayload = bytemuck::try_pod_read_unaligned(data)
      .map_err(|_| ApngError::MalformedChunk(PngChunkTy::IHDR))?;
    let width = i32::try_from(payload.width.to_u32())
      .map_err(|_| ApngError::MalformedChunk(PngChunkTy::IHDR))?;
    let height = i32::try_from(payload.height.to_u32())
      .map_err(|_| ApngError::MalformedChunk(PngChunkTy::IHDR))?;
    if width <= 0 || height <= 0 {
      return Err(ApngError::MalformedChunk(PngChunkTy::IHDR));
    }
    Ok(Self {
      width,
      height,
      bit_depth: payload.bit_depth,
      color_type: payload.color_type,
      compression_method: payload.compression_method,
      filter_method: payload.filter_method,
      interlace_method: payload.interlace_method,
    })
  }
}
impl IHDR {
  /// Serializes this header as a complete chunk.
  #[inline]
  #[must_use]
  pub fn to_chunk(self) -> ChunkBuf {
    self.to_chunk_with_dimensions(self.width as u32, self.height as u32)
  }

  /// Serializes this header with different dimensions, as is done for each
  /// animation frame.
  ///
  /// Frame control dimensions are `u32`, and are written back as-is.
  #[must_use]
  pub fn to_chunk_with_dimensions(self, width: u32, height: u32) -> ChunkBuf {
    let payload = IhdrPayload {
      width: U32BE::from_u32(width),
      height: U32BE::from_u32(height),
      bit_depth: self.bit_depth,
      color_type: self.color_type,
      compression_method: self.compression_method,
      filter_method: self.filter_method,
      interlace_method: self.interlace_method,
    };
    ChunkBuf::new(PngChunkTy::IHDR, bytemuck::bytes_of(&payload).to_vec())
  }

  /// If the image data is stored with Adam7 interlacing.
  #[inline]
  #[must_use]
  pub const fn is_interlaced(&self) -> bool {
    self.interlace_method == 1
  }
}
