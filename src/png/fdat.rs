use super::*;

/// Frame Data Chunk
///
/// This is an `IDAT` with a sequence number stuck on the front.
///
/// See: [fdAT](https://www.w3.org/TR/png/#fdAT-chunk)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct fdAT<'b> {
  pub sequence_number: u32,
  /// Compressed frame data, exactly as it would appear in an `IDAT`.
  pub data: &'b [u8],
}
impl<'b> TryFrom<&'b [u8]> for fdAT<'b> {
  type Error = ApngError;
  #[inline]
  fn try_from(data: &'b [u8]) -> Result<Self, Self::Error> {
    match data {
      [s0, s1, s2, s3, data @ ..] => {
        Ok(Self { sequence_number: u32::from_be_bytes([*s0, *s1, *s2, *s3]), data })
      }
      _ => Err(ApngError::MalformedChunk(PngChunkTy::fdAT)),
    }
  }
}
impl fdAT<'_> {
  /// Converts this into an `IDAT` chunk.
  ///
  /// The sequence number is dropped (so the length shrinks by 4), the type
  /// becomes `IDAT`, and the crc is recomputed over the new type and payload.
  #[inline]
  #[must_use]
  pub fn to_idat_chunk(&self) -> ChunkBuf {
    ChunkBuf::new(PngChunkTy::IDAT, self.data.to_vec())
  }
}
