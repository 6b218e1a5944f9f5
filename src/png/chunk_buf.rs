use super::*;

/// An owned chunk: type, payload, and crc.
///
/// The length isn't stored separately, it's always the payload length. A
/// `ChunkBuf` made with [`ChunkBuf::new`] always carries a correct crc, while
/// one copied from file bytes keeps whatever crc the file declared so that it
/// can be written back out unmodified.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ChunkBuf {
  chunk_ty: PngChunkTy,
  data: Vec<u8>,
  crc: u32,
}
impl Debug for ChunkBuf {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ChunkBuf")
      .field("chunk_ty", &self.chunk_ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("crc", &self.crc)
      .finish()
  }
}
impl ChunkBuf {
  /// Builds a new chunk, computing the crc for it.
  #[inline]
  #[must_use]
  pub fn new(chunk_ty: PngChunkTy, data: Vec<u8>) -> Self {
    let crc = chunk_crc(chunk_ty.to_bytes(), &data);
    Self { chunk_ty, data, crc }
  }

  #[inline]
  #[must_use]
  pub const fn chunk_ty(&self) -> PngChunkTy {
    self.chunk_ty
  }
  #[inline]
  #[must_use]
  pub fn data(&self) -> &[u8] {
    &self.data
  }
  #[inline]
  #[must_use]
  pub const fn crc(&self) -> u32 {
    self.crc
  }

  /// The length field, as it would be written.
  ///
  /// Payloads longer than `u32::MAX` can't be built through the parser, which
  /// only ever reads 32-bit lengths.
  #[inline]
  #[must_use]
  pub fn length(&self) -> u32 {
    self.data.len() as u32
  }

  /// Number of bytes this chunk takes up when written.
  #[inline]
  #[must_use]
  pub fn encoded_len(&self) -> usize {
    4 + 4 + self.data.len() + 4
  }

  /// If the stored crc matches the type and payload.
  #[inline]
  #[must_use]
  pub fn crc_is_valid(&self) -> bool {
    self.crc == chunk_crc(self.chunk_ty.to_bytes(), &self.data)
  }

  /// Appends length, type, data, and crc to the buffer.
  #[inline]
  pub fn write_to(&self, out: &mut Vec<u8>) {
    out.reserve(self.encoded_len());
    out.extend_from_slice(&self.length().to_be_bytes());
    out.extend_from_slice(&self.chunk_ty.to_bytes());
    out.extend_from_slice(&self.data);
    out.extend_from_slice(&self.crc.to_be_bytes());
  }
}
impl From<RawPngChunk<'_>> for ChunkBuf {
  /// Copies the chunk, keeping its declared crc.
  #[inline]
  fn from(raw: RawPngChunk<'_>) -> Self {
    Self { chunk_ty: raw.type_, data: raw.data.to_vec(), crc: raw.declared_crc }
  }
}
