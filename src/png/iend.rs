use super::*;

/// Builds the image trailer chunk.
///
/// An `IEND` has no payload, so every one is identical.
#[inline]
#[must_use]
pub fn iend_chunk() -> ChunkBuf {
  ChunkBuf::new(PngChunkTy::IEND, Vec::new())
}
