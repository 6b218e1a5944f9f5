use super::*;

/// A classified PNG chunk.
///
/// Only the chunks that matter for frame structure get their own variant.
/// Everything else (palette, transparency, text, ...) is carried along
/// untouched as [`PngChunk::Other`] so that it can be copied into every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub enum PngChunk<'b> {
  /// Image Header
  IHDR(IHDR),
  /// Animation Control
  acTL(acTL),
  /// Frame Control
  fcTL(fcTL),
  /// Frame Data
  fdAT(fdAT<'b>),
  /// Image Data
  IDAT(RawPngChunk<'b>),
  /// Image End
  IEND(RawPngChunk<'b>),
  /// Any chunk not listed above.
  Other(RawPngChunk<'b>),
}
impl<'b> TryFrom<RawPngChunk<'b>> for PngChunk<'b> {
  type Error = ApngError;
  #[inline]
  fn try_from(raw: RawPngChunk<'b>) -> Result<Self, Self::Error> {
    Ok(match raw.type_ {
      PngChunkTy::IHDR => PngChunk::IHDR(IHDR::try_from(raw.data)?),
      PngChunkTy::acTL => PngChunk::acTL(acTL::try_from(raw.data)?),
      PngChunkTy::fcTL => PngChunk::fcTL(fcTL::try_from(raw.data)?),
      PngChunkTy::fdAT => PngChunk::fdAT(fdAT::try_from(raw.data)?),
      PngChunkTy::IDAT => PngChunk::IDAT(raw),
      PngChunkTy::IEND => PngChunk::IEND(raw),
      _ => PngChunk::Other(raw),
    })
  }
}
impl PngChunk<'_> {
  /// The type tag this chunk was read with.
  #[inline]
  #[must_use]
  pub const fn chunk_ty(&self) -> PngChunkTy {
    match self {
      Self::IHDR(_) => PngChunkTy::IHDR,
      Self::acTL(_) => PngChunkTy::acTL,
      Self::fcTL(_) => PngChunkTy::fcTL,
      Self::fdAT(_) => PngChunkTy::fdAT,
      Self::IDAT(raw) | Self::IEND(raw) | Self::Other(raw) => raw.type_,
    }
  }
}
