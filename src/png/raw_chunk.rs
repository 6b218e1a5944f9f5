use super::*;

/// The four byte type tag of a PNG chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngChunkTy(pub AsciiArray<4>);
#[allow(nonstandard_style)]
impl PngChunkTy {
  pub const IHDR: Self = Self(AsciiArray(*b"IHDR"));
  pub const IDAT: Self = Self(AsciiArray(*b"IDAT"));
  pub const IEND: Self = Self(AsciiArray(*b"IEND"));
  pub const acTL: Self = Self(AsciiArray(*b"acTL"));
  pub const fcTL: Self = Self(AsciiArray(*b"fcTL"));
  pub const fdAT: Self = Self(AsciiArray(*b"fdAT"));

  /// The raw tag bytes.
  #[inline]
  #[must_use]
  pub const fn to_bytes(self) -> [u8; 4] {
    self.0 .0
  }

  /// Critical chunks have an uppercase first letter.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    (self.0 .0[0] & 32) == 0
  }
}
impl From<[u8; 4]> for PngChunkTy {
  #[inline]
  fn from(bytes: [u8; 4]) -> Self {
    Self(AsciiArray(bytes))
  }
}
impl Debug for PngChunkTy {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    Debug::fmt(&self.0, f)
  }
}
impl core::fmt::Display for PngChunkTy {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    core::fmt::Display::fmt(&self.0, f)
  }
}

/// An unparsed chunk from a PNG, borrowing from the source bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawPngChunk<'b> {
  pub(crate) type_: PngChunkTy,
  pub(crate) data: &'b [u8],
  pub(crate) declared_crc: u32,
}
impl Debug for RawPngChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawPngChunk")
      .field("type_", &self.type_)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl<'b> RawPngChunk<'b> {
  /// The chunk's type tag.
  #[inline]
  #[must_use]
  pub const fn chunk_ty(&self) -> PngChunkTy {
    self.type_
  }
  /// The chunk's payload.
  #[inline]
  #[must_use]
  pub const fn data(&self) -> &'b [u8] {
    self.data
  }
  /// The CRC written in the file, which might not be correct.
  #[inline]
  #[must_use]
  pub const fn declared_crc(&self) -> u32 {
    self.declared_crc
  }
  /// Computes the CRC that this chunk *should* have.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    chunk_crc(self.type_.to_bytes(), self.data)
  }
  /// If the declared CRC matches the actual CRC.
  #[inline]
  #[must_use]
  pub fn crc_is_valid(&self) -> bool {
    self.declared_crc == self.actual_crc()
  }
}

/// Reads successive raw chunks out of PNG bytes.
///
/// Each call to `next` consumes the length, type, data, and crc of one chunk.
/// When the bytes run out partway through a chunk the iterator yields a single
/// [`ApngError::TruncatedStream`] and then stays empty. Running out of bytes
/// exactly on a chunk boundary just ends the iterator, it's up to the caller
/// to decide if an `IEND` should have been seen by then.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct RawPngChunkIter<'b>(pub(crate) &'b [u8]);
impl<'b> RawPngChunkIter<'b> {
  /// Pass the full PNG bytes, the signature is checked and removed.
  #[inline]
  pub fn new(png: &'b [u8]) -> ApngResult<Self> {
    match png {
      [137, 80, 78, 71, 13, 10, 26, 10, rest @ ..] => Ok(Self(rest)),
      _ => Err(ApngError::BadSignature),
    }
  }

  /// Makes an iterator over bytes that are already past the signature.
  #[inline]
  #[must_use]
  pub const fn after_signature(bytes: &'b [u8]) -> Self {
    Self(bytes)
  }

  /// The bytes not yet consumed.
  #[inline]
  #[must_use]
  pub const fn remaining(&self) -> &'b [u8] {
    self.0
  }

  #[inline]
  fn split_off(&mut self, needed: usize) -> ApngResult<&'b [u8]> {
    if self.0.len() >= needed {
      let (head, rest) = self.0.split_at(needed);
      self.0 = rest;
      Ok(head)
    } else {
      let remaining = self.0.len();
      self.0 = &[];
      Err(ApngError::TruncatedStream { needed, remaining })
    }
  }

  fn read_chunk(&mut self) -> ApngResult<RawPngChunk<'b>> {
    let len_bytes = self.split_off(4)?;
    let chunk_len = u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]);
    let ty_bytes = self.split_off(4)?;
    let type_ = PngChunkTy::from([ty_bytes[0], ty_bytes[1], ty_bytes[2], ty_bytes[3]]);
    let data = self.split_off(chunk_len as usize)?;
    let crc_bytes = self.split_off(4)?;
    let declared_crc = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
    Ok(RawPngChunk { type_, data, declared_crc })
  }
}
impl<'b> Iterator for RawPngChunkIter<'b> {
  type Item = ApngResult<RawPngChunk<'b>>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.0.is_empty() {
      None
    } else {
      Some(self.read_chunk())
    }
  }
}
