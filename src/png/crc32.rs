//! The CRC-32 that guards every PNG chunk.
//!
//! The checksum covers the chunk's type tag and data, but not the length.

/// Lookup table for the reflected polynomial `0xEDB88320`, one entry per
/// possible low byte of the running value.
static CRC_TABLE: [u32; 256] = {
  let mut table = [0_u32; 256];
  let mut i = 0;
  while i < table.len() {
    let mut c = i as u32;
    let mut bit = 0;
    while bit < 8 {
      c = if c & 1 == 1 { (c >> 1) ^ 0xEDB8_8320 } else { c >> 1 };
      bit += 1;
    }
    table[i] = c;
    i += 1;
  }
  table
};

/// A running CRC-32, for checksumming data that arrives in pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crc32(u32);
impl Default for Crc32 {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
impl Crc32 {
  /// A checksum of no bytes so far.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self(u32::MAX)
  }

  /// Feeds more bytes in.
  #[inline]
  pub fn update(&mut self, bytes: &[u8]) {
    self.0 = bytes.iter().fold(self.0, |crc, &b| CRC_TABLE[usize::from(crc as u8 ^ b)] ^ (crc >> 8));
  }

  /// The checksum of every byte fed in.
  #[inline]
  #[must_use]
  pub const fn finish(self) -> u32 {
    !self.0
  }
}

/// CRC-32 of some bytes, as PNG computes it.
#[inline]
#[must_use]
pub fn png_crc(bytes: &[u8]) -> u32 {
  let mut crc = Crc32::new();
  crc.update(bytes);
  crc.finish()
}

/// The CRC a chunk with this type and data must declare.
#[inline]
#[must_use]
pub fn chunk_crc(chunk_ty: [u8; 4], data: &[u8]) -> u32 {
  let mut crc = Crc32::new();
  crc.update(&chunk_ty);
  crc.update(data);
  crc.finish()
}
