//! Fixed-size byte arrays that are usually ascii text.

use core::fmt;

/// An array of bytes expected to contain ascii data.
///
/// Nothing checks the encoding. Formatting shows printable ascii as-is, and
/// escapes anything else (`Debug` as `\xNN`, `Display` as `?`), so a corrupt
/// chunk tag still prints as something readable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct AsciiArray<const N: usize>(pub [u8; N]);

impl<const N: usize> AsciiArray<N> {
  /// The raw bytes.
  #[inline]
  #[must_use]
  pub const fn as_bytes(&self) -> &[u8; N] {
    &self.0
  }

  /// If every byte is a printable ascii character.
  #[inline]
  #[must_use]
  pub fn is_printable(&self) -> bool {
    self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ')
  }
}

impl<const N: usize> Default for AsciiArray<N> {
  #[inline]
  fn default() -> Self {
    Self([0; N])
  }
}

impl<const N: usize> fmt::Debug for AsciiArray<N> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "\"{}\"", self.0.escape_ascii())
  }
}

impl<const N: usize> fmt::Display for AsciiArray<N> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.iter().try_for_each(|&b| {
      let ch = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
      fmt::Write::write_char(f, ch)
    })
  }
}

impl<const N: usize> From<[u8; N]> for AsciiArray<N> {
  #[inline]
  fn from(array: [u8; N]) -> Self {
    Self(array)
  }
}

#[test]
fn test_ascii_array_formatting() {
  let tag = AsciiArray(*b"fcTL");
  assert!(tag.is_printable());
  assert_eq!(format!("{tag}"), "fcTL");
  assert_eq!(format!("{tag:?}"), "\"fcTL\"");
  let junk = AsciiArray([b'a', 0, 0xFF, b'"']);
  assert!(!junk.is_printable());
  assert_eq!(format!("{junk}"), "a??\"");
  assert_eq!(format!("{junk:?}"), "\"a\\x00\\xff\\\"\"");
}
