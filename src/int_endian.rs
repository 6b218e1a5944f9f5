//! Big-endian integers as stored in PNG chunk headers and payloads.
//!
//! Conversion is symmetric: going from a native value to the stored bytes
//! reverses the byte order on a little-endian host, and going back reverses
//! it again, so `U32BE::from_u32(x).to_u32() == x` for every `x`.
//!
//! The types hold only bytes, so they have an alignment of 1 and can sit at
//! any offset of a `#[repr(C)]` payload struct read with `bytemuck`.

use bytemuck::{Pod, Zeroable};

macro_rules! big_endian_int {
  ($(#[$meta:meta])* $name:ident, $native:ty, $to:ident, $from:ident) => {
    $(#[$meta])*
    #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Zeroable, Pod)]
    #[repr(transparent)]
    pub struct $name([u8; core::mem::size_of::<$native>()]);
    impl $name {
      #[doc = concat!("The value as a native `", stringify!($native), "`.")]
      #[inline]
      #[must_use]
      pub const fn $to(self) -> $native {
        <$native>::from_be_bytes(self.0)
      }
      #[doc = concat!("Stores a native `", stringify!($native), "`.")]
      #[inline]
      #[must_use]
      pub const fn $from(n: $native) -> Self {
        Self(n.to_be_bytes())
      }
      /// The stored bytes, in file order.
      #[inline]
      #[must_use]
      pub const fn to_bytes(self) -> [u8; core::mem::size_of::<$native>()] {
        self.0
      }
    }
    impl core::fmt::Debug for $name {
      fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}({})", stringify!($name), self.$to())
      }
    }
    impl From<$native> for $name {
      #[inline]
      fn from(n: $native) -> Self {
        Self::$from(n)
      }
    }
    impl From<$name> for $native {
      #[inline]
      fn from(be: $name) -> Self {
        be.$to()
      }
    }
  };
}

big_endian_int!(
  /// A `u16` stored as big-endian bytes (fcTL delay fields).
  U16BE, u16, to_u16, from_u16
);
big_endian_int!(
  /// A `u32` stored as big-endian bytes (chunk lengths, sizes, offsets,
  /// sequence numbers).
  U32BE, u32, to_u32, from_u32
);

#[test]
fn test_int_endian_is_symmetric() {
  for x in [0_u32, 1, 0x1234_5678, u32::MAX] {
    assert_eq!(U32BE::from_u32(x).to_u32(), x);
  }
  for x in [0_u16, 1, 0xABCD, u16::MAX] {
    assert_eq!(U16BE::from_u16(x).to_u16(), x);
  }
  assert_eq!(U32BE::from_u32(0x0102_0304).to_bytes(), [1, 2, 3, 4]);
  let be: U16BE = bytemuck::pod_read_unaligned(&[0x01, 0x02]);
  assert_eq!(u16::from(be), 0x0102);
  assert_eq!(format!("{:?}", U32BE::from(7)), "U32BE(7)");
}
