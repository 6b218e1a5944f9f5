use super::*;

/// The on-disk layout of an `acTL` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Zeroable, Pod)]
#[repr(C)]
struct AcTLPayload {
  num_frames: U32BE,
  num_plays: U32BE,
}

/// Animation Control
///
/// Its presence before the first `IDAT` is what makes a PNG an APNG.
///
/// See: [acTL](https://www.w3.org/TR/png/#acTL-chunk)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct acTL {
  /// Number of frames the encoder says the animation has.
  pub num_frames: u32,
  /// How many times to play the animation, 0 means loop forever.
  pub num_plays: u32,
}
impl TryFrom<&[u8]> for acTL {
  type Error = ApngError;
  #[inline]
  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    let payload: AcTLPayload = bytemuck::try_pod_read_unaligned(data)
      .map_err(|_| ApngError::MalformedChunk(PngChunkTy::acTL))?;
    Ok(Self { num_frames: payload.num_frames.to_u32(), num_plays: payload.num_plays.to_u32() })
  }
}
impl acTL {
  /// If the animation never stops on its own.
  #[inline]
  #[must_use]
  pub const fn loops_forever(&self) -> bool {
    self.num_plays == 0
  }
}
