use super::*;

/// The on-disk layout of an `fcTL` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Zeroable, Pod)]
#[repr(C)]
struct FcTLPayload {
  sequence_number: U32BE,
  width: U32BE,
  height: U32BE,
  x_offset: U32BE,
  y_offset: U32BE,
  delay_num: U16BE,
  delay_den: U16BE,
  dispose_op: u8,
  blend_op: u8,
}

/// What happens to a frame's region after it has been displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DisposeOp {
  /// Leave the canvas as it is.
  #[default]
  None = 0,
  /// Clear the frame's region to fully transparent black.
  Background = 1,
  /// Put the canvas back to how it was before this frame was drawn.
  Previous = 2,
}
impl TryFrom<u8> for DisposeOp {
  type Error = ();
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Background,
      2 => Self::Previous,
      _ => return Err(()),
    })
  }
}

/// How a frame's pixels combine with the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlendOp {
  /// The frame's pixels replace the region.
  #[default]
  Source = 0,
  /// The frame is composited over the region.
  Over = 1,
}
impl TryFrom<u8> for BlendOp {
  type Error = ();
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::Source,
      1 => Self::Over,
      _ => return Err(()),
    })
  }
}

/// Frame Control
///
/// Describes the region, timing, and disposal of the frame data that follows.
///
/// See: [fcTL](https://www.w3.org/TR/png/#fcTL-chunk)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct fcTL {
  /// Sequence number of the animation chunk, starting from 0
  pub sequence_number: u32,
  pub width: u32,
  pub height: u32,
  pub x_offset: u32,
  pub y_offset: u32,
  /// Frame delay fraction numerator
  pub delay_num: u16,
  /// Frame delay fraction denominator, 0 is read as 100.
  pub delay_den: u16,
  pub dispose_op: DisposeOp,
  pub blend_op: BlendOp,
}
impl TryFrom<&[u8]> for fcTL {
  type Error = ApngError;
  #[inline]
  fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
    fn malformed<E>(_: E) -> ApngError {
      ApngError::MalformedChunk(PngChunkTy::fcTL)
    }
    let payload: FcTLPayload = bytemuck::try_pod_read_unaligned(data).map_err(malformed)?;
    Ok(Self {
      sequence_number: payload.sequence_number.to_u32(),
      width: payload.width.to_u32(),
      height: payload.height.to_u32(),
      x_offset: payload.x_offset.to_u32(),
      y_offset: payload.y_offset.to_u32(),
      delay_num: payload.delay_num.to_u16(),
      delay_den: payload.delay_den.to_u16(),
      dispose_op: DisposeOp::try_from(payload.dispose_op).map_err(malformed)?,
      blend_op: BlendOp::try_from(payload.blend_op).map_err(malformed)?,
    })
  }
}
impl fcTL {
  /// The effective delay denominator.
  #[inline]
  #[must_use]
  pub const fn effective_delay_den(&self) -> u16 {
    if self.delay_den == 0 {
      100
    } else {
      self.delay_den
    }
  }

  /// How long the frame stays on screen, in seconds.
  #[inline]
  #[must_use]
  pub fn delay_seconds(&self) -> f64 {
    f64::from(self.delay_num) / f64::from(self.effective_delay_den())
  }

  /// How long the frame stays on screen.
  #[inline]
  #[must_use]
  pub fn delay(&self) -> Duration {
    let nanos = u64::from(self.delay_num) * 1_000_000_000 / u64::from(self.effective_delay_den());
    Duration::from_nanos(nanos)
  }

  /// Serializes this frame control as a complete chunk.
  #[must_use]
  pub fn to_chunk(&self) -> ChunkBuf {
    let payload = FcTLPayload {
      sequence_number: U32BE::from_u32(self.sequence_number),
      width: U32BE::from_u32(self.width),
      height: U32BE::from_u32(self.height),
      x_offset: U32BE::from_u32(self.x_offset),
      y_offset: U32BE::from_u32(self.y_offset),
      delay_num: U16BE::from_u16(self.delay_num),
      delay_den: U16BE::from_u16(self.delay_den),
      dispose_op: self.dispose_op as u8,
      blend_op: self.blend_op as u8,
    };
    ChunkBuf::new(PngChunkTy::fcTL, bytemuck::bytes_of(&payload).to_vec())
  }
}
