use alloc::string::String;

use crate::png::PngChunkTy;

/// Shorthand for results with an [`ApngError`].
pub type ApngResult<T> = Result<T, ApngError>;

/// An error from the `animagine` crate.
///
/// Every error is terminal for the image that produced it: a stream that fails
/// to parse yields no [`ApngImage`](crate::apng::ApngImage), and a frame that
/// fails to rasterize stops playback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApngError {
  /// The first eight bytes aren't the PNG signature.
  #[error("file signature incorrect")]
  BadSignature,

  /// The first chunk after the signature wasn't `IHDR`.
  #[error("IHDR must be located before any other chunk")]
  FirstChunkNotIhdr,

  /// A second `IHDR` chunk appeared.
  #[error("duplicate header: only a single IHDR is allowed")]
  DuplicateHeader,

  /// An `acTL` chunk appeared after image data.
  #[error("acTL must precede IDAT/fdAT")]
  MisplacedAnimationControl,

  /// Two `fcTL` chunks appeared without any image data between them.
  #[error("duplicate fcTL for one frame")]
  DuplicateFrameControl,

  /// An `fdAT` chunk appeared outside of a frame control block.
  #[error("fcTL expected before fdAT")]
  FrameControlExpected,

  /// The stream ended without an `IEND` chunk.
  #[error("IEND expected before end of stream")]
  MissingEnd,

  /// A recognized chunk had a payload that couldn't be parsed.
  #[error("malformed {0} chunk")]
  MalformedChunk(PngChunkTy),

  /// A chunk claimed more bytes than the stream still has.
  #[error("truncated stream: needed {needed} bytes but only {remaining} remain")]
  TruncatedStream {
    /// Bytes the chunk needs (header, data, or crc).
    needed: usize,
    /// Bytes actually left in the stream.
    remaining: usize,
  },

  /// The rasterizer failed on a frame's standalone PNG bytes.
  #[error("rasterizing frame {frame} failed: {message}")]
  Rasterize {
    /// Index of the frame within the animation (0 for a still image).
    frame: usize,
    /// Whatever the rasterizer reported.
    message: String,
  },

  /// The header asks for a canvas bigger than the compositor allows.
  #[error("canvas is {width}x{height}, but the limit is {limit} on either side")]
  CanvasTooLarge {
    /// from the header
    width: u32,
    /// from the header
    height: u32,
    /// the configured limit
    limit: u32,
  },

  /// Memory for the canvas couldn't be allocated.
  #[error("couldn't allocate a {width}x{height} canvas")]
  CanvasAlloc {
    /// from the header
    width: u32,
    /// from the header
    height: u32,
  },
}

/// The broad category of an [`ApngError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApngErrorKind {
  /// The bytes break a PNG/APNG structural rule.
  Format,
  /// A chunk runs past the end of the bytes.
  TruncatedStream,
  /// The external rasterizer rejected a frame.
  Rasterize,
  /// The image is too big to compose.
  ResourceLimit,
}

impl ApngError {
  /// Which category this error falls into.
  #[inline]
  #[must_use]
  pub const fn kind(&self) -> ApngErrorKind {
    match self {
      Self::TruncatedStream { .. } => ApngErrorKind::TruncatedStream,
      Self::Rasterize { .. } => ApngErrorKind::Rasterize,
      Self::CanvasTooLarge { .. } | Self::CanvasAlloc { .. } => ApngErrorKind::ResourceLimit,
      _ => ApngErrorKind::Format,
    }
  }
}
