use super::*;

/// One frame of an APNG, or the default image.
///
/// A frame holds everything needed to write it back out as its own PNG: the
/// file's header, the frame's image data (already converted from `fdAT` to
/// `IDAT`), the end chunk, and all of the file's ancillary chunks. The
/// ancillary chunks are shared between every frame of the same file.
///
/// A frame without frame control is the default image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
  pub(crate) ihdr: IHDR,
  pub(crate) fctl: Option<fcTL>,
  pub(crate) idat_chunks: Vec<ChunkBuf>,
  pub(crate) iend: Option<ChunkBuf>,
  pub(crate) other_chunks: Arc<[ChunkBuf]>,
}
impl Frame {
  /// The file's header, as parsed.
  ///
  /// Use [`width`](Self::width) and [`height`](Self::height) for this frame's
  /// own size.
  #[inline]
  #[must_use]
  pub const fn ihdr(&self) -> &IHDR {
    &self.ihdr
  }

  #[inline]
  #[must_use]
  pub const fn fctl(&self) -> Option<&fcTL> {
    self.fctl.as_ref()
  }

  /// Image data in file order.
  #[inline]
  #[must_use]
  pub fn idat_chunks(&self) -> &[ChunkBuf] {
    &self.idat_chunks
  }

  /// Every chunk that isn't part of the frame structure, in file order.
  #[inline]
  #[must_use]
  pub fn other_chunks(&self) -> &[ChunkBuf] {
    &self.other_chunks
  }

  /// The end chunk, which is `None` only for a default image that never got
  /// any image data.
  #[inline]
  #[must_use]
  pub const fn iend(&self) -> Option<&ChunkBuf> {
    self.iend.as_ref()
  }

  /// If this is the default image (no frame control of its own).
  #[inline]
  #[must_use]
  pub const fn is_default_image(&self) -> bool {
    self.fctl.is_none()
  }

  /// Frame width: from the frame control, or the header when there's none.
  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    match &self.fctl {
      Some(fctl) => fctl.width,
      None => self.ihdr.width as u32,
    }
  }

  /// Frame height: from the frame control, or the header when there's none.
  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    match &self.fctl {
      Some(fctl) => fctl.height,
      None => self.ihdr.height as u32,
    }
  }

  /// Where this frame goes on the canvas.
  ///
  /// Offsets above `i32::MAX` are clamped to `i32::MAX`. A canvas is never
  /// wider or taller than that (the header's size is a positive `i32`), so a
  /// clamped frame still lies entirely outside of the canvas.
  #[inline]
  #[must_use]
  pub fn rect(&self) -> Rect {
    let (x, y) = match &self.fctl {
      Some(fctl) => (fctl.x_offset, fctl.y_offset),
      None => (0, 0),
    };
    Rect::new(
      i32::try_from(x).unwrap_or(i32::MAX),
      i32::try_from(y).unwrap_or(i32::MAX),
      self.width(),
      self.height(),
    )
  }

  /// How long this frame is shown. A frame without frame control has no
  /// timing, so this is zero.
  #[inline]
  #[must_use]
  pub fn delay(&self) -> Duration {
    self.fctl.as_ref().map(fcTL::delay).unwrap_or_default()
  }

  /// Writes this frame as a complete, non-animated PNG.
  ///
  /// The output is the signature, the header (with this frame's width and
  /// height), the ancillary chunks, the image data, and the end chunk. This
  /// is built fresh on every call.
  #[must_use]
  pub fn to_standalone_png(&self) -> Vec<u8> {
    let ihdr = self.ihdr.to_chunk_with_dimensions(self.width(), self.height());
    let iend = match &self.iend {
      Some(iend) => iend.clone(),
      None => iend_chunk(),
    };
    let len = PNG_SIGNATURE.len()
      + ihdr.encoded_len()
      + self.other_chunks.iter().map(ChunkBuf::encoded_len).sum::<usize>()
      + self.idat_chunks.iter().map(ChunkBuf::encoded_len).sum::<usize>()
      + iend.encoded_len();
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(&PNG_SIGNATURE);
    ihdr.write_to(&mut out);
    for chunk in self.other_chunks.iter().chain(&self.idat_chunks) {
      chunk.write_to(&mut out);
    }
    iend.write_to(&mut out);
    out
  }
}

/// A frame that's still being parsed.
///
/// It can't become a [`Frame`] until the end of the stream, since the full
/// set of ancillary chunks isn't known before then.
#[derive(Debug, Clone, Default)]
pub(crate) struct FrameBuilder {
  pub(crate) fctl: Option<fcTL>,
  pub(crate) idat_chunks: Vec<ChunkBuf>,
}
impl FrameBuilder {
  #[inline]
  pub(crate) fn with_fctl(fctl: fcTL) -> Self {
    Self { fctl: Some(fctl), idat_chunks: Vec::new() }
  }

  #[inline]
  pub(crate) fn finish(self, ihdr: IHDR, iend: Option<ChunkBuf>, other_chunks: Arc<[ChunkBuf]>) -> Frame {
    Frame { ihdr, fctl: self.fctl, idat_chunks: self.idat_chunks, iend, other_chunks }
  }
}
