use super::*;

/// A parsed PNG or APNG.
///
/// * When [`is_simple_png`](Self::is_simple_png) is true the file is a still
///   image: only the [default image](Self::default_image) matters and the
///   [frame list](Self::frames) is empty.
/// * Otherwise the frame list holds every animation frame in display order.
///   If the default image is also the first animation frame then it appears
///   at index 0 of the list as well, and
///   [`default_image_is_animated`](Self::default_image_is_animated) is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApngImage {
  ihdr: IHDR,
  actl: Option<acTL>,
  default_image: Frame,
  frames: Vec<Frame>,
  is_simple_png: bool,
  default_image_is_animated: bool,
}

/// Everything the parser tracks between chunks.
#[derive(Debug, Default)]
struct ParseState {
  actl: Option<acTL>,
  /// Set by the first `IDAT` that isn't preceded by an `acTL`.
  is_simple_png: bool,
  /// Any `IDAT` seen yet.
  image_data_seen: bool,
  default_image: FrameBuilder,
  /// The animation frame currently receiving `fdAT` data.
  open_frame: Option<FrameBuilder>,
  sealed_frames: Vec<FrameBuilder>,
  other_chunks: Vec<ChunkBuf>,
  last_sequence_number: Option<u32>,
}
impl ParseState {
  /// Sequence numbers should only ever go up, but playback doesn't depend on
  /// them so a problem is only logged.
  fn check_sequence_number(&mut self, sequence_number: u32) {
    if let Some(last) = self.last_sequence_number {
      if sequence_number <= last {
        log::warn!("sequence number {sequence_number} doesn't follow {last}");
      }
    }
    self.last_sequence_number = Some(sequence_number);
  }

  fn frame_control(&mut self, fctl: fcTL) -> ApngResult<()> {
    let still_empty = match &self.open_frame {
      Some(open) => open.idat_chunks.is_empty(),
      None => self.default_image.fctl.is_some() && !self.image_data_seen,
    };
    if still_empty {
      return Err(ApngError::DuplicateFrameControl);
    }
    if self.is_simple_png {
      log::debug!("ignoring fcTL in a still image");
      return Ok(());
    }
    self.check_sequence_number(fctl.sequence_number);
    if self.image_data_seen {
      if let Some(sealed) = self.open_frame.replace(FrameBuilder::with_fctl(fctl)) {
        self.sealed_frames.push(sealed);
      }
      log::trace!("frame {} opened", self.sealed_frames.len());
    } else {
      log::trace!("default image is the first animation frame");
      self.default_image.fctl = Some(fctl);
    }
    Ok(())
  }
}

impl ApngImage {
  /// Parses the full bytes of a PNG file.
  ///
  /// ## Failure
  /// Any structural problem is an error and no image is returned:
  /// * [`BadSignature`](ApngError::BadSignature) if the bytes don't start with
  ///   the PNG signature.
  /// * [`FirstChunkNotIhdr`](ApngError::FirstChunkNotIhdr) /
  ///   [`DuplicateHeader`](ApngError::DuplicateHeader) unless there's exactly
  ///   one `IHDR`, and it's first.
  /// * [`MisplacedAnimationControl`](ApngError::MisplacedAnimationControl) for
  ///   an `acTL` after image data.
  /// * [`DuplicateFrameControl`](ApngError::DuplicateFrameControl) for an
  ///   `fcTL` when the previous `fcTL` didn't get any image data yet.
  /// * [`FrameControlExpected`](ApngError::FrameControlExpected) for an
  ///   `fdAT` before any animation frame's `fcTL`.
  /// * [`MissingEnd`](ApngError::MissingEnd) or
  ///   [`TruncatedStream`](ApngError::TruncatedStream) if the bytes stop
  ///   before `IEND`.
  /// * [`MalformedChunk`](ApngError::MalformedChunk) if a chunk this parser
  ///   reads the payload of has a bad payload.
  ///
  /// In a still image (image data with no `acTL` in front) any `fcTL` and
  /// `fdAT` chunks are skipped without error.
  ///
  /// Chunk CRCs are *not* checked. A mismatch is logged as a warning and the
  /// chunk is used anyway. Anything after `IEND` is ignored.
  pub fn from_png_bytes(bytes: &[u8]) -> ApngResult<Self> {
    let mut chunks = RawPngChunkIter::new(bytes)?;
    let ihdr = match chunks.next().transpose()?.map(PngChunk::try_from).transpose()? {
      Some(PngChunk::IHDR(ihdr)) => ihdr,
      _ => return Err(ApngError::FirstChunkNotIhdr),
    };
    log::trace!("{ihdr:?}");

    let mut state = ParseState::default();
    let iend = loop {
      let raw = chunks.next().ok_or(ApngError::MissingEnd)??;
      log::trace!("chunk {} ({} bytes)", raw.chunk_ty(), raw.data().len());
      if !raw.crc_is_valid() {
        log::warn!("{} chunk has a bad crc, using it anyway", raw.chunk_ty());
      }
      match PngChunk::try_from(raw)? {
        PngChunk::IHDR(_) => return Err(ApngError::DuplicateHeader),
        PngChunk::acTL(actl) => {
          if state.image_data_seen {
            return Err(ApngError::MisplacedAnimationControl);
          }
          if state.actl.is_some() {
            log::warn!("second acTL replaces the first");
          }
          log::debug!("{actl:?}");
          state.actl = Some(actl);
        }
        PngChunk::IDAT(raw) => {
          if state.actl.is_none() && !state.image_data_seen {
            log::debug!("image data without acTL, this is a still image");
            state.is_simple_png = true;
          }
          state.image_data_seen = true;
          state.default_image.idat_chunks.push(ChunkBuf::from(raw));
        }
        PngChunk::fcTL(fctl) => state.frame_control(fctl)?,
        PngChunk::fdAT(fdat) => {
          if state.is_simple_png {
            log::debug!("ignoring fdAT in a still image");
            continue;
          }
          let open = state.open_frame.as_mut().ok_or(ApngError::FrameControlExpected)?;
          open.idat_chunks.push(fdat.to_idat_chunk());
          state.check_sequence_number(fdat.sequence_number);
        }
        PngChunk::IEND(raw) => break ChunkBuf::from(raw),
        PngChunk::Other(raw) => state.other_chunks.push(ChunkBuf::from(raw)),
      }
    };
    if !chunks.remaining().is_empty() {
      log::debug!("ignoring {} bytes after IEND", chunks.remaining().len());
    }

    if state.is_simple_png && state.default_image.fctl.take().is_some() {
      log::debug!("ignoring fcTL before the image data of a still image");
    }
    let other_chunks: Arc<[ChunkBuf]> = state.other_chunks.into();
    let default_iend = (!state.default_image.idat_chunks.is_empty()).then(|| iend.clone());
    let default_image = state.default_image.finish(ihdr, default_iend, other_chunks.clone());
    let mut frames: Vec<Frame> = state
      .sealed_frames
      .into_iter()
      .chain(state.open_frame)
      .map(|builder| builder.finish(ihdr, Some(iend.clone()), other_chunks.clone()))
      .collect();
    let default_image_is_animated = default_image.fctl.is_some();
    if default_image_is_animated {
      frames.insert(0, default_image.clone());
    }
    if let Some(actl) = &state.actl {
      if actl.num_frames as usize != frames.len() {
        log::warn!("acTL says {} frames, but found {}", actl.num_frames, frames.len());
      }
    }
    log::debug!(
      "parsed {}x{}: still={}, frames={}, default image animated={}",
      ihdr.width,
      ihdr.height,
      state.is_simple_png,
      frames.len(),
      default_image_is_animated
    );
    Ok(Self {
      ihdr,
      actl: state.actl,
      default_image,
      frames,
      is_simple_png: state.is_simple_png,
      default_image_is_animated,
    })
  }

  /// The file's header.
  #[inline]
  #[must_use]
  pub const fn ihdr(&self) -> &IHDR {
    &self.ihdr
  }

  /// Canvas width.
  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.ihdr.width as u32
  }

  /// Canvas height.
  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.ihdr.height as u32
  }

  #[inline]
  #[must_use]
  pub const fn actl(&self) -> Option<&acTL> {
    self.actl.as_ref()
  }

  /// How many times the animation plays, 0 meaning forever.
  ///
  /// A file without animation control plays once.
  #[inline]
  #[must_use]
  pub const fn num_plays(&self) -> u32 {
    match &self.actl {
      Some(actl) => actl.num_plays,
      None => 1,
    }
  }

  /// The image in the plain `IDAT` data, shown by decoders that don't know
  /// about APNG.
  #[inline]
  #[must_use]
  pub const fn default_image(&self) -> &Frame {
    &self.default_image
  }

  /// Animation frames in display order.
  #[inline]
  #[must_use]
  pub fn frames(&self) -> &[Frame] {
    &self.frames
  }

  /// If the file is a still image.
  #[inline]
  #[must_use]
  pub const fn is_simple_png(&self) -> bool {
    self.is_simple_png
  }

  /// If the default image is also animation frame 0.
  #[inline]
  #[must_use]
  pub const fn default_image_is_animated(&self) -> bool {
    self.default_image_is_animated
  }
}
