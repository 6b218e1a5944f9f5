//! Turning partial-update frames into complete canvases.
//!
//! Each animation frame only covers some rectangle of the canvas, and says
//! how it combines with what's already there ([`BlendOp`]) and what happens
//! to its rectangle afterwards ([`DisposeOp`]). The [`Compositor`] runs that
//! state machine one frame at a time and caches every composed canvas, and
//! the [`Player`] loops over the cached frames as many times as the file
//! asks for.

use core::time::Duration;

use alloc::{string::ToString, sync::Arc, vec::Vec};

use crate::{
  apng::{ApngImage, Frame},
  blend::{blend, BlendMode},
  png::{BlendOp, DisposeOp},
  r8g8b8a8_Srgb, ApngError, ApngResult, Bitmap, RasterLimits, Rasterize, Rect,
};

/// A complete canvas, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedFrame {
  /// Which animation frame this is.
  pub index: usize,
  /// The whole canvas after the frame was drawn.
  pub bitmap: Arc<Bitmap>,
  /// How long to show it. Zero for a still image.
  pub delay: Duration,
}

/// Composes the frames of one image, in order.
///
/// Frame `i` can only be composed after frame `i - 1`, so asking for a later
/// frame composes everything up to it. Every composed frame is kept, and
/// asking for it again is just a cache lookup.
///
/// The canvas is always the size in the file's `IHDR`, even when the default
/// image has a frame control of its own. Its width and height must fit in
/// the compositor's [`RasterLimits`], otherwise composing the first frame is
/// an [`ApngError::CanvasTooLarge`] error.
#[derive(Debug)]
pub struct Compositor<'i, R> {
  image: &'i ApngImage,
  rasterizer: R,
  limits: RasterLimits,
  /// The canvas as the next frame will see it (dispose already applied).
  canvas: Option<Bitmap>,
  composed: Vec<ComposedFrame>,
  still: Option<Arc<Bitmap>>,
}
impl<'i, R: Rasterize> Compositor<'i, R> {
  /// Nothing is rasterized until a frame is asked for.
  #[inline]
  #[must_use]
  pub fn new(image: &'i ApngImage, rasterizer: R) -> Self {
    Self::with_limits(image, rasterizer, RasterLimits::default())
  }

  /// A compositor with a non-default canvas size limit.
  #[inline]
  #[must_use]
  pub fn with_limits(image: &'i ApngImage, rasterizer: R, limits: RasterLimits) -> Self {
    Self { image, rasterizer, limits, canvas: None, composed: Vec::new(), still: None }
  }

  /// The image being composed.
  #[inline]
  #[must_use]
  pub const fn image(&self) -> &'i ApngImage {
    self.image
  }

  /// Number of animation frames.
  #[inline]
  #[must_use]
  pub fn frame_count(&self) -> usize {
    self.image.frames().len()
  }

  /// Number of frames composed so far.
  #[inline]
  #[must_use]
  pub fn composed_count(&self) -> usize {
    self.composed.len()
  }

  /// A transparent canvas the size of the image.
  fn new_canvas(&self) -> ApngResult<Bitmap> {
    let (width, height) = (self.image.width(), self.image.height());
    let limit = self.limits.max_dimension;
    if width > limit || height > limit {
      return Err(ApngError::CanvasTooLarge { width, height, limit });
    }
    Bitmap::try_new(width, height).map_err(|_| ApngError::CanvasAlloc { width, height })
  }

  fn rasterize_frame(&self, index: usize, frame: &Frame) -> ApngResult<Bitmap> {
    self
      .rasterizer
      .rasterize(&frame.to_standalone_png())
      .map_err(|e| ApngError::Rasterize { frame: index, message: e.to_string() })
  }

  /// Renders the default image on its own, as a still image.
  ///
  /// The result is cached.
  pub fn render_still(&mut self) -> ApngResult<Arc<Bitmap>> {
    if let Some(still) = &self.still {
      return Ok(still.clone());
    }
    let still = Arc::new(self.rasterize_frame(0, self.image.default_image())?);
    self.still = Some(still.clone());
    Ok(still)
  }

  /// Gets the composed canvas for frame `index`, composing any frames before
  /// it that haven't been done yet.
  ///
  /// Gives `None` if the index is past the last frame.
  pub fn compose(&mut self, index: usize) -> Option<ApngResult<ComposedFrame>> {
    if index >= self.frame_count() {
      return None;
    }
    while self.composed.len() <= index {
      if let Err(e) = self.compose_next() {
        return Some(Err(e));
      }
    }
    Some(Ok(self.composed[index].clone()))
  }

  fn compose_next(&mut self) -> ApngResult<()> {
    let index = self.composed.len();
    let image = self.image;
    let frame = &image.frames()[index];
    let src = self.rasterize_frame(index, frame)?;
    let (blend_op, dispose_op) =
      frame.fctl().map(|fctl| (fctl.blend_op, fctl.dispose_op)).unwrap_or_default();
    let mode = if index == 0 || blend_op == BlendOp::Source {
      BlendMode::None
    } else {
      BlendMode::Alpha
    };
    let rect = frame.rect();

    let mut canvas = match self.canvas.take() {
      Some(canvas) => canvas,
      None => self.new_canvas()?,
    };
    let previous = (dispose_op == DisposeOp::Previous).then(|| canvas.clone());
    let covers_canvas = rect == canvas.full_rect()
      && src.width == canvas.width
      && src.height == canvas.height;
    if mode == BlendMode::None && covers_canvas {
      canvas = src;
    } else {
      let src_rect = Rect::new(0, 0, rect.width, rect.height);
      blend(&mut canvas, rect, &src, src_rect, r8g8b8a8_Srgb::OPAQUE_WHITE, mode);
    }
    log::debug!("frame {index}: {rect:?}, {mode:?}, then dispose {dispose_op:?}");

    self.composed.push(ComposedFrame {
      index,
      bitmap: Arc::new(canvas.clone()),
      delay: frame.delay(),
    });

    match dispose_op {
      DisposeOp::None => (),
      DisposeOp::Background => canvas.clear_rect(rect),
      DisposeOp::Previous => {
        if let Some(previous) = previous {
          canvas = previous;
        }
      }
    }
    self.canvas = Some(canvas);
    Ok(())
  }
}

/// Plays an image: an iterator over composed frames in display order.
///
/// * An animation loops over its frames [`num_plays`](ApngImage::num_plays)
///   times, or forever when that's 0. The default image counts as a regular
///   frame of each loop when it's also frame 0.
/// * A still image gives exactly one frame, with a zero delay.
/// * An animation with no frames gives nothing.
///
/// After an error the iterator is done.
#[derive(Debug)]
pub struct Player<'i, R> {
  compositor: Compositor<'i, R>,
  position: usize,
  plays_completed: u32,
  finished: bool,
}
impl<'i, R: Rasterize> Player<'i, R> {
  /// Plays the image from the start, with an empty cache.
  #[inline]
  #[must_use]
  pub fn new(image: &'i ApngImage, rasterizer: R) -> Self {
    Self::from_compositor(Compositor::new(image, rasterizer))
  }

  /// Plays with a compositor that might already have frames cached.
  #[inline]
  #[must_use]
  pub fn from_compositor(compositor: Compositor<'i, R>) -> Self {
    Self { compositor, position: 0, plays_completed: 0, finished: false }
  }

  /// Starts over from the first frame. Already composed frames are reused.
  #[inline]
  pub fn reset(&mut self) {
    self.position = 0;
    self.plays_completed = 0;
    self.finished = false;
  }

  /// How many times through the frames the player has finished.
  #[inline]
  #[must_use]
  pub const fn plays_completed(&self) -> u32 {
    self.plays_completed
  }

  /// The compositor and its cache.
  #[inline]
  #[must_use]
  pub const fn compositor(&self) -> &Compositor<'i, R> {
    &self.compositor
  }

  /// Keeps the cache around for another player.
  #[inline]
  #[must_use]
  pub fn into_compositor(self) -> Compositor<'i, R> {
    self.compositor
  }

  fn next_still(&mut self) -> ApngResult<ComposedFrame> {
    self.finished = true;
    self.plays_completed = 1;
    let bitmap = self.compositor.render_still()?;
    Ok(ComposedFrame { index: 0, bitmap, delay: Duration::ZERO })
  }
}
impl<R: Rasterize> Iterator for Player<'_, R> {
  type Item = ApngResult<ComposedFrame>;
  fn next(&mut self) -> Option<Self::Item> {
    if self.finished {
      return None;
    }
    let image = self.compositor.image();
    if image.is_simple_png() {
      return Some(self.next_still());
    }
    let frame_count = self.compositor.frame_count();
    if frame_count == 0 {
      self.finished = true;
      return None;
    }
    if self.position >= frame_count {
      self.plays_completed = self.plays_completed.saturating_add(1);
      let num_plays = image.num_plays();
      if num_plays != 0 && self.plays_completed >= num_plays {
        self.finished = true;
        return None;
      }
      self.position = 0;
    }
    let out = self.compositor.compose(self.position)?;
    self.position += 1;
    if out.is_err() {
      self.finished = true;
    }
    Some(out)
  }
}

#[cfg(test)]
mod tests;
