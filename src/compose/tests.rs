use core::cell::Cell;

use super::*;
use crate::{
  png::fcTL,
  rgba,
  test_fixtures::{fctl, raw_rgba, raw_rgba_rasterizer, solid, PngBuilder},
};

const RED: r8g8b8a8_Srgb = rgba(255, 0, 0, 255);
const BLUE: r8g8b8a8_Srgb = rgba(0, 0, 255, 255);
const GREEN: r8g8b8a8_Srgb = rgba(0, 255, 0, 128);

/// Builds an APNG where the default image is frame 0.
///
/// Sequence numbers are filled in here.
fn animation(
  width: u32, height: u32, num_plays: u32, frames: &[(fcTL, Bitmap)],
  encode: fn(&Bitmap) -> Vec<u8>,
) -> Vec<u8> {
  let mut b = PngBuilder::new().ihdr(width, height).actl(frames.len() as u32, num_plays);
  let mut seq = 0;
  for (i, (fctl, pixels)) in frames.iter().enumerate() {
    b = b.fctl(fcTL { sequence_number: seq, ..*fctl });
    seq += 1;
    if i == 0 {
      b = b.idat(&encode(pixels));
    } else {
      b = b.fdat(seq, &encode(pixels));
      seq += 1;
    }
  }
  b.iend().build()
}

/// Each pixel is `inside` when `(x, y)` is in `rect`, otherwise `outside`.
fn expect_rect(base: &Bitmap, rect: Rect, inside: impl Fn(u32, u32) -> r8g8b8a8_Srgb) -> Bitmap {
  let mut out = base.clone();
  for y in 0..out.height {
    for x in 0..out.width {
      let rx = x as i32 - rect.x;
      let ry = y as i32 - rect.y;
      if rx >= 0 && ry >= 0 && (rx as u32) < rect.width && (ry as u32) < rect.height {
        *out.get_mut(x, y).unwrap() = inside(rx as u32, ry as u32);
      }
    }
  }
  out
}

/// 50x50, blue with a fully transparent left half.
///
/// The transparent pixels are white with zero alpha, the way many encoders
/// write them, so that only the alpha channel says to skip them.
fn half_blue() -> Bitmap {
  let mut b = solid(50, 50, BLUE);
  for y in 0..50 {
    b.row_mut(y)[..25].fill(rgba(255, 255, 255, 0));
  }
  b
}

fn scenario(encode: fn(&Bitmap) -> Vec<u8>) -> Vec<u8> {
  animation(
    100,
    100,
    0,
    &[
      (fctl(0, [0, 0, 100, 100], DisposeOp::None, BlendOp::Source), solid(100, 100, RED)),
      (fctl(0, [10, 10, 50, 50], DisposeOp::Background, BlendOp::Over), half_blue()),
    ],
    encode,
  )
}

fn check_scenario<R: Rasterize>(image: &ApngImage, rasterizer: R) {
  assert!(!image.is_simple_png());
  assert_eq!(image.frames().len(), 2);
  assert_eq!(image.num_plays(), 0);

  let mut compositor = Compositor::new(image, rasterizer);
  let f0 = compositor.compose(0).unwrap().unwrap();
  assert_eq!(*f0.bitmap, solid(100, 100, RED));
  assert_eq!(f0.delay, Duration::from_millis(100));

  let rect = Rect::new(10, 10, 50, 50);
  let f1 = compositor.compose(1).unwrap().unwrap();
  let expected = expect_rect(&f0.bitmap, rect, |x, _| if x < 25 { RED } else { BLUE });
  assert_eq!(*f1.bitmap, expected);

  // after the dispose step, the region is clear for the next loop
  let canvas = compositor.canvas.as_ref().unwrap();
  assert_eq!(*canvas, expect_rect(&f0.bitmap, rect, |_, _| r8g8b8a8_Srgb::TRANSPARENT_BLACK));
  assert!(compositor.compose(2).is_none());
}

#[test]
fn test_two_frame_scenario() {
  let png = scenario(raw_rgba);
  let image = ApngImage::from_png_bytes(&png).unwrap();
  check_scenario(&image, raw_rgba_rasterizer);
}

#[cfg(feature = "miniz_oxide")]
#[test]
fn test_two_frame_scenario_with_zlib_data() {
  let png = scenario(crate::test_fixtures::zlib_rgba);
  let image = ApngImage::from_png_bytes(&png).unwrap();
  check_scenario(&image, crate::ImagineRasterizer::default());
}

#[test]
fn test_looping_reuses_the_cache() {
  let png = scenario(raw_rgba);
  let image = ApngImage::from_png_bytes(&png).unwrap();
  let calls = Cell::new(0);
  let counting = |png: &[u8]| {
    calls.set(calls.get() + 1);
    raw_rgba_rasterizer(png)
  };
  let played: Vec<ComposedFrame> =
    Player::new(&image, counting).take(7).collect::<ApngResult<_>>().unwrap();
  let indexes: Vec<usize> = played.iter().map(|f| f.index).collect();
  assert_eq!(indexes, [0, 1, 0, 1, 0, 1, 0]);
  assert_eq!(calls.get(), 2);
  assert!(Arc::ptr_eq(&played[0].bitmap, &played[2].bitmap));
  assert!(Arc::ptr_eq(&played[1].bitmap, &played[5].bitmap));
}

#[test]
fn test_num_plays() {
  for num_plays in [1, 2, 3] {
    let png = animation(
      4,
      4,
      num_plays,
      &[
        (fctl(0, [0, 0, 4, 4], DisposeOp::None, BlendOp::Source), solid(4, 4, RED)),
        (fctl(0, [1, 1, 2, 2], DisposeOp::None, BlendOp::Source), solid(2, 2, BLUE)),
        (fctl(0, [0, 0, 1, 1], DisposeOp::None, BlendOp::Source), solid(1, 1, GREEN)),
      ],
      raw_rgba,
    );
    let image = ApngImage::from_png_bytes(&png).unwrap();
    let mut player = Player::new(&image, raw_rgba_rasterizer);
    let count = player.by_ref().count();
    assert_eq!(count, 3 * num_plays as usize);
    assert_eq!(player.plays_completed(), num_plays);
    assert!(player.next().is_none());

    // a reset plays it all again, without composing anything new
    player.reset();
    assert_eq!(player.compositor().composed_count(), 3);
    assert_eq!(player.count(), 3 * num_plays as usize);
  }
}

#[test]
fn test_previous_then_over_does_not_drift() {
  let base = {
    let mut b = solid(20, 20, RED);
    b.row_mut(3).fill(GREEN);
    b
  };
  let overlay = {
    let mut b = solid(8, 8, BLUE);
    b.pixels[0] = r8g8b8a8_Srgb::TRANSPARENT_BLACK;
    b.pixels[9] = rgba(0, 0, 0, 1);
    b
  };
  let mut frames = vec![(fctl(0, [0, 0, 20, 20], DisposeOp::None, BlendOp::Source), base.clone())];
  for _ in 0..6 {
    frames.push((fctl(0, [2, 2, 8, 8], DisposeOp::Previous, BlendOp::Over), overlay.clone()));
  }
  let png = animation(20, 20, 1, &frames, raw_rgba);
  let image = ApngImage::from_png_bytes(&png).unwrap();
  let mut compositor = Compositor::new(&image, raw_rgba_rasterizer);

  let rect = Rect::new(2, 2, 8, 8);
  let drawn = expect_rect(&base, rect, |x, y| {
    let px = *overlay.get(x, y).unwrap();
    if px.a == 0 {
      *base.get(x + 2, y + 2).unwrap()
    } else {
      px
    }
  });
  for i in 1..frames.len() {
    let composed = compositor.compose(i).unwrap().unwrap();
    assert_eq!(*composed.bitmap, drawn, "frame {i}");
    assert_eq!(compositor.canvas.as_ref(), Some(&base), "canvas after frame {i}");
  }
}

#[test]
fn test_background_dispose_clears_only_the_rect() {
  let png = animation(
    6,
    6,
    1,
    &[
      (fctl(0, [0, 0, 6, 6], DisposeOp::None, BlendOp::Source), solid(6, 6, GREEN)),
      (fctl(0, [4, 1, 2, 3], DisposeOp::Background, BlendOp::Source), solid(2, 3, BLUE)),
      (fctl(0, [0, 0, 1, 1], DisposeOp::None, BlendOp::Over), solid(1, 1, r8g8b8a8_Srgb::TRANSPARENT_BLACK)),
    ],
    raw_rgba,
  );
  let image = ApngImage::from_png_bytes(&png).unwrap();
  let frames: Vec<ComposedFrame> =
    Player::new(&image, raw_rgba_rasterizer).collect::<ApngResult<_>>().unwrap();
  let rect = Rect::new(4, 1, 2, 3);
  assert_eq!(*frames[1].bitmap, expect_rect(&solid(6, 6, GREEN), rect, |_, _| BLUE));
  let cleared = expect_rect(&solid(6, 6, GREEN), rect, |_, _| r8g8b8a8_Srgb::TRANSPARENT_BLACK);
  assert_eq!(*frames[2].bitmap, cleared);
}

#[test]
fn test_first_frame_always_replaces() {
  // frame 0 says Over, but there's nothing under it to blend with, and a
  // frame smaller than the canvas leaves the rest transparent.
  let mut pixels = solid(2, 2, BLUE);
  pixels.pixels[3] = r8g8b8a8_Srgb::TRANSPARENT_BLACK;
  let png = animation(
    4,
    3,
    1,
    &[(fctl(0, [1, 1, 2, 2], DisposeOp::Previous, BlendOp::Over), pixels.clone())],
    raw_rgba,
  );
  let image = ApngImage::from_png_bytes(&png).unwrap();
  let mut compositor = Compositor::new(&image, raw_rgba_rasterizer);
  let f0 = compositor.compose(0).unwrap().unwrap();
  let expected =
    expect_rect(&Bitmap::new(4, 3), Rect::new(1, 1, 2, 2), |x, y| *pixels.get(x, y).unwrap());
  assert_eq!(*f0.bitmap, expected);
  // disposing to "previous" on the first frame leaves a blank canvas
  assert_eq!(compositor.canvas, Some(Bitmap::new(4, 3)));
}

#[test]
fn test_default_image_not_in_the_animation() {
  let png = PngBuilder::new()
    .ihdr(2, 2)
    .actl(1, 1)
    .idat(&raw_rgba(&solid(2, 2, RED)))
    .fctl(fctl(0, [0, 0, 2, 2], DisposeOp::None, BlendOp::Over))
    .fdat(1, &raw_rgba(&solid(2, 2, GREEN)))
    .iend()
    .build();
  let image = ApngImage::from_png_bytes(&png).unwrap();
  let frames: Vec<ComposedFrame> =
    Player::new(&image, raw_rgba_rasterizer).collect::<ApngResult<_>>().unwrap();
  assert_eq!(frames.len(), 1);
  assert_eq!(*frames[0].bitmap, solid(2, 2, GREEN));
  let mut compositor = Compositor::new(&image, raw_rgba_rasterizer);
  assert_eq!(*compositor.render_still().unwrap(), solid(2, 2, RED));
}

#[test]
fn test_still_image_plays_once() {
  let png = PngBuilder::new().ihdr(3, 3).idat(&raw_rgba(&solid(3, 3, BLUE))).iend().build();
  let image = ApngImage::from_png_bytes(&png).unwrap();
  let mut player = Player::new(&image, raw_rgba_rasterizer);
  let still = player.next().unwrap().unwrap();
  assert_eq!(*still.bitmap, solid(3, 3, BLUE));
  assert_eq!(still.delay, Duration::ZERO);
  assert!(player.next().is_none());
  player.reset();
  let again = player.next().unwrap().unwrap();
  assert!(Arc::ptr_eq(&still.bitmap, &again.bitmap));
}

#[test]
fn test_no_frames_plays_nothing() {
  let png = PngBuilder::new().ihdr(3, 3).actl(0, 0).iend().build();
  let image = ApngImage::from_png_bytes(&png).unwrap();
  assert_eq!(Player::new(&image, raw_rgba_rasterizer).count(), 0);
}

#[test]
fn test_rasterize_errors_stop_playback() {
  let png = scenario(raw_rgba);
  let image = ApngImage::from_png_bytes(&png).unwrap();
  let failing = |_: &[u8]| -> Result<Bitmap, &'static str> { Err("no decoder") };
  let mut player = Player::new(&image, failing);
  let err = player.next().unwrap().unwrap_err();
  assert_eq!(err, ApngError::Rasterize { frame: 0, message: "no decoder".into() });
  assert_eq!(err.kind(), crate::ApngErrorKind::Rasterize);
  assert!(player.next().is_none());

  // a frame with the wrong amount of data fails at its own index
  let png = PngBuilder::new()
    .ihdr(2, 2)
    .actl(2, 0)
    .fctl(fctl(0, [0, 0, 2, 2], DisposeOp::None, BlendOp::Source))
    .idat(&raw_rgba(&solid(2, 2, RED)))
    .fctl(fctl(1, [0, 0, 2, 2], DisposeOp::None, BlendOp::Source))
    .fdat(2, &[1, 2, 3])
    .iend()
    .build();
  let image = ApngImage::from_png_bytes(&png).unwrap();
  let results: Vec<ApngResult<ComposedFrame>> = Player::new(&image, raw_rgba_rasterizer).collect();
  assert_eq!(results.len(), 2);
  assert!(results[0].is_ok());
  assert!(matches!(&results[1], Err(ApngError::Rasterize { frame: 1, .. })));
}

/// 8-bit RGB image data, every line with filter type 0.
#[cfg(feature = "miniz_oxide")]
fn zlib_rgb(width: usize, pixels: &[[u8; 3]]) -> Vec<u8> {
  let mut filtered = Vec::new();
  for line in pixels.chunks(width) {
    filtered.push(0);
    filtered.extend(line.iter().flatten());
  }
  miniz_oxide::deflate::compress_to_vec_zlib(&filtered, 6)
}

#[cfg(feature = "miniz_oxide")]
#[test]
fn test_over_skips_color_keyed_pixels() {
  use crate::{png::IHDR, test_fixtures::rgba_ihdr, ImagineRasterizer};
  const R: [u8; 3] = [255, 0, 0];
  const W: [u8; 3] = [255, 255, 255];
  const B: [u8; 3] = [0, 0, 255];
  // white is the transparent color key
  let png = PngBuilder::new()
    .chunk(IHDR { color_type: 2, ..rgba_ihdr(4, 4) }.to_chunk())
    .raw(b"tRNS", &[0, 255, 0, 255, 0, 255])
    .actl(2, 1)
    .fctl(fctl(0, [0, 0, 4, 4], DisposeOp::None, BlendOp::Source))
    .idat(&zlib_rgb(4, &[R; 16]))
    .fctl(fctl(1, [1, 1, 2, 2], DisposeOp::None, BlendOp::Over))
    .fdat(2, &zlib_rgb(2, &[W, W, W, B]))
    .iend()
    .build();
  let image = ApngImage::from_png_bytes(&png).unwrap();
  let frames: Vec<ComposedFrame> =
    Player::new(&image, ImagineRasterizer::default()).collect::<ApngResult<_>>().unwrap();
  assert_eq!(frames.len(), 2);
  let red = rgba(255, 0, 0, 255);
  assert_eq!(*frames[0].bitmap, solid(4, 4, red));
  let mut expected = solid(4, 4, red);
  *expected.get_mut(2, 2).unwrap() = rgba(0, 0, 255, 255);
  assert_eq!(*frames[1].bitmap, expected);
}

#[test]
fn test_canvas_over_the_limit_is_an_error() {
  let huge = 0x7FFF_FFFF;
  let png = PngBuilder::new()
    .ihdr(huge, huge)
    .actl(1, 0)
    .fctl(fctl(0, [0, 0, 1, 1], DisposeOp::None, BlendOp::Source))
    .idat(&raw_rgba(&solid(1, 1, RED)))
    .iend()
    .build();
  let image = ApngImage::from_png_bytes(&png).unwrap();
  let mut compositor = Compositor::new(&image, raw_rgba_rasterizer);
  let err = compositor.compose(0).unwrap().unwrap_err();
  let limit = RasterLimits::DEFAULT_MAX_DIMENSION;
  assert_eq!(err, ApngError::CanvasTooLarge { width: huge, height: huge, limit });
  assert_eq!(err.kind(), crate::ApngErrorKind::ResourceLimit);
  assert_eq!(compositor.composed_count(), 0);

  let mut player = Player::new(&image, raw_rgba_rasterizer);
  assert!(player.next().unwrap().is_err());
  assert!(player.next().is_none());

  // the limit is inclusive
  let png = scenario(raw_rgba);
  let image = ApngImage::from_png_bytes(&png).unwrap();
  let tight = RasterLimits { max_dimension: 99 };
  let mut compositor = Compositor::with_limits(&image, raw_rgba_rasterizer, tight);
  let err = compositor.compose(0).unwrap().unwrap_err();
  assert_eq!(err, ApngError::CanvasTooLarge { width: 100, height: 100, limit: 99 });
  let exact = RasterLimits { max_dimension: 100 };
  let mut compositor = Compositor::with_limits(&image, raw_rgba_rasterizer, exact);
  assert!(compositor.compose(1).unwrap().is_ok());
}

#[test]
fn test_offsets_past_i32_max_draw_nothing() {
  let far = 3_000_000_000_u32;
  let png = animation(
    3,
    3,
    1,
    &[
      (fctl(0, [0, 0, 3, 3], DisposeOp::None, BlendOp::Source), solid(3, 3, RED)),
      (fctl(0, [far, 1, 1, 1], DisposeOp::Background, BlendOp::Source), solid(1, 1, BLUE)),
      (fctl(0, [0, far, 2, 2], DisposeOp::None, BlendOp::Over), solid(2, 2, BLUE)),
    ],
    raw_rgba,
  );
  let image = ApngImage::from_png_bytes(&png).unwrap();
  assert_eq!(image.frames()[1].rect(), Rect::new(i32::MAX, 1, 1, 1));
  assert_eq!(image.frames()[2].rect(), Rect::new(0, i32::MAX, 2, 2));
  let frames: Vec<ComposedFrame> =
    Player::new(&image, raw_rgba_rasterizer).collect::<ApngResult<_>>().unwrap();
  assert_eq!(frames.len(), 3);
  for frame in &frames {
    assert_eq!(*frame.bitmap, solid(3, 3, RED), "frame {}", frame.index);
  }
}
