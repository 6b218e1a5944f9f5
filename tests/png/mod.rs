use animagine::{png::RawPngChunkIter, ApngImage};
use walkdir::WalkDir;

/// Every file in the tests folder, read fully. Non-PNG files are fine too,
/// they just have to not panic anything.
fn all_test_files() -> Vec<Vec<u8>> {
  let mut out = Vec::new();
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    println!("{}", entry.path().display());
    match std::fs::read(entry.path()) {
      Ok(v) => out.push(v),
      Err(e) => println!("Error reading file: {e:?}"),
    }
  }
  out
}

#[test]
fn test_RawPngChunkIter_no_panics() {
  for v in all_test_files() {
    if let Ok(it) = RawPngChunkIter::new(&v) {
      for _ in it {
        //
      }
    }
  }
  // even totally random data should never panic the iterator!
  for _ in 0..10 {
    let v = super::rand_png_bytes(1024);
    let mut it = RawPngChunkIter::new(&v).unwrap();
    // once the bytes run out it stays done
    for _ in it.by_ref() {}
    assert!(it.next().is_none());
  }
}

#[test]
fn test_ApngImage_from_png_bytes_no_panics() {
  for v in all_test_files() {
    let _ = ApngImage::from_png_bytes(&v);
  }
  for _ in 0..100 {
    let v = super::rand_png_bytes(512);
    // random data never has a header first, but it must fail cleanly
    assert!(ApngImage::from_png_bytes(&v).is_err());
    let v = super::rand_bytes(64);
    let _ = ApngImage::from_png_bytes(&v);
  }
}

#[cfg(feature = "miniz_oxide")]
#[test]
fn test_ImagineRasterizer_no_panics() {
  use animagine::{ImagineRasterizer, Player, Rasterize};
  let rasterizer = ImagineRasterizer::default();
  for v in all_test_files() {
    let _ = rasterizer.rasterize(&v);
    if let Ok(image) = ApngImage::from_png_bytes(&v) {
      for frame in Player::new(&image, rasterizer).take(50) {
        if frame.is_err() {
          break;
        }
      }
    }
  }
  for _ in 0..10 {
    let _ = rasterizer.rasterize(&super::rand_png_bytes(1024));
  }
}
