//! Prints the chunk list and frame table of each file given on the command
//! line, then composes every frame.
//!
//! Set `RUST_LOG=debug` (or `trace`) to see what the parser decides.

use animagine::{
  png::{PngChunk, RawPngChunkIter},
  ApngImage, ImagineRasterizer, Player,
};

fn main() {
  env_logger::init();
  let args: Vec<String> = std::env::args().collect();
  println!("ARGS: {args:?}");
  for file_arg in args[1..].iter() {
    let path = std::path::Path::new(file_arg);
    print!("Reading `{}`... ", path.display());
    let bytes = match std::fs::read(path) {
      Ok(bytes) => {
        println!("got {} bytes.", bytes.len());
        bytes
      }
      Err(e) => {
        println!("{e:?}");
        continue;
      }
    };
    match RawPngChunkIter::new(&bytes) {
      Ok(it) => {
        for (n, raw_chunk) in it.enumerate() {
          let chunk_res = raw_chunk.and_then(PngChunk::try_from);
          println!("{n}: {chunk_res:?}");
        }
      }
      Err(e) => {
        println!("{e}");
        continue;
      }
    }

    let image = match ApngImage::from_png_bytes(&bytes) {
      Ok(image) => image,
      Err(e) => {
        println!("can't play this file ({:?}): {e}", e.kind());
        continue;
      }
    };
    println!(
      "{}x{}, still image: {}, plays: {}, default image is frame 0: {}",
      image.width(),
      image.height(),
      image.is_simple_png(),
      image.num_plays(),
      image.default_image_is_animated()
    );
    for (i, frame) in image.frames().iter().enumerate() {
      println!(
        "frame {i}: {:?}, delay {:?}, {} IDAT chunks",
        frame.rect(),
        frame.delay(),
        frame.idat_chunks().len()
      );
    }

    // one pass is enough, even for images that loop forever.
    let frame_limit = image.frames().len().max(1);
    for composed in Player::new(&image, ImagineRasterizer::default()).take(frame_limit) {
      match composed {
        Ok(composed) => {
          let opaque = composed.bitmap.pixels.iter().filter(|p| p.a == 255).count();
          println!(
            "composed frame {}: {opaque} opaque pixels, shown for {:?}",
            composed.index, composed.delay
          );
        }
        Err(e) => {
          println!("{e}");
          break;
        }
      }
    }
  }
}
