// SPDX-License-Identifier: GPL-3.0-only

use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};
use tiny_skia::{ColorU8, Pixmap};

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Failed to open background image {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read background image")]
    Decode(#[from] png::DecodingError),
    #[error("Background image has no pixels")]
    Empty,
    #[error("Background image is too large ({width}x{height})")]
    TooLarge { width: u32, height: u32 },
    #[error("Unsupported color type {0:?}")]
    Unsupported(png::ColorType),
}

/// Decodes the PNG at `path` into a premultiplied pixmap.
pub fn load_image(path: &Path) -> Result<Pixmap, ImageError> {
    let file = File::open(path).map_err(|source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_png(BufReader::new(file))
}

pub fn decode_png<R: Read>(reader: R) -> Result<Pixmap, ImageError> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let data = &buf[..info.buffer_size()];

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => return Err(ImageError::Unsupported(other)),
    };

    let mut pixmap = allocate(info.width, info.height)?;
    for (src, dst) in data.chunks_exact(channels).zip(pixmap.pixels_mut()) {
        let (r, g, b, a) = match channels {
            1 => (src[0], src[0], src[0], 0xff),
            2 => (src[0], src[0], src[0], src[1]),
            3 => (src[0], src[1], src[2], 0xff),
            _ => (src[0], src[1], src[2], src[3]),
        };
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    Ok(pixmap)
}

fn allocate(width: u32, height: u32) -> Result<Pixmap, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::Empty);
    }
    Pixmap::new(width, height).ok_or(ImageError::TooLarge { width, height })
}
