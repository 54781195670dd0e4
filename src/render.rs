// SPDX-License-Identifier: GPL-3.0-only

use crate::scaling::Transform;
use tiny_skia::{Color, FilterQuality, Paint, Pattern, Pixmap, Rect, SpreadMode};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid surface size {0}x{1}")]
    InvalidSize(u32, u32),
}

/// Composites `image` onto a fresh `width`x`height` frame.
///
/// Everything the image does not cover is opaque black.
pub fn paint(
    width: u32,
    height: u32,
    image: &Pixmap,
    transform: Transform,
) -> Result<Pixmap, RenderError> {
    let mut frame = Pixmap::new(width, height).ok_or(RenderError::InvalidSize(width, height))?;
    frame.fill(Color::BLACK);

    match transform {
        Transform::Placed {
            scale_x,
            scale_y,
            offset_x,
            offset_y,
        } => {
            let (x, y) = (scale_x * offset_x, scale_y * offset_y);
            let dest = Rect::from_xywh(
                x as f32,
                y as f32,
                (scale_x * image.width() as f64) as f32,
                (scale_y * image.height() as f64) as f32,
            );
            let Some(dest) = dest else {
                return Ok(frame);
            };
            let quality = if scale_x == 1.0 && scale_y == 1.0 {
                FilterQuality::Nearest
            } else {
                FilterQuality::Bilinear
            };
            let paint = Paint {
                shader: Pattern::new(
                    image.as_ref(),
                    SpreadMode::Pad,
                    quality,
                    1.0,
                    tiny_skia::Transform::from_row(
                        scale_x as f32,
                        0.0,
                        0.0,
                        scale_y as f32,
                        x as f32,
                        y as f32,
                    ),
                ),
                ..Paint::default()
            };
            frame.fill_rect(dest, &paint, tiny_skia::Transform::identity(), None);
        }
        Transform::Tiled => {
            let paint = Paint {
                shader: Pattern::new(
                    image.as_ref(),
                    SpreadMode::Repeat,
                    FilterQuality::Nearest,
                    1.0,
                    tiny_skia::Transform::identity(),
                ),
                ..Paint::default()
            };
            if let Some(dest) = Rect::from_xywh(0.0, 0.0, width as f32, height as f32) {
                frame.fill_rect(dest, &paint, tiny_skia::Transform::identity(), None);
            }
        }
    }

    Ok(frame)
}

/// Converts a frame to little-endian `ARGB8888`, the layout `wl_shm` expects.
pub fn argb8888(frame: &Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(frame.data().len());
    for pixel in frame.pixels() {
        out.extend_from_slice(&[pixel.blue(), pixel.green(), pixel.red(), pixel.alpha()]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaling::compute;
    use cosmic_lock_config::ScalingMode;
    use tiny_skia::ColorU8;

    fn red(width: u32, height: u32) -> Pixmap {
        let mut pixmap = Pixmap::new(width, height).unwrap();
        pixmap.fill(Color::from_rgba8(255, 0, 0, 255));
        pixmap
    }

    fn is_red(frame: &Pixmap, x: u32, y: u32) -> bool {
        let pixel = frame.pixel(x, y).unwrap();
        pixel.red() > 250 && pixel.green() < 5 && pixel.blue() < 5 && pixel.alpha() == 255
    }

    fn is_black(frame: &Pixmap, x: u32, y: u32) -> bool {
        let pixel = frame.pixel(x, y).unwrap();
        pixel.red() < 5 && pixel.green() < 5 && pixel.blue() < 5 && pixel.alpha() == 255
    }

    #[test]
    fn stretch_covers_everything() {
        let image = red(2, 2);
        let frame = paint(6, 4, &image, compute(6, 4, 2, 2, ScalingMode::Stretch)).unwrap();
        for y in 0..4 {
            for x in 0..6 {
                assert!(is_red(&frame, x, y), "pixel {x},{y}");
            }
        }
    }

    #[test]
    fn fit_letterboxes() {
        let image = red(1, 1);
        let frame = paint(4, 2, &image, compute(4, 2, 1, 1, ScalingMode::Fit)).unwrap();
        for y in 0..2 {
            assert!(is_black(&frame, 0, y));
            assert!(is_red(&frame, 1, y));
            assert!(is_red(&frame, 2, y));
            assert!(is_black(&frame, 3, y));
        }
    }

    #[test]
    fn center_leaves_a_border() {
        let image = red(1, 1);
        let frame = paint(3, 3, &image, compute(3, 3, 1, 1, ScalingMode::Center)).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) == (1, 1) {
                    assert!(is_red(&frame, x, y));
                } else {
                    assert!(is_black(&frame, x, y), "pixel {x},{y}");
                }
            }
        }
    }

    #[test]
    fn tile_repeats() {
        let mut image = Pixmap::new(2, 1).unwrap();
        image.pixels_mut()[0] = ColorU8::from_rgba(255, 0, 0, 255).premultiply();
        image.pixels_mut()[1] = ColorU8::from_rgba(0, 0, 255, 255).premultiply();

        let frame = paint(5, 1, &image, Transform::Tiled).unwrap();
        let blues: Vec<u8> = frame.pixels().iter().map(|p| p.blue()).collect();
        assert_eq!(blues, vec![0, 255, 0, 255, 0]);
        assert!(is_red(&frame, 4, 0));
    }

    #[test]
    fn zero_sized_frame_is_an_error() {
        let image = red(1, 1);
        assert!(matches!(
            paint(0, 10, &image, Transform::Tiled),
            Err(RenderError::InvalidSize(0, 10))
        ));
    }

    #[test]
    fn wire_format_is_bgra_bytes() {
        let image = red(1, 1);
        let frame = paint(1, 1, &image, Transform::Tiled).unwrap();
        assert_eq!(argb8888(&frame), vec![0, 0, 255, 255]);
    }
}
