// SPDX-License-Identifier: GPL-3.0-only

use cosmic_lock_config::ScalingMode;

/// Placement of a source image onto an output.
///
/// `Placed` follows the "scale the context, then draw the source at the
/// offset" convention: offsets are in image space, so an image pixel at
/// `(u, v)` lands on the output at `(scale_x * (offset_x + u), scale_y *
/// (offset_y + v))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Placed {
        scale_x: f64,
        scale_y: f64,
        offset_x: f64,
        offset_y: f64,
    },
    Tiled,
}

impl Transform {
    fn uniform(scale: f64, offset_x: f64, offset_y: f64) -> Transform {
        Transform::Placed {
            scale_x: scale,
            scale_y: scale,
            offset_x,
            offset_y,
        }
    }
}

/// Computes where the image goes on an output of the given size.
///
/// Image dimensions must be positive; the image loader never hands out an
/// empty image.
pub fn compute(
    output_w: u32,
    output_h: u32,
    image_w: u32,
    image_h: u32,
    mode: ScalingMode,
) -> Transform {
    debug_assert!(image_w > 0 && image_h > 0);

    let (output_w, output_h) = (output_w as f64, output_h as f64);
    let (image_w, image_h) = (image_w as f64, image_h as f64);
    let output_ratio = output_w / output_h;
    let image_ratio = image_w / image_h;

    match mode {
        ScalingMode::Stretch => Transform::Placed {
            scale_x: output_w / image_w,
            scale_y: output_h / image_h,
            offset_x: 0.0,
            offset_y: 0.0,
        },
        ScalingMode::Fill => {
            if output_ratio > image_ratio {
                let scale = output_w / image_w;
                Transform::uniform(scale, 0.0, output_h / 2.0 / scale - image_h / 2.0)
            } else {
                let scale = output_h / image_h;
                Transform::uniform(scale, output_w / 2.0 / scale - image_w / 2.0, 0.0)
            }
        }
        ScalingMode::Fit => {
            if output_ratio > image_ratio {
                let scale = output_h / image_h;
                Transform::uniform(scale, output_w / 2.0 / scale - image_w / 2.0, 0.0)
            } else {
                let scale = output_w / image_w;
                Transform::uniform(scale, 0.0, output_h / 2.0 / scale - image_h / 2.0)
            }
        }
        ScalingMode::Center => Transform::uniform(
            1.0,
            output_w / 2.0 - image_w / 2.0,
            output_h / 2.0 - image_h / 2.0,
        ),
        ScalingMode::Tile => Transform::Tiled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-6;

    fn placed(transform: Transform) -> (f64, f64, f64, f64) {
        match transform {
            Transform::Placed {
                scale_x,
                scale_y,
                offset_x,
                offset_y,
            } => (scale_x, scale_y, offset_x, offset_y),
            Transform::Tiled => panic!("expected a placed transform"),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
    }

    // Device-space center of the placed image along one axis.
    fn center(scale: f64, offset: f64, image: f64) -> f64 {
        scale * (offset + image / 2.0)
    }

    #[test]
    fn stretch_identity() {
        assert_eq!(
            compute(1920, 1080, 1920, 1080, ScalingMode::Stretch),
            Transform::Placed {
                scale_x: 1.0,
                scale_y: 1.0,
                offset_x: 0.0,
                offset_y: 0.0,
            }
        );
    }

    #[test]
    fn fill_wide_image() {
        assert_eq!(
            compute(1000, 500, 2000, 500, ScalingMode::Fill),
            Transform::uniform(1.0, -500.0, 0.0)
        );
    }

    #[test]
    fn fit_wide_image() {
        assert_eq!(
            compute(1000, 500, 2000, 500, ScalingMode::Fit),
            Transform::uniform(0.5, 0.0, 250.0)
        );
    }

    #[test]
    fn fill_tall_image() {
        // output_ratio 2.0 > image_ratio 0.5
        let (scale, _, offset_x, offset_y) =
            placed(compute(1000, 500, 500, 1000, ScalingMode::Fill));
        assert_eq!(scale, 2.0);
        assert_eq!(offset_x, 0.0);
        assert_eq!(offset_y, -375.0);
    }

    #[test]
    fn center_larger_image_is_clipped() {
        assert_eq!(
            compute(800, 600, 1000, 1000, ScalingMode::Center),
            Transform::uniform(1.0, -100.0, -200.0)
        );
    }

    #[test]
    fn tile_has_no_placement() {
        assert_eq!(compute(800, 600, 10, 10, ScalingMode::Tile), Transform::Tiled);
    }

    fn dims() -> impl Strategy<Value = (u32, u32, u32, u32)> {
        (1u32..8192, 1u32..8192, 1u32..8192, 1u32..8192)
    }

    proptest! {
        #[test]
        fn stretch_covers_exactly((ow, oh, iw, ih) in dims()) {
            let (sx, sy, ox, oy) = placed(compute(ow, oh, iw, ih, ScalingMode::Stretch));
            prop_assert!(close(sx * iw as f64, ow as f64));
            prop_assert!(close(sy * ih as f64, oh as f64));
            prop_assert_eq!((ox, oy), (0.0, 0.0));
        }

        #[test]
        fn fill_covers_and_centers((ow, oh, iw, ih) in dims()) {
            let (sx, sy, ox, oy) = placed(compute(ow, oh, iw, ih, ScalingMode::Fill));
            let (ow, oh, iw, ih) = (ow as f64, oh as f64, iw as f64, ih as f64);
            prop_assert_eq!(sx, sy);
            let (w, h) = (sx * iw, sy * ih);
            prop_assert!(w >= ow * (1.0 - EPSILON) && h >= oh * (1.0 - EPSILON));
            prop_assert!(close(w, ow) || close(h, oh));
            prop_assert!(close(center(sx, ox, iw), ow / 2.0));
            prop_assert!(close(center(sy, oy, ih), oh / 2.0));
            prop_assert!(ox <= EPSILON * iw && oy <= EPSILON * ih);
        }

        #[test]
        fn fit_is_visible_and_centers((ow, oh, iw, ih) in dims()) {
            let (sx, sy, ox, oy) = placed(compute(ow, oh, iw, ih, ScalingMode::Fit));
            let (ow, oh, iw, ih) = (ow as f64, oh as f64, iw as f64, ih as f64);
            prop_assert_eq!(sx, sy);
            let (w, h) = (sx * iw, sy * ih);
            prop_assert!(w <= ow * (1.0 + EPSILON) && h <= oh * (1.0 + EPSILON));
            if ow / oh > iw / ih {
                prop_assert!(close(h, oh));
                prop_assert!(close(center(sx, ox, iw), ow / 2.0));
                prop_assert_eq!(oy, 0.0);
            } else {
                prop_assert!(close(w, ow));
                prop_assert!(close(center(sy, oy, ih), oh / 2.0));
                prop_assert_eq!(ox, 0.0);
            }
        }

        #[test]
        fn center_is_unscaled((ow, oh, iw, ih) in dims()) {
            let (sx, sy, ox, oy) = placed(compute(ow, oh, iw, ih, ScalingMode::Center));
            prop_assert_eq!((sx, sy), (1.0, 1.0));
            prop_assert!(close(ox + iw as f64 / 2.0, ow as f64 / 2.0));
            prop_assert!(close(oy + ih as f64 / 2.0, oh as f64 / 2.0));
        }

        #[test]
        fn tile_always_tiles((ow, oh, iw, ih) in dims()) {
            prop_assert_eq!(compute(ow, oh, iw, ih, ScalingMode::Tile), Transform::Tiled);
        }
    }
}
