//! Bounding-box dimension math and downscaling.
//!
//! Thumbnail semantics throughout: scale down to fit the box, preserve
//! the aspect ratio, never enlarge. The dimension math is a pure
//! function so the edge cases (tiny sources, extreme aspect ratios,
//! square boxes) are testable without touching pixels.

use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::config::SizeSpec;

/// The largest dimensions that fit `bounds` while preserving the aspect
/// ratio of `source`, or `None` when the source already fits — callers
/// keep the original size, since thumbnails are never upscaled.
///
/// Dimensions are floored at 1px so extreme aspect ratios cannot
/// collapse an axis to zero.
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> Option<(u32, u32)> {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w == 0 || src_h == 0 {
        return None;
    }
    if src_w <= max_w && src_h <= max_h {
        return None;
    }

    let ratio_w = f64::from(max_w) / f64::from(src_w);
    let ratio_h = f64::from(max_h) / f64::from(src_h);
    let ratio = ratio_w.min(ratio_h);

    let width = (f64::from(src_w) * ratio).round() as u32;
    let height = (f64::from(src_h) * ratio).round() as u32;
    Some((width.max(1), height.max(1)))
}

/// Scale a canonical image to fit a size specification.
///
/// Returns an untouched copy when the image already fits the box.
pub fn scale_to_fit(image: &RgbImage, spec: &SizeSpec) -> RgbImage {
    match fit_within(image.dimensions(), spec.box_dims()) {
        Some((width, height)) => {
            log::debug!(
                "downscaling {}x{} to {}x{} for '{}'",
                image.width(),
                image.height(),
                width,
                height,
                spec.label
            );
            imageops::resize(image, width, height, FilterType::Lanczos3)
        }
        None => image.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // fit_within
    // =========================================================================

    #[test]
    fn landscape_source_constrained_by_width() {
        // 200x100 into 110x110: width is the tight side.
        assert_eq!(fit_within((200, 100), (110, 110)), Some((110, 55)));
    }

    #[test]
    fn portrait_source_constrained_by_height() {
        assert_eq!(fit_within((100, 200), (110, 110)), Some((55, 110)));
    }

    #[test]
    fn square_source_fills_square_box() {
        assert_eq!(fit_within((2000, 2000), (330, 330)), Some((330, 330)));
    }

    #[test]
    fn smaller_source_is_never_upscaled() {
        assert_eq!(fit_within((50, 50), (110, 110)), None);
        assert_eq!(fit_within((109, 110), (110, 110)), None);
    }

    #[test]
    fn exact_fit_is_left_alone() {
        assert_eq!(fit_within((110, 110), (110, 110)), None);
    }

    #[test]
    fn one_axis_over_bound_still_scales() {
        // Width fits, height does not.
        assert_eq!(fit_within((100, 400), (110, 110)), Some((28, 110)));
    }

    #[test]
    fn extreme_aspect_ratio_floors_at_one_pixel() {
        let (w, h) = fit_within((10000, 10), (110, 110)).unwrap();
        assert_eq!(w, 110);
        assert!(h >= 1);
    }

    #[test]
    fn zero_sized_source_is_left_alone() {
        assert_eq!(fit_within((0, 100), (110, 110)), None);
    }

    #[test]
    fn scaled_dimensions_never_exceed_bounds() {
        for source in [(1999, 1333), (4032, 3024), (331, 330), (1000, 2)] {
            let (w, h) = fit_within(source, (330, 330)).unwrap();
            assert!(w <= 330 && h <= 330, "{source:?} scaled to {w}x{h}");
        }
    }

    // =========================================================================
    // scale_to_fit
    // =========================================================================

    #[test]
    fn scale_to_fit_downscales_into_box() {
        let image = RgbImage::new(200, 100);
        let spec = SizeSpec::new(110, Some(110), "thumb-sm");
        let scaled = scale_to_fit(&image, &spec);
        assert_eq!(scaled.dimensions(), (110, 55));
    }

    #[test]
    fn scale_to_fit_keeps_small_images_at_original_size() {
        let image = RgbImage::new(50, 40);
        let spec = SizeSpec::new(110, Some(110), "thumb-sm");
        let scaled = scale_to_fit(&image, &spec);
        assert_eq!(scaled.dimensions(), (50, 40));
    }

    #[test]
    fn heightless_spec_bounds_both_axes_at_width() {
        let image = RgbImage::new(800, 3000);
        let spec = SizeSpec::new(1000, None, "carousel");
        let scaled = scale_to_fit(&image, &spec);
        assert_eq!(scaled.dimensions(), (267, 1000));
    }
}
