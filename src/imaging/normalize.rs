//! Color-mode canonicalization.
//!
//! Every decoded source is reduced to one of two 8-bit RGB forms before
//! any resize or encode step: a direct conversion for opaque sources, or
//! a composite over a white matte for sources carrying an alpha or
//! luma-alpha channel. Indexed-palette sources arrive here already
//! expanded — the `image` decoders hand paletted PNG and GIF data over
//! as RGB/RGBA buffers.
//!
//! Downstream encoders can therefore assume a fully opaque three-channel
//! buffer; no per-format transparency handling exists anywhere else, and
//! flattening always lands on white rather than an undefined background.

use image::{DynamicImage, Rgb, RgbImage, RgbaImage};

/// Matte channel value for flattened transparency.
const MATTE: u8 = 0xff;

/// Reduce an arbitrarily-encoded source to canonical opaque RGB.
pub fn normalize(source: DynamicImage) -> RgbImage {
    if source.color().has_alpha() {
        return flatten_onto_matte(&source.to_rgba8());
    }
    match source {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

/// Composite an RGBA buffer over the opaque matte, using the alpha
/// channel as the blend mask.
fn flatten_onto_matte(source: &RgbaImage) -> RgbImage {
    let (width, height) = source.dimensions();
    let mut canvas = RgbImage::new(width, height);
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let image::Rgba([r, g, b, a]) = *source.get_pixel(x, y);
        *pixel = Rgb([blend(r, a), blend(g, a), blend(b, a)]);
    }
    canvas
}

/// Integer alpha blend of one channel over the matte:
/// `(fg·a + matte·(255−a) + 127) / 255`, rounding to nearest.
#[inline]
fn blend(fg: u8, alpha: u8) -> u8 {
    let fg = u32::from(fg) * u32::from(alpha);
    let bg = u32::from(MATTE) * (255 - u32::from(alpha));
    ((fg + bg + 127) / 255) as u8
}
