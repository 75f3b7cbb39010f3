//! Image transformation primitives: color canonicalization, bounded
//! downscaling, and multi-format encoding.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Canonicalize** | alpha flatten onto a white matte → `RgbImage` |
//! | **Downscale** | `image::imageops::resize` with `Lanczos3` |
//! | **Encode → WebP** | `webp` (libwebp, lossy, method 6) |
//! | **Encode → AVIF** | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |
//! | **Encode → JPEG** | `image::codecs::jpeg::JpegEncoder` |
//!
//! The module is split into:
//! - **Normalize**: every source becomes an opaque three-channel image
//! - **Resize**: pure bounding-box math plus the actual scaling
//! - **Encode**: per-format writers and the compiled-codec probe

pub mod encode;
pub mod normalize;
pub mod resize;

pub use encode::{Codecs, EncodeError, encode_to};
pub use normalize::normalize;
pub use resize::{fit_within, scale_to_fit};
