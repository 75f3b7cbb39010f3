//! Multi-format encoding with per-format quality presets.
//!
//! | Format | Encoder | Preset |
//! |---|---|---|
//! | WebP | `webp` crate (libwebp) | lossy, compression method 6 |
//! | AVIF | `image::codecs::avif::AvifEncoder` (rav1e) | speed 6 |
//! | JPEG | `image::codecs::jpeg::JpegEncoder` | baseline |
//!
//! Encoder availability is probed once per process ([`Codecs::probe`])
//! and injected downward rather than re-checked on every call. The AVIF
//! encode stays wrapped in its own error path at the call site because
//! an encode can still fail even when the encoder is compiled in — that
//! failure is about format support, not library presence.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use thiserror::Error;

use crate::config::{OutputFormat, Quality};

/// AVIF encoder speed (0 = slowest/best, 10 = fastest).
const AVIF_SPEED: u8 = 6;
/// WebP compression effort (0 = fastest, 6 = smallest output).
const WEBP_METHOD: i32 = 6;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{format} encode failed: {message}")]
    Codec {
        format: OutputFormat,
        message: String,
    },
    #[error("no {0} encoder compiled into this binary")]
    Unavailable(OutputFormat),
}

fn codec_err(format: OutputFormat, message: impl Into<String>) -> EncodeError {
    EncodeError::Codec {
        format,
        message: message.into(),
    }
}

/// Codec support compiled into the running binary.
///
/// Probed once at startup and passed down; tests construct the struct
/// directly to exercise a stripped-down build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codecs {
    /// Every decoder for the processable input set is present.
    pub decoders: bool,
    /// The encoder for the optional next-gen format is present.
    pub avif: bool,
}

impl Codecs {
    /// Decoders required for the processable input extensions.
    const INPUT_FORMATS: [ImageFormat; 6] = [
        ImageFormat::Jpeg,
        ImageFormat::Png,
        ImageFormat::Gif,
        ImageFormat::WebP,
        ImageFormat::Bmp,
        ImageFormat::Tiff,
    ];

    /// Inspect the compiled codec set.
    pub fn probe() -> Self {
        Self {
            decoders: Self::INPUT_FORMATS
                .iter()
                .all(|format| format.reading_enabled()),
            avif: ImageFormat::Avif.writing_enabled(),
        }
    }
}

/// Encode a canonical image to `path` in the given format.
///
/// The target's parent directory must exist; the file is overwritten in
/// place if present. No staging file is used — a crash mid-encode can
/// truncate this artifact but never touches a neighboring one.
pub fn encode_to(
    path: &Path,
    image: &RgbImage,
    format: OutputFormat,
    quality: Quality,
    codecs: &Codecs,
) -> Result<(), EncodeError> {
    match format {
        OutputFormat::WebP => write_webp(path, image, quality),
        OutputFormat::Avif => {
            if !codecs.avif {
                return Err(EncodeError::Unavailable(OutputFormat::Avif));
            }
            write_avif(path, image, quality)
        }
        OutputFormat::Jpeg => write_jpeg(path, image, quality),
    }
}

fn write_webp(path: &Path, image: &RgbImage, quality: Quality) -> Result<(), EncodeError> {
    let mut config = webp::WebPConfig::new()
        .map_err(|_| codec_err(OutputFormat::WebP, "invalid libwebp preset"))?;
    config.quality = f32::from(quality.value());
    config.method = WEBP_METHOD;

    let encoder = webp::Encoder::from_rgb(image.as_raw(), image.width(), image.height());
    let encoded = encoder
        .encode_advanced(&config)
        .map_err(|e| codec_err(OutputFormat::WebP, format!("{e:?}")))?;
    std::fs::write(path, &*encoded)?;
    Ok(())
}

fn write_avif(path: &Path, image: &RgbImage, quality: Quality) -> Result<(), EncodeError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = AvifEncoder::new_with_speed_quality(writer, AVIF_SPEED, quality.value());
    image
        .write_with_encoder(encoder)
        .map_err(|e| codec_err(OutputFormat::Avif, e.to_string()))
}

fn write_jpeg(path: &Path, image: &RgbImage, quality: Quality) -> Result<(), EncodeError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(writer, quality.value());
    image
        .write_with_encoder(encoder)
        .map_err(|e| codec_err(OutputFormat::Jpeg, e.to_string()))
}
