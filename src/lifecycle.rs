//! Lifecycle orchestration for one original asset.
//!
//! [`Thumbnailer`] drives the whole pipeline: it derives the expected
//! artifact set, decodes and canonicalizes the original once, then
//! resizes once per configured size and encodes once per requested
//! format — and it tears the same set down again when the original is
//! replaced or removed.
//!
//! ## Boolean surface, typed core
//!
//! The embedding application only ever branches on success or failure,
//! so the public operations return `bool` and push the detail into log
//! records. Internally each operation works over a finite, typed error
//! classification (decoders unavailable / not found / unsupported /
//! decode failure) so the log level and the folded result come from
//! known cases rather than a catch-all.
//!
//! ## Failure semantics
//!
//! A failed AVIF encode is a warning: the optional format must never
//! cost the mandatory ones. A failed WebP or JPEG encode is an error
//! for that one file; the remaining sizes and formats still run.
//! Deletion treats absent derived files as the expected steady state
//! and only folds real filesystem errors into the result.
//!
//! ## Ordering
//!
//! Calls for distinct originals touch disjoint file sets and may run
//! concurrently; calls for the *same* original must be serialized by
//! the caller (typically under its per-record write lock) — two
//! interleaved generates may mix writes, and a generate racing a delete
//! can resurrect files the delete was meant to remove.

use std::io;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader, RgbImage};
use thiserror::Error;

use crate::config::{MediaConfig, OutputFormat, Quality};
use crate::imaging::{Codecs, encode_to, normalize, scale_to_fit};
use crate::paths::{self, AssetPath};

/// Why a generate call produced no artifacts. Internal classification;
/// the public surface folds these into `false` plus a log record.
#[derive(Error, Debug)]
enum GenerateError {
    #[error("image decoders unavailable in this build")]
    DecodersUnavailable,
    #[error("original image not found: {0}")]
    NotFound(PathBuf),
    #[error("not a processable raster format: {0}")]
    Unsupported(PathBuf),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Generates and deletes the derived-artifact set for original assets.
///
/// Holds only immutable configuration and the startup codec probe, so
/// one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct Thumbnailer {
    config: MediaConfig,
    codecs: Codecs,
}

impl Thumbnailer {
    /// Build a thumbnailer over the given configuration, probing the
    /// compiled codec set once.
    pub fn new(config: MediaConfig) -> Self {
        Self {
            codecs: Codecs::probe(),
            config,
        }
    }

    /// Build with an explicit codec probe result. Tests use this to
    /// simulate builds with encoders or decoders stripped out.
    pub fn with_codecs(config: MediaConfig, codecs: Codecs) -> Self {
        Self { config, codecs }
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    /// Generate the full derived set for an original: the carousel
    /// variant plus every configured size in every requested format.
    ///
    /// `original` may be absolute or relative to `base_dir`. JPEG
    /// fallbacks are produced only when `keep_legacy` is set. Existing
    /// derived files are overwritten in place. Returns `true` when the
    /// original was decoded and the pipeline ran; individual encode
    /// failures are logged, not propagated.
    pub fn generate(&self, original: &Path, base_dir: &Path, keep_legacy: bool) -> bool {
        match self.try_generate(original, base_dir, keep_legacy) {
            Ok(()) => true,
            Err(err @ (GenerateError::DecodersUnavailable | GenerateError::Unsupported(_))) => {
                log::warn!("skipping thumbnail generation: {err}");
                false
            }
            Err(err) => {
                log::error!("thumbnail generation failed: {err}");
                false
            }
        }
    }

    fn try_generate(
        &self,
        original: &Path,
        base_dir: &Path,
        keep_legacy: bool,
    ) -> Result<(), GenerateError> {
        if !self.codecs.decoders {
            return Err(GenerateError::DecodersUnavailable);
        }

        let original = resolve(original, base_dir);
        if !original.exists() {
            return Err(GenerateError::NotFound(original));
        }
        if !paths::is_processable(&original) {
            return Err(GenerateError::Unsupported(original));
        }

        let canonical = normalize(decode(&original)?);
        let asset = AssetPath::of(&original);

        // Carousel first: primary format only, its own quality preset.
        let carousel = scale_to_fit(&canonical, &self.config.carousel);
        self.encode_one(
            &paths::carousel_path(&self.config, &original),
            &carousel,
            self.config.carousel_format,
            self.config.carousel_quality,
        );

        let formats: Vec<OutputFormat> = self
            .config
            .formats
            .iter()
            .copied()
            .filter(|format| keep_legacy || *format != OutputFormat::Jpeg)
            .collect();

        for spec in &self.config.sizes {
            let resized = scale_to_fit(&canonical, spec);
            for &format in &formats {
                self.encode_one(
                    &asset.derived(&spec.label, format.extension()),
                    &resized,
                    format,
                    format.thumbnail_quality(),
                );
            }
        }

        log::info!("generated thumbnails for {}", original.display());
        Ok(())
    }

    /// Encode one artifact, folding failures into log records: the
    /// optional format degrades with a warning, mandatory formats log
    /// an error for this file only.
    fn encode_one(&self, target: &Path, image: &RgbImage, format: OutputFormat, quality: Quality) {
        match encode_to(target, image, format, quality, &self.codecs) {
            Ok(()) => log::debug!("wrote {}", target.display()),
            Err(err) if format.is_optional() => {
                log::warn!("skipping {}: {err}", target.display());
            }
            Err(err) => log::error!("failed to write {}: {err}", target.display()),
        }
    }

    /// Remove every derived artifact for an original — all formats,
    /// all sizes, plus the carousel variant.
    ///
    /// Absent derived files are skipped; that is the expected state for
    /// assets that never had thumbnails generated. Returns `false` only
    /// when the original itself cannot be located or a removal hits a
    /// real filesystem error.
    pub fn delete_derivatives(&self, original: &Path, base_dir: &Path) -> bool {
        let original = resolve(original, base_dir);
        if !original.exists() {
            log::warn!("original not found for cleanup: {}", original.display());
            return false;
        }

        let mut targets = vec![paths::carousel_path(&self.config, &original)];
        for format_paths in paths::expected_paths(&self.config, &original, None).into_values() {
            targets.extend(format_paths);
        }

        let mut ok = true;
        let mut removed = 0usize;
        for target in &targets {
            match std::fs::remove_file(target) {
                Ok(()) => {
                    removed += 1;
                    log::debug!("removed {}", target.display());
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    log::error!("failed to remove {}: {err}", target.display());
                    ok = false;
                }
            }
        }

        log::info!(
            "removed {removed} derived files for {}",
            original.display()
        );
        ok
    }

    /// Remove an original and its full derived set.
    ///
    /// Derivative cleanup runs first; its failure is recorded but does
    /// not stop the original's removal. Returns `true` only when both
    /// steps succeeded.
    pub fn delete_original_and_derivatives(&self, original: &Path, base_dir: &Path) -> bool {
        let resolved = resolve(original, base_dir);
        let mut ok = self.delete_derivatives(original, base_dir);

        match std::fs::remove_file(&resolved) {
            Ok(()) => log::info!("removed original {}", resolved.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                log::error!("failed to remove original {}: {err}", resolved.display());
                ok = false;
            }
        }
        ok
    }
}

fn resolve(original: &Path, base_dir: &Path) -> PathBuf {
    if original.is_absolute() {
        original.to_path_buf()
    } else {
        base_dir.join(original)
    }
}

fn decode(path: &Path) -> Result<DynamicImage, GenerateError> {
    ImageReader::open(path)
        .map_err(image::ImageError::IoError)
        .and_then(|reader| reader.decode())
        .map_err(|source| GenerateError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SizeSpec;
    use image::{ImageEncoder, Rgb, RgbImage};
    use std::path::Path;
    use tempfile::TempDir;

    /// Reduced size/format tables so unit tests stay fast; the real
    /// tables are exercised end to end in `tests/lifecycle.rs`.
    fn test_config() -> MediaConfig {
        MediaConfig {
            sizes: vec![
                SizeSpec::new(8, Some(8), "thumb-sm"),
                SizeSpec::new(16, None, "thumb-md"),
            ],
            formats: vec![OutputFormat::WebP, OutputFormat::Jpeg],
            carousel: SizeSpec::new(24, None, "carousel"),
            carousel_format: OutputFormat::WebP,
            carousel_quality: Quality::new(85),
        }
    }

    fn write_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let file = std::fs::File::create(path).unwrap();
        let writer = std::io::BufWriter::new(file);
        image::codecs::jpeg::JpegEncoder::new(writer)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn generate_writes_carousel_and_every_size_format_pair() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("abc123.jpg");
        write_test_jpeg(&original, 64, 48);

        let thumbnailer = Thumbnailer::new(test_config());
        assert!(thumbnailer.generate(&original, tmp.path(), true));

        assert_eq!(
            file_names(tmp.path()),
            [
                "abc123-carousel.webp",
                "abc123-thumb-md.jpg",
                "abc123-thumb-md.webp",
                "abc123-thumb-sm.jpg",
                "abc123-thumb-sm.webp",
                "abc123.jpg",
            ]
        );
    }

    #[test]
    fn generate_resolves_relative_paths_against_base_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("uploads/photos")).unwrap();
        write_test_jpeg(&tmp.path().join("uploads/photos/abc.jpg"), 32, 32);

        let thumbnailer = Thumbnailer::new(test_config());
        assert!(thumbnailer.generate(Path::new("uploads/photos/abc.jpg"), tmp.path(), true));
        assert!(tmp.path().join("uploads/photos/abc-thumb-sm.webp").exists());
    }

    #[test]
    fn generate_without_legacy_flag_skips_jpeg() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("abc.jpg");
        write_test_jpeg(&original, 32, 32);

        let thumbnailer = Thumbnailer::new(test_config());
        assert!(thumbnailer.generate(&original, tmp.path(), false));

        let names = file_names(tmp.path());
        assert!(names.iter().all(|n| !n.ends_with("-thumb-sm.jpg")));
        assert!(names.contains(&"abc-thumb-sm.webp".to_string()));
    }

    #[test]
    fn generate_missing_original_fails() {
        let tmp = TempDir::new().unwrap();
        let thumbnailer = Thumbnailer::new(test_config());
        assert!(!thumbnailer.generate(Path::new("absent.jpg"), tmp.path(), true));
    }

    #[test]
    fn generate_vector_source_fails_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("emblem.svg");
        std::fs::write(&original, "<svg xmlns='http://www.w3.org/2000/svg'/>").unwrap();

        let thumbnailer = Thumbnailer::new(test_config());
        assert!(!thumbnailer.generate(&original, tmp.path(), true));
        assert_eq!(file_names(tmp.path()), ["emblem.svg"]);
    }

    #[test]
    fn generate_undecodable_source_fails() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("broken.jpg");
        std::fs::write(&original, b"not actually a jpeg").unwrap();

        let thumbnailer = Thumbnailer::new(test_config());
        assert!(!thumbnailer.generate(&original, tmp.path(), true));
    }

    #[test]
    fn generate_without_decoders_is_a_noop_failure() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("abc.jpg");
        write_test_jpeg(&original, 32, 32);

        let thumbnailer = Thumbnailer::with_codecs(
            test_config(),
            Codecs {
                decoders: false,
                avif: false,
            },
        );
        assert!(!thumbnailer.generate(&original, tmp.path(), true));
        assert_eq!(file_names(tmp.path()), ["abc.jpg"]);
    }

    #[test]
    fn regenerate_overwrites_in_place() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("abc.jpg");
        write_test_jpeg(&original, 64, 48);

        let thumbnailer = Thumbnailer::new(test_config());
        assert!(thumbnailer.generate(&original, tmp.path(), true));
        let first = file_names(tmp.path());
        assert!(thumbnailer.generate(&original, tmp.path(), true));
        assert_eq!(file_names(tmp.path()), first);
    }

    #[test]
    fn delete_derivatives_without_original_fails() {
        let tmp = TempDir::new().unwrap();
        let thumbnailer = Thumbnailer::new(test_config());
        assert!(!thumbnailer.delete_derivatives(Path::new("absent.jpg"), tmp.path()));
    }

    #[test]
    fn delete_derivatives_with_none_generated_is_a_noop_success() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("abc.jpg");
        write_test_jpeg(&original, 32, 32);

        let thumbnailer = Thumbnailer::new(test_config());
        assert!(thumbnailer.delete_derivatives(&original, tmp.path()));
        assert_eq!(file_names(tmp.path()), ["abc.jpg"]);
    }

    #[test]
    fn delete_derivatives_keeps_the_original() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("abc.jpg");
        write_test_jpeg(&original, 64, 48);

        let thumbnailer = Thumbnailer::new(test_config());
        assert!(thumbnailer.generate(&original, tmp.path(), true));
        assert!(thumbnailer.delete_derivatives(&original, tmp.path()));
        assert_eq!(file_names(tmp.path()), ["abc.jpg"]);
    }

    #[test]
    fn delete_original_and_derivatives_removes_everything() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("abc.jpg");
        write_test_jpeg(&original, 64, 48);

        let thumbnailer = Thumbnailer::new(test_config());
        assert!(thumbnailer.generate(&original, tmp.path(), true));
        assert!(thumbnailer.delete_original_and_derivatives(&original, tmp.path()));
        assert!(file_names(tmp.path()).is_empty());
    }

    #[test]
    fn delete_everything_fails_when_original_already_gone() {
        let tmp = TempDir::new().unwrap();
        let thumbnailer = Thumbnailer::new(test_config());
        // Derivative cleanup cannot locate the original, so the overall
        // result is a failure even though nothing was left to remove.
        assert!(!thumbnailer.delete_original_and_derivatives(Path::new("gone.jpg"), tmp.path()));
    }
}
