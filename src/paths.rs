//! Derived-path computation and input-format gating.
//!
//! Every lifecycle operation recomputes the expected artifact set from
//! the original's path — there is no bookkeeping of which derived files
//! exist. That only works if derivation is pure and deterministic, so
//! everything in this module is total, does no I/O, and is unit-testable
//! without touching a filesystem.
//!
//! Derived files live next to their original and are named
//! `{stem}-{label}.{ext}`; the stem and parent directory are the sole
//! inputs, so equal stems in different directories never collide.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::{MediaConfig, OutputFormat};

/// Extensions the decode pipeline accepts.
///
/// Raster formats only — vector files (SVG) are deliberately absent:
/// thumbnailing them is reported as a skip, never attempted.
const PROCESSABLE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff",
];

/// Whether a file's extension belongs to the decodable raster set.
pub fn is_processable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            PROCESSABLE_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

/// Structured view of an original asset path: the parent directory and
/// filename stem that all derivation keys on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPath {
    parent: PathBuf,
    stem: String,
}

impl AssetPath {
    /// Decompose an original's path. Total: a path with no parent or no
    /// stem yields empty components rather than failing.
    pub fn of(original: &Path) -> Self {
        Self {
            parent: original.parent().map(Path::to_path_buf).unwrap_or_default(),
            stem: original
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// The derived path `{stem}-{label}.{ext}` next to the original.
    pub fn derived(&self, label: &str, ext: &str) -> PathBuf {
        self.parent.join(format!("{}-{}.{}", self.stem, label, ext))
    }
}

/// The expected thumbnail paths for an original, one per configured
/// size, keyed by format.
///
/// Paths appear in size-table order. `formats` restricts the output to
/// a subset; `None` uses the configured format list. Calling this twice
/// with the same inputs yields identical results.
pub fn expected_paths(
    config: &MediaConfig,
    original: &Path,
    formats: Option<&[OutputFormat]>,
) -> BTreeMap<OutputFormat, Vec<PathBuf>> {
    let asset = AssetPath::of(original);
    let formats = formats.unwrap_or(config.formats.as_slice());

    formats
        .iter()
        .map(|&format| {
            let paths = config
                .sizes
                .iter()
                .map(|size| asset.derived(&size.label, format.extension()))
                .collect();
            (format, paths)
        })
        .collect()
}

/// The expected carousel path for an original (primary format only).
pub fn carousel_path(config: &MediaConfig, original: &Path) -> PathBuf {
    AssetPath::of(original).derived(&config.carousel.label, config.carousel_format.extension())
}
