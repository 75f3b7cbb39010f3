//! Configuration for derived-image generation.
//!
//! The size and format tables are immutable values injected into
//! [`Thumbnailer`](crate::lifecycle::Thumbnailer) at construction — never
//! hidden module state — so tests can substitute a reduced set without
//! touching anything global. [`MediaConfig::default`] carries the
//! production tables.
//!
//! ## Types
//!
//! - [`Quality`] — lossy encoding quality (1–100). Clamped on construction.
//! - [`OutputFormat`] — one output encoding, with extension and quality preset.
//! - [`SizeSpec`] — one bounding box + filename label.
//! - [`MediaConfig`] — the full size/format configuration.

use std::fmt;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// One output encoding for derived artifacts.
///
/// WebP is the primary web format, AVIF the optional next-generation
/// format (best effort — see [`Codecs`](crate::imaging::Codecs)), and
/// JPEG the legacy fallback for clients that speak neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputFormat {
    WebP,
    Avif,
    Jpeg,
}

impl OutputFormat {
    /// File extension used for derived paths.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::WebP => "webp",
            OutputFormat::Avif => "avif",
            OutputFormat::Jpeg => "jpg",
        }
    }

    /// Per-format quality preset for thumbnail output.
    pub fn thumbnail_quality(self) -> Quality {
        match self {
            OutputFormat::WebP => Quality::new(80),
            OutputFormat::Avif => Quality::new(75),
            OutputFormat::Jpeg => Quality::new(80),
        }
    }

    /// Whether encode failures degrade to a warning instead of an error.
    ///
    /// Only AVIF: its encoder may be missing from a build, and a missing
    /// next-gen variant must never cost the other formats.
    pub fn is_optional(self) -> bool {
        matches!(self, OutputFormat::Avif)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One thumbnail variant: a bounding box plus the filename label.
///
/// Labels are unique within a configuration and must stay stable across
/// releases — renaming one orphans files generated under the old label
/// (lifecycle deletes only recompute current names).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeSpec {
    /// Maximum width in pixels.
    pub bound: u32,
    /// Maximum height in pixels; `None` means a square `bound × bound` box.
    pub height: Option<u32>,
    /// Filename label, as in `{stem}-{label}.{ext}`.
    pub label: String,
}

impl SizeSpec {
    pub fn new(bound: u32, height: Option<u32>, label: impl Into<String>) -> Self {
        Self {
            bound,
            height,
            label: label.into(),
        }
    }

    /// The bounding box as `(max width, max height)`.
    pub fn box_dims(&self) -> (u32, u32) {
        (self.bound, self.height.unwrap_or(self.bound))
    }
}

/// Immutable size/format configuration for one [`Thumbnailer`].
///
/// [`Thumbnailer`]: crate::lifecycle::Thumbnailer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaConfig {
    /// Thumbnail variants, in generation and derivation order.
    pub sizes: Vec<SizeSpec>,
    /// Output encodings per thumbnail size.
    pub formats: Vec<OutputFormat>,
    /// The carousel variant: width-bound only, reserved label.
    pub carousel: SizeSpec,
    /// The carousel is produced in this format only.
    pub carousel_format: OutputFormat,
    pub carousel_quality: Quality,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            sizes: vec![
                // Cards on the public index, plus 2x for high-DPI displays.
                SizeSpec::new(110, Some(110), "thumb-sm"),
                SizeSpec::new(220, Some(220), "thumb-md"),
                // Cards on the detail page.
                SizeSpec::new(165, Some(165), "thumb-detail"),
                SizeSpec::new(330, Some(330), "thumb-detail-2x"),
            ],
            formats: vec![OutputFormat::WebP, OutputFormat::Avif, OutputFormat::Jpeg],
            carousel: SizeSpec::new(1000, None, "carousel"),
            carousel_format: OutputFormat::WebP,
            carousel_quality: Quality::new(85),
        }
    }
}
