//! # Helferboard Media
//!
//! Derived-image lifecycle for uploaded originals: every upload gets a
//! fixed family of resized, re-encoded artifacts — four thumbnail
//! variants plus a carousel variant — stored next to the original under
//! a deterministic naming scheme, regenerated when the original is
//! replaced, and removed when it goes away.
//!
//! # Architecture: One Pass Per Original
//!
//! ```text
//! decode → normalize (flatten onto white) → resize per size → encode per format
//! ```
//!
//! The original is decoded and canonicalized exactly once; each
//! configured size is resized exactly once; each resized copy is
//! encoded once per output format. Deletion never consults any record
//! of what was generated — the expected artifact set is recomputed from
//! the original's path and whatever exists is removed.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Injected size/format tables and quality presets |
//! | [`paths`] | Pure derived-path computation and the raster allow-list |
//! | [`intake`] | Stores uploads under collision-free generated stems |
//! | [`imaging`] | Pixel work: canonicalize, downscale, encode |
//! | [`lifecycle`] | Orchestration: generate and delete, boolean surface |
//!
//! # Design Decisions
//!
//! ## No Derivative Bookkeeping
//!
//! Which derived files exist is never recorded anywhere. Derivation is
//! a pure function of the original's path, so generate and delete both
//! recompute the full set on every call. Regeneration overwrites in
//! place; deletion skips what is absent. The one accepted limitation:
//! renaming a size label orphans files generated under the old label.
//!
//! ## Boolean Surface
//!
//! The embedding application decides user-facing messaging from a
//! single success flag; everything else goes to the [`log`] facade. No
//! error type crosses the crate boundary for expected conditions —
//! missing codecs, missing files, and unsupported formats all fold into
//! `false` plus a log record. Internally the classification is typed.
//!
//! ## Flatten Onto White
//!
//! Transparent sources are composited onto a white matte before any
//! resize or encode, so every output format sees the same fully opaque
//! three-channel image and flattening is deterministic rather than
//! whatever each encoder would do with an alpha channel.
//!
//! ## Best-Effort AVIF
//!
//! WebP and JPEG are mandatory outputs; AVIF is produced when its
//! encoder is available and quietly skipped when it is not. The codec
//! probe runs once at startup ([`Codecs`]) and is injected, so a build
//! without the AVIF feature degrades to WebP+JPEG instead of failing.

pub mod config;
pub mod imaging;
pub mod intake;
pub mod lifecycle;
pub mod paths;

pub use config::{MediaConfig, OutputFormat, Quality, SizeSpec};
pub use imaging::Codecs;
pub use intake::{IntakeError, store_original};
pub use lifecycle::Thumbnailer;
pub use paths::{carousel_path, expected_paths, is_processable};
