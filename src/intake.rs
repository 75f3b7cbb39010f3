//! Original-asset intake.
//!
//! Uploads are stored under a random 16-hex-character stem so repeated
//! uploads of the same filename never collide, and so the stem that all
//! derived-path computation keys on is unambiguous from the moment the
//! original lands on disk. Only the (lowercased) extension survives
//! from the client-supplied name.
//!
//! Unlike the lifecycle operations, intake reports typed errors rather
//! than a boolean — a rejected upload is something the caller acts on
//! directly.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Entropy behind the generated stem (hex-encoded, so 2x characters).
const STEM_BYTES: usize = 8;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("upload name has no usable extension: {0:?}")]
    MissingExtension(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store uploaded bytes under `base_dir/subdir` with a generated stem.
///
/// Creates the target directory as needed and returns the stored path
/// relative to `base_dir`, ready to be handed to
/// [`Thumbnailer::generate`](crate::lifecycle::Thumbnailer::generate).
pub fn store_original(
    base_dir: &Path,
    subdir: &str,
    source_name: &str,
    bytes: &[u8],
) -> Result<PathBuf, IntakeError> {
    let ext = Path::new(source_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| IntakeError::MissingExtension(source_name.to_string()))?;

    let target_dir = base_dir.join(subdir);
    fs::create_dir_all(&target_dir)?;

    let name = format!("{}.{ext}", random_stem());
    fs::write(target_dir.join(&name), bytes)?;
    log::info!("stored upload {source_name:?} as {subdir}/{name}");

    Ok(PathBuf::from(subdir).join(name))
}

/// 16 hex characters of OS-seeded randomness.
fn random_stem() -> String {
    let bytes: [u8; STEM_BYTES] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
