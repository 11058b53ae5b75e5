//! Asset synchronization.
//!
//! Copies the toolchain's glue file into the static asset directory:
//!
//! ```text
//! locate ─► read source ─► [minify in memory] ─► atomic write
//! ```
//!
//! The destination directory must exist (unless `output.create_dir` is set).
//! Every write goes through a temporary file in that directory followed by
//! a rename, so the asset server never observes a partial file. A
//! destination that already holds the final bytes is not rewritten. When
//! minification fails, the plain copy is written instead.

mod error;
mod write;

pub use error::{PathRole, SyncError};
pub use write::atomic_write;

use crate::config::{GlueConfig, MinifyConfig};
use crate::debug;
use crate::freshness::{ContentHash, compute_file_hash, hash_bytes};
use crate::minify::{self, MinifyJob};
use crate::toolchain::{self, Toolchain};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

// ============================================================================
// Types
// ============================================================================

/// The pair of paths a sync operates on. Computed fresh on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRef {
    /// Canonical path of the glue file inside the toolchain.
    pub source: PathBuf,
    /// `<destination dir>/<source base name>`.
    pub destination: PathBuf,
}

impl AssetRef {
    /// Pair `source` with a file of the same name in `dest_dir`.
    pub fn new(source: impl Into<PathBuf>, dest_dir: &Path) -> Result<Self, SyncError> {
        let source = source.into();
        let name = source.file_name().ok_or_else(|| {
            SyncError::missing(
                PathRole::Source,
                &source,
                format!("`{}` has no file name", source.display()),
            )
        })?;
        let destination = dest_dir.join(name);
        Ok(Self {
            source,
            destination,
        })
    }

    /// Directory the destination file lives in.
    pub fn dest_dir(&self) -> &Path {
        self.destination.parent().unwrap_or(Path::new("."))
    }
}

/// What a sync did to the destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Unchanged,
}

impl Outcome {
    fn from_hashes(previous: Option<ContentHash>, current: ContentHash) -> Self {
        match previous {
            None => Self::Created,
            Some(hash) if hash == current => Self::Unchanged,
            Some(_) => Self::Updated,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Result of the optional minification sub-step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinifyOutcome {
    Skipped,
    Minified { before: usize, after: usize },
    /// Minification failed and `allow_degraded` kept the run going.
    Degraded { error: String },
}

/// Summary of a completed sync.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub asset: AssetRef,
    pub outcome: Outcome,
    pub minify: MinifyOutcome,
    /// Hash of the destination after the sync.
    pub hash: ContentHash,
}

/// Whether the destination matches what a sync would produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
    Missing,
}

// ============================================================================
// Operations
// ============================================================================

/// Locate the toolchain and pair its glue file with the configured destination.
pub fn resolve(config: &GlueConfig) -> Result<(Toolchain, AssetRef), SyncError> {
    let toolchain = toolchain::locate(&config.toolchain)?;
    let asset = AssetRef::new(toolchain.glue.clone(), &config.output.dir)?;
    Ok((toolchain, asset))
}

/// Run a full sync as configured.
pub fn sync(config: &GlueConfig) -> Result<SyncReport, SyncError> {
    let (_, asset) = resolve(config)?;
    sync_asset(asset, config.output.create_dir, &config.minify)
}

/// Copy `asset.source` to `asset.destination`, minified if enabled.
///
/// Checks happen before anything is written: the destination directory must
/// exist and the source must be readable. A failed minification still
/// leaves the plain copy at the destination.
pub fn sync_asset(
    asset: AssetRef,
    create_dir: bool,
    minify: &MinifyConfig,
) -> Result<SyncReport, SyncError> {
    ensure_dest_dir(asset.dest_dir(), create_dir)?;

    let content =
        fs::read(&asset.source).map_err(|e| SyncError::read(PathRole::Source, &asset.source, e))?;
    let plain_hash = hash_bytes(&content);

    let previous = compute_file_hash(&asset.destination).map_err(|source| SyncError::Io {
        path: asset.destination.clone(),
        source,
    })?;
    debug!(
        "sync";
        "{} ({} bytes, {}) -> {}",
        asset.source.display(),
        content.len(),
        plain_hash,
        asset.destination.display()
    );

    let (output, minify_outcome) = if minify.enable {
        match minify_content(&asset, minify, &content) {
            Ok(minified) => {
                let outcome = MinifyOutcome::Minified {
                    before: content.len(),
                    after: minified.len(),
                };
                (minified, outcome)
            }
            Err(err) if minify.allow_degraded => {
                let error = format!("{err}");
                (content, MinifyOutcome::Degraded { error })
            }
            Err(source) => {
                if previous != Some(plain_hash) {
                    atomic_write(&asset.destination, &content)?;
                }
                return Err(SyncError::Minifier {
                    path: asset.destination,
                    source,
                });
            }
        }
    } else {
        (content, MinifyOutcome::Skipped)
    };

    let hash = hash_bytes(&output);
    if previous != Some(hash) {
        atomic_write(&asset.destination, &output)?;
    }

    Ok(SyncReport {
        outcome: Outcome::from_hashes(previous, hash),
        asset,
        minify: minify_outcome,
        hash,
    })
}

/// Run the configured minifier over the plain content.
fn minify_content(
    asset: &AssetRef,
    config: &MinifyConfig,
    content: &[u8],
) -> Result<Vec<u8>, minify::MinifyError> {
    let job = MinifyJob {
        source: &asset.source,
        dest: &asset.destination,
    };
    minify::minify(config, &job, content)
}

/// Compare the destination with the source.
///
/// Without minification the destination must be byte-identical to the
/// source. A minified destination cannot be reproduced without running the
/// minifier, so it only has to exist and differ from the plain source.
pub fn verify(asset: &AssetRef, minified: bool) -> Result<Freshness, SyncError> {
    let source = compute_file_hash(&asset.source)
        .map_err(|e| SyncError::read(PathRole::Source, &asset.source, e))?
        .ok_or_else(|| {
            SyncError::missing(
                PathRole::Source,
                &asset.source,
                format!("`{}` does not exist", asset.source.display()),
            )
        })?;
    let dest = compute_file_hash(&asset.destination).map_err(|e| SyncError::Io {
        path: asset.destination.clone(),
        source: e,
    })?;

    Ok(match dest {
        None => Freshness::Missing,
        Some(hash) if (hash == source) != minified => Freshness::Fresh,
        Some(_) => Freshness::Stale,
    })
}

fn ensure_dest_dir(dir: &Path, create: bool) -> Result<(), SyncError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(SyncError::missing(
            PathRole::Destination,
            dir,
            format!("`{}` is not a directory", dir.display()),
        )),
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(SyncError::write(dir, e)),
        Err(_) if create => {
            debug!("sync"; "creating {}", dir.display());
            fs::create_dir_all(dir).map_err(|e| SyncError::write(dir, e))
        }
        Err(_) => Err(SyncError::missing(
            PathRole::Destination,
            dir,
            format!(
                "directory `{}` does not exist (set output.create_dir = true to create it)",
                dir.display()
            ),
        )),
    }
}

// ============================================================================
// tests
// ============================================================================
