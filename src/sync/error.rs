//! Error taxonomy of a synchronization run.

use crate::minify::MinifyError;
use crate::toolchain::ToolchainError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which side of the copy a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    /// The glue file inside the toolchain.
    Source,
    /// The destination directory or file.
    Destination,
}

impl fmt::Display for PathRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Destination => "destination",
        })
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// The toolchain root, the glue file or the destination does not exist.
    #[error("cannot resolve {role}: {detail}")]
    PathResolution {
        role: PathRole,
        path: Option<PathBuf>,
        detail: String,
    },

    #[error("permission denied writing `{}`", .path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Minification failed; the unminified copy is in place.
    #[error("minifying `{}` failed, unminified copy kept", .path.display())]
    Minifier {
        path: PathBuf,
        #[source]
        source: MinifyError,
    },
}

impl SyncError {
    pub(super) fn missing(role: PathRole, path: &Path, detail: impl Into<String>) -> Self {
        Self::PathResolution {
            role,
            path: Some(path.to_path_buf()),
            detail: detail.into(),
        }
    }

    /// Classify a failed write to `path`.
    pub(super) fn write(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
                Self::Permission { path, source }
            }
            _ => Self::Io { path, source },
        }
    }

    /// Classify a failed read of `path`.
    pub(super) fn read(role: PathRole, path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            return Self::missing(role, path, format!("`{}` does not exist", path.display()));
        }
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<ToolchainError> for SyncError {
    fn from(err: ToolchainError) -> Self {
        Self::PathResolution {
            role: PathRole::Source,
            path: err.path().map(Path::to_path_buf),
            detail: err.to_string(),
        }
    }
}
