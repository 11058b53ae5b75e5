//! `[output]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [output]
//! dir = "static/js"       # Destination directory (relative to project root)
//! create_dir = false      # Create the directory if missing instead of failing
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the glue file is copied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination directory served as static assets.
    pub dir: PathBuf,

    /// Create `dir` (and parents) when it does not exist.
    pub create_dir: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "static/js".into(),
            create_dir: false,
        }
    }
}

pub struct OutputFields {
    pub dir: FieldPath,
}

impl OutputConfig {
    pub const FIELDS: OutputFields = OutputFields {
        dir: FieldPath::new("output.dir"),
    };

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.dir.as_os_str().is_empty() {
            diag.error(Self::FIELDS.dir, format!("{} must not be empty", Self::FIELDS.dir));
        }
    }
}
