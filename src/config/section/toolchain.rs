//! `[toolchain]` section configuration.
//!
//! Selects which toolchain ships the runtime glue file and where it lives.
//!
//! # Example
//!
//! ```toml
//! [toolchain]
//! kind = "tinygo"                     # tinygo | go | custom
//! root = "/usr/local/lib/tinygo"      # optional, detected when omitted
//! file = "targets/wasm_exec.js"       # optional, defaults per kind
//! ```
//!
//! `root` may also come from `--root` or `GLUESYNC_TOOLCHAIN_ROOT`.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Toolchain that ships the runtime glue file.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ToolchainKind {
    /// TinyGo (`<root>/targets/wasm_exec.js`).
    #[default]
    Tinygo,
    /// The standard Go distribution (`<GOROOT>/lib/wasm/wasm_exec.js`).
    Go,
    /// Any installation; `root` and `file` must both be configured.
    Custom,
}

impl ToolchainKind {
    /// Name as written in config and on the command line.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tinygo => "tinygo",
            Self::Go => "go",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for ToolchainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `[toolchain]` settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Which toolchain to take the glue file from.
    pub kind: ToolchainKind,

    /// Installation root. Detected from the environment when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Glue file path relative to the root. Defaults per kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Field paths of `[toolchain]` for diagnostics.
pub struct ToolchainFields {
    pub kind: FieldPath,
    pub root: FieldPath,
    pub file: FieldPath,
}

impl ToolchainConfig {
    pub const FIELDS: ToolchainFields = ToolchainFields {
        kind: FieldPath::new("toolchain.kind"),
        root: FieldPath::new("toolchain.root"),
        file: FieldPath::new("toolchain.file"),
    };

    /// Validate toolchain configuration.
    ///
    /// # Checks
    /// - `custom` needs both `root` and `file`
    /// - `file` must be relative (it is joined onto the root)
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.kind == ToolchainKind::Custom {
            if self.root.is_none() {
                diag.error_with_hint(
                    Self::FIELDS.root,
                    format!("{} is \"custom\" but {} is not set", Self::FIELDS.kind, Self::FIELDS.root),
                    "set it in the config, pass --root or export GLUESYNC_TOOLCHAIN_ROOT",
                );
            }
            if self.file.is_none() {
                diag.error(
                    Self::FIELDS.file,
                    format!("{} is \"custom\" but {} is not set", Self::FIELDS.kind, Self::FIELDS.file),
                );
            }
        }

        if let Some(file) = &self.file {
            if file.is_absolute() {
                diag.error_with_hint(
                    Self::FIELDS.file,
                    format!("{} must be relative: {}", Self::FIELDS.file, file.display()),
                    format!("move the directory part into {}", Self::FIELDS.root),
                );
            } else if file.file_name().is_none() {
                diag.error(
                    Self::FIELDS.file,
                    format!("{} does not name a file: {}", Self::FIELDS.file, file.display()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_toolchain_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.toolchain.kind, ToolchainKind::Tinygo);
        assert!(config.toolchain.root.is_none());
        assert!(config.toolchain.file.is_none());
    }

    #[test]
    fn test_toolchain_go() {
        let config = test_parse_config("[toolchain]\nkind = \"go\"\nroot = \"/usr/lib/go\"");
        assert_eq!(config.toolchain.kind, ToolchainKind::Go);
        assert_eq!(config.toolchain.root, Some(PathBuf::from("/usr/lib/go")));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result: Result<ToolchainConfig, _> = toml::from_str("kind = \"emscripten\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_requires_root_and_file() {
        let config = ToolchainConfig {
            kind: ToolchainKind::Custom,
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["toolchain.root", "toolchain.file"]);
    }

    #[test]
    fn test_absolute_file_rejected() {
        let config = ToolchainConfig {
            kind: ToolchainKind::Go,
            root: None,
            file: Some(PathBuf::from("/opt/toolchain/targets/runtime_glue.js")),
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, ToolchainConfig::FIELDS.file);
    }

    #[test]
    fn test_valid_custom() {
        let config = ToolchainConfig {
            kind: ToolchainKind::Custom,
            root: Some(PathBuf::from("/opt/toolchain")),
            file: Some(PathBuf::from("targets/runtime_glue.js")),
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(diag.is_empty());
    }
}
