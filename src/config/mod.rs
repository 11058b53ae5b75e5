//! Project configuration management for `gluesync.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── toolchain  # [toolchain]
//! │   ├── output     # [output]
//! │   └── minify     # [minify]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # GlueConfig (this file)
//! ```
//!
//! The config file is optional: without one every section takes its
//! defaults and the project root is the current directory. CLI flags are
//! applied on top of the file, then everything is validated at once.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{MinifyConfig, MinifyEngine, OutputConfig, ToolchainConfig, ToolchainKind};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{cli::Cli, debug, log, utils::path};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config filename
pub const CONFIG_FILE: &str = "gluesync.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing gluesync.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlueConfig {
    /// Absolute path to the config file, whether or not it exists (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file, or cwd (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Toolchain selection
    pub toolchain: ToolchainConfig,

    /// Destination settings
    pub output: OutputConfig,

    /// Minification settings
    pub minify: MinifyConfig,
}

impl GlueConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. The project root is
    /// the config file's parent directory, or cwd when there is none.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_from(cli, &cwd)
    }

    fn load_from(cli: &Cli, cwd: &Path) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli, cwd);

        let mut config = if exists && !cli.is_init() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        config.root = if exists && !cli.is_init() {
            config_path.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            cwd.to_path_buf()
        };
        config.root = path::normalize_path(&config.root);
        config.config_path = config_path;

        config.apply_cli_options(cli);

        if !cli.is_init() {
            config.validate(cli)?;
        }

        config.normalize_paths();
        Ok(config)
    }

    /// Resolve config file path: upward search, or `cwd/<name>` when absent.
    fn resolve_config_path(cli: &Cli, cwd: &Path) -> (PathBuf, bool) {
        if cli.is_init() {
            let path = cwd.join(&cli.config);
            let exists = path.exists();
            return (path, exists);
        }

        match find_config_file(&cli.config, cwd) {
            Some(path) => (path, true),
            None => (cwd.join(&cli.config), false),
        }
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .map_err(|err| ConfigError::Toml(path.to_path_buf(), err))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        debug!("config"; "loaded {}", path.display());
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    ///
    /// Unlike interactive tools this never prompts: a build step must not block.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} are ignored:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get path relative to the project root (for display)
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(self.get_root())
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_cli_options(&mut self, cli: &Cli) {
        if let Some(common) = cli.common() {
            Self::update_option(&mut self.toolchain.kind, common.kind.as_ref());
            if let Some(root) = &common.root {
                self.toolchain.root = Some(root.clone());
            }
            if let Some(file) = &common.file {
                self.toolchain.file = Some(file.clone());
            }
            Self::update_option(&mut self.output.dir, common.dest.as_ref());
        }
        Self::update_option(&mut self.minify.enable, cli.minify().as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve user paths against the project root, with `~` expansion.
    fn normalize_paths(&mut self) {
        let root = self.root.clone();
        self.output.dir = path::resolve_path(&path::expand_path(&self.output.dir), &root);
        if let Some(toolchain_root) = self.toolchain.root.take() {
            self.toolchain.root = Some(path::resolve_path(
                &path::expand_path(&toolchain_root),
                &root,
            ));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration for the current command.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self, cli: &Cli) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.toolchain.validate(&mut diag);
        self.output.validate(&mut diag);

        // The minifier only runs during sync
        if cli.is_sync() {
            self.minify.validate(&mut diag);
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> GlueConfig {
    let (parsed, ignored) = GlueConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
