//! `[minify]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [minify]
//! enable = true
//! engine = "command"          # command | builtin
//! command = ["uglifyjs", "$GLUE_INPUT", "--compress", "--mangle", "--output", "$GLUE_OUTPUT"]
//! allow_degraded = false      # keep going with the unminified copy if minification fails
//! ```
//!
//! # Placeholders
//!
//! | Variable       | Value                                          |
//! |----------------|------------------------------------------------|
//! | `$GLUE_INPUT`  | staged copy of the glue file                   |
//! | `$GLUE_OUTPUT` | file the minifier must write                   |
//! | `$GLUE_SOURCE` | resolved glue file inside the toolchain        |
//! | `$GLUE_DEST`   | final destination path                         |
//!
//! Without `$GLUE_INPUT` the file is piped on stdin; without `$GLUE_OUTPUT`
//! the minified result is read from stdout.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Minification backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinifyEngine {
    /// Run an external minifier (`command`).
    #[default]
    Command,
    /// Use the bundled oxc (JS) / lightningcss (CSS) minifiers.
    Builtin,
}

/// `[minify]` settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyConfig {
    /// Minify the copied file.
    pub enable: bool,

    /// Backend used when enabled.
    pub engine: MinifyEngine,

    /// External minifier invocation (engine = "command").
    pub command: Vec<String>,

    /// Treat minifier failure as a warning; the unminified copy is kept either way.
    pub allow_degraded: bool,
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self {
            enable: false,
            engine: MinifyEngine::Command,
            command: [
                "uglifyjs",
                "$GLUE_INPUT",
                "--compress",
                "--mangle",
                "--output",
                "$GLUE_OUTPUT",
            ]
            .map(String::from)
            .to_vec(),
            allow_degraded: false,
        }
    }
}

pub struct MinifyFields {
    pub enable: FieldPath,
    pub engine: FieldPath,
    pub command: FieldPath,
    pub allow_degraded: FieldPath,
}

impl MinifyConfig {
    pub const FIELDS: MinifyFields = MinifyFields {
        enable: FieldPath::new("minify.enable"),
        engine: FieldPath::new("minify.engine"),
        command: FieldPath::new("minify.command"),
        allow_degraded: FieldPath::new("minify.allow_degraded"),
    };

    /// Display name of the active minifier for logging.
    pub fn display_name(&self) -> &str {
        match self.engine {
            MinifyEngine::Builtin => "builtin",
            MinifyEngine::Command => self.command.first().map(String::as_str).unwrap_or("command"),
        }
    }

    /// Validate minifier configuration.
    ///
    /// # Checks
    /// - If enabled with the command engine:
    ///   - `command` must not be empty
    ///   - `command[0]` must be an installed executable (or package runner)
    ///
    /// A missing executable is only a hint: the plain copy is still written
    /// and the minify step reports the failure.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enable || self.engine != MinifyEngine::Command {
            return;
        }

        if self.command.is_empty() {
            diag.error(
                Self::FIELDS.command,
                format!(
                    "{} is true but {} is empty",
                    Self::FIELDS.enable,
                    Self::FIELDS.command
                ),
            );
            return;
        }

        let cmd = &self.command[0];
        let is_package_runner = ["npx", "bunx", "pnpx", "yarn", "dlx"].contains(&cmd.as_str());

        if which::which(cmd).is_err() {
            if is_package_runner {
                if self.command.len() > 1 {
                    diag.hint(
                        Self::FIELDS.command,
                        format!(
                            "`{}` via `{}`, ensure the package is installed",
                            self.command[1], cmd
                        ),
                    );
                }
            } else if self.allow_degraded {
                diag.hint(
                    Self::FIELDS.command,
                    format!("`{cmd}` not found, the copy will stay unminified"),
                );
            } else {
                diag.hint(
                    Self::FIELDS.command,
                    format!(
                        "`{cmd}` not found, the sync will fail after copying; install it, \
                         set {} = \"builtin\" or set {} = true",
                        Self::FIELDS.engine,
                        Self::FIELDS.allow_degraded
                    ),
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
    fn test_minify_defaults() {
        let config = test_parse_config("");
        assert!(!config.minify.enable);
        assert_eq!(config.minify.engine, MinifyEngine::Command);
        assert_eq!(config.minify.command[0], "uglifyjs");
        assert!(!config.minify.allow_degraded);
    }

    #[test]
    fn test_minify_builtin() {
        let config = test_parse_config("[minify]\nenable = true\nengine = \"builtin\"");
        assert!(config.minify.enable);
        assert_eq!(config.minify.engine, MinifyEngine::Builtin);
        assert_eq!(config.minify.display_name(), "builtin");
    }

    #[test]
    fn test_disabled_skips_validation() {
        let config = MinifyConfig {
            command: vec![],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_empty_command_rejected() {
        let config = MinifyConfig {
            enable: true,
            command: vec![],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.errors()[0].field, MinifyConfig::FIELDS.command);
    }

    #[test]
    fn test_missing_command_is_not_error() {
        let config = MinifyConfig {
            enable: true,
            command: vec!["gluesync-no-such-minifier".into()],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_missing_command_degraded_is_not_error() {
        let config = MinifyConfig {
            enable: true,
            command: vec!["gluesync-no-such-minifier".into()],
            allow_degraded: true,
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(diag.is_empty());
    }
}
