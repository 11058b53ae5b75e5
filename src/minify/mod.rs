//! Minification of the synchronized glue file.
//!
//! Two engines:
//! - `command`: an external tool such as `uglifyjs` or `npx terser`
//! - `builtin`: oxc (JS) and lightningcss (CSS), no external dependency

mod builtin;
mod command;

use crate::config::{MinifyConfig, MinifyEngine};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Paths describing one minification.
#[derive(Debug, Clone, Copy)]
pub struct MinifyJob<'a> {
    /// Glue file inside the toolchain.
    pub source: &'a Path,
    /// Final destination; scratch files are created next to it.
    pub dest: &'a Path,
}

#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("`{program}` failed: {message}")]
    Command { program: String, message: String },

    #[error("`{program}` produced no output")]
    EmptyOutput { program: String },

    #[error("cannot minify `{}`: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("no builtin minifier for `{}`", .path.display())]
    Unsupported { path: PathBuf },

    #[error("minifier scratch file `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Minify `content` with the configured engine.
///
/// Whitespace-only output is an error for every engine, so an empty file
/// never replaces the glue.
pub fn minify(
    config: &MinifyConfig,
    job: &MinifyJob<'_>,
    content: &[u8],
) -> Result<Vec<u8>, MinifyError> {
    let minified = match config.engine {
        MinifyEngine::Builtin => builtin::minify_by_ext(job.dest, content)?,
        MinifyEngine::Command => command::run(&config.command, job, content)?,
    };

    if minified.iter().all(u8::is_ascii_whitespace) {
        return Err(MinifyError::EmptyOutput {
            program: config.display_name().to_owned(),
        });
    }
    Ok(minified)
}
