//! `gluesync init`: write a commented default config file.

use crate::config::{ConfigError, GlueConfig, MinifyConfig, OutputConfig, ToolchainConfig};
use crate::log;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;

/// Generate gluesync.toml content with comments.
///
/// Values come from the section defaults so the template never drifts from
/// what an empty config means.
pub fn generate_config_template() -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!(
        "# gluesync configuration file (v{})\n\n",
        env!("CARGO_PKG_VERSION")
    ));

    out.push_str(&section(
        "toolchain",
        &[
            "Toolchain that ships the runtime glue file: tinygo | go | custom",
            "root is detected when omitted ($TINYGOROOT, $GOROOT, PATH, well-known dirs)",
        ],
        &ToolchainConfig::default(),
    )?);
    out.push_str("# root = \"/usr/local/lib/tinygo\"\n");
    out.push_str("# file = \"targets/wasm_exec.js\"\n\n");

    out.push_str(&section(
        "output",
        &["Destination directory, relative to this file"],
        &OutputConfig::default(),
    )?);
    out.push('\n');

    out.push_str(&section(
        "minify",
        &[
            "engine: command (external tool) | builtin (oxc / lightningcss)",
            "$GLUE_INPUT / $GLUE_OUTPUT are replaced with scratch files; omit them to use stdin / stdout",
        ],
        &MinifyConfig::default(),
    )?);

    Ok(out)
}

fn section<T: Serialize>(name: &str, comments: &[&str], value: &T) -> Result<String> {
    let mut out = String::new();
    for comment in comments {
        out.push_str(&format!("# {comment}\n"));
    }
    out.push_str(&format!("[{name}]\n"));
    out.push_str(&toml::to_string_pretty(value).with_context(|| format!("serialize [{name}]"))?);
    Ok(out)
}

/// Write the template to the config path, or print it with `dry`.
pub fn run_init(config: &GlueConfig, dry: bool, force: bool) -> Result<()> {
    let content = generate_config_template()?;
    if dry {
        print!("{content}");
        return Ok(());
    }

    let path = &config.config_path;
    if path.exists() && !force {
        return Err(ConfigError::Exists(path.clone()).into());
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;
    log!("init"; "wrote {}", path.display());
    Ok(())
}
