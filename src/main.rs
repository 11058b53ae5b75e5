//! gluesync - copy a WebAssembly toolchain's runtime glue file into a
//! project's static assets.

mod cli;
mod config;
mod freshness;
mod logger;
mod minify;
mod sync;
mod toolchain;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::GlueConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = GlueConfig::load(&cli)?;

    match &cli.command {
        None | Some(Commands::Sync { .. }) => cli::sync::run_sync(&config),
        Some(Commands::Locate { json, .. }) => cli::locate::run_locate(&config, *json),
        Some(Commands::Check { .. }) => cli::check::run_check(&config),
        Some(Commands::Init { dry, force }) => cli::init::run_init(&config, *dry, *force),
    }
}
