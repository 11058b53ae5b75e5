//! Command-line interface definitions.

use crate::config::ToolchainKind;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Copy a WebAssembly toolchain's runtime glue file into your static assets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: gluesync.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, default_value = "gluesync.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands (defaults to `sync`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Copy the runtime glue file into the destination directory
    #[command(visible_alias = "s")]
    Sync {
        #[command(flatten)]
        common: CommonArgs,

        /// Minify the copied file
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        minify: Option<bool>,
    },

    /// Print the resolved path of the runtime glue file
    #[command(visible_alias = "l")]
    Locate {
        #[command(flatten)]
        common: CommonArgs,

        /// Print kind, root, source and destination as JSON
        #[arg(long)]
        json: bool,
    },

    /// Exit non-zero unless the destination is up to date
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        common: CommonArgs,

        /// Expect a minified destination
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        minify: Option<bool>,
    },

    /// Write a commented default config file
    #[command(visible_alias = "i")]
    Init {
        /// Print the config template instead of writing it
        #[arg(long)]
        dry: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Toolchain and destination overrides shared by sync, locate and check.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Toolchain that ships the runtime glue file
    #[arg(short, long, value_enum)]
    pub kind: Option<ToolchainKind>,

    /// Toolchain installation root
    #[arg(short, long, env = "GLUESYNC_TOOLCHAIN_ROOT", value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Glue file path relative to the toolchain root
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Destination directory (relative to the project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub dest: Option<PathBuf>,
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Commands::Init { .. }))
    }

    pub const fn is_sync(&self) -> bool {
        matches!(self.command, None | Some(Commands::Sync { .. }))
    }

    /// Overrides shared by the path-resolving commands.
    pub fn common(&self) -> Option<&CommonArgs> {
        match &self.command {
            Some(Commands::Sync { common, .. })
            | Some(Commands::Locate { common, .. })
            | Some(Commands::Check { common, .. }) => Some(common),
            _ => None,
        }
    }

    /// `--minify` override, if the command accepts one.
    pub fn minify(&self) -> Option<bool> {
        match &self.command {
            Some(Commands::Sync { minify, .. }) | Some(Commands::Check { minify, .. }) => *minify,
            _ => None,
        }
    }
}
