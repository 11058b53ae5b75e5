//! Configuration section definitions.
//!
//! Each module corresponds to a section in `gluesync.toml`:
//!
//! | Module      | TOML Section   | Purpose                                  |
//! |-------------|----------------|------------------------------------------|
//! | `toolchain` | `[toolchain]`  | Which toolchain, its root, the glue file |
//! | `output`    | `[output]`     | Destination directory                    |
//! | `minify`    | `[minify]`     | Optional minification step               |

mod minify;
mod output;
mod toolchain;

pub use minify::{MinifyConfig, MinifyEngine};
pub use output::OutputConfig;
pub use toolchain::{ToolchainConfig, ToolchainKind};
