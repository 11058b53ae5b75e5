//! `gluesync locate`: print where the glue file comes from.
//!
//! Plain output is the canonical source path alone, suitable for
//! `$(gluesync locate)` in a Makefile.

use crate::config::{GlueConfig, ToolchainKind};
use crate::sync::{self, AssetRef};
use crate::toolchain::Toolchain;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// JSON shape of `locate --json`.
#[derive(Debug, Serialize)]
struct Located<'a> {
    kind: ToolchainKind,
    root: &'a Path,
    origin: String,
    source: &'a Path,
    destination: &'a Path,
}

impl<'a> Located<'a> {
    fn new(toolchain: &'a Toolchain, asset: &'a AssetRef) -> Self {
        Self {
            kind: toolchain.kind,
            root: &toolchain.root,
            origin: toolchain.origin.to_string(),
            source: &asset.source,
            destination: &asset.destination,
        }
    }
}

pub fn run_locate(config: &GlueConfig, json: bool) -> Result<()> {
    let (toolchain, asset) = sync::resolve(config)?;

    if json {
        let located = Located::new(&toolchain, &asset);
        println!("{}", serde_json::to_string_pretty(&located)?);
    } else {
        println!("{}", asset.source.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::RootOrigin;
    use std::path::PathBuf;

    #[test]
    fn test_located_json_shape() {
        let toolchain = Toolchain {
            kind: ToolchainKind::Go,
            root: PathBuf::from("/usr/local/go"),
            origin: RootOrigin::EnvVar("GOROOT"),
            glue: PathBuf::from("/usr/local/go/lib/wasm/wasm_exec.js"),
        };
        let asset = AssetRef::new(toolchain.glue.clone(), Path::new("/srv/app/static/js")).unwrap();

        let value = serde_json::to_value(Located::new(&toolchain, &asset)).unwrap();
        assert_eq!(value["kind"], "go");
        assert_eq!(value["origin"], "$GOROOT");
        assert_eq!(value["source"], "/usr/local/go/lib/wasm/wasm_exec.js");
        assert_eq!(value["destination"], "/srv/app/static/js/wasm_exec.js");

        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["kind", "root", "origin", "source", "destination"]);
    }
}
