//! `gluesync check`: fail unless the destination is up to date.

use crate::config::GlueConfig;
use crate::log;
use crate::sync::{self, Freshness};
use anyhow::{Result, bail};

pub fn run_check(config: &GlueConfig) -> Result<()> {
    let (_, asset) = sync::resolve(config)?;
    let dest = config.root_relative(&asset.destination);

    match sync::verify(&asset, config.minify.enable)? {
        Freshness::Fresh => {
            log!("check"; "{} is up to date", dest.display());
            Ok(())
        }
        Freshness::Stale => bail!("`{}` is out of date, run `gluesync sync`", dest.display()),
        Freshness::Missing => bail!("`{}` does not exist, run `gluesync sync`", dest.display()),
    }
}
