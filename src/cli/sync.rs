//! `gluesync sync`: copy the glue file into the destination directory.

use crate::config::GlueConfig;
use crate::log;
use crate::sync::{self, MinifyOutcome, Outcome, SyncReport};
use anyhow::Result;

/// Run the synchronization and log what happened.
///
/// A minifier failure without `allow_degraded` is returned as an error after
/// the unminified copy is in place.
pub fn run_sync(config: &GlueConfig) -> Result<()> {
    let report = sync::sync(config)?;
    log_report(config, &report);
    Ok(())
}

fn log_report(config: &GlueConfig, report: &SyncReport) {
    let dest = config.root_relative(&report.asset.destination);
    match report.outcome {
        Outcome::Unchanged => log!("sync"; "{} is up to date", dest.display()),
        outcome => log!(
            "sync";
            "{} {} ({})",
            outcome.as_str(),
            dest.display(),
            report.hash
        ),
    }

    match &report.minify {
        MinifyOutcome::Skipped => {}
        MinifyOutcome::Minified { before, after } => log!(
            "minify";
            "`{}` {} -> {} bytes ({})",
            config.minify.display_name(),
            before,
            after,
            saved_percent(*before, *after)
        ),
        MinifyOutcome::Degraded { error } => {
            log!("warning"; "{}", error);
            log!("warning"; "kept unminified {} (minify.allow_degraded = true)", dest.display());
        }
    }
}

fn saved_percent(before: usize, after: usize) -> String {
    if before == 0 {
        return "0%".into();
    }
    let saved = before.saturating_sub(after) as f64 / before as f64 * 100.0;
    format!("-{saved:.0}%")
}
