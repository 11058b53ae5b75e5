//! Host environment lookups used to detect toolchain roots.

use crate::exec;
use crate::utils::exec::SILENT_FILTER;
use std::path::PathBuf;

/// Read-only view of the host: environment variables, `PATH`, `go env`.
pub trait HostProbe {
    /// Environment variable as a path, ignoring empty values.
    fn var(&self, name: &str) -> Option<PathBuf>;

    /// Locate an executable on `PATH`.
    fn which(&self, program: &str) -> Option<PathBuf>;

    /// `GOROOT` as reported by the `go` command itself.
    fn go_env_goroot(&self) -> Option<PathBuf>;
}

/// The real host.
pub struct SystemProbe;

impl HostProbe for SystemProbe {
    fn var(&self, name: &str) -> Option<PathBuf> {
        std::env::var_os(name)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn go_env_goroot(&self) -> Option<PathBuf> {
        self.which("go")?;
        let output = exec!(filter=&SILENT_FILTER; "go"; "env", "GOROOT").ok()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let goroot = stdout.trim();
        (!goroot.is_empty()).then(|| PathBuf::from(goroot))
    }
}
