//! Candidate roots and glue file locations per toolchain kind.

use super::probe::HostProbe;
use crate::config::ToolchainKind;
use std::path::{Path, PathBuf};

/// Install location used by the TinyGo `.deb`/`.rpm` packages.
pub const TINYGO_DEFAULT_ROOT: &str = "/usr/local/lib/tinygo";

/// Install location of the official Go tarball.
pub const GO_DEFAULT_ROOT: &str = "/usr/local/go";

/// Where a candidate root came from, for logs and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootOrigin {
    /// `--root`, `GLUESYNC_TOOLCHAIN_ROOT` or `toolchain.root`.
    Explicit,
    /// `$TINYGOROOT` / `$GOROOT`.
    EnvVar(&'static str),
    /// Derived from the executable found on `PATH`.
    Executable,
    /// Reported by `go env GOROOT`.
    GoEnv,
    /// Well-known install directory.
    Default,
}

impl std::fmt::Display for RootOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit => f.write_str("configured"),
            Self::EnvVar(name) => write!(f, "${name}"),
            Self::Executable => f.write_str("PATH"),
            Self::GoEnv => f.write_str("go env GOROOT"),
            Self::Default => f.write_str("default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootCandidate {
    pub path: PathBuf,
    pub origin: RootOrigin,
}

impl RootCandidate {
    fn new(path: impl Into<PathBuf>, origin: RootOrigin) -> Self {
        Self {
            path: path.into(),
            origin,
        }
    }
}

/// Candidate roots in priority order.
///
/// An explicit root is authoritative: no detection happens when it is set.
/// Detection sources are consulted lazily, so `go env` only runs if every
/// cheaper source missed.
pub fn root_candidates<'a>(
    kind: ToolchainKind,
    explicit: Option<&Path>,
    probe: &'a dyn HostProbe,
) -> impl Iterator<Item = RootCandidate> + 'a {
    type Detector<'p> = Box<dyn FnOnce() -> Option<RootCandidate> + 'p>;

    let explicit = explicit.map(|p| RootCandidate::new(p, RootOrigin::Explicit));

    let detectors: Vec<Detector<'a>> = match kind {
        _ if explicit.is_some() => vec![Box::new(move || explicit)],
        ToolchainKind::Tinygo => vec![
            Box::new(move || {
                probe
                    .var("TINYGOROOT")
                    .map(|p| RootCandidate::new(p, RootOrigin::EnvVar("TINYGOROOT")))
            }),
            Box::new(move || {
                root_from_executable(&probe.which("tinygo")?)
                    .map(|p| RootCandidate::new(p, RootOrigin::Executable))
            }),
            Box::new(|| Some(RootCandidate::new(TINYGO_DEFAULT_ROOT, RootOrigin::Default))),
        ],
        ToolchainKind::Go => vec![
            Box::new(move || {
                probe
                    .var("GOROOT")
                    .map(|p| RootCandidate::new(p, RootOrigin::EnvVar("GOROOT")))
            }),
            Box::new(move || {
                probe
                    .go_env_goroot()
                    .map(|p| RootCandidate::new(p, RootOrigin::GoEnv))
            }),
            Box::new(|| Some(RootCandidate::new(GO_DEFAULT_ROOT, RootOrigin::Default))),
        ],
        ToolchainKind::Custom => Vec::new(),
    };

    detectors.into_iter().filter_map(|detect| detect())
}

/// `<root>/bin/tinygo` → `<root>`, following symlinks such as
/// `/usr/local/bin/tinygo -> /usr/local/lib/tinygo/bin/tinygo`.
fn root_from_executable(exe: &Path) -> Option<PathBuf> {
    let real = exe.canonicalize().ok()?;
    real.parent()?.parent().map(Path::to_path_buf)
}

/// Glue file locations relative to the root, tried in order.
pub fn glue_suffixes(kind: ToolchainKind, file: Option<&Path>) -> Vec<PathBuf> {
    if let Some(file) = file {
        return vec![file.to_path_buf()];
    }
    match kind {
        ToolchainKind::Tinygo => vec!["targets/wasm_exec.js".into()],
        // Go 1.24 moved the file from misc/wasm to lib/wasm
        ToolchainKind::Go => vec!["lib/wasm/wasm_exec.js".into(), "misc/wasm/wasm_exec.js".into()],
        ToolchainKind::Custom => Vec::new(),
    }
}
