//! Toolchain discovery.
//!
//! Finds the installation root of the configured WebAssembly toolchain and
//! the JavaScript glue file it ships:
//!
//! ```text
//! tinygo  <root>/targets/wasm_exec.js
//! go      <root>/lib/wasm/wasm_exec.js   (Go >= 1.24)
//!         <root>/misc/wasm/wasm_exec.js
//! custom  <toolchain.root>/<toolchain.file>
//! ```

mod candidates;
mod probe;

pub use candidates::{RootCandidate, RootOrigin};
pub use probe::{HostProbe, SystemProbe};

use crate::config::{ToolchainConfig, ToolchainKind};
use crate::debug;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A located toolchain and its glue file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub kind: ToolchainKind,
    /// Root directory as found (not canonicalized).
    pub root: PathBuf,
    /// Where the root came from.
    pub origin: RootOrigin,
    /// Canonical absolute path of the glue file.
    pub glue: PathBuf,
}

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("{kind} toolchain root not found{}", Tried(.tried))]
    RootNotFound {
        kind: ToolchainKind,
        tried: Vec<RootCandidate>,
    },

    #[error("glue file not found under {kind} root `{}`{}", .root.display(), TriedPaths(.tried))]
    GlueNotFound {
        kind: ToolchainKind,
        root: PathBuf,
        tried: Vec<PathBuf>,
    },

    #[error("custom toolchain needs both `toolchain.root` and `toolchain.file`")]
    Unconfigured,

    #[error("failed to resolve `{}`", .path.display())]
    Canonicalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ToolchainError {
    /// The path the error is about, if there is a single one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::RootNotFound { tried, .. } => tried.first().map(|c| c.path.as_path()),
            Self::GlueNotFound { tried, root, .. } => {
                Some(tried.first().map(PathBuf::as_path).unwrap_or(root))
            }
            Self::Canonicalize { path, .. } => Some(path),
            Self::Unconfigured => None,
        }
    }
}

struct Tried<'a>(&'a [RootCandidate]);

impl fmt::Display for Tried<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for candidate in self.0 {
            write!(
                f,
                "\n  tried {} {}",
                candidate.path.display(),
                format!("({})", candidate.origin).dimmed()
            )?;
        }
        Ok(())
    }
}

struct TriedPaths<'a>(&'a [PathBuf]);

impl fmt::Display for TriedPaths<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for path in self.0 {
            write!(f, "\n  tried {}", path.display())?;
        }
        Ok(())
    }
}

/// Locate the toolchain described by `config` on this host.
pub fn locate(config: &ToolchainConfig) -> Result<Toolchain, ToolchainError> {
    locate_with(config, &SystemProbe)
}

/// Locate the toolchain using `probe` for environment lookups.
pub fn locate_with(
    config: &ToolchainConfig,
    probe: &dyn HostProbe,
) -> Result<Toolchain, ToolchainError> {
    let kind = config.kind;
    if kind == ToolchainKind::Custom && (config.root.is_none() || config.file.is_none()) {
        return Err(ToolchainError::Unconfigured);
    }

    let (root, origin) = find_root(kind, config.root.as_deref(), probe)?;

    let mut tried = Vec::new();
    for suffix in candidates::glue_suffixes(kind, config.file.as_deref()) {
        let path = root.join(&suffix);
        debug!("locate"; "trying {}", path.display());
        if path.is_file() {
            let glue = path
                .canonicalize()
                .map_err(|source| ToolchainError::Canonicalize {
                    path: path.clone(),
                    source,
                })?;
            debug!("locate"; "found {} ({} root)", glue.display(), origin);
            return Ok(Toolchain {
                kind,
                root,
                origin,
                glue,
            });
        }
        tried.push(path);
    }

    Err(ToolchainError::GlueNotFound { kind, root, tried })
}

/// First candidate root that exists as a directory.
fn find_root(
    kind: ToolchainKind,
    explicit: Option<&Path>,
    probe: &dyn HostProbe,
) -> Result<(PathBuf, RootOrigin), ToolchainError> {
    let mut tried = Vec::new();
    for candidate in candidates::root_candidates(kind, explicit, probe) {
        debug!("locate"; "root candidate {} ({})", candidate.path.display(), candidate.origin);
        if candidate.path.is_dir() {
            return Ok((candidate.path, candidate.origin));
        }
        tried.push(candidate);
    }
    Err(ToolchainError::RootNotFound { kind, tried })
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;
    use std::fs;
    use tempfile::TempDir;

    /// Host with a fixed environment and nothing on `PATH` unless told so.
    #[derive(Default)]
    struct FakeProbe {
        vars: FxHashMap<&'static str, PathBuf>,
        bins: FxHashMap<&'static str, PathBuf>,
        goroot: Option<PathBuf>,
    }

    impl HostProbe for FakeProbe {
        fn var(&self, name: &str) -> Option<PathBuf> {
            self.vars.get(name).cloned()
        }

        fn which(&self, program: &str) -> Option<PathBuf> {
            self.bins.get(program).cloned()
        }

        fn go_env_goroot(&self) -> Option<PathBuf> {
            self.goroot.clone()
        }
    }

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config(kind: ToolchainKind, root: Option<&Path>) -> ToolchainConfig {
        ToolchainConfig {
            kind,
            root: root.map(Path::to_path_buf),
            file: None,
        }
    }

    #[test]
    fn test_tinygo_from_env_var() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("targets/wasm_exec.js"), "// glue");

        let mut probe = FakeProbe::default();
        probe.vars.insert("TINYGOROOT", dir.path().to_path_buf());

        let found = locate_with(&config(ToolchainKind::Tinygo, None), &probe).unwrap();
        assert_eq!(found.origin, RootOrigin::EnvVar("TINYGOROOT"));
        assert_eq!(
            found.glue,
            dir.path().join("targets/wasm_exec.js").canonicalize().unwrap()
        );
        assert_eq!(found.glue.file_name().unwrap(), "wasm_exec.js");
    }

    #[test]
    fn test_tinygo_from_executable() {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("bin/tinygo");
        touch(&bin, "");
        touch(&dir.path().join("targets/wasm_exec.js"), "// glue");

        let mut probe = FakeProbe::default();
        probe.bins.insert("tinygo", bin);

        let found = locate_with(&config(ToolchainKind::Tinygo, None), &probe).unwrap();
        assert_eq!(found.origin, RootOrigin::Executable);
        assert_eq!(found.root, dir.path().canonicalize().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_tinygo_executable_symlink_resolved() {
        let dir = TempDir::new().unwrap();
        let install = dir.path().join("lib/tinygo");
        touch(&install.join("bin/tinygo"), "");
        touch(&install.join("targets/wasm_exec.js"), "// glue");
        let link = dir.path().join("bin/tinygo");
        fs::create_dir_all(link.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(install.join("bin/tinygo"), &link).unwrap();

        let mut probe = FakeProbe::default();
        probe.bins.insert("tinygo", link);

        let found = locate_with(&config(ToolchainKind::Tinygo, None), &probe).unwrap();
        assert_eq!(found.root, install.canonicalize().unwrap());
    }

    #[test]
    fn test_env_var_missing_dir_falls_through() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("bin/tinygo"), "");
        touch(&dir.path().join("targets/wasm_exec.js"), "// glue");

        let mut probe = FakeProbe::default();
        probe
            .vars
            .insert("TINYGOROOT", dir.path().join("does-not-exist"));
        probe.bins.insert("tinygo", dir.path().join("bin/tinygo"));

        let found = locate_with(&config(ToolchainKind::Tinygo, None), &probe).unwrap();
        assert_eq!(found.origin, RootOrigin::Executable);
    }

    #[test]
    fn test_go_prefers_lib_wasm() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("lib/wasm/wasm_exec.js"), "// new");
        touch(&dir.path().join("misc/wasm/wasm_exec.js"), "// old");

        let mut probe = FakeProbe::default();
        probe.vars.insert("GOROOT", dir.path().to_path_buf());

        let found = locate_with(&config(ToolchainKind::Go, None), &probe).unwrap();
        assert!(found.glue.ends_with("lib/wasm/wasm_exec.js"));
    }

    #[test]
    fn test_go_misc_wasm_from_go_env() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("misc/wasm/wasm_exec.js"), "// old");

        let probe = FakeProbe {
            goroot: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        let found = locate_with(&config(ToolchainKind::Go, None), &probe).unwrap();
        assert_eq!(found.origin, RootOrigin::GoEnv);
        assert!(found.glue.ends_with("misc/wasm/wasm_exec.js"));
    }

    #[test]
    fn test_explicit_root_is_authoritative() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("targets/wasm_exec.js"), "// glue");
        let missing = dir.path().join("missing");

        let mut probe = FakeProbe::default();
        probe.vars.insert("TINYGOROOT", dir.path().to_path_buf());

        let err = locate_with(&config(ToolchainKind::Tinygo, Some(&missing)), &probe).unwrap_err();
        let ToolchainError::RootNotFound { tried, .. } = &err else {
            panic!("expected RootNotFound, got {err:?}");
        };
        assert_eq!(tried.len(), 1);
        assert_eq!(tried[0].origin, RootOrigin::Explicit);
        assert_eq!(err.path(), Some(missing.as_path()));
    }

    #[test]
    fn test_glue_missing_under_root() {
        let dir = TempDir::new().unwrap();
        let err = locate_with(
            &config(ToolchainKind::Tinygo, Some(dir.path())),
            &FakeProbe::default(),
        )
        .unwrap_err();

        let ToolchainError::GlueNotFound { tried, .. } = &err else {
            panic!("expected GlueNotFound, got {err:?}");
        };
        assert_eq!(tried, &[dir.path().join("targets/wasm_exec.js")]);
        assert!(err.to_string().contains("targets/wasm_exec.js"));
    }

    #[test]
    fn test_custom_root_and_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("opt/toolchain");
        touch(&root.join("targets/runtime_glue.js"), "console.log('glue')");

        let config = ToolchainConfig {
            kind: ToolchainKind::Custom,
            root: Some(root.clone()),
            file: Some(PathBuf::from("targets/runtime_glue.js")),
        };
        let found = locate_with(&config, &FakeProbe::default()).unwrap();
        assert_eq!(found.glue.file_name().unwrap(), "runtime_glue.js");
        assert_eq!(found.root, root);
    }

    #[test]
    fn test_custom_requires_root() {
        let config = ToolchainConfig {
            kind: ToolchainKind::Custom,
            root: None,
            file: Some(PathBuf::from("glue.js")),
        };
        let err = locate_with(&config, &FakeProbe::default()).unwrap_err();
        assert!(matches!(err, ToolchainError::Unconfigured));
    }

    #[test]
    fn test_file_override_applies_to_tinygo() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("targets/wasm_exec_custom.js"), "// glue");

        let config = ToolchainConfig {
            kind: ToolchainKind::Tinygo,
            root: Some(dir.path().to_path_buf()),
            file: Some(PathBuf::from("targets/wasm_exec_custom.js")),
        };
        let found = locate_with(&config, &FakeProbe::default()).unwrap();
        assert_eq!(found.glue.file_name().unwrap(), "wasm_exec_custom.js");
    }
}
