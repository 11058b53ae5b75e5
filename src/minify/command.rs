//! External minifier invocation.
//!
//! `$GLUE_*` placeholders in the configured command are substituted before
//! the process is spawned and also exported as environment variables.
//! Scratch files live next to the destination so they share its filesystem
//! and are removed when dropped.

use super::{MinifyError, MinifyJob};
use crate::debug;
use crate::utils::exec::Cmd;
use rustc_hash::FxHashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const INPUT: &str = "GLUE_INPUT";
const OUTPUT: &str = "GLUE_OUTPUT";

/// Replace `$GLUE_*` variables in command arguments.
pub fn resolve_args(args: &[String], vars: &FxHashMap<String, String>) -> Vec<String> {
    args.iter()
        .map(|arg| {
            let mut result = arg.clone();
            for (key, value) in vars {
                result = result.replace(&format!("${key}"), value);
            }
            result
        })
        .collect()
}

fn uses_var(command: &[String], name: &str) -> bool {
    let pattern = format!("${name}");
    command.iter().any(|arg| arg.contains(&pattern))
}

/// Scratch file in `dir` carrying the same extension as `like`.
fn scratch_file(dir: &Path, like: &Path) -> Result<NamedTempFile, MinifyError> {
    let suffix = like
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    tempfile::Builder::new()
        .prefix(".gluesync-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(|source| MinifyError::Io {
            path: dir.to_path_buf(),
            source,
        })
}

/// Run `command` over `content` and return the minified bytes.
pub fn run(
    command: &[String],
    job: &MinifyJob<'_>,
    content: &[u8],
) -> Result<Vec<u8>, MinifyError> {
    let program = command.first().cloned().unwrap_or_default();
    if program.is_empty() {
        return Err(MinifyError::Command {
            program,
            message: "no minifier command configured".into(),
        });
    }

    let dir = job.dest.parent().unwrap_or(Path::new("."));

    let mut vars = FxHashMap::default();
    vars.insert("GLUE_SOURCE".to_owned(), job.source.display().to_string());
    vars.insert("GLUE_DEST".to_owned(), job.dest.display().to_string());

    let staged_input = if uses_var(command, INPUT) {
        let mut file = scratch_file(dir, job.dest)?;
        file.write_all(content)
            .and_then(|()| file.flush())
            .map_err(|source| MinifyError::Io {
                path: file.path().to_path_buf(),
                source,
            })?;
        vars.insert(INPUT.to_owned(), file.path().display().to_string());
        Some(file)
    } else {
        None
    };

    let output_file = if uses_var(command, OUTPUT) {
        let file = scratch_file(dir, job.dest)?;
        vars.insert(OUTPUT.to_owned(), file.path().display().to_string());
        Some(file)
    } else {
        None
    };

    let resolved = resolve_args(command, &vars);
    debug!("minify"; "running `{}`", resolved.join(" "));

    let mut cmd = Cmd::from_slice(&resolved).cwd(dir).envs(&vars);
    if staged_input.is_none() {
        cmd = cmd.stdin(content);
    }
    let output = cmd.run().map_err(|err| MinifyError::Command {
        program: program.clone(),
        message: format!("{err:#}"),
    })?;

    let minified = match &output_file {
        Some(file) => fs::read(file.path()).map_err(|source| MinifyError::Io {
            path: file.path().to_path_buf(),
            source,
        })?,
        None => output.stdout,
    };
    Ok(minified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_args() {
        let mut vars = FxHashMap::default();
        vars.insert("GLUE_INPUT".to_owned(), "/tmp/in.js".to_owned());
        vars.insert("GLUE_OUTPUT".to_owned(), "/tmp/out.js".to_owned());

        let resolved = resolve_args(
            &strings(&["uglifyjs", "$GLUE_INPUT", "--output=$GLUE_OUTPUT", "-c"]),
            &vars,
        );
        assert_eq!(
            resolved,
            strings(&["uglifyjs", "/tmp/in.js", "--output=/tmp/out.js", "-c"])
        );
    }

    #[test]
    fn test_uses_var() {
        let command = strings(&["terser", "$GLUE_INPUT"]);
        assert!(uses_var(&command, INPUT));
        assert!(!uses_var(&command, OUTPUT));
    }

    #[test]
    fn test_empty_command() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("wasm_exec.js");
        let job = MinifyJob {
            source: &dest,
            dest: &dest,
        };
        let err = run(&[], &job, b"x").unwrap_err();
        assert!(matches!(err, MinifyError::Command { .. }));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;

        fn job_in(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
            (dir.path().join("src.js"), dir.path().join("wasm_exec.js"))
        }

        #[test]
        fn test_stdin_to_stdout() {
            let dir = TempDir::new().unwrap();
            let (source, dest) = job_in(&dir);
            let job = MinifyJob {
                source: &source,
                dest: &dest,
            };
            let out = run(&strings(&["tr", "-d", " "]), &job, b"a b c").unwrap();
            assert_eq!(out, b"abc");
        }

        #[test]
        fn test_input_output_files() {
            let dir = TempDir::new().unwrap();
            let (source, dest) = job_in(&dir);
            let job = MinifyJob {
                source: &source,
                dest: &dest,
            };
            let command = strings(&[
                "sh",
                "-c",
                "tr -d ' ' < \"$0\" > \"$1\"",
                "$GLUE_INPUT",
                "$GLUE_OUTPUT",
            ]);
            let out = run(&command, &job, b"x = 1 ;").unwrap();
            assert_eq!(out, b"x=1;");

            // scratch files are gone
            let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
            assert!(leftovers.is_empty());
        }

        #[test]
        fn test_env_vars_exported() {
            let dir = TempDir::new().unwrap();
            let (source, dest) = job_in(&dir);
            let job = MinifyJob {
                source: &source,
                dest: &dest,
            };
            let command = strings(&["sh", "-c", "cat >/dev/null; printf %s \"$GLUE_SOURCE\""]);
            let out = run(&command, &job, b"x").unwrap();
            assert_eq!(out, source.display().to_string().into_bytes());
        }

        #[test]
        fn test_failing_command() {
            let dir = TempDir::new().unwrap();
            let (source, dest) = job_in(&dir);
            let job = MinifyJob {
                source: &source,
                dest: &dest,
            };
            let command = strings(&["sh", "-c", "cat >/dev/null; echo boom >&2; exit 3"]);
            let err = run(&command, &job, b"x").unwrap_err();
            let MinifyError::Command { program, message } = err else {
                panic!("expected Command error");
            };
            assert_eq!(program, "sh");
            assert!(message.contains("boom"));
        }

        #[test]
        fn test_missing_program() {
            let dir = TempDir::new().unwrap();
            let (source, dest) = job_in(&dir);
            let job = MinifyJob {
                source: &source,
                dest: &dest,
            };
            let err = run(&strings(&["gluesync-no-such-minifier"]), &job, b"x").unwrap_err();
            assert!(matches!(err, MinifyError::Command { .. }));
        }
    }
}
