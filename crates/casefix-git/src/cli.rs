//! [`GitBackend`] that shells out to the `git` executable

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use casefix_fs::NormalizedPath;

use crate::backend::GitBackend;
use crate::{Error, Result};

/// Environment variable overriding the git executable.
pub const ENV_GIT_BIN: &str = "CASEFIX_GIT_BIN";

/// Seam for spawning processes, so tests can observe the exact invocations.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &Path, cwd: &Path, args: &[OsString]) -> io::Result<Output>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessCommandRunner;

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, program: &Path, cwd: &Path, args: &[OsString]) -> io::Result<Output> {
        Command::new(program).args(args).current_dir(cwd).output()
    }
}

/// Git index access through `git ls-files`, `git rm --cached` and `git add`.
pub struct GitCli<R: CommandRunner = ProcessCommandRunner> {
    runner: R,
    binary: PathBuf,
}

impl GitCli<ProcessCommandRunner> {
    /// Use `$CASEFIX_GIT_BIN` when set, otherwise `git` from `PATH`.
    pub fn from_env() -> Result<Self> {
        let binary = std::env::var_os(ENV_GIT_BIN)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("git"));
        if binary.as_os_str().is_empty() {
            return Err(Error::GitUnavailable {
                binary,
                message: format!("{ENV_GIT_BIN} is set but empty"),
            });
        }
        Ok(Self::with_runner(ProcessCommandRunner, binary))
    }
}

impl<R: CommandRunner> GitCli<R> {
    pub fn with_runner(runner: R, binary: PathBuf) -> Self {
        Self { runner, binary }
    }

    fn run_git(&self, root: &NormalizedPath, args: Vec<OsString>) -> Result<Output> {
        let cwd = root.to_native();
        let output = self
            .runner
            .run(&self.binary, &cwd, &args)
            .map_err(|e| Error::GitUnavailable {
                binary: self.binary.clone(),
                message: e.to_string(),
            })?;

        if output.status.success() {
            return Ok(output);
        }

        let command = args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        Err(Error::CommandFailed {
            command,
            root: cwd,
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        })
    }

    /// `base` followed by `--` and `paths`, with pathspec globbing turned
    /// off so names like `a[1].txt` match only themselves.
    fn with_paths(base: &[&str], paths: &[String]) -> Vec<OsString> {
        std::iter::once("--literal-pathspecs")
            .chain(base.iter().copied())
            .chain(std::iter::once("--"))
            .map(OsString::from)
            .chain(paths.iter().map(OsString::from))
            .collect()
    }
}

/// Split `ls-files -z` output into paths, dropping blanks and repeats.
///
/// With `-z` git neither quotes nor escapes names, so quotes, backslashes,
/// tabs and newlines arrive verbatim.
pub(crate) fn parse_nul_separated(stdout: &[u8]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    stdout
        .split(|&b| b == 0)
        .filter(|raw| !raw.is_empty())
        .map(|raw| String::from_utf8_lossy(raw).into_owned())
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

impl<R: CommandRunner> GitBackend for GitCli<R> {
    fn list_tracked_files(&self, root: &NormalizedPath) -> Result<Vec<String>> {
        let args = ["ls-files", "-z"]
            .into_iter()
            .map(OsString::from)
            .collect();
        let output = self.run_git(root, args)?;
        let paths = parse_nul_separated(&output.stdout);
        tracing::debug!(repo = %root, count = paths.len(), "Listed tracked files");
        Ok(paths)
    }

    fn unindex(&self, root: &NormalizedPath, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        self.run_git(root, Self::with_paths(&["rm", "--cached", "--quiet"], paths))?;
        Ok(())
    }

    fn reindex(&self, root: &NormalizedPath, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        self.run_git(root, Self::with_paths(&["add", "--ignore-errors"], paths))?;
        Ok(())
    }
}
