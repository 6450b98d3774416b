//! Operating-system collaborator: directories, files, processes, and
//! multi-case concatenation.
use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

/// Run `command` with `stdin` redirected from a file and stdout into another.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionRequest<'a> {
    pub command: &'a str,
    pub stdin: &'a Path,
    pub stdout: &'a Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub success: bool,
    /// Human-readable exit status, e.g. `exit status: 1`.
    pub status: String,
    pub stderr: String,
}

pub trait OperatingSystem {
    /// Ensure `dir` exists; existing contents are left untouched.
    fn force_make_dir(&self, dir: &Path) -> Result<()>;

    fn write_file(&self, path: &Path, contents: &str) -> Result<()>;

    fn read_file(&self, path: &Path) -> Result<String>;

    /// Remove `path`; a file that is already gone is not an error.
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Errors mean the process could not be launched at all.
    fn execute(&self, request: &ExecutionRequest<'_>) -> Result<ExecutionResult>;

    /// Concatenate `<base>_1..=count` `.in` files into `<base>.in`. With
    /// `with_output` the `.out` files go into `<base>.out`; without it any
    /// existing `<base>.out` is removed.
    fn combine_multiple_test_cases(
        &self,
        base: &Path,
        count: usize,
        with_output: bool,
    ) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalOperatingSystem;

impl OperatingSystem for LocalOperatingSystem {
    fn force_make_dir(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).with_context(|| format!("write {}", path.display()))
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
                Err(err).with_context(|| format!("remove {}", path.display()))
            }
            _ => Ok(()),
        }
    }

    fn execute(&self, request: &ExecutionRequest<'_>) -> Result<ExecutionResult> {
        let args = shell_words::split(request.command)
            .with_context(|| format!("parse solution command: {}", request.command))?;
        if args.is_empty() {
            return Err(anyhow!("solution command is empty"));
        }

        let stdin = File::open(request.stdin)
            .with_context(|| format!("open {}", request.stdin.display()))?;
        let stdout = File::create(request.stdout)
            .with_context(|| format!("create {}", request.stdout.display()))?;

        let start = Instant::now();
        let output = Command::new(&args[0])
            .args(&args[1..])
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("spawn {}", args[0]))?;
        let elapsed_ms = start.elapsed().as_millis();

        tracing::debug!(
            elapsed_ms,
            command = request.command,
            success = output.status.success(),
            "solution finished"
        );

        Ok(ExecutionResult {
            success: output.status.success(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn combine_multiple_test_cases(
        &self,
        base: &Path,
        count: usize,
        with_output: bool,
    ) -> Result<()> {
        concatenate(base, count, "in")?;
        if with_output {
            concatenate(base, count, "out")
        } else {
            self.remove_file(&combined_file(base, "out"))
        }
    }
}

fn case_file(base: &Path, number: usize, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!("_{number}.{extension}"));
    PathBuf::from(name)
}

fn combined_file(base: &Path, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{extension}"));
    PathBuf::from(name)
}

/// Raw concatenation, published with a rename so a failed combine never leaves
/// a partial combined file behind.
fn concatenate(base: &Path, count: usize, extension: &str) -> Result<()> {
    let target = combined_file(base, extension);
    let dir = target
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut staged = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temporary file in {}", dir.display()))?;
    for number in 1..=count {
        let part = case_file(base, number, extension);
        let bytes = fs::read(&part).with_context(|| format!("read {}", part.display()))?;
        staged
            .write_all(&bytes)
            .with_context(|| format!("append {}", part.display()))?;
    }
    staged
        .persist(&target)
        .with_context(|| format!("publish {}", target.display()))?;
    Ok(())
}
