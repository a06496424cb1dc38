//! Subprocess execution for build and package steps.
//!
//! Steps run strictly in sequence with inherited stdio so toolchain
//! diagnostics reach the operator unmodified. The process working directory
//! is switched with [`WorkDirGuard`] and restored when the guard drops.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::compose::Step;
use crate::error::{Error, Result};
use crate::timing::Timer;

/// Builder for a single external command.
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        }
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_os_string());
        }
        self
    }

    /// Run with inherited stdio and wait for it to finish.
    ///
    /// A non-zero exit is not an error here; callers decide what it means.
    pub fn status(self) -> Result<ExitStatus> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        cmd.status().map_err(|source| Error::Spawn {
            program: self.program.to_string_lossy().into_owned(),
            source,
        })
    }
}

/// Runs one step and reports its exit code.
pub trait Executor {
    /// Execute `step` in the current working directory.
    ///
    /// Returns the exit code, or -1 if the process was killed by a signal.
    fn execute(&mut self, step: &Step) -> Result<i32>;
}

/// Executes steps as real subprocesses.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn execute(&mut self, step: &Step) -> Result<i32> {
        let status = Cmd::new(step.program()).args(step.args()).status()?;
        Ok(status.code().unwrap_or(-1))
    }
}

/// Scoped change of the process working directory.
///
/// Dropping the guard changes back to the directory that was current when it
/// was pushed, so nested guards unwind in LIFO order on every exit path.
#[derive(Debug)]
pub struct WorkDirGuard {
    previous: PathBuf,
}

impl WorkDirGuard {
    /// Change into `dir`, remembering the current directory.
    pub fn push(dir: &Path) -> Result<Self> {
        let previous = std::env::current_dir().map_err(|e| Error::filesystem(".", e))?;
        std::env::set_current_dir(dir).map_err(|e| Error::filesystem(dir, e))?;
        tracing::debug!(from = %previous.display(), to = %dir.display(), "pushd");
        Ok(Self { previous })
    }
}

impl Drop for WorkDirGuard {
    fn drop(&mut self) {
        match std::env::set_current_dir(&self.previous) {
            Ok(()) => tracing::debug!(to = %self.previous.display(), "popd"),
            Err(err) => tracing::warn!(
                "could not restore working directory {}: {}",
                self.previous.display(),
                err
            ),
        }
    }
}

/// Run `steps` in order inside `dir`, stopping at the first failure.
///
/// Each command line is echoed before it starts. Steps after a failing one
/// are never started, and nothing already done is undone.
pub fn run_steps<E: Executor + ?Sized>(executor: &mut E, dir: &Path, steps: &[Step]) -> Result<()> {
    let _cwd = WorkDirGuard::push(dir)?;

    for step in steps {
        println!("$ {}", step);
        let timer = Timer::start(step.name);
        let code = executor.execute(step)?;
        if code != 0 {
            tracing::debug!(step = step.name, code, "step failed");
            return Err(Error::SubprocessFailure {
                step: step.name.to_string(),
                command: step.command_line(),
                code,
            });
        }
        timer.finish();
    }

    Ok(())
}

/// Check if a program exists in PATH.
pub fn which(program: impl AsRef<OsStr>) -> Option<PathBuf> {
    which::which(program).ok()
}
