//! Pipeline execution: realizing a planned [`Pipeline`] as a chain of OS
//! processes connected by anonymous pipes.
//!
//! Process creation sits behind the [`Launcher`] trait so the stage loop —
//! launch order, descriptor topology, and reaping — can be exercised in
//! tests with a recording fake instead of real processes. The production
//! implementation is [`OsLauncher`].

use crate::parser::{Pipeline, Stage};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use thiserror::Error;

/// Conventional process exit code: 0 for success, non-zero for failure.
pub type ExitCode = i32;

/// Errors raised while launching or reaping pipeline stages.
#[derive(Debug, Error)]
pub enum ExecError {
    /// A stage had no tokens, e.g. a `|` at the start or end of the line.
    #[error("empty command")]
    EmptyStage,
    /// The stage's program could not be started (bad path, not executable,
    /// permission denied, fork/pipe failure).
    #[error("{program}: {source}")]
    Spawn {
        program: String,
        source: io::Error,
    },
    /// Waiting on an already-launched stage failed.
    #[error("wait: {0}")]
    Wait(io::Error),
}

/// Where one stage's standard streams connect within its pipeline.
///
/// Only the interior edges are described: a `false` on either side means the
/// stream is inherited from the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wiring {
    /// Standard input comes from the previous stage's pipe.
    pub stdin_from_pipe: bool,
    /// Standard output feeds the next stage's pipe.
    pub stdout_to_pipe: bool,
}

impl Wiring {
    /// Topology for stage `index` of a pipeline with `total` stages.
    pub fn for_stage(index: usize, total: usize) -> Self {
        Self {
            stdin_from_pipe: index > 0,
            stdout_to_pipe: index + 1 < total,
        }
    }
}

/// Capability to start and reap one stage process.
///
/// Implementations own whatever plumbing connects consecutive stages; the
/// contract is that a stage launched with `stdin_from_pipe` reads what the
/// previously launched stage wrote.
pub trait Launcher {
    type Handle;

    /// Starts the stage's program with the given stream topology.
    fn launch(&mut self, stage: &Stage, wiring: Wiring) -> Result<Self::Handle, ExecError>;

    /// Blocks until the process behind `handle` terminates.
    fn wait(&mut self, handle: Self::Handle) -> Result<ExitCode, ExecError>;
}

/// Runs every stage of `pipeline` and reaps every process that was started.
///
/// Stages are launched left to right; data flows in the same direction
/// through the pipes regardless of scheduling. The call returns only once
/// all launched stages have been waited for, in launch order, so no child
/// outlives it.
///
/// If a stage fails to launch, the stages after it are never started, but
/// the ones before it are still reaped before the error is reported; an
/// upstream writer sees its pipe close and terminates rather than blocking
/// forever. The returned code is the last stage's exit code.
pub fn execute<L: Launcher>(launcher: &mut L, pipeline: &Pipeline) -> Result<ExitCode, ExecError> {
    let total = pipeline.stages().len();
    let mut handles = Vec::with_capacity(total);
    let mut failure = None;

    for (index, stage) in pipeline.stages().iter().enumerate() {
        match launcher.launch(stage, Wiring::for_stage(index, total)) {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    let mut last_code = 0;
    let mut wait_failure = None;
    for handle in handles {
        match launcher.wait(handle) {
            Ok(code) => last_code = code,
            Err(err) if wait_failure.is_none() => wait_failure = Some(err),
            Err(_) => {}
        }
    }

    if let Some(err) = failure {
        return Err(err);
    }
    if let Some(err) = wait_failure {
        return Err(err);
    }
    Ok(last_code)
}

/// [`Launcher`] backed by `std::process`.
///
/// Consecutive piped stages are connected by handing the previous child's
/// captured stdout to the next child's stdin. Ownership does the descriptor
/// discipline: once the read end moves into the next `Command` (or is
/// dropped on a failure path) neither side holds a stray copy, so EOF
/// propagates down the chain as soon as an upstream stage exits.
pub struct OsLauncher {
    pending_stdout: Option<ChildStdout>,
}

impl OsLauncher {
    pub fn new() -> Self {
        Self {
            pending_stdout: None,
        }
    }

    /// Resolves a program token to the path actually executed.
    ///
    /// No `PATH` search is performed: a token containing a separator is used
    /// as-is, and a bare name is taken relative to the current working
    /// directory.
    fn resolve(program: &str) -> PathBuf {
        let path = Path::new(program);
        if path.is_absolute() || program.contains('/') {
            path.to_path_buf()
        } else {
            Path::new(".").join(path)
        }
    }
}

impl Default for OsLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl Launcher for OsLauncher {
    type Handle = Child;

    fn launch(&mut self, stage: &Stage, wiring: Wiring) -> Result<Child, ExecError> {
        // Taken up front so every failure path below drops the read end of
        // the upstream pipe, letting the writer terminate on EPIPE.
        let upstream = self.pending_stdout.take();

        let Some(program) = stage.program() else {
            return Err(ExecError::EmptyStage);
        };

        let mut command = Command::new(Self::resolve(program));
        command.args(stage.args());
        command.stdin(match upstream {
            Some(out) => Stdio::from(out),
            None => Stdio::inherit(),
        });
        if wiring.stdout_to_pipe {
            command.stdout(Stdio::piped());
        }

        let mut child = command.spawn().map_err(|source| ExecError::Spawn {
            program: program.to_owned(),
            source,
        })?;
        if wiring.stdout_to_pipe {
            self.pending_stdout = child.stdout.take();
        }
        Ok(child)
    }

    fn wait(&mut self, mut handle: Child) -> Result<ExitCode, ExecError> {
        // Child::wait targets exactly this pid, ignoring unrelated children.
        let status = handle.wait().map_err(ExecError::Wait)?;
        Ok(exit_code(status))
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(code) = status.code() {
        code
    } else if let Some(signal) = ExitStatusExt::signal(&status) {
        128 + signal
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> ExitCode {
    status.code().unwrap_or(-1)
}
