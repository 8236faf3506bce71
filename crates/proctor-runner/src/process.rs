//! Interpreter execution over piped stdio.
//!
//! [`ProcessRunner`] implements [`ScriptExecutor`] by spawning
//! `<interpreter> <script>` in a new process group with all three standard
//! streams piped. Input is written on its own thread and the pipe is then
//! closed; stdout and stderr are drained by two further threads so a child
//! that fills one pipe while the agent waits on the other cannot deadlock.
//! The calling thread waits for exit, killing the whole process group if the
//! deadline passes. Once the interpreter has exited, anything it left running
//! in its group is killed too, and collecting the streams is bounded by the
//! same deadline.

use std::io::{self, Read, Write};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::agent::ScriptExecutor;
use crate::error::RunError;
use crate::protocol::{ExecutionRequest, ExecutionResult};

/// Tracing target for child process operations.
const PROCESS_TARGET: &str = "proctor_runner::process";

/// Runs scripts with a configured interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRunner {
    interpreter: PathBuf,
}

impl ProcessRunner {
    /// Creates a runner that launches `interpreter`.
    ///
    /// A bare program name is looked up on `PATH` when the child is spawned.
    #[must_use]
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    /// Returns the interpreter program.
    #[must_use]
    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    fn command(&self, request: &ExecutionRequest) -> Command {
        let mut command = Command::new(&self.interpreter);
        command
            .arg(request.script().as_path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0);
        if let Some(demotion) = request.demotion() {
            demotion.install(&mut command);
        }
        command
    }
}

impl ScriptExecutor for ProcessRunner {
    fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, RunError> {
        let started = Instant::now();
        debug!(
            target: PROCESS_TARGET,
            interpreter = %self.interpreter.display(),
            script = %request.script(),
            input_bytes = request.input().len(),
            demoted = request.demotion().is_some(),
            "spawning interpreter"
        );

        let mut child = self
            .command(request)
            .spawn()
            .map_err(|err| RunError::spawn_failed(&self.interpreter, err))?;
        let deadline = request.timeout().map(|timeout| started + timeout);
        let pipes = ChildPipes::attach(&mut child, request.input())?;

        // On timeout the stream threads are abandoned; a descendant that left
        // the group may keep them blocked.
        let status = wait_for_exit(&mut child, request.timeout())?;
        kill_stragglers(&child);
        let (stdout, stderr) = pipes.collect(deadline, request.timeout())?;

        let result = ExecutionResult::new(
            String::from_utf8_lossy(&stdout),
            String::from_utf8_lossy(&stderr),
            status.code(),
        );
        debug!(
            target: PROCESS_TARGET,
            ?status,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "interpreter exited"
        );
        Ok(result)
    }
}

/// Which standard stream a servicing thread handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdin,
    Stdout,
    Stderr,
}

impl Stream {
    const fn name(self) -> &'static str {
        match self {
            Self::Stdin => "stdin",
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

type StreamOutcome = (Stream, io::Result<Vec<u8>>);

/// Threads servicing the child's standard streams.
///
/// Each thread reports over a channel rather than being joined, so the
/// caller can stop waiting when the deadline passes.
struct ChildPipes {
    outcomes: Receiver<StreamOutcome>,
}

impl ChildPipes {
    fn attach(child: &mut Child, input: &str) -> Result<Self, RunError> {
        let stdin = take_stream(child.stdin.take(), Stream::Stdin)?;
        let stdout = take_stream(child.stdout.take(), Stream::Stdout)?;
        let stderr = take_stream(child.stderr.take(), Stream::Stderr)?;

        let (sender, outcomes) = mpsc::channel();
        let input = input.to_owned();
        let writer = sender.clone();
        thread::spawn(move || {
            let outcome = write_input(stdin, &input).map(|()| Vec::new());
            drop(writer.send((Stream::Stdin, outcome)));
        });
        let out = sender.clone();
        thread::spawn(move || drop(out.send((Stream::Stdout, read_all(stdout)))));
        thread::spawn(move || drop(sender.send((Stream::Stderr, read_all(stderr)))));
        Ok(Self { outcomes })
    }

    /// Gathers stdout and stderr, giving up with `Timeout` at `deadline`.
    fn collect(
        self,
        deadline: Option<Instant>,
        timeout: Option<Duration>,
    ) -> Result<(Vec<u8>, Vec<u8>), RunError> {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        for _ in 0..3 {
            let (stream, outcome) = self.next_outcome(deadline, timeout)?;
            let bytes = outcome.map_err(|err| RunError::io(stream.name(), err))?;
            match stream {
                Stream::Stdin => {}
                Stream::Stdout => stdout = bytes,
                Stream::Stderr => stderr = bytes,
            }
        }
        Ok((stdout, stderr))
    }

    fn next_outcome(
        &self,
        deadline: Option<Instant>,
        timeout: Option<Duration>,
    ) -> Result<StreamOutcome, RunError> {
        let panicked = || RunError::orchestration("stream thread panicked");
        let Some(cutoff) = deadline else {
            return self.outcomes.recv().map_err(|_| panicked());
        };
        let remaining = cutoff.saturating_duration_since(Instant::now());
        match self.outcomes.recv_timeout(remaining) {
            Ok(outcome) => Ok(outcome),
            Err(RecvTimeoutError::Disconnected) => Err(panicked()),
            Err(RecvTimeoutError::Timeout) => {
                let timeout_secs = timeout.map_or(0, |limit| limit.as_secs());
                warn!(
                    target: PROCESS_TARGET,
                    timeout_secs,
                    "streams still open at the deadline, abandoning them"
                );
                Err(RunError::Timeout { timeout_secs })
            }
        }
    }
}

fn take_stream<T>(stream: Option<T>, which: Stream) -> Result<T, RunError> {
    stream.ok_or_else(|| {
        RunError::orchestration(format!("child {} was not captured", which.name()))
    })
}

/// Writes the whole input and closes the pipe.
///
/// A child that exits or closes stdin before reading everything produces a
/// broken pipe, which is not a failure of the run.
fn write_input(mut stdin: impl Write, input: &str) -> io::Result<()> {
    match stdin.write_all(input.as_bytes()).and_then(|()| stdin.flush()) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
            debug!(target: PROCESS_TARGET, "child closed stdin before reading all input");
            Ok(())
        }
        other => other,
    }
}

fn read_all(mut stream: impl Read) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    stream.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Waits for the child, enforcing the deadline if one is set.
fn wait_for_exit(child: &mut Child, timeout: Option<Duration>) -> Result<ExitStatus, RunError> {
    let Some(timeout) = timeout else {
        return child.wait().map_err(|err| RunError::io("wait", err));
    };
    if let Some(status) = child
        .wait_timeout(timeout)
        .map_err(|err| RunError::io("wait", err))?
    {
        return Ok(status);
    }

    let timeout_secs = timeout.as_secs();
    warn!(
        target: PROCESS_TARGET,
        pid = child.id(),
        timeout_secs,
        "script timed out, killing process group"
    );
    kill_group(child);
    drop(child.wait());
    Err(RunError::Timeout { timeout_secs })
}

/// Kills whatever the exited interpreter left behind in its process group.
///
/// The group usually no longer exists, so failures are only logged.
fn kill_stragglers(child: &Child) {
    let Ok(raw) = i32::try_from(child.id()) else {
        return;
    };
    if signal::killpg(Pid::from_raw(raw), Signal::SIGKILL).is_ok() {
        debug!(target: PROCESS_TARGET, pgid = raw, "killed leftover group members");
    }
}

/// Sends `SIGKILL` to the child's process group, falling back to the child.
fn kill_group(child: &mut Child) {
    let group = i32::try_from(child.id()).map(Pid::from_raw);
    let signalled = group.is_ok_and(|pid| signal::killpg(pid, Signal::SIGKILL).is_ok());
    if !signalled {
        drop(child.kill());
    }
}
