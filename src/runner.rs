use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// Code reported for every outcome where the process never exited on its own.
pub const FAILURE_CODE: i32 = 1;

/// Extra time allowed for the output pipe to reach EOF after the child exits.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Ran to completion. `output` is stdout+stderr, trimmed.
    Exited { code: i32, output: String },
    TimedOut { after: Duration },
    NotFound,
    LaunchFailed { message: String },
}

impl CommandOutcome {
    pub fn code(&self) -> i32 {
        match self {
            CommandOutcome::Exited { code, .. } => *code,
            _ => FAILURE_CODE,
        }
    }

    pub fn output(&self) -> &str {
        match self {
            CommandOutcome::Exited { output, .. } => output,
            _ => "",
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, CommandOutcome::Exited { .. })
    }

    pub fn failure_reason(&self) -> Option<String> {
        match self {
            CommandOutcome::Exited { .. } => None,
            CommandOutcome::TimedOut { after } => {
                Some(format!("timed out after {}", format_seconds(*after)))
            }
            CommandOutcome::NotFound => Some("not found".to_string()),
            CommandOutcome::LaunchFailed { message } => Some(message.clone()),
        }
    }

    /// `(exit N)`, followed by the failure reason when there is one.
    pub fn exit_marker(&self) -> String {
        match self.failure_reason() {
            Some(reason) => format!("(exit {}) {}", self.code(), reason),
            None => format!("(exit {})", self.code()),
        }
    }
}

/// Whole seconds as `8s`, anything finer as `0.3s`.
fn format_seconds(duration: Duration) -> String {
    if duration.subsec_nanos() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}s", duration.as_secs_f32())
    }
}

/// Runs `program` with stderr merged into stdout, killing it once `timeout`
/// elapses. Never fails: every error becomes a `CommandOutcome`.
pub fn run_command(program: &str, args: &[String], timeout: Duration) -> CommandOutcome {
    log::debug!(
        "running {} {:?} (timeout {}s)",
        program,
        args,
        timeout.as_secs_f32()
    );

    let outcome = match spawn_and_wait(program, args, timeout) {
        Ok(outcome) => outcome,
        Err(e) if e.kind() == io::ErrorKind::NotFound => CommandOutcome::NotFound,
        Err(e) => CommandOutcome::LaunchFailed {
            message: format!("failed to run {}: {}", program, e),
        },
    };

    match &outcome {
        CommandOutcome::Exited { code, output } => {
            log::debug!("{} exited with {} ({} bytes)", program, code, output.len())
        }
        other => log::warn!("{}: {}", program, other.exit_marker()),
    }
    outcome
}

fn spawn_and_wait(program: &str, args: &[String], timeout: Duration) -> io::Result<CommandOutcome> {
    let (reader, writer) = io::pipe()?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(writer.try_clone()?)
        .stderr(writer);
    let mut child = command.spawn()?;
    // The parent's write ends must close or the reader never sees EOF.
    drop(command);

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut reader = reader;
        let mut buf = Vec::new();
        let result = reader.read_to_end(&mut buf).map(|_| buf);
        let _ = tx.send(result);
    });

    let started = Instant::now();
    let status = match child.wait_timeout(timeout)? {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(CommandOutcome::TimedOut { after: timeout });
        }
    };

    // A descendant that inherited the pipe can hold it open past the child's exit.
    let remaining = timeout.saturating_sub(started.elapsed()).max(DRAIN_GRACE);
    let bytes = match rx.recv_timeout(remaining) {
        Ok(result) => result?,
        Err(_) => return Ok(CommandOutcome::TimedOut { after: timeout }),
    };

    Ok(CommandOutcome::Exited {
        code: exit_code(status),
        output: String::from_utf8_lossy(&bytes).trim().to_string(),
    })
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    FAILURE_CODE
}
