//! Monitored execution of a long-running external tool.

use crate::{ControlState, ControlToken, Error, ProgressFn, Result};
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

/// How often the control token is re-checked while waiting on the tool.
const PAUSE_POLL: Duration = Duration::from_millis(250);

/// Segments buffered ahead of the monitor. Once full, the reader thread stops
/// draining stdout and a paused tool stalls on its pipe.
const SEGMENT_BACKLOG: usize = 64;

/// Line parser turning a chunk of tool output into a percentage.
pub type ProgressParser = fn(&str) -> Option<f32>;

/// Spawn `command`, stream its stdout, and wait for it to exit.
///
/// Output is split on both `\n` and `\r` so tools that redraw a status line
/// still produce progress updates. Stdout is read on a worker thread and the
/// control token is re-checked every quarter second, whether or not
/// the tool is printing: a pause stops consuming output (the child stalls
/// once its pipe fills), a cancel kills the child.
///
/// # Errors
///
/// - [`Error::ToolNotFound`] if the program cannot be spawned because it
///   does not exist.
/// - [`Error::Cancelled`] if the token was cancelled before the tool exited.
/// - [`Error::ToolFailed`] if the tool exits with a non-zero status.
pub fn run_monitored(
    tool: &str,
    mut command: Command,
    control: &ControlToken,
    parser: ProgressParser,
    on_progress: Option<ProgressFn<'_>>,
) -> Result<()> {
    #[cfg(feature = "tracing")]
    tracing::debug!("Spawning {}: {:?}", tool, command);

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_not_found(tool)
            } else {
                Error::Io(e)
            }
        })?;

    // stderr is drained on its own thread so a chatty tool cannot block on it
    let stderr_reader = child.stderr.take().map(|mut stderr| {
        std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf);
            buf
        })
    });

    let stdout = match child.stdout.take() {
        Some(stdout) => stdout,
        None => {
            kill(&mut child);
            return Err(Error::tool_failed(tool, "stdout was not captured"));
        }
    };

    let (tx, rx) = mpsc::sync_channel::<std::io::Result<Vec<u8>>>(SEGMENT_BACKLOG);
    std::thread::spawn(move || {
        let mut reader = BufReader::new(stdout);
        loop {
            let mut segment = Vec::new();
            let message = match read_segment(&mut reader, &mut segment) {
                Ok(true) => Ok(segment),
                Ok(false) => break,
                Err(e) => Err(e),
            };
            let failed = message.is_err();
            if tx.send(message).is_err() || failed {
                break;
            }
        }
    });

    let mut last_reported: Option<f32> = None;

    loop {
        if control.is_paused() {
            #[cfg(feature = "tracing")]
            tracing::info!("{} paused", tool);
        }
        if control.wait_while_paused(PAUSE_POLL) == ControlState::Cancelled {
            #[cfg(feature = "tracing")]
            tracing::warn!("Cancelling {}", tool);
            kill(&mut child);
            return Err(Error::cancelled(tool));
        }

        let segment = match rx.recv_timeout(PAUSE_POLL) {
            Ok(Ok(segment)) => segment,
            Ok(Err(e)) => {
                kill(&mut child);
                return Err(Error::Io(e));
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let line = String::from_utf8_lossy(&segment);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!("{}: {}", tool, line);

        if let Some(pct) = parser(line) {
            if last_reported != Some(pct) {
                last_reported = Some(pct);
                if let Some(cb) = on_progress {
                    cb(pct);
                }
            }
        }
    }

    let status = child.wait()?;
    let stderr = stderr_reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    if !status.success() {
        return Err(Error::tool_failed(
            tool,
            format!("exited with status {}: {}", status, stderr.trim()),
        ));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("{} finished", tool);

    Ok(())
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Read bytes up to the next `\n` or `\r` into `buf`, dropping the delimiter.
///
/// Returns `false` once the stream is exhausted and nothing was read.
pub fn read_segment<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<bool> {
    buf.clear();
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(!buf.is_empty());
        }

        match available.iter().position(|b| *b == b'\n' || *b == b'\r') {
            Some(i) => {
                buf.extend_from_slice(&available[..i]);
                reader.consume(i + 1);
                return Ok(true);
            }
            None => {
                let len = available.len();
                buf.extend_from_slice(available);
                reader.consume(len);
            }
        }
    }
}
