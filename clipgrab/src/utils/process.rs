//! Running external tools and capturing what they print.

use std::process::{ExitStatus, Stdio};
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Output from a finished command.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    /// Wall-clock runtime in seconds.
    pub duration: f64,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Last non-empty stdout line.
    pub fn last_stdout_line(&self) -> Option<&str> {
        self.stdout
            .iter()
            .rev()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
    }

    /// Best single-line explanation of a failure.
    ///
    /// Prefers the last `ERROR:` line (yt-dlp style), then the last non-empty
    /// stderr line, then the exit status.
    pub fn error_summary(&self) -> String {
        let lines = || self.stderr.iter().rev().map(|l| l.trim()).filter(|l| !l.is_empty());

        if let Some(line) = lines().find(|l| l.starts_with("ERROR:")) {
            return line.trim_start_matches("ERROR:").trim().to_string();
        }
        if let Some(line) = lines().next() {
            return line.to_string();
        }
        process_utils::describe_exit(&self.status)
    }
}

fn collect_lines<R>(reader: R, stream: &'static str) -> JoinHandle<Vec<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        let mut collected = Vec::new();
        while let Ok(Some(line)) = lines.next_line().await {
            // Tools print normal progress on stderr; only escalate obvious errors.
            if line.to_lowercase().contains("error") {
                warn!(stream, "{}", line);
            } else {
                debug!(stream, "{}", line);
            }
            collected.push(line);
        }
        collected
    })
}

/// Run a command to completion, capturing stdout and stderr line by line.
///
/// Only spawn and wait failures are errors here; a non-zero exit is reported
/// through [`CommandOutput::status`] so callers can map it to their own error.
pub async fn run_command(command: &mut Command) -> std::io::Result<CommandOutput> {
    let start = Instant::now();

    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let mut child = command.spawn()?;

    let stdout_task = child.stdout.take().map(|s| collect_lines(s, "stdout"));
    let stderr_task = child.stderr.take().map(|s| collect_lines(s, "stderr"));

    let status = child.wait().await?;

    let stdout = match stdout_task {
        Some(task) => task.await.map_err(std::io::Error::other)?,
        None => Vec::new(),
    };
    let stderr = match stderr_task {
        Some(task) => task.await.map_err(std::io::Error::other)?,
        None => Vec::new(),
    };

    Ok(CommandOutput {
        status,
        duration: start.elapsed().as_secs_f64(),
        stdout,
        stderr,
    })
}
