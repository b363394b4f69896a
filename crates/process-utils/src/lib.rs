//! Helpers for launching the external media tools.
//!
//! Every child process spawned by the service goes through these constructors
//! so that console windows stay hidden on Windows, stdin is never inherited and
//! long-running children die together with the future that awaits them.

use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Apply the Windows `CREATE_NO_WINDOW` flag to child processes.
///
/// On non-Windows targets this is a no-op.
pub trait NoWindowExt {
    fn no_window(&mut self) -> &mut Self;
}

impl NoWindowExt for std::process::Command {
    fn no_window(&mut self) -> &mut Self {
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            self.creation_flags(CREATE_NO_WINDOW);
        }
        self
    }
}

#[cfg(feature = "tokio")]
impl NoWindowExt for tokio::process::Command {
    fn no_window(&mut self) -> &mut Self {
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            self.as_std_mut().creation_flags(CREATE_NO_WINDOW);
        }
        self
    }
}

/// Create a blocking `std::process::Command` for short probes such as `--version`.
pub fn std_command(program: impl AsRef<OsStr>) -> std::process::Command {
    let mut cmd = std::process::Command::new(program);
    cmd.no_window().stdin(Stdio::null());
    cmd
}

/// Create a `tokio::process::Command` for a media job.
///
/// The child is killed if the returned command's `Child` handle is dropped
/// before the process exits.
#[cfg(feature = "tokio")]
pub fn tokio_command(program: impl AsRef<OsStr>) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(program);
    cmd.no_window().stdin(Stdio::null()).kill_on_drop(true);
    cmd
}

/// Run `program <flag>` and return the first non-empty line it prints.
///
/// Returns `None` when the binary cannot be executed or exits unsuccessfully.
pub fn probe_version(program: impl AsRef<OsStr>, flag: &str) -> Option<String> {
    let output = std_command(program).arg(flag).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Short description of how a process terminated.
pub fn describe_exit(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exited with code {code}"),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_version_missing_binary() {
        assert_eq!(
            probe_version("definitely-not-a-real-binary-7f3a", "--version"),
            None
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_describe_exit() {
        use std::os::unix::process::ExitStatusExt;

        assert_eq!(describe_exit(&ExitStatus::from_raw(0)), "exited with code 0");
        // Raw wait status 256 encodes exit code 1.
        assert_eq!(describe_exit(&ExitStatus::from_raw(256)), "exited with code 1");
        // Raw wait status 9 encodes termination by SIGKILL.
        assert_eq!(describe_exit(&ExitStatus::from_raw(9)), "terminated by signal");
    }
}
