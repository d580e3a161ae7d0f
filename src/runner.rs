//! Child process execution for external clients.

use anyhow::{anyhow, Context, Result};
use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Output captured from a single client invocation.
pub(crate) struct CommandOutput {
    pub(crate) exit_code: Option<i32>,
    pub(crate) timed_out: bool,
    pub(crate) wall_time_ms: u64,
    pub(crate) stdout: Vec<u8>,
    pub(crate) stderr: Vec<u8>,
}

impl CommandOutput {
    pub(crate) fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Run `argv` to completion, killing its process group after `timeout`.
///
/// The child gets its own session so that helpers it spawns are killed too.
pub(crate) fn run_with_timeout(argv: &[String], timeout: Duration) -> Result<CommandOutput> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| anyhow!("command is empty"))?;
    let mut command = Command::new(program);
    command.args(args);
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());
    unsafe {
        command.pre_exec(new_session);
    }

    let mut child = command
        .spawn()
        .with_context(|| format!("spawn {program}"))?;
    let pid = child.id();
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr not captured"))?;

    let stdout_handle = thread::spawn(move || read_all(stdout));
    let stderr_handle = thread::spawn(move || read_all(stderr));

    let start = Instant::now();
    let mut timed_out = false;
    let exit_status = loop {
        if let Some(status) = child.try_wait().context("poll child")? {
            break status;
        }
        if start.elapsed() > timeout {
            timed_out = true;
            kill_process_group(pid);
            break child.wait().context("reap child")?;
        }
        thread::sleep(Duration::from_millis(5));
    };

    let wall_time_ms = start.elapsed().as_millis() as u64;
    let stdout = stdout_handle
        .join()
        .unwrap_or_else(|_| Ok(Vec::new()))
        .context("read stdout")?;
    let stderr = stderr_handle
        .join()
        .unwrap_or_else(|_| Ok(Vec::new()))
        .context("read stderr")?;

    Ok(CommandOutput {
        exit_code: exit_status.code(),
        timed_out,
        wall_time_ms,
        stdout,
        stderr,
    })
}

fn new_session() -> io::Result<()> {
    if unsafe { libc::setsid() } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn kill_process_group(pid: u32) {
    unsafe {
        libc::kill(-(pid as i32), libc::SIGKILL);
    }
}

fn read_all(mut reader: impl io::Read) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| part.to_string()).collect()
    }

    #[test]
    fn captures_output_and_exit_code() {
        let output = run_with_timeout(
            &argv(&["sh", "-c", "echo out; echo err >&2; exit 3"]),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.timed_out);
        assert!(!output.success());
        assert_eq!(output.stdout, b"out\n");
        assert_eq!(output.stderr, b"err\n");
    }

    #[test]
    fn kills_on_timeout() {
        let output =
            run_with_timeout(&argv(&["sh", "-c", "sleep 30"]), Duration::from_millis(100)).unwrap();
        assert!(output.timed_out);
        assert!(!output.success());
        assert!(output.wall_time_ms < 10_000);
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(run_with_timeout(&[], Duration::from_secs(1)).is_err());
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        let err = run_with_timeout(
            &argv(&["/nonexistent/object-store-client"]),
            Duration::from_secs(1),
        )
        .err()
        .expect("spawn error");
        assert!(format!("{err:#}").contains("spawn"));
    }
}
