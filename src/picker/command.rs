//! Checks that run a shell command.
use crate::executor::Check;
use tokio::process::Command;

/// Construct a check that runs `cmd` through `sh -c`. The command succeeds
/// with its stdout when it exits with status 0 and fails with its stderr
/// otherwise. The child process is killed if the check times out.
pub fn command_check(cmd: impl Into<String>) -> Check {
    let cmd = cmd.into();
    Check::future(move || run_command(cmd.clone()))
}

async fn run_command(cmd: String) -> Result<String, String> {
    let mut command = Command::new("sh");
    command.arg("-c").arg(&cmd).kill_on_drop(true);

    let out = command
        .output()
        .await
        .map_err(|err| format!("{}: {}", cmd, err))?;

    let stdout = String::from_utf8_lossy(&out.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();

    if out.status.success() {
        return Ok(stdout);
    }

    if !stderr.is_empty() {
        Err(stderr)
    } else if !stdout.is_empty() {
        Err(stdout)
    } else {
        Err(format!("exit code {}", out.status.code().unwrap_or(-1)))
    }
}
