use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Command;
use tokio::time::timeout;

/// Wall-clock bound applied to compiler invocations
pub const COMPILE_TIMEOUT: Duration = Duration::from_secs(30);

/// Combined output and exit status of a stage process that ran to completion
#[derive(Debug)]
pub struct StageOutput {
    pub output: String,
    pub success: bool,
    pub status: Option<i32>,
}

/// What the stage observed: process completion or timer expiry.
/// Exactly one of the two is ever produced for a given invocation.
#[derive(Debug)]
pub enum StageOutcome {
    Completed(StageOutput),
    TimedOut,
}

/// Invokes `program` with `args` inside `work_dir`, captures its combined
/// stdout+stderr, and races completion against `budget`.
///
/// The race is single-resolution: `tokio::time::timeout` polls the wait
/// future against the timer and the first to resolve wins. On expiry the
/// wait future is dropped, and `kill_on_drop` delivers SIGKILL to the
/// still-running child. The kill is not escalated to the process tree, so
/// grandchildren spawned by the program may survive.
pub async fn invoke(
    program: &str,
    args: &[String],
    work_dir: &Path,
    budget: Duration,
) -> Result<StageOutcome> {
    let child = Command::new(program)
        .args(args)
        .current_dir(work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to launch {program}"))?;

    match timeout(budget, child.wait_with_output()).await {
        Ok(result) => {
            let out = result.with_context(|| format!("failed to collect output of {program}"))?;
            let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
            output.push_str(&String::from_utf8_lossy(&out.stderr));
            Ok(StageOutcome::Completed(StageOutput {
                output,
                success: out.status.success(),
                status: out.status.code(),
            }))
        }
        Err(_elapsed) => Ok(StageOutcome::TimedOut),
    }
}
