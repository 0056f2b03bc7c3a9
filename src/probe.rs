use std::{
    ffi::OsString,
    io::{BufRead, BufReader},
    process::{Child, ChildStdout, Command, ExitStatus, Stdio},
    thread,
};

use crate::error::AppError;

/// Arguments that keep ping running until it is killed.
pub fn ping_args(target: &str) -> Vec<OsString> {
    if cfg!(windows) {
        // Windows ping stops after 4 replies without -t
        vec!["-t".into(), target.into()]
    } else {
        vec![target.into()]
    }
}

/// The running ping process. Killed and reaped on drop.
pub struct PingProbe {
    program: String,
    process: Option<Child>,
    stopped: bool,
}

impl PingProbe {
    /// <program> [-t] <target>
    pub fn spawn(program: &str, target: &str) -> Result<Self, AppError> {
        let mut child = Command::new(program)
            .args(ping_args(target))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| AppError::Spawn {
                program: program.to_string(),
                source,
            })?;

        tracing::info!(program, host = target, pid = child.id(), "probe started");

        if let Some(stderr) = child.stderr.take() {
            thread::spawn(move || {
                for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                    let line = line.trim();
                    if !line.is_empty() {
                        tracing::warn!(stderr = line, "probe");
                    }
                }
            });
        }

        Ok(Self {
            program: program.to_string(),
            process: Some(child),
            stopped: false,
        })
    }

    pub fn take_stdout(&mut self) -> Result<BufReader<ChildStdout>, AppError> {
        self.process
            .as_mut()
            .and_then(|child| child.stdout.take())
            .map(BufReader::new)
            .ok_or(AppError::MissingStdout)
    }

    /// Kill the process. Its stdout closes, which ends the reader.
    pub fn stop(&mut self) {
        let Some(child) = self.process.as_mut() else {
            return;
        };
        // exited on its own: leave the status for wait() to report
        if let Ok(Some(status)) = child.try_wait() {
            tracing::info!(program = %self.program, %status, "probe already exited");
            return;
        }
        if child.kill().is_ok() {
            self.stopped = true;
            tracing::info!(program = %self.program, "probe stopped");
        }
    }

    /// Reap the process. A failure status only counts when we did not kill it.
    pub fn wait(&mut self) -> Result<(), AppError> {
        let Some(mut child) = self.process.take() else {
            return Ok(());
        };
        let status = child.wait().map_err(AppError::Wait)?;
        check_status(status, self.stopped)
    }
}

fn check_status(status: ExitStatus, stopped: bool) -> Result<(), AppError> {
    if status.success() || stopped {
        Ok(())
    } else {
        Err(AppError::ProbeFailed(status))
    }
}

impl Drop for PingProbe {
    fn drop(&mut self) {
        if let Some(mut child) = self.process.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
