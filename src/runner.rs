use std::ffi::OsString;
use std::io::{self, Read as _};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

/// An external command to run: program, arguments, and an optional wall
/// clock limit.
#[derive(Clone, Debug)]
pub struct CommandSpec {
    program: String,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args_os(&self) -> &[OsString] {
        &self.args
    }

    /// Render the invocation for logs. Lossy on non-UTF-8 arguments.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("command '{program}' not found on PATH")]
    NotFound { program: String },
    #[error("failed to spawn '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("'{program}' exited with {}: {stderr}", exit_code_label(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("'{program}' exceeded the {timeout:?} time limit and was killed")]
    TimedOut { program: String, timeout: Duration },
    #[error("failed to wait on '{program}'")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code (killed by signal?)".to_string(),
    }
}

/// Seam for running external commands, so pipelines can be tested without
/// spawning anything.
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<(), RunError>;
}

/// Runs commands through [`std::process::Command`], capturing stderr for
/// error reporting.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<(), RunError> {
        let mut child = Command::new(spec.program())
            .args(spec.args_os())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    RunError::NotFound {
                        program: spec.program().to_string(),
                    }
                } else {
                    RunError::Spawn {
                        program: spec.program().to_string(),
                        source,
                    }
                }
            })?;

        // Drain stderr concurrently so a chatty child cannot fill the pipe
        // and deadlock against our wait.
        let stderr = child.stderr.take();
        let drain = std::thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_end(&mut buf);
            }
            buf
        });

        let status = match spec.timeout {
            None => child.wait().map_err(|source| RunError::Wait {
                program: spec.program().to_string(),
                source,
            })?,
            Some(limit) => {
                match wait_with_deadline(&mut child, limit).map_err(|source| RunError::Wait {
                    program: spec.program().to_string(),
                    source,
                })? {
                    Some(status) => status,
                    None => {
                        return Err(RunError::TimedOut {
                            program: spec.program().to_string(),
                            timeout: limit,
                        });
                    }
                }
            }
        };

        let stderr = drain.join().unwrap_or_default();
        if status.success() {
            Ok(())
        } else {
            Err(RunError::Failed {
                program: spec.program().to_string(),
                code: status.code(),
                stderr: String::from_utf8_lossy(&stderr).trim_end().to_string(),
            })
        }
    }
}

/// Poll for exit until the deadline. `None` means the child was killed for
/// overrunning it.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    // A limit past the clock horizon can never expire.
    let Some(deadline) = Instant::now().checked_add(limit) else {
        return child.wait().map(Some);
    };
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        std::thread::sleep(Duration::from_millis(25));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_joins_program_and_args() {
        let spec = CommandSpec::new("ffmpeg").arg("-y").args(["-i", "in.png"]);
        assert_eq!(spec.command_line(), "ffmpeg -y -i in.png");
    }

    #[test]
    fn missing_program_maps_to_not_found() {
        let spec = CommandSpec::new("passloom-test-no-such-binary");
        let err = SystemRunner.run(&spec).unwrap_err();
        assert!(matches!(err, RunError::NotFound { .. }), "got {err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_maps_to_failed_with_code() {
        let spec = CommandSpec::new("false");
        let err = SystemRunner.run(&spec).unwrap_err();
        match err {
            RunError::Failed { code, .. } => assert_eq!(code, Some(1)),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn oversized_timeout_is_treated_as_unbounded() {
        let spec = CommandSpec::new("true").timeout(Some(Duration::from_secs(u64::MAX)));
        SystemRunner.run(&spec).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn overlong_command_is_killed_at_the_deadline() {
        let spec = CommandSpec::new("sleep")
            .arg("5")
            .timeout(Some(Duration::from_millis(200)));
        let started = Instant::now();
        let err = SystemRunner.run(&spec).unwrap_err();
        assert!(matches!(err, RunError::TimedOut { .. }), "got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
