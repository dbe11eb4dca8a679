//! Config generators the host can plug into a match

use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use game_core::{Config, ConfigGateway, GatewayError, Params, ReconfigRequest};
use proto::GatewayRequestRecord;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 25;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs an external generator once per attempt
///
/// The request goes to the child's stdin as one JSON object; the child must
/// print a complete config record on stdout and exit 0. Refused answers are
/// retried with the refusal reason attached as `previous_error`. All attempts
/// share one time budget and a child still running when it runs out is killed.
#[derive(Debug, Clone)]
pub struct CommandGateway {
    program: String,
    args: Vec<String>,
    max_attempts: u32,
    timeout: Duration,
}

impl CommandGateway {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: Duration::from_secs_f32(Params::GATEWAY_TIMEOUT_SECS),
        }
    }

    /// Split a whitespace separated command line
    pub fn parse(command_line: &str) -> Result<Self, GatewayError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| GatewayError::Unavailable("empty gateway command".to_string()))?;
        Ok(Self::new(program, parts.collect()))
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn timed_out(&self) -> GatewayError {
        GatewayError::Timeout {
            secs: self.timeout.as_secs_f32(),
        }
    }

    fn run_once(
        &self,
        record: &GatewayRequestRecord,
        deadline: Instant,
    ) -> Result<Config, GatewayError> {
        let payload =
            serde_json::to_vec(record).map_err(|e| GatewayError::Malformed(e.to_string()))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GatewayError::Unavailable(format!("{}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A generator that ignores its input may close stdin early
            if let Err(e) = stdin.write_all(&payload) {
                tracing::debug!(error = %e, "generator closed stdin");
            }
        }
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    kill(&mut child);
                    return Err(self.timed_out());
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    kill(&mut child);
                    return Err(GatewayError::Unavailable(e.to_string()));
                }
            }
        };

        if let Ok(err) = stderr.recv_timeout(POLL_INTERVAL) {
            let err = String::from_utf8_lossy(&err);
            if !err.trim().is_empty() {
                tracing::debug!(stderr = %err.trim(), "generator diagnostics");
            }
        }

        // Something the child left behind may still hold stdout open
        let out = match stdout.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(out) => out,
            Err(RecvTimeoutError::Timeout) => return Err(self.timed_out()),
            Err(RecvTimeoutError::Disconnected) => Vec::new(),
        };

        if !status.success() {
            return Err(GatewayError::Malformed(format!(
                "generator exited with {status}"
            )));
        }

        let text = String::from_utf8(out).map_err(|e| GatewayError::Malformed(e.to_string()))?;
        proto::config_from_json(text.trim()).map_err(GatewayError::from)
    }
}

/// Read a child pipe to the end on a helper thread
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<Vec<u8>> {
    let (sender, receiver) = mpsc::channel();
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let mut buf = Vec::new();
            if pipe.read_to_end(&mut buf).is_ok() {
                let _ = sender.send(buf);
            }
        });
    }
    receiver
}

fn kill(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!(error = %e, "generator already gone");
    }
    // Reap so no zombie is left behind
    let _ = child.wait();
}

impl ConfigGateway for CommandGateway {
    fn generate_config(&self, request: &ReconfigRequest) -> Result<Config, GatewayError> {
        let deadline = Instant::now() + self.timeout;
        let mut record = GatewayRequestRecord::from(request);

        for attempt in 1..=self.max_attempts {
            if Instant::now() >= deadline {
                return Err(self.timed_out());
            }
            match self.run_once(&record, deadline) {
                Ok(config) => {
                    tracing::info!(attempt, "generator produced a configuration");
                    return Ok(config);
                }
                Err(e @ (GatewayError::Unavailable(_) | GatewayError::Timeout { .. })) => {
                    return Err(e)
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "generator answer refused");
                    record.previous_error = Some(e.to_string());
                }
            }
        }

        Err(GatewayError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

/// Used when no generator is configured: hands back the previous config
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticGateway;

impl ConfigGateway for StaticGateway {
    fn generate_config(&self, request: &ReconfigRequest) -> Result<Config, GatewayError> {
        Ok(Config {
            change_summary: "No gateway configured; configuration unchanged".to_string(),
            ..request.previous.clone()
        })
    }
}
