//! Reconfiguration Gateway boundary
//!
//! The gateway turns a scorer's prompt into a new `Config`. It may block for
//! seconds, so `dispatch` runs it on a worker thread and hands the single
//! result back through a channel that the tick loop polls.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::components::Player;
use crate::config::Config;
use crate::error::GatewayError;

/// Everything the generator gets to see
#[derive(Debug, Clone, PartialEq)]
pub struct ReconfigRequest {
    pub prompt: String,
    pub scoring_player: Player,
    pub previous: Config,
}

/// External config generator
///
/// Must be safe to call again with the same request; retrying is up to the
/// implementation, the core calls it once per submitted prompt.
pub trait ConfigGateway: Send + Sync {
    fn generate_config(&self, request: &ReconfigRequest) -> Result<Config, GatewayError>;
}

impl<F> ConfigGateway for F
where
    F: Fn(&ReconfigRequest) -> Result<Config, GatewayError> + Send + Sync,
{
    fn generate_config(&self, request: &ReconfigRequest) -> Result<Config, GatewayError> {
        self(request)
    }
}

/// An in-flight gateway call
///
/// Dropping it cancels: the worker's eventual result is discarded.
#[derive(Debug)]
pub struct PendingReconfig {
    receiver: Receiver<Result<Config, GatewayError>>,
    /// Simulation seconds spent waiting so far
    pub waited: f32,
}

impl PendingReconfig {
    /// Non-blocking check for the result
    pub fn poll(&self) -> Option<Result<Config, GatewayError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(GatewayError::Disconnected)),
        }
    }

    /// Block up to `timeout` for the result
    pub fn wait(&self, timeout: Duration) -> Option<Result<Config, GatewayError>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(GatewayError::Disconnected)),
        }
    }
}

/// Run the gateway on a worker thread
pub fn dispatch(
    gateway: Arc<dyn ConfigGateway>,
    request: ReconfigRequest,
) -> Result<PendingReconfig, GatewayError> {
    let (sender, receiver) = mpsc::sync_channel(1);

    thread::Builder::new()
        .name("config-gateway".to_string())
        .spawn(move || {
            let result = gateway.generate_config(&request);
            // Receiver gone means the request was cancelled or timed out
            let _ = sender.send(result);
        })
        .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

    Ok(PendingReconfig {
        receiver,
        waited: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ReconfigRequest {
        ReconfigRequest {
            prompt: "make the ball huge".to_string(),
            scoring_player: Player::One,
            previous: Config::new(),
        }
    }

    #[test]
    fn test_dispatch_delivers_result() {
        let gateway: Arc<dyn ConfigGateway> = Arc::new(|req: &ReconfigRequest| -> Result<Config, GatewayError> {
            Ok(Config {
                ball_radius: 40.0,
                change_summary: req.prompt.clone(),
                ..req.previous.clone()
            })
        });

        let pending = dispatch(gateway, request()).unwrap();
        let config = pending.wait(Duration::from_secs(5)).unwrap().unwrap();
        assert_eq!(config.ball_radius, 40.0);
        assert_eq!(config.change_summary, "make the ball huge");
    }

    #[test]
    fn test_dispatch_delivers_failure() {
        let gateway: Arc<dyn ConfigGateway> =
            Arc::new(|_: &ReconfigRequest| -> Result<Config, GatewayError> {
                Err(GatewayError::Exhausted { attempts: 25 })
            });

        let pending = dispatch(gateway, request()).unwrap();
        assert_eq!(
            pending.wait(Duration::from_secs(5)),
            Some(Err(GatewayError::Exhausted { attempts: 25 }))
        );
    }

    #[test]
    fn test_panicking_gateway_reports_disconnect() {
        let gateway: Arc<dyn ConfigGateway> =
            Arc::new(|_: &ReconfigRequest| -> Result<Config, GatewayError> {
                panic!("generator crashed")
            });

        let pending = dispatch(gateway, request()).unwrap();
        assert_eq!(
            pending.wait(Duration::from_secs(5)),
            Some(Err(GatewayError::Disconnected))
        );
    }

    #[test]
    fn test_slow_gateway_polls_empty() {
        let gateway: Arc<dyn ConfigGateway> = Arc::new(|req: &ReconfigRequest| -> Result<Config, GatewayError> {
            thread::sleep(Duration::from_millis(200));
            Ok(req.previous.clone())
        });

        let pending = dispatch(gateway, request()).unwrap();
        assert!(pending.poll().is_none());
        assert!(pending.wait(Duration::from_secs(5)).is_some());
    }
}
