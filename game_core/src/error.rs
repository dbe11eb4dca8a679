use thiserror::Error;

/// A configuration field that cannot be admitted into a live `Config`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field}.{channel} must be within 0..=255, got {value}")]
    ColorOutOfRange {
        field: &'static str,
        channel: &'static str,
        value: i64,
    },
}

/// Player identifiers outside the two-player domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("player has to be either 1 or 2 but was {0}")]
pub struct PlayerError(pub u8);

/// Why a reconfiguration attempt produced no usable configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    #[error("no valid configuration after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("malformed gateway response: {0}")]
    Malformed(String),

    #[error("gateway returned an invalid configuration: {0}")]
    Rejected(#[from] ConfigError),

    #[error("gateway did not answer within {secs:.1}s")]
    Timeout { secs: f32 },

    #[error("gateway worker disconnected before answering")]
    Disconnected,

    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}
