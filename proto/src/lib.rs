//! Wire format for Prompt Pong configurations
//!
//! Uses serde_json. Colors travel as `{"red", "green", "blue"}` objects and every
//! record is validated field by field before it becomes a `game_core::Config`.

use game_core::{Config, ConfigError, GatewayError, Player, ReconfigRequest, Rgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("scoring_player has to be either 1 or 2 but was {0}")]
    Player(u8),
}

impl From<ProtoError> for GatewayError {
    fn from(e: ProtoError) -> Self {
        match e {
            ProtoError::Config(e) => GatewayError::Rejected(e),
            other => GatewayError::Malformed(other.to_string()),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// Color channels are wide so out-of-range values reach validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbRecord {
    pub red: i64,
    pub green: i64,
    pub blue: i64,
}

impl From<Rgb> for RgbRecord {
    fn from(c: Rgb) -> Self {
        Self {
            red: c.r.into(),
            green: c.g.into(),
            blue: c.b.into(),
        }
    }
}

impl RgbRecord {
    fn into_rgb(self, field: &'static str) -> Result<Rgb, ConfigError> {
        Rgb::try_from_channels(field, self.red, self.green, self.blue)
    }
}

/// External representation of `Config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub player_1_paddle_width: f32,
    pub player_1_paddle_height: f32,
    pub player_2_paddle_width: f32,
    pub player_2_paddle_height: f32,
    pub ball_radius: f32,

    pub background_color: RgbRecord,
    pub ball_color: RgbRecord,
    pub player_1_paddle_color: RgbRecord,
    pub player_2_paddle_color: RgbRecord,
    pub text_color: RgbRecord,
    pub text_background_color: RgbRecord,

    pub player_1_paddle_speed: f32,
    pub player_2_paddle_speed: f32,
    pub ball_initial_speed: f32,
    pub ball_acceleration_factor: f32,

    pub change_summary: String,
}

impl From<&Config> for ConfigRecord {
    fn from(c: &Config) -> Self {
        Self {
            player_1_paddle_width: c.player_1_paddle_width,
            player_1_paddle_height: c.player_1_paddle_height,
            player_2_paddle_width: c.player_2_paddle_width,
            player_2_paddle_height: c.player_2_paddle_height,
            ball_radius: c.ball_radius,
            background_color: c.background_color.into(),
            ball_color: c.ball_color.into(),
            player_1_paddle_color: c.player_1_paddle_color.into(),
            player_2_paddle_color: c.player_2_paddle_color.into(),
            text_color: c.text_color.into(),
            text_background_color: c.text_background_color.into(),
            player_1_paddle_speed: c.player_1_paddle_speed,
            player_2_paddle_speed: c.player_2_paddle_speed,
            ball_initial_speed: c.ball_initial_speed,
            ball_acceleration_factor: c.ball_acceleration_factor,
            change_summary: c.change_summary.clone(),
        }
    }
}

impl TryFrom<ConfigRecord> for Config {
    type Error = ConfigError;

    fn try_from(r: ConfigRecord) -> Result<Self, Self::Error> {
        Config {
            player_1_paddle_width: r.player_1_paddle_width,
            player_1_paddle_height: r.player_1_paddle_height,
            player_2_paddle_width: r.player_2_paddle_width,
            player_2_paddle_height: r.player_2_paddle_height,
            ball_radius: r.ball_radius,
            background_color: r.background_color.into_rgb("background_color")?,
            ball_color: r.ball_color.into_rgb("ball_color")?,
            player_1_paddle_color: r.player_1_paddle_color.into_rgb("player_1_paddle_color")?,
            player_2_paddle_color: r.player_2_paddle_color.into_rgb("player_2_paddle_color")?,
            text_color: r.text_color.into_rgb("text_color")?,
            text_background_color: r.text_background_color.into_rgb("text_background_color")?,
            player_1_paddle_speed: r.player_1_paddle_speed,
            player_2_paddle_speed: r.player_2_paddle_speed,
            ball_initial_speed: r.ball_initial_speed,
            ball_acceleration_factor: r.ball_acceleration_factor,
            change_summary: r.change_summary,
        }
        .validated()
    }
}

/// What an external generator receives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayRequestRecord {
    pub prompt: String,
    pub scoring_player: u8,
    pub previous: ConfigRecord,
    /// Why the generator's last answer was refused, on retries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_error: Option<String>,
}

impl From<&ReconfigRequest> for GatewayRequestRecord {
    fn from(req: &ReconfigRequest) -> Self {
        Self {
            prompt: req.prompt.clone(),
            scoring_player: req.scoring_player.id(),
            previous: ConfigRecord::from(&req.previous),
            previous_error: None,
        }
    }
}

impl TryFrom<GatewayRequestRecord> for ReconfigRequest {
    type Error = ProtoError;

    fn try_from(r: GatewayRequestRecord) -> Result<Self, Self::Error> {
        let scoring_player =
            Player::try_from(r.scoring_player).map_err(|e| ProtoError::Player(e.0))?;
        Ok(Self {
            prompt: r.prompt,
            scoring_player,
            previous: Config::try_from(r.previous)?,
        })
    }
}

// ============================================================================
// Serialization Helpers
// ============================================================================

/// Serialize a config as pretty JSON
pub fn config_to_json(config: &Config) -> Result<String, ProtoError> {
    Ok(serde_json::to_string_pretty(&ConfigRecord::from(config))?)
}

/// Parse and validate a config
pub fn config_from_json(json: &str) -> Result<Config, ProtoError> {
    let record: ConfigRecord = serde_json::from_str(json)?;
    Ok(Config::try_from(record)?)
}

pub fn request_to_json(request: &ReconfigRequest) -> Result<String, ProtoError> {
    Ok(serde_json::to_string(&GatewayRequestRecord::from(request))?)
}

pub fn request_from_json(json: &str) -> Result<ReconfigRequest, ProtoError> {
    let record: GatewayRequestRecord = serde_json::from_str(json)?;
    ReconfigRequest::try_from(record)
}
