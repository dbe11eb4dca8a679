use crate::error::ConfigError;
use crate::params::Params;
use crate::Player;
use glam::Vec2;

/// RGB color, one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from wide integers, rejecting channels outside 0..=255
    pub fn try_from_channels(
        field: &'static str,
        red: i64,
        green: i64,
        blue: i64,
    ) -> Result<Self, ConfigError> {
        let channel = |name: &'static str, value: i64| {
            u8::try_from(value).map_err(|_| ConfigError::ColorOutOfRange {
                field,
                channel: name,
                value,
            })
        };
        Ok(Self {
            r: channel("red", red)?,
            g: channel("green", green)?,
            b: channel("blue", blue)?,
        })
    }
}

/// Round configuration
///
/// One immutable snapshot of every tunable the players can rewrite. A round
/// never sees a partially updated value: `MatchState` swaps whole configs.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub player_1_paddle_width: f32,
    pub player_1_paddle_height: f32,
    pub player_2_paddle_width: f32,
    pub player_2_paddle_height: f32,
    pub ball_radius: f32,

    pub background_color: Rgb,
    pub ball_color: Rgb,
    pub player_1_paddle_color: Rgb,
    pub player_2_paddle_color: Rgb,
    pub text_color: Rgb,
    pub text_background_color: Rgb,

    pub player_1_paddle_speed: f32,
    pub player_2_paddle_speed: f32,
    pub ball_initial_speed: f32,
    pub ball_acceleration_factor: f32,

    pub change_summary: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_1_paddle_width: Params::PADDLE_WIDTH,
            player_1_paddle_height: Params::PADDLE_HEIGHT,
            player_2_paddle_width: Params::PADDLE_WIDTH,
            player_2_paddle_height: Params::PADDLE_HEIGHT,
            ball_radius: Params::BALL_RADIUS,
            background_color: Rgb::new(255, 255, 255),
            ball_color: Rgb::new(231, 19, 36),
            player_1_paddle_color: Rgb::new(53, 0, 172),
            player_2_paddle_color: Rgb::new(53, 0, 172),
            text_color: Rgb::new(0, 0, 0),
            text_background_color: Rgb::new(245, 246, 247),
            player_1_paddle_speed: Params::PADDLE_SPEED,
            player_2_paddle_speed: Params::PADDLE_SPEED,
            ball_initial_speed: Params::BALL_INITIAL_SPEED,
            ball_acceleration_factor: Params::BALL_ACCELERATION,
            change_summary: "Default configuration".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every numeric field is finite and non-negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("player_1_paddle_width", self.player_1_paddle_width),
            ("player_1_paddle_height", self.player_1_paddle_height),
            ("player_2_paddle_width", self.player_2_paddle_width),
            ("player_2_paddle_height", self.player_2_paddle_height),
            ("ball_radius", self.ball_radius),
            ("player_1_paddle_speed", self.player_1_paddle_speed),
            ("player_2_paddle_speed", self.player_2_paddle_speed),
            ("ball_initial_speed", self.ball_initial_speed),
            ("ball_acceleration_factor", self.ball_acceleration_factor),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }

    /// Consume and return self if valid
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    pub fn paddle_size(&self, player: Player) -> Vec2 {
        match player {
            Player::One => Vec2::new(self.player_1_paddle_width, self.player_1_paddle_height),
            Player::Two => Vec2::new(self.player_2_paddle_width, self.player_2_paddle_height),
        }
    }

    pub fn paddle_speed(&self, player: Player) -> f32 {
        match player {
            Player::One => self.player_1_paddle_speed,
            Player::Two => self.player_2_paddle_speed,
        }
    }

    pub fn paddle_color(&self, player: Player) -> Rgb {
        match player {
            Player::One => self.player_1_paddle_color,
            Player::Two => self.player_2_paddle_color,
        }
    }

    /// Top-left corner of a paddle at round start
    ///
    /// Player 1 sits one paddle-width in from the left edge, player 2 two
    /// paddle-widths in from the right edge. Both are vertically centered.
    pub fn paddle_spawn(&self, player: Player) -> Vec2 {
        let size = self.paddle_size(player);
        let x = match player {
            Player::One => size.x,
            Player::Two => Params::SCREEN_WIDTH - size.x * 2.0,
        };
        Vec2::new(x, Params::SCREEN_HEIGHT / 2.0 - size.y / 2.0)
    }
}
