//! Read-only view of a match for renderers

use glam::Vec2;

use crate::components::Player;
use crate::config::Rgb;
use crate::fsm::PhaseKind;
use crate::map::Rect;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleView {
    pub player: Player,
    pub rect: Rect,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallView {
    pub center: Vec2,
    pub radius: f32,
    pub velocity: Vec2,
    pub color: Rgb,
}

/// Horizontal direction of the next serve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Serve {
    Left,
    Right,
}

impl Serve {
    /// Serve goes toward the player who was scored against
    pub fn after(last_scored: Player) -> Self {
        match last_scored {
            Player::One => Serve::Right,
            Player::Two => Serve::Left,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Serve::Left => "<-",
            Serve::Right => "->",
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: PhaseKind,
    pub paddles: Vec<PaddleView>,
    pub ball: Option<BallView>,
    pub score_1: u8,
    pub score_2: u8,
    pub serve: Serve,
    pub countdown_remaining: Option<u8>,
    pub scorer: Option<Player>,
    pub winner: Option<Player>,
    pub prompt: Option<String>,
    pub background_color: Rgb,
    pub text_color: Rgb,
    pub text_background_color: Rgb,
    pub change_summary: String,
    pub last_error: Option<String>,
}

impl Snapshot {
    pub fn paddle(&self, player: Player) -> Option<&PaddleView> {
        self.paddles.iter().find(|p| p.player == player)
    }

    /// Main banner text for the current phase
    pub fn headline(&self) -> Option<String> {
        match self.phase {
            PhaseKind::Countdown => self
                .countdown_remaining
                .map(|n| format!("Round starting in {n}...")),
            PhaseKind::Playing => None,
            PhaseKind::AwaitingReconfiguration => self.scorer.map(|p| {
                format!("{p} scored! Enter a prompt to change the game! (Press ENTER):")
            }),
            PhaseKind::WaitingForGateway => {
                Some("The on-device model is generating your game!".to_string())
            }
            PhaseKind::GameOver => self.winner.map(|p| format!("{p} Wins!")),
        }
    }

    /// Secondary hint line
    pub fn footer(&self) -> Option<&'static str> {
        match self.phase {
            PhaseKind::GameOver => Some("Press 'R' to Restart or 'Q' to Quit"),
            _ => None,
        }
    }

    /// Prompt as typed, with a cursor
    pub fn prompt_line(&self) -> Option<String> {
        self.prompt.as_ref().map(|p| format!("{p}_"))
    }
}
