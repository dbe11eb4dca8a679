use glam::Vec2;
use rand::Rng;

use crate::config::Rgb;
use crate::error::PlayerError;
use crate::map::{GameMap, Rect};
use crate::resources::GameRng;

/// One of the two seats at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = PlayerError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            other => Err(PlayerError(other)),
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.id())
    }
}

/// Vertical paddle direction (screen y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Anything with a collision box
pub trait Bounded {
    fn bounds(&self) -> Rect;
}

/// Paddle component - a player's paddle
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub player: Player,
    pub rect: Rect,
    pub speed: f32,
    pub color: Rgb,
}

impl Paddle {
    pub fn new(player: Player, rect: Rect, speed: f32, color: Rgb) -> Self {
        Self {
            player,
            rect,
            speed,
            color,
        }
    }

    /// Move one tick's worth of `speed`, then clamp inside the playfield
    pub fn move_dir(&mut self, direction: Direction, map: &GameMap) {
        match direction {
            Direction::Up => self.rect.pos.y -= self.speed,
            Direction::Down => self.rect.pos.y += self.speed,
        }

        if self.rect.top() < 0.0 {
            self.rect.set_top(0.0);
        }
        if self.rect.bottom() > map.height {
            self.rect.set_bottom(map.height);
        }
    }
}

impl Bounded for Paddle {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// Ball component
///
/// Velocity is sign-only per axis: `|vel.x| == |vel.y| == current_speed`
/// always holds, so every paddle hit speeds the ball up on both axes.
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub center: Vec2,
    pub radius: f32,
    pub vel: Vec2,
    pub current_speed: f32,
    pub initial_speed: f32,
    pub color: Rgb,
}

impl Ball {
    pub fn new(center: Vec2, radius: f32, speed: f32, color: Rgb) -> Self {
        Self {
            center,
            radius,
            vel: Vec2::new(speed, speed),
            current_speed: speed,
            initial_speed: speed,
            color,
        }
    }

    pub fn move_step(&mut self) {
        self.center += self.vel;
    }

    /// Top/bottom wall contact
    pub fn bounce_vertical(&mut self) {
        self.vel.y = -self.vel.y;
    }

    /// Paddle contact: reverse horizontally and re-norm both axes to the new speed
    pub fn bounce_horizontal(&mut self, acceleration: f32) {
        self.vel.x = -self.vel.x;
        self.current_speed += acceleration;

        let sign_x = if self.vel.x > 0.0 { 1.0 } else { -1.0 };
        let sign_y = if self.vel.y > 0.0 { 1.0 } else { -1.0 };
        self.vel = Vec2::new(sign_x, sign_y) * self.current_speed;
    }

    /// Recenter and serve toward the player who was just scored against
    pub fn reset(&mut self, last_scored: Player, map: &GameMap, rng: &mut GameRng) {
        self.center = map.ball_spawn();
        self.current_speed = self.initial_speed;

        let dx = match last_scored {
            Player::One => self.current_speed,
            Player::Two => -self.current_speed,
        };
        let dy = if rng.0.gen_bool(0.5) {
            self.current_speed
        } else {
            -self.current_speed
        };
        self.vel = Vec2::new(dx, dy);
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.radius
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.radius
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.radius
    }

    pub fn set_left(&mut self, left: f32) {
        self.center.x = left + self.radius;
    }

    pub fn set_right(&mut self, right: f32) {
        self.center.x = right - self.radius;
    }
}

impl Bounded for Ball {
    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, Vec2::splat(self.radius * 2.0))
    }
}

/// Movement intent for a paddle, held until the next command changes it
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddleIntent {
    pub dir: Option<Direction>,
}

impl PaddleIntent {
    pub fn new() -> Self {
        Self::default()
    }
}
