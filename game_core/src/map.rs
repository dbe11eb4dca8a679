use glam::Vec2;

use crate::params::Params;

/// Axis-aligned rectangle stored as top-left corner plus size
///
/// Screen coordinates: y grows downward, so `top < bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size * 0.5,
            size,
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn set_top(&mut self, top: f32) {
        self.pos.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.pos.y = bottom - self.size.y;
    }

    /// Strict overlap test; rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Playfield bounds
#[derive(Debug, Clone, Copy)]
pub struct GameMap {
    pub width: f32,
    pub height: f32,
}

impl Default for GameMap {
    fn default() -> Self {
        Self {
            width: Params::SCREEN_WIDTH,
            height: Params::SCREEN_HEIGHT,
        }
    }
}

impl GameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the ball is served from
    pub fn ball_spawn(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a vertical span of `extent` so it stays inside the playfield
    pub fn clamp_top(&self, top: f32, extent: f32) -> f32 {
        top.min(self.height - extent).max(0.0)
    }
}
