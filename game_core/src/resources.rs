use crate::components::{Direction, Player};
use crate::params::Params;

/// Match score tracking
#[derive(Debug, Clone, Copy)]
pub struct Score {
    pub player_1: u8,
    pub player_2: u8,
    /// Decides serve direction and who writes the next prompt
    pub last_scored: Player,
    pub max_score: u8,
}

impl Default for Score {
    fn default() -> Self {
        Self {
            player_1: 0,
            player_2: 0,
            last_scored: Player::One,
            max_score: Params::MAX_SCORE,
        }
    }
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_score(max_score: u8) -> Self {
        Self {
            max_score,
            ..Self::default()
        }
    }

    pub fn record_score(&mut self, player: Player) {
        match player {
            Player::One => self.player_1 = self.player_1.saturating_add(1),
            Player::Two => self.player_2 = self.player_2.saturating_add(1),
        }
        self.last_scored = player;
    }

    pub fn get(&self, player: Player) -> u8 {
        match player {
            Player::One => self.player_1,
            Player::Two => self.player_2,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.player_1 >= self.max_score || self.player_2 >= self.max_score
    }

    /// The leader, once the match is decided
    pub fn winner(&self) -> Option<Player> {
        if !self.is_game_over() {
            return None;
        }
        if self.player_1 > self.player_2 {
            Some(Player::One)
        } else {
            Some(Player::Two)
        }
    }

    /// Zero both counters; `last_scored` carries over into the next match
    pub fn reset(&mut self) {
        self.player_1 = 0;
        self.player_2 = 0;
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Events that occurred during this tick
#[derive(Debug, Clone, Default)]
pub struct Events {
    pub scored: Option<Player>,
    pub ball_hit_paddle: bool,
    pub ball_hit_wall: bool,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.scored = None;
        self.ball_hit_paddle = false;
        self.ball_hit_wall = false;
    }
}

/// Paddle movement commands waiting for the next tick
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pub inputs: Vec<(Player, Option<Direction>)>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
    }

    /// Only the latest command per player is kept
    pub fn push_input(&mut self, player: Player, dir: Option<Direction>) {
        match self.inputs.iter_mut().find(|(p, _)| *p == player) {
            Some(entry) => entry.1 = dir,
            None => self.inputs.push((player, dir)),
        }
    }
}
