//! Heuristic paddle controller

use game_core::{BallView, Command, Params, Player, Snapshot};

/// Pixels of slack before the bot bothers to move
const DEADZONE: f32 = 4.0;

/// How far ahead of the predicted intercept to aim, in ticks of vertical velocity
const LEAD: f32 = 0.3;

/// Tracks the ball's predicted intercept when it is incoming, recenters otherwise
#[derive(Debug, Clone, Copy)]
pub struct Bot {
    player: Player,
    field_height: f32,
}

impl Bot {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            field_height: Params::SCREEN_HEIGHT,
        }
    }

    pub fn decide(&self, snap: &Snapshot) -> Command {
        let (Some(ball), Some(paddle)) = (snap.ball, snap.paddle(self.player)) else {
            return Command::Hold(self.player);
        };

        let face_x = match self.player {
            Player::One => paddle.rect.right(),
            Player::Two => paddle.rect.left(),
        };
        let target_y = if self.incoming(&ball) {
            let ticks = ((face_x - ball.center.x) / ball.velocity.x).max(0.0);
            let predicted = ball.center.y + ball.velocity.y * ticks;
            fold_into(
                predicted + ball.velocity.y * LEAD,
                ball.radius,
                self.field_height - ball.radius,
            )
        } else {
            self.field_height / 2.0
        };

        let diff = target_y - paddle.rect.center().y;
        if diff > DEADZONE {
            Command::MoveDown(self.player)
        } else if diff < -DEADZONE {
            Command::MoveUp(self.player)
        } else {
            Command::Hold(self.player)
        }
    }

    fn incoming(&self, ball: &BallView) -> bool {
        match self.player {
            Player::One => ball.velocity.x < 0.0,
            Player::Two => ball.velocity.x > 0.0,
        }
    }
}

/// Reflect `y` off the walls at `lo` and `hi` like the ball would
fn fold_into(y: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if span <= 0.0 {
        return lo;
    }
    let m = (y - lo).rem_euclid(2.0 * span);
    if m > span {
        hi - (m - span)
    } else {
        lo + m
    }
}
