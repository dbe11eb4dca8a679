use crate::{Ball, Bounded, Config, Events, GameMap, Paddle, Player, Rect};
use hecs::World;

/// Resolve ball contact with walls and paddles for this tick
///
/// Runs after the ball has moved. Walls are checked first so a corner hit
/// flips both axes in the same tick.
pub fn check_collisions(world: &mut World, map: &GameMap, config: &Config, events: &mut Events) {
    // Collect paddle data without holding borrows
    let mut paddles: Vec<(Player, Rect)> = world
        .query::<&Paddle>()
        .iter()
        .map(|(_e, p)| (p.player, p.bounds()))
        .collect();
    paddles.sort_by_key(|(player, _)| player.id());

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        // Top/bottom walls on the leading edge; touching counts as contact
        let hits_top = ball.vel.y < 0.0 && ball.top() <= 0.0;
        let hits_bottom = ball.vel.y > 0.0 && ball.bottom() >= map.height;
        if hits_top || hits_bottom {
            ball.bounce_vertical();
            events.ball_hit_wall = true;
        }

        for &(player, rect) in &paddles {
            if !ball.bounds().intersects(&rect) {
                continue;
            }

            // Only a ball that crossed the paddle's facing edge this tick hits
            // the side. Anything else is a graze off the top or bottom.
            let side_hit = match player {
                Player::One => ball.vel.x < 0.0 && ball.left() - ball.vel.x >= rect.right(),
                Player::Two => ball.vel.x > 0.0 && ball.right() - ball.vel.x <= rect.left(),
            };
            if !side_hit {
                continue;
            }

            ball.bounce_horizontal(config.ball_acceleration_factor);

            // Sit flush against the face so the next tick cannot hit again
            match player {
                Player::One => ball.set_left(rect.right()),
                Player::Two => ball.set_right(rect.left()),
            }

            events.ball_hit_paddle = true;
            break;
        }
    }
}
