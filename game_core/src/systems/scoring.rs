use crate::{Ball, Events, GameMap, Player, Score};
use hecs::World;

/// Check if the ball reached either goal line
///
/// The ball is left where it is; the round state machine re-serves it.
pub fn check_scoring(world: &World, map: &GameMap, score: &mut Score, events: &mut Events) {
    for (_entity, ball) in world.query::<&Ball>().iter() {
        let scorer = if ball.left() <= 0.0 {
            Player::Two
        } else if ball.right() >= map.width {
            Player::One
        } else {
            continue;
        };

        score.record_score(scorer);
        events.scored = Some(scorer);
        tracing::debug!(
            scorer = scorer.id(),
            player_1 = score.player_1,
            player_2 = score.player_2,
            "goal"
        );
    }
}
