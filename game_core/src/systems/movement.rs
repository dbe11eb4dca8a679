use crate::{Ball, GameMap, Paddle, PaddleIntent};
use hecs::World;

/// Apply paddle movement based on intents
pub fn move_paddles(world: &mut World, map: &GameMap) {
    for (_entity, (paddle, intent)) in world.query_mut::<(&mut Paddle, &PaddleIntent)>() {
        if let Some(dir) = intent.dir {
            paddle.move_dir(dir, map);
        }
    }
}

/// Move ball by one tick of velocity
pub fn move_ball(world: &mut World) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.move_step();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, create_paddle, Config, Direction, Player};

    #[test]
    fn test_paddle_moves_only_with_intent() {
        let mut world = World::new();
        let config = Config::new();
        let map = GameMap::new();
        let paddle = create_paddle(&mut world, Player::One, &config);
        let start = world.get::<&Paddle>(paddle).unwrap().rect.top();

        move_paddles(&mut world, &map);
        assert_eq!(world.get::<&Paddle>(paddle).unwrap().rect.top(), start);

        world.get::<&mut PaddleIntent>(paddle).unwrap().dir = Some(Direction::Up);
        move_paddles(&mut world, &map);
        assert_eq!(
            world.get::<&Paddle>(paddle).unwrap().rect.top(),
            start - config.player_1_paddle_speed
        );
    }

    #[test]
    fn test_paddles_use_their_own_speed() {
        let mut world = World::new();
        let config = Config {
            player_2_paddle_speed: 12.0,
            ..Config::new()
        };
        let map = GameMap::new();
        let paddle = create_paddle(&mut world, Player::Two, &config);
        let start = world.get::<&Paddle>(paddle).unwrap().rect.top();

        world.get::<&mut PaddleIntent>(paddle).unwrap().dir = Some(Direction::Down);
        move_paddles(&mut world, &map);
        assert_eq!(
            world.get::<&Paddle>(paddle).unwrap().rect.top(),
            start + 12.0
        );
    }

    #[test]
    fn test_ball_moves_by_velocity() {
        let mut world = World::new();
        let config = Config::new();
        let map = GameMap::new();
        let ball = create_ball(&mut world, &config, &map);
        world.get::<&mut Ball>(ball).unwrap().vel = glam::Vec2::new(5.0, -5.0);

        move_ball(&mut world);

        let center = world.get::<&Ball>(ball).unwrap().center;
        assert_eq!(center, glam::Vec2::new(405.0, 295.0));
    }
}
