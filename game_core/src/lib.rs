pub mod components;
pub mod config;
pub mod error;
pub mod fsm;
pub mod gateway;
pub mod map;
pub mod match_state;
pub mod params;
pub mod resources;
pub mod snapshot;
pub mod systems;

pub use components::*;
pub use config::*;
pub use error::*;
pub use fsm::*;
pub use gateway::*;
pub use map::*;
pub use match_state::*;
pub use params::*;
pub use resources::*;
pub use snapshot::*;

use hecs::World;
use systems::*;

/// Run one Playing tick of the Pong simulation
///
/// Collision is resolved after translation, walls before paddles, and the
/// goal check last.
pub fn step(
    world: &mut World,
    map: &GameMap,
    config: &Config,
    score: &mut Score,
    events: &mut Events,
    input: &mut InputQueue,
) {
    // Clear events at start of tick
    events.clear();

    // 1. Ingest inputs (apply to paddle intents)
    ingest_inputs(world, input);

    // 2. Move paddles based on intents
    move_paddles(world, map);

    // 3. Move ball
    move_ball(world);

    // 4. Check collisions (ball vs walls, paddles)
    check_collisions(world, map, config, events);

    // 5. Check scoring (ball reached a goal line)
    check_scoring(world, map, score, events);
}

/// Helper to create a paddle entity at its round-start position
pub fn create_paddle(world: &mut World, player: Player, config: &Config) -> hecs::Entity {
    let rect = Rect::new(config.paddle_spawn(player), config.paddle_size(player));
    let paddle = Paddle::new(
        player,
        rect,
        config.paddle_speed(player),
        config.paddle_color(player),
    );
    world.spawn((paddle, PaddleIntent::new()))
}

/// Helper to create the ball entity at the center of the playfield
pub fn create_ball(world: &mut World, config: &Config, map: &GameMap) -> hecs::Entity {
    let ball = Ball::new(
        map.ball_spawn(),
        config.ball_radius,
        config.ball_initial_speed,
        config.ball_color,
    );
    world.spawn((ball,))
}
