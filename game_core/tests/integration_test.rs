use std::sync::Arc;
use std::time::Duration;

use game_core::*;
use glam::Vec2;
use hecs::World;
use proptest::prelude::*;

fn echo_gateway() -> Arc<dyn ConfigGateway> {
    Arc::new(
        |req: &ReconfigRequest| -> Result<Config, GatewayError> {
            Ok(Config {
                change_summary: format!("Player {} asked: {}", req.scoring_player.id(), req.prompt),
                ..req.previous.clone()
            })
        },
    )
}

fn run_countdown(state: &mut MatchState) {
    for _ in 0..(Params::FPS * 10) {
        if state.phase_kind() != PhaseKind::Countdown {
            return;
        }
        state.tick(Params::FIXED_DT);
    }
    panic!("countdown never finished");
}

fn send_ball_into_goal(state: &mut MatchState, scorer: Player) {
    let (center, vel) = match scorer {
        Player::One => (Vec2::new(795.0, 300.0), Vec2::new(5.0, 5.0)),
        Player::Two => (Vec2::new(12.0, 300.0), Vec2::new(-5.0, 5.0)),
    };
    for (_e, ball) in state.world.query_mut::<&mut Ball>() {
        ball.center = center;
        ball.vel = vel;
    }
    state.tick(Params::FIXED_DT);
}

fn ball_in(world: &World) -> Ball {
    *world.query::<&Ball>().iter().next().unwrap().1
}

#[test]
fn test_three_paddle_hits_reach_5_3() {
    let config = Config {
        player_1_paddle_speed: 7.0,
        ball_initial_speed: 5.0,
        ball_acceleration_factor: 0.1,
        ..Config::new()
    };
    let mut ball = Ball::new(
        Vec2::new(400.0, 300.0),
        config.ball_radius,
        config.ball_initial_speed,
        config.ball_color,
    );

    for _ in 0..3 {
        ball.bounce_horizontal(config.ball_acceleration_factor);
    }

    assert!((ball.current_speed - 5.3).abs() < 1e-5);
    assert_eq!(ball.vel.x.abs(), ball.current_speed);
    assert_eq!(ball.vel.y.abs(), ball.current_speed);
}

#[test]
fn test_rally_off_both_paddles() {
    let mut world = World::new();
    let map = GameMap::new();
    // Full-height paddles cannot miss
    let config = Config {
        player_1_paddle_height: 600.0,
        player_2_paddle_height: 600.0,
        ..Config::new()
    };
    let mut score = Score::new();
    let mut events = Events::new();
    let mut input = InputQueue::new();

    create_paddle(&mut world, Player::One, &config);
    create_paddle(&mut world, Player::Two, &config);
    let ball = create_ball(&mut world, &config, &map);
    world.get::<&mut Ball>(ball).unwrap().vel = Vec2::new(5.0, 5.0);

    let mut hits = 0;
    for _ in 0..400 {
        step(&mut world, &map, &config, &mut score, &mut events, &mut input);
        if events.ball_hit_paddle {
            hits += 1;
        }
        assert!(events.scored.is_none(), "rally should never score");
    }

    assert!(hits >= 2, "ball should hit both paddles, got {hits}");
    let ball = ball_in(&world);
    assert!((ball.current_speed - (5.0 + 0.1 * hits as f32)).abs() < 1e-4);
}

#[test]
fn test_scoring_at_left_boundary_enters_reconfiguration() {
    let mut state = MatchState::new(Config::new(), echo_gateway()).unwrap();
    run_countdown(&mut state);

    send_ball_into_goal(&mut state, Player::Two);

    assert_eq!(state.score.player_2, 1);
    assert_eq!(state.score.last_scored, Player::Two);
    assert_eq!(state.phase_kind(), PhaseKind::AwaitingReconfiguration);
}

#[test]
fn test_full_match_to_game_over() {
    let mut state = MatchState::new(Config::new(), echo_gateway()).unwrap();

    for round in 1..=Params::MAX_SCORE {
        run_countdown(&mut state);
        send_ball_into_goal(&mut state, Player::One);
        assert_eq!(state.score.player_1, round);

        if round < Params::MAX_SCORE {
            assert_eq!(state.phase_kind(), PhaseKind::AwaitingReconfiguration);
            for c in "faster".chars() {
                state.handle_command(Command::AppendChar(c));
            }
            state.handle_command(Command::Submit);
            assert!(state.settle_gateway(Duration::from_secs(5)));
            assert_eq!(state.config().change_summary, "Player 1 asked: faster");
        }
    }

    let snap = state.snapshot();
    assert_eq!(snap.phase, PhaseKind::GameOver);
    assert_eq!(snap.winner, Some(Player::One));
    assert_eq!(snap.score_1, Params::MAX_SCORE);
    assert_eq!(snap.headline().as_deref(), Some("Player 1 Wins!"));

    // Frozen until restart
    for _ in 0..120 {
        state.tick(Params::FIXED_DT);
    }
    assert_eq!(state.snapshot().ball, snap.ball);
    assert_eq!(state.score.player_1, Params::MAX_SCORE);

    state.handle_command(Command::Restart);
    assert_eq!(state.phase_kind(), PhaseKind::Countdown);
    assert_eq!(state.score.player_1, 0);

    state.handle_command(Command::Quit);
    assert!(!state.is_running());
}

proptest! {
    #[test]
    fn prop_free_flight_translates_exactly(
        x in 100.0f32..700.0,
        y in 100.0f32..500.0,
        speed in 0.5f32..20.0,
        right in any::<bool>(),
        down in any::<bool>(),
    ) {
        let mut world = World::new();
        let map = GameMap::new();
        let config = Config::new();
        let mut score = Score::new();
        let mut events = Events::new();
        let mut input = InputQueue::new();
        create_paddle(&mut world, Player::One, &config);
        create_paddle(&mut world, Player::Two, &config);
        let entity = create_ball(&mut world, &config, &map);

        let vel = Vec2::new(
            if right { speed } else { -speed },
            if down { speed } else { -speed },
        );
        {
            let mut ball = world.get::<&mut Ball>(entity).unwrap();
            ball.center = Vec2::new(x, y);
            ball.vel = vel;
            ball.current_speed = speed;
        }

        step(&mut world, &map, &config, &mut score, &mut events, &mut input);

        let ball = ball_in(&world);
        prop_assert_eq!(ball.center, Vec2::new(x, y) + vel);
        prop_assert_eq!(ball.vel.x.abs(), ball.vel.y.abs());
        prop_assert!(!events.ball_hit_paddle && !events.ball_hit_wall);
    }

    #[test]
    fn prop_horizontal_bounce_renorms_both_axes(
        speed in 0.1f32..50.0,
        acceleration in 0.0f32..5.0,
        right in any::<bool>(),
        down in any::<bool>(),
    ) {
        let mut ball = Ball::new(Vec2::new(400.0, 300.0), 10.0, speed, Rgb::default());
        ball.vel = Vec2::new(
            if right { speed } else { -speed },
            if down { speed } else { -speed },
        );

        ball.bounce_horizontal(acceleration);

        prop_assert_eq!(ball.current_speed, speed + acceleration);
        prop_assert_eq!(ball.vel.x.abs(), ball.current_speed);
        prop_assert_eq!(ball.vel.y.abs(), ball.current_speed);
        prop_assert_eq!(ball.vel.x > 0.0, !right);
        prop_assert_eq!(ball.vel.y > 0.0, down);
    }

    #[test]
    fn prop_reset_serves_toward_conceding_player(seed in any::<u64>(), speed in 0.1f32..30.0) {
        let map = GameMap::new();
        let mut rng = GameRng::new(seed);
        let mut ball = Ball::new(Vec2::ZERO, 10.0, speed, Rgb::default());
        ball.bounce_horizontal(1.0);

        ball.reset(Player::One, &map, &mut rng);
        prop_assert!(ball.vel.x > 0.0);
        prop_assert_eq!(ball.vel.y.abs(), speed);

        ball.reset(Player::Two, &map, &mut rng);
        prop_assert!(ball.vel.x < 0.0);
        prop_assert_eq!(ball.vel.y.abs(), speed);
        prop_assert_eq!(ball.center, map.ball_spawn());
    }

    #[test]
    fn prop_paddle_stays_in_playfield(
        moves in proptest::collection::vec(any::<bool>(), 0..300),
        speed in 0.0f32..80.0,
        height in 1.0f32..600.0,
    ) {
        let map = GameMap::new();
        let rect = Rect::new(Vec2::new(15.0, (map.height - height) / 2.0), Vec2::new(15.0, height));
        let mut paddle = Paddle::new(Player::One, rect, speed, Rgb::default());

        for up in moves {
            paddle.move_dir(if up { Direction::Up } else { Direction::Down }, &map);
            prop_assert!(paddle.rect.top() >= 0.0);
            prop_assert!(paddle.rect.top() <= map.height - height + 1e-3);
        }
    }
}
