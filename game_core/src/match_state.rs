//! Match controller
//!
//! `MatchState` is the single owner of everything mutable in a match: the
//! entity world, the live `Config`, the score and the round phase. Renderers
//! read it through `snapshot`; input reaches it through `handle_command`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use hecs::World;

use crate::components::{Ball, Direction, Paddle, Player};
use crate::config::Config;
use crate::error::{ConfigError, GatewayError};
use crate::fsm::{GameAction, Phase, PhaseKind, RoundFsm, TransitionResult};
use crate::gateway::{dispatch, ConfigGateway, PendingReconfig, ReconfigRequest};
use crate::map::GameMap;
use crate::params::Params;
use crate::resources::{Events, GameRng, InputQueue, Score};
use crate::snapshot::{BallView, PaddleView, Serve, Snapshot};
use crate::{create_ball, create_paddle, step};

/// Input commands, already decoded from device events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveUp(Player),
    MoveDown(Player),
    Hold(Player),
    AppendChar(char),
    Backspace,
    Submit,
    Restart,
    Quit,
}

/// Match-wide settings that players cannot prompt away
#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    pub max_score: u8,
    pub countdown_seconds: u8,
    /// Simulation seconds to wait for the gateway before giving up
    pub gateway_timeout_secs: f32,
    pub seed: u64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_score: Params::MAX_SCORE,
            countdown_seconds: Params::COUNTDOWN_SECONDS,
            gateway_timeout_secs: Params::GATEWAY_TIMEOUT_SECS,
            seed: 12345,
        }
    }
}

pub struct MatchState {
    pub world: World,
    pub map: GameMap,
    config: Config,
    pub score: Score,
    pub events: Events,
    pub input: InputQueue,
    pub rng: GameRng,
    fsm: RoundFsm,
    gateway: Arc<dyn ConfigGateway>,
    pending: Option<PendingReconfig>,
    options: MatchOptions,
    countdown_elapsed: f32,
    last_error: Option<GatewayError>,
    running: bool,
    pub tick: u64,
}

impl MatchState {
    pub fn new(config: Config, gateway: Arc<dyn ConfigGateway>) -> Result<Self, ConfigError> {
        Self::with_options(config, gateway, MatchOptions::default())
    }

    pub fn with_options(
        config: Config,
        gateway: Arc<dyn ConfigGateway>,
        options: MatchOptions,
    ) -> Result<Self, ConfigError> {
        let config = config.validated()?;

        let mut state = Self {
            world: World::new(),
            map: GameMap::new(),
            config,
            score: Score::with_max_score(options.max_score),
            events: Events::new(),
            input: InputQueue::new(),
            rng: GameRng::new(options.seed),
            fsm: RoundFsm::with_countdown(options.countdown_seconds),
            gateway,
            pending: None,
            options,
            countdown_elapsed: 0.0,
            last_error: None,
            running: true,
            tick: 0,
        };
        state.init_round();
        Ok(state)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> &Phase {
        self.fsm.phase()
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.fsm.kind()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_error(&self) -> Option<&GatewayError> {
        self.last_error.as_ref()
    }

    pub fn is_waiting_for_gateway(&self) -> bool {
        self.pending.is_some()
    }

    /// Respawn paddles and ball from the live config
    fn init_round(&mut self) {
        self.world.clear();
        self.input.clear();
        create_paddle(&mut self.world, Player::One, &self.config);
        create_paddle(&mut self.world, Player::Two, &self.config);

        let ball = create_ball(&mut self.world, &self.config, &self.map);
        if let Ok(mut ball) = self.world.get::<&mut Ball>(ball) {
            ball.reset(self.score.last_scored, &self.map, &mut self.rng);
        }
        self.countdown_elapsed = 0.0;
    }

    fn apply(&mut self, action: GameAction) -> TransitionResult {
        let result = self.fsm.transition(action);
        if result.success {
            tracing::info!(from = ?result.from, to = ?result.to, ?action, "phase transition");
        } else {
            tracing::warn!(phase = ?result.from, ?action, "ignored invalid transition");
        }
        result
    }

    pub fn handle_command(&mut self, command: Command) {
        if !self.running {
            return;
        }

        match command {
            Command::MoveUp(player) => self.queue_paddle(player, Some(Direction::Up)),
            Command::MoveDown(player) => self.queue_paddle(player, Some(Direction::Down)),
            Command::Hold(player) => self.queue_paddle(player, None),
            Command::AppendChar(c) => {
                self.fsm.push_char(c);
            }
            Command::Backspace => {
                self.fsm.backspace();
            }
            Command::Submit => self.submit_prompt(),
            Command::Restart => self.restart(),
            Command::Quit => self.quit(),
        }
    }

    /// Paddle input only matters for a round that is about to run or running
    fn queue_paddle(&mut self, player: Player, dir: Option<Direction>) {
        if matches!(self.fsm.kind(), PhaseKind::Countdown | PhaseKind::Playing) {
            self.input.push_input(player, dir);
        }
    }

    fn submit_prompt(&mut self) {
        let (scorer, prompt) = match self.fsm.phase() {
            Phase::AwaitingReconfiguration {
                scorer,
                prompt,
                waiting: false,
            } => (*scorer, prompt.clone()),
            _ => return,
        };

        if !self.apply(GameAction::Submit).success {
            return;
        }

        tracing::info!(scorer = scorer.id(), %prompt, "requesting new configuration");
        let request = ReconfigRequest {
            prompt,
            scoring_player: scorer,
            previous: self.config.clone(),
        };
        match dispatch(Arc::clone(&self.gateway), request) {
            Ok(pending) => self.pending = Some(pending),
            Err(e) => self.finish_reconfiguration(Err(e)),
        }
    }

    /// Apply a gateway outcome and start the next countdown
    ///
    /// A failure keeps the previous config; the error stays visible in the
    /// snapshot until the next successful reconfiguration.
    fn finish_reconfiguration(&mut self, outcome: Result<Config, GatewayError>) {
        self.pending = None;

        match outcome.and_then(|config| config.validated().map_err(GatewayError::from)) {
            Ok(config) => {
                tracing::info!(summary = %config.change_summary, "configuration replaced");
                self.config = config;
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "reconfiguration failed, keeping previous configuration");
                self.last_error = Some(e);
            }
        }

        self.init_round();
        self.apply(GameAction::ReconfigFinished);
    }

    fn restart(&mut self) {
        if !self.fsm.is_game_over() {
            return;
        }
        tracing::info!("restarting match");
        self.score.reset();
        self.init_round();
        self.apply(GameAction::Restart);
    }

    fn quit(&mut self) {
        if self.pending.take().is_some() {
            tracing::info!("quit while waiting for gateway, discarding pending result");
        }
        self.running = false;
    }

    /// Block the caller up to `max_wait` for an outstanding gateway result
    ///
    /// For hosts that have nothing to draw while the round is paused. Time
    /// spent blocked counts against the gateway timeout, and once that budget
    /// is used up the request fails with `GatewayError::Timeout`. Returns
    /// whether the reconfiguration was resolved.
    pub fn settle_gateway(&mut self, max_wait: Duration) -> bool {
        let timeout = self.options.gateway_timeout_secs;
        let outcome = match self.pending.as_mut() {
            Some(pending) => {
                let remaining = Duration::try_from_secs_f32((timeout - pending.waited).max(0.0))
                    .unwrap_or(Duration::MAX);
                let budget_spent = max_wait >= remaining;
                let started = Instant::now();
                let outcome = pending.wait(max_wait.min(remaining));
                pending.waited += started.elapsed().as_secs_f32();
                match outcome {
                    Some(outcome) => Some(outcome),
                    None if budget_spent || pending.waited >= timeout => {
                        Some(Err(GatewayError::Timeout {
                            secs: pending.waited,
                        }))
                    }
                    None => None,
                }
            }
            None => return false,
        };
        match outcome {
            Some(outcome) => {
                self.finish_reconfiguration(outcome);
                true
            }
            None => false,
        }
    }

    /// Advance one fixed step of `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        self.tick += 1;

        // Gateway results are consumed at the top of the tick
        let timeout = self.options.gateway_timeout_secs;
        let outcome = match self.pending.as_mut() {
            Some(pending) => {
                pending.waited += dt;
                match pending.poll() {
                    Some(outcome) => Some(outcome),
                    None if pending.waited >= timeout => Some(Err(GatewayError::Timeout {
                        secs: pending.waited,
                    })),
                    None => None,
                }
            }
            None => None,
        };
        if let Some(outcome) = outcome {
            self.finish_reconfiguration(outcome);
        }

        match self.fsm.kind() {
            PhaseKind::Countdown => self.tick_countdown(dt),
            PhaseKind::Playing => self.tick_playing(),
            PhaseKind::AwaitingReconfiguration
            | PhaseKind::WaitingForGateway
            | PhaseKind::GameOver => {}
        }
    }

    fn tick_countdown(&mut self, dt: f32) {
        self.countdown_elapsed += dt;
        while self.countdown_elapsed >= 1.0 {
            self.countdown_elapsed -= 1.0;
            if let Phase::Countdown { remaining } = self.fsm.phase() {
                tracing::debug!(remaining = *remaining, "countdown");
            }
            if self.fsm.countdown_second() {
                break;
            }
        }

        if matches!(self.fsm.phase(), Phase::Countdown { remaining: 0 }) {
            self.countdown_elapsed = 0.0;
            self.apply(GameAction::CountdownDone);
        }
    }

    fn tick_playing(&mut self) {
        step(
            &mut self.world,
            &self.map,
            &self.config,
            &mut self.score,
            &mut self.events,
            &mut self.input,
        );

        if let Some(scorer) = self.events.scored {
            match self.score.winner() {
                Some(winner) => self.apply(GameAction::MatchWon(winner)),
                None => self.apply(GameAction::Scored(scorer)),
            };
        }

        if self.tick % 60 == 0 {
            tracing::debug!(
                tick = self.tick,
                player_1 = self.score.player_1,
                player_2 = self.score.player_2,
                "playing"
            );
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut paddles: Vec<PaddleView> = self
            .world
            .query::<&Paddle>()
            .iter()
            .map(|(_e, p)| PaddleView {
                player: p.player,
                rect: p.rect,
                color: p.color,
            })
            .collect();
        paddles.sort_by_key(|p| p.player.id());

        let ball = self
            .world
            .query::<&Ball>()
            .iter()
            .next()
            .map(|(_e, b)| BallView {
                center: b.center,
                radius: b.radius,
                velocity: b.vel,
                color: b.color,
            });

        let (countdown_remaining, scorer, winner, prompt) = match self.fsm.phase() {
            Phase::Countdown { remaining } => (Some(*remaining), None, None, None),
            Phase::Playing => (None, None, None, None),
            Phase::AwaitingReconfiguration { scorer, prompt, .. } => {
                (None, Some(*scorer), None, Some(prompt.clone()))
            }
            Phase::GameOver { winner } => (None, None, Some(*winner), None),
        };

        Snapshot {
            tick: self.tick,
            phase: self.fsm.kind(),
            paddles,
            ball,
            score_1: self.score.player_1,
            score_2: self.score.player_2,
            serve: Serve::after(self.score.last_scored),
            countdown_remaining,
            scorer,
            winner,
            prompt,
            background_color: self.config.background_color,
            text_color: self.config.text_color,
            text_background_color: self.config.text_background_color,
            change_summary: self.config.change_summary.clone(),
            last_error: self.last_error.as_ref().map(|e| e.to_string()),
        }
    }
}
