//! Headless Prompt Pong host
//!
//! Drives a match with two bots at a fixed tick rate. Whenever a point is
//! scored the scorer "types" the next scripted prompt and the configured
//! generator rewrites the game.

mod bot;
mod gateway;

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use game_core::{
    Command, Config, ConfigGateway, MatchOptions, MatchState, Params, PhaseKind, Player, Snapshot,
};

use crate::bot::Bot;
use crate::gateway::{CommandGateway, StaticGateway, DEFAULT_MAX_ATTEMPTS};

#[derive(Parser, Debug)]
#[command(name = "prompt-pong")]
#[command(about = "Headless Pong where every goal lets the scorer rewrite the game")]
struct Cli {
    /// Simulation ticks per second
    #[arg(long, default_value_t = Params::FPS)]
    fps: u32,
    /// Seed for serve directions
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Stop after this many ticks even if nobody has won
    #[arg(long, default_value_t = 108_000)]
    max_ticks: u64,
    /// Sleep between ticks to run at wall-clock speed
    #[arg(long, default_value_t = false)]
    realtime: bool,
    /// Initial configuration as JSON
    #[arg(long)]
    config: Option<PathBuf>,
    /// Generator command; receives a request on stdin, prints a config on stdout
    #[arg(long)]
    gateway_cmd: Option<String>,
    /// Attempts per prompt before the generator is given up on
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    gateway_attempts: u32,
    /// Seconds of simulation time to wait for the generator
    #[arg(long, default_value_t = Params::GATEWAY_TIMEOUT_SECS)]
    gateway_timeout: f32,
    /// Prompt typed by the next scorer (repeatable, used in order)
    #[arg(long = "prompt")]
    prompts: Vec<String>,
    /// Points needed to win
    #[arg(long, default_value_t = Params::MAX_SCORE)]
    max_score: u8,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    if cli.fps == 0 {
        bail!("--fps must be at least 1");
    }
    if cli.max_score == 0 {
        bail!("--max-score must be at least 1");
    }
    if !(cli.gateway_timeout.is_finite() && cli.gateway_timeout > 0.0) {
        bail!("--gateway-timeout must be a positive number of seconds");
    }
    let gateway_timeout = Duration::try_from_secs_f32(cli.gateway_timeout)
        .context("--gateway-timeout is out of range")?;

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    let gateway: Arc<dyn ConfigGateway> = match &cli.gateway_cmd {
        Some(command_line) => {
            let gateway = CommandGateway::parse(command_line)?
                .with_max_attempts(cli.gateway_attempts)
                .with_timeout(gateway_timeout);
            tracing::info!(command = %command_line, "using external generator");
            Arc::new(gateway)
        }
        None => {
            tracing::info!("no generator configured, prompts will not change the game");
            Arc::new(StaticGateway)
        }
    };

    let options = MatchOptions {
        max_score: cli.max_score,
        countdown_seconds: Params::COUNTDOWN_SECONDS,
        gateway_timeout_secs: cli.gateway_timeout,
        seed: cli.seed,
    };
    let mut state = MatchState::with_options(config, gateway, options)
        .context("initial configuration is invalid")?;
    let mut autoplay = Autoplay::new(cli.prompts.clone());

    let dt = 1.0 / cli.fps as f32;
    let frame = Duration::from_secs_f32(dt);
    // Fast mode has nothing to draw while paused, so it blocks on the gateway
    let settle = (!cli.realtime).then_some(gateway_timeout);

    tracing::info!(fps = cli.fps, seed = cli.seed, realtime = cli.realtime, "match starting");

    while state.is_running() && state.tick < cli.max_ticks {
        let started = Instant::now();

        host_tick(&mut state, &mut autoplay, dt, settle);

        if state.tick % u64::from(cli.fps) == 0 {
            log_snapshot(&state.snapshot());
        }

        if state.phase_kind() == PhaseKind::GameOver {
            break;
        }

        if cli.realtime {
            thread::sleep(frame.saturating_sub(started.elapsed()));
        }
    }

    let snap = state.snapshot();
    match snap.winner {
        Some(winner) => tracing::info!(
            %winner,
            score = %format!("{}-{}", snap.score_1, snap.score_2),
            ticks = snap.tick,
            "match finished"
        ),
        None => tracing::info!(
            score = %format!("{}-{}", snap.score_1, snap.score_2),
            ticks = snap.tick,
            "stopped without a winner"
        ),
    }
    Ok(())
}

/// One loop iteration: feed commands, optionally wait out the gateway, tick
fn host_tick(state: &mut MatchState, autoplay: &mut Autoplay, dt: f32, settle: Option<Duration>) {
    for command in autoplay.commands(&state.snapshot()) {
        state.handle_command(command);
    }

    if let Some(max_wait) = settle {
        if state.is_waiting_for_gateway() {
            state.settle_gateway(max_wait);
        }
    }

    state.tick(dt);
}

fn load_config(path: &Path) -> Result<Config> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config = proto::config_from_json(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn log_snapshot(snap: &Snapshot) {
    tracing::info!(
        tick = snap.tick,
        phase = ?snap.phase,
        score = %format!("{}-{}", snap.score_1, snap.score_2),
        serve = snap.serve.arrow(),
        headline = %snap.headline().unwrap_or_default(),
        summary = %snap.change_summary,
        "snapshot"
    );
    if let Some(error) = &snap.last_error {
        tracing::warn!(%error, "last reconfiguration failed");
    }
}

/// Both players' hands: paddle bots plus a queue of prompts
struct Autoplay {
    bots: [Bot; 2],
    prompts: VecDeque<String>,
}

impl Autoplay {
    fn new(prompts: Vec<String>) -> Self {
        Self {
            bots: [Bot::new(Player::One), Bot::new(Player::Two)],
            prompts: prompts.into(),
        }
    }

    fn commands(&mut self, snap: &Snapshot) -> Vec<Command> {
        match snap.phase {
            PhaseKind::Playing => self.bots.iter().map(|bot| bot.decide(snap)).collect(),
            PhaseKind::AwaitingReconfiguration => {
                // An exhausted script submits an empty prompt
                let prompt = self.prompts.pop_front().unwrap_or_default();
                if let Some(scorer) = snap.scorer {
                    tracing::info!(%scorer, %prompt, "submitting prompt");
                }
                prompt
                    .chars()
                    .map(Command::AppendChar)
                    .chain(std::iter::once(Command::Submit))
                    .collect()
            }
            PhaseKind::Countdown | PhaseKind::WaitingForGateway | PhaseKind::GameOver => {
                Vec::new()
            }
        }
    }
}
