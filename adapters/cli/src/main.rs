#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a seeded Tetris Defence game headlessly.

mod autopilot;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tetris_defence_core::{ChannelGroup, GameOutcome, SoundCue};
use tetris_defence_session::{
    AudioSink, Clock, GameSession, SceneAction, SceneDirector, SessionConfig, SessionSummary,
};
use tetris_defence_world::query;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::autopilot::{Autopilot, ScriptedInput};

/// Simulated seconds per frame.
const FRAME_SECONDS: f32 = 0.1;
/// Frames allowed per placed piece before the run is abandoned.
const FRAMES_PER_TURN: u64 = 128;

/// Command line options.
#[derive(Debug, Parser)]
#[clap(name = "tetris-defence", about = "Plays a seeded headless game of Tetris Defence")]
struct Opt {
    /// TOML session configuration.
    #[clap(long)]
    config: Option<PathBuf>,
    /// Overrides the configured seed.
    #[clap(long)]
    seed: Option<u64>,
    /// Overrides the number of waves to survive.
    #[clap(long)]
    waves: Option<u32>,
    /// Stops after this many player turns.
    #[clap(long, default_value_t = 500)]
    max_turns: u32,
    /// Prints the run report as JSON.
    #[clap(long)]
    json: bool,
}

/// Result of one headless run.
#[derive(Debug, Serialize)]
struct RunReport {
    seed: u64,
    frames: u64,
    sounds_played: usize,
    summary: SessionSummary,
    scene: Option<SceneAction>,
}

struct FixedStep(f32);

impl Clock for FixedStep {
    fn delta_time(&self) -> f32 {
        self.0
    }
}

#[derive(Default)]
struct TallyAudio {
    played: usize,
}

impl AudioSink for TallyAudio {
    fn play_sound(&mut self, cue: SoundCue, channel: ChannelGroup) {
        self.played += 1;
        debug!(?cue, ?channel, "sound");
    }
}

#[derive(Default)]
struct Director {
    next: Option<SceneAction>,
}

impl SceneDirector for Director {
    fn set_next_scene(&mut self, action: SceneAction) {
        self.next = Some(action);
    }
}

fn init_logging() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::Layer::new().with_writer(io::stderr))
        .try_init()
        .context("failed to install tracing subscriber")
}

fn load_config(opt: &Opt) -> Result<SessionConfig> {
    let mut config = match &opt.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = opt.seed {
        config.seed = seed;
    }
    if let Some(waves) = opt.waves {
        config.waves_to_win = waves;
    }
    config
        .validate()
        .context("command line overrides produced an invalid config")?;
    Ok(config)
}

fn play(config: SessionConfig, max_turns: u32) -> (RunReport, &'static str) {
    let seed = config.seed;
    let clock = FixedStep(FRAME_SECONDS);
    let mut audio = TallyAudio::default();
    let mut director = Director::default();
    let mut autopilot = Autopilot::new(seed);
    let mut session = GameSession::new(config);
    session.init(&mut audio);
    let banner = query::welcome_banner(session.world());

    let frame_limit = (u64::from(max_turns) + 2).saturating_mul(FRAMES_PER_TURN);
    let mut frames = 0;
    while director.next.is_none() && frames < frame_limit {
        let decided = session.outcome() != GameOutcome::Continue;
        if !decided && session.summary().turns_made >= max_turns {
            break;
        }
        let input = if session.title_card_active() {
            ScriptedInput::default()
        } else {
            autopilot.next_frame(&session)
        };
        session.update(&clock, &input, &mut audio, &mut director);
        frames += 1;
    }
    if frames >= frame_limit {
        warn!(frames, "frame limit reached before the game settled");
    }

    let report = RunReport {
        seed,
        frames,
        sounds_played: audio.played,
        summary: session.teardown(),
        scene: director.next,
    };
    (report, banner)
}

fn main() -> Result<()> {
    init_logging()?;
    let opt = Opt::parse();
    let config = load_config(&opt)?;
    info!(seed = config.seed, waves = config.waves_to_win, "starting headless run");

    let (report, banner) = play(config, opt.max_turns);
    if opt.json {
        let json = serde_json::to_string_pretty(&report).context("failed to encode run report")?;
        println!("{json}");
    } else {
        let summary = &report.summary;
        println!("{banner}");
        println!(
            "{:?} after {} turns: {} waves survived, {} enemies killed, {} hearts left",
            summary.outcome,
            summary.turns_made,
            summary.waves_survived,
            summary.enemies_killed,
            summary.hearts_remaining
        );
    }
    Ok(())
}
