#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn sequencing, wave progression and win/lose evaluation.
//!
//! The controller alternates between the player turn, which ends when a
//! piece is placed, and the enemy turn, which ends when the world reports
//! that every enemy acted. After each resolution it evaluates the lose and
//! win conditions. Both transitions are latched: the first one reached is
//! reported once, its sound cue is requested once, and the controller stops
//! issuing commands afterwards.

use tetris_defence_core::{Command, Event, GameOutcome, SoundCue, TurnPhase, WaveId, WAVES_TO_WIN};

/// Enemy turns a wave lasts before the next wave starts regardless of survivors.
pub const DEFAULT_TURNS_PER_WAVE: u32 = 6;

/// Configuration parameters required to construct the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    waves_to_win: u32,
    turns_per_wave: u32,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// A `turns_per_wave` of zero disables the turn limit so waves only
    /// advance once the grid is clear.
    #[must_use]
    pub const fn new(waves_to_win: u32, turns_per_wave: u32) -> Self {
        Self {
            waves_to_win,
            turns_per_wave,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(WAVES_TO_WIN, DEFAULT_TURNS_PER_WAVE)
    }
}

/// World facts the controller needs to evaluate the game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameStatus {
    /// Number of waves started so far.
    pub wave: WaveId,
    /// Hearts still alive.
    pub alive_hearts: u32,
    /// Live enemies that are not walls.
    pub hostile_enemies: usize,
}

/// Pure system that sequences turns and waves and reports the game outcome.
#[derive(Debug)]
pub struct TurnController {
    waves_to_win: u32,
    turns_per_wave: u32,
    phase: TurnPhase,
    outcome: GameOutcome,
    turns_in_wave: u32,
}

impl TurnController {
    /// Creates a new controller waiting for the first player turn.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            waves_to_win: config.waves_to_win,
            turns_per_wave: config.turns_per_wave,
            phase: TurnPhase::Player,
            outcome: GameOutcome::Continue,
            turns_in_wave: 0,
        }
    }

    /// Emits the command that opens the first wave.
    pub fn start(&mut self, out: &mut Vec<Command>) {
        out.push(Command::StartWave);
    }

    /// Whose turn is being resolved.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Latched outcome of the game.
    #[must_use]
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// Number of waves that must be survived.
    #[must_use]
    pub fn waves_to_win(&self) -> u32 {
        self.waves_to_win
    }

    /// Reports whether the player has run out of hearts.
    #[must_use]
    pub fn check_lose_condition(&self, status: &GameStatus) -> bool {
        status.alive_hearts == 0
    }

    /// Reports whether every wave was survived and the grid is clear.
    #[must_use]
    pub fn check_win_condition(&self, status: &GameStatus) -> bool {
        status.wave.get() >= self.waves_to_win
            && status.hostile_enemies == 0
            && !self.check_lose_condition(status)
    }

    /// Classifies `status`. Losing takes priority over winning.
    #[must_use]
    pub fn evaluate(&self, status: &GameStatus) -> GameOutcome {
        if self.check_lose_condition(status) {
            GameOutcome::Lost
        } else if self.check_win_condition(status) {
            GameOutcome::Won
        } else {
            GameOutcome::Continue
        }
    }

    /// Consumes world events and the post-event status to emit turn commands.
    pub fn handle(&mut self, events: &[Event], status: &GameStatus, out: &mut Vec<Command>) {
        if events.iter().any(|event| matches!(event, Event::GameReset)) {
            self.phase = TurnPhase::Player;
            self.outcome = GameOutcome::Continue;
            self.turns_in_wave = 0;
            self.start(out);
            return;
        }

        if self.outcome != GameOutcome::Continue {
            return;
        }

        let mut turn_ended = false;
        let mut resolution = false;
        for event in events {
            match event {
                Event::PiecePlaced { .. } if self.phase == TurnPhase::Player => {
                    self.phase = TurnPhase::Enemy;
                    out.push(Command::BeginEnemyTurn);
                }
                Event::EnemyTurnEnded { .. } => {
                    self.phase = TurnPhase::Player;
                    self.turns_in_wave = self.turns_in_wave.saturating_add(1);
                    turn_ended = true;
                    resolution = true;
                }
                Event::WaveStarted { .. } => self.turns_in_wave = 0,
                Event::LifeLost { .. } | Event::EnemyKilled { .. } | Event::EnemyExited { .. } => {
                    resolution = true;
                }
                _ => {}
            }
        }

        if !resolution {
            return;
        }

        self.outcome = self.evaluate(status);
        match self.outcome {
            GameOutcome::Lost => out.push(Command::RequestSound {
                cue: SoundCue::GameOver,
            }),
            GameOutcome::Won => out.push(Command::RequestSound {
                cue: SoundCue::GameWin,
            }),
            GameOutcome::Continue if turn_ended && self.wave_finished(status) => {
                out.push(Command::StartWave);
            }
            GameOutcome::Continue => {}
        }
    }

    fn wave_finished(&self, status: &GameStatus) -> bool {
        if status.wave.get() >= self.waves_to_win {
            return false;
        }
        let timed_out = self.turns_per_wave > 0 && self.turns_in_wave >= self.turns_per_wave;
        status.hostile_enemies == 0 || timed_out
    }
}
