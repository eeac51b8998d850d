#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session that owns the world and every system for one level.
//!
//! The session is the only place where commands reach the world. Each update
//! turns polled input into placement commands, applies them, broadcasts the
//! resulting events to every system and repeats until no system has anything
//! left to say. Sounds requested by the simulation are forwarded to the
//! host's [`AudioSink`], and once the game is decided the session waits for
//! the closing title card before asking the [`SceneDirector`] for the
//! victory or defeat scene.

mod collaborators;
mod config;
mod hand_layout;

use glam::Vec2;
use tetris_defence_core::{Command, Event, GameOutcome, TurnPhase};
use tetris_defence_system_game_state::{self as game_state, GameStatus, TurnController};
use tetris_defence_system_movement::Movement;
use tetris_defence_system_placement::{self as placement, Placement, PlacementInput, PlacementPreview};
use tetris_defence_system_spawning::{self as spawning, GraveSpawning};
use tetris_defence_system_wave_generation::{self as wave_generation, WaveGeneration, WaveReport};
use tetris_defence_world::{self as world, query, World};
use tracing::{debug, info, warn};

pub use collaborators::{
    AudioSink, Clock, InputSource, Key, MouseButton, SceneAction, SceneDirector, SessionSummary,
    SLOT_KEYS,
};
pub use config::{ConfigError, PrefabConfig, RowPolicy, SessionConfig, WaveConfig};
pub use hand_layout::{HandLayout, SlotRect};

/// Seconds a title card stays on screen.
pub const TITLE_CARD_SECONDS: f32 = 5.8;
/// Fraction of the card's lifetime after which it stops gating the game.
pub const TITLE_CARD_FADE_FRACTION: f32 = 0.9;
/// Seconds a title card blocks input or delays a scene change.
pub const TITLE_CARD_GATE_SECONDS: f32 = TITLE_CARD_SECONDS * TITLE_CARD_FADE_FRACTION;

const BAG_SEED_SALT: u64 = 0x6261_6700_0000_0001;
const GRAVE_SEED_SALT: u64 = 0x6772_6176_6500_0001;

/// Accumulating countdown driven by frame delta time.
#[derive(Clone, Copy, Debug, PartialEq)]
struct TitleCard {
    elapsed: f32,
}

impl TitleCard {
    const fn new() -> Self {
        Self { elapsed: 0.0 }
    }

    /// Advances the card and reports whether it has finished gating.
    fn advance(&mut self, delta: f32) -> bool {
        self.elapsed += delta.max(0.0);
        self.elapsed >= TITLE_CARD_GATE_SECONDS
    }
}

#[derive(Clone, Debug)]
struct Ending {
    card: TitleCard,
    scene: Option<SceneAction>,
}

/// One level of play: the world, its systems and the session timers.
#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    world: World,
    movement: Movement,
    waves: WaveGeneration,
    graves: GraveSpawning,
    placement: Placement,
    controller: TurnController,
    opening: Option<TitleCard>,
    ending: Option<Ending>,
    turns_made: u32,
}

impl GameSession {
    /// Builds a session from `config`. Call [`GameSession::init`] before updating.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let world = World::with_catalog(config.catalog());
        let waves = WaveGeneration::new(wave_generation::Config::new(
            config.wave_tuning(),
            config.seed,
        ));
        let graves = GraveSpawning::new(spawning::Config::new(
            config.grave_spawn_interval,
            config.seed ^ GRAVE_SEED_SALT,
        ));
        let placement = Placement::new(placement::Config::new(
            config.seed ^ BAG_SEED_SALT,
            config.attack_damage,
        ));
        let controller = TurnController::new(game_state::Config::new(
            config.waves_to_win,
            config.turns_per_wave,
        ));

        Self {
            config,
            world,
            movement: Movement::new(),
            waves,
            graves,
            placement,
            controller,
            opening: None,
            ending: None,
            turns_made: 0,
        }
    }

    /// Configures the world and opens the first wave behind a title card.
    pub fn init(&mut self, audio: &mut dyn AudioSink) {
        info!(seed = self.config.seed, "session starting");
        let mut commands = vec![
            Command::ConfigureGrid {
                columns: self.config.columns,
                rows: self.config.rows,
            },
            Command::ConfigureViewport {
                width: self.config.viewport_width,
                height: self.config.viewport_height,
            },
            Command::ConfigureHearts {
                count: self.config.hearts,
            },
        ];
        self.controller.start(&mut commands);
        self.opening = Some(TitleCard::new());
        self.dispatch(commands, audio);
    }

    /// Advances timers, consumes this frame's input and resolves any turn it triggers.
    pub fn update(
        &mut self,
        clock: &dyn Clock,
        input: &dyn InputSource,
        audio: &mut dyn AudioSink,
        director: &mut dyn SceneDirector,
    ) {
        let delta = clock.delta_time();

        if let Some(ending) = self.ending.as_mut() {
            if ending.card.advance(delta) {
                if let Some(scene) = ending.scene.take() {
                    info!(?scene, "changing scene");
                    director.set_next_scene(scene);
                }
            }
            return;
        }

        if let Some(card) = self.opening.as_mut() {
            if !card.advance(delta) {
                return;
            }
            self.opening = None;
        }

        if input.key_triggered(Key::Escape) {
            info!("leaving level for the main menu");
            director.set_next_scene(SceneAction::MainMenu);
            return;
        }

        let frame = self.read_input(input);
        let mut commands = Vec::new();
        self.placement.handle(&[], frame, &mut commands);
        self.dispatch(commands, audio);
    }

    /// Applies a new viewport size and relays out the grid.
    pub fn resize(&mut self, viewport: Vec2, audio: &mut dyn AudioSink) {
        self.dispatch(
            vec![Command::ConfigureViewport {
                width: viewport.x,
                height: viewport.y,
            }],
            audio,
        );
    }

    /// Clears all progress and starts again from the first wave.
    pub fn restart(&mut self, audio: &mut dyn AudioSink) {
        info!("session restarting");
        self.turns_made = 0;
        self.ending = None;
        self.opening = Some(TitleCard::new());
        self.dispatch(vec![Command::ResetGame], audio);
    }

    /// Ends the session, releasing the world and returning its statistics.
    #[must_use]
    pub fn teardown(self) -> SessionSummary {
        let summary = self.summary();
        info!(?summary, "session torn down");
        summary
    }

    /// Current statistics.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let waves = query::wave_snapshot(&self.world);
        let outcome = self.controller.outcome();
        let waves_survived = match outcome {
            GameOutcome::Won => waves.wave.get(),
            GameOutcome::Continue | GameOutcome::Lost => waves.wave.get().saturating_sub(1),
        };
        SessionSummary {
            outcome,
            waves_survived,
            enemies_killed: waves.enemies_killed,
            turns_made: self.turns_made,
            hearts_remaining: query::life_snapshot(&self.world).alive,
        }
    }

    /// Read-only access to the world for rendering.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the player's hand and placement state.
    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Latched game outcome.
    #[must_use]
    pub fn outcome(&self) -> GameOutcome {
        self.controller.outcome()
    }

    /// Whose turn is being resolved.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.controller.phase()
    }

    /// Reports whether a title card currently gates the level.
    #[must_use]
    pub fn title_card_active(&self) -> bool {
        self.opening.is_some() || self.ending.is_some()
    }

    /// Summary of the most recently generated wave.
    #[must_use]
    pub fn last_wave_report(&self) -> Option<&WaveReport> {
        self.waves.last_report()
    }

    /// Pixel layout of the hand panel for the current viewport.
    #[must_use]
    pub fn hand_layout(&self) -> HandLayout {
        HandLayout::new(query::viewport(&self.world))
    }

    /// Preview of the held piece anchored under `pointer`.
    #[must_use]
    pub fn preview_at(&self, pointer: Vec2) -> Option<PlacementPreview> {
        let origin = query::layout(&self.world).from_pixel(pointer)?;
        self.placement
            .preview(origin, query::occupancy_view(&self.world), |cell| {
                query::enemy_at(&self.world, cell).map_or(false, |enemy| !enemy.is_hostile())
            })
    }

    fn read_input(&self, input: &dyn InputSource) -> PlacementInput {
        let pointer = input.mouse_position();
        let mut frame = PlacementInput {
            cursor_cell: query::layout(&self.world).from_pixel(pointer),
            ..PlacementInput::default()
        };

        if input.mouse_triggered(MouseButton::Left) {
            match self.hand_layout().slot_at(pointer) {
                Some(slot) => frame.select_slot = Some(slot),
                None => frame.confirm = frame.cursor_cell.is_some(),
            }
        }
        if input.mouse_triggered(MouseButton::Right) {
            frame.cancel = true;
        }
        for (slot, key) in SLOT_KEYS.iter().enumerate() {
            if input.key_triggered(*key) {
                frame.select_slot = Some(slot);
            }
        }
        frame
    }

    fn status(&self) -> GameStatus {
        GameStatus {
            wave: query::wave_snapshot(&self.world).wave,
            alive_hearts: query::life_snapshot(&self.world).alive,
            hostile_enemies: query::hostile_count(&self.world),
        }
    }

    /// Applies `commands` and feeds the resulting events to every system until quiescent.
    fn dispatch(&mut self, mut commands: Vec<Command>, audio: &mut dyn AudioSink) {
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.observe(&events, audio);

            let status = self.status();
            let enemy_view = query::enemy_view(&self.world);
            let catalog = query::catalog_view(&self.world);
            let occupancy = query::occupancy_view(&self.world);

            self.placement
                .handle(&events, PlacementInput::default(), &mut commands);
            self.movement.handle(&events, &enemy_view, &mut commands);
            self.waves.handle(&events, catalog, occupancy, &mut commands);
            self.graves
                .handle(&events, &enemy_view, catalog, occupancy, &mut commands);
            self.controller.handle(&events, &status, &mut commands);
        }

        self.check_outcome();
    }

    fn observe(&mut self, events: &[Event], audio: &mut dyn AudioSink) {
        for event in events {
            match event {
                Event::SoundRequested { cue } => audio.play_sound(*cue, cue.channel()),
                Event::WaveStarted { wave } => info!(wave = wave.get(), "wave started"),
                Event::WaveFunded { wave, credit } => {
                    debug!(wave = wave.get(), credit, "wave funded");
                }
                Event::PiecePlaced { kind, mode, .. } => {
                    self.turns_made = self.turns_made.saturating_add(1);
                    debug!(?kind, ?mode, "piece placed");
                }
                Event::PlacementRejected {
                    kind,
                    origin,
                    reason,
                } => debug!(?kind, ?origin, ?reason, "placement rejected"),
                Event::SpawnRejected {
                    prefab,
                    cell,
                    reason,
                } => debug!(prefab = prefab.get(), ?cell, ?reason, "spawn rejected"),
                Event::EnemyExited { enemy, row } => {
                    warn!(enemy = enemy.get(), row, "enemy broke through");
                }
                Event::LifeLost { remaining } => info!(remaining, "heart lost"),
                Event::EnemyTurnEnded { turn } => debug!(turn, "enemy turn resolved"),
                _ => {}
            }
        }
    }

    fn check_outcome(&mut self) {
        if self.ending.is_some() {
            return;
        }
        let scene = match self.controller.outcome() {
            GameOutcome::Continue => return,
            GameOutcome::Won => SceneAction::Victory(self.summary()),
            GameOutcome::Lost => SceneAction::GameOver(self.summary()),
        };
        info!(outcome = ?self.controller.outcome(), "game decided");
        self.ending = Some(Ending {
            card: TitleCard::new(),
            scene: Some(scene),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_defence_core::{ChannelGroup, SoundCue};

    #[derive(Default)]
    struct Recorder {
        sounds: Vec<(SoundCue, ChannelGroup)>,
        scenes: Vec<SceneAction>,
    }

    impl AudioSink for Recorder {
        fn play_sound(&mut self, cue: SoundCue, channel: ChannelGroup) {
            self.sounds.push((cue, channel));
        }
    }

    impl SceneDirector for Recorder {
        fn set_next_scene(&mut self, action: SceneAction) {
            self.scenes.push(action);
        }
    }

    struct FixedClock(f32);

    impl Clock for FixedClock {
        fn delta_time(&self) -> f32 {
            self.0
        }
    }

    #[derive(Default)]
    struct Idle;

    impl InputSource for Idle {
        fn mouse_triggered(&self, _button: MouseButton) -> bool {
            false
        }

        fn mouse_position(&self) -> Vec2 {
            Vec2::ZERO
        }

        fn key_triggered(&self, _key: Key) -> bool {
            false
        }
    }

    struct Escape;

    impl InputSource for Escape {
        fn mouse_triggered(&self, _button: MouseButton) -> bool {
            false
        }

        fn mouse_position(&self) -> Vec2 {
            Vec2::ZERO
        }

        fn key_triggered(&self, key: Key) -> bool {
            key == Key::Escape
        }
    }

    fn started_session() -> (GameSession, Recorder) {
        let mut recorder = Recorder::default();
        let mut session = GameSession::new(SessionConfig::default());
        session.init(&mut recorder);
        (session, recorder)
    }

    #[test]
    fn init_opens_the_first_wave() {
        let (session, _) = started_session();
        let snapshot = query::wave_snapshot(session.world());
        assert_eq!(snapshot.wave.get(), 1);
        assert!(query::hostile_count(session.world()) > 0);
        assert_eq!(session.phase(), TurnPhase::Player);
        assert!(session.last_wave_report().is_some());
    }

    #[test]
    fn title_card_gates_input_until_it_fades() {
        let (mut session, mut recorder) = started_session();
        let mut director = Recorder::default();

        session.update(&FixedClock(1.0), &Escape, &mut recorder, &mut director);
        assert!(session.title_card_active());
        assert!(director.scenes.is_empty());

        session.update(&FixedClock(TITLE_CARD_GATE_SECONDS), &Escape, &mut recorder, &mut director);
        assert!(!session.title_card_active());
        assert_eq!(director.scenes, vec![SceneAction::MainMenu]);
    }

    #[test]
    fn idle_frames_never_resolve_a_turn() {
        let (mut session, mut recorder) = started_session();
        let mut director = Recorder::default();
        let before = query::enemy_view(session.world()).into_vec();

        for _ in 0..20 {
            session.update(&FixedClock(0.5), &Idle, &mut recorder, &mut director);
        }

        assert_eq!(query::enemy_view(session.world()).into_vec(), before);
        assert_eq!(session.summary().turns_made, 0);
        assert!(director.scenes.is_empty());
    }

    #[test]
    fn restart_resets_progress() {
        let (mut session, mut recorder) = started_session();
        session.restart(&mut recorder);

        let summary = session.summary();
        assert_eq!(summary.outcome, GameOutcome::Continue);
        assert_eq!(summary.turns_made, 0);
        assert_eq!(query::wave_snapshot(session.world()).wave.get(), 1);
        assert!(session.title_card_active());
    }

    #[test]
    fn summary_counts_waves_survived() {
        let (session, _) = started_session();
        let summary = session.teardown();
        assert_eq!(summary.waves_survived, 0);
        assert_eq!(summary.hearts_remaining, SessionConfig::default().hearts);
    }
}
