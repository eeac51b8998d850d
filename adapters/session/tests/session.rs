use glam::Vec2;
use tetris_defence_core::{ChannelGroup, EnemyKind, GameOutcome, SoundCue};
use tetris_defence_session::{
    AudioSink, Clock, GameSession, InputSource, Key, MouseButton, RowPolicy, SceneAction,
    SceneDirector, SessionConfig, TITLE_CARD_GATE_SECONDS,
};
use tetris_defence_world::query;

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

impl Recorder {
    fn count(&self, cue: SoundCue) -> usize {
        self.sounds.iter().filter(|(played, _)| *played == cue).count()
    }
}

struct Tick(f32);

impl Clock for Tick {
    fn delta_time(&self) -> f32 {
        self.0
    }
}

/// Input for a single frame: at most one key press and one left click.
#[derive(Default)]
struct Frame {
    key: Option<Key>,
    click: Option<Vec2>,
}

impl InputSource for Frame {
    fn mouse_triggered(&self, button: MouseButton) -> bool {
        button == MouseButton::Left && self.click.is_some()
    }

    fn mouse_position(&self) -> Vec2 {
        self.click.unwrap_or(Vec2::new(-1.0, -1.0))
    }

    fn key_triggered(&self, key: Key) -> bool {
        self.key == Some(key)
    }
}

fn short_game() -> SessionConfig {
    SessionConfig {
        columns: 8,
        rows: 4,
        hearts: 1,
        waves_to_win: 1,
        grave_spawn_interval: 0,
        ..SessionConfig::default()
    }
}

fn start(config: SessionConfig) -> (GameSession, Recorder, Recorder) {
    let mut audio = Recorder::default();
    let mut director = Recorder::default();
    let mut session = GameSession::new(config);
    session.init(&mut audio);
    session.update(
        &Tick(TITLE_CARD_GATE_SECONDS),
        &Frame::default(),
        &mut audio,
        &mut director,
    );
    assert!(!session.title_card_active());
    (session, audio, director)
}

fn cell_pixel(session: &GameSession, column: i32, row: i32) -> Vec2 {
    query::layout(session.world()).to_pixel(column, row)
}

/// Alternates between picking the first attack slot and striking the top-left corner.
fn play_attacks(
    session: &mut GameSession,
    audio: &mut Recorder,
    director: &mut Recorder,
    frames: usize,
) {
    for frame in 0..frames {
        if session.outcome() != GameOutcome::Continue {
            return;
        }
        let input = if frame % 2 == 0 {
            Frame {
                key: Some(Key::Digit2),
                click: None,
            }
        } else {
            Frame {
                key: None,
                click: Some(cell_pixel(session, 0, 0)),
            }
        };
        session.update(&Tick(0.016), &input, audio, director);
    }
}

#[test]
fn clicking_a_slot_then_a_cell_builds_walls() {
    let (mut session, mut audio, mut director) = start(short_game());
    let slot = session
        .hand_layout()
        .slot_rect(0)
        .expect("wall slot");

    session.update(
        &Tick(0.016),
        &Frame {
            key: None,
            click: Some(slot.min + slot.size * 0.5),
        },
        &mut audio,
        &mut director,
    );
    assert_eq!(session.placement().hand().held(), Some(0));
    assert!(audio
        .sounds
        .contains(&(SoundCue::PieceSelected, ChannelGroup::Sfx)));

    let target = cell_pixel(&session, 0, 0);
    session.update(
        &Tick(0.016),
        &Frame {
            key: None,
            click: Some(target),
        },
        &mut audio,
        &mut director,
    );

    let walls = query::enemy_view(session.world())
        .iter()
        .filter(|enemy| enemy.kind == EnemyKind::Wall)
        .count();
    assert!(walls > 0);
    assert_eq!(session.summary().turns_made, 1);
    assert_eq!(audio.count(SoundCue::PiecePlaced), 1);
}

#[test]
fn a_decided_game_changes_scene_once_after_the_closing_card() {
    let (mut session, mut audio, mut director) = start(short_game());
    play_attacks(&mut session, &mut audio, &mut director, 200);

    let outcome = session.outcome();
    assert_ne!(outcome, GameOutcome::Continue);
    assert!(session.title_card_active());
    assert!(director.scenes.is_empty());

    let closing = match outcome {
        GameOutcome::Won => SoundCue::GameWin,
        _ => SoundCue::GameOver,
    };
    assert_eq!(audio.count(closing), 1);
    assert!(audio.sounds.contains(&(closing, ChannelGroup::Sfx)));

    for _ in 0..3 {
        session.update(
            &Tick(TITLE_CARD_GATE_SECONDS),
            &Frame::default(),
            &mut audio,
            &mut director,
        );
    }

    let summary = session.summary();
    let expected = match outcome {
        GameOutcome::Won => SceneAction::Victory(summary),
        _ => SceneAction::GameOver(summary),
    };
    assert_eq!(director.scenes, vec![expected]);
    assert_eq!(audio.count(closing), 1);
}

#[test]
fn identical_seeds_and_input_replay_identically() {
    let run = || {
        let (mut session, mut audio, mut director) = start(short_game());
        play_attacks(&mut session, &mut audio, &mut director, 200);
        (
            session.summary(),
            query::enemy_view(session.world()).into_vec(),
            audio.sounds,
        )
    };

    assert_eq!(run(), run());
}

#[test]
fn restarted_session_replays_a_fresh_one() {
    let mut config = short_game();
    config.waves_to_win = 3;
    config.wave.row_policy = RowPolicy::RoundRobin;

    let (mut fresh, mut fresh_audio, mut fresh_director) = start(config.clone());
    play_attacks(&mut fresh, &mut fresh_audio, &mut fresh_director, 40);

    let (mut restarted, mut audio, mut director) = start(config);
    play_attacks(&mut restarted, &mut audio, &mut director, 6);
    restarted.restart(&mut audio);
    restarted.update(
        &Tick(TITLE_CARD_GATE_SECONDS),
        &Frame::default(),
        &mut audio,
        &mut director,
    );
    play_attacks(&mut restarted, &mut audio, &mut director, 40);

    assert_eq!(restarted.summary(), fresh.summary());
    assert_eq!(
        query::enemy_view(restarted.world()).into_vec(),
        query::enemy_view(fresh.world()).into_vec()
    );
}
