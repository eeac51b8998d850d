//! Interfaces the session consumes from the host application.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tetris_defence_core::{ChannelGroup, GameOutcome, SoundCue, HAND_SIZE};

/// Mouse buttons the session polls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Selects slots and confirms placements.
    Left,
    /// Releases the held piece.
    Right,
}

/// Keys the session polls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Leaves the level for the main menu.
    Escape,
    /// Selects hand slot 0.
    Digit1,
    /// Selects hand slot 1.
    Digit2,
    /// Selects hand slot 2.
    Digit3,
    /// Selects hand slot 3.
    Digit4,
    /// Selects hand slot 4.
    Digit5,
}

/// Keys that select the hand slot matching their index.
pub const SLOT_KEYS: [Key; HAND_SIZE] = [Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4, Key::Digit5];

/// Frame timing source.
pub trait Clock {
    /// Seconds elapsed since the previous update.
    fn delta_time(&self) -> f32;
}

/// Edge-triggered input polling.
pub trait InputSource {
    /// Reports whether `button` was pressed this frame.
    fn mouse_triggered(&self, button: MouseButton) -> bool;

    /// Cursor position in viewport pixels.
    fn mouse_position(&self) -> Vec2;

    /// Reports whether `key` was pressed this frame.
    fn key_triggered(&self, key: Key) -> bool;
}

/// Fire-and-forget audio playback.
pub trait AudioSink {
    /// Starts playing `cue` on `channel`.
    fn play_sound(&mut self, cue: SoundCue, channel: ChannelGroup);
}

/// Deferred scene switching.
pub trait SceneDirector {
    /// Requests `action` once the current update returns.
    fn set_next_scene(&mut self, action: SceneAction);
}

/// Scenes the session can hand control to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneAction {
    /// Return to the title menu.
    MainMenu,
    /// Start a fresh level.
    GameLevel,
    /// Show the victory screen.
    Victory(SessionSummary),
    /// Show the defeat screen.
    GameOver(SessionSummary),
}

/// Statistics shown when a session ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// How the session ended.
    pub outcome: GameOutcome,
    /// Waves fully survived.
    pub waves_survived: u32,
    /// Enemies killed by attack pieces.
    pub enemies_killed: u32,
    /// Pieces the player placed.
    pub turns_made: u32,
    /// Hearts still alive.
    pub hearts_remaining: u32,
}
