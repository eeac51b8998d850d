use glam::Vec2;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tetris_defence_core::{CellCoord, PieceMode, HAND_SIZE};
use tetris_defence_session::{GameSession, InputSource, Key, MouseButton, SLOT_KEYS};
use tetris_defence_system_placement::WALL_SLOT;
use tetris_defence_world::query;

/// Every third piece is a wall.
const WALL_CADENCE: u32 = 3;

/// Input for one frame: at most one key press and one left click.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ScriptedInput {
    key: Option<Key>,
    click: Option<Vec2>,
}

impl InputSource for ScriptedInput {
    fn mouse_triggered(&self, button: MouseButton) -> bool {
        button == MouseButton::Left && self.click.is_some()
    }

    fn mouse_position(&self) -> Vec2 {
        self.click.unwrap_or(Vec2::NEG_ONE)
    }

    fn key_triggered(&self, key: Key) -> bool {
        self.key == Some(key)
    }
}

/// Greedy player: picks a slot, then clicks the best placeable cell for it.
#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
    skipped: u32,
}

impl Autopilot {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            skipped: 0,
        }
    }

    /// Chooses the input for the next frame.
    pub(crate) fn next_frame(&mut self, session: &GameSession) -> ScriptedInput {
        let Some(held) = session.placement().hand().held() else {
            return ScriptedInput {
                key: Some(SLOT_KEYS[self.choose_slot(session)]),
                click: None,
            };
        };

        match self.choose_target(session) {
            Some(click) => ScriptedInput {
                key: None,
                click: Some(click),
            },
            None => {
                // pressing the held slot again puts the piece back
                self.skipped = self.skipped.wrapping_add(1);
                ScriptedInput {
                    key: Some(SLOT_KEYS[held]),
                    click: None,
                }
            }
        }
    }

    fn choose_slot(&self, session: &GameSession) -> usize {
        let turn = session.summary().turns_made.wrapping_add(self.skipped);
        if turn % WALL_CADENCE == 0 {
            WALL_SLOT
        } else {
            1 + (turn as usize) % (HAND_SIZE - 1)
        }
    }

    fn choose_target(&mut self, session: &GameSession) -> Option<Vec2> {
        let world = session.world();
        let mode = session.placement().held_mode()?;
        let hostiles: Vec<CellCoord> = query::enemy_view(world)
            .iter()
            .filter(|enemy| enemy.is_hostile())
            .map(|enemy| enemy.cell)
            .collect();
        let layout = query::layout(world);
        let (columns, rows) = query::grid_dimensions(world);

        let mut best_score = 0;
        let mut best = Vec::new();
        for row in 0..rows {
            for column in 0..columns {
                let pixel = layout.to_pixel(column as i32, row as i32);
                let Some(preview) = session.preview_at(pixel) else {
                    continue;
                };
                if !preview.placeable {
                    continue;
                }
                let score = match mode {
                    PieceMode::Attack { .. } => preview
                        .cells
                        .iter()
                        .filter(|cell| hostiles.contains(cell))
                        .count(),
                    PieceMode::Wall => preview
                        .cells
                        .iter()
                        .filter(|cell| {
                            hostiles.iter().any(|enemy| {
                                enemy.row() == cell.row() && enemy.column() > cell.column()
                            })
                        })
                        .count(),
                };
                if score > best_score || best.is_empty() {
                    best_score = score;
                    best.clear();
                }
                if score == best_score {
                    best.push(pixel);
                }
            }
        }

        best.choose(&mut self.rng).copied()
    }
}
