#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure player-turn system that turns hand selection and cursor input into
//! piece placement commands.

mod bag;
mod hand;

use tetris_defence_core::{
    CellCoord, Command, Event, OccupancyView, PieceKind, PieceMode, SoundCue, TurnPhase,
};

pub use bag::PieceBag;
pub use hand::{slot_mode, PlayerHand, WALL_SLOT};

/// Declarative placement preview describing where the held piece would land.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Kind of the held piece.
    pub kind: PieceKind,
    /// Effect the piece would have.
    pub mode: PieceMode,
    /// Cell aligned with the shape's top-left corner.
    pub origin: CellCoord,
    /// Covered cells that lie inside the grid.
    pub cells: Vec<CellCoord>,
    /// Indicates whether the world would accept the placement.
    pub placeable: bool,
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementInput {
    /// Hand slot the player clicked this frame.
    pub select_slot: Option<usize>,
    /// Indicates whether the player released the held piece this frame.
    pub cancel: bool,
    /// Indicates whether the player confirmed a placement this frame.
    pub confirm: bool,
    /// Grid cell currently under the cursor.
    pub cursor_cell: Option<CellCoord>,
}

impl PlacementInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        select_slot: Option<usize>,
        cancel: bool,
        confirm: bool,
        cursor_cell: Option<CellCoord>,
    ) -> Self {
        Self {
            select_slot,
            cancel,
            confirm,
            cursor_cell,
        }
    }
}

/// Configuration parameters required to construct the placement system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    bag_seed: u64,
    attack_damage: u32,
}

impl Config {
    /// Creates a new configuration using the provided bag seed and attack damage.
    #[must_use]
    pub const fn new(bag_seed: u64, attack_damage: u32) -> Self {
        Self {
            bag_seed,
            attack_damage,
        }
    }
}

/// Player-turn system that owns the hand and emits placement commands.
#[derive(Debug)]
pub struct Placement {
    hand: PlayerHand,
    bag_seed: u64,
    attack_damage: u32,
    phase: TurnPhase,
    awaiting_result: bool,
}

impl Placement {
    /// Creates a new placement system with a freshly dealt hand.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            hand: PlayerHand::new(PieceBag::new(config.bag_seed)),
            bag_seed: config.bag_seed,
            attack_damage: config.attack_damage,
            phase: TurnPhase::Player,
            awaiting_result: false,
        }
    }

    /// Read-only access to the hand.
    #[must_use]
    pub fn hand(&self) -> &PlayerHand {
        &self.hand
    }

    /// Phase the system believes the game is in.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Effect of the currently held piece, if any.
    #[must_use]
    pub fn held_mode(&self) -> Option<PieceMode> {
        self.hand
            .held()
            .map(|slot| slot_mode(slot, self.attack_damage))
    }

    /// Computes the preview for the held piece anchored at `origin`.
    ///
    /// The `is_barrier` closure should mirror the world's view of which
    /// occupants are walls so attack previews can be validated.
    pub fn preview<F>(
        &self,
        origin: CellCoord,
        occupancy: OccupancyView<'_>,
        is_barrier: F,
    ) -> Option<PlacementPreview>
    where
        F: Fn(CellCoord) -> bool,
    {
        let piece = self.hand.held_piece()?;
        let mode = self.held_mode()?;
        let (columns, rows) = occupancy.dimensions();

        let (cells, placeable) = match piece.shape().footprint(origin, columns, rows) {
            Ok(cells) => {
                let placeable = match mode {
                    PieceMode::Wall => cells.iter().all(|cell| occupancy.is_free(*cell)),
                    PieceMode::Attack { .. } => !cells.iter().any(|cell| is_barrier(*cell)),
                };
                (cells, placeable)
            }
            Err(_) => {
                let cells = piece
                    .shape()
                    .offsets()
                    .map(|(x, y)| {
                        CellCoord::new(
                            origin.column().saturating_add(x),
                            origin.row().saturating_add(y),
                        )
                    })
                    .filter(|cell| occupancy.contains(*cell))
                    .collect();
                (cells, false)
            }
        };

        Some(PlacementPreview {
            kind: piece.kind(),
            mode,
            origin,
            cells,
            placeable,
        })
    }

    /// Consumes world events and adapter-derived input to emit placement commands.
    pub fn handle(&mut self, events: &[Event], input: PlacementInput, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::EnemyTurnStarted { .. } => self.phase = TurnPhase::Enemy,
                Event::EnemyTurnEnded { .. } => self.phase = TurnPhase::Player,
                Event::PiecePlaced { .. } if self.awaiting_result => {
                    self.awaiting_result = false;
                    let _ = self.hand.remove_piece_held_from_hand();
                }
                Event::PlacementRejected { .. } => self.awaiting_result = false,
                Event::GameReset => {
                    self.hand = PlayerHand::new(PieceBag::new(self.bag_seed));
                    self.phase = TurnPhase::Player;
                    self.awaiting_result = false;
                }
                _ => {}
            }
        }

        if self.phase != TurnPhase::Player || self.awaiting_result {
            return;
        }

        if let Some(slot) = input.select_slot {
            if self.hand.held() == Some(slot) {
                self.hand.release();
            } else if self.hand.hold(slot) {
                out.push(Command::RequestSound {
                    cue: SoundCue::PieceSelected,
                });
            }
        }

        if input.cancel {
            self.hand.release();
        }

        if input.confirm {
            let (Some(origin), Some(piece), Some(mode)) =
                (input.cursor_cell, self.hand.held_piece(), self.held_mode())
            else {
                return;
            };
            self.awaiting_result = true;
            out.push(Command::PlacePiece {
                piece,
                origin,
                mode,
            });
        }
    }
}
