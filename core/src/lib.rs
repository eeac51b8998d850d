#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tetris Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

pub mod pieces;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

pub use pieces::{PieceKind, PieceMode, PieceShape, TetrisPiece, SHAPE_BOUNDS};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tetris Defence.";

/// Number of slots in the player's hand.
pub const HAND_SIZE: usize = 5;

/// Number of upcoming pieces shown in the peek queue.
pub const PEEK_SIZE: usize = 3;

/// Number of hearts the player starts with.
pub const MAX_HEART_COUNT: u32 = 5;

/// Number of waves that must be survived before the game can be won.
pub const WAVES_TO_WIN: u32 = 10;

/// Describes whose turn is currently being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// The player may select and place one piece.
    Player,
    /// Enemies advance and attack; player input is ignored.
    Enemy,
}

/// Result of evaluating the win and lose conditions after a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Neither condition holds.
    Continue,
    /// Every wave was survived and the grid is clear.
    Won,
    /// The player ran out of hearts.
    Lost,
}

/// Where a spawn request originated. Only wave spawns consume wave credit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnSource {
    /// Funded by the current wave's credit.
    Wave,
    /// Raised by a grave at no cost.
    Grave,
    /// Inserted by scripted content such as tutorials.
    Scripted,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resizes the playfield. Clears every enemy and wall.
    ConfigureGrid {
        /// Number of cell columns.
        columns: u32,
        /// Number of cell rows.
        rows: u32,
    },
    /// Records new viewport dimensions so pixel conversions are recomputed.
    ConfigureViewport {
        /// Viewport width in pixels.
        width: f32,
        /// Viewport height in pixels.
        height: f32,
    },
    /// Replaces the heart pool with `count` living hearts.
    ConfigureHearts {
        /// Number of heart slots.
        count: u32,
    },
    /// Advances to the next wave.
    StartWave,
    /// Sets the spend budget for the announced wave.
    FundWave {
        /// Wave receiving the budget.
        wave: WaveId,
        /// Credit available to wave-funded spawns.
        credit: u32,
    },
    /// Requests that an enemy be created from a catalog prefab.
    SpawnEnemy {
        /// Catalog entry to instantiate.
        prefab: PrefabId,
        /// Cell the enemy should occupy.
        cell: CellCoord,
        /// Origin of the request.
        source: SpawnSource,
    },
    /// Opens an enemy turn, clearing every move cooldown.
    BeginEnemyTurn,
    /// Resolves one enemy's action for the current turn.
    AdvanceEnemy {
        /// Enemy to resolve.
        enemy: EnemyId,
    },
    /// Closes the current enemy turn.
    EndEnemyTurn,
    /// Commits a piece to the grid.
    PlacePiece {
        /// Piece being placed.
        piece: TetrisPiece,
        /// Grid cell aligned with the shape's top-left corner.
        origin: CellCoord,
        /// Effect applied to the covered cells.
        mode: PieceMode,
    },
    /// Removes hearts from the player.
    LoseLife {
        /// Number of hearts to remove.
        amount: u32,
    },
    /// Restores hearts to the player.
    GainLife {
        /// Number of hearts to restore.
        amount: u32,
    },
    /// Forwards a sound cue to the audio collaborator through the event stream.
    RequestSound {
        /// Cue to play.
        cue: SoundCue,
    },
    /// Clears all enemies, hearts, and counters back to their initial state.
    ResetGame,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms the playfield dimensions changed.
    GridConfigured {
        /// Number of cell columns.
        columns: u32,
        /// Number of cell rows.
        rows: u32,
    },
    /// Confirms the pixel layout was recomputed.
    LayoutChanged,
    /// Announces a freshly started wave.
    WaveStarted {
        /// Index of the wave that began.
        wave: WaveId,
    },
    /// Confirms the budget of the current wave.
    WaveFunded {
        /// Wave receiving the budget.
        wave: WaveId,
        /// Credit available to wave-funded spawns.
        credit: u32,
    },
    /// Confirms an enemy entered the grid.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Catalog entry the enemy was built from.
        prefab: PrefabId,
        /// Kind of the spawned enemy.
        kind: EnemyKind,
        /// Cell the enemy occupies.
        cell: CellCoord,
        /// Origin of the spawn request.
        source: SpawnSource,
    },
    /// Reports that a spawn request was refused.
    SpawnRejected {
        /// Requested catalog entry.
        prefab: PrefabId,
        /// Requested cell.
        cell: CellCoord,
        /// Reason the spawn failed.
        reason: SpawnError,
    },
    /// Announces that enemies may act.
    EnemyTurnStarted {
        /// Number of enemy turns completed before this one.
        turn: u32,
    },
    /// Confirms an enemy moved without obstruction.
    EnemyAdvanced {
        /// Enemy that moved.
        enemy: EnemyId,
        /// Cell occupied before moving.
        from: CellCoord,
        /// Cell occupied after moving.
        to: CellCoord,
    },
    /// Reports that an enemy stopped behind an obstacle.
    EnemyBlocked {
        /// Enemy that stopped.
        enemy: EnemyId,
        /// Occupant that blocked the path.
        blocker: EnemyId,
        /// Cell the enemy occupies after stopping.
        cell: CellCoord,
    },
    /// Reports that an enemy struck a wall that survived.
    WallDamaged {
        /// Wall that was struck.
        wall: EnemyId,
        /// Enemy that dealt the damage.
        attacker: EnemyId,
        /// Health left on the wall.
        remaining: u32,
    },
    /// Reports that a wall was destroyed and its cell taken by the attacker.
    WallBroken {
        /// Wall that was destroyed.
        wall: EnemyId,
        /// Enemy that destroyed it.
        attacker: EnemyId,
        /// Former wall cell, now occupied by the attacker.
        cell: CellCoord,
    },
    /// Reports that an enemy crossed the left edge of the grid.
    EnemyExited {
        /// Enemy that left the grid.
        enemy: EnemyId,
        /// Row the enemy left through.
        row: u32,
    },
    /// Reports that an enemy took damage and survived.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Damage applied.
        amount: u32,
        /// Health left.
        remaining: u32,
    },
    /// Reports that an enemy was destroyed by damage.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Kind of the dead enemy.
        kind: EnemyKind,
        /// Cell the enemy occupied.
        cell: CellCoord,
    },
    /// Reports that a heart was lost.
    LifeLost {
        /// Hearts still alive.
        remaining: u32,
    },
    /// Reports that a heart was restored.
    LifeGained {
        /// Hearts alive after the gain.
        remaining: u32,
    },
    /// Confirms that a piece was committed.
    PiecePlaced {
        /// Kind of the placed piece.
        kind: PieceKind,
        /// Effect applied to the covered cells.
        mode: PieceMode,
        /// Cells covered by the piece.
        cells: Vec<CellCoord>,
    },
    /// Reports that a placement request was refused.
    PlacementRejected {
        /// Kind of the rejected piece.
        kind: PieceKind,
        /// Requested origin.
        origin: CellCoord,
        /// Reason the placement failed.
        reason: PlacementError,
    },
    /// Announces the end of an enemy turn.
    EnemyTurnEnded {
        /// Number of enemy turns completed, including this one.
        turn: u32,
    },
    /// Asks the audio collaborator to play a cue.
    SoundRequested {
        /// Cue to play.
        cue: SoundCue,
    },
    /// Confirms the world returned to its initial state.
    GameReset,
}

/// Audio cues emitted by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// An enemy moved or stopped.
    EnemyMove,
    /// An enemy struck a wall that held.
    EnemyAttack,
    /// An enemy broke through a wall.
    WallBreak,
    /// An enemy died.
    EnemyDeath,
    /// A piece was committed to the grid.
    PiecePlaced,
    /// A piece was picked up from the hand.
    PieceSelected,
    /// A heart was lost.
    LoseHeart,
    /// A heart was restored.
    GainHeart,
    /// The player lost the game.
    GameOver,
    /// The player won the game.
    GameWin,
}

impl SoundCue {
    /// Mixer group the cue should play on.
    ///
    /// Every simulation cue, the game over and win stingers included, is a
    /// sound effect. [`ChannelGroup::Music`] is left to the host's soundtrack.
    #[must_use]
    pub const fn channel(self) -> ChannelGroup {
        ChannelGroup::Sfx
    }
}

/// Mixer group a sound plays on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelGroup {
    /// Short effects.
    Sfx,
    /// Background music.
    Music,
}

/// Visual appearance applied to enemies and pieces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tint {
    red: u8,
    green: u8,
    blue: u8,
}

impl Tint {
    /// Creates a new tint from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Unique identifier assigned to an enemy instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Position of a prefab within the enemy catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrefabId(u32);

impl PrefabId {
    /// Creates a new prefab identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Zero-based wave index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveId(u32);

impl WaveId {
    /// Creates a new wave identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Cell `steps` columns to the left, or `None` past the left edge.
    #[must_use]
    pub fn shifted_left(self, steps: u32) -> Option<CellCoord> {
        self.column
            .checked_sub(steps)
            .map(|column| CellCoord::new(column, self.row))
    }
}

/// Behavioural archetype of an enemy prefab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Slow, cheap walker.
    Zombie,
    /// Fast mover that covers several cells per turn.
    Leaper,
    /// Durable walker.
    Tank,
    /// Walker that hits walls hard.
    WallBreaker,
    /// Static spawner that raises other enemies.
    Grave,
    /// Player-placed obstacle.
    Wall,
}

/// Named role a prefab plays within the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrefabRole {
    /// Player-placed wall. Never sampled for spawning.
    Barrier,
    /// Eligible for random wave and grave spawning.
    Spawnable,
    /// Hostile but excluded from random sampling.
    Terminal,
}

/// Immutable enemy template registered in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyPrefab {
    kind: EnemyKind,
    role: PrefabRole,
    cost: u32,
    speed: u32,
    health: u32,
    damage: u32,
    glyph: String,
    color: Tint,
}

impl EnemyPrefab {
    /// Creates a new prefab description.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        kind: EnemyKind,
        role: PrefabRole,
        cost: u32,
        speed: u32,
        health: u32,
        damage: u32,
        glyph: impl Into<String>,
        color: Tint,
    ) -> Self {
        Self {
            kind,
            role,
            cost,
            speed,
            health,
            damage,
            glyph: glyph.into(),
            color,
        }
    }

    /// Behavioural archetype.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Catalog role.
    #[must_use]
    pub const fn role(&self) -> PrefabRole {
        self.role
    }

    /// Wave credit consumed when spawned by a wave.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Cells travelled per turn.
    #[must_use]
    pub const fn speed(&self) -> u32 {
        self.speed
    }

    /// Starting and maximum health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Damage dealt to walls.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Text glyph drawn for the enemy.
    #[must_use]
    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    /// Display color.
    #[must_use]
    pub const fn color(&self) -> Tint {
        self.color
    }

    /// Reports whether random sampling may pick this prefab.
    #[must_use]
    pub fn is_spawnable(&self) -> bool {
        self.role == PrefabRole::Spawnable
    }
}

/// Source of uniformly distributed integers.
pub trait RandomSource {
    /// Returns an integer in `low..=high`. Returns `low` when the range is empty.
    fn random_int(&mut self, low: i32, high: i32) -> i32;
}

impl<R: RngCore> RandomSource for R {
    fn random_int(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.gen_range(low..=high)
    }
}

/// Read-only view over the registered enemy prefabs.
#[derive(Clone, Copy, Debug)]
pub struct CatalogView<'a> {
    prefabs: &'a [EnemyPrefab],
}

impl<'a> CatalogView<'a> {
    /// Creates a view backed by the provided prefabs in registration order.
    #[must_use]
    pub const fn new(prefabs: &'a [EnemyPrefab]) -> Self {
        Self { prefabs }
    }

    /// Number of registered prefabs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.prefabs.len()
    }

    /// Reports whether no prefab was registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    /// Returns the prefab registered under `id`.
    #[must_use]
    pub fn prefab_at(&self, id: PrefabId) -> Option<&'a EnemyPrefab> {
        let index = usize::try_from(id.get()).ok()?;
        self.prefabs.get(index)
    }

    /// Iterates over prefabs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (PrefabId, &'a EnemyPrefab)> + 'a {
        self.prefabs
            .iter()
            .enumerate()
            .map(|(index, prefab)| (PrefabId::new(index as u32), prefab))
    }

    /// First prefab with the barrier role, used for player walls.
    #[must_use]
    pub fn barrier(&self) -> Option<(PrefabId, &'a EnemyPrefab)> {
        self.iter()
            .find(|(_, prefab)| prefab.role() == PrefabRole::Barrier)
    }

    /// Uniformly samples one spawnable prefab.
    pub fn random_prefab<R>(&self, rng: &mut R) -> Option<(PrefabId, &'a EnemyPrefab)>
    where
        R: RandomSource + ?Sized,
    {
        let count = self.prefabs.iter().filter(|p| p.is_spawnable()).count();
        if count == 0 {
            return None;
        }

        let high = i32::try_from(count - 1).unwrap_or(i32::MAX);
        let pick = usize::try_from(rng.random_int(0, high)).unwrap_or(0);
        self.iter().filter(|(_, prefab)| prefab.is_spawnable()).nth(pick)
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Catalog entry the enemy was built from.
    pub prefab: PrefabId,
    /// Behavioural archetype.
    pub kind: EnemyKind,
    /// Catalog role inherited from the prefab.
    pub role: PrefabRole,
    /// Grid cell currently occupied by the enemy.
    pub cell: CellCoord,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Damage dealt to walls.
    pub damage: u32,
    /// Cells travelled per turn.
    pub speed: u32,
    /// Wave credit the enemy cost to spawn.
    pub cost: u32,
    /// Text glyph.
    pub glyph: String,
    /// Display color.
    pub color: Tint,
    /// Indicates whether the enemy already acted this turn.
    pub acted: bool,
}

impl EnemySnapshot {
    /// Reports whether the enemy counts toward the win condition.
    #[must_use]
    pub fn is_hostile(&self) -> bool {
        self.role != PrefabRole::Barrier
    }
}

/// Read-only snapshot describing all live enemies and walls.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of hostile (non-wall) enemies.
    #[must_use]
    pub fn hostile_count(&self) -> usize {
        self.snapshots.iter().filter(|s| s.is_hostile()).count()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Read-only view into the dense occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Option<EnemyId>],
    columns: u32,
    rows: u32,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [Option<EnemyId>], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the enemy occupying the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<EnemyId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether the cell lies inside the grid and holds no occupant.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(false, |index| matches!(self.cells.get(index), Some(None)))
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Option<EnemyId>> + 'a {
        self.cells.iter().copied()
    }

    /// Provides the dimensions of the underlying occupancy grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Wave progress counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveSnapshot {
    /// Number of waves started so far.
    pub wave: WaveId,
    /// Credit left for wave-funded spawns.
    pub credit: u32,
    /// Enemies destroyed by player damage.
    pub enemies_killed: u32,
    /// Enemy turns resolved.
    pub turns_elapsed: u32,
}

impl Default for WaveId {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Heart pool summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeSnapshot {
    /// Hearts still alive.
    pub alive: u32,
    /// Total heart slots.
    pub capacity: u32,
}

/// Reasons a placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The piece has no occupied cell.
    EmptyShape,
    /// A covered cell lies outside the grid.
    OutOfBounds,
    /// A covered cell holds an occupant the mode cannot overwrite.
    Occupied,
    /// The catalog has no barrier prefab to build walls from.
    MissingBarrier,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// No prefab is registered under the requested id.
    UnknownPrefab,
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell already holds an occupant.
    Occupied,
    /// The wave cannot afford the prefab.
    InsufficientCredit,
}
