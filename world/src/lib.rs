#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tetris Defence.

mod catalog;
mod combat;
mod grid;
mod hearts;
mod layout;

use glam::Vec2;
use tetris_defence_core::{
    CellCoord, Command, EnemyId, EnemyKind, Event, PieceMode, PlacementError, PrefabId,
    PrefabRole, SoundCue, SpawnError, SpawnSource, TetrisPiece, Tint, WaveId, MAX_HEART_COUNT,
    WELCOME_BANNER,
};

pub use catalog::EnemyCatalog;
pub use hearts::HeartPool;
pub use layout::{GridLayout, GRID_WIDTH_FRACTION, HAND_PANEL_FRACTION, HUD_BAND_FRACTION};

use grid::OccupancyGrid;

/// Number of columns in a freshly created world.
pub const DEFAULT_GRID_COLUMNS: u32 = 12;
/// Number of rows in a freshly created world.
pub const DEFAULT_GRID_ROWS: u32 = 6;
/// Viewport assumed until an adapter reports its real size.
pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(1920.0, 1080.0);

/// Represents the authoritative Tetris Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    catalog: EnemyCatalog,
    occupancy: OccupancyGrid,
    viewport: Vec2,
    layout: GridLayout,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
    hearts: HeartPool,
    wave: WaveId,
    credit: u32,
    enemies_killed: u32,
    turns_elapsed: u32,
}

impl World {
    /// Creates a new world populated with the standard enemy catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(EnemyCatalog::standard())
    }

    /// Creates a new world that spawns from the provided catalog.
    #[must_use]
    pub fn with_catalog(catalog: EnemyCatalog) -> Self {
        Self {
            banner: WELCOME_BANNER,
            catalog,
            occupancy: OccupancyGrid::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS),
            viewport: DEFAULT_VIEWPORT,
            layout: GridLayout::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, DEFAULT_VIEWPORT),
            enemies: Vec::new(),
            next_enemy_id: 0,
            hearts: HeartPool::new(MAX_HEART_COUNT),
            wave: WaveId::new(0),
            credit: 0,
            enemies_killed: 0,
            turns_elapsed: 0,
        }
    }

    fn enemy_index(&self, id: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|enemy| enemy.id == id)
    }

    fn remove_enemy(&mut self, id: EnemyId) -> Option<Enemy> {
        let index = self.enemy_index(id)?;
        let enemy = self.enemies.remove(index);
        if self.occupancy.occupant(enemy.cell) == Some(id) {
            self.occupancy.vacate(enemy.cell);
        }
        Some(enemy)
    }

    fn refresh_layout(&mut self, out_events: &mut Vec<Event>) {
        let (columns, rows) = self.occupancy.dimensions();
        self.layout = GridLayout::new(columns, rows, self.viewport);
        out_events.push(Event::LayoutChanged);
    }

    fn insert_enemy(&mut self, prefab_id: PrefabId, cell: CellCoord) -> Option<EnemyId> {
        let prefab = self.catalog.view().prefab_at(prefab_id)?;
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);

        self.enemies.push(Enemy {
            id,
            prefab: prefab_id,
            kind: prefab.kind(),
            role: prefab.role(),
            cell,
            health: prefab.health(),
            max_health: prefab.health(),
            damage: prefab.damage(),
            speed: prefab.speed(),
            cost: prefab.cost(),
            glyph: prefab.glyph().to_owned(),
            color: prefab.color(),
            acted: false,
        });
        self.occupancy.occupy(id, cell);
        Some(id)
    }

    fn spawn_enemy(
        &mut self,
        prefab_id: PrefabId,
        cell: CellCoord,
        source: SpawnSource,
    ) -> Result<(EnemyId, EnemyKind), SpawnError> {
        let prefab = self
            .catalog
            .view()
            .prefab_at(prefab_id)
            .ok_or(SpawnError::UnknownPrefab)?;
        if !self.occupancy.contains(cell) {
            return Err(SpawnError::OutOfBounds);
        }
        if !self.occupancy.is_free(cell) {
            return Err(SpawnError::Occupied);
        }

        let kind = prefab.kind();
        if source == SpawnSource::Wave {
            self.credit = self
                .credit
                .checked_sub(prefab.cost())
                .ok_or(SpawnError::InsufficientCredit)?;
        }

        let id = self
            .insert_enemy(prefab_id, cell)
            .ok_or(SpawnError::UnknownPrefab)?;
        Ok((id, kind))
    }

    fn place_piece(
        &mut self,
        piece: TetrisPiece,
        origin: CellCoord,
        mode: PieceMode,
    ) -> Result<Vec<CellCoord>, PlacementError> {
        let (columns, rows) = self.occupancy.dimensions();
        let cells = piece.shape().footprint(origin, columns, rows)?;

        match mode {
            PieceMode::Wall => {
                let (barrier, _) = self
                    .catalog
                    .view()
                    .barrier()
                    .ok_or(PlacementError::MissingBarrier)?;
                if !cells.iter().all(|cell| self.occupancy.is_free(*cell)) {
                    return Err(PlacementError::Occupied);
                }
                for cell in &cells {
                    let _ = self.insert_enemy(barrier, *cell);
                }
            }
            PieceMode::Attack { .. } => {
                let covers_wall = cells.iter().any(|cell| {
                    self.occupancy
                        .occupant(*cell)
                        .and_then(|id| self.enemy_index(id))
                        .map_or(false, |index| !self.enemies[index].is_hostile())
                });
                if covers_wall {
                    return Err(PlacementError::Occupied);
                }
            }
        }

        Ok(cells)
    }

    fn reset(&mut self) {
        self.enemies.clear();
        self.occupancy.clear();
        self.hearts.restore();
        self.next_enemy_id = 0;
        self.wave = WaveId::new(0);
        self.credit = 0;
        self.enemies_killed = 0;
        self.turns_elapsed = 0;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { columns, rows } => {
            world.enemies.clear();
            world.occupancy = OccupancyGrid::new(columns, rows);
            out_events.push(Event::GridConfigured { columns, rows });
            world.refresh_layout(out_events);
        }
        Command::ConfigureViewport { width, height } => {
            world.viewport = Vec2::new(width.max(0.0), height.max(0.0));
            world.refresh_layout(out_events);
        }
        Command::ConfigureHearts { count } => {
            world.hearts = HeartPool::new(count);
        }
        Command::StartWave => {
            world.wave = WaveId::new(world.wave.get().saturating_add(1));
            world.credit = 0;
            out_events.push(Event::WaveStarted { wave: world.wave });
        }
        Command::FundWave { wave, credit } => {
            if wave == world.wave {
                world.credit = credit;
                out_events.push(Event::WaveFunded { wave, credit });
            }
        }
        Command::SpawnEnemy {
            prefab,
            cell,
            source,
        } => match world.spawn_enemy(prefab, cell, source) {
            Ok((enemy, kind)) => out_events.push(Event::EnemySpawned {
                enemy,
                prefab,
                kind,
                cell,
                source,
            }),
            Err(reason) => out_events.push(Event::SpawnRejected {
                prefab,
                cell,
                reason,
            }),
        },
        Command::BeginEnemyTurn => {
            for enemy in &mut world.enemies {
                enemy.acted = false;
            }
            out_events.push(Event::EnemyTurnStarted {
                turn: world.turns_elapsed,
            });
        }
        Command::AdvanceEnemy { enemy } => world.advance_enemy(enemy, out_events),
        Command::EndEnemyTurn => {
            world.turns_elapsed = world.turns_elapsed.saturating_add(1);
            out_events.push(Event::EnemyTurnEnded {
                turn: world.turns_elapsed,
            });
        }
        Command::PlacePiece {
            piece,
            origin,
            mode,
        } => match world.place_piece(piece, origin, mode) {
            Ok(cells) => {
                out_events.push(Event::PiecePlaced {
                    kind: piece.kind(),
                    mode,
                    cells: cells.clone(),
                });
                out_events.push(Event::SoundRequested {
                    cue: SoundCue::PiecePlaced,
                });
                if let PieceMode::Attack { damage } = mode {
                    for cell in cells {
                        world.damage_enemy_at(cell, damage, out_events);
                    }
                }
            }
            Err(reason) => out_events.push(Event::PlacementRejected {
                kind: piece.kind(),
                origin,
                reason,
            }),
        },
        Command::LoseLife { amount } => world.lose_hearts(amount, out_events),
        Command::GainLife { amount } => world.gain_hearts(amount, out_events),
        Command::RequestSound { cue } => out_events.push(Event::SoundRequested { cue }),
        Command::ResetGame => {
            world.reset();
            out_events.push(Event::GameReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use tetris_defence_core::{
        CatalogView, CellCoord, EnemySnapshot, EnemyView, LifeSnapshot, OccupancyView,
        WaveSnapshot,
    };

    use super::{GridLayout, HeartPool, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of columns and rows in the playfield.
    #[must_use]
    pub fn grid_dimensions(world: &World) -> (u32, u32) {
        world.occupancy.dimensions()
    }

    /// Viewport size the layout was computed for.
    #[must_use]
    pub fn viewport(world: &World) -> Vec2 {
        world.viewport
    }

    /// Pixel layout of the grid within the viewport.
    #[must_use]
    pub fn layout(world: &World) -> &GridLayout {
        &world.layout
    }

    /// Provides read-only access to the enemy catalog.
    #[must_use]
    pub fn catalog_view(world: &World) -> CatalogView<'_> {
        world.catalog.view()
    }

    /// Captures a read-only view of every enemy and wall on the grid.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(super::Enemy::snapshot).collect())
    }

    /// Snapshot of the occupant of `cell`, if any.
    #[must_use]
    pub fn enemy_at(world: &World, cell: CellCoord) -> Option<EnemySnapshot> {
        let id = world.occupancy.occupant(cell)?;
        world
            .enemy_index(id)
            .map(|index| world.enemies[index].snapshot())
    }

    /// Number of live enemies that are not walls.
    #[must_use]
    pub fn hostile_count(world: &World) -> usize {
        world
            .enemies
            .iter()
            .filter(|enemy| enemy.is_hostile())
            .count()
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        let (columns, rows) = world.occupancy.dimensions();
        OccupancyView::new(world.occupancy.cells(), columns, rows)
    }

    /// Current wave counters.
    #[must_use]
    pub fn wave_snapshot(world: &World) -> WaveSnapshot {
        WaveSnapshot {
            wave: world.wave,
            credit: world.credit,
            enemies_killed: world.enemies_killed,
            turns_elapsed: world.turns_elapsed,
        }
    }

    /// Current heart totals.
    #[must_use]
    pub fn life_snapshot(world: &World) -> LifeSnapshot {
        world.hearts.snapshot()
    }

    /// Provides read-only access to the individual heart slots.
    #[must_use]
    pub fn hearts(world: &World) -> &HeartPool {
        &world.hearts
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    prefab: PrefabId,
    kind: EnemyKind,
    role: PrefabRole,
    cell: CellCoord,
    health: u32,
    max_health: u32,
    damage: u32,
    speed: u32,
    cost: u32,
    glyph: String,
    color: Tint,
    acted: bool,
}

impl Enemy {
    fn is_hostile(&self) -> bool {
        self.role != PrefabRole::Barrier
    }

    fn snapshot(&self) -> tetris_defence_core::EnemySnapshot {
        tetris_defence_core::EnemySnapshot {
            id: self.id,
            prefab: self.prefab,
            kind: self.kind,
            role: self.role,
            cell: self.cell,
            health: self.health,
            max_health: self.max_health,
            damage: self.damage,
            speed: self.speed,
            cost: self.cost,
            glyph: self.glyph.clone(),
            color: self.color,
            acted: self.acted,
        }
    }
}
