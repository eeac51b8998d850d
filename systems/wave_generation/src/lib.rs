#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic credit-based wave generation system.
//!
//! Every wave receives a credit budget that grows linearly with the wave
//! index. The generator repeatedly samples a spawnable prefab from the
//! catalog and buys it if the remaining credit covers its cost, placing the
//! enemy near the right edge of the grid. Randomness is derived from the
//! session seed and the wave index so a replay produces the same waves.

use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use tetris_defence_core::{
    CatalogView, CellCoord, Command, Event, OccupancyView, PrefabId, RandomSource, SpawnSource,
    WaveId,
};

/// Strategy used to pick the row a wave enemy enters on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpawnRowPolicy {
    /// Rows are drawn uniformly at random.
    #[default]
    Random,
    /// Rows are visited in order, wrapping at the bottom.
    RoundRobin,
}

/// Tuning knobs for the wave credit curve and spawn placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveTuning {
    base_credit: u32,
    credit_per_wave: u32,
    max_failed_draws: u32,
    spawn_depth: u32,
    row_policy: SpawnRowPolicy,
}

impl WaveTuning {
    /// Creates a new tuning description.
    #[must_use]
    pub const fn new(
        base_credit: u32,
        credit_per_wave: u32,
        max_failed_draws: u32,
        spawn_depth: u32,
        row_policy: SpawnRowPolicy,
    ) -> Self {
        Self {
            base_credit,
            credit_per_wave,
            max_failed_draws,
            spawn_depth,
            row_policy,
        }
    }

    /// Credit granted to every wave regardless of its index.
    #[must_use]
    pub const fn base_credit(&self) -> u32 {
        self.base_credit
    }

    /// Additional credit granted per wave index.
    #[must_use]
    pub const fn credit_per_wave(&self) -> u32 {
        self.credit_per_wave
    }

    /// Unaffordable draws tolerated before the generator gives up.
    #[must_use]
    pub const fn max_failed_draws(&self) -> u32 {
        self.max_failed_draws
    }

    /// Number of columns, counted from the right edge, that may receive spawns.
    #[must_use]
    pub const fn spawn_depth(&self) -> u32 {
        self.spawn_depth
    }

    /// Row selection strategy.
    #[must_use]
    pub const fn row_policy(&self) -> SpawnRowPolicy {
        self.row_policy
    }

    /// Total credit available to `wave`.
    #[must_use]
    pub fn budget(&self, wave: WaveId) -> u32 {
        self.credit_per_wave
            .saturating_mul(wave.get())
            .saturating_add(self.base_credit)
    }
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self::new(4, 6, 12, 2, SpawnRowPolicy::Random)
    }
}

/// Configuration parameters required to construct the wave generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    tuning: WaveTuning,
    seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided tuning and session seed.
    #[must_use]
    pub const fn new(tuning: WaveTuning, seed: u64) -> Self {
        Self { tuning, seed }
    }
}

/// Summary of the most recently generated wave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveReport {
    /// Wave the report describes.
    pub wave: WaveId,
    /// Credit granted to the wave.
    pub budget: u32,
    /// Credit committed to spawns.
    pub spent: u32,
    /// Credit left unspent.
    pub remaining: u32,
    /// Prefabs requested and the cells reserved for them, in draw order.
    pub spawned: Vec<(PrefabId, CellCoord)>,
    /// Draws that sampled a prefab the wave could not afford.
    pub failed_draws: u32,
}

/// Pure system that turns wave starts into funded spawn requests.
#[derive(Debug)]
pub struct WaveGeneration {
    tuning: WaveTuning,
    seed: u64,
    next_row: u32,
    reserved: HashSet<CellCoord>,
    last_report: Option<WaveReport>,
}

impl WaveGeneration {
    /// Creates a new wave generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tuning: config.tuning,
            seed: config.seed,
            next_row: 0,
            reserved: HashSet::new(),
            last_report: None,
        }
    }

    /// Report describing the last wave this system generated.
    #[must_use]
    pub fn last_report(&self) -> Option<&WaveReport> {
        self.last_report.as_ref()
    }

    /// Consumes `WaveStarted` events and emits the funding and spawn commands.
    ///
    /// `GameReset` rewinds the row cursor so a restarted game replays the same waves.
    pub fn handle(
        &mut self,
        events: &[Event],
        catalog: CatalogView<'_>,
        occupancy: OccupancyView<'_>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::WaveStarted { wave } => {
                    let report = self.generate(*wave, catalog, occupancy, out);
                    self.last_report = Some(report);
                }
                Event::GameReset => {
                    self.next_row = 0;
                    self.reserved.clear();
                    self.last_report = None;
                }
                _ => {}
            }
        }
    }

    fn generate(
        &mut self,
        wave: WaveId,
        catalog: CatalogView<'_>,
        occupancy: OccupancyView<'_>,
        out: &mut Vec<Command>,
    ) -> WaveReport {
        let budget = self.tuning.budget(wave);
        out.push(Command::FundWave {
            wave,
            credit: budget,
        });

        let mut rng = ChaCha8Rng::seed_from_u64(derive_wave_seed(self.seed, wave));
        self.reserved.clear();

        let mut credit = budget;
        let mut failed_draws = 0;
        let mut spawned = Vec::new();

        while credit > 0 && failed_draws < self.tuning.max_failed_draws {
            let Some((prefab_id, prefab)) = catalog.random_prefab(&mut rng) else {
                break;
            };
            if prefab.cost() > credit {
                failed_draws += 1;
                continue;
            }
            let Some(cell) = self.pick_cell(&mut rng, occupancy) else {
                break;
            };

            let _ = self.reserved.insert(cell);
            credit -= prefab.cost();
            spawned.push((prefab_id, cell));
            out.push(Command::SpawnEnemy {
                prefab: prefab_id,
                cell,
                source: SpawnSource::Wave,
            });
        }

        WaveReport {
            wave,
            budget,
            spent: budget - credit,
            remaining: credit,
            spawned,
            failed_draws,
        }
    }

    /// Rightmost free cell within the spawn band, searching rows from the
    /// policy's choice and wrapping downwards.
    fn pick_cell<R: RandomSource>(
        &mut self,
        rng: &mut R,
        occupancy: OccupancyView<'_>,
    ) -> Option<CellCoord> {
        let (columns, rows) = occupancy.dimensions();
        if columns == 0 || rows == 0 {
            return None;
        }

        let start = match self.tuning.row_policy {
            SpawnRowPolicy::Random => {
                let high = i32::try_from(rows - 1).unwrap_or(i32::MAX);
                u32::try_from(rng.random_int(0, high)).unwrap_or(0)
            }
            SpawnRowPolicy::RoundRobin => {
                let row = self.next_row % rows;
                self.next_row = row + 1;
                row
            }
        };

        let first_column = columns.saturating_sub(self.tuning.spawn_depth.max(1));
        (0..rows)
            .map(|offset| (start + offset) % rows)
            .find_map(|row| {
                (first_column..columns)
                    .rev()
                    .map(|column| CellCoord::new(column, row))
                    .find(|cell| occupancy.is_free(*cell) && !self.reserved.contains(cell))
            })
    }
}

fn derive_wave_seed(global_seed: u64, wave: WaveId) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(wave.get().to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
