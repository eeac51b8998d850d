#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic grave spawning system.
//!
//! Graves are stationary enemies that periodically raise a random spawnable
//! enemy into the cell directly to their left.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tetris_defence_core::{
    CatalogView, Command, EnemyKind, EnemyView, Event, OccupancyView, SpawnSource,
};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// Graves spawn every `spawn_interval` completed enemy turns. An interval
    /// of zero disables grave spawning.
    #[must_use]
    pub const fn new(spawn_interval: u32, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            rng_seed,
        }
    }
}

/// Pure system that emits grave spawn commands at the end of enemy turns.
#[derive(Debug)]
pub struct GraveSpawning {
    spawn_interval: u32,
    rng_seed: u64,
    rng: ChaCha8Rng,
}

impl GraveSpawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            rng_seed: config.rng_seed,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and immutable views to emit spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemy_view: &EnemyView,
        catalog: CatalogView<'_>,
        occupancy: OccupancyView<'_>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            let turn = match event {
                Event::GameReset => {
                    self.rng = ChaCha8Rng::seed_from_u64(self.rng_seed);
                    continue;
                }
                Event::EnemyTurnEnded { turn } => turn,
                _ => continue,
            };
            if self.spawn_interval == 0 || turn % self.spawn_interval != 0 {
                continue;
            }

            for grave in enemy_view
                .iter()
                .filter(|enemy| enemy.kind == EnemyKind::Grave)
            {
                let Some(cell) = grave.cell.shifted_left(1) else {
                    continue;
                };
                if !occupancy.is_free(cell) {
                    continue;
                }
                let Some((prefab, _)) = catalog.random_prefab(&mut self.rng) else {
                    return;
                };
                out.push(Command::SpawnEnemy {
                    prefab,
                    cell,
                    source: SpawnSource::Grave,
                });
            }
        }
    }
}
