//! Session configuration loaded from TOML.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tetris_defence_core::{
    EnemyKind, EnemyPrefab, PrefabRole, Tint, MAX_HEART_COUNT, WAVES_TO_WIN,
};
use tetris_defence_system_game_state::DEFAULT_TURNS_PER_WAVE;
use tetris_defence_system_wave_generation::{SpawnRowPolicy, WaveTuning};
use tetris_defence_world::{EnemyCatalog, DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, DEFAULT_VIEWPORT};

/// Errors raised while loading a [`SessionConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read session config at {}", path.display())]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or does not match the schema.
    #[error("failed to parse session config toml")]
    Parse(#[from] toml::de::Error),
    /// A value is outside its permitted range.
    #[error("invalid session config: {0}")]
    Invalid(String),
}

/// Row selection strategy as written in configuration files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// Rows are drawn uniformly at random.
    #[default]
    Random,
    /// Rows are visited in order.
    RoundRobin,
}

/// Wave credit curve and spawn placement settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaveConfig {
    /// Credit granted to every wave.
    pub base_credit: u32,
    /// Credit added per wave index.
    pub credit_per_wave: u32,
    /// Unaffordable draws tolerated per wave.
    pub max_failed_draws: u32,
    /// Columns from the right edge that receive spawns.
    pub spawn_depth: u32,
    /// Row selection strategy.
    pub row_policy: RowPolicy,
}

impl Default for WaveConfig {
    fn default() -> Self {
        let tuning = WaveTuning::default();
        Self {
            base_credit: tuning.base_credit(),
            credit_per_wave: tuning.credit_per_wave(),
            max_failed_draws: tuning.max_failed_draws(),
            spawn_depth: tuning.spawn_depth(),
            row_policy: RowPolicy::Random,
        }
    }
}

/// Enemy template as written in configuration files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrefabConfig {
    /// Behavioural archetype.
    pub kind: EnemyKind,
    /// Catalog role.
    pub role: PrefabRole,
    /// Wave credit cost.
    pub cost: u32,
    /// Cells travelled per turn.
    pub speed: u32,
    /// Starting health.
    pub health: u32,
    /// Damage dealt to walls.
    pub damage: u32,
    /// Text glyph.
    pub glyph: String,
    /// Display color as `[red, green, blue]`.
    pub color: [u8; 3],
}

impl From<&PrefabConfig> for EnemyPrefab {
    fn from(config: &PrefabConfig) -> Self {
        let [red, green, blue] = config.color;
        EnemyPrefab::new(
            config.kind,
            config.role,
            config.cost,
            config.speed,
            config.health,
            config.damage,
            config.glyph.clone(),
            Tint::from_rgb(red, green, blue),
        )
    }
}

/// Everything needed to start a game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Seed every random stream is derived from.
    pub seed: u64,
    /// Grid columns.
    pub columns: u32,
    /// Grid rows.
    pub rows: u32,
    /// Viewport width in pixels.
    pub viewport_width: f32,
    /// Viewport height in pixels.
    pub viewport_height: f32,
    /// Hearts the player starts with.
    pub hearts: u32,
    /// Waves that must be survived.
    pub waves_to_win: u32,
    /// Enemy turns before the next wave starts anyway. Zero disables the limit.
    pub turns_per_wave: u32,
    /// Damage dealt by attack pieces.
    pub attack_damage: u32,
    /// Enemy turns between grave spawns. Zero disables graves.
    pub grave_spawn_interval: u32,
    /// Wave generator settings.
    pub wave: WaveConfig,
    /// Custom enemy catalog. Empty means the standard roster.
    pub enemies: Vec<PrefabConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0x7e7e_15de_f3c3_0001,
            columns: DEFAULT_GRID_COLUMNS,
            rows: DEFAULT_GRID_ROWS,
            viewport_width: DEFAULT_VIEWPORT.x,
            viewport_height: DEFAULT_VIEWPORT.y,
            hearts: MAX_HEART_COUNT,
            waves_to_win: WAVES_TO_WIN,
            turns_per_wave: DEFAULT_TURNS_PER_WAVE,
            attack_damage: 1,
            grave_spawn_interval: 3,
            wave: WaveConfig::default(),
            enemies: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks value ranges that the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must have at least one cell, got {}x{}",
                self.columns, self.rows
            )));
        }
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "viewport must be positive, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        if self.hearts == 0 {
            return Err(ConfigError::Invalid("hearts must be at least 1".to_owned()));
        }
        if self.attack_damage == 0 {
            return Err(ConfigError::Invalid(
                "attack_damage must be at least 1".to_owned(),
            ));
        }
        if let Some(prefab) = self.enemies.iter().find(|prefab| prefab.health == 0) {
            return Err(ConfigError::Invalid(format!(
                "enemy {:?} must have positive health",
                prefab.kind
            )));
        }
        Ok(())
    }

    /// Builds the enemy catalog described by this configuration.
    #[must_use]
    pub fn catalog(&self) -> EnemyCatalog {
        if self.enemies.is_empty() {
            EnemyCatalog::standard()
        } else {
            self.enemies.iter().map(EnemyPrefab::from).collect()
        }
    }

    /// Wave generator tuning described by this configuration.
    #[must_use]
    pub fn wave_tuning(&self) -> WaveTuning {
        let row_policy = match self.wave.row_policy {
            RowPolicy::Random => SpawnRowPolicy::Random,
            RowPolicy::RoundRobin => SpawnRowPolicy::RoundRobin,
        };
        WaveTuning::new(
            self.wave.base_credit,
            self.wave.credit_per_wave,
            self.wave.max_failed_draws,
            self.wave.spawn_depth,
            row_policy,
        )
    }
}
