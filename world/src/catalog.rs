//! Append-only registry of enemy prefabs.

use tetris_defence_core::{CatalogView, EnemyKind, EnemyPrefab, PrefabId, PrefabRole, Tint};

const WALL_COLOR: Tint = Tint::from_rgb(179, 179, 179);
const ENEMY_COLOR: Tint = Tint::from_rgb(227, 23, 23);
const GRAVE_COLOR: Tint = Tint::from_rgb(0, 255, 0);

/// Registry that owns every enemy template known to the world.
#[derive(Clone, Debug, Default)]
pub struct EnemyCatalog {
    prefabs: Vec<EnemyPrefab>,
}

impl EnemyCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the catalog shipped with the game.
    ///
    /// Registration order is wall, zombie, leaper, tank, wall breaker and
    /// grave. Only the four walkers are eligible for random spawning.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        let prefabs = [
            EnemyPrefab::new(
                EnemyKind::Wall,
                PrefabRole::Barrier,
                0,
                0,
                3,
                0,
                "|x|",
                WALL_COLOR,
            ),
            EnemyPrefab::new(
                EnemyKind::Zombie,
                PrefabRole::Spawnable,
                1,
                1,
                1,
                2,
                "Z",
                ENEMY_COLOR,
            ),
            EnemyPrefab::new(
                EnemyKind::Leaper,
                PrefabRole::Spawnable,
                5,
                3,
                1,
                1,
                "L",
                ENEMY_COLOR,
            ),
            EnemyPrefab::new(
                EnemyKind::Tank,
                PrefabRole::Spawnable,
                10,
                1,
                3,
                2,
                "T",
                ENEMY_COLOR,
            ),
            EnemyPrefab::new(
                EnemyKind::WallBreaker,
                PrefabRole::Spawnable,
                15,
                1,
                2,
                3,
                "B",
                ENEMY_COLOR,
            ),
            EnemyPrefab::new(
                EnemyKind::Grave,
                PrefabRole::Terminal,
                18,
                0,
                1,
                0,
                "G",
                GRAVE_COLOR,
            ),
        ];
        for prefab in prefabs {
            let _ = catalog.register(prefab);
        }
        catalog
    }

    /// Appends a prefab and returns the identifier it was registered under.
    pub fn register(&mut self, prefab: EnemyPrefab) -> PrefabId {
        let id = PrefabId::new(u32::try_from(self.prefabs.len()).unwrap_or(u32::MAX));
        self.prefabs.push(prefab);
        id
    }

    /// Number of registered prefabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    /// Reports whether the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    /// Read-only view used by queries and systems.
    #[must_use]
    pub fn view(&self) -> CatalogView<'_> {
        CatalogView::new(&self.prefabs)
    }
}

impl FromIterator<EnemyPrefab> for EnemyCatalog {
    fn from_iter<I: IntoIterator<Item = EnemyPrefab>>(iter: I) -> Self {
        Self {
            prefabs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_matches_shipped_roster() {
        let catalog = EnemyCatalog::standard();
        let kinds: Vec<EnemyKind> = catalog.view().iter().map(|(_, p)| p.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                EnemyKind::Wall,
                EnemyKind::Zombie,
                EnemyKind::Leaper,
                EnemyKind::Tank,
                EnemyKind::WallBreaker,
                EnemyKind::Grave,
            ]
        );

        let spawnable: Vec<PrefabId> = catalog
            .view()
            .iter()
            .filter(|(_, prefab)| prefab.is_spawnable())
            .map(|(id, _)| id)
            .collect();
        assert_eq!(
            spawnable,
            (1..=4).map(PrefabId::new).collect::<Vec<_>>(),
            "everything but the wall and the grave is spawnable"
        );
    }

    #[test]
    fn register_assigns_sequential_identifiers() {
        let mut catalog = EnemyCatalog::new();
        let zombie = EnemyPrefab::new(
            EnemyKind::Zombie,
            PrefabRole::Spawnable,
            1,
            1,
            1,
            1,
            "Z",
            ENEMY_COLOR,
        );
        assert_eq!(catalog.register(zombie.clone()), PrefabId::new(0));
        assert_eq!(catalog.register(zombie), PrefabId::new(1));
        assert_eq!(catalog.len(), 2);
        assert!(catalog.view().barrier().is_none());
    }
}
