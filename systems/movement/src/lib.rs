#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that orders enemy actions within a turn.

use tetris_defence_core::{Command, EnemyId, EnemyView, Event};

/// Pure system that reacts to enemy turn starts and emits one advance per mover.
///
/// Enemies act in ascending id order. Stationary enemies (speed zero) are
/// never scheduled. The batch always ends with [`Command::EndEnemyTurn`] so
/// the world closes the turn after the last action is resolved.
#[derive(Debug, Default)]
pub struct Movement {
    order: Vec<EnemyId>,
}

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and the enemy view to emit movement commands.
    pub fn handle(&mut self, events: &[Event], enemy_view: &EnemyView, out: &mut Vec<Command>) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::EnemyTurnStarted { .. }))
        {
            return;
        }

        self.order.clear();
        self.order.extend(
            enemy_view
                .iter()
                .filter(|enemy| enemy.speed > 0 && !enemy.acted)
                .map(|enemy| enemy.id),
        );
        self.order.sort_unstable();

        out.extend(
            self.order
                .iter()
                .map(|enemy| Command::AdvanceEnemy { enemy: *enemy }),
        );
        out.push(Command::EndEnemyTurn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_defence_core::{
        CellCoord, EnemyKind, EnemySnapshot, PrefabId, PrefabRole, Tint,
    };

    fn snapshot(id: u32, speed: u32, acted: bool) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            prefab: PrefabId::new(1),
            kind: EnemyKind::Zombie,
            role: PrefabRole::Spawnable,
            cell: CellCoord::new(id, 0),
            health: 1,
            max_health: 1,
            damage: 1,
            speed,
            glyph: "Z".to_owned(),
            color: Tint::from_rgb(0, 0, 0),
            acted,
            cost: 1,
        }
    }

    #[test]
    fn ignores_batches_without_turn_start() {
        let mut movement = Movement::new();
        let view = EnemyView::from_snapshots(vec![snapshot(0, 1, false)]);
        let mut commands = Vec::new();
        movement.handle(&[Event::LayoutChanged], &view, &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn schedules_movers_in_id_order_and_closes_turn() {
        let mut movement = Movement::new();
        let view = EnemyView::from_snapshots(vec![
            snapshot(4, 1, false),
            snapshot(2, 0, false),
            snapshot(1, 3, false),
            snapshot(3, 1, true),
        ]);
        let mut commands = Vec::new();
        movement.handle(&[Event::EnemyTurnStarted { turn: 0 }], &view, &mut commands);

        assert_eq!(
            commands,
            vec![
                Command::AdvanceEnemy {
                    enemy: EnemyId::new(1)
                },
                Command::AdvanceEnemy {
                    enemy: EnemyId::new(4)
                },
                Command::EndEnemyTurn,
            ]
        );
    }
}
