//! Turn resolution for enemy movement, wall attacks and piece damage.

use tetris_defence_core::{CellCoord, EnemyId, Event, SoundCue};

use crate::World;

/// Outcome of scanning the cells in front of a moving enemy.
enum Scan {
    Clear,
    Wall { wall: EnemyId, cell: CellCoord, step: u32 },
    Enemy { blocker: EnemyId, step: u32 },
}

impl World {
    /// Resolves one enemy's action for the current turn.
    ///
    /// The enemy scans up to `speed` cells to its left. A wall in the path is
    /// struck; if it breaks the attacker takes its cell, otherwise the
    /// attacker stops right behind it. Any other occupant stops the attacker
    /// without damage. A clear path moves the enemy the full distance, and
    /// moving past the left edge removes the enemy and costs one heart.
    pub(crate) fn advance_enemy(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        let Some(index) = self.enemy_index(id) else {
            return;
        };

        let enemy = &mut self.enemies[index];
        if enemy.acted {
            return;
        }
        enemy.acted = true;
        if enemy.speed == 0 {
            return;
        }

        let from = enemy.cell;
        let speed = enemy.speed;
        let damage = enemy.damage;

        match self.scan_path(from, speed) {
            Scan::Wall { wall, cell, step } => {
                if self.strike_wall(wall, id, damage, out_events) {
                    self.relocate_enemy(id, cell);
                    out_events.push(Event::WallBroken {
                        wall,
                        attacker: id,
                        cell,
                    });
                    out_events.push(Event::SoundRequested {
                        cue: SoundCue::WallBreak,
                    });
                } else {
                    let stop = from.shifted_left(step - 1).unwrap_or(from);
                    self.relocate_enemy(id, stop);
                    out_events.push(Event::SoundRequested {
                        cue: SoundCue::EnemyAttack,
                    });
                }
            }
            Scan::Enemy { blocker, step } => {
                let stop = from.shifted_left(step - 1).unwrap_or(from);
                self.relocate_enemy(id, stop);
                out_events.push(Event::EnemyBlocked {
                    enemy: id,
                    blocker,
                    cell: stop,
                });
                out_events.push(Event::SoundRequested {
                    cue: SoundCue::EnemyMove,
                });
            }
            Scan::Clear => match from.shifted_left(speed) {
                Some(to) => {
                    self.relocate_enemy(id, to);
                    out_events.push(Event::EnemyAdvanced {
                        enemy: id,
                        from,
                        to,
                    });
                    out_events.push(Event::SoundRequested {
                        cue: SoundCue::EnemyMove,
                    });
                }
                None => {
                    let _ = self.remove_enemy(id);
                    out_events.push(Event::EnemyExited {
                        enemy: id,
                        row: from.row(),
                    });
                    self.lose_hearts(1, out_events);
                    out_events.push(Event::SoundRequested {
                        cue: SoundCue::EnemyMove,
                    });
                }
            },
        }
    }

    /// Applies `amount` damage to the hostile enemy in `cell`, if any.
    pub(crate) fn damage_enemy_at(
        &mut self,
        cell: CellCoord,
        amount: u32,
        out_events: &mut Vec<Event>,
    ) {
        let Some(id) = self.occupancy.occupant(cell) else {
            return;
        };
        let Some(index) = self.enemy_index(id) else {
            return;
        };

        let enemy = &mut self.enemies[index];
        if !enemy.is_hostile() {
            return;
        }

        enemy.health = enemy.health.saturating_sub(amount);
        if enemy.health > 0 {
            out_events.push(Event::EnemyDamaged {
                enemy: id,
                amount,
                remaining: enemy.health,
            });
            return;
        }

        let kind = enemy.kind;
        let _ = self.remove_enemy(id);
        self.enemies_killed = self.enemies_killed.saturating_add(1);
        out_events.push(Event::EnemyKilled {
            enemy: id,
            kind,
            cell,
        });
        out_events.push(Event::SoundRequested {
            cue: SoundCue::EnemyDeath,
        });
    }

    /// Removes up to `amount` hearts, announcing each one.
    pub(crate) fn lose_hearts(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        for _ in 0..amount {
            if !self.hearts.lose() {
                break;
            }
            out_events.push(Event::LifeLost {
                remaining: self.hearts.alive(),
            });
            out_events.push(Event::SoundRequested {
                cue: SoundCue::LoseHeart,
            });
        }
    }

    /// Restores up to `amount` hearts, announcing each one.
    pub(crate) fn gain_hearts(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        for _ in 0..amount {
            if !self.hearts.gain() {
                break;
            }
            out_events.push(Event::LifeGained {
                remaining: self.hearts.alive(),
            });
            out_events.push(Event::SoundRequested {
                cue: SoundCue::GainHeart,
            });
        }
    }

    fn scan_path(&self, from: CellCoord, speed: u32) -> Scan {
        for step in 1..=speed {
            let Some(cell) = from.shifted_left(step) else {
                break;
            };
            let Some(occupant) = self.occupancy.occupant(cell) else {
                continue;
            };

            let is_wall = self
                .enemy_index(occupant)
                .map_or(false, |index| !self.enemies[index].is_hostile());
            return if is_wall {
                Scan::Wall {
                    wall: occupant,
                    cell,
                    step,
                }
            } else {
                Scan::Enemy {
                    blocker: occupant,
                    step,
                }
            };
        }
        Scan::Clear
    }

    /// Damages a wall. Returns `true` when the wall broke and was removed.
    fn strike_wall(
        &mut self,
        wall: EnemyId,
        attacker: EnemyId,
        damage: u32,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(index) = self.enemy_index(wall) else {
            return false;
        };

        let target = &mut self.enemies[index];
        target.health = target.health.saturating_sub(damage);
        if target.health == 0 {
            let _ = self.remove_enemy(wall);
            return true;
        }

        out_events.push(Event::WallDamaged {
            wall,
            attacker,
            remaining: target.health,
        });
        false
    }

    fn relocate_enemy(&mut self, id: EnemyId, to: CellCoord) {
        let Some(index) = self.enemy_index(id) else {
            return;
        };
        let from = self.enemies[index].cell;
        if from == to {
            return;
        }
        self.occupancy.vacate(from);
        self.occupancy.occupy(id, to);
        self.enemies[index].cell = to;
    }
}
