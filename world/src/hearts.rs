//! Player life total.

use tetris_defence_core::LifeSnapshot;

/// Ordered heart slots. Hearts are lost from the back and restored from the front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeartPool {
    hearts: Vec<bool>,
}

impl HeartPool {
    /// Creates a pool with `capacity` living hearts.
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        let capacity = usize::try_from(capacity).unwrap_or(0);
        Self {
            hearts: vec![true; capacity],
        }
    }

    /// Kills the last living heart. Returns `false` when none is left.
    pub fn lose(&mut self) -> bool {
        match self.hearts.iter().rposition(|alive| *alive) {
            Some(index) => {
                self.hearts[index] = false;
                true
            }
            None => false,
        }
    }

    /// Revives the first dead heart. Returns `false` when the pool is full.
    pub fn gain(&mut self) -> bool {
        match self.hearts.iter().position(|alive| !*alive) {
            Some(index) => {
                self.hearts[index] = true;
                true
            }
            None => false,
        }
    }

    /// Number of living hearts.
    #[must_use]
    pub fn alive(&self) -> u32 {
        let count = self.hearts.iter().filter(|alive| **alive).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Number of heart slots.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        u32::try_from(self.hearts.len()).unwrap_or(u32::MAX)
    }

    /// Per-slot liveness, front to back.
    #[must_use]
    pub fn slots(&self) -> &[bool] {
        &self.hearts
    }

    /// Revives every heart.
    pub fn restore(&mut self) {
        self.hearts.fill(true);
    }

    /// Summary suitable for queries.
    #[must_use]
    pub fn snapshot(&self) -> LifeSnapshot {
        LifeSnapshot {
            alive: self.alive(),
            capacity: self.capacity(),
        }
    }
}
