//! 7-bag piece randomiser.

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tetris_defence_core::{PieceKind, TetrisPiece};

/// Shuffled bag holding one of each piece kind.
///
/// Pieces are drawn without replacement; a new bag is shuffled only once the
/// current one is empty, so every run of seven draws aligned to a bag
/// boundary contains each kind exactly once.
#[derive(Clone, Debug)]
pub struct PieceBag {
    rng: ChaCha8Rng,
    bag: Vec<PieceKind>,
}

impl PieceBag {
    /// Creates an empty bag that shuffles with the provided seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            bag: Vec::with_capacity(PieceKind::ALL.len()),
        }
    }

    /// Draws the next piece, refilling the bag when it is empty.
    pub fn draw(&mut self) -> TetrisPiece {
        if self.bag.is_empty() {
            self.refill();
        }
        let kind = self.bag.pop().unwrap_or(PieceKind::I);
        TetrisPiece::new(kind)
    }

    /// Number of pieces left before the next shuffle.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bag.len()
    }

    fn refill(&mut self) {
        self.bag.clear();
        self.bag.extend_from_slice(&PieceKind::ALL);
        self.bag.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_bag_contains_each_kind_once() {
        let mut bag = PieceBag::new(17);
        for _ in 0..10 {
            let drawn: HashSet<PieceKind> = (0..7).map(|_| bag.draw().kind()).collect();
            assert_eq!(drawn.len(), 7);
            assert_eq!(bag.remaining(), 0);
        }
    }

    #[test]
    fn identical_seeds_draw_identical_sequences() {
        let mut first = PieceBag::new(3);
        let mut second = PieceBag::new(3);
        for _ in 0..21 {
            assert_eq!(first.draw(), second.draw());
        }
    }
}
