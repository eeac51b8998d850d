//! The player's hand and peek queue.

use tetris_defence_core::{PieceMode, TetrisPiece, HAND_SIZE, PEEK_SIZE};

use crate::bag::PieceBag;

/// Hand slot whose piece is placed as walls. Every other slot attacks.
pub const WALL_SLOT: usize = 0;

/// Fixed-size hand, the upcoming pieces, and the currently held slot.
#[derive(Clone, Debug)]
pub struct PlayerHand {
    bag: PieceBag,
    hand: [TetrisPiece; HAND_SIZE],
    peek: [TetrisPiece; PEEK_SIZE],
    held: Option<usize>,
}

impl PlayerHand {
    /// Deals a full hand and peek queue from `bag`.
    #[must_use]
    pub fn new(mut bag: PieceBag) -> Self {
        let hand = std::array::from_fn(|_| bag.draw());
        let peek = std::array::from_fn(|_| bag.draw());
        Self {
            bag,
            hand,
            peek,
            held: None,
        }
    }

    /// Pieces in hand, slot by slot.
    #[must_use]
    pub fn hand(&self) -> &[TetrisPiece; HAND_SIZE] {
        &self.hand
    }

    /// Upcoming pieces, next first.
    #[must_use]
    pub fn peek(&self) -> &[TetrisPiece; PEEK_SIZE] {
        &self.peek
    }

    /// Slot currently held, if any.
    #[must_use]
    pub fn held(&self) -> Option<usize> {
        self.held
    }

    /// Piece in the held slot, if any.
    #[must_use]
    pub fn held_piece(&self) -> Option<TetrisPiece> {
        self.held.map(|slot| self.hand[slot])
    }

    /// Holds `slot`. Returns `false` for slots outside the hand.
    pub fn hold(&mut self, slot: usize) -> bool {
        if slot >= HAND_SIZE {
            return false;
        }
        self.held = Some(slot);
        true
    }

    /// Releases the held slot without consuming it.
    pub fn release(&mut self) {
        self.held = None;
    }

    /// Removes the held piece from the hand.
    ///
    /// Later slots shift left, the next peeked piece fills the last slot, the
    /// peek queue shifts and a freshly drawn piece joins its end. The hand is
    /// released afterwards.
    pub fn remove_piece_held_from_hand(&mut self) -> Option<TetrisPiece> {
        let slot = self.held.take()?;
        let removed = self.hand[slot];

        self.hand.copy_within(slot + 1.., slot);
        self.hand[HAND_SIZE - 1] = self.peek[0];
        self.peek.copy_within(1.., 0);
        self.peek[PEEK_SIZE - 1] = self.bag.draw();

        Some(removed)
    }
}

/// Effect a piece taken from `slot` has when placed.
#[must_use]
pub fn slot_mode(slot: usize, attack_damage: u32) -> PieceMode {
    if slot == WALL_SLOT {
        PieceMode::Wall
    } else {
        PieceMode::Attack {
            damage: attack_damage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_held_piece_promotes_peek() {
        let mut hand = PlayerHand::new(PieceBag::new(5));
        let before_hand = *hand.hand();
        let before_peek = *hand.peek();

        assert!(hand.hold(1));
        let removed = hand.remove_piece_held_from_hand().expect("held piece");

        assert_eq!(removed, before_hand[1]);
        assert_eq!(hand.hand()[0], before_hand[0]);
        assert_eq!(&hand.hand()[1..4], &before_hand[2..5]);
        assert_eq!(hand.hand()[HAND_SIZE - 1], before_peek[0]);
        assert_eq!(&hand.peek()[..PEEK_SIZE - 1], &before_peek[1..]);
        assert_eq!(hand.held(), None);
    }

    #[test]
    fn removing_the_last_slot_keeps_sizes() {
        let mut hand = PlayerHand::new(PieceBag::new(8));
        let before_peek = *hand.peek();

        assert!(hand.hold(HAND_SIZE - 1));
        let _ = hand.remove_piece_held_from_hand();

        assert_eq!(hand.hand().len(), HAND_SIZE);
        assert_eq!(hand.peek().len(), PEEK_SIZE);
        assert_eq!(hand.hand()[HAND_SIZE - 1], before_peek[0]);
    }

    #[test]
    fn nothing_is_removed_without_a_held_slot() {
        let mut hand = PlayerHand::new(PieceBag::new(2));
        let before = *hand.hand();
        assert!(hand.remove_piece_held_from_hand().is_none());
        assert!(!hand.hold(HAND_SIZE));
        assert_eq!(*hand.hand(), before);
    }

    #[test]
    fn first_deal_uses_one_full_bag() {
        let hand = PlayerHand::new(PieceBag::new(21));
        let mut kinds: Vec<_> = hand
            .hand()
            .iter()
            .chain(hand.peek().iter().take(2))
            .map(|piece| piece.kind())
            .collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), 7);
    }

    #[test]
    fn slot_zero_builds_walls() {
        assert_eq!(slot_mode(0, 2), PieceMode::Wall);
        assert_eq!(slot_mode(3, 2), PieceMode::Attack { damage: 2 });
    }
}
