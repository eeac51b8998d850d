use glam::Vec2;
use tetris_defence_core::{HAND_SIZE, PEEK_SIZE};
use tetris_defence_world::HAND_PANEL_FRACTION;

/// Fraction of a panel column covered by its slot.
const SLOT_WIDTH_FILL: f32 = 0.9;
/// Fraction of the panel height covered by each slot.
const SLOT_HEIGHT_FILL: f32 = 0.8;
/// Hand slots, one spacer column, then the peek queue.
const PANEL_COLUMNS: usize = HAND_SIZE + 1 + PEEK_SIZE;

/// Axis-aligned rectangle in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotRect {
    /// Top-left corner.
    pub min: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl SlotRect {
    /// Reports whether `point` lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.min + self.size;
        point.cmpge(self.min).all() && point.cmplt(max).all()
    }
}

/// Pixel layout of the hand panel along the bottom of the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandLayout {
    panel_top: f32,
    panel_height: f32,
    column_width: f32,
}

impl HandLayout {
    /// Lays the panel out inside `viewport`.
    #[must_use]
    pub fn new(viewport: Vec2) -> Self {
        let panel_height = viewport.y * HAND_PANEL_FRACTION;
        Self {
            panel_top: viewport.y - panel_height,
            panel_height,
            column_width: viewport.x / PANEL_COLUMNS as f32,
        }
    }

    /// Rectangle of hand slot `slot`.
    #[must_use]
    pub fn slot_rect(&self, slot: usize) -> Option<SlotRect> {
        (slot < HAND_SIZE).then(|| self.column_rect(slot))
    }

    /// Rectangle of peek queue entry `index`.
    #[must_use]
    pub fn peek_rect(&self, index: usize) -> Option<SlotRect> {
        (index < PEEK_SIZE).then(|| self.column_rect(HAND_SIZE + 1 + index))
    }

    /// Hand slot under `point`, if any. Peek entries are not selectable.
    #[must_use]
    pub fn slot_at(&self, point: Vec2) -> Option<usize> {
        (0..HAND_SIZE).find(|slot| self.column_rect(*slot).contains(point))
    }

    fn column_rect(&self, column: usize) -> SlotRect {
        let size = Vec2::new(
            self.column_width * SLOT_WIDTH_FILL,
            self.panel_height * SLOT_HEIGHT_FILL,
        );
        let cell_min = Vec2::new(self.column_width * column as f32, self.panel_top);
        let cell_size = Vec2::new(self.column_width, self.panel_height);
        SlotRect {
            min: cell_min + (cell_size - size) * 0.5,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centre(rect: SlotRect) -> Vec2 {
        rect.min + rect.size * 0.5
    }

    #[test]
    fn slots_sit_in_the_bottom_panel() {
        let layout = HandLayout::new(Vec2::new(900.0, 1000.0));
        for slot in 0..HAND_SIZE {
            let rect = layout.slot_rect(slot).expect("hand slot");
            assert!(rect.min.y >= 800.0);
            assert!(rect.min.y + rect.size.y <= 1000.0);
        }
        assert!(layout.slot_rect(HAND_SIZE).is_none());
        assert!(layout.peek_rect(PEEK_SIZE).is_none());
    }

    #[test]
    fn slot_hit_testing_matches_rectangles() {
        let layout = HandLayout::new(Vec2::new(900.0, 1000.0));
        for slot in 0..HAND_SIZE {
            let rect = layout.slot_rect(slot).expect("hand slot");
            assert_eq!(layout.slot_at(centre(rect)), Some(slot));
        }

        let peek = layout.peek_rect(0).expect("peek slot");
        assert_eq!(layout.slot_at(centre(peek)), None);
        assert_eq!(layout.slot_at(Vec2::new(450.0, 100.0)), None);
    }
}
