//! Conversion between grid cells and viewport pixels.

use glam::Vec2;
use tetris_defence_core::CellCoord;

/// Fraction of the viewport height reserved for the heads-up display.
pub const HUD_BAND_FRACTION: f32 = 0.1;

/// Fraction of the viewport height reserved for the hand panel.
pub const HAND_PANEL_FRACTION: f32 = 0.2;

/// Fraction of the viewport width the grid may span.
pub const GRID_WIDTH_FRACTION: f32 = 0.95;

/// Pixel placement of the grid inside the viewport.
///
/// The grid sits below the HUD band, above the hand panel, and is centred
/// horizontally. Cells are square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    origin: Vec2,
    cell_size: f32,
    columns: u32,
    rows: u32,
}

impl GridLayout {
    /// Computes the layout of a `columns` x `rows` grid within `viewport`.
    #[must_use]
    pub fn new(columns: u32, rows: u32, viewport: Vec2) -> Self {
        let hud = viewport.y * HUD_BAND_FRACTION;
        let available_height = viewport.y * (1.0 - HUD_BAND_FRACTION - HAND_PANEL_FRACTION);

        let cell_size = if columns == 0 || rows == 0 {
            0.0
        } else {
            let by_width = viewport.x * GRID_WIDTH_FRACTION / columns as f32;
            let by_height = available_height / rows as f32;
            by_width.min(by_height).max(0.0)
        };

        let grid_width = cell_size * columns as f32;
        Self {
            origin: Vec2::new((viewport.x - grid_width) * 0.5, hud),
            cell_size,
            columns,
            rows,
        }
    }

    /// Top-left pixel of the grid.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Side length of a single cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Pixel size of the whole grid.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(
            self.cell_size * self.columns as f32,
            self.cell_size * self.rows as f32,
        )
    }

    /// Pixel centre of the cell at `column`, `row`.
    ///
    /// Coordinates are signed so positions just past the edges, such as an
    /// enemy leaving the grid, can be drawn too.
    #[must_use]
    pub fn to_pixel(&self, column: i32, row: i32) -> Vec2 {
        self.origin + (Vec2::new(column as f32, row as f32) + Vec2::splat(0.5)) * self.cell_size
    }

    /// Cell under `point`, or `None` outside the grid.
    #[must_use]
    pub fn from_pixel(&self, point: Vec2) -> Option<CellCoord> {
        if self.cell_size <= 0.0 {
            return None;
        }

        let local = (point - self.origin) / self.cell_size;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }

        let column = local.x.floor() as u32;
        let row = local.y.floor() as u32;
        (column < self.columns && row < self.rows).then(|| CellCoord::new(column, row))
    }
}
