//! Dense occupancy storage for the playfield.

use tetris_defence_core::{CellCoord, EnemyId};

#[derive(Clone, Debug)]
pub(crate) struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<EnemyId>>,
}

impl OccupancyGrid {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<EnemyId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Cells outside the grid are never free.
    pub(crate) fn is_free(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(false, |index| matches!(self.cells.get(index), Some(None)))
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    pub(crate) fn occupy(&mut self, enemy: EnemyId, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(enemy);
            }
        }
    }

    pub(crate) fn vacate(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = None;
            }
        }
    }

    pub(crate) fn cells(&self) -> &[Option<EnemyId>] {
        &self.cells
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupy_and_vacate_round_trip() {
        let mut grid = OccupancyGrid::new(3, 2);
        let cell = CellCoord::new(2, 1);
        assert!(grid.is_free(cell));

        grid.occupy(EnemyId::new(9), cell);
        assert_eq!(grid.occupant(cell), Some(EnemyId::new(9)));
        assert!(!grid.is_free(cell));

        grid.vacate(cell);
        assert!(grid.is_free(cell));
    }

    #[test]
    fn writes_outside_bounds_are_ignored() {
        let mut grid = OccupancyGrid::new(2, 2);
        grid.occupy(EnemyId::new(1), CellCoord::new(5, 0));
        assert!(grid.cells().iter().all(Option::is_none));
        assert!(!grid.contains(CellCoord::new(2, 0)));
        assert!(!grid.is_free(CellCoord::new(0, 2)));
    }
}
