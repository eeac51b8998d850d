//! Tetris piece definitions shared by the placement system and the world.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, PlacementError, Tint};

/// Side length of the square matrix that bounds every piece shape.
pub const SHAPE_BOUNDS: usize = 4;

/// The seven canonical tetromino kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    /// Four cells in a straight line.
    I,
    /// Two by two square.
    O,
    /// Three cells with a centred bump.
    T,
    /// Skewed piece leaning right.
    S,
    /// Skewed piece leaning left.
    Z,
    /// Three cells with a hook on the left.
    J,
    /// Three cells with a hook on the right.
    L,
}

impl PieceKind {
    /// Every piece kind in canonical bag order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Canonical shape of the piece, packed against the top-left corner.
    #[must_use]
    pub fn shape(self) -> PieceShape {
        let offsets: [(u32, u32); 4] = match self {
            Self::I => [(0, 0), (1, 0), (2, 0), (3, 0)],
            Self::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
            Self::T => [(1, 0), (0, 1), (1, 1), (2, 1)],
            Self::S => [(1, 0), (2, 0), (0, 1), (1, 1)],
            Self::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
            Self::J => [(0, 0), (0, 1), (1, 1), (2, 1)],
            Self::L => [(2, 0), (0, 1), (1, 1), (2, 1)],
        };
        PieceShape::from_offsets(&offsets)
    }

    /// Fill and stroke colors used when presenting the piece.
    #[must_use]
    pub const fn colors(self) -> (Tint, Tint) {
        match self {
            Self::I => (Tint::from_rgb(0, 240, 240), Tint::from_rgb(0, 120, 120)),
            Self::O => (Tint::from_rgb(240, 240, 0), Tint::from_rgb(120, 120, 0)),
            Self::T => (Tint::from_rgb(160, 0, 240), Tint::from_rgb(80, 0, 120)),
            Self::S => (Tint::from_rgb(0, 240, 0), Tint::from_rgb(0, 120, 0)),
            Self::Z => (Tint::from_rgb(240, 0, 0), Tint::from_rgb(120, 0, 0)),
            Self::J => (Tint::from_rgb(0, 0, 240), Tint::from_rgb(0, 0, 120)),
            Self::L => (Tint::from_rgb(240, 160, 0), Tint::from_rgb(120, 80, 0)),
        }
    }
}

/// Boolean occupancy matrix indexed as `[x][y]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceShape {
    cells: [[bool; SHAPE_BOUNDS]; SHAPE_BOUNDS],
}

impl PieceShape {
    /// Shape without any occupied cell.
    pub const EMPTY: PieceShape = PieceShape {
        cells: [[false; SHAPE_BOUNDS]; SHAPE_BOUNDS],
    };

    /// Builds a shape from `(x, y)` offsets. Offsets outside the bounds are ignored.
    #[must_use]
    pub fn from_offsets(offsets: &[(u32, u32)]) -> Self {
        let mut shape = Self::EMPTY;
        for &(x, y) in offsets {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if x < SHAPE_BOUNDS && y < SHAPE_BOUNDS {
                shape.cells[x][y] = true;
            }
        }
        shape
    }

    /// Reports whether the `(x, y)` cell of the matrix is occupied.
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < SHAPE_BOUNDS && y < SHAPE_BOUNDS && self.cells[x][y]
    }

    /// Occupied offsets in row-major order (top row first, left to right).
    pub fn offsets(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..SHAPE_BOUNDS).flat_map(move |y| {
            (0..SHAPE_BOUNDS)
                .filter(move |&x| self.cells[x][y])
                .map(move |x| (x as u32, y as u32))
        })
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| **cell).count()
    }

    /// Reports whether no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    /// Width and height of the occupied bounding box measured from the origin.
    #[must_use]
    pub fn extent(&self) -> (u32, u32) {
        self.offsets().fold((0, 0), |(width, height), (x, y)| {
            (width.max(x + 1), height.max(y + 1))
        })
    }

    /// Maps the shape onto grid cells anchored at `origin`.
    ///
    /// Fails when the shape is empty or any occupied cell falls outside a
    /// `columns` x `rows` grid.
    pub fn footprint(
        &self,
        origin: CellCoord,
        columns: u32,
        rows: u32,
    ) -> Result<Vec<CellCoord>, PlacementError> {
        if self.is_empty() {
            return Err(PlacementError::EmptyShape);
        }

        let mut cells = Vec::with_capacity(self.occupied_count());
        for (x, y) in self.offsets() {
            let column = origin.column().checked_add(x);
            let row = origin.row().checked_add(y);
            match (column, row) {
                (Some(column), Some(row)) if column < columns && row < rows => {
                    cells.push(CellCoord::new(column, row));
                }
                _ => return Err(PlacementError::OutOfBounds),
            }
        }
        Ok(cells)
    }
}

/// A piece drawn from the bag and held by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TetrisPiece {
    kind: PieceKind,
    shape: PieceShape,
    color: Tint,
    stroke: Tint,
}

impl TetrisPiece {
    /// Creates the canonical piece for the provided kind.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        let (color, stroke) = kind.colors();
        Self {
            kind,
            shape: kind.shape(),
            color,
            stroke,
        }
    }

    /// Kind of the piece.
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Occupancy matrix of the piece.
    #[must_use]
    pub const fn shape(&self) -> &PieceShape {
        &self.shape
    }

    /// Fill color.
    #[must_use]
    pub const fn color(&self) -> Tint {
        self.color
    }

    /// Outline color.
    #[must_use]
    pub const fn stroke(&self) -> Tint {
        self.stroke
    }

    /// Number of grid cells the piece covers.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.shape.occupied_count()
    }
}

/// How a committed piece affects the cells it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceMode {
    /// Inserts a wall into every covered cell.
    Wall,
    /// Damages every enemy in the covered cells.
    Attack {
        /// Damage applied to each covered enemy.
        damage: u32,
    },
}
