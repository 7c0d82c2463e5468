//! Illustrative 4x4 floor plan of a kandang.
//!
//! Cells are addressed `(x, y)` = `(col, row)`, each in `0..GRID_SIZE`. The
//! food spot and the entrance are independent single-cell markers that may
//! overlap each other or any animal. Animal cells come from
//! [`decorative_cell`] and say nothing about where an animal really stands.

use serde::{Deserialize, Serialize};

use crate::entities::{kandang, livestock};

pub const GRID_SIZE: i32 = 4;
pub const CELL_COUNT: usize = (GRID_SIZE * GRID_SIZE) as usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0, GRID_SIZE - 1),
            y: self.y.clamp(0, GRID_SIZE - 1),
        }
    }

    pub fn in_bounds(self) -> bool {
        self == self.clamped()
    }

    /// Row-major cell index. Only meaningful for in-bounds points.
    pub fn cell(self) -> usize {
        (self.y * GRID_SIZE + self.x) as usize
    }

    fn from_cell(cell: usize) -> Self {
        let cell = (cell % CELL_COUNT) as i32;
        Self::new(cell % GRID_SIZE, cell / GRID_SIZE)
    }
}

pub const DEFAULT_FOOD_SPOT: GridPoint = GridPoint::new(0, 0);
pub const DEFAULT_ENTRANCE: GridPoint = GridPoint::new(GRID_SIZE - 1, GRID_SIZE - 1);

/// Display-only cell for the animal at `index` within its kandang:
/// `(index * 7 + 13) mod 16`. Collisions are expected.
pub fn decorative_cell(index: usize) -> GridPoint {
    GridPoint::from_cell(((index % CELL_COUNT) * 7 + 13) % CELL_COUNT)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellView {
    pub x: i32,
    pub y: i32,
    pub food: bool,
    pub entrance: bool,
    pub livestock: Vec<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutView {
    pub kandang_id: i32,
    pub name: String,
    pub capacity: i32,
    pub food_spot: GridPoint,
    pub entrance: GridPoint,
    pub cells: Vec<CellView>,
}

/// Builds the editor grid for `pen`. `occupants` order drives the scatter.
pub fn layout_view(pen: &kandang::Model, occupants: &[&livestock::Model]) -> LayoutView {
    // Stored spots are clamped on write, but legacy rows may predate that.
    let food_spot = pen.food_spot().clamped();
    let entrance = pen.entrance().clamped();

    let mut cells: Vec<CellView> = (0..CELL_COUNT)
        .map(|cell| {
            let point = GridPoint::from_cell(cell);
            CellView {
                x: point.x,
                y: point.y,
                food: point == food_spot,
                entrance: point == entrance,
                livestock: Vec::new(),
            }
        })
        .collect();

    for (index, animal) in occupants.iter().enumerate() {
        cells[decorative_cell(index).cell()].livestock.push(animal.id);
    }

    LayoutView {
        kandang_id: pen.id,
        name: pen.name.clone(),
        capacity: pen.capacity,
        food_spot,
        entrance,
        cells,
    }
}
