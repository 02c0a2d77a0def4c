use bevy::prelude::*;
use strum::Display;

use crate::cell::CellId;

/// Every zone needs its own `CellId`; cells past this many are not laid out.
pub const MAX_CELLS: usize = u8::MAX as usize + 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn from_size(size: Vec2) -> Self {
        if size.x < size.y {
            Self::Portrait
        } else {
            Self::Landscape
        }
    }
}

/// One drop zone of the counter, placed in world space relative to the center
/// of the content area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPlacement {
    pub cell: CellId,
    pub center: Vec2,
}

/// Shape of the counter: a `rows` x `cols` grid with up to two end cells, one
/// before the grid and one after it.
///
/// In portrait the end cells sit above and below the grid, hugging its left
/// and right edges. In landscape they sit left and right of it.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct CounterLayout {
    rows: usize,
    cols: usize,
    end_cells: usize,
    cell_size: f32,
    spacing: f32,
    token_diameter: f32,
    token_tag: String,
    chrome_height: f32,
}

impl Default for CounterLayout {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 3,
            end_cells: 2,
            cell_size: 100.0,
            spacing: 8.0,
            token_diameter: 80.0,
            token_tag: "red_circle".to_owned(),
            chrome_height: 64.0,
        }
    }
}

impl CounterLayout {
    pub const fn with_grid(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// At most two end cells are laid out; larger counts are clamped.
    pub fn with_end_cells(mut self, end_cells: usize) -> Self {
        self.end_cells = end_cells.min(2);
        self
    }

    pub const fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub const fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub const fn with_token_diameter(mut self, token_diameter: f32) -> Self {
        self.token_diameter = token_diameter;
        self
    }

    pub fn with_token_tag(mut self, token_tag: impl Into<String>) -> Self {
        self.token_tag = token_tag.into();
        self
    }

    pub const fn with_chrome_height(mut self, chrome_height: f32) -> Self {
        self.chrome_height = chrome_height;
        self
    }

    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub const fn token_diameter(&self) -> f32 {
        self.token_diameter
    }

    pub fn token_tag(&self) -> &str {
        &self.token_tag
    }

    /// Height of the title bar; only portrait screens show one.
    pub const fn chrome_height(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Portrait => self.chrome_height,
            Orientation::Landscape => 0.0,
        }
    }

    /// Number of zones actually laid out, at most [`MAX_CELLS`].
    pub fn cell_count(&self) -> usize {
        self.requested_cells().min(MAX_CELLS)
    }

    const fn requested_cells(&self) -> usize {
        self.rows
            .saturating_mul(self.cols)
            .saturating_add(self.end_cells)
    }

    /// The cell holding the token when a screen is mounted.
    pub const fn initial_cell(&self) -> CellId {
        CellId::new(0)
    }

    pub fn cells(&self, orientation: Orientation) -> Vec<CellPlacement> {
        if self.requested_cells() > MAX_CELLS {
            warn!(
                "counter asks for {} cells; only the first {MAX_CELLS} are laid out",
                self.requested_cells()
            );
        }

        let pitch = self.cell_size + self.spacing;
        let grid = Vec2::new(self.extent(self.cols), self.extent(self.rows));
        let leading = usize::from(self.end_cells >= 1) as f32;
        let trailing = usize::from(self.end_cells >= 2) as f32;
        let half_cell = self.cell_size / 2.0;

        let (grid_center, leading_center, trailing_center) = match orientation {
            Orientation::Portrait => {
                let top = (grid.y + (leading + trailing) * pitch) / 2.0;
                let grid_top = top - leading * pitch;
                (
                    Vec2::new(0.0, grid_top - grid.y / 2.0),
                    Vec2::new(-grid.x / 2.0 + half_cell, top - half_cell),
                    Vec2::new(
                        grid.x / 2.0 - half_cell,
                        grid_top - grid.y - self.spacing - half_cell,
                    ),
                )
            }
            Orientation::Landscape => {
                let left = -(grid.x + (leading + trailing) * pitch) / 2.0;
                let grid_left = left + leading * pitch;
                (
                    Vec2::new(grid_left + grid.x / 2.0, 0.0),
                    Vec2::new(left + half_cell, 0.0),
                    Vec2::new(grid_left + grid.x + self.spacing + half_cell, 0.0),
                )
            }
        };

        let mut ids = (0..=u8::MAX).map(CellId::new);
        let mut cells = Vec::with_capacity(self.cell_count());
        let mut place = |center: Vec2| {
            if let Some(cell) = ids.next() {
                cells.push(CellPlacement { cell, center });
            }
        };

        if self.end_cells >= 1 {
            place(leading_center);
        }
        let first = Vec2::new(
            grid_center.x - grid.x / 2.0 + half_cell,
            grid_center.y + grid.y / 2.0 - half_cell,
        );
        for row in 0..self.rows {
            for col in 0..self.cols {
                place(first + Vec2::new(col as f32 * pitch, -(row as f32) * pitch));
            }
        }
        if self.end_cells >= 2 {
            place(trailing_center);
        }

        cells
    }

    fn extent(&self, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        (count as f32).mul_add(self.cell_size, (count - 1) as f32 * self.spacing)
    }
}
