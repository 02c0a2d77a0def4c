use core::fmt::{self, Display, Formatter};

use bevy::prelude::*;

/// Identity of one drop zone. Assigned by the layout in declaration order and
/// only ever compared, never used as an index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u8);

impl CellId {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Display for CellId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The cell currently holding the token. At most one cell is occupied.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OccupiedCell(Option<CellId>);

impl OccupiedCell {
    pub const fn new(cell: CellId) -> Self {
        Self(Some(cell))
    }

    pub const fn get(&self) -> Option<CellId> {
        self.0
    }

    pub fn is(&self, cell: CellId) -> bool {
        self.0 == Some(cell)
    }

    pub fn set(&mut self, cell: CellId) {
        self.0 = Some(cell);
    }
}

/// Window-space rectangle from its top-left corner and size. Window space has
/// its origin at the top-left and y growing downward.
pub fn screen_rect(left: f32, top: f32, width: f32, height: f32) -> Rect {
    Rect::new(left, top, left + width, top + height)
}
