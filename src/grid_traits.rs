use crate::cells::{Cartesian2DCoordinate, CellStatus, WallMask};
use crate::grid::Grid;
use crate::units::{Height, Width};

/// Read-only access to maze cell state. Anything that draws a maze only needs this.
pub trait MazeView {
    fn dimensions(&self) -> (Width, Height);
    fn walls_at(&self, coord: Cartesian2DCoordinate) -> Option<WallMask>;
    fn status_at(&self, coord: Cartesian2DCoordinate) -> Option<CellStatus>;
}

impl MazeView for Grid {
    #[inline]
    fn dimensions(&self) -> (Width, Height) {
        (Width(self.width()), Height(self.height()))
    }

    #[inline]
    fn walls_at(&self, coord: Cartesian2DCoordinate) -> Option<WallMask> {
        self.cell_at(coord).map(|cell| cell.walls())
    }

    #[inline]
    fn status_at(&self, coord: Cartesian2DCoordinate) -> Option<CellStatus> {
        self.cell_at(coord).map(|cell| cell.status())
    }
}

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: Cartesian2DCoordinate) -> String {
        String::from("   ")
    }
}
