use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;
use std::fmt;

use crate::cells::{Cartesian2DCoordinate, Cell, CellStatus, CoordinateSmallVec, Direction};
use crate::units::{EdgesCount, Height, NodesCount, Width};

// Looking only up and right from every cell visits each passage exactly once.
static LINK_DIRECTIONS: [Direction; 2] = [Direction::Up, Direction::Right];


/// A fixed size rectangular arena of cells addressed by `(x, y)`.
///
/// The dimensions never change after construction and every cell's coordinate matches its slot.
/// Walls only ever open through `carve`, which clears both sides of a passage together.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    NoNeighbour,
}

impl fmt::Display for CellLinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CellLinkError::InvalidGridCoordinate => write!(f, "coordinate is outside the grid"),
            CellLinkError::NoNeighbour => write!(f, "no neighbouring cell in that direction"),
        }
    }
}

impl std::error::Error for CellLinkError {}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, links: {:?}",
               self.width, self.height, self.links_count())
    }
}

impl Grid {
    /// Allocate a fully walled grid.
    ///
    /// Returns None if either dimension is zero or the cells cannot be addressed with `u32`
    /// coordinates.
    pub fn new(width: Width, height: Height) -> Option<Grid> {
        let (Width(w), Height(h)) = (width, height);
        if w == 0 || h == 0 || w > u32::MAX as usize || h > u32::MAX as usize {
            return None;
        }
        let size = w.checked_mul(h)?;

        let cells = (0..size)
            .map(|index| Cell::new(Cartesian2DCoordinate::new((index % w) as u32, (index / w) as u32)))
            .collect();

        Some(Grid {
            width: w,
            height: h,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Node and passage counts of a perfect maze on this grid.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let cells_count = self.size();
        (NodesCount(cells_count), EdgesCount(cells_count - 1))
    }

    #[inline]
    pub fn cell_at(&self, coord: Cartesian2DCoordinate) -> Option<&Cell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    #[inline]
    fn cell_at_mut(&mut self, coord: Cartesian2DCoordinate) -> Option<&mut Cell> {
        match self.grid_coordinate_to_index(coord) {
            Some(index) => Some(&mut self.cells[index]),
            None => None,
        }
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width && (coord.y as usize) < self.height
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some((coord.y as usize * self.width) + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> Option<Cartesian2DCoordinate> {
        if index < self.size() {
            Some(Cartesian2DCoordinate::new((index % self.width) as u32, (index / self.width) as u32))
        } else {
            None
        }
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cartesian2DCoordinate {
        let x = rng.gen_range(0..self.width) as u32;
        let y = rng.gen_range(0..self.height) as u32;
        Cartesian2DCoordinate::new(x, y)
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: Direction)
                                  -> Option<Cartesian2DCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        coord.offset(direction).filter(|neighbour| self.is_valid_coordinate(*neighbour))
    }

    /// Cells that are up, down, left or right of a cell, but not necessarily reachable through an
    /// open wall.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        Direction::all()
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Is there no wall on the `direction` side of the cell?
    ///
    /// False for coordinates outside the grid.
    #[inline]
    pub fn is_open(&self, coord: Cartesian2DCoordinate, direction: Direction) -> bool {
        self.cell_at(coord).map_or(false, |cell| cell.is_open(direction))
    }

    /// Are two adjacent cells joined by a passage?
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        Direction::all()
            .iter()
            .any(|dir| self.neighbour_at_direction(a, *dir) == Some(b) && self.is_open(a, *dir))
    }

    /// Cells joined to a particular cell by a passage.
    /// Returns None if the coordinate is invalid.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        let linked = Direction::all()
            .iter()
            .filter(|dir| self.is_open(coord, **dir))
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect();
        Some(linked)
    }

    /// Number of open passages. Each passage is counted once.
    pub fn links_count(&self) -> usize {
        self.iter_links().count()
    }

    /// Every open passage as a `(cell, cell above or to the right)` pair.
    pub fn iter_links<'a>(&'a self)
                          -> impl Iterator<Item = (Cartesian2DCoordinate, Cartesian2DCoordinate)> + 'a {
        self.cells.iter().flat_map(move |cell| {
            let coord = cell.position();
            LINK_DIRECTIONS.iter()
                .filter(move |dir| cell.is_open(**dir))
                .filter_map(move |dir| {
                    self.neighbour_at_direction(coord, *dir).map(|neighbour| (coord, neighbour))
                })
        })
    }

    /// Open the wall between a cell and its neighbour in `direction`, on both sides at once.
    ///
    /// Returns the neighbour's coordinate. Carving an already open passage is a no-op.
    pub fn carve(&mut self,
                 coord: Cartesian2DCoordinate,
                 direction: Direction)
                 -> Result<Cartesian2DCoordinate, CellLinkError> {
        if !self.is_valid_coordinate(coord) {
            return Err(CellLinkError::InvalidGridCoordinate);
        }
        let neighbour = self.neighbour_at_direction(coord, direction)
            .ok_or(CellLinkError::NoNeighbour)?;

        if let Some(cell) = self.cell_at_mut(coord) {
            cell.remove_walls(direction.wall());
        }
        if let Some(cell) = self.cell_at_mut(neighbour) {
            cell.remove_walls(direction.opposite().wall());
        }
        Ok(neighbour)
    }

    #[inline]
    pub(crate) fn set_status(&mut self, coord: Cartesian2DCoordinate, status: CellStatus) {
        if let Some(cell) = self.cell_at_mut(coord) {
            cell.set_status(status);
        }
    }

    /// All coordinates in row major order, starting at `(0, 0)`.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Cartesian2DCoordinate> + '_ {
        self.cells.iter().map(Cell::position)
    }

    /// Rows of coordinates, lowest `y` first.
    pub fn iter_row(&self) -> impl Iterator<Item = Vec<Cartesian2DCoordinate>> + '_ {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(Cell::position).collect())
    }

    pub fn iter_cells(&self) -> std::slice::Iter<Cell> {
        self.cells.iter()
    }

    /// The open passages as an undirected graph. Node `i` is the cell with row major index `i`
    /// and carries that cell's coordinate.
    pub fn passage_graph(&self) -> UnGraph<Cartesian2DCoordinate, ()> {
        let (NodesCount(nodes), EdgesCount(edges)) = self.graph_size();
        let mut graph = UnGraph::with_capacity(nodes, edges);
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (a, b) in self.iter_links() {
            if let (Some(a_index), Some(b_index)) = (self.grid_coordinate_to_index(a),
                                                     self.grid_coordinate_to_index(b)) {
                let _ = graph.add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), ());
            }
        }
        graph
    }
}
