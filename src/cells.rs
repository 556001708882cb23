use smallvec::SmallVec;
use std::fmt;

pub type DirectionSmallVec = SmallVec<[Direction; 4]>;
pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    /// Creates a new coordinate offset 1 cell away in the given direction.
    /// Returns None if the coordinate is not representable (below zero).
    ///
    /// `Up` grows `y`, matching a screen whose origin is the bottom left corner.
    pub fn offset(&self, dir: Direction) -> Option<Cartesian2DCoordinate> {
        let (x, y) = (self.x, self.y);
        match dir {
            Direction::Up => y.checked_add(1).map(|up| Cartesian2DCoordinate::new(x, up)),
            Direction::Down => y.checked_sub(1).map(|down| Cartesian2DCoordinate::new(x, down)),
            Direction::Left => x.checked_sub(1).map(|left| Cartesian2DCoordinate::new(left, y)),
            Direction::Right => x.checked_add(1).map(|right| Cartesian2DCoordinate::new(right, y)),
        }
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for Cartesian2DCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

const DIRS_COUNT: usize = 4;
const DIRS: [Direction; DIRS_COUNT] = [Direction::Up,
                                       Direction::Down,
                                       Direction::Left,
                                       Direction::Right];

impl Direction {
    #[inline]
    pub fn all() -> [Direction; DIRS_COUNT] {
        DIRS
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The wall bit guarding the side of a cell facing this direction.
    pub fn wall(self) -> WallMask {
        match self {
            Direction::Up => WallMask::UP,
            Direction::Down => WallMask::DOWN,
            Direction::Left => WallMask::LEFT,
            Direction::Right => WallMask::RIGHT,
        }
    }

    /// Parse a single move letter: `U`, `D`, `L` or `R` (either case).
    pub fn from_move_char(c: char) -> Option<Direction> {
        match c.to_ascii_uppercase() {
            'U' => Some(Direction::Up),
            'D' => Some(Direction::Down),
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Which of the 4 sides of a cell are closed. A set bit is a wall.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct WallMask(u8);

impl WallMask {
    pub const NONE: WallMask = WallMask(0x00);
    pub const UP: WallMask = WallMask(0x01);
    pub const DOWN: WallMask = WallMask(0x02);
    pub const LEFT: WallMask = WallMask(0x04);
    pub const RIGHT: WallMask = WallMask(0x08);
    pub const ALL: WallMask = WallMask(0x0f);

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, other: WallMask) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn has_wall(self, dir: Direction) -> bool {
        self.contains(dir.wall())
    }

    /// Clear the given wall bits. Bits are never set back.
    #[inline]
    pub fn remove(&mut self, walls: WallMask) {
        self.0 &= !walls.0;
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl Default for WallMask {
    fn default() -> Self {
        WallMask::ALL
    }
}

impl std::ops::BitOr for WallMask {
    type Output = WallMask;

    fn bitor(self, rhs: WallMask) -> WallMask {
        WallMask((self.0 | rhs.0) & WallMask::ALL.0)
    }
}

/// Observational tag for renderers. The generator writes it, nothing reads it back.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CellStatus {
    Unvisited,
    Active,
    DeadEnd,
    Start,
    End,
}

impl Default for CellStatus {
    fn default() -> Self {
        CellStatus::Unvisited
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Cell {
    coord: Cartesian2DCoordinate,
    walls: WallMask,
    status: CellStatus,
}

impl Cell {
    /// A fully enclosed, unvisited cell.
    pub fn new(coord: Cartesian2DCoordinate) -> Cell {
        Cell {
            coord,
            walls: WallMask::ALL,
            status: CellStatus::Unvisited,
        }
    }

    #[inline]
    pub fn position(&self) -> Cartesian2DCoordinate {
        self.coord
    }

    #[inline]
    pub fn walls(&self) -> WallMask {
        self.walls
    }

    #[inline]
    pub fn status(&self) -> CellStatus {
        self.status
    }

    #[inline]
    pub fn is_open(&self, dir: Direction) -> bool {
        !self.walls.has_wall(dir)
    }

    #[inline]
    pub(crate) fn remove_walls(&mut self, walls: WallMask) {
        self.walls.remove(walls);
    }

    #[inline]
    pub(crate) fn set_status(&mut self, status: CellStatus) {
        self.status = status;
    }
}
