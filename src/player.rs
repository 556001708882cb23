use log::trace;

use crate::cells::{Cartesian2DCoordinate, Direction};
use crate::grid::Grid;

/// A walker that may only pass through open walls.
///
/// Each `request_move` is one discrete step. Suppressing key repeat is the caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    position: Cartesian2DCoordinate,
    moves_made: usize,
}

impl Player {
    pub fn new(start: Cartesian2DCoordinate) -> Player {
        Player {
            position: start,
            moves_made: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> Cartesian2DCoordinate {
        self.position
    }

    /// Number of requests that actually moved the player.
    #[inline]
    pub fn moves_made(&self) -> usize {
        self.moves_made
    }

    /// Move one cell in `direction` if the current cell has no wall on that side.
    /// Returns whether the player moved.
    ///
    /// Outer walls are never carved so an open side always has a cell behind it.
    pub fn request_move(&mut self, grid: &Grid, direction: Direction) -> bool {
        if !grid.is_open(self.position, direction) {
            trace!("{:?} blocked at {}", direction, self.position);
            return false;
        }
        match self.position.offset(direction) {
            Some(next) => {
                self.position = next;
                self.moves_made += 1;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn has_reached(&self, target: Cartesian2DCoordinate) -> bool {
        self.position == target
    }
}
