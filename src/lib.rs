//! **mazes** generates perfect mazes one step at a time with a randomized depth first search, so a
//! host can animate the carving, and lets a player walk the finished maze.

pub mod cells;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_traits;
pub mod pathing;
pub mod player;
pub mod units;
pub mod utils;
