use bit_set::BitSet;
use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::cells::{Cartesian2DCoordinate, CellStatus, Direction, DirectionSmallVec};
use crate::grid::Grid;

/// What the next call to `MazeGenerator::step` will do.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GeneratorState {
    Seeding,
    Carving,
    Done,
}

/// Recursive backtracker (randomised depth first search) maze generation, one unit of work per
/// `step` so that a host can draw the maze between steps.
///
/// The generator only keeps coordinates into the grid it was created for; the grid itself is
/// borrowed for the duration of each step. Every call either seeds a start cell, carves one
/// passage to an unvisited neighbour, or backtracks one cell. Once every cell is visited and the
/// path is unwound the generator is finished and further steps do nothing.
#[derive(Debug, Clone)]
pub struct MazeGenerator {
    width: usize,
    height: usize,
    visited: BitSet,
    visited_count: usize,
    stack: Vec<Cartesian2DCoordinate>,
    first_cell: Option<Cartesian2DCoordinate>,
    last_cell: Option<Cartesian2DCoordinate>,
    finished: bool,
    rng: XorShiftRng,
}

impl MazeGenerator {
    /// Two generators with the same seed carve identical mazes on grids of the same size.
    pub fn with_seed(grid: &Grid, seed: u64) -> MazeGenerator {
        MazeGenerator::with_rng(grid, XorShiftRng::seed_from_u64(seed))
    }

    pub fn with_rng(grid: &Grid, rng: XorShiftRng) -> MazeGenerator {
        let cells_count = grid.size();
        MazeGenerator {
            width: grid.width(),
            height: grid.height(),
            visited: BitSet::with_capacity(cells_count),
            visited_count: 0,
            stack: Vec::with_capacity(cells_count),
            first_cell: None,
            last_cell: None,
            finished: false,
            rng,
        }
    }

    /// Perform one unit of generation work. Returns true once the maze is complete.
    ///
    /// Panics if `grid` is not the size of the grid the generator was created for.
    pub fn step(&mut self, grid: &mut Grid) -> bool {
        assert_eq!((grid.width(), grid.height()),
                   (self.width, self.height),
                   "maze generator stepped with a grid of a different size");

        if self.finished {
            return true;
        }
        if self.visited_count == self.cells_count() && self.stack.is_empty() {
            self.finished = true;
            debug!("maze generation finished: {} cells, {} passages",
                   self.visited_count,
                   grid.links_count());
            return true;
        }

        match self.stack.last().cloned() {
            None => self.seed(grid),
            Some(current) => self.carve_or_backtrack(grid, current),
        }
        self.capture_last_cell(grid);

        false
    }

    /// Step until the maze is complete. Returns how many steps were taken, including the final one
    /// that reported completion.
    pub fn generate(&mut self, grid: &mut Grid) -> usize {
        let mut steps = 1;
        while !self.step(grid) {
            steps += 1;
        }
        steps
    }

    pub fn state(&self) -> GeneratorState {
        if self.finished || (self.visited_count == self.cells_count() && self.stack.is_empty()) {
            GeneratorState::Done
        } else if self.stack.is_empty() {
            GeneratorState::Seeding
        } else {
            GeneratorState::Carving
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The maze entrance: the very first seeded cell.
    #[inline]
    pub fn first_cell(&self) -> Option<Cartesian2DCoordinate> {
        self.first_cell
    }

    /// The maze exit: the top of the path at the moment every cell became visited.
    ///
    /// This is the most recently carved cell, not necessarily the cell furthest from the entrance.
    #[inline]
    pub fn last_cell(&self) -> Option<Cartesian2DCoordinate> {
        self.last_cell
    }

    #[inline]
    pub fn visited_count(&self) -> usize {
        self.visited_count
    }

    pub fn is_visited(&self, coord: Cartesian2DCoordinate) -> bool {
        self.cell_index(coord).map_or(false, |index| self.visited.contains(index))
    }

    /// The active path, entrance end first.
    #[inline]
    pub fn stack(&self) -> &[Cartesian2DCoordinate] {
        &self.stack
    }

    #[inline]
    fn cells_count(&self) -> usize {
        self.width * self.height
    }

    fn cell_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    fn mark_visited(&mut self, coord: Cartesian2DCoordinate) {
        let index = self.cell_index(coord).expect("visited coordinate is outside the grid");
        let newly_visited = self.visited.insert(index);
        assert!(newly_visited, "cell {} visited twice", coord);
        self.visited_count += 1;
    }

    /// Start a new path at a random unvisited cell.
    fn seed(&mut self, grid: &mut Grid) {
        // Rejection sampling only terminates while an unvisited cell remains.
        assert!(self.visited_count < self.cells_count(),
                "seeding a maze whose cells are all visited");

        let coord = loop {
            let candidate = grid.random_cell(&mut self.rng);
            if !self.is_visited(candidate) {
                break candidate;
            }
        };

        self.mark_visited(coord);
        self.stack.push(coord);

        if self.first_cell.is_none() {
            assign_once(&mut self.first_cell, coord, "first cell");
            grid.set_status(coord, CellStatus::Start);
            debug!("maze entrance seeded at {}", coord);
        } else {
            grid.set_status(coord, CellStatus::Active);
            debug!("disconnected region seeded at {}", coord);
        }
    }

    /// Carve into a random unvisited neighbour of `current`, or pop `current` off the path if it
    /// has none. Directions are drawn uniformly without replacement.
    fn carve_or_backtrack(&mut self, grid: &mut Grid, current: Cartesian2DCoordinate) {
        let mut unchecked: DirectionSmallVec = Direction::all().iter().cloned().collect();

        while !unchecked.is_empty() {
            let draw = self.rng.gen_range(0..unchecked.len());
            let dir = unchecked.swap_remove(draw);

            let neighbour = match grid.neighbour_at_direction(current, dir) {
                Some(n) if !self.is_visited(n) => n,
                _ => continue,
            };

            let carved = grid.carve(current, dir);
            assert_eq!(carved, Ok(neighbour), "carving toward an in-bounds neighbour failed");

            self.mark_visited(neighbour);
            self.stack.push(neighbour);
            grid.set_status(neighbour, CellStatus::Active);
            trace!("carved {:?} from {} to {}", dir, current, neighbour);
            return;
        }

        // Dead end: no wall changes on a backtrack.
        self.stack.pop();
        if Some(current) != self.first_cell && Some(current) != self.last_cell {
            grid.set_status(current, CellStatus::DeadEnd);
        }
        trace!("backtracked from {}", current);
    }

    fn capture_last_cell(&mut self, grid: &mut Grid) {
        if self.last_cell.is_some() || self.visited_count != self.cells_count() {
            return;
        }
        if let Some(top) = self.stack.last().cloned() {
            assign_once(&mut self.last_cell, top, "last cell");
            grid.set_status(top, CellStatus::End);
            debug!("maze exit captured at {}", top);
        }
    }
}

fn assign_once(slot: &mut Option<Cartesian2DCoordinate>, coord: Cartesian2DCoordinate, name: &str) {
    assert!(slot.is_none(), "{} reassigned to {}", name, coord);
    *slot = Some(coord);
}


#[cfg(test)]
mod tests {

    use petgraph::algo::{connected_components, is_cyclic_undirected};
    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::cells::WallMask;
    use crate::units::{Height, Width};

    fn grid(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).expect("invalid grid dimensions")
    }

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn generated(w: usize, h: usize, seed: u64) -> (Grid, MazeGenerator) {
        let mut g = grid(w, h);
        let mut generator = MazeGenerator::with_seed(&g, seed);
        generator.generate(&mut g);
        (g, generator)
    }

    fn all_walls_reciprocal(g: &Grid) -> bool {
        g.iter().all(|coord| {
            Direction::all().iter().all(|dir| match g.neighbour_at_direction(coord, *dir) {
                Some(neighbour) => g.is_open(coord, *dir) == g.is_open(neighbour, dir.opposite()),
                None => !g.is_open(coord, *dir),
            })
        })
    }

    fn is_spanning_tree(g: &Grid) -> bool {
        let graph = g.passage_graph();
        graph.edge_count() == g.size() - 1 && connected_components(&graph) == 1 &&
        !is_cyclic_undirected(&graph)
    }

    #[test]
    fn fresh_generator() {
        let g = grid(4, 3);
        let generator = MazeGenerator::with_seed(&g, 1);
        assert_eq!(generator.state(), GeneratorState::Seeding);
        assert_eq!(generator.first_cell(), None);
        assert_eq!(generator.last_cell(), None);
        assert_eq!(generator.visited_count(), 0);
        assert!(generator.stack().is_empty());
        assert!(!generator.is_finished());
    }

    #[test]
    fn first_step_seeds_the_entrance() {
        let mut g = grid(4, 3);
        let mut generator = MazeGenerator::with_seed(&g, 1);
        assert!(!generator.step(&mut g));

        let first = generator.first_cell().expect("no entrance after seeding");
        assert!(g.is_valid_coordinate(first));
        assert!(generator.is_visited(first));
        assert_eq!(generator.visited_count(), 1);
        assert_eq!(generator.stack(), &[first]);
        assert_eq!(generator.state(), GeneratorState::Carving);
        assert_eq!(g.cell_at(first).map(|c| c.status()), Some(CellStatus::Start));
        // seeding never opens a wall
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn each_carving_step_opens_one_passage() {
        let mut g = grid(5, 5);
        let mut generator = MazeGenerator::with_seed(&g, 9);
        generator.step(&mut g);

        while !generator.step(&mut g) {
            let links = g.links_count();
            let visited = generator.visited_count();
            let depth = generator.stack().len();
            assert_eq!(links, visited - 1);
            assert!(depth <= visited);
        }
    }

    #[test]
    fn full_coverage() {
        for &(w, h) in &[(1, 1), (1, 7), (7, 1), (20, 15), (13, 4)] {
            let (g, generator) = generated(w, h, 12345);
            assert_eq!(generator.visited_count(), w * h);
            assert!(g.iter().all(|coord| generator.is_visited(coord)));
            assert!(g.iter_cells().all(|cell| cell.status() != CellStatus::Unvisited));
            assert_eq!(generator.state(), GeneratorState::Done);
        }
    }

    #[test]
    fn carved_maze_is_a_spanning_tree() {
        for seed in 0..20 {
            let (g, _) = generated(20, 15, seed);
            assert!(all_walls_reciprocal(&g));
            assert!(is_spanning_tree(&g));
        }
    }

    #[test]
    fn boundary_walls_stay_intact() {
        let (g, _) = generated(6, 4, 3);
        for cell in g.iter_cells() {
            let coord = cell.position();
            if coord.y == 0 {
                assert!(cell.walls().contains(WallMask::DOWN));
            }
            if coord.y == 3 {
                assert!(cell.walls().contains(WallMask::UP));
            }
            if coord.x == 0 {
                assert!(cell.walls().contains(WallMask::LEFT));
            }
            if coord.x == 5 {
                assert!(cell.walls().contains(WallMask::RIGHT));
            }
        }
    }

    #[test]
    fn completion_is_idempotent() {
        let (mut g, mut generator) = generated(8, 8, 77);
        assert!(generator.is_finished());

        let grid_before = g.clone();
        let first = generator.first_cell();
        let last = generator.last_cell();
        for _ in 0..10 {
            assert!(generator.step(&mut g));
        }
        assert_eq!(g, grid_before);
        assert_eq!(generator.visited_count(), 64);
        assert_eq!(generator.first_cell(), first);
        assert_eq!(generator.last_cell(), last);
    }

    #[test]
    fn every_cell_is_pushed_and_popped_once() {
        // 1 seed, n - 1 carves, n pops and the final completion step
        for &(w, h) in &[(1, 1), (1, 2), (5, 3), (20, 15)] {
            let mut g = grid(w, h);
            let mut generator = MazeGenerator::with_seed(&g, 5);
            assert_eq!(generator.generate(&mut g), 2 * w * h + 1);
        }
    }

    #[test]
    fn exit_is_the_top_of_the_path_when_the_last_cell_is_visited() {
        let mut g = grid(10, 10);
        let mut generator = MazeGenerator::with_seed(&g, 31);
        loop {
            let was_complete = generator.visited_count() == 100;
            generator.step(&mut g);
            if !was_complete && generator.visited_count() == 100 {
                assert_eq!(generator.last_cell(), generator.stack().last().cloned());
                break;
            }
            assert_eq!(generator.last_cell(), None);
        }
        let exit = generator.last_cell();
        generator.generate(&mut g);
        assert_eq!(generator.last_cell(), exit);
        assert_eq!(g.cell_at(exit.unwrap()).map(|c| c.status()), Some(CellStatus::End));
        assert_eq!(g.cell_at(generator.first_cell().unwrap()).map(|c| c.status()),
                   Some(CellStatus::Start));
    }

    #[test]
    fn single_cell_maze() {
        let (g, generator) = generated(1, 1, 0);
        assert_eq!(generator.first_cell(), Some(gc(0, 0)));
        assert_eq!(generator.last_cell(), Some(gc(0, 0)));
        assert_eq!(g.cell_at(gc(0, 0)).map(|c| c.walls()), Some(WallMask::ALL));
    }

    #[test]
    fn two_cell_maze_is_open_between_them() {
        let (g, generator) = generated(1, 2, 2024);
        assert!(g.is_open(gc(0, 0), Direction::Up));
        assert!(g.is_open(gc(0, 1), Direction::Down));
        assert_eq!(g.links_count(), 1);
        assert!(generator.first_cell() != generator.last_cell());
    }

    #[test]
    fn same_seed_same_maze() {
        let (a, gen_a) = generated(20, 15, 99);
        let (b, gen_b) = generated(20, 15, 99);
        assert_eq!(a, b);
        assert_eq!(gen_a.first_cell(), gen_b.first_cell());
        assert_eq!(gen_a.last_cell(), gen_b.last_cell());
    }

    #[test]
    #[should_panic(expected = "different size")]
    fn stepping_a_different_grid_panics() {
        let g = grid(4, 4);
        let mut other = grid(5, 4);
        let mut generator = MazeGenerator::with_seed(&g, 1);
        generator.step(&mut other);
    }

    #[test]
    #[should_panic(expected = "all visited")]
    fn seeding_a_fully_visited_grid_panics() {
        let mut g = grid(1, 1);
        let mut generator = MazeGenerator::with_seed(&g, 1);
        generator.step(&mut g);
        generator.seed(&mut g);
    }

    #[test]
    fn emptied_path_seeds_a_new_region() {
        let (w, h) = (4, 4);
        let mut g = grid(w, h);
        let mut generator = MazeGenerator::with_seed(&g, 21);
        for _ in 0..4 {
            assert!(!generator.step(&mut g));
        }
        let entrance = generator.first_cell();
        let visited_before = generator.visited_count();

        // Abandon the current path as if the rest of the grid were unreachable from it
        generator.stack.clear();
        assert_eq!(generator.state(), GeneratorState::Seeding);

        assert!(!generator.step(&mut g));
        assert_eq!(generator.first_cell(), entrance);
        assert_eq!(generator.visited_count(), visited_before + 1);
        assert_eq!(generator.stack().len(), 1);
        let seeded = generator.stack()[0];
        assert_eq!(g.cell_at(seeded).map(|c| c.status()), Some(CellStatus::Active));
        assert_eq!(g.links(seeded).map(|links| links.len()), Some(0));

        generator.generate(&mut g);
        assert_eq!(generator.visited_count(), w * h);
        assert!(generator.is_finished());
        assert_eq!(generator.first_cell(), entrance);
        assert!(g.iter_cells().all(|cell| cell.status() != CellStatus::Unvisited));
    }

    #[test]
    #[should_panic(expected = "reassigned")]
    fn entrance_is_assigned_once() {
        let mut slot = Some(gc(0, 0));
        assign_once(&mut slot, gc(1, 0), "first cell");
    }

    #[test]
    fn quickcheck_generated_mazes_are_perfect() {
        fn prop(w: u8, h: u8, seed: u64) -> TestResult {
            let (w, h) = ((w % 12) as usize + 1, (h % 12) as usize + 1);
            let (g, generator) = generated(w, h, seed);
            TestResult::from_bool(generator.visited_count() == w * h &&
                                  all_walls_reciprocal(&g) &&
                                  is_spanning_tree(&g) &&
                                  generator.first_cell().is_some() &&
                                  generator.last_cell().is_some())
        }
        quickcheck(prop as fn(u8, u8, u64) -> TestResult);
    }

    #[test]
    fn quickcheck_replay_is_deterministic() {
        fn prop(w: u8, h: u8, seed: u64) -> bool {
            let (w, h) = ((w % 10) as usize + 1, (h % 10) as usize + 1);
            let (a, _) = generated(w, h, seed);
            let (b, _) = generated(w, h, seed);
            a.iter_cells().map(|c| c.walls()).eq(b.iter_cells().map(|c| c.walls()))
        }
        quickcheck(prop as fn(u8, u8, u64) -> bool);
    }
}
