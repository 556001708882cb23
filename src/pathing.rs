// Distances are a breadth first flood fill from one start cell through open walls. Every passage
// is one step long, so the first time the fill reaches a cell is also its shortest distance and
// the distances map doubles as the visited set.
//
// A Distances is computed from a grid snapshot and holds no reference to it. Carving more passages
// afterwards silently invalidates it, which is fine for a maze that is finished before pathing.

use petgraph::algo::{connected_components, is_cyclic_undirected};
use smallvec::SmallVec;

use crate::cells::Cartesian2DCoordinate;
use crate::grid::Grid;
use crate::grid_traits::GridDisplay;
use crate::utils::{self, FnvHashMap};


#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// Returns None if the start coordinate is outside the grid.
    pub fn new(grid: &Grid, start_coordinate: Cartesian2DCoordinate) -> Option<Distances> {

        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(grid.size());
        distances.insert(start_coordinate, 0);

        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                let links = grid.links(*cell_coord)
                    .expect("frontier cell has an invalid coordinate");
                for link_coordinate in links {
                    if !distances.contains_key(&link_coordinate) {
                        distances.insert(link_coordinate, distance_to_cell + 1);
                        new_frontier.push(link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// None for cells the start cannot reach.
    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    /// Reachable cells at the maximum distance, in row major order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let mut furthest = self.distances
            .iter()
            .filter(|&(_, distance)| *distance == self.max_distance)
            .map(|(coord, _)| *coord)
            .collect::<SmallVec<[Cartesian2DCoordinate; 8]>>();
        furthest.sort_by_key(|c| (c.y, c.x));
        furthest
    }
}

impl GridDisplay for Distances {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if let Some(d) = self.distances.get(&coord) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from("   ")
        }
    }
}

/// Walk back from `end_point` to the start of `distances_from_start`, always stepping to a linked
/// neighbour one closer to the start. The path is returned start first.
///
/// Returns None if the end point is unreachable from the start.
pub fn shortest_path(grid: &Grid,
                     distances_from_start: &Distances,
                     end_point: Cartesian2DCoordinate)
                     -> Option<Vec<Cartesian2DCoordinate>> {

    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;
    let mut path = vec![end_point];
    let mut current_coord = end_point;

    while current_distance > 0 {
        let closer = grid.links(current_coord)?
            .into_iter()
            .find(|link| {
                distances_from_start.distance_from_start_to(*link) == Some(current_distance - 1)
            })?;

        current_coord = closer;
        current_distance -= 1;
        path.push(current_coord);
    }

    path.reverse();
    Some(path)
}

/// Works only as long as we are looking at a perfect maze, otherwise you get back some arbitrary
/// path.
pub fn longest_path(grid: &Grid) -> Option<Vec<Cartesian2DCoordinate>> {
    let arbitrary_start_point = Cartesian2DCoordinate::new(0, 0);
    let first_distances = Distances::new(grid, arbitrary_start_point)?;

    // The start of the longest path is just the point furthest away from an arbitrary initial point
    let long_path_start_coordinate = *first_distances.furthest_points_on_grid().first()?;

    let distances_from_start = Distances::new(grid, long_path_start_coordinate)?;
    let end_point = *distances_from_start.furthest_points_on_grid().first()?;

    shortest_path(grid, &distances_from_start, end_point)
}

/// A perfect maze has exactly one route between any two cells: its passages form a spanning tree.
pub fn is_perfect_maze(grid: &Grid) -> bool {
    let graph = grid.passage_graph();
    graph.edge_count() + 1 == grid.size() && connected_components(&graph) == 1 &&
    !is_cyclic_undirected(&graph)
}
