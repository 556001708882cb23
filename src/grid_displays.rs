use std::fmt;

use crate::cells::{Cartesian2DCoordinate, CellStatus, CoordinateSmallVec, Direction};
use crate::grid::Grid;
use crate::grid_traits::{GridDisplay, MazeView};
use crate::units::{Height, Width};
use crate::utils::{self, FnvHashSet};


#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Cartesian2DCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[Cartesian2DCoordinate]) -> Self {
        let mut on_path_coordinates = utils::fnv_hashset(path.len());
        on_path_coordinates.extend(path.iter().cloned());
        PathDisplay { on_path_coordinates }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}


#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_coordinates: CoordinateSmallVec,
    end_coordinates: CoordinateSmallVec,
}
impl StartEndPointsDisplay {
    pub fn new(starts: CoordinateSmallVec, ends: CoordinateSmallVec) -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_coordinates: starts,
            end_coordinates: ends,
        }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {

        let contains_coordinate =
            |coordinates: &CoordinateSmallVec| coordinates.iter().any(|&c| c == coord);

        if contains_coordinate(&self.start_coordinates) {
            String::from(" S ")

        } else if contains_coordinate(&self.end_coordinates) {

            String::from(" E ")

        } else {
            String::from("   ")
        }
    }
}


/// The player marker drawn over the entrance and exit markers.
#[derive(Debug)]
pub struct PlayerDisplay {
    player: Cartesian2DCoordinate,
    start_end: StartEndPointsDisplay,
}
impl PlayerDisplay {
    pub fn new(player: Cartesian2DCoordinate,
               start: Option<Cartesian2DCoordinate>,
               end: Option<Cartesian2DCoordinate>)
               -> PlayerDisplay {
        PlayerDisplay {
            player,
            start_end: StartEndPointsDisplay::new(start.into_iter().collect(),
                                                  end.into_iter().collect()),
        }
    }
}
impl GridDisplay for PlayerDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if coord == self.player {
            String::from(" @ ")
        } else {
            self.start_end.render_cell_body(coord)
        }
    }
}


/// Shows the generation progress: unvisited cells are shaded, the active path is starred.
pub struct StatusDisplay<'a> {
    view: &'a dyn MazeView,
}
impl<'a> StatusDisplay<'a> {
    pub fn new(view: &'a dyn MazeView) -> StatusDisplay<'a> {
        StatusDisplay { view }
    }
}
impl<'a> GridDisplay for StatusDisplay<'a> {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        match self.view.status_at(coord) {
            Some(CellStatus::Unvisited) => String::from("░░░"),
            Some(CellStatus::Active) => String::from(" * "),
            Some(CellStatus::Start) => String::from(" S "),
            Some(CellStatus::End) => String::from(" E "),
            Some(CellStatus::DeadEnd) | None => String::from("   "),
        }
    }
}


/// Box drawing text picture of any maze view, with optional cell bodies.
///
/// The highest row (`y = height - 1`) is printed first, so `Up` points up the screen.
pub struct MazeText<'a> {
    view: &'a dyn MazeView,
    cell_bodies: Option<&'a dyn GridDisplay>,
}

impl<'a> MazeText<'a> {
    pub fn new(view: &'a dyn MazeView) -> MazeText<'a> {
        MazeText {
            view,
            cell_bodies: None,
        }
    }

    pub fn with_cell_bodies(mut self, cell_bodies: &'a dyn GridDisplay) -> MazeText<'a> {
        self.cell_bodies = Some(cell_bodies);
        self
    }

    fn neighbour(&self, coord: Cartesian2DCoordinate, dir: Direction) -> Option<Cartesian2DCoordinate> {
        let (Width(w), Height(h)) = self.view.dimensions();
        coord.offset(dir).filter(|c| (c.x as usize) < w && (c.y as usize) < h)
    }

    fn is_open(&self, coord: Cartesian2DCoordinate, dir: Direction) -> bool {
        self.view.walls_at(coord).map_or(false, |walls| !walls.has_wall(dir))
    }

    fn is_neighbour_open(&self, coord: Cartesian2DCoordinate, step: Direction, dir: Direction) -> bool {
        self.neighbour(coord, step).map_or(false, |c| self.is_open(c, dir))
    }
}

impl<'a> fmt::Display for MazeText<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR_3: &str = "───";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";
        let default_cell_body = String::from("   ");

        let (Width(columns_count), Height(rows_count)) = self.view.dimensions();
        let row_coords = |y: usize| {
            (0..columns_count).map(move |x| Cartesian2DCoordinate::new(x as u32, y as u32))
        };

        // Start by special case rendering the text for the top most boundary
        let mut output = String::from(WALL_RD);
        for (index, coord) in row_coords(rows_count - 1).enumerate() {
            output.push_str(WALL_LR_3);
            if self.is_open(coord, Direction::Right) {
                output.push_str(WALL_LR);
            } else if index == columns_count - 1 {
                output.push_str(WALL_LD);
            } else {
                output.push_str(WALL_LRD);
            }
        }
        output.push('\n');

        for y in (0..rows_count).rev() {

            let is_last_row = y == 0;

            // The left most boundary of the row is a special case.
            // The top section of the cell is done by the previous row.
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::new();

            for (index_column, cell_coord) in row_coords(y).enumerate() {

                let is_first_column = index_column == 0;
                let is_last_column = index_column == (columns_count - 1);
                let right_open = self.is_open(cell_coord, Direction::Right);
                let down_open = self.is_open(cell_coord, Direction::Down);

                // Cell Body
                match self.cell_bodies {
                    Some(displayer) => {
                        row_middle_section_render.push_str(&displayer.render_cell_body(cell_coord))
                    }
                    None => row_middle_section_render.push_str(&default_cell_body),
                }
                row_middle_section_render.push_str(if right_open { " " } else { WALL_UD });

                if is_first_column {
                    row_bottom_section_render = if is_last_row {
                        String::from(WALL_RU)
                    } else if down_open {
                        String::from(WALL_UD)
                    } else {
                        String::from(WALL_RUD)
                    };
                }
                row_bottom_section_render.push_str(if down_open { "   " } else { WALL_LR_3 });

                let corner = match (is_last_row, is_last_column) {
                    (true, true) => WALL_LU,
                    (true, false) => if right_open { WALL_LR } else { WALL_LRU },
                    (false, true) => if down_open { WALL_UD } else { WALL_LUD },
                    (false, false) => {
                        let show_right_section =
                            !self.is_neighbour_open(cell_coord, Direction::Right, Direction::Down);
                        let show_down_section =
                            !self.is_neighbour_open(cell_coord, Direction::Down, Direction::Right);
                        let show_up_section = !right_open;
                        let show_left_section = !down_open;

                        match (show_left_section,
                               show_right_section,
                               show_up_section,
                               show_down_section) {
                            (true, true, true, true) => WALL_LRUD,
                            (true, true, true, false) => WALL_LRU,
                            (true, true, false, true) => WALL_LRD,
                            (true, false, true, true) => WALL_LUD,
                            (false, true, true, true) => WALL_RUD,
                            (true, true, false, false) => WALL_LR,
                            (false, false, true, true) => WALL_UD,
                            (false, true, true, false) => WALL_RU,
                            (true, false, false, true) => WALL_LD,
                            (true, false, true, false) => WALL_LU,
                            (false, true, false, true) => WALL_RD,
                            (true, false, false, false) => WALL_L,
                            (false, true, false, false) => WALL_R,
                            (false, false, true, false) => WALL_U,
                            (false, false, false, true) => WALL_D,
                            _ => " ",
                        }
                    }
                };

                row_bottom_section_render.push_str(corner);
            }

            output.push_str(&row_middle_section_render);
            output.push('\n');
            output.push_str(&row_bottom_section_render);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        MazeText::new(self).fmt(f)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Height, Width};

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn grid(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).expect("invalid grid dimensions")
    }

    #[test]
    fn single_cell() {
        let g = grid(1, 1);
        assert_eq!(format!("{}", g), "┌───┐\n│   │\n└───┘\n");
    }

    #[test]
    fn horizontal_passage() {
        let mut g = grid(2, 1);
        g.carve(gc(0, 0), Direction::Right).expect("carve failed");
        assert_eq!(format!("{}", g), "┌───────┐\n│       │\n└───────┘\n");
    }

    #[test]
    fn vertical_passage() {
        let mut g = grid(1, 2);
        g.carve(gc(0, 0), Direction::Up).expect("carve failed");
        assert_eq!(format!("{}", g), "┌───┐\n│   │\n│   │\n│   │\n└───┘\n");
    }

    #[test]
    fn closed_two_by_two() {
        let g = grid(2, 2);
        let expected = "┌───┬───┐\n\
                        │   │   │\n\
                        ├───┼───┤\n\
                        │   │   │\n\
                        └───┴───┘\n";
        assert_eq!(format!("{}", g), expected);
    }

    #[test]
    fn top_row_is_highest_y() {
        let g = grid(2, 2);
        let display = StartEndPointsDisplay::new(vec![gc(0, 1)].into_iter().collect(),
                                                 vec![gc(1, 0)].into_iter().collect());
        let text = format!("{}", MazeText::new(&g).with_cell_bodies(&display));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "│ S │   │");
        assert_eq!(lines[3], "│   │ E │");
    }

    #[test]
    fn player_hides_start_marker() {
        let display = PlayerDisplay::new(gc(0, 0), Some(gc(0, 0)), Some(gc(1, 1)));
        assert_eq!(display.render_cell_body(gc(0, 0)), " @ ");
        assert_eq!(display.render_cell_body(gc(1, 1)), " E ");
        assert_eq!(display.render_cell_body(gc(1, 0)), "   ");
    }

    #[test]
    fn path_cells() {
        let display = PathDisplay::new(&[gc(0, 0), gc(0, 1)]);
        assert_eq!(display.render_cell_body(gc(0, 1)), " . ");
        assert_eq!(display.render_cell_body(gc(1, 1)), "   ");
    }

    #[test]
    fn status_glyphs() {
        let mut g = grid(2, 1);
        g.set_status(gc(0, 0), CellStatus::Active);
        let display = StatusDisplay::new(&g);
        assert_eq!(display.render_cell_body(gc(0, 0)), " * ");
        assert_eq!(display.render_cell_body(gc(1, 0)), "░░░");
        assert_eq!(display.render_cell_body(gc(5, 5)), "   ");
    }
}
