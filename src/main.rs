use docopt::Docopt;
use itertools::Itertools;
use log::info;
use rand::Rng;
use serde_derive::Deserialize;
use mazes::{
    cells::{Cartesian2DCoordinate, Direction},
    generators::MazeGenerator,
    grid::Grid,
    grid_displays::{MazeText, PathDisplay, PlayerDisplay, StatusDisplay},
    pathing,
    player::Player,
    units::{Height, Width},
};
use std::{
    io,
    io::prelude::*,
    fs::File,
    thread,
    time::Duration,
};

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--seed=<s>] [--steps-per-frame=<n>] [--frame-millis=<ms>] [--no-animate] [--moves=<letters>] [--show-path] [--text-out=<path>]

Options:
    -h --help                Show this screen.
    --grid-size=<n>          The grid size is n * n.
    --grid-width=<w>         The grid width in a w*h grid [default: 20].
    --grid-height=<h>        The grid height in a w*h grid [default: 15].
    --seed=<s>               Seed for the maze generator. A random seed is chosen and reported if not given.
    --steps-per-frame=<n>    Generator steps between two animation frames [default: 1].
    --frame-millis=<ms>      Delay between animation frames in milliseconds [default: 16].
    --no-animate             Generate the whole maze before showing anything.
    --moves=<letters>        Player moves replayed from the entrance once the maze is done, one of U, D, L or R per move.
    --show-path              Show the path from the entrance to the exit.
    --text-out=<path>        Also write the final maze picture to a text file.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_seed: Option<u64>,
    flag_steps_per_frame: usize,
    flag_frame_millis: u64,
    flag_no_animate: bool,
    flag_moves: String,
    flag_show_path: bool,
    flag_text_out: String,
}

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

fn main() -> Result<()> {

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };

    let mut maze_grid = Grid::new(Width(width), Height(height))
        .ok_or_else(|| format!("Invalid grid dimensions {}x{}", width, height))?;

    let seed = args.flag_seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("maze seed {}", seed);
    let mut generator = MazeGenerator::with_seed(&maze_grid, seed);

    // Validate the script before spending time on the animation
    let moves = parse_moves(&args.flag_moves)?;

    if args.flag_no_animate {
        let steps = generator.generate(&mut maze_grid);
        info!("generated in {} steps", steps);
    } else {
        animate_generation(&mut generator, &mut maze_grid, &args)?;
    }

    let entrance = generator.first_cell().ok_or("Maze generation left no entrance")?;
    let exit = generator.last_cell().ok_or("Maze generation left no exit")?;

    let mut player = Player::new(entrance);
    let mut blocked = 0;
    for dir in &moves {
        if !player.request_move(&maze_grid, *dir) {
            blocked += 1;
        }
    }
    if blocked > 0 {
        info!("{} of {} moves ran into a wall", blocked, moves.len());
    }

    let picture = if args.flag_show_path {
        let path = solution_path(&maze_grid, entrance, exit)?;
        info!("solution: {}", path.iter().join(" "));
        let path_display = PathDisplay::new(&path);
        MazeText::new(&maze_grid).with_cell_bodies(&path_display).to_string()
    } else {
        let player_display = PlayerDisplay::new(player.position(), Some(entrance), Some(exit));
        MazeText::new(&maze_grid).with_cell_bodies(&player_display).to_string()
    };

    println!("{}", picture);
    println!("seed {}, entrance {}, exit {}", seed, entrance, exit);
    if !moves.is_empty() {
        let outcome = if player.has_reached(exit) { "reached the exit" } else { "still inside" };
        println!("player at {} after {} moves: {}",
                 player.position(),
                 player.moves_made(),
                 outcome);
    }

    if !args.flag_text_out.is_empty() {
        write_text_to_file(&picture, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

/// One frame per `steps_per_frame` generator steps, like a host loop calling `step` once per tick.
fn animate_generation(generator: &mut MazeGenerator,
                      maze_grid: &mut Grid,
                      maze_args: &MazeArgs)
                      -> Result<()> {

    let steps_per_frame = maze_args.flag_steps_per_frame.max(1);
    let frame_delay = Duration::from_millis(maze_args.flag_frame_millis);
    let stdout = io::stdout();

    let mut done = false;
    while !done {
        for _ in 0..steps_per_frame {
            done = generator.step(maze_grid);
            if done {
                break;
            }
        }

        let status_display = StatusDisplay::new(&*maze_grid);
        let frame = MazeText::new(&*maze_grid).with_cell_bodies(&status_display);
        let mut out = stdout.lock();
        write!(out, "{}{}", CLEAR_SCREEN, frame)?;
        writeln!(out, "visited {}/{}", generator.visited_count(), maze_grid.size())?;
        out.flush()?;

        if !done {
            thread::sleep(frame_delay);
        }
    }
    Ok(())
}

fn parse_moves(script: &str) -> Result<Vec<Direction>> {
    script.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            Direction::from_move_char(c)
                .ok_or_else(|| Error::from(format!("Invalid move '{}', expected U, D, L or R", c)))
        })
        .collect()
}

fn solution_path(maze_grid: &Grid,
                 entrance: Cartesian2DCoordinate,
                 exit: Cartesian2DCoordinate)
                 -> Result<Vec<Cartesian2DCoordinate>> {
    let distances = pathing::Distances::new(maze_grid, entrance)
        .ok_or("Entrance is outside the grid")?;
    let path = pathing::shortest_path(maze_grid, &distances, exit)
        .ok_or("No route from the entrance to the exit")?;
    Ok(path)
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
