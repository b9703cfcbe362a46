use docopt::Docopt;
use serde_derive::Deserialize;

use mazerace::{
    cells::Cartesian2DCoordinate,
    generators,
    goals::GoalTracker,
    grid::Grid,
    grid_displays::{PathDisplay, StartGoalDisplay},
    pathing,
    tokens::{ControlScheme, Token},
    units::{ColumnsCount, RowsCount, StepSize, TileSize, WallThickness},
};
use std::{
    fs::File,
    io::prelude::*,
    rc::Rc,
};

const USAGE: &str = "Maze Race

Usage:
    mazerace_driver -h | --help
    mazerace_driver [--grid-width=<w> --grid-height=<h>] [--seed=<n>] [--show-path | --mark-start-goal] [--text-out=<path>] [--race=<plans>]

Options:
    -h --help            Show this screen.
    --grid-width=<w>     The grid width in cells [default: 20].
    --grid-height=<h>    The grid height in cells [default: 20].
    --seed=<n>           Unsigned integer seed for a reproducible maze.
    --show-path          Overlay the passage path from the start cell to the goal cell.
    --mark-start-goal    Overlay S and G markers on the start and goal cells.
    --text-out=<path>    Write the maze text rendering to a file instead of stdout.
    --race=<plans>       Replay a scripted race: two '/' separated per frame move strings over u d l r and . for an idle frame, e.g. 'rrdd.d/ddrr..'.
";

#[derive(Debug, Deserialize)]
struct RaceArgs {
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_seed: Option<u64>,
    flag_show_path: bool,
    flag_mark_start_goal: bool,
    flag_text_out: String,
    flag_race: String,
}

// We'll put our errors in an `errors` module, and other parts of the driver
// will `use crate::errors::*;` to get access to everything `error_chain!`
// creates.
mod errors {
    // Create the Error, ErrorKind, ResultExt, and Result types.
    // Result is a typedef of std `Result` with the error type our own `Error`.
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

const WALL_THICKNESS: WallThickness = WallThickness(4.0);
const RACE_TILE: TileSize = TileSize(30.0);

fn main() -> Result<()> {

    env_logger::init();

    let args: RaceArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let mut maze_grid = Grid::new(ColumnsCount(args.flag_grid_width),
                                  RowsCount(args.flag_grid_height),
                                  WALL_THICKNESS)
        .chain_err(|| "the grid dimensions must be positive")?;

    let mut rng = match args.flag_seed {
        Some(seed) => generators::seeded_rng(seed),
        None => generators::entropy_rng(),
    };
    generators::recursive_backtracker(&mut maze_grid, &mut rng);

    let start = Cartesian2DCoordinate::new(0, 0);
    let mut tracker = GoalTracker::new(&maze_grid);

    if args.flag_show_path {
        let distances = pathing::Distances::<u32>::new(&maze_grid, start)
            .expect("the start cell is always a valid coordinate");
        let path = pathing::shortest_path(&maze_grid, &distances, tracker.goal())
            .ok_or("no passage path from start to goal - the maze is not perfect")?;
        maze_grid.set_grid_display(Some(Rc::new(PathDisplay::new(&path))));
    } else if args.flag_mark_start_goal {
        maze_grid.set_grid_display(Some(Rc::new(StartGoalDisplay::new(start, tracker.goal()))));
    }

    let rendering = format!("{}", maze_grid);
    if args.flag_text_out.is_empty() {
        println!("{}", rendering);
    } else {
        let mut file = File::create(&args.flag_text_out)?;
        file.write_all(rendering.as_bytes())?;
    }

    if !args.flag_race.is_empty() {
        run_scripted_race(&maze_grid, &mut tracker, &args.flag_race)?;
    }

    Ok(())
}

/// Replay two per frame move plans through real tokens, one tick per plan
/// character, and report how the race ended.
fn run_scripted_race(grid: &Grid, tracker: &mut GoalTracker, plans: &str) -> Result<()> {

    let mut split = plans.splitn(2, '/');
    let plan_one: Vec<char> = split.next().unwrap_or("").chars().collect();
    let plan_two: Vec<char> = split.next()
        .ok_or("--race needs two '/' separated move plans")?
        .chars()
        .collect();
    for &key in plan_one.iter().chain(plan_two.iter()) {
        if !"udlr.".contains(key) {
            return Err(format!("unknown move '{}' in race plan", key).into());
        }
    }

    let start = Cartesian2DCoordinate::new(0, 0);
    let step = StepSize(RACE_TILE.0);
    let controls = ControlScheme::new('u', 'd', 'l', 'r')
        .chain_err(|| "the driver key binding is malformed")?;
    let mut tokens = [Token::new(start, RACE_TILE, step, controls),
                      Token::new(start, RACE_TILE, step, controls)];

    let total_frames = plan_one.len().max(plan_two.len());
    let mut frames_run = 0;
    for frame in 0..total_frames {

        // Input settles for both tokens before either of them moves.
        for (token, plan) in tokens.iter_mut().zip([&plan_one, &plan_two].iter()) {
            token.clear_held();
            if let Some(&key) = plan.get(frame) {
                token.press(key);
            }
        }
        for token in tokens.iter_mut() {
            token.update(grid);
        }

        frames_run += 1;
        if tracker.check(grid, &mut tokens) {
            break;
        }
    }

    let goal = tracker.goal();
    match tracker.winner() {
        Some(index) => {
            println!("token {} reached the goal cell ({}, {}) after {} frames",
                     index + 1,
                     goal.x,
                     goal.y,
                     frames_run)
        }
        None => println!("no token reached the goal cell within {} frames", frames_run),
    }
    for (index, token) in tokens.iter().enumerate() {
        let cell = token.current_cell(grid)
            .chain_err(|| "token drifted outside the maze")?;
        println!("token {} finished in cell ({}, {})", index + 1, cell.x, cell.y);
    }

    Ok(())
}
