//! **mazerace** is the core of a two player local maze race: perfect maze
//! generation, the grid/cell data model, wall collision for the player tokens
//! and goal detection. Rendering, input event dispatch and the match timer
//! belong to an external shell that drives one fixed tick per frame.

pub mod cells;
pub mod generators;
pub mod goals;
pub mod grid;
pub mod grid_displays;
pub mod pathing;
pub mod tokens;
pub mod units;
mod utils;
