use std::error::Error;
use std::fmt;

use log::trace;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid::{Grid, GridError};
use crate::units::{StepSize, TileSize};

/// One frame's snapshot of a player's held movement keys, produced by the
/// external input layer. Passing a settled snapshot into the token removes
/// any ordering ambiguity between key down/up handling and movement
/// evaluation within a frame.
#[derive(Default, Eq, PartialEq, Copy, Clone, Debug)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputSnapshot {
    pub fn direction_held(&self, dir: CompassPrimary) -> bool {
        match dir {
            CompassPrimary::North => self.up,
            CompassPrimary::South => self.down,
            CompassPrimary::East => self.right,
            CompassPrimary::West => self.left,
        }
    }

    pub fn any_held(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    fn set_direction(&mut self, dir: CompassPrimary, held: bool) {
        match dir {
            CompassPrimary::North => self.up = held,
            CompassPrimary::South => self.down = held,
            CompassPrimary::East => self.right = held,
            CompassPrimary::West => self.left = held,
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum ControlError {
    /// The same key bound to more than one direction.
    DuplicateKey,
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ControlError::DuplicateKey => {
                write!(f, "a key is bound to more than one direction")
            }
        }
    }
}

impl Error for ControlError {}

/// Explicit `{up, down, left, right}` key binding for one player, validated
/// once at construction and immutable afterwards.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ControlScheme<K: Copy + Eq> {
    up: K,
    down: K,
    left: K,
    right: K,
}

impl<K: Copy + Eq> ControlScheme<K> {
    pub fn new(up: K, down: K, left: K, right: K) -> Result<ControlScheme<K>, ControlError> {
        let keys = [up, down, left, right];
        for (i, key) in keys.iter().enumerate() {
            if keys[i + 1..].contains(key) {
                return Err(ControlError::DuplicateKey);
            }
        }

        Ok(ControlScheme {
            up,
            down,
            left,
            right,
        })
    }

    pub fn direction_for(&self, key: K) -> Option<CompassPrimary> {
        if key == self.up {
            Some(CompassPrimary::North)
        } else if key == self.down {
            Some(CompassPrimary::South)
        } else if key == self.left {
            Some(CompassPrimary::West)
        } else if key == self.right {
            Some(CompassPrimary::East)
        } else {
            None
        }
    }
}

/// A player controlled token moving through the carved passages of a maze.
///
/// Position is continuous, in the same pixel space as the grid, with the
/// containing cell always derived from the position (never stored). Movement
/// is constrained by the wall flags of the current cell only: the boundary
/// walls of the outermost cells are never carved, so staying wall-legal also
/// keeps the derived cell inside the grid without a separate bounds check.
///
/// Two independent tokens race per match. They share no mutable state and may
/// legally occupy the same cell.
pub struct Token<K: Copy + Eq> {
    x: f32,
    y: f32,
    tile: TileSize,
    step: StepSize,
    held: InputSnapshot,
    allowed: [bool; 4],
    controls: ControlScheme<K>,
}

impl<K: Copy + Eq> Token<K> {
    /// Spawn a token at the centre of `start` with nothing held.
    ///
    /// Panics if the step size is not positive or exceeds the tile size - a
    /// step longer than a tile could jump a cell (and its walls) in a single
    /// frame.
    pub fn new(start: Cartesian2DCoordinate,
               tile: TileSize,
               step: StepSize,
               controls: ControlScheme<K>)
               -> Token<K> {
        assert!(step.0 > 0.0 && step.0 <= tile.0,
                "token step must be positive and no larger than one tile");

        let x = (start.x as f32 + 0.5) * tile.0;
        let y = (start.y as f32 + 0.5) * tile.0;
        trace!("token spawned at ({}, {}) in cell ({}, {})", x, y, start.x, start.y);

        Token {
            x,
            y,
            tile,
            step,
            held: InputSnapshot::default(),
            allowed: [false; 4],
            controls,
        }
    }

    #[inline]
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    #[inline]
    pub fn held(&self) -> InputSnapshot {
        self.held
    }

    #[inline]
    pub fn controls(&self) -> &ControlScheme<K> {
        &self.controls
    }

    /// Replace the held direction flags with a settled per-frame snapshot.
    pub fn set_input(&mut self, snapshot: InputSnapshot) {
        self.held = snapshot;
    }

    pub fn clear_held(&mut self) {
        self.held = InputSnapshot::default();
    }

    /// Key-down routed through the bound control scheme. Unbound keys are
    /// ignored.
    pub fn press(&mut self, key: K) {
        if let Some(dir) = self.controls.direction_for(key) {
            self.held.set_direction(dir, true);
        }
    }

    /// Key-up routed through the bound control scheme.
    pub fn release(&mut self, key: K) {
        if let Some(dir) = self.controls.direction_for(key) {
            self.held.set_direction(dir, false);
        }
    }

    /// The grid cell containing the token, derived from its position.
    /// `OutOfBoundsCell` here means the movement invariant was broken.
    pub fn current_cell(&self, grid: &Grid) -> Result<Cartesian2DCoordinate, GridError> {
        grid.cell_at_position(self.x, self.y, self.tile)
    }

    /// Recompute which directions are permitted from the wall flags of the
    /// current cell. Idempotent: repeated calls with unchanged held flags and
    /// position change nothing.
    pub fn check_move(&mut self, grid: &Grid) {
        let cell = self.current_cell(grid)
            .expect("token position escaped the grid: boundary walls must never be carved");
        for &dir in CompassPrimary::ALL.iter() {
            self.allowed[dir.wall_index()] = grid.is_open(cell, dir);
        }
    }

    /// Advance one frame tick: move by the step size along every held and
    /// permitted axis independently. Diagonal movement is the composition of
    /// two permitted axis moves - a blocked axis never gates an open one.
    /// Moves into a wall are silently refused, leaving that axis unchanged.
    ///
    /// One call per frame; pacing is the external fixed-tick driver's job.
    pub fn update(&mut self, grid: &Grid) {
        self.check_move(grid);

        let StepSize(step) = self.step;
        for &dir in CompassPrimary::ALL.iter() {
            if self.held.direction_held(dir) && self.allowed[dir.wall_index()] {
                match dir {
                    CompassPrimary::North => self.y -= step,
                    CompassPrimary::South => self.y += step,
                    CompassPrimary::East => self.x += step,
                    CompassPrimary::West => self.x -= step,
                }
            }
        }
    }
}
