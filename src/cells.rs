use smallvec::SmallVec;
use std::convert::From;

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;
pub type CoordinateOptionSmallVec = SmallVec<[Option<Cartesian2DCoordinate>; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

/// The four wall directions of a square cell. North is decreasing row
/// (screen up), South is increasing row.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// Index of this direction into a cell's wall flag array.
    pub(crate) fn wall_index(self) -> usize {
        match self {
            CompassPrimary::North => 0,
            CompassPrimary::South => 1,
            CompassPrimary::East => 2,
            CompassPrimary::West => 3,
        }
    }
}

/// Creates a new `Cartesian2DCoordinate` offset 1 cell away in the given direction.
/// Returns None if the coordinate is not representable (x or y underflow).
/// Checking the upper grid bounds is the grid's job.
pub fn offset_coordinate(coord: Cartesian2DCoordinate,
                         dir: CompassPrimary)
                         -> Option<Cartesian2DCoordinate> {
    let (x, y) = (coord.x, coord.y);
    match dir {
        CompassPrimary::North => {
            if y > 0 {
                Some(Cartesian2DCoordinate { x, y: y - 1 })
            } else {
                None
            }
        }
        CompassPrimary::South => Some(Cartesian2DCoordinate { x, y: y + 1 }),
        CompassPrimary::East => Some(Cartesian2DCoordinate { x: x + 1, y }),
        CompassPrimary::West => {
            if x > 0 {
                Some(Cartesian2DCoordinate { x: x - 1, y })
            } else {
                None
            }
        }
    }
}

/// One grid unit of the maze.
///
/// A wall flag is false only after the grid's carve routine has explicitly
/// removed it, always in tandem with the matching flag of the neighbouring
/// cell. `visited` is the generator's bookkeeping marker; after generation
/// completes every cell is visited and the cell data never changes again.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Cell {
    walls: [bool; 4],
    visited: bool,
}

impl Cell {
    pub(crate) fn new() -> Cell {
        Cell {
            walls: [true; 4],
            visited: false,
        }
    }

    pub fn has_wall(&self, dir: CompassPrimary) -> bool {
        self.walls[dir.wall_index()]
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Wall flags in `CompassPrimary::ALL` order, for the drawing shell.
    pub fn walls(&self) -> [bool; 4] {
        self.walls
    }

    // Only `Grid::carve` clears wall flags, so the two sides of an edge
    // cannot desynchronise.
    pub(crate) fn remove_wall(&mut self, dir: CompassPrimary) {
        self.walls[dir.wall_index()] = false;
    }

    pub(crate) fn mark_visited(&mut self) {
        self.visited = true;
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn new_cell_is_fully_walled_and_unvisited() {
        let c = Cell::new();
        for dir in CompassPrimary::ALL.iter() {
            assert!(c.has_wall(*dir));
        }
        assert!(!c.is_visited());
    }

    #[test]
    fn remove_wall_clears_only_that_flag() {
        let mut c = Cell::new();
        c.remove_wall(CompassPrimary::East);
        assert!(!c.has_wall(CompassPrimary::East));
        assert!(c.has_wall(CompassPrimary::North));
        assert!(c.has_wall(CompassPrimary::South));
        assert!(c.has_wall(CompassPrimary::West));
    }

    #[test]
    fn opposites() {
        assert_eq!(CompassPrimary::North.opposite(), CompassPrimary::South);
        assert_eq!(CompassPrimary::South.opposite(), CompassPrimary::North);
        assert_eq!(CompassPrimary::East.opposite(), CompassPrimary::West);
        assert_eq!(CompassPrimary::West.opposite(), CompassPrimary::East);
    }

    #[test]
    fn offsets_at_the_origin() {
        let gc = Cartesian2DCoordinate::new(0, 0);
        assert_eq!(offset_coordinate(gc, CompassPrimary::North), None);
        assert_eq!(offset_coordinate(gc, CompassPrimary::West), None);
        assert_eq!(offset_coordinate(gc, CompassPrimary::South),
                   Some(Cartesian2DCoordinate::new(0, 1)));
        assert_eq!(offset_coordinate(gc, CompassPrimary::East),
                   Some(Cartesian2DCoordinate::new(1, 0)));
    }
}
