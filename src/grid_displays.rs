use crate::cells::Cartesian2DCoordinate;
use crate::utils;
use crate::utils::FnvHashSet;

/// Renders the 3 character body of a cell in the grid's textual `Display`.
/// The consuming shell decides what overlay, if any, a maze is printed with.
pub trait GridDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String;
}

/// Marks the race start cell with `S` and the goal cell with `G`.
#[derive(Debug)]
pub struct StartGoalDisplay {
    start: Cartesian2DCoordinate,
    goal: Cartesian2DCoordinate,
}

impl StartGoalDisplay {
    pub fn new(start: Cartesian2DCoordinate, goal: Cartesian2DCoordinate) -> StartGoalDisplay {
        StartGoalDisplay { start, goal }
    }
}

impl GridDisplay for StartGoalDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if coord == self.start {
            String::from(" S ")
        } else if coord == self.goal {
            String::from(" G ")
        } else {
            String::from("   ")
        }
    }
}

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

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn start_goal_markers() {
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        let d = StartGoalDisplay::new(gc(0, 0), gc(3, 3));
        assert_eq!(d.render_cell_body(gc(0, 0)), " S ");
        assert_eq!(d.render_cell_body(gc(3, 3)), " G ");
        assert_eq!(d.render_cell_body(gc(1, 2)), "   ");
    }

    #[test]
    fn path_markers() {
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        let d = PathDisplay::new(&[gc(0, 0), gc(0, 1)]);
        assert_eq!(d.render_cell_body(gc(0, 1)), " . ");
        assert_eq!(d.render_cell_body(gc(1, 1)), "   ");
    }
}
