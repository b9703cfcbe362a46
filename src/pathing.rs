use std::fmt::Debug;

use bit_set::BitSet;
use num_traits::{One, Unsigned, Zero};
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, CoordinateSmallVec};
use crate::grid::Grid;
use crate::units::ColumnsCount;
use crate::utils;
use crate::utils::FnvHashMap;

// Trait (hack) used purely as a generic type parameter alias because it looks
// ugly to type this out each time. Note generic parameter type aliases are not
// in the language, `type X = Y;` only works with concrete types.
pub trait MaxDistance: Zero + One + Unsigned + Debug + Clone + Copy + Ord {}
impl<T: Zero + One + Unsigned + Debug + Clone + Copy + Ord> MaxDistance for T {}

/// Breadth first flood fill of step counts from a start cell across the
/// carved passages of a grid.
///
/// Every passage costs one step, so the first time the expanding frontier
/// touches a cell it already holds the shortest distance and the cell never
/// needs revisiting - the reached bit set doubles as the visited marker.
#[derive(Debug, Clone)]
pub struct Distances<MaxDistanceT = u32> {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, MaxDistanceT>,
    max_distance: MaxDistanceT,
    reached: BitSet,
}

impl<MaxDistanceT> Distances<MaxDistanceT>
    where MaxDistanceT: MaxDistance
{
    pub fn new(grid: &Grid, start_coordinate: Cartesian2DCoordinate)
               -> Option<Distances<MaxDistanceT>> {

        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let ColumnsCount(columns) = grid.columns();
        let bit_index =
            |coord: &Cartesian2DCoordinate| coord.y as usize * columns + coord.x as usize;

        let cells_count = grid.size();
        let mut distances = utils::fnv_hashmap(cells_count);
        let mut reached = BitSet::with_capacity(cells_count);
        let mut max: MaxDistanceT = Zero::zero();

        distances.insert(start_coordinate, Zero::zero());
        reached.insert(bit_index(&start_coordinate));

        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell: MaxDistanceT = *distances.get(cell_coord)
                    .expect("frontier cells always have a recorded distance");
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                let links: CoordinateSmallVec = grid.links(*cell_coord)
                    .expect("frontier cells are always valid grid coordinates");
                for link_coordinate in &*links {

                    if reached.insert(bit_index(link_coordinate)) {
                        distances.insert(*link_coordinate, distance_to_cell + One::one());
                        new_frontier.push(*link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
            reached,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<MaxDistanceT> {
        self.distances.get(&coord).cloned()
    }

    /// How many cells the flood fill reached, including the start cell.
    /// Equals the grid size exactly when the passages form a connected graph.
    pub fn reached_count(&self) -> usize {
        self.reached.len()
    }

    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let mut furthest = SmallVec::<[Cartesian2DCoordinate; 8]>::new();
        let furthest_distance = self.max();

        for (coord, distance) in self.distances.iter() {
            if *distance == furthest_distance {
                furthest.push(*coord);
            }
        }
        furthest
    }
}

/// The unique passage path between two cells of a perfect maze, walked
/// backwards from the end point through strictly closer linked neighbours.
/// Returns None when the end point is not reachable from the distances start.
pub fn shortest_path<MaxDistanceT>(grid: &Grid,
                                   distances_from_start: &Distances<MaxDistanceT>,
                                   end_point: Cartesian2DCoordinate)
                                   -> Option<Vec<Cartesian2DCoordinate>>
    where MaxDistanceT: MaxDistance
{
    distances_from_start.distance_from_start_to(end_point)?;

    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_coord = end_point;

    while current_coord != start {

        let current_distance = distances_from_start.distance_from_start_to(current_coord)
            .expect("cells on the path always have a recorded distance");

        let closest_to_start = grid.links(current_coord)
            .expect("cells on the path are always valid grid coordinates")
            .iter()
            .filter_map(|&linked| {
                distances_from_start.distance_from_start_to(linked)
                    .map(|distance| (linked, distance))
            })
            .min_by_key(|&(_, distance)| distance);

        match closest_to_start {
            Some((closer_coord, closer_distance)) if closer_distance < current_distance => {
                current_coord = closer_coord;
                path.push(current_coord);
            }
            // No linked neighbour is any closer to the start - the input
            // data does not belong to this grid.
            _ => return None,
        }
    }

    path.reverse();
    Some(path)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::CompassPrimary;
    use crate::units::{ColumnsCount, RowsCount, WallThickness};

    type SmallDistances = Distances<u32>;

    static OUT_OF_GRID_COORDINATE: Cartesian2DCoordinate = Cartesian2DCoordinate {
        x: u32::MAX,
        y: u32::MAX,
    };

    fn small_grid(w: usize, h: usize) -> Grid {
        Grid::new(ColumnsCount(w), RowsCount(h), WallThickness(4.0))
            .expect("valid test dimensions")
    }

    // 2x2 grid with every interior wall carved open.
    fn open_2x2() -> Grid {
        let mut g = small_grid(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.carve(gc(0, 0), CompassPrimary::East).expect("carve failed");
        g.carve(gc(0, 0), CompassPrimary::South).expect("carve failed");
        g.carve(gc(1, 0), CompassPrimary::South).expect("carve failed");
        g.carve(gc(0, 1), CompassPrimary::East).expect("carve failed");
        g
    }

    #[test]
    fn distances_construction_requires_valid_start_coordinate() {
        let g = small_grid(3, 3);
        let distances = SmallDistances::new(&g, OUT_OF_GRID_COORDINATE);
        assert!(distances.is_none());
    }

    #[test]
    fn start() {
        let g = small_grid(3, 3);
        let start_coordinate = Cartesian2DCoordinate::new(1, 1);
        let distances = SmallDistances::new(&g, start_coordinate).unwrap();
        assert_eq!(start_coordinate, distances.start());
    }

    #[test]
    fn distances_to_unreachable_cells_is_none() {
        let g = small_grid(3, 3);
        let start_coordinate = Cartesian2DCoordinate::new(0, 0);
        let distances = SmallDistances::new(&g, start_coordinate).unwrap();
        for coord in g.iter() {
            let d = distances.distance_from_start_to(coord);

            if coord != start_coordinate {
                assert!(d.is_none());
            } else {
                assert_eq!(d, Some(0));
            }
        }
        assert_eq!(distances.reached_count(), 1);
    }

    #[test]
    fn distances_on_open_grid() {
        let g = open_2x2();
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);

        let distances = SmallDistances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(distances.distance_from_start_to(gc(0, 0)), Some(0));
        assert_eq!(distances.distance_from_start_to(gc(1, 0)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(0, 1)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(1, 1)), Some(2));
        assert_eq!(distances.reached_count(), 4);
    }

    #[test]
    fn max_distance() {
        let g = open_2x2();
        let distances = SmallDistances::new(&g, Cartesian2DCoordinate::new(0, 0)).unwrap();
        assert_eq!(distances.max(), 2);
    }

    #[test]
    fn furthest_points() {
        let mut g = small_grid(3, 1);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.carve(gc(0, 0), CompassPrimary::East).expect("carve failed");
        g.carve(gc(1, 0), CompassPrimary::East).expect("carve failed");

        let distances = SmallDistances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(&*distances.furthest_points_on_grid(), &[gc(2, 0)]);
    }

    #[test]
    fn shortest_path_walks_the_corridor() {
        let mut g = small_grid(3, 1);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.carve(gc(0, 0), CompassPrimary::East).expect("carve failed");
        g.carve(gc(1, 0), CompassPrimary::East).expect("carve failed");

        let distances = SmallDistances::new(&g, gc(0, 0)).unwrap();
        let path = shortest_path(&g, &distances, gc(2, 0));
        assert_eq!(path, Some(vec![gc(0, 0), gc(1, 0), gc(2, 0)]));
    }

    #[test]
    fn shortest_path_to_unreachable_cell_is_none() {
        let mut g = small_grid(3, 1);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.carve(gc(0, 0), CompassPrimary::East).expect("carve failed");

        let distances = SmallDistances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(shortest_path(&g, &distances, gc(2, 0)), None);
    }
}
