use std::error::Error;
use std::fmt;
use std::rc::Rc;

use crate::cells::{offset_coordinate, Cartesian2DCoordinate, Cell, CompassPrimary,
                   CoordinateOptionSmallVec, CoordinateSmallVec};
use crate::grid_displays::GridDisplay;
use crate::units::{ColumnsCount, EdgesCount, RowsCount, TileSize, WallThickness};

/// The crate's narrow error taxonomy. Illegal token moves and simultaneous
/// goal arrivals are normal control flow, not errors.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridError {
    /// Grid construction with a zero column or row count.
    InvalidDimension,
    /// A coordinate or position outside `[0,cols) x [0,rows)` where one can
    /// never legitimately occur.
    OutOfBoundsCell,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GridError::InvalidDimension => write!(f, "grid dimensions must be positive"),
            GridError::OutOfBoundsCell => write!(f, "cell coordinate outside the grid"),
        }
    }
}

impl Error for GridError {}

/// A dense rectangular grid of `Cell`s addressed by (column, row).
///
/// The grid's topology is fixed at construction. Wall flags change only while
/// the generator runs, through `carve`, which removes both sides of a shared
/// edge in one call - the redundant per-cell wall storage can never
/// desynchronise. Everything else is a read-only query, which is what makes
/// the grid safe to share with both tokens during a race.
pub struct Grid {
    columns: usize,
    rows: usize,
    wall_thickness: WallThickness,
    cells: Vec<Cell>,
    grid_display: Option<Rc<dyn GridDisplay>>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Grid :: columns: {:?}, rows: {:?}, passages: {:?}",
               self.columns,
               self.rows,
               self.passages_count())
    }
}

impl Grid {
    /// Build a `columns` x `rows` grid with every wall present and every cell
    /// unvisited. Cells are stored row-major, consistent with the iterators
    /// and the row-major index maths used throughout.
    pub fn new(columns: ColumnsCount,
               rows: RowsCount,
               wall_thickness: WallThickness)
               -> Result<Grid, GridError> {
        let (ColumnsCount(columns), RowsCount(rows)) = (columns, rows);
        if columns == 0 || rows == 0 {
            return Err(GridError::InvalidDimension);
        }

        Ok(Grid {
            columns,
            rows,
            wall_thickness,
            cells: vec![Cell::new(); columns * rows],
            grid_display: None,
        })
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        ColumnsCount(self.columns)
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        RowsCount(self.rows)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.columns * self.rows
    }

    #[inline]
    pub fn wall_thickness(&self) -> WallThickness {
        self.wall_thickness
    }

    #[inline]
    pub fn set_grid_display(&mut self, grid_display: Option<Rc<dyn GridDisplay>>) {
        self.grid_display = grid_display;
    }

    #[inline]
    pub fn grid_display(&self) -> &Option<Rc<dyn GridDisplay>> {
        &self.grid_display
    }

    /// Is the grid coordinate within the grid's dimensions?
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.columns && (coord.y as usize) < self.rows
    }

    #[inline]
    pub fn cell(&self, coord: Cartesian2DCoordinate) -> Option<&Cell> {
        self.coordinate_index(coord).map(|i| &self.cells[i])
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        offset_coordinate(coord, direction)
            .and_then(|neighbour_coord| if self.is_valid_coordinate(neighbour_coord) {
                Some(neighbour_coord)
            } else {
                None
            })
    }

    /// Cells to the North, South, East or West of a coordinate, not
    /// necessarily connected by a passage.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|&dir| self.neighbour_at_direction(coord, dir))
            .collect()
    }

    pub fn neighbours_at_directions(&self,
                                    coord: Cartesian2DCoordinate,
                                    dirs: &[CompassPrimary])
                                    -> CoordinateOptionSmallVec {
        dirs.iter()
            .map(|&direction| self.neighbour_at_direction(coord, direction))
            .collect()
    }

    /// Carve a passage from `coord` towards `direction`: remove the wall flag
    /// on this side of the edge and the matching flag of the neighbour.
    ///
    /// This is the only routine in the crate that clears wall flags, so the
    /// wall symmetry invariant holds by construction. Carving through the
    /// grid boundary is `OutOfBoundsCell`.
    pub fn carve(&mut self,
                 coord: Cartesian2DCoordinate,
                 direction: CompassPrimary)
                 -> Result<(), GridError> {
        let cell_index = self.coordinate_index(coord).ok_or(GridError::OutOfBoundsCell)?;
        let neighbour = self.neighbour_at_direction(coord, direction)
            .ok_or(GridError::OutOfBoundsCell)?;
        let neighbour_index = self.coordinate_index(neighbour)
            .ok_or(GridError::OutOfBoundsCell)?;

        self.cells[cell_index].remove_wall(direction);
        self.cells[neighbour_index].remove_wall(direction.opposite());
        Ok(())
    }

    /// Is the wall on the given side of this cell absent?
    ///
    /// O(1) local wall query - the collision primitive for token movement.
    /// The boundary walls of the outermost cells are never carved, so a
    /// false here also covers the edge of the grid.
    #[inline]
    pub fn is_open(&self, coord: Cartesian2DCoordinate, direction: CompassPrimary) -> bool {
        self.cell(coord).map_or(false, |cell| !cell.has_wall(direction))
    }

    /// Are two adjacent cells connected by a carved passage?
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        CompassPrimary::ALL
            .iter()
            .any(|&dir| self.neighbour_at_direction(a, dir) == Some(b) && self.is_open(a, dir))
    }

    /// Cells reachable from `coord` through one open passage.
    /// Returns None for an invalid coordinate.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }

        let linked = CompassPrimary::ALL
            .iter()
            .filter(|&&dir| self.is_open(coord, dir))
            .filter_map(|&dir| self.neighbour_at_direction(coord, dir))
            .collect();
        Some(linked)
    }

    /// The number of carved passages. Each open wall pair is one edge of the
    /// maze graph; a perfect maze has exactly `size() - 1`.
    pub fn passages_count(&self) -> EdgesCount {
        let open_flags: usize = self.cells
            .iter()
            .map(|cell| cell.walls().iter().filter(|&&wall| !wall).count())
            .sum();
        EdgesCount(open_flags / 2)
    }

    /// Derive the cell containing a continuous (x, y) position, by integer
    /// division with the tile size. Token movement keeps positions inside the
    /// grid, so an `OutOfBoundsCell` from here is an internal invariant
    /// violation rather than a recoverable condition.
    pub fn cell_at_position(&self,
                            x: f32,
                            y: f32,
                            tile: TileSize)
                            -> Result<Cartesian2DCoordinate, GridError> {
        let TileSize(tile) = tile;
        if x < 0.0 || y < 0.0 {
            return Err(GridError::OutOfBoundsCell);
        }

        let coord = Cartesian2DCoordinate::new((x / tile) as u32, (y / tile) as u32);
        if self.is_valid_coordinate(coord) {
            Ok(coord)
        } else {
            Err(GridError::OutOfBoundsCell)
        }
    }

    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            columns: self.columns,
            cells_count: self.size(),
        }
    }

    pub fn iter_row(&self) -> BatchIter {
        BatchIter {
            iter_type: BatchIterType::Row,
            current_index: 0,
            columns: self.columns,
            rows: self.rows,
        }
    }

    pub fn iter_column(&self) -> BatchIter {
        BatchIter {
            iter_type: BatchIterType::Column,
            current_index: 0,
            columns: self.columns,
            rows: self.rows,
        }
    }

    #[inline]
    fn coordinate_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.columns + coord.x as usize)
        } else {
            None
        }
    }

    pub(crate) fn cell_mut(&mut self, coord: Cartesian2DCoordinate) -> Option<&mut Cell> {
        match self.coordinate_index(coord) {
            Some(i) => Some(&mut self.cells[i]),
            None => None,
        }
    }
}

impl fmt::Display for Grid {
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

        let corner_piece = |left: bool, right: bool, up: bool, down: bool| match (left, right,
                                                                                  up, down) {
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
            (false, false, false, false) => " ",
        };

        let render_body = |coord: Cartesian2DCoordinate| -> String {
            if let Some(display) = self.grid_display.as_ref() {
                display.render_cell_body(coord)
            } else {
                String::from("   ")
            }
        };

        // The north most boundary row is a special case: no cell above
        // contributes a southern wall.
        let mut output = String::from(WALL_RD);
        for (index, coord) in self.iter_row().next().unwrap_or_default().into_iter().enumerate() {
            output.push_str(WALL_LR_3);
            let is_last_cell = index == self.columns - 1;
            if self.is_open(coord, CompassPrimary::East) {
                output.push_str(WALL_LR);
            } else if is_last_cell {
                output.push_str(WALL_LD);
            } else {
                output.push_str(WALL_LRD);
            }
        }
        output.push('\n');

        for (index_row, row) in self.iter_row().enumerate() {

            let is_last_row = index_row == self.rows - 1;

            // Each cell reuses the southern wall of the cell above as its own
            // northern wall, so a row renders as a middle section (body and
            // eastern boundary) and a bottom section (southern boundary and
            // corner piece).
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::new();

            for (index_column, cell_coord) in row.into_iter().enumerate() {

                let is_first_column = index_column == 0;
                let is_last_column = index_column == self.columns - 1;
                let east_open = self.is_open(cell_coord, CompassPrimary::East);
                let south_open = self.is_open(cell_coord, CompassPrimary::South);

                row_middle_section_render.push_str(&render_body(cell_coord));
                row_middle_section_render.push_str(if east_open { " " } else { WALL_UD });

                if is_first_column {
                    row_bottom_section_render = if is_last_row {
                        String::from(WALL_RU)
                    } else if south_open {
                        String::from(WALL_UD)
                    } else {
                        String::from(WALL_RUD)
                    };
                }
                row_bottom_section_render.push_str(if south_open { "   " } else { WALL_LR_3 });

                let corner = match (is_last_row, is_last_column) {
                    (true, true) => WALL_LU,
                    (true, false) => {
                        if east_open {
                            WALL_LR
                        } else {
                            WALL_LRU
                        }
                    }
                    (false, true) => {
                        if south_open {
                            WALL_UD
                        } else {
                            WALL_LUD
                        }
                    }
                    (false, false) => {
                        let open_se_from_east = self.neighbour_at_direction(cell_coord,
                                                                            CompassPrimary::East)
                            .map_or(false, |c| self.is_open(c, CompassPrimary::South));
                        let open_se_from_south = self.neighbour_at_direction(cell_coord,
                                                                             CompassPrimary::South)
                            .map_or(false, |c| self.is_open(c, CompassPrimary::East));

                        corner_piece(!south_open, !open_se_from_east, !east_open,
                                     !open_se_from_south)
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

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    columns: usize,
    cells_count: usize,
}

impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let x = self.current_cell_number % self.columns;
            let y = self.current_cell_number / self.columns;
            self.current_cell_number += 1;
            Some(Cartesian2DCoordinate::new(x as u32, y as u32))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = Cartesian2DCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Copy, Clone)]
enum BatchIterType {
    Row,
    Column,
}

/// Iterates over whole rows (or columns) of cell coordinates at a time.
#[derive(Debug, Copy, Clone)]
pub struct BatchIter {
    iter_type: BatchIterType,
    current_index: usize,
    columns: usize,
    rows: usize,
}

impl Iterator for BatchIter {
    type Item = Vec<Cartesian2DCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        let (line_count, line_length) = match self.iter_type {
            BatchIterType::Row => (self.rows, self.columns),
            BatchIterType::Column => (self.columns, self.rows),
        };
        if self.current_index < line_count {
            let coords = (0..line_length)
                .map(|i| {
                    if let BatchIterType::Row = self.iter_type {
                        Cartesian2DCoordinate::new(i as u32, self.current_index as u32)
                    } else {
                        Cartesian2DCoordinate::new(self.current_index as u32, i as u32)
                    }
                })
                .collect();
            self.current_index += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let line_count = match self.iter_type {
            BatchIterType::Row => self.rows,
            BatchIterType::Column => self.columns,
        };
        let remaining = line_count - self.current_index;
        (remaining, Some(remaining))
    }
}
