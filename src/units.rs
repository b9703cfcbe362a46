#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RowsCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ColumnsCount(pub usize);

/// Count of carved passages (removed wall pairs) in a maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct EdgesCount(pub usize);

#[derive(PartialEq, Copy, Clone, Debug)]
pub struct TileSize(pub f32);
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct StepSize(pub f32);
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct WallThickness(pub f32);
