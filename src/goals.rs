use log::info;

use crate::cells::Cartesian2DCoordinate;
use crate::grid::{Grid, GridError};
use crate::tokens::Token;
use crate::units::{ColumnsCount, RowsCount};

/// Watches a designated goal cell and latches the match's terminal state.
///
/// Polled once per frame after movement has been applied. The game-over
/// state is monotonic: once any token's derived cell equals the goal the
/// match is over for good and every token's held flags are forcibly cleared,
/// freezing motion. Stopping the match timer is the shell's job.
#[derive(Debug)]
pub struct GoalTracker {
    goal: Cartesian2DCoordinate,
    over: bool,
    winner: Option<usize>,
}

impl GoalTracker {
    /// Track the grid's last cell - the corner opposite the (0, 0) spawn.
    pub fn new(grid: &Grid) -> GoalTracker {
        let (ColumnsCount(columns), RowsCount(rows)) = (grid.columns(), grid.rows());
        GoalTracker {
            goal: Cartesian2DCoordinate::new(columns as u32 - 1, rows as u32 - 1),
            over: false,
            winner: None,
        }
    }

    /// Track an explicitly supplied goal cell instead of the default corner.
    pub fn with_goal(grid: &Grid, goal: Cartesian2DCoordinate) -> Result<GoalTracker, GridError> {
        if !grid.is_valid_coordinate(goal) {
            return Err(GridError::OutOfBoundsCell);
        }

        Ok(GoalTracker {
            goal,
            over: false,
            winner: None,
        })
    }

    #[inline]
    pub fn goal(&self) -> Cartesian2DCoordinate {
        self.goal
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Index of the winning token in the slice passed to `check`, once the
    /// match is over. On a same-frame tie the first token in iteration order
    /// wins.
    #[inline]
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    /// Poll the tracker with the tokens' current positions. Returns the
    /// (monotonic) game-over state; while over, held flags stay cleared no
    /// matter what the input layer wrote since the last frame.
    pub fn check<K: Copy + Eq>(&mut self, grid: &Grid, tokens: &mut [Token<K>]) -> bool {
        if !self.over {
            for (index, token) in tokens.iter().enumerate() {
                let cell = token.current_cell(grid)
                    .expect("token position escaped the grid: boundary walls must never be carved");
                if cell == self.goal {
                    self.over = true;
                    self.winner = Some(index);
                    info!("token {} reached the goal cell ({}, {})", index, cell.x, cell.y);
                    break;
                }
            }
        }

        if self.over {
            for token in tokens.iter_mut() {
                token.clear_held();
            }
        }

        self.over
    }
}
