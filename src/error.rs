use thiserror::Error;

use crate::{CellCount, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    /// `level.mines` exceeds the number of tiles the board actually has.
    #[error("{mines} mines declared for a board with only {tiles} tiles")]
    TooManyMines { mines: CellCount, tiles: CellCount },
    /// Mine count of a benchmark case matches no configured level.
    #[error("Mine count {mine_count} matches no configured level")]
    BadCase { mine_count: CellCount },
    /// `ConstraintView` construction produced a negative target; this indicates
    /// a bug in how `PlayerView` flags were applied, not a reachable game state.
    #[error("Constraint for clue at {clue:?} has a negative target")]
    InconsistentConstraint { clue: Coord2 },
}

pub type Result<T> = core::result::Result<T, GameError>;
