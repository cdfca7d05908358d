use alloc::vec::Vec;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{mult, CellCount, Coord, Coord2, GameError, NeighborIterExt, Result, ToNdIndex};

/// Board size and mine count, fixed for the lifetime of a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl LevelConfig {
    pub const fn total_tiles(&self) -> CellCount {
        mult(self.cols, self.rows)
    }
}

/// Playing/terminal status of the ground-truth board. Mutated only through
/// [`Board::click`] (which reports a mine hit) or [`Board::mark_won`] (driven
/// by the [`Game`](crate::game::Game) controller once all mines are flagged).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardStatus {
    Playing,
    Boom,
    Won,
}

/// Outcome of [`Board::click`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Out of bounds, or the board already reached a terminal status.
    NoOp,
    /// Not a mine; the hint value is returned for the caller to record.
    Safe(u8),
    Boom,
}

/// Ground-truth grid: mine placement and derived neighbour-count hints. A
/// hint of `-1` marks a mine; `0..=8` is the count of mines in the
/// 8-neighbourhood.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    rows: Coord,
    cols: Coord,
    hints: Array2<i8>,
    remaining_mines: CellCount,
    status: BoardStatus,
}

impl Board {
    /// Builds a board from an explicit list of mine indices (row-major,
    /// matching the benchmark case file format). Fails when the mine count
    /// does not match `level.mines`.
    pub fn construct(level: LevelConfig, mine_indices: &[usize]) -> Result<Self> {
        if level.mines > level.total_tiles() {
            return Err(GameError::TooManyMines {
                mines: level.mines,
                tiles: level.total_tiles(),
            });
        }
        if mine_indices.len() as CellCount != level.mines {
            return Err(GameError::BadCase {
                mine_count: mine_indices.len() as CellCount,
            });
        }

        let size = (level.cols as usize, level.rows as usize);
        let mut is_mine = Array2::from_elem(size, false);
        for &index in mine_indices {
            let coords = crate::types::coords_of(index, (level.cols, level.rows));
            let (x, y) = coords;
            if x >= level.cols || y >= level.rows {
                return Err(GameError::InvalidCoords);
            }
            is_mine[coords.to_nd_index()] = true;
        }

        let mut hints = Array2::from_elem(size, 0i8);
        for y in 0..level.rows {
            for x in 0..level.cols {
                let coords = (x, y);
                if is_mine[coords.to_nd_index()] {
                    hints[coords.to_nd_index()] = -1;
                    continue;
                }
                let count = is_mine
                    .iter_neighbors(coords)
                    .filter(|&pos| is_mine[pos.to_nd_index()])
                    .count();
                hints[coords.to_nd_index()] = count as i8;
            }
        }

        Ok(Self {
            rows: level.rows,
            cols: level.cols,
            hints,
            remaining_mines: level.mines,
            status: BoardStatus::Playing,
        })
    }

    pub fn rows(&self) -> Coord {
        self.rows
    }

    pub fn cols(&self) -> Coord {
        self.cols
    }

    pub fn size(&self) -> Coord2 {
        (self.cols, self.rows)
    }

    pub fn remaining_mines(&self) -> CellCount {
        self.remaining_mines
    }

    pub fn status(&self) -> BoardStatus {
        self.status
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        coords.0 < self.cols && coords.1 < self.rows
    }

    pub fn is_mine_at(&self, coords: Coord2) -> bool {
        self.hints[coords.to_nd_index()] == -1
    }

    /// The revealed hint at `coords`. Panics if `coords` marks a mine; callers
    /// check [`Board::is_mine_at`] first, since it's only meaningful for safe
    /// cells.
    pub fn hint_at(&self, coords: Coord2) -> u8 {
        debug_assert!(!self.is_mine_at(coords));
        self.hints[coords.to_nd_index()].max(0) as u8
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.hints.iter_neighbors(coords)
    }

    pub fn iter_orthogonal_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.hints.iter_orthogonal_neighbors(coords)
    }

    /// Resolves a click against ground truth. Out-of-bounds coordinates are a
    /// silent no-op, simplifying the recursive flood in
    /// [`PlayerView::click_through`](crate::player_view::PlayerView::click_through).
    pub fn click(&mut self, coords: Coord2) -> ClickOutcome {
        if !self.in_bounds(coords) || !matches!(self.status, BoardStatus::Playing) {
            return ClickOutcome::NoOp;
        }

        if self.is_mine_at(coords) {
            self.status = BoardStatus::Boom;
            log::debug!("boom at {:?}", coords);
            ClickOutcome::Boom
        } else {
            ClickOutcome::Safe(self.hint_at(coords))
        }
    }

    pub fn mark_won(&mut self) {
        if matches!(self.status, BoardStatus::Playing) {
            log::debug!("board won");
            self.status = BoardStatus::Won;
        }
    }

    pub fn mine_indices(&self) -> Vec<usize> {
        let mut out = Vec::new();
        for y in 0..self.rows {
            for x in 0..self.cols {
                if self.is_mine_at((x, y)) {
                    out.push(crate::types::linear_index((x, y), self.size()));
                }
            }
        }
        out
    }
}
