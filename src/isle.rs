use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::player_view::{PlayerCounters, PlayerView, TileState};
use crate::types::{coords_of, linear_index};
use crate::Coord2;

/// Bounds on when the isolated-region enumerator is worth running
/// (`isle.maxMine` / `isle.maxSize`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsleConfig {
    pub max_mine: u16,
    pub max_size: usize,
}

impl Default for IsleConfig {
    fn default() -> Self {
        Self {
            max_mine: 8,
            max_size: 20,
        }
    }
}

/// Outcome of [`IsleSolver::solve`]. Deliberately not a `Result`: "no
/// solution" and "ambiguous, risk too high" are ordinary fall-through
/// dispositions, not failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IsleOutcome {
    /// The remaining-unknown region isn't a single isle within bounds.
    NotApplicable,
    /// No placement of `remaining_mines` mines among the isle is consistent
    /// with the revealed clues.
    NoSolution,
    /// Either the unique consistent placement was committed (mines flagged,
    /// `remaining_mines` zeroed), or a tile that is safe in every consistent
    /// placement was found without needing to commit anything.
    Safe(Vec<usize>),
    /// Multiple solutions exist; `tile` is safe in all but `risk` of them,
    /// and `risk` is below the configured acceptance threshold.
    Guess { tile: usize, risk: f64 },
    /// Multiple solutions exist and every tile's risk meets or exceeds the
    /// acceptance threshold; defer to the `Guesser`.
    Defer,
}

pub struct IsleSolver<'a> {
    config: &'a IsleConfig,
    accept: f64,
}

impl<'a> IsleSolver<'a> {
    pub fn new(config: &'a IsleConfig, accept: f64) -> Self {
        Self { config, accept }
    }

    pub fn solve(&self, board: &Board, view: &mut PlayerView, counters: &mut PlayerCounters) -> IsleOutcome {
        if counters.remaining_mines >= self.config.max_mine {
            return IsleOutcome::NotApplicable;
        }

        let unknown = view.collect(TileState::is_unknown);
        if unknown.is_empty() {
            return IsleOutcome::NotApplicable;
        }

        let Some(isle) = self.find_isle(board, view, unknown.len()) else {
            return IsleOutcome::NotApplicable;
        };
        if isle.len() > self.config.max_size {
            return IsleOutcome::NotApplicable;
        }

        let clue_border = self.clue_border(board, view, &isle);

        let target = counters.remaining_mines as usize;
        if target > isle.len() {
            return IsleOutcome::NoSolution;
        }

        let mut mine_witnesses: Vec<Vec<usize>> = Vec::new();
        let mut chosen = Vec::with_capacity(target);
        self.enumerate(board, view, &isle, &clue_border, target, 0, &mut chosen, &mut mine_witnesses);

        match mine_witnesses.len() {
            0 => IsleOutcome::NoSolution,
            1 => {
                let mines = &mine_witnesses[0];
                for &tile in mines {
                    let coords = coords_of(tile, board.size());
                    view.flag(coords);
                }
                counters.remaining_mines = 0;
                let safe: Vec<usize> = isle.iter().copied().filter(|t| !mines.contains(t)).collect();
                IsleOutcome::Safe(safe)
            }
            solutions => {
                let mut appearance = alloc::collections::BTreeMap::new();
                for witness in &mine_witnesses {
                    for &tile in witness {
                        *appearance.entry(tile).or_insert(0usize) += 1;
                    }
                }
                for &tile in &isle {
                    appearance.entry(tile).or_insert(0);
                }

                let (&safest, &count) = appearance
                    .iter()
                    .min_by_key(|(_, &count)| count)
                    .expect("isle is non-empty");
                let risk = count as f64 / solutions as f64;

                if risk == 0.0 {
                    IsleOutcome::Safe(alloc::vec![safest])
                } else if risk < self.accept {
                    IsleOutcome::Guess { tile: safest, risk }
                } else {
                    IsleOutcome::Defer
                }
            }
        }
    }

    /// 4-connected flood search for the component of `Unknown` tiles
    /// containing the first one found in row-major order. Returns `None`
    /// when it doesn't cover every remaining unknown tile; the isle must be
    /// *all* remaining unknowns before enumerating.
    fn find_isle(&self, board: &Board, view: &PlayerView, total_unknown: usize) -> Option<Vec<usize>> {
        let size = board.size();
        let mut start = None;
        'search: for y in 0..size.1 {
            for x in 0..size.0 {
                if view.state_at((x, y)).is_unknown() {
                    start = Some((x, y));
                    break 'search;
                }
            }
        }
        let start = start?;

        let mut visited = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut isle = Vec::new();

        while let Some(coords) = queue.pop_front() {
            isle.push(linear_index(coords, size));
            for neighbor in board.iter_orthogonal_neighbors(coords) {
                if view.state_at(neighbor).is_unknown() && visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        if isle.len() == total_unknown {
            Some(isle)
        } else {
            None
        }
    }

    /// Revealed `Number` tiles bordering the isle; enumeration only needs to
    /// re-check these, since clues elsewhere can't be affected by isle flags.
    fn clue_border(&self, board: &Board, view: &PlayerView, isle: &[usize]) -> Vec<Coord2> {
        let size = board.size();
        let mut border = BTreeSet::new();
        for &tile in isle {
            let coords = coords_of(tile, size);
            for neighbor in board.iter_neighbors(coords) {
                if view.state_at(neighbor).is_number() {
                    border.insert(neighbor);
                }
            }
        }
        border.into_iter().collect()
    }

    fn is_consistent(&self, board: &Board, view: &PlayerView, clue_border: &[Coord2]) -> bool {
        clue_border.iter().all(|&clue| {
            let TileState::Number(value) = view.state_at(clue) else {
                return true;
            };
            let flagged = board
                .iter_neighbors(clue)
                .filter(|&pos| view.state_at(pos) == TileState::Flag)
                .count();
            flagged as u8 == value
        })
    }

    /// Recursive include/exclude backtracking over isle tiles: tentatively
    /// flag, check consistency (pruning branches that already violate a
    /// bordering clue), recurse, then always undo.
    #[allow(clippy::too_many_arguments)]
    fn enumerate(
        &self,
        board: &Board,
        view: &mut PlayerView,
        isle: &[usize],
        clue_border: &[Coord2],
        target: usize,
        index: usize,
        chosen: &mut Vec<usize>,
        witnesses: &mut Vec<Vec<usize>>,
    ) {
        if chosen.len() == target {
            if self.is_consistent(board, view, clue_border) {
                witnesses.push(chosen.clone());
            }
            return;
        }
        if index >= isle.len() {
            return;
        }
        // not enough tiles left to reach the target: prune
        if target - chosen.len() > isle.len() - index {
            return;
        }

        let tile = isle[index];
        let coords = coords_of(tile, board.size());

        // branch: place a mine here
        view.flag(coords);
        chosen.push(tile);
        if self.is_consistent(board, view, clue_border) {
            self.enumerate(board, view, isle, clue_border, target, index + 1, chosen, witnesses);
        }
        chosen.pop();
        view.unflag(coords);

        // branch: leave it safe
        self.enumerate(board, view, isle, clue_border, target, index + 1, chosen, witnesses);
    }
}
