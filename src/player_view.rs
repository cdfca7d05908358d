use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;

use hashbrown::HashMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::board::{Board, ClickOutcome};
use crate::{CellCount, Coord2, ToNdIndex};

/// Player-visible state of a single tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    Unknown,
    Number(u8),
    Flag,
    Boom,
}

impl Default for TileState {
    fn default() -> Self {
        Self::Unknown
    }
}

impl TileState {
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub const fn is_number(self) -> bool {
        matches!(self, Self::Number(_))
    }

    pub const fn is_flag(self) -> bool {
        matches!(self, Self::Flag)
    }
}

/// Labels the provenance of the most recent click, for the statistics
/// `PlayerCounters` and the benchmark harness report.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuessLabel {
    None,
    First,
    Random,
    Corner,
    Min,
    Isle,
}

impl Default for GuessLabel {
    fn default() -> Self {
        Self::None
    }
}

/// Success/failure counts for every guess made under one label.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelTally {
    pub success: u32,
    pub failure: u32,
}

/// Per-game tallies the `Game` controller and `Guesser` update as play
/// proceeds.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlayerCounters {
    pub remaining_mines: CellCount,
    pub sure_clicks: u32,
    pub guess_clicks: u32,
    pub guess_label: GuessLabel,
    pub guess_success: u32,
    pub guess_failure: u32,
    /// Success/failure counts broken down by guess label, across every
    /// guess made this game, not just the most recent one.
    pub label_tally: HashMap<GuessLabel, LabelTally>,
}

impl PlayerCounters {
    pub fn new(total_mines: CellCount) -> Self {
        Self {
            remaining_mines: total_mines,
            ..Default::default()
        }
    }

    /// Records one guess's outcome, updating both the aggregate counters and
    /// the per-label breakdown.
    pub fn record_guess_outcome(&mut self, label: GuessLabel, success: bool) {
        if success {
            self.guess_success += 1;
        } else {
            self.guess_failure += 1;
        }
        let tally = self.label_tally.entry(label).or_default();
        if success {
            tally.success += 1;
        } else {
            tally.failure += 1;
        }
    }
}

/// The player-visible grid of tile states, derived entirely from clicks and
/// flags; never consults ground truth except through [`Board`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerView {
    tiles: Array2<TileState>,
}

impl PlayerView {
    pub fn new(size: Coord2) -> Self {
        Self {
            tiles: Array2::default((size.0 as usize, size.1 as usize)),
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.tiles.dim();
        (dim.0 as _, dim.1 as _)
    }

    pub fn state_at(&self, coords: Coord2) -> TileState {
        self.tiles[coords.to_nd_index()]
    }

    pub fn flag(&mut self, coords: Coord2) {
        self.tiles[coords.to_nd_index()] = TileState::Flag;
    }

    pub fn unflag(&mut self, coords: Coord2) {
        self.tiles[coords.to_nd_index()] = TileState::Unknown;
    }

    /// Tile indices (row-major) matching `predicate`.
    pub fn collect(&self, predicate: impl Fn(TileState) -> bool) -> Vec<usize> {
        let size = self.size();
        self.tiles
            .indexed_iter()
            .filter(|(_, &state)| predicate(state))
            .map(|((x, y), _)| crate::types::linear_index((x as _, y as _), size))
            .collect()
    }

    pub fn neighbor_count(&self, board: &Board, coords: Coord2, predicate: impl Fn(TileState) -> bool) -> usize {
        board
            .iter_neighbors(coords)
            .filter(|&pos| predicate(self.state_at(pos)))
            .count()
    }

    /// The flood-reveal primitive. Reads `board`'s ground truth and mutates
    /// `self` (and `board`'s status on a mine hit); the flood is driven
    /// entirely off `PlayerView`, not `Board`, so repeated clicks on
    /// already-revealed tiles are a no-op rather than re-triggering the
    /// recursion. BFS with an explicit visited set, not plain recursion, so
    /// a zero-region of any size can't blow the stack.
    pub fn click_through(&mut self, board: &mut Board, coords: Coord2, counters: &mut PlayerCounters) {
        if !board.in_bounds(coords) || !self.state_at(coords).is_unknown() {
            return;
        }

        match board.click(coords) {
            ClickOutcome::NoOp => {}
            ClickOutcome::Boom => {
                self.tiles[coords.to_nd_index()] = TileState::Boom;
            }
            ClickOutcome::Safe(hint) => {
                self.tiles[coords.to_nd_index()] = TileState::Number(hint);
                log::trace!("revealed {:?} = {}", coords, hint);

                if hint == 0 {
                    self.flood_from(board, coords, counters);
                }
            }
        }
    }

    fn flood_from(&mut self, board: &mut Board, origin: Coord2, _counters: &mut PlayerCounters) {
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit: VecDeque<_> = board
            .iter_neighbors(origin)
            .filter(|&pos| self.state_at(pos).is_unknown())
            .collect();

        while let Some(coords) = to_visit.pop_front() {
            if !visited.insert(coords) {
                continue;
            }
            if !self.state_at(coords).is_unknown() {
                continue;
            }

            match board.click(coords) {
                ClickOutcome::NoOp => continue,
                ClickOutcome::Boom => {
                    self.tiles[coords.to_nd_index()] = TileState::Boom;
                    continue;
                }
                ClickOutcome::Safe(hint) => {
                    self.tiles[coords.to_nd_index()] = TileState::Number(hint);
                    log::trace!("flood-revealed {:?} = {}", coords, hint);

                    if hint == 0 {
                        to_visit.extend(
                            board
                                .iter_neighbors(coords)
                                .filter(|&pos| self.state_at(pos).is_unknown())
                                .filter(|pos| !visited.contains(pos)),
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::LevelConfig;

    fn level(rows: u8, cols: u8, mines: u16) -> LevelConfig {
        LevelConfig { rows, cols, mines }
    }

    #[test]
    fn click_through_reveals_a_single_number_tile() {
        let mut board = Board::construct(level(3, 3, 1), &[4]).unwrap();
        let mut view = PlayerView::new((3, 3));
        let mut counters = PlayerCounters::new(1);

        view.click_through(&mut board, (0, 0), &mut counters);

        assert_eq!(view.state_at((0, 0)), TileState::Number(1));
        assert_eq!(view.state_at((2, 2)), TileState::Unknown);
    }

    #[test]
    fn click_through_floods_zero_region() {
        // mine tucked in the far corner, rest of the 4x4 board is open
        let mut board = Board::construct(level(4, 4, 1), &[15]).unwrap();
        let mut view = PlayerView::new((4, 4));
        let mut counters = PlayerCounters::new(1);

        view.click_through(&mut board, (0, 0), &mut counters);

        assert_eq!(view.state_at((0, 0)), TileState::Number(0));
        // every non-mine-adjacent tile should have been opened by the flood
        assert!(view.state_at((1, 0)).is_number());
        assert_eq!(view.state_at((3, 3)), TileState::Unknown);
    }

    #[test]
    fn re_clicking_a_revealed_tile_is_idempotent() {
        let mut board = Board::construct(level(3, 3, 1), &[4]).unwrap();
        let mut view = PlayerView::new((3, 3));
        let mut counters = PlayerCounters::new(1);

        view.click_through(&mut board, (0, 0), &mut counters);
        let before = view.clone();
        view.click_through(&mut board, (0, 0), &mut counters);

        assert_eq!(before.state_at((0, 0)), view.state_at((0, 0)));
    }

    #[test]
    fn flagged_tile_is_not_reopened_by_flood() {
        let mut board = Board::construct(level(3, 3, 1), &[8]).unwrap();
        let mut view = PlayerView::new((3, 3));
        let mut counters = PlayerCounters::new(1);

        view.flag((2, 1));
        view.click_through(&mut board, (0, 0), &mut counters);

        assert_eq!(view.state_at((2, 1)), TileState::Flag);
    }

    #[test]
    fn record_guess_outcome_tracks_both_aggregate_and_per_label_counts() {
        let mut counters = PlayerCounters::new(0);

        counters.record_guess_outcome(GuessLabel::Corner, true);
        counters.record_guess_outcome(GuessLabel::Corner, false);
        counters.record_guess_outcome(GuessLabel::Min, true);

        assert_eq!(counters.guess_success, 2);
        assert_eq!(counters.guess_failure, 1);

        let corner = counters.label_tally.get(&GuessLabel::Corner).unwrap();
        assert_eq!(corner.success, 1);
        assert_eq!(corner.failure, 1);

        let min = counters.label_tally.get(&GuessLabel::Min).unwrap();
        assert_eq!(min.success, 1);
        assert_eq!(min.failure, 0);
    }
}
