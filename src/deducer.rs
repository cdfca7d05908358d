use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constraints::ConstraintView;
use crate::index_set::IndexSet;
use crate::player_view::{PlayerCounters, PlayerView, TileState};

/// Which optional deduction rules are enabled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub diff: bool,
    pub reduce: bool,
    pub isle: bool,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            diff: true,
            reduce: true,
            isle: true,
        }
    }
}

/// Runs the fixed-point deduction loop (rules T, D, R) over a freshly
/// rebuilt [`ConstraintView`] until a safe set is found, flagging drives
/// `remaining_mines` to zero, or no rule fires.
pub struct Deducer<'a> {
    strategies: &'a StrategyConfig,
}

/// What the deducer accomplished this call: a non-empty safe set beats an
/// empty one, but flagging alone (with no safe tiles yet derivable) is also
/// useful progress the caller should act on before falling through to the
/// isle solver or guesser.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeductionResult {
    pub safe: Vec<usize>,
    pub newly_flagged: Vec<usize>,
}

impl<'a> Deducer<'a> {
    pub fn new(strategies: &'a StrategyConfig) -> Self {
        Self { strategies }
    }

    pub fn run(&self, board: &Board, view: &mut PlayerView, counters: &mut PlayerCounters) -> crate::Result<DeductionResult> {
        let mut result = DeductionResult::default();

        loop {
            let mut constraints = ConstraintView::rebuild(board, view)?;

            let trivial = self.apply_trivial(&constraints, view, counters);
            result.newly_flagged.extend(trivial.newly_flagged);

            if !trivial.safe.is_empty() {
                result.safe = trivial.safe;
                return Ok(result);
            }
            if counters.remaining_mines == 0 {
                result.safe = view.collect(TileState::is_unknown);
                return Ok(result);
            }
            if !trivial.newly_flagged.is_empty() {
                // flags changed the board; rebuild constraints before trying D/R
                continue;
            }

            let mut progressed = false;

            if self.strategies.diff {
                progressed |= self.apply_difference(&mut constraints);
            }

            if !progressed && self.strategies.reduce {
                if let Some(safe) = self.apply_reduction(&constraints) {
                    result.safe = safe;
                    return Ok(result);
                }
            }

            if !progressed {
                return Ok(result);
            }
            // Rule D sharpened the view in place; re-run T against it without
            // rebuilding from the board (no flags were placed).
            let trivial = self.apply_trivial_over(&constraints, view, counters);
            result.newly_flagged.extend(trivial.newly_flagged);
            if !trivial.safe.is_empty() {
                result.safe = trivial.safe;
                return Ok(result);
            }
            if counters.remaining_mines == 0 {
                result.safe = view.collect(TileState::is_unknown);
                return Ok(result);
            }
            if trivial.newly_flagged.is_empty() {
                return Ok(result);
            }
        }
    }

    /// Rule T. If the safe set is non-empty this returns immediately without
    /// flagging anything; otherwise every tile forced to be a mine is
    /// flagged.
    fn apply_trivial(&self, constraints: &ConstraintView, view: &mut PlayerView, counters: &mut PlayerCounters) -> DeductionResult {
        self.apply_trivial_over(constraints, view, counters)
    }

    fn apply_trivial_over(&self, constraints: &ConstraintView, view: &mut PlayerView, counters: &mut PlayerCounters) -> DeductionResult {
        let mut safe = Vec::new();
        let mut newly_flagged = Vec::new();

        for constraint in constraints.iter() {
            if constraint.is_trivially_safe() {
                safe.extend(constraint.tiles.iter());
            }
        }
        if !safe.is_empty() {
            safe.sort_unstable();
            safe.dedup();
            return DeductionResult { safe, newly_flagged };
        }

        for constraint in constraints.iter() {
            if constraint.is_trivially_mined() {
                for tile in constraint.tiles.iter() {
                    let coords = crate::types::coords_of(tile, view.size());
                    if view.state_at(coords).is_unknown() {
                        view.flag(coords);
                        counters.remaining_mines = counters.remaining_mines.saturating_sub(1);
                        newly_flagged.push(tile);
                    }
                }
            }
        }

        DeductionResult { safe, newly_flagged }
    }

    /// Rule D. For every pair of constraints where one's tile set is a
    /// proper subset of the other's, derives the set-difference constraint
    /// and inserts it, overriding any existing entry for that same set (the
    /// "sharpen" semantics documented in DESIGN.md). Returns whether any new
    /// or changed entry was added.
    fn apply_difference(&self, constraints: &mut ConstraintView) -> bool {
        let snapshot: Vec<_> = constraints.iter().collect();
        let mut progressed = false;

        for a in &snapshot {
            for b in &snapshot {
                if !b.tiles.is_proper_subset_of(&a.tiles) {
                    continue;
                }
                let derived_tiles = a.tiles.difference(&b.tiles);
                if derived_tiles.is_empty() {
                    continue;
                }
                let derived_mines = a.mines.saturating_sub(b.mines);
                match constraints.get(&derived_tiles) {
                    Some(existing) if existing == derived_mines => {}
                    _ => {
                        constraints.upsert(derived_tiles, derived_mines);
                        progressed = true;
                    }
                }
            }
        }

        progressed
    }

    /// Rule R. For each constraint `(S0, v0)` with `v0 > 1` and each element
    /// `e`, forms the candidate `(S0 \ {e}, v0 - 1)`; if some other
    /// constraint has that exact tile set with the same mine count, `e`
    /// itself carries none of the mines and is safe.
    fn apply_reduction(&self, constraints: &ConstraintView) -> Option<Vec<usize>> {
        let snapshot: Vec<_> = constraints.iter().collect();

        for base in &snapshot {
            if base.mines <= 1 {
                continue;
            }
            for element in base.tiles.iter() {
                let mut reduced = base.tiles.to_vec();
                reduced.retain(|&t| t != element);
                let candidate = IndexSet::from_iter(reduced);
                let candidate_mines = base.mines - 1;

                for other in &snapshot {
                    if other.mines != candidate_mines {
                        continue;
                    }
                    if other.tiles.len() != candidate.len() || !candidate.is_subset_of(&other.tiles) {
                        continue;
                    }
                    let safe = base.tiles.difference(&candidate);
                    if !safe.is_empty() {
                        return Some(safe.to_vec());
                    }
                }
            }
        }

        None
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
    fn rule_d_derives_a_safe_tile_from_a_nested_pair() {
        let strategies = StrategyConfig::default();
        let mut constraints = ConstraintView::new();
        // {a,b,c} with 1 mine, {a,b} with 1 mine => {c} has 0 mines, safe.
        constraints.upsert(IndexSet::from_iter([0, 1, 2]), 1);
        constraints.upsert(IndexSet::from_iter([0, 1]), 1);

        let deducer = Deducer::new(&strategies);
        let progressed = deducer.apply_difference(&mut constraints);
        assert!(progressed);
        assert_eq!(constraints.get(&IndexSet::from_iter([2])), Some(0));
    }

    #[test]
    fn rule_r_derives_a_safe_tile_via_reduction() {
        let strategies = StrategyConfig::default();
        let mut constraints = ConstraintView::new();
        // {a,b,c,d} with 2 mines; {b,c,d} with 1 mine => a is safe.
        constraints.upsert(IndexSet::from_iter([0, 1, 2, 3]), 2);
        constraints.upsert(IndexSet::from_iter([1, 2, 3]), 1);

        let deducer = Deducer::new(&strategies);
        let safe = deducer.apply_reduction(&constraints).unwrap();
        assert_eq!(safe, alloc::vec![0]);
    }

    #[test]
    fn end_to_end_trivial_win_flags_the_mine_and_zeroes_remaining() {
        // 3x3 board with a single mine in the corner: clicking the opposite
        // corner floods every other tile open, leaving only the mine
        // itself unknown; rule T flags it and remaining_mines hits zero.
        let mut board = Board::construct(level(3, 3, 1), &[8]).unwrap();
        let mut view = PlayerView::new((3, 3));
        let mut counters = PlayerCounters::new(1);
        view.click_through(&mut board, (0, 0), &mut counters);

        let strategies = StrategyConfig::default();
        let deducer = Deducer::new(&strategies);
        let result = deducer.run(&board, &mut view, &mut counters).unwrap();

        assert_eq!(counters.remaining_mines, 0);
        assert!(result.safe.is_empty());
        assert_eq!(view.state_at((2, 2)), TileState::Flag);
    }

    #[test]
    fn deducer_is_deterministic_across_repeated_calls_without_a_click() {
        let mut board = Board::construct(level(3, 3, 1), &[8]).unwrap();
        let mut view = PlayerView::new((3, 3));
        let mut counters = PlayerCounters::new(1);
        view.click_through(&mut board, (0, 0), &mut counters);

        let strategies = StrategyConfig::default();
        let deducer = Deducer::new(&strategies);
        let first = deducer.run(&board, &mut view, &mut counters).unwrap();
        let second = deducer.run(&board, &mut view, &mut counters).unwrap();
        assert_eq!(first.safe, second.safe);
    }
}
