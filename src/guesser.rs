use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constraints::ConstraintView;
use crate::player_view::{GuessLabel, PlayerCounters, PlayerView, TileState};
use crate::types::coords_of;
use crate::Coord2;

/// Which policy the `Guesser` falls back to once corner preference and the
/// deducer are both exhausted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuessPolicy {
    First,
    Random,
    Corner,
    Min,
}

/// A click the Guesser chose, together with the label the caller should
/// record on `PlayerCounters`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Guess {
    pub coords: Coord2,
    pub label: GuessLabel,
}

pub struct Guesser {
    policy: GuessPolicy,
    accept: f64,
    rng: SmallRng,
}

impl Guesser {
    /// `seed` drives the `random` policy's tile choice. Seeds a `SmallRng`
    /// explicitly rather than pulling from thread-local state, since the
    /// crate is `no_std`.
    pub fn new(policy: GuessPolicy, accept: f64, seed: u64) -> Self {
        Self {
            policy,
            accept,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Picks the next tile to click when neither the deducer nor the isle
    /// solver found a safe move. Corner preference always fires first,
    /// regardless of configured policy.
    pub fn pick(&mut self, board: &Board, view: &PlayerView, counters: &PlayerCounters) -> Option<Guess> {
        if let Some(coords) = self.first_unknown_corner(board, view) {
            return Some(Guess {
                coords,
                label: GuessLabel::Corner,
            });
        }

        match self.policy {
            GuessPolicy::First => self.first_in_row_major(view).map(|coords| Guess {
                coords,
                label: GuessLabel::First,
            }),
            GuessPolicy::Random => self.uniform_random(view).map(|coords| Guess {
                coords,
                label: GuessLabel::Random,
            }),
            GuessPolicy::Corner => self.scan_cycle(view, counters).map(|coords| Guess {
                coords,
                label: GuessLabel::Corner,
            }),
            GuessPolicy::Min => self.min_probability(board, view).or_else(|| self.scan_cycle(view, counters)).map(|coords| Guess {
                coords,
                label: GuessLabel::Min,
            }),
        }
    }

    fn corners(&self, board: &Board) -> [Coord2; 4] {
        let (cols, rows) = board.size();
        [(0, 0), (cols - 1, rows - 1), (0, rows - 1), (cols - 1, 0)]
    }

    fn first_unknown_corner(&self, board: &Board, view: &PlayerView) -> Option<Coord2> {
        self.corners(board).into_iter().find(|&coords| view.state_at(coords).is_unknown())
    }

    fn first_in_row_major(&self, view: &PlayerView) -> Option<Coord2> {
        let size = view.size();
        for y in 0..size.1 {
            for x in 0..size.0 {
                if view.state_at((x, y)).is_unknown() {
                    return Some((x, y));
                }
            }
        }
        None
    }

    fn uniform_random(&mut self, view: &PlayerView) -> Option<Coord2> {
        let unknown = view.collect(TileState::is_unknown);
        if unknown.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..unknown.len());
        Some(coords_of(unknown[index], view.size()))
    }

    /// Cycles through top-left, bottom-right, bottom-left, top-right scan
    /// orders indexed by `guessClicks mod 4`, returning the first Unknown
    /// tile that scan order finds.
    fn scan_cycle(&self, view: &PlayerView, counters: &PlayerCounters) -> Option<Coord2> {
        let size = view.size();
        let order = counters.guess_clicks % 4;

        let xs: Vec<u8> = match order {
            0 | 1 => (0..size.0).collect(),
            _ => (0..size.0).rev().collect(),
        };
        let ys: Vec<u8> = match order {
            0 | 3 => (0..size.1).collect(),
            _ => (0..size.1).rev().collect(),
        };

        for &y in &ys {
            for &x in &xs {
                if view.state_at((x, y)).is_unknown() {
                    return Some((x, y));
                }
            }
        }
        None
    }

    /// For every constraint `(S, v)`, each element of `S` risks `v / |S|`;
    /// a tile's overall risk is the maximum across constraints it appears
    /// in. Picks the minimum-risk tile if it clears `accept`.
    fn min_probability(&self, board: &Board, view: &PlayerView) -> Option<Coord2> {
        let constraints = ConstraintView::rebuild(board, view).ok()?;
        let tile = Self::least_risky_tile(&constraints, self.accept)?;
        Some(coords_of(tile, view.size()))
    }

    fn least_risky_tile(constraints: &ConstraintView, accept: f64) -> Option<usize> {
        if constraints.is_empty() {
            return None;
        }

        let mut risk: hashbrown::HashMap<usize, f64> = hashbrown::HashMap::new();
        for constraint in constraints.iter() {
            let p = f64::from(constraint.mines) / constraint.tiles.len() as f64;
            for tile in constraint.tiles.iter() {
                let entry = risk.entry(tile).or_insert(0.0);
                if p > *entry {
                    *entry = p;
                }
            }
        }

        let (&tile, &p) = risk.iter().min_by(|(_, a), (_, b)| a.total_cmp(b))?;
        (p < accept).then_some(tile)
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
    fn corner_preference_wins_over_every_policy() {
        let board = Board::construct(level(4, 4, 0), &[]).unwrap();
        let view = PlayerView::new((4, 4));
        let counters = PlayerCounters::new(0);

        for policy in [GuessPolicy::First, GuessPolicy::Random, GuessPolicy::Corner, GuessPolicy::Min] {
            let mut guesser = Guesser::new(policy, 0.3, 1);
            let guess = guesser.pick(&board, &view, &counters).unwrap();
            assert_eq!(guess.coords, (0, 0));
            assert_eq!(guess.label, GuessLabel::Corner);
        }
    }

    #[test]
    fn first_policy_scans_row_major_once_corners_are_gone() {
        let board = Board::construct(level(3, 3, 0), &[]).unwrap();
        let mut view = PlayerView::new((3, 3));
        for corner in [(0, 0), (2, 2), (0, 2), (2, 0)] {
            view.flag(corner);
        }
        let counters = PlayerCounters::new(0);

        let mut guesser = Guesser::new(GuessPolicy::First, 0.3, 1);
        let guess = guesser.pick(&board, &view, &counters).unwrap();
        assert_eq!(guess.coords, (1, 0));
        assert_eq!(guess.label, GuessLabel::First);
    }

    #[test]
    fn min_policy_prefers_the_lowest_risk_constrained_tile() {
        // ({a,b}, 1) => p=0.5 each; ({c,d,e}, 1) => p=0.33 each; with
        // accept=0.4 only c, d, or e clears the threshold.
        let mut constraints = ConstraintView::new();
        constraints.upsert(crate::index_set::IndexSet::from_iter([0, 1]), 1);
        constraints.upsert(crate::index_set::IndexSet::from_iter([2, 3, 4]), 1);

        let tile = Guesser::least_risky_tile(&constraints, 0.4).unwrap();
        assert!([2, 3, 4].contains(&tile));
    }

    #[test]
    fn min_policy_defers_when_every_tile_is_too_risky() {
        let mut constraints = ConstraintView::new();
        constraints.upsert(crate::index_set::IndexSet::from_iter([0, 1]), 1);
        assert_eq!(Guesser::least_risky_tile(&constraints, 0.4), None);
    }
}
