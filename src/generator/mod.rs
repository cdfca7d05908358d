//! Benchmark-case mine generation. Not part of the solver engine proper: the
//! Deducer/IsleSolver/Guesser only ever consume an explicit mine index list,
//! but the benchmark harness needs a way to produce one, seeded and without
//! replacement, excluding the initial click.

use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::LevelConfig;
use crate::types::linear_index;
use crate::Coord2;

pub trait MineGenerator {
    /// Produces `level.mines` distinct row-major tile indices, guaranteed to
    /// exclude `safe`. Panics if `level.mines` exceeds the number of tiles
    /// available once `safe` is excluded, a misconfigured level, not a
    /// runtime condition the generator should paper over.
    fn generate(&mut self, level: LevelConfig, safe: Coord2) -> Vec<usize>;
}

/// Seeded uniform generator: draws a random index among the tiles not yet
/// placed, walks the tile slice counting already-placed mines to locate the
/// `n`th free slot. This avoids materializing and shrinking a candidate
/// list, a scheme whose shrink step is easy to get wrong (a discarded
/// shrunk slice produces biased, possibly-repeated draws).
pub struct RandomMineGenerator {
    rng: SmallRng,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&mut self, level: LevelConfig, safe: Coord2) -> Vec<usize> {
        let total = level.total_tiles() as usize;
        let safe_index = linear_index(safe, (level.cols, level.rows));

        let mut is_mine = alloc::vec![false; total];
        let mut free_tiles = total - 1;
        let mut placed = 0usize;

        while placed < level.mines as usize {
            if free_tiles == 0 {
                break;
            }
            let mut draw = self.rng.random_range(0..free_tiles);
            for (index, mine) in is_mine.iter_mut().enumerate() {
                if index == safe_index || *mine {
                    continue;
                }
                if draw == 0 {
                    *mine = true;
                    placed += 1;
                    free_tiles -= 1;
                    break;
                }
                draw -= 1;
            }
        }

        is_mine
            .into_iter()
            .enumerate()
            .filter_map(|(index, mine)| mine.then_some(index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_the_configured_mine_count_excluding_the_safe_tile() {
        let level = LevelConfig { rows: 9, cols: 9, mines: 10 };
        let mut generator = RandomMineGenerator::new(42);
        let mines = generator.generate(level, (0, 0));

        assert_eq!(mines.len(), 10);
        assert!(!mines.contains(&0));
        let mut sorted = mines.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), mines.len(), "mine indices must be distinct");
    }

    #[test]
    fn is_deterministic_for_a_fixed_seed() {
        let level = LevelConfig { rows: 5, cols: 5, mines: 5 };
        let mut a = RandomMineGenerator::new(7);
        let mut b = RandomMineGenerator::new(7);
        assert_eq!(a.generate(level, (0, 0)), b.generate(level, (0, 0)));
    }
}
