use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::board::Board;
use crate::index_set::IndexSet;
use crate::player_view::{PlayerView, TileState};
use crate::{CellCount, Coord2};

/// "Exactly `mines` of the tiles in `tiles` are mines." Built for every
/// revealed `Number` tile with a positive value; constraints with an empty
/// `tiles` set are never constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub tiles: IndexSet,
    pub mines: CellCount,
}

impl Constraint {
    pub fn is_trivially_safe(&self) -> bool {
        self.mines == 0
    }

    pub fn is_trivially_mined(&self) -> bool {
        self.mines as usize == self.tiles.len()
    }
}

/// The collection of [`Constraint`]s derived from the currently revealed
/// numbers. Two constraints are equal iff their tile sets are equal as sets;
/// construction deduplicates by that equality, keeping one `(tiles, mines)`
/// entry per distinct set.
#[derive(Clone, Debug, Default)]
pub struct ConstraintView {
    // keyed by the tile set so Rule D's "does this derived set already
    // exist" check and dedup are both O(1) average instead of a linear scan.
    by_tiles: HashMap<IndexSet, CellCount>,
}

impl ConstraintView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the view from the current `PlayerView`. Returns an error if
    /// any clue's derived target mine count would be negative (more flagged
    /// neighbours than the clue's own value), an inconsistent state that
    /// indicates a bug upstream, not a reachable game position.
    pub fn rebuild(board: &Board, view: &PlayerView) -> crate::Result<Self> {
        let mut constraints = Self::new();
        let size = board.size();

        for y in 0..size.1 {
            for x in 0..size.0 {
                let coords = (x, y);
                let TileState::Number(value) = view.state_at(coords) else {
                    continue;
                };
                if value == 0 {
                    continue;
                }

                let mut flagged = 0i16;
                let mut unknown = Vec::new();
                for neighbor in board.iter_neighbors(coords) {
                    match view.state_at(neighbor) {
                        TileState::Flag => flagged += 1,
                        TileState::Unknown => unknown.push(crate::types::linear_index(neighbor, size)),
                        _ => {}
                    }
                }

                if unknown.is_empty() {
                    continue;
                }

                let target = i16::from(value) - flagged;
                if target < 0 {
                    return Err(crate::GameError::InconsistentConstraint { clue: coords });
                }

                constraints.upsert(IndexSet::from_iter(unknown), target as CellCount);
            }
        }

        Ok(constraints)
    }

    /// Inserts or overrides a constraint by set identity. A later call with
    /// the same tile set replaces the earlier `mines` value: Rule D's
    /// sharpening semantics, the tighter derived constraint always wins (see
    /// DESIGN.md).
    pub fn upsert(&mut self, tiles: IndexSet, mines: CellCount) {
        self.by_tiles.insert(tiles, mines);
    }

    pub fn get(&self, tiles: &IndexSet) -> Option<CellCount> {
        self.by_tiles.get(tiles).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Constraint> + '_ {
        self.by_tiles.iter().map(|(tiles, &mines)| Constraint {
            tiles: tiles.clone(),
            mines,
        })
    }

    pub fn len(&self) -> usize {
        self.by_tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tiles.is_empty()
    }
}
