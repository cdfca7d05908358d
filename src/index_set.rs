use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

use smallvec::SmallVec;

/// Most clue neighbourhoods hold at most 8 tiles; inline storage covers the
/// common case and only spills to the heap for isle-sized sets.
type Inner = SmallVec<[usize; 8]>;

/// An ordered set of tile indices with the set algebra the [`Deducer`] and
/// [`IsleSolver`] need: union, intersection, difference, and proper
/// containment. Content-hashed (not insertion-order or identity-keyed) so it
/// can key a [`hashbrown::HashMap`] the way `ConstraintView` does.
///
/// [`Deducer`]: crate::deducer::Deducer
/// [`IsleSolver`]: crate::isle::IsleSolver
#[derive(Clone, Debug, Default, Eq)]
pub struct IndexSet(Inner);

impl IndexSet {
    pub fn new() -> Self {
        Self(Inner::new())
    }

    pub fn from_iter(iter: impl IntoIterator<Item = usize>) -> Self {
        let mut items: Inner = iter.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: usize) -> bool {
        self.0.binary_search(&value).is_ok()
    }

    pub fn insert(&mut self, value: usize) -> bool {
        match self.0.binary_search(&value) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, value);
                true
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.0.iter().copied().collect()
    }

    /// `self \ other`.
    pub fn difference(&self, other: &Self) -> Self {
        Self::from_iter(self.iter().filter(|v| !other.contains(*v)))
    }

    pub fn intersection(&self, other: &Self) -> Self {
        Self::from_iter(self.iter().filter(|v| other.contains(*v)))
    }

    pub fn union(&self, other: &Self) -> Self {
        Self::from_iter(self.iter().chain(other.iter()))
    }

    /// `self` is a strict subset of `other`: every element of `self` is in
    /// `other`, and `self != other`.
    pub fn is_proper_subset_of(&self, other: &Self) -> bool {
        self.len() < other.len() && self.iter().all(|v| other.contains(v))
    }

    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.iter().all(|v| other.contains(v))
    }
}

impl PartialEq for IndexSet {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Hash for IndexSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // sorted contents -> stable hash independent of insertion order
        self.0.len().hash(state);
        for value in &self.0 {
            value.hash(state);
        }
    }
}

impl FromIterator<usize> for IndexSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        IndexSet::from_iter(iter)
    }
}
