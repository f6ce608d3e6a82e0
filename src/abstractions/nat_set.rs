/*!

`NatSet` is an ordered set of small natural numbers, backed by [`bit_set::BitSet`]. It is used wherever the engine
needs a strictly sorted, deduplicated collection of small integers: `BASE` term state sets, non-occurring variable
sets, and projected-track index sets.

Iteration order is always increasing, which is what gives `BASE` terms their "strictly sorted, de-duplicated"
invariant for free.

*/

use std::fmt::{Debug, Formatter};
use bit_set::BitSet;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct NatSet(BitSet);

impl NatSet {
  pub fn new() -> Self {
    NatSet(BitSet::new())
  }

  pub fn from_iter(iter: impl IntoIterator<Item = usize>) -> Self {
    let mut set = BitSet::new();
    for i in iter {
      set.insert(i);
    }
    NatSet(set)
  }

  pub fn insert(&mut self, value: usize) -> bool {
    self.0.insert(value)
  }

  pub fn contains(&self, value: usize) -> bool {
    self.0.contains(value)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
    self.0.iter()
  }

  /// Is `self` a subset of `other`?
  pub fn is_subset_of(&self, other: &NatSet) -> bool {
    self.0.is_subset(&other.0)
  }

  /// `self \ other`, i.e. the elements of `self` not in `other`.
  pub fn difference(&self, other: &NatSet) -> NatSet {
    let mut result = self.0.clone();
    result.difference_with(&other.0);
    NatSet(result)
  }
}

impl Debug for NatSet {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_set().entries(self.0.iter()).finish()
  }
}

impl FromIterator<usize> for NatSet {
  fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
    NatSet::from_iter(iter)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn subset_and_difference() {
    let a = NatSet::from_iter([1usize, 2, 5]);
    let b = NatSet::from_iter([1usize, 2, 3]);

    assert!(!a.is_subset_of(&b));
    let diff = a.difference(&b);
    assert_eq!(diff.iter().collect::<Vec<_>>(), vec![5]);

    let c = NatSet::from_iter([1usize, 2, 3, 4]);
    let d = NatSet::from_iter([1usize, 2, 3]);
    assert!(d.is_subset_of(&c));
  }

  #[test]
  fn dedup_and_sorted_iteration() {
    let s = NatSet::from_iter([3usize, 1, 2, 1, 3]);
    assert_eq!(s.len(), 3);
    assert_eq!(s.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
  }
}
