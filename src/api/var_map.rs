/*!

The variable-to-track mapping (§1 "Symbol (track) construction and the variable-to-track mapping" is an external
collaborator). The core only ever reads it via `VarMap[ident]`; construction belongs to the front-end.

*/

use std::collections::HashMap;

use super::symbol::{Ident, TrackIndex};

/// A read-only mapping from bound-variable identifier to its track index. A thin `HashMap` newtype, not a trait:
/// the mapping carries no behavior the core needs to abstract over, unlike `BaseAutomaton`/`SymbolWorkshop`.
#[derive(Clone, Debug, Default)]
pub struct VarMap {
  tracks: HashMap<Ident, TrackIndex>,
}

impl VarMap {
  pub fn new() -> Self {
    VarMap { tracks: HashMap::new() }
  }

  pub fn insert(&mut self, var: Ident, track: TrackIndex) -> Option<TrackIndex> {
    self.tracks.insert(var, track)
  }

  pub fn get(&self, var: &Ident) -> Option<TrackIndex> {
    self.tracks.get(var).copied()
  }

  pub fn contains(&self, var: &Ident) -> bool {
    self.tracks.contains_key(var)
  }

  pub fn len(&self) -> usize {
    self.tracks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tracks.is_empty()
  }
}

impl std::ops::Index<&Ident> for VarMap {
  type Output = TrackIndex;

  fn index(&self, var: &Ident) -> &TrackIndex {
    self.tracks.get(var).expect("variable not present in VarMap")
  }
}
