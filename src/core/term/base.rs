/*!

`BASE` terms: an ordered, non-empty, de-duplicated set of atomic base-automaton state ids (§3). `NatSet` already
gives sorted, de-duplicated iteration for free, so the invariant falls out of the representation rather than
needing to be checked.

*/

use crate::abstractions::NatSet;
use crate::api::StateId;

/// The payload of a `TermKind::Base` variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseTerm {
  states: NatSet,
}

impl BaseTerm {
  /// Builds a `BASE` term from state ids. The caller is responsible for not calling this with an empty set outside
  /// of the workshop's `EMPTY` singleton (§3 "invariant: non-empty").
  pub fn new(states: impl IntoIterator<Item = StateId>) -> Self {
    BaseTerm { states: NatSet::from_iter(states.into_iter().map(|s| s as usize)) }
  }

  pub fn from_nat_set(states: NatSet) -> Self {
    BaseTerm { states }
  }

  pub fn is_empty(&self) -> bool {
    self.states.is_empty()
  }

  pub fn len(&self) -> usize {
    self.states.len()
  }

  pub fn contains(&self, state: StateId) -> bool {
    self.states.contains(state as usize)
  }

  pub fn states(&self) -> &NatSet {
    &self.states
  }

  pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
    self.states.iter().map(|s| s as StateId)
  }

  /// `self ⊆ other` as ordered sets (§4.3 "BASE ⊆ BASE = ordered-set subset").
  pub fn is_subset_of(&self, other: &BaseTerm) -> bool {
    self.states.is_subset_of(&other.states)
  }

  /// `self \ other`, used to build the residual of a `PARTIAL` subsumption result.
  pub fn difference(&self, other: &BaseTerm) -> BaseTerm {
    BaseTerm { states: self.states.difference(&other.states) }
  }
}
