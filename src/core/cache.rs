/*!

Memoization of subsumption queries, keyed by term identity (§2 "Caches", §4.3 step 5). A cache never stores `NO`
results (§4.3 step 7: "NO is cheap to re-derive and keeping it would bloat caches").

Caches are owned per automaton node alongside the [`super::workshop::TermWorkshop`] that produces the terms they
key on, not per term — a term carries no cache of its own.

*/

use std::cell::RefCell;
use std::collections::HashMap;

use super::SubsumptionResult;

/// `(a_id, b_id) -> is_subsumed(a, b)` result, where the ids are `Rc::as_ptr`-derived identities.
#[derive(Default)]
pub struct SubsumptionCache {
  entries: RefCell<HashMap<(usize, usize), SubsumptionResult>>,
}

impl SubsumptionCache {
  pub fn new() -> Self {
    SubsumptionCache::default()
  }

  pub fn get(&self, key: (usize, usize)) -> Option<SubsumptionResult> {
    self.entries.borrow().get(&key).cloned()
  }

  pub fn insert(&self, key: (usize, usize), result: SubsumptionResult) {
    debug_assert!(!result.is_no(), "NO results must never be cached (§4.3 step 7)");
    self.entries.borrow_mut().insert(key, result);
  }

  pub fn len(&self) -> usize {
    self.entries.borrow().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.borrow().is_empty()
  }

  pub fn clear(&self) {
    self.entries.borrow_mut().clear();
  }
}

/// `(term_id, fixpoint_id) -> is_subsumed_by(term, fixpoint)` result. Kept separate from [`SubsumptionCache`]
/// because a fixpoint mutates (members grow, get pruned) in ways a plain term never does, so its cache entries
/// need to be invalidated independently.
#[derive(Default)]
pub struct SubsumedByCache {
  entries: RefCell<HashMap<(usize, usize), SubsumptionResult>>,
}

impl SubsumedByCache {
  pub fn new() -> Self {
    SubsumedByCache::default()
  }

  pub fn get(&self, key: (usize, usize)) -> Option<SubsumptionResult> {
    self.entries.borrow().get(&key).cloned()
  }

  pub fn insert(&self, key: (usize, usize), result: SubsumptionResult) {
    debug_assert!(!result.is_no(), "NO results must never be cached (§4.3 step 7)");
    self.entries.borrow_mut().insert(key, result);
  }

  /// Drops every cached entry that mentions `fixpoint_id`, used after a fixpoint prunes dead members and its
  /// previously-cached answers may no longer hold.
  pub fn invalidate_fixpoint(&self, fixpoint_id: usize) {
    self.entries.borrow_mut().retain(|&(_, fid), _| fid != fixpoint_id);
  }
}
