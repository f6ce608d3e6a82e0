/*!

Measurement-only counters, grounded on the source's global counters (`TermFixpoint::subsumedByHits`,
`TermContinuation::continuationUnfolding`, `Term::partial_subsumption_hits`,
`TermFixpoint::fullyComputedFixpoints`). §9: "Global counters in the source ... are measurement-only and belong in a
pluggable metrics struct; they must not affect semantics." Every increment method takes `&self`, not `&mut self`,
because the struct is shared by reference across the whole evaluator and nothing about its state should require
exclusive access.

*/

use std::cell::Cell;

#[derive(Default)]
pub struct Metrics {
  subsumed_by_hits: Cell<u64>,
  continuation_unfoldings: Cell<u64>,
  partial_subsumption_hits: Cell<u64>,
  fully_computed_fixpoints: Cell<u64>,
  cache_hits: Cell<u64>,
  cache_misses: Cell<u64>,
}

impl Metrics {
  pub fn new() -> Self {
    Metrics::default()
  }

  pub fn record_subsumed_by_hit(&self) {
    self.subsumed_by_hits.set(self.subsumed_by_hits.get() + 1);
  }

  pub fn record_continuation_unfolding(&self) {
    self.continuation_unfoldings.set(self.continuation_unfoldings.get() + 1);
  }

  pub fn record_partial_subsumption_hit(&self) {
    self.partial_subsumption_hits.set(self.partial_subsumption_hits.get() + 1);
  }

  pub fn record_fully_computed_fixpoint(&self) {
    self.fully_computed_fixpoints.set(self.fully_computed_fixpoints.get() + 1);
  }

  pub fn record_cache_hit(&self) {
    self.cache_hits.set(self.cache_hits.get() + 1);
  }

  pub fn record_cache_miss(&self) {
    self.cache_misses.set(self.cache_misses.get() + 1);
  }

  pub fn subsumed_by_hits(&self) -> u64 {
    self.subsumed_by_hits.get()
  }

  pub fn continuation_unfoldings(&self) -> u64 {
    self.continuation_unfoldings.get()
  }

  pub fn partial_subsumption_hits(&self) -> u64 {
    self.partial_subsumption_hits.get()
  }

  pub fn fully_computed_fixpoints(&self) -> u64 {
    self.fully_computed_fixpoints.get()
  }

  pub fn cache_hits(&self) -> u64 {
    self.cache_hits.get()
  }

  pub fn cache_misses(&self) -> u64 {
    self.cache_misses.get()
  }
}
