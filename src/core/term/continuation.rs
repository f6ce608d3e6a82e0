/*!

`CONTINUATION` terms: a suspended `intersect_nonempty` call (§4.4). A continuation is created instead of eagerly
calling the base automaton so that products of continuations can be compared structurally (by `(source, symbol)`)
without forcing the (potentially expensive) transition computation.

*/

use std::rc::Weak;

use crate::abstractions::OnceSlot;
use crate::api::{ProjectionAutomaton, Symbol};
use crate::core::error::CoreResult;
use crate::core::metrics::Metrics;

use super::TermPtr;

/// Resolves the real `(target automaton, source term)` pair for a continuation just before it unfolds, used by the
/// lazy-initialization path of §4.4 ("if `lazy_init_aut` is set, first ask it for `(aut, term)` before
/// computing").
pub trait LazyAutomatonInit {
  fn resolve(&self) -> (Weak<dyn ProjectionAutomaton>, TermPtr);
}

pub struct ContinuationTerm {
  target_aut: Weak<dyn ProjectionAutomaton>,
  source_term: TermPtr,
  symbol: Symbol,
  complement: bool,
  lazy_init_aut: Option<std::rc::Rc<dyn LazyAutomatonInit>>,
  unfolded: OnceSlot<TermPtr>,
}

impl ContinuationTerm {
  pub fn new(
    target_aut: Weak<dyn ProjectionAutomaton>,
    source_term: TermPtr,
    symbol: Symbol,
    complement: bool,
  ) -> Self {
    ContinuationTerm {
      target_aut,
      source_term,
      symbol,
      complement,
      lazy_init_aut: None,
      unfolded: OnceSlot::new(),
    }
  }

  pub fn with_lazy_init(mut self, lazy_init: std::rc::Rc<dyn LazyAutomatonInit>) -> Self {
    self.lazy_init_aut = Some(lazy_init);
    self
  }

  pub fn source_term(&self) -> &TermPtr {
    &self.source_term
  }

  pub fn symbol(&self) -> &Symbol {
    &self.symbol
  }

  pub fn complement(&self) -> bool {
    self.complement
  }

  pub fn is_unfolded(&self) -> bool {
    self.unfolded.is_set()
  }

  /// Evaluates the postponed `intersect_nonempty(symbol, source_term, complement)` call, memoizing the result.
  /// Idempotent: a second call returns the same handle without recomputing (§4.4 "Unfolding is single-assignment
  /// and idempotent").
  pub fn unfold(&self, metrics: &Metrics) -> CoreResult<TermPtr> {
    if let Some(term) = self.unfolded.get() {
      return Ok(term);
    }

    let (target_aut, source_term) = match &self.lazy_init_aut {
      Some(lazy) => lazy.resolve(),
      None => (self.target_aut.clone(), self.source_term.clone()),
    };

    let aut = target_aut
      .upgrade()
      .expect("continuation's target automaton was dropped before it was unfolded");

    let (result_term, _epsilon_accepts) =
      aut.base().intersect_nonempty(&self.symbol, &source_term, self.complement)?;

    metrics.record_continuation_unfolding();
    self.unfolded.set_or_check(result_term.clone());
    Ok(result_term)
  }
}

impl ContinuationTerm {
  /// Equality per §4.4: pre-unfold compares `(source, symbol)`, post-unfold compares the unfolded results. Not a
  /// `PartialEq` impl because it needs no `Eq`/`Hash` counterpart — nothing hashes a bare `ContinuationTerm`,
  /// only the owning `TermNode` by pointer identity.
  pub fn semantically_equal(&self, other: &ContinuationTerm) -> bool {
    match (self.unfolded.get(), other.unfolded.get()) {
      (Some(a), Some(b)) => std::rc::Rc::ptr_eq(&a, &b),
      _ => std::rc::Rc::ptr_eq(&self.source_term, &other.source_term) && self.symbol == other.symbol,
    }
  }
}

impl std::fmt::Debug for ContinuationTerm {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ContinuationTerm")
      .field("symbol", &self.symbol)
      .field("complement", &self.complement)
      .field("unfolded", &self.unfolded.is_set())
      .finish()
  }
}
