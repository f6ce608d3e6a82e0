/*!

The thinnest possible entry point the core exposes to its driver (§6 "The core exposes to the driver: `decide
(root_aut)` loops..."). Everything that assembles a formula into an automaton product, seeds the root `FIXPOINT`,
and reports SAT/UNSAT to a user is the driver's job and stays out of this crate (§1 "The top-level decision driver
... is out of scope"); `decide` only knows how to drain an already-seeded root fixpoint to completion and read off
the result.

*/

use crate::core::error::CoreResult;
use crate::core::term::fixpoint::compute_next_fixpoint;
use crate::core::term::{SubsumptionContext, TermKind, TermPtr};

/// The outcome of draining a root `FIXPOINT` term to completion.
#[derive(Clone, Debug)]
pub struct Decision {
  /// The root fixpoint's aggregated boolean (§4.5 `b_value`).
  pub satisfiable: bool,
  /// A satisfying witness, present only when `root_fixpoint` ran in `UNGROUND_ROOT` search mode and one was seen.
  pub sat_term: Option<TermPtr>,
  /// An unsatisfying witness, present only when `root_fixpoint` ran in `UNGROUND_ROOT` search mode and one was seen.
  pub unsat_term: Option<TermPtr>,
}

/// Drains `root_fixpoint` one saturation step at a time until `fully_computed()`, then reports the decision (§6
/// "while `!root_fixpoint.fully_computed()` call `compute_next_fixpoint()`; return `root_fixpoint.b_value`
/// together with `(sat_term, unsat_term)`").
///
/// `root_fixpoint` must wrap a `FIXPOINT` term, built and seeded by the driver — passing anything else is a
/// precondition violation.
pub fn decide(root_fixpoint: &TermPtr, ctx: &SubsumptionContext) -> CoreResult<Decision> {
  let fixpoint = match root_fixpoint.kind() {
    TermKind::Fixpoint(f) => f,
    _ => {
      crate::critical!("decide() requires a FIXPOINT term");
      panic!("decide() requires a FIXPOINT term");
    }
  };

  while !fixpoint.fully_computed() {
    crate::trace!("decide(): draining one saturation step");
    compute_next_fixpoint(root_fixpoint, fixpoint, ctx)?;
  }
  fixpoint.remove_subsumed();

  crate::debug!("decide(): fully computed, b_value={}", fixpoint.b_value());

  Ok(Decision { satisfiable: fixpoint.b_value(), sat_term: fixpoint.sat_term(), unsat_term: fixpoint.unsat_term() })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::cache::{SubsumedByCache, SubsumptionCache};
  use crate::core::metrics::Metrics;
  use crate::core::term::TermNode;

  /// Exercising `decide` against a live saturation loop needs a real `BaseAutomaton`/`ProjectionAutomaton` pair;
  /// that scenario is covered by the `tests/fixpoint.rs` integration suite. This unit test only covers the
  /// precondition `decide` itself enforces.
  #[test]
  fn decide_rejects_a_non_fixpoint_term() {
    let cache = SubsumptionCache::new();
    let subsumed_by_cache = SubsumedByCache::new();
    let metrics = Metrics::new();
    let context = SubsumptionContext {
      cache: &cache,
      subsumed_by_cache: &subsumed_by_cache,
      metrics: &metrics,
      depth_limit: 64,
      unfold_all: false,
    };
    let not_a_fixpoint = TermNode::new_empty(false);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| decide(&not_a_fixpoint, &context)));
    assert!(result.is_err());
  }
}
