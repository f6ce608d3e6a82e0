//! Integration scenarios for the worklist fixpoint engine (§4.5, §8 scenarios 5-6).

mod common;

use wsks_core::core::cache::{SubsumedByCache, SubsumptionCache};
use wsks_core::core::metrics::Metrics;
use wsks_core::core::term::{SubsumptionContext, TermKind};
use wsks_core::decide;

fn context<'a>(
  cache: &'a SubsumptionCache,
  subsumed_by_cache: &'a SubsumedByCache,
  metrics: &'a Metrics,
) -> SubsumptionContext<'a> {
  SubsumptionContext { cache, subsumed_by_cache, metrics, depth_limit: 64, unfold_all: false }
}

/// §8 scenario 5: "Fixpoint seeded with BASE({q0}), alphabet {σ}, base_aut such that δ(q0,σ)={q0}: after one step,
/// one member added then found subsumed; `fully_computed` after ≤2 steps, `b_value = epsilon(q0)`."
#[test]
fn self_looping_automaton_saturates_in_at_most_two_steps() {
  let (_owner, root) = common::build_root(true, None);
  let cache = SubsumptionCache::new();
  let subsumed_by_cache = SubsumedByCache::new();
  let metrics = Metrics::new();
  let ctx = context(&cache, &subsumed_by_cache, &metrics);

  let decision = decide(&root, &ctx).expect("decide must not fail against a well-formed automaton");

  assert!(decision.satisfiable, "b_value should mirror epsilon(q0) = true");
  assert!(decision.sat_term.is_some(), "UNGROUND_ROOT search should record a satisfying witness");

  let TermKind::Fixpoint(fixpoint) = root.kind() else { panic!("root must be a FIXPOINT term") };
  assert!(fixpoint.fully_computed());
  assert_eq!(fixpoint.member_count(), 1, "the self-loop's successor is subsumed by the seed, not added again");
}

/// The complement case: `epsilon_accepts = false` aggregates to `b_value = false` under disjunction.
#[test]
fn self_looping_automaton_reports_unsat_when_epsilon_rejects() {
  let (_owner, root) = common::build_root(false, None);
  let cache = SubsumptionCache::new();
  let subsumed_by_cache = SubsumedByCache::new();
  let metrics = Metrics::new();
  let ctx = context(&cache, &subsumed_by_cache, &metrics);

  let decision = decide(&root, &ctx).expect("decide must not fail");
  assert!(!decision.satisfiable);
}

/// §8 scenario 6: "Guide returns THROW for every symbol: worklist empties in one step, fixpoint contains only the
/// seed."
#[test]
fn throw_guide_empties_the_worklist_in_one_step() {
  let (_owner, root) = common::build_root(true, Some(Box::new(common::ThrowGuide)));
  let cache = SubsumptionCache::new();
  let subsumed_by_cache = SubsumedByCache::new();
  let metrics = Metrics::new();
  let ctx = context(&cache, &subsumed_by_cache, &metrics);

  let decision = decide(&root, &ctx).expect("decide must not fail");
  assert!(decision.satisfiable);

  let TermKind::Fixpoint(fixpoint) = root.kind() else { panic!("root must be a FIXPOINT term") };
  assert!(fixpoint.fully_computed());
  assert_eq!(fixpoint.member_count(), 1, "THROW discards every fan-out candidate, leaving only the seed's result");
}

/// §8 invariant 5: "For a fully-computed FIXPOINT `f`, running another `compute_next_fixpoint` does not modify
/// `members` nor changes `b_value`." `decide` already loops until `fully_computed()`, so calling it twice is the
/// most direct way to exercise the no-op.
#[test]
fn deciding_an_already_computed_fixpoint_is_idempotent() {
  let (_owner, root) = common::build_root(true, None);
  let cache = SubsumptionCache::new();
  let subsumed_by_cache = SubsumedByCache::new();
  let metrics = Metrics::new();
  let ctx = context(&cache, &subsumed_by_cache, &metrics);

  let first = decide(&root, &ctx).expect("first decide must not fail");
  let second = decide(&root, &ctx).expect("second decide against an already-computed fixpoint must not fail");

  assert_eq!(first.satisfiable, second.satisfiable);
  let TermKind::Fixpoint(fixpoint) = root.kind() else { panic!("root must be a FIXPOINT term") };
  assert_eq!(fixpoint.member_count(), 1);
}
