/*!

The `Term` algebra (§3, §4.1): tagged, lazily-evaluated automaton state sets. The eight kinds named in §3 are a
closed sum — `TermKind` — dispatched by exhaustive `match`, never by virtual calls, matching the "Design Notes"
(§9 "Virtual calls in the source ... become exhaustive matches").

A term is shared as `Rc<TermNode>` (`TermPtr`); see SPEC_FULL.md's "Rust realization of ownership" for why `Rc`
rather than the teacher's GC arena is the proportionate choice here.

*/

pub mod base;
pub mod continuation;
pub mod fixpoint;
pub mod product;

use std::rc::{Rc, Weak};

use crate::abstractions::OnceSlot;
use crate::api::{ProjectionAutomaton, Symbol};
use crate::core::cache::{SubsumedByCache, SubsumptionCache};
use crate::core::error::CoreResult;
use crate::core::metrics::Metrics;
use crate::core::{ProductKind, SubsumptionResult};

use base::BaseTerm;
use continuation::ContinuationTerm;
use fixpoint::FixpointTerm;
use product::{NaryTerm, ProductTerm, TernaryTerm};

/// A shared handle to a term node. `Rc` rather than a raw pointer into a GC arena: terms are comparatively few and
/// long-lived for a decision run, and §9 explicitly sanctions sharing the strong handle.
pub type TermPtr = Rc<TermNode>;

/// The witness chain used for counter-example reconstruction (§3 `link`). Forms a DAG, never a cycle, because
/// successor paths strictly decrease in symbol-path length (§9).
#[derive(Clone, PartialEq)]
pub struct Link {
  pub successor: TermPtr,
  pub symbol: Symbol,
  pub path_length: usize,
}

/// The eight term kinds of §3, as a closed sum.
pub enum TermKind {
  Empty,
  Base(BaseTerm),
  Product(ProductTerm),
  Ternary(TernaryTerm),
  Nary(NaryTerm),
  List(Vec<TermPtr>),
  Continuation(ContinuationTerm),
  Fixpoint(FixpointTerm),
}

/// A term node. Every term carries the common fields of §3's table; the kind-specific payload lives in
/// [`TermKind`].
pub struct TermNode {
  /// Weak back-reference to the owning automaton node; never owning (§3).
  aut: Weak<dyn ProjectionAutomaton>,
  kind: TermKind,
  complement_flag: std::cell::Cell<bool>,
  state_space_approx: u64,
  link: OnceSlot<Link>,
}

impl TermNode {
  fn new(aut: Weak<dyn ProjectionAutomaton>, kind: TermKind, complement: bool, approx: u64) -> TermPtr {
    Rc::new(TermNode {
      aut,
      kind,
      complement_flag: std::cell::Cell::new(complement),
      state_space_approx: approx,
      link: OnceSlot::new(),
    })
  }

  /// Raw constructor for an `EMPTY` term, bypassing the workshop's singleton cache. Prefer
  /// [`crate::core::workshop::TermWorkshop::empty`]/`universe` outside of tests — this exists so tests and the
  /// workshop itself have something to build the singleton from.
  pub fn new_empty(complement: bool) -> TermPtr {
    TermNode::new(crate::api::no_automaton(), TermKind::Empty, complement, 0)
  }

  pub fn new_base(aut: Weak<dyn ProjectionAutomaton>, base: BaseTerm) -> TermPtr {
    let approx = base.len() as u64;
    TermNode::new(aut, TermKind::Base(base), false, approx)
  }

  pub fn new_product(aut: Weak<dyn ProjectionAutomaton>, kind: ProductKind, left: TermPtr, right: TermPtr) -> TermPtr {
    let approx = left.state_space_approx() + right.state_space_approx() + 1;
    TermNode::new(aut, TermKind::Product(ProductTerm::new(kind, left, right)), false, approx)
  }

  pub fn new_ternary(
    aut: Weak<dyn ProjectionAutomaton>,
    kind: ProductKind,
    left: TermPtr,
    middle: TermPtr,
    right: TermPtr,
  ) -> TermPtr {
    let approx = left.state_space_approx() + middle.state_space_approx() + right.state_space_approx() + 1;
    TermNode::new(aut, TermKind::Ternary(TernaryTerm::new(kind, left, middle, right)), false, approx)
  }

  pub fn new_nary(aut: Weak<dyn ProjectionAutomaton>, kind: ProductKind, children: Vec<TermPtr>) -> TermPtr {
    let approx: u64 = children.iter().map(|c| c.state_space_approx()).sum::<u64>() + 1;
    TermNode::new(aut, TermKind::Nary(NaryTerm::new(kind, children)), false, approx)
  }

  pub fn new_list(aut: Weak<dyn ProjectionAutomaton>, members: Vec<TermPtr>) -> TermPtr {
    let approx: u64 = members.iter().map(|m| m.state_space_approx()).sum();
    TermNode::new(aut, TermKind::List(members), false, approx)
  }

  pub fn new_continuation(
    aut: Weak<dyn ProjectionAutomaton>,
    target_aut: Weak<dyn ProjectionAutomaton>,
    source_term: TermPtr,
    symbol: Symbol,
    complement: bool,
  ) -> TermPtr {
    let continuation = ContinuationTerm::new(target_aut, source_term.clone(), symbol, complement);
    let approx = source_term.state_space_approx();
    TermNode::new(aut, TermKind::Continuation(continuation), false, approx)
  }

  pub fn new_fixpoint(aut: Weak<dyn ProjectionAutomaton>, fixpoint: FixpointTerm) -> TermPtr {
    TermNode::new(aut, TermKind::Fixpoint(fixpoint), false, 0)
  }

  pub fn kind(&self) -> &TermKind {
    &self.kind
  }

  pub fn owning_automaton(&self) -> Option<Rc<dyn ProjectionAutomaton>> {
    self.aut.upgrade()
  }

  pub fn is_complemented(&self) -> bool {
    self.complement_flag.get()
  }

  pub fn state_space_approx(&self) -> u64 {
    self.state_space_approx
  }

  pub fn link(&self) -> Option<Link> {
    self.link.get()
  }

  // --- §4.1 operations -----------------------------------------------------------------------------------------

  /// Structural emptiness (§4.1 `is_empty()`).
  pub fn is_empty(&self) -> bool {
    match &self.kind {
      TermKind::Empty => !self.is_complemented(),
      TermKind::Base(base) => base.is_empty(),
      TermKind::Product(p) => p.is_empty(),
      TermKind::Ternary(t) => t.is_empty(),
      TermKind::Nary(n) => n.is_empty(),
      TermKind::List(members) => members.is_empty() || members.iter().all(|m| m.is_empty()),
      TermKind::Continuation(_) => {
        crate::critical!("is_empty() called on an un-unfolded CONTINUATION");
        panic!("CONTINUATION must be unfolded before querying emptiness");
      }
      TermKind::Fixpoint(f) => f.is_empty(),
    }
  }

  /// Exact size, summed recursively (§4.1 `measure_state_space()`); `BASE` returns its stored approx (the two
  /// coincide for `BASE`, since its approx is exactly its cardinality).
  pub fn measure_state_space(&self) -> u64 {
    match &self.kind {
      TermKind::Empty => 0,
      TermKind::Base(base) => base.len() as u64,
      TermKind::Product(p) => p.left.measure_state_space() + p.right.measure_state_space() + 1,
      TermKind::Ternary(t) => {
        t.left.measure_state_space() + t.middle.measure_state_space() + t.right.measure_state_space() + 1
      }
      TermKind::Nary(n) => n.children.iter().map(|c| c.measure_state_space()).sum::<u64>() + 1,
      TermKind::List(members) => members.iter().map(|m| m.measure_state_space()).sum(),
      // An un-unfolded continuation approximates its size by its source term; unfolding would require a
      // `CoreResult`-returning signature this operation doesn't have (§4.1 `measure_state_space()`).
      TermKind::Continuation(c) => c.source_term().measure_state_space(),
      TermKind::Fixpoint(f) => f.measure_state_space(),
    }
  }

  /// Flips `complement_flag` in place (§4.1 `complement()`).
  pub fn complement(&self) {
    self.complement_flag.set(!self.complement_flag.get());
  }

  /// Single-assignment of the witness link; no-op if already set to an equal value (§4.1 `set_successor`).
  pub fn set_successor(self: &TermPtr, successor: TermPtr, symbol: Symbol) {
    let path_length = successor.link().map(|l| l.path_length + 1).unwrap_or(1);
    self.link.set_or_check(Link { successor, symbol, path_length });
  }

  /// Copies `other`'s link chain if `self`'s is still empty (§4.1 `set_same_successor_as`).
  pub fn set_same_successor_as(self: &TermPtr, other: &TermPtr) {
    if self.link.is_set() {
      return;
    }
    if let Some(link) = other.link() {
      self.link.set_or_check(link);
    }
  }

  /// Single-point membership check (§4.1 `subsumes(enumerator)`). Implemented to the depth the source exercises it
  /// for: `PRODUCT`/`TERNARY`/`NARY` children that are all `BASE` (SPEC_FULL.md §4.1 ADD).
  pub fn subsumes(&self, enumerator: &mut dyn TermEnumerator) -> bool {
    match &self.kind {
      TermKind::Empty => !self.is_complemented(),
      TermKind::Base(base) => match enumerator.next_base_state() {
        Some(state) => base.contains(state),
        None => false,
      },
      TermKind::Product(p) => p.left.subsumes(enumerator) && p.right.subsumes(enumerator),
      TermKind::Ternary(t) => {
        t.left.subsumes(enumerator) && t.middle.subsumes(enumerator) && t.right.subsumes(enumerator)
      }
      TermKind::Nary(n) => n.children.iter().all(|c| c.subsumes(enumerator)),
      TermKind::List(members) => members.iter().any(|m| m.subsumes(enumerator)),
      TermKind::Continuation(_) | TermKind::Fixpoint(_) => false,
    }
  }
}

/// Yields atomic base-automaton state witnesses one at a time, used only by [`TermNode::subsumes`].
pub trait TermEnumerator {
  fn next_base_state(&mut self) -> Option<crate::api::StateId>;
}

impl PartialEq for TermNode {
  /// Reference equality of the underlying allocation. Workshop-produced terms make this coincide with structural
  /// equality (§3 "pointer equality ⇒ value equality"); comparing field-by-field is never needed since every
  /// component of the engine that cares about "same value" already holds (or can obtain) the same `Rc`.
  fn eq(&self, other: &Self) -> bool {
    std::ptr::eq(self, other)
  }
}

impl Eq for TermNode {}

impl std::fmt::Debug for TermNode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let kind_name = match &self.kind {
      TermKind::Empty => "Empty",
      TermKind::Base(_) => "Base",
      TermKind::Product(_) => "Product",
      TermKind::Ternary(_) => "Ternary",
      TermKind::Nary(_) => "Nary",
      TermKind::List(_) => "List",
      TermKind::Continuation(_) => "Continuation",
      TermKind::Fixpoint(_) => "Fixpoint",
    };
    f.debug_struct("TermNode")
      .field("kind", &kind_name)
      .field("complement", &self.is_complemented())
      .field("approx", &self.state_space_approx)
      .finish()
  }
}

/// Bundles the read-only context a subsumption query needs: the cache it consults/fills and the metrics it
/// increments. Kept separate from `TermNode` itself since caches are owned per automaton node, not per term
/// (§4.2 "Per owning automaton node, the workshop holds...").
pub struct SubsumptionContext<'a> {
  pub cache: &'a SubsumptionCache,
  pub subsumed_by_cache: &'a SubsumedByCache,
  pub metrics: &'a Metrics,
  pub depth_limit: usize,
  pub unfold_all: bool,
}

/// `a.is_subsumed(b, ctx)` — is `a`'s denoted set a subset of `b`'s (§4.3)?
pub fn is_subsumed(a: &TermPtr, b: &TermPtr, ctx: &SubsumptionContext) -> CoreResult<SubsumptionResult> {
  is_subsumed_at_depth(a, b, ctx, 0)
}

fn is_subsumed_at_depth(
  a: &TermPtr,
  b: &TermPtr,
  ctx: &SubsumptionContext,
  depth: usize,
) -> CoreResult<SubsumptionResult> {
  if Rc::ptr_eq(a, b) {
    return Ok(SubsumptionResult::Yes);
  }
  if depth >= ctx.depth_limit {
    return Ok(SubsumptionResult::No);
  }

  if let TermKind::Continuation(c) = &a.kind {
    let unfolded = c.unfold(ctx.metrics)?;
    return is_subsumed_at_depth(&unfolded, b, ctx, depth + 1);
  }
  if let TermKind::Continuation(c) = &b.kind {
    let unfolded = c.unfold(ctx.metrics)?;
    return is_subsumed_at_depth(a, &unfolded, ctx, depth + 1);
  }

  if a.is_complemented() != b.is_complemented() {
    crate::critical!("complement flag mismatch in is_subsumed");
    panic!("is_subsumed: complement flags must match");
  }

  let key = (Rc::as_ptr(a) as usize, Rc::as_ptr(b) as usize);
  if let Some(cached) = ctx.cache.get(key) {
    ctx.metrics.record_cache_hit();
    crate::debug!("is_subsumed cache hit for ({:#x}, {:#x})", key.0, key.1);
    return Ok(cached);
  }
  ctx.metrics.record_cache_miss();

  let result = if a.is_complemented() {
    is_subsumed_core(b, a, ctx, depth)?
  } else {
    is_subsumed_core(a, b, ctx, depth)?
  };

  // Never cache NO: cheap to re-derive, and caching it would bloat the cache for no benefit (§4.3 step 7).
  match &result {
    SubsumptionResult::Yes => ctx.cache.insert(key, result.clone()),
    SubsumptionResult::Partial(_) => {
      ctx.metrics.record_partial_subsumption_hit();
      ctx.cache.insert(key, result.clone());
    }
    SubsumptionResult::No => {}
  }

  Ok(result)
}

/// Kind dispatch on the non-complemented "core" of `a`/`b` (complement already resolved by the caller's swap).
fn is_subsumed_core(
  a: &TermPtr,
  b: &TermPtr,
  ctx: &SubsumptionContext,
  depth: usize,
) -> CoreResult<SubsumptionResult> {
  match (&a.kind, &b.kind) {
    (TermKind::Empty, _) => Ok(SubsumptionResult::Yes),
    (_, TermKind::Empty) => Ok(if a.is_empty() { SubsumptionResult::Yes } else { SubsumptionResult::No }),

    (TermKind::Base(ba), TermKind::Base(bb)) => {
      if ba.is_subset_of(bb) {
        Ok(SubsumptionResult::Yes)
      } else {
        let residual = ba.difference(bb);
        if residual.is_empty() {
          Ok(SubsumptionResult::No)
        } else {
          let residual_term = TermNode::new_base(a.aut.clone(), residual);
          Ok(SubsumptionResult::Partial(residual_term))
        }
      }
    }

    (TermKind::Product(pa), TermKind::Product(pb)) if pa.kind == pb.kind => {
      if !ctx.unfold_all && matches!(pa.right.kind, TermKind::Continuation(_)) && matches!(pb.right.kind, TermKind::Continuation(_)) {
        let left_result = is_subsumed_at_depth(&pa.left, &pb.left, ctx, depth + 1)?;
        if left_result.is_yes() {
          return Ok(SubsumptionResult::Partial(a.clone()));
        }
      }

      // Evaluate the cheaper side first and short-circuit on NO (§4.3 "Short-circuit order chooses the smaller
      // `state_space_approx` first").
      let (cheap_a, _) = pa.children_by_size();
      let left_is_cheaper = std::ptr::eq(cheap_a, &pa.left);
      let (cheap_a, cheap_b, pricey_a, pricey_b) = if left_is_cheaper {
        (&pa.left, &pb.left, &pa.right, &pb.right)
      } else {
        (&pa.right, &pb.right, &pa.left, &pb.left)
      };

      let cheap_result = is_subsumed_at_depth(cheap_a, cheap_b, ctx, depth + 1)?;
      if cheap_result.is_no() {
        return Ok(SubsumptionResult::No);
      }
      let pricey_result = is_subsumed_at_depth(pricey_a, pricey_b, ctx, depth + 1)?;

      let (left_result, right_result) =
        if left_is_cheaper { (cheap_result, pricey_result) } else { (pricey_result, cheap_result) };

      combine_results(&[left_result, right_result], &[pa.left.clone(), pa.right.clone()], |mut residuals| {
        let right = residuals.pop().unwrap();
        let left = residuals.pop().unwrap();
        TermNode::new_product(a.aut.clone(), pa.kind, left, right)
      })
    }

    (TermKind::Ternary(ta), TermKind::Ternary(tb)) if ta.kind == tb.kind => {
      let results = [
        is_subsumed_at_depth(&ta.left, &tb.left, ctx, depth + 1)?,
        is_subsumed_at_depth(&ta.middle, &tb.middle, ctx, depth + 1)?,
        is_subsumed_at_depth(&ta.right, &tb.right, ctx, depth + 1)?,
      ];
      let originals = [ta.left.clone(), ta.middle.clone(), ta.right.clone()];
      combine_results(&results, &originals, |mut residuals| {
        let right = residuals.pop().unwrap();
        let middle = residuals.pop().unwrap();
        let left = residuals.pop().unwrap();
        TermNode::new_ternary(a.aut.clone(), ta.kind, left, middle, right)
      })
    }

    (TermKind::Nary(na), TermKind::Nary(nb)) => {
      if na.kind != nb.kind || na.arity() != nb.arity() {
        crate::critical!("NARY kind/arity mismatch in is_subsumed");
        panic!("is_subsumed: NARY arity mismatch");
      }
      let access = na.access_vector();
      let mut results = vec![SubsumptionResult::Yes; na.arity()];
      let mut failing_index = None;
      for &i in &access {
        let r = is_subsumed_at_depth(&na.children[i], &nb.children[i], ctx, depth + 1)?;
        if r.is_no() {
          failing_index = Some(i);
          results[i] = r;
          break;
        }
        results[i] = r;
      }
      if let Some(i) = failing_index {
        na.promote_to_front(i);
        return Ok(SubsumptionResult::No);
      }
      combine_results(&results, &na.children, |residuals| TermNode::new_nary(a.aut.clone(), na.kind, residuals))
    }

    (TermKind::List(la), TermKind::List(lb)) => {
      for member in la {
        let covered = lb.iter().any(|candidate| {
          matches!(is_subsumed_at_depth(member, candidate, ctx, depth + 1), Ok(r) if r.is_yes())
        });
        if !covered {
          return Ok(SubsumptionResult::No);
        }
      }
      Ok(SubsumptionResult::Yes)
    }

    (TermKind::Fixpoint(fa), TermKind::Fixpoint(fb)) => fixpoint::is_subsumed_fixpoint(fa, fb, ctx, depth),

    (TermKind::Continuation(_), _) | (_, TermKind::Continuation(_)) => {
      crate::critical!("unreachable: CONTINUATION reached is_subsumed_core unfolded");
      unreachable!("CONTINUATION must be unfolded before reaching is_subsumed_core")
    }

    _ => Ok(SubsumptionResult::No),
  }
}

/// Generalizes the §4.3 componentwise combination rule across PRODUCT (2 children), TERNARY (3), and NARY (n):
/// NO dominates, YES if every child is YES, otherwise PARTIAL with a residual rebuilt from the original children
/// (YES slots) and the per-child residuals (PARTIAL slots).
fn combine_results(
  results: &[SubsumptionResult],
  originals: &[TermPtr],
  rebuild: impl FnOnce(Vec<TermPtr>) -> TermPtr,
) -> CoreResult<SubsumptionResult> {
  if results.iter().any(|r| r.is_no()) {
    return Ok(SubsumptionResult::No);
  }
  if results.iter().all(|r| r.is_yes()) {
    return Ok(SubsumptionResult::Yes);
  }
  let residual_children: Vec<TermPtr> = results
    .iter()
    .zip(originals.iter())
    .map(|(r, original)| match r {
      SubsumptionResult::Partial(residual) => residual.clone(),
      SubsumptionResult::Yes => original.clone(),
      SubsumptionResult::No => unreachable!("NO already handled above"),
    })
    .collect();
  Ok(SubsumptionResult::Partial(rebuild(residual_children)))
}
