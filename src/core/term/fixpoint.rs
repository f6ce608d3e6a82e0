/*!

`FIXPOINT` terms: the worklist-driven saturation of an existential projection `∃ X. φ` (§4.5). This is the
heaviest single component in the algebra — the saturation loop, symbol pumping, shared-iteration bookkeeping, and
the `FixpointGuide` scheduling hook all live here.

*/

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::api::{Symbol, TrackIndex, TrackValue};
use crate::core::error::CoreResult;
use crate::core::guide::FixpointGuide;
use crate::core::{GuideTip, SearchType, SubsumptionResult};

use super::{is_subsumed_at_depth, SubsumptionContext, TermKind, TermNode, TermPtr};

struct FixpointMember {
  /// `None` only for the leading sentinel used as an iterator boundary marker (§4.5 "starts with a sentinel
  /// `(null, true)`").
  term: Option<TermPtr>,
  alive: Cell<bool>,
}

struct WorklistItem {
  term: TermPtr,
  symbol: Symbol,
}

pub struct FixpointTerm {
  members: RefCell<VecDeque<FixpointMember>>,
  worklist: RefCell<VecDeque<WorklistItem>>,
  source_term: Option<TermPtr>,
  source_symbol: Option<Symbol>,
  source_iterator: RefCell<Option<FixpointIterator>>,
  symbols: Vec<Symbol>,
  projected_symbol: Symbol,
  search_type: SearchType,
  short_bool: bool,
  b_value: Cell<bool>,
  sat_term: RefCell<Option<TermPtr>>,
  unsat_term: RefCell<Option<TermPtr>>,
  iterator_count: Cell<usize>,
}

impl FixpointTerm {
  /// Builds a fixpoint in plain saturation mode, seeded with `seed` under symbol `seed_symbol`. `complement` is
  /// the owning term's complement flag: `b_value` aggregates by OR when `false` (identity `false`) and by AND
  /// when `true` (identity `true`), so it is initialized to `complement` itself (§4.5 step 8; the original's
  /// `TermFixpoint` constructors do the same with `_bValue(inComplement)`, Term.cpp:438).
  pub fn new(
    seed: TermPtr,
    seed_symbol: Symbol,
    symbols: Vec<Symbol>,
    projected_symbol: Symbol,
    search_type: SearchType,
    short_bool: bool,
    complement: bool,
  ) -> Self {
    let mut members = VecDeque::new();
    members.push_back(FixpointMember { term: None, alive: Cell::new(true) });

    let mut worklist = VecDeque::new();
    worklist.push_back(WorklistItem { term: seed, symbol: seed_symbol });

    FixpointTerm {
      members: RefCell::new(members),
      worklist: RefCell::new(worklist),
      source_term: None,
      source_symbol: None,
      source_iterator: RefCell::new(None),
      symbols,
      projected_symbol,
      search_type,
      short_bool,
      b_value: Cell::new(complement),
      sat_term: RefCell::new(None),
      unsat_term: RefCell::new(None),
      iterator_count: Cell::new(0),
    }
  }

  /// Builds a fixpoint in *pre* mode: computing the pre-image of another fixpoint's saturation (§4.5 "Pre step").
  /// See [`Self::new`] for why `b_value` is seeded from `complement`.
  pub fn new_pre(
    source_term: TermPtr,
    source_symbol: Symbol,
    source_iterator: FixpointIterator,
    search_type: SearchType,
    short_bool: bool,
    complement: bool,
  ) -> Self {
    let mut members = VecDeque::new();
    members.push_back(FixpointMember { term: None, alive: Cell::new(true) });

    FixpointTerm {
      members: RefCell::new(members),
      worklist: RefCell::new(VecDeque::new()),
      source_term: Some(source_term),
      source_symbol: Some(source_symbol),
      source_iterator: RefCell::new(Some(source_iterator)),
      symbols: Vec::new(),
      projected_symbol: Symbol::new(Vec::new()),
      search_type,
      short_bool,
      b_value: Cell::new(complement),
      sat_term: RefCell::new(None),
      unsat_term: RefCell::new(None),
      iterator_count: Cell::new(0),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.members.borrow().iter().all(|m| match &m.term {
      Some(term) => !m.alive.get() || term.is_empty(),
      None => true,
    }) && self.worklist.borrow().is_empty()
  }

  pub fn measure_state_space(&self) -> u64 {
    self
      .members
      .borrow()
      .iter()
      .filter(|m| m.alive.get())
      .filter_map(|m| m.term.as_ref())
      .map(|t| t.measure_state_space())
      .sum()
  }

  pub fn b_value(&self) -> bool {
    self.b_value.get()
  }

  pub fn sat_term(&self) -> Option<TermPtr> {
    self.sat_term.borrow().clone()
  }

  pub fn unsat_term(&self) -> Option<TermPtr> {
    self.unsat_term.borrow().clone()
  }

  pub fn member_count(&self) -> usize {
    self.members.borrow().iter().filter(|m| m.alive.get() && m.term.is_some()).count()
  }

  /// A fixpoint is fully computed when its worklist is empty (plain mode) or both its source iterator is
  /// exhausted and its worklist is empty (pre mode) (§4.5 "Fully computed").
  pub fn fully_computed(&self) -> bool {
    let worklist_empty = self.worklist.borrow().is_empty();
    match &self.source_term {
      None => worklist_empty,
      Some(_) => worklist_empty && self.source_iterator.borrow().is_none(),
    }
  }

  /// Removes dead members, but only when no external iterator is observing the sequence (§4.5 "Fully computed").
  pub fn remove_subsumed(&self) {
    if self.iterator_count.get() > 0 {
      return;
    }
    self.members.borrow_mut().retain(|m| m.term.is_none() || m.alive.get());
  }

  /// The live members, for [`crate::core::dot::to_dot`] — not used by the saturation loop itself.
  pub(crate) fn live_members(&self) -> Vec<TermPtr> {
    self.members.borrow().iter().filter(|m| m.alive.get()).filter_map(|m| m.term.clone()).collect()
  }

  /// The pending `(term, symbol)` pairs, for [`crate::core::dot::to_dot`]'s dashed worklist edges.
  pub(crate) fn worklist_items(&self) -> Vec<(TermPtr, Symbol)> {
    self.worklist.borrow().iter().map(|item| (item.term.clone(), item.symbol.clone())).collect()
  }
}

/// Iterates the live members of a fixpoint. Increments `iterator_count` on construction and decrements it on
/// `Drop` (§4.5 ADD "Iterator type"), gating destructive pruning and front-insertion for as long as it is alive.
pub struct FixpointIterator {
  owner: TermPtr,
  cursor: usize,
}

impl FixpointIterator {
  pub fn new(owner: TermPtr) -> Self {
    with_fixpoint(&owner, |f| f.iterator_count.set(f.iterator_count.get() + 1));
    FixpointIterator { owner, cursor: 0 }
  }
}

impl Iterator for FixpointIterator {
  type Item = TermPtr;

  fn next(&mut self) -> Option<TermPtr> {
    with_fixpoint(&self.owner, |f| {
      let members = f.members.borrow();
      while self.cursor < members.len() {
        let member = &members[self.cursor];
        self.cursor += 1;
        if member.alive.get() {
          if let Some(term) = &member.term {
            return Some(term.clone());
          }
        }
      }
      None
    })
  }
}

impl Drop for FixpointIterator {
  fn drop(&mut self) {
    with_fixpoint(&self.owner, |f| f.iterator_count.set(f.iterator_count.get().saturating_sub(1)));
  }
}

fn with_fixpoint<R>(owner: &TermPtr, f: impl FnOnce(&FixpointTerm) -> R) -> R {
  match &owner.kind {
    TermKind::Fixpoint(fixpoint) => f(fixpoint),
    _ => {
      crate::critical!("expected a FIXPOINT term");
      panic!("expected a FIXPOINT term");
    }
  }
}

/// §4.5 "Symbol initialization": pumps the `1` value for each projected track into every existing symbol, and
/// builds the matching `projected_symbol` with every projected track set to the don't-care marker.
pub fn initialize_symbols(base_symbol: &Symbol, projected_vars: &[TrackIndex]) -> (Vec<Symbol>, Symbol) {
  let mut symbols = vec![base_symbol.clone()];
  for &track in projected_vars {
    let mut doubled = Vec::with_capacity(symbols.len() * 2);
    for symbol in &symbols {
      doubled.push(symbol.clone());
      doubled.push(symbol.with_track(track, TrackValue::One));
    }
    symbols = doubled;
  }

  let mut projected_symbol = base_symbol.clone();
  for &track in projected_vars {
    projected_symbol = projected_symbol.with_track(track, TrackValue::DontCare);
  }

  (symbols, projected_symbol)
}

/// Does `result_term` already appear in `fixpoint`'s members? UNGROUND_ROOT compares by pointer identity only;
/// every other search type goes through [`is_subsumed_by`], which also prunes now-subsumed members (§4.5 step 5).
fn fixpoint_test(
  owner: &TermPtr,
  fixpoint: &FixpointTerm,
  result_term: &TermPtr,
  ctx: &SubsumptionContext,
) -> CoreResult<bool> {
  match fixpoint.search_type {
    SearchType::UngroundRoot => Ok(fixpoint.members.borrow().iter().any(|member| {
      member.alive.get() && member.term.as_ref().is_some_and(|term| std::rc::Rc::ptr_eq(term, result_term))
    })),
    SearchType::Dfs | SearchType::Bfs => Ok(is_subsumed_by(result_term, owner, false, ctx)?.is_yes()),
  }
}

/// Advances the saturation loop by one worklist item (§4.5 "Saturation step (`compute_next_fixpoint`)").
pub fn compute_next_fixpoint(owner: &TermPtr, fixpoint: &FixpointTerm, ctx: &SubsumptionContext) -> CoreResult<()> {
  let item = {
    let mut worklist = fixpoint.worklist.borrow_mut();
    match fixpoint.search_type {
      SearchType::Bfs => worklist.pop_back(),
      SearchType::Dfs | SearchType::UngroundRoot => worklist.pop_front(),
    }
  };
  let Some(item) = item else { return Ok(()) };
  crate::trace!("compute_next_fixpoint: popped worklist item ({:?}, {:?})", fixpoint.search_type, item.symbol);

  let aut = owner
    .owning_automaton()
    .expect("fixpoint's owning automaton was dropped mid-saturation");

  let (result_term, result_bool) =
    aut.base().intersect_nonempty(&item.symbol, &item.term, owner.is_complemented())?;

  if fixpoint.search_type == SearchType::UngroundRoot {
    if result_bool {
      let mut sat = fixpoint.sat_term.borrow_mut();
      if sat.is_none() {
        *sat = Some(result_term.clone());
      }
    } else {
      let mut unsat = fixpoint.unsat_term.borrow_mut();
      if unsat.is_none() {
        *unsat = Some(result_term.clone());
      }
    }
  }

  if fixpoint_test(owner, fixpoint, &result_term, ctx)? {
    return Ok(());
  }

  let push_front = result_bool == fixpoint.short_bool && fixpoint.iterator_count.get() == 0;
  {
    let mut members = fixpoint.members.borrow_mut();
    let new_member = FixpointMember { term: Some(result_term.clone()), alive: Cell::new(true) };
    if push_front {
      members.push_front(new_member);
    } else {
      members.push_back(new_member);
    }
  }

  fixpoint.b_value.set(if owner.is_complemented() {
    fixpoint.b_value.get() && result_bool
  } else {
    fixpoint.b_value.get() || result_bool
  });

  let guide = aut.guide();
  let fanout = match &guide {
    Some(g) => g.fanout(&result_term),
    None => GuideTip::Project,
  };

  let candidate_symbols: Vec<&Symbol> = match fanout {
    GuideTip::ProjectAll => vec![&fixpoint.projected_symbol],
    _ => fixpoint.symbols.iter().collect(),
  };

  for symbol in candidate_symbols {
    let tip = match &guide {
      Some(g) => g.give_tip(&result_term, symbol),
      None => GuideTip::Front,
    };
    let mut worklist = fixpoint.worklist.borrow_mut();
    match tip {
      GuideTip::Throw => {}
      GuideTip::Back => worklist.push_back(WorklistItem { term: result_term.clone(), symbol: symbol.clone() }),
      GuideTip::Front | GuideTip::Project | GuideTip::ProjectAll => {
        worklist.push_front(WorklistItem { term: result_term.clone(), symbol: symbol.clone() })
      }
    }
  }

  if fixpoint.worklist.borrow().is_empty() {
    ctx.metrics.record_fully_computed_fixpoint();
  }

  Ok(())
}

/// The pre-image counterpart of [`compute_next_fixpoint`]: no symbol expansion, consumes one candidate from
/// `source_iterator` per step (§4.5 "Pre step").
pub fn compute_next_pre(owner: &TermPtr, fixpoint: &FixpointTerm, ctx: &SubsumptionContext) -> CoreResult<()> {
  let candidate = {
    let mut source_iterator = fixpoint.source_iterator.borrow_mut();
    match source_iterator.as_mut() {
      Some(iter) => iter.next(),
      None => None,
    }
  };
  let Some(candidate) = candidate else {
    fixpoint.source_iterator.borrow_mut().take();
    return Ok(());
  };

  let aut = owner
    .owning_automaton()
    .expect("fixpoint's owning automaton was dropped mid-saturation");
  let symbol = fixpoint.source_symbol.clone().expect("pre-mode fixpoint missing source_symbol");

  let (result_term, result_bool) = aut.base().intersect_nonempty(&symbol, &candidate, owner.is_complemented())?;

  if fixpoint_test(owner, fixpoint, &result_term, ctx)? {
    return Ok(());
  }

  let push_front = result_bool == fixpoint.short_bool && fixpoint.iterator_count.get() == 0;
  let mut members = fixpoint.members.borrow_mut();
  let new_member = FixpointMember { term: Some(result_term), alive: Cell::new(true) };
  if push_front {
    members.push_front(new_member);
  } else {
    members.push_back(new_member);
  }
  drop(members);

  fixpoint.b_value.set(if owner.is_complemented() {
    fixpoint.b_value.get() && result_bool
  } else {
    fixpoint.b_value.get() || result_bool
  });

  Ok(())
}

/// `a ⊆ b` for two FIXPOINT terms (§4.3 "FIXPOINT ⊆ FIXPOINT").
pub fn is_subsumed_fixpoint(
  fa: &FixpointTerm,
  fb: &FixpointTerm,
  ctx: &SubsumptionContext,
  depth: usize,
) -> CoreResult<SubsumptionResult> {
  let both_done = fa.worklist.borrow().is_empty() && fb.worklist.borrow().is_empty();
  if !both_done && fa.source_symbol != fb.source_symbol {
    return Ok(SubsumptionResult::No);
  }

  for member in fa.members.borrow().iter() {
    let Some(term) = &member.term else { continue };
    if !member.alive.get() {
      continue;
    }
    let covered = fb.members.borrow().iter().any(|other| match (&other.term, other.alive.get()) {
      (Some(candidate), true) => {
        matches!(is_subsumed_at_depth(term, candidate, ctx, depth + 1), Ok(r) if r.is_yes())
      }
      _ => false,
    });
    if !covered {
      return Ok(SubsumptionResult::No);
    }
  }
  Ok(SubsumptionResult::Yes)
}

/// `a.is_subsumed_by(fixpoint)` (§4.3): tests `a` against the accumulated members of `fixpoint`, pruning members
/// now subsumed by `a` unless `no_prune` forbids it. Memoized in [`crate::core::cache::SubsumedByCache`], keyed on
/// `(a, owner)` identity; any pruning this call performs invalidates every cached entry for `owner` since a member
/// leaving the fixpoint can falsify an earlier YES.
///
/// On a `PARTIAL` result against one member, the residual becomes `tested_term`, the surviving representative of
/// `a` compared against every subsequent member in the same sweep — both for the covering test and for the
/// pruning test below it (§4.3 "the residual becomes the surviving representative of `a` for further comparisons
/// in the same sweep"; `TermBaseSet::IsSubsumedBy`, Term.cpp:1301-1336, threads the same `tested_term` through
/// both checks).
pub fn is_subsumed_by(
  a: &TermPtr,
  owner: &TermPtr,
  no_prune: bool,
  ctx: &SubsumptionContext,
) -> CoreResult<SubsumptionResult> {
  let fixpoint = match &owner.kind {
    TermKind::Fixpoint(f) => f,
    _ => {
      crate::critical!("is_subsumed_by requires a FIXPOINT term");
      panic!("is_subsumed_by requires a FIXPOINT term");
    }
  };

  let owner_id = std::rc::Rc::as_ptr(owner) as usize;
  let key = (std::rc::Rc::as_ptr(a) as usize, owner_id);
  if let Some(cached) = ctx.subsumed_by_cache.get(key) {
    ctx.metrics.record_cache_hit();
    return Ok(cached);
  }
  ctx.metrics.record_cache_miss();

  let mut tested_term = a.clone();
  let mut pruned_any = false;
  for member in fixpoint.members.borrow().iter() {
    let Some(term) = &member.term else { continue };
    if !member.alive.get() {
      continue;
    }
    let result = is_subsumed_at_depth(&tested_term, term, ctx, 0)?;
    if result.is_yes() {
      if pruned_any {
        ctx.subsumed_by_cache.invalidate_fixpoint(owner_id);
      }
      ctx.subsumed_by_cache.insert(key, SubsumptionResult::Yes);
      return Ok(SubsumptionResult::Yes);
    }
    if let SubsumptionResult::Partial(residual) = result {
      tested_term = residual;
    }

    if !no_prune && fixpoint.iterator_count.get() == 0 {
      let reverse = is_subsumed_at_depth(term, &tested_term, ctx, 0)?;
      if reverse.is_yes() {
        member.alive.set(false);
        let dead = term.clone();
        fixpoint.worklist.borrow_mut().retain(|item| !std::rc::Rc::ptr_eq(&item.term, &dead));
        pruned_any = true;
      }
    }
  }

  if pruned_any {
    ctx.subsumed_by_cache.invalidate_fixpoint(owner_id);
  }

  let result = if std::rc::Rc::ptr_eq(&tested_term, a) || no_prune {
    SubsumptionResult::No
  } else {
    SubsumptionResult::Partial(tested_term)
  };
  if !result.is_no() {
    ctx.subsumed_by_cache.insert(key, result.clone());
  }
  Ok(result)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn symbol_initialization_pumps_every_projected_track() {
    let base = Symbol::new(vec![TrackValue::Zero, TrackValue::Zero]);
    let (symbols, projected) = initialize_symbols(&base, &[0]);

    assert_eq!(symbols.len(), 2);
    assert_eq!(projected.get(0), Some(TrackValue::DontCare));
    assert_eq!(projected.get(1), Some(TrackValue::Zero));
  }

  #[test]
  fn symbol_initialization_with_no_projected_vars_is_identity() {
    let base = Symbol::new(vec![TrackValue::One]);
    let (symbols, projected) = initialize_symbols(&base, &[]);
    assert_eq!(symbols, vec![base.clone()]);
    assert_eq!(projected, base);
  }

  /// §4.5 step 8: a complemented (conjunction-aggregated) fixpoint's `b_value` starts at the AND identity
  /// `true`, not `false` (Term.cpp:438 `_bValue(inComplement)`).
  #[test]
  fn complemented_fixpoint_starts_at_the_and_identity() {
    let seed = TermNode::new_empty(false);
    let uncomplemented = FixpointTerm::new(
      seed.clone(),
      Symbol::new(vec![]),
      Vec::new(),
      Symbol::new(vec![]),
      SearchType::Dfs,
      true,
      false,
    );
    assert!(!uncomplemented.b_value());

    let complemented = FixpointTerm::new(
      seed,
      Symbol::new(vec![]),
      Vec::new(),
      Symbol::new(vec![]),
      SearchType::Dfs,
      false,
      true,
    );
    assert!(complemented.b_value());
  }

  fn empty_context(
    cache: &crate::core::cache::SubsumptionCache,
    subsumed_by_cache: &crate::core::cache::SubsumedByCache,
    metrics: &crate::core::metrics::Metrics,
  ) -> SubsumptionContext<'_> {
    SubsumptionContext { cache, subsumed_by_cache, metrics, depth_limit: 64, unfold_all: false }
  }

  /// Builds a `FIXPOINT` term directly from a member list, bypassing the full saturation constructor — these
  /// tests exercise `is_subsumed_by` in isolation, not the saturation loop.
  fn fixpoint_with_members(members: Vec<TermPtr>) -> TermPtr {
    let mut deque = VecDeque::new();
    deque.push_back(FixpointMember { term: None, alive: Cell::new(true) });
    for term in members {
      deque.push_back(FixpointMember { term: Some(term), alive: Cell::new(true) });
    }
    let fixpoint = FixpointTerm {
      members: RefCell::new(deque),
      worklist: RefCell::new(VecDeque::new()),
      source_term: None,
      source_symbol: None,
      source_iterator: RefCell::new(None),
      symbols: Vec::new(),
      projected_symbol: Symbol::new(Vec::new()),
      search_type: SearchType::Dfs,
      short_bool: true,
      b_value: Cell::new(false),
      sat_term: RefCell::new(None),
      unsat_term: RefCell::new(None),
      iterator_count: Cell::new(0),
    };
    TermNode::new_fixpoint(crate::api::no_automaton(), fixpoint)
  }

  /// §4.3 "On PARTIAL result, the residual becomes the surviving representative of `a` for further comparisons in
  /// the same sweep": `a = BASE({1,2})` jointly covered by members `BASE({1})` and `BASE({2})` must come back
  /// YES, not get re-added as PARTIAL/NO.
  #[test]
  fn jointly_covered_term_is_fully_subsumed_across_the_sweep() {
    use crate::core::term::base::BaseTerm;

    let member_one = TermNode::new_base(crate::api::no_automaton(), BaseTerm::new([1u32]));
    let member_two = TermNode::new_base(crate::api::no_automaton(), BaseTerm::new([2u32]));
    let owner = fixpoint_with_members(vec![member_one, member_two]);
    let a = TermNode::new_base(crate::api::no_automaton(), BaseTerm::new([1u32, 2u32]));

    let cache = crate::core::cache::SubsumptionCache::new();
    let subsumed_by_cache = crate::core::cache::SubsumedByCache::new();
    let metrics = crate::core::metrics::Metrics::new();
    let ctx = empty_context(&cache, &subsumed_by_cache, &metrics);

    let result = is_subsumed_by(&a, &owner, false, &ctx).unwrap();
    assert!(result.is_yes(), "{{1,2}} should be fully covered once {{1}} and {{2}} are compared in sequence");
  }

  /// §4.3 "prunes members of the fixpoint that are now subsumed by `a`... setting their alive flag false and
  /// removing their pending worklist pairs". A non-complemented `EMPTY` member is trivially subsumed by any
  /// nonempty candidate and must be pruned, along with its queued worklist entries (Term.cpp:1338
  /// `prune_worklist`).
  #[test]
  fn pruning_a_subsumed_member_also_drops_its_worklist_entries() {
    use crate::core::term::base::BaseTerm;

    let dead_member = TermNode::new_empty(false);
    let owner = fixpoint_with_members(vec![dead_member.clone()]);
    if let TermKind::Fixpoint(f) = owner.kind() {
      f.worklist.borrow_mut().push_back(WorklistItem { term: dead_member.clone(), symbol: Symbol::new(vec![]) });
      assert_eq!(f.worklist.borrow().len(), 1);
    }

    let a = TermNode::new_base(crate::api::no_automaton(), BaseTerm::new([1u32]));

    let cache = crate::core::cache::SubsumptionCache::new();
    let subsumed_by_cache = crate::core::cache::SubsumedByCache::new();
    let metrics = crate::core::metrics::Metrics::new();
    let ctx = empty_context(&cache, &subsumed_by_cache, &metrics);

    let result = is_subsumed_by(&a, &owner, false, &ctx).unwrap();
    assert!(result.is_no(), "{{1}} is not covered by a fixpoint containing only an EMPTY member");

    let TermKind::Fixpoint(f) = owner.kind() else { unreachable!() };
    assert_eq!(f.member_count(), 0, "the EMPTY member must be pruned once a nonempty candidate arrives");
    assert!(f.worklist.borrow().is_empty(), "pruning the member must also drop its queued worklist entries");
  }
}
