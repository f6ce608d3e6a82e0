//! Hand-written `BaseAutomaton`/`ProjectionAutomaton` fixtures shared by the integration suites (no mocking crate
//! — matching the teacher's own fixture style, e.g. `core/module.rs`'s `parse_ex1`).

use std::rc::{Rc, Weak};

use wsks_core::abstractions::NatSet;
use wsks_core::api::{BaseAutomaton, ProjectionAutomaton, Symbol, TrackValue, VarList};
use wsks_core::core::error::CoreResult;
use wsks_core::core::guide::FixpointGuide;
use wsks_core::core::term::fixpoint::{initialize_symbols, FixpointTerm};
use wsks_core::core::term::{TermNode, TermPtr};
use wsks_core::core::{GuideTip, SearchType};

/// A one-state base automaton that self-loops on every symbol: `δ(q0, σ) = {q0}` for all `σ`. `epsilon_accepts`
/// is the fixed epsilon-acceptance `intersect_nonempty` reports, standing in for "ground-truth semantics of `q0`"
/// in §8 scenario 5.
pub struct LoopAutomaton {
  pub epsilon_accepts: bool,
}

impl BaseAutomaton for LoopAutomaton {
  fn intersect_nonempty(&self, _symbol: &Symbol, term: &TermPtr, _complement: bool) -> CoreResult<(TermPtr, bool)> {
    Ok((term.clone(), self.epsilon_accepts))
  }

  fn initial_states(&self) -> TermPtr {
    TermNode::new_base(wsks_core::api::no_automaton(), wsks_core::core::term::base::BaseTerm::new([0u32]))
  }

  fn final_states(&self) -> TermPtr {
    TermNode::new_base(wsks_core::api::no_automaton(), wsks_core::core::term::base::BaseTerm::new([0u32]))
  }

  fn non_occurring_vars(&self) -> NatSet {
    NatSet::new()
  }

  fn remap_symbol(&self, symbol: &Symbol) -> Symbol {
    symbol.clone()
  }
}

/// A guide that discards every candidate (§8 scenario 6: "Guide returns THROW for every symbol").
pub struct ThrowGuide;

impl FixpointGuide for ThrowGuide {
  fn fanout(&self, _term: &TermPtr) -> GuideTip {
    GuideTip::Project
  }

  fn give_tip(&self, _term: &TermPtr, _symbol: &Symbol) -> GuideTip {
    GuideTip::Throw
  }
}

pub struct StubProjection {
  base: LoopAutomaton,
  guide: Option<Box<dyn FixpointGuide>>,
  projected_vars: VarList,
}

impl ProjectionAutomaton for StubProjection {
  fn base(&self) -> &dyn BaseAutomaton {
    &self.base
  }

  fn guide(&self) -> Option<&dyn FixpointGuide> {
    self.guide.as_deref()
  }

  fn projected_vars(&self) -> &VarList {
    &self.projected_vars
  }

  fn is_root(&self) -> bool {
    true
  }
}

/// Builds a root `FIXPOINT` term seeded with `BASE({0})` under a single-track all-zero symbol, in `UNGROUND_ROOT`
/// search mode with `short_bool = true` (disjunction-aggregated), owned by a fresh `StubProjection`. Returns the
/// owning automaton (kept alive for the caller's `Weak` to stay valid) alongside the root term.
pub fn build_root(epsilon_accepts: bool, guide: Option<Box<dyn FixpointGuide>>) -> (Rc<dyn ProjectionAutomaton>, TermPtr) {
  let stub: Rc<dyn ProjectionAutomaton> =
    Rc::new(StubProjection { base: LoopAutomaton { epsilon_accepts }, guide, projected_vars: Vec::new() });
  let weak: Weak<dyn ProjectionAutomaton> = Rc::downgrade(&stub);

  let seed = TermNode::new_base(weak.clone(), wsks_core::core::term::base::BaseTerm::new([0u32]));
  let seed_symbol = Symbol::new(vec![TrackValue::Zero]);
  let (symbols, projected_symbol) = initialize_symbols(&seed_symbol, stub.projected_vars());

  let fixpoint =
    FixpointTerm::new(seed, seed_symbol, symbols, projected_symbol, SearchType::UngroundRoot, true, false);
  let root = TermNode::new_fixpoint(weak, fixpoint);

  (stub, root)
}
