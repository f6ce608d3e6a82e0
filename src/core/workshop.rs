/*!

Hash-consing factories (§4.2): per owning automaton node, guarantee that two calls with equal keys return the
identical `TermPtr`. Workshop keys use `Rc::as_ptr` identity of child terms for the product/ternary/nary/
continuation caches, matching the source's raw-pointer-keyed `ProductKey = std::pair<Term*, Term*>`
(`Workshops.h`) — canonicalizing on value would require re-hashing the whole subterm on every lookup, which the
source deliberately avoids. The `BASE` cache keys on the sorted state vector itself, exactly as
`BaseKey = VATA::Util::OrdVector<unsigned int>` does.

*/

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::abstractions::NatSet;
use crate::api::{ProjectionAutomaton, Symbol};

use super::error::CoreResult;
use super::metrics::Metrics;
use super::term::base::BaseTerm;
use super::term::{TermNode, TermPtr};
use super::ProductKind;

type ProductKey = (usize, usize, ProductKind);
type NaryKey = (Vec<usize>, ProductKind);
type ContinuationKey = (usize, usize, bool);

/// Owns the hash-consing caches and the two `EMPTY` singletons for one automaton node.
pub struct TermWorkshop {
  aut: Weak<dyn ProjectionAutomaton>,
  base_cache: RefCell<HashMap<Vec<usize>, TermPtr>>,
  product_cache: RefCell<HashMap<ProductKey, TermPtr>>,
  ternary_cache: RefCell<HashMap<(usize, usize, usize, ProductKind), TermPtr>>,
  nary_cache: RefCell<HashMap<NaryKey, TermPtr>>,
  continuation_cache: RefCell<HashMap<ContinuationKey, TermPtr>>,
  empty: TermPtr,
  universe: TermPtr,
  metrics: Metrics,
}

impl TermWorkshop {
  pub fn new(aut: Weak<dyn ProjectionAutomaton>) -> Self {
    TermWorkshop {
      aut,
      base_cache: RefCell::new(HashMap::new()),
      product_cache: RefCell::new(HashMap::new()),
      ternary_cache: RefCell::new(HashMap::new()),
      nary_cache: RefCell::new(HashMap::new()),
      continuation_cache: RefCell::new(HashMap::new()),
      empty: TermNode::new_empty(false),
      universe: TermNode::new_empty(true),
      metrics: Metrics::new(),
    }
  }

  pub fn metrics(&self) -> &Metrics {
    &self.metrics
  }

  /// The unique, non-complemented `EMPTY` term for this automaton node.
  pub fn empty(&self) -> TermPtr {
    self.empty.clone()
  }

  /// The unique, complemented `EMPTY` term ("universe") for this automaton node.
  pub fn universe(&self) -> TermPtr {
    self.universe.clone()
  }

  pub fn create_base(&self, states: NatSet) -> CoreResult<TermPtr> {
    if states.is_empty() {
      return Ok(self.empty());
    }
    let key: Vec<usize> = states.iter().collect();
    if let Some(existing) = self.base_cache.borrow().get(&key) {
      return Ok(existing.clone());
    }
    crate::trace!("workshop: creating BASE term with {} states", key.len());
    let term = TermNode::new_base(self.aut.clone(), BaseTerm::from_nat_set(states));
    self.base_cache.borrow_mut().insert(key, term.clone());
    Ok(term)
  }

  pub fn create_product(&self, kind: ProductKind, left: TermPtr, right: TermPtr) -> CoreResult<TermPtr> {
    let key = (Rc::as_ptr(&left) as usize, Rc::as_ptr(&right) as usize, kind);
    if let Some(existing) = self.product_cache.borrow().get(&key) {
      return Ok(existing.clone());
    }
    crate::trace!("workshop: creating PRODUCT term, kind={:?}", kind);
    let term = TermNode::new_product(self.aut.clone(), kind, left, right);
    self.product_cache.borrow_mut().insert(key, term.clone());
    Ok(term)
  }

  pub fn create_ternary(
    &self,
    kind: ProductKind,
    left: TermPtr,
    middle: TermPtr,
    right: TermPtr,
  ) -> CoreResult<TermPtr> {
    let key = (
      Rc::as_ptr(&left) as usize,
      Rc::as_ptr(&middle) as usize,
      Rc::as_ptr(&right) as usize,
      kind,
    );
    if let Some(existing) = self.ternary_cache.borrow().get(&key) {
      return Ok(existing.clone());
    }
    let term = TermNode::new_ternary(self.aut.clone(), kind, left, middle, right);
    self.ternary_cache.borrow_mut().insert(key, term.clone());
    Ok(term)
  }

  pub fn create_nary(&self, kind: ProductKind, children: Vec<TermPtr>) -> CoreResult<TermPtr> {
    debug_assert!(children.len() >= 2, "NARY term must have arity >= 2");
    let ids: Vec<usize> = children.iter().map(|c| Rc::as_ptr(c) as usize).collect();
    let key = (ids, kind);
    if let Some(existing) = self.nary_cache.borrow().get(&key) {
      return Ok(existing.clone());
    }
    let term = TermNode::new_nary(self.aut.clone(), kind, children);
    self.nary_cache.borrow_mut().insert(key, term.clone());
    Ok(term)
  }

  /// `LIST` terms seed exactly one fixpoint (§3) and are therefore never interned.
  pub fn create_list(&self, members: Vec<TermPtr>) -> TermPtr {
    TermNode::new_list(self.aut.clone(), members)
  }

  pub fn create_continuation(
    &self,
    target_aut: Weak<dyn ProjectionAutomaton>,
    source_term: TermPtr,
    symbol: Symbol,
    complement: bool,
  ) -> CoreResult<TermPtr> {
    let key = (Rc::as_ptr(&source_term) as usize, hash_symbol(&symbol), complement);
    if let Some(existing) = self.continuation_cache.borrow().get(&key) {
      return Ok(existing.clone());
    }
    let term = TermNode::new_continuation(self.aut.clone(), target_aut, source_term, symbol, complement);
    self.continuation_cache.borrow_mut().insert(key, term.clone());
    Ok(term)
  }
}

/// A cheap, deterministic hash used only as part of a continuation cache key, not for correctness-critical
/// dispatch (`Symbol` itself is the real equality check on a cache hit via `HashMap`'s own collision handling).
fn hash_symbol(symbol: &Symbol) -> usize {
  use std::hash::{Hash, Hasher};
  let mut hasher = std::collections::hash_map::DefaultHasher::new();
  symbol.hash(&mut hasher);
  hasher.finish() as usize
}
