//! Integration scenarios for hash-consing (§4.2, §8 "round-trip/idempotence": "`workshop.create_product(l, r, k)`
//! called twice returns the same object").

use wsks_core::abstractions::NatSet;
use wsks_core::api::{no_automaton, Symbol, TrackValue};
use wsks_core::core::workshop::TermWorkshop;
use wsks_core::core::ProductKind;

fn workshop() -> TermWorkshop {
  TermWorkshop::new(no_automaton())
}

#[test]
fn create_product_twice_returns_the_same_object() {
  let shop = workshop();
  let left = shop.create_base(NatSet::from_iter([1, 2])).unwrap();
  let right = shop.create_base(NatSet::from_iter([3])).unwrap();

  let first = shop.create_product(ProductKind::Intersection, left.clone(), right.clone()).unwrap();
  let second = shop.create_product(ProductKind::Intersection, left, right).unwrap();
  assert!(std::rc::Rc::ptr_eq(&first, &second));
}

#[test]
fn create_ternary_and_nary_intern_by_child_identity_and_kind() {
  let shop = workshop();
  let a = shop.create_base(NatSet::from_iter([1])).unwrap();
  let b = shop.create_base(NatSet::from_iter([2])).unwrap();
  let c = shop.create_base(NatSet::from_iter([3])).unwrap();

  let t1 = shop.create_ternary(ProductKind::Union, a.clone(), b.clone(), c.clone()).unwrap();
  let t2 = shop.create_ternary(ProductKind::Union, a.clone(), b.clone(), c.clone()).unwrap();
  assert!(std::rc::Rc::ptr_eq(&t1, &t2));

  let n1 = shop.create_nary(ProductKind::Union, vec![a.clone(), b.clone(), c.clone()]).unwrap();
  let n2 = shop.create_nary(ProductKind::Union, vec![a, b, c]).unwrap();
  assert!(std::rc::Rc::ptr_eq(&n1, &n2));
}

/// Continuations key on `(source_term, symbol, complement)` (§4.2 "continuations keyed by..."). Two calls with an
/// equal key return the identical handle; changing the symbol breaks interning.
#[test]
fn continuation_interning_is_sensitive_to_the_symbol() {
  let shop = workshop();
  let source = shop.create_base(NatSet::from_iter([1])).unwrap();
  let sym_a = Symbol::new(vec![TrackValue::Zero]);
  let sym_b = Symbol::new(vec![TrackValue::One]);

  let c1 = shop.create_continuation(no_automaton(), source.clone(), sym_a.clone(), false).unwrap();
  let c2 = shop.create_continuation(no_automaton(), source.clone(), sym_a, false).unwrap();
  assert!(std::rc::Rc::ptr_eq(&c1, &c2));

  let c3 = shop.create_continuation(no_automaton(), source, sym_b, false).unwrap();
  assert!(!std::rc::Rc::ptr_eq(&c1, &c3));
}

/// `LIST` terms are never interned — they seed exactly one fixpoint (§3, §4.2).
#[test]
fn list_terms_are_never_interned() {
  let shop = workshop();
  let member = shop.create_base(NatSet::from_iter([1])).unwrap();

  let l1 = shop.create_list(vec![member.clone()]);
  let l2 = shop.create_list(vec![member]);
  assert!(!std::rc::Rc::ptr_eq(&l1, &l2));
}
