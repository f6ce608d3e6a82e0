/*!

Term nodes are shared via `Rc` and compared by pointer identity (hash-consing keys, subsumption caches, worklist
pruning all key on "which object is this", not "what does it contain"). This module collects the small amount of
machinery that sharing needs:

- [`ptr_id`] turns a `Rc<T>` (including a `Rc<dyn Trait>`) into a stable `usize` identity, used as a cache key in
  place of the unstable, structurally-hashing `Rc::eq`/`Rc::hash`.
- [`OnceSlot`] is a single-assignment cell: write it once, read it any number of times, and a second write with a
  different value is a precondition violation. This backs `Term`'s `link` field and `CONTINUATION`'s `unfolded`
  field, both of which the specification calls out as "single-assignment" and idempotent.

*/

use std::cell::RefCell;

/// A stable identity for a `Rc<T>`, usable as a hash map key. Two handles to the same allocation produce the same
/// id; this is what hash-consing and the subsumption caches key on, not structural equality.
pub(crate) fn ptr_id<T: ?Sized>(rc: &std::rc::Rc<T>) -> usize {
  std::rc::Rc::as_ptr(rc) as *const () as usize
}

/// A cell that can be written at most once with a given value. Writing the same value again is a no-op; writing a
/// different value after the first write is a programmer error.
pub(crate) struct OnceSlot<T> {
  inner: RefCell<Option<T>>,
}

impl<T: Clone + PartialEq> OnceSlot<T> {
  pub(crate) fn new() -> Self {
    OnceSlot { inner: RefCell::new(None) }
  }

  pub(crate) fn get(&self) -> Option<T> {
    self.inner.borrow().clone()
  }

  pub(crate) fn is_set(&self) -> bool {
    self.inner.borrow().is_some()
  }

  /// Sets the slot to `value` if empty. If already set to an equal value, this is a no-op. Setting it to a
  /// different value than what is already stored is a precondition violation.
  pub(crate) fn set_or_check(&self, value: T) {
    let mut slot = self.inner.borrow_mut();
    match slot.as_ref() {
      None => *slot = Some(value),
      Some(existing) if *existing == value => { /* idempotent re-assignment */ }
      Some(_) => {
        crate::critical!("attempted to overwrite a single-assignment slot with a different value");
        panic!("single-assignment slot written twice with different values");
      }
    }
  }
}

impl<T: Clone + PartialEq> Default for OnceSlot<T> {
  fn default() -> Self {
    OnceSlot::new()
  }
}
