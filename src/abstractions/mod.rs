#![allow(unused)]
/*!

Types/type aliases that abstract over the implementing backing type.

# Background and Motivation

A motivating example is the `IString` type, an interned string type. A number of external crates could provide this
functionality. This module redirects to whatever chosen implementation we want. To use the
[`string_cache` crate](https://crates.io/crates/string_cache), we just define `IString` as an alias for
`string_cache::DefaultAtom`:

```ignore
pub use string_cache::DefaultAtom as IString;
```

For types or infrastructure with very different backing implementations, we define an abstraction layer over the
implementation. The `log` module could use any of a number of logging frameworks or even a bespoke solution for its
implementation. However, its (crate) public interface consists only of `set_global_logging_threshold()`/
`get_global_logging_threshold()` and the macros `critical!`, `error!`, `warning!`, `info!`, `debug!`, and `trace!`. The
(private) backing implementation is encapsulated in the `log` module.

The `nat_set` and `rc_cell` modules play the same role for, respectively, the ordered natural-number sets that back
`BASE` terms and the shared, internally-mutable term handles that back every other term kind.

*/

mod nat_set;
mod rc_cell;
mod string_join;

use std::collections::HashSet as StdHashSet;

// Logging
pub mod log;

// Interned string used for variable identifiers (`Ident`).
pub use string_cache::DefaultAtom as IString;

// region Items meant to be used only internally

// A set of (small) natural numbers, backing `BASE` term state sets. Public because it crosses the `api` trait
// boundary (e.g. `BaseAutomaton::non_occurring_vars`).
pub use nat_set::NatSet;

// Reference-counted, internally-mutable term handles and single-assignment cells.
pub(crate) use rc_cell::{ptr_id, OnceSlot};

// Join sequences with a separator.
pub(crate) use string_join::{join_string, join_iter};

/// A `Set<T>` is a plain hash set. Named for parity with the teacher's `ThingSet` alias.
pub type Set<T> = StdHashSet<T>;

// endregion
