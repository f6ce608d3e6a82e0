/*!

The deterministic base-automaton library (§1, out of scope; §6 "BaseAutomaton..."). The core calls into one
`BaseAutomaton` per automaton node to compute transitions; it never constructs or determinizes one itself.

*/

use crate::abstractions::NatSet;
use crate::core::error::CoreResult;
use crate::core::term::TermPtr;

use super::symbol::Symbol;

/// A quantifier-free, deterministic tree automaton over a fixed track alphabet, supplied by the driver.
///
/// Every method here is a pure query against the automaton's own transition table; none of them touch the term
/// workshop, caches, or fixpoint machinery owned by the core.
pub trait BaseAutomaton {
  /// The successor state set of `term` under `symbol`, plus whether the result epsilon-accepts. This is the single
  /// operation a `CONTINUATION` suspends (§4.4) and a fixpoint saturation step drives (§4.5 step 3).
  fn intersect_nonempty(
    &self,
    symbol: &Symbol,
    term: &TermPtr,
    complement: bool,
  ) -> CoreResult<(TermPtr, bool)>;

  /// The term denoting the automaton's initial state set.
  fn initial_states(&self) -> TermPtr;

  /// The term denoting the automaton's final (accepting) state set.
  fn final_states(&self) -> TermPtr;

  /// Track indices that do not occur in any transition guard, trimmed out of every symbol before it is pumped
  /// (§4.5 "Symbol initialization").
  fn non_occurring_vars(&self) -> NatSet;

  /// Normalizes `symbol` to this automaton's own track layout, e.g. after trimming non-occurring variables.
  fn remap_symbol(&self, symbol: &Symbol) -> Symbol;
}
