/*!

The owning automaton node (§3 "`aut` | weak back-reference to the owning automaton node (never owning)"; §6
"ProjectionAutomaton..."). Every term's `aut` field is a `Weak<dyn ProjectionAutomaton>`; the node owns the
quantifier-free base automaton, an optional scheduling guide, and the list of variables it projects away.

*/

use crate::core::guide::FixpointGuide;

use super::base_automaton::BaseAutomaton;
use super::symbol::VarList;

/// An existential-projection node `∃ X. φ` in the automaton product, one per `FIXPOINT` term.
pub trait ProjectionAutomaton {
  /// The quantifier-free automaton transitions are computed against.
  fn base(&self) -> &dyn BaseAutomaton;

  /// The scheduling oracle for this node's worklist, if any (§4.6). `None` behaves identically to
  /// `Some(&NullGuide)` (§4.5 step 9 "Absent a guide, insert front").
  fn guide(&self) -> Option<&dyn FixpointGuide>;

  /// The track indices existentially quantified by this node.
  fn projected_vars(&self) -> &VarList;

  /// Whether this is the top-level node, whose fixpoint uses `UNGROUND_ROOT` search (GLOSSARY).
  fn is_root(&self) -> bool;
}

struct NoAutomaton;

impl ProjectionAutomaton for NoAutomaton {
  fn base(&self) -> &dyn BaseAutomaton {
    unreachable!("the no-automaton placeholder is never upgraded; its methods are never called")
  }

  fn guide(&self) -> Option<&dyn FixpointGuide> {
    None
  }

  fn projected_vars(&self) -> &VarList {
    unreachable!("the no-automaton placeholder is never upgraded; its methods are never called")
  }

  fn is_root(&self) -> bool {
    false
  }
}

/// A `Weak<dyn ProjectionAutomaton>` that never upgrades. Used to build terms that genuinely have no owning
/// automaton node — the `EMPTY` singleton, ephemeral subsumption residuals — without requiring `Weak::new()`,
/// which the standard library only offers for `Sized` types and not trait objects.
pub fn no_automaton() -> std::rc::Weak<dyn ProjectionAutomaton> {
  let strong: std::rc::Rc<dyn ProjectionAutomaton> = std::rc::Rc::new(NoAutomaton);
  std::rc::Rc::downgrade(&strong)
}
