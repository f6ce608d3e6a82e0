/*!

The scheduling oracle for a fixpoint's worklist (§4.6). A guide is a read-only oracle: it decides how a saturation
step should schedule one candidate, but it never mutates the fixpoint itself.

*/

use crate::api::Symbol;

use super::term::TermPtr;
use super::GuideTip;

/// Orders and prunes the symbols a [`super::term::fixpoint::FixpointTerm`] pushes onto its worklist.
pub trait FixpointGuide {
  /// Decides whether the whole symbol fan-out is pushed (`GuideTip::Project`) or collapsed to the single
  /// `projected_symbol` (`GuideTip::ProjectAll`), for the given seed term.
  fn fanout(&self, term: &TermPtr) -> GuideTip;

  /// Per-symbol scheduling decision for a candidate `(term, symbol)` pair.
  fn give_tip(&self, term: &TermPtr, symbol: &Symbol) -> GuideTip;
}

/// The default guide: every candidate is inserted at the front of the worklist and the full symbol fan-out is
/// always used, matching "Absent a guide, insert front" (§4.5 step 9).
#[derive(Copy, Clone, Debug, Default)]
pub struct NullGuide;

impl FixpointGuide for NullGuide {
  fn fanout(&self, _term: &TermPtr) -> GuideTip {
    GuideTip::Project
  }

  fn give_tip(&self, _term: &TermPtr, _symbol: &Symbol) -> GuideTip {
    GuideTip::Front
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::term::TermNode;

  #[test]
  fn null_guide_always_fronts_and_projects() {
    let guide = NullGuide;
    let guide_obj: &dyn FixpointGuide = &guide;
    let seed = TermNode::new_empty(false);
    let symbol = Symbol::new(vec![]);

    assert_eq!(guide_obj.fanout(&seed), GuideTip::Project);
    assert_eq!(guide_obj.give_tip(&seed, &symbol), GuideTip::Front);
  }
}
