/*!

The core's recoverable error type. Precondition violations and not-implemented fall-through paths (§7) are
programmer errors and are raised with `panic!`/`debug_assert!` at the point of violation, matching the teacher's
treatment of invariant violations elsewhere (`assert!(!symbol.is_null())` and friends); they are not represented
here. `CoreError` only covers the two kinds §7 calls genuinely recoverable: allocation failure from the workshop and
failures propagated from the base-automaton collaborator.

*/

use std::fmt::{Display, Formatter};

/// Errors a caller of the core can recover from by aborting the current decision procedure run.
#[derive(Debug)]
pub enum CoreError {
  /// The workshop could not allocate a new term.
  OutOfMemory,
  /// `BaseAutomaton::intersect_nonempty` (or another collaborator method) failed; the collaborator's error is
  /// boxed and carried verbatim.
  BaseAutomatonFailure(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Display for CoreError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      CoreError::OutOfMemory => write!(f, "term workshop ran out of memory"),
      CoreError::BaseAutomatonFailure(source) => write!(f, "base automaton failure: {}", source),
    }
  }
}

impl std::error::Error for CoreError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      CoreError::OutOfMemory => None,
      CoreError::BaseAutomatonFailure(source) => Some(source.as_ref()),
    }
  }
}

pub type CoreResult<T> = Result<T, CoreError>;
