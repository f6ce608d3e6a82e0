/*!

Symbol (track) construction (§1, out of scope; §6 "SymbolWorkshop..."). The core asks this collaborator to build
and trim symbols; it never allocates `Symbol`s directly, since the concrete track layout is owned by the front-end.

*/

use crate::abstractions::NatSet;

use super::symbol::{Symbol, TrackIndex, TrackValue};

/// Builds and trims [`Symbol`]s on behalf of the core.
pub trait SymbolWorkshop {
  /// Returns a copy of `symbol` restricted to the track positions named in `vars`, in the order `vars` iterates
  /// (`NatSet` iterates in increasing order). Used to eliminate non-occurring variables before a symbol is pumped
  /// (§4.5 "Symbol initialization").
  fn create_trimmed_symbol(&self, symbol: &Symbol, vars: &NatSet) -> Symbol;

  /// Returns a copy of `base` with `track` forced to `value`.
  fn create_symbol(&self, base: &Symbol, track: TrackIndex, value: TrackValue) -> Symbol;
}
