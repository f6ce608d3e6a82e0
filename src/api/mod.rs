/*!

Traits and wire types the core consumes from its external collaborators (§1, §6): the formula front-end, the
deterministic base-automaton library, and symbol/track construction. The core never implements any of these
itself — it is generic/dyn-dispatched over them and ships no front-end, no base-automaton library, and no track
builder of its own.

*/

mod base_automaton;
mod projection_automaton;
mod symbol;
mod symbol_workshop;
mod var_map;

pub use base_automaton::BaseAutomaton;
pub use projection_automaton::{no_automaton, ProjectionAutomaton};
pub use symbol::{Ident, StateId, Symbol, TrackIndex, TrackValue, VarList};
pub use symbol_workshop::SymbolWorkshop;
pub use var_map::VarMap;
