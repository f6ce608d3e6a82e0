/*!

Symbols (tracks) and the variable-to-track map. Both are owned by external collaborators (§1: "Symbol (track)
construction and the variable-to-track mapping" is out of scope for the core); this module only fixes the concrete
shape the core and its collaborators exchange across the `api` boundary.

*/

use crate::abstractions::IString;

/// An interned variable identifier, shared with the front-end's own identifiers.
pub type Ident = IString;

/// The position of a variable's track within a [`Symbol`].
pub type TrackIndex = usize;

/// A base-automaton state id, opaque to the core beyond ordering and equality.
pub type StateId = u32;

/// The track indices a `ProjectionAutomaton` existentially quantifies over.
pub type VarList = Vec<TrackIndex>;

/// The value carried by one track position of a [`Symbol`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TrackValue {
  Zero,
  One,
  /// The don't-care marker `X`, matched by either `0` or `1`.
  DontCare,
}

impl TrackValue {
  pub fn from_char(c: char) -> Option<Self> {
    match c {
      '0' => Some(TrackValue::Zero),
      '1' => Some(TrackValue::One),
      'X' | 'x' => Some(TrackValue::DontCare),
      _ => None,
    }
  }

  pub fn as_char(self) -> char {
    match self {
      TrackValue::Zero => '0',
      TrackValue::One => '1',
      TrackValue::DontCare => 'X',
    }
  }
}

/// One transition letter: a tuple of track values, one per bound variable. `Symbol`s are produced and trimmed by a
/// [`super::symbol_workshop::SymbolWorkshop`]; the core only reads, compares, and hashes them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
  tracks: Vec<TrackValue>,
}

impl Symbol {
  pub fn new(tracks: Vec<TrackValue>) -> Self {
    Symbol { tracks }
  }

  pub fn len(&self) -> usize {
    self.tracks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tracks.is_empty()
  }

  pub fn get(&self, track: TrackIndex) -> Option<TrackValue> {
    self.tracks.get(track).copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = TrackValue> + '_ {
    self.tracks.iter().copied()
  }

  /// Returns a copy of `self` with `track` forced to `value`, used when pumping a projected variable's `1` value
  /// into every existing symbol (§4.5 "Symbol initialization").
  pub fn with_track(&self, track: TrackIndex, value: TrackValue) -> Symbol {
    let mut tracks = self.tracks.clone();
    if track < tracks.len() {
      tracks[track] = value;
    }
    Symbol::new(tracks)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn track_value_round_trips_through_char() {
    for c in ['0', '1', 'X'] {
      let v = TrackValue::from_char(c).unwrap();
      assert_eq!(v.as_char(), c);
    }
    assert_eq!(TrackValue::from_char('x').unwrap(), TrackValue::DontCare);
    assert!(TrackValue::from_char('?').is_none());
  }

  #[test]
  fn with_track_overrides_a_single_position() {
    let base = Symbol::new(vec![TrackValue::Zero, TrackValue::Zero, TrackValue::DontCare]);
    let pumped = base.with_track(1, TrackValue::One);
    assert_eq!(pumped.get(0), Some(TrackValue::Zero));
    assert_eq!(pumped.get(1), Some(TrackValue::One));
    assert_eq!(pumped.get(2), Some(TrackValue::DontCare));
  }
}
