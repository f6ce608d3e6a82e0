/*!

Graph-dump of a term DAG to Graphviz `dot` (§6 "`term.to_dot(stream)`"). Not required for correctness — grounded
on the source's `Term::ToDot`/`*::DumpToDot` (`Term.cpp`), which recursively emits one node per term and an edge
per child, wrapped in `strict graph aut { ... }`.

Unlike the source, which mints a fresh node name on every visit (even revisiting the same term), this dump keys on
term identity ([`ptr_id`]) so a shared subterm is drawn once with multiple incoming edges — the accurate picture of
a DAG rather than the source's unrolled tree.

*/

use std::collections::HashMap;
use std::io::{self, Write};

use crate::abstractions::{join_string, ptr_id};
use crate::core::ProductKind;

use super::term::{TermKind, TermPtr};

/// Writes `term`'s DAG to `out` as a `strict graph` (§6). Product/ternary/nary edges are unlabeled but colored by
/// product kind; fixpoint worklist edges are dashed.
pub fn to_dot(term: &TermPtr, out: &mut dyn Write) -> io::Result<()> {
  writeln!(out, "strict graph aut {{")?;
  let mut seen = HashMap::new();
  let mut counter = 0usize;
  dump(term, out, &mut seen, &mut counter)?;
  writeln!(out, "}}")
}

fn color_for(kind: ProductKind) -> &'static str {
  match kind {
    ProductKind::Intersection => "blue",
    ProductKind::Union => "red",
    ProductKind::Implication => "forestgreen",
    ProductKind::Iff => "purple",
  }
}

fn symbol_for(kind: ProductKind) -> &'static str {
  match kind {
    ProductKind::Intersection => "\u{2229}",
    ProductKind::Union => "\u{222a}",
    ProductKind::Implication => "\u{2192}",
    ProductKind::Iff => "\u{2194}",
  }
}

fn fresh(prefix: &str, counter: &mut usize) -> String {
  let name = format!("{prefix}{counter}");
  *counter += 1;
  name
}

/// Dumps `term` (and its children, recursively) and returns the dot node name assigned to it. Memoized on
/// [`ptr_id`] so revisiting a shared subterm reuses the existing node instead of redrawing it.
fn dump(
  term: &TermPtr,
  out: &mut dyn Write,
  seen: &mut HashMap<usize, String>,
  counter: &mut usize,
) -> io::Result<String> {
  let id = ptr_id(term);
  if let Some(name) = seen.get(&id) {
    return Ok(name.clone());
  }

  let complement_prefix = if term.is_complemented() { "~" } else { "" };

  let name = match term.kind() {
    TermKind::Empty => {
      let name = fresh("te", counter);
      seen.insert(id, name.clone());
      writeln!(out, "\t{name} [label=\"{complement_prefix}\u{2205}\"];")?;
      name
    }

    TermKind::Base(base) => {
      let name = fresh("tbs", counter);
      seen.insert(id, name.clone());
      let states = join_string(base.iter(), ",");
      writeln!(out, "\t{name} [label=\"{complement_prefix}{{{states}}}\"];")?;
      name
    }

    TermKind::Product(p) => {
      let name = fresh("tp", counter);
      seen.insert(id, name.clone());
      writeln!(out, "\t{name} [label=\"{}\"];", symbol_for(p.kind))?;
      let left = dump(&p.left, out, seen, counter)?;
      let right = dump(&p.right, out, seen, counter)?;
      writeln!(out, "\t{name} -- {left} [color={}];", color_for(p.kind))?;
      writeln!(out, "\t{name} -- {right} [color={}];", color_for(p.kind))?;
      name
    }

    TermKind::Ternary(t) => {
      let name = fresh("ttp", counter);
      seen.insert(id, name.clone());
      writeln!(out, "\t{name} [label=\"{}\"];", symbol_for(t.kind))?;
      for child in [&t.left, &t.middle, &t.right] {
        let child_name = dump(child, out, seen, counter)?;
        writeln!(out, "\t{name} -- {child_name} [color={}];", color_for(t.kind))?;
      }
      name
    }

    TermKind::Nary(n) => {
      let name = fresh("tnp", counter);
      seen.insert(id, name.clone());
      writeln!(out, "\t{name} [label=\"{}\"];", symbol_for(n.kind))?;
      for child in &n.children {
        let child_name = dump(child, out, seen, counter)?;
        writeln!(out, "\t{name} -- {child_name} [color={}];", color_for(n.kind))?;
      }
      name
    }

    TermKind::List(members) => {
      let name = fresh("tl", counter);
      seen.insert(id, name.clone());
      writeln!(out, "\t{name} [label=\"{complement_prefix}L\"];")?;
      for member in members {
        let child_name = dump(member, out, seen, counter)?;
        writeln!(out, "\t{name} -- {child_name};")?;
      }
      name
    }

    TermKind::Continuation(c) => {
      let name = fresh("tc", counter);
      seen.insert(id, name.clone());
      let style = if c.is_unfolded() { "solid" } else { "dotted" };
      writeln!(out, "\t{name} [label=\"C\",style={style}];")?;
      name
    }

    TermKind::Fixpoint(f) => {
      let name = fresh("tf", counter);
      seen.insert(id, name.clone());
      writeln!(out, "\t{name} [label=\"{complement_prefix}F\"];")?;
      for member in f.live_members() {
        let child_name = dump(&member, out, seen, counter)?;
        writeln!(out, "\t{name} -- {child_name};")?;
      }
      for (member, _symbol) in f.worklist_items() {
        let child_name = dump(&member, out, seen, counter)?;
        writeln!(out, "\t{name} -- {child_name} [style=dashed];")?;
      }
      name
    }
  };

  Ok(name)
}
