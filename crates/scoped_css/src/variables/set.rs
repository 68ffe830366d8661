use std::collections::HashMap;
use std::ops::Deref;

use super::VariableEntry;
use crate::css::Declaration;

/// The variables of one stylesheet instance, rendered as a declaration block
/// for a single selector.
///
/// Rendered lines are cached by position: line 0 holds the selector, line
/// `n` the entry added n-th, and the last line the closing brace. After the
/// first render only entries changed since the previous render are rendered
/// again.
#[derive(Clone, Debug)]
pub struct VariableSet {
  selector: String,
  scope_token: String,
  indent: String,
  entries: Vec<VariableEntry>,
  by_name: HashMap<String, usize>,
  lines: Option<Vec<String>>,
  pending: Vec<usize>,
}

impl VariableSet {
  pub fn new(selector: impl Into<String>, scope_token: impl Into<String>) -> Self {
    VariableSet {
      selector: selector.into(),
      scope_token: scope_token.into(),
      indent: "  ".into(),
      entries: Vec::new(),
      by_name: HashMap::new(),
      lines: None,
      pending: Vec::new(),
    }
  }

  pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
    self.indent = indent.into();
    self.lines = None;
    self
  }

  pub fn selector(&self) -> &str {
    &self.selector
  }

  pub fn scope_token(&self) -> &str {
    &self.scope_token
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn entries(&self) -> &[VariableEntry] {
    &self.entries
  }

  /// Lookup names of all variables, in declaration order.
  pub fn variable_names(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(VariableEntry::name)
  }

  /// Appends a variable on the next free line.
  ///
  /// Sets are meant to be filled before their first render. Adding afterwards
  /// is allowed but throws away the whole line cache.
  pub fn add(&mut self, declaration: &Declaration, initial_value: Option<&str>) -> &VariableEntry {
    if self.lines.take().is_some() {
      tracing::debug!(
        selector = %self.selector,
        "Variable added after render, invalidating line cache"
      );
      self.pending.clear();
    }

    let index = self.entries.len();
    let mut entry = VariableEntry::new(declaration, &self.scope_token, index + 1);
    if let Some(value) = initial_value {
      entry.set_value(value);
    }

    // A repeated name shadows the earlier entry for lookups but both keep rendering
    self.by_name.insert(entry.name().to_string(), index);
    self.entries.push(entry);

    &self.entries[index]
  }

  /// Finds a variable by its name without the `--` prefix.
  pub fn lookup(&self, name: &str) -> Option<&VariableEntry> {
    self.by_name.get(name).map(|index| &self.entries[*index])
  }

  /// Mutable access to a variable. Changes made through the returned handle are
  /// picked up by the next [`VariableSet::render`].
  pub fn lookup_mut(&mut self, name: &str) -> Option<VariableMut<'_>> {
    let index = *self.by_name.get(name)?;

    Some(VariableMut {
      entry: &mut self.entries[index],
      index,
      pending: &mut self.pending,
      tracking: self.lines.is_some(),
    })
  }

  /// Overrides a variable. Unknown names are ignored and report no change.
  pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
    self
      .lookup_mut(name)
      .is_some_and(|mut variable| variable.set_value(value))
  }

  pub fn unset_value(&mut self, name: &str) -> bool {
    self
      .lookup_mut(name)
      .is_some_and(|mut variable| variable.unset_value())
  }

  /// Applies a batch of changes, where a missing or empty value unsets the
  /// variable. Returns whether any of them changed the rendered output.
  pub fn apply<I, K, V>(&mut self, changes: I) -> bool
  where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: AsRef<str>,
    V: AsRef<str>,
  {
    let mut has_changed = false;

    for (name, value) in changes {
      let changed = match value {
        Some(value) if !value.as_ref().is_empty() => self.set_value(name.as_ref(), value.as_ref()),
        _ => self.unset_value(name.as_ref()),
      };
      has_changed |= changed;
    }

    has_changed
  }

  /// Renders the declaration block, reusing cached lines of unchanged entries.
  pub fn render(&mut self) -> String {
    let lines = match self.lines.take() {
      Some(mut lines) => {
        let changed = self.pending.len();
        for index in self.pending.drain(..) {
          lines[index + 1] = render_line(&self.indent, &self.entries[index]);
        }

        tracing::trace!(changed, total = self.entries.len(), "Re-rendered variable lines");
        lines
      }
      None => {
        self.pending.clear();

        let mut lines = Vec::with_capacity(self.entries.len() + 2);
        lines.push(format!("{} {{", self.selector));
        lines.extend(
          self
            .entries
            .iter()
            .map(|entry| render_line(&self.indent, entry)),
        );
        lines.push("}".to_string());
        lines
      }
    };

    let text = lines.join("\n");
    self.lines = Some(lines);
    text
  }
}

fn render_line(indent: &str, entry: &VariableEntry) -> String {
  format!("{indent}{}", entry.render())
}

/// Write access to one entry of a [`VariableSet`] that records changes for
/// the next render.
pub struct VariableMut<'a> {
  entry: &'a mut VariableEntry,
  index: usize,
  pending: &'a mut Vec<usize>,
  tracking: bool,
}

impl VariableMut<'_> {
  pub fn set_value(&mut self, value: impl Into<String>) -> bool {
    let changed = self.entry.set_value(value);
    self.record(changed)
  }

  pub fn unset_value(&mut self) -> bool {
    let changed = self.entry.unset_value();
    self.record(changed)
  }

  fn record(&mut self, changed: bool) -> bool {
    // Before the first render there is no cache to patch
    if changed && self.tracking {
      self.pending.push(self.index);
    }
    changed
  }
}

impl Deref for VariableMut<'_> {
  type Target = VariableEntry;

  fn deref(&self) -> &Self::Target {
    self.entry
  }
}

#[cfg(test)]
mod tests {
  use indoc::indoc;
  use pretty_assertions::assert_eq;
  use rand::rngs::StdRng;
  use rand::{Rng, SeedableRng};

  use super::*;

  fn declarations() -> Vec<Declaration> {
    vec![
      Declaration::new("--color", "red"),
      Declaration::new("--size", "10px"),
      Declaration::new("--shadow", "none"),
    ]
  }

  fn variable_set() -> VariableSet {
    let mut set = VariableSet::new(".tok.card-x1", "tok");
    for declaration in declarations() {
      set.add(&declaration, None);
    }
    set
  }

  #[test]
  fn renders_a_declaration_block() {
    let mut set = variable_set();

    assert_eq!(
      set.render(),
      indoc! {"
        .tok.card-x1 {
          --tok-color: red;
          --tok-size: 10px;
          --tok-shadow: none;
        }"}
    );
  }

  #[test]
  fn renders_an_empty_block() {
    let mut set = VariableSet::new(".tok.x", "tok");

    assert_eq!(set.render(), ".tok.x {\n}");
  }

  #[test]
  fn assigns_lines_in_insertion_order() {
    let set = variable_set();

    assert_eq!(
      set.entries().iter().map(VariableEntry::line).collect::<Vec<_>>(),
      vec![1, 2, 3]
    );
    assert_eq!(set.variable_names().collect::<Vec<_>>(), vec!["color", "size", "shadow"]);
  }

  #[test]
  fn looks_up_by_unprefixed_name() {
    let set = variable_set();

    assert_eq!(set.lookup("size").map(VariableEntry::default_value), Some("10px"));
    assert_eq!(set.lookup("--size"), None);
    assert_eq!(set.lookup("missing"), None);
  }

  #[test]
  fn applies_initial_values() {
    let mut set = VariableSet::new(".tok.x", "tok");
    set.add(&Declaration::new("--color", "red"), Some("blue"));

    assert_eq!(set.render(), ".tok.x {\n  --tok-color: blue;\n}");
  }

  #[test]
  fn rerenders_changed_lines() {
    let mut set = variable_set();
    set.render();

    assert!(set.set_value("size", "12px"));
    assert!(set.lookup_mut("color").is_some_and(|mut color| color.set_value("green")));
    assert_eq!(
      set.render(),
      indoc! {"
        .tok.card-x1 {
          --tok-color: green;
          --tok-size: 12px;
          --tok-shadow: none;
        }"}
    );

    assert!(set.unset_value("color"));
    assert!(set.render().contains("--tok-color: red;"));
  }

  #[test]
  fn ignores_unknown_names() {
    let mut set = variable_set();

    assert!(!set.set_value("missing", "1"));
    assert!(!set.unset_value("missing"));
  }

  #[test]
  fn applies_batches() {
    let mut set = variable_set();
    set.set_value("shadow", "0 0 1px black");
    set.render();

    assert!(set.apply([
      ("color", Some("blue")),
      ("shadow", None),
      ("missing", Some("1px")),
    ]));
    assert!(!set.apply([("color", Some("blue"))]));
    assert!(set.apply([("color", Some(""))]));
    assert!(!set.apply(Vec::<(&str, Option<&str>)>::new()));
    assert_eq!(set.lookup("color").and_then(VariableEntry::value), None);
    assert_eq!(set.lookup("shadow").and_then(VariableEntry::value), None);
  }

  #[test]
  fn adding_after_render_invalidates_the_cache() {
    let mut set = variable_set();
    set.render();
    set.set_value("color", "blue");

    let entry = set.add(&Declaration::new("--gap", "4px"), None);
    assert_eq!(entry.line(), 4);

    assert_eq!(
      set.render(),
      indoc! {"
        .tok.card-x1 {
          --tok-color: blue;
          --tok-size: 10px;
          --tok-shadow: none;
          --tok-gap: 4px;
        }"}
    );
  }

  #[test]
  fn repeated_names_keep_rendering_but_the_last_one_wins_lookups() {
    let mut set = VariableSet::new(".tok.x", "tok");
    set.add(&Declaration::new("--color", "red"), None);
    set.add(&Declaration::new("--color", "blue"), None);

    assert_eq!(set.lookup("color").map(VariableEntry::line), Some(2));
    assert_eq!(
      set.render(),
      ".tok.x {\n  --tok-color: red;\n  --tok-color: blue;\n}"
    );
  }

  #[test]
  fn incremental_render_matches_a_fresh_render() {
    let names = ["color", "size", "shadow"];
    let values = ["a", "b", "c"];
    let mut rng = StdRng::seed_from_u64(42);
    let mut set = variable_set();

    for step in 0..500 {
      let name = names[rng.gen_range(0..names.len())];
      if rng.gen_bool(0.3) {
        set.unset_value(name);
      } else {
        set.set_value(name, values[rng.gen_range(0..values.len())]);
      }

      if step % 3 == 0 {
        let incremental = set.render();

        let mut fresh = variable_set();
        for entry in set.entries() {
          if let Some(value) = entry.value() {
            fresh.set_value(entry.name(), value);
          }
        }

        assert_eq!(incremental, fresh.render(), "diverged at step {step}");
      }
    }
  }
}
