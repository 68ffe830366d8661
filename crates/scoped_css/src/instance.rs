use std::collections::BTreeMap;

use crate::variables::VariableSet;

/// Style text owned by a single instance, kept in sync with its variables.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleBlock {
  text: String,
}

impl StyleBlock {
  pub(crate) fn new(text: String) -> Self {
    StyleBlock { text }
  }

  pub fn text(&self) -> &str {
    &self.text
  }
}

/// One independently overridable use of a [`crate::ScopedStylesheet`].
#[derive(Debug)]
pub struct StylesheetInstance {
  class_name: String,
  instance_class: String,
  variables: VariableSet,
  style_block: Option<StyleBlock>,
}

impl StylesheetInstance {
  pub(crate) fn new(
    scope_token: &str,
    instance_class: String,
    variables: VariableSet,
    style_block: Option<StyleBlock>,
  ) -> Self {
    StylesheetInstance {
      class_name: format!("{scope_token} {instance_class}"),
      instance_class,
      variables,
      style_block,
    }
  }

  /// Scope token and instance class, ready for a `class` attribute.
  pub fn class_name(&self) -> &str {
    &self.class_name
  }

  pub fn instance_class(&self) -> &str {
    &self.instance_class
  }

  /// [`StylesheetInstance::class_name`] followed by a caller supplied class.
  pub fn class_name_with(&self, extra: Option<&str>) -> String {
    match extra {
      Some(extra) if !extra.is_empty() => format!("{} {extra}", self.class_name),
      _ => self.class_name.clone(),
    }
  }

  pub fn variables(&self) -> &VariableSet {
    &self.variables
  }

  pub fn style_block(&self) -> Option<&StyleBlock> {
    self.style_block.as_ref()
  }

  /// Overrides one variable. The owned style block, if any, is refreshed
  /// right away.
  pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
    let changed = self.variables.set_value(name, value);
    if changed {
      self.refresh_style_block();
    }
    changed
  }

  pub fn unset_value(&mut self, name: &str) -> bool {
    let changed = self.variables.unset_value(name);
    if changed {
      self.refresh_style_block();
    }
    changed
  }

  /// Renders the variable block and stores it in the owned style block.
  pub fn render(&mut self) -> String {
    let text = self.variables.render();
    if let Some(style_block) = &mut self.style_block {
      style_block.text.clone_from(&text);
    }
    text
  }

  fn refresh_style_block(&mut self) {
    if self.style_block.is_some() {
      self.render();
    }
  }

  /// Applies variable changes and, if anything changed, returns the freshly
  /// rendered block. The owned style block is updated along the way.
  pub fn set_vars<I, K, V>(&mut self, changes: I) -> Option<String>
  where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: AsRef<str>,
    V: AsRef<str>,
  {
    if !self.variables.apply(changes) {
      return None;
    }

    Some(self.render())
  }
}

/// Turns successive `name -> value` snapshots into variable changes.
///
/// Names that are new or whose value changed come out with `Some(value)`, names
/// that disappeared with `None`, each group sorted by name.
#[derive(Debug, Default)]
pub struct VariableDiff {
  previous: BTreeMap<String, String>,
}

impl VariableDiff {
  pub fn diff<I, K, V>(&mut self, current: I) -> Vec<(String, Option<String>)>
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    let current = current
      .into_iter()
      .map(|(name, value)| (name.into(), value.into()))
      .collect::<BTreeMap<String, String>>();

    let mut changes = current
      .iter()
      .filter(|(name, value)| self.previous.get(*name) != Some(*value))
      .map(|(name, value)| (name.clone(), Some(value.clone())))
      .collect::<Vec<_>>();

    changes.extend(
      self
        .previous
        .keys()
        .filter(|name| !current.contains_key(*name))
        .map(|name| (name.clone(), None)),
    );

    self.previous = current;
    changes
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use pretty_assertions::assert_eq;

  use super::*;
  use crate::css::Declaration;

  fn instance(own_style_block: bool) -> StylesheetInstance {
    let mut variables = VariableSet::new(".tok.card-x1", "tok");
    variables.add(&Declaration::new("--color", "red"), None);
    variables.add(&Declaration::new("--size", "1px"), None);

    let style_block = own_style_block.then(|| StyleBlock::new(variables.render()));
    StylesheetInstance::new("tok", "card-x1".into(), variables, style_block)
  }

  #[test]
  fn combines_class_names() {
    let instance = instance(false);

    assert_eq!(instance.class_name(), "tok card-x1");
    assert_eq!(instance.class_name_with(Some("wide")), "tok card-x1 wide");
    assert_eq!(instance.class_name_with(Some("")), "tok card-x1");
    assert_eq!(instance.class_name_with(None), "tok card-x1");
  }

  #[test]
  fn set_vars_refreshes_the_style_block() {
    let mut instance = instance(true);

    let text = instance.set_vars([("color", Some("blue"))]);

    assert_eq!(
      text.as_deref(),
      Some(".tok.card-x1 {\n  --tok-color: blue;\n  --tok-size: 1px;\n}")
    );
    assert_eq!(instance.style_block().map(StyleBlock::text), text.as_deref());
  }

  #[test]
  fn single_changes_keep_the_style_block_current() {
    let mut instance = instance(true);

    assert!(instance.set_value("color", "blue"));
    assert!(!instance.set_value("missing", "blue"));
    assert_eq!(
      instance.style_block().map(StyleBlock::text),
      Some(".tok.card-x1 {\n  --tok-color: blue;\n  --tok-size: 1px;\n}")
    );

    assert!(instance.unset_value("color"));
    let rendered = instance.render();
    assert_eq!(instance.style_block().map(StyleBlock::text), Some(rendered.as_str()));
    assert!(rendered.contains("--tok-color: red;"));
  }

  #[test]
  fn changes_without_a_style_block_wait_for_render() {
    let mut instance = instance(false);

    assert!(instance.set_value("size", "2px"));
    assert_eq!(instance.style_block(), None);
    assert!(instance.render().contains("--tok-size: 2px;"));
  }

  #[test]
  fn set_vars_reports_no_change() {
    let mut instance = instance(true);
    let before = instance.style_block().cloned();

    assert_eq!(instance.set_vars([("color", None::<&str>)]), None);
    assert_eq!(instance.set_vars([("unknown", Some("1"))]), None);
    assert_eq!(instance.style_block().cloned(), before);
  }

  #[test]
  fn diffs_snapshots() {
    let mut diff = VariableDiff::default();

    assert_eq!(
      diff.diff([("size", "2px"), ("color", "blue")]),
      vec![
        ("color".to_string(), Some("blue".to_string())),
        ("size".to_string(), Some("2px".to_string())),
      ]
    );
    assert!(diff.diff([("size", "2px"), ("color", "blue")]).is_empty());
    assert_eq!(
      diff.diff(HashMap::from([("size", "3px")])),
      vec![
        ("size".to_string(), Some("3px".to_string())),
        ("color".to_string(), None),
      ]
    );
  }

  #[test]
  fn diffs_feed_set_vars() {
    let mut instance = instance(false);
    let mut diff = VariableDiff::default();

    let changes = diff.diff([("color", "blue")]);
    assert!(instance.set_vars(changes).is_some());

    let changes = diff.diff(Vec::<(String, String)>::new());
    let text = instance.set_vars(changes);
    assert_eq!(
      text.as_deref(),
      Some(".tok.card-x1 {\n  --tok-color: red;\n  --tok-size: 1px;\n}")
    );
  }
}
