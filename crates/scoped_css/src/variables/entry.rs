use crate::css::{Declaration, CUSTOM_PROPERTY_PREFIX};
use crate::scope_transform::scoped_name;

/// Runtime state of one scope variable inside a [`super::VariableSet`].
#[derive(Clone, Debug, PartialEq)]
pub struct VariableEntry {
  original_name: String,
  name: String,
  scoped_name: String,
  default_value: String,
  value: Option<String>,
  line: usize,
}

impl VariableEntry {
  pub fn new(declaration: &Declaration, scope_token: &str, line: usize) -> Self {
    let original_name = declaration.property.clone();

    VariableEntry {
      name: original_name
        .strip_prefix(CUSTOM_PROPERTY_PREFIX)
        .unwrap_or(&original_name)
        .to_string(),
      scoped_name: scoped_name(&original_name, scope_token),
      default_value: declaration.value.clone(),
      value: None,
      line,
      original_name,
    }
  }

  /// Name as written in the source, e.g. `--color`.
  pub fn original_name(&self) -> &str {
    &self.original_name
  }

  /// Lookup name without the `--` prefix, e.g. `color`.
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn scoped_name(&self) -> &str {
    &self.scoped_name
  }

  pub fn default_value(&self) -> &str {
    &self.default_value
  }

  /// The override, if one is set.
  pub fn value(&self) -> Option<&str> {
    self.value.as_deref()
  }

  /// The value that ends up in the rendered declaration.
  pub fn current_value(&self) -> &str {
    self.value.as_deref().unwrap_or(&self.default_value)
  }

  /// 1-based line of this entry in its set's rendered block.
  pub fn line(&self) -> usize {
    self.line
  }

  pub fn is_overridden(&self) -> bool {
    self.value.is_some()
  }

  /// Overrides the default value. Returns whether the rendered output changed.
  pub fn set_value(&mut self, value: impl Into<String>) -> bool {
    let value = value.into();
    if self.value.as_ref() == Some(&value) {
      return false;
    }

    self.value = Some(value);
    true
  }

  /// Falls back to the default value. Returns whether an override was set.
  pub fn unset_value(&mut self) -> bool {
    self.value.take().is_some()
  }

  pub fn render(&self) -> String {
    format!("{}: {};", self.scoped_name, self.current_value())
  }
}
