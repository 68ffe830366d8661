/// Prefix shared by every custom property name.
pub const CUSTOM_PROPERTY_PREFIX: &str = "--";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleSheet {
  pub rules: Vec<CssRule>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CssRule {
  Style(StyleRule),
  At(AtRule),
  Comment(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleRule {
  /// Selector list split at top-level commas, each entry trimmed
  pub selectors: Vec<String>,
  pub declarations: Vec<DeclarationItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeclarationItem {
  Declaration(Declaration),
  /// At-rule nested in a declaration block, e.g. `@top-center` inside `@page`
  At(AtRule),
  Comment(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
  pub property: String,
  /// Raw source text of the value, trimmed, including any `!important`
  pub value: String,
}

impl Declaration {
  pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
    Declaration {
      property: property.into(),
      value: value.into(),
    }
  }

  pub fn is_custom_property(&self) -> bool {
    self.property.starts_with(CUSTOM_PROPERTY_PREFIX)
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AtRule {
  /// Name without the leading `@`
  pub name: String,
  pub prelude: String,
  pub body: AtRuleBody,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AtRuleBody {
  /// Block-less at-rule such as `@import` or `@layer a, b;`
  Statement,
  Rules(Vec<CssRule>),
  Declarations(Vec<DeclarationItem>),
  /// Block contents of an at-rule we do not understand, kept verbatim
  Raw(String),
}

/// How the block of an at-rule is parsed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum AtRuleKind {
  /// Conditional group rules whose children are ordinary style rules
  Group,
  /// `@keyframes`, whose children are keyframe selectors
  Keyframes,
  Declarations,
  Raw,
}

impl AtRuleKind {
  pub(crate) fn of(name: &str) -> Self {
    let name = name.to_ascii_lowercase();

    if name.ends_with("keyframes") {
      return AtRuleKind::Keyframes;
    }

    match name.as_str() {
      "media" | "supports" | "container" | "layer" | "document" | "-moz-document"
      | "starting-style" | "scope" => AtRuleKind::Group,
      "font-face" | "page" | "property" | "counter-style" | "font-palette-values" | "viewport"
      | "-ms-viewport" => AtRuleKind::Declarations,
      _ => AtRuleKind::Raw,
    }
  }
}

impl AtRule {
  /// Whether the rules nested in this at-rule select elements and so need scoping.
  pub fn scopes_selectors(&self) -> bool {
    AtRuleKind::of(&self.name) == AtRuleKind::Group
  }
}
