use super::ast::{AtRule, AtRuleBody, CssRule, DeclarationItem, StyleRule, StyleSheet};

#[derive(Clone, Debug, PartialEq)]
pub struct PrintOptions {
  /// One level of indentation
  pub indent: String,
}

impl Default for PrintOptions {
  fn default() -> Self {
    PrintOptions {
      indent: "  ".into(),
    }
  }
}

impl StyleSheet {
  /// Serializes the rule tree in expanded form, one declaration per line and a
  /// blank line between rules. Style rules without declarations are dropped.
  pub fn to_css(&self, options: &PrintOptions) -> String {
    Printer { options }.rules(&self.rules, 0)
  }
}

impl StyleRule {
  pub fn to_css(&self, options: &PrintOptions) -> String {
    Printer { options }.style_rule(self, 0).unwrap_or_default()
  }
}

struct Printer<'a> {
  options: &'a PrintOptions,
}

impl Printer<'_> {
  fn pad(&self, depth: usize) -> String {
    self.options.indent.repeat(depth)
  }

  fn rules(&self, rules: &[CssRule], depth: usize) -> String {
    rules
      .iter()
      .filter_map(|rule| self.rule(rule, depth))
      .collect::<Vec<_>>()
      .join("\n\n")
  }

  fn rule(&self, rule: &CssRule, depth: usize) -> Option<String> {
    match rule {
      CssRule::Style(style_rule) => self.style_rule(style_rule, depth),
      CssRule::At(at_rule) => Some(self.at_rule(at_rule, depth)),
      CssRule::Comment(text) => Some(format!("{}/*{}*/", self.pad(depth), text)),
    }
  }

  fn style_rule(&self, rule: &StyleRule, depth: usize) -> Option<String> {
    if rule.declarations.is_empty() {
      return None;
    }

    let pad = self.pad(depth);
    let selectors = rule
      .selectors
      .iter()
      .map(|selector| format!("{pad}{selector}"))
      .collect::<Vec<_>>()
      .join(",\n");

    Some(format!(
      "{selectors} {{\n{}\n{pad}}}",
      self.declarations(&rule.declarations, depth + 1)
    ))
  }

  fn declarations(&self, items: &[DeclarationItem], depth: usize) -> String {
    let pad = self.pad(depth);

    items
      .iter()
      .map(|item| match item {
        DeclarationItem::Declaration(declaration) => {
          format!("{pad}{}: {};", declaration.property, declaration.value)
        }
        DeclarationItem::At(at_rule) => self.at_rule(at_rule, depth),
        DeclarationItem::Comment(text) => format!("{pad}/*{text}*/"),
      })
      .collect::<Vec<_>>()
      .join("\n")
  }

  fn at_rule(&self, rule: &AtRule, depth: usize) -> String {
    let pad = self.pad(depth);
    let header = if rule.prelude.is_empty() {
      format!("{pad}@{}", rule.name)
    } else {
      format!("{pad}@{} {}", rule.name, rule.prelude)
    };

    let body = match &rule.body {
      AtRuleBody::Statement => return format!("{header};"),
      AtRuleBody::Raw(raw) => return format!("{header} {{{raw}}}"),
      AtRuleBody::Rules(rules) => self.rules(rules, depth + 1),
      AtRuleBody::Declarations(items) => self.declarations(items, depth + 1),
    };

    if body.is_empty() {
      format!("{header} {{}}")
    } else {
      format!("{header} {{\n{body}\n{pad}}}")
    }
  }
}
