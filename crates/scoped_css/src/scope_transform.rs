use std::borrow::Cow;
use std::collections::HashMap;

use crate::css::{
  self, AtRule, AtRuleBody, CssRule, Declaration, DeclarationItem, PrintOptions, StyleRule,
  CUSTOM_PROPERTY_PREFIX,
};
use crate::error::Result;
use crate::var_scanner::replace_var_references_with;

/// Selector of the rule that declares a stylesheet's variables and base styles.
pub const SCOPE_SELECTOR: &str = ":scope";

/// Renames a custom property into the namespace of `scope_token`,
/// e.g. `--color` in scope `a1b2` becomes `--a1b2-color`.
pub fn scoped_name(name: &str, scope_token: &str) -> String {
  let unprefixed = name.strip_prefix(CUSTOM_PROPERTY_PREFIX).unwrap_or(name);
  format!("{CUSTOM_PROPERTY_PREFIX}{scope_token}-{unprefixed}")
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformOptions {
  pub print: PrintOptions,
  /// Replace a leading `:scope` with the scope class (`:scope:hover` becomes
  /// `.T:hover`) instead of nesting the whole selector under it.
  pub replace_leading_scope: bool,
}

/// The result of scoping one stylesheet source to a scope token.
#[derive(Clone, Debug, PartialEq)]
pub struct ScopeTransform {
  scope_token: String,
  scope_variables: Vec<Declaration>,
  renames: HashMap<String, String>,
  css: String,
}

impl ScopeTransform {
  /// Parses `source`, pulls the variables out of its `:scope` rules and
  /// rewrites everything else into the `.{scope_token}` namespace.
  #[tracing::instrument(level = "debug", skip(source, options))]
  pub fn run(source: &str, scope_token: &str, options: &TransformOptions) -> Result<Self> {
    let mut stylesheet = css::parse(source)?;
    let scope_class = format!(".{scope_token}");

    let mut scope_rule = StyleRule {
      selectors: vec![scope_class.clone()],
      declarations: Vec::new(),
    };
    let mut scope_variables = Vec::new();
    let mut rules = Vec::with_capacity(stylesheet.rules.len());

    for rule in stylesheet.rules {
      match rule {
        CssRule::Style(style_rule) if is_scope_rule(&style_rule) => {
          for item in style_rule.declarations {
            match item {
              DeclarationItem::Declaration(declaration) if declaration.is_custom_property() => {
                scope_variables.push(declaration);
              }
              item => scope_rule.declarations.push(item),
            }
          }
        }
        rule => rules.push(rule),
      }
    }
    stylesheet.rules = rules;

    tracing::debug!(
      variables = scope_variables.len(),
      declarations = scope_rule.declarations.len(),
      "Extracted scope block"
    );

    let renames = scope_variables
      .iter()
      .map(|declaration| {
        (
          declaration.property.clone(),
          scoped_name(&declaration.property, scope_token),
        )
      })
      .collect::<HashMap<_, _>>();

    // Defaults may refer to sibling variables, which only exist under their
    // scoped names. A reference to the variable itself keeps pointing at the
    // inherited value.
    for declaration in &mut scope_variables {
      rewrite_value(&mut declaration.value, &renames, Some(&declaration.property));
    }

    let rewriter = Rewriter {
      scope_class: &scope_class,
      renames: &renames,
      replace_leading_scope: options.replace_leading_scope,
    };
    rewriter.rules(&mut stylesheet.rules, true);

    let mut css = String::new();
    if !scope_rule.declarations.is_empty() {
      rewriter.declarations(&mut scope_rule.declarations);
      css.push_str(&scope_rule.to_css(&options.print));
      css.push('\n');
    }
    css.push_str(&stylesheet.to_css(&options.print));

    Ok(ScopeTransform {
      scope_token: scope_token.to_string(),
      scope_variables,
      renames,
      css,
    })
  }

  pub fn scope_token(&self) -> &str {
    &self.scope_token
  }

  /// Custom property declarations of the `:scope` rules, in source order.
  pub fn scope_variables(&self) -> &[Declaration] {
    &self.scope_variables
  }

  /// Scoped name of a variable declared in the scope block.
  pub fn renamed(&self, name: &str) -> Option<&str> {
    self.renames.get(name).map(String::as_str)
  }

  pub fn css(&self) -> &str {
    &self.css
  }
}

fn is_scope_rule(rule: &StyleRule) -> bool {
  rule.selectors.iter().any(|selector| selector == SCOPE_SELECTOR)
}

struct Rewriter<'a> {
  scope_class: &'a str,
  renames: &'a HashMap<String, String>,
  replace_leading_scope: bool,
}

impl Rewriter<'_> {
  fn rules(&self, rules: &mut [CssRule], scope_selectors: bool) {
    for rule in rules {
      match rule {
        CssRule::Style(style_rule) => {
          if scope_selectors {
            for selector in &mut style_rule.selectors {
              *selector = self.selector(selector);
            }
          }
          self.declarations(&mut style_rule.declarations);
        }
        CssRule::At(at_rule) => self.at_rule(at_rule, scope_selectors),
        CssRule::Comment(_) => {}
      }
    }
  }

  fn at_rule(&self, at_rule: &mut AtRule, scope_selectors: bool) {
    let nested_scope_selectors = scope_selectors && at_rule.scopes_selectors();
    match &mut at_rule.body {
      AtRuleBody::Rules(children) => self.rules(children, nested_scope_selectors),
      AtRuleBody::Declarations(items) => self.declarations(items),
      AtRuleBody::Statement | AtRuleBody::Raw(_) => {}
    }
  }

  fn declarations(&self, items: &mut [DeclarationItem]) {
    for item in items {
      match item {
        DeclarationItem::Declaration(declaration) => {
          if declaration.is_custom_property() {
            if let Some(renamed) = self.renames.get(&declaration.property) {
              declaration.property.clone_from(renamed);
            }
          }

          rewrite_value(&mut declaration.value, self.renames, None);
        }
        DeclarationItem::At(at_rule) => self.at_rule(at_rule, false),
        DeclarationItem::Comment(_) => {}
      }
    }
  }

  fn selector(&self, selector: &str) -> String {
    if self.replace_leading_scope {
      if let Some(rest) = selector.strip_prefix(SCOPE_SELECTOR) {
        if !rest.starts_with(|c: char| c.is_alphanumeric() || c == '-' || c == '_') {
          return format!("{}{rest}", self.scope_class);
        }
      }
    }

    format!("{} {selector}", self.scope_class)
  }
}

/// Rewrites the references in `value` that are in `renames`, except for `keep`.
fn rewrite_value(value: &mut String, renames: &HashMap<String, String>, keep: Option<&str>) {
  let rewritten = match replace_var_references_with(value, |name| {
    if keep.is_some_and(|keep| keep == name) {
      return None;
    }
    renames.get(name).map(String::as_str)
  }) {
    Cow::Borrowed(_) => return,
    Cow::Owned(rewritten) => rewritten,
  };

  *value = rewritten;
}
