use std::sync::Once;

use crate::config::{StylesheetConfig, StylesheetOptions};
use crate::css::{Declaration, PrintOptions, CUSTOM_PROPERTY_PREFIX};
use crate::error::Result;
use crate::instance::{StyleBlock, StylesheetInstance};
use crate::scope_transform::{ScopeTransform, TransformOptions};
use crate::variables::VariableSet;

/// A scoped stylesheet and the factory for its instances.
///
/// The rewritten CSS is shared by every instance and handed to the configured
/// [`crate::StyleHost`] once, when the first instance is created. Each instance
/// gets its own class and its own [`VariableSet`].
#[derive(Debug)]
pub struct ScopedStylesheet {
  transform: ScopeTransform,
  options: StylesheetOptions,
  mounted: Once,
}

impl ScopedStylesheet {
  pub fn new(source: &str) -> Result<Self> {
    Self::with_options(source, StylesheetOptions::default())
  }

  #[tracing::instrument(level = "debug", skip_all)]
  pub fn with_options(source: &str, options: StylesheetOptions) -> Result<Self> {
    let scope_token = options.allocator.allocate(options.token_length);
    let transform_options = TransformOptions {
      print: PrintOptions {
        indent: options.indent.clone(),
      },
      replace_leading_scope: options.replace_leading_scope,
    };

    let transform = ScopeTransform::run(source, &scope_token, &transform_options)?;

    tracing::debug!(
      scope_token = %scope_token,
      variables = transform.scope_variables().len(),
      "Created scoped stylesheet"
    );

    Ok(ScopedStylesheet {
      transform,
      options,
      mounted: Once::new(),
    })
  }

  pub fn from_config(source: &str, config: &StylesheetConfig) -> Result<Self> {
    Self::with_options(source, config.to_options(source)?)
  }

  pub fn scope_token(&self) -> &str {
    self.transform.scope_token()
  }

  /// The shared scoped stylesheet text.
  pub fn rewritten_css(&self) -> &str {
    self.transform.css()
  }

  pub fn scope_variables(&self) -> &[Declaration] {
    self.transform.scope_variables()
  }

  pub fn variable_names(&self) -> impl Iterator<Item = &str> {
    self
      .scope_variables()
      .iter()
      .map(|declaration| {
        let property = declaration.property.as_str();
        property.strip_prefix(CUSTOM_PROPERTY_PREFIX).unwrap_or(property)
      })
  }

  pub fn is_mounted(&self) -> bool {
    self.mounted.is_completed()
  }

  fn mount(&self) {
    self.mounted.call_once(|| {
      if let Some(host) = &self.options.host {
        tracing::debug!(scope_token = %self.scope_token(), "Mounting scoped stylesheet");
        host.mount(self.scope_token(), self.rewritten_css());
      }
    });
  }

  /// Creates an instance with a fresh class named `{name}-{suffix}`.
  ///
  /// With `own_style_block` the instance carries its rendered variable block;
  /// otherwise the caller renders the variables into a shared style surface.
  #[tracing::instrument(level = "debug", skip(self), fields(scope_token = %self.scope_token()))]
  pub fn create_instance(&self, name: Option<&str>, own_style_block: bool) -> StylesheetInstance {
    self.mount();

    let suffix = self
      .options
      .allocator
      .allocate(self.options.instance_suffix_length);
    let instance_class = format!("{}-{suffix}", name.unwrap_or_default());

    let mut variables = VariableSet::new(
      format!(".{}.{instance_class}", self.scope_token()),
      self.scope_token(),
    )
    .with_indent(self.options.indent.clone());

    for declaration in self.scope_variables() {
      variables.add(declaration, None);
    }

    let style_block = own_style_block.then(|| StyleBlock::new(variables.render()));

    StylesheetInstance::new(self.scope_token(), instance_class, variables, style_block)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use indoc::indoc;
  use pretty_assertions::assert_eq;
  use scoped_css_id::SequentialIdAllocator;

  use super::*;
  use crate::host::{InMemoryStyleHost, StyleHost};
  use crate::ScopedCssError;

  const SOURCE: &str = ":scope { --color: red; --size: 10px; } .box { background: var(--color); width: var(--size); }";

  fn stylesheet(host: Option<Arc<InMemoryStyleHost>>) -> ScopedStylesheet {
    ScopedStylesheet::with_options(
      SOURCE,
      StylesheetOptions {
        allocator: Arc::new(SequentialIdAllocator::default()),
        host: host.map(|host| host as Arc<dyn StyleHost>),
        ..StylesheetOptions::default()
      },
    )
    .unwrap()
  }

  #[test]
  fn allocates_the_scope_token_first() {
    let stylesheet = stylesheet(None);

    assert_eq!(stylesheet.scope_token(), "a0000000");
    assert_eq!(
      stylesheet.rewritten_css(),
      indoc! {"
        .a0000000 .box {
          background: var(--a0000000-color);
          width: var(--a0000000-size);
        }"}
    );
    assert_eq!(stylesheet.variable_names().collect::<Vec<_>>(), vec!["color", "size"]);
  }

  #[test]
  fn creates_instances_with_fresh_classes() {
    let stylesheet = stylesheet(None);

    let card = stylesheet.create_instance(Some("card"), false);
    let unnamed = stylesheet.create_instance(None, false);

    assert_eq!(card.class_name(), "a0000000 card-a0000001");
    assert_eq!(card.variables().selector(), ".a0000000.card-a0000001");
    assert_eq!(card.variables().len(), 2);
    assert_eq!(card.style_block(), None);
    assert_eq!(unnamed.instance_class(), "-a0000002");
  }

  #[test]
  fn renders_the_own_style_block_eagerly() {
    let stylesheet = stylesheet(None);

    let instance = stylesheet.create_instance(Some("card"), true);

    assert_eq!(
      instance.style_block().map(StyleBlock::text),
      Some(indoc! {"
        .a0000000.card-a0000001 {
          --a0000000-color: red;
          --a0000000-size: 10px;
        }"})
    );
  }

  #[test]
  fn mounts_once() {
    let host = Arc::new(InMemoryStyleHost::default());
    let stylesheet = stylesheet(Some(host.clone()));

    assert!(!stylesheet.is_mounted());
    assert!(host.mounted().is_empty());

    stylesheet.create_instance(Some("a"), false);
    stylesheet.create_instance(Some("b"), true);

    assert!(stylesheet.is_mounted());
    assert_eq!(host.mounted().len(), 1);
    assert_eq!(host.to_css(), stylesheet.rewritten_css());
  }

  #[test]
  fn marks_mounted_without_a_host() {
    let stylesheet = stylesheet(None);
    stylesheet.create_instance(None, false);

    assert!(stylesheet.is_mounted());
  }

  #[test]
  fn uses_the_configured_indent() {
    let config = StylesheetConfig::from_json(r#"{ "indent": "\t", "idStrategy": "sequential", "tokenLength": 2, "instanceSuffixLength": 2 }"#).unwrap();
    let stylesheet = ScopedStylesheet::from_config(":scope { --gap: 1px } .a { gap: var(--gap) }", &config).unwrap();

    let mut instance = stylesheet.create_instance(Some("x"), false);

    assert_eq!(stylesheet.rewritten_css(), ".a0 .a {\n\tgap: var(--a0-gap);\n}");
    assert_eq!(instance.render(), ".a0.x-a1 {\n\t--a0-gap: 1px;\n}");
  }

  #[test]
  fn passes_the_leading_scope_choice_to_the_transform() {
    let source = ":scope { --a: 1px } :scope:hover { top: var(--a) }";
    let nested = ScopedStylesheet::with_options(
      source,
      StylesheetOptions {
        allocator: Arc::new(SequentialIdAllocator::default()),
        ..StylesheetOptions::default()
      },
    )
    .unwrap();
    let replaced = ScopedStylesheet::with_options(
      source,
      StylesheetOptions {
        allocator: Arc::new(SequentialIdAllocator::default()),
        replace_leading_scope: true,
        ..StylesheetOptions::default()
      },
    )
    .unwrap();

    assert_eq!(
      nested.rewritten_css(),
      ".a0000000 :scope:hover {\n  top: var(--a0000000-a);\n}"
    );
    assert_eq!(
      replaced.rewritten_css(),
      ".a0000000:hover {\n  top: var(--a0000000-a);\n}"
    );
  }

  #[test]
  fn rejects_malformed_source() {
    assert!(matches!(
      ScopedStylesheet::new(".a { color: red; } }"),
      Err(ScopedCssError::Parse { .. })
    ));
  }
}
