use std::fmt;
use std::sync::Arc;

use scoped_css_id::{ContentHashIdAllocator, IdAllocator, RandomIdAllocator, SequentialIdAllocator};
use serde::Deserialize;

use crate::error::{Result, ScopedCssError};
use crate::host::StyleHost;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum IdStrategy {
  #[default]
  Random,
  Sequential,
  /// Seeded with the stylesheet source, so ids are stable between builds
  ContentHash,
}

/// Serializable stylesheet settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StylesheetConfig {
  pub token_length: usize,
  pub instance_suffix_length: usize,
  pub indent: String,
  pub id_strategy: IdStrategy,
  pub replace_leading_scope: bool,
}

impl Default for StylesheetConfig {
  fn default() -> Self {
    StylesheetConfig {
      token_length: 8,
      instance_suffix_length: 8,
      indent: "  ".into(),
      id_strategy: IdStrategy::default(),
      replace_leading_scope: false,
    }
  }
}

impl StylesheetConfig {
  pub fn from_json(json: &str) -> Result<Self> {
    let config = serde_json::from_str::<StylesheetConfig>(json)
      .map_err(|error| ScopedCssError::InvalidConfig(error.to_string()))?;

    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<()> {
    if self.token_length == 0 {
      return Err(ScopedCssError::InvalidConfig(
        "tokenLength must be at least 1".into(),
      ));
    }

    if self.instance_suffix_length == 0 {
      return Err(ScopedCssError::InvalidConfig(
        "instanceSuffixLength must be at least 1".into(),
      ));
    }

    Ok(())
  }

  /// Builds runtime options for the stylesheet compiled from `source`.
  pub fn to_options(&self, source: &str) -> Result<StylesheetOptions> {
    self.validate()?;

    let allocator: Arc<dyn IdAllocator> = match self.id_strategy {
      IdStrategy::Random => Arc::new(RandomIdAllocator::default()),
      IdStrategy::Sequential => Arc::new(SequentialIdAllocator::default()),
      IdStrategy::ContentHash => Arc::new(ContentHashIdAllocator::new(source)),
    };

    Ok(StylesheetOptions {
      token_length: self.token_length,
      instance_suffix_length: self.instance_suffix_length,
      indent: self.indent.clone(),
      replace_leading_scope: self.replace_leading_scope,
      allocator,
      host: None,
    })
  }
}

/// Runtime stylesheet settings, including the collaborators a config file
/// cannot describe.
#[derive(Clone)]
pub struct StylesheetOptions {
  pub token_length: usize,
  pub instance_suffix_length: usize,
  pub indent: String,
  /// Turn `:scope:hover` into `.T:hover` rather than `.T :scope:hover`
  pub replace_leading_scope: bool,
  /// Mints the scope token and instance class suffixes
  pub allocator: Arc<dyn IdAllocator>,
  /// Receives the shared stylesheet when the first instance is created
  pub host: Option<Arc<dyn StyleHost>>,
}

impl Default for StylesheetOptions {
  fn default() -> Self {
    StylesheetOptions {
      token_length: 8,
      instance_suffix_length: 8,
      indent: "  ".into(),
      replace_leading_scope: false,
      allocator: Arc::new(RandomIdAllocator::default()),
      host: None,
    }
  }
}

impl fmt::Debug for StylesheetOptions {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StylesheetOptions")
      .field("token_length", &self.token_length)
      .field("instance_suffix_length", &self.instance_suffix_length)
      .field("indent", &self.indent)
      .field("replace_leading_scope", &self.replace_leading_scope)
      .field("allocator", &self.allocator)
      .field("has_host", &self.host.is_some())
      .finish()
  }
}
