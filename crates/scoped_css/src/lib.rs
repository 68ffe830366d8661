//! Scoped CSS stylesheets with per-instance variable overrides.
//!
//! A stylesheet source is compiled once: selectors are nested under a
//! generated scope class and the custom properties declared in its `:scope`
//! rule are renamed into the scope's namespace. Every instance created from
//! the stylesheet then gets its own class and a [`VariableSet`] whose rendered
//! declaration block overrides those variables for that instance only.
//!
//! ```
//! let stylesheet = scoped_css::create_stylesheet(
//!   ":scope { --color: red; } .title { color: var(--color); }",
//! )?;
//!
//! let mut instance = stylesheet.create_instance(Some("title"), false);
//! instance.set_value("color", "blue");
//!
//! assert!(instance.render().contains(": blue;"));
//! # Ok::<(), scoped_css::ScopedCssError>(())
//! ```

pub use config::{IdStrategy, StylesheetConfig, StylesheetOptions};
pub use error::{Result, ScopedCssError};
pub use host::{InMemoryStyleHost, MountedStyle, StyleHost};
pub use instance::{StyleBlock, StylesheetInstance, VariableDiff};
pub use scope_transform::{scoped_name, ScopeTransform, TransformOptions, SCOPE_SELECTOR};
pub use scoped_css_id::{
  generate_id, ContentHashIdAllocator, IdAllocator, IdAlphabet, RandomIdAllocator,
  SequentialIdAllocator,
};
pub use stylesheet::ScopedStylesheet;
pub use var_scanner::{
  replace_var_references, replace_var_references_with, scan_var_references, VarReference,
};
pub use variables::{VariableEntry, VariableMut, VariableSet};

pub mod css;

mod config;
mod error;
mod host;
mod instance;
mod scope_transform;
mod stylesheet;
mod var_scanner;
mod variables;

/// Compiles `source` with the default options: random eight character ids and
/// no style host.
pub fn create_stylesheet(source: &str) -> Result<ScopedStylesheet> {
  ScopedStylesheet::new(source)
}
