use std::fmt::Debug;

use parking_lot::RwLock;

/// Where shared scoped stylesheets end up, e.g. the `<head>` of a document.
pub trait StyleHost: Debug + Send + Sync {
  fn mount(&self, scope_token: &str, css: &str);
}

#[derive(Clone, Debug, PartialEq)]
pub struct MountedStyle {
  pub scope_token: String,
  pub css: String,
}

/// Keeps mounted stylesheets in memory, in mount order.
#[derive(Debug, Default)]
pub struct InMemoryStyleHost {
  styles: RwLock<Vec<MountedStyle>>,
}

impl InMemoryStyleHost {
  pub fn mounted(&self) -> Vec<MountedStyle> {
    self.styles.read().clone()
  }

  /// All mounted stylesheets joined into one document.
  pub fn to_css(&self) -> String {
    self
      .styles
      .read()
      .iter()
      .map(|style| style.css.as_str())
      .collect::<Vec<_>>()
      .join("\n\n")
  }
}

impl StyleHost for InMemoryStyleHost {
  fn mount(&self, scope_token: &str, css: &str) {
    self.styles.write().push(MountedStyle {
      scope_token: scope_token.to_string(),
      css: css.to_string(),
    });
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn records_mounts_in_order() {
    let host = InMemoryStyleHost::default();
    host.mount("a", ".a .x {\n  top: 0;\n}");
    host.mount("b", ".b .y {\n  top: 1px;\n}");

    assert_eq!(
      host
        .mounted()
        .into_iter()
        .map(|style| style.scope_token)
        .collect::<Vec<_>>(),
      vec!["a", "b"]
    );
    assert_eq!(
      host.to_css(),
      ".a .x {\n  top: 0;\n}\n\n.b .y {\n  top: 1px;\n}"
    );
  }
}
