//! Finds `var(--name)` references in raw declaration values.
//!
//! This is plain text scanning, not tokenization: a `var(--` inside a comment or
//! a string is reported like any other reference.

use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Range;

const VAR_FUNCTION: &str = "var(";

/// One custom property name referenced through `var()`.
#[derive(Clone, Debug, PartialEq)]
pub struct VarReference<'a> {
  /// The referenced name, including its `--` prefix
  pub name: &'a str,
  /// Byte span of `name` in the scanned value
  pub span: Range<usize>,
}

/// Returns every `var(--…)` reference in `value`, left to right.
///
/// A name ends at the first space, comma or closing parenthesis after it, or at
/// the end of the string. Fallback values are not looked into, except that the
/// search for the next reference resumes right after the current name.
pub fn scan_var_references(value: &str) -> Vec<VarReference<'_>> {
  let mut references = Vec::new();
  let mut cursor = 0;

  while let Some(offset) = value[cursor..].find(VAR_FUNCTION) {
    let name_start = cursor + offset + VAR_FUNCTION.len();

    if !value[name_start..].starts_with("--") {
      cursor = name_start;
      continue;
    }

    let name_end = value[name_start + 2..]
      .find(|c: char| matches!(c, ' ' | ',' | ')'))
      .map_or(value.len(), |end| name_start + 2 + end);

    references.push(VarReference {
      name: &value[name_start..name_end],
      span: name_start..name_end,
    });
    cursor = name_end;
  }

  references
}

/// Rewrites the references in `value` found in `renames`, leaving all others untouched.
///
/// The output is built in one left-to-right pass over the spans, so earlier
/// replacements never shift the offsets of later ones.
pub fn replace_var_references<'v>(value: &'v str, renames: &HashMap<String, String>) -> Cow<'v, str> {
  replace_var_references_with(value, |name| renames.get(name).map(String::as_str))
}

/// Like [`replace_var_references`], with the new name of each reference decided
/// by `rename`. References it returns `None` for are left untouched.
pub fn replace_var_references_with<'v, 'r>(
  value: &'v str,
  mut rename: impl FnMut(&str) -> Option<&'r str>,
) -> Cow<'v, str> {
  if !value.contains(VAR_FUNCTION) {
    return Cow::Borrowed(value);
  }

  let mut rewritten = String::with_capacity(value.len());
  let mut copied_until = 0;

  for reference in scan_var_references(value) {
    let Some(renamed) = rename(reference.name) else {
      tracing::trace!("Leaving unknown variable reference {} as is", reference.name);
      continue;
    };

    rewritten.push_str(&value[copied_until..reference.span.start]);
    rewritten.push_str(renamed);
    copied_until = reference.span.end;
  }

  if copied_until == 0 {
    return Cow::Borrowed(value);
  }

  rewritten.push_str(&value[copied_until..]);
  Cow::Owned(rewritten)
}
