//! Minimal CSS rule tree on top of the `cssparser` tokenizer.
//!
//! Only the structure needed for scoping is modelled: selector lists,
//! declarations with their raw value text, comments and at-rules. Values are
//! never interpreted.

pub use ast::*;
pub use parser::parse;
pub use printer::PrintOptions;

mod ast;
mod parser;
mod printer;
