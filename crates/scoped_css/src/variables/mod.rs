pub use entry::VariableEntry;
pub use set::{VariableMut, VariableSet};

mod entry;
mod set;
