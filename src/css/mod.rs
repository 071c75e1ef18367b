//! Style resolver: selector tokenizer, nested-rule flattener, class table.

pub mod flatten;
pub mod model;
pub mod stylesheet;
pub mod tokenizer;

pub use model::{Declaration, FlatRule, PropertyMap};
pub use stylesheet::{Preprocessor, StyleTable};
