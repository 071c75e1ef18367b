//! Widget model: Dart expression tree and source rendering.

pub mod dart;
pub mod expr;

pub use dart::{dart_string, format_number, render_expr};
pub use expr::{call0, Call, Expr};
