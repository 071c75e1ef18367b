//! # jsx2flutter
//!
//! Compiles design-export markup (JSX) and class-keyed SCSS-module styles into
//! a Flutter widget tree, rendered as a single Dart source file.
//!
//! The compiler flattens the stylesheet into a class → property table, parses
//! the markup into an arena tree, and walks it top-down. Each element becomes
//! a widget descriptor built from its resolved style facets, with form
//! controls recognized by a table of semantic overrides and local media routed
//! through a catalogued asset pipeline.
//!
//! ## Core Systems
//!
//! - **[`css`]**: Selector tokenizer, nested-rule flattener, class table
//! - **[`markup`]**: JSX lexer and parser over a slotmap-backed node tree
//! - **[`values`]**: Property value translators (colors, lengths, borders, text)
//! - **[`style`]**: Per-node structured style and decoration
//! - **[`assets`]**: Local media naming, copying and the `AppAssets` catalog
//! - **[`widget`]**: Dart expression tree and renderer
//! - **[`synth`]**: The recursive widget synthesizer
//! - **[`assemble`]**: Root shell, imports and helper widgets
//! - **[`compiler`]**: Driver tying a compilation together
//! - **[`config`]**: Compile options, thresholds and lookup tables
//! - **[`geometry`]**: Size, Edges, Insets, Corners, Extent primitives
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use jsx2flutter::{widget_class_name, CompileOptions, Compiler};
//!
//! let compiler = Compiler::new(CompileOptions::from_env().with_project_root("."));
//! let output = compiler.compile(
//!     Path::new("design/home/index.jsx"),
//!     Path::new("design/home/index.module.scss"),
//!     &widget_class_name("home_page"),
//! )?;
//! println!("{}", output.source);
//! # Ok::<(), jsx2flutter::CompileError>(())
//! ```

// Foundation
pub mod config;
pub mod error;
pub mod geometry;

// Front-ends
pub mod css;
pub mod markup;

// Styling
pub mod style;
pub mod values;

// Code generation
pub mod assets;
pub mod synth;
pub mod widget;

// Output
pub mod assemble;
pub mod compiler;

pub use assemble::widget_class_name;
pub use compiler::{CompileOutput, Compiler};
pub use config::{ClassIcons, CompileOptions, GenerationMode, Thresholds};
pub use error::{CompileError, Result};
pub use values::Vocabulary;
