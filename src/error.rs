//! Compilation errors.

use std::io;
use std::path::PathBuf;

use crate::markup::MarkupError;

/// Fatal compilation failures. Everything else degrades to a missing facet
/// or a placeholder widget.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("cannot read {}: {source}", path.display())]
    MissingSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid markup: {0}")]
    Markup(#[from] MarkupError),

    #[error("cannot update asset catalog {}: {source}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
