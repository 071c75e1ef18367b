//! What the synthesizer hands from a child to its parent.

use crate::geometry::{Edges, Size};
use crate::widget::Expr;

/// One synthesized node.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub widget: Expr,
    /// Offsets for absolutely placed nodes; `None` for flow nodes.
    pub placement: Option<Edges>,
    pub z_index: i64,
    pub flex_grow: f64,
    pub size: Size,
}

impl Descriptor {
    /// A flow node with no layout facets (text runs).
    pub fn flow(widget: Expr) -> Self {
        Self {
            widget,
            placement: None,
            z_index: 0,
            flex_grow: 0.0,
            size: Size::UNKNOWN,
        }
    }

    pub fn is_absolute(&self) -> bool {
        self.placement.is_some()
    }
}
