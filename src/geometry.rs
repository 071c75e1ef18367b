//! Core geometry types: Size, Edges, Insets, Corners, Extent.
//!
//! All values are logical pixels as they appear in the stylesheet. Every facet
//! is optional because the compiler only knows what the stylesheet declared.

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A declared size. Either dimension may be unknown.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Size {
    /// A size with no known dimension.
    pub const UNKNOWN: Size = Size {
        width: None,
        height: None,
    };

    /// Create a new size, discarding negative or non-finite dimensions.
    pub fn new(width: Option<f64>, height: Option<f64>) -> Self {
        Self {
            width: width.filter(|w| w.is_finite() && *w >= 0.0),
            height: height.filter(|h| h.is_finite() && *h >= 0.0),
        }
    }

    /// Whether neither dimension is known.
    pub fn is_unknown(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    /// Whether at least one dimension is known and non-zero.
    ///
    /// Zero-sized declarations don't produce sizing wrappers.
    pub fn has_extent(&self) -> bool {
        self.width.is_some_and(|w| w != 0.0) || self.height.is_some_and(|h| h != 0.0)
    }

    /// Whether every known dimension is at most `max`. An unknown dimension
    /// does not disqualify; a fully unknown size is never "small".
    pub fn fits_within(&self, max: f64) -> bool {
        if self.is_unknown() {
            return false;
        }
        self.width.is_none_or(|w| w <= max) && self.height.is_none_or(|h| h <= max)
    }

    /// Return a copy without the height.
    pub fn without_height(self) -> Self {
        Self {
            height: None,
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

/// Absolute-placement offsets. Only the edges the stylesheet declared are set.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Edges {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl Edges {
    /// Whether no edge is declared.
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }

    /// Anchored at (or at) the top-left origin: top/left absent or zero, and
    /// neither right nor bottom declared.
    pub fn is_top_left_anchored(&self) -> bool {
        self.top.is_none_or(|t| t == 0.0)
            && self.left.is_none_or(|l| l == 0.0)
            && self.right.is_none()
            && self.bottom.is_none()
    }

    /// Horizontal start offset used for extent estimation: `left`, else
    /// `right`, else zero.
    pub fn horizontal_start(&self) -> f64 {
        self.left.or(self.right).unwrap_or(0.0)
    }

    /// Vertical start offset used for extent estimation: `top`, else
    /// `bottom`, else zero.
    pub fn vertical_start(&self) -> f64 {
        self.top.or(self.bottom).unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Insets
// ---------------------------------------------------------------------------

/// Four-sided spacing (padding or margin).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    /// Same value on all four sides.
    pub const fn all(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// Explicit values in CSS order (top, right, bottom, left).
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Expand 1–4 CSS shorthand values.
    ///
    /// - 1 value: all sides
    /// - 2 values: vertical, horizontal
    /// - 3 values: top, horizontal, bottom
    /// - 4 values: top, right, bottom, left
    ///
    /// Extra values past the fourth are ignored.
    pub fn from_shorthand(values: &[f64]) -> Option<Self> {
        match *values {
            [] => None,
            [v] => Some(Self::all(v)),
            [vertical, horizontal] => Some(Self::new(vertical, horizontal, vertical, horizontal)),
            [top, horizontal, bottom] => Some(Self::new(top, horizontal, bottom, horizontal)),
            [top, right, bottom, left, ..] => Some(Self::new(top, right, bottom, left)),
        }
    }

    /// Whether every side is zero.
    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }
}

// ---------------------------------------------------------------------------
// Corners
// ---------------------------------------------------------------------------

/// Corner radii in CSS shorthand order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Corners {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl Corners {
    /// Interpret a shorthand box as corners (top → top-left, right →
    /// top-right, bottom → bottom-right, left → bottom-left).
    pub fn from_insets(insets: Insets) -> Self {
        Self {
            top_left: insets.top,
            top_right: insets.right,
            bottom_right: insets.bottom,
            bottom_left: insets.left,
        }
    }

    /// The single radius when all four corners match.
    pub fn uniform(&self) -> Option<f64> {
        let same = self.top_left == self.top_right
            && self.top_left == self.bottom_right
            && self.top_left == self.bottom_left;
        same.then_some(self.top_left)
    }
}

// ---------------------------------------------------------------------------
// Extent
// ---------------------------------------------------------------------------

/// A horizontal extent in generated code.
///
/// `Available` stands for the host viewport's width. It replaces every width
/// that equals the root's declared width so the output adapts to the device
/// instead of being locked to the design frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Extent {
    Fixed(f64),
    Available,
}
