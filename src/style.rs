//! Structured style: every facet a node's class resolves to.
//!
//! A [`ResolvedStyle`] is computed once per markup node from its class's
//! property map. Each facet is resolved independently, so an unreadable value
//! only loses its own facet.

use crate::css::PropertyMap;
use crate::geometry::{Corners, Edges, Insets, Size};
use crate::values::border::{parse_border, radius_expr};
use crate::values::gradient::{is_linear_gradient, parse_linear_gradient, text_gradient};
use crate::values::layout::{self, text_align};
use crate::values::length::{border_radius, spacing};
use crate::values::shadow::parse_shadows;
use crate::values::{
    parse_color, Border, BoxShadow, Color, FlexConfig, Gradient, LinearGradient, TextAlign,
    TextStyleSpec, Vocabulary,
};
use crate::widget::{Call, Expr};

// ---------------------------------------------------------------------------
// Decoration
// ---------------------------------------------------------------------------

/// Box painting facets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Decoration {
    pub color: Option<Color>,
    pub gradient: Option<Gradient>,
    pub radius: Option<Corners>,
    pub border: Option<Border>,
    pub shadows: Vec<BoxShadow>,
}

impl Decoration {
    /// Read the decoration facets from class properties.
    ///
    /// A linear gradient in `background-image` wins over one in
    /// `background`; a solid `background` color is only used when the
    /// background is not itself a gradient.
    pub fn from_props(props: &PropertyMap, vocab: &Vocabulary) -> Self {
        let background = props
            .get("background")
            .or_else(|| props.get("background-color"));
        let background_gradient = background.filter(|v| is_linear_gradient(v));
        let gradient = props
            .get("background-image")
            .or_else(|| props.get("backgroundImage"))
            .or(background_gradient)
            .filter(|v| is_linear_gradient(v))
            .map(|source| {
                parse_linear_gradient(source, vocab)
                    .map(Gradient::Linear)
                    .unwrap_or(Gradient::ThemeDefault)
            });
        let color = match background {
            Some(bg) if background_gradient.is_none() => parse_color(bg, vocab),
            _ => None,
        };
        Self {
            color,
            gradient,
            radius: border_radius(props),
            border: parse_border(props, vocab),
            shadows: parse_shadows(props, vocab),
        }
    }

    /// `BoxDecoration(...)`, or `None` when nothing would be painted.
    ///
    /// `omit_background` drops the solid color for widgets that paint their
    /// own field background.
    pub fn to_expr(&self, omit_background: bool) -> Option<Expr> {
        let color = self.color.as_ref().filter(|_| !omit_background);
        let call = Call::new("BoxDecoration")
            .named_opt("color", color.map(Color::to_expr))
            .named_opt("gradient", self.gradient.as_ref().map(Gradient::to_expr))
            .named_opt("borderRadius", self.radius.as_ref().map(radius_expr))
            .named_opt("border", self.border.as_ref().map(Border::to_expr))
            .named_opt(
                "boxShadow",
                (!self.shadows.is_empty())
                    .then(|| Expr::List(self.shadows.iter().map(BoxShadow::to_expr).collect())),
            );
        (!call.is_empty()).then(|| call.build())
    }
}

/// `EdgeInsets.fromLTRB(left, top, right, bottom)`.
pub fn insets_expr(insets: &Insets) -> Expr {
    Call::new("EdgeInsets.fromLTRB")
        .arg(insets.left)
        .arg(insets.top)
        .arg(insets.right)
        .arg(insets.bottom)
        .build()
}

// ---------------------------------------------------------------------------
// ResolvedStyle
// ---------------------------------------------------------------------------

/// All facets of one node's class.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedStyle {
    pub size: Size,
    /// Present only for absolutely placed boxes.
    pub position: Option<Edges>,
    pub z_index: i64,
    pub flex_grow: f64,
    pub rotation: Option<f64>,
    pub padding: Option<Insets>,
    pub margin: Option<Insets>,
    pub decoration: Decoration,
    pub text_style: Option<TextStyleSpec>,
    pub text_align: Option<TextAlign>,
    /// Gradient fill for text clipped to its background.
    pub text_gradient: Option<LinearGradient>,
    pub flex: Option<FlexConfig>,
    pub clips_overflow: bool,
    /// `align-self: stretch`.
    pub stretches: bool,
}

impl ResolvedStyle {
    pub fn resolve(props: &PropertyMap, vocab: &Vocabulary) -> Self {
        Self {
            size: layout::size(props),
            position: layout::position(props),
            z_index: layout::z_index(props),
            flex_grow: layout::flex_grow(props),
            rotation: layout::rotation(props),
            padding: spacing(props, "padding"),
            margin: spacing(props, "margin"),
            decoration: Decoration::from_props(props, vocab),
            text_style: TextStyleSpec::from_props(props, vocab),
            text_align: text_align(props),
            text_gradient: text_gradient(props, vocab),
            flex: layout::flex_config(props),
            clips_overflow: layout::clips_overflow(props),
            stretches: props
                .get("align-self")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("stretch")),
        }
    }

    /// Clip wrapper for `overflow: hidden`: rounded when a radius exists.
    pub fn clip(&self, child: Expr) -> Expr {
        if !self.clips_overflow {
            return child;
        }
        match &self.decoration.radius {
            Some(radius) => Call::new("ClipRRect")
                .named("borderRadius", radius_expr(radius))
                .child(child)
                .build(),
            None => Call::new("ClipRect").child(child).build(),
        }
    }

    /// Rotation wrapper.
    pub fn rotate(&self, child: Expr) -> Expr {
        rotate(self.rotation, child)
    }
}

/// `Transform.rotate(angle: ..., child: ...)` when an angle is present.
pub fn rotate(angle: Option<f64>, child: Expr) -> Expr {
    match angle {
        Some(angle) => Call::new("Transform.rotate")
            .named("angle", angle)
            .child(child)
            .build(),
        None => child,
    }
}
