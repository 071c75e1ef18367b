//! Box shadows.

use crate::css::PropertyMap;
use crate::values::color::{find_color, strip_color, Color};
use crate::values::length::px;
use crate::values::Vocabulary;
use crate::widget::{Call, Expr};

/// One shadow layer.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxShadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: Color,
}

impl BoxShadow {
    pub fn to_expr(&self) -> Expr {
        Call::new("BoxShadow")
            .named(
                "offset",
                Call::new("Offset").arg(self.offset_x).arg(self.offset_y).build(),
            )
            .named("blurRadius", self.blur)
            .named("spreadRadius", self.spread)
            .named("color", self.color.to_expr())
            .build()
    }
}

/// Split on commas that are not inside parentheses.
fn split_layers(value: &str) -> Vec<&str> {
    let mut layers = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                layers.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    layers.push(&value[start..]);
    layers
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// `box-shadow` layers. Layers without a readable color are dropped; missing
/// lengths default to zero. `inset` keywords are ignored.
pub fn parse_shadows(props: &PropertyMap, vocab: &Vocabulary) -> Vec<BoxShadow> {
    let Some(value) = props.get("box-shadow") else {
        return Vec::new();
    };
    split_layers(value)
        .into_iter()
        .filter_map(|layer| {
            let color = find_color(layer, vocab)?;
            let rest = strip_color(layer);
            let lengths: Vec<f64> = rest
                .split_whitespace()
                .filter(|t| !t.eq_ignore_ascii_case("inset"))
                .map(|t| px(t).unwrap_or(0.0))
                .collect();
            let at = |i: usize| lengths.get(i).copied().unwrap_or(0.0);
            Some(BoxShadow {
                offset_x: at(0),
                offset_y: at(1),
                blur: at(2),
                spread: at(3),
                color,
            })
        })
        .collect()
}
