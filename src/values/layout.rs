//! Layout facets: size, absolute placement, stacking, flex, rotation, text
//! alignment.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::css::PropertyMap;
use crate::geometry::{Edges, Size};
use crate::values::length::{leading_int, px};
use crate::widget::Expr;

static FIRST_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(\.\d+)?").expect("valid number regex"));

static DEGREES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(-?\d+(\.\d+)?)deg").expect("valid degrees regex"));

fn lower(props: &PropertyMap, name: &str) -> String {
    props
        .get(name)
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Declared `width`/`height`.
pub fn size(props: &PropertyMap) -> Size {
    Size::new(
        props.get("width").and_then(|v| px(v)),
        props.get("height").and_then(|v| px(v)),
    )
}

/// Offsets of an absolutely placed box. `None` unless `position: absolute`
/// with at least one offset.
pub fn position(props: &PropertyMap) -> Option<Edges> {
    if lower(props, "position") != "absolute" {
        return None;
    }
    let edge = |name: &str| props.get(name).and_then(|v| px(v));
    let edges = Edges {
        top: edge("top"),
        right: edge("right"),
        bottom: edge("bottom"),
        left: edge("left"),
    };
    (!edges.is_empty()).then_some(edges)
}

/// `z-index`, default 0.
pub fn z_index(props: &PropertyMap) -> i64 {
    props.get("z-index").and_then(|v| leading_int(v)).unwrap_or(0)
}

/// Flex weight from `flex-grow`, else the first number of `flex`. Default 0.
pub fn flex_grow(props: &PropertyMap) -> f64 {
    props
        .get("flex-grow")
        .or_else(|| props.get("flex"))
        .and_then(|v| FIRST_NUMBER.find(v.trim()))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Rotation in radians from `rotate`, else `transform`.
pub fn rotation(props: &PropertyMap) -> Option<f64> {
    let raw = props
        .get("rotate")
        .filter(|v| !v.trim().is_empty())
        .or_else(|| props.get("transform"))?;
    let caps = DEGREES.captures(raw)?;
    let degrees: f64 = caps.get(1)?.as_str().parse().ok()?;
    degrees
        .is_finite()
        .then(|| degrees * std::f64::consts::PI / 180.0)
}

/// Whether `overflow: hidden` clips the box.
pub fn clips_overflow(props: &PropertyMap) -> bool {
    lower(props, "overflow") == "hidden"
}

// ---------------------------------------------------------------------------
// Text alignment
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn to_expr(self) -> Expr {
        Expr::ident(match self {
            TextAlign::Left => "TextAlign.left",
            TextAlign::Center => "TextAlign.center",
            TextAlign::Right => "TextAlign.right",
        })
    }
}

/// `text-align`: `center`, `right`/`end`, `left`/`start`.
pub fn text_align(props: &PropertyMap) -> Option<TextAlign> {
    match lower(props, "text-align").as_str() {
        "center" => Some(TextAlign::Center),
        "right" | "end" => Some(TextAlign::Right),
        "left" | "start" => Some(TextAlign::Left),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Flex
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MainAlign {
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
}

impl MainAlign {
    pub fn to_expr(self) -> Expr {
        Expr::ident(match self {
            MainAlign::Start => "MainAxisAlignment.start",
            MainAlign::Center => "MainAxisAlignment.center",
            MainAlign::End => "MainAxisAlignment.end",
            MainAlign::SpaceBetween => "MainAxisAlignment.spaceBetween",
            MainAlign::SpaceAround => "MainAxisAlignment.spaceAround",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CrossAlign {
    Start,
    Center,
    End,
    Stretch,
}

impl CrossAlign {
    pub fn to_expr(self) -> Expr {
        Expr::ident(match self {
            CrossAlign::Start => "CrossAxisAlignment.start",
            CrossAlign::Center => "CrossAxisAlignment.center",
            CrossAlign::End => "CrossAxisAlignment.end",
            CrossAlign::Stretch => "CrossAxisAlignment.stretch",
        })
    }
}

/// Flex container configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlexConfig {
    pub axis: Axis,
    pub main: MainAlign,
    pub cross: CrossAlign,
    /// Spacing between children along the main axis.
    pub gap: Option<f64>,
}

/// Flex configuration when `display` contains `flex`.
pub fn flex_config(props: &PropertyMap) -> Option<FlexConfig> {
    if !lower(props, "display").contains("flex") {
        return None;
    }
    let direction = lower(props, "flex-direction");
    let axis = if direction.is_empty() || direction.contains("row") {
        Axis::Row
    } else {
        Axis::Column
    };
    let main = match lower(props, "justify-content").as_str() {
        "center" => MainAlign::Center,
        "space-between" => MainAlign::SpaceBetween,
        "space-around" => MainAlign::SpaceAround,
        "flex-end" => MainAlign::End,
        _ => MainAlign::Start,
    };
    let cross = match lower(props, "align-items").as_str() {
        "center" => CrossAlign::Center,
        "flex-end" => CrossAlign::End,
        "stretch" => CrossAlign::Stretch,
        _ => CrossAlign::Start,
    };
    let axis_gap = match axis {
        Axis::Row => props.get("column-gap"),
        Axis::Column => props.get("row-gap"),
    };
    let gap = axis_gap.and_then(|v| px(v)).or_else(|| {
        // `gap: <row> <column>`; a single value covers both.
        let parts: Vec<f64> = props.get("gap")?.split_whitespace().filter_map(px).collect();
        match (axis, parts.as_slice()) {
            (_, [both]) => Some(*both),
            (Axis::Column, [row, _, ..]) => Some(*row),
            (Axis::Row, [_, column, ..]) => Some(*column),
            _ => None,
        }
    });
    Some(FlexConfig {
        axis,
        main,
        cross,
        gap: gap.filter(|g| *g != 0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn position_requires_absolute_and_offset() {
        assert!(position(&props(&[("top", "4px")])).is_none());
        assert!(position(&props(&[("position", "absolute")])).is_none());
        let edges = position(&props(&[("position", "absolute"), ("left", "10px")])).unwrap();
        assert_eq!(edges.left, Some(10.0));
        assert_eq!(edges.top, None);
    }

    #[test]
    fn stacking_and_weights() {
        assert_eq!(z_index(&props(&[("z-index", "3")])), 3);
        assert_eq!(z_index(&props(&[("z-index", "auto")])), 0);
        assert_eq!(flex_grow(&props(&[("flex", "1 0 0")])), 1.0);
        assert_eq!(flex_grow(&props(&[("flex-grow", "2"), ("flex", "1")])), 2.0);
        assert_eq!(flex_grow(&props(&[("flex", "none")])), 0.0);
    }

    #[test]
    fn rotation_in_radians() {
        let r = rotation(&props(&[("transform", "rotate(-90deg)")])).unwrap();
        assert!((r + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(rotation(&props(&[("transform", "scale(2)")])), None);
    }

    #[test]
    fn flex_defaults_to_row() {
        let f = flex_config(&props(&[("display", "flex"), ("column-gap", "8px")])).unwrap();
        assert_eq!(f.axis, Axis::Row);
        assert_eq!(f.main, MainAlign::Start);
        assert_eq!(f.cross, CrossAlign::Start);
        assert_eq!(f.gap, Some(8.0));
    }

    #[test]
    fn flex_column_uses_row_gap() {
        let f = flex_config(&props(&[
            ("display", "inline-flex"),
            ("flex-direction", "column"),
            ("justify-content", "space-between"),
            ("align-items", "stretch"),
            ("column-gap", "8px"),
            ("row-gap", "12px"),
        ]))
        .unwrap();
        assert_eq!(f.axis, Axis::Column);
        assert_eq!(f.main, MainAlign::SpaceBetween);
        assert_eq!(f.cross, CrossAlign::Stretch);
        assert_eq!(f.gap, Some(12.0));
    }

    #[test]
    fn gap_shorthand_fallback() {
        let row = flex_config(&props(&[("display", "flex"), ("gap", "4px 10px")])).unwrap();
        assert_eq!(row.gap, Some(10.0));
        let col = flex_config(&props(&[
            ("display", "flex"),
            ("flex-direction", "column"),
            ("gap", "6px"),
        ]))
        .unwrap();
        assert_eq!(col.gap, Some(6.0));
    }

    #[test]
    fn no_flex_without_display() {
        assert!(flex_config(&props(&[("flex-direction", "row")])).is_none());
    }

    #[test]
    fn text_alignment() {
        assert_eq!(text_align(&props(&[("text-align", "END")])), Some(TextAlign::Right));
        assert_eq!(text_align(&props(&[("text-align", "justify")])), None);
    }
}
