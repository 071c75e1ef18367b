//! Borders and corner radii.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::css::PropertyMap;
use crate::geometry::Corners;
use crate::values::color::{find_color, parse_color, Color};
use crate::values::length::{leading_float, px};
use crate::values::Vocabulary;
use crate::widget::{Call, Expr};

static BORDER_WIDTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-?\d*\.?\d+)px").expect("valid border width regex"));

/// A uniform border.
#[derive(Clone, Debug, PartialEq)]
pub struct Border {
    pub color: Color,
    pub width: f64,
}

impl Border {
    pub fn to_expr(&self) -> Expr {
        Call::new("Border.all")
            .named("color", self.color.to_expr())
            .named("width", self.width)
            .build()
    }
}

/// Border from `border-width`/`border-color` and the `border` shorthand.
///
/// Missing width defaults to 1 and missing color to black, but at least one
/// of them must be found.
pub fn parse_border(props: &PropertyMap, vocab: &Vocabulary) -> Option<Border> {
    let shorthand = props.get("border");
    let width = props.get("border-width").and_then(|v| px(v)).or_else(|| {
        let caps = BORDER_WIDTH.captures(shorthand?)?;
        leading_float(caps.get(1)?.as_str())
    });
    let color = border_color(props, vocab);
    if width.is_none() && color.is_none() {
        return None;
    }
    Some(Border {
        color: color.unwrap_or(Color::Black),
        width: width.unwrap_or(1.0),
    })
}

/// Border color alone: `border-color`, else the first color in `border`.
pub fn border_color(props: &PropertyMap, vocab: &Vocabulary) -> Option<Color> {
    props
        .get("border-color")
        .and_then(|v| parse_color(v, vocab))
        .or_else(|| props.get("border").and_then(|v| find_color(v, vocab)))
}

/// Render corner radii: `BorderRadius.circular` when uniform, else
/// `BorderRadius.only` with all four corners.
pub fn radius_expr(corners: &Corners) -> Expr {
    if let Some(r) = corners.uniform() {
        return Call::new("BorderRadius.circular").arg(r).build();
    }
    let circular = |v: f64| Call::new("Radius.circular").arg(v).build();
    Call::new("BorderRadius.only")
        .named("topLeft", circular(corners.top_left))
        .named("topRight", circular(corners.top_right))
        .named("bottomRight", circular(corners.bottom_right))
        .named("bottomLeft", circular(corners.bottom_left))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Insets;
    use crate::values::Rgba;
    use crate::widget::dart::render_flat;

    fn props(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn shorthand_border() {
        let b = parse_border(&props(&[("border", "2px solid #E4E7EC")]), &Vocabulary::default())
            .unwrap();
        assert_eq!(b.width, 2.0);
        assert_eq!(b.color, Color::Argb(Rgba::rgb(0xe4, 0xe7, 0xec)));
    }

    #[test]
    fn defaults_fill_missing_half() {
        let vocab = Vocabulary::default();
        let only_color = parse_border(&props(&[("border-color", "white")]), &vocab).unwrap();
        assert_eq!(only_color.width, 1.0);
        assert_eq!(only_color.color, Color::White);

        let only_width = parse_border(&props(&[("border", "0.5px solid")]), &vocab).unwrap();
        assert_eq!(only_width.width, 0.5);
        assert_eq!(only_width.color, Color::Black);

        assert!(parse_border(&props(&[("border", "none")]), &vocab).is_none());
    }

    #[test]
    fn longhand_color_wins() {
        let vocab = Vocabulary::default();
        let p = props(&[("border", "1px solid #000"), ("border-color", "#fff")]);
        assert_eq!(border_color(&p, &vocab), Some(Color::Argb(Rgba::rgb(255, 255, 255))));
    }

    #[test]
    fn radius_rendering() {
        let uniform = Corners::from_insets(Insets::all(8.0));
        assert_eq!(render_flat(&radius_expr(&uniform)), "BorderRadius.circular(8)");
        let mixed = Corners::from_insets(Insets::new(8.0, 0.0, 4.0, 0.0));
        assert_eq!(
            render_flat(&radius_expr(&mixed)),
            "BorderRadius.only(topLeft: Radius.circular(8), topRight: Radius.circular(0), bottomRight: Radius.circular(4), bottomLeft: Radius.circular(0))"
        );
    }
}
