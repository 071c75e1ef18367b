//! Linear gradients.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::css::PropertyMap;
use crate::values::color::{parse_color, Color};
use crate::values::Vocabulary;
use crate::widget::{Call, Expr};

static HEX_STOP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)#(?:[0-9a-f]{8}|[0-9a-f]{6}|[0-9a-f]{4}|[0-9a-f]{3})").expect("valid stop regex")
});

static ANGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*deg").expect("valid angle regex"));

const MARKER: &str = "linear-gradient(";

/// A linear gradient between two alignment anchors.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub begin: &'static str,
    pub end: &'static str,
    pub colors: Vec<Color>,
}

impl LinearGradient {
    pub fn to_expr(&self) -> Expr {
        Call::new("LinearGradient")
            .named("begin", Expr::ident(self.begin))
            .named("end", Expr::ident(self.end))
            .named("colors", Expr::List(self.colors.iter().map(Color::to_expr).collect()))
            .build()
    }
}

/// A decoration gradient.
#[derive(Clone, Debug, PartialEq)]
pub enum Gradient {
    Linear(LinearGradient),
    /// A gradient was declared but could not be read; the app theme's
    /// default background gradient stands in.
    ThemeDefault,
}

impl Gradient {
    pub fn to_expr(&self) -> Expr {
        match self {
            Gradient::Linear(linear) => linear.to_expr(),
            Gradient::ThemeDefault => Call::new("AppColors.primaryBackgroundGradient").build(),
        }
    }
}

/// Whether a value mentions `linear-gradient`.
pub fn is_linear_gradient(value: &str) -> bool {
    value.to_ascii_lowercase().contains("linear-gradient")
}

/// The text between `linear-gradient(` and its balancing `)`.
fn gradient_args(value: &str) -> Option<&str> {
    let start = value.to_ascii_lowercase().find(MARKER)? + MARKER.len();
    let mut depth = 1usize;
    for (offset, ch) in value[start..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&value[start..start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Hex color stops of the first linear gradient, in order.
pub fn gradient_colors(value: &str, vocab: &Vocabulary) -> Vec<Color> {
    let Some(args) = gradient_args(value) else {
        return Vec::new();
    };
    HEX_STOP
        .find_iter(args)
        .filter_map(|m| parse_color(m.as_str(), vocab))
        .collect()
}

/// Parse the first `linear-gradient(...)` in a value.
///
/// Only hex stops are read. The angle defaults to 180deg; 180 runs top to
/// bottom, 90 left to right, anything else diagonally.
pub fn parse_linear_gradient(value: &str, vocab: &Vocabulary) -> Option<LinearGradient> {
    let args = gradient_args(value)?;
    let colors = gradient_colors(value, vocab);
    if colors.is_empty() {
        return None;
    }
    let angle = ANGLE
        .captures(args)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(180);
    let (begin, end) = match angle {
        180 => ("Alignment.topCenter", "Alignment.bottomCenter"),
        90 => ("Alignment.centerLeft", "Alignment.centerRight"),
        _ => ("Alignment.topLeft", "Alignment.bottomRight"),
    };
    Some(LinearGradient { begin, end, colors })
}

/// Whether the properties clip their background to text.
pub fn clips_to_text(props: &PropertyMap) -> bool {
    ["background-clip", "-webkit-background-clip"]
        .iter()
        .filter_map(|name| props.get(*name))
        .any(|v| v.to_ascii_lowercase().contains("text"))
}

/// The background value a text gradient would be read from.
fn text_gradient_source(props: &PropertyMap) -> Option<&str> {
    props
        .get("background-image")
        .or_else(|| props.get("background"))
        .map(String::as_str)
}

/// Gradient for gradient-filled text: background clipped to text with a
/// linear gradient source.
pub fn text_gradient(props: &PropertyMap, vocab: &Vocabulary) -> Option<LinearGradient> {
    if !clips_to_text(props) {
        return None;
    }
    let source = text_gradient_source(props)?;
    if !is_linear_gradient(source) {
        return None;
    }
    parse_linear_gradient(source, vocab)
}

/// First stop of a text-clipped background gradient, used as a solid
/// stand-in where gradient text is not available.
pub fn text_gradient_first_stop(props: &PropertyMap, vocab: &Vocabulary) -> Option<Color> {
    if !clips_to_text(props) {
        return None;
    }
    let source = text_gradient_source(props)?;
    gradient_colors(source, vocab).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Rgba;
    use crate::widget::dart::render_flat;

    fn vocab() -> Vocabulary {
        Vocabulary::default()
    }

    #[test]
    fn default_angle_is_vertical() {
        let g = parse_linear_gradient("linear-gradient(#fff, #000)", &vocab()).unwrap();
        assert_eq!(g.begin, "Alignment.topCenter");
        assert_eq!(g.end, "Alignment.bottomCenter");
        assert_eq!(g.colors.len(), 2);
    }

    #[test]
    fn angles_pick_anchors() {
        let horizontal =
            parse_linear_gradient("Linear-Gradient(90deg, #FF0000 0%, #00f 100%)", &vocab()).unwrap();
        assert_eq!(horizontal.begin, "Alignment.centerLeft");
        assert_eq!(horizontal.colors[0], Color::Argb(Rgba::rgb(255, 0, 0)));

        let diagonal = parse_linear_gradient("linear-gradient(135deg, #000, #111)", &vocab()).unwrap();
        assert_eq!(diagonal.begin, "Alignment.topLeft");
        assert_eq!(diagonal.end, "Alignment.bottomRight");
    }

    #[test]
    fn balanced_parentheses_and_non_hex_stops() {
        let value = "linear-gradient(180deg, rgba(0, 0, 0, 0.2) 0%, #123456 100%), url(a.png)";
        let g = parse_linear_gradient(value, &vocab()).unwrap();
        assert_eq!(g.colors, vec![Color::Argb(Rgba::rgb(0x12, 0x34, 0x56))]);
    }

    #[test]
    fn no_hex_stop_is_none() {
        assert!(parse_linear_gradient("linear-gradient(red, blue)", &vocab()).is_none());
        assert!(parse_linear_gradient("linear-gradient(#fff", &vocab()).is_none());
    }

    #[test]
    fn text_gradient_requires_clip() {
        let mut props = PropertyMap::new();
        props.insert("background".into(), "linear-gradient(90deg, #f00, #00f)".into());
        assert!(text_gradient(&props, &vocab()).is_none());
        props.insert("-webkit-background-clip".into(), "text".into());
        assert!(text_gradient(&props, &vocab()).is_some());
        assert_eq!(
            text_gradient_first_stop(&props, &vocab()),
            Some(Color::Argb(Rgba::rgb(255, 0, 0)))
        );
    }

    #[test]
    fn renders_linear_gradient() {
        let g = parse_linear_gradient("linear-gradient(90deg, #000, #fff)", &vocab()).unwrap();
        assert_eq!(
            render_flat(&g.to_expr()),
            "LinearGradient(begin: Alignment.centerLeft, end: Alignment.centerRight, colors: [AppColors.fromHex('#ff000000'), AppColors.fromHex('#ffffffff')])"
        );
    }
}
