//! Text styles: size, weight, color, line height, family, letter spacing.

use crate::css::PropertyMap;
use crate::values::color::{parse_color, Color};
use crate::values::gradient::text_gradient_first_stop;
use crate::values::length::{leading_int, px};
use crate::values::Vocabulary;
use crate::widget::{Call, Expr};

/// Font weight bucket.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FontWeight {
    W400,
    W500,
    W600,
    W700,
}

impl FontWeight {
    /// `bold`/`normal` keywords or a numeric weight, bucketed downward.
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim().to_ascii_lowercase();
        match value.as_str() {
            "bold" => return FontWeight::W700,
            "normal" => return FontWeight::W400,
            _ => {}
        }
        match leading_int(&value) {
            Some(n) if n >= 700 => FontWeight::W700,
            Some(n) if n >= 600 => FontWeight::W600,
            Some(n) if n >= 500 => FontWeight::W500,
            _ => FontWeight::W400,
        }
    }

    pub fn dart_name(self) -> &'static str {
        match self {
            FontWeight::W400 => "FontWeight.w400",
            FontWeight::W500 => "FontWeight.w500",
            FontWeight::W600 => "FontWeight.w600",
            FontWeight::W700 => "FontWeight.w700",
        }
    }
}

/// A text style with only the declared facets set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextStyleSpec {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub color: Option<Color>,
    pub weight: Option<FontWeight>,
    /// Line height as a multiple of the font size.
    pub height: Option<f64>,
    pub letter_spacing: Option<f64>,
}

impl TextStyleSpec {
    /// Read a text style from class properties. `None` when no facet is set.
    pub fn from_props(props: &PropertyMap, vocab: &Vocabulary) -> Option<Self> {
        let font_size = props.get("font-size").and_then(|v| px(v)).filter(|s| *s != 0.0);
        let weight = props.get("font-weight").map(|v| FontWeight::parse(v));

        let mut color = props.get("color").and_then(|v| parse_color(v, vocab));
        if color.as_ref().is_some_and(Color::is_transparent) {
            // Gradient-clipped text: keep something visible.
            if let Some(stop) = text_gradient_first_stop(props, vocab) {
                color = Some(stop);
            }
        }

        let line_height = props.get("line-height").and_then(|v| px(v));
        let height = match (font_size, line_height) {
            (Some(size), Some(lh)) if lh != 0.0 => Some(lh / size),
            _ => None,
        };

        let spec = Self {
            font_family: props
                .get("font-family")
                .and_then(|v| font_family(v, vocab)),
            font_size,
            color,
            weight,
            height,
            letter_spacing: props.get("letter-spacing").and_then(|v| px(v)),
        };
        (spec != Self::default()).then_some(spec)
    }

    /// Overlay `own` on top of `self`: facets `own` declares win.
    pub fn merge(&self, own: &TextStyleSpec) -> TextStyleSpec {
        TextStyleSpec {
            font_family: own.font_family.clone().or_else(|| self.font_family.clone()),
            font_size: own.font_size.or(self.font_size),
            color: own.color.clone().or_else(|| self.color.clone()),
            weight: own.weight.or(self.weight),
            height: own.height.or(self.height),
            letter_spacing: own.letter_spacing.or(self.letter_spacing),
        }
    }

    /// Merge two optional styles.
    pub fn merge_opt(base: Option<&TextStyleSpec>, own: Option<&TextStyleSpec>) -> Option<TextStyleSpec> {
        match (base, own) {
            (Some(base), Some(own)) => Some(base.merge(own)),
            (None, Some(own)) => Some(own.clone()),
            (Some(base), None) => Some(base.clone()),
            (None, None) => None,
        }
    }

    pub fn to_expr(&self) -> Expr {
        Call::new("TextStyle")
            .named_opt("fontFamily", self.font_family.as_deref().map(Expr::str))
            .named_opt("fontSize", self.font_size)
            .named_opt("color", self.color.as_ref().map(Color::to_expr))
            .named_opt("fontWeight", self.weight.map(|w| Expr::ident(w.dart_name())))
            .named_opt("height", self.height)
            .named_opt("letterSpacing", self.letter_spacing)
            .build()
    }
}

/// Resolve a `font-family` list to the app font name.
///
/// The first candidate decides: a vocabulary hit returns its mapping (which
/// may be "platform default"), a generic family is skipped, anything else is
/// used verbatim.
pub fn font_family(raw: &str, vocab: &Vocabulary) -> Option<String> {
    for candidate in raw.split(',') {
        let name = candidate.trim().trim_matches(|c| c == '"' || c == '\'');
        if name.is_empty() {
            continue;
        }
        let key = name.to_lowercase();
        if let Some(mapped) = vocab.font_families.get(&key) {
            return mapped.clone();
        }
        if key.contains("serif") || key.contains("monospace") {
            continue;
        }
        return Some(name.to_string());
    }
    None
}
