//! Color values: hex, rgb()/rgba(), named colors, and `var()` tokens.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::values::Vocabulary;
use crate::widget::{Call, Expr};

static RGB_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(?:,\s*(\d*\.?\d+)\s*)?\)$")
        .expect("valid rgb regex")
});

/// The first color-looking substring in a compound value such as
/// `1px solid #e4e7ec` or `0 4px 8px rgba(0, 0, 0, 0.1)`.
static EMBEDDED_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(rgba?\([^)]*\)|#[0-9a-f]{3,8}|var\([^)]*\))").expect("valid color regex")
});

// ---------------------------------------------------------------------------
// Rgba
// ---------------------------------------------------------------------------

/// An 8-bit-per-channel color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Canonical alpha-leading form: `#aarrggbb`, lowercase.
    pub fn to_canonical_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
    }

    /// Parse the canonical `#aarrggbb` form.
    pub fn from_canonical_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 8 {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        let [a, r, g, b] = value.to_be_bytes();
        Some(Self { r, g, b, a })
    }

    /// Parse CSS hex notation: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`.
    ///
    /// CSS puts alpha last; the result is channel-correct regardless.
    pub fn from_css_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok().map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            3 => Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Some(Self {
                r: nibble(0)?,
                g: nibble(1)?,
                b: nibble(2)?,
                a: nibble(3)?,
            }),
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A resolved color as the generated code refers to it.
#[derive(Clone, Debug, PartialEq)]
pub enum Color {
    /// Explicit channels, emitted as `AppColors.fromHex('#aarrggbb')`.
    Argb(Rgba),
    White,
    Black,
    Transparent,
    /// A design token mapped to a palette constant, e.g. `AppColors.primary`.
    Token(String),
}

impl Color {
    pub fn is_transparent(&self) -> bool {
        matches!(self, Color::Transparent)
    }

    pub fn to_expr(&self) -> Expr {
        match self {
            Color::Argb(rgba) => Call::new("AppColors.fromHex")
                .arg(Expr::str(rgba.to_canonical_hex()))
                .build(),
            Color::White => Expr::ident("AppColors.white"),
            Color::Black => Expr::ident("AppColors.black"),
            Color::Transparent => Expr::ident("AppColors.transparent"),
            Color::Token(path) => Expr::ident(path.clone()),
        }
    }
}

impl From<&Color> for Expr {
    fn from(color: &Color) -> Self {
        color.to_expr()
    }
}

/// Parse a CSS color value.
///
/// Returns `None` for anything unrecognized, including `var()` tokens that
/// are neither in the vocabulary nor carry a usable fallback.
pub fn parse_color(raw: &str, vocab: &Vocabulary) -> Option<Color> {
    let value = raw.trim().to_ascii_lowercase();

    if let Some(inner) = value.strip_prefix("var(").and_then(|v| v.strip_suffix(')')) {
        let (name, fallback) = match inner.split_once(',') {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (inner, None),
        };
        let token: String = name
            .trim()
            .trim_start_matches('-')
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if let Some(path) = vocab.color_token(&token) {
            return Some(Color::Token(path.to_string()));
        }
        return fallback.and_then(|f| parse_color(f, vocab));
    }

    if value.starts_with('#') {
        return Rgba::from_css_hex(&value).map(Color::Argb);
    }

    if let Some(caps) = RGB_FUNCTION.captures(&value) {
        let channel = |i: usize| -> Option<u8> {
            let v: u64 = caps.get(i)?.as_str().parse().ok()?;
            Some(v.min(255) as u8)
        };
        let alpha = match caps.get(4) {
            Some(m) => m.as_str().parse::<f64>().ok()?.clamp(0.0, 1.0),
            None => 1.0,
        };
        return Some(Color::Argb(Rgba {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
            a: (alpha * 255.0).round() as u8,
        }));
    }

    match value.as_str() {
        "white" => Some(Color::White),
        "black" => Some(Color::Black),
        "transparent" => Some(Color::Transparent),
        _ => None,
    }
}

/// Find and parse the first color embedded in a compound value.
pub fn find_color(value: &str, vocab: &Vocabulary) -> Option<Color> {
    let found = EMBEDDED_COLOR.find(value)?;
    parse_color(found.as_str(), vocab)
}

/// Remove the first embedded color from a compound value.
pub fn strip_color(value: &str) -> String {
    EMBEDDED_COLOR.replace(value, "").into_owned()
}
