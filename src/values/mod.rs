//! Value translators: raw property strings → structured style values.
//!
//! Every translator is a pure function that returns `None` (or an empty
//! result) for input it does not understand; a bad value only drops its own
//! facet.

pub mod border;
pub mod color;
pub mod gradient;
pub mod layout;
pub mod length;
pub mod shadow;
pub mod typography;

use std::collections::BTreeMap;

pub use border::Border;
pub use color::{parse_color, Color, Rgba};
pub use gradient::{Gradient, LinearGradient};
pub use layout::{Axis, CrossAlign, FlexConfig, MainAlign, TextAlign};
pub use shadow::BoxShadow;
pub use typography::{FontWeight, TextStyleSpec};

/// Lookup tables that map design vocabulary onto the target app's theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    /// Normalized `var(--token)` name → palette expression.
    pub color_tokens: BTreeMap<String, String>,
    /// Lowercased font family → app font family, or `None` to use the
    /// platform default.
    pub font_families: BTreeMap<String, Option<String>>,
}

impl Vocabulary {
    /// Palette expression for a normalized color token.
    pub fn color_token(&self, token: &str) -> Option<&str> {
        self.color_tokens.get(token).map(String::as_str)
    }

    /// Register a color token (builder).
    pub fn with_color_token(mut self, token: &str, expr: &str) -> Self {
        self.color_tokens
            .insert(token.to_ascii_lowercase(), expr.to_string());
        self
    }

    /// Register a font family mapping (builder).
    pub fn with_font_family(mut self, family: &str, mapped: Option<&str>) -> Self {
        self.font_families
            .insert(family.to_lowercase(), mapped.map(str::to_string));
        self
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        let color_tokens = [
            ("primary", "AppColors.primary"),
            ("buttondarkbtndarkcolor", "AppColors.white"),
            ("text2", "AppColors.colorB8BCC6"),
            ("tabdisabletext", "AppColors.colorB7B7B7"),
            ("neutrals200", "AppColors.colorEAECF0"),
            ("titletext", "AppColors.color667394"),
            ("bg", "AppColors.background"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let font_families = [
            ("zen maru gothic", Some("ZenMaruGothic")),
            ("noto sans jp", Some("ZenMaruGothic")),
            ("sf pro text", None),
            ("inter", None),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
        .collect();

        Self {
            color_tokens,
            font_families,
        }
    }
}
