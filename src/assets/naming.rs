//! Asset name tokens: sanitizing, semantic tokens, catalog identifiers.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid token regex"));

static KIND_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(icon|image|img|ic)_+").expect("valid prefix regex"));

static NUMERIC_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(_?\d+)+$").expect("valid suffix regex"));

static NUMBERED_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(frame|group|rect|ellipse|vector|path|shape|line|icon|img|image)\d*$")
        .expect("valid placeholder regex")
});

static HASHED_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]{6,}(?:_[a-z0-9]{5,})+$").expect("valid hash regex"));

static CATALOG_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[/._-]+").expect("valid split regex"));

/// Tokens that say nothing about what an asset depicts.
const GENERIC_TOKENS: &[&str] = &[
    "asset", "auto", "div", "ellipse", "frame", "group", "icon", "image", "img", "line", "path",
    "rect", "shape", "svg", "vector", "wrapper",
];

/// Lowercase, runs of non-alphanumerics to `_`, no leading/trailing `_`.
pub fn sanitize_token(value: &str) -> String {
    let lower = value.trim().to_lowercase();
    NON_ALNUM
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_string()
}

/// Sanitize and strip a leading kind prefix (`icon_`, `img_`, …) and
/// trailing numbers. Falls back to the less-stripped form when stripping
/// would leave nothing.
pub fn normalize_semantic_token(value: &str) -> String {
    let base = sanitize_token(value);
    if base.is_empty() {
        return base;
    }
    let without_prefix = KIND_PREFIX.replace(&base, "").into_owned();
    let trimmed = NUMERIC_SUFFIX.replace(&without_prefix, "");
    let trimmed = trimmed.trim_matches('_');
    if !trimmed.is_empty() {
        trimmed.to_string()
    } else if !without_prefix.is_empty() {
        without_prefix
    } else {
        base
    }
}

/// Whether a token is too generic to name an asset: empty, a stop word, a
/// numbered placeholder (`frame12`), purely numeric, or a hashed id.
pub fn is_generic_token(token: &str) -> bool {
    let normalized = normalize_semantic_token(token);
    if normalized.is_empty() || GENERIC_TOKENS.contains(&normalized.as_str()) {
        return true;
    }
    if NUMBERED_PLACEHOLDER.is_match(&normalized) {
        return true;
    }
    if HASHED_ID.is_match(&normalized) && normalized.bytes().any(|b| b.is_ascii_digit()) {
        return true;
    }
    normalized.bytes().all(|b| b.is_ascii_digit())
}

/// A usable semantic token from a class name, or `None` when it is generic.
pub fn semantic_token_from_class(class_name: &str) -> Option<String> {
    let token = normalize_semantic_token(class_name);
    (!is_generic_token(&token)).then_some(token)
}

/// Ordering for competing hints: non-generic first, then shorter, then
/// lexicographically smaller.
pub fn is_better_token(next: &str, current: &str) -> bool {
    if current.is_empty() {
        return true;
    }
    let current_generic = is_generic_token(current);
    let next_generic = is_generic_token(next);
    if current_generic != next_generic {
        return !next_generic;
    }
    if next.len() != current.len() {
        return next.len() < current.len();
    }
    next < current
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `foo_bar` → `FooBar`.
pub fn pascal_token(raw: &str) -> String {
    sanitize_token(raw)
        .split('_')
        .filter(|p| !p.is_empty())
        .map(capitalize)
        .collect()
}

/// Catalog identifier for an asset path: `assets/` stripped, split on path
/// and word separators, camel-cased. A head that does not start with a
/// letter gets an `asset` prefix.
pub fn catalog_const_name(asset_path: &str) -> String {
    let normalized = asset_path.replace('\\', "/");
    let normalized = normalized.strip_prefix("assets/").unwrap_or(&normalized);
    let parts: Vec<String> = CATALOG_SPLIT
        .split(normalized)
        .map(sanitize_token)
        .filter(|p| !p.is_empty())
        .collect();
    let Some((head, tail)) = parts.split_first() else {
        return "assetGenerated".to_string();
    };
    let head = if head.starts_with(|c: char| c.is_ascii_lowercase()) {
        head.clone()
    } else {
        format!("asset{}", pascal_token(head))
    };
    let tail: String = tail.iter().map(|p| pascal_token(p)).collect();
    format!("{head}{tail}")
}
