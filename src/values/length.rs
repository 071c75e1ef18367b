//! Lengths and four-sided shorthands.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::css::PropertyMap;
use crate::geometry::{Corners, Insets};

static PX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(-?[0-9.]+)px").expect("valid px regex"));

/// Parse a length: the first `Npx` in the value, else a leading number
/// (`12`, `1.5em` → 1.5). `None` when neither is present.
pub fn px(raw: &str) -> Option<f64> {
    if let Some(caps) = PX.captures(raw) {
        if let Some(v) = caps.get(1).and_then(|m| leading_float(m.as_str())) {
            return Some(v);
        }
    }
    leading_float(raw)
}

/// Parse the longest numeric prefix after leading whitespace: optional sign,
/// digits, optional fraction, optional exponent. Non-finite results are
/// rejected.
pub fn leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        } else if digits > 0 {
            end = frac_start;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok().filter(|v: &f64| v.is_finite())
}

/// The leading integer of a value, as `parseInt` reads it: `"10"` → 10,
/// `"3.7"` → 3, `"auto"` → `None`.
pub fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

/// Expand a 1–4 value shorthand. Anything after `/` (elliptical radii) is
/// ignored; tokens that are not lengths are skipped.
pub fn box_values(raw: &str) -> Option<Insets> {
    let head = raw.split('/').next().unwrap_or_default();
    let values: Vec<f64> = head.split_whitespace().filter_map(px).collect();
    Insets::from_shorthand(&values)
}

/// Padding or margin: the shorthand (`prefix`) first, else the four
/// longhands when any of them is non-zero.
pub fn spacing(props: &PropertyMap, prefix: &str) -> Option<Insets> {
    if let Some(insets) = props.get(prefix).and_then(|v| box_values(v)) {
        return Some(insets);
    }
    let side = |name: &str| {
        props
            .get(&format!("{prefix}-{name}"))
            .and_then(|v| px(v))
            .unwrap_or(0.0)
    };
    let insets = Insets::new(side("top"), side("right"), side("bottom"), side("left"));
    (!insets.is_zero()).then_some(insets)
}

/// `border-radius` as corner radii.
pub fn border_radius(props: &PropertyMap) -> Option<Corners> {
    props
        .get("border-radius")
        .and_then(|v| box_values(v))
        .map(Corners::from_insets)
}
