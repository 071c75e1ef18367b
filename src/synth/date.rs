//! Date field heuristics and the initial date seed.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::markup::tree::collapse_whitespace;
use crate::widget::{Call, Expr};

/// Phrases that mark a field as a date in Japanese forms.
const DATE_PHRASES: &[&str] = &[
    "生年", "誕生日", "出生", "設置年", "施工年", "実施年", "年度", "年月日", "日付", "カレンダー", "日程",
];

static DOB: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdob\b").expect("valid dob regex"));
static DATE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdate\b").expect("valid date regex"));
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(yyyy|yy).*(mm).*(dd)").expect("valid placeholder regex"));
static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{4}[/.-]\d{1,2}[/.-]\d{1,2}\b").expect("valid numeric date regex")
});
static CJK_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}年\d{1,2}月\d{1,2}日").expect("valid cjk date regex"));

static FULL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})/(\d{1,2})/(\d{1,2})").expect("valid full date regex"));
static YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})/(\d{1,2})").expect("valid year-month regex"));
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").expect("valid year regex"));

/// Whether free text reads like a date label, placeholder or value.
pub fn looks_like_date_text(raw: &str) -> bool {
    let text = collapse_whitespace(raw);
    if text.is_empty() {
        return false;
    }
    let lower = text.to_lowercase();
    if DATE_PHRASES.iter().any(|p| text.contains(p)) {
        return true;
    }
    if DOB.is_match(&lower) || lower.contains("birth") || DATE_WORD.is_match(&lower) {
        return true;
    }
    if lower.contains("calendar") {
        return true;
    }
    if PLACEHOLDER.is_match(&text) || NUMERIC_DATE.is_match(&text) || CJK_DATE.is_match(&text) {
        return true;
    }
    // 月 with 日 covers both "M月D日" and "Y年M月D日".
    text.contains('月') && text.contains('日')
}

/// Whether an input should become a date picker: a date input type, or any
/// of its class, label or hint reads like a date.
pub fn looks_like_date_field(
    class_name: Option<&str>,
    input_type: &str,
    label: Option<&str>,
    hint: Option<&str>,
) -> bool {
    if matches!(input_type, "date" | "datetime-local" | "month") {
        return true;
    }
    [class_name, label, hint]
        .into_iter()
        .flatten()
        .any(looks_like_date_text)
}

fn number(caps: &regex::Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

/// The date a picker starts on, at the precision the hint gave.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DateSeed {
    Day(NaiveDate),
    Month(NaiveDate),
    Year(NaiveDate),
}

impl DateSeed {
    /// Read a seed from a hint such as `2024/05/17`, `2024年5月` or `2024`.
    /// The most precise valid reading wins. `None` means "today".
    pub fn from_hint(hint: &str) -> Option<Self> {
        let normalized = hint
            .trim()
            .replace('年', "/")
            .replace('月', "/")
            .replace('日', "")
            .replace(['.', '-'], "/");
        if normalized.is_empty() {
            return None;
        }
        let full = FULL.captures(&normalized).and_then(|caps| {
            let year = number(&caps, 1)?;
            NaiveDate::from_ymd_opt(year as i32, number(&caps, 2)?, number(&caps, 3)?)
        });
        if let Some(date) = full {
            return Some(DateSeed::Day(date));
        }
        let month = YEAR_MONTH.captures(&normalized).and_then(|caps| {
            let year = number(&caps, 1)?;
            NaiveDate::from_ymd_opt(year as i32, number(&caps, 2)?, 1)
        });
        if let Some(date) = month {
            return Some(DateSeed::Month(date));
        }
        YEAR.captures(&normalized)
            .and_then(|caps| NaiveDate::from_ymd_opt(number(&caps, 1)? as i32, 1, 1))
            .map(DateSeed::Year)
    }

    pub fn date(&self) -> NaiveDate {
        match *self {
            DateSeed::Day(d) | DateSeed::Month(d) | DateSeed::Year(d) => d,
        }
    }

    /// `DateTime(y, m, d)`.
    pub fn to_expr(&self) -> Expr {
        use chrono::Datelike;
        let date = self.date();
        Call::new("DateTime")
            .arg(f64::from(date.year()))
            .arg(f64::from(date.month()))
            .arg(f64::from(date.day()))
            .build()
    }
}
