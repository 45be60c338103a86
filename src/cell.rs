//! Cell-value helpers shared by section renderers
//!
//! Sheet cells are free text typed by content editors. These functions turn
//! the conventions they use (inline markup, `=IMAGE()` formulas, Drive share
//! links, local phone numbers) into values a page can use directly.
use std::sync::LazyLock;

use regex::Regex;

use crate::sheet::{ConfigMap, Record};

/// Literal a sheet uses for a checked boolean cell
pub const TRUE_FLAG: &str = "TRUE";

static IMAGE_FORMULA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)^=IMAGE\("([^"]+)"\)"#).unwrap());

static DRIVE_IDS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"drive\.google\.com/file/d/([^/]+)",
        r"drive\.google\.com/uc\?.*id=([^&]+)",
        r"drive\.google\.com/thumbnail\?.*id=([^&]+)",
    ]
    .map(|p| Regex::new(p).unwrap())
});

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());

/// Resolve an image cell to a displayable URL
///
/// Unwraps `=IMAGE("<url>")` formulas and rewrites Google Drive share links
/// to the thumbnail endpoint, which serves the image itself.
///
/// # Examples
///
/// ```
/// use sheet_content_loader::cell::extract_image_url;
///
/// assert_eq!(extract_image_url(r#"=IMAGE("https://x.test/a.png")"#), "https://x.test/a.png");
/// assert_eq!(
///     extract_image_url("https://drive.google.com/file/d/abc123/view?usp=sharing"),
///     "https://drive.google.com/thumbnail?id=abc123&sz=w1000"
/// );
/// assert_eq!(extract_image_url(""), "");
/// ```
pub fn extract_image_url(value: &str) -> String {
    let mut url = value.trim();
    if url.is_empty() {
        return String::new();
    }

    if let Some(caps) = IMAGE_FORMULA.captures(url) {
        if let Some(inner) = caps.get(1) {
            url = inner.as_str();
        }
    }

    let drive_id = DRIVE_IDS
        .iter()
        .find_map(|re| re.captures(url).and_then(|c| c.get(1)));

    match drive_id {
        Some(id) => format!(
            "https://drive.google.com/thumbnail?id={}&sz=w1000",
            id.as_str()
        ),
        None => url.to_string(),
    }
}

/// Light markdown to HTML: `**bold**`, `*em*` and line breaks.
///
/// Sheet content is trusted, so existing HTML passes through unescaped.
pub fn format_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let s = BOLD.replace_all(text, "<strong>$1</strong>");
    let s = EMPHASIS.replace_all(&s, "<em>$1</em>");
    s.replace('\n', "<br>")
}

/// Strip inline markup and line breaks, truncated to `max_chars` characters.
///
/// Used for meta descriptions built from formatted copy.
pub fn plain_text(text: &str, max_chars: usize) -> String {
    let s = BOLD.replace_all(text, "$1");
    let s = EMPHASIS.replace_all(&s, "$1");
    s.replace('\n', " ").chars().take(max_chars).collect()
}

/// Normalise a phone number for a `tel:` link
///
/// Separators are dropped and a leading trunk `0` becomes the `+61` country code.
///
/// ```
/// use sheet_content_loader::cell::phone_to_link;
///
/// assert_eq!(phone_to_link("0400 123 456"), "+61400123456");
/// assert_eq!(phone_to_link("(02) 9999-0000"), "+61299990000");
/// assert_eq!(phone_to_link("+61 400 123 456"), "+61400123456");
/// ```
pub fn phone_to_link(phone: &str) -> String {
    let digits: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    match digits.strip_prefix('0') {
        Some(rest) => format!("+61{rest}"),
        None => digits,
    }
}

/// URL-fragment slug of a section label
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    for c in kept.chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_string()
}

/// Bootstrap icon class with the `bi-` prefix applied once
pub fn normalize_icon(icon: &str) -> String {
    if icon.is_empty() || icon.starts_with("bi-") {
        icon.to_string()
    } else {
        format!("bi-{icon}")
    }
}

/// Fold `key`/`value` records of a flat sheet into a config map
pub fn to_key_value(records: &[Record]) -> ConfigMap {
    records
        .iter()
        .filter(|r| !r.get("key").is_empty())
        .map(|r| (r.get("key").trim().to_string(), r.get("value").to_string()))
        .collect()
}

pub fn is_truthy_flag(value: &str) -> bool {
    value == TRUE_FLAG
}
