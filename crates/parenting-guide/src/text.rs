//! Text normalization shared by the scorer, the ranker, and the mood classifier.

use once_cell::sync::Lazy;
use regex::Regex;

const PUNCTUATION: &str = "，。！？；：、,.!?;:()（）[]【】{}\"“”'‘’「」『』";

static KEYWORD_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s、，,;；|｜/／]+").expect("valid regex"));

const STOP_WORDS: &[&str] = &[
    "我的", "孩子", "小孩", "一直", "總是", "真的", "就是", "好像", "my", "me", "child", "kid",
    "always", "really", "the", "and",
];

/// Lowercase, blank out punctuation, collapse whitespace, trim.
///
/// `normalize(normalize(x)) == normalize(x)` for every input.
pub fn normalize(text: &str) -> String {
    let blanked: String = text
        .to_lowercase()
        .chars()
        .map(|c| if PUNCTUATION.contains(c) { ' ' } else { c })
        .collect();
    blanked.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a delimited keyword cell into trimmed, non-empty pieces, keeping order and duplicates.
pub fn split_keywords(field: &str) -> Vec<String> {
    KEYWORD_SEPARATORS
        .split(field)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Content-bearing terms of a query: CJK/alphanumeric runs of at least two
/// characters that are not stop words.
pub fn tokenize(query: &str) -> Vec<String> {
    let restricted: String = query
        .to_lowercase()
        .chars()
        .map(|c| if is_term_char(c) { c } else { ' ' })
        .collect();
    restricted
        .split_whitespace()
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

fn is_term_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_cjk_ideograph(c)
}

fn is_cjk_ideograph(c: char) -> bool {
    matches!(c as u32,
        0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xF900..=0xFAFF
        | 0x20000..=0x2A6DF)
}
