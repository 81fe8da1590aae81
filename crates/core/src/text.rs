use once_cell::sync::Lazy;
use regex::Regex;

static WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z\-]+").expect("valid word regex"));

/// Collapses whitespace runs to a single space, trims and lowercases.
pub fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Filesystem-safe identifier for a topic phrase.
pub fn slugify(input: &str) -> String {
    normalize(input)
        .replace(' ', "-")
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '-')
        .collect()
}

/// Alphabetic/hyphen runs of the normalized input, in order of appearance.
pub fn word_tokens(input: &str) -> Vec<String> {
    let normalized = normalize(input);
    WORD_REGEX
        .find_iter(&normalized)
        .map(|found| found.as_str().to_string())
        .collect()
}

pub fn contains_any<S: AsRef<str>>(input: &str, needles: &[S]) -> bool {
    needles.iter().any(|needle| input.contains(needle.as_ref()))
}
