use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ParsedPolicy, PolicySection};

pub const DEFAULT_POLICY_TITLE: &str = "Policy";

static TITLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#\s+(.*)$").expect("valid title regex"));

/// Splits a heading-structured policy document into its title and `##` sections.
///
/// Blocks that do not open with a `##` heading followed by at least one body
/// line are skipped without error.
pub fn parse_policy(content: &str) -> ParsedPolicy {
    let title = TITLE_REGEX
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().trim().to_string())
        .unwrap_or_else(|| DEFAULT_POLICY_TITLE.to_string());

    let mut sections = Vec::new();
    for block in split_sections(content.trim()) {
        let stripped = block
            .lines()
            .map(|line| if is_title_line(line) { "" } else { line })
            .collect::<Vec<_>>()
            .join("\n");
        let stripped = stripped.trim();
        if stripped.is_empty() {
            continue;
        }

        let Some((first_line, body)) = stripped.split_once('\n') else {
            continue;
        };
        let Some(heading) = section_heading(first_line) else {
            continue;
        };

        sections.push(PolicySection {
            heading: heading.to_string(),
            body: body.trim().to_string(),
        });
    }

    ParsedPolicy { title, sections }
}

fn split_sections(content: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut start = 0;

    for (idx, _) in content.match_indices('\n') {
        if starts_section(&content[idx + 1..]) {
            blocks.push(&content[start..idx]);
            start = idx + 1;
        }
    }
    blocks.push(&content[start..]);

    blocks
}

fn starts_section(rest: &str) -> bool {
    marker_followed_by_space(rest, "##")
}

fn is_title_line(line: &str) -> bool {
    marker_followed_by_space(line, "#")
}

fn marker_followed_by_space(input: &str, marker: &str) -> bool {
    input
        .strip_prefix(marker)
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_whitespace)
}

fn section_heading(line: &str) -> Option<&str> {
    if !starts_section(line) {
        return None;
    }
    let heading = line["##".len()..].trim();
    (!heading.is_empty()).then_some(heading)
}
