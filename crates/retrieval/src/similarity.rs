use std::collections::BTreeSet;

use helpdesk_core::normalize;

/// Token-set similarity in `[0, 100]`.
///
/// Token order and duplicates are ignored. When one side's tokens are a subset
/// of the other's the score is 100; otherwise the best indel ratio between the
/// shared tokens and each side's remainder wins.
pub fn similarity(a: &str, b: &str) -> f64 {
    let left = token_set(a);
    let right = token_set(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).cloned().collect::<Vec<_>>();
    let only_left = left.difference(&right).cloned().collect::<Vec<_>>();
    let only_right = right.difference(&left).cloned().collect::<Vec<_>>();

    if !shared.is_empty() && (only_left.is_empty() || only_right.is_empty()) {
        return 100.0;
    }

    let shared = shared.join(" ");
    let with_left = join_parts(&shared, &only_left.join(" "));
    let with_right = join_parts(&shared, &only_right.join(" "));

    let mut best = indel_ratio(&with_left, &with_right);
    if !shared.is_empty() {
        best = best
            .max(indel_ratio(&shared, &with_left))
            .max(indel_ratio(&shared, &with_right));
    }
    best
}

/// Maps a `[0, 100]` similarity to `[0, 1]` rounded to four decimals.
pub fn round_score(raw: f64) -> f64 {
    (raw / 100.0 * 10_000.0).round() / 10_000.0
}

fn token_set(input: &str) -> BTreeSet<String> {
    normalize(input)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn join_parts(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

/// `200 * LCS / (len_a + len_b)` over chars.
fn indel_ratio(a: &str, b: &str) -> f64 {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    200.0 * longest_common_subsequence(&a, &b) as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for lhs in a {
        for (j, rhs) in b.iter().enumerate() {
            current[j + 1] = if lhs == rhs {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
