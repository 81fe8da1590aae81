use helpdesk_core::{FaqEntry, FaqMatch, FaqResult, Glossary};

use crate::glossary::expand_query;
use crate::similarity::{round_score, similarity};

/// Best FAQ entry for `query`, scored against every glossary variant.
///
/// Never rejects on score; the earliest entry wins ties.
pub fn faq_lookup(entries: &[FaqEntry], glossary: &Glossary, query: &str) -> FaqResult {
    let variants = expand_query(glossary, query);
    let mut best: Option<(f64, &FaqEntry)> = None;

    for entry in entries {
        let score = variants
            .iter()
            .map(|variant| similarity(variant, &entry.question))
            .fold(0.0, f64::max);

        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, entry));
        }
    }

    match best {
        Some((score, entry)) => FaqResult::Found(FaqMatch {
            score: round_score(score),
            matched_question: entry.question.clone(),
            answer: entry.answer.clone(),
            id: entry.id.clone(),
        }),
        None => FaqResult::NotFound,
    }
}
