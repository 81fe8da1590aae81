use std::collections::BTreeSet;

use helpdesk_core::{normalize, word_tokens, Glossary};

/// Query variants used for matching: the normalized query itself plus every
/// synonym of any glossary group that shares a word with the query.
pub fn expand_query(glossary: &Glossary, query: &str) -> BTreeSet<String> {
    let words = word_tokens(query);
    let mut variants = BTreeSet::from([normalize(query)]);

    for synonyms in glossary.synonym_groups() {
        if synonyms.iter().any(|synonym| words.contains(synonym)) {
            variants.extend(synonyms.iter().cloned());
        }
    }

    variants
}
