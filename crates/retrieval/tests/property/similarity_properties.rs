use helpdesk_retrieval::{round_score, similarity};
use proptest::prelude::*;

fn phrase() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z]{1,8}", 0..6).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn similarity_is_symmetric(a in phrase(), b in phrase()) {
        prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }

    #[test]
    fn identical_text_scores_full_marks(a in ".{0,60}") {
        prop_assume!(!a.trim().is_empty());
        prop_assert_eq!(similarity(&a, &a), 100.0);
    }

    #[test]
    fn similarity_stays_in_range(a in ".{0,60}", b in ".{0,60}") {
        let score = similarity(&a, &b);
        prop_assert!((0.0..=100.0).contains(&score));
        prop_assert!((0.0..=1.0).contains(&round_score(score)));
    }

    #[test]
    fn word_order_and_case_do_not_matter(a in phrase(), b in phrase()) {
        let reversed = a.split_whitespace().rev().collect::<Vec<_>>().join("  ");
        prop_assert_eq!(similarity(&a, &b), similarity(&reversed.to_uppercase(), &b));
    }
}
