use helpdesk_core::{normalize, parse_policy, slugify};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalize_is_idempotent(s in ".{0,120}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_ignores_case_and_padding(s in "[a-zA-Z ]{0,60}") {
        let padded = format!("  {}\t\n", s.to_uppercase());
        prop_assert_eq!(normalize(&padded), normalize(&s));
    }

    #[test]
    fn slugify_is_idempotent(s in ".{0,120}") {
        let once = slugify(&s);
        prop_assert_eq!(slugify(&once), once.clone());
        prop_assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn parsed_sections_never_have_empty_headings(s in "(#{0,2} ?[a-z]{0,8}\n){0,12}") {
        let parsed = parse_policy(&s);
        prop_assert!(!parsed.title.is_empty() || s.contains('#'));
        for section in parsed.sections {
            prop_assert!(!section.heading.is_empty());
            prop_assert!(!section.body.is_empty());
        }
    }
}
