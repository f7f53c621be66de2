//! Property-based tests for the index-based LaTeX scanners.

use harp_extract::latex::{find_closing_brace, remove_boxes_keep_content};
use proptest::prelude::*;

/// Arbitrary brace-balanced LaTeX-ish fragment.
fn balanced_fragment() -> impl Strategy<Value = String> {
    let leaf = "[a-z0-9\\\\ +=._-]{0,8}".prop_map(|s| s);
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(
            prop_oneof![
                inner.clone(),
                inner.prop_map(|s| format!("{{{s}}}")),
            ],
            0..4,
        )
        .prop_map(|parts| parts.concat())
    })
}

proptest! {
    /// For balanced content followed by a closer, the scanner lands exactly
    /// on that closer.
    #[test]
    fn closing_brace_found_after_balanced_content(body in balanced_fragment()) {
        let text = format!("{body}}}rest");
        prop_assert_eq!(find_closing_brace(&text), Some(body.len()));
    }

    /// Balanced content with no closer never yields an index.
    #[test]
    fn closing_brace_absent_for_balanced_content(body in balanced_fragment()) {
        prop_assert_eq!(find_closing_brace(&body), None);
    }

    /// Unboxing balanced content keeps it verbatim and is idempotent.
    #[test]
    fn unboxing_preserves_balanced_content(body in balanced_fragment()) {
        prop_assume!(!body.contains("\\boxed{"));
        let boxed = format!("x = \\boxed{{{body}}} done");
        let unboxed = remove_boxes_keep_content(&boxed);
        prop_assert_eq!(&unboxed, &format!("x = {body} done"));
        prop_assert_eq!(remove_boxes_keep_content(&unboxed), unboxed);
    }
}
