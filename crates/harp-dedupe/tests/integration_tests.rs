//! End-to-end tests: raw wiki pages through extraction, dedup,
//! canonicalization, and finalization.

use harp_core::RawPage;
use harp_dedupe::{process_corpus, OverrideTable};
use harp_extract::default_filters;

fn wiki_page(
    year: &str,
    contest: &str,
    number: u32,
    problem_paras: &[&str],
    solutions: &[&str],
) -> RawPage {
    let mut text = String::from("<h2><span class=\"mw-headline\">Problem</span></h2>\n");
    for para in problem_paras {
        text.push_str(&format!("<p>{para}</p>\n"));
    }
    for (i, sol) in solutions.iter().enumerate() {
        text.push_str(&format!(
            "<h2><span class=\"mw-headline\">Solution {}</span></h2>\n<p>{sol}</p>\n",
            i + 1
        ));
    }
    RawPage {
        year: year.to_string(),
        contest: contest.to_string(),
        number,
        url: Some(format!("https://example.org/{year}_{contest}_{number}")),
        text,
    }
}

const CHOICE_ROW: &str = r"$\textbf{(A) } 5 \qquad \textbf{(B) } 6 \qquad \textbf{(C) } 7 \qquad \textbf{(D) } 8 \qquad \textbf{(E) } 9$";

#[test]
fn test_numeric_page_end_to_end() {
    let pages = vec![wiki_page(
        "1990",
        "AIME",
        3,
        &["Compute $x$ if $2x = 34$."],
        &[
            r"Dividing both sides by $2$ gives $x = \boxed{017}$.",
            r"Doubling $17$ gives $34$, so $x = \boxed{17}$.",
        ],
    )];
    let (records, _, report) =
        process_corpus(&pages, default_filters(), &OverrideTable::default()).unwrap();

    assert_eq!(report.pages, 1);
    assert_eq!(report.extracted, 1);
    assert!(report.dropped.is_empty());

    let record = &records[0];
    assert_eq!(record.uid(), "1990/AIME/3");
    assert_eq!(record.problem, "Compute $x$ if $2x = 34$.");
    assert_eq!(record.answer.as_deref(), Some("$17$"));
    assert_eq!(record.answer_choice, None);
    assert_eq!(record.choices, None);
    assert_eq!(record.level, 3);
    assert_eq!(record.solutions.len(), 2);
    // finalization rewrites every final box to the standardized answer
    assert!(record.solutions[0].text.ends_with(r"$x = \boxed{17}$."));
}

#[test]
fn test_multiple_choice_page_end_to_end() {
    let pages = vec![wiki_page(
        "2019",
        "AMC_12B",
        3,
        &["What is $1+4$?", CHOICE_ROW],
        &[r"Adding, $1 + 4 = \boxed{\textbf{(A) } 5}$."],
    )];
    let (records, _, _) =
        process_corpus(&pages, default_filters(), &OverrideTable::default()).unwrap();

    let record = &records[0];
    assert_eq!(record.problem, "What is $1+4$?");
    assert_eq!(record.answer_choice, Some('A'));
    assert_eq!(record.answer.as_deref(), Some("$5$"));
    let choices = record.choices.as_ref().unwrap();
    assert!(choices.is_complete());
    assert_eq!(choices.get('C'), Some("$7$"));
    assert!(record.solutions[0].text.contains(r"\boxed{5}"));

    // records serialize one JSON object per problem
    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json["choices"]["A"], "$5$");
    assert_eq!(json["answer_choice"], "A");
    assert_eq!(json["level"], 2);
}

#[test]
fn test_inconsistent_page_is_dropped_with_reason() {
    let pages = vec![
        wiki_page(
            "1990",
            "AIME",
            3,
            &["Compute $x$."],
            &[
                r"One derivation gives $\boxed{17}$ directly.",
                r"A different count gives $\boxed{18}$ instead.",
            ],
        ),
        wiki_page(
            "1990",
            "AIME",
            4,
            &["Compute $y$."],
            &[r"Immediately $y = \boxed{25}$ from the definition."],
        ),
    ];
    let (records, _, report) =
        process_corpus(&pages, default_filters(), &OverrideTable::default()).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].uid(), "1990/AIME/4");
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].uid, "1990/AIME/3");
    assert!(report.dropped[0].reason.contains("consistency"));
}

#[test]
fn test_cross_contest_duplicate_folds_into_harder_contest() {
    let problem = &["What is $1+4$?", CHOICE_ROW];
    let solution = [r"Adding, $1 + 4 = \boxed{\textbf{(A) } 5}$."];
    let pages = vec![
        wiki_page("2004", "AMC_10B", 3, problem, &solution),
        wiki_page("2004", "AMC_12B", 1, problem, &solution),
        wiki_page("2019", "AMC_12B", 3, &["Unrelated problem."], &[
            r"Trivially $\boxed{\textbf{(B) } 6}$ after checking each option.",
        ]),
    ];
    // third page has no choice row and is dropped; it keeps the corpus
    // from being all-duplicates
    let (records, _, report) =
        process_corpus(&pages, default_filters(), &OverrideTable::default()).unwrap();

    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.uid(), "2004/AMC_12B/1");
    assert_eq!(record.other_appearances.len(), 1);
    assert_eq!(record.other_appearances[0].uid(), "2004/AMC_10B/3");
}

#[test]
fn test_extraction_preserves_input_order() {
    let pages: Vec<RawPage> = (1..=3)
        .map(|n| {
            wiki_page(
                "1990",
                "AIME",
                n,
                &[&format!("Compute problem number {n}.")],
                &[&format!(r"It comes out to $\boxed{{{n}}}$ by computation.")],
            )
        })
        .collect();
    let (records, _, _) =
        process_corpus(&pages, default_filters(), &OverrideTable::default()).unwrap();
    let uids: Vec<String> = records.iter().map(|r| r.uid()).collect();
    assert_eq!(uids, ["1990/AIME/1", "1990/AIME/2", "1990/AIME/3"]);
}

#[test]
fn test_trie_reports_overlap_with_external_text() {
    let pages = vec![wiki_page(
        "1990",
        "AIME",
        3,
        &["Compute the number of ordered pairs with the stated property."],
        &[r"A short count gives $\boxed{42}$ ordered pairs."],
    )];
    let (records, trie, _) =
        process_corpus(&pages, default_filters(), &OverrideTable::default()).unwrap();

    let m = trie.longest_prefix_match(&records[0].problem);
    assert_eq!(m.depth, records[0].problem.chars().count());
    assert_eq!(m.indices, vec![0]);

    let unrelated = trie.longest_prefix_match("Zebras are not math.");
    assert!(unrelated.indices.len() <= 1);
    assert_eq!(unrelated.depth, 0);
}

#[test]
fn test_attribution_lines_removed_end_to_end() {
    let pages = vec![wiki_page(
        "1990",
        "AIME",
        5,
        &["Compute $z$."],
        &["By symmetry $z = \\boxed{100}$.<br />~username_123"],
    )];
    let (records, _, _) =
        process_corpus(&pages, default_filters(), &OverrideTable::default()).unwrap();
    assert_eq!(records[0].solutions.len(), 1);
    assert!(!records[0].solutions[0].text.contains("username_123"));
}
