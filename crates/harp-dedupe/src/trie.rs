//! Duplicate detection over the whole corpus with a prefix trie.
//!
//! Problems reused across contests (an AMC 10/12 shared problem, a USAMO
//! problem repeated on the USAJMO) are byte-identical after extraction, so
//! exact matching suffices; the trie exists to make the pass one walk per
//! record and, as a side effect, to surface near duplicates that share a
//! long prefix but diverge in the tail.
//!
//! The trie is an arena of nodes indexed into a `Vec`, never a linked
//! structure: keys run to 800 characters and recursion that deep is not
//! worth defending.

use harp_core::ProblemRecord;
use log::debug;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

/// Keys are truncated to this many characters. Long enough that distinct
/// problems never collide, short enough to bound the walk.
pub const MAX_TRIE_DEPTH: usize = 800;

static RE_WS_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

#[derive(Debug, Default)]
struct Node {
    children: HashMap<char, usize>,
    /// Indices of records whose full key ends at this node.
    terminal: Option<Vec<usize>>,
}

/// Arena-allocated prefix trie over problem keys.
#[derive(Debug)]
pub struct PrefixTrie {
    nodes: Vec<Node>,
}

/// Result of matching external text against the corpus trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatch {
    /// Characters matched before the walk stopped.
    pub depth: usize,
    /// Record indices stored at or below the stopping node.
    pub indices: Vec<usize>,
}

/// Duplicate groups found in one scan: canonical-candidate uid to the uids
/// of its byte-identical copies.
pub type DuplicateGroups = BTreeMap<String, Vec<String>>;

impl PrefixTrie {
    fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Dedup key for one record: the statement with whitespace collapsed,
    /// then the choices in letter order, truncated to [`MAX_TRIE_DEPTH`]
    /// characters.
    #[must_use]
    pub fn key_for(record: &ProblemRecord) -> String {
        let mut key = RE_WS_RUN
            .replace_all(&record.problem, " ")
            .trim()
            .to_string();
        if let Some(choices) = &record.choices {
            key.push(' ');
            key.push_str(&choices.to_string());
        }
        key.chars().take(MAX_TRIE_DEPTH).collect()
    }

    fn child(&mut self, node: usize, ch: char) -> usize {
        if let Some(&next) = self.nodes[node].children.get(&ch) {
            return next;
        }
        let next = self.nodes.len();
        self.nodes.push(Node::default());
        self.nodes[node].children.insert(ch, next);
        next
    }

    /// Walk external text against the trie, returning how deep it matched
    /// and which records live under the stopping point. Used to report
    /// overlap with outside benchmark corpora.
    #[must_use]
    pub fn longest_prefix_match(&self, text: &str) -> PrefixMatch {
        let mut node = 0;
        let mut depth = 0;
        for ch in text.chars().take(MAX_TRIE_DEPTH) {
            match self.nodes[node].children.get(&ch) {
                Some(&next) => {
                    node = next;
                    depth += 1;
                }
                None => break,
            }
        }
        let mut indices = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if let Some(terminal) = &self.nodes[n].terminal {
                indices.extend(terminal.iter().copied());
            }
            stack.extend(self.nodes[n].children.values().copied());
        }
        indices.sort_unstable();
        PrefixMatch { depth, indices }
    }
}

/// Scan the corpus once, building the trie and collecting exact-duplicate
/// groups. Near duplicates (same truncated key, different full statement)
/// are logged and kept.
pub fn find_duplicates(records: &[ProblemRecord]) -> (PrefixTrie, DuplicateGroups) {
    let mut trie = PrefixTrie::new();
    let mut groups = DuplicateGroups::new();

    for (i, record) in records.iter().enumerate() {
        let key = PrefixTrie::key_for(record);
        let mut node = 0;
        for ch in key.chars() {
            if self_terminal(&trie, node) {
                debug!(
                    "{}: walking past a shorter problem (superset statement)",
                    record.uid()
                );
            }
            node = trie.child(node, ch);
        }
        if !trie.nodes[node].children.is_empty() {
            debug!(
                "{}: longer problems exist below this one (subset statement)",
                record.uid()
            );
        }

        match &mut trie.nodes[node].terminal {
            Some(existing) => {
                let exact = existing
                    .iter()
                    .copied()
                    .find(|&j| records[j].problem == record.problem);
                match exact {
                    Some(j) => {
                        groups
                            .entry(records[j].uid())
                            .or_default()
                            .push(record.uid());
                    }
                    None => {
                        debug!(
                            "{}: near duplicate shares a {}-char key with {}",
                            record.uid(),
                            key.chars().count(),
                            records[existing[0]].uid()
                        );
                        existing.push(i);
                    }
                }
            }
            terminal @ None => *terminal = Some(vec![i]),
        }
    }

    (trie, groups)
}

fn self_terminal(trie: &PrefixTrie, node: usize) -> bool {
    trie.nodes[node].terminal.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(uid: &str, problem: &str) -> ProblemRecord {
        let app = harp_core::Appearance::from_uid(uid).unwrap();
        ProblemRecord {
            year: app.year,
            contest: app.contest,
            number: app.number,
            url: None,
            level: 3,
            problem: problem.to_string(),
            choices: None,
            answer_choice: None,
            answer: Some("$1$".to_string()),
            solutions: vec![],
            other_appearances: vec![],
        }
    }

    #[test]
    fn test_identical_statements_grouped() {
        let records = vec![
            record("2004/AMC_10B/3", "Compute the thing."),
            record("2005/AMC_10A/1", "A different problem."),
            record("2004/AMC_12B/1", "Compute the thing."),
        ];
        let (_, groups) = find_duplicates(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups["2004/AMC_10B/3"],
            vec!["2004/AMC_12B/1".to_string()]
        );
    }

    #[test]
    fn test_whitespace_differences_do_not_block_grouping() {
        let records = vec![
            record("2004/AMC_10B/3", "Compute   the\nthing."),
            record("2004/AMC_12B/1", "Compute the thing."),
        ];
        let (trie, _) = find_duplicates(&records);
        // keys collapse to the same string even though problems differ
        assert_eq!(
            PrefixTrie::key_for(&records[0]),
            PrefixTrie::key_for(&records[1])
        );
        // but exact grouping compares full statements, which differ here
        let (_, groups) = find_duplicates(&records);
        assert!(groups.is_empty());
        let m = trie.longest_prefix_match("Compute the thing.");
        assert_eq!(m.indices, vec![0, 1]);
    }

    #[test]
    fn test_short_shared_prefix_is_not_a_duplicate() {
        let shared: String = "x".repeat(50);
        let records = vec![
            record("2010/AIME_I/5", &format!("{shared} alpha ending")),
            record("2011/AIME_II/7", &format!("{shared} beta ending")),
        ];
        let (_, groups) = find_duplicates(&records);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_truncated_keys_collide_but_near_dups_are_kept() {
        let shared: String = "y".repeat(MAX_TRIE_DEPTH + 50);
        let records = vec![
            record("2010/AIME_I/5", &format!("{shared} alpha")),
            record("2011/AIME_II/7", &format!("{shared} beta")),
        ];
        let (trie, groups) = find_duplicates(&records);
        // same truncated key, different full statements: flagged internally,
        // never grouped for removal
        assert!(groups.is_empty());
        let m = trie.longest_prefix_match(&shared);
        assert_eq!(m.depth, MAX_TRIE_DEPTH);
        assert_eq!(m.indices, vec![0, 1]);
    }

    #[test]
    fn test_three_way_group() {
        let records = vec![
            record("2020/USAJMO/5", "Prove the claim."),
            record("2020/USAMO/4", "Prove the claim."),
            record("2021/USAMO/1", "Prove the claim."),
        ];
        let (_, groups) = find_duplicates(&records);
        assert_eq!(
            groups["2020/USAJMO/5"],
            vec!["2020/USAMO/4".to_string(), "2021/USAMO/1".to_string()]
        );
    }

    #[test]
    fn test_longest_prefix_match_depth() {
        let records = vec![record("2010/AIME_I/5", "abcdef")];
        let (trie, _) = find_duplicates(&records);
        let m = trie.longest_prefix_match("abcxyz");
        assert_eq!(m.depth, 3);
        assert_eq!(m.indices, vec![0]);
    }
}
