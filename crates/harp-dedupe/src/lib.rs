//! # harp-dedupe
//!
//! Corpus-wide stages of the harp pipeline: parallel extraction of every
//! page, duplicate detection with a prefix trie, canonicalization of
//! cross-contest duplicates, and final cleanup. [`pipeline::process_corpus`]
//! is the entry point.

/// Canonicalization of duplicate groups
pub mod canonical;
/// Final cleanup passes
pub mod finalize;
/// The end-to-end corpus pipeline
pub mod pipeline;
/// Prefix-trie duplicate detection
pub mod trie;

pub use canonical::OverrideTable;
pub use pipeline::{process_corpus, DroppedPage, RunReport};
pub use trie::{PrefixMatch, PrefixTrie, MAX_TRIE_DEPTH};
