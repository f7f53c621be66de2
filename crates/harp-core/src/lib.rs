//! # harp-core
//!
//! Core types and static tables for the harp contest-math corpus: the
//! records produced by extraction, the error taxonomy shared by every
//! pipeline stage, the contest-family tables (answer format, hardness
//! ordering, full schedule), and the difficulty-tier mapping.
//!
//! ## Example
//!
//! ```
//! use harp_core::{contest, difficulty, make_uid};
//!
//! assert!(contest::has_choices("AMC_12B"));
//! assert_eq!(difficulty::map_difficulty("2004", "AMC_12B", 1)?, 2);
//! assert_eq!(make_uid("2004", "AMC_12B", 1), "2004/AMC_12B/1");
//! # Ok::<(), harp_core::HarpError>(())
//! ```

/// Static contest tables and the hardness ordering
pub mod contest;
/// Difficulty-tier lookup
pub mod difficulty;
/// Error types for corpus processing
pub mod error;
/// Record types
pub mod types;

pub use error::{HarpError, Result};
pub use types::{
    make_uid, Appearance, ChoiceSet, ProblemRecord, RawPage, Solution, CHOICE_LETTERS,
};
