//! # harp-extract
//!
//! Per-page extraction pipeline: turns one raw contest-wiki page into one
//! [`harp_core::ProblemRecord`].
//!
//! Stages, in order: [`normalize`] rewrites the wiki markup into labeled
//! plain-text sections, [`segment`] splits them apart, [`attribution`]
//! strips credit lines, [`choices`] pulls the answer-choice row out of the
//! statement, and [`answer`] extracts and standardizes each solution's
//! boxed answer. [`record::build_record`] runs the whole chain.

/// Boxed-answer extraction and standardization
pub mod answer;
/// Credit and signature line filtering
pub mod attribution;
/// Answer-choice row extraction
pub mod choices;
/// LaTeX cleanup helpers
pub mod latex;
/// Wiki-markup normalization
pub mod normalize;
/// The per-page record builder
pub mod record;
/// Section segmentation
pub mod segment;

pub use attribution::{default_filters, LineFilterSet};
pub use record::build_record;
