//! Error types for corpus extraction and deduplication.

use thiserror::Error;

/// Error type shared by every stage of the corpus pipeline.
///
/// The taxonomy mirrors the natural error boundaries of the batch:
/// a [`HarpError::Structural`] or [`HarpError::Inconsistent`] error drops a
/// single record and the batch continues; a [`HarpError::Config`] error
/// indicates a broken static table and aborts the whole run. Per-solution
/// anomalies (a missing boxed answer among several solutions, a "see above"
/// reference) are not errors at all: the offending solution is dropped with
/// a warning and the record continues.
#[derive(Error, Debug)]
pub enum HarpError {
    /// A page whose structure cannot be parsed: missing Problem heading,
    /// unparseable answer-choice block, no boxed answer in any solution.
    /// The record is dropped from the output corpus.
    #[error("structural parse failure: {0}")]
    Structural(String),

    /// A data-quality defect that must not be silently resolved: multiple
    /// solutions disagreeing on the final answer, or a duplicate id mapped
    /// to two distinct partners. The record (or duplicate group) is dropped
    /// and flagged for manual review.
    #[error("consistency violation: {0}")]
    Inconsistent(String),

    /// A broken static table: an override pair contradicting derived
    /// duplicate relations, or a contest with no difficulty mapping.
    /// Fatal to the whole run.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while reading or writing corpus files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapped error from pipeline composition.
    #[error("pipeline error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Type alias for [`Result<T, HarpError>`].
pub type Result<T> = std::result::Result<T, HarpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_display() {
        let err = HarpError::Structural("no Problem heading in 2019/AMC_12B/3".to_string());
        assert_eq!(
            format!("{err}"),
            "structural parse failure: no Problem heading in 2019/AMC_12B/3"
        );
    }

    #[test]
    fn test_inconsistent_display() {
        let err = HarpError::Inconsistent("solutions disagree: B vs D".to_string());
        assert!(format!("{err}").starts_with("consistency violation"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HarpError = io_err.into();
        match err {
            HarpError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner() -> Result<()> {
            Err(HarpError::Config("unknown contest family: AMC_14".to_string()))
        }
        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }
        match outer() {
            Err(HarpError::Config(msg)) => assert!(msg.contains("AMC_14")),
            _ => panic!("expected Config to propagate"),
        }
    }
}
