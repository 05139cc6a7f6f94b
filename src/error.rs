use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("Expected {expected} {location} but observed: {observed}")]
pub struct ParseError {
    expected: &'static str,
    observed: String,
    location: Location,
}

#[derive(Debug)]
pub enum Location {
    Unknown,
    Item { type_: &'static str, index: usize },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Unknown => write!(f, "at unknown location"),
            Location::Item { type_, index } => {
                write!(f, "for item of type {} at index {}", type_, index)
            }
        }
    }
}

impl ParseError {
    pub fn somewhere(expected: &'static str, observed: String) -> Self {
        Self {
            expected,
            observed,
            location: Location::Unknown,
        }
    }

    pub fn item(
        type_: &'static str,
        index: usize,
        expected: &'static str,
        observed: String,
    ) -> Self {
        let location = Location::Item { type_, index };
        Self {
            observed,
            expected,
            location,
        }
    }
}

/// Invariant violations detected while building an [`Edit`], a
/// [`Variation`] or a [`Haplotype`].
///
/// These are raised at construction time only. Once a value exists it is
/// guaranteed to satisfy its invariants.
///
/// [`Edit`]: crate::Edit
/// [`Variation`]: crate::Variation
/// [`Haplotype`]: crate::Haplotype
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("Reference sequence must not be empty")]
    EmptyReference,
    #[error("Deletion length must be at least 1")]
    ZeroLengthDeletion,
    #[error("Inserted sequence must not be empty")]
    EmptyInsertion,
    #[error("{edit} does not fit a reference of length {reference_length}")]
    OutOfBounds {
        edit: String,
        reference_length: usize,
    },
    #[error("{edit} overlaps a preceding edit")]
    Overlap { edit: String },
    #[error("Two insertions share the anchor position {position}")]
    SharedInsertionAnchor { position: usize },
    #[error("Reference has {observed} at position {position}, not {claimed}")]
    ReferenceMismatch {
        position: usize,
        claimed: char,
        observed: char,
    },
    #[error("At least one variation is required")]
    NoVariations,
}

/// Misuse of the API rather than bad data: comparing or combining values
/// that are bound to different references.
#[derive(Debug, Error)]
#[error("Cannot {operation} across different references")]
pub struct UsageError {
    operation: &'static str,
}

impl UsageError {
    pub fn new(operation: &'static str) -> Self {
        Self { operation }
    }
}

/// Catch-all error for top-level API
#[derive(Debug, Error)]
pub enum SeqVarError {
    #[error(transparent)]
    ParseError(#[from] ParseError),
    #[error(transparent)]
    ConstructionError(#[from] ConstructionError),
    #[error(transparent)]
    UsageError(#[from] UsageError),
}
