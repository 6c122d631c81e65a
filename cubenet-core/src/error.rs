//! Error taxonomy shared by the model, merge, validation and diff engines.
//!
//! Every variant is fatal for the current run; callers fix their input and
//! re-run rather than catching and continuing.

/// a structurally invalid record or model composition was produced while
/// converting parse leaves into typed records, or while composing fragments.
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("{source_label}: node pair could not be resolved: {detail}")]
    UnresolvedNodePair {
        source_label: String,
        detail: String,
    },
    #[error("{source_label}: malformed attribute block: {detail}")]
    MalformedAttribute {
        source_label: String,
        detail: String,
    },
    #[error("{source_label}: {statement} record has no NUMBER attribute")]
    MissingNumber {
        source_label: String,
        statement: String,
    },
    #[error("{source_label}: unexpected {found} in a {kind} file")]
    UnexpectedRecord {
        source_label: String,
        kind: String,
        found: String,
    },
    #[error("cannot merge a {fragment} dialect fragment into a {model} dialect model")]
    MixedDialects { model: String, fragment: String },
}

/// merge found a duplicate identity that must be unique across the whole
/// model. Both offending records are logged before this is raised.
#[derive(thiserror::Error, Debug)]
pub enum CollisionError {
    #[error("FARESYSTEM NUMBER={number} merged twice with different content")]
    Faresystem { number: u32 },
    #[error("{statement} NUMBER={number} merged twice")]
    PtSystem { statement: String, number: u32 },
}

/// aggregate of every business-rule violation found by a validation pass.
/// Individual violations are logged before this is raised.
#[derive(thiserror::Error, Debug)]
#[error("transit network validation failed with {} violation(s)", violations.len())]
pub struct ValidationError {
    pub violations: Vec<crate::validate::Violation>,
}
