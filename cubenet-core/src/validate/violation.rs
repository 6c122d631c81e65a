use serde::Serialize;

/// One business-rule or write-invariant violation. Collected, never
/// short-circuited; the aggregate error carries all of them.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize)]
pub enum Violation {
    #[error("line {line}: all five period frequencies are zero")]
    ZeroFrequency { line: String },

    #[error("line {line}: name is {len} characters, the maximum is 12")]
    NameTooLong { line: String, len: usize },

    #[error("lines {first} and {second} collide on name {key} (names are case-insensitive)")]
    DuplicateName {
        key: String,
        first: String,
        second: String,
    },

    #[error("line {line}: stop {station} repeats somewhere other than exactly first and last")]
    DuplicateStop { line: String, station: i64 },

    #[error("line {line}: ZONEACCESS {a}-{b} is reversed, expected funnel then stop")]
    ReversedZoneAccess { line: String, a: i64, b: i64 },

    #[error("line-set {line_set}: stop {station} resolves no functioning WNR or PNR connection")]
    UnconnectedStop { line_set: String, station: i64 },
}
