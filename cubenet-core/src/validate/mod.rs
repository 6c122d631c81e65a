//! Structural validation of a merged [`NetworkModel`].
//!
//! Checks never auto-repair: a pass is silent, a failure logs every
//! violation found and then raises one aggregate
//! [`ValidationError`](crate::error::ValidationError).

mod frequency;
mod model_type;
mod offstreet;
mod violation;
mod write_check;

pub use frequency::check_frequencies;
pub use model_type::ModelType;
pub use offstreet::OffstreetCheck;
pub use violation::Violation;
pub use write_check::check_write_invariants;

use crate::error::ValidationError;
use crate::network::NetworkModel;

/// Runs the business-rule checks (frequency, off-street connectivity) and
/// raises one aggregate error listing every violation found.
pub fn validate(model: &NetworkModel, model_type: ModelType) -> Result<(), ValidationError> {
    let mut violations = check_frequencies(model);
    violations.extend(OffstreetCheck::new(model_type).check(model));
    raise_if_any(violations)
}

/// Runs the write-time invariants (name uniqueness and length, duplicate
/// stop placement) that an external writer relies on.
pub fn validate_for_write(model: &NetworkModel) -> Result<(), ValidationError> {
    raise_if_any(check_write_invariants(model))
}

fn raise_if_any(violations: Vec<Violation>) -> Result<(), ValidationError> {
    if violations.is_empty() {
        return Ok(());
    }
    for violation in &violations {
        log::error!("{violation}");
    }
    Err(ValidationError { violations })
}
