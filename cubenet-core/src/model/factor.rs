use super::AttrMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `FACTOR` statement (timed-transfer definition): a generic keyed
/// attribute container plus a trailing comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub attrs: AttrMap,
    pub comment: Option<String>,
}

impl Factor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for Factor {
    /// FACTOR fields are written key-sorted, matching the historical
    /// writer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .attrs
            .iter()
            .sorted_by_key(|(k, _)| k.to_string())
            .map(|(k, v)| format!("{k}={v}"))
            .join(", ");
        write!(f, "FACTOR {fields}")?;
        if let Some(cmt) = &self.comment {
            write!(f, " {cmt}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Factor;

    #[test]
    fn test_display_sorts_keys() {
        let mut factor = Factor::new();
        factor.attrs.set("NODES", "15536");
        factor.attrs.set("MAXWAITTIME", "1");
        assert_eq!(factor.to_string(), "FACTOR MAXWAITTIME=1, NODES=15536");
    }
}
