use serde::{Deserialize, Serialize};
use std::fmt;

/// Which Cube program wrote a line file. Declared by a header comment;
/// files without one are `Unknown` and may merge into either dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dialect {
    Pt,
    Trnbuild,
    #[default]
    Unknown,
}

impl Dialect {
    /// Inspects a raw `;`-comment for the dialect header. The probe strips
    /// one leading semicolon first, so `;;<<PT>><<LINE>>;;` matches.
    pub fn detect(comment: &str) -> Option<Dialect> {
        let cmt = comment.trim().strip_prefix(';')?;
        if cmt.starts_with(";<<PT>><<LINE>>;;") {
            Some(Dialect::Pt)
        } else if cmt.starts_with(";<<Trnbuild>>;;") {
            Some(Dialect::Trnbuild)
        } else {
            None
        }
    }

    /// dialects are compatible when equal or when either side is unknown.
    pub fn compatible_with(&self, other: Dialect) -> bool {
        *self == Dialect::Unknown || other == Dialect::Unknown || *self == other
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Pt => write!(f, "PT"),
            Dialect::Trnbuild => write!(f, "TRNBUILD"),
            Dialect::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Dialect;

    #[test]
    fn test_detects_pt_header() {
        assert_eq!(Dialect::detect(";;<<PT>><<LINE>>;;"), Some(Dialect::Pt));
    }

    #[test]
    fn test_detects_trnbuild_header() {
        assert_eq!(Dialect::detect(";;<<Trnbuild>>;;"), Some(Dialect::Trnbuild));
    }

    #[test]
    fn test_ordinary_comment_is_not_a_header() {
        assert_eq!(Dialect::detect("; express bus overlay"), None);
        assert_eq!(Dialect::detect("<<PT>><<LINE>>"), None);
    }

    #[test]
    fn test_compatibility() {
        assert!(Dialect::Unknown.compatible_with(Dialect::Pt));
        assert!(Dialect::Pt.compatible_with(Dialect::Unknown));
        assert!(Dialect::Pt.compatible_with(Dialect::Pt));
        assert!(!Dialect::Pt.compatible_with(Dialect::Trnbuild));
    }
}
