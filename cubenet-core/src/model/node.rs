use super::AttrMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One stop or pass-through node in a line's routing. The sign of the
/// number carries meaning: positive nodes are stops, negated nodes are
/// passed without stopping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub num: i64,
    pub attrs: AttrMap,
    pub comment: Option<String>,
}

impl Node {
    pub fn new(num: i64) -> Self {
        Self {
            num,
            attrs: AttrMap::new(),
            comment: None,
        }
    }

    pub fn is_stop(&self) -> bool {
        self.num > 0
    }

    /// the node number with the stop flag stripped.
    pub fn station(&self) -> i64 {
        self.num.abs()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.num)?;
        for (k, v) in self.attrs.iter() {
            write!(f, ", {k}={v}")?;
        }
        if let Some(cmt) = &self.comment {
            write!(f, " {cmt}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Node;

    #[test]
    fn test_sign_encodes_stop() {
        assert!(Node::new(39249).is_stop());
        assert!(!Node::new(-39240).is_stop());
        assert_eq!(Node::new(-39240).station(), 39240);
    }
}
