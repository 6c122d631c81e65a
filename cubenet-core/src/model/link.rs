use super::{AttrMap, Factor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `LINK` statement: a signed A/B node-pair identity with attributes
/// such as DIST, SPEED, TIME, ONEWAY and MODES.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitLink {
    pub a: i64,
    pub b: i64,
    pub attrs: AttrMap,
    pub comment: Option<String>,
}

impl TransitLink {
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            a,
            b,
            attrs: AttrMap::new(),
            comment: None,
        }
    }
}

impl fmt::Display for TransitLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LINK NODES={},{}", self.a, self.b)?;
        for (k, v) in self.attrs.iter() {
            write!(f, ", {k}={v}")?;
        }
        if let Some(cmt) = &self.comment {
            write!(f, " {cmt}")?;
        }
        Ok(())
    }
}

/// links files interleave LINK and FACTOR records in one ordered stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkItem {
    Link(TransitLink),
    Factor(Factor),
}

impl fmt::Display for LinkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkItem::Link(link) => link.fmt(f),
            LinkItem::Factor(factor) => factor.fmt(f),
        }
    }
}

/// A bare-row support link from access/xfer/node-coordinate files:
/// `A B [wnr|pnr] [value]`. A float value is a distance, an integer value
/// is a transfer time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linki {
    pub a: i64,
    pub b: i64,
    pub distance: Option<String>,
    pub xfer_time: Option<String>,
    pub access_type: Option<String>,
    pub comment: Option<String>,
}

impl Linki {
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            a,
            b,
            distance: None,
            xfer_time: None,
            access_type: None,
            comment: None,
        }
    }

    /// the opposite end of this link, if `node` is one of its ends.
    pub fn other_end(&self, node: i64) -> Option<i64> {
        if self.a == node {
            Some(self.b)
        } else if self.b == node {
            Some(self.a)
        } else {
            None
        }
    }
}

impl fmt::Display for Linki {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.a, self.b)?;
        if let Some(tag) = &self.access_type {
            write!(f, " {tag}")?;
        }
        if let Some(dist) = &self.distance {
            write!(f, " {dist}")?;
        }
        if let Some(time) = &self.xfer_time {
            write!(f, " {time}")?;
        }
        if let Some(cmt) = &self.comment {
            write!(f, " {cmt}")?;
        }
        Ok(())
    }
}

/// A `ZONEACCESS` statement: `LINK=a-b` plus a MODE attribute. For
/// walk-and-ride resolution the pair is read as (funnel, stop).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZacLink {
    pub a: i64,
    pub b: i64,
    pub attrs: AttrMap,
    pub comment: Option<String>,
}

impl ZacLink {
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            a,
            b,
            attrs: AttrMap::new(),
            comment: None,
        }
    }
}

impl fmt::Display for ZacLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZONEACCESS LINK={}-{}", self.a, self.b)?;
        for (k, v) in self.attrs.iter() {
            write!(f, ", {k}={v}")?;
        }
        Ok(())
    }
}

/// A `SUPPLINK` statement: `NODES=a-b` plus mode/dist/speed/oneway/time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplink {
    pub a: i64,
    pub b: i64,
    pub attrs: AttrMap,
    pub comment: Option<String>,
}

impl Supplink {
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            a,
            b,
            attrs: AttrMap::new(),
            comment: None,
        }
    }
}

impl fmt::Display for Supplink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SUPPLINK N={}-{}", self.a, self.b)?;
        for (k, v) in self.attrs.iter() {
            write!(f, ", {k}={v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Linki;

    #[test]
    fn test_other_end() {
        let linki = Linki::new(100, 200);
        assert_eq!(linki.other_end(100), Some(200));
        assert_eq!(linki.other_end(200), Some(100));
        assert_eq!(linki.other_end(300), None);
    }
}
