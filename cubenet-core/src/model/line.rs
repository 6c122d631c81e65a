use super::attr_map::quote_if_needed;
use super::{AttrMap, Node};
use serde::{Deserialize, Serialize};
use std::fmt;

/// the five Cube time periods carried by HEADWAY[n] / FREQ[n] attributes.
pub const TIME_PERIODS: std::ops::RangeInclusive<u8> = 1..=5;

/// A transit route: an ordered node sequence plus a case-normalized
/// attribute map. Identity is the upper-cased NAME, which must be unique
/// (and at most 12 characters) in any written network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub name: String,
    pub attrs: AttrMap,
    pub nodes: Vec<Node>,
    pub comment: Option<String>,
}

impl Line {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: AttrMap::new(),
            nodes: Vec::new(),
            comment: None,
        }
    }

    /// upper-cased identity used for merge replacement and diff matching.
    pub fn name_key(&self) -> String {
        self.name.to_uppercase()
    }

    pub fn same_name(&self, other: &Line) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }

    /// the period's frequency in minutes, read from either the `HEADWAY[n]`
    /// or the `FREQ[n]` spelling; absent or non-numeric values count as 0.
    pub fn frequency(&self, period: u8) -> f64 {
        self.attrs
            .get_f64(&format!("HEADWAY[{period}]"))
            .or_else(|| self.attrs.get_f64(&format!("FREQ[{period}]")))
            .unwrap_or(0.0)
    }

    pub fn frequencies(&self) -> [f64; 5] {
        let mut freqs = [0.0; 5];
        for period in TIME_PERIODS {
            freqs[(period - 1) as usize] = self.frequency(period);
        }
        freqs
    }

    pub fn has_service(&self) -> bool {
        self.frequencies().iter().any(|f| *f != 0.0)
    }

    /// nodes with a positive number, i.e. the places the route stops.
    pub fn stops(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_stop())
    }

    /// lines sharing a 3-character name prefix form one line-set, the unit
    /// of off-street connectivity validation.
    pub fn line_set(&self) -> String {
        let key = self.name_key();
        key.chars().take(3).collect()
    }

    /// A stop may appear twice only as exactly the first and the last entry
    /// of the node sequence (a closed loop). Any other repeated stop is a
    /// structural defect. Repeated pass-through nodes are legitimate.
    pub fn duplicate_stops(&self) -> Vec<i64> {
        let last_idx = self.nodes.len().saturating_sub(1);
        let mut seen: Vec<(i64, usize)> = Vec::new();
        let mut dups: Vec<i64> = Vec::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if !node.is_stop() {
                continue;
            }
            let station = node.station();
            if let Some((_, first_idx)) = seen.iter().find(|(s, _)| *s == station) {
                let closed_loop = *first_idx == 0 && idx == last_idx;
                if !closed_loop && !dups.contains(&station) {
                    dups.push(station);
                }
            } else {
                seen.push((station, idx));
            }
        }
        dups
    }
}

impl fmt::Display for Line {
    /// Cube `LINE` statement syntax, faithful enough to re-parse: quoted
    /// name, attributes in insertion order, then the node list.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LINE NAME=\"{}\"", self.name)?;
        for (k, v) in self.attrs.iter() {
            write!(f, ", {}={}", k, quote_if_needed(v))?;
        }
        if let Some(cmt) = &self.comment {
            // comments run to end of line, so the node list starts fresh
            write!(f, ", {cmt}\n ")?;
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if idx == 0 {
                write!(f, ", N={node}")?;
            } else {
                write!(f, ", {node}")?;
            }
            if node.comment.is_some() {
                write!(f, "\n ")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Line, Node};

    fn line_with_nodes(nums: &[i64]) -> Line {
        let mut line = Line::new("T_1");
        line.nodes = nums.iter().map(|n| Node::new(*n)).collect();
        line
    }

    #[test]
    fn test_frequency_reads_both_spellings() {
        let mut line = Line::new("A");
        line.attrs.set("HEADWAY[1]", "10");
        line.attrs.set("FREQ[3]", "30");
        assert_eq!(line.frequency(1), 10.0);
        assert_eq!(line.frequency(3), 30.0);
        assert_eq!(line.frequency(2), 0.0);
        assert_eq!(line.frequencies(), [10.0, 0.0, 30.0, 0.0, 0.0]);
    }

    #[test]
    fn test_no_service_when_all_zero() {
        let mut line = Line::new("A");
        line.attrs.set("HEADWAY[2]", "0");
        assert!(!line.has_service());
        line.attrs.set("FREQ[5]", "12");
        assert!(line.has_service());
    }

    #[test]
    fn test_closed_loop_duplicate_is_allowed() {
        let line = line_with_nodes(&[10, 20, 30, 10]);
        assert!(line.duplicate_stops().is_empty());
    }

    #[test]
    fn test_interior_duplicate_stop_is_flagged() {
        let line = line_with_nodes(&[10, 20, 10, 30]);
        assert_eq!(line.duplicate_stops(), vec![10]);
    }

    #[test]
    fn test_repeated_pass_through_is_not_a_duplicate() {
        let line = line_with_nodes(&[1, 2, -4, 15, -4, 5]);
        assert!(line.duplicate_stops().is_empty());
    }

    #[test]
    fn test_line_set_prefix() {
        assert_eq!(Line::new("mun_49_ib").line_set(), "MUN");
    }
}
