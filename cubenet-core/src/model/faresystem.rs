use super::AttrMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A `FARESYSTEM` statement plus its optional sparse fare-zone matrix.
/// Keyed externally by its integer NUMBER attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Faresystem {
    pub attrs: AttrMap,
    /// origin fare zone -> destination fare zone -> fare
    pub fare_zone_mat: BTreeMap<u32, BTreeMap<u32, f64>>,
}

impl Faresystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(&self) -> Option<u32> {
        self.attrs.get("NUMBER").and_then(|v| v.trim().parse().ok())
    }

    /// the reference suffix of `FAREMATRIX=FMI.1.101` (everything after the
    /// last `.`), used to match farezone-matrix rows to this faresystem.
    pub fn fare_matrix_id(&self) -> Option<&str> {
        let faremat = self.attrs.get("FAREMATRIX")?;
        Some(match faremat.rfind('.') {
            Some(dot) => &faremat[dot + 1..],
            None => faremat,
        })
    }

    pub fn set_farezone_od(&mut self, origin: u32, dest: u32, fare: f64) {
        self.fare_zone_mat.entry(origin).or_default().insert(dest, fare);
    }

    /// farezone-to-farezone rows for writing, origin- then dest-sorted.
    pub fn fare_zone_matrix_rows(&self) -> Vec<String> {
        let Some(number) = self.number() else {
            return Vec::new();
        };
        self.fare_zone_mat
            .iter()
            .flat_map(|(origin, dests)| {
                dests
                    .iter()
                    .map(move |(dest, fare)| format!("{number} {origin} {dest} {fare:.4}"))
            })
            .collect()
    }
}

impl fmt::Display for Faresystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FARESYSTEM {}", self.attrs)
    }
}
