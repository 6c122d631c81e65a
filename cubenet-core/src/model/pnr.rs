use super::AttrMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// sentinel for a park-and-ride record whose id names a station but no lot
/// node.
pub const UNNUMBERED: &str = "unnumbered";

/// A `PNR` statement. The `NODE=` identity is either a bare station node or
/// a `lot,station` pair; [`PnrLink::parse_id`] splits it into the station
/// and the lot number, with [`UNNUMBERED`] standing in for a missing lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnrLink {
    pub id: String,
    pub station: String,
    pub lot: String,
    pub attrs: AttrMap,
    pub comment: Option<String>,
}

impl PnrLink {
    pub fn new(id: impl Into<String>) -> Self {
        let mut pnr = Self {
            id: id.into(),
            station: String::new(),
            lot: String::new(),
            attrs: AttrMap::new(),
            comment: None,
        };
        pnr.parse_id();
        pnr
    }

    /// splits the raw id: `lot,station` (or `lot-station`) pairs fill both
    /// fields, a single node is a station with an unnumbered lot.
    pub fn parse_id(&mut self) {
        let id = self.id.trim();
        match id.split_once([',', '-']) {
            Some((lot, station)) => {
                self.lot = lot.trim().to_string();
                self.station = station.trim().to_string();
            }
            None => {
                self.lot = UNNUMBERED.to_string();
                self.station = id.to_string();
            }
        }
    }

    pub fn station_num(&self) -> Option<i64> {
        self.station.parse().ok()
    }

    pub fn lot_num(&self) -> Option<i64> {
        if self.lot == UNNUMBERED {
            None
        } else {
            self.lot.parse().ok()
        }
    }
}

impl fmt::Display for PnrLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PNR NODE={}", self.id)?;
        for (k, v) in self.attrs.iter() {
            write!(f, ", {k}={v}")?;
        }
        if let Some(cmt) = &self.comment {
            write!(f, " {cmt}")?;
        }
        Ok(())
    }
}
