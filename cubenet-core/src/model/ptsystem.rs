use super::AttrMap;
use crate::error::CollisionError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cube Public Transport system definition: wait curves, crowding curves,
/// operators, modes and vehicle types, each an ordered map keyed by the
/// statement's integer NUMBER.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PtSystem {
    pub wait_curve_defs: IndexMap<u32, AttrMap>,
    pub crowd_curve_defs: IndexMap<u32, AttrMap>,
    pub operators: IndexMap<u32, AttrMap>,
    pub modes: IndexMap<u32, AttrMap>,
    pub vehicle_types: IndexMap<u32, AttrMap>,
}

impl PtSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.wait_curve_defs.is_empty()
            && self.crowd_curve_defs.is_empty()
            && self.operators.is_empty()
            && self.modes.is_empty()
            && self.vehicle_types.is_empty()
    }

    /// merges another PT system into this one. Sub-map ids must stay
    /// unique across every merge into one model; any duplicate NUMBER is a
    /// collision, logged with both records before failing.
    pub fn merge(&mut self, other: PtSystem) -> Result<(), CollisionError> {
        merge_category(&mut self.wait_curve_defs, other.wait_curve_defs, "WAITCRVDEF")?;
        merge_category(
            &mut self.crowd_curve_defs,
            other.crowd_curve_defs,
            "CROWDCRVDEF",
        )?;
        merge_category(&mut self.operators, other.operators, "OPERATOR")?;
        merge_category(&mut self.modes, other.modes, "MODE")?;
        merge_category(&mut self.vehicle_types, other.vehicle_types, "VEHICLETYPE")?;
        Ok(())
    }
}

fn merge_category(
    into: &mut IndexMap<u32, AttrMap>,
    from: IndexMap<u32, AttrMap>,
    statement: &str,
) -> Result<(), CollisionError> {
    for (number, attrs) in from {
        if let Some(existing) = into.get(&number) {
            log::error!("existing {statement} NUMBER={number}: {existing}");
            log::error!("incoming {statement} NUMBER={number}: {attrs}");
            return Err(CollisionError::PtSystem {
                statement: statement.to_string(),
                number,
            });
        }
        into.insert(number, attrs);
    }
    Ok(())
}

impl fmt::Display for PtSystem {
    /// control statements grouped by category, space-separated fields,
    /// matching the historical writer's layout.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (statement, category) in [
            ("MODE", &self.modes),
            ("OPERATOR", &self.operators),
            ("VEHICLETYPE", &self.vehicle_types),
            ("WAITCRVDEF", &self.wait_curve_defs),
            ("CROWDCRVDEF", &self.crowd_curve_defs),
        ] {
            for attrs in category.values() {
                write!(f, "{statement}")?;
                for (k, v) in attrs.iter() {
                    write!(f, " {k}={v}")?;
                }
                writeln!(f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::PtSystem;
    use crate::error::CollisionError;
    use crate::model::AttrMap;

    fn pts_with_mode(number: u32, name: &str) -> PtSystem {
        let mut pts = PtSystem::new();
        let attrs: AttrMap = [("NUMBER", number.to_string().as_str()), ("NAME", name)]
            .into_iter()
            .collect();
        pts.modes.insert(number, attrs);
        pts
    }

    #[test]
    fn test_merge_distinct_numbers() {
        let mut pts = pts_with_mode(1, "local bus");
        pts.merge(pts_with_mode(2, "express bus")).unwrap();
        assert_eq!(pts.modes.len(), 2);
    }

    #[test]
    fn test_merge_duplicate_number_is_fatal() {
        let mut pts = pts_with_mode(1, "local bus");
        let result = pts.merge(pts_with_mode(1, "ferry"));
        assert!(matches!(
            result,
            Err(CollisionError::PtSystem { number: 1, .. })
        ));
    }

    #[test]
    fn test_is_empty() {
        assert!(PtSystem::new().is_empty());
        assert!(!pts_with_mode(1, "x").is_empty());
    }
}
