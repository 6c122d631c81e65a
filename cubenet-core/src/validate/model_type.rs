use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The travel model a network belongs to. Off-street connectivity rules
/// differ by model type: TravelModelOne enforces funnel→stop ZONEACCESS
/// ordering while the others accept either order, and each model numbers
/// its off-street modes differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    Champ,
    TravelModelOne,
    TravelModelTwo,
}

impl ModelType {
    /// the default off-street mode table for this model type. Deployments
    /// with their own mode numbering override via
    /// [`OffstreetCheck::with_offstreet_modes`](super::OffstreetCheck::with_offstreet_modes).
    pub fn default_offstreet_modes(&self) -> &'static [&'static str] {
        match self {
            // CHAMP: BART, Caltrain, ferry, LRT subway segments
            ModelType::Champ => &["22", "23", "24", "25", "26"],
            // TM1: rail and ferry operators
            ModelType::TravelModelOne => &["120", "121", "122", "130", "131", "132", "133"],
            // TM2: rail and ferry leg modes
            ModelType::TravelModelTwo => &["130", "131", "132", "133"],
        }
    }

    /// TM1 is the only model type that requires funnel→stop ordering on
    /// ZONEACCESS pairs and flags the reverse as a critical error.
    pub fn enforces_zac_ordering(&self) -> bool {
        matches!(self, ModelType::TravelModelOne)
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::Champ => write!(f, "CHAMP"),
            ModelType::TravelModelOne => write!(f, "TravelModelOne"),
            ModelType::TravelModelTwo => write!(f, "TravelModelTwo"),
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "champ" => Ok(ModelType::Champ),
            "travelmodelone" | "tm1" => Ok(ModelType::TravelModelOne),
            "travelmodeltwo" | "tm2" => Ok(ModelType::TravelModelTwo),
            other => Err(format!("unknown model type: {other}")),
        }
    }
}

#[cfg(test)]
mod test {
    use super::ModelType;
    use std::str::FromStr;

    #[test]
    fn test_from_str_accepts_short_names() {
        assert_eq!(ModelType::from_str("tm1").unwrap(), ModelType::TravelModelOne);
        assert_eq!(ModelType::from_str("CHAMP").unwrap(), ModelType::Champ);
        assert!(ModelType::from_str("tm9").is_err());
    }

    #[test]
    fn test_only_tm1_enforces_zac_ordering() {
        assert!(ModelType::TravelModelOne.enforces_zac_ordering());
        assert!(!ModelType::Champ.enforces_zac_ordering());
        assert!(!ModelType::TravelModelTwo.enforces_zac_ordering());
    }
}
