use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ExError, ExErrorKind};

/// Kind of research asset a version snapshots
///
/// The set is closed: every variant must have a store registered in the
/// router, and the router table is sized by [`AssetVersionType::COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetVersionType {
    Cohort,
    ConceptSet,
    Characterization,
    IncidenceRate,
    Pathway,
}

impl AssetVersionType {
    pub const COUNT: usize = 5;

    /// All variants in index order
    pub const ALL: [AssetVersionType; Self::COUNT] = [
        AssetVersionType::Cohort,
        AssetVersionType::ConceptSet,
        AssetVersionType::Characterization,
        AssetVersionType::IncidenceRate,
        AssetVersionType::Pathway,
    ];

    /// Dense index into per-type tables, `0..COUNT`
    pub const fn index(self) -> usize {
        match self {
            AssetVersionType::Cohort => 0,
            AssetVersionType::ConceptSet => 1,
            AssetVersionType::Characterization => 2,
            AssetVersionType::IncidenceRate => 3,
            AssetVersionType::Pathway => 4,
        }
    }

    /// Stable wire name
    pub const fn as_str(self) -> &'static str {
        match self {
            AssetVersionType::Cohort => "COHORT",
            AssetVersionType::ConceptSet => "CONCEPT_SET",
            AssetVersionType::Characterization => "CHARACTERIZATION",
            AssetVersionType::IncidenceRate => "INCIDENCE_RATE",
            AssetVersionType::Pathway => "PATHWAY",
        }
    }
}

impl fmt::Display for AssetVersionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetVersionType {
    type Err = ExError;

    /// Accepts the wire name in any case, with `-` or `_` separators
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        AssetVersionType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("parse_asset_type")
                    .with_message(format!("Unknown asset type '{}'", s))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, t) in AssetVersionType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
    }

    #[test]
    fn test_parse_accepts_cli_spelling() {
        assert_eq!(
            "concept-set".parse::<AssetVersionType>().unwrap(),
            AssetVersionType::ConceptSet
        );
        assert_eq!(
            "INCIDENCE_RATE".parse::<AssetVersionType>().unwrap(),
            AssetVersionType::IncidenceRate
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "estimation".parse::<AssetVersionType>().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_serde_uses_wire_name() {
        let json = serde_json::to_string(&AssetVersionType::IncidenceRate).unwrap();
        assert_eq!(json, "\"INCIDENCE_RATE\"");
    }
}
