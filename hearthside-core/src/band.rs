//! Ordinal bands assigned to a metric relative to the national distribution.
//!
//! The enum offers compile-time safety for band lookups and a total order
//! from `WellBelowAverage` to `WellAboveAverage`.
//!
//! # Examples
//! ```
//! use hearthside_core::Band;
//!
//! assert!(Band::BelowAverage < Band::AboveAverage);
//! assert_eq!(Band::Average.as_str(), "Average");
//! ```

use serde::{Deserialize, Serialize};

/// One of five ordinal classifications relative to the national reference
/// distribution for a metric.
///
/// The derived ordering follows the declaration order, so comparisons such
/// as `Band::Average < Band::AboveAverage` hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Band {
    /// Far below the national centre.
    #[serde(rename = "Well Below Average")]
    WellBelowAverage,
    /// Moderately below the national centre.
    #[serde(rename = "Below Average")]
    BelowAverage,
    /// Within the central band of the national distribution.
    #[serde(rename = "Average")]
    Average,
    /// Moderately above the national centre.
    #[serde(rename = "Above Average")]
    AboveAverage,
    /// Far above the national centre.
    #[serde(rename = "Well Above Average")]
    WellAboveAverage,
}

impl Band {
    /// All bands in ascending order.
    pub const ALL: [Self; 5] = [
        Self::WellBelowAverage,
        Self::BelowAverage,
        Self::Average,
        Self::AboveAverage,
        Self::WellAboveAverage,
    ];

    /// Return the band as the label used in the reference datasets.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WellBelowAverage => "Well Below Average",
            Self::BelowAverage => "Below Average",
            Self::Average => "Average",
            Self::AboveAverage => "Above Average",
            Self::WellAboveAverage => "Well Above Average",
        }
    }

    /// Zero-based position on the ordinal scale (`WellBelowAverage` is 0).
    ///
    /// Scoring orders index their five-point tables with this value.
    #[must_use]
    pub fn ordinal(&self) -> usize {
        match self {
            Self::WellBelowAverage => 0,
            Self::BelowAverage => 1,
            Self::Average => 2,
            Self::AboveAverage => 3,
            Self::WellAboveAverage => 4,
        }
    }

    /// Number of ordinal steps between two bands.
    #[must_use]
    pub fn distance(&self, other: &Self) -> usize {
        self.ordinal().abs_diff(other.ordinal())
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Band {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Well Below Average" => Ok(Self::WellBelowAverage),
            "Below Average" => Ok(Self::BelowAverage),
            "Average" => Ok(Self::Average),
            "Above Average" => Ok(Self::AboveAverage),
            "Well Above Average" => Ok(Self::WellAboveAverage),
            _ => Err(format!("unknown band '{s}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ordering_follows_declaration() {
        for pair in Band::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Band::AboveAverage.to_string(), Band::AboveAverage.as_str());
    }

    #[test]
    fn labels_round_trip() {
        for band in Band::ALL {
            assert_eq!(Band::from_str(band.as_str()), Ok(band));
        }
    }

    #[test]
    fn parsing_rejects_unknown() {
        let err = Band::from_str("Middling").unwrap_err();
        assert!(err.contains("unknown band"));
    }

    #[test]
    fn serde_uses_dataset_labels() {
        let json = serde_json::to_string(&Band::WellAboveAverage).expect("serialize band");
        assert_eq!(json, "\"Well Above Average\"");
        let parsed: Band = serde_json::from_str(&json).expect("deserialize band");
        assert_eq!(parsed, Band::WellAboveAverage);
    }
}
