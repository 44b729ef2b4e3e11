//! Reference-table record types.
//!
//! Raw records carry the numeric metric values produced by the data
//! processors; ranked records carry the [`Band`] assigned to each metric by
//! the national normalization pass plus the pass-through numerics that are
//! compared against user targets rather than nationally classified.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Band, Metric};

/// Settlement density classification for a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    /// Remote, sparsely populated areas.
    HyperRural,
    /// Rural towns and surrounding country.
    Rural,
    /// Suburban belts around cities.
    Suburban,
    /// Dense urban areas.
    Urban,
    /// City cores with the highest density.
    HyperUrban,
}

impl Settlement {
    /// Zero-based position on the density scale (`HyperRural` is 0).
    #[must_use]
    pub fn ordinal(&self) -> usize {
        match self {
            Self::HyperRural => 0,
            Self::Rural => 1,
            Self::Suburban => 2,
            Self::Urban => 3,
            Self::HyperUrban => 4,
        }
    }
}

/// Bands assigned to a record, keyed by the closed [`Metric`] enumeration.
///
/// A missing entry means the source value was missing or zero, which the
/// upstream convention reads as "not applicable" rather than "average".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandSet {
    bands: HashMap<Metric, Band>,
}

impl BandSet {
    /// Construct an empty band set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the band for a metric, if one was assigned.
    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<Band> {
        self.bands.get(&metric).copied()
    }

    /// Assign a band to a metric, or clear it when `band` is `None`.
    pub fn set(&mut self, metric: Metric, band: Option<Band>) {
        match band {
            Some(band) => {
                self.bands.insert(metric, band);
            }
            None => {
                self.bands.remove(&metric);
            }
        }
    }

    /// Assign a band while returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, metric: Metric, band: Band) -> Self {
        self.set(metric, Some(band));
        self
    }

    /// Number of metrics with an assigned band.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Report whether no bands are assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

/// Numeric metric values for one record before ranking.
///
/// Zero values are stored as written; the statistics pass filters them out
/// and the classifiers treat them as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricValues {
    values: HashMap<Metric, f64>,
}

impl MetricValues {
    /// Construct an empty value set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the raw value for a metric, if recorded.
    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    /// Record a raw value while returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.values.insert(metric, value);
        self
    }
}

/// Pass-through numerics shared by raw and ranked records.
///
/// These stay numeric because users state targets for them directly; the
/// scoring engine compares the target against the location's median and MAD
/// instead of a national band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Passthrough {
    /// Median household income in dollars.
    pub median_household_income: Option<f64>,
    /// MAD of household income in dollars.
    pub mad_household_income: Option<f64>,
    /// Median home value in dollars.
    pub median_home_value: Option<f64>,
    /// MAD of home value in dollars.
    pub mad_home_value: Option<f64>,
    /// Mean one-way travel time to work in minutes.
    pub travel_time_to_work: Option<f64>,
    /// Weighted attainment score on the 0–5 education ladder.
    pub education_score: Option<f64>,
    /// Settlement density classification.
    pub settlement: Option<Settlement>,
}

/// A location-level record before the national ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLocationRecord {
    /// Composite display name: comma-separated place names, e.g.
    /// `"Springfield, East Longmeadow"`.
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Raw numeric metric values.
    pub metrics: MetricValues,
    /// Numerics left unranked.
    #[serde(flatten)]
    pub passthrough: Passthrough,
}

/// A regional-prefix record before the national ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPrefixRecord {
    /// Raw numeric metric values aggregated over the prefix.
    pub metrics: MetricValues,
}

/// A location-level record with nationally assigned bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Composite display name for the location.
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Band per tracked metric; absent entries mean the source value was
    /// missing.
    pub bands: BandSet,
    /// Numerics left unranked for direct target comparison.
    #[serde(flatten)]
    pub passthrough: Passthrough,
}

/// A regional-prefix record with nationally assigned bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixRecord {
    /// Band per tracked metric for the prefix aggregate.
    pub bands: BandSet,
}

/// Climate summary for a regional prefix, precomputed by the data pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixClimate {
    /// Number of distinct seasons the prefix experiences (1, 2, or 4).
    pub seasons: u8,
    /// Mean annual temperature in degrees Fahrenheit.
    pub average_temperature: f64,
    /// Mean winter low in degrees Fahrenheit.
    pub min_temperature: f64,
    /// Mean summer high in degrees Fahrenheit.
    pub max_temperature: f64,
    /// Yearly precipitation relative to the national distribution.
    pub precipitation: Band,
    /// Yearly sunshine relative to the national distribution.
    pub sunshine: Band,
}

/// Severity ranking used by the natural-disaster reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeverityRank {
    /// Frequent, damaging events.
    High,
    /// Noticeable but rarely catastrophic events.
    Moderate,
    /// Minor events.
    Low,
    /// Negligible exposure.
    VeryLow,
}

/// Kinds of natural disaster tracked per state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisasterKind {
    /// Tornadoes.
    Tornado,
    /// Hurricanes and other tropical cyclones.
    TropicalCyclone,
    /// Riverine and flash flooding.
    Flood,
    /// Wildfires.
    Wildfire,
    /// Earthquakes.
    Earthquake,
    /// Lightning and severe thunderstorms.
    Thunderstorm,
    /// Blizzards and ice storms.
    WinterStorm,
    /// Prolonged drought.
    Drought,
    /// Extreme heat events.
    Heatwave,
}

/// Severity and frequency profile for one disaster kind in one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterProfile {
    /// How damaging events of this kind are in the state.
    pub severity: SeverityRank,
    /// How often events of this kind occur, relative to the national
    /// distribution.
    pub frequency: Band,
}

/// Natural-disaster exposure for one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDisasterRecord {
    /// Combined exposure across all disaster kinds.
    pub overall: DisasterProfile,
    /// Per-kind profiles; a kind absent from the map has no recorded events
    /// in the state.
    pub kinds: HashMap<DisasterKind, DisasterProfile>,
}

/// Closed ring of `[longitude, latitude]` vertices describing a prefix
/// boundary.
pub type BoundaryRing = Vec<[f64; 2]>;

/// Return the three-digit regional prefix of a five-digit postal code.
///
/// # Examples
/// ```
/// use hearthside_core::prefix_of;
///
/// assert_eq!(prefix_of("01101"), "011");
/// ```
#[must_use]
pub fn prefix_of(zipcode: &str) -> &str {
    zipcode.get(..3).unwrap_or(zipcode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_set_round_trips_assignments() {
        let mut bands = BandSet::new();
        bands.set(Metric::MarriedShare, Some(Band::AboveAverage));
        assert_eq!(bands.get(Metric::MarriedShare), Some(Band::AboveAverage));
        bands.set(Metric::MarriedShare, None);
        assert!(bands.get(Metric::MarriedShare).is_none());
    }

    #[test]
    fn missing_metric_reads_as_none() {
        let bands = BandSet::new().with(Metric::HomeOccupancy, Band::Average);
        assert!(bands.get(Metric::TransitCommute).is_none());
    }

    #[test]
    fn settlement_ordinals_ascend_with_density() {
        assert!(Settlement::HyperRural.ordinal() < Settlement::Suburban.ordinal());
        assert!(Settlement::Suburban.ordinal() < Settlement::HyperUrban.ordinal());
    }

    #[test]
    fn prefix_is_first_three_digits() {
        assert_eq!(prefix_of("90210"), "902");
        assert_eq!(prefix_of("01"), "01");
    }
}
