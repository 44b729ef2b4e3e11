//! Offline national normalization pass for the Hearthside engine.
//!
//! The pass computes one national [`StatsSummary`] per tracked metric,
//! classifies every regional-prefix and location record against those
//! shared summaries, and persists the resulting band-labelled reference
//! tables as JSON artefacts. Each record is classified independently using
//! only the national summaries, so iteration order is irrelevant.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use hearthside_rank::{RawDataset, rank_nation, write_ranked_tables};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let text = std::fs::read_to_string("processed/raw_dataset.json")?;
//! let raw: RawDataset = serde_json::from_str(&text)?;
//! let ranked = rank_nation(&raw)?;
//! write_ranked_tables(&ranked, Utf8Path::new("artifacts"))?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use std::collections::{BTreeMap, HashMap};

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hearthside_core::{
    LocationRecord, Metric, PrefixRecord, RawLocationRecord, RawPrefixRecord,
    record::{BandSet, MetricValues},
};

mod classify;
mod stats;

pub use classify::{
    SYMMETRIC_FAR_CUT, SYMMETRIC_NEAR_CUT, classify, skewed_band, symmetric_band,
};
pub use stats::{StatsError, StatsSummary, summarize};

/// Errors raised by the national ranking pass.
#[derive(Debug, Error)]
pub enum RankError {
    /// A tracked metric had no national dataset.
    #[error("no national dataset was provided for metric {metric}")]
    MissingNationalDataset {
        /// The metric without a dataset.
        metric: Metric,
    },
    /// Creating the artefact directory failed.
    #[error("failed to create artefact directory {path}")]
    CreateDir {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Writing an artefact file failed.
    #[error("failed to write ranked table at {path}")]
    Write {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Serialising an artefact failed.
    #[error("failed to serialise ranked table for {path}")]
    Serialise {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}

/// The processed source datasets consumed by the ranking pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    /// National location-level observations per tracked metric.
    pub national: HashMap<Metric, Vec<f64>>,
    /// Regional-prefix aggregates keyed by three-digit prefix.
    pub prefixes: BTreeMap<String, RawPrefixRecord>,
    /// Location records keyed by postal code.
    pub locations: BTreeMap<String, RawLocationRecord>,
}

/// National summaries per metric.
///
/// A metric whose national distribution was degenerate (no usable
/// observations or zero spread) has no summary; its bands stay unassigned
/// everywhere and the scoring engine treats them as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NationalSummaries {
    summaries: HashMap<Metric, StatsSummary>,
}

impl NationalSummaries {
    /// The summary for a metric, if its distribution was usable.
    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<&StatsSummary> {
        self.summaries.get(&metric)
    }

    /// Number of metrics with a usable summary.
    #[must_use]
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    /// Report whether no summaries were computed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

/// Output of the national ranking pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedTables {
    /// National summaries kept numeric for display and affordability
    /// comparisons.
    pub summaries: NationalSummaries,
    /// Band-labelled regional-prefix records.
    pub prefixes: BTreeMap<String, PrefixRecord>,
    /// Band-labelled location records.
    pub locations: BTreeMap<String, LocationRecord>,
}

/// Run the national normalization pass over the processed datasets.
///
/// Every prefix and location record is classified against the *national*
/// summaries, never a local one.
///
/// # Errors
/// Returns [`RankError::MissingNationalDataset`] when a tracked metric has
/// no national dataset at all. A degenerate dataset is not an error: the
/// metric is skipped with a warning and its bands remain unassigned.
pub fn rank_nation(raw: &RawDataset) -> Result<RankedTables, RankError> {
    let mut summaries = HashMap::new();
    for metric in Metric::ALL {
        let values = raw
            .national
            .get(&metric)
            .ok_or(RankError::MissingNationalDataset { metric })?;
        match stats::summarize(metric, values) {
            Ok(summary) => {
                if summary.spread(metric.classifier()) <= 0.0 {
                    log::warn!("metric {metric} has zero national spread; skipping ranking");
                } else {
                    summaries.insert(metric, summary);
                }
            }
            Err(StatsError::Degenerate { .. }) => {
                log::warn!("metric {metric} has a degenerate national dataset; skipping ranking");
            }
        }
    }
    let summaries = NationalSummaries { summaries };

    let prefixes = raw
        .prefixes
        .iter()
        .map(|(prefix, record)| {
            let bands = classify_metrics(&record.metrics, &summaries);
            (prefix.clone(), PrefixRecord { bands })
        })
        .collect();

    let locations = raw
        .locations
        .iter()
        .map(|(zipcode, record)| {
            let bands = classify_metrics(&record.metrics, &summaries);
            let ranked = LocationRecord {
                city: record.city.clone(),
                state: record.state.clone(),
                bands,
                passthrough: record.passthrough.clone(),
            };
            (zipcode.clone(), ranked)
        })
        .collect();

    let tables = RankedTables {
        summaries,
        prefixes,
        locations,
    };
    log::info!(
        "ranked {} locations and {} prefixes across {} metrics",
        tables.locations.len(),
        tables.prefixes.len(),
        tables.summaries.len(),
    );
    Ok(tables)
}

/// Classify one record's raw values against the national summaries.
fn classify_metrics(values: &MetricValues, summaries: &NationalSummaries) -> BandSet {
    let mut bands = BandSet::new();
    for metric in Metric::ALL {
        let band = values.get(metric).and_then(|value| {
            summaries
                .get(metric)
                .and_then(|summary| classify::classify(value, summary, metric.classifier()))
        });
        bands.set(metric, band);
    }
    bands
}

/// Persist the ranked tables as JSON artefacts in `dir`.
///
/// Writes `ranked_locations.json`, `ranked_prefixes.json`, and
/// `national_summaries.json`; the first two are the files
/// `ReferenceTables::load` reads back. The directory is created when
/// missing.
///
/// # Errors
/// Returns [`RankError`] when the directory cannot be created or a file
/// cannot be serialised or written.
pub fn write_ranked_tables(tables: &RankedTables, dir: &Utf8Path) -> Result<(), RankError> {
    std::fs::create_dir_all(dir.as_std_path()).map_err(|source| RankError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    write_artifact(&dir.join("ranked_locations.json"), &tables.locations)?;
    write_artifact(&dir.join("ranked_prefixes.json"), &tables.prefixes)?;
    write_artifact(&dir.join("national_summaries.json"), &tables.summaries)?;
    log::info!("wrote ranked tables to {dir}");
    Ok(())
}

fn write_artifact<T: Serialize>(path: &Utf8Path, value: &T) -> Result<(), RankError> {
    let text = serde_json::to_string(value).map_err(|source| RankError::Serialise {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path.as_std_path(), text).map_err(|source| RankError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearthside_core::{Band, record::Passthrough};

    fn national_values() -> Vec<f64> {
        // Median 45, MAD 5.
        vec![35.0, 40.0, 43.0, 45.0, 47.0, 50.0, 55.0]
    }

    fn raw_dataset() -> RawDataset {
        let mut national = HashMap::new();
        for metric in Metric::ALL {
            national.insert(metric, national_values());
        }
        let location = RawLocationRecord {
            city: "Springfield".into(),
            state: "MA".into(),
            metrics: MetricValues::new()
                .with(Metric::MarriedShare, 60.0)
                .with(Metric::HomeOccupancy, 45.0),
            passthrough: Passthrough::default(),
        };
        let prefix = RawPrefixRecord {
            metrics: MetricValues::new().with(Metric::MarriedShare, 30.0),
        };
        RawDataset {
            national,
            prefixes: BTreeMap::from([("011".to_owned(), prefix)]),
            locations: BTreeMap::from([("01101".to_owned(), location)]),
        }
    }

    #[test]
    fn locations_are_classified_against_national_summaries() {
        let ranked = rank_nation(&raw_dataset()).expect("rank");
        let record = ranked.locations.get("01101").expect("location record");
        // (60 − 45) / 5 = 3.0, past the symmetric top cut.
        assert_eq!(
            record.bands.get(Metric::MarriedShare),
            Some(Band::WellAboveAverage)
        );
        assert_eq!(record.bands.get(Metric::HomeOccupancy), Some(Band::Average));
        // No raw value recorded, so no band.
        assert!(record.bands.get(Metric::TransitCommute).is_none());
    }

    #[test]
    fn prefixes_use_the_same_national_summaries() {
        let ranked = rank_nation(&raw_dataset()).expect("rank");
        let record = ranked.prefixes.get("011").expect("prefix record");
        // (30 − 45) / 5 = −3.0.
        assert_eq!(
            record.bands.get(Metric::MarriedShare),
            Some(Band::WellBelowAverage)
        );
    }

    #[test]
    fn missing_national_dataset_is_an_error() {
        let mut raw = raw_dataset();
        raw.national.remove(&Metric::WalkBikeCommute);
        let err = rank_nation(&raw).expect_err("missing dataset should fail");
        assert!(matches!(
            err,
            RankError::MissingNationalDataset {
                metric: Metric::WalkBikeCommute
            }
        ));
    }

    #[test]
    fn zero_spread_metric_is_skipped_not_fatal() {
        let mut raw = raw_dataset();
        raw.national
            .insert(Metric::SchoolEnrollment, vec![50.0, 50.0, 50.0]);
        let ranked = rank_nation(&raw).expect("rank");
        assert!(ranked.summaries.get(Metric::SchoolEnrollment).is_none());
        let record = ranked.locations.get("01101").expect("location record");
        assert!(record.bands.get(Metric::SchoolEnrollment).is_none());
    }

    #[test]
    fn artefacts_round_trip_through_disk() {
        let ranked = rank_nation(&raw_dataset()).expect("rank");
        let dir = tempfile::tempdir().expect("tempdir");
        let dir_path = Utf8Path::from_path(dir.path()).expect("utf8 tempdir");

        write_ranked_tables(&ranked, dir_path).expect("write artefacts");

        let text = std::fs::read_to_string(dir_path.join("ranked_locations.json").as_std_path())
            .expect("read artefact");
        let reloaded: BTreeMap<String, LocationRecord> =
            serde_json::from_str(&text).expect("parse artefact");
        assert_eq!(reloaded, ranked.locations);
    }
}
