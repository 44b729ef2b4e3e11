//! Whole-table loads of the reference datasets.
//!
//! The tables are produced offline (ranking pass and data pipeline) and
//! loaded once at initialization. They are read-only for the lifetime of the
//! process; every query shares the same instance and none of the scoring
//! paths re-reads a file mid-query.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use geo::Point;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::record::{BoundaryRing, LocationRecord, PrefixClimate, PrefixRecord, StateDisasterRecord};

/// A location identifier paired with its coordinates.
///
/// The composite `name` aliases the common place names that share the
/// postal code, e.g. `"Springfield, East Springfield"`; the first segment is
/// the primary city used for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSite {
    /// Comma-separated common place names for the location.
    pub name: String,
    /// Five-digit postal code.
    pub zipcode: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl LocationSite {
    /// The primary city name (first segment of the composite name).
    #[must_use]
    pub fn primary_city(&self) -> &str {
        self.name.split(',').next().unwrap_or(&self.name).trim()
    }

    /// The site's position as a `geo` point (`x` = longitude, `y` =
    /// latitude).
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

/// Errors raised while loading the reference tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// Reading a table file from disk failed.
    #[error("failed to read reference table at {path}")]
    Read {
        /// Path of the table file.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Decoding a table file failed.
    #[error("failed to parse reference table at {path}")]
    Parse {
        /// Path of the table file.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}

/// The read-only reference tables shared by every query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTables {
    /// Ranked location records keyed by postal code.
    pub locations: BTreeMap<String, LocationRecord>,
    /// Ranked regional-prefix records keyed by three-digit prefix.
    pub prefixes: BTreeMap<String, PrefixRecord>,
    /// Location coordinates grouped by canonical state name.
    pub coordinates: BTreeMap<String, Vec<LocationSite>>,
    /// Prefix boundary rings keyed by prefix.
    pub boundaries: BTreeMap<String, BoundaryRing>,
    /// Human-readable region names keyed by prefix.
    pub region_names: BTreeMap<String, String>,
    /// Climate summaries keyed by prefix.
    pub climate: BTreeMap<String, PrefixClimate>,
    /// Natural-disaster records keyed by canonical state name.
    pub disasters: BTreeMap<String, StateDisasterRecord>,
}

impl ReferenceTables {
    /// Load every reference table from JSON files in `dir`.
    ///
    /// Expects `ranked_locations.json`, `ranked_prefixes.json`,
    /// `coordinates.json`, `prefix_boundaries.json`, `region_names.json`,
    /// `climate.json`, and `disasters.json`.
    ///
    /// # Errors
    /// Returns [`TableError`] when any file cannot be read or parsed.
    pub fn load(dir: &Utf8Path) -> Result<Self, TableError> {
        let tables = Self {
            locations: load_table(&dir.join("ranked_locations.json"))?,
            prefixes: load_table(&dir.join("ranked_prefixes.json"))?,
            coordinates: load_table(&dir.join("coordinates.json"))?,
            boundaries: load_table(&dir.join("prefix_boundaries.json"))?,
            region_names: load_table(&dir.join("region_names.json"))?,
            climate: load_table(&dir.join("climate.json"))?,
            disasters: load_table(&dir.join("disasters.json"))?,
        };
        log::info!(
            "loaded reference tables: {} locations, {} prefixes, {} states",
            tables.locations.len(),
            tables.prefixes.len(),
            tables.coordinates.len(),
        );
        Ok(tables)
    }

    /// The ranked record for a postal code, if tracked.
    #[must_use]
    pub fn location(&self, zipcode: &str) -> Option<&LocationRecord> {
        self.locations.get(zipcode)
    }

    /// The ranked record for a regional prefix, if tracked.
    #[must_use]
    pub fn prefix(&self, prefix: &str) -> Option<&PrefixRecord> {
        self.prefixes.get(prefix)
    }

    /// Coordinate entries for one state, if covered.
    #[must_use]
    pub fn sites_in_state(&self, state: &str) -> Option<&[LocationSite]> {
        self.coordinates.get(state).map(Vec::as_slice)
    }

    /// Every coordinate entry across all states.
    pub fn all_sites(&self) -> impl Iterator<Item = &LocationSite> {
        self.coordinates.values().flatten()
    }

    /// Human-readable region name for a prefix, if known.
    #[must_use]
    pub fn region_name(&self, prefix: &str) -> Option<&str> {
        self.region_names.get(prefix).map(String::as_str)
    }

    /// Boundary ring for a prefix, if known.
    #[must_use]
    pub fn boundary(&self, prefix: &str) -> Option<&BoundaryRing> {
        self.boundaries.get(prefix)
    }
}

fn load_table<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, TableError> {
    let text = std::fs::read_to_string(path.as_std_path()).map_err(|source| TableError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| TableError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
