//! Resolve free-text state/city/postal-code input to a canonical location.
//!
//! Resolution is exact-first with approximate-string fallback: states accept
//! a full name, a case-insensitive abbreviation, or a fuzzy match above a
//! high confidence floor; postal codes require the exact five-digit form and
//! take precedence over city names because they are far less typo-prone; a
//! bare city name goes through a two-pass fuzzy match against composite
//! display names and the primary city names extracted from them, because a
//! single pass over composite strings mis-ranks common city names that
//! appear inside many composite entries.

use geo::Point;
use thiserror::Error;

use crate::search::{AnchorSet, AnchorSlot};
use crate::states;
use crate::tables::{LocationSite, ReferenceTables};

/// Minimum 0–100 confidence for a fuzzy state match.
const STATE_CONFIDENCE_FLOOR: f64 = 90.0;

/// Minimum 0–100 confidence for a fuzzy city match.
const CITY_CONFIDENCE_FLOOR: f64 = 60.0;

/// Errors raised while resolving a location query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The state field was empty.
    #[error("a state is required")]
    MissingState,
    /// Neither a city nor a postal code was supplied.
    #[error("provide a city or a postal code")]
    MissingCityOrPostalCode,
    /// The state could not be matched with sufficient confidence.
    #[error("'{input}' is not a recognised US state")]
    InvalidState {
        /// State text supplied by the caller.
        input: String,
    },
    /// The state is valid but absent from the coordinate table.
    #[error("no coordinate data is available for {state}")]
    StateNotCovered {
        /// Canonical state name.
        state: String,
    },
    /// The postal code was not a five-digit string.
    #[error("'{input}' is not a valid five-digit postal code")]
    InvalidPostalCode {
        /// Postal code text supplied by the caller.
        input: String,
    },
    /// The postal code is well-formed but unknown within the state.
    #[error("postal code {postal_code} was not found in {state}")]
    UnknownPostalCode {
        /// The postal code searched for.
        postal_code: String,
        /// Canonical state name searched within.
        state: String,
    },
    /// No city matched with sufficient confidence.
    #[error("no confident match for city '{city}' in {state}")]
    NoCityMatch {
        /// City text supplied by the caller.
        city: String,
        /// Canonical state name searched within.
        state: String,
    },
}

/// A canonical location produced by [`Resolver::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Display string in the form `"<PrimaryCity>, <State> <PostalCode>"`.
    pub display: String,
    /// Canonical state name.
    pub state: &'static str,
    /// The matched coordinate entry.
    pub site: LocationSite,
    /// Anchor slot the coordinate was stored into.
    pub slot: AnchorSlot,
}

impl ResolvedLocation {
    /// The resolved coordinate as a `geo` point.
    #[must_use]
    pub fn point(&self) -> Point {
        self.site.point()
    }
}

/// Resolves user-supplied location text against the coordinate table.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'t> {
    tables: &'t ReferenceTables,
}

impl<'t> Resolver<'t> {
    /// Construct a resolver over the shared reference tables.
    #[must_use]
    pub fn new(tables: &'t ReferenceTables) -> Self {
        Self { tables }
    }

    /// Resolve `state` plus `city` and/or `postal_code` to a canonical
    /// location, storing its coordinate into `anchors` at `slot`.
    ///
    /// A postal code takes precedence over a city when both are given.
    ///
    /// # Errors
    /// Returns [`ResolveError`] when required fields are missing, the state
    /// or postal code is invalid, or no city matches confidently.
    pub fn resolve(
        &self,
        anchors: &mut AnchorSet,
        slot: AnchorSlot,
        state: &str,
        city: Option<&str>,
        postal_code: Option<&str>,
    ) -> Result<ResolvedLocation, ResolveError> {
        let state = state.trim();
        if state.is_empty() {
            return Err(ResolveError::MissingState);
        }
        let city = city.map(str::trim).filter(|c| !c.is_empty());
        let postal_code = postal_code.map(str::trim).filter(|p| !p.is_empty());
        if city.is_none() && postal_code.is_none() {
            return Err(ResolveError::MissingCityOrPostalCode);
        }

        let state = normalize_state(state)?;
        let sites = self
            .tables
            .sites_in_state(state)
            .ok_or_else(|| ResolveError::StateNotCovered {
                state: state.to_owned(),
            })?;

        let (site, primary) = match (postal_code, city) {
            (Some(postal), _) => resolve_by_postal_code(sites, postal, state)?,
            (None, Some(city)) => resolve_by_city(sites, city, state)?,
            (None, None) => return Err(ResolveError::MissingCityOrPostalCode),
        };

        anchors.place(slot, site.point());
        let display = format!("{primary}, {state} {zip}", zip = site.zipcode);
        log::debug!("resolved '{display}' into {slot:?}");
        Ok(ResolvedLocation {
            display,
            state,
            site: site.clone(),
            slot,
        })
    }
}

/// Normalise a state string to its canonical full name.
fn normalize_state(input: &str) -> Result<&'static str, ResolveError> {
    if let Some(name) = states::canonical_name(input) {
        return Ok(name);
    }
    if let Some(name) = states::name_for_abbreviation(input) {
        return Ok(name);
    }
    let best = states::STATES
        .iter()
        .map(|(_, name)| (*name, similarity(input, name)))
        .max_by(|a, b| a.1.total_cmp(&b.1));
    match best {
        Some((name, score)) if score > STATE_CONFIDENCE_FLOOR => Ok(name),
        _ => Err(ResolveError::InvalidState {
            input: input.to_owned(),
        }),
    }
}

fn resolve_by_postal_code<'s>(
    sites: &'s [LocationSite],
    postal_code: &str,
    state: &'static str,
) -> Result<(&'s LocationSite, String), ResolveError> {
    if postal_code.len() != 5 || !postal_code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ResolveError::InvalidPostalCode {
            input: postal_code.to_owned(),
        });
    }
    sites
        .iter()
        .find(|site| site.zipcode == postal_code)
        .map(|site| (site, site.primary_city().to_owned()))
        .ok_or_else(|| ResolveError::UnknownPostalCode {
            postal_code: postal_code.to_owned(),
            state: state.to_owned(),
        })
}

/// Two-pass fuzzy match of a bare city name.
///
/// The composite pass scores each site by its best-matching name segment;
/// the primary pass scores only the leading segment. The higher-scoring
/// pass wins, with ties favouring the composite decomposition.
fn resolve_by_city<'s>(
    sites: &'s [LocationSite],
    city: &str,
    state: &'static str,
) -> Result<(&'s LocationSite, String), ResolveError> {
    let composite_best = sites
        .iter()
        .filter_map(|site| {
            site.name
                .split(',')
                .map(str::trim)
                .map(|segment| (site, segment, similarity(city, segment)))
                .max_by(|a, b| a.2.total_cmp(&b.2))
        })
        .max_by(|a, b| a.2.total_cmp(&b.2));
    let primary_best = sites
        .iter()
        .map(|site| (site, site.primary_city(), similarity(city, site.primary_city())))
        .max_by(|a, b| a.2.total_cmp(&b.2));

    let winner = match (composite_best, primary_best) {
        (Some(composite), Some(primary)) if composite.2 >= primary.2 => Some(composite),
        (_, Some(primary)) => Some(primary),
        (composite, None) => composite,
    };

    match winner {
        Some((site, segment, score)) if score >= CITY_CONFIDENCE_FLOOR => {
            Ok((site, segment.to_owned()))
        }
        _ => Err(ResolveError::NoCityMatch {
            city: city.to_owned(),
            state: state.to_owned(),
        }),
    }
}

/// Case-insensitive normalised Levenshtein similarity on a 0–100 scale.
fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()) * 100.0
}
