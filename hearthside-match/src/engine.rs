//! Per-query scoring, regional rollup, and result assembly.
//!
//! The engine consumes the shared reference tables, a frozen preference
//! profile, and the candidate set produced by geographic search. Climate
//! and disaster scores are computed once per prefix/state and looked up
//! per candidate; demographic and financial criteria are scored per
//! location. Composite scores roll up by regional prefix so a strong
//! location embedded in a strong region outranks an isolated high scorer.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use hearthside_core::{
    AnchorSet, AnchorSlot, BoundaryRing, LocationSite, ReferenceTables, ResolveError,
    ResolvedLocation, Resolver, SearchError, anchor_spread, prefix_of, radius_from_index,
    radius_search, states,
};

use crate::criteria::score_location;
use crate::disaster::DisasterScores;
use crate::preferences::PreferenceConfig;
use crate::weather::WeatherScores;

/// How many runners-up to retain alongside the best result.
const TOP_RESULTS: usize = 10;

/// Anchor spreads beyond this draw an advisory; no ladder radius can
/// cover anchors this far apart.
const ANCHOR_SPREAD_ADVISORY_MILES: f64 = 200.0;

/// Errors raised while scoring a candidate set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    /// The candidate set was empty; run a search first or widen it.
    #[error("the candidate set is empty; widen the search radius or change anchors")]
    EmptyCandidateSet,
    /// No candidate had a ranked record to score.
    #[error("none of the {count} candidates has a ranked record")]
    NoScorableCandidates {
        /// Number of candidates that were tried.
        count: usize,
    },
}

/// One scored candidate location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLocation {
    /// Five-digit postal code.
    pub zipcode: String,
    /// Composite display name for the location.
    pub city: String,
    /// Owning three-digit regional prefix.
    pub prefix: String,
    /// Raw weighted sum of per-criterion sub-scores.
    pub composite: f64,
    /// Composite as a rounded percentage of the query-specific maximum.
    pub percentage: u8,
    /// Composite plus the prefix's regional average, for ordering only.
    pub combined: f64,
}

/// The primary result payload for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Display string in the form `"<PrimaryCity>, <ST>"`.
    pub result_city: String,
    /// `(latitude, longitude)` of the winning location.
    pub coordinates: (f64, f64),
    /// Match percentage of the winning location, 0 to 100.
    pub match_percentage: u8,
    /// Human-readable name of the winning region, if known.
    pub region_name: Option<String>,
    /// Boundary ring of the winning regional prefix, if known.
    pub boundary: Option<BoundaryRing>,
    /// Whether most homes in the winning location are likely out of the
    /// user's price range.
    pub affordability_warning: bool,
}

/// Full scoring output: the best match plus the top runners-up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    /// The winning location's result payload.
    pub best: MatchResult,
    /// The top candidates ordered by combined score, best first.
    pub top: Vec<ScoredLocation>,
}

/// Scores candidate locations against a preference profile.
#[derive(Debug, Clone, Copy)]
pub struct MatchEngine<'t> {
    tables: &'t ReferenceTables,
}

impl<'t> MatchEngine<'t> {
    /// Construct an engine over the shared reference tables.
    #[must_use]
    pub fn new(tables: &'t ReferenceTables) -> Self {
        Self { tables }
    }

    /// Score every candidate and assemble the result payload.
    ///
    /// The match percentage is computed from the composite score against a
    /// maximum derived solely from the profile, so it is comparable across
    /// queries with the same preferences. Ordering uses the combined score,
    /// which folds in the regional rollup.
    ///
    /// # Errors
    /// Returns [`MatchError::EmptyCandidateSet`] for an empty candidate
    /// set and [`MatchError::NoScorableCandidates`] when no candidate has
    /// a ranked record.
    pub fn score(
        &self,
        prefs: &PreferenceConfig,
        candidates: &[LocationSite],
    ) -> Result<MatchReport, MatchError> {
        if candidates.is_empty() {
            return Err(MatchError::EmptyCandidateSet);
        }

        let weather = WeatherScores::compute(&prefs.weather, &self.tables.climate);
        let disaster = DisasterScores::compute(&prefs.disaster, &self.tables.disasters);
        let maximum_extra = weather.max() + disaster.max();

        struct Partial {
            zipcode: String,
            city: String,
            prefix: String,
            composite: f64,
            percentage: u8,
            affordability_warning: bool,
        }

        let mut partials = Vec::with_capacity(candidates.len());
        let mut maximum = 0.0;
        for site in candidates {
            let Some(record) = self.tables.location(&site.zipcode) else {
                log::warn!("candidate {} has no ranked record; skipping", site.zipcode);
                continue;
            };
            let base = score_location(prefs, record);
            let prefix = prefix_of(&site.zipcode).to_owned();
            let state_name = states::name_for_abbreviation(&record.state).unwrap_or(&record.state);
            let composite = base.achieved + weather.get(&prefix) + disaster.get(state_name);
            maximum = base.maximum + maximum_extra;
            partials.push(Partial {
                zipcode: site.zipcode.clone(),
                city: record.city.clone(),
                prefix,
                composite,
                percentage: percentage_of(composite, maximum),
                affordability_warning: base.affordability_warning,
            });
        }
        if partials.is_empty() {
            return Err(MatchError::NoScorableCandidates {
                count: candidates.len(),
            });
        }

        let regional = regional_averages(partials.iter().map(|p| (p.prefix.as_str(), p.composite)));
        let mut warnings = HashMap::new();
        let mut scored: Vec<ScoredLocation> = partials
            .into_iter()
            .map(|partial| {
                let regional_average = regional.get(partial.prefix.as_str()).copied().unwrap_or(0.0);
                warnings.insert(partial.zipcode.clone(), partial.affordability_warning);
                ScoredLocation {
                    combined: partial.composite + regional_average,
                    zipcode: partial.zipcode,
                    city: partial.city,
                    prefix: partial.prefix,
                    composite: partial.composite,
                    percentage: partial.percentage,
                }
            })
            .collect();
        scored.sort_by(|a, b| {
            b.combined
                .total_cmp(&a.combined)
                .then_with(|| a.zipcode.cmp(&b.zipcode))
        });
        scored.truncate(TOP_RESULTS);

        let best = self.assemble_result(&scored[0], &warnings, candidates);
        log::info!(
            "scored {} candidate(s); best is {} at {}%",
            scored.len(),
            best.result_city,
            best.match_percentage,
        );
        Ok(MatchReport { best, top: scored })
    }

    fn assemble_result(
        &self,
        winner: &ScoredLocation,
        warnings: &HashMap<String, bool>,
        candidates: &[LocationSite],
    ) -> MatchResult {
        let site = candidates
            .iter()
            .find(|site| site.zipcode == winner.zipcode);
        let (primary, coordinates) = site.map_or_else(
            || (winner.city.as_str(), (0.0, 0.0)),
            |site| (site.primary_city(), (site.latitude, site.longitude)),
        );
        let state = self
            .tables
            .location(&winner.zipcode)
            .map_or("", |record| record.state.as_str());
        MatchResult {
            result_city: format!("{primary}, {state}"),
            coordinates,
            match_percentage: winner.percentage,
            region_name: self.tables.region_name(&winner.prefix).map(str::to_owned),
            boundary: self.tables.boundary(&winner.prefix).cloned(),
            affordability_warning: warnings.get(&winner.zipcode).copied().unwrap_or(false),
        }
    }
}

/// Average composite per regional prefix across the scored candidates.
fn regional_averages<'a>(
    composites: impl Iterator<Item = (&'a str, f64)>,
) -> HashMap<String, f64> {
    let mut sums: HashMap<String, (f64, u32)> = HashMap::new();
    for (prefix, composite) in composites {
        let entry = sums.entry(prefix.to_owned()).or_insert((0.0, 0));
        entry.0 += composite;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(prefix, (sum, count))| (prefix, sum / f64::from(count)))
        .collect()
}

/// Round a composite to an integer percentage of the maximum, clamped to
/// 0 to 100.
fn percentage_of(composite: f64, maximum: f64) -> u8 {
    if maximum <= 0.0 {
        return 0;
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the value is clamped to 0..=100 before the cast"
    )]
    let rounded = (composite * 100.0 / maximum).round().clamp(0.0, 100.0) as u8;
    rounded
}

/// One user's query: anchors, candidates, and accumulated advisories.
///
/// Advisories are recoverable conditions surfaced to the caller (widen
/// the radius, raise the budget) rather than errors; they never abort the
/// query.
#[derive(Debug, Clone)]
pub struct QuerySession<'t> {
    tables: &'t ReferenceTables,
    anchors: AnchorSet,
    candidates: Vec<LocationSite>,
    advisories: Vec<String>,
}

impl<'t> QuerySession<'t> {
    /// Start a query over the shared reference tables.
    #[must_use]
    pub fn new(tables: &'t ReferenceTables) -> Self {
        Self {
            tables,
            anchors: AnchorSet::new(),
            candidates: Vec::new(),
            advisories: Vec::new(),
        }
    }

    /// Resolve user-supplied location text into an anchor slot.
    ///
    /// # Errors
    /// Returns [`ResolveError`] when the text cannot be resolved; the
    /// session is left unchanged.
    pub fn resolve_anchor(
        &mut self,
        slot: AnchorSlot,
        state: &str,
        city: Option<&str>,
        postal_code: Option<&str>,
    ) -> Result<ResolvedLocation, ResolveError> {
        let resolved =
            Resolver::new(self.tables).resolve(&mut self.anchors, slot, state, city, postal_code)?;
        let spread = anchor_spread(&self.anchors.active());
        if spread > ANCHOR_SPREAD_ADVISORY_MILES {
            self.advisories.push(format!(
                "anchors are about {spread:.0} miles apart; no search radius covers all of them"
            ));
        }
        Ok(resolved)
    }

    /// Run the radius search at a ladder step and store the candidates.
    ///
    /// Returns the number of candidates found. An empty result records an
    /// advisory and keeps the session usable.
    ///
    /// # Errors
    /// Returns [`SearchError`] when the radius index is not on the ladder
    /// or no anchor has been resolved yet.
    pub fn search(&mut self, radius_index: usize) -> Result<usize, SearchError> {
        let radius = radius_from_index(radius_index)?;
        self.candidates = radius_search(radius, self.tables.all_sites(), &self.anchors.active())?;
        if self.candidates.is_empty() {
            self.advisories.push(format!(
                "no locations within {radius} miles of every anchor; widen the radius or change anchors"
            ));
        }
        Ok(self.candidates.len())
    }

    /// Score the stored candidates against a preference profile.
    ///
    /// # Errors
    /// Returns [`MatchError`] when the candidate set is empty or nothing
    /// in it can be scored.
    pub fn run(&self, prefs: &PreferenceConfig) -> Result<MatchReport, MatchError> {
        MatchEngine::new(self.tables).score(prefs, &self.candidates)
    }

    /// The candidates produced by the most recent search.
    #[must_use]
    pub fn candidates(&self) -> &[LocationSite] {
        &self.candidates
    }

    /// Advisories accumulated so far, oldest first.
    #[must_use]
    pub fn advisories(&self) -> &[String] {
        &self.advisories
    }

    /// The anchors placed so far.
    #[must_use]
    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }
}
