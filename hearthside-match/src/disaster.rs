//! Natural-disaster exposure scoring.
//!
//! Exposure is tracked at the state level, so scores are computed once per
//! state and shared by every candidate in it. The overall exposure always
//! counts; up to three user-named disaster kinds add weighted terms, with
//! each successive slot counting for less. A kind with no recorded events
//! in a state earns that slot's full points.

use std::collections::BTreeMap;
use std::collections::HashMap;

use hearthside_core::{Band, DisasterProfile, SeverityRank, StateDisasterRecord};

use crate::preferences::DisasterStage;

/// How much each avoided-kind slot counts relative to the overall term.
const SLOT_MULTIPLIERS: [f64; 3] = [1.0, 0.705, 0.415];
/// Best combined severity and frequency points for one term.
const TERM_MAX: f64 = 2.0;

/// Disaster-exposure fit per state for one query.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DisasterScores {
    by_state: HashMap<String, f64>,
    max_score: f64,
}

impl DisasterScores {
    /// Score every covered state against the profile.
    pub(crate) fn compute(
        stage: &DisasterStage,
        disasters: &BTreeMap<String, StateDisasterRecord>,
    ) -> Self {
        let risk = stage.risk_weight.weight();
        let by_state = disasters
            .iter()
            .map(|(state, record)| (state.clone(), score_state(stage, record, risk)))
            .collect();
        Self {
            by_state,
            max_score: max_score(stage, risk),
        }
    }

    /// The exposure score for a state; an uncovered state earns nothing.
    pub(crate) fn get(&self, state: &str) -> f64 {
        self.by_state.get(state).copied().unwrap_or(0.0)
    }

    /// The best exposure score any state could earn for this profile.
    pub(crate) fn max(&self) -> f64 {
        self.max_score
    }
}

fn max_score(stage: &DisasterStage, risk: f64) -> f64 {
    let slots: f64 = SLOT_MULTIPLIERS.iter().take(stage.avoid.len()).sum();
    TERM_MAX * risk * (1.0 + slots)
}

fn score_state(stage: &DisasterStage, record: &StateDisasterRecord, risk: f64) -> f64 {
    let mut score = profile_points(&record.overall) * risk;
    for (kind, multiplier) in stage.avoid.iter().zip(SLOT_MULTIPLIERS) {
        let points = record
            .kinds
            .get(kind)
            .map_or(TERM_MAX, profile_points);
        score += points * risk * multiplier;
    }
    score
}

/// Combined severity and frequency points for one exposure profile.
///
/// Low severity and low frequency both push the score toward the
/// two-point maximum; a state where the kind is both severe and frequent
/// earns nothing.
fn profile_points(profile: &DisasterProfile) -> f64 {
    severity_points(profile.severity) + frequency_points(profile.frequency)
}

fn severity_points(severity: SeverityRank) -> f64 {
    match severity {
        SeverityRank::High => 0.0,
        SeverityRank::Moderate => 0.33,
        SeverityRank::Low => 0.66,
        SeverityRank::VeryLow => 1.0,
    }
}

fn frequency_points(frequency: Band) -> f64 {
    match frequency {
        Band::WellAboveAverage => 0.0,
        Band::AboveAverage => 0.25,
        Band::Average => 0.5,
        Band::BelowAverage => 0.75,
        Band::WellBelowAverage => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::Importance;
    use hearthside_core::DisasterKind;

    fn quiet_profile() -> DisasterProfile {
        DisasterProfile {
            severity: SeverityRank::VeryLow,
            frequency: Band::WellBelowAverage,
        }
    }

    fn violent_profile() -> DisasterProfile {
        DisasterProfile {
            severity: SeverityRank::High,
            frequency: Band::WellAboveAverage,
        }
    }

    fn stage(avoid: Vec<DisasterKind>) -> DisasterStage {
        DisasterStage {
            risk_weight: Importance::MAX,
            avoid,
        }
    }

    #[test]
    fn quiet_state_earns_the_maximum() {
        let record = StateDisasterRecord {
            overall: quiet_profile(),
            kinds: HashMap::from([(DisasterKind::Tornado, quiet_profile())]),
        };
        let disasters = BTreeMap::from([("Vermont".to_owned(), record)]);
        let scores = DisasterScores::compute(&stage(vec![DisasterKind::Tornado]), &disasters);
        assert_eq!(scores.get("Vermont"), scores.max());
    }

    #[test]
    fn unrecorded_kind_earns_full_slot_points() {
        // No recorded earthquakes is as good as a very low ranking.
        let with_quiet = StateDisasterRecord {
            overall: quiet_profile(),
            kinds: HashMap::from([(DisasterKind::Earthquake, quiet_profile())]),
        };
        let without = StateDisasterRecord {
            overall: quiet_profile(),
            kinds: HashMap::new(),
        };
        let disasters = BTreeMap::from([
            ("Maine".to_owned(), with_quiet),
            ("Ohio".to_owned(), without),
        ]);
        let scores = DisasterScores::compute(&stage(vec![DisasterKind::Earthquake]), &disasters);
        assert_eq!(scores.get("Maine"), scores.get("Ohio"));
    }

    #[test]
    fn later_slots_count_for_less() {
        // Tornadoes violent, floods violent; moving tornado from slot one
        // to slot two shrinks its penalty.
        let record = StateDisasterRecord {
            overall: quiet_profile(),
            kinds: HashMap::from([
                (DisasterKind::Tornado, violent_profile()),
                (DisasterKind::Flood, quiet_profile()),
            ]),
        };
        let disasters = BTreeMap::from([("Kansas".to_owned(), record)]);

        let tornado_first = DisasterScores::compute(
            &stage(vec![DisasterKind::Tornado, DisasterKind::Flood]),
            &disasters,
        );
        let tornado_second = DisasterScores::compute(
            &stage(vec![DisasterKind::Flood, DisasterKind::Tornado]),
            &disasters,
        );
        assert!(tornado_second.get("Kansas") > tornado_first.get("Kansas"));
    }

    #[test]
    fn zero_risk_weight_removes_the_criterion() {
        let record = StateDisasterRecord {
            overall: violent_profile(),
            kinds: HashMap::new(),
        };
        let disasters = BTreeMap::from([("Florida".to_owned(), record)]);
        let indifferent = DisasterStage {
            risk_weight: Importance::NONE,
            avoid: vec![DisasterKind::TropicalCyclone],
        };
        let scores = DisasterScores::compute(&indifferent, &disasters);
        assert_eq!(scores.max(), 0.0);
        assert_eq!(scores.get("Florida"), 0.0);
    }

    #[test]
    fn maximum_grows_with_each_avoided_kind() {
        let empty = BTreeMap::new();
        let none = DisasterScores::compute(&stage(vec![]), &empty);
        let one = DisasterScores::compute(&stage(vec![DisasterKind::Flood]), &empty);
        let three = DisasterScores::compute(
            &stage(vec![
                DisasterKind::Flood,
                DisasterKind::Tornado,
                DisasterKind::Wildfire,
            ]),
            &empty,
        );
        assert_eq!(none.max(), 2.0);
        assert_eq!(one.max(), 2.0 * (1.0 + 1.0));
        assert_eq!(three.max(), 2.0 * (1.0 + 1.0 + 0.705 + 0.415));
    }
}
