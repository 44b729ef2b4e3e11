//! Per-location criteria scoring.
//!
//! Each banded criterion maps the five ordinal bands to points through a
//! [`ScoringOrder`], scaled by the user's stated importance. Pass-through
//! numerics (commute time, education attainment, home value, income) are
//! scored by direct comparison against the user's targets. Every criterion
//! contributes to both the achieved score and the query-specific maximum,
//! so a location with missing data is penalised rather than excused.

use hearthside_core::{Band, LocationRecord, Metric, Settlement};

use crate::preferences::{PreferenceConfig, TransportMode};

/// Points awarded per ordinal band position, already importance-scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScoringOrder {
    points: [f64; 5],
}

impl ScoringOrder {
    pub(crate) fn new(points: [f64; 5], weight: f64) -> Self {
        Self {
            points: points.map(|p| p * weight),
        }
    }

    /// Higher bands earn more points.
    pub(crate) fn ascending(weight: f64) -> Self {
        Self::new([0.0, 1.0, 2.0, 3.0, 4.0], weight)
    }

    /// Lower bands earn more points.
    pub(crate) fn descending(weight: f64) -> Self {
        Self::new([4.0, 3.0, 2.0, 1.0, 0.0], weight)
    }

    /// Points for a band; a missing band earns nothing.
    pub(crate) fn score(&self, band: Option<Band>) -> f64 {
        band.map_or(0.0, |band| self.points[band.ordinal()])
    }

    /// Best achievable points under this order.
    pub(crate) fn max(&self) -> f64 {
        self.points.iter().copied().fold(0.0, f64::max)
    }
}

/// Achieved points, the matching maximum, and any affordability advisory
/// for one location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LocationScore {
    pub(crate) achieved: f64,
    pub(crate) maximum: f64,
    pub(crate) affordability_warning: bool,
}

/// Best points for the commute-time fit criterion.
const COMMUTE_FIT_MAX: f64 = 4.0;
/// Best points for the education-attainment fit criterion.
const EDUCATION_FIT_MAX: f64 = 4.0;
/// Best points for each financial fit criterion.
const FINANCIAL_FIT_MAX: f64 = 10.0;
/// Best points for the first-choice settlement criterion.
const SETTLEMENT_PRIMARY_MAX: f64 = 4.0;
/// Best points for the second-choice settlement criterion.
const SETTLEMENT_SECONDARY_MAX: f64 = 2.0;

/// Score one location record against the user's profile.
///
/// The returned maximum depends only on the profile, so every candidate in
/// a query shares the same denominator.
pub(crate) fn score_location(prefs: &PreferenceConfig, record: &LocationRecord) -> LocationScore {
    let mut achieved = 0.0;
    let mut maximum = 0.0;

    for (metric, order) in banded_criteria(prefs) {
        achieved += order.score(record.bands.get(metric));
        maximum += order.max();
    }

    if commuting_applies(prefs) {
        achieved += commute_fit(
            prefs.work.commute_tolerance_minutes,
            record.passthrough.travel_time_to_work,
        );
        maximum += COMMUTE_FIT_MAX;
    }

    if prefs.area.education_importance.is_active() {
        let weight = prefs.area.education_importance.weight();
        achieved += education_fit(prefs, record.passthrough.education_score) * weight;
        maximum += EDUCATION_FIT_MAX * weight;
    }

    achieved += settlement_fit(
        prefs.area.settlement_first,
        record.passthrough.settlement,
        SettlementChoice::Primary,
    );
    achieved += settlement_fit(
        prefs.area.settlement_second,
        record.passthrough.settlement,
        SettlementChoice::Secondary,
    );
    maximum += SETTLEMENT_PRIMARY_MAX + SETTLEMENT_SECONDARY_MAX;

    let (home_points, affordability_warning) = home_price_fit(
        prefs.finance.affordable_home_price,
        record.passthrough.median_home_value,
        record.passthrough.mad_home_value,
    );
    achieved += home_points;
    maximum += FINANCIAL_FIT_MAX;

    achieved += income_fit(
        prefs.finance.income,
        record.passthrough.median_household_income,
        record.passthrough.mad_household_income,
    );
    maximum += FINANCIAL_FIT_MAX;

    LocationScore {
        achieved,
        maximum,
        affordability_warning,
    }
}

/// The banded criteria active for this profile, with their scoring orders.
fn banded_criteria(prefs: &PreferenceConfig) -> Vec<(Metric, ScoringOrder)> {
    let mut criteria = Vec::new();

    if prefs.family.married_importance.is_active() {
        let weight = prefs.family.married_importance.weight();
        let order = if prefs.family.married {
            ScoringOrder::ascending(weight)
        } else {
            ScoringOrder::descending(weight)
        };
        criteria.push((Metric::MarriedShare, order));
    }

    if prefs.family.children_importance.is_active() {
        let weight = prefs.family.children_importance.weight();
        let order = if prefs.family.children {
            ScoringOrder::ascending(weight)
        } else {
            ScoringOrder::descending(weight)
        };
        criteria.push((Metric::FamiliesWithChildren, order));
    }

    if prefs.family.school_importance.is_active() {
        let weight = prefs.family.school_importance.weight();
        criteria.push((Metric::SchoolEnrollment, ScoringOrder::ascending(weight)));
    }

    if prefs.work.seeking {
        if prefs.work.employment_importance.is_active() {
            let weight = prefs.work.employment_importance.weight();
            criteria.push((Metric::EmploymentShare, ScoringOrder::ascending(weight)));
        }
        if let Some((metric, order)) = transport_criterion(prefs.work.transport) {
            criteria.push((metric, order));
        }
    }

    criteria
}

/// The commute-share criterion for a transport mode, if one applies.
///
/// Transit and walk/bike shares are skew-classified, so merely average
/// prevalence already indicates viable infrastructure; their orders skip
/// the one-point step.
fn transport_criterion(mode: TransportMode) -> Option<(Metric, ScoringOrder)> {
    match mode {
        TransportMode::PersonalVehicle => {
            Some((Metric::MotorVehicleCommute, ScoringOrder::ascending(1.0)))
        }
        TransportMode::PublicTransit => Some((
            Metric::TransitCommute,
            ScoringOrder::new([0.0, 0.0, 2.0, 3.0, 4.0], 1.0),
        )),
        TransportMode::WalkOrBike => Some((
            Metric::WalkBikeCommute,
            ScoringOrder::new([0.0, 0.0, 2.0, 3.0, 4.0], 1.0),
        )),
        TransportMode::WorkFromHome => None,
    }
}

/// Whether commute-time fit participates in this query.
fn commuting_applies(prefs: &PreferenceConfig) -> bool {
    prefs.work.seeking && prefs.work.transport != TransportMode::WorkFromHome
}

/// Points for the location's typical commute against the user's tolerance.
///
/// Full points while the typical commute stays within tolerance, decaying
/// as it runs over.
fn commute_fit(tolerance_minutes: f64, travel_time: Option<f64>) -> f64 {
    let Some(travel_time) = travel_time else {
        return 0.0;
    };
    let over = travel_time - tolerance_minutes;
    if over <= 0.0 {
        4.0
    } else if over <= 10.0 {
        3.0
    } else if over <= 15.0 {
        2.0
    } else if over <= 20.0 {
        1.0
    } else {
        0.0
    }
}

/// Points for local education attainment against the user's target level.
fn education_fit(prefs: &PreferenceConfig, education_score: Option<f64>) -> f64 {
    let Some(score) = education_score else {
        return 0.0;
    };
    #[allow(
        clippy::cast_precision_loss,
        reason = "education ordinals are at most 5"
    )]
    let shortfall = prefs.area.education.ordinal() as f64 - score;
    if shortfall <= 0.0 {
        4.0
    } else if shortfall <= 1.0 {
        3.0
    } else if shortfall <= 2.0 {
        2.0
    } else if shortfall <= 3.0 {
        1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettlementChoice {
    Primary,
    Secondary,
}

/// Points for the location's settlement density against one preference.
///
/// Full points at the preferred density, tapering with ordinal distance;
/// the second choice peaks at half the points of the first.
fn settlement_fit(
    preferred: Settlement,
    actual: Option<Settlement>,
    choice: SettlementChoice,
) -> f64 {
    let Some(actual) = actual else {
        return 0.0;
    };
    let distance = preferred.ordinal().abs_diff(actual.ordinal());
    match choice {
        SettlementChoice::Primary => match distance {
            0 => 4.0,
            1 => 2.0,
            2 => 1.0,
            _ => 0.0,
        },
        SettlementChoice::Secondary => match distance {
            0 => 2.0,
            1 => 1.0,
            _ => 0.0,
        },
    }
}

/// Points and advisory for the user's price target against local home
/// values.
///
/// The advisory fires when the target sits below the local spread
/// entirely, meaning most homes in the area are out of reach.
fn home_price_fit(target: f64, median: Option<f64>, mad: Option<f64>) -> (f64, bool) {
    let (Some(median), Some(mad)) = (median, mad) else {
        return (0.0, false);
    };
    let warning = target < median - mad;
    (target_band_points(target, median, mad), warning)
}

/// Points for the user's income against local household incomes.
fn income_fit(income: f64, median: Option<f64>, mad: Option<f64>) -> f64 {
    let (Some(median), Some(mad)) = (median, mad) else {
        return 0.0;
    };
    target_band_points(income, median, mad)
}

/// Full points inside half a MAD of the local median, half points inside
/// one MAD, nothing beyond.
fn target_band_points(target: f64, median: f64, mad: f64) -> f64 {
    let deviation = (target - median).abs();
    if deviation <= 0.5 * mad {
        10.0
    } else if deviation <= mad {
        5.0
    } else {
        0.0
    }
}
