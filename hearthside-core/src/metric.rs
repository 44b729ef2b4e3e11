//! The closed set of nationally ranked metrics.
//!
//! Every banded criterion is identified by a [`Metric`] variant rather than
//! an interpolated field name, so a misspelt key is a compile error instead
//! of a run-time lookup failure. Pass-through numerics (income, home value,
//! travel time) are not listed here because they are compared directly
//! against user-specified targets.

use serde::{Deserialize, Serialize};

/// Which classifier a metric's national distribution calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassifierKind {
    /// Median-centred, MAD-spread classification for roughly symmetric
    /// distributions.
    Symmetric,
    /// Mean-centred, standard-deviation-spread classification for
    /// right-skewed, lower-prevalence behaviours.
    Skewed,
}

/// A nationally ranked demographic or commuting metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Share of married residents.
    MarriedShare,
    /// Share of families with children at home.
    FamiliesWithChildren,
    /// Share of occupied housing units.
    HomeOccupancy,
    /// Share of residents in employment.
    EmploymentShare,
    /// Share of school-age residents enrolled in school.
    SchoolEnrollment,
    /// Share of workers commuting by personal vehicle.
    MotorVehicleCommute,
    /// Share of workers commuting by public transit.
    TransitCommute,
    /// Share of workers walking or cycling to work.
    WalkBikeCommute,
}

impl Metric {
    /// All tracked metrics, in table order.
    pub const ALL: [Self; 8] = [
        Self::MarriedShare,
        Self::FamiliesWithChildren,
        Self::HomeOccupancy,
        Self::EmploymentShare,
        Self::SchoolEnrollment,
        Self::MotorVehicleCommute,
        Self::TransitCommute,
        Self::WalkBikeCommute,
    ];

    /// Key used for this metric in the reference datasets.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarriedShare => "married_share",
            Self::FamiliesWithChildren => "families_with_children",
            Self::HomeOccupancy => "home_occupancy",
            Self::EmploymentShare => "employment_share",
            Self::SchoolEnrollment => "school_enrollment",
            Self::MotorVehicleCommute => "motor_vehicle_commute",
            Self::TransitCommute => "transit_commute",
            Self::WalkBikeCommute => "walk_bike_commute",
        }
    }

    /// The classifier designated for this metric.
    ///
    /// Transit and walk/bike commute shares cluster near zero nationally, so
    /// they use the skewed classifier; everything else is close enough to
    /// symmetric for the median/MAD variant.
    #[must_use]
    pub fn classifier(&self) -> ClassifierKind {
        match self {
            Self::TransitCommute | Self::WalkBikeCommute => ClassifierKind::Skewed,
            _ => ClassifierKind::Symmetric,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
