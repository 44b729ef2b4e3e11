//! Deviation-ratio band classifiers.
//!
//! Both variants are pure functions of the standardized deviation ratio
//! `r = (value − center) / spread`. The symmetric variant (median/MAD) is
//! used for roughly symmetric distributions; the skewed variant
//! (mean/standard deviation) allocates finer resolution near the low end
//! for behaviours that cluster near zero nationally, where symmetric bands
//! would be uninformative.
//!
//! The cut points are calibration constants: symmetric bands switch at
//! ±0.5 and ±2.0, skewed bands at −0.75, −0.25, 0.5, and 1.5. A missing or
//! zero raw value means "not applicable" upstream and classifies as no
//! band, as does a zero spread (no discriminating power).

use hearthside_core::{Band, ClassifierKind};

use crate::stats::StatsSummary;

/// Symmetric cut point between `Average` and the adjacent bands.
pub const SYMMETRIC_NEAR_CUT: f64 = 0.5;
/// Symmetric cut point between the adjacent and the extreme bands.
pub const SYMMETRIC_FAR_CUT: f64 = 2.0;

/// Classify a symmetric deviation ratio into a band.
#[must_use]
pub fn symmetric_band(ratio: f64) -> Band {
    if ratio < -SYMMETRIC_FAR_CUT {
        Band::WellBelowAverage
    } else if ratio < -SYMMETRIC_NEAR_CUT {
        Band::BelowAverage
    } else if ratio < SYMMETRIC_NEAR_CUT {
        Band::Average
    } else if ratio < SYMMETRIC_FAR_CUT {
        Band::AboveAverage
    } else {
        Band::WellAboveAverage
    }
}

/// Classify a right-skew-adjusted deviation ratio into a band.
///
/// The cut points are asymmetric: most locations sit below the mean for
/// these metrics, so the lower half of the scale is sliced more finely.
#[must_use]
pub fn skewed_band(ratio: f64) -> Band {
    if ratio < -0.75 {
        Band::WellBelowAverage
    } else if ratio < -0.25 {
        Band::BelowAverage
    } else if ratio < 0.5 {
        Band::Average
    } else if ratio < 1.5 {
        Band::AboveAverage
    } else {
        Band::WellAboveAverage
    }
}

/// Classify a raw metric value against a national summary.
///
/// Returns `None` when the value is missing (zero or non-finite) or the
/// summary's spread is zero.
#[must_use]
pub fn classify(value: f64, summary: &StatsSummary, kind: ClassifierKind) -> Option<Band> {
    if value == 0.0 || !value.is_finite() {
        return None;
    }
    let spread = summary.spread(kind);
    if spread <= 0.0 {
        return None;
    }
    let ratio = (value - summary.center(kind)) / spread;
    Some(match kind {
        ClassifierKind::Symmetric => symmetric_band(ratio),
        ClassifierKind::Skewed => skewed_band(ratio),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearthside_core::Metric;
    use rstest::rstest;

    fn summary(median: f64, mad: f64, mean: f64, std_dev: f64) -> StatsSummary {
        StatsSummary {
            metric: Metric::MarriedShare,
            median,
            mad,
            mean,
            std_dev,
        }
    }

    #[rstest]
    #[case(-3.0, Band::WellBelowAverage)]
    #[case(-2.0, Band::BelowAverage)]
    #[case(-0.5, Band::Average)]
    #[case(0.0, Band::Average)]
    #[case(0.49, Band::Average)]
    #[case(0.5, Band::AboveAverage)]
    #[case(1.99, Band::AboveAverage)]
    #[case(2.0, Band::WellAboveAverage)]
    fn symmetric_cut_points(#[case] ratio: f64, #[case] expected: Band) {
        assert_eq!(symmetric_band(ratio), expected);
    }

    #[rstest]
    #[case(-1.0, Band::WellBelowAverage)]
    #[case(-0.5, Band::BelowAverage)]
    #[case(-0.25, Band::Average)]
    #[case(0.3, Band::Average)]
    #[case(0.5, Band::AboveAverage)]
    #[case(1.5, Band::WellAboveAverage)]
    fn skewed_cut_points(#[case] ratio: f64, #[case] expected: Band) {
        assert_eq!(skewed_band(ratio), expected);
    }

    #[test]
    fn married_share_scenario_hits_top_band() {
        // National median 45, MAD 5, location value 60: ratio 3.0.
        let summary = summary(45.0, 5.0, 46.0, 7.0);
        assert_eq!(
            classify(60.0, &summary, ClassifierKind::Symmetric),
            Some(Band::WellAboveAverage)
        );
    }

    #[test]
    fn missing_value_classifies_as_no_band() {
        let summary = summary(45.0, 5.0, 46.0, 7.0);
        assert_eq!(classify(0.0, &summary, ClassifierKind::Symmetric), None);
        assert_eq!(classify(f64::NAN, &summary, ClassifierKind::Symmetric), None);
    }

    #[test]
    fn zero_spread_short_circuits() {
        let summary = summary(45.0, 0.0, 45.0, 0.0);
        assert_eq!(classify(60.0, &summary, ClassifierKind::Symmetric), None);
        assert_eq!(classify(60.0, &summary, ClassifierKind::Skewed), None);
    }
}
