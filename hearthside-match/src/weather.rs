//! Climate fit scoring.
//!
//! Climate varies at the regional-prefix level, not per postal code, so the
//! scores are computed once per prefix and shared by every candidate inside
//! it. Season count, temperature targets, precipitation, and sunshine each
//! contribute points; temperature comparisons multiply with the season
//! preference because a four-season climate has more temperature targets to
//! satisfy than a stable one.

use std::collections::BTreeMap;
use std::collections::HashMap;

use hearthside_core::{Band, PrefixClimate};

use crate::preferences::{SeasonPreference, WeatherStage};

/// Best points for the season-count criterion.
const SEASON_MAX: f64 = 4.0;
/// Best points per temperature comparison.
const TEMPERATURE_COMPARISON_MAX: f64 = 3.0;
/// Best points each for precipitation and sunshine.
const BAND_PREFERENCE_MAX: f64 = 4.0;

/// Climate fit per regional prefix for one query.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WeatherScores {
    by_prefix: HashMap<String, f64>,
    max_score: f64,
}

impl WeatherScores {
    /// Score every climate-covered prefix against the profile.
    pub(crate) fn compute(
        stage: &WeatherStage,
        climate: &BTreeMap<String, PrefixClimate>,
    ) -> Self {
        let by_prefix = climate
            .iter()
            .map(|(prefix, entry)| (prefix.clone(), score_prefix(stage, entry)))
            .collect();
        Self {
            by_prefix,
            max_score: max_score(stage),
        }
    }

    /// The climate score for a prefix; a prefix with no climate entry
    /// earns nothing.
    pub(crate) fn get(&self, prefix: &str) -> f64 {
        self.by_prefix.get(prefix).copied().unwrap_or(0.0)
    }

    /// The best climate score any prefix could earn for this profile.
    pub(crate) fn max(&self) -> f64 {
        self.max_score
    }
}

fn max_score(stage: &WeatherStage) -> f64 {
    let comparisons = f64::from(temperature_comparisons(stage.seasons));
    SEASON_MAX + comparisons * TEMPERATURE_COMPARISON_MAX + 2.0 * BAND_PREFERENCE_MAX
}

/// Number of temperature targets a season preference implies.
fn temperature_comparisons(seasons: SeasonPreference) -> u8 {
    match seasons {
        SeasonPreference::One => 1,
        SeasonPreference::Two => 2,
        SeasonPreference::Four => 3,
    }
}

fn score_prefix(stage: &WeatherStage, climate: &PrefixClimate) -> f64 {
    season_points(stage.seasons, climate.seasons)
        + temperature_points(stage, climate)
        + band_points(stage.precipitation, climate.precipitation)
        + band_points(stage.sunshine, climate.sunshine)
}

/// Points for the prefix's season count against the preference.
///
/// A two-season region is a tolerable compromise from either extreme, so
/// it earns partial credit in every row.
fn season_points(preference: SeasonPreference, actual: u8) -> f64 {
    match preference {
        SeasonPreference::Four => match actual {
            4 => 4.0,
            2 => 2.0,
            _ => 0.0,
        },
        SeasonPreference::Two => {
            if actual == 2 {
                4.0
            } else {
                2.0
            }
        }
        SeasonPreference::One => match actual {
            1 => 4.0,
            2 => 2.0,
            _ => 0.0,
        },
    }
}

/// Points across the temperature targets the season preference implies.
///
/// A single-season preference compares the one ideal temperature against
/// the annual mean; two seasons compare summer and winter targets against
/// the seasonal extremes; four seasons additionally compare the midpoint
/// of the two targets against the annual mean.
fn temperature_points(stage: &WeatherStage, climate: &PrefixClimate) -> f64 {
    match stage.seasons {
        SeasonPreference::One => {
            closeness_points(stage.summer_temperature, climate.average_temperature)
        }
        SeasonPreference::Two => {
            let winter = stage.winter_temperature.unwrap_or(stage.summer_temperature);
            closeness_points(stage.summer_temperature, climate.max_temperature)
                + closeness_points(winter, climate.min_temperature)
        }
        SeasonPreference::Four => {
            let winter = stage.winter_temperature.unwrap_or(stage.summer_temperature);
            let midpoint = f64::midpoint(stage.summer_temperature, winter);
            closeness_points(stage.summer_temperature, climate.max_temperature)
                + closeness_points(winter, climate.min_temperature)
                + closeness_points(midpoint, climate.average_temperature)
        }
    }
}

/// Points for one temperature target, banded by how far the region's
/// figure sits from it.
fn closeness_points(target: f64, actual: f64) -> f64 {
    let difference = (target - actual).abs();
    if difference <= 5.0 {
        3.0
    } else if difference <= 10.0 {
        2.0
    } else if difference <= 15.0 {
        1.0
    } else {
        0.0
    }
}

/// Points for a banded climate preference (precipitation or sunshine).
///
/// Full points on an exact band match, half for an adjacent band, nothing
/// further out.
fn band_points(preferred: Band, actual: Band) -> f64 {
    match preferred.distance(&actual) {
        0 => 4.0,
        1 => 2.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn four_season_stage() -> WeatherStage {
        WeatherStage {
            seasons: SeasonPreference::Four,
            summer_temperature: 82.0,
            winter_temperature: Some(30.0),
            precipitation: Band::Average,
            sunshine: Band::AboveAverage,
        }
    }

    fn matching_climate() -> PrefixClimate {
        PrefixClimate {
            seasons: 4,
            average_temperature: 56.0,
            min_temperature: 30.0,
            max_temperature: 82.0,
            precipitation: Band::Average,
            sunshine: Band::AboveAverage,
        }
    }

    #[test]
    fn perfect_match_earns_the_maximum() {
        let stage = four_season_stage();
        let climate = BTreeMap::from([("011".to_owned(), matching_climate())]);
        let scores = WeatherScores::compute(&stage, &climate);
        assert_eq!(scores.get("011"), scores.max());
        // 4 (seasons) + 3 × 3 (temperatures) + 4 + 4 (bands).
        assert_eq!(scores.max(), 21.0);
    }

    #[rstest]
    #[case(SeasonPreference::Four, 4, 4.0)]
    #[case(SeasonPreference::Four, 2, 2.0)]
    #[case(SeasonPreference::Four, 1, 0.0)]
    #[case(SeasonPreference::Two, 2, 4.0)]
    #[case(SeasonPreference::Two, 4, 2.0)]
    #[case(SeasonPreference::One, 1, 4.0)]
    #[case(SeasonPreference::One, 2, 2.0)]
    #[case(SeasonPreference::One, 4, 0.0)]
    fn season_points_table(
        #[case] preference: SeasonPreference,
        #[case] actual: u8,
        #[case] expected: f64,
    ) {
        assert_eq!(season_points(preference, actual), expected);
    }

    #[rstest]
    #[case(82.0, 80.0, 3.0)]
    #[case(82.0, 74.0, 2.0)]
    #[case(82.0, 70.0, 1.0)]
    #[case(82.0, 60.0, 0.0)]
    fn temperature_closeness_bands(
        #[case] target: f64,
        #[case] actual: f64,
        #[case] expected: f64,
    ) {
        assert_eq!(closeness_points(target, actual), expected);
    }

    #[test]
    fn adjacent_band_earns_half_credit() {
        assert_eq!(band_points(Band::Average, Band::Average), 4.0);
        assert_eq!(band_points(Band::Average, Band::AboveAverage), 2.0);
        assert_eq!(band_points(Band::Average, Band::WellAboveAverage), 0.0);
    }

    #[test]
    fn single_season_profile_has_a_smaller_maximum() {
        let four = WeatherScores::compute(&four_season_stage(), &BTreeMap::new());
        let stage = WeatherStage {
            seasons: SeasonPreference::One,
            winter_temperature: None,
            ..four_season_stage()
        };
        let one = WeatherScores::compute(&stage, &BTreeMap::new());
        assert_eq!(four.max() - one.max(), 2.0 * 3.0);
    }

    #[test]
    fn unknown_prefix_earns_nothing() {
        let scores = WeatherScores::compute(&four_season_stage(), &BTreeMap::new());
        assert_eq!(scores.get("999"), 0.0);
    }
}
