//! User preference collection and validation.
//!
//! Preferences are gathered in six themed stages and frozen into an
//! immutable [`PreferenceConfig`] before any scoring happens. The builder
//! rejects incomplete or inconsistent input up front, so the scoring engine
//! never has to guard against a half-filled profile mid-query.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hearthside_core::{Band, DisasterKind, Settlement};

/// Errors raised while assembling a preference profile.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    /// An importance value was outside the 0 to 4 scale.
    #[error("importance {value} is out of range (expected 0 to 4)")]
    ImportanceOutOfRange {
        /// The rejected value.
        value: u8,
    },
    /// A stage was never supplied to the builder.
    #[error("preference stage '{stage}' was not provided")]
    MissingStage {
        /// Name of the missing stage.
        stage: &'static str,
    },
    /// A winter temperature target is required unless a single-season
    /// climate is preferred.
    #[error("a winter temperature target is required for multi-season preferences")]
    MissingWinterTarget,
    /// More than three disaster kinds were listed for avoidance.
    #[error("at most 3 disaster kinds can be avoided, got {count}")]
    TooManyAvoidedKinds {
        /// Number of kinds supplied.
        count: usize,
    },
}

/// How much a criterion matters to the user, on a five-point scale.
///
/// Zero removes the criterion from both the achieved score and the
/// query-specific maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Importance(u8);

impl Importance {
    /// The criterion does not matter at all.
    pub const NONE: Self = Self(0);
    /// The criterion matters as much as a criterion can.
    pub const MAX: Self = Self(4);

    /// Validate a raw importance value.
    ///
    /// # Errors
    /// Returns [`PreferenceError::ImportanceOutOfRange`] for values above 4.
    pub fn new(value: u8) -> Result<Self, PreferenceError> {
        if value > 4 {
            return Err(PreferenceError::ImportanceOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// The multiplier applied to a criterion's points.
    #[must_use]
    pub fn weight(&self) -> f64 {
        f64::from(self.0) / 4.0
    }

    /// Whether the criterion participates in scoring at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0 > 0
    }
}

impl TryFrom<u8> for Importance {
    type Error = PreferenceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Importance> for u8 {
    fn from(importance: Importance) -> Self {
        importance.0
    }
}

/// How the user expects to travel to work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Driving a personal vehicle.
    PersonalVehicle,
    /// Riding public transit.
    PublicTransit,
    /// Walking or cycling.
    WalkOrBike,
    /// Working from home; commuting criteria are skipped entirely.
    WorkFromHome,
}

/// Highest education level the user wants well represented locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    /// No schooling completed.
    None,
    /// High-school diploma or equivalent.
    HighSchool,
    /// Some college or an associate degree.
    SomeCollege,
    /// Bachelor's degree.
    Bachelors,
    /// Master's degree.
    Masters,
    /// Doctorate or professional degree.
    Doctorate,
}

impl EducationLevel {
    /// Zero-based position on the attainment ladder.
    #[must_use]
    pub fn ordinal(&self) -> usize {
        match self {
            Self::None => 0,
            Self::HighSchool => 1,
            Self::SomeCollege => 2,
            Self::Bachelors => 3,
            Self::Masters => 4,
            Self::Doctorate => 5,
        }
    }
}

/// How many distinct seasons the user wants in a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonPreference {
    /// Stable year-round climate.
    One,
    /// A warm season and a cool season.
    Two,
    /// Four distinct seasons.
    Four,
}

/// Household composition preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FamilyStage {
    /// Whether the user is married or partnered.
    pub married: bool,
    /// How much being among similar households matters.
    pub married_importance: Importance,
    /// Whether children live in the household.
    pub children: bool,
    /// How much being among families with children matters.
    pub children_importance: Importance,
    /// How much strong school enrollment matters.
    pub school_importance: Importance,
}

/// Employment and commuting preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkStage {
    /// Whether the user will be working locally. When false, employment
    /// and commuting criteria are removed from the score and its maximum.
    pub seeking: bool,
    /// How much a strong local employment share matters.
    pub employment_importance: Importance,
    /// Expected mode of travel to work.
    pub transport: TransportMode,
    /// Longest acceptable one-way commute in minutes.
    pub commute_tolerance_minutes: f64,
}

/// Financial targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinanceStage {
    /// Expected annual household income in dollars.
    pub income: f64,
    /// Highest affordable home price in dollars.
    pub affordable_home_price: f64,
}

/// Education and settlement-density preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaStage {
    /// Attainment level the user wants well represented.
    pub education: EducationLevel,
    /// How much local education attainment matters.
    pub education_importance: Importance,
    /// Most preferred settlement density.
    pub settlement_first: Settlement,
    /// Second-choice settlement density.
    pub settlement_second: Settlement,
}

/// Climate preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherStage {
    /// Preferred number of distinct seasons.
    pub seasons: SeasonPreference,
    /// Ideal summer (or year-round) temperature in degrees Fahrenheit.
    pub summer_temperature: f64,
    /// Ideal winter temperature in degrees Fahrenheit. Required unless a
    /// single-season climate is preferred.
    pub winter_temperature: Option<f64>,
    /// Preferred precipitation level relative to the national distribution.
    pub precipitation: Band,
    /// Preferred sunshine level relative to the national distribution.
    pub sunshine: Band,
}

/// Natural-disaster risk preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterStage {
    /// How much low disaster exposure matters overall.
    pub risk_weight: Importance,
    /// Up to three disaster kinds the user most wants to avoid, in
    /// priority order.
    pub avoid: Vec<DisasterKind>,
}

/// A complete, validated preference profile.
///
/// Construct through [`PreferenceConfig::builder`]; all six stages must be
/// supplied before [`PreferenceBuilder::build`] succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceConfig {
    /// Household composition.
    pub family: FamilyStage,
    /// Employment and commuting.
    pub work: WorkStage,
    /// Financial targets.
    pub finance: FinanceStage,
    /// Education and settlement density.
    pub area: AreaStage,
    /// Climate.
    pub weather: WeatherStage,
    /// Natural-disaster risk.
    pub disaster: DisasterStage,
}

impl PreferenceConfig {
    /// Start collecting a preference profile.
    #[must_use]
    pub fn builder() -> PreferenceBuilder {
        PreferenceBuilder::default()
    }
}

/// Staged collector for a [`PreferenceConfig`].
#[derive(Debug, Clone, Default)]
pub struct PreferenceBuilder {
    family: Option<FamilyStage>,
    work: Option<WorkStage>,
    finance: Option<FinanceStage>,
    area: Option<AreaStage>,
    weather: Option<WeatherStage>,
    disaster: Option<DisasterStage>,
}

impl PreferenceBuilder {
    /// Record the household-composition stage.
    #[must_use]
    pub fn family(mut self, stage: FamilyStage) -> Self {
        self.family = Some(stage);
        self
    }

    /// Record the employment stage.
    #[must_use]
    pub fn work(mut self, stage: WorkStage) -> Self {
        self.work = Some(stage);
        self
    }

    /// Record the financial stage.
    #[must_use]
    pub fn finance(mut self, stage: FinanceStage) -> Self {
        self.finance = Some(stage);
        self
    }

    /// Record the education and settlement stage.
    #[must_use]
    pub fn area(mut self, stage: AreaStage) -> Self {
        self.area = Some(stage);
        self
    }

    /// Record the climate stage.
    #[must_use]
    pub fn weather(mut self, stage: WeatherStage) -> Self {
        self.weather = Some(stage);
        self
    }

    /// Record the disaster-risk stage.
    #[must_use]
    pub fn disaster(mut self, stage: DisasterStage) -> Self {
        self.disaster = Some(stage);
        self
    }

    /// Freeze the collected stages into an immutable profile.
    ///
    /// # Errors
    /// Returns [`PreferenceError::MissingStage`] when any stage is absent,
    /// [`PreferenceError::MissingWinterTarget`] when a multi-season
    /// preference has no winter temperature, and
    /// [`PreferenceError::TooManyAvoidedKinds`] when more than three
    /// disaster kinds are listed.
    pub fn build(self) -> Result<PreferenceConfig, PreferenceError> {
        let family = self
            .family
            .ok_or(PreferenceError::MissingStage { stage: "family" })?;
        let work = self
            .work
            .ok_or(PreferenceError::MissingStage { stage: "work" })?;
        let finance = self
            .finance
            .ok_or(PreferenceError::MissingStage { stage: "finance" })?;
        let area = self
            .area
            .ok_or(PreferenceError::MissingStage { stage: "area" })?;
        let weather = self
            .weather
            .ok_or(PreferenceError::MissingStage { stage: "weather" })?;
        let disaster = self
            .disaster
            .ok_or(PreferenceError::MissingStage { stage: "disaster" })?;

        if weather.seasons != SeasonPreference::One && weather.winter_temperature.is_none() {
            return Err(PreferenceError::MissingWinterTarget);
        }
        if disaster.avoid.len() > 3 {
            return Err(PreferenceError::TooManyAvoidedKinds {
                count: disaster.avoid.len(),
            });
        }

        Ok(PreferenceConfig {
            family,
            work,
            finance,
            area,
            weather,
            disaster,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::sample_config;
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0.0)]
    #[case(1, 0.25)]
    #[case(2, 0.5)]
    #[case(3, 0.75)]
    #[case(4, 1.0)]
    fn importance_weights_step_by_quarters(#[case] raw: u8, #[case] expected: f64) {
        let importance = Importance::new(raw).expect("in range");
        assert_eq!(importance.weight(), expected);
    }

    #[test]
    fn importance_rejects_out_of_range() {
        assert_eq!(
            Importance::new(5),
            Err(PreferenceError::ImportanceOutOfRange { value: 5 })
        );
    }

    #[test]
    fn builder_requires_every_stage() {
        let err = PreferenceConfig::builder()
            .finance(FinanceStage {
                income: 60_000.0,
                affordable_home_price: 250_000.0,
            })
            .build()
            .expect_err("incomplete profile");
        assert_eq!(err, PreferenceError::MissingStage { stage: "family" });
    }

    #[test]
    fn multi_season_preference_requires_winter_target() {
        let mut config = sample_config();
        config.weather.winter_temperature = None;
        let err = PreferenceConfig::builder()
            .family(config.family)
            .work(config.work)
            .finance(config.finance)
            .area(config.area)
            .weather(config.weather)
            .disaster(config.disaster)
            .build()
            .expect_err("winter target required");
        assert_eq!(err, PreferenceError::MissingWinterTarget);
    }

    #[test]
    fn single_season_preference_needs_no_winter_target() {
        let mut config = sample_config();
        config.weather.seasons = SeasonPreference::One;
        config.weather.winter_temperature = None;
        let rebuilt = PreferenceConfig::builder()
            .family(config.family)
            .work(config.work)
            .finance(config.finance)
            .area(config.area)
            .weather(config.weather)
            .disaster(config.disaster)
            .build();
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn at_most_three_avoided_kinds() {
        let mut config = sample_config();
        config.disaster.avoid = vec![
            DisasterKind::Tornado,
            DisasterKind::Flood,
            DisasterKind::Wildfire,
            DisasterKind::Earthquake,
        ];
        let err = PreferenceConfig::builder()
            .family(config.family)
            .work(config.work)
            .finance(config.finance)
            .area(config.area)
            .weather(config.weather)
            .disaster(config.disaster)
            .build()
            .expect_err("too many kinds");
        assert_eq!(err, PreferenceError::TooManyAvoidedKinds { count: 4 });
    }
}
