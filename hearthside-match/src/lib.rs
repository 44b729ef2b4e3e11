//! Per-query preference scoring for the Hearthside engine.
//!
//! A query collects the user's preferences into an immutable
//! [`PreferenceConfig`], resolves anchor locations, narrows the candidate
//! universe geographically, and scores what remains against the shared
//! reference tables. [`QuerySession`] strings those steps together;
//! [`MatchEngine`] is the scoring core for callers that manage their own
//! candidate sets.

#![forbid(unsafe_code)]

mod criteria;
mod disaster;
mod engine;
mod preferences;
mod weather;

pub use engine::{MatchEngine, MatchError, MatchReport, MatchResult, QuerySession, ScoredLocation};
pub use preferences::{
    AreaStage, DisasterStage, EducationLevel, FamilyStage, FinanceStage, Importance,
    PreferenceBuilder, PreferenceConfig, PreferenceError, SeasonPreference, TransportMode,
    WeatherStage, WorkStage,
};
