//! Facade crate for the Hearthside location-matching engine.
//!
//! This crate re-exports the domain types from `hearthside-core`, the
//! offline national ranking pass from `hearthside-rank`, and the per-query
//! scoring engine from `hearthside-match`.

#![forbid(unsafe_code)]

pub use hearthside_core::{
    AnchorSet, AnchorSlot, Band, ClassifierKind, LocationRecord, LocationSite, Metric,
    PrefixRecord, ReferenceTables, ResolveError, Resolver, ResolvedLocation, SearchError,
    Settlement, anchor_spread, radius_from_index, radius_search,
};

pub use hearthside_rank::{
    NationalSummaries, RankError, RankedTables, RawDataset, StatsError, StatsSummary, rank_nation,
    summarize, write_ranked_tables,
};

pub use hearthside_match::{
    AreaStage, DisasterStage, EducationLevel, FamilyStage, FinanceStage, Importance, MatchEngine,
    MatchError, MatchReport, MatchResult, PreferenceConfig, PreferenceError, QuerySession,
    ScoredLocation, SeasonPreference, TransportMode, WeatherStage, WorkStage,
};
