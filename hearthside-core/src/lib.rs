//! Core domain types for the Hearthside location-matching engine.
//!
//! This crate defines the ordinal [`Band`] scale, the closed [`Metric`]
//! enumeration, the reference-table records shared by the offline ranking
//! pass and the per-query scoring engine, plus the two query-time services
//! that are independent of ranking: geographic radius search and identity
//! resolution of free-text location input.

#![forbid(unsafe_code)]

mod band;
mod metric;
pub mod record;
mod resolver;
mod search;
pub mod states;
mod tables;

pub use band::Band;
pub use metric::{ClassifierKind, Metric};
pub use record::{
    BandSet, BoundaryRing, DisasterKind, DisasterProfile, LocationRecord, MetricValues,
    Passthrough, PrefixClimate, PrefixRecord, RawLocationRecord, RawPrefixRecord, SeverityRank,
    Settlement, StateDisasterRecord, prefix_of,
};
pub use resolver::{ResolveError, ResolvedLocation, Resolver};
pub use search::{
    AnchorSet, AnchorSlot, METERS_PER_MILE, RADIUS_LADDER_MILES, SearchError, anchor_spread,
    radius_from_index, radius_search,
};
pub use tables::{LocationSite, ReferenceTables, TableError};
