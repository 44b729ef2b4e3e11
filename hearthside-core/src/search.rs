//! Geographic candidate search around user anchors.
//!
//! Distances are great-circle (haversine) via the `geo` crate, converted to
//! statute miles. With multiple anchors a candidate must fall within the
//! radius of **every** anchor: the result is the intersection of the
//! single-anchor radius sets, not their union.

use geo::{Distance, Haversine, Point};
use thiserror::Error;

use crate::tables::LocationSite;

/// Fixed ladder of selectable search radii, in statute miles.
pub const RADIUS_LADDER_MILES: [f64; 6] = [10.0, 20.0, 40.0, 60.0, 100.0, 200.0];

/// Metres per statute mile, used to convert haversine distances.
pub const METERS_PER_MILE: f64 = 1_609.344;

/// Errors raised while validating search input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The radius index fell outside the fixed ladder.
    #[error(
        "radius index {index} is out of range (the ladder has {} steps)",
        RADIUS_LADDER_MILES.len()
    )]
    RadiusIndexOutOfRange {
        /// Index supplied by the caller.
        index: usize,
    },
    /// No anchors were supplied to the search.
    #[error("at least one anchor is required for a radius search")]
    NoAnchors,
}

/// Anchor slots a resolved location may be stored into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorSlot {
    /// The family home location.
    FamilyHome,
    /// The workplace location.
    Work,
    /// A secondary location of the user's choosing.
    Secondary,
}

impl AnchorSlot {
    /// Map a caller-supplied index 0–2 onto a slot.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::FamilyHome),
            1 => Some(Self::Work),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }

    fn position(self) -> usize {
        match self {
            Self::FamilyHome => 0,
            Self::Work => 1,
            Self::Secondary => 2,
        }
    }
}

/// Up to three anchor coordinates accumulated during identity resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorSet {
    slots: [Option<Point>; 3],
}

impl AnchorSet {
    /// Construct an empty anchor set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a coordinate in the given slot, replacing any previous anchor.
    pub fn place(&mut self, slot: AnchorSlot, point: Point) {
        self.slots[slot.position()] = Some(point);
    }

    /// The anchor stored in a slot, if any.
    #[must_use]
    pub fn get(&self, slot: AnchorSlot) -> Option<Point> {
        self.slots[slot.position()]
    }

    /// All occupied anchors in slot order.
    #[must_use]
    pub fn active(&self) -> Vec<Point> {
        self.slots.iter().flatten().copied().collect()
    }

    /// Report whether no anchors have been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

/// Look up a radius from the fixed ladder by index.
///
/// # Errors
/// Returns [`SearchError::RadiusIndexOutOfRange`] when `index` does not name
/// a ladder step.
pub fn radius_from_index(index: usize) -> Result<f64, SearchError> {
    RADIUS_LADDER_MILES
        .get(index)
        .copied()
        .ok_or(SearchError::RadiusIndexOutOfRange { index })
}

/// Filter `sites` to those within `radius_miles` of every anchor.
///
/// Requires one to three anchors; a query that never resolved an anchor
/// has no centre to search around. An empty result is a recoverable
/// condition for the caller to surface ("widen radius or change
/// locations"), not an error.
///
/// # Errors
/// Returns [`SearchError::NoAnchors`] when `anchors` is empty.
pub fn radius_search<'a>(
    radius_miles: f64,
    sites: impl IntoIterator<Item = &'a LocationSite>,
    anchors: &[Point],
) -> Result<Vec<LocationSite>, SearchError> {
    if anchors.is_empty() {
        return Err(SearchError::NoAnchors);
    }
    let matches: Vec<LocationSite> = sites
        .into_iter()
        .filter(|site| {
            anchors
                .iter()
                .all(|anchor| distance_miles(*anchor, site.point()) <= radius_miles)
        })
        .cloned()
        .collect();
    log::debug!(
        "radius search at {radius_miles} mi with {} anchor(s) matched {} site(s)",
        anchors.len(),
        matches.len(),
    );
    Ok(matches)
}

/// Maximum great-circle distance, in miles, from the anchors' centroid to
/// any anchor.
///
/// Flags implausibly far-apart anchor selections. Defined for 2–3 anchors;
/// returns `0.0` for fewer.
#[must_use]
pub fn anchor_spread(anchors: &[Point]) -> f64 {
    if anchors.len() < 2 {
        return 0.0;
    }
    #[allow(
        clippy::cast_precision_loss,
        reason = "anchor counts are at most three"
    )]
    let count = anchors.len() as f64;
    let centroid = Point::new(
        anchors.iter().copied().map(Point::x).sum::<f64>() / count,
        anchors.iter().copied().map(Point::y).sum::<f64>() / count,
    );
    anchors
        .iter()
        .map(|anchor| distance_miles(centroid, *anchor))
        .fold(0.0, f64::max)
}

fn distance_miles(a: Point, b: Point) -> f64 {
    Haversine.distance(a, b) / METERS_PER_MILE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // One degree of latitude is roughly 69.09 statute miles under the
    // haversine sphere, so these offsets sit comfortably inside/outside the
    // tested radii.
    const DEG_LAT_PER_MILE: f64 = 1.0 / 69.09;

    fn site(name: &str, zipcode: &str, latitude: f64, longitude: f64) -> LocationSite {
        LocationSite {
            name: name.into(),
            zipcode: zipcode.into(),
            latitude,
            longitude,
        }
    }

    #[rstest]
    #[case(0, 10.0)]
    #[case(3, 60.0)]
    #[case(5, 200.0)]
    fn ladder_lookup_by_index(#[case] index: usize, #[case] expected: f64) {
        assert_eq!(radius_from_index(index), Ok(expected));
    }

    #[test]
    fn ladder_rejects_out_of_range_index() {
        assert_eq!(
            radius_from_index(6),
            Err(SearchError::RadiusIndexOutOfRange { index: 6 })
        );
    }

    #[test]
    fn single_anchor_keeps_near_and_drops_far() {
        let anchor = Point::new(-72.5, 42.1);
        let near = site("Nearby", "01001", 42.1 + 15.0 * DEG_LAT_PER_MILE, -72.5);
        let far = site("Farther", "01002", 42.1 + 25.0 * DEG_LAT_PER_MILE, -72.5);
        let sites = vec![near.clone(), far];

        let found = radius_search(20.0, &sites, &[anchor]).expect("anchored search");

        assert_eq!(found, vec![near]);
    }

    #[test]
    fn two_anchors_intersect_radius_sets() {
        let home = Point::new(-72.5, 42.1);
        let work = Point::new(-72.5, 42.1 + 30.0 * DEG_LAT_PER_MILE);
        // Near the home anchor only.
        let near_home = site("NearHome", "01003", 42.1 + 2.0 * DEG_LAT_PER_MILE, -72.5);
        // Between the anchors, within 20 miles of both.
        let midway = site("Midway", "01004", 42.1 + 15.0 * DEG_LAT_PER_MILE, -72.5);
        let sites = vec![near_home.clone(), midway.clone()];

        let both = radius_search(20.0, &sites, &[home, work]).expect("anchored search");
        let home_only = radius_search(20.0, &sites, &[home]).expect("anchored search");

        assert_eq!(both, vec![midway]);
        // Intersection is a subset of any single-anchor result.
        assert!(both.iter().all(|s| home_only.contains(s)));
    }

    #[test]
    fn zero_anchors_is_a_validation_error() {
        let sites = vec![site("A", "01005", 42.0, -72.0), site("B", "98101", 47.6, -122.3)];
        assert_eq!(radius_search(10.0, &sites, &[]), Err(SearchError::NoAnchors));
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let anchor = Point::new(-72.5, 42.1);
        let far = site("Far", "98101", 47.6, -122.3);
        let found = radius_search(10.0, &[far], &[anchor]).expect("anchored search");
        assert!(found.is_empty());
    }

    #[test]
    fn spread_requires_two_anchors() {
        assert_eq!(anchor_spread(&[]), 0.0);
        assert_eq!(anchor_spread(&[Point::new(-72.5, 42.1)]), 0.0);
    }

    #[test]
    fn spread_of_symmetric_pair_is_half_their_separation() {
        let a = Point::new(-72.5, 42.0);
        let b = Point::new(-72.5, 42.0 + 40.0 * DEG_LAT_PER_MILE);
        let spread = anchor_spread(&[a, b]);
        assert!((spread - 20.0).abs() < 0.5, "spread was {spread}");
    }

    #[test]
    fn anchor_slots_map_indices() {
        assert_eq!(AnchorSlot::from_index(0), Some(AnchorSlot::FamilyHome));
        assert_eq!(AnchorSlot::from_index(2), Some(AnchorSlot::Secondary));
        assert_eq!(AnchorSlot::from_index(3), None);
    }

    #[test]
    fn anchor_set_tracks_occupancy() {
        let mut anchors = AnchorSet::new();
        assert!(anchors.is_empty());
        anchors.place(AnchorSlot::Work, Point::new(-72.5, 42.1));
        assert_eq!(anchors.active().len(), 1);
        assert!(anchors.get(AnchorSlot::FamilyHome).is_none());
    }
}
