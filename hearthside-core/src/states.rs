//! Canonical US state names and postal abbreviations.

/// Postal abbreviation paired with the canonical state name, including the
/// District of Columbia.
pub const STATES: [(&str, &str); 51] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Canonical state name for a postal abbreviation, matched
/// case-insensitively.
///
/// # Examples
/// ```
/// use hearthside_core::states::name_for_abbreviation;
///
/// assert_eq!(name_for_abbreviation("ma"), Some("Massachusetts"));
/// assert!(name_for_abbreviation("ZZ").is_none());
/// ```
#[must_use]
pub fn name_for_abbreviation(abbreviation: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(abbr, _)| abbr.eq_ignore_ascii_case(abbreviation))
        .map(|(_, name)| *name)
}

/// Postal abbreviation for a canonical state name, matched
/// case-insensitively.
#[must_use]
pub fn abbreviation_for_name(name: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(_, full)| full.eq_ignore_ascii_case(name))
        .map(|(abbr, _)| *abbr)
}

/// Canonicalise a full state name when it matches exactly
/// (case-insensitively).
#[must_use]
pub fn canonical_name(name: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(_, full)| full.eq_ignore_ascii_case(name))
        .map(|(_, full)| *full)
}
