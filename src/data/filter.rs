use std::collections::BTreeSet;

use super::model::{ProviderRecord, Roster};

// ---------------------------------------------------------------------------
// Query: name pattern plus the selected option sets
// ---------------------------------------------------------------------------

/// What the user has typed and ticked.
/// An empty pattern or an empty set means "no constraint" for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub name_pattern: String,
    pub employment_types: BTreeSet<String>,
    pub subspecialties: BTreeSet<String>,
}

impl Query {
    /// Whether the query lets every record through.
    pub fn is_empty(&self) -> bool {
        self.name_pattern.is_empty()
            && self.employment_types.is_empty()
            && self.subspecialties.is_empty()
    }

    /// Compile into a matcher; lowercases the pattern once.
    pub fn matcher(&self) -> Matcher<'_> {
        Matcher {
            needle: self.name_pattern.to_lowercase(),
            query: self,
        }
    }
}

/// A [`Query`] ready to test records against.
pub struct Matcher<'q> {
    needle: String,
    query: &'q Query,
}

impl Matcher<'_> {
    /// A record passes when all three conditions hold:
    /// * its name contains the pattern, ignoring case
    /// * no employment type is selected, or its clean type is selected
    /// * no subspecialty is selected, or it has at least one selected tag
    pub fn matches(&self, record: &ProviderRecord) -> bool {
        let name_ok =
            self.needle.is_empty() || record.name.to_lowercase().contains(&self.needle);
        let employment_ok = self.query.employment_types.is_empty()
            || self
                .query
                .employment_types
                .contains(&record.employment_type_clean);
        let subspecialty_ok = self.query.subspecialties.is_empty()
            || !record
                .subspecialty_tags
                .is_disjoint(&self.query.subspecialties);

        name_ok && employment_ok && subspecialty_ok
    }
}

/// Matching records in input order.
pub fn filter<'a>(records: &'a [ProviderRecord], query: &Query) -> Vec<&'a ProviderRecord> {
    let matcher = query.matcher();
    records.iter().filter(|r| matcher.matches(r)).collect()
}

/// Return indices of providers that pass the query, in roster order.
pub fn filtered_indices(roster: &Roster, query: &Query) -> Vec<usize> {
    if query.is_empty() {
        return (0..roster.len()).collect();
    }
    let matcher = query.matcher();
    roster
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| matcher.matches(r))
        .map(|(i, _)| i)
        .collect()
}
