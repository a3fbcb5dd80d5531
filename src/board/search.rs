use std::cmp::Ordering;

use crate::board::store::TargetStore;
use crate::model::target::Target;

/// Case-insensitive substring match over the fixed searchable field set
/// (organization, address, phone, grade, status). An empty query matches
/// everything — clearing the search restores full visibility.
pub fn matches(target: &Target, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    target.searchable_text().contains(&query)
}

/// Sortable card fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Organization,
    Population,
    MedianIncome,
}

impl SortField {
    pub const ALL: [SortField; 3] = [
        SortField::Organization,
        SortField::Population,
        SortField::MedianIncome,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortField::Organization => "organization",
            SortField::Population => "population",
            SortField::MedianIncome => "median income",
        }
    }

    pub fn parse(s: &str) -> Option<SortField> {
        match s.to_lowercase().as_str() {
            "organization" | "org" | "name" => Some(SortField::Organization),
            "population" | "pop" => Some(SortField::Population),
            "median_income" | "income" => Some(SortField::MedianIncome),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

fn compare(a: &Target, b: &Target, field: SortField) -> Ordering {
    match field {
        SortField::Organization => a
            .organization
            .to_lowercase()
            .cmp(&b.organization.to_lowercase()),
        // Missing or invalid numbers coerce to 0 for ordering.
        SortField::Population => a.population.unwrap_or(0).cmp(&b.population.unwrap_or(0)),
        SortField::MedianIncome => a
            .median_income
            .unwrap_or(0)
            .cmp(&b.median_income.unwrap_or(0)),
    }
}

/// Stable reorder of one column's organization list. Unknown organizations
/// (possible if the store was replaced mid-gesture) sort last, preserving
/// their relative order.
pub fn sort_column(
    organizations: &mut [String],
    store: &TargetStore,
    field: SortField,
    direction: SortDirection,
) {
    organizations.sort_by(|a, b| {
        let ord = match (store.get(a), store.get(b)) {
            (Some(ta), Some(tb)) => compare(ta, tb, field),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> TargetStore {
        let mut a = Target::new("acme", "Contacted");
        a.population = Some(500);
        let mut b = Target::new("Beta", "Contacted");
        b.population = Some(100);
        let c = Target::new("Gamma", "Contacted"); // no population
        let mut d = Target::new("Delta", "Contacted");
        d.population = Some(100);

        let mut store = TargetStore::new();
        store.replace_all(vec![a, b, c, d]);
        store
    }

    fn orgs() -> Vec<String> {
        ["acme", "Beta", "Gamma", "Delta"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn empty_query_matches_everything() {
        let t = Target::new("Acme", "Contacted");
        assert!(matches(&t, ""));
        assert!(matches(&t, "   "));
    }

    #[test]
    fn query_is_case_insensitive_substring() {
        let mut t = Target::new("Acme Corp", "Not Contacted");
        t.address = Some("12 Main St".into());
        assert!(matches(&t, "ACME"));
        assert!(matches(&t, "main st"));
        assert!(matches(&t, "not cont"));
        assert!(!matches(&t, "zebra"));
    }

    #[test]
    fn population_sort_is_numeric_with_missing_as_zero_and_stable() {
        let store = store();
        let mut organizations = orgs();
        sort_column(
            &mut organizations,
            &store,
            SortField::Population,
            SortDirection::Ascending,
        );
        // Gamma (0) first; Beta and Delta tie at 100 and keep prior order.
        assert_eq!(organizations, vec!["Gamma", "Beta", "Delta", "acme"]);
    }

    #[test]
    fn organization_sort_ignores_case() {
        let store = store();
        let mut organizations = orgs();
        sort_column(
            &mut organizations,
            &store,
            SortField::Organization,
            SortDirection::Ascending,
        );
        assert_eq!(organizations, vec!["acme", "Beta", "Delta", "Gamma"]);
    }

    #[test]
    fn descending_reverses_the_comparison() {
        let store = store();
        let mut organizations = orgs();
        sort_column(
            &mut organizations,
            &store,
            SortField::Population,
            SortDirection::Descending,
        );
        assert_eq!(organizations[0], "acme");
    }
}
