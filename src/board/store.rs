use std::collections::HashMap;

use indexmap::IndexMap;

use crate::model::column::ColumnDef;
use crate::model::note::Note;
use crate::model::target::Target;

/// Per-target note summary shown on the card without opening the panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteBadge {
    pub count: usize,
    /// Raw server timestamp of the most recent note.
    pub last_timestamp: Option<String>,
}

/// The single source of truth for target data on the client side.
///
/// Keyed by organization, insertion-ordered. Views are projections rebuilt
/// from here; nothing ever reads target data back out of rendered state.
#[derive(Debug, Default)]
pub struct TargetStore {
    targets: IndexMap<String, Target>,
    badges: HashMap<String, NoteBadge>,
}

impl TargetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full replace on fetch, not an incremental diff. Later duplicates of
    /// the same organization win. Note badges are reset; they repopulate from
    /// the fire-and-forget per-target note fetches that follow a load.
    pub fn replace_all(&mut self, targets: Vec<Target>) {
        self.targets.clear();
        self.badges.clear();
        for target in targets {
            self.targets.insert(target.organization.clone(), target);
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, organization: &str) -> Option<&Target> {
        self.targets.get(organization)
    }

    pub fn contains(&self, organization: &str) -> bool {
        self.targets.contains_key(organization)
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    pub fn organizations(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Set a target's status. Only the sync engine calls this, and only after
    /// the backend has confirmed the write. Returns false for unknown keys.
    pub fn set_status(&mut self, organization: &str, status: &str) -> bool {
        match self.targets.get_mut(organization) {
            Some(target) => {
                target.status = Some(status.to_string());
                true
            }
            None => false,
        }
    }

    /// Partition targets into the given columns by status slug, preserving
    /// store order within each column. A target whose slug matches no column
    /// is dropped from the projection (logged, never a crash); it still
    /// exists in the store.
    pub fn grouped<'a>(&'a self, columns: &[ColumnDef]) -> Vec<Vec<&'a Target>> {
        let mut groups: Vec<Vec<&Target>> = vec![Vec::new(); columns.len()];
        for target in self.targets.values() {
            let slug = target.column_slug();
            match columns.iter().position(|c| c.slug == slug) {
                Some(idx) => groups[idx].push(target),
                None => log::debug!(
                    "target {:?} has status {:?} with no matching column",
                    target.organization,
                    target.status_str()
                ),
            }
        }
        groups
    }

    /// Column counts over all targets (the visible-only variant lives with
    /// the view, which owns visibility).
    pub fn column_counts(&self, columns: &[ColumnDef]) -> Vec<usize> {
        self.grouped(columns).iter().map(Vec::len).collect()
    }

    pub fn record_notes(&mut self, organization: &str, notes: &[Note]) {
        self.badges.insert(
            organization.to_string(),
            NoteBadge {
                count: notes.len(),
                last_timestamp: notes.first().and_then(|n| n.timestamp.clone()),
            },
        );
    }

    pub fn badge(&self, organization: &str) -> Option<&NoteBadge> {
        self.badges.get(organization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::column::columns_from_names;
    use pretty_assertions::assert_eq;

    fn columns() -> Vec<ColumnDef> {
        columns_from_names(&["Not Contacted".into(), "Contacted".into()])
    }

    #[test]
    fn groups_by_status_slug_case_insensitively() {
        let mut store = TargetStore::new();
        store.replace_all(vec![
            Target::new("Acme", "not contacted"),
            Target::new("Beta", "Contacted"),
        ]);
        let groups = store.grouped(&columns());
        assert_eq!(groups[0].len(), 1);
        assert_eq!(groups[0][0].organization, "Acme");
        assert_eq!(groups[1][0].organization, "Beta");
        assert_eq!(store.column_counts(&columns()), vec![1, 1]);
    }

    #[test]
    fn unmatched_status_is_dropped_from_view_but_kept_in_store() {
        let mut store = TargetStore::new();
        store.replace_all(vec![Target::new("Gamma", "Mystery Stage")]);
        let groups = store.grouped(&columns());
        assert!(groups.iter().all(Vec::is_empty));
        assert!(store.contains("Gamma"));
    }

    #[test]
    fn missing_status_defaults_into_the_first_bucket() {
        let mut store = TargetStore::new();
        let mut t = Target::new("Delta", "");
        t.status = None;
        store.replace_all(vec![t]);
        let groups = store.grouped(&columns());
        assert_eq!(groups[0].len(), 1);
    }

    #[test]
    fn duplicate_organizations_keep_the_last_row() {
        let mut store = TargetStore::new();
        store.replace_all(vec![
            Target::new("Acme", "Not Contacted"),
            Target::new("Acme", "Contacted"),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Acme").unwrap().status_str(), "Contacted");
    }

    #[test]
    fn replace_all_resets_badges() {
        let mut store = TargetStore::new();
        store.replace_all(vec![Target::new("Acme", "Contacted")]);
        store.record_notes(
            "Acme",
            &[Note {
                id: 1,
                target_id: "Acme".into(),
                content: "hi".into(),
                timestamp: Some("2026-01-01 10:00:00".into()),
            }],
        );
        assert_eq!(store.badge("Acme").unwrap().count, 1);
        store.replace_all(vec![Target::new("Acme", "Contacted")]);
        assert!(store.badge("Acme").is_none());
    }
}
