use std::collections::HashMap;

use crate::api::client::ApiError;
use crate::board::host::{HostEvent, HostPort};
use crate::board::store::TargetStore;
use crate::model::column;

/// What a drop gesture should do next.
#[derive(Debug, PartialEq, Eq)]
pub enum MoveDecision {
    /// Nothing happens and no request is sent.
    Skip(SkipReason),
    /// Same-column drop with repositioning enabled: the view may move the
    /// card to the top of its own column, but no request is sent.
    RepositionOnly,
    /// Send this status update; the view stays untouched until the reply
    /// comes back through [`StatusSync::complete_move`].
    Request {
        organization: String,
        status: String,
        token: u64,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum SkipReason {
    UnknownTarget,
    SameStatus,
}

/// Result of settling a status-update reply.
#[derive(Debug)]
pub enum MoveOutcome {
    /// Backend confirmed: the store was updated and a host event emitted.
    /// The view should now re-parent the card to the top of `to_slug`'s
    /// column and refresh counts.
    Committed {
        organization: String,
        from_slug: String,
        to_slug: String,
    },
    /// Backend refused or the request never arrived: nothing moved, the card
    /// is exactly where it was. `offline` selects the transient offline
    /// banner over a silent log.
    Reverted {
        organization: String,
        error: ApiError,
        offline: bool,
    },
    /// A newer move for the same organization superseded this one while it
    /// was in flight; the reply is discarded.
    Stale { organization: String },
}

#[derive(Debug)]
struct PendingMove {
    token: u64,
    from_slug: String,
    to_slug: String,
}

/// The status sync engine.
///
/// Confirmed-then-commit: a card moves only after the backend acknowledges
/// the write, so board state can never diverge from the last confirmed
/// server status. Concurrent moves of the same organization are serialized
/// by token — the newest `begin_move` supersedes any pending one, and late
/// replies carrying an older token are dropped.
#[derive(Debug)]
pub struct StatusSync {
    pending: HashMap<String, PendingMove>,
    next_token: u64,
    reposition_on_same_status: bool,
}

impl StatusSync {
    pub fn new(reposition_on_same_status: bool) -> Self {
        StatusSync {
            pending: HashMap::new(),
            next_token: 1,
            reposition_on_same_status,
        }
    }

    /// Decide what a drop of `organization` onto the column for `new_status`
    /// should do. Never mutates the store.
    pub fn begin_move(
        &mut self,
        store: &TargetStore,
        organization: &str,
        new_status: &str,
    ) -> MoveDecision {
        let Some(target) = store.get(organization) else {
            log::warn!("drop ignored: unknown target {organization:?}");
            return MoveDecision::Skip(SkipReason::UnknownTarget);
        };

        let to_slug = column::slug(new_status);
        let from_slug = target.column_slug();
        if to_slug == from_slug {
            // Idempotent no-op: same status never hits the network and never
            // produces a second activity entry.
            return if self.reposition_on_same_status {
                MoveDecision::RepositionOnly
            } else {
                MoveDecision::Skip(SkipReason::SameStatus)
            };
        }

        let token = self.next_token;
        self.next_token += 1;
        let superseded = self.pending.insert(
            organization.to_string(),
            PendingMove {
                token,
                from_slug,
                to_slug: to_slug.clone(),
            },
        );
        if let Some(old) = superseded {
            log::info!(
                "superseding pending move of {organization:?} (token {})",
                old.token
            );
        }

        MoveDecision::Request {
            organization: organization.to_string(),
            status: new_status.to_string(),
            token,
        }
    }

    /// Settle a status-update reply. Commits into the store and emits the
    /// host notification only for a confirmed, still-current move.
    pub fn complete_move(
        &mut self,
        store: &mut TargetStore,
        host: &mut dyn HostPort,
        organization: &str,
        token: u64,
        result: Result<(), ApiError>,
    ) -> MoveOutcome {
        let is_current = self
            .pending
            .get(organization)
            .is_some_and(|p| p.token == token);
        if !is_current {
            log::debug!("stale status reply for {organization:?} (token {token})");
            return MoveOutcome::Stale {
                organization: organization.to_string(),
            };
        }
        let Some(pending) = self.pending.remove(organization) else {
            return MoveOutcome::Stale {
                organization: organization.to_string(),
            };
        };

        match result {
            Ok(()) => {
                let status = column::wire_label(&pending.to_slug);
                if !store.set_status(organization, &status) {
                    // The store was replaced under us and the target is gone;
                    // there is nothing to move.
                    log::warn!("confirmed move for vanished target {organization:?}");
                    return MoveOutcome::Stale {
                        organization: organization.to_string(),
                    };
                }
                if let Some(target) = store.get(organization) {
                    host.post(HostEvent::UpdateMapPin {
                        target: target.clone(),
                    });
                }
                MoveOutcome::Committed {
                    organization: organization.to_string(),
                    from_slug: pending.from_slug,
                    to_slug: pending.to_slug,
                }
            }
            Err(error) => {
                let offline = error.is_offline();
                if offline {
                    log::warn!("status update for {organization:?} failed: offline");
                } else {
                    log::warn!("status update for {organization:?} failed: {error}");
                }
                MoveOutcome::Reverted {
                    organization: organization.to_string(),
                    error,
                    offline,
                }
            }
        }
    }

    pub fn has_pending(&self, organization: &str) -> bool {
        self.pending.contains_key(organization)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::host::RecordingHost;
    use crate::model::target::Target;
    use pretty_assertions::assert_eq;

    fn store_with(targets: Vec<Target>) -> TargetStore {
        let mut store = TargetStore::new();
        store.replace_all(targets);
        store
    }

    fn request_token(decision: &MoveDecision) -> u64 {
        match decision {
            MoveDecision::Request { token, .. } => *token,
            other => panic!("expected Request, got {other:?}"),
        }
    }

    #[test]
    fn confirmed_move_commits_and_notifies_host() {
        let mut store = store_with(vec![Target::new("Acme", "Not Contacted")]);
        let mut sync = StatusSync::new(false);
        let mut host = RecordingHost::default();

        let decision = sync.begin_move(&store, "Acme", "Contacted");
        let token = request_token(&decision);
        // Nothing moves while the request is pending.
        assert_eq!(store.get("Acme").unwrap().column_slug(), "not-contacted");
        assert!(sync.has_pending("Acme"));

        let outcome = sync.complete_move(&mut store, &mut host, "Acme", token, Ok(()));
        assert!(matches!(
            outcome,
            MoveOutcome::Committed { ref to_slug, .. } if to_slug == "contacted"
        ));
        assert_eq!(store.get("Acme").unwrap().column_slug(), "contacted");
        assert_eq!(host.events.len(), 1);
        assert!(matches!(
            &host.events[0],
            HostEvent::UpdateMapPin { target } if target.organization == "Acme"
        ));
        assert!(!sync.has_pending("Acme"));
    }

    #[test]
    fn failed_move_reverts_and_keeps_origin_column() {
        let mut store = store_with(vec![Target::new("Acme", "Not Contacted")]);
        let mut sync = StatusSync::new(false);
        let mut host = RecordingHost::default();

        let token = request_token(&sync.begin_move(&store, "Acme", "Contacted"));
        let outcome = sync.complete_move(
            &mut store,
            &mut host,
            "Acme",
            token,
            Err(ApiError::Application("db locked".into())),
        );

        assert!(matches!(outcome, MoveOutcome::Reverted { offline: false, .. }));
        assert_eq!(store.get("Acme").unwrap().column_slug(), "not-contacted");
        assert!(host.events.is_empty());
    }

    #[test]
    fn same_status_drop_is_a_local_noop_by_default() {
        let store = store_with(vec![Target::new("Acme", "Contacted")]);
        let mut sync = StatusSync::new(false);
        assert_eq!(
            sync.begin_move(&store, "Acme", "contacted"),
            MoveDecision::Skip(SkipReason::SameStatus)
        );
        assert_eq!(sync.pending_count(), 0);
    }

    #[test]
    fn same_status_drop_can_reposition_without_network() {
        let store = store_with(vec![Target::new("Acme", "Contacted")]);
        let mut sync = StatusSync::new(true);
        assert_eq!(
            sync.begin_move(&store, "Acme", "Contacted"),
            MoveDecision::RepositionOnly
        );
        assert_eq!(sync.pending_count(), 0);
    }

    #[test]
    fn unknown_target_drop_is_ignored() {
        let store = store_with(vec![]);
        let mut sync = StatusSync::new(false);
        assert_eq!(
            sync.begin_move(&store, "Ghost", "Contacted"),
            MoveDecision::Skip(SkipReason::UnknownTarget)
        );
    }

    #[test]
    fn newer_move_supersedes_older_pending_one() {
        let mut store = store_with(vec![Target::new("Acme", "Not Contacted")]);
        let mut sync = StatusSync::new(false);
        let mut host = RecordingHost::default();

        let first = request_token(&sync.begin_move(&store, "Acme", "Contacted"));
        let second = request_token(&sync.begin_move(&store, "Acme", "Responded"));
        assert!(second > first);

        // The older reply resolves late and must be discarded, even though
        // the server confirmed it.
        let outcome = sync.complete_move(&mut store, &mut host, "Acme", first, Ok(()));
        assert!(matches!(outcome, MoveOutcome::Stale { .. }));
        assert_eq!(store.get("Acme").unwrap().column_slug(), "not-contacted");
        assert!(host.events.is_empty());

        // The newest one wins.
        let outcome = sync.complete_move(&mut store, &mut host, "Acme", second, Ok(()));
        assert!(matches!(outcome, MoveOutcome::Committed { .. }));
        assert_eq!(store.get("Acme").unwrap().column_slug(), "responded");
        assert_eq!(host.events.len(), 1);
    }

    #[test]
    fn reply_after_store_reload_does_not_resurrect_the_target() {
        let mut store = store_with(vec![Target::new("Acme", "Not Contacted")]);
        let mut sync = StatusSync::new(false);
        let mut host = RecordingHost::default();

        let token = request_token(&sync.begin_move(&store, "Acme", "Contacted"));
        store.replace_all(vec![Target::new("Beta", "Contacted")]);

        let outcome = sync.complete_move(&mut store, &mut host, "Acme", token, Ok(()));
        assert!(matches!(outcome, MoveOutcome::Stale { .. }));
        assert!(!store.contains("Acme"));
        assert!(host.events.is_empty());
    }

    #[test]
    fn committed_status_uses_the_hyphen_free_label() {
        let mut store = store_with(vec![Target::new("Acme", "Not Contacted")]);
        let mut sync = StatusSync::new(false);
        let mut host = RecordingHost::default();

        let token = request_token(&sync.begin_move(&store, "Acme", "Meeting Scheduled"));
        sync.complete_move(&mut store, &mut host, "Acme", token, Ok(()));
        assert_eq!(
            store.get("Acme").unwrap().status.as_deref(),
            Some("meeting scheduled")
        );
    }
}
