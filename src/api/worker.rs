use std::sync::mpsc;
use std::thread;

use crate::api::client::{ApiError, Backend};
use crate::model::note::Note;
use crate::model::target::Target;

/// Requests the UI hands to the worker thread. All network activity goes
/// through here so the event loop never blocks on a round trip.
#[derive(Debug)]
pub enum ApiRequest {
    FetchTargets,
    UpdateStatus {
        organization: String,
        status: String,
        /// Sync-engine token; carried through so late replies can be
        /// recognized as stale.
        token: u64,
    },
    FetchNotes {
        organization: String,
        /// Badge refresh after a target load: failures are logged, not shown.
        quiet: bool,
    },
    AddNote {
        target_id: String,
        content: String,
    },
    DeleteNote {
        id: i64,
        organization: String,
    },
}

/// Replies posted back to the UI, drained once per tick.
#[derive(Debug)]
pub enum ApiReply {
    Targets(Result<Vec<Target>, ApiError>),
    StatusUpdated {
        organization: String,
        token: u64,
        result: Result<(), ApiError>,
    },
    Notes {
        organization: String,
        quiet: bool,
        result: Result<Vec<Note>, ApiError>,
    },
    NoteAdded {
        organization: String,
        result: Result<Note, ApiError>,
    },
    NoteDeleted {
        organization: String,
        result: Result<(), ApiError>,
    },
}

/// Owns the backend on a dedicated thread and serves requests in order.
/// `poll()` is non-blocking and should be called each tick, like the
/// file-watcher poll in the TUI loop.
pub struct ApiWorker {
    tx: mpsc::Sender<ApiRequest>,
    rx: mpsc::Receiver<ApiReply>,
    _handle: thread::JoinHandle<()>,
}

impl ApiWorker {
    pub fn start(backend: Box<dyn Backend>) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<ApiRequest>();
        let (reply_tx, reply_rx) = mpsc::channel::<ApiReply>();

        let handle = thread::Builder::new()
            .name("reach-api".into())
            .spawn(move || {
                while let Ok(request) = req_rx.recv() {
                    let reply = serve(backend.as_ref(), request);
                    // The UI dropping its receiver means shutdown.
                    if reply_tx.send(reply).is_err() {
                        break;
                    }
                }
            })
            .unwrap_or_else(|e| panic!("failed to spawn api worker: {e}"));

        ApiWorker {
            tx: req_tx,
            rx: reply_rx,
            _handle: handle,
        }
    }

    /// Queue a request. Send failure means the worker died; the next poll
    /// simply yields nothing, so this is logged rather than propagated.
    pub fn submit(&self, request: ApiRequest) {
        if self.tx.send(request).is_err() {
            log::error!("api worker is gone; dropping request");
        }
    }

    /// Non-blocking drain of pending replies (may be empty).
    pub fn poll(&self) -> Vec<ApiReply> {
        let mut replies = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            replies.push(reply);
        }
        replies
    }
}

fn serve(backend: &dyn Backend, request: ApiRequest) -> ApiReply {
    match request {
        ApiRequest::FetchTargets => ApiReply::Targets(backend.fetch_targets()),
        ApiRequest::UpdateStatus {
            organization,
            status,
            token,
        } => {
            let result = backend.update_status(&organization, &status);
            ApiReply::StatusUpdated {
                organization,
                token,
                result,
            }
        }
        ApiRequest::FetchNotes {
            organization,
            quiet,
        } => {
            let result = backend.fetch_notes(&organization);
            ApiReply::Notes {
                organization,
                quiet,
                result,
            }
        }
        ApiRequest::AddNote { target_id, content } => {
            let result = backend.add_note(&target_id, &content);
            ApiReply::NoteAdded {
                organization: target_id,
                result,
            }
        }
        ApiRequest::DeleteNote { id, organization } => {
            let result = backend.delete_note(id);
            ApiReply::NoteDeleted {
                organization,
                result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Minimal scripted backend: pops canned target-list results.
    struct Scripted {
        targets: Mutex<Vec<Result<Vec<Target>, ApiError>>>,
    }

    impl Backend for Scripted {
        fn fetch_targets(&self) -> Result<Vec<Target>, ApiError> {
            self.targets
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
        fn update_status(&self, _: &str, _: &str) -> Result<(), ApiError> {
            Ok(())
        }
        fn fetch_notes(&self, _: &str) -> Result<Vec<Note>, ApiError> {
            Ok(Vec::new())
        }
        fn add_note(&self, target_id: &str, content: &str) -> Result<Note, ApiError> {
            Ok(Note {
                id: 1,
                target_id: target_id.into(),
                content: content.into(),
                timestamp: None,
            })
        }
        fn delete_note(&self, _: i64) -> Result<(), ApiError> {
            Ok(())
        }
    }

    #[test]
    fn replies_arrive_in_request_order() {
        let worker = ApiWorker::start(Box::new(Scripted {
            targets: Mutex::new(vec![Ok(vec![Target::new("Acme", "Contacted")])]),
        }));
        worker.submit(ApiRequest::FetchTargets);
        worker.submit(ApiRequest::AddNote {
            target_id: "Acme".into(),
            content: "called today".into(),
        });

        let mut replies = Vec::new();
        while replies.len() < 2 {
            replies.extend(worker.poll());
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(matches!(&replies[0], ApiReply::Targets(Ok(ts)) if ts.len() == 1));
        assert!(
            matches!(&replies[1], ApiReply::NoteAdded { organization, result: Ok(n) }
                if organization == "Acme" && n.content == "called today")
        );
    }
}
