use std::collections::HashSet;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::api::client::ApiClient;
use crate::api::worker::{ApiReply, ApiRequest, ApiWorker};
use crate::board::host::{HostEvent, HostPort, LocatePayload, NullHost};
use crate::board::search::{self, SortDirection, SortField};
use crate::board::store::TargetStore;
use crate::board::sync::{MoveDecision, MoveOutcome, StatusSync};
use crate::io::config_io::load_config;
use crate::model::column::{ColumnDef, columns_from_names};
use crate::model::config::BoardConfig;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// A card is grabbed; left/right retargets the drop column.
    Drag,
    Search,
    /// Notes panel open, browsing the list.
    Notes,
    /// Notes panel open, typing a new note.
    NoteInput,
    /// Notes panel open, confirming a delete.
    ConfirmDeleteNote,
    SortMenu,
    Help,
}

/// Whether the initial/most recent target fetch has landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    /// Visible error with a retry affordance (`r`).
    Failed(String),
}

/// Transient state for an in-progress drag gesture. Created on grab, cleared
/// on drop or cancel regardless of outcome.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub organization: String,
    pub origin_col: usize,
    /// The currently highlighted drop column; exactly one at a time.
    pub target_col: usize,
}

/// State of the notes popup for one target.
#[derive(Debug)]
pub struct NotesPanel {
    pub organization: String,
    pub notes: Vec<crate::model::note::Note>,
    pub loading: bool,
    pub cursor: usize,
    pub input: String,
    /// Blocks duplicate submissions until the in-flight add settles.
    pub in_flight: bool,
    /// Note id awaiting delete confirmation.
    pub confirm_delete: Option<i64>,
}

impl NotesPanel {
    fn new(organization: String) -> Self {
        NotesPanel {
            organization,
            notes: Vec::new(),
            loading: true,
            cursor: 0,
            input: String::new(),
            in_flight: false,
            confirm_delete: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Error,
    Offline,
}

/// One-line transient notice above the status row.
#[derive(Debug, Clone)]
pub struct Banner {
    pub text: String,
    pub kind: BannerKind,
    pub expires: Option<Instant>,
}

#[derive(Debug, Clone, Copy)]
pub struct SortMenu {
    pub field_idx: usize,
    pub direction: SortDirection,
}

/// Main application state
pub struct App {
    pub config: BoardConfig,
    pub columns: Vec<ColumnDef>,
    pub store: TargetStore,
    pub sync: StatusSync,
    pub worker: ApiWorker,
    pub host: Box<dyn HostPort>,
    pub theme: Theme,

    pub mode: Mode,
    pub should_quit: bool,
    pub load: LoadState,

    /// Projection: per-column ordered organization lists, rebuilt from the
    /// store on load and patched on committed moves and sorts.
    pub column_orders: Vec<Vec<String>>,
    pub cursor_col: usize,
    pub cursor_row: usize,
    /// Per-column scroll offsets (first visible row index).
    pub scroll: Vec<usize>,

    pub drag: Option<DragSession>,
    pub notes: Option<NotesPanel>,
    pub banner: Option<Banner>,
    pub sort_menu: Option<SortMenu>,

    /// Query being typed in Search mode.
    pub search_input: String,
    /// Active filter applied to the projection.
    pub query: String,
    /// Card ids with details expanded.
    pub expanded: HashSet<String>,
}

impl App {
    pub fn new(config: BoardConfig, worker: ApiWorker, host: Box<dyn HostPort>) -> Self {
        let columns = columns_from_names(&config.columns);
        let theme = Theme::from_config(&config.ui);
        let column_orders = vec![Vec::new(); columns.len()];
        let scroll = vec![0; columns.len()];
        let sync = StatusSync::new(config.reposition_on_same_status);

        worker.submit(ApiRequest::FetchTargets);

        App {
            config,
            columns,
            store: TargetStore::new(),
            sync,
            worker,
            host,
            theme,
            mode: Mode::Navigate,
            should_quit: false,
            load: LoadState::Loading,
            column_orders,
            cursor_col: 0,
            cursor_row: 0,
            scroll,
            drag: None,
            notes: None,
            banner: None,
            sort_menu: None,
            search_input: String::new(),
            query: String::new(),
            expanded: HashSet::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Projection
    // -----------------------------------------------------------------------

    /// Rebuild the per-column organization lists from the store. Loses any
    /// manual sort order, which is what a full reload means.
    pub fn rebuild_projection(&mut self) {
        let groups = self.store.grouped(&self.columns);
        self.column_orders = groups
            .into_iter()
            .map(|group| group.into_iter().map(|t| t.organization.clone()).collect())
            .collect();
        self.clamp_cursor();
    }

    /// Is this card visible under the active search filter?
    pub fn is_visible(&self, organization: &str) -> bool {
        match self.store.get(organization) {
            Some(target) => search::matches(target, &self.query),
            None => false,
        }
    }

    /// Organizations visible in one column, in projection order.
    pub fn visible_in_column(&self, col: usize) -> Vec<&str> {
        self.column_orders[col]
            .iter()
            .filter(|org| self.is_visible(org))
            .map(String::as_str)
            .collect()
    }

    /// Column counts over *visible* cards, recomputed against the filter.
    pub fn visible_counts(&self) -> Vec<usize> {
        (0..self.columns.len())
            .map(|c| self.visible_in_column(c).len())
            .collect()
    }

    /// The organization under the cursor, if any.
    pub fn cursor_organization(&self) -> Option<String> {
        self.visible_in_column(self.cursor_col)
            .get(self.cursor_row)
            .map(|s| s.to_string())
    }

    pub fn clamp_cursor(&mut self) {
        if self.columns.is_empty() {
            return;
        }
        self.cursor_col = self.cursor_col.min(self.columns.len() - 1);
        let rows = self.visible_in_column(self.cursor_col).len();
        self.cursor_row = self.cursor_row.min(rows.saturating_sub(1));
    }

    /// Move a card to the top of a column in the projection (committed moves
    /// land at the top, not at a drop point).
    pub fn move_card_to_top(&mut self, organization: &str, to_slug: &str) {
        for orders in &mut self.column_orders {
            orders.retain(|org| org != organization);
        }
        if let Some(idx) = self.columns.iter().position(|c| c.slug == to_slug) {
            self.column_orders[idx].insert(0, organization.to_string());
        }
        self.clamp_cursor();
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    pub fn reload_targets(&mut self) {
        self.load = LoadState::Loading;
        self.worker.submit(ApiRequest::FetchTargets);
    }

    /// Settle a drop: decide, then either send the request or stop locally.
    /// The session is consumed either way; decorations clear with it.
    pub fn drop_card(&mut self) {
        let Some(session) = self.drag.take() else {
            return;
        };
        let Some(column) = self.columns.get(session.target_col) else {
            log::warn!("drop ignored: no column at index {}", session.target_col);
            return;
        };
        let decision = self
            .sync
            .begin_move(&self.store, &session.organization, &column.name);
        match decision {
            MoveDecision::Skip(reason) => {
                log::debug!("drop for {:?} skipped: {reason:?}", session.organization);
            }
            MoveDecision::RepositionOnly => {
                let slug = column.slug.clone();
                self.move_card_to_top(&session.organization, &slug);
            }
            MoveDecision::Request {
                organization,
                status,
                token,
            } => {
                self.worker.submit(ApiRequest::UpdateStatus {
                    organization,
                    status,
                    token,
                });
            }
        }
    }

    pub fn open_notes(&mut self) {
        let Some(organization) = self.cursor_organization() else {
            return;
        };
        self.worker.submit(ApiRequest::FetchNotes {
            organization: organization.clone(),
            quiet: false,
        });
        self.notes = Some(NotesPanel::new(organization));
        self.mode = Mode::Notes;
    }

    /// Close the panel, clearing the draft and the current-target slot.
    pub fn close_notes(&mut self) {
        self.notes = None;
        self.mode = Mode::Navigate;
    }

    pub fn submit_note(&mut self) {
        let Some(panel) = self.notes.as_mut() else {
            return;
        };
        // The in-flight flag blocks duplicate concurrent submissions.
        if panel.in_flight {
            return;
        }
        let content = panel.input.trim().to_string();
        if content.is_empty() {
            return;
        }
        panel.in_flight = true;
        self.worker.submit(ApiRequest::AddNote {
            target_id: panel.organization.clone(),
            content,
        });
    }

    pub fn delete_confirmed_note(&mut self) {
        let Some(panel) = self.notes.as_mut() else {
            return;
        };
        if let Some(id) = panel.confirm_delete.take() {
            self.worker.submit(ApiRequest::DeleteNote {
                id,
                organization: panel.organization.clone(),
            });
        }
        self.mode = Mode::Notes;
    }

    /// Ask the host to locate the cursor card on its map. Silently
    /// unavailable without coordinates.
    pub fn locate_cursor_target(&mut self) {
        let Some(organization) = self.cursor_organization() else {
            return;
        };
        let Some(target) = self.store.get(&organization) else {
            return;
        };
        if let (Some(lat), Some(lng)) = (target.latitude, target.longitude) {
            self.host.post(HostEvent::LocateTarget {
                data: LocatePayload {
                    lat,
                    lng,
                    name: target.organization.clone(),
                },
            });
        }
    }

    /// Commit a search query. Matching cards stay visible with their details
    /// expanded; non-matches are hidden. Clearing the query restores full
    /// visibility and collapses everything back to the default.
    pub fn commit_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.expanded.clear();
        if !self.query.is_empty() {
            for target in self.store.targets() {
                if search::matches(target, &self.query) {
                    self.expanded.insert(target.card_id());
                }
            }
        }
        self.cursor_row = 0;
        self.clamp_cursor();
    }

    pub fn apply_sort(&mut self) {
        let Some(menu) = self.sort_menu else {
            return;
        };
        let field = SortField::ALL[menu.field_idx];
        // Sort applies to one column only, never globally.
        search::sort_column(
            &mut self.column_orders[self.cursor_col],
            &self.store,
            field,
            menu.direction,
        );
        self.sort_menu = None;
        self.mode = Mode::Navigate;
    }

    pub fn set_banner(&mut self, text: impl Into<String>, kind: BannerKind, ttl: Option<Duration>) {
        self.banner = Some(Banner {
            text: text.into(),
            kind,
            expires: ttl.map(|d| Instant::now() + d),
        });
    }

    fn expire_banner(&mut self) {
        if let Some(banner) = &self.banner
            && let Some(expires) = banner.expires
            && Instant::now() >= expires
        {
            self.banner = None;
        }
    }

    // -----------------------------------------------------------------------
    // Reply handling
    // -----------------------------------------------------------------------

    pub fn apply_reply(&mut self, reply: ApiReply) {
        match reply {
            ApiReply::Targets(Ok(targets)) => {
                self.store.replace_all(targets);
                self.load = LoadState::Loaded;
                self.rebuild_projection();
                // Fire-and-forget badge fetches; failures only log.
                for organization in self.store.organizations() {
                    self.worker.submit(ApiRequest::FetchNotes {
                        organization: organization.to_string(),
                        quiet: true,
                    });
                }
            }
            ApiReply::Targets(Err(e)) => {
                log::warn!("target fetch failed: {e}");
                self.load = LoadState::Failed(e.to_string());
            }
            ApiReply::StatusUpdated {
                organization,
                token,
                result,
            } => {
                let outcome = self.sync.complete_move(
                    &mut self.store,
                    self.host.as_mut(),
                    &organization,
                    token,
                    result,
                );
                match outcome {
                    MoveOutcome::Committed {
                        organization,
                        to_slug,
                        ..
                    } => {
                        self.move_card_to_top(&organization, &to_slug);
                    }
                    MoveOutcome::Reverted { offline: true, .. } => {
                        self.set_banner(
                            "offline - status change not saved",
                            BannerKind::Offline,
                            Some(Duration::from_secs(4)),
                        );
                    }
                    // Non-offline failures and stale replies are already
                    // logged by the engine; the card never moved.
                    MoveOutcome::Reverted { .. } | MoveOutcome::Stale { .. } => {}
                }
            }
            ApiReply::Notes {
                organization,
                quiet,
                result,
            } => match result {
                Ok(notes) => {
                    self.store.record_notes(&organization, &notes);
                    if let Some(panel) = self.notes.as_mut()
                        && panel.organization == organization
                        && !quiet
                    {
                        panel.notes = notes;
                        panel.loading = false;
                        panel.cursor = panel.cursor.min(panel.notes.len().saturating_sub(1));
                    }
                }
                Err(e) => {
                    if quiet {
                        log::debug!("badge fetch for {organization:?} failed: {e}");
                    } else {
                        log::warn!("note fetch for {organization:?} failed: {e}");
                        self.set_banner(
                            "failed to load notes",
                            BannerKind::Error,
                            Some(Duration::from_secs(4)),
                        );
                        if let Some(panel) = self.notes.as_mut() {
                            panel.loading = false;
                        }
                    }
                }
            },
            ApiReply::NoteAdded {
                organization,
                result,
            } => {
                let mut refetch = false;
                if let Some(panel) = self.notes.as_mut()
                    && panel.organization == organization
                {
                    // Settle the in-flight flag on success *and* failure so
                    // the input is never left disabled.
                    panel.in_flight = false;
                    if result.is_ok() {
                        panel.input.clear();
                        panel.loading = true;
                        refetch = true;
                    }
                }
                // Failures surface even after the panel closed or moved on
                // to another target.
                if let Err(e) = &result {
                    log::warn!("add note for {organization:?} failed: {e}");
                    self.set_banner(
                        "failed to add note",
                        BannerKind::Error,
                        Some(Duration::from_secs(4)),
                    );
                }
                if refetch {
                    self.worker.submit(ApiRequest::FetchNotes {
                        organization,
                        quiet: false,
                    });
                }
            }
            ApiReply::NoteDeleted {
                organization,
                result,
            } => match result {
                Ok(()) => {
                    let quiet = self
                        .notes
                        .as_ref()
                        .is_none_or(|panel| panel.organization != organization);
                    self.worker
                        .submit(ApiRequest::FetchNotes { organization, quiet });
                }
                Err(e) => {
                    log::warn!("delete note failed: {e}");
                    self.set_banner(
                        "failed to delete note",
                        BannerKind::Error,
                        Some(Duration::from_secs(4)),
                    );
                }
            },
        }
    }
}

/// Run the TUI application
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd)?;
    let client = ApiClient::new(&config.api_base)?;
    let worker = ApiWorker::start(Box::new(client));
    let mut app = App::new(config, worker, Box::new(NullHost));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Network replies first, so the frame reflects settled state.
        for reply in app.worker.poll() {
            app.apply_reply(reply);
        }
        app.expire_banner();

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{ApiError, Backend};
    use crate::model::note::Note;
    use crate::model::target::Target;

    struct NoopBackend;

    impl Backend for NoopBackend {
        fn fetch_targets(&self) -> Result<Vec<Target>, ApiError> {
            Ok(Vec::new())
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

    fn test_app() -> App {
        let worker = ApiWorker::start(Box::new(NoopBackend));
        App::new(BoardConfig::default(), worker, Box::new(NullHost))
    }

    fn loaded_app(targets: Vec<Target>) -> App {
        let mut app = test_app();
        app.apply_reply(ApiReply::Targets(Ok(targets)));
        app
    }

    #[test]
    fn load_builds_one_card_per_target_in_its_column() {
        let app = loaded_app(vec![
            Target::new("Acme", "Not Contacted"),
            Target::new("Beta", "Contacted"),
        ]);
        assert_eq!(app.load, LoadState::Loaded);
        assert_eq!(app.visible_counts()[0], 1);
        assert_eq!(app.visible_counts()[1], 1);
        assert_eq!(app.visible_in_column(0), vec!["Acme"]);
        assert_eq!(app.visible_in_column(1), vec!["Beta"]);
    }

    #[test]
    fn failed_load_sets_the_retry_state() {
        let mut app = test_app();
        app.apply_reply(ApiReply::Targets(Err(ApiError::Http { status: 500 })));
        assert!(matches!(app.load, LoadState::Failed(_)));
    }

    #[test]
    fn search_filters_visible_cards_and_counts() {
        let mut app = loaded_app(vec![
            Target::new("Acme", "Not Contacted"),
            Target::new("Beta", "Not Contacted"),
        ]);
        app.query = "acme".into();
        assert_eq!(app.visible_counts()[0], 1);
        app.query.clear();
        assert_eq!(app.visible_counts()[0], 2);
    }

    #[test]
    fn committed_query_expands_matches_and_clearing_collapses() {
        let mut app = loaded_app(vec![
            Target::new("Acme", "Not Contacted"),
            Target::new("Beta", "Not Contacted"),
        ]);
        app.commit_query("acme");
        assert!(app.expanded.contains("Acme"));
        assert!(!app.expanded.contains("Beta"));
        assert_eq!(app.visible_in_column(0), vec!["Acme"]);

        app.commit_query("");
        assert!(app.expanded.is_empty());
        assert_eq!(app.visible_counts()[0], 2);
    }

    #[test]
    fn committed_move_reparents_to_top_of_destination() {
        let mut app = loaded_app(vec![
            Target::new("Acme", "Not Contacted"),
            Target::new("Beta", "Contacted"),
        ]);
        app.drag = Some(DragSession {
            organization: "Acme".into(),
            origin_col: 0,
            target_col: 1,
        });
        app.drop_card();
        assert!(app.drag.is_none());
        // Pending: nothing moved yet.
        assert_eq!(app.visible_in_column(0), vec!["Acme"]);

        app.apply_reply(ApiReply::StatusUpdated {
            organization: "Acme".into(),
            token: 1,
            result: Ok(()),
        });
        assert!(app.visible_in_column(0).is_empty());
        assert_eq!(app.visible_in_column(1), vec!["Acme", "Beta"]);
    }

    #[test]
    fn failed_move_leaves_the_card_in_its_origin_column() {
        let mut app = loaded_app(vec![Target::new("Acme", "Not Contacted")]);
        app.drag = Some(DragSession {
            organization: "Acme".into(),
            origin_col: 0,
            target_col: 1,
        });
        app.drop_card();
        app.apply_reply(ApiReply::StatusUpdated {
            organization: "Acme".into(),
            token: 1,
            result: Err(ApiError::Application("db locked".into())),
        });
        assert_eq!(app.visible_in_column(0), vec!["Acme"]);
        assert!(app.visible_in_column(1).is_empty());
    }

    #[test]
    fn same_column_drop_sends_nothing_and_moves_nothing() {
        let mut app = loaded_app(vec![
            Target::new("Acme", "Not Contacted"),
            Target::new("Beta", "Not Contacted"),
        ]);
        app.cursor_row = 1;
        app.drag = Some(DragSession {
            organization: "Beta".into(),
            origin_col: 0,
            target_col: 0,
        });
        app.drop_card();
        assert_eq!(app.sync.pending_count(), 0);
        assert_eq!(app.visible_in_column(0), vec!["Acme", "Beta"]);
    }

    #[test]
    fn same_column_drop_repositions_when_configured() {
        let mut config = BoardConfig::default();
        config.reposition_on_same_status = true;
        let worker = ApiWorker::start(Box::new(NoopBackend));
        let mut app = App::new(config, worker, Box::new(NullHost));
        app.apply_reply(ApiReply::Targets(Ok(vec![
            Target::new("Acme", "Not Contacted"),
            Target::new("Beta", "Not Contacted"),
        ])));

        app.drag = Some(DragSession {
            organization: "Beta".into(),
            origin_col: 0,
            target_col: 0,
        });
        app.drop_card();
        assert_eq!(app.sync.pending_count(), 0);
        assert_eq!(app.visible_in_column(0), vec!["Beta", "Acme"]);
    }

    #[test]
    fn note_submission_is_guarded_by_the_in_flight_flag() {
        let mut app = loaded_app(vec![Target::new("Acme", "Not Contacted")]);
        app.notes = Some(NotesPanel::new("Acme".into()));
        if let Some(panel) = app.notes.as_mut() {
            panel.input = "called today".into();
        }
        app.submit_note();
        assert!(app.notes.as_ref().unwrap().in_flight);

        // A second submit while in flight is a no-op; the flag stays up and
        // the draft is untouched.
        app.submit_note();
        assert!(app.notes.as_ref().unwrap().in_flight);

        app.apply_reply(ApiReply::NoteAdded {
            organization: "Acme".into(),
            result: Ok(Note {
                id: 7,
                target_id: "Acme".into(),
                content: "called today".into(),
                timestamp: None,
            }),
        });
        let panel = app.notes.as_ref().unwrap();
        assert!(!panel.in_flight);
        assert!(panel.input.is_empty());
    }

    #[test]
    fn failed_note_submission_restores_the_input() {
        let mut app = loaded_app(vec![Target::new("Acme", "Not Contacted")]);
        app.notes = Some(NotesPanel::new("Acme".into()));
        if let Some(panel) = app.notes.as_mut() {
            panel.input = "draft".into();
        }
        app.submit_note();
        app.apply_reply(ApiReply::NoteAdded {
            organization: "Acme".into(),
            result: Err(ApiError::Http { status: 500 }),
        });
        let panel = app.notes.as_ref().unwrap();
        assert!(!panel.in_flight);
        assert_eq!(panel.input, "draft");
    }

    #[test]
    fn failed_note_add_still_surfaces_after_the_panel_closed() {
        let mut app = loaded_app(vec![Target::new("Acme", "Not Contacted")]);
        app.apply_reply(ApiReply::NoteAdded {
            organization: "Acme".into(),
            result: Err(ApiError::Http { status: 500 }),
        });
        assert!(app.notes.is_none());
        assert!(matches!(
            app.banner.as_ref(),
            Some(banner) if banner.kind == BannerKind::Error
        ));
    }

    #[test]
    fn quiet_note_replies_update_badges_without_touching_the_panel() {
        let mut app = loaded_app(vec![Target::new("Acme", "Not Contacted")]);
        app.apply_reply(ApiReply::Notes {
            organization: "Acme".into(),
            quiet: true,
            result: Ok(vec![Note {
                id: 1,
                target_id: "Acme".into(),
                content: "hi".into(),
                timestamp: Some("2026-01-05 09:00:00".into()),
            }]),
        });
        assert_eq!(app.store.badge("Acme").unwrap().count, 1);
        assert!(app.notes.is_none());
    }
}
