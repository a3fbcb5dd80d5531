use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::board::search::{SortDirection, SortField};

use super::app::{App, DragSession, LoadState, Mode, SortMenu};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Drag => handle_drag(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Notes => handle_notes(app, key),
        Mode::NoteInput => handle_note_input(app, key),
        Mode::ConfirmDeleteNote => handle_confirm_delete(app, key),
        Mode::SortMenu => handle_sort_menu(app, key),
        Mode::Help => handle_help(app, key),
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('?') => app.mode = Mode::Help,
        KeyCode::Char('r') => {
            // Retry affordance for a failed load; also a manual refresh.
            app.reload_targets();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            if app.cursor_col > 0 {
                app.cursor_col -= 1;
                app.cursor_row = 0;
                app.clamp_cursor();
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if app.cursor_col + 1 < app.columns.len() {
                app.cursor_col += 1;
                app.cursor_row = 0;
                app.clamp_cursor();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.cursor_row = app.cursor_row.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.cursor_row += 1;
            app.clamp_cursor();
        }
        KeyCode::Enter | KeyCode::Tab => {
            // Toggle card details.
            if let Some(organization) = app.cursor_organization()
                && let Some(target) = app.store.get(&organization)
            {
                let card_id = target.card_id();
                if !app.expanded.remove(&card_id) {
                    app.expanded.insert(card_id);
                }
            }
        }
        KeyCode::Char(' ') => {
            // Grab the card under the cursor: Idle -> Dragging.
            if matches!(app.load, LoadState::Loaded)
                && let Some(organization) = app.cursor_organization()
            {
                app.drag = Some(DragSession {
                    organization,
                    origin_col: app.cursor_col,
                    target_col: app.cursor_col,
                });
                app.mode = Mode::Drag;
            }
        }
        KeyCode::Char('/') => {
            app.search_input = app.query.clone();
            app.mode = Mode::Search;
        }
        KeyCode::Esc => {
            if !app.query.is_empty() {
                // Clearing the query restores all cards to visible.
                app.commit_query("");
            }
        }
        KeyCode::Char('n') => app.open_notes(),
        KeyCode::Char('s') => {
            if app.cursor_col < app.columns.len() {
                app.sort_menu = Some(SortMenu {
                    field_idx: 0,
                    direction: SortDirection::Ascending,
                });
                app.mode = Mode::SortMenu;
            }
        }
        KeyCode::Char('g') => app.locate_cursor_target(),
        _ => {}
    }
}

/// Dragging -> Dragging on retarget; -> Idle on drop or cancel.
fn handle_drag(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => {
            if let Some(drag) = app.drag.as_mut() {
                drag.target_col = drag.target_col.saturating_sub(1);
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if let Some(drag) = app.drag.as_mut()
                && drag.target_col + 1 < app.columns.len()
            {
                drag.target_col += 1;
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.drop_card();
            app.mode = Mode::Navigate;
        }
        KeyCode::Esc => {
            // Cancel: session cleared, decorations with it, nothing mutated.
            app.drag = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let query = app.search_input.trim().to_string();
            app.commit_query(query);
            app.mode = Mode::Navigate;
        }
        KeyCode::Esc => {
            app.search_input.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_input.push(c);
        }
        _ => {}
    }
}

fn handle_notes(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_notes(),
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(panel) = app.notes.as_mut() {
                panel.cursor = panel.cursor.saturating_sub(1);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(panel) = app.notes.as_mut()
                && panel.cursor + 1 < panel.notes.len()
            {
                panel.cursor += 1;
            }
        }
        KeyCode::Char('a') | KeyCode::Char('i') => {
            if app.notes.is_some() {
                app.mode = Mode::NoteInput;
            }
        }
        KeyCode::Char('d') => {
            if let Some(panel) = app.notes.as_mut()
                && let Some(note) = panel.notes.get(panel.cursor)
            {
                panel.confirm_delete = Some(note.id);
                app.mode = Mode::ConfirmDeleteNote;
            }
        }
        _ => {}
    }
}

fn handle_note_input(app: &mut App, key: KeyEvent) {
    // While a submission is in flight the input is disabled; only Esc works.
    let in_flight = app.notes.as_ref().is_some_and(|p| p.in_flight);
    match key.code {
        KeyCode::Esc => app.mode = Mode::Notes,
        KeyCode::Enter => {
            if !in_flight {
                app.submit_note();
            }
        }
        KeyCode::Backspace => {
            if !in_flight && let Some(panel) = app.notes.as_mut() {
                panel.input.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if !in_flight && let Some(panel) = app.notes.as_mut() {
                panel.input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_confirm_delete(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.delete_confirmed_note(),
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            if let Some(panel) = app.notes.as_mut() {
                panel.confirm_delete = None;
            }
            app.mode = Mode::Notes;
        }
        _ => {}
    }
}

fn handle_sort_menu(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.sort_menu = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(menu) = app.sort_menu.as_mut() {
                menu.field_idx = menu.field_idx.saturating_sub(1);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(menu) = app.sort_menu.as_mut()
                && menu.field_idx + 1 < SortField::ALL.len()
            {
                menu.field_idx += 1;
            }
        }
        KeyCode::Char('d') | KeyCode::Left | KeyCode::Right => {
            if let Some(menu) = app.sort_menu.as_mut() {
                menu.direction = menu.direction.flipped();
            }
        }
        KeyCode::Enter => app.apply_sort(),
        _ => {}
    }
}

fn handle_help(app: &mut App, key: KeyEvent) {
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')
    ) {
        app.mode = Mode::Navigate;
    }
}
