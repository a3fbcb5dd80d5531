use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::board::search::{SortDirection, SortField};
use crate::model::note::format_note_time;
use crate::model::target::Target;

use super::app::{App, BannerKind, LoadState, Mode};

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_title(frame, app, rows[0]);
    match &app.load {
        LoadState::Loading => render_center_message(frame, app, rows[1], "loading targets..."),
        LoadState::Failed(msg) => render_center_message(
            frame,
            app,
            rows[1],
            &format!("failed to load targets: {msg}\npress r to retry"),
        ),
        LoadState::Loaded => render_board(frame, app, rows[1]),
    }
    render_status_row(frame, app, rows[2]);

    match app.mode {
        Mode::Notes | Mode::NoteInput | Mode::ConfirmDeleteNote => render_notes_popup(frame, app),
        Mode::SortMenu => render_sort_menu(frame, app),
        Mode::Help => render_help(frame, app),
        _ => {}
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let total: usize = app.visible_counts().iter().sum();
    let mut spans = vec![
        Span::styled(
            " reach ",
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{total} targets"),
            Style::default().fg(app.theme.count),
        ),
    ];
    if !app.query.is_empty() {
        spans.push(Span::styled(
            format!("  filter: {:?}", app.query),
            Style::default().fg(app.theme.info),
        ));
    }
    if app.sync.pending_count() > 0 {
        spans.push(Span::styled(
            format!("  {} pending", app.sync.pending_count()),
            Style::default().fg(app.theme.badge),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_center_message(frame: &mut Frame, app: &App, area: Rect, text: &str) {
    let para = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text))
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: true });
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);
    frame.render_widget(para, vertical[1]);
}

fn render_board(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.columns.is_empty() {
        render_center_message(frame, app, area, "no columns configured");
        return;
    }
    let constraints: Vec<Constraint> = app
        .columns
        .iter()
        .map(|_| Constraint::Ratio(1, app.columns.len() as u32))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let counts = app.visible_counts();
    for col in 0..app.columns.len() {
        render_column(frame, app, slots[col], col, counts[col]);
    }
}

fn render_column(frame: &mut Frame, app: &mut App, area: Rect, col: usize, count: usize) {
    let dragging = app.drag.is_some();
    let is_drop_target = app.drag.as_ref().is_some_and(|d| d.target_col == col);
    let is_cursor_col = app.cursor_col == col;

    let border_color = if is_drop_target {
        app.theme.drop_target
    } else if dragging {
        app.theme.dim
    } else if is_cursor_col {
        app.theme.highlight
    } else {
        app.theme.column_border
    };
    let border_type = if is_drop_target {
        BorderType::Thick
    } else {
        BorderType::Plain
    };

    let column = &app.columns[col];
    let title = format!(" {} ({count}) ", column.name);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            title,
            Style::default()
                .fg(if is_drop_target {
                    app.theme.drop_target
                } else {
                    app.theme.text_bright
                })
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible: Vec<String> = app
        .visible_in_column(col)
        .into_iter()
        .map(String::from)
        .collect();
    if visible.is_empty() {
        return;
    }

    // Build all card lines, tracking where the cursor card starts/ends so
    // the scroll offset can keep it in view.
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_span: Option<(usize, usize)> = None;
    for (row, organization) in visible.iter().enumerate() {
        let Some(target) = app.store.get(organization) else {
            continue;
        };
        let selected = is_cursor_col && row == app.cursor_row && app.drag.is_none();
        let lifted = app
            .drag
            .as_ref()
            .is_some_and(|d| d.organization == *organization);
        let start = lines.len();
        card_lines(app, target, selected, lifted, dragging, inner.width, &mut lines);
        if selected || lifted {
            cursor_span = Some((start, lines.len()));
        }
    }

    adjust_scroll(
        &mut app.scroll[col],
        cursor_span,
        inner.height as usize,
        lines.len(),
    );
    let para = Paragraph::new(lines).scroll((app.scroll[col] as u16, 0));
    frame.render_widget(para, inner);
}

/// Keep the tracked card's line span inside the viewport. Columns without a
/// tracked card keep their existing offset, clamped to the content.
fn adjust_scroll(scroll: &mut usize, span: Option<(usize, usize)>, height: usize, total: usize) {
    if let Some((top, bottom)) = span {
        if top < *scroll {
            *scroll = top;
        } else if bottom > *scroll + height {
            *scroll = bottom.saturating_sub(height);
        }
    }
    *scroll = (*scroll).min(total.saturating_sub(1));
}

fn card_lines(
    app: &App,
    target: &Target,
    selected: bool,
    lifted: bool,
    dragging: bool,
    width: u16,
    out: &mut Vec<Line<'static>>,
) {
    let theme = &app.theme;
    // Dragging dims everything except the lifted card.
    let base = if lifted {
        Style::default()
            .fg(theme.text_bright)
            .add_modifier(Modifier::BOLD)
    } else if dragging {
        Style::default().fg(theme.dim)
    } else if selected {
        Style::default().fg(theme.text_bright).bg(theme.selection_bg)
    } else {
        Style::default().fg(theme.text)
    };

    let marker = if lifted {
        "◆ "
    } else if selected {
        "▸ "
    } else {
        "  "
    };
    let mut title_spans = vec![
        Span::styled(marker.to_string(), base),
        Span::styled(truncate(&target.organization, width.saturating_sub(8)), base),
    ];
    if let Some(badge) = app.store.badge(&target.organization)
        && badge.count > 0
    {
        title_spans.push(Span::styled(
            format!(" ({})", badge.count),
            if dragging && !lifted {
                base
            } else {
                Style::default().fg(theme.badge)
            },
        ));
    }
    out.push(Line::from(title_spans));

    if app.expanded.contains(&target.card_id()) {
        let detail = if dragging && !lifted {
            Style::default().fg(theme.dim)
        } else {
            Style::default().fg(theme.count)
        };
        let mut push = |label: &str, value: String| {
            out.push(Line::from(Span::styled(
                truncate(&format!("    {label}: {value}"), width),
                detail,
            )));
        };
        if let Some(address) = &target.address {
            push("addr", address.clone());
        }
        if let Some(phone) = &target.phone {
            push("phone", phone.clone());
        }
        if let Some(website) = &target.website {
            push("web", website.clone());
        }
        if let Some(population) = target.population {
            push("pop", population.to_string());
        }
        if let Some(income) = target.median_income {
            push("income", format!("${income}"));
        }
        if let Some(grade) = &target.grade {
            push("grade", grade.clone());
        }
        if let Some(badge) = app.store.badge(&target.organization)
            && let Some(ts) = &badge.last_timestamp
        {
            push("last note", format_note_time(ts, chrono::Local::now()));
        }
    }
}

fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = if let Some(banner) = &app.banner {
        let color = match banner.kind {
            BannerKind::Info => theme.info,
            BannerKind::Error => theme.error,
            BannerKind::Offline => theme.offline,
        };
        Line::from(Span::styled(
            format!(" {}", banner.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    } else if app.mode == Mode::Search {
        Line::from(vec![
            Span::styled(" /", Style::default().fg(theme.highlight)),
            Span::styled(
                app.search_input.clone(),
                Style::default().fg(theme.text_bright),
            ),
            Span::styled("▌", Style::default().fg(theme.highlight)),
        ])
    } else if !app.config.ui.show_key_hints {
        Line::default()
    } else {
        let hints = match app.mode {
            Mode::Drag => " h/l target column · space/enter drop · esc cancel",
            Mode::Navigate => {
                " hjkl move · space grab · enter details · n notes · / search · s sort · g locate · r reload · ? help"
            }
            _ => "",
        };
        Line::from(Span::styled(hints, Style::default().fg(theme.dim)))
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Centered overlay rect, clamped to the frame.
fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_notes_popup(frame: &mut Frame, app: &App) {
    let Some(panel) = &app.notes else {
        return;
    };
    let theme = &app.theme;
    let area = popup_rect(frame.area(), 60, 18);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight))
        .title(Span::styled(
            format!(" Notes for {} ", panel.organization),
            Style::default()
                .fg(theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    let mut lines: Vec<Line> = Vec::new();
    if panel.loading {
        lines.push(Line::from(Span::styled(
            "loading...",
            Style::default().fg(theme.dim),
        )));
    } else if panel.notes.is_empty() {
        lines.push(Line::from(Span::styled(
            "no notes yet",
            Style::default().fg(theme.dim),
        )));
    } else {
        let now = chrono::Local::now();
        for (idx, note) in panel.notes.iter().enumerate() {
            let selected = idx == panel.cursor && app.mode != Mode::NoteInput;
            let style = if selected {
                Style::default().fg(theme.text_bright).bg(theme.selection_bg)
            } else {
                Style::default().fg(theme.text)
            };
            let when = note
                .timestamp
                .as_deref()
                .map(|ts| format_note_time(ts, now))
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", note.content), style),
                Span::styled(when, Style::default().fg(theme.dim)),
            ]));
        }
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), sections[0]);

    let input_line = if app.mode == Mode::ConfirmDeleteNote {
        Line::from(Span::styled(
            "delete this note? y/n",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        ))
    } else if panel.in_flight {
        Line::from(Span::styled(
            "saving...",
            Style::default().fg(theme.badge),
        ))
    } else if app.mode == Mode::NoteInput {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.highlight)),
            Span::styled(panel.input.clone(), Style::default().fg(theme.text_bright)),
            Span::styled("▌", Style::default().fg(theme.highlight)),
        ])
    } else {
        Line::from(Span::styled(
            "a add · d delete · j/k move · esc close",
            Style::default().fg(theme.dim),
        ))
    };
    frame.render_widget(Paragraph::new(input_line), sections[1]);
}

fn render_sort_menu(frame: &mut Frame, app: &App) {
    let Some(menu) = app.sort_menu else {
        return;
    };
    let theme = &app.theme;
    let area = popup_rect(frame.area(), 34, SortField::ALL.len() as u16 + 3);
    frame.render_widget(Clear, area);

    let direction = match menu.direction {
        SortDirection::Ascending => "ascending",
        SortDirection::Descending => "descending",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight))
        .title(Span::styled(
            format!(" sort ({direction}) "),
            Style::default().fg(theme.text_bright),
        ))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = SortField::ALL
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let selected = idx == menu.field_idx;
            let marker = if selected { "▸ " } else { "  " };
            let style = if selected {
                Style::default().fg(theme.text_bright).bg(theme.selection_bg)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(Span::styled(format!("{marker}{}", field.label()), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let entries: &[(&str, &str)] = &[
        ("h/j/k/l", "move between cards and columns"),
        ("space", "grab / drop a card"),
        ("esc", "cancel drag, clear search"),
        ("enter", "expand / collapse card details"),
        ("n", "notes for the selected card"),
        ("/", "search (enter applies, esc keeps old filter)"),
        ("s", "sort this column"),
        ("g", "locate on the host map"),
        ("r", "reload targets"),
        ("q", "quit"),
    ];
    let area = popup_rect(frame.area(), 52, entries.len() as u16 + 2);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight))
        .title(Span::styled(
            " keys ",
            Style::default().fg(theme.text_bright),
        ))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = entries
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!(" {keys:<8}"), Style::default().fg(theme.highlight)),
                Span::styled(*what, Style::default().fg(theme.text)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Truncate to a display width, appending `…` when cut.
fn truncate(text: &str, max_width: u16) -> String {
    let max_width = max_width as usize;
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.to_string().width();
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer organization name", 10), "a longer …");
    }

    #[test]
    fn truncate_never_exceeds_a_tiny_budget() {
        assert_eq!(truncate("abc", 0), "");
        assert_eq!(truncate("abc", 1), "…");
    }

    #[test]
    fn scroll_is_untouched_for_columns_without_a_tracked_card() {
        let mut scroll = 7;
        adjust_scroll(&mut scroll, None, 5, 20);
        assert_eq!(scroll, 7);
        // Still clamped when the content shrinks.
        adjust_scroll(&mut scroll, None, 5, 3);
        assert_eq!(scroll, 2);
    }

    #[test]
    fn scroll_follows_the_tracked_card_into_view() {
        let mut scroll = 0;
        adjust_scroll(&mut scroll, Some((8, 10)), 5, 20);
        assert_eq!(scroll, 5);
        adjust_scroll(&mut scroll, Some((2, 3)), 5, 20);
        assert_eq!(scroll, 2);
    }

    #[test]
    fn popup_rect_is_clamped_to_the_frame() {
        let area = Rect::new(0, 0, 20, 10);
        let popup = popup_rect(area, 60, 18);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
    }
}
