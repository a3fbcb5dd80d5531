use serde::Serialize;

use crate::model::note::Note;
use crate::model::target::Target;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct BoardJson {
    pub columns: Vec<ColumnJson>,
    /// Targets whose status matches no configured column.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<Target>,
}

#[derive(Serialize)]
pub struct ColumnJson {
    pub name: String,
    pub slug: String,
    pub count: usize,
    pub targets: Vec<Target>,
}

#[derive(Serialize)]
pub struct MoveJson {
    pub organization: String,
    pub status: String,
    pub moved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct NotesJson {
    pub organization: String,
    pub notes: Vec<Note>,
}

#[derive(Serialize)]
pub struct SearchResultJson {
    pub query: String,
    pub matches: Vec<Target>,
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("error: failed to serialize output: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Human output
// ---------------------------------------------------------------------------

pub fn print_board(board: &BoardJson) {
    for column in &board.columns {
        println!("{} ({})", column.name, column.count);
        for target in &column.targets {
            println!("  {}", target_line(target));
        }
    }
    if !board.unmatched.is_empty() {
        println!("(no column) ({})", board.unmatched.len());
        for target in &board.unmatched {
            println!("  {}", target_line(target));
        }
    }
}

pub fn print_notes(notes: &NotesJson) {
    if notes.notes.is_empty() {
        println!("no notes for {}", notes.organization);
        return;
    }
    for note in &notes.notes {
        let when = note.timestamp.as_deref().unwrap_or("-");
        println!("[{}] {}  {}", note.id, when, note.content);
    }
}

fn target_line(target: &Target) -> String {
    let mut line = target.organization.clone();
    if let Some(grade) = &target.grade {
        line.push_str(&format!(" [{grade}]"));
    }
    if let Some(pop) = target.population {
        line.push_str(&format!(" pop {pop}"));
    }
    line
}
