use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "reach", about = concat!("[>] reach v", env!("CARGO_PKG_VERSION"), " - your pipeline in the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend base URL (overrides config and REACH_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List targets grouped by column
    Targets(TargetsArgs),
    /// Move a target to a new status
    Move(MoveArgs),
    /// List, add, or delete notes on a target
    Note(NoteCmd),
    /// Search targets (case-insensitive substring)
    Search(SearchArgs),
    /// List configured columns with counts
    Columns,
}

#[derive(Args)]
pub struct TargetsArgs {
    /// Only show one column (by name or slug)
    #[arg(long)]
    pub column: Option<String>,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Organization name (the identity key)
    pub organization: String,
    /// New status, e.g. "Contacted" or "meeting-scheduled"
    pub status: String,
}

#[derive(Args)]
pub struct NoteCmd {
    #[command(subcommand)]
    pub action: NoteAction,
}

#[derive(Subcommand)]
pub enum NoteAction {
    /// List notes for a target, most recent first
    List {
        organization: String,
    },
    /// Add a note
    Add {
        organization: String,
        content: String,
    },
    /// Delete a note by id
    Rm {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct SearchArgs {
    pub query: String,
}
