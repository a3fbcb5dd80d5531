use std::io::{self, BufRead, Write};

use crate::api::client::{ApiClient, Backend};
use crate::board::search;
use crate::board::store::TargetStore;
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::load_config;
use crate::model::column::{self, ColumnDef, columns_from_names};
use crate::model::config::BoardConfig;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Dispatch a parsed CLI invocation against the backend.
pub fn dispatch(cli: Cli) -> CliResult {
    let cwd = std::env::current_dir()?;
    let mut config = load_config(&cwd)?;
    if let Some(base) = &cli.api_base {
        config.api_base = base.trim_end_matches('/').to_string();
    }
    let client = ApiClient::new(&config.api_base)?;

    match cli.command {
        Some(Commands::Targets(args)) => cmd_targets(&client, &config, args, cli.json),
        Some(Commands::Move(args)) => cmd_move(&client, &config, args, cli.json),
        Some(Commands::Note(cmd)) => match cmd.action {
            NoteAction::List { organization } => cmd_note_list(&client, &organization, cli.json),
            NoteAction::Add {
                organization,
                content,
            } => cmd_note_add(&client, &organization, &content, cli.json),
            NoteAction::Rm { id, yes } => cmd_note_rm(&client, id, yes),
        },
        Some(Commands::Search(args)) => cmd_search(&client, &args.query, cli.json),
        Some(Commands::Columns) => cmd_columns(&client, &config, cli.json),
        None => unreachable!("no-subcommand launches the TUI from main"),
    }
}

/// Build the grouped board view the way the TUI does: store + projection.
fn fetch_board(
    client: &ApiClient,
    columns: &[ColumnDef],
) -> Result<(TargetStore, BoardJson), Box<dyn std::error::Error>> {
    let mut store = TargetStore::new();
    store.replace_all(client.fetch_targets()?);

    let groups = store.grouped(columns);
    let matched: std::collections::HashSet<String> = groups
        .iter()
        .flatten()
        .map(|t| t.organization.clone())
        .collect();

    let board = BoardJson {
        columns: columns
            .iter()
            .zip(&groups)
            .map(|(def, group)| ColumnJson {
                name: def.name.clone(),
                slug: def.slug.clone(),
                count: group.len(),
                targets: group.iter().map(|t| (*t).clone()).collect(),
            })
            .collect(),
        unmatched: store
            .targets()
            .filter(|t| !matched.contains(&t.organization))
            .cloned()
            .collect(),
    };
    Ok((store, board))
}

fn cmd_targets(client: &ApiClient, config: &BoardConfig, args: TargetsArgs, json: bool) -> CliResult {
    let mut columns = columns_from_names(&config.columns);
    if let Some(filter) = &args.column {
        let slug = column::slug(filter);
        columns.retain(|c| c.slug == slug);
        if columns.is_empty() {
            return Err(format!("no such column: {filter}").into());
        }
    }
    let (_, board) = fetch_board(client, &columns)?;
    if json {
        print_json(&board);
    } else {
        print_board(&board);
    }
    Ok(())
}

fn cmd_move(client: &ApiClient, config: &BoardConfig, args: MoveArgs, json: bool) -> CliResult {
    let (store, _) = fetch_board(client, &columns_from_names(&config.columns))?;
    let Some(target) = store.get(&args.organization) else {
        return Err(format!("unknown target: {}", args.organization).into());
    };

    // Same-status moves are idempotent no-ops: skip the request entirely.
    let moved = if target.column_slug() == column::slug(&args.status) {
        false
    } else {
        client.update_status(&args.organization, &args.status)?;
        true
    };

    let result = MoveJson {
        organization: args.organization.clone(),
        status: column::wire_label(&column::slug(&args.status)),
        moved,
        reason: (!moved).then(|| "already at that status".to_string()),
    };
    if json {
        print_json(&result);
    } else if moved {
        println!("moved {} -> {}", result.organization, result.status);
    } else {
        println!("{} is already at {}", result.organization, result.status);
    }
    Ok(())
}

fn cmd_note_list(client: &ApiClient, organization: &str, json: bool) -> CliResult {
    let notes = NotesJson {
        organization: organization.to_string(),
        notes: client.fetch_notes(organization)?,
    };
    if json {
        print_json(&notes);
    } else {
        print_notes(&notes);
    }
    Ok(())
}

fn cmd_note_add(client: &ApiClient, organization: &str, content: &str, json: bool) -> CliResult {
    let content = content.trim();
    if content.is_empty() {
        return Err("note content is empty".into());
    }
    let note = client.add_note(organization, content)?;
    if json {
        print_json(&note);
    } else {
        println!("added note {} to {}", note.id, organization);
    }
    Ok(())
}

fn cmd_note_rm(client: &ApiClient, id: i64, yes: bool) -> CliResult {
    if !yes && !confirm(&format!("delete note {id}?"))? {
        println!("aborted");
        return Ok(());
    }
    client.delete_note(id)?;
    println!("deleted note {id}");
    Ok(())
}

fn cmd_search(client: &ApiClient, query: &str, json: bool) -> CliResult {
    let targets = client.fetch_targets()?;
    let result = SearchResultJson {
        query: query.to_string(),
        matches: targets
            .into_iter()
            .filter(|t| search::matches(t, query))
            .collect(),
    };
    if json {
        print_json(&result);
    } else if result.matches.is_empty() {
        println!("no matches for {:?}", result.query);
    } else {
        for target in &result.matches {
            println!("{}  ({})", target.organization, target.status_str());
        }
    }
    Ok(())
}

fn cmd_columns(client: &ApiClient, config: &BoardConfig, json: bool) -> CliResult {
    let columns = columns_from_names(&config.columns);
    let (_, board) = fetch_board(client, &columns)?;
    if json {
        print_json(&board.columns);
    } else {
        for column in &board.columns {
            println!("{}  [{}]  {}", column.name, column.slug, column.count);
        }
    }
    Ok(())
}

/// y/N prompt on stdin.
fn confirm(prompt: &str) -> Result<bool, io::Error> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
