//! Command-line driver over the note store.
//!
//! # Responsibility
//! - Run one store operation per invocation against the configured data dir.
//! - Flush before exit so a failed write is reported as a non-zero status.

use clap::{CommandFactory, Parser, Subcommand};
use log::{error, info};
use notepad_core::{
    default_log_level, init_logging, NoteField, NoteId, NoteStore, StoreConfig,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "notepad")]
#[command(about = "Notepad note store CLI")]
struct Cli {
    /// Directory holding notes.json (overrides NOTEPAD_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Commands {
    /// List notes, newest first.
    #[command(alias = "ls")]
    List,
    /// Create a note, optionally titled.
    New { title: Option<String> },
    /// Print a note (default: first note).
    Show { id: Option<String> },
    /// Replace a note title.
    SetTitle { id: String, value: String },
    /// Replace a note body.
    SetContent { id: String, value: String },
    /// Delete a note.
    #[command(alias = "rm")]
    Delete { id: String },
    /// Print the core version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let command = match cli.command {
        Some(Commands::Version) => {
            println!("notepad_core version={}", notepad_core::core_version());
            return Ok(());
        }
        Some(command) => command,
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    let config = resolve_config(cli.data_dir)?;
    if config.data_dir.is_absolute() {
        if let Err(err) = init_logging(default_log_level(), config.data_dir.join("logs")) {
            eprintln!("warning: logging disabled: {err}");
        }
    }
    let mut store = NoteStore::open(&config)?;

    match command {
        Commands::List => {
            for item in store.view().sidebar {
                println!("{}\t{}", item.id, item.label);
            }
        }
        Commands::New { title } => {
            let id = store.create();
            if let Some(title) = title {
                store.update(&id, NoteField::Title, title);
            }
            info!("event=cli_command module=cli status=ok command=new note_id={}", id);
            println!("{id}");
        }
        Commands::Show { id } => {
            if let Some(id) = id {
                store.select(id);
            }
            let note = store.active_note().ok_or("no matching note")?;
            println!("{}\n\n{}", note.display_title(), note.content);
        }
        Commands::SetTitle { id, value } => set_field(&mut store, &id, NoteField::Title, value)?,
        Commands::SetContent { id, value } => {
            set_field(&mut store, &id, NoteField::Content, value)?
        }
        Commands::Delete { id } => {
            if !store.delete(&NoteId::from(id.as_str())) {
                return Err(format!("no note with id `{id}`").into());
            }
            info!("event=cli_command module=cli status=ok command=delete note_id={}", id);
        }
        Commands::Version => {}
    }

    if let Err(err) = store.flush() {
        error!(
            "event=cli_command module=cli status=error error_code=write_failed error={}",
            err
        );
        return Err(err.into());
    }
    Ok(())
}

fn resolve_config(data_dir: Option<PathBuf>) -> Result<StoreConfig, Box<dyn Error>> {
    let from_env = StoreConfig::from_env()?;
    match data_dir {
        Some(dir) => Ok(StoreConfig::new(dir)?.with_write_debounce(from_env.write_debounce)),
        None => Ok(from_env),
    }
}

fn set_field(
    store: &mut NoteStore,
    id: &str,
    field: NoteField,
    value: String,
) -> Result<(), Box<dyn Error>> {
    if !store.update(&NoteId::from(id), field, value) {
        return Err(format!("no note with id `{id}`").into());
    }
    info!(
        "event=cli_command module=cli status=ok command=set field={} note_id={}",
        field, id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("notepad").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_is_allowed() {
        assert_eq!(parse(&[]).unwrap().command, None);
    }

    #[test]
    fn optional_positionals_are_captured() {
        assert_eq!(
            parse(&["new"]).unwrap().command,
            Some(Commands::New { title: None })
        );
        assert_eq!(
            parse(&["new", "Groceries"]).unwrap().command,
            Some(Commands::New {
                title: Some("Groceries".to_string())
            })
        );
        assert_eq!(
            parse(&["show", "abc"]).unwrap().command,
            Some(Commands::Show {
                id: Some("abc".to_string())
            })
        );
    }

    #[test]
    fn set_content_and_aliases_parse() {
        assert_eq!(
            parse(&["set-content", "abc", "hello"]).unwrap().command,
            Some(Commands::SetContent {
                id: "abc".to_string(),
                value: "hello".to_string(),
            })
        );
        assert_eq!(parse(&["ls"]).unwrap().command, Some(Commands::List));
        assert_eq!(
            parse(&["rm", "abc"]).unwrap().command,
            Some(Commands::Delete {
                id: "abc".to_string()
            })
        );
    }

    #[test]
    fn data_dir_flag_is_global() {
        let cli = parse(&["list", "--data-dir", "/tmp/notes"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/notes")));
    }

    #[test]
    fn missing_extra_and_unknown_arguments_are_rejected() {
        assert!(parse(&["set-title", "abc"]).is_err());
        assert!(parse(&["delete", "a", "b"]).is_err());
        assert!(parse(&["sync"]).is_err());
    }

    #[test]
    fn version_is_a_subcommand() {
        assert_eq!(parse(&["version"]).unwrap().command, Some(Commands::Version));
    }
}
