//! Command-line front end
//!
//! Thin layer over [`AppState`]: parses arguments, runs one operation and
//! prints the result.

use crate::app::AppState;
use crate::config::default_sync_interval;
use crate::models::{Note, NoteType, ProviderKind};
use crate::services::{
    CreateNoteRequest, Notification, NotificationKind, RemotePush, SyncNotifier, SyncOutcome,
    UpdateNoteRequest,
};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "notesync")]
#[command(about = "Notes with optional sync to a remote repository", long_about = None)]
#[command(version)]
pub struct Cli {
    /// App data directory holding the note cache and storage config
    #[arg(long, env = "NOTESYNC_DATA_DIR", default_value = ".notesync")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List notes, most recently updated first
    List {
        /// Only direct children of this note
        #[arg(long)]
        parent: Option<String>,

        /// Only notes without a parent
        #[arg(long, conflicts_with = "parent")]
        roots: bool,
    },

    /// Print one note as JSON
    Show { id: String },

    /// Create a note
    New {
        #[arg(short, long)]
        title: String,

        /// general, task, todo, meeting, journal, code or database
        #[arg(short = 'y', long = "type", default_value = "general")]
        note_type: NoteType,

        #[arg(short, long, default_value = "")]
        content: String,

        #[arg(short, long)]
        parent: Option<String>,

        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Edit fields of a note
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        #[arg(short = 'y', long = "type")]
        note_type: Option<NoteType>,

        /// Replaces all tags when given
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,

        /// Custom remote file name
        #[arg(long)]
        file_name: Option<String>,
    },

    /// Delete a note
    Delete { id: String },

    /// Search titles, content and tags
    Search { query: String },

    /// Replace local notes with the remote set now
    Sync,

    /// Keep syncing in the background until interrupted
    Watch {
        /// Seconds between syncs
        #[arg(long)]
        interval: Option<u64>,
    },

    /// View or modify the storage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the storage configuration (secrets masked)
    Show,

    /// Update fields and sync immediately
    Set(ConfigArgs),
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    #[arg(long)]
    pub provider: Option<ProviderKind>,
    #[arg(long)]
    pub enabled: Option<bool>,
    #[arg(long)]
    pub token: Option<String>,
    #[arg(long)]
    pub owner: Option<String>,
    #[arg(long)]
    pub repo: Option<String>,
    #[arg(long)]
    pub branch: Option<String>,
    #[arg(long)]
    pub api_url: Option<String>,
    #[arg(long)]
    pub access_key: Option<String>,
    #[arg(long)]
    pub secret_key: Option<String>,
    #[arg(long)]
    pub bucket: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub endpoint: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
}

/// Prints notifications to the terminal
pub struct ConsoleNotifier;

impl SyncNotifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                println!("{}: {}", notification.title, notification.body)
            }
            NotificationKind::Error => {
                eprintln!("{}: {}", notification.title, notification.body)
            }
        }
    }

    fn open_configuration(&self) {
        eprintln!("Sync is not configured. Run `notesync config set --provider github --enabled true --token <token> --owner <owner> --repo <repo>`");
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::open(cli.data_dir, Arc::new(ConsoleNotifier))
        .await
        .context("Failed to open app data directory")?;

    match cli.command {
        Commands::List { parent, roots } => {
            let notes = match (parent, roots) {
                (Some(parent), _) => state.notes_service.children(&parent).await?,
                (None, true) => state.notes_service.root_notes().await?,
                (None, false) => state.notes_service.list_notes().await?,
            };
            print_notes(&notes);
        }
        Commands::Show { id } => {
            let note = state.notes_service.get_note(&id).await?;
            println!("{}", serde_json::to_string_pretty(&note)?);
        }
        Commands::New {
            title,
            note_type,
            content,
            parent,
            tags,
        } => {
            let saved = state
                .create_note(CreateNoteRequest {
                    title,
                    note_type,
                    content,
                    parent_id: parent,
                    tags: tags.into_iter().collect(),
                })
                .await?;
            println!("{}", saved.note.id());
            print_push(&saved.remote);
        }
        Commands::Edit {
            id,
            title,
            content,
            note_type,
            tags,
            file_name,
        } => {
            let saved = state
                .update_note(UpdateNoteRequest {
                    id,
                    title,
                    content,
                    note_type,
                    tags: tags.map(|tags| tags.into_iter().collect::<BTreeSet<_>>()),
                    file_name,
                })
                .await?;
            println!("Saved {}", saved.note.id());
            print_push(&saved.remote);
        }
        Commands::Delete { id } => {
            let remote = state.delete_note(&id).await?;
            println!("Deleted {}", id);
            print_push(&remote);
        }
        Commands::Search { query } => {
            let notes = state.notes_service.search_notes(&query).await?;
            print_notes(&notes);
        }
        Commands::Sync => {
            let outcome = state.sync_now().await?;
            if let SyncOutcome::Failed { .. } = outcome {
                anyhow::bail!("Sync failed");
            }
        }
        Commands::Watch { interval } => {
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or_else(default_sync_interval);

            state.start_background_sync(interval).await?;
            if !state.scheduler.is_scheduled().await {
                eprintln!("Sync is disabled, nothing to watch");
                state.stop_background_sync().await?;
                return Ok(());
            }

            println!("Syncing every {:?}, press Ctrl-C to stop", interval);
            tokio::signal::ctrl_c().await?;

            state.stop_background_sync().await?;
        }
        Commands::Config(ConfigCommand::Show) => {
            let mut config = state.storage_config().await?;
            for secret in [
                &mut config.token,
                &mut config.secret_key,
                &mut config.password,
            ] {
                if secret.is_some() {
                    *secret = Some("********".to_string());
                }
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Config(ConfigCommand::Set(args)) => {
            let mut config = state.storage_config().await?;
            apply_config_args(&mut config, args);
            state.update_storage_config(config).await?;
        }
    }

    Ok(())
}

fn apply_config_args(config: &mut crate::models::StorageConfig, args: ConfigArgs) {
    if let Some(provider) = args.provider {
        config.provider = provider;
    }
    if let Some(enabled) = args.enabled {
        config.enabled = enabled;
    }

    let fields = [
        (&mut config.token, args.token),
        (&mut config.owner, args.owner),
        (&mut config.repo, args.repo),
        (&mut config.branch, args.branch),
        (&mut config.api_url, args.api_url),
        (&mut config.access_key, args.access_key),
        (&mut config.secret_key, args.secret_key),
        (&mut config.bucket, args.bucket),
        (&mut config.region, args.region),
        (&mut config.endpoint, args.endpoint),
        (&mut config.username, args.username),
        (&mut config.password, args.password),
    ];

    // An empty value clears the field
    for (field, value) in fields {
        if let Some(value) = value {
            *field = if value.is_empty() { None } else { Some(value) };
        }
    }
}

fn print_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("No notes");
        return;
    }

    for note in notes {
        println!(
            "{}  {:<8}  {}  {}",
            note.id(),
            note.metadata.note_type,
            note.metadata.updated_at.format("%Y-%m-%d %H:%M"),
            note.title()
        );
    }
}

fn print_push(remote: &RemotePush) {
    match remote {
        RemotePush::Skipped => {}
        RemotePush::Pushed => println!("Pushed to remote"),
        RemotePush::Failed { message } => eprintln!("Remote push failed: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StorageConfig;

    #[test]
    fn test_cli_parses_new_note() {
        let cli = Cli::try_parse_from([
            "notesync", "--data-dir", "/tmp/x", "new", "--title", "Plan", "--type", "todo",
            "--tag", "a", "--tag", "b",
        ])
        .unwrap();

        match cli.command {
            Commands::New {
                title,
                note_type,
                tags,
                ..
            } => {
                assert_eq!(title, "Plan");
                assert_eq!(note_type, NoteType::Todo);
                assert_eq!(tags, vec!["a", "b"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_provider() {
        let result = Cli::try_parse_from(["notesync", "config", "set", "--provider", "ftp"]);
        assert!(result.is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_watch_returns_when_sync_disabled() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let data_dir = temp_dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "notesync", "--data-dir", data_dir, "watch", "--interval", "60",
        ])
        .unwrap();

        let result = tokio::time::timeout(Duration::from_secs(10), run(cli)).await;

        assert!(matches!(result, Ok(Ok(()))));
    }

    #[test]
    fn test_apply_config_args() {
        let mut config = StorageConfig::github("old", "octo", "notes");

        apply_config_args(
            &mut config,
            ConfigArgs {
                token: Some("new".to_string()),
                repo: Some(String::new()),
                enabled: Some(false),
                ..ConfigArgs::default()
            },
        );

        assert_eq!(config.token.as_deref(), Some("new"));
        assert_eq!(config.owner.as_deref(), Some("octo"));
        assert!(config.repo.is_none());
        assert!(!config.enabled);
    }
}
