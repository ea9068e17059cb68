//! # RagInfo CLI (`raginfo`)
//!
//! The `raginfo` binary is the primary interface for RagInfo. It provides
//! commands for ingesting documents, asking grounded questions, managing
//! settings and chat history, and exporting or importing the whole
//! knowledge base.
//!
//! ## Usage
//!
//! ```bash
//! raginfo --config ./raginfo.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `raginfo add <files>` | Ingest text files into the knowledge base |
//! | `raginfo list` | List ingested documents |
//! | `raginfo remove <id>` | Remove a document |
//! | `raginfo ask "<question>"` | Answer a question from the stored documents |
//! | `raginfo chats list` | Show the chat history |
//! | `raginfo chats remove <id>` | Delete one chat exchange |
//! | `raginfo settings show` | Show the current settings |
//! | `raginfo settings set` | Update the API key or model |
//! | `raginfo export <file>` | Write the whole state as JSON |
//! | `raginfo import <file>` | Replace the state from an exported file |
//! | `raginfo reset` | Delete everything |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use raginfo::config;
use raginfo::export;
use raginfo::gemini::GeminiClient;
use raginfo::ingest;
use raginfo::models::AVAILABLE_MODELS;
use raginfo::progress::ProgressMode;
use raginfo::query;
use raginfo::store::{FileSlot, StateStore};

/// RagInfo — a local-first document chat knowledge base.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; a missing file falls back to built-in defaults.
#[derive(Parser)]
#[command(
    name = "raginfo",
    about = "RagInfo — chat with your documents, stored locally and encrypted at rest",
    version,
    long_about = "RagInfo ingests text documents, chunks them into overlapping segments, and \
    answers questions about them through a generative model, grounding every answer in the \
    stored chunks. All state lives in a single JSON record on disk with the API key encrypted \
    at rest."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./raginfo.toml`. Storage location and chunking
    /// parameters are read from this file.
    #[arg(long, global = true, default_value = "./raginfo.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Ingest text files into the knowledge base.
    ///
    /// Files are processed one at a time in the order given; each document
    /// is persisted as soon as it is chunked, and a failed file is skipped
    /// without aborting the rest of the batch.
    Add {
        /// Files to ingest (UTF-8 text, 10 MB per file at most).
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Progress output: `off`, `human`, or `json`.
        /// Defaults to `human` when stderr is a terminal, otherwise `off`.
        #[arg(long)]
        progress: Option<String>,
    },

    /// List ingested documents with their ids and chunk counts.
    List,

    /// Remove a document by id.
    Remove {
        /// Document id (as shown by `raginfo list`).
        id: String,
    },

    /// Answer a question from the stored documents.
    ///
    /// Sends every stored chunk as context; the model is instructed to
    /// answer only from that context. The exchange is appended to the chat
    /// history. Requires an API key (`raginfo settings set --api-key`).
    Ask {
        /// The question to answer.
        question: String,
    },

    /// Inspect or prune the chat history.
    Chats {
        #[command(subcommand)]
        action: ChatsAction,
    },

    /// Show or update settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Write the whole state to a JSON file.
    ///
    /// The export is a portable plaintext backup, including the API key.
    Export {
        /// Output file path.
        output: PathBuf,
    },

    /// Replace the state from an exported JSON file.
    ///
    /// All-or-nothing: a malformed file is rejected and the current state
    /// is left untouched. Exports from older versions are migrated.
    Import {
        /// Input file path.
        input: PathBuf,
    },

    /// Delete all documents, chats, and settings.
    Reset,
}

/// Chat history subcommands.
#[derive(Subcommand)]
enum ChatsAction {
    /// Show all chat exchanges.
    List,
    /// Delete one exchange by id.
    Remove {
        /// Chat id (as shown by `raginfo chats list`).
        id: String,
    },
}

/// Settings subcommands.
#[derive(Subcommand)]
enum SettingsAction {
    /// Show the configured model and whether an API key is set.
    Show,
    /// Update the API key and/or model.
    Set {
        /// Google AI API key. Stored encrypted.
        #[arg(long)]
        api_key: Option<String>,

        /// Model id. One of: gemini-1.5-flash-latest, gemini-pro.
        #[arg(long)]
        model: Option<String>,
    },
}

fn parse_progress(value: Option<&str>) -> Result<ProgressMode> {
    Ok(match value {
        None => ProgressMode::default_for_tty(),
        Some("off") => ProgressMode::Off,
        Some("human") => ProgressMode::Human,
        Some("json") => ProgressMode::Json,
        Some(other) => bail!("invalid --progress value '{other}': use off, human, or json"),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;
    let store = StateStore::new(Arc::new(FileSlot::new(&cfg.storage.path)));

    match cli.command {
        Commands::Add { paths, progress } => {
            let mode = parse_progress(progress.as_deref())?;
            let reporter = mode.reporter();
            let state = store.load().await?;
            let (_, report) = ingest::ingest_batch(
                &store,
                state,
                &paths,
                &raginfo::extract::PlainTextExtractor,
                cfg.chunking.params(),
                reporter.as_ref(),
            )
            .await?;

            println!("add");
            println!("  added: {} documents", report.added);
            println!("  chunks written: {}", report.chunks_written);
            if !report.failed.is_empty() {
                println!("  failed: {}", report.failed.len());
                for failure in &report.failed {
                    println!("    {}: {}", failure.name, failure.error);
                }
            }
            println!("ok");
        }
        Commands::List => {
            let state = store.load().await?;
            if state.files.is_empty() {
                println!("no documents");
            } else {
                for doc in &state.files {
                    println!("{}  {}  {} chunks", doc.id, doc.name, doc.chunks.len());
                }
            }
        }
        Commands::Remove { id } => {
            let state = store.load().await?;
            if !state.files.iter().any(|f| f.id == id) {
                bail!("no document with id '{id}'");
            }
            store.save(&state.without_file(&id)).await?;
            println!("removed {id}");
        }
        Commands::Ask { question } => {
            let state = store.load().await?;
            let client = GeminiClient::new();
            let chat = query::answer_query(&client, &state, &question).await?;
            println!("{}", chat.ai_response);
            store.save(&state.with_chat(chat)).await?;
        }
        Commands::Chats { action } => match action {
            ChatsAction::List => {
                let state = store.load().await?;
                if state.chats.is_empty() {
                    println!("no chats");
                }
                for chat in &state.chats {
                    println!("{}", chat.id);
                    println!("  Q: {}", chat.user_query);
                    println!("  A: {}", chat.ai_response);
                }
            }
            ChatsAction::Remove { id } => {
                let state = store.load().await?;
                if !state.chats.iter().any(|c| c.id == id) {
                    bail!("no chat with id '{id}'");
                }
                store.save(&state.without_chat(&id)).await?;
                println!("removed {id}");
            }
        },
        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                let state = store.load().await?;
                println!("model: {}", state.settings.model);
                if state.settings.api_key.is_empty() {
                    println!("api key: not set");
                } else {
                    println!("api key: set");
                }
            }
            SettingsAction::Set { api_key, model } => {
                if api_key.is_none() && model.is_none() {
                    bail!("nothing to set: pass --api-key and/or --model");
                }
                let state = store.load().await?;
                let mut settings = state.settings.clone();
                if let Some(key) = api_key {
                    settings.api_key = key;
                }
                if let Some(model) = model {
                    if !AVAILABLE_MODELS.contains(&model.as_str()) {
                        bail!(
                            "unknown model '{}'. Available: {}",
                            model,
                            AVAILABLE_MODELS.join(", ")
                        );
                    }
                    settings.model = model;
                }
                store.save(&state.with_settings(settings)).await?;
                println!("settings updated");
            }
        },
        Commands::Export { output } => {
            let state = store.load().await?;
            let json = export::export_state(&state)?;
            std::fs::write(&output, json)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("exported to {}", output.display());
        }
        Commands::Import { input } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let state = export::import_state(&raw)?;
            store.save(&state).await?;
            println!(
                "imported {} documents, {} chats",
                state.files.len(),
                state.chats.len()
            );
        }
        Commands::Reset => {
            store.save(&raginfo::models::AppState::default()).await?;
            println!("state reset");
        }
    }

    Ok(())
}
