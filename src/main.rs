//! # Contact Keeper CLI (`ck`)
//!
//! The `ck` binary is the primary interface for Contact Keeper. It adds,
//! edits, and removes contacts, records interactions, and exports the
//! collection as CSV.
//!
//! ## Usage
//!
//! ```bash
//! ck --config ./config/ck.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ck add` | Create a contact |
//! | `ck update <id>` | Replace fields on a contact |
//! | `ck delete <id>` | Remove a contact |
//! | `ck list` | List contacts, optionally filtered |
//! | `ck show <id>` | Print one contact in full |
//! | `ck log <id> <content>` | Record an interaction |
//! | `ck prefer <id> <category> <value>` | Append a preference |
//! | `ck journey <id> <category> <value>` | Append a personal-journey item |
//! | `ck export` | Write the collection as CSV |
//! | `ck stats` | Summarize the collection |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use contact_keeper::config;
use contact_keeper::contact_cmd::{self, ContactFields};
use contact_keeper::export::ExportTarget;
use contact_keeper::logging;
use contact_keeper::models::{
    InteractionKind, JourneyCategory, NewInteraction, PreferenceCategory, Sentiment,
};
use contact_keeper::stats;

/// Contact Keeper CLI — a local-first contact store with interaction
/// history and CSV export.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file falls back to the built-in defaults.
#[derive(Parser)]
#[command(
    name = "ck",
    about = "Contact Keeper — a local-first contact store with interaction history and CSV export",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/ck.toml")]
    config: PathBuf,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new contact.
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[command(flatten)]
        fields: ContactFields,
    },

    /// Update fields on an existing contact.
    ///
    /// Every flag given replaces the stored value. Grouped fields
    /// (preferences, journey, dates) replace their whole group.
    Update {
        /// Contact id.
        id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[command(flatten)]
        fields: ContactFields,
    },

    /// Delete a contact.
    Delete {
        /// Contact id.
        id: String,
    },

    /// List contacts, most recently added first.
    List {
        /// Case-insensitive filter on first name, last name, or email.
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one contact with its interaction history.
    Show {
        /// Contact id.
        id: String,
    },

    /// Record an interaction with a contact.
    Log {
        /// Contact id.
        id: String,
        /// What happened.
        content: String,
        /// Interaction type: meeting, call, email, note, or other.
        #[arg(long = "type", default_value = "note")]
        kind: InteractionKind,
        /// Something to follow up on.
        #[arg(long)]
        follow_up: Option<String>,
        /// positive, neutral, or needs-attention.
        #[arg(long, default_value = "neutral")]
        sentiment: Sentiment,
    },

    /// Append a preference: dietary, cultural, communication, or general.
    Prefer {
        id: String,
        category: PreferenceCategory,
        value: String,
    },

    /// Append a journey item: dreams, values, interests, or aspirations.
    Journey {
        id: String,
        category: JourneyCategory,
        value: String,
    },

    /// Export all contacts as CSV.
    Export {
        /// Output directory (defaults to `export.dir` from config).
        #[arg(long, conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Write the CSV to stdout instead of a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show collection statistics.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let cfg = config::load_config_or_default(&cli.config)?;

    match cli.command {
        Commands::Add {
            first_name,
            last_name,
            email,
            fields,
        } => {
            let data = fields.into_new_contact(first_name, last_name, email);
            contact_cmd::run_add(&cfg, data).await?;
        }
        Commands::Update {
            id,
            first_name,
            last_name,
            email,
            fields,
        } => {
            let patch = fields.into_patch(first_name, last_name, email);
            contact_cmd::run_update(&cfg, &id, patch).await?;
        }
        Commands::Delete { id } => {
            contact_cmd::run_delete(&cfg, &id).await?;
        }
        Commands::List { search } => {
            contact_cmd::run_list(&cfg, search.as_deref()).await?;
        }
        Commands::Show { id } => {
            contact_cmd::run_show(&cfg, &id).await?;
        }
        Commands::Log {
            id,
            content,
            kind,
            follow_up,
            sentiment,
        } => {
            let interaction = NewInteraction {
                content,
                kind: Some(kind),
                follow_up,
                sentiment: Some(sentiment),
            };
            contact_cmd::run_log(&cfg, &id, interaction).await?;
        }
        Commands::Prefer {
            id,
            category,
            value,
        } => {
            contact_cmd::run_prefer(&cfg, &id, category, &value).await?;
        }
        Commands::Journey {
            id,
            category,
            value,
        } => {
            contact_cmd::run_journey(&cfg, &id, category, &value).await?;
        }
        Commands::Export { output, stdout } => {
            let target = if stdout {
                ExportTarget::Stdout
            } else {
                ExportTarget::Directory(output.unwrap_or_else(|| cfg.export.dir.clone()))
            };
            contact_cmd::run_export(&cfg, target).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
