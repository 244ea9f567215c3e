//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::jott;
use super::output::{Output, OutputFormat};
use crate::service::CoreError;

#[derive(Parser)]
#[command(name = "jott")]
#[command(author, version, about = "Compose, publish, and share structured card documents")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Act as this user ID instead of the signed-in one
    #[arg(long, global = true, env = "JOTT_ACTOR")]
    pub actor: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a jframe workspace and sign in
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Display handle for the signed-in user
        #[arg(long, default_value = "jotter")]
        handle: String,
    },

    /// Create a new draft jott
    Create {
        /// Jott title
        title: String,

        /// Brief description
        #[arg(long, short)]
        description: Option<String>,

        /// Card JSON (defaults to an empty card)
        #[arg(long)]
        content: Option<String>,

        /// Read card JSON from a file
        #[arg(long, conflicts_with = "content")]
        content_file: Option<PathBuf>,
    },

    /// List your jotts, newest first
    List,

    /// Show a jott's details and card JSON
    Show {
        /// Jott ID
        id: String,
    },

    /// Edit fields of a jott you own
    Edit {
        /// Jott ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New card JSON
        #[arg(long)]
        content: Option<String>,

        /// Read new card JSON from a file
        #[arg(long, conflicts_with = "content")]
        content_file: Option<PathBuf>,

        /// Visibility (public or private)
        #[arg(long)]
        visibility: Option<String>,
    },

    /// Publish a jott
    Publish {
        /// Jott ID
        id: String,
    },

    /// Revert a jott to draft
    Unpublish {
        /// Jott ID
        id: String,
    },

    /// Delete a jott (does not refund quota)
    Delete {
        /// Jott ID
        id: String,
    },

    /// Record a view against a public jott
    View {
        /// Jott ID
        id: String,
    },

    /// Show this month's creation quota
    Quota,

    /// Show or update your subscription profile
    Profile {
        /// Subscription tier (free, pro, team)
        #[arg(long)]
        tier: Option<String>,

        /// Monthly creation limit
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show the signed-in user
    Whoami,
}

/// Parses arguments and executes the appropriate command
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);
    let actor = cli.actor.as_deref();

    let result = match cli.command {
        Commands::Init { path, handle } => jott::init(&output, &path, &handle),
        Commands::Create {
            title,
            description,
            content,
            content_file,
        } => jott::create(&output, actor, &title, description, content, content_file),
        Commands::List => jott::list(&output, actor),
        Commands::Show { id } => jott::show(&output, actor, &id),
        Commands::Edit {
            id,
            title,
            description,
            content,
            content_file,
            visibility,
        } => jott::edit(
            &output,
            actor,
            &id,
            title,
            description,
            content,
            content_file,
            visibility,
        ),
        Commands::Publish { id } => jott::publish(&output, actor, &id, true),
        Commands::Unpublish { id } => jott::publish(&output, actor, &id, false),
        Commands::Delete { id } => jott::delete(&output, actor, &id),
        Commands::View { id } => jott::view(&output, &id),
        Commands::Quota => jott::quota(&output, actor),
        Commands::Profile { tier, limit } => jott::profile(&output, actor, tier, limit),
        Commands::Whoami => jott::whoami(&output, actor),
    };

    // JSON consumers get a machine-readable error on stdout; the human
    // rendering still goes to stderr from main
    if let Err(e) = &result {
        if output.is_json() {
            let kind = e
                .downcast_ref::<CoreError>()
                .map(CoreError::kind)
                .unwrap_or("error");
            println!(
                "{}",
                serde_json::json!({
                    "success": false,
                    "kind": kind,
                    "error": format!("{:#}", e),
                })
            );
        }
    }

    result
}
