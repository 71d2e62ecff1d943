//! chemviz - command-line dashboard for the chemical equipment dataset service
//!
//! Wraps the session layer in a clap CLI: authenticate, upload CSV
//! datasets, inspect summaries and chart aggregates, export PDF reports.

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chemviz_session::{CredentialStore, DashboardSession, EquipmentClient, RegistrationRequest};

use crate::config::Config;
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "chemviz")]
#[command(author, version, about = "Chemical Equipment Visualizer CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Server URL (falls back to the config file, then localhost)
    #[arg(short, long, env = "CHEMVIZ_SERVER")]
    server: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "CHEMVIZ_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Register {
        username: String,
        email: String,
        password: String,

        /// Password confirmation (defaults to the password)
        #[arg(long)]
        password_confirm: Option<String>,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },

    /// Log in and persist the credential
    Login { username: String, password: String },

    /// Log out and drop the persisted credential
    Logout,

    /// Show the authenticated user
    Whoami,

    /// Upload a CSV dataset
    Upload {
        /// CSV file with columns: Equipment Name, Type, Flowrate, Pressure, Temperature
        file: PathBuf,
    },

    /// List your datasets (most recent 5)
    List,

    /// Show one dataset: summary, aggregates, equipment
    Show {
        /// Dataset ID
        id: i64,
    },

    /// Delete a dataset
    Delete {
        /// Dataset ID
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Download the PDF report for a dataset
    Report {
        /// Dataset ID
        id: i64,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Show global statistics
    Stats,
}

impl Commands {
    /// Commands that need a held credential before they can do anything.
    fn requires_auth(&self) -> bool {
        !matches!(self, Commands::Register { .. } | Commands::Login { .. })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let mut config = if config_path.exists() {
        Config::load_from(&config_path)?
    } else {
        Config::default()
    };

    let server = config.resolve_server(cli.server.as_deref());
    let ctx = OutputContext::new(cli.output, cli.no_color, cli.quiet);

    let credential = CredentialStore::with_token(config.token.clone());
    let client = EquipmentClient::new(&server, credential.clone())?;
    let session = DashboardSession::with_client(client);

    if cli.command.requires_auth() && !session.is_authenticated() {
        anyhow::bail!("Not logged in. Run `chemviz login <username> <password>` first.");
    }

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
            password_confirm,
            first_name,
            last_name,
        } => {
            let request = RegistrationRequest {
                username: username.clone(),
                email,
                password_confirm: password_confirm.unwrap_or_else(|| password.clone()),
                password,
                first_name,
                last_name,
            };
            commands::auth::register(&session, &ctx, &request).await?;
            config.server = Some(server);
            config.token = credential.get();
            config.username = Some(username);
            config.save_to(&config_path)?;
        }
        Commands::Login { username, password } => {
            commands::auth::login(&session, &ctx, &username, &password).await?;
            config.server = Some(server);
            config.token = credential.get();
            config.username = Some(username);
            config.save_to(&config_path)?;
        }
        Commands::Logout => {
            commands::auth::logout(&session, &ctx).await?;
            config.token = None;
            config.username = None;
            config.save_to(&config_path)?;
        }
        Commands::Whoami => commands::auth::whoami(&session, &ctx).await?,
        Commands::Upload { file } => commands::datasets::upload(&session, &ctx, &file).await?,
        Commands::List => commands::datasets::list(&session, &ctx).await?,
        Commands::Show { id } => commands::datasets::show(&session, &ctx, id).await?,
        Commands::Delete { id, yes } => {
            commands::datasets::delete(&session, &ctx, id, yes).await?
        }
        Commands::Report { id, out } => {
            commands::report::report(&session, &ctx, id, &out).await?
        }
        Commands::Stats => commands::stats::stats(&session, &ctx).await?,
    }

    // A 401 during any action clears the credential; keep the persisted
    // copy in sync so the next invocation prompts for login.
    if config.token.is_some() && !credential.is_present() {
        config.token = None;
        config.save_to(&config_path)?;
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
