use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lookback::draft::{
    AutosaveController, DisabledDraftStore, DraftStore, FileDraftStore, SavedDraft,
};
use lookback::survey::Prefill;
use lookback::ui::{install_panic_hook, App};
use lookback::web::{run_server, WebAppState};
use lookback::{util, Config, SubmissionCoordinator, Wizard};

#[derive(Parser)]
#[command(name = "lookback")]
#[command(about = "Year-end reflection survey", version)]
struct Cli {
    /// Data directory (defaults to ~/.lookback)
    #[arg(long, global = true, env = "LOOKBACK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Prefill the respondent's name
    #[arg(long)]
    name: Option<String>,

    /// Prefill the respondent's role
    #[arg(long)]
    role: Option<String>,

    /// Prefill the respondent's product team
    #[arg(long)]
    product: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Write the collected responses as CSV
    Export {
        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Inspect or delete the autosaved draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    Show,
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir.clone());

    match cli.command {
        None => {
            init_file_logging()?;
            let config = Config::load();
            let prefill = config.prefill_with(Prefill {
                name: cli.name,
                role: cli.role,
                product: cli.product,
            });
            run_tui(config, prefill).await
        }
        Some(command) => {
            init_stderr_logging();
            let config = Config::load();
            match command {
                Command::Serve { host, port } => serve(config, host, port).await,
                Command::Export { output } => export(&config, output),
                Command::Draft { action } => draft(&config, action),
            }
        }
    }
}

/// Log to `<data_dir>/logs/lookback.log`; the terminal belongs to the UI
fn init_file_logging() -> Result<()> {
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("lookback=info,tower_http=info")
                }),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn draft_store(config: &Config) -> Arc<dyn DraftStore> {
    if config.autosave.enabled {
        Arc::new(FileDraftStore::new(util::drafts_dir()))
    } else {
        Arc::new(DisabledDraftStore)
    }
}

async fn run_tui(config: Config, prefill: Prefill) -> Result<()> {
    let backend = config
        .backend
        .build()
        .context("Failed to set up response storage")?;
    tracing::info!(backend = %config.backend.describe(), "Starting survey");

    let autosave = AutosaveController::new(draft_store(&config), config.autosave.settings());
    let coordinator = Arc::new(SubmissionCoordinator::new(backend));
    let mut wizard = Wizard::new(autosave, coordinator);
    wizard.mount(&prefill, Instant::now());

    install_panic_hook();
    let mut app = App::new(wizard);
    app.run().await
}

async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let backend = config
        .backend
        .build()
        .context("Failed to set up response storage")?;
    tracing::info!(backend = %config.backend.describe(), "Response storage ready");

    let csv_path = config.backend.csv_path().map(PathBuf::from);
    let state = WebAppState::new(backend, csv_path);
    run_server(state, &config.server).await
}

fn export(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let Some(path) = config.backend.csv_path() else {
        bail!(
            "The configured backend ({}) does not write CSV",
            config.backend.describe()
        );
    };
    if !path.exists() {
        bail!("CSV file not found. No responses yet.");
    }

    let contents =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    match output {
        Some(out) => {
            fs::write(&out, &contents)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            eprintln!("Exported responses to {}", out.display());
        }
        None => std::io::stdout().write_all(&contents)?,
    }
    Ok(())
}

fn draft(config: &Config, action: DraftAction) -> Result<()> {
    let store = FileDraftStore::new(util::drafts_dir());
    let key = &config.autosave.key;

    match action {
        DraftAction::Show => match store.read(key)? {
            Some(raw) => {
                SavedDraft::parse(&raw).context("Saved draft is unreadable")?;
                let value: serde_json::Value = serde_json::from_str(&raw)?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            None => println!("No saved draft"),
        },
        DraftAction::Clear => {
            store.remove(key)?;
            println!("Draft cleared");
        }
    }
    Ok(())
}
