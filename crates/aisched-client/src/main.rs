//! aisched CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::warn;

use aisched_core::{TracingConfig, TracingOutputFormat, init_tracing};
use aisched_providers::HttpTransport;

use aisched_client::busy::TerminalBusy;
use aisched_client::cli::{Cli, Command, ConfigAction};
use aisched_client::commands;
use aisched_client::config::ClientConfig;
use aisched_client::error::{ClientError, ClientResult};
use aisched_client::pipeline::{ActionSettings, Pipeline, Trigger};
use aisched_client::sinks::{DesktopNotifier, DesktopSink};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut tracing_config = TracingConfig::cli(cli.debug);
    if cli.log_json {
        tracing_config = tracing_config.with_format(TracingOutputFormat::Json);
    }
    if let Some(ref filter) = cli.log_filter {
        tracing_config = tracing_config.with_env_filter(filter.clone());
    }
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(ClientConfig::default_path)
}

fn load_config(cli: &Cli) -> ClientResult<ClientConfig> {
    let loaded = match cli.config {
        Some(ref path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    };
    loaded.map_err(ClientError::Config)
}

async fn run(cli: Cli) -> ClientResult<()> {
    let path = config_path(&cli);

    match &cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&load_config(&cli)?, &path),
            ConfigAction::Validate => commands::config::validate(&load_config(&cli)?),
            ConfigAction::Path => commands::config::path(&path),
            ConfigAction::SetKey { key } => commands::config::set_key(&path, key.clone()),
            ConfigAction::Set { key, value } => commands::config::set(&path, key, value),
        },
        Some(Command::Models) => {
            let config = load_config(&cli).unwrap_or_default();
            commands::models::list(config.model())
        }
        None => create_event(&cli).await,
    }
}

async fn create_event(cli: &Cli) -> ClientResult<()> {
    let mut config = load_config(cli)?;
    if let Some(ref model) = cli.model {
        config.model = Some(model.clone());
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(ref dir) = cli.download_dir {
        config.output.download_dir = Some(dir.clone());
    }

    let text = match cli.text {
        Some(ref text) => text.clone(),
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            text
        }
    };

    // A missing key is reported by the pipeline, after the busy indicator
    // and notification are set up.
    let api_key = match config.resolve_api_key() {
        Ok(key) => Some(key),
        Err(e) => {
            warn!(error = %e, "API key unavailable");
            None
        }
    };

    let transport = HttpTransport::new(config.timeout())?;
    let sink = DesktopSink::new(config.download_dir()).with_links(cli.link_handling());
    let notifier = DesktopNotifier::new(config.notifications.enabled && !cli.no_notify);
    let busy = TerminalBusy;

    let settings = ActionSettings {
        api_key,
        model: config.model().to_string(),
        mode: config.mode,
        today: chrono::Local::now().date_naive(),
    };
    let trigger = Trigger::new(text, cli.page_url.clone());

    Pipeline::new(&transport, &sink, &notifier, &busy)
        .run_action(&settings, &trigger)
        .await
        .map(|_| ())
}
