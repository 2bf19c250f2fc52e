//! Command-line front end for the Market Whisperer
//!
//! # Usage
//!
//! ```bash
//! # Point at the backend (defaults to http://127.0.0.1:8000)
//! export WHISPER_API_URL="http://localhost:8000"
//!
//! whisper add aapl
//! whisper listen --html whispers.html
//! whisper            # interactive
//! ```

mod commands;
mod repl;
mod terminal;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use terminal::TerminalView;
use tracing::info;
use whisper_client::view::{MarkupRenderer, TextInput};
use whisper_client::{
    Action, App, ClientConfig, ElementId, HttpBackend, UiEvent, WhisperApi, normalize_symbol,
};
use whisper_utils::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "whisper")]
#[command(about = "Watchlist and market analysis client", long_about = None)]
struct Args {
    /// Backend base URL [env: WHISPER_API_URL]
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Milliseconds between analysis status polls [env: WHISPER_POLL_INTERVAL_MS]
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    /// Per-request timeout in seconds [env: WHISPER_TIMEOUT_SECS]
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Log output format: text or json
    #[arg(long, global = true, env = "WHISPER_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the watchlist
    List,
    /// Add a symbol to the watchlist
    Add { symbol: String },
    /// Remove a symbol from the watchlist
    Remove { symbol: String },
    /// Run one analysis and print the whispers
    Listen {
        /// Also write the results region as HTML to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Interactive session (default)
    Repl,
}

impl Args {
    /// Environment first, then explicit flags on top
    fn client_config(&self) -> whisper_client::Result<ClientConfig> {
        let mut builder = ClientConfig::builder().with_env();
        if let Some(url) = &self.api_url {
            builder = builder.api_url(url.clone());
        }
        if let Some(ms) = self.poll_interval_ms {
            builder = builder.poll_interval(Duration::from_millis(ms));
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        builder.build()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    whisper_utils::init_tracing_with("warn,whisper_client=info", args.log_format);

    let config = args.client_config().context("invalid configuration")?;
    info!(api_url = %config.api_url, poll_interval = ?config.poll_interval, "starting whisper");

    let api: Arc<dyn WhisperApi> = Arc::new(HttpBackend::new(&config)?);
    let view = TerminalView::new();
    let app = App::new(api, view.bindings(), &config);

    match args.command.unwrap_or(Commands::Repl) {
        Commands::List => {
            app.init().await;
            view.ensure_listed()?;
        }
        Commands::Add { symbol } => {
            view.input.set_value(&symbol);
            app.dispatch(ElementId::AddButton, UiEvent::Click).await;
            view.ensure_added(&symbol)?;
        }
        Commands::Remove { symbol } => {
            let symbol = normalize_symbol(&symbol).context("symbol must not be empty")?;
            app.perform(&Action::RemoveStock(symbol.clone())).await?;
            view.ensure_removed(&symbol)?;
        }
        Commands::Listen { html } => {
            app.perform(&Action::AnalyzeMarket).await?;
            tokio::select! {
                () = app.wait_for_analysis() => {}
                signal = tokio::signal::ctrl_c() => {
                    signal?;
                    app.abort_analysis().await;
                    println!("Stopped listening.");
                }
            }

            if let Some(path) = html {
                let markup = MarkupRenderer::new()?.results(&view.results.last())?;
                tokio::fs::write(&path, markup)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Results written to {}", path.display());
            }
            view.ensure_analyzed()?;
        }
        Commands::Repl => repl::run(&app, &view, &config.api_url).await?,
    }

    Ok(())
}
