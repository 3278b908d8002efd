//! Atlas CLI
//!
//! Command-line interface for the Atlas dashboard:
//! - Show the dashboard in the terminal
//! - Generate a default config file

use atlas_dashboard::atlas::AtlasClient;
use atlas_dashboard::config::{generate_default_config, Config};
use atlas_dashboard::dashboard::{
    render_page, render_update, DashboardLoader, FetchStrategy, Layout, RenderOptions, Renderer,
    TextRenderer,
};
use atlas_dashboard::logging::init_tracing;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "atlas")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Economic indicator dashboard for the Atlas API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Atlas API base address, overrides the config
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Log at the configured level instead of warn
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the four indicators and print the dashboard
    Show {
        /// Layout (gated, incremental)
        #[arg(short, long)]
        layout: Option<Layout>,
        /// Fetch strategy (concurrent, sequential)
        #[arg(short, long)]
        strategy: Option<FetchStrategy>,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Print the unemployment value without a "%" suffix
        #[arg(long)]
        raw_unemployment: bool,
        /// Only log failures instead of printing them
        #[arg(long)]
        hide_errors: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.base_url {
        config.atlas.base_url = url;
    }
    if !cli.verbose {
        config.logging.level = "warn".to_string();
    }
    init_tracing(&config.logging);

    match cli.command {
        Commands::Show {
            layout,
            strategy,
            format,
            raw_unemployment,
            hide_errors,
        } => {
            if let Some(layout) = layout {
                config.dashboard.layout = layout;
            }
            let options = RenderOptions {
                layout: config.dashboard.layout,
                unemployment_as_percent: config.dashboard.unemployment_as_percent
                    && !raw_unemployment,
                surface_errors: config.dashboard.surface_errors && !hide_errors,
            };
            let strategy = strategy.unwrap_or(config.dashboard.strategy);

            let client = Arc::new(AtlasClient::new(config.atlas_config())?);
            let loader = DashboardLoader::new(client, strategy)
                .log_payloads(config.dashboard.log_payloads());

            let loaded_any = match format.as_str() {
                "json" => {
                    let state = loader.load().await;
                    println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
                    let any = state.iter().any(|(_, slot)| slot.reading().is_some());
                    any
                }
                "text" => show_text(&loader, &options).await?,
                other => {
                    eprintln!("Unknown output format: {} (expected text or json)", other);
                    std::process::exit(2);
                }
            };

            if !loaded_any {
                std::process::exit(1);
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Print the dashboard; incremental layouts print each card as it arrives.
///
/// Returns whether at least one reading was loaded.
async fn show_text(loader: &DashboardLoader, options: &RenderOptions) -> anyhow::Result<bool> {
    let renderer = TextRenderer;
    let mut stdout = std::io::stdout();

    let state = match options.layout {
        Layout::Gated => {
            let state = loader.load().await;
            write!(stdout, "{}", render_page(&renderer, &state, options))?;
            state
        }
        Layout::Incremental => {
            write!(stdout, "{}", renderer.header(options.layout.title()))?;
            stdout.flush()?;

            let (mut events, handle) = loader.spawn();
            while let Some(event) = events.recv().await {
                if let Some(fragment) = render_update(&renderer, &event, options) {
                    write!(stdout, "{}", fragment)?;
                    stdout.flush()?;
                }
            }

            let state = handle.await?;
            write!(stdout, "{}", renderer.footer(state.fetched_at()))?;
            state
        }
    };

    stdout.flush()?;
    let any = state.iter().any(|(_, slot)| slot.reading().is_some());
    Ok(any)
}
