mod config;
mod embedding;
mod errors;
mod export;
mod keywords;
mod models;
mod parsing;
mod pipeline;
mod routes;
mod screening;
mod state;

use std::fs::File;
use std::io::BufWriter;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::write_shortlist_csv;
use crate::pipeline::{Pipeline, Stage};
use crate::routes::build_router;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "screener")]
#[command(about = "Multi-stage resume screening pipeline")]
#[command(version)]
struct Cli {
    /// Data directory holding resumes/, job_descriptions/ and the stage snapshots
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every stage in order
    Run,
    /// Run a single stage against the existing snapshots
    Stage {
        #[arg(value_enum)]
        stage: Stage,
    },
    /// Write the current shortlist as CSV
    Export {
        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Start the HTTP API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pipeline = Pipeline::from_config(&config);

    match cli.command {
        Commands::Run => {
            let summary = pipeline.run_pipeline().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Stage { stage } => {
            let report = pipeline.run_stage(stage).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Export { output } => {
            let shortlist = pipeline.load_shortlist().await?;
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Unable to create {}", path.display()))?;
                    write_shortlist_csv(BufWriter::new(file), &shortlist)?;
                    info!("Wrote {} candidates to {}", shortlist.len(), path.display());
                }
                None => write_shortlist_csv(std::io::stdout().lock(), &shortlist)?,
            }
        }
        Commands::Serve { port } => {
            serve(pipeline, port.unwrap_or(config.port)).await?;
        }
    }

    Ok(())
}

async fn serve(pipeline: Pipeline, port: u16) -> Result<()> {
    info!("Starting screener API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Data directory: {}",
        pipeline.paths().data_dir().display()
    );

    let app = build_router(AppState::new(pipeline))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
