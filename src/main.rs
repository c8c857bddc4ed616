use std::{fs, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sat_math_service::{
    AppConfig, ModelRegistry, build_router, prompts::SAT_MATH_ANALYZER_PROMPT, run_batch,
};

#[derive(Debug, Parser)]
#[command(name = "sat-math-service", version, about = "SAT math question analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API and browser UI (default).
    Serve,
    /// Analyze every image in a folder and write batch_report.json there.
    Batch {
        folder: PathBuf,
        /// Replace the built-in analyzer prompt with the contents of this file.
        #[arg(long, env = "BATCH_PROMPT_FILE")]
        prompt_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!(model = %config.model_id, endpoint = %config.model_endpoint, "connecting model");
    let registry = Arc::new(ModelRegistry::initialize(config.as_ref())?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, registry.clone()).await?,
        Command::Batch {
            folder,
            prompt_file,
        } => {
            let prompt = match prompt_file {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("reading prompt file {}", path.display()))?,
                None => SAT_MATH_ANALYZER_PROMPT.to_string(),
            };
            let report = run_batch(&registry, &config, &folder, &prompt).await?;
            println!("{}", String::from_utf8(report.to_pretty_json()?)?);
        }
    }

    drop(registry);
    tracing::info!("model handle released");
    Ok(())
}

async fn serve(config: Arc<AppConfig>, registry: Arc<ModelRegistry>) -> anyhow::Result<()> {
    let router = build_router(config.clone(), registry);

    let listener = TcpListener::bind(config.listen_addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "REST server ready");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,hyper=warn,axum::rejection=trace".into());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
