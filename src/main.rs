use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use avalon::config::{self, Config, LogFormat};
use avalon::fixtures::RandomFixtures;
use avalon::store::{self, MemoryStore};
use avalon::{cli, jobs, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load()?;
    init_tracing(cfg.log_format);

    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => {
            let port = port.unwrap_or(cfg.port);
            run_server(cfg, port).await
        }
        Some(cli::Commands::Project { command }) => handle_project_command(command).await,
        None => {
            let port = cfg.port;
            run_server(cfg, port).await
        }
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "avalon=debug,tower_http=debug".into()),
    );
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn run_server(cfg: Config, port: u16) -> anyhow::Result<()> {
    let store = match &cfg.data_file {
        Some(path) => {
            tracing::info!("Loading snapshot from {}...", path.display());
            let snapshot = store::snapshot::load(path)
                .await
                .with_context(|| format!("failed to load snapshot {}", path.display()))?;
            MemoryStore::from_snapshot(snapshot)
        }
        None => {
            tracing::warn!("AVALON_DATA_FILE not set; projects are kept in memory only");
            MemoryStore::new()
        }
    };
    tracing::info!(projects = store.len(), "store ready");

    tokio::fs::create_dir_all(&cfg.upload_dir)
        .await
        .with_context(|| format!("failed to create upload dir {}", cfg.upload_dir.display()))?;

    let snapshot_job = cfg.data_file.clone().map(|path| {
        let every = Duration::from_secs(cfg.snapshot_interval_secs);
        tracing::info!("Background snapshot job started (every {}s)", every.as_secs());
        (jobs::snapshot::spawn(store.clone(), path.clone(), every), path)
    });

    let state = Arc::new(AppState::new(
        store.clone(),
        Arc::new(RandomFixtures::new()),
        cfg,
    ));
    let app = avalon::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("AVALON server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some((handle, path)) = snapshot_job {
        handle.abort();
        if jobs::snapshot::flush(&store, &path).await? {
            tracing::info!("Final snapshot written to {}", path.display());
        }
    }
    tracing::info!("AVALON server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn handle_project_command(cmd: cli::ProjectCommands) -> anyhow::Result<()> {
    match cmd {
        cli::ProjectCommands::List { data_file } => {
            let snapshot = load_existing(&data_file).await?;
            if snapshot.projects.is_empty() {
                println!("No projects found.");
                return Ok(());
            }
            println!(
                "{:<24} {:<26} {:<10} {:<8}",
                "PROJECT", "CREATED", "SCENARIOS", "SESSION"
            );
            println!("{}", "-".repeat(72));
            for p in &snapshot.projects {
                println!(
                    "{:<24} {:<26} {:<10} {:<8}",
                    p.project_id,
                    p.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    p.scenario_list.len(),
                    if p.avalon.is_some() { "active" } else { "-" },
                );
            }
        }
        cli::ProjectCommands::Delete {
            data_file,
            project_id,
        } => {
            let snapshot = load_existing(&data_file).await?;
            let store = MemoryStore::from_snapshot(snapshot);
            if store.delete_project(&project_id) {
                store::snapshot::save(&data_file, &store.snapshot()).await?;
                println!("Project '{}' deleted.", project_id);
            } else {
                println!("Project '{}' not found; nothing to delete.", project_id);
            }
        }
    }
    Ok(())
}

async fn load_existing(path: &Path) -> anyhow::Result<store::Snapshot> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        anyhow::bail!("snapshot file {} does not exist", path.display());
    }
    store::snapshot::load(path)
        .await
        .with_context(|| format!("failed to read snapshot {}", path.display()))
}
