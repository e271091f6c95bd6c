use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use svcwatch::{
    DataSource, DeploymentExt, EngineConfig, FileSource, ServiceStore, StoreEvent, StoreState,
    Watcher,
};
use svcwatch_types::{Deployment, GroupNode};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "svcwatch")]
#[command(about = "Service health and deployment reconciliation for Marathon snapshots")]
struct Args {
    /// Path to a saved /v2/groups response
    #[arg(short, long)]
    groups: PathBuf,

    /// Path to a saved /v2/deployments response
    #[arg(short, long)]
    deployments: Option<PathBuf>,

    /// Engine configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep polling the input files and log every change
    #[arg(short, long, conflicts_with = "export")]
    watch: bool,

    /// Poll interval in seconds (only used with --watch)
    #[arg(short, long, default_value = "1")]
    refresh: u64,

    /// Write the report to a JSON file instead of stdout
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = EngineConfig::load(args.config.as_deref()).context("Loading configuration")?;
    let store = Arc::new(ServiceStore::new(config));

    let groups: Box<dyn DataSource<GroupNode>> = Box::new(FileSource::<GroupNode>::new(&args.groups));
    let deployments = args.deployments.as_ref().map(|path| {
        Box::new(FileSource::<Vec<Deployment>>::new(path)) as Box<dyn DataSource<Vec<Deployment>>>
    });
    let mut watcher = Watcher::new(store.clone(), groups, deployments);

    if args.watch {
        return run_watch(&mut watcher, Duration::from_secs(args.refresh.max(1)));
    }

    watcher.tick();
    if let Some(err) = &watcher.load_error {
        anyhow::bail!("Failed to load snapshots: {}", err);
    }

    let report = serde_json::to_string_pretty(&build_report(&store.state()))?;
    match args.export {
        Some(path) => export_to_file(&path, &report),
        None => {
            println!("{}", report);
            Ok(())
        }
    }
}

/// Poll the sources forever, logging each change event.
fn run_watch(watcher: &mut Watcher, refresh: Duration) -> Result<()> {
    let mut events = watcher.store().subscribe();
    info!(sources = ?watcher.source_descriptions(), "Watching for changes");

    let mut last_error: Option<String> = None;
    loop {
        watcher.tick();
        if watcher.load_error != last_error {
            if let Some(err) = &watcher.load_error {
                error!(error = %err, "Snapshot load failed");
            }
            last_error = watcher.load_error.clone();
        }
        drain_events(&mut events);
        thread::sleep(refresh);
    }
}

fn drain_events(events: &mut broadcast::Receiver<StoreEvent>) {
    loop {
        match events.try_recv() {
            Ok(StoreEvent::AppsChanged(index)) => {
                let summary: Vec<String> = index
                    .summary()
                    .iter()
                    .map(|(health, count)| format!("{}={}", health.key(), count))
                    .collect();
                let platform = index.platform().map(|p| p.health).unwrap_or_default();
                info!(platform = %platform, services = %summary.join(" "), "Apps changed");
            }
            Ok(StoreEvent::DeploymentsChanged(list)) => {
                info!(
                    count = list.len(),
                    last = list.last().map(Deployment::id).unwrap_or("-"),
                    "Deployments changed"
                );
            }
            Err(TryRecvError::Lagged(skipped)) => {
                info!(skipped, "Skipped stale change events");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}

/// Build a JSON report of every service and deployment.
fn build_report(state: &StoreState) -> Value {
    let apps = &state.apps;

    let summary: serde_json::Map<String, Value> = apps
        .summary()
        .into_iter()
        .map(|(health, count)| (health.key().to_string(), json!(count)))
        .collect();

    let services: Vec<Value> = apps
        .iter()
        .map(|(name, entry)| {
            json!({
                "name": name,
                "id": entry.app.id,
                "health": entry.health,
                "health_label": entry.health.label(),
                "tasks": {
                    "running": entry.app.tasks_running,
                    "healthy": entry.app.tasks_healthy,
                    "unhealthy": entry.app.tasks_unhealthy,
                },
                "version": apps.version(name),
                "installed_at": apps.installed_time(name),
                "images": apps.images(name),
            })
        })
        .collect();

    let deployments: Vec<Value> = state
        .deployments
        .iter()
        .map(|d| {
            json!({
                "id": d.id,
                "affected_apps": d.affected_apps,
                "started_at": d.started_at().map(|at| at.to_rfc3339()),
                "progress": d.progress(),
            })
        })
        .collect();

    json!({
        "summary": summary,
        "services": services,
        "deployments": deployments,
        "last_deployment": state.deployments.last().map(Deployment::id),
    })
}

fn export_to_file(path: &Path, report: &str) -> Result<()> {
    std::fs::write(path, report).with_context(|| format!("Writing {}", path.display()))?;
    println!("Exported service report to: {}", path.display());
    Ok(())
}
