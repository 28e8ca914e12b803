//! Breaker node.
//!
//! Loads breaker settings, builds the breaker hierarchy and keeps it
//! up to date while the process runs.
//!
//! ```text
//!   breaker.toml ──▶ loader ──▶ HierarchyBreakerService ◀── callers
//!        │                          ▲          │
//!        ▼                          │          ├──▶ stats reporter ──▶ metrics
//! watcher/SIGHUP ── apply_config ──┘          └──▶ admin API (/admin/breakers)
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;

use memory_breaker::admin::{self, AdminState};
use memory_breaker::config::loader::load_config;
use memory_breaker::config::watcher::ConfigReloader;
use memory_breaker::lifecycle::{signals, Shutdown};
use memory_breaker::observability::{logging, metrics};
use memory_breaker::service::StatsReporter;
use memory_breaker::{HierarchyBreakerService, NodeConfig};

#[derive(Parser)]
#[command(name = "breaker-node")]
#[command(about = "Runs a hierarchy of memory circuit breakers", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "breaker.toml")]
    config: PathBuf,

    /// Watch the configuration file and apply changes.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config_exists = args.config.exists();
    let config = if config_exists {
        load_config(&args.config)?
    } else {
        NodeConfig::default()
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("breaker-node v{} starting", env!("CARGO_PKG_VERSION"));
    if !config_exists {
        tracing::warn!(path = ?args.config, "Config file not found, using defaults");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let service = HierarchyBreakerService::from_config(&config.breakers)?;
    let shutdown = Shutdown::new();
    // Keep the watcher alive for the lifetime of main.
    let mut watcher = None;

    if config_exists {
        let (reloader, mut updates) = ConfigReloader::new(&args.config);
        let service = service.clone();
        let mut stop = shutdown.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = updates.recv() => match update {
                        Some(new_config) => {
                            service.apply_config(&new_config.breakers);
                            tracing::info!("Breaker settings reloaded");
                        }
                        None => break,
                    },
                    _ = stop.recv() => break,
                }
            }
        });

        if args.watch {
            watcher = Some(reloader.watch()?);
        }
        let hangup_reloader = reloader.clone();
        tokio::spawn(signals::reload_on_hangup(
            move || {
                hangup_reloader.reload();
            },
            shutdown.subscribe(),
        ));
    }

    let reporter = StatsReporter::new(
        service.clone(),
        Duration::from_secs(config.observability.stats_interval_secs),
    );
    tokio::spawn(reporter.run(shutdown.subscribe()));

    let admin_task = if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        let state = AdminState::new(service.clone(), config.admin.api_key.as_str());
        Some(tokio::spawn(admin::serve(listener, state, shutdown.subscribe())))
    } else {
        None
    };

    tracing::info!(breakers = ?service.names(), parent_limit = service.parent_limit(), "Breaker node ready");

    signals::wait_for_termination().await;
    shutdown.trigger();

    if let Some(task) = admin_task {
        match task.await {
            Ok(Err(e)) => tracing::error!(error = %e, "Admin API exited with error"),
            Err(e) => tracing::error!(error = %e, "Admin API task failed"),
            Ok(Ok(())) => {}
        }
    }

    drop(watcher);
    tracing::info!("Shutdown complete");
    Ok(())
}
