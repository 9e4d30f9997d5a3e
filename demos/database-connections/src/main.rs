//! Database connections demo
//!
//! Publishes `database_connections{connection_id=...}` through a single
//! gauge func vector. Each gauge reads the live connection count of its pool
//! when scraped.

use anyhow::Context;
use clap::Parser;
use gauge_func_vec::{export_metrics, init_tracing, metrics_router, GaugeFuncVec, TracingConfig};
use prometheus::{Opts, Registry};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Database connections demo CLI
#[derive(Parser)]
#[command(name = "database-connections")]
#[command(about = "Publish per-connection gauges backed by live pool stats", long_about = None)]
struct Cli {
    /// Serve metrics on this address instead of printing them once
    #[arg(long, env = "GAUGE_DEMO_LISTEN")]
    serve: Option<String>,

    /// Log level
    #[arg(long, env = "GAUGE_DEMO_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    json: bool,
}

/// Stand-in for a connection pool
struct Pool {
    conns: AtomicU64,
}

impl Pool {
    fn new(conns: u64) -> Arc<Self> {
        Arc::new(Self {
            conns: AtomicU64::new(conns),
        })
    }

    fn open_connections(&self) -> u64 {
        self.conns.load(Ordering::Relaxed)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut tracing_config = TracingConfig::new("database-connections").with_log_level(&cli.log_level);
    if cli.json {
        tracing_config = tracing_config.with_json_format();
    }
    init_tracing(&tracing_config)?;

    let connections = GaugeFuncVec::new(
        Opts::new("connections", "Number of connections per database connection")
            .namespace("database"),
        &["connection_id"],
    )?;

    let master = Pool::new(42);
    let slave = Pool::new(288);
    for (id, pool) in [("master", master.clone()), ("slave", slave.clone())] {
        connections.must_register(&HashMap::from([("connection_id", id)]), move || {
            pool.open_connections() as f64
        });
    }

    let registry = Arc::new(Registry::new());
    registry.register(Box::new(connections.clone()))?;

    let Some(addr) = cli.serve else {
        print!("{}", export_metrics(&registry)?);
        return Ok(());
    };

    // keep the counts moving so repeated scrapes show fresh values
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        loop {
            ticker.tick().await;
            master.conns.fetch_add(1, Ordering::Relaxed);
            let _ = slave
                .conns
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
        }
    });

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, series = connections.len(), "serving metrics");

    axum::serve(listener, metrics_router(registry))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("metrics server failed")?;

    tracing::info!("metrics server shut down");
    Ok(())
}

/// Resolves on Ctrl+C
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("received Ctrl+C, shutting down");
}
