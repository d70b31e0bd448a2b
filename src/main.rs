//! Timed Cache daemon
//!
//! Runs an address cache with a simulated discovery producer and a consumer,
//! logging periodic reports until shut down.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timed_cache::models::CacheReport;
use timed_cache::{Config, ManagedCache, TimedCache};

/// Distinct addresses the simulated producer cycles through
const DISCOVERY_POOL: u32 = 24;
const DISCOVERY_INTERVAL: Duration = Duration::from_millis(250);
const CONSUME_INTERVAL: Duration = Duration::from_millis(900);
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Main entry point for the Timed Cache daemon.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and start its sweep task
/// 4. Start producer, consumer and reporter tasks
/// 5. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timed_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Timed Cache daemon");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_age={:?}, sweep={:?}",
        config.max_age(),
        config.sweep_schedule()
    );

    let cache: ManagedCache<IpAddr> =
        ManagedCache::from_config(&config).context("failed to create cache")?;

    let workers = vec![
        spawn_producer(cache.shared()),
        spawn_consumer(cache.shared()),
        spawn_reporter(cache.shared()),
    ];
    info!("Workers started");

    shutdown_signal().await;

    for worker in &workers {
        worker.abort();
    }
    warn!("Workers aborted");

    let cache = cache.shutdown();
    let report = serde_json::to_string(&CacheReport::from_cache(&cache))?;
    info!("Final report: {}", report);
    info!("Shutdown complete");
    Ok(())
}

/// Simulates address discovery, revisiting addresses so some adds are refreshes.
fn spawn_producer(cache: Arc<TimedCache<IpAddr>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(DISCOVERY_INTERVAL);
        let mut n: u32 = 0;
        loop {
            ticker.tick().await;
            // Multiplier coprime to the pool size walks every address
            let host = (n.wrapping_mul(7) % DISCOVERY_POOL) + 1;
            let addr = IpAddr::V4(Ipv4Addr::from(0x0A00_0000 | host));
            if let Err(e) = cache.add(addr) {
                warn!("Discarded discovered address {}: {}", addr, e);
            }
            n = n.wrapping_add(1);
        }
    })
}

fn spawn_consumer(cache: Arc<TimedCache<IpAddr>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let addr = cache.take_async().await;
            debug!("Consumed {}", addr);
            tokio::time::sleep(CONSUME_INTERVAL).await;
        }
    })
}

fn spawn_reporter(cache: Arc<TimedCache<IpAddr>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(REPORT_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match serde_json::to_string(&CacheReport::from_cache(&cache)) {
                Ok(report) => info!("Cache report: {}", report),
                Err(e) => warn!("Failed to serialize cache report: {}", e),
            }
        }
    })
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
