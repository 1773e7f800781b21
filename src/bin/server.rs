//! HTTP server binary.
//!
//! Exposes the timetable submission API (§6) over axum.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin ska-scheduler-server --features http-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `SCHEDULER_CONFIG`: Path to a TOML config file (default: `scheduler.toml`
//!   in the current directory, falling back to built-in defaults)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ska_scheduler::config::SchedulerConfig;
use ska_scheduler::db::TimetableStore;
use ska_scheduler::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("starting ska-scheduler HTTP server");

    let config = match env::var("SCHEDULER_CONFIG") {
        Ok(path) => SchedulerConfig::from_file(&path).map_err(|e| anyhow::anyhow!(e))?,
        Err(_) => SchedulerConfig::from_default_location(),
    };

    let state = AppState::new(TimetableStore::new(), Arc::new(config));
    let app = create_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(8080);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    info!("listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
