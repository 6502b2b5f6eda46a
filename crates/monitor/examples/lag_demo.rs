//! Runs the lag monitor against a scripted in-memory admin and prints the
//! resulting scrape output.
//!
//! ```text
//! cargo run -p lagwatch-monitor --example lag_demo
//! ```

use std::time::Duration;

use lagwatch_admin::GroupId;
use lagwatch_admin_mock::MockGroupAdmin;
use lagwatch_monitor::{LagMetrics, LagMonitor, MonitorConfig};
use prometheus::{Encoder, Registry, TextEncoder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let admin = MockGroupAdmin::new();
    admin.assign("orders", [0, 1]).await;
    admin.assign("payments", [0]).await;
    admin.commit("orders", 0, 100).await;
    admin.commit("orders", 1, 40).await;
    admin.commit("payments", 0, 40).await;
    admin.set_end_offset("orders", 0, 150).await;
    admin.set_end_offset("orders", 1, 40).await;
    admin.set_end_offset("payments", 0, 40).await;

    let registry = Registry::new();
    let metrics = LagMetrics::new(&registry)?;
    metrics.record_commit("order-sink", "success", 140);

    let monitor = LagMonitor::new(
        admin,
        GroupId::from("demo-workers"),
        metrics,
        MonitorConfig {
            poll_interval: Duration::from_secs(1),
        },
    );

    monitor.start().await?;
    tokio::time::sleep(Duration::from_millis(2500)).await;
    monitor.shutdown().await;

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    print!("{}", String::from_utf8(buffer)?);
    Ok(())
}
