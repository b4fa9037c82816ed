//! Probe: prints a one-screen summary of the broker configured via `MGMT_*`.

use rabbit_mgmt::config::Config;
use rabbit_mgmt::ManagementClient;
use tracing_subscriber::EnvFilter;

// ========================================
// MAIN ENTRY POINT
// ========================================

#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[Probe] {}", e);
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    if let Err(e) = run(&config).await {
        tracing::error!(error = %e, "probe failed");
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> rabbit_mgmt::Result<()> {
    let client = ManagementClient::new(config.client.clone())?;
    tracing::info!(endpoint = %client.base_url(), "probing management API");

    let me = client.who_am_i().await?;
    let overview = client.get_overview().await?;
    println!(
        "{} (broker {}, erlang {}) as {} [{}]",
        overview.node,
        overview.broker_version,
        overview.erlang_version,
        me.name,
        me.tags.join(",")
    );
    println!(
        "  objects: {} connections, {} channels, {} queues, {} consumers",
        overview.object_totals.connections,
        overview.object_totals.channels,
        overview.object_totals.queues,
        overview.object_totals.consumers
    );
    println!(
        "  messages: {} total, {} ready, {} unacked, publishing at {:.1}/s",
        overview.queue_totals.messages,
        overview.queue_totals.messages_ready,
        overview.queue_totals.messages_unacknowledged,
        overview.message_stats.publish_details.rate
    );

    for node in client.get_nodes().await? {
        let alarm = if node.has_alarm() { " ALARM" } else { "" };
        println!(
            "  node {} ({:?}): mem {}/{} disk free {} (limit {}) sockets {}/{}{}",
            node.name,
            node.node_type,
            node.mem_used,
            node.mem_limit,
            node.disk_free,
            node.disk_free_limit,
            node.sockets_used,
            node.sockets_total,
            alarm
        );
    }

    let alive = client.aliveness_test("/").await?;
    println!("  aliveness on '/': {}", if alive { "ok" } else { "FAILED" });

    Ok(())
}
