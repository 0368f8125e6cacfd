use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use crate::error::VenueResult;

/// Installs a compact fmt subscriber filtered by `RUST_LOG`, or by
/// `default_filter` when unset. A subscriber installed earlier by the host
/// wins.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init();
}

#[cfg(feature = "metrics-exporter")]
pub fn init_metrics(listen: SocketAddr) -> VenueResult<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    PrometheusBuilder::new()
        .with_http_listener(listen)
        .install()
        .map_err(|e| crate::error::VenueError::Telemetry(e.to_string()))?;

    tracing::info!(%listen, "Prometheus exporter listening");
    metrics::gauge!("lobx_up").set(1.0);
    Ok(())
}

#[cfg(not(feature = "metrics-exporter"))]
pub fn init_metrics(_listen: SocketAddr) -> VenueResult<()> {
    Ok(())
}
