use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: HTTP requests handled. Labels: endpoint, status.
pub const REQUESTS_TOTAL: &str = "slotbook_requests_total";

/// Histogram: open slots returned per availability query.
pub const SLOTS_RETURNED: &str = "slotbook_slots_returned";

// ── Domain counters ─────────────────────────────────────────────

/// Counter: appointments successfully persisted.
pub const BOOKINGS_TOTAL: &str = "slotbook_bookings_total";

/// Counter: stored appointments skipped because a timestamp did not parse.
pub const MALFORMED_RECORDS_TOTAL: &str = "slotbook_malformed_records_total";

/// Counter: availability queries truncated at the slot cap.
pub const SLOT_CAP_HITS_TOTAL: &str = "slotbook_slot_cap_hits_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Record one handled request.
pub fn record_request(endpoint: &'static str, status: u16) {
    metrics::counter!(REQUESTS_TOTAL, "endpoint" => endpoint, "status" => status.to_string())
        .increment(1);
}
