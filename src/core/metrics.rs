use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;
use crate::media;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);

    metrics::describe_counter!("http_requests_total", "HTTP responses by status code");
    metrics::describe_histogram!("http_request_duration_seconds", "HTTP request latency");
    metrics::describe_counter!("timetable_uploads_total", "Timetable images accepted by kind");
    metrics::describe_counter!("timetable_rejections_total", "Timetable uploads rejected");
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

/// Labels by image kind; the declared content type is client-controlled.
pub(crate) fn record_upload(content_type: &str) {
    metrics::counter!("timetable_uploads_total", "kind" => upload_kind(content_type)).increment(1);
}

fn upload_kind(content_type: &str) -> &'static str {
    media::extension_for(content_type).unwrap_or("other")
}

pub(crate) fn record_rejection(reason: &'static str) {
    metrics::counter!("timetable_rejections_total", "reason" => reason).increment(1);
}
