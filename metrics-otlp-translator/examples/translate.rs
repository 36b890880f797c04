use metrics_otlp_translator::{LabelNamer, Metric, MetricKind, MetricNamer, UnitNamer};
use tracing::{info, warn};

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let metrics = [
        Metric::new("http.server.request.duration", "s", MetricKind::Histogram),
        Metric::new("system.network.io", "By", MetricKind::MonotonicCounter),
        Metric::new("system.cpu.utilization", "1", MetricKind::Gauge),
        Metric::new("mongodbatlas.process.asserts", "{assertions}/s", MetricKind::Gauge),
    ];

    let prometheus = MetricNamer { with_metric_suffixes: true, ..Default::default() };
    let utf8 = MetricNamer { with_metric_suffixes: true, utf8_allowed: true, ..Default::default() };
    let units = UnitNamer::default();

    for metric in &metrics {
        info!(
            otel = %metric.name,
            unit = %units.build(&metric.unit),
            classic = %prometheus.build(metric),
            utf8 = %utf8.build(metric),
            "translated metric name"
        );
    }

    let labels = LabelNamer::default();
    for attribute in ["http.request.method", "1st.attempt", "__name__", "ようこそ"] {
        match labels.build(attribute) {
            Ok(label) => info!(%attribute, %label, "translated attribute"),
            Err(e) => warn!(%attribute, error = %e, "dropping attribute"),
        }
    }
}
