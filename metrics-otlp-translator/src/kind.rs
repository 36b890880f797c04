/// Metric kind.
///
/// Defines the kind, or type, of an OpenTelemetry metric. Only two kinds influence naming: monotonic
/// counters get a `_total` suffix, and gauges with the dimensionless unit `1` get a `_ratio` suffix.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum MetricKind {
    /// Gauge type.
    Gauge,
    /// Monotonic sum, exposed as a Prometheus counter.
    MonotonicCounter,
    /// Non-monotonic sum, exposed as a Prometheus gauge.
    NonMonotonicCounter,
    /// Explicit-bucket histogram type.
    Histogram,
    /// Exponential (native) histogram type.
    ExponentialHistogram,
    /// Summary type.
    Summary,
    /// Unknown type.
    #[default]
    Unknown,
}

impl MetricKind {
    /// Whether or not this kind gets the `_total` suffix.
    pub fn is_monotonic_counter(&self) -> bool {
        matches!(self, MetricKind::MonotonicCounter)
    }

    /// Whether or not this kind is a gauge.
    pub fn is_gauge(&self) -> bool {
        matches!(self, MetricKind::Gauge)
    }
}

/// The parts of a metric that its Prometheus name is derived from.
///
/// Implement this for the metric representation of your pipeline to hand it straight to
/// [`MetricNamer::build`](crate::MetricNamer::build). Nothing else about the metric is inspected.
pub trait MetricDescriptor {
    /// The OpenTelemetry metric name, e.g. `http.server.request.duration`.
    fn name(&self) -> &str;

    /// The UCUM unit of the metric, e.g. `s` or `By/s`. May be empty.
    fn unit(&self) -> &str;

    /// The kind of the metric.
    fn kind(&self) -> MetricKind;
}

/// A plain metric description.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Metric {
    /// Metric name.
    pub name: String,
    /// Metric unit.
    pub unit: String,
    /// Metric kind.
    pub kind: MetricKind,
}

impl Metric {
    /// Creates a new `Metric`.
    pub fn new<N, U>(name: N, unit: U, kind: MetricKind) -> Self
    where
        N: Into<String>,
        U: Into<String>,
    {
        Self { name: name.into(), unit: unit.into(), kind }
    }
}

impl MetricDescriptor for Metric {
    fn name(&self) -> &str {
        &self.name
    }

    fn unit(&self) -> &str {
        &self.unit
    }

    fn kind(&self) -> MetricKind {
        self.kind
    }
}

impl<T: MetricDescriptor + ?Sized> MetricDescriptor for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn unit(&self) -> &str {
        (**self).unit()
    }

    fn kind(&self) -> MetricKind {
        (**self).kind()
    }
}
