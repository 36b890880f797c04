use std::borrow::Cow;

use tracing::trace;

use crate::chars::{is_metric_name_char, is_valid_metric_char, starts_with_digit};
use crate::kind::{MetricDescriptor, MetricKind};
use crate::sanitize::{
    join_preserving_underscores, sanitize_preserving, split_fields, tokenize, UnderscorePolicy,
};
use crate::unit::{clean_unit_token_with, is_degenerate_per_suffix, raw_unit_suffixes};

const TOTAL_SUFFIX: &str = "total";
const RATIO_SUFFIX: &str = "ratio";
const DIMENSIONLESS_UNIT: &str = "1";

/// Builds Prometheus metric names from OpenTelemetry metrics.
///
/// Depending on the configuration:
/// - with `utf8_allowed` unset, names are translated to the classic `[a-zA-Z0-9_:]` scheme; with it
///   set, names are kept as written
/// - with `with_metric_suffixes` set, the unit and type are appended as suffixes, e.g. `_seconds`,
///   `_bytes_per_second`, `_total` for monotonic counters and `_ratio` for gauges with unit `1`
/// - a non-empty `namespace` is prepended, separated by an underscore
///
/// See the Prometheus [data model] for the naming rules.
///
/// Building never fails. A name with no valid characters at all translates to an empty string,
/// which the consumer of the name is expected to reject.
///
/// ```rust
/// use metrics_otlp_translator::{Metric, MetricKind, MetricNamer};
///
/// let namer = MetricNamer { with_metric_suffixes: true, ..Default::default() };
///
/// let counter = Metric::new("requests.count", "1", MetricKind::MonotonicCounter);
/// assert_eq!(namer.build(&counter), "requests_count_total");
///
/// let gauge = Metric::new("memory.usage", "By", MetricKind::Gauge);
/// assert_eq!(namer.build(&gauge), "memory_usage_bytes");
/// ```
///
/// [data model]: https://prometheus.io/docs/concepts/data_model/#metric-names-and-labels
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct MetricNamer {
    /// Prepended to every name, separated by an underscore. Ignored when empty.
    pub namespace: String,

    /// Appends unit and type suffixes.
    pub with_metric_suffixes: bool,

    /// Keeps names as written instead of translating them to the classic character set.
    pub utf8_allowed: bool,

    /// Replaces invalid characters one by one and keeps runs of underscores between words.
    ///
    /// With this set, `http..server..request..duration` with unit `s` becomes
    /// `http__server__request__duration_seconds`. This option is highly discouraged and does not
    /// comply with the OpenTelemetry to Prometheus specification; it only exists for adopters that
    /// depend on the legacy behavior. Ignored when `utf8_allowed` is set.
    pub keep_multiple_underscores: bool,
}

impl MetricNamer {
    /// Builds the metric name for `metric`.
    pub fn build<M>(&self, metric: &M) -> String
    where
        M: MetricDescriptor + ?Sized,
    {
        self.build_parts(metric.name(), metric.unit(), metric.kind())
    }

    /// Builds the metric name for a metric given by its parts.
    pub fn build_parts(&self, name: &str, unit: &str, kind: MetricKind) -> String {
        if self.utf8_allowed {
            return self.build_utf8_name(name, unit, kind);
        }

        let normalized = if self.with_metric_suffixes {
            self.build_suffixed_compliant_name(name, unit, kind)
        } else {
            self.build_compliant_name(name)
        };
        if normalized != name {
            trace!(metric = name, unit, ?kind, %normalized, "rewrote metric name");
        }
        normalized
    }

    fn policy(&self) -> UnderscorePolicy {
        UnderscorePolicy::from_preserve(self.keep_multiple_underscores)
    }

    /// Suffixes are appended unconditionally here: a UTF-8 name is not split into tokens, so there
    /// is nothing to check existing suffixes against.
    fn build_utf8_name(&self, name: &str, unit: &str, kind: MetricKind) -> String {
        let mut metric_name = String::with_capacity(self.namespace.len() + name.len() + 1);
        if !self.namespace.is_empty() {
            metric_name.push_str(&self.namespace);
            metric_name.push('_');
        }
        metric_name.push_str(name);

        if self.with_metric_suffixes {
            let (main_suffix, per_suffix) = raw_unit_suffixes(unit);
            for suffix in [main_suffix.as_str(), per_suffix.as_str()] {
                if !suffix.is_empty() {
                    metric_name.push('_');
                    metric_name.push_str(suffix);
                }
            }

            if kind.is_monotonic_counter() {
                metric_name.push('_');
                metric_name.push_str(TOTAL_SUFFIX);
            }
            if is_ratio(unit, kind) {
                metric_name.push('_');
                metric_name.push_str(RATIO_SUFFIX);
            }
        }

        metric_name
    }

    fn build_compliant_name(&self, name: &str) -> String {
        let policy = self.policy();
        let mut metric_name = replace_invalid_chars(name, policy);

        if !self.namespace.is_empty() {
            let mut namespace = replace_invalid_chars(&self.namespace, policy);
            namespace.push('_');
            namespace.push_str(&metric_name);
            return namespace;
        }

        if starts_with_digit(&metric_name) {
            metric_name.insert(0, '_');
        }
        metric_name
    }

    fn build_suffixed_compliant_name(&self, name: &str, unit: &str, kind: MetricKind) -> String {
        let policy = self.policy();

        let (main_suffix, per_suffix) = raw_unit_suffixes(unit);
        let main_suffix = clean_unit_token_with(&main_suffix, policy);
        let per_suffix = clean_unit_token_with(&per_suffix, policy);

        let name = clean_for_tokens(name, policy);
        let namespace = clean_for_tokens(&self.namespace, policy);

        let mut tokens = name_tokens(&name, policy);
        add_unit_tokens(&mut tokens, &main_suffix, &per_suffix, policy);

        if kind.is_monotonic_counter() {
            move_to_end(&mut tokens, TOTAL_SUFFIX);
        }
        // Some receivers improperly use unit "1" for counters of objects, so only gauges are
        // treated as ratios.
        if is_ratio(unit, kind) {
            move_to_end(&mut tokens, RATIO_SUFFIX);
        }

        if !namespace.is_empty() {
            let mut prefixed = name_tokens(&namespace, policy);
            prefixed.append(&mut tokens);
            tokens = prefixed;
        }

        let mut metric_name = match policy {
            UnderscorePolicy::Collapse => tokens.join("_"),
            UnderscorePolicy::Preserve => join_preserving_underscores(&tokens),
        };

        if starts_with_digit(&metric_name) {
            metric_name.insert(0, '_');
        }
        metric_name
    }
}

fn is_ratio(unit: &str, kind: MetricKind) -> bool {
    unit == DIMENSIONLESS_UNIT && kind.is_gauge()
}

/// Replaces invalid characters in a name that is not going to be split into tokens.
///
/// Existing underscores are left alone in both policies; collapsing only merges runs of other
/// invalid characters, and drops them entirely at either end.
fn replace_invalid_chars(name: &str, policy: UnderscorePolicy) -> String {
    match policy {
        UnderscorePolicy::Collapse => split_fields(name, |c| !is_metric_name_char(c)).join("_"),
        UnderscorePolicy::Preserve => sanitize_preserving(name, is_valid_metric_char),
    }
}

fn clean_for_tokens(name: &str, policy: UnderscorePolicy) -> Cow<'_, str> {
    match policy {
        UnderscorePolicy::Collapse => Cow::Borrowed(name),
        UnderscorePolicy::Preserve => Cow::Owned(sanitize_preserving(name, is_valid_metric_char)),
    }
}

/// Splits a name into tokens.
///
/// When collapsing, tokens are the runs of valid characters and underscores are separators. When
/// preserving, `name` has already been cleaned and underscore runs become tokens of their own.
fn name_tokens(name: &str, policy: UnderscorePolicy) -> Vec<&str> {
    match policy {
        UnderscorePolicy::Collapse => split_fields(name, |c| !is_valid_metric_char(c)),
        UnderscorePolicy::Preserve => tokenize(name),
    }
}

/// Appends the unit suffixes to `tokens`.
///
/// When collapsing, a suffix that already is one of the tokens is not added again, trailing
/// underscores are trimmed where they would double up at a boundary, and a "per" suffix without a
/// unit is dropped.
fn add_unit_tokens<'a>(
    tokens: &mut Vec<&'a str>,
    main_suffix: &'a str,
    per_suffix: &'a str,
    policy: UnderscorePolicy,
) {
    if policy == UnderscorePolicy::Preserve {
        if !main_suffix.is_empty() {
            tokens.extend(tokenize(main_suffix));
        }
        if !per_suffix.is_empty() && !is_degenerate_per_suffix(per_suffix) {
            tokens.extend(tokenize(per_suffix));
        }
        return;
    }

    let mut main_suffix = main_suffix;
    if tokens.contains(&main_suffix) {
        main_suffix = "";
    }

    let mut per_suffix = per_suffix;
    if is_degenerate_per_suffix(per_suffix) {
        per_suffix = "";
    } else {
        per_suffix = per_suffix.strip_suffix('_').unwrap_or(per_suffix);
        if tokens.contains(&per_suffix) {
            per_suffix = "";
        }
    }

    if !per_suffix.is_empty() {
        main_suffix = main_suffix.strip_suffix('_').unwrap_or(main_suffix);
    }

    for suffix in [main_suffix, per_suffix] {
        if !suffix.is_empty() {
            tokens.push(suffix);
        }
    }
}

/// Removes every occurrence of `token` and appends it once at the end.
fn move_to_end<'a>(tokens: &mut Vec<&'a str>, token: &'a str) {
    tokens.retain(|t| *t != token);
    tokens.push(token);
}
