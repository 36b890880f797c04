#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]
#![deny(missing_docs)]

mod chars;
pub use self::chars::{is_valid_label_char, is_valid_metric_char};

pub mod sanitize;
pub use self::sanitize::UnderscorePolicy;

mod unit;
pub use self::unit::{
    build_unit_suffixes, clean_unit_token, translate_per_unit_symbol, translate_unit_symbol,
    UnitNamer,
};

mod kind;
pub use self::kind::{Metric, MetricDescriptor, MetricKind};

mod label;
pub use self::label::{LabelNameError, LabelNamer};

mod metric;
pub use self::metric::MetricNamer;

/// Builds the Prometheus label name for the attribute key `label`.
///
/// Shorthand for [`LabelNamer::build`].
///
/// # Errors
///
/// Fails if `label` is empty, or if nothing but underscores would remain of it. Callers should drop
/// the offending label and carry on with the rest of the series.
pub fn build_label_name(label: &str, namer: &LabelNamer) -> Result<String, LabelNameError> {
    namer.build(label)
}

/// Builds the Prometheus metric name for a metric with the given `name`, `unit` and `kind`.
///
/// Shorthand for [`MetricNamer::build_parts`]. Never fails, but may return an empty string when
/// `name` has no valid characters.
pub fn build_metric_name(name: &str, unit: &str, kind: MetricKind, namer: &MetricNamer) -> String {
    namer.build_parts(name, unit, kind)
}

#[cfg(test)]
mod tests {
    use super::{build_label_name, build_metric_name, build_unit_suffixes};
    use crate::{LabelNamer, MetricKind, MetricNamer};

    #[test]
    fn test_entry_points() {
        let labels = LabelNamer::default();
        assert_eq!(build_label_name("123label", &labels).unwrap(), "key_123label");
        assert_eq!(
            build_label_name("__reserved__label__name__", &labels).unwrap(),
            "__reserved__label__name__"
        );
        assert_eq!(
            build_label_name("label!with&special$chars)", &labels).unwrap(),
            "label_with_special_chars_"
        );

        let metrics = MetricNamer { with_metric_suffixes: true, ..Default::default() };
        assert_eq!(
            build_metric_name("system.io", "By", MetricKind::MonotonicCounter, &metrics),
            "system_io_bytes_total"
        );
        assert_eq!(build_metric_name("foo.bar", "1", MetricKind::Gauge, &metrics), "foo_bar_ratio");

        assert_eq!(build_unit_suffixes("By/s"), ("bytes".to_string(), "per_second".to_string()));
    }

    #[test]
    fn test_namers_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LabelNamer>();
        assert_send_sync::<MetricNamer>();
    }
}
