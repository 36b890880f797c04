use thiserror::Error as ThisError;
use tracing::debug;

use crate::chars::{is_all_underscores, is_valid_label_char, starts_with_digit};
use crate::sanitize::UnderscorePolicy;

/// Errors that could occur while building a label name.
///
/// A failed label should be dropped on its own; the remaining labels of the series are unaffected.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum LabelNameError {
    /// The label name was empty.
    #[error("label name is empty")]
    Empty,

    /// The label name only consisted of underscores, with UTF-8 names allowed.
    #[error("label name {label:?} contains only underscores")]
    OnlyUnderscores {
        /// The label name as given.
        label: String,
    },

    /// Sanitizing the label name left nothing but underscores.
    #[error("normalization for label name {label:?} resulted in invalid name {normalized:?}")]
    InvalidResult {
        /// The label name as given.
        label: String,
        /// The label name after invalid characters were replaced.
        normalized: String,
    },
}

impl LabelNameError {
    /// Whether the label was rejected for consisting of underscores only, either as given or after
    /// sanitizing.
    pub fn is_all_underscore(&self) -> bool {
        matches!(self, LabelNameError::OnlyUnderscores { .. } | LabelNameError::InvalidResult { .. })
    }
}

/// Builds Prometheus label names from OpenTelemetry attribute keys.
///
/// With the default settings, every character outside of `[a-zA-Z0-9]` is replaced, runs of
/// replaced characters collapse into a single underscore, and names starting with a digit are
/// prefixed with `key_`. Reserved names, which start with exactly two underscores (`__name__`), are
/// left untouched.
///
/// ```rust
/// use metrics_otlp_translator::LabelNamer;
///
/// let namer = LabelNamer::default();
/// assert_eq!(namer.build("http.method").unwrap(), "http_method");
/// assert_eq!(namer.build("123invalid").unwrap(), "key_123invalid");
/// assert_eq!(namer.build("__reserved__").unwrap(), "__reserved__");
/// assert!(namer.build("ようこそ").is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct LabelNamer {
    /// Returns names unchanged, as long as they are not empty and not made of underscores only.
    pub utf8_allowed: bool,

    /// Replaces invalid characters one by one and keeps runs of underscores.
    ///
    /// This option is discouraged as it violates the OpenTelemetry to Prometheus specification, but
    /// may be needed for compatibility with legacy systems. Ignored when `utf8_allowed` is set.
    pub preserve_multiple_underscores: bool,

    /// Prefixes names starting with a single underscore with `key`, e.g. `_foo` becomes `key_foo`.
    ///
    /// Ignored when `utf8_allowed` is set.
    pub underscore_label_sanitization: bool,
}

impl LabelNamer {
    /// Builds the label name for `label`.
    ///
    /// # Errors
    ///
    /// Fails if `label` is empty, or if nothing but underscores would remain of it.
    pub fn build(&self, label: &str) -> Result<String, LabelNameError> {
        if label.is_empty() {
            return reject(LabelNameError::Empty);
        }

        if self.utf8_allowed {
            if is_all_underscores(label) {
                return reject(LabelNameError::OnlyUnderscores { label: label.to_string() });
            }
            return Ok(label.to_string());
        }

        if is_reserved(label) {
            return Ok(label.to_string());
        }

        let policy = UnderscorePolicy::from_preserve(self.preserve_multiple_underscores);
        let mut normalized = policy.sanitize(label, is_valid_label_char);
        if is_all_underscores(&normalized) {
            return reject(LabelNameError::InvalidResult { label: label.to_string(), normalized });
        }

        if starts_with_digit(&normalized) {
            normalized.insert_str(0, "key_");
        } else if self.underscore_label_sanitization && normalized.starts_with('_') {
            normalized.insert_str(0, "key");
        }

        Ok(normalized)
    }
}

/// Whether `label` is reserved for internal use: exactly two leading underscores followed by
/// something else.
fn is_reserved(label: &str) -> bool {
    label
        .strip_prefix("__")
        .map_or(false, |rest| rest.chars().next().map_or(false, |c| c != '_'))
}

fn reject(error: LabelNameError) -> Result<String, LabelNameError> {
    debug!(%error, "rejected label name");
    Err(error)
}
