//! Replacement of invalid characters and underscore-aware tokenization.
//!
//! Two policies exist for handling runs of invalid characters. [`UnderscorePolicy::Collapse`] is
//! what the OpenTelemetry to Prometheus [compatibility specification] mandates: any run of invalid
//! characters (underscores included) becomes a single underscore.
//! [`UnderscorePolicy::Preserve`] replaces every invalid character individually and leaves existing
//! underscore runs alone, which is what older translators did.
//!
//! [compatibility specification]: https://github.com/open-telemetry/opentelemetry-specification/blob/v1.38.0/specification/compatibility/prometheus_and_openmetrics.md#otlp-metric-points-to-prometheus

/// How runs of invalid characters and underscores are rendered.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum UnderscorePolicy {
    /// Each run of invalid characters becomes exactly one underscore.
    #[default]
    Collapse,
    /// Each invalid character becomes one underscore, so runs survive.
    ///
    /// This does not follow the OpenTelemetry compatibility specification and should only be used
    /// by consumers that depend on the legacy output.
    Preserve,
}

impl UnderscorePolicy {
    /// Selects [`Preserve`](UnderscorePolicy::Preserve) when `preserve` is set, and
    /// [`Collapse`](UnderscorePolicy::Collapse) otherwise.
    pub const fn from_preserve(preserve: bool) -> Self {
        if preserve {
            UnderscorePolicy::Preserve
        } else {
            UnderscorePolicy::Collapse
        }
    }

    /// Sanitizes `input` according to this policy.
    pub fn sanitize<F>(self, input: &str, is_valid: F) -> String
    where
        F: Fn(char) -> bool,
    {
        match self {
            UnderscorePolicy::Collapse => sanitize_collapsing(input, is_valid),
            UnderscorePolicy::Preserve => sanitize_preserving(input, is_valid),
        }
    }
}

/// Replaces each maximal run of characters rejected by `is_valid` with a single underscore.
///
/// Leading and trailing runs are kept as a single underscore rather than dropped.
pub fn sanitize_collapsing<F>(input: &str, is_valid: F) -> String
where
    F: Fn(char) -> bool,
{
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_underscore = false;

    for c in input.chars() {
        if is_valid(c) {
            sanitized.push(c);
            previous_underscore = false;
        } else if !previous_underscore {
            sanitized.push('_');
            previous_underscore = true;
        }
    }

    sanitized
}

/// Replaces each character rejected by `is_valid` with an underscore.
pub fn sanitize_preserving<F>(input: &str, is_valid: F) -> String
where
    F: Fn(char) -> bool,
{
    input.chars().map(|c| if is_valid(c) { c } else { '_' }).collect()
}

/// Splits `input` around each run of characters matching `is_separator`, dropping empty fields.
pub(crate) fn split_fields<F>(input: &str, is_separator: F) -> Vec<&str>
where
    F: Fn(char) -> bool,
{
    input.split(is_separator).filter(|field| !field.is_empty()).collect()
}

/// Splits `input` into alternating runs of underscores and non-underscores.
///
/// Each run is kept verbatim, so concatenating the tokens gives back `input`, and so does
/// [`join_preserving_underscores`].
pub fn tokenize(input: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_underscores = None;

    for (i, c) in input.char_indices() {
        let underscore = c == '_';
        match in_underscores {
            Some(previous) if previous != underscore => {
                tokens.push(&input[start..i]);
                start = i;
            }
            _ => {}
        }
        in_underscores = Some(underscore);
    }

    if start < input.len() {
        tokens.push(&input[start..]);
    }

    tokens
}

/// Concatenates `tokens`, inserting an underscore between two tokens only when neither side of the
/// boundary already is one.
pub fn join_preserving_underscores<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    let mut previous_ends_with_underscore = true;

    for (i, token) in tokens.into_iter().enumerate() {
        let token = token.as_ref();
        if i > 0 && !previous_ends_with_underscore && !token.starts_with('_') {
            joined.push('_');
        }
        joined.push_str(token);
        previous_ends_with_underscore = token.ends_with('_');
    }

    joined
}
