//! Character classes of the classic Prometheus naming scheme.

/// Whether `c` may appear in a compliant label name.
///
/// Essentially, needs to match the regex pattern of `[a-zA-Z0-9]`. The underscore is
/// excluded: it is the separator the sanitizers emit, so any underscore already present is treated
/// like every other separator.
#[inline]
pub fn is_valid_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Whether `c` may appear in a compliant metric name.
///
/// Essentially, needs to match the regex pattern of `[a-zA-Z0-9:]`. Colons are kept since recording
/// rules use them to namespace aggregated metrics.
#[inline]
pub fn is_valid_metric_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ':'
}

/// Whether `c` may appear in a compliant metric name without being treated as a separator.
#[inline]
pub(crate) fn is_metric_name_char(c: char) -> bool {
    is_valid_metric_char(c) || c == '_'
}

#[inline]
pub(crate) fn starts_with_digit(s: &str) -> bool {
    s.chars().next().map_or(false, |c| c.is_ascii_digit())
}

#[inline]
pub(crate) fn is_all_underscores(s: &str) -> bool {
    s.chars().all(|c| c == '_')
}

#[cfg(test)]
mod tests {
    use super::{is_all_underscores, is_valid_label_char, is_valid_metric_char, starts_with_digit};

    #[test]
    fn test_label_chars() {
        for c in ['a', 'z', 'A', 'Z', '0', '9'] {
            assert!(is_valid_label_char(c), "{c:?} should be valid");
        }
        for c in ['_', ':', '.', '-', ' ', 'é', '字'] {
            assert!(!is_valid_label_char(c), "{c:?} should be invalid");
        }
    }

    #[test]
    fn test_metric_chars() {
        for c in ['a', 'Z', '5', ':'] {
            assert!(is_valid_metric_char(c), "{c:?} should be valid");
        }
        for c in ['_', '.', '/', '%', 'ñ'] {
            assert!(!is_valid_metric_char(c), "{c:?} should be invalid");
        }
    }

    #[test]
    fn test_helpers() {
        assert!(starts_with_digit("3.14"));
        assert!(!starts_with_digit("_3"));
        assert!(!starts_with_digit(""));
        assert!(!starts_with_digit("٣"));

        assert!(is_all_underscores(""));
        assert!(is_all_underscores("___"));
        assert!(!is_all_underscores("_a_"));
    }
}
