//! Translation of [UCUM] unit codes into Prometheus unit suffixes.
//!
//! OpenTelemetry units use the `c/s` notation, for example `By/s`. The part before the slash is the
//! main unit and maps to a plural word (`bytes`), the part after it is the "per" unit and maps to a
//! singular word behind a `per_` prefix (`per_second`). Unknown codes pass through as written and are
//! then cleaned to compliant characters, so custom units still end up in the name.
//!
//! See the Prometheus [base units] and the OpenMetrics [units] for the target conventions.
//!
//! [UCUM]: https://ucum.org/ucum.html
//! [base units]: https://prometheus.io/docs/practices/naming/#base-units
//! [units]: https://github.com/prometheus/OpenMetrics/blob/v1.0.0/specification/OpenMetrics.md#units-and-base-units

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::chars::{is_all_underscores, is_valid_metric_char};
use crate::sanitize::UnderscorePolicy;

static UNIT_WORDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Time
        ("d", "days"),
        ("h", "hours"),
        ("min", "minutes"),
        ("s", "seconds"),
        ("ms", "milliseconds"),
        ("us", "microseconds"),
        ("ns", "nanoseconds"),
        // Bytes
        ("By", "bytes"),
        ("KiBy", "kibibytes"),
        ("MiBy", "mebibytes"),
        ("GiBy", "gibibytes"),
        ("TiBy", "tibibytes"),
        ("KBy", "kilobytes"),
        ("MBy", "megabytes"),
        ("GBy", "gigabytes"),
        ("TBy", "terabytes"),
        // SI
        ("m", "meters"),
        ("V", "volts"),
        ("A", "amperes"),
        ("J", "joules"),
        ("W", "watts"),
        ("g", "grams"),
        // Misc
        ("Cel", "celsius"),
        ("Hz", "hertz"),
        ("1", ""),
        ("%", "percent"),
    ])
});

static PER_UNIT_WORDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("s", "second"),
        ("m", "minute"),
        ("h", "hour"),
        ("d", "day"),
        ("w", "week"),
        ("mo", "month"),
        ("y", "year"),
    ])
});

const PER_PREFIX: &str = "per_";

/// Translates a main unit code into its Prometheus word, e.g. `By` into `bytes`.
///
/// Unknown codes are returned unchanged. The dimensionless unit `1` translates to an empty string.
pub fn translate_unit_symbol(symbol: &str) -> &str {
    UNIT_WORDS.get(symbol).copied().unwrap_or(symbol)
}

/// Translates a "per" unit code into its singular word, e.g. `s` into `second`.
///
/// Unknown codes are returned unchanged.
pub fn translate_per_unit_symbol(symbol: &str) -> &str {
    PER_UNIT_WORDS.get(symbol).copied().unwrap_or(symbol)
}

/// Cleans a unit fragment so that it only contains metric name characters.
///
/// Every character outside of `[a-zA-Z0-9:]` becomes an underscore, runs of underscores collapse
/// into one, and a leading underscore is removed. A trailing underscore is kept.
pub fn clean_unit_token(token: &str) -> String {
    clean_unit_token_with(token, UnderscorePolicy::Collapse)
}

pub(crate) fn clean_unit_token_with(token: &str, policy: UnderscorePolicy) -> String {
    policy.sanitize(token, is_valid_metric_char).trim_start_matches('_').to_string()
}

/// Splits `unit` into its translated main and "per" suffixes, without cleaning them.
///
/// Each side is trimmed of whitespace, and a side that is a UCUM annotation (anything containing
/// curly braces, like `{packets}`) contributes nothing. The "per" suffix carries its `per_` prefix.
pub(crate) fn raw_unit_suffixes(unit: &str) -> (String, String) {
    let (main, per) = match unit.split_once('/') {
        Some((main, per)) => (main, Some(per)),
        None => (unit, None),
    };

    let main = main.trim();
    let main_suffix = if main.is_empty() || is_annotation(main) {
        String::new()
    } else {
        translate_unit_symbol(main).to_string()
    };

    let per_suffix = match per.map(str::trim) {
        Some(per) if !per.is_empty() && !is_annotation(per) => {
            let word = translate_per_unit_symbol(per);
            let mut suffix = String::with_capacity(PER_PREFIX.len() + word.len());
            suffix.push_str(PER_PREFIX);
            suffix.push_str(word);
            suffix
        }
        _ => String::new(),
    };

    (main_suffix, per_suffix)
}

fn is_annotation(unit: &str) -> bool {
    unit.contains(['{', '}'])
}

/// Returns whether `per_suffix` carries no unit beyond its `per_` prefix, as happens when the "per"
/// unit has no valid characters.
pub(crate) fn is_degenerate_per_suffix(per_suffix: &str) -> bool {
    per_suffix.strip_prefix(PER_PREFIX).map_or(false, is_all_underscores)
}

/// Builds the main and "per" suffixes for `unit`, e.g. `("bytes", "per_second")` for `By/s`.
///
/// Both suffixes are cleaned to metric name characters. Either one, or both, may be empty: when the
/// unit is empty or dimensionless, when a side is a UCUM annotation such as `{packets}`, or when a
/// side has no valid characters left after cleaning.
pub fn build_unit_suffixes(unit: &str) -> (String, String) {
    let (main, per) = raw_unit_suffixes(unit);
    let main = clean_unit_token(&main);
    let per = clean_unit_token(&per);

    let per = if is_degenerate_per_suffix(&per) {
        String::new()
    } else {
        per.strip_suffix('_').map(str::to_string).unwrap_or(per)
    };

    (main, per)
}

/// Renders a unit on its own, the way [`MetricNamer`](crate::MetricNamer) would suffix it.
///
/// Useful for populating the unit metadata of a metric family consistently with its name.
///
/// ```rust
/// use metrics_otlp_translator::UnitNamer;
///
/// let namer = UnitNamer::default();
/// assert_eq!(namer.build("By/s"), "bytes_per_second");
/// assert_eq!(namer.build("{packets}"), "");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct UnitNamer {
    /// Leaves the unit characters as written, only translating known unit codes.
    pub utf8_allowed: bool,
}

impl UnitNamer {
    /// Builds the unit name for `unit`.
    pub fn build(&self, unit: &str) -> String {
        let (mut main, mut per) = raw_unit_suffixes(unit);
        if !self.utf8_allowed {
            main = clean_unit_token(&main);
            per = clean_unit_token(&per);
        }
        if is_degenerate_per_suffix(&per) {
            per.clear();
        }

        let mut name = match (main.is_empty(), per.is_empty()) {
            (false, false) => {
                main.push('_');
                main.push_str(&per);
                main
            }
            (false, true) => main,
            (true, _) => per,
        };

        if name.starts_with('_') {
            name.remove(0);
        }
        if name.ends_with('_') {
            name.pop();
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::{
        build_unit_suffixes, clean_unit_token, clean_unit_token_with, is_degenerate_per_suffix,
        raw_unit_suffixes, translate_per_unit_symbol, translate_unit_symbol, UnitNamer,
    };
    use crate::sanitize::UnderscorePolicy;

    #[test]
    fn test_translate_unit_symbol() {
        assert_eq!(translate_unit_symbol(""), "");
        assert_eq!(translate_unit_symbol("s"), "seconds");
        assert_eq!(translate_unit_symbol("KiBy"), "kibibytes");
        assert_eq!(translate_unit_symbol("Cel"), "celsius");
        assert_eq!(translate_unit_symbol("1"), "");
        assert_eq!(translate_unit_symbol("%"), "percent");
        assert_eq!(translate_unit_symbol("invalid"), "invalid");
    }

    #[test]
    fn test_translate_per_unit_symbol() {
        assert_eq!(translate_per_unit_symbol(""), "");
        assert_eq!(translate_per_unit_symbol("s"), "second");
        assert_eq!(translate_per_unit_symbol("mo"), "month");
        assert_eq!(translate_per_unit_symbol("invalid"), "invalid");
    }

    #[test]
    fn test_clean_unit_token_known_cases() {
        let cases = &[
            ("", ""),
            ("a b", "a_b"),
            ("hello, world", "hello_world"),
            ("hello you 2", "hello_you_2"),
            ("$1000", "1000"),
            ("*+$^=)", ""),
            ("%*()°:C", ":C"),
            ("custom_unit_", "custom_unit_"),
            ("per__custom__unit_", "per_custom_unit_"),
        ];

        for (input, expected) in cases {
            let result = clean_unit_token(input);
            assert_eq!(expected, &result);
        }
    }

    #[test]
    fn test_clean_unit_token_preserving() {
        let preserve = UnderscorePolicy::Preserve;
        assert_eq!(clean_unit_token_with("unit__multiple", preserve), "unit__multiple");
        assert_eq!(clean_unit_token_with("__unit", preserve), "unit");
        assert_eq!(clean_unit_token_with("per_@@", preserve), "per___");
    }

    #[test]
    fn test_is_degenerate_per_suffix() {
        assert!(is_degenerate_per_suffix("per_"));
        assert!(is_degenerate_per_suffix("per___"));
        assert!(!is_degenerate_per_suffix("per_second"));
        assert!(!is_degenerate_per_suffix(""));
        assert!(!is_degenerate_per_suffix("per"));
    }

    #[test]
    fn test_raw_unit_suffixes() {
        assert_eq!(raw_unit_suffixes("By/s"), ("bytes".into(), "per_second".into()));
        assert_eq!(raw_unit_suffixes("km/°"), ("km".into(), "per_°".into()));
        assert_eq!(raw_unit_suffixes("%*()°C"), ("%*()°C".into(), String::new()));
    }

    #[test]
    fn test_build_unit_suffixes_known_cases() {
        let cases = &[
            ("", "", ""),
            ("   \t  ", "", ""),
            ("s", "seconds", ""),
            ("1", "", ""),
            ("By/s", "bytes", "per_second"),
            (" By / s ", "bytes", "per_second"),
            ("requests/m", "requests", "per_minute"),
            ("{invalid}/second", "", "per_second"),
            ("bytes/{invalid}", "bytes", ""),
            ("{scanned}/{returned}", "", ""),
            ("/", "", ""),
            ("By/", "bytes", ""),
            ("/s", "", "per_second"),
            ("km/°", "km", ""),
            ("By/_custom__unit_", "bytes", "per_custom_unit"),
            ("non/standard:_1", "non", "per_standard:_1"),
        ];

        for (unit, main, per) in cases {
            let (got_main, got_per) = build_unit_suffixes(unit);
            assert_eq!((*main, *per), (got_main.as_str(), got_per.as_str()), "unit {unit:?}");
        }
    }

    #[test]
    fn test_unit_namer_known_cases() {
        let cases = &[
            ("", ""),
            ("   ", ""),
            ("ms", "milliseconds"),
            ("TBy", "terabytes"),
            ("1", ""),
            ("1/s", "per_second"),
            ("1/mo", "per_month"),
            ("By/s", "bytes_per_second"),
            ("MBy/h", "megabytes_per_hour"),
            ("requests/m", "requests_per_minute"),
            ("custom/custom", "custom_per_custom"),
            ("{custom}", ""),
            ("By/{custom}", "bytes"),
            ("{custom}/s", "per_second"),
            ("custom@unit#with$chars", "custom_unit_with_chars"),
            ("By/custom@per#unit", "bytes_per_custom_per_unit"),
            ("unit__with__multiple__underscores", "unit_with_multiple_underscores"),
            ("@#$%", ""),
            ("seconds/", "seconds"),
            ("_custom_unit", "custom_unit"),
            ("custom_unit_", "custom_unit"),
            ("By/_custom__unit_", "bytes_per_custom_unit"),
            ("km/°", "km"),
        ];

        let namer = UnitNamer::default();
        for (unit, expected) in cases {
            assert_eq!(namer.build(unit), *expected, "unit {unit:?}");
        }
    }

    #[test]
    fn test_unit_namer_utf8_known_cases() {
        let cases = &[
            ("custom@unit#with$chars", "custom@unit#with$chars"),
            ("By/custom@per#unit", "bytes_per_custom@per#unit"),
            ("unit@@##$$name", "unit@@##$$name"),
            ("unit__with__multiple__underscores", "unit__with__multiple__underscores"),
            ("@#$%", "@#$%"),
            ("%", "percent"),
        ];

        let namer = UnitNamer { utf8_allowed: true };
        for (unit, expected) in cases {
            assert_eq!(namer.build(unit), *expected, "unit {unit:?}");
        }
    }
}
