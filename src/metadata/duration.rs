use once_cell::sync::Lazy;
use regex::Regex;

static ISO8601_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("Failed to compile ISO-8601 regex")
});

static QUOTED_LENGTH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""lengthSeconds"\s*:\s*"(\d+)""#).expect("Failed to compile lengthSeconds regex")
});

static NUMERIC_LENGTH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""lengthSeconds"\s*:\s*(\d+)"#).expect("Failed to compile lengthSeconds regex")
});

static APPROX_MS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""approxDurationMs"\s*:\s*"?(\d+)"?"#)
        .expect("Failed to compile approxDurationMs regex")
});

static ITEMPROP_DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"itemprop="duration"\s+content="(PT[^"]+)""#)
        .expect("Failed to compile itemprop duration regex")
});

static JSON_LD_DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""duration"\s*:\s*"(PT[^"]+)""#).expect("Failed to compile JSON-LD duration regex")
});

/// Convert an ISO-8601 duration (`PT1H2M3S`) to seconds.
///
/// Only the time part is supported, which is what the platform emits.
/// Anything else, including overflowing values, yields `None`.
pub fn parse_iso8601_duration(value: &str) -> Option<u64> {
    let caps = ISO8601_REGEX.captures(value.trim())?;

    let component = |idx: usize| -> Option<u64> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse::<u64>().ok(),
            None => Some(0),
        }
    };

    let hours = component(1)?;
    let minutes = component(2)?;
    let seconds = component(3)?;

    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Render seconds as `H:MM:SS`, with a `N day(s), ` prefix past 24 hours.
pub fn format_duration(total: u64) -> String {
    let days = total / 86_400;
    let rest = total % 86_400;
    let clock = format!("{}:{:02}:{:02}", rest / 3600, (rest % 3600) / 60, rest % 60);

    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        d => format!("{d} days, {clock}"),
    }
}

/// First occurrence of the captured number that maps to a positive value.
/// Pages carry `0` placeholders ahead of the real field, so every match is tried.
fn first_positive<F>(regex: &Regex, html: &str, map: F) -> Option<u64>
where
    F: Fn(u64) -> u64,
{
    regex
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<u64>().ok())
        .map(map)
        .find(|v| *v > 0)
}

pub(crate) fn quoted_length_seconds(html: &str) -> Option<u64> {
    first_positive(&QUOTED_LENGTH_REGEX, html, |s| s)
}

pub(crate) fn numeric_length_seconds(html: &str) -> Option<u64> {
    first_positive(&NUMERIC_LENGTH_REGEX, html, |s| s)
}

pub(crate) fn approx_duration_ms(html: &str) -> Option<u64> {
    first_positive(&APPROX_MS_REGEX, html, |ms| ms / 1000)
}

pub(crate) fn schema_iso8601(html: &str) -> Option<u64> {
    [&*ITEMPROP_DURATION_REGEX, &*JSON_LD_DURATION_REGEX]
        .into_iter()
        .flat_map(|regex| regex.captures_iter(html))
        .filter_map(|caps| caps.get(1).and_then(|m| parse_iso8601_duration(m.as_str())))
        .find(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso8601() {
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), Some(3723));
        assert_eq!(parse_iso8601_duration("PT4M7S"), Some(247));
        assert_eq!(parse_iso8601_duration("PT45S"), Some(45));
        assert_eq!(parse_iso8601_duration("PT2H"), Some(7200));
        assert_eq!(parse_iso8601_duration("INVALID"), None);
        assert_eq!(parse_iso8601_duration("P1DT2H"), None);
        assert_eq!(parse_iso8601_duration(""), None);
    }

    #[test]
    fn test_parse_iso8601_overflow() {
        assert_eq!(parse_iso8601_duration("PT99999999999999999999H"), None);
        assert_eq!(parse_iso8601_duration("PT9999999999999999H"), None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(3661), "1:01:01");
        assert_eq!(format_duration(59), "0:00:59");
        assert_eq!(format_duration(86_400), "1 day, 0:00:00");
        assert_eq!(format_duration(2 * 86_400 + 61), "2 days, 0:01:01");
    }

    #[test]
    fn test_strategies_skip_zero() {
        assert_eq!(quoted_length_seconds(r#""lengthSeconds":"0""#), None);
        assert_eq!(numeric_length_seconds(r#""lengthSeconds":12"#), Some(12));
        assert_eq!(approx_duration_ms(r#""approxDurationMs":"999""#), None);
        assert_eq!(approx_duration_ms(r#""approxDurationMs":"212345""#), Some(212));
    }

    #[test]
    fn test_placeholder_zero_before_real_value() {
        let html = r#"{"lengthSeconds":"0"} ... {"lengthSeconds":"300"}"#;
        assert_eq!(quoted_length_seconds(html), Some(300));
        assert_eq!(
            numeric_length_seconds(r#""lengthSeconds":0,"x":1,"lengthSeconds":42"#),
            Some(42)
        );
        assert_eq!(
            approx_duration_ms(r#""approxDurationMs":"0","approxDurationMs":"61000""#),
            Some(61)
        );
        assert_eq!(
            schema_iso8601(r#"{"duration":"PT0S"},{"duration":"PT1M"}"#),
            Some(60)
        );
    }

    #[test]
    fn test_schema_iso8601_sources() {
        assert_eq!(
            schema_iso8601(r#"<meta itemprop="duration" content="PT1H2M3S" />"#),
            Some(3723)
        );
        assert_eq!(
            schema_iso8601(r#"{"@type":"VideoObject","duration":"PT4M7S"}"#),
            Some(247)
        );
        assert_eq!(schema_iso8601(r#"{"duration":"PT0S"}"#), None);
    }
}
