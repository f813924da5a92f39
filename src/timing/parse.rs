//! Parsing of single time expressions into seconds.

use regex::Regex;
use std::sync::LazyLock;

static BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("valid regex"));

static COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(\d{1,2})(?::(\d{1,2}(?:\.\d+)?))?$").expect("valid regex"));

static UNIT_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*([a-z]+)").expect("valid regex"));

/// Convert a time expression to seconds.
///
/// Accepts bare numbers (`"12"`, `"2.5"`), colon forms (`"2:30"` is minutes
/// and seconds, `"1:02:03"` hours, minutes and seconds) and unit tokens,
/// alone or combined (`"90s"`, `"1h 2m 3s"`, `"1 min and 30 sec"`,
/// `"500ms"`). Anything else, including the empty string, yields `None`.
pub fn parse_seconds(token: &str) -> Option<f64> {
    let token = token.trim().to_lowercase();
    if token.is_empty() {
        return None;
    }

    if BARE.is_match(&token) {
        return token.parse::<f64>().ok();
    }

    if let Some(caps) = COLON.captures(&token) {
        let first: f64 = caps[1].parse().ok()?;
        let second: f64 = caps[2].parse().ok()?;
        return match caps.get(3) {
            Some(third) => {
                let third: f64 = third.as_str().parse().ok()?;
                (second < 60.0 && third < 60.0).then(|| first * 3600.0 + second * 60.0 + third)
            }
            None => (second < 60.0).then(|| first * 60.0 + second),
        };
    }

    parse_composite(&token)
}

fn parse_composite(token: &str) -> Option<f64> {
    let mut total = 0.0;
    let mut last_end = 0;
    let mut parts = 0;

    for caps in UNIT_PART.captures_iter(token) {
        let whole = caps.get(0)?;
        if !is_separator(&token[last_end..whole.start()]) {
            return None;
        }

        let amount: f64 = caps[1].parse().ok()?;
        total += amount * unit_weight(&caps[2])?;
        last_end = whole.end();
        parts += 1;
    }

    if parts == 0 || !token[last_end..].trim().is_empty() {
        return None;
    }

    Some(total)
}

fn is_separator(gap: &str) -> bool {
    matches!(gap.trim(), "" | "," | "and")
}

fn unit_weight(unit: &str) -> Option<f64> {
    match unit {
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(3600.0),
        "m" | "min" | "mins" | "minute" | "minutes" => Some(60.0),
        "s" | "sec" | "secs" | "second" | "seconds" => Some(1.0),
        "ms" | "millisecond" | "milliseconds" => Some(0.001),
        _ => None,
    }
}
