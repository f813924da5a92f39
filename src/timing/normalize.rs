//! Filling in start/duration/end arguments from the user's wording.

use super::parse::parse_seconds;
use crate::catalog::number_value;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

pub const START_KEY: &str = "start_seconds";
pub const DURATION_KEY: &str = "duration_seconds";
pub const END_KEY: &str = "end_seconds";

const UNIT: &str = r"(?:milliseconds?|ms|hours?|hrs?|hr|h|minutes?|mins?|min|m|seconds?|secs?|sec|s)";

/// A time expression as it appears in running text.
static TIME: LazyLock<String> = LazyLock::new(|| {
    let element = format!(r"\d+(?:\.\d+)?\s*{UNIT}");
    format!(
        r"(?:\d+:\d{{1,2}}(?::\d{{1,2}})?|{element}(?:\s*(?:,|and)?\s*{element})*\b|\d+(?:\.\d+)?)"
    )
});

static FROM_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\bfrom\s+({t})(?:\s+(?:to|until|till|through)\s+|\s*-\s*)({t})",
        t = *TIME
    ))
    .expect("valid regex")
});

static START_AT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?:starting\s+at|start\s+at|at|from)\s+({t})",
        t = *TIME
    ))
    .expect("valid regex")
});

static FOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:spans?\s+)?for\s+({t})", t = *TIME)).expect("valid regex")
});

static LONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"({t})\s+long\b", t = *TIME)).expect("valid regex"));

static SET_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?:set\s+(?:it\s+)?to|make\s+(?:it\s+)?)\s*({t})",
        t = *TIME
    ))
    .expect("valid regex")
});

/// Partially known placement of a clip, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeSpec {
    pub start: Option<f64>,
    pub duration: Option<f64>,
    pub end: Option<f64>,
}

impl TimeSpec {
    /// Given exactly two of the three fields, compute the third.
    ///
    /// Derived values are clamped at zero.
    pub fn derive(self) -> Self {
        match (self.start, self.duration, self.end) {
            (Some(start), Some(duration), None) => Self {
                end: Some((start + duration).max(0.0)),
                ..self
            },
            (Some(start), None, Some(end)) => Self {
                duration: Some((end - start).max(0.0)),
                ..self
            },
            (None, Some(duration), Some(end)) => Self {
                start: Some((end - duration).max(0.0)),
                ..self
            },
            _ => self,
        }
    }

    /// Read whatever the text says, first match per field in priority order.
    pub fn from_text(text: &str) -> Self {
        let text = text.to_lowercase();
        let mut spec = TimeSpec::default();

        if let Some(caps) = FROM_TO.captures(&text) {
            spec.start = parse_seconds(&caps[1]);
            spec.end = parse_seconds(&caps[2]);
        }

        if spec.start.is_none() {
            spec.start = first_capture(&START_AT, &text);
        }

        for pattern in [&*FOR, &*LONG, &*SET_TO] {
            if spec.duration.is_some() {
                break;
            }
            spec.duration = first_capture(pattern, &text);
        }

        spec
    }
}

fn first_capture(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures_iter(text)
        .find_map(|caps| parse_seconds(&caps[1]))
}

/// Return a copy of `args` with start, duration and end filled in wherever
/// the user's text or the other two fields determine them.
///
/// Fields already present in `args` are never changed, so applying this
/// twice is the same as applying it once.
pub fn normalize(user_text: &str, args: &Map<String, Value>) -> Map<String, Value> {
    let mut out = args.clone();
    let from_text = TimeSpec::from_text(user_text);

    fill(&mut out, START_KEY, from_text.start);
    fill(&mut out, DURATION_KEY, from_text.duration);
    fill(&mut out, END_KEY, from_text.end);

    let present = [START_KEY, DURATION_KEY, END_KEY]
        .iter()
        .filter(|key| is_present(&out, key))
        .count();

    if present == 2 {
        let known = TimeSpec {
            start: numeric(&out, START_KEY),
            duration: numeric(&out, DURATION_KEY),
            end: numeric(&out, END_KEY),
        };
        let derived = known.derive();
        fill(&mut out, START_KEY, derived.start);
        fill(&mut out, DURATION_KEY, derived.duration);
        fill(&mut out, END_KEY, derived.end);
    }

    out
}

fn is_present(args: &Map<String, Value>, key: &str) -> bool {
    args.get(key).is_some_and(|v| !v.is_null())
}

fn numeric(args: &Map<String, Value>, key: &str) -> Option<f64> {
    match args.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_seconds(s),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn fill(args: &mut Map<String, Value>, key: &str, value: Option<f64>) {
    if is_present(args, key) {
        return;
    }
    if let Some(value) = value {
        args.insert(key.to_string(), number_value(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_from_to_derives_duration() {
        let out = normalize("from 2s to 12s", &Map::new());
        assert_eq!(out[START_KEY], json!(2));
        assert_eq!(out[DURATION_KEY], json!(10));
        assert_eq!(out[END_KEY], json!(12));
    }

    #[test]
    fn test_start_and_duration_derive_end() {
        let args = obj(json!({ "scrubber_name": "cardboard", "track_number": 2 }));
        let out = normalize("from 2 sec for 10 sec add cardboard to track 2", &args);
        assert_eq!(out[START_KEY], json!(2));
        assert_eq!(out[DURATION_KEY], json!(10));
        assert_eq!(out[END_KEY], json!(12));
        assert_eq!(out["track_number"], json!(2));
    }

    #[test]
    fn test_start_patterns() {
        assert_eq!(TimeSpec::from_text("add intro at 1:30").start, Some(90.0));
        assert_eq!(TimeSpec::from_text("Starting at 5s put the logo").start, Some(5.0));
        assert_eq!(TimeSpec::from_text("start at 1m on track 1").start, Some(60.0));
        assert_eq!(TimeSpec::from_text("put it on track 3").start, None);
    }

    #[test]
    fn test_duration_patterns() {
        assert_eq!(TimeSpec::from_text("play it for 1.5 minutes").duration, Some(90.0));
        assert_eq!(TimeSpec::from_text("it spans for 4s").duration, Some(4.0));
        assert_eq!(TimeSpec::from_text("a 3 second long title").duration, Some(3.0));
        assert_eq!(TimeSpec::from_text("set it to 8 seconds").duration, Some(8.0));
        assert_eq!(TimeSpec::from_text("make it 500ms").duration, Some(0.5));
    }

    #[test]
    fn test_duration_priority() {
        // "for" outranks "long"
        let spec = TimeSpec::from_text("a 3s long clip for 7s");
        assert_eq!(spec.duration, Some(7.0));
    }

    #[test]
    fn test_word_after_number_is_not_a_unit() {
        let spec = TimeSpec::from_text("at 2 move it");
        assert_eq!(spec.start, Some(2.0));
    }

    #[test]
    fn test_existing_values_not_overwritten() {
        let args = obj(json!({ "start_seconds": 4, "end_seconds": 20 }));
        let out = normalize("from 2s to 12s", &args);
        assert_eq!(out[START_KEY], json!(4));
        assert_eq!(out[END_KEY], json!(20));
        assert_eq!(out[DURATION_KEY], json!(16));
    }

    #[test]
    fn test_conflicting_explicit_values_kept() {
        let args = obj(json!({ "start_seconds": 1, "duration_seconds": 1, "end_seconds": 9 }));
        let out = normalize("from 2s to 12s for 3s", &args);
        assert_eq!(out, args);
    }

    #[test]
    fn test_negative_span_clamped() {
        let args = obj(json!({ "start_seconds": 10, "end_seconds": 4 }));
        let out = normalize("", &args);
        assert_eq!(out[DURATION_KEY], json!(0));

        let args = obj(json!({ "duration_seconds": 10, "end_seconds": 4 }));
        let out = normalize("", &args);
        assert_eq!(out[START_KEY], json!(0));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let args = obj(json!({ "start_seconds": null, "duration_seconds": 5 }));
        let out = normalize("at 3s", &args);
        assert_eq!(out[START_KEY], json!(3));
        assert_eq!(out[END_KEY], json!(8));
    }

    #[test]
    fn test_one_known_field_derives_nothing() {
        let out = normalize("at 3s", &Map::new());
        assert_eq!(out.len(), 1);
        assert_eq!(out[START_KEY], json!(3));
    }

    #[test]
    fn test_fractional_values_stay_floats() {
        let out = normalize("from 1.5s for 2s", &Map::new());
        assert_eq!(out[START_KEY], json!(1.5));
        assert_eq!(out[END_KEY], json!(3.5));
    }

    #[test]
    fn test_idempotent_and_non_overwriting() {
        let texts = [
            "from 2s to 12s",
            "at 5 for 3",
            "make it 10 seconds long",
            "hello there",
            "from 1:00 - 1:30",
            "starting at 1.5 until 4",
            "add it at 3 sec",
            "for 2 minutes",
        ];
        let args = [
            json!({}),
            json!({ "track_number": 1 }),
            json!({ "end_seconds": 1 }),
            json!({ "start_seconds": "4" }),
            json!({ "duration_seconds": null }),
            json!({ "start_seconds": "abc" }),
            json!({ "duration_seconds": "soon" }),
            json!({ "start_seconds": "abc", "end_seconds": 9 }),
            json!({ "start_seconds": 2, "duration_seconds": "later" }),
            json!({ "start_seconds": null, "end_seconds": "7.5" }),
            json!({ "start_seconds": true, "duration_seconds": [1] }),
            json!({ "start_seconds": 1, "duration_seconds": 2, "end_seconds": 100 }),
        ];

        for text in texts {
            for arg in &args {
                let input = obj(arg.clone());
                let once = normalize(text, &input);
                let twice = normalize(text, &once);
                assert_eq!(once, twice, "not idempotent for {:?} with {}", text, arg);

                for (key, value) in input.iter().filter(|(_, v)| !v.is_null()) {
                    assert_eq!(
                        once.get(key),
                        Some(value),
                        "{} overwritten for {:?} with {}",
                        key,
                        text,
                        arg
                    );
                }
            }
        }
    }
}
