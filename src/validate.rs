//! Shape validation for decoded payloads.
//!
//! A request can succeed at the transport layer and still return a body that
//! lacks the fields a caller is about to read. [`validate`] checks a list of
//! dotted field paths against a `serde_json::Value` and reports which are
//! missing, so callers can decide whether the payload is usable.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// The outcome of [`validate`]: the required paths that could not be resolved.
///
/// An empty report means every path was present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    missing_fields: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if no required field was missing.
    pub fn is_valid(&self) -> bool {
        self.missing_fields.is_empty()
    }

    /// The missing paths, in the order they were required.
    pub fn missing_fields(&self) -> &[String] {
        &self.missing_fields
    }

    /// Consumes the report and returns the missing paths.
    pub fn into_missing_fields(self) -> Vec<String> {
        self.missing_fields
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            f.write_str("all required fields present")
        } else {
            write!(f, "missing fields: {}", self.missing_fields.join(", "))
        }
    }
}

/// Resolves a dotted path such as `quotes.USD.price` against `payload`.
///
/// Each segment selects an object key. A segment made of digits also indexes
/// into arrays, so `0.title` reaches the title of the first element. Indexes
/// must be written canonically: `01` and `+1` resolve to nothing. A `null`
/// value counts as present.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use safecall::validate::resolve_path;
///
/// let payload = json!({"current_weather": {"temperature": 12.5}});
/// assert_eq!(resolve_path(&payload, "current_weather.temperature"), Some(&json!(12.5)));
/// assert_eq!(resolve_path(&payload, "current_weather.windspeed"), None);
/// ```
pub fn resolve_path<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(payload, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => array_index(segment).and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Parses a canonical array index: ASCII digits only, no sign, no leading zero.
fn array_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}

/// Reports which of `required_paths` cannot be resolved in `payload`.
///
/// Paths are checked in order. Each distinct path is resolved once, and a
/// missing path that is required more than once is reported at every
/// position it appears. Resolution stops at the first absent segment, and a
/// partially resolved path counts as missing.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use safecall::validate;
///
/// let payload = json!({"quotes": {"USD": {"price": 1}}});
/// let report = validate(&payload, &["quotes.USD.price", "quotes.USD.volume"]);
///
/// assert_eq!(report.missing_fields(), ["quotes.USD.volume"]);
/// ```
pub fn validate<P: AsRef<str>>(payload: &Value, required_paths: &[P]) -> ValidationReport {
    let mut resolved: HashMap<&str, bool> = HashMap::new();
    let missing_fields = required_paths
        .iter()
        .map(|path| path.as_ref())
        .filter(|path| {
            let present = *resolved
                .entry(*path)
                .or_insert_with(|| resolve_path(payload, path).is_some());
            !present
        })
        .map(str::to_owned)
        .collect();

    ValidationReport { missing_fields }
}
