use std::fmt::Write as _;

use serde_json::{Map, Value};

use crate::errors::CoreError;
use crate::value::{DATETIME_FORMAT, FieldMap, FieldValue, parse_nested};

/// Largest column count written by direct text construction.
pub const SMALL_SET_THRESHOLD: usize = 3;

/// Output of [`encode_change_set`], ready to be assigned to a trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedChangeSet {
    /// The input column names, in input order.
    pub changed_columns: Vec<String>,
    /// `None` when there are no columns.
    pub old_blob: Option<String>,
    /// `None` when there are no columns.
    pub new_blob: Option<String>,
}

/// Encode a change set into its old/new blobs.
///
/// `columns`, `old`, and `new` are parallel: `old[i]` and `new[i]` are the
/// values of `columns[i]` before and after the mutation. Column names are
/// taken as given; duplicates are not removed.
///
/// # Errors
///
/// Returns `CoreError::ArgumentShape` if the three slices differ in length.
pub fn encode_change_set<S: AsRef<str>>(
    columns: &[S],
    old: &[FieldValue],
    new: &[FieldValue],
) -> Result<EncodedChangeSet, CoreError> {
    if columns.len() != old.len() || columns.len() != new.len() {
        return Err(CoreError::ArgumentShape {
            columns: columns.len(),
            old: old.len(),
            new: new.len(),
        });
    }

    let changed_columns = columns.iter().map(|c| c.as_ref().to_string()).collect();

    let (old_blob, new_blob) = if columns.is_empty() {
        (None, None)
    } else if columns.len() <= SMALL_SET_THRESHOLD {
        (
            Some(write_small(columns, old)),
            Some(write_small(columns, new)),
        )
    } else {
        (
            Some(write_object(zip_object(columns, old))),
            Some(write_object(zip_object(columns, new))),
        )
    };

    Ok(EncodedChangeSet {
        changed_columns,
        old_blob,
        new_blob,
    })
}

/// Encode a decoded map back into a blob through the general path.
///
/// An empty map encodes to `None`.
#[must_use]
pub fn encode_map(values: &FieldMap) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let object = values
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect();
    Some(write_object(object))
}

fn zip_object<S: AsRef<str>>(columns: &[S], values: &[FieldValue]) -> Map<String, Value> {
    columns
        .iter()
        .zip(values)
        .map(|(name, value)| (name.as_ref().to_string(), value.to_json()))
        .collect()
}

fn write_object(object: Map<String, Value>) -> String {
    Value::Object(object).to_string()
}

/// Write `{"name":value,...}` straight into a string.
fn write_small<S: AsRef<str>>(columns: &[S], values: &[FieldValue]) -> String {
    let mut out = String::with_capacity(2 + columns.len() * 24);
    out.push('{');
    for (i, (name, value)) in columns.iter().zip(values).enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_json_str(&mut out, name.as_ref());
        out.push(':');
        push_value(&mut out, value);
    }
    out.push('}');
    out
}

fn push_value(out: &mut String, value: &FieldValue) {
    match value {
        FieldValue::Null => out.push_str("null"),
        FieldValue::Bool(true) => out.push_str("true"),
        FieldValue::Bool(false) => out.push_str("false"),
        FieldValue::Integer(n) => {
            let _ = write!(out, "{n}");
        }
        // Number formatting must match the general path: `2.0` stays a float.
        FieldValue::Float(x) => match serde_json::Number::from_f64(*x) {
            Some(n) => {
                let _ = write!(out, "{n}");
            }
            None => out.push_str("null"),
        },
        FieldValue::DateTime(dt) => {
            let _ = write!(out, "\"{}\"", dt.format(DATETIME_FORMAT));
        }
        FieldValue::Text(s) => push_json_str(out, s),
        // Re-serialized so both paths emit the same compact text.
        FieldValue::Raw(s) => match parse_nested(s) {
            Some(nested) => {
                let _ = write!(out, "{nested}");
            }
            None => push_json_str(out, s),
        },
    }
}

fn push_json_str(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\u{20}' => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
