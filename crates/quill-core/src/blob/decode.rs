use std::fmt;

use serde::de::{DeserializeSeed, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::{Map, Value};

use crate::errors::CoreError;
use crate::value::{FieldMap, FieldValue};

/// Read one member out of a blob.
///
/// Members other than `name` are skipped without being materialized. Returns
/// `None` for an absent or empty blob, an absent member, a `null` member, or
/// a blob that does not parse as a JSON object.
#[must_use]
pub fn get_value(blob: Option<&str>, name: &str) -> Option<FieldValue> {
    let blob = blob.filter(|b| !b.is_empty())?;

    let mut de = serde_json::Deserializer::from_str(blob);
    let found = FieldLookup { name }
        .deserialize(&mut de)
        .and_then(|found| de.end().map(|()| found));

    match found {
        Ok(Some(value)) => match FieldValue::from_json(&value) {
            FieldValue::Null => None,
            value => Some(value),
        },
        Ok(None) => None,
        Err(e) => {
            tracing::debug!("Unreadable blob while looking up '{name}': {e}");
            None
        }
    }
}

/// Decode a whole blob into a map.
///
/// `null` members are kept as [`FieldValue::Null`]. An absent, empty, or
/// malformed blob decodes to an empty map.
#[must_use]
pub fn decode_all(blob: Option<&str>) -> FieldMap {
    let Some(blob) = blob.filter(|b| !b.is_empty()) else {
        return FieldMap::new();
    };
    try_decode_all(blob).unwrap_or_else(|e| {
        tracing::debug!("{e}; treating blob as empty");
        FieldMap::new()
    })
}

/// Decode a whole blob, reporting parse failures.
///
/// # Errors
///
/// Returns `CoreError::MalformedBlob` if `blob` is not a JSON object.
pub fn try_decode_all(blob: &str) -> Result<FieldMap, CoreError> {
    let object: Map<String, Value> =
        serde_json::from_str(blob).map_err(|e| CoreError::MalformedBlob(e.to_string()))?;
    Ok(object
        .iter()
        .map(|(name, value)| (name.clone(), FieldValue::from_json(value)))
        .collect())
}

/// Streams a JSON object, keeping only the value stored under `name`.
///
/// A repeated member resolves to its last occurrence, matching what a full
/// decode would keep.
struct FieldLookup<'n> {
    name: &'n str,
}

impl<'de> DeserializeSeed<'de> for FieldLookup<'_> {
    type Value = Option<Value>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for FieldLookup<'_> {
    type Value = Option<Value>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a flat JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut found = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == self.name {
                found = Some(map.next_value::<Value>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const BLOB: &str =
        r#"{"Status":"Open","Priority":1,"Score":2.5,"Done":false,"Owner":null,"Tags":["a","b"],"Meta":{"k":1}}"#;

    #[rstest]
    #[case("Status", Some(FieldValue::Text("Open".into())))]
    #[case("Priority", Some(FieldValue::Integer(1)))]
    #[case("Score", Some(FieldValue::Float(2.5)))]
    #[case("Done", Some(FieldValue::Bool(false)))]
    #[case("Owner", None)]
    #[case("Tags", Some(FieldValue::Raw(r#"["a","b"]"#.into())))]
    #[case("Meta", Some(FieldValue::Raw(r#"{"k":1}"#.into())))]
    #[case("Missing", None)]
    fn get_value_maps_primitives(#[case] name: &str, #[case] expected: Option<FieldValue>) {
        assert_eq!(get_value(Some(BLOB), name), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("not json"))]
    #[case(Some(r#"{"Status":"Open""#))]
    #[case(Some(r#"["Status","Open"]"#))]
    #[case(Some(r#"{"Status":"Open"} trailing"#))]
    fn get_value_absorbs_missing_and_malformed_blobs(#[case] blob: Option<&str>) {
        assert_eq!(get_value(blob, "Status"), None);
    }

    #[test]
    fn get_value_is_repeatable() {
        let first = get_value(Some(BLOB), "Status");
        let second = get_value(Some(BLOB), "Status");
        assert_eq!(first, second);
    }

    #[test]
    fn get_value_handles_escaped_member_names() {
        let blob = r#"{"say \"hi\"":"yes"}"#;
        assert_eq!(
            get_value(Some(blob), "say \"hi\""),
            Some(FieldValue::Text("yes".into()))
        );
    }

    #[test]
    fn repeated_member_resolves_to_last_occurrence() {
        let blob = r#"{"a":1,"a":2}"#;
        assert_eq!(get_value(Some(blob), "a"), Some(FieldValue::Integer(2)));
        assert_eq!(decode_all(Some(blob))["a"], FieldValue::Integer(2));
    }

    #[test]
    fn decode_all_keeps_every_member() {
        let map = decode_all(Some(BLOB));
        assert_eq!(map.len(), 7);
        assert_eq!(map["Status"], FieldValue::Text("Open".into()));
        assert_eq!(map["Priority"], FieldValue::Integer(1));
        assert_eq!(map["Owner"], FieldValue::Null);
        assert_eq!(map["Meta"], FieldValue::Raw(r#"{"k":1}"#.into()));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("{broken"))]
    #[case(Some("42"))]
    fn decode_all_of_unusable_blob_is_empty(#[case] blob: Option<&str>) {
        assert!(decode_all(blob).is_empty());
    }

    #[test]
    fn try_decode_all_reports_malformed_blob() {
        let err = try_decode_all("{broken").unwrap_err();
        assert!(matches!(err, CoreError::MalformedBlob(_)));
    }
}
