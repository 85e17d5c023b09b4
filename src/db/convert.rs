// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Conversion from Firestore wire documents to plain JSON.
//!
//! Special types are written as tagged objects so a backup stays readable
//! without the Firestore SDK:
//! - timestamps: `{"_seconds": .., "_nanoseconds": ..}`
//! - geo points: `{"_latitude": .., "_longitude": ..}`
//! - bytes: base64 string
//! - references: document path relative to the database root
//!
//! A document's subcollections are nested under its `subCollection` key.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use gcloud_sdk::google::firestore::v1::{value::ValueType, Document, Value as FirestoreValue};
use serde_json::{json, Map, Number, Value};
use std::collections::BTreeMap;

const DOCUMENTS_ROOT: &str = "/documents/";
/// Field holding a document's exported subcollections.
pub const SUBCOLLECTION_KEY: &str = "subCollection";

/// Document ID (last path segment) of a fully-qualified document name.
pub fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Strip `projects/{p}/databases/{d}/documents/` from a resource name.
pub fn relative_path(name: &str) -> &str {
    match name.find(DOCUMENTS_ROOT) {
        Some(idx) => &name[idx + DOCUMENTS_ROOT.len()..],
        None => name,
    }
}

/// Convert all fields of a document to a JSON object.
pub fn document_to_json(doc: &Document) -> Value {
    sorted_object(doc.fields.iter())
}

/// Nest exported subcollections into a converted document.
///
/// Documents without subcollections are left untouched.
pub fn attach_subcollections(fields: &mut Value, subcollections: Map<String, Value>) {
    if subcollections.is_empty() {
        return;
    }
    if let Value::Object(fields) = fields {
        fields.insert(SUBCOLLECTION_KEY.to_string(), Value::Object(subcollections));
    }
}

/// Build a JSON object with keys in sorted order, whatever the source map.
fn sorted_object<'a, I>(fields: I) -> Value
where
    I: Iterator<Item = (&'a String, &'a FirestoreValue)>,
{
    let sorted: BTreeMap<&String, &FirestoreValue> = fields.collect();
    Value::Object(
        sorted
            .into_iter()
            .map(|(key, value)| (key.clone(), value_to_json(value)))
            .collect::<Map<String, Value>>(),
    )
}

/// Convert a single Firestore value.
#[allow(unreachable_patterns)]
pub fn value_to_json(value: &FirestoreValue) -> Value {
    let Some(value_type) = &value.value_type else {
        return Value::Null;
    };

    match value_type {
        ValueType::NullValue(_) => Value::Null,
        ValueType::BooleanValue(b) => Value::Bool(*b),
        ValueType::IntegerValue(i) => Value::Number((*i).into()),
        // NaN and infinities have no JSON form
        ValueType::DoubleValue(d) => Number::from_f64(*d).map_or(Value::Null, Value::Number),
        ValueType::StringValue(s) => Value::String(s.clone()),
        ValueType::BytesValue(bytes) => Value::String(BASE64.encode(bytes)),
        ValueType::TimestampValue(ts) => json!({
            "_seconds": ts.seconds,
            "_nanoseconds": ts.nanos,
        }),
        ValueType::GeoPointValue(point) => json!({
            "_latitude": point.latitude,
            "_longitude": point.longitude,
        }),
        ValueType::ReferenceValue(name) => Value::String(relative_path(name).to_string()),
        ValueType::ArrayValue(array) => {
            Value::Array(array.values.iter().map(value_to_json).collect())
        }
        ValueType::MapValue(map) => sorted_object(map.fields.iter()),
        other => {
            tracing::debug!(?other, "Unsupported Firestore value type, storing null");
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcloud_sdk::google::firestore::v1::{ArrayValue, MapValue};

    fn val(value_type: ValueType) -> FirestoreValue {
        FirestoreValue {
            value_type: Some(value_type),
        }
    }

    #[test]
    fn test_document_id_and_relative_path() {
        let name = "projects/demo/databases/(default)/documents/favmrts/abc123";
        assert_eq!(document_id(name), "abc123");
        assert_eq!(relative_path(name), "favmrts/abc123");
        assert_eq!(document_id("plain"), "plain");
        assert_eq!(relative_path("plain/path"), "plain/path");
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(value_to_json(&FirestoreValue { value_type: None }), Value::Null);
        assert_eq!(value_to_json(&val(ValueType::NullValue(0))), Value::Null);
        assert_eq!(value_to_json(&val(ValueType::BooleanValue(true))), json!(true));
        assert_eq!(value_to_json(&val(ValueType::IntegerValue(-42))), json!(-42));
        assert_eq!(value_to_json(&val(ValueType::DoubleValue(1.5))), json!(1.5));
        assert_eq!(
            value_to_json(&val(ValueType::StringValue("Bishan".to_string()))),
            json!("Bishan")
        );
        assert_eq!(
            value_to_json(&val(ValueType::BytesValue(b"hi".to_vec().into()))),
            json!("aGk=")
        );
    }

    #[test]
    fn test_non_finite_double_becomes_null() {
        assert_eq!(value_to_json(&val(ValueType::DoubleValue(f64::NAN))), Value::Null);
        assert_eq!(
            value_to_json(&val(ValueType::DoubleValue(f64::INFINITY))),
            Value::Null
        );
    }

    #[test]
    fn test_timestamp_and_geo_point() {
        let mut ts = val(ValueType::TimestampValue(Default::default()));
        if let Some(ValueType::TimestampValue(t)) = &mut ts.value_type {
            t.seconds = 1_700_000_000;
            t.nanos = 250;
        }
        assert_eq!(
            value_to_json(&ts),
            json!({"_seconds": 1_700_000_000i64, "_nanoseconds": 250})
        );

        let mut geo = val(ValueType::GeoPointValue(Default::default()));
        if let Some(ValueType::GeoPointValue(p)) = &mut geo.value_type {
            p.latitude = 1.35;
            p.longitude = 103.8;
        }
        assert_eq!(
            value_to_json(&geo),
            json!({"_latitude": 1.35, "_longitude": 103.8})
        );
    }

    #[test]
    fn test_reference_is_relative() {
        let reference = val(ValueType::ReferenceValue(
            "projects/demo/databases/(default)/documents/users/u1".to_string(),
        ));
        assert_eq!(value_to_json(&reference), json!("users/u1"));
    }

    #[test]
    fn test_nested_array_and_map() {
        let inner = MapValue {
            fields: [
                ("code".to_string(), val(ValueType::StringValue("NS17".to_string()))),
                ("stops".to_string(), val(ValueType::IntegerValue(3))),
            ]
            .into_iter()
            .collect(),
        };
        let array = val(ValueType::ArrayValue(ArrayValue {
            values: vec![val(ValueType::MapValue(inner)), val(ValueType::NullValue(0))],
        }));

        assert_eq!(
            value_to_json(&array),
            json!([{"code": "NS17", "stops": 3}, null])
        );
    }

    #[test]
    fn test_document_fields_are_sorted() {
        let doc = Document {
            name: "projects/demo/databases/(default)/documents/ownroutes/r1".to_string(),
            fields: [
                ("zone".to_string(), val(ValueType::StringValue("east".to_string()))),
                ("alpha".to_string(), val(ValueType::BooleanValue(false))),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_string(&document_to_json(&doc)).unwrap(),
            r#"{"alpha":false,"zone":"east"}"#
        );
    }

    #[test]
    fn test_attach_subcollections() {
        let mut fields = json!({"name": "Home to work"});
        let mut nested = Map::new();
        nested.insert("stops".to_string(), json!({"s1": {"code": "NS17"}}));

        attach_subcollections(&mut fields, nested);

        assert_eq!(
            fields,
            json!({
                "name": "Home to work",
                "subCollection": {"stops": {"s1": {"code": "NS17"}}}
            })
        );
    }

    #[test]
    fn test_no_subcollections_leaves_document_unchanged() {
        let mut fields = json!({"name": "Home to work"});
        attach_subcollections(&mut fields, Map::new());
        assert_eq!(fields, json!({"name": "Home to work"}));
    }
}
