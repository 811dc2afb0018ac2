//! Storage format: group records to and from a flat string document.
//!
//! The backing object's data field only holds string values, so a group is
//! stored as three keys. `uid` is the group uid verbatim, while `objects`
//! and `requests` are each a YAML list of mappings. An absent `error` is
//! omitted from the YAML and decodes back to `None`.

use crate::error::DriverError;
use crate::records::{GroupRecord, ObjectRecord, RequestRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;
use std::collections::BTreeMap;

/// The string-to-string mapping stored in the backing object's data field.
pub type StorageDocument = BTreeMap<String, String>;

pub const UID_KEY: &str = "uid";
pub const OBJECTS_KEY: &str = "objects";
pub const REQUESTS_KEY: &str = "requests";

/// Encode a whole group. A group whose request uids are no longer unique
/// is refused, since it could never be decoded again.
pub fn encode_group(group: &GroupRecord) -> Result<StorageDocument, DriverError> {
    if let Some(duplicate) = group.duplicate_request() {
        return Err(DriverError::encode(
            REQUESTS_KEY,
            format!("request {} recorded more than once", duplicate),
        ));
    }

    let mut document = StorageDocument::new();
    document.insert(UID_KEY.to_string(), group.uid().to_string());
    document.insert(
        OBJECTS_KEY.to_string(),
        encode_sequence(OBJECTS_KEY, group.objects())?,
    );
    document.insert(
        REQUESTS_KEY.to_string(),
        encode_sequence(REQUESTS_KEY, group.requests())?,
    );
    Ok(document)
}

/// Decode a whole group. Missing `objects` or `requests` keys mean empty
/// lists; a missing `uid` is an error. Nothing partial is ever returned.
pub fn decode_group(document: &StorageDocument) -> Result<GroupRecord, DriverError> {
    let uid = document
        .get(UID_KEY)
        .ok_or_else(|| DriverError::decode(UID_KEY, "missing group uid"))?;

    let objects = decode_sequence(OBJECTS_KEY, document.get(OBJECTS_KEY), decode_object_record)?;
    let requests = decode_sequence(
        REQUESTS_KEY,
        document.get(REQUESTS_KEY),
        decode_request_record,
    )?;

    GroupRecord::from_parts(uid.clone(), objects, requests)
        .map_err(|e| DriverError::decode(REQUESTS_KEY, e))
}

pub fn encode_object_record(record: &ObjectRecord) -> Result<Value, DriverError> {
    serde_yaml::to_value(record).map_err(|e| DriverError::encode(OBJECTS_KEY, e))
}

pub fn decode_object_record(value: Value) -> Result<ObjectRecord, DriverError> {
    decode_item(OBJECTS_KEY, value)
}

pub fn encode_request_record(record: &RequestRecord) -> Result<Value, DriverError> {
    serde_yaml::to_value(record).map_err(|e| DriverError::encode(REQUESTS_KEY, e))
}

pub fn decode_request_record(value: Value) -> Result<RequestRecord, DriverError> {
    decode_item(REQUESTS_KEY, value)
}

fn decode_item<T: DeserializeOwned>(field: &str, value: Value) -> Result<T, DriverError> {
    serde_yaml::from_value(value).map_err(|e| DriverError::decode(field, e))
}

fn encode_sequence<T: Serialize>(field: &str, items: &[T]) -> Result<String, DriverError> {
    serde_yaml::to_string(items).map_err(|e| DriverError::encode(field, e))
}

/// Parse one YAML blob into records. A blob that parses to null counts as
/// an empty list; item errors are reported as `field[index]`.
fn decode_sequence<T>(
    field: &str,
    blob: Option<&String>,
    decode: fn(Value) -> Result<T, DriverError>,
) -> Result<Vec<T>, DriverError> {
    let Some(blob) = blob else {
        return Ok(Vec::new());
    };

    let parsed: Value = serde_yaml::from_str(blob).map_err(|e| DriverError::decode(field, e))?;
    let items = match parsed {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        other => {
            return Err(DriverError::decode(
                field,
                format!("expected a list, found {}", value_type(&other)),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            decode(item).map_err(|e| match e {
                DriverError::Decode { message, .. } => {
                    DriverError::decode(format!("{}[{}]", field, index), message)
                }
                other => other,
            })
        })
        .collect()
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
