use super::*;
use crate::kubeobjects::ObjectConfiguration;
use crate::records::{GroupRecord, ObjectRecord, ObjectStates, RequestRecord, RequestStates};
use serde_json::json;

fn make_test_group() -> GroupRecord {
    let mut group = GroupRecord::new("grp-1");
    group.add_object(ObjectRecord::create_requested(
        ObjectConfiguration::new(json!({
            "apiVersion": "v1",
            "kind": "ConfigMap",
            "metadata": {"name": "settings", "namespace": "apps"},
            "data": {"LOG_LEVEL": "debug", "RETRIES": "3", "ENABLED": "true"}
        }))
        .unwrap(),
    ));
    group
        .add_request(RequestRecord::new("req-1", "Deploy"))
        .unwrap();
    group
}

#[test]
fn test_group_roundtrip() {
    let group = make_test_group();
    let document = encode_group(&group).unwrap();

    assert_eq!(document["uid"], "grp-1");

    let restored = decode_group(&document).unwrap();
    assert_eq!(restored, group);
    assert_eq!(restored.uid(), "grp-1");
    assert_eq!(restored.objects().len(), 1);
    assert_eq!(restored.objects()[0].state, ObjectStates::CREATE_REQUESTED);
    assert!(restored.objects()[0].error.is_none());
    assert_eq!(restored.requests()[0].uid, "req-1");
    assert_eq!(restored.requests()[0].operation, "Deploy");
    assert_eq!(restored.requests()[0].state, RequestStates::IN_PROGRESS);
}

#[test]
fn test_string_lookalikes_survive() {
    // values YAML would otherwise read as booleans, numbers or null
    let config = ObjectConfiguration::new(json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": {"name": "tricky"},
        "data": {"a": "yes", "b": "0x1F", "c": "~", "d": "1e3", "e": "null", "f": "- item"}
    }))
    .unwrap();
    let mut group = GroupRecord::new("grp-tricky");
    group.add_object(ObjectRecord::new(config, ObjectStates::CREATED));

    let restored = decode_group(&encode_group(&group).unwrap()).unwrap();
    assert_eq!(restored, group);
}

#[test]
fn test_request_history_order_preserved() {
    let mut group = GroupRecord::new("grp-history");
    for (i, op) in ["Deploy", "Upgrade", "Remove", "Deploy"].iter().enumerate() {
        let mut request = RequestRecord::new(format!("req-{}", i), *op);
        match i {
            0 | 1 => request.complete(),
            2 => request.fail("timed out waiting for deletion"),
            _ => {}
        }
        group.add_request(request).unwrap();
    }

    let restored = decode_group(&encode_group(&group).unwrap()).unwrap();
    let uids: Vec<&str> = restored.requests().iter().map(|r| r.uid.as_str()).collect();
    assert_eq!(uids, vec!["req-0", "req-1", "req-2", "req-3"]);
    assert_eq!(restored, group);
}

#[test]
fn test_error_absence_survives_mixed_records() {
    let mut group = make_test_group();
    group
        .add_request(
            RequestRecord::new("req-2", "Remove")
                .with_state(RequestStates::FAILED)
                .with_error(""),
        )
        .unwrap();
    group
        .add_request(RequestRecord::new("req-3", "Remove").with_error("denied"))
        .unwrap();

    let restored = decode_group(&encode_group(&group).unwrap()).unwrap();
    let errors: Vec<Option<&str>> = restored
        .requests()
        .iter()
        .map(|r| r.error.as_deref())
        .collect();
    assert_eq!(errors, vec![None, Some(""), Some("denied")]);
}

#[test]
fn test_decode_is_atomic() {
    let mut document = encode_group(&make_test_group()).unwrap();
    document.insert("requests".to_string(), "- not: [a, record".to_string());

    let result = decode_group(&document);
    assert!(matches!(result, Err(crate::error::DriverError::Decode { .. })));
}
