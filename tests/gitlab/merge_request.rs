use labhook::gitlab::events::ParsedEvent;
use labhook::message::{translate, Translation};
use labhook::platform::{Platform, WireMessage};
use serde_json::{json, Value};

#[path = "../common/common.rs"]
mod common;

fn markdown(payload: Value) -> String {
    let event = ParsedEvent::from_value(payload).unwrap();
    match translate(&event, Platform::WxWork).unwrap() {
        Translation::Message(WireMessage::Markdown(msg)) => msg.markdown.content,
        other => panic!("expected markdown card, got {other:?}"),
    }
}

#[test]
fn test_opened_requires_maintainer_review() {
    let content = markdown(common::merge_request_payload("opened"));

    assert!(content.starts_with(
        "`Alice` **opened** [!12 Add login](https://x/-/merge_requests/12), \
         `feature/login` → `main`, requires maintainer review."
    ));
    assert!(content.contains("**Merge request details:**"));
    assert!(content.contains(">updated: 03-07 09:05"));
    assert!(content.contains(">description: Adds the login form"));
    assert!(content.contains(">last commit:\n> alice: [wire up form](https://x/c5)"));
}

#[test]
fn test_closed_requires_submitter_review() {
    let content = markdown(common::merge_request_payload("closed"));
    assert!(content.contains("**closed**"));
    assert!(content.contains("requires submitter review."));
}

#[test]
fn test_merged_has_no_call_to_action() {
    let content = markdown(common::merge_request_payload("merged"));
    assert!(content.contains("`feature/login` → `main`."));
    assert!(!content.contains("requires"));
}

#[test]
fn test_unknown_state_passes_through() {
    let content = markdown(common::merge_request_payload("reopened"));
    assert!(content.starts_with("`Alice` **reopened** "));
}

#[test]
fn test_optional_details_omitted() {
    let mut payload = common::merge_request_payload("merged");
    let attrs = payload["object_attributes"].as_object_mut().unwrap();
    attrs.remove("updated_at");
    attrs.insert("description".into(), json!(""));
    attrs.insert("last_commit".into(), Value::Null);

    let content = markdown(payload);
    assert!(!content.contains(">updated:"));
    assert!(!content.contains(">description:"));
    assert!(!content.contains(">last commit:"));
}

#[test]
fn test_post_title_and_plain_spans() {
    let event = ParsedEvent::from_value(common::merge_request_payload("opened")).unwrap();
    let Translation::Message(msg) = translate(&event, Platform::Feishu).unwrap() else {
        panic!("merge request must produce a message");
    };
    let doc = serde_json::to_value(msg).unwrap();
    let body = &doc["content"]["post"]["zh_cn"];

    assert_eq!(body["title"], "g/demo: merge request");
    assert_eq!(body["content"][0][0], json!({ "tag": "text", "text": "Alice" }));
    assert_eq!(body["content"][0][2], json!({ "tag": "text", "text": "opened" }));
}

#[test]
fn test_missing_attributes_is_error() {
    let mut payload = common::merge_request_payload("opened");
    payload.as_object_mut().unwrap().remove("object_attributes");
    let event = ParsedEvent::from_value(payload).unwrap();

    let err = translate(&event, Platform::WxWork).unwrap_err();
    assert_eq!(err.to_string(), "missing field: object_attributes");
}
