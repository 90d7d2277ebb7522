use labhook::gitlab::events::ParsedEvent;
use labhook::message::{translate, Translation};
use labhook::platform::{Platform, WireMessage};
use labhook::router::dispatch::Dispatcher;
use serde_json::{json, Value};
use std::sync::Arc;

#[path = "../common/common.rs"]
mod common;

fn parse(payload: Value) -> ParsedEvent {
    ParsedEvent::from_value(payload).unwrap()
}

fn markdown(event: &ParsedEvent) -> String {
    match translate(event, Platform::WxWork).unwrap() {
        Translation::Message(WireMessage::Markdown(msg)) => msg.markdown.content,
        other => panic!("expected markdown card, got {other:?}"),
    }
}

fn post(event: &ParsedEvent) -> Value {
    match translate(event, Platform::Feishu).unwrap() {
        Translation::Message(msg @ WireMessage::Post(_)) => serde_json::to_value(msg).unwrap(),
        other => panic!("expected post, got {other:?}"),
    }
}

#[test]
fn test_new_branch_push_markdown() {
    let event = parse(common::push_payload());
    let content = markdown(&event);

    assert!(content.starts_with("alice created branch [g/demo/main](https://x/tree/main)"));
    assert!(content.contains("> project [Demo | g/demo](https://x)"));
    assert!(content.contains("**1 commit:**"));
    assert!(content.contains("added: 1 modified: 0 removed: 0"));
    assert!(content.contains("alice: [fix bug](https://x/c1)"));
}

#[test]
fn test_new_branch_push_post() {
    let event = parse(common::push_payload());
    let doc = post(&event);
    let body = &doc["content"]["post"]["zh_cn"];

    assert_eq!(doc["msg_type"], "post");
    assert_eq!(body["title"], "g/demo: code push");
    assert_eq!(
        body["content"][0],
        json!([
            { "tag": "text", "text": "alice created branch " },
            { "tag": "a", "text": "g/demo/main", "href": "https://x/tree/main" }
        ])
    );

    let lines = body["content"].as_array().unwrap();
    assert!(lines.contains(&json!([
        { "tag": "text", "text": "alice: " },
        { "tag": "a", "text": "fix bug", "href": "https://x/c1" }
    ])));
}

#[test]
fn test_push_without_commits_has_no_summary() {
    let mut payload = common::push_payload();
    payload["before"] = json!("1111111111111111111111111111111111111111");
    payload["after"] = json!(common::ZERO);
    payload["total_commits_count"] = json!(0);
    payload["commits"] = json!([]);

    let content = markdown(&parse(payload));
    assert!(content.starts_with("alice deleted branch"));
    assert!(!content.contains("commit"));
    assert!(!content.contains("added:"));
}

#[test]
fn test_regular_push_label() {
    let mut payload = common::push_payload();
    payload["before"] = json!("1111111111111111111111111111111111111111");

    let content = markdown(&parse(payload));
    assert!(content.starts_with("alice pushed to [g/demo/main]"));
}

#[test]
fn test_multiline_commit_message_collapsed() {
    let mut payload = common::push_payload();
    payload["commits"][0]["message"] = json!("fix bug\n\nCloses #12\n");

    let content = markdown(&parse(payload));
    assert!(content.contains("alice: [fix bug Closes #12](https://x/c1)"));
}

#[test]
fn test_tag_push() {
    let payload = json!({
        "object_kind": "tag_push",
        "user_name": "alice",
        "ref": "refs/tags/v1.0.0",
        "before": common::ZERO,
        "after": "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678",
        "message": "First release",
        "total_commits_count": 0,
        "commits": [],
        "project": common::project()
    });
    let event = parse(payload);

    let content = markdown(&event);
    assert!(content.starts_with("`alice` created tag [g/demo/v1.0.0](https://x/-/tags/v1.0.0)"));
    assert!(content.contains(">note: First release"));

    let doc = post(&event);
    assert_eq!(doc["content"]["post"]["zh_cn"]["title"], "g/demo: tag push");
}

#[tokio::test]
async fn test_missing_ref_reported_per_platform() {
    let mut payload = common::push_payload();
    payload.as_object_mut().unwrap().remove("ref");
    let event = parse(payload);

    let notifier = Arc::new(common::MockNotifier::default());
    let dispatcher = Dispatcher::new(notifier.clone());
    let reports = dispatcher.dispatch(&event, &common::targets()).await;

    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert!(!report.success);
        assert_eq!(report.error.as_deref(), Some("missing field: ref"));
    }
    assert!(notifier.sent_to().is_empty());
}

#[tokio::test]
async fn test_push_delivered_to_both_platforms() {
    let event = parse(common::push_payload());

    let notifier = Arc::new(common::MockNotifier::default());
    let dispatcher = Dispatcher::new(notifier.clone());
    let reports = dispatcher.dispatch(&event, &common::targets()).await;

    assert!(reports.iter().all(|r| r.success));
    assert_eq!(reports[0].platform, Platform::WxWork);
    assert_eq!(reports[1].platform, Platform::Feishu);
    assert_eq!(reports[0].status, Some(200));
    assert_eq!(notifier.sent_to(), vec![Platform::WxWork, Platform::Feishu]);

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent[0].1, "https://wx.example/hook");
    assert_eq!(sent[0].2["msgtype"], "markdown");
}
