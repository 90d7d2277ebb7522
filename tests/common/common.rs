#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use labhook::config::{Config, WebhookRoutes};
use labhook::error::{Error, Result};
use labhook::platform::client::{DeliveryResponse, Notifier};
use labhook::platform::{Platform, WireMessage};

pub const ZERO: &str = "0000000000000000000000000000000000000000";

/// Records every delivery instead of making HTTP calls.
#[derive(Default)]
pub struct MockNotifier {
    pub sent: Mutex<Vec<(Platform, String, Value)>>,
    pub failing: Vec<Platform>,
}

impl MockNotifier {
    pub fn failing(platforms: &[Platform]) -> Self {
        Self {
            sent: Mutex::new(vec![]),
            failing: platforms.to_vec(),
        }
    }

    pub fn sent_to(&self) -> Vec<Platform> {
        self.sent.lock().unwrap().iter().map(|(p, _, _)| *p).collect()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(
        &self,
        platform: Platform,
        url: &str,
        message: &WireMessage,
    ) -> Result<DeliveryResponse> {
        if self.failing.contains(&platform) {
            return Err(Error::Delivery("connection refused".into()));
        }
        self.sent.lock().unwrap().push((
            platform,
            url.to_string(),
            serde_json::to_value(message).unwrap(),
        ));
        Ok(DeliveryResponse {
            status: 200,
            body: json!({ "errcode": 0, "errmsg": "ok" }),
        })
    }
}

pub fn targets() -> Vec<(Platform, String)> {
    vec![
        (Platform::WxWork, "https://wx.example/hook".to_string()),
        (Platform::Feishu, "https://fs.example/hook".to_string()),
    ]
}

pub fn create_state(vars: &[(&str, &str)], notifier: Arc<MockNotifier>) -> labhook::AppState {
    let routes = WebhookRoutes::from_vars(
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );
    labhook::AppState {
        config: Config {
            host: "127.0.0.1".into(),
            port: 0,
            delivery_timeout: Duration::from_millis(500),
            routes,
        },
        notifier,
    }
}

pub fn project() -> Value {
    json!({
        "name": "Demo",
        "web_url": "https://x",
        "path_with_namespace": "g/demo"
    })
}

pub fn push_payload() -> Value {
    json!({
        "object_kind": "push",
        "user_name": "alice",
        "ref": "refs/heads/main",
        "before": ZERO,
        "after": "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678",
        "total_commits_count": 1,
        "commits": [{
            "author": { "name": "alice" },
            "message": "fix bug",
            "url": "https://x/c1",
            "added": ["a.txt"],
            "modified": [],
            "removed": []
        }],
        "project": project()
    })
}

pub fn build(id: u64, status: &str, username: &str, name: &str) -> Value {
    json!({
        "id": id,
        "stage": "test",
        "name": format!("job-{}", id),
        "status": status,
        "user": { "username": username, "name": name }
    })
}

pub fn pipeline_payload(builds: Vec<Value>) -> Value {
    json!({
        "object_kind": "pipeline",
        "object_attributes": {
            "id": 31,
            "ref": "main",
            "status": "success",
            "duration": 125,
            "source": "push",
            "stages": ["build", "test"]
        },
        "user": { "username": "alice", "name": "Alice" },
        "project": project(),
        "commit": {
            "author": { "name": "alice" },
            "message": "fix\n  flaky   test",
            "url": "https://x/c9"
        },
        "builds": builds
    })
}

pub fn merge_request_payload(state: &str) -> Value {
    json!({
        "object_kind": "merge_request",
        "user": { "name": "Alice", "username": "alice" },
        "project": project(),
        "object_attributes": {
            "iid": 12,
            "url": "https://x/-/merge_requests/12",
            "source_branch": "feature/login",
            "target_branch": "main",
            "state": state,
            "title": "Add login",
            "description": "Adds the login form",
            "updated_at": "2024-03-07 09:05:12 UTC",
            "last_commit": {
                "author": { "name": "alice" },
                "message": "wire up\nform",
                "url": "https://x/c5"
            }
        }
    })
}
