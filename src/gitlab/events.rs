use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// GitLab sends `null` for unset scalars as often as it omits them.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub web_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub path_with_namespace: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub name: Option<String>,
    pub username: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.username.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default, deserialize_with = "nullable")]
    pub author: Author,
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub added: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub modified: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub removed: Vec<String>,
}

/// Payload of both `push` and `tag_push` hooks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushEvent {
    #[serde(default, deserialize_with = "nullable")]
    pub user_name: String,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub project: Option<Project>,
    /// Annotation of a tag; unset for branch pushes.
    pub message: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub commits: Vec<Commit>,
    #[serde(default, deserialize_with = "nullable")]
    pub total_commits_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub before: String,
    #[serde(default, deserialize_with = "nullable")]
    pub after: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeRequestEvent {
    #[serde(default, deserialize_with = "nullable")]
    pub user: User,
    pub project: Option<Project>,
    pub object_attributes: Option<MergeRequestAttributes>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeRequestAttributes {
    #[serde(default, deserialize_with = "nullable")]
    pub iid: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub target_branch: String,
    #[serde(default, deserialize_with = "nullable")]
    pub source_branch: String,
    #[serde(default, deserialize_with = "nullable")]
    pub state: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    pub description: Option<String>,
    pub last_commit: Option<Commit>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineEvent {
    pub object_attributes: Option<PipelineAttributes>,
    pub merge_request: Option<MergeRequestRef>,
    #[serde(default, deserialize_with = "nullable")]
    pub user: User,
    pub project: Option<Project>,
    pub commit: Option<Commit>,
    #[serde(default, deserialize_with = "nullable")]
    pub builds: Vec<Build>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineAttributes {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(rename = "ref", default, deserialize_with = "nullable")]
    pub git_ref: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    /// Seconds; GitLab sends `null` until the pipeline has run.
    pub duration: Option<u64>,
    #[serde(default, deserialize_with = "nullable")]
    pub source: String,
    #[serde(default, deserialize_with = "nullable")]
    pub stages: Vec<String>,
}

/// The merge request a pipeline was started for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeRequestRef {
    #[serde(default, deserialize_with = "nullable")]
    pub iid: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub source_branch: String,
    #[serde(default, deserialize_with = "nullable")]
    pub target_branch: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Build {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub stage: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    pub user: Option<User>,
}

/// `object_kind` values GitLab sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Push,
    TagPush,
    Issue,
    Note,
    MergeRequest,
    WikiPage,
    Pipeline,
    Build,
}

impl EventKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "push" => Some(Self::Push),
            "tag_push" => Some(Self::TagPush),
            "issue" => Some(Self::Issue),
            "note" => Some(Self::Note),
            "merge_request" => Some(Self::MergeRequest),
            "wiki_page" => Some(Self::WikiPage),
            "pipeline" => Some(Self::Pipeline),
            "build" => Some(Self::Build),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::TagPush => "tag_push",
            Self::Issue => "issue",
            Self::Note => "note",
            Self::MergeRequest => "merge_request",
            Self::WikiPage => "wiki_page",
            Self::Pipeline => "pipeline",
            Self::Build => "build",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ParsedEvent {
    Push(PushEvent),
    TagPush(PushEvent),
    MergeRequest(MergeRequestEvent),
    Pipeline(PipelineEvent),
    /// Known-but-unhandled kinds (issue, note, wiki_page, build), unknown
    /// kinds and payloads without `object_kind`.
    Unsupported(Option<String>),
    /// A handled kind whose body did not decode; reported per platform.
    Malformed { kind: EventKind, reason: String },
}

impl ParsedEvent {
    pub fn from_payload(payload: &[u8]) -> std::result::Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(payload)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> std::result::Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom("payload is not a JSON object"));
        }

        let kind = value
            .get("object_kind")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let Some(event_kind) = kind.as_deref().and_then(EventKind::parse) else {
            return Ok(Self::Unsupported(kind));
        };

        let decoded = match event_kind {
            EventKind::Push => serde_json::from_value(value).map(Self::Push),
            EventKind::TagPush => serde_json::from_value(value).map(Self::TagPush),
            EventKind::MergeRequest => serde_json::from_value(value).map(Self::MergeRequest),
            EventKind::Pipeline => serde_json::from_value(value).map(Self::Pipeline),
            _ => return Ok(Self::Unsupported(kind)),
        };

        Ok(decoded.unwrap_or_else(|e| Self::Malformed {
            kind: event_kind,
            reason: e.to_string(),
        }))
    }

    pub fn kind(&self) -> Option<EventKind> {
        match self {
            Self::Push(_) => Some(EventKind::Push),
            Self::TagPush(_) => Some(EventKind::TagPush),
            Self::MergeRequest(_) => Some(EventKind::MergeRequest),
            Self::Pipeline(_) => Some(EventKind::Pipeline),
            Self::Malformed { kind, .. } => Some(*kind),
            Self::Unsupported(_) => None,
        }
    }

    /// Raw `object_kind`, for logging.
    pub fn object_kind(&self) -> &str {
        match self {
            Self::Unsupported(kind) => kind.as_deref().unwrap_or("<none>"),
            other => other.kind().map(|k| k.as_str()).unwrap_or("<none>"),
        }
    }

    pub fn project(&self) -> Option<&Project> {
        match self {
            Self::Push(e) | Self::TagPush(e) => e.project.as_ref(),
            Self::MergeRequest(e) => e.project.as_ref(),
            Self::Pipeline(e) => e.project.as_ref(),
            Self::Malformed { .. } | Self::Unsupported(_) => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

/// Dereference a field the sender is contractually bound to provide.
pub fn required<'a, T>(value: Option<&'a T>, field: &'static str) -> Result<&'a T> {
    value.ok_or(Error::MissingField(field))
}
