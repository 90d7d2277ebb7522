//! Per-kind content assembly.
//!
//! Each assembler is a pure function from a decoded event to the blocks
//! both platforms render. Only the pipeline assembler can withhold a
//! message.

use crate::error::{Error, Result};
use crate::gitlab::events::{
    required, Build, Commit, MergeRequestEvent, ParsedEvent, PipelineEvent, Project, PushEvent,
};
use crate::message::blocks::{Block, Span};
use crate::message::format::{
    collapse_whitespace, count_changes, format_duration, format_status, format_timestamp,
    is_in_flight, ref_change, strip_ref, RefChange,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Assembly {
    /// Valid event, deliberately not announced.
    Suppressed,
    Blocks(Vec<Block>),
}

pub fn assemble(event: &ParsedEvent) -> Result<Assembly> {
    let blocks = match event {
        ParsedEvent::Push(e) => assemble_push(e)?,
        ParsedEvent::TagPush(e) => assemble_tag_push(e)?,
        ParsedEvent::MergeRequest(e) => assemble_merge_request(e)?,
        ParsedEvent::Pipeline(e) => return assemble_pipeline(e),
        ParsedEvent::Malformed { reason, .. } => {
            return Err(Error::InvalidPayload(reason.clone()))
        }
        ParsedEvent::Unsupported(_) => vec![],
    };
    Ok(Assembly::Blocks(blocks))
}

pub fn assemble_push(event: &PushEvent) -> Result<Vec<Block>> {
    let git_ref = required(event.git_ref.as_ref(), "ref")?;
    let project = required(event.project.as_ref(), "project")?;
    let branch = strip_ref(git_ref);

    let op = match ref_change(&event.before, &event.after) {
        RefChange::Created => "created branch",
        RefChange::Deleted => "deleted branch",
        RefChange::Updated => "pushed to",
    };

    let mut blocks = vec![
        Block::Headline(vec![
            Span::text(format!("{} {} ", event.user_name, op)),
            Span::link(
                format!("{}/{}", project.path_with_namespace, branch),
                format!("{}/tree/{}", project.web_url, branch),
            ),
        ]),
        project_line(project),
    ];

    if event.total_commits_count > 0 {
        blocks.extend(commit_summary(event.total_commits_count, &event.commits));
    }

    Ok(blocks)
}

pub fn assemble_tag_push(event: &PushEvent) -> Result<Vec<Block>> {
    let git_ref = required(event.git_ref.as_ref(), "ref")?;
    let project = required(event.project.as_ref(), "project")?;
    let tag = strip_ref(git_ref);

    let op = match ref_change(&event.before, &event.after) {
        RefChange::Created => "created tag",
        RefChange::Deleted => "deleted tag",
        RefChange::Updated => "pushed to",
    };

    let mut blocks = vec![
        Block::Headline(vec![
            Span::code(event.user_name.as_str()),
            Span::text(format!(" {} ", op)),
            Span::link(
                format!("{}/{}", project.path_with_namespace, tag),
                format!("{}/-/tags/{}", project.web_url, tag),
            ),
        ]),
        project_line(project),
    ];

    if let Some(message) = non_empty(event.message.as_deref()) {
        blocks.push(Block::item("note", vec![Span::text(message)]));
    }

    if event.total_commits_count > 0 {
        blocks.extend(commit_summary(event.total_commits_count, &event.commits));
    }

    Ok(blocks)
}

pub fn assemble_merge_request(event: &MergeRequestEvent) -> Result<Vec<Block>> {
    let attrs = required(event.object_attributes.as_ref(), "object_attributes")?;
    let project = required(event.project.as_ref(), "project")?;

    let (verb, call_to_action) = merge_request_state(&attrs.state);
    let ending = match call_to_action {
        Some(cta) => format!(", {}.", cta),
        None => ".".to_string(),
    };

    let mut blocks = vec![
        Block::Headline(vec![
            Span::code(event.user.display_name()),
            Span::text(" "),
            Span::strong(verb),
            Span::text(" "),
            Span::link(format!("!{} {}", attrs.iid, attrs.title), attrs.url.as_str()),
            Span::text(", "),
            Span::code(attrs.source_branch.as_str()),
            Span::text(" → "),
            Span::code(attrs.target_branch.as_str()),
            Span::text(ending),
        ]),
        project_line(project),
        Block::Heading("Merge request details:".into()),
    ];

    if let Some(updated_at) = non_empty(attrs.updated_at.as_deref()) {
        blocks.push(Block::item(
            "updated",
            vec![Span::text(format_timestamp(updated_at))],
        ));
    }
    if let Some(description) = non_empty(attrs.description.as_deref()) {
        blocks.push(Block::item("description", vec![Span::text(description)]));
    }
    if let Some(commit) = &attrs.last_commit {
        blocks.push(Block::list("last commit", vec![commit_row(commit)]));
    }

    Ok(blocks)
}

pub fn assemble_pipeline(event: &PipelineEvent) -> Result<Assembly> {
    if event.builds.iter().any(|b| is_in_flight(&b.status)) {
        return Ok(Assembly::Suppressed);
    }

    let attrs = required(event.object_attributes.as_ref(), "object_attributes")?;
    let project = required(event.project.as_ref(), "project")?;
    let pipeline_url = format!("{}/pipelines/{}", project.web_url, attrs.id);

    let mut blocks = vec![
        Block::Headline(vec![
            Span::link(format!("#{} pipeline", attrs.id), pipeline_url),
            Span::text(" "),
            Span::Status(format_status(&attrs.status)),
            Span::text(format!(
                ", on branch {}, triggered by {}.",
                attrs.git_ref,
                pipeline_source(&attrs.source)
            )),
        ]),
        project_line(project),
        Block::Heading("Pipeline details:".into()),
    ];

    let actor = event.user.name.as_deref();
    if let Some(name) = non_empty(actor) {
        blocks.push(Block::item("actor", vec![Span::text(name)]));
    }
    if let Some(duration) = attrs.duration.filter(|d| *d > 0) {
        blocks.push(Block::item(
            "duration",
            vec![Span::text(format_duration(duration))],
        ));
    }
    if !attrs.stages.is_empty() {
        blocks.push(Block::item(
            format!("{} stages", attrs.stages.len()),
            vec![Span::text(attrs.stages.join(" / "))],
        ));
    }
    if let Some(mr) = &event.merge_request {
        blocks.push(Block::item(
            "merge request",
            vec![
                Span::link(mr.title.as_str(), mr.url.as_str()),
                Span::text(", "),
                Span::code(mr.source_branch.as_str()),
                Span::text(" → "),
                Span::code(mr.target_branch.as_str()),
            ],
        ));
    }
    if let Some(commit) = &event.commit {
        blocks.push(Block::list("commit", vec![commit_row(commit)]));
    }
    if !event.builds.is_empty() {
        let triggered_by = event.user.username.as_deref();
        let rows = event
            .builds
            .iter()
            .map(|b| build_row(b, triggered_by, &project.web_url))
            .collect();
        blocks.push(Block::list("jobs", rows));
    }

    Ok(Assembly::Blocks(blocks))
}

/// Verb and optional call to action for a merge request state.
pub fn merge_request_state(state: &str) -> (&str, Option<&'static str>) {
    match state {
        "opened" => ("opened", Some("requires maintainer review")),
        "closed" => ("closed", Some("requires submitter review")),
        "locked" => ("locked", None),
        "merged" => ("merged", None),
        other => (other, None),
    }
}

pub fn pipeline_source(source: &str) -> String {
    match source {
        "push" => "a push".to_string(),
        "merge_request_event" => "a merge request".to_string(),
        "web" => "the web UI".to_string(),
        other => format!("operation({})", other),
    }
}

fn project_line(project: &Project) -> Block {
    Block::Quote(vec![
        Span::text("project "),
        Span::link(
            format!("{} | {}", project.name, project.path_with_namespace),
            project.web_url.as_str(),
        ),
    ])
}

fn commit_summary(total: u64, commits: &[Commit]) -> Vec<Block> {
    let counts = count_changes(commits);
    let noun = if total == 1 { "commit" } else { "commits" };
    vec![
        Block::Heading(format!("{} {}:", total, noun)),
        Block::Item {
            label: None,
            spans: vec![Span::text(format!(
                "added: {} modified: {} removed: {}",
                counts.added, counts.modified, counts.removed
            ))],
        },
        Block::List {
            label: None,
            rows: commits.iter().map(commit_row).collect(),
        },
    ]
}

fn commit_row(commit: &Commit) -> Vec<Span> {
    vec![
        Span::text(format!("{}: ", commit.author.name)),
        Span::link(collapse_whitespace(&commit.message), commit.url.as_str()),
    ]
}

fn build_row(build: &Build, triggered_by: Option<&str>, web_url: &str) -> Vec<Span> {
    let mut row = vec![
        Span::code(build.stage.as_str()),
        Span::text(": "),
        Span::link(
            build.name.as_str(),
            format!("{}/-/jobs/{}", web_url, build.id),
        ),
        Span::text(" > "),
        Span::Status(format_status(&build.status)),
    ];

    // Attribution needs both usernames; with either missing it is left off.
    let build_user = build.user.as_ref();
    let build_username = build_user.and_then(|u| u.username.as_deref());
    if let (Some(ours), Some(theirs), Some(user)) = (triggered_by, build_username, build_user) {
        if ours != theirs {
            row.push(Span::text(", run by "));
            row.push(Span::code(user.display_name()));
        }
    }

    row
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
