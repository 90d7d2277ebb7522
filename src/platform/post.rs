//! Feishu rich-text posts.

use serde::Serialize;

use crate::gitlab::events::{EventKind, ParsedEvent};
use crate::message::blocks::{Block, Span};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMessage {
    pub msg_type: &'static str,
    pub content: PostContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostContent {
    pub post: LocalizedPost,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedPost {
    pub zh_cn: PostBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostBody {
    pub title: String,
    pub content: Vec<Vec<PostSpan>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tag")]
pub enum PostSpan {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "a")]
    Link { text: String, href: String },
}

impl PostMessage {
    pub fn body(&self) -> &PostBody {
        &self.content.post.zh_cn
    }
}

pub fn title(event: &ParsedEvent) -> String {
    let path = event
        .project()
        .map(|p| p.path_with_namespace.as_str())
        .unwrap_or_default();
    match event.kind() {
        Some(EventKind::Push) => format!("{}: code push", path),
        Some(EventKind::TagPush) => format!("{}: tag push", path),
        Some(EventKind::MergeRequest) => format!("{}: merge request", path),
        Some(EventKind::Pipeline) => format!("{}: pipeline update", path),
        _ => "GitLab notification".to_string(),
    }
}

pub fn render(event: &ParsedEvent, blocks: &[Block]) -> PostMessage {
    let content = blocks.iter().flat_map(render_block).collect();

    PostMessage {
        msg_type: "post",
        content: PostContent {
            post: LocalizedPost {
                zh_cn: PostBody {
                    title: title(event),
                    content,
                },
            },
        },
    }
}

fn render_block(block: &Block) -> Vec<Vec<PostSpan>> {
    match block {
        Block::Headline(spans) | Block::Quote(spans) => vec![render_spans(spans)],
        Block::Heading(text) => vec![vec![text_span(text.clone())]],
        Block::Item { label, spans } => {
            let mut line = Vec::with_capacity(spans.len() + 1);
            if let Some(label) = label {
                line.push(text_span(format!("{}: ", label)));
            }
            line.extend(render_spans(spans));
            vec![line]
        }
        Block::List { label, rows } => {
            let mut lines = Vec::with_capacity(rows.len() + 1);
            if let Some(label) = label {
                lines.push(vec![text_span(format!("{}:", label))]);
            }
            lines.extend(rows.iter().map(|row| render_spans(row)));
            lines
        }
    }
}

fn render_spans(spans: &[Span]) -> Vec<PostSpan> {
    spans.iter().map(render_span).collect()
}

fn render_span(span: &Span) -> PostSpan {
    match span {
        Span::Text(text) | Span::Code(text) | Span::Strong(text) => text_span(text.clone()),
        Span::Link { text, href } => PostSpan::Link {
            text: text.clone(),
            href: href.clone(),
        },
        Span::Status(status) => match status.icon {
            Some(icon) => text_span(format!("{} {}", icon, status.label)),
            None => text_span(status.label.clone()),
        },
    }
}

fn text_span(text: String) -> PostSpan {
    PostSpan::Text { text }
}
