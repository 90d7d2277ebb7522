//! WeCom markdown cards.

use serde::Serialize;

use crate::message::blocks::{Block, Span};

const BLOCK_SEPARATOR: &str = " \n  ";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkdownMessage {
    pub msgtype: &'static str,
    pub markdown: MarkdownBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkdownBody {
    pub content: String,
}

impl MarkdownMessage {
    pub fn content(&self) -> &str {
        &self.markdown.content
    }
}

pub fn render(blocks: &[Block]) -> MarkdownMessage {
    let content = blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR);

    MarkdownMessage {
        msgtype: "markdown",
        markdown: MarkdownBody { content },
    }
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Headline(spans) => render_spans(spans),
        Block::Quote(spans) => format!("> {}\n", render_spans(spans)),
        Block::Heading(text) => format!("**{}**\n", text),
        Block::Item { label, spans } => {
            format!("{} {}", quote_label(label.as_deref()), render_spans(spans))
        }
        Block::List { label, rows } => {
            let rows = rows
                .iter()
                .map(|row| format!("> {}", render_spans(row)))
                .collect::<Vec<_>>()
                .join("\n");
            match label {
                Some(label) => format!("{}\n{}", quote_label(Some(label.as_str())), rows),
                None => rows,
            }
        }
    }
}

fn quote_label(label: Option<&str>) -> String {
    match label {
        Some(label) => format!(">{}:", label),
        None => ">".to_string(),
    }
}

fn render_spans(spans: &[Span]) -> String {
    spans.iter().map(render_span).collect()
}

fn render_span(span: &Span) -> String {
    match span {
        Span::Text(text) => text.clone(),
        Span::Code(text) => format!("`{}`", text),
        Span::Strong(text) => format!("**{}**", text),
        Span::Link { text, href } => format!("[{}]({})", text, href),
        Span::Status(status) => format!(
            "<font color=\"{}\">{}</font>",
            status.color.as_str(),
            status.label
        ),
    }
}
