//! Platform-neutral message content.
//!
//! Assemblers emit [`Block`]s; each platform renderer decides how a span
//! or block looks on the wire.

use crate::message::format::Status;

#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    Text(String),
    /// Inline code: branch names, job stages, actors.
    Code(String),
    Strong(String),
    Link { text: String, href: String },
    Status(Status),
}

impl Span {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn code(s: impl Into<String>) -> Self {
        Self::Code(s.into())
    }

    pub fn strong(s: impl Into<String>) -> Self {
        Self::Strong(s.into())
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self::Link {
            text: text.into(),
            href: href.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// First line: who did what to which ref.
    Headline(Vec<Span>),
    /// Project reference line.
    Quote(Vec<Span>),
    /// Section title such as "Pipeline details".
    Heading(String),
    Item {
        label: Option<String>,
        spans: Vec<Span>,
    },
    /// A labelled detail spanning several rows (commits, builds).
    List {
        label: Option<String>,
        rows: Vec<Vec<Span>>,
    },
}

impl Block {
    pub fn item(label: impl Into<String>, spans: Vec<Span>) -> Self {
        Self::Item {
            label: Some(label.into()),
            spans,
        }
    }

    pub fn list(label: impl Into<String>, rows: Vec<Vec<Span>>) -> Self {
        Self::List {
            label: Some(label.into()),
            rows,
        }
    }
}
