pub mod client;
pub mod markdown;
pub mod post;

use serde::Serialize;

use crate::gitlab::events::ParsedEvent;
use crate::message::blocks::Block;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// WeCom group bot, markdown cards.
    WxWork,
    /// Feishu custom bot, rich posts.
    Feishu,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::WxWork, Platform::Feishu];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WxWork => "wxwork",
            Self::Feishu => "feishu",
        }
    }

    pub fn env_prefix(&self) -> &'static str {
        match self {
            Self::WxWork => "WEBHOOK_URL",
            Self::Feishu => "FEISHU_WEBHOOK_URL",
        }
    }

    pub fn render(&self, event: &ParsedEvent, blocks: &[Block]) -> WireMessage {
        match self {
            Self::WxWork => WireMessage::Markdown(markdown::render(blocks)),
            Self::Feishu => WireMessage::Post(post::render(event, blocks)),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document ready to POST to a platform webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireMessage {
    Markdown(markdown::MarkdownMessage),
    Post(post::PostMessage),
}
