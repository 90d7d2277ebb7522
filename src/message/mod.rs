pub mod assemble;
pub mod blocks;
pub mod format;

use crate::error::Result;
use crate::gitlab::events::ParsedEvent;
use crate::platform::{Platform, WireMessage};
use assemble::{assemble, Assembly};

#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    /// In-flight pipeline; nothing is sent until it settles.
    Suppressed,
    /// Unsupported kind, or nothing to say.
    Empty,
    Message(WireMessage),
}

/// Turn an event into the document one platform expects.
///
/// Pure: performs no I/O and may be called for each platform
/// independently.
pub fn translate(event: &ParsedEvent, platform: Platform) -> Result<Translation> {
    let blocks = match assemble(event)? {
        Assembly::Suppressed => return Ok(Translation::Suppressed),
        Assembly::Blocks(blocks) => blocks,
    };

    if blocks.is_empty() {
        return Ok(Translation::Empty);
    }

    Ok(Translation::Message(platform.render(event, &blocks)))
}
