//! Session-framed inbound content.

use serde::{Deserialize, Serialize};

/// One item of content received from a citizen or another agent.
///
/// Every kind is matched explicitly by the coordinator; content it does not
/// understand arrives as [`InboundContent::Unsupported`] rather than being
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundContent {
    /// Marks the start of a chat session.
    SessionStart,

    /// A free-text emergency report.
    Text { text: String },

    /// Marks the end of a chat session.
    SessionEnd,

    /// Content of a kind the coordinator does not handle.
    Unsupported { kind: String },
}

impl InboundContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_items() {
        let json = r#"[
            {"type": "session_start"},
            {"type": "text", "text": "fire in the lobby"},
            {"type": "session_end"},
            {"type": "unsupported", "kind": "image"}
        ]"#;

        let items: Vec<InboundContent> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[1], InboundContent::text("fire in the lobby"));
        assert!(matches!(items[3], InboundContent::Unsupported { ref kind } if kind == "image"));
    }
}
