//! Domain models for the ChatGPT export pipeline.
//!
//! Covers both directions of the wire: the shapes returned by the backend
//! API (conversation index pages, full conversation detail with its message
//! graph) and the shapes written into the archive file.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Minimal conversation identity from the paginated index.
///
/// Only used to drive the per-conversation detail fetches and to name
/// conversations in error reports.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationSummary {
    /// Conversation identifier.
    pub id: String,
    /// Title, if the backend provided one.
    #[serde(default)]
    pub title: Option<String>,
}

impl ConversationSummary {
    /// Title with the backend's fallback for untitled conversations.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }
}

/// One page of the conversation index.
#[derive(Debug, Deserialize)]
pub struct ConversationPage {
    /// Conversation summaries on this page.
    #[serde(default)]
    pub items: Vec<ConversationSummary>,
}

/// Author role of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from the human user.
    User,
    /// Message from the model.
    Assistant,
    /// Output of a tool invocation surfaced in the transcript.
    Tool,
    /// Invisible root / instruction node, excluded from transcripts.
    System,
}

impl Role {
    /// Parse a role string from the backend. Unknown roles yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "tool" => Some(Self::Tool),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// Author block inside a raw message payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageAuthor {
    /// Role string as sent by the backend.
    #[serde(default)]
    pub role: Option<String>,
}

/// Content block inside a raw message payload.
///
/// Parts are heterogeneous: plain strings, `{text}` objects, or other typed
/// objects (images, attachments), so they are kept as raw JSON values and
/// flattened during graph traversal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageContent {
    #[serde(default)]
    pub parts: Option<Vec<serde_json::Value>>,
}

/// Raw message payload attached to a graph node.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub author: Option<MessageAuthor>,
    #[serde(default)]
    pub content: Option<MessageContent>,
    /// Creation time in epoch seconds.
    #[serde(default)]
    pub create_time: Option<f64>,
}

/// One node of a conversation's message graph.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageNode {
    /// Message payload; the root and some structural nodes have none.
    #[serde(default)]
    pub message: Option<MessagePayload>,
    /// Parent node id; absent on the root.
    #[serde(default)]
    pub parent: Option<String>,
    /// Child node ids (alternative branches).
    #[serde(default)]
    pub children: Vec<String>,
}

/// The parent-linked message graph of one conversation.
///
/// `current_node` is the active leaf of the visible branch. The graph is
/// logically a tree but arrives unverified; traversal must not assume the
/// mapping is complete or acyclic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeGraph {
    /// Node id to node.
    #[serde(default)]
    pub mapping: Option<HashMap<String, MessageNode>>,
    /// Id of the active leaf.
    #[serde(default)]
    pub current_node: Option<String>,
}

/// Full conversation detail as returned by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationDetail {
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub create_time: Option<f64>,
    #[serde(default)]
    pub update_time: Option<f64>,
    #[serde(default)]
    pub default_model_slug: Option<String>,
    /// Message graph fields (`mapping`, `current_node`).
    #[serde(flatten)]
    pub graph: NodeGraph,
}

/// One reconstructed message, oldest-first within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Creation time in epoch seconds, null when the backend omitted it.
    pub create_time: Option<f64>,
}

/// The unit written to the archive: one conversation with its transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: String,
    pub title: String,
    pub create_time: Option<f64>,
    pub update_time: Option<f64>,
    pub model: Option<String>,
    pub messages: Vec<TranscriptMessage>,
}

/// A conversation that failed to fetch, recorded in the archive footer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedConversation {
    pub id: String,
    pub title: String,
    pub error: String,
}

/// Terminal outcome of an export run that was not aborted by an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The archive was finalized and delivered.
    Completed {
        /// Conversations skipped because their detail fetch failed.
        skipped: usize,
    },
    /// Cancellation was requested; no file was produced.
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("assistant"), Some(Role::Assistant));
        assert_eq!(Role::parse("tool"), Some(Role::Tool));
        assert_eq!(Role::parse("system"), Some(Role::System));
        assert_eq!(Role::parse("critic"), None);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Tool).unwrap(), "\"tool\"");
    }

    #[test]
    fn test_detail_deserializes_graph_fields() {
        let detail: ConversationDetail = serde_json::from_str(
            r#"{
                "conversation_id": "c1",
                "title": "Hello",
                "mapping": {
                    "n1": {"parent": null, "children": ["n2"]},
                    "n2": {"parent": "n1", "children": []}
                },
                "current_node": "n2"
            }"#,
        )
        .unwrap();

        assert_eq!(detail.conversation_id.as_deref(), Some("c1"));
        assert_eq!(detail.graph.current_node.as_deref(), Some("n2"));
        let mapping = detail.graph.mapping.unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping["n2"].parent.as_deref(), Some("n1"));
    }

    #[test]
    fn test_summary_display_title() {
        let titled = ConversationSummary {
            id: "a".into(),
            title: Some("Trip notes".into()),
        };
        let untitled = ConversationSummary {
            id: "b".into(),
            title: None,
        };
        assert_eq!(titled.display_title(), "Trip notes");
        assert_eq!(untitled.display_title(), "Untitled");
    }

    #[test]
    fn test_record_null_fields_serialize_as_null() {
        let record = ConversationRecord {
            id: "c1".into(),
            title: "Untitled".into(),
            create_time: None,
            update_time: None,
            model: None,
            messages: Vec::new(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"create_time\":null"));
        assert!(json.contains("\"model\":null"));
    }
}
