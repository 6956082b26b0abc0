//! Transcript reconstruction from the conversation message graph.
//!
//! The backend stores each conversation as a parent-linked node graph with
//! `current_node` pointing at the active leaf of the visible branch. Walking
//! parent links from that leaf and reversing the path yields the transcript
//! in chronological order. The graph arrives unverified, so the walk is
//! bounded by a visited-set: malformed input degrades to a shorter or empty
//! transcript, never a hang or an error.

use std::collections::HashSet;

use serde_json::Value;

use crate::domain::{NodeGraph, Role, TranscriptMessage};

/// Reconstruct the ordered transcript of the visible branch.
///
/// Skips structural nodes without a message payload, nodes without content
/// parts, and system-authored nodes (the invisible root).
#[must_use]
pub fn traverse_transcript(graph: &NodeGraph) -> Vec<TranscriptMessage> {
    let Some(mapping) = graph.mapping.as_ref() else {
        return Vec::new();
    };
    let Some(current) = graph.current_node.as_deref() else {
        return Vec::new();
    };

    // Walk up the parent chain from the active leaf. A repeated id means a
    // malformed cycle: stop and keep what was collected so far. A parent id
    // missing from the mapping ends the walk the same way.
    let mut ordered: Vec<&str> = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut cursor = Some(current);

    while let Some(id) = cursor {
        if !visited.insert(id) {
            break;
        }
        ordered.push(id);
        cursor = mapping.get(id).and_then(|node| node.parent.as_deref());
    }

    // Reverse so the root (oldest) comes first.
    ordered.reverse();

    let mut messages = Vec::new();
    for id in ordered {
        let Some(node) = mapping.get(id) else {
            continue;
        };
        let Some(payload) = node.message.as_ref() else {
            continue;
        };
        let Some(parts) = payload.content.as_ref().and_then(|c| c.parts.as_ref()) else {
            continue;
        };
        let Some(role) = payload
            .author
            .as_ref()
            .and_then(|a| a.role.as_deref())
            .and_then(Role::parse)
        else {
            continue;
        };
        if role == Role::System {
            continue;
        }

        let mut content = String::new();
        for part in parts {
            append_part(&mut content, part);
        }

        messages.push(TranscriptMessage {
            id: payload.id.clone().unwrap_or_else(|| id.to_string()),
            role,
            content,
            create_time: payload.create_time,
        });
    }

    messages
}

/// Flatten one content part into the transcript string.
///
/// Plain strings contribute themselves, objects with a non-empty `text`
/// field contribute that text, other typed objects contribute a bracketed
/// placeholder naming their type, and anything else contributes nothing.
fn append_part(out: &mut String, part: &Value) {
    match part {
        Value::String(text) => out.push_str(text),
        Value::Object(fields) => {
            if let Some(text) = fields
                .get("text")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
            {
                out.push_str(text);
            } else if let Some(kind) = fields.get("type").and_then(Value::as_str) {
                out.push('[');
                out.push_str(kind);
                out.push(']');
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::domain::{MessageAuthor, MessageContent, MessageNode, MessagePayload};

    fn node(
        role: Option<&str>,
        parts: Option<Vec<Value>>,
        parent: Option<&str>,
    ) -> MessageNode {
        MessageNode {
            message: Some(MessagePayload {
                id: None,
                author: role.map(|r| MessageAuthor {
                    role: Some(r.to_string()),
                }),
                content: parts.map(|parts| MessageContent { parts: Some(parts) }),
                create_time: Some(1000.0),
            }),
            parent: parent.map(String::from),
            children: Vec::new(),
        }
    }

    fn graph(mapping: HashMap<String, MessageNode>, current: &str) -> NodeGraph {
        NodeGraph {
            mapping: Some(mapping),
            current_node: Some(current.to_string()),
        }
    }

    #[test]
    fn test_clean_chain_in_root_first_order() {
        let mut mapping = HashMap::new();
        mapping.insert("root".into(), node(Some("system"), Some(vec![json!("")]), None));
        mapping.insert(
            "q".into(),
            node(Some("user"), Some(vec![json!("question")]), Some("root")),
        );
        mapping.insert(
            "a".into(),
            node(Some("assistant"), Some(vec![json!("answer")]), Some("q")),
        );

        let messages = traverse_transcript(&graph(mapping, "a"));

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "question");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "answer");
    }

    #[test]
    fn test_parent_cycle_terminates() {
        let mut mapping = HashMap::new();
        mapping.insert("a".into(), node(Some("user"), Some(vec![json!("a")]), Some("b")));
        mapping.insert("b".into(), node(Some("user"), Some(vec![json!("b")]), Some("a")));

        let messages = traverse_transcript(&graph(mapping, "a"));

        // Walk collects a, b, then sees a again and stops.
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "b");
        assert_eq!(messages[1].content, "a");
    }

    #[test]
    fn test_content_part_flattening() {
        let mut mapping = HashMap::new();
        mapping.insert(
            "m".into(),
            node(
                Some("assistant"),
                Some(vec![
                    json!("hello "),
                    json!({"type": "image"}),
                    json!({"text": "world"}),
                ]),
                None,
            ),
        );

        let messages = traverse_transcript(&graph(mapping, "m"));

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "hello [image]world");
    }

    #[test]
    fn test_typed_part_with_empty_text_uses_placeholder() {
        let mut mapping = HashMap::new();
        mapping.insert(
            "m".into(),
            node(
                Some("assistant"),
                Some(vec![json!({"text": "", "type": "audio_transcription"})]),
                None,
            ),
        );

        let messages = traverse_transcript(&graph(mapping, "m"));
        assert_eq!(messages[0].content, "[audio_transcription]");
    }

    #[test]
    fn test_untyped_textless_part_contributes_nothing() {
        let mut mapping = HashMap::new();
        mapping.insert(
            "m".into(),
            node(
                Some("user"),
                Some(vec![json!({"asset_pointer": "file://x"}), json!(42)]),
                None,
            ),
        );

        let messages = traverse_transcript(&graph(mapping, "m"));
        assert_eq!(messages[0].content, "");
    }

    #[test]
    fn test_system_node_excluded() {
        let mut mapping = HashMap::new();
        mapping.insert(
            "root".into(),
            node(Some("system"), Some(vec![json!("instructions")]), None),
        );
        mapping.insert(
            "m".into(),
            node(Some("user"), Some(vec![json!("hi")]), Some("root")),
        );

        let messages = traverse_transcript(&graph(mapping, "m"));

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "hi");
    }

    #[test]
    fn test_node_without_payload_or_parts_skipped() {
        let mut mapping = HashMap::new();
        mapping.insert(
            "bare".into(),
            MessageNode {
                message: None,
                parent: None,
                children: Vec::new(),
            },
        );
        mapping.insert(
            "no-parts".into(),
            node(Some("user"), None, Some("bare")),
        );
        mapping.insert(
            "m".into(),
            node(Some("user"), Some(vec![json!("kept")]), Some("no-parts")),
        );

        let messages = traverse_transcript(&graph(mapping, "m"));

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "kept");
    }

    #[test]
    fn test_dangling_parent_keeps_collected_suffix() {
        let mut mapping = HashMap::new();
        mapping.insert(
            "m".into(),
            node(Some("user"), Some(vec![json!("latest")]), Some("gone")),
        );

        let messages = traverse_transcript(&graph(mapping, "m"));

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "latest");
    }

    #[test]
    fn test_missing_mapping_or_current_node() {
        let empty = NodeGraph {
            mapping: None,
            current_node: Some("x".into()),
        };
        assert!(traverse_transcript(&empty).is_empty());

        let no_leaf = NodeGraph {
            mapping: Some(HashMap::new()),
            current_node: None,
        };
        assert!(traverse_transcript(&no_leaf).is_empty());
    }

    #[test]
    fn test_message_id_falls_back_to_node_id() {
        let mut mapping = HashMap::new();
        mapping.insert("n1".into(), node(Some("user"), Some(vec![json!("x")]), None));

        let messages = traverse_transcript(&graph(mapping, "n1"));
        assert_eq!(messages[0].id, "n1");
    }
}
