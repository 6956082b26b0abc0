//! Single-conversation detail fetching.

use crate::domain::{ConversationRecord, Result};
use crate::infrastructure::ConversationApi;

use super::graph::traverse_transcript;

/// Fetch one conversation's full detail and reconstruct its record.
///
/// Missing fields get the backend's conventional defaults: the requested id,
/// `"Untitled"`, and null timestamps/model.
///
/// # Errors
/// Returns error if the detail request fails.
pub async fn fetch_conversation_record(
    api: &impl ConversationApi,
    credential: &str,
    id: &str,
) -> Result<ConversationRecord> {
    let detail = api.fetch_detail(credential, id).await?;

    let messages = traverse_transcript(&detail.graph);

    Ok(ConversationRecord {
        id: detail.conversation_id.unwrap_or_else(|| id.to_string()),
        title: detail.title.unwrap_or_else(|| "Untitled".to_string()),
        create_time: detail.create_time,
        update_time: detail.update_time,
        model: detail.default_model_slug,
        messages,
    })
}
