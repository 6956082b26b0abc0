//! Paginated conversation index listing.

use std::time::Duration;

use crate::domain::{ConversationSummary, Result};
use crate::infrastructure::ConversationApi;

use super::progress::ProgressObserver;

/// Progress percentage reported while listing. Listing is fast relative to
/// the per-conversation fetches, so it gets a fixed low slot.
const LISTING_PERCENT: u8 = 2;

/// Fetch the complete conversation index, page by page.
///
/// Requests fixed-size pages starting at offset 0 and stops when a page
/// comes back shorter than the page size (an empty final page counts).
/// Waits `delay` between pages and reports the cumulative count after each.
///
/// # Errors
/// Returns error if any page request fails.
pub async fn list_all_conversations(
    api: &impl ConversationApi,
    credential: &str,
    page_size: usize,
    delay: Duration,
    observer: &impl ProgressObserver,
) -> Result<Vec<ConversationSummary>> {
    let mut conversations = Vec::new();
    let mut offset = 0;

    loop {
        let page = api.list_page(credential, offset, page_size).await?;
        let count = page.items.len();
        conversations.extend(page.items);

        observer.progress(
            LISTING_PERCENT,
            &format!(
                "Found {} conversation{}…",
                conversations.len(),
                if conversations.len() == 1 { "" } else { "s" }
            ),
        );

        if count < page_size {
            break;
        }
        offset += page_size;
        tokio::time::sleep(delay).await;
    }

    tracing::info!(total = conversations.len(), "conversation index listed");

    Ok(conversations)
}
