//! Domain layer - core types of the export pipeline.
//!
//! This layer contains wire models, archive models, configuration,
//! and error types without any I/O.

pub mod config;
pub mod error;
pub mod models;

pub use config::AppConfig;
pub use error::{ExportError, Result};
pub use models::{
    ConversationDetail, ConversationPage, ConversationRecord, ConversationSummary, ExportOutcome,
    FailedConversation, MessageAuthor, MessageContent, MessageNode, MessagePayload, NodeGraph,
    Role, TranscriptMessage,
};
