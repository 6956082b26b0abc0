//! Infrastructure layer - external adapters (network, filesystem).
//!
//! This layer handles all I/O: the backend API client, the streaming
//! archive file, credential sources, and archive delivery.

pub mod api;
pub mod archive;
pub mod config;
pub mod credentials;
pub mod delivery;

pub use api::{BackendApi, ConversationApi};
pub use archive::ArchiveWriter;
pub use config::{load_config, load_config_from_file};
pub use credentials::{CredentialProvider, SessionTokenProvider};
pub use delivery::{DeliverySink, DirectoryDelivery};
