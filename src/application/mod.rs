//! Application layer - the export pipeline.
//!
//! This layer contains the pure transcript reconstruction, the listing and
//! fetching steps, and the orchestrator that sequences them.

pub mod fetcher;
pub mod graph;
pub mod lister;
pub mod orchestrator;
pub mod progress;

pub use orchestrator::{CancelFlag, ExportOptions, ExportOrchestrator};
pub use progress::ProgressObserver;
