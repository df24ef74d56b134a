//! Document ingestion and content derivation pipeline.

mod extract;
mod orchestrator;

pub use extract::{ContentExtractor, DEFAULT_PDF_MIN_TEXT_CHARS};
pub use orchestrator::{IngestionOrchestrator, Upload};
