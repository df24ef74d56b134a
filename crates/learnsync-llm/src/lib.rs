//! learnsync-llm - Generative provider implementations for learnsync.
//!
//! Providers implement [`learnsync_core::traits::TextProvider`]: plain
//! prompts, prompts with an inline payload (OCR), and prompts referencing an
//! uploaded file (PDF extraction, transcription).
//!
//! # Example
//!
//! ```ignore
//! use learnsync_llm::ProviderFactory;
//!
//! let provider = ProviderFactory::gemini_with_model("gemini-flash-latest")?;
//! let text = provider.generate("Summarize photosynthesis", None).await?;
//! ```

mod factory;
mod gemini;

pub use factory::ProviderFactory;
pub use gemini::GeminiProvider;

// Re-export core types for convenience
pub use learnsync_core::config::LlmProvider;
pub use learnsync_core::traits::{GenerationOptions, LlmConfig, ResponseFormat, TextProvider};
