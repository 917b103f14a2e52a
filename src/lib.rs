//! Song Tagger Library
//!
//! Labels a music library with language and emotion using a locally hosted
//! language model, then repairs whatever the model failed to label.

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod inference;
pub mod labels;
pub mod pipeline;

// Re-export commonly used types for convenience
pub use catalog::{ColumnMapping, Dataset, DatasetError, DatasetWriter, SongRecord};
pub use classifier::{build_prompt, extract_labels, Classifier, FixedDelayPacer, Pacer};
pub use inference::{InferenceBackend, InferenceError, OllamaClient};
pub use labels::{needs_fix, Emotion, LabelResult, Language};
pub use pipeline::{BatchRunner, BatchSummary, RepairRunner, RepairSummary};
