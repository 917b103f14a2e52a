//! Song classification: prompt, inference call, label extraction.

mod extractor;
mod pacer;
mod prompt;

pub use extractor::extract_labels;
pub use pacer::{FixedDelayPacer, Pacer};
pub use prompt::build_prompt;

use crate::catalog::SongRecord;
use crate::inference::InferenceBackend;
use crate::labels::LabelResult;
use std::sync::Arc;
use tracing::{debug, warn};

/// Classifies one song at a time against an inference backend.
///
/// Never fails: a transport or service error degrades to
/// `Unknown`/`Unknown` so that a batch keeps going.
pub struct Classifier {
    backend: Arc<dyn InferenceBackend>,
    pacer: Arc<dyn Pacer>,
}

impl Classifier {
    pub fn new(backend: Arc<dyn InferenceBackend>, pacer: Arc<dyn Pacer>) -> Self {
        Self { backend, pacer }
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Makes exactly one inference call followed by one pacing delay.
    pub fn classify(&self, song: &SongRecord) -> LabelResult {
        let prompt = build_prompt(&song.title, &song.artist, &song.album);
        let outcome = self.backend.infer(&prompt);
        self.pacer.after_call();

        match outcome {
            Ok(raw) => {
                debug!(title = %song.title, response = %raw, "Model response");
                extract_labels(&raw)
            }
            Err(e) => {
                warn!(title = %song.title, "Inference failed: {}", e);
                LabelResult::unknown()
            }
        }
    }
}
