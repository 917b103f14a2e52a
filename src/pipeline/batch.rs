//! Classify-all pass.
//!
//! ```text
//! input row → Classifier → merged row → appended + synced → next row
//! ```
//!
//! Rows are written one at a time, so killing the process after row `i`
//! leaves exactly `i` complete rows behind. `--resume` picks up from there.

use crate::catalog::{Dataset, DatasetWriter, LabelColumns};
use crate::classifier::Classifier;
use crate::labels::LabelResult;
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Records in the input.
    pub total: usize,
    /// Records classified and written by this run.
    pub processed: usize,
    /// Records already present in a resumed output.
    pub skipped: usize,
    /// Written records with at least one `Unknown` label.
    pub unknown: usize,
    /// Whether the run stopped early on request.
    pub cancelled: bool,
}

pub struct BatchRunner<'a> {
    classifier: &'a Classifier,
    cancelled: Arc<AtomicBool>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(classifier: &'a Classifier) -> Self {
        Self {
            classifier,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shares a flag that stops the run before the next record once set.
    pub fn with_cancellation(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Classifies every record of `input` in order, appending each result
    /// to `output` as soon as it is known.
    ///
    /// With `resume`, records already present in `output` are skipped and
    /// new ones appended after them; otherwise `output` is rewritten.
    pub fn classify_all(&self, input: &Dataset, output: &Path, resume: bool) -> Result<BatchSummary> {
        let (headers, columns) = LabelColumns::extend(input.headers());
        let total = input.len();

        let (mut writer, skipped) = if resume {
            DatasetWriter::resume(output, &headers)
                .with_context(|| format!("Failed to resume output {:?}", output))?
        } else {
            let writer = DatasetWriter::create(output, &headers)
                .with_context(|| format!("Failed to create output {:?}", output))?;
            (writer, 0)
        };

        if skipped > total {
            bail!(
                "Output {:?} already holds {} records but the input has only {}",
                output,
                skipped,
                total
            );
        }

        let mut summary = BatchSummary {
            total,
            skipped,
            ..Default::default()
        };

        if skipped > 0 {
            info!("Resuming after {} of {} records", skipped, total);
        }
        info!("Classifying {} songs with model {}", total - skipped, self.classifier.model());

        for (i, song) in input.records().iter().enumerate().skip(skipped) {
            if self.is_cancelled() {
                warn!("Cancelled after {} of {} records", i, total);
                summary.cancelled = true;
                break;
            }

            let labels = if song.is_classifiable() {
                self.classifier.classify(song)
            } else {
                warn!("[{}/{}] Row has no title, storing sentinel labels", i + 1, total);
                LabelResult::unknown()
            };

            writer
                .append(&columns.merge(song, &labels))
                .with_context(|| format!("Failed to write record {} to {:?}", i + 1, output))?;

            summary.processed += 1;
            if !labels.is_complete() {
                summary.unknown += 1;
            }

            info!(
                "[{}/{}] Saved: {} -> {}/{}",
                i + 1,
                total,
                song.title,
                labels.language,
                labels.emotion
            );
        }

        Ok(summary)
    }
}
