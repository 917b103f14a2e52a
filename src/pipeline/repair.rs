//! Fix-all pass over a previously classified dataset.
//!
//! Each record is checked independently. A record whose language or
//! emotion is absent or a placeholder is re-classified once, and only the
//! field(s) that needed fixing are overwritten. Valid labels are never
//! replaced.

use crate::catalog::{
    Dataset, DatasetWriter, LabelColumns, SongRecord, EMOTION_COLUMN, LANGUAGE_COLUMN,
};
use crate::classifier::Classifier;
use crate::labels::{needs_fix, LabelResult};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairSummary {
    pub total: usize,
    /// Records that went through re-classification.
    pub repaired: usize,
    /// Repaired records where a fixed field is still `Unknown`.
    pub still_unknown: usize,
    /// Records written back unchanged.
    pub passed_through: usize,
}

/// Which label fields of one record need re-inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairNeed {
    pub language: bool,
    pub emotion: bool,
}

impl RepairNeed {
    pub fn any(&self) -> bool {
        self.language || self.emotion
    }
}

pub struct RepairRunner<'a> {
    classifier: &'a Classifier,
}

impl<'a> RepairRunner<'a> {
    pub fn new(classifier: &'a Classifier) -> Self {
        Self { classifier }
    }

    /// Writes a repaired copy of `input` to `output`, same order and count.
    pub fn fix_all(&self, input: &Dataset, output: &Path) -> Result<RepairSummary> {
        let language_idx = input.column_index(LANGUAGE_COLUMN);
        let emotion_idx = input.column_index(EMOTION_COLUMN);
        let (headers, columns) = LabelColumns::extend(input.headers());
        let total = input.len();

        let mut writer = DatasetWriter::create(output, &headers)
            .with_context(|| format!("Failed to create output {:?}", output))?;
        let mut summary = RepairSummary {
            total,
            ..Default::default()
        };

        info!("Checking {} songs for missing labels", total);

        for (i, song) in input.records().iter().enumerate() {
            let need = repair_need(song, language_idx, emotion_idx);
            let mut row = song.to_row(columns.width);

            if need.any() {
                info!("[{}/{}] Repairing: {}", i + 1, total, song.title);

                let fresh = if song.is_classifiable() {
                    self.classifier.classify(song)
                } else {
                    warn!("[{}/{}] Row has no title, storing sentinel labels", i + 1, total);
                    LabelResult::unknown()
                };

                let mut still_unknown = false;
                if need.language {
                    row[columns.language] = fresh.language.to_string();
                    still_unknown |= needs_fix(Some(row[columns.language].as_str()));
                }
                if need.emotion {
                    row[columns.emotion] = fresh.emotion.to_string();
                    still_unknown |= needs_fix(Some(row[columns.emotion].as_str()));
                }

                summary.repaired += 1;
                if still_unknown {
                    summary.still_unknown += 1;
                }

                info!(
                    "[{}/{}] Repaired: {} -> {}/{}",
                    i + 1,
                    total,
                    song.title,
                    row[columns.language],
                    row[columns.emotion]
                );
            } else {
                summary.passed_through += 1;
                info!(
                    "[{}/{}] Unchanged: {} ({}/{})",
                    i + 1,
                    total,
                    song.title,
                    row[columns.language],
                    row[columns.emotion]
                );
            }

            writer
                .append(&row)
                .with_context(|| format!("Failed to write record {} to {:?}", i + 1, output))?;
        }

        info!(
            "Repair complete: {} repaired, {} unchanged, written to {:?}",
            summary.repaired, summary.passed_through, output
        );

        Ok(summary)
    }
}

/// Evaluates both fix predicates for `song`; a missing column counts as absent.
pub fn repair_need(
    song: &SongRecord,
    language_idx: Option<usize>,
    emotion_idx: Option<usize>,
) -> RepairNeed {
    RepairNeed {
        language: needs_fix(language_idx.and_then(|i| song.cell(i))),
        emotion: needs_fix(emotion_idx.and_then(|i| song.cell(i))),
    }
}
