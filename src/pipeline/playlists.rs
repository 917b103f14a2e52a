//! Grouping of a classified dataset into `{language}_{emotion}` playlists.

use crate::catalog::{Dataset, EMOTION_COLUMN, LANGUAGE_COLUMN};
use crate::labels::needs_fix;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistBucket {
    /// Number of songs in the bucket, including those without a track id.
    pub songs: usize,
    pub track_ids: Vec<String>,
}

/// Buckets keyed by playlist name, in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistPlan {
    pub buckets: BTreeMap<String, PlaylistBucket>,
    /// Records left out because a label is missing or `Unknown`.
    pub unlabelled: usize,
}

impl PlaylistPlan {
    /// `{bucket: [track ids...]}`.
    pub fn to_json(&self) -> serde_json::Value {
        let ids: BTreeMap<&str, &[String]> = self
            .buckets
            .iter()
            .map(|(name, bucket)| (name.as_str(), bucket.track_ids.as_slice()))
            .collect();
        serde_json::json!(ids)
    }
}

/// Groups labelled records by their label pair.
pub fn playlist_plan(dataset: &Dataset, track_id_column: &str) -> PlaylistPlan {
    let language_idx = dataset.column_index(LANGUAGE_COLUMN);
    let emotion_idx = dataset.column_index(EMOTION_COLUMN);
    let track_idx = dataset.column_index(track_id_column);

    let mut plan = PlaylistPlan::default();
    for song in dataset.records() {
        let language = language_idx.and_then(|i| song.cell(i));
        let emotion = emotion_idx.and_then(|i| song.cell(i));
        let (Some(language), Some(emotion)) = (language, emotion) else {
            plan.unlabelled += 1;
            continue;
        };
        if needs_fix(Some(language)) || needs_fix(Some(emotion)) {
            plan.unlabelled += 1;
            continue;
        }

        let name = format!("{}_{}", language.trim(), emotion.trim());
        let bucket = plan.buckets.entry(name).or_default();
        bucket.songs += 1;
        if let Some(id) = track_idx.and_then(|i| song.cell(i)) {
            let id = id.trim();
            if !id.is_empty() {
                bucket.track_ids.push(id.to_string());
            }
        }
    }

    plan
}
