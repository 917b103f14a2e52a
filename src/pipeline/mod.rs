//! Dataset-level passes built on the classifier.
//!
//! All passes are sequential: one song in flight, output order equal to
//! input order.

mod batch;
mod playlists;
mod repair;

pub use batch::{BatchRunner, BatchSummary};
pub use playlists::{playlist_plan, PlaylistBucket, PlaylistPlan};
pub use repair::{repair_need, RepairNeed, RepairRunner, RepairSummary};
