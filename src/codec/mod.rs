//! Seconds-based JSON records for alignments.
//!
//! In memory, segments are in model frames. At rest they are in seconds, so a
//! record stays meaningful without the model that produced it. `encode` and
//! `decode` apply the [`FrameScale`](crate::rescale::FrameScale) conversion at
//! this boundary and nowhere else.

use serde::Serialize;

use crate::error::AlignmentError;
use crate::types::TierKind;

mod decoder;
mod encoder;

pub use decoder::{decode, decode_slice};
pub use encoder::encode;

/// One segment at rest, times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRecord {
    pub label: String,
    pub start: f64,
    pub end: f64,
    pub score: f64,
}

/// Canonical persisted form of an alignment. Field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentRecord {
    pub id: String,
    pub n_model_frames: u64,
    pub n_audio_samples: u64,
    pub sampling_rate: u32,
    pub partition_score: f64,
    pub recognised: String,
    pub chars: Vec<SegmentRecord>,
    pub chars_cleaned: Vec<SegmentRecord>,
    pub words: Vec<SegmentRecord>,
    pub words_cleaned: Vec<SegmentRecord>,
}

impl AlignmentRecord {
    pub fn tier(&self, kind: TierKind) -> &[SegmentRecord] {
        match kind {
            TierKind::Chars => &self.chars,
            TierKind::CharsCleaned => &self.chars_cleaned,
            TierKind::Words => &self.words,
            TierKind::WordsCleaned => &self.words_cleaned,
        }
    }
}

/// First broken rule of a segment's `[start, end)` span, as `(field, problem)`.
///
/// Shared by both directions so encode never writes what decode refuses.
pub(crate) fn segment_time_violation(
    start: f64,
    end: f64,
) -> Option<(&'static str, &'static str)> {
    if !start.is_finite() {
        Some(("start", "is not finite"))
    } else if !end.is_finite() {
        Some(("end", "is not finite"))
    } else if start < 0.0 {
        Some(("start", "is negative"))
    } else if end < start {
        Some(("end", "is before start"))
    } else {
        None
    }
}

/// Render a record as UTF-8 JSON with 4-space indentation and a trailing newline.
///
/// Non-ASCII labels are written as-is. Non-finite floats become `null`.
pub fn to_json_bytes(record: &AlignmentRecord) -> Result<Vec<u8>, AlignmentError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    record
        .serialize(&mut serializer)
        .map_err(|e| AlignmentError::json("serialize alignment record", e))?;
    out.push(b'\n');
    Ok(out)
}
