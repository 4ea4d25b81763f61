use serde_json::{Map, Value};

use crate::codec::segment_time_violation;
use crate::error::AlignmentError;
use crate::rescale::FrameScale;
use crate::types::{AlignmentMeta, LoadedAlignment, Segment, SegmentTiers, TierKind};

type Object = Map<String, Value>;

/// Parse record bytes and rebuild the alignment in frame units.
pub fn decode_slice(bytes: &[u8], expected_id: &str) -> Result<LoadedAlignment, AlignmentError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| AlignmentError::json("parse alignment record", e))?;
    decode(&value, expected_id)
}

/// Rebuild an alignment from a parsed record.
///
/// Every field is required; nothing is defaulted. Scalar metadata is checked
/// for zero denominators before any segment is rescaled. The result carries
/// no raw arrays.
pub fn decode(value: &Value, expected_id: &str) -> Result<LoadedAlignment, AlignmentError> {
    let obj = value
        .as_object()
        .ok_or_else(|| AlignmentError::malformed("$", "expected a JSON object"))?;

    let meta = AlignmentMeta {
        id: required_str(obj, "id")?,
        n_model_frames: required_u64(obj, "n_model_frames")?,
        n_audio_samples: required_u64(obj, "n_audio_samples")?,
        sampling_rate: required_u32(obj, "sampling_rate")?,
        partition_score: required_score(obj, "partition_score", "partition_score")?,
        recognised: required_str(obj, "recognised")?,
    };

    let scale = FrameScale::from_meta(&meta)?;

    if meta.id != expected_id {
        tracing::warn!(
            expected_id,
            record_id = %meta.id,
            "alignment record id differs from the id it was loaded under"
        );
    }

    let mut tiers = SegmentTiers::default();
    for kind in TierKind::ALL {
        *tiers.get_mut(kind) = decode_tier(obj, kind.key(), &scale)?;
    }

    Ok(LoadedAlignment { meta, tiers })
}

fn decode_tier(
    obj: &Object,
    key: &str,
    scale: &FrameScale,
) -> Result<Vec<Segment>, AlignmentError> {
    let items = obj
        .get(key)
        .ok_or_else(|| AlignmentError::malformed(key, "missing field"))?
        .as_array()
        .ok_or_else(|| AlignmentError::malformed(key, "expected an array of segments"))?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| -> Result<Segment, AlignmentError> {
            let path = format!("{key}[{idx}]");
            let seg = item
                .as_object()
                .ok_or_else(|| AlignmentError::malformed(path.as_str(), "expected an object"))?;
            let label = segment_str(seg, &path, "label")?;
            let start = segment_seconds(seg, &path, "start")?;
            let end = segment_seconds(seg, &path, "end")?;
            if let Some((field, problem)) = segment_time_violation(start, end) {
                return Err(AlignmentError::malformed(
                    format!("{path}.{field}"),
                    format!("{problem} (start={start}, end={end} seconds)"),
                ));
            }
            Ok(Segment {
                label,
                start: scale.seconds_to_frames(start),
                end: scale.seconds_to_frames(end),
                score: required_score(seg, "score", &format!("{path}.score"))?,
            })
        })
        .collect()
}

fn required<'a>(obj: &'a Object, key: &str, path: &str) -> Result<&'a Value, AlignmentError> {
    obj.get(key)
        .ok_or_else(|| AlignmentError::malformed(path, "missing field"))
}

fn required_str(obj: &Object, key: &str) -> Result<String, AlignmentError> {
    required(obj, key, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AlignmentError::malformed(key, "expected a string"))
}

fn required_u64(obj: &Object, key: &str) -> Result<u64, AlignmentError> {
    required(obj, key, key)?
        .as_u64()
        .ok_or_else(|| AlignmentError::malformed(key, "expected a non-negative integer"))
}

fn required_u32(obj: &Object, key: &str) -> Result<u32, AlignmentError> {
    let value = required_u64(obj, key)?;
    u32::try_from(value).map_err(|_| AlignmentError::malformed(key, "out of range for u32"))
}

/// Scores are opaque; `null` is how a non-finite score was written.
fn required_score(obj: &Object, key: &str, path: &str) -> Result<f64, AlignmentError> {
    match required(obj, key, path)? {
        Value::Null => Ok(f64::NAN),
        value => value
            .as_f64()
            .ok_or_else(|| AlignmentError::malformed(path, "expected a number")),
    }
}

fn segment_str(seg: &Object, path: &str, key: &str) -> Result<String, AlignmentError> {
    let field = format!("{path}.{key}");
    required(seg, key, &field)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AlignmentError::malformed(field, "expected a string"))
}

fn segment_seconds(seg: &Object, path: &str, key: &str) -> Result<f64, AlignmentError> {
    let field = format!("{path}.{key}");
    required(seg, key, &field)?
        .as_f64()
        .ok_or_else(|| AlignmentError::malformed(field, "expected a number of seconds"))
}
