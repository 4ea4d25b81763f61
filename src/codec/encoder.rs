use crate::codec::{segment_time_violation, AlignmentRecord, SegmentRecord};
use crate::error::AlignmentError;
use crate::rescale::FrameScale;
use crate::types::{AlignmentView, Segment, TierKind};

/// Build the seconds-based record for an alignment held in frame units.
///
/// Fails when the metadata cannot define a frame duration, or when a segment
/// time could not be read back (non-finite, negative, or ending before it
/// starts). Nothing is returned in either case.
pub fn encode<A>(alignment: &A) -> Result<AlignmentRecord, AlignmentError>
where
    A: AlignmentView + ?Sized,
{
    let meta = alignment.meta();
    let scale = FrameScale::from_meta(meta)?;
    let tiers = alignment.tiers();

    Ok(AlignmentRecord {
        id: meta.id.clone(),
        n_model_frames: meta.n_model_frames,
        n_audio_samples: meta.n_audio_samples,
        sampling_rate: meta.sampling_rate,
        partition_score: meta.partition_score,
        recognised: meta.recognised.clone(),
        chars: encode_tier(TierKind::Chars, &tiers.chars, &scale)?,
        chars_cleaned: encode_tier(TierKind::CharsCleaned, &tiers.chars_cleaned, &scale)?,
        words: encode_tier(TierKind::Words, &tiers.words, &scale)?,
        words_cleaned: encode_tier(TierKind::WordsCleaned, &tiers.words_cleaned, &scale)?,
    })
}

fn encode_tier(
    kind: TierKind,
    segments: &[Segment],
    scale: &FrameScale,
) -> Result<Vec<SegmentRecord>, AlignmentError> {
    segments
        .iter()
        .enumerate()
        .map(|(idx, segment)| {
            let start = scale.frames_to_seconds(segment.start);
            let end = scale.frames_to_seconds(segment.end);
            if let Some((field, problem)) = segment_time_violation(start, end) {
                return Err(AlignmentError::invalid_input(format!(
                    "{}[{idx}].{field} {problem}: start={} end={} frames",
                    kind.key(),
                    segment.start,
                    segment.end
                )));
            }
            Ok(SegmentRecord {
                label: segment.label.clone(),
                start,
                end,
                score: segment.score,
            })
        })
        .collect()
}
