use std::fs;
use std::path::Path;

use textgrid::{Interval, TextGrid, Tier, TierType};

use crate::error::AlignmentError;
use crate::rescale::FrameScale;
use crate::types::{AlignmentView, Segment};

/// Write cleaned word and character tiers plus the transcript as a TextGrid.
///
/// Times are in seconds. Empty segments and segments that start before the
/// previous kept one ends are skipped, since interval tiers cannot overlap.
pub fn write_textgrid<A>(alignment: &A, out_path: &Path) -> Result<(), AlignmentError>
where
    A: AlignmentView + ?Sized,
{
    let meta = alignment.meta();
    let scale = FrameScale::from_meta(meta)?;
    let tiers = alignment.tiers();
    let xmax = scale.duration_seconds();

    let mut textgrid =
        TextGrid::new(0.0, xmax).map_err(|e| AlignmentError::runtime("build TextGrid", e))?;

    let words = interval_tier("words", &tiers.words_cleaned, &scale, xmax);
    let chars = interval_tier("chars", &tiers.chars_cleaned, &scale, xmax);
    textgrid
        .add_tier(words)
        .map_err(|e| AlignmentError::runtime("add TextGrid words tier", e))?;
    textgrid
        .add_tier(chars)
        .map_err(|e| AlignmentError::runtime("add TextGrid chars tier", e))?;

    let transcript = meta.recognised.trim();
    if !transcript.is_empty() {
        let transcript_tier = Tier {
            name: "transcript".to_string(),
            tier_type: TierType::IntervalTier,
            xmin: 0.0,
            xmax,
            intervals: vec![Interval {
                xmin: 0.0,
                xmax,
                text: transcript.to_string(),
            }],
            points: Vec::new(),
        };
        textgrid
            .add_tier(transcript_tier)
            .map_err(|e| AlignmentError::runtime("add TextGrid transcript tier", e))?;
    }

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AlignmentError::io("create TextGrid output directory", e))?;
    }
    textgrid
        .to_file(out_path, false)
        .map_err(|e| AlignmentError::runtime("write TextGrid", e))?;
    tracing::debug!(id = %meta.id, path = %out_path.display(), "wrote TextGrid");
    Ok(())
}

fn interval_tier(name: &str, segments: &[Segment], scale: &FrameScale, xmax: f64) -> Tier {
    Tier {
        name: name.to_string(),
        tier_type: TierType::IntervalTier,
        xmin: 0.0,
        xmax,
        intervals: intervals(segments, scale, xmax),
        points: Vec::new(),
    }
}

fn intervals(segments: &[Segment], scale: &FrameScale, xmax: f64) -> Vec<Interval> {
    let mut out = Vec::with_capacity(segments.len());
    let mut last_end = 0.0f64;
    for segment in segments {
        let start = scale.frames_to_seconds(segment.start).min(xmax);
        let end = scale.frames_to_seconds(segment.end).min(xmax);
        if start < last_end || end <= start {
            continue;
        }
        out.push(Interval {
            xmin: start,
            xmax: end,
            text: segment.label.clone(),
        });
        last_end = end;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlignmentMeta, LoadedAlignment, SegmentTiers};

    fn scale() -> FrameScale {
        FrameScale::new(10, 160_000, 16_000).unwrap()
    }

    #[test]
    fn intervals_are_in_seconds_and_skip_overlaps() {
        let segments = vec![
            Segment::new("a", 0.0, 2.0, 0.9),
            Segment::new("b", 1.0, 3.0, 0.9),
            Segment::new("c", 3.0, 3.0, 0.9),
            Segment::new("d", 4.0, 12.0, 0.9),
        ];
        let out = intervals(&segments, &scale(), 10.0);
        let labels: Vec<_> = out.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(labels, ["a", "d"]);
        assert_eq!(out[1].xmin, 4.0);
        assert_eq!(out[1].xmax, 10.0);
    }

    #[test]
    fn writes_textgrid_file() {
        let dir = tempfile::tempdir().unwrap();
        let alignment = LoadedAlignment {
            meta: AlignmentMeta {
                id: "audio/one.mp3".to_string(),
                n_model_frames: 10,
                n_audio_samples: 160_000,
                sampling_rate: 16_000,
                partition_score: -2.0,
                recognised: "ab".to_string(),
            },
            tiers: SegmentTiers {
                words_cleaned: vec![Segment::new("ab", 1.0, 4.0, 0.8)],
                chars_cleaned: vec![
                    Segment::new("a", 1.0, 2.0, 0.8),
                    Segment::new("b", 3.0, 4.0, 0.7),
                ],
                ..SegmentTiers::default()
            },
        };
        let out = dir.path().join("grids").join("one.TextGrid");
        write_textgrid(&alignment, &out).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("words"));
        assert!(text.contains("transcript"));
    }
}
