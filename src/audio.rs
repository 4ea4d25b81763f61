use std::ops::Range;
use std::path::Path;

use claxon::FlacReader;

use crate::error::AlignmentError;

/// Length and rate of a recording, the two audio facts an alignment keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioInfo {
    /// Samples per channel.
    pub n_audio_samples: u64,
    pub sampling_rate: u32,
}

impl AudioInfo {
    pub fn duration_seconds(&self) -> f64 {
        if self.sampling_rate == 0 {
            return 0.0;
        }
        self.n_audio_samples as f64 / self.sampling_rate as f64
    }
}

pub trait AudioMetadataProvider: Send + Sync {
    fn audio_info(&self, path: &Path) -> Result<AudioInfo, AlignmentError>;
}

/// Reads FLAC STREAMINFO; no audio frames are decoded.
pub struct FlacMetadataProvider;

impl AudioMetadataProvider for FlacMetadataProvider {
    fn audio_info(&self, path: &Path) -> Result<AudioInfo, AlignmentError> {
        let reader =
            FlacReader::open(path).map_err(|e| AlignmentError::runtime("open FLAC stream", e))?;
        let streaminfo = reader.streaminfo();
        let n_audio_samples = streaminfo.samples.ok_or_else(|| {
            AlignmentError::invalid_input(format!(
                "FLAC stream '{}' does not declare its total sample count",
                path.display()
            ))
        })?;
        Ok(AudioInfo {
            n_audio_samples,
            sampling_rate: streaminfo.sample_rate,
        })
    }
}

/// Sample indices covering `[start_seconds, end_seconds)` of a clip.
///
/// Offsets are truncated to whole samples and clamped to the clip length.
pub fn sample_range(
    info: &AudioInfo,
    start_seconds: f64,
    end_seconds: f64,
) -> Result<Range<usize>, AlignmentError> {
    if info.sampling_rate == 0 {
        return Err(AlignmentError::degenerate("sampling_rate"));
    }
    if !start_seconds.is_finite() || !end_seconds.is_finite() {
        return Err(AlignmentError::invalid_input("slice offsets must be finite"));
    }
    if start_seconds < 0.0 || end_seconds < start_seconds {
        return Err(AlignmentError::invalid_input(format!(
            "invalid slice [{start_seconds}, {end_seconds}) seconds"
        )));
    }

    let rate = info.sampling_rate as f64;
    let len = info.n_audio_samples;
    let start = ((start_seconds * rate) as u64).min(len);
    let end = ((end_seconds * rate) as u64).min(len);
    Ok(start as usize..end as usize)
}

/// Borrow the samples of a mono clip between two offsets in seconds.
pub fn slice_samples(
    samples: &[f32],
    sampling_rate: u32,
    start_seconds: f64,
    end_seconds: f64,
) -> Result<&[f32], AlignmentError> {
    let info = AudioInfo {
        n_audio_samples: samples.len() as u64,
        sampling_rate,
    };
    let range = sample_range(&info, start_seconds, end_seconds)?;
    Ok(&samples[range])
}
