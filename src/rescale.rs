use crate::error::AlignmentError;
use crate::types::AlignmentMeta;

/// Conversion between model-frame indices and seconds for one recording.
///
/// `seconds_per_model_frame = n_audio_samples / sampling_rate / n_model_frames`.
/// Construction rejects zero denominators so neither direction can yield
/// NaN or infinity for finite input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameScale {
    n_model_frames: u64,
    n_audio_samples: u64,
    sampling_rate: u32,
}

impl FrameScale {
    pub fn new(
        n_model_frames: u64,
        n_audio_samples: u64,
        sampling_rate: u32,
    ) -> Result<Self, AlignmentError> {
        if n_model_frames == 0 {
            return Err(AlignmentError::degenerate("n_model_frames"));
        }
        if sampling_rate == 0 {
            return Err(AlignmentError::degenerate("sampling_rate"));
        }
        if n_audio_samples == 0 {
            return Err(AlignmentError::degenerate("n_audio_samples"));
        }
        Ok(Self {
            n_model_frames,
            n_audio_samples,
            sampling_rate,
        })
    }

    pub fn from_meta(meta: &AlignmentMeta) -> Result<Self, AlignmentError> {
        Self::new(meta.n_model_frames, meta.n_audio_samples, meta.sampling_rate)
    }

    pub fn frames_to_seconds(&self, n_frames: f64) -> f64 {
        n_frames * self.n_audio_samples as f64
            / self.sampling_rate as f64
            / self.n_model_frames as f64
    }

    pub fn seconds_to_frames(&self, n_seconds: f64) -> f64 {
        n_seconds * self.n_model_frames as f64 * self.sampling_rate as f64
            / self.n_audio_samples as f64
    }

    pub fn seconds_per_model_frame(&self) -> f64 {
        self.frames_to_seconds(1.0)
    }

    pub fn duration_seconds(&self) -> f64 {
        self.n_audio_samples as f64 / self.sampling_rate as f64
    }
}
