/// A labeled time span.
///
/// Interval is `[start, end)`, i.e. start inclusive/end exclusive, in model
/// frames in memory and in seconds inside a persisted record.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub label: String,
    pub start: f64,
    pub end: f64,
    /// Opaque confidence/likelihood value, any sign.
    pub score: f64,
}

impl Segment {
    pub fn new(label: impl Into<String>, start: f64, end: f64, score: f64) -> Self {
        Self {
            label: label.into(),
            start,
            end,
            score,
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Whole-recording scalar metadata shared by fresh and loaded alignments.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentMeta {
    /// Usually the recording's path relative to the corpus root, e.g. `audio/one.mp3`.
    pub id: String,
    pub n_model_frames: u64,
    pub n_audio_samples: u64,
    pub sampling_rate: u32,
    pub partition_score: f64,
    pub recognised: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierKind {
    Chars,
    CharsCleaned,
    Words,
    WordsCleaned,
}

impl TierKind {
    pub const ALL: [TierKind; 4] = [
        TierKind::Chars,
        TierKind::CharsCleaned,
        TierKind::Words,
        TierKind::WordsCleaned,
    ];

    /// Key of this tier in a persisted record.
    pub fn key(self) -> &'static str {
        match self {
            Self::Chars => "chars",
            Self::CharsCleaned => "chars_cleaned",
            Self::Words => "words",
            Self::WordsCleaned => "words_cleaned",
        }
    }
}

/// Raw and cleaned segment sequences for both character and word tiers.
///
/// Cleaned tiers drop normalization artifacts such as blank or padding units;
/// how they were cleaned is the aligner's business.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentTiers {
    pub chars: Vec<Segment>,
    pub chars_cleaned: Vec<Segment>,
    pub words: Vec<Segment>,
    pub words_cleaned: Vec<Segment>,
}

impl SegmentTiers {
    pub fn get(&self, kind: TierKind) -> &[Segment] {
        match kind {
            TierKind::Chars => &self.chars,
            TierKind::CharsCleaned => &self.chars_cleaned,
            TierKind::Words => &self.words,
            TierKind::WordsCleaned => &self.words_cleaned,
        }
    }

    pub fn get_mut(&mut self, kind: TierKind) -> &mut Vec<Segment> {
        match kind {
            TierKind::Chars => &mut self.chars,
            TierKind::CharsCleaned => &mut self.chars_cleaned,
            TierKind::Words => &mut self.words,
            TierKind::WordsCleaned => &mut self.words_cleaned,
        }
    }

    pub fn is_empty(&self) -> bool {
        TierKind::ALL.iter().all(|&kind| self.get(kind).is_empty())
    }
}

/// Numeric by-products of the acoustic aligner. Never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawAlignmentArrays {
    /// Per-frame log-probabilities, `[frame][vocab]`.
    pub log_probs: Vec<Vec<f32>>,
    /// Trellis scores, `[frame][token_state]`.
    pub trellis: Vec<Vec<f32>>,
    /// Backtracked `(token_state, frame)` path.
    pub path: Vec<(usize, usize)>,
}

/// Alignment as produced by the aligner: frame-unit segments plus raw arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct FreshAlignment {
    pub meta: AlignmentMeta,
    pub tiers: SegmentTiers,
    pub arrays: RawAlignmentArrays,
}

impl FreshAlignment {
    /// Drop the raw arrays, keeping what a record round trip would keep.
    pub fn into_loaded(self) -> LoadedAlignment {
        LoadedAlignment {
            meta: self.meta,
            tiers: self.tiers,
        }
    }
}

/// Alignment reconstructed from a record: frame-unit segments, no raw arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAlignment {
    pub meta: AlignmentMeta,
    pub tiers: SegmentTiers,
}

/// Read access shared by both alignment flavours; the input of encoding.
pub trait AlignmentView {
    fn meta(&self) -> &AlignmentMeta;
    fn tiers(&self) -> &SegmentTiers;
}

impl AlignmentView for FreshAlignment {
    fn meta(&self) -> &AlignmentMeta {
        &self.meta
    }

    fn tiers(&self) -> &SegmentTiers {
        &self.tiers
    }
}

impl AlignmentView for LoadedAlignment {
    fn meta(&self) -> &AlignmentMeta {
        &self.meta
    }

    fn tiers(&self) -> &SegmentTiers {
        &self.tiers
    }
}
