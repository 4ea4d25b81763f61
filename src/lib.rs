pub mod audio;
pub mod codec;
pub mod config;
pub mod device;
pub mod error;
pub mod export;
pub mod location;
pub mod rescale;
pub mod store;
pub mod types;

pub use codec::{decode, decode_slice, encode, to_json_bytes, AlignmentRecord, SegmentRecord};
pub use error::AlignmentError;
pub use location::{record_id, record_path, RECORD_SUFFIX};
pub use rescale::FrameScale;
pub use store::{AlignmentStore, FsRecordStorage, RecordStorage};
pub use types::{
    AlignmentMeta, AlignmentView, FreshAlignment, LoadedAlignment, RawAlignmentArrays, Segment,
    SegmentTiers, TierKind,
};
