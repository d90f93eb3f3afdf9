pub mod args;
pub mod block_matching;
pub mod sequence;

pub use block_matching::{
    BoundingBox, Frame, Metric, TrackConfig, TrackError, TrackResult, WindowSearch, track_step,
};
