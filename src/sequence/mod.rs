//! Frame sequence handling around the tracker core: loading frames from a
//! directory, drawing the tracked box, and writing annotated output.
pub mod driver;
pub mod io;
pub mod overlay;

pub use driver::{SequenceOptions, TrackSummary, TrackedFrame, run_sequence, track_frames};
pub use overlay::{BOX_COLOR, draw_box};
