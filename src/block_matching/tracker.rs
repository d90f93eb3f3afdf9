//! One frame-to-frame tracker update

use super::error::TrackResult;
use super::frame::Frame;
use super::matcher::{SearchOutcome, WindowSearch};
use super::region::BoundingBox;

/// Box in `next` that best matches `bbox` in `current`.
///
/// Pure function of its inputs; errors from the search are passed through.
pub fn track_step(
    current: &Frame,
    next: &Frame,
    bbox: &BoundingBox,
    search: &WindowSearch,
) -> TrackResult<BoundingBox> {
    Ok(search.search(current, next, bbox)?.bbox)
}

/// Same as [`track_step`] but keeps the score grid and flags for the caller
pub fn track_step_with_outcome(
    current: &Frame,
    next: &Frame,
    bbox: &BoundingBox,
    search: &WindowSearch,
) -> TrackResult<SearchOutcome> {
    search.search(current, next, bbox)
}
