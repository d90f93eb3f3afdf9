//! Block-matching tracker core
//!
//! This module provides:
//! - Three similarity metrics (SSD, cross-correlation, NCC) behind one enum
//! - Exhaustive window search with deterministic row-major tie-breaking
//! - Bounds checking for boxes and candidate shifts
//! - A pure per-frame tracker step
pub mod config;
pub mod error;
pub mod frame;
pub mod matcher;
pub mod metric;
pub mod region;
pub mod tracker;


pub use config::{
    DegeneratePolicy, TrackConfig, create_cross_correlation_config, create_ncc_config,
    create_ssd_config,
};
pub use error::{TrackError, TrackResult};
pub use frame::{Frame, Patch};
pub use matcher::{Candidate, CandidateScore, ScoreGrid, SearchOutcome, WindowSearch};
pub use metric::{Direction, Metric};
pub use region::{BoundingBox, Displacement};
pub use tracker::{track_step, track_step_with_outcome};
