//! Exhaustive local-window search
//!
//! Scores every shift in `[-radius, radius]^2` and picks the best one, with
//! exact ties going to the shift visited first in row-major order from
//! `(-radius, -radius)`.

use super::config::{DegeneratePolicy, TrackConfig};
use super::error::{TrackError, TrackResult};
use super::frame::Frame;
use super::metric::{Direction, Metric};
use super::region::{BoundingBox, Displacement};
use std::cmp::Ordering;

/// Score state of one candidate shift
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateScore {
    Scored(f64),
    /// Shifted box leaves the next frame
    OutOfBounds,
    /// Score undefined: NCC on a constant patch under
    /// `DegeneratePolicy::Disqualify`, or a NaN from overflowing sums
    Degenerate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub shift: Displacement,
    pub score: CandidateScore,
}

impl Candidate {
    /// Reported score; disqualified candidates show the worst value for the
    /// direction. Ranking goes by [`Candidate::tier`] first, never by this alone.
    pub fn value(&self, direction: Direction) -> f64 {
        match self.score {
            CandidateScore::Scored(score) => score,
            CandidateScore::OutOfBounds | CandidateScore::Degenerate => direction.worst_score(),
        }
    }

    pub fn is_disqualified(&self) -> bool {
        !matches!(self.score, CandidateScore::Scored(_))
    }

    /// Scored candidates rank above degenerate ones, which stay inside the
    /// frame and so rank above out-of-bounds ones
    fn tier(&self) -> u8 {
        match self.score {
            CandidateScore::Scored(_) => 0,
            CandidateScore::Degenerate => 1,
            CandidateScore::OutOfBounds => 2,
        }
    }
}

/// One score per candidate shift, stored row-major from `(-radius, -radius)`
#[derive(Debug, Clone)]
pub struct ScoreGrid {
    radius: u32,
    direction: Direction,
    cells: Vec<Candidate>,
}

impl ScoreGrid {
    fn side(&self) -> usize {
        2 * self.radius as usize + 1
    }

    /// Radius actually searched, at most the larger frame dimension
    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Candidates in visiting order
    pub fn candidates(&self) -> &[Candidate] {
        &self.cells
    }

    pub fn get(&self, shift: Displacement) -> Option<&Candidate> {
        let r = i64::from(self.radius);
        if shift.dv.abs() > r || shift.dh.abs() > r {
            return None;
        }
        let row = (shift.dv + r) as usize;
        let col = (shift.dh + r) as usize;
        self.cells.get(row * self.side() + col)
    }

    fn compare(&self, a: &Candidate, b: &Candidate) -> Ordering {
        a.tier().cmp(&b.tier()).then_with(|| match (a.score, b.score) {
            (CandidateScore::Scored(a), CandidateScore::Scored(b)) => self.direction.rank(a, b),
            _ => Ordering::Equal,
        })
    }

    /// All candidates, best first; the sort is stable so ties keep visiting order
    pub fn ranked(&self) -> Vec<&Candidate> {
        let mut ranked: Vec<&Candidate> = self.cells.iter().collect();
        ranked.sort_by(|a, b| self.compare(a, b));
        ranked
    }

    /// The winning candidate (first of `ranked`)
    pub fn best(&self) -> &Candidate {
        // A grid always holds at least the zero shift
        self.ranked()[0]
    }

    /// True when no candidate received a real score
    pub fn all_disqualified(&self) -> bool {
        self.cells.iter().all(Candidate::is_disqualified)
    }
}

/// Result of one window search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Input box moved by `displacement`
    pub bbox: BoundingBox,
    pub displacement: Displacement,
    /// Ranking value of the winner
    pub score: f64,
    /// No candidate could be scored; the displacement is only the tie-break pick
    pub all_disqualified: bool,
    pub grid: ScoreGrid,
}

/// Window search parameterized by metric and radius
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSearch {
    metric: Metric,
    radius: u32,
    degenerate_policy: DegeneratePolicy,
}

impl WindowSearch {
    pub fn new(metric: Metric, radius: u32) -> Self {
        Self {
            metric,
            radius,
            degenerate_policy: DegeneratePolicy::default(),
        }
    }

    pub fn from_config(config: &TrackConfig) -> Self {
        Self {
            metric: config.metric,
            radius: config.search_radius,
            degenerate_policy: config.degenerate_policy,
        }
    }

    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn degenerate_policy(&self) -> DegeneratePolicy {
        self.degenerate_policy
    }

    /// Find where `bbox` from `current` moved to in `next`.
    ///
    /// # Errors
    /// * `FrameShapeMismatch` if the frames differ in shape
    /// * `InvalidBox` if `bbox` does not lie inside `current`
    /// * `DegenerateVariance` under NCC with `DegeneratePolicy::Fail`
    pub fn search(
        &self,
        current: &Frame,
        next: &Frame,
        bbox: &BoundingBox,
    ) -> TrackResult<SearchOutcome> {
        if current.shape() != next.shape() {
            let (current_width, current_height, current_channels) = current.shape();
            let (next_width, next_height, next_channels) = next.shape();
            return Err(TrackError::FrameShapeMismatch {
                current_width,
                current_height,
                current_channels,
                next_width,
                next_height,
                next_channels,
            });
        }

        let reference = current.patch(bbox)?;
        let direction = self.metric.direction();

        // Any shift at least as long as the frame leaves it, so the grid stops there
        let radius = self.radius.min(next.width().max(next.height()));
        if radius < self.radius {
            log::debug!(
                "Search radius {} clamped to {} for a {}x{} frame",
                self.radius,
                radius,
                next.width(),
                next.height()
            );
        }
        let r = i64::from(radius);
        let side = 2 * radius as usize + 1;
        let mut cells = Vec::with_capacity(side.saturating_mul(side));

        for dv in -r..=r {
            for dh in -r..=r {
                let shift = Displacement::new(dv, dh);
                let moved = bbox.translate(shift);

                let score = if !next.contains(&moved) {
                    CandidateScore::OutOfBounds
                } else {
                    let candidate = next.patch(&moved)?;
                    match self.metric.score(&reference, &candidate) {
                        Ok(score) if score.is_nan() => CandidateScore::Degenerate,
                        Ok(score) => CandidateScore::Scored(score),
                        Err(TrackError::DegenerateVariance)
                            if self.degenerate_policy == DegeneratePolicy::Disqualify =>
                        {
                            CandidateScore::Degenerate
                        }
                        Err(e) => return Err(e),
                    }
                };
                log::trace!("  {} shift {}: {:?}", self.metric, shift, score);
                cells.push(Candidate { shift, score });
            }
        }

        let grid = ScoreGrid {
            radius,
            direction,
            cells,
        };

        let best = *grid.best();
        let all_disqualified = grid.all_disqualified();
        if all_disqualified {
            log::warn!(
                "No scorable candidate for {} within radius {} of {}; falling back to {}",
                self.metric,
                radius,
                bbox,
                best.shift
            );
        }

        let next_box = bbox.translate(best.shift);
        log::debug!(
            "{} search: {} -> {} shift {} score {}",
            self.metric,
            bbox,
            next_box,
            best.shift,
            best.value(direction)
        );

        Ok(SearchOutcome {
            bbox: next_box,
            displacement: best.shift,
            score: best.value(direction),
            all_disqualified,
            grid,
        })
    }
}
