//! Patch similarity metrics
//!
//! Every metric scores a reference patch `T` against an equally shaped
//! candidate patch `I` and declares whether lower or higher scores are better.

use super::error::{TrackError, TrackResult};
use super::frame::Patch;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Which way a metric's score improves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    /// Ordering that puts the better score first.
    ///
    /// Total over all floats; `0.0` and `-0.0` compare equal.
    pub fn rank(self, a: f64, b: f64) -> Ordering {
        let ord = if a == b {
            Ordering::Equal
        } else {
            a.total_cmp(&b)
        };
        match self {
            Direction::Minimize => ord,
            Direction::Maximize => ord.reverse(),
        }
    }

    /// Score given to disqualified candidates
    pub fn worst_score(self) -> f64 {
        match self {
            Direction::Minimize => f64::MAX,
            Direction::Maximize => f64::MIN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Sum of squared differences
    Ssd,
    /// Raw sum of products, sensitive to absolute brightness
    CrossCorrelation,
    /// Mean-centered, variance-normalized correlation
    NormalizedCrossCorrelation,
}

impl Metric {
    pub const ALL: [Metric; 3] = [
        Metric::Ssd,
        Metric::CrossCorrelation,
        Metric::NormalizedCrossCorrelation,
    ];

    pub fn direction(self) -> Direction {
        match self {
            Metric::Ssd => Direction::Minimize,
            Metric::CrossCorrelation | Metric::NormalizedCrossCorrelation => Direction::Maximize,
        }
    }

    /// Search radius used when none is configured.
    ///
    /// SSD searches wider to follow faster motion; the correlation metrics
    /// assume slower motion between frames.
    pub fn default_radius(self) -> u32 {
        match self {
            Metric::Ssd => 6,
            Metric::CrossCorrelation | Metric::NormalizedCrossCorrelation => 2,
        }
    }

    /// Short name, also used for output directory names
    pub fn short_name(self) -> &'static str {
        match self {
            Metric::Ssd => "ssd",
            Metric::CrossCorrelation => "cc",
            Metric::NormalizedCrossCorrelation => "ncc",
        }
    }

    /// Score `candidate` against `reference`.
    ///
    /// Fails with `PatchShapeMismatch` when the shapes differ, and with
    /// `DegenerateVariance` when NCC is asked to normalize a constant patch.
    /// Multi-channel NCC pools all channels into one mean and one variance, so
    /// its result is not strictly bounded to `[-1, 1]`.
    pub fn score(self, reference: &Patch, candidate: &Patch) -> TrackResult<f64> {
        if reference.shape() != candidate.shape() {
            return Err(TrackError::PatchShapeMismatch {
                reference: reference.shape(),
                candidate: candidate.shape(),
            });
        }

        let t = reference.samples();
        let i = candidate.samples();

        match self {
            Metric::Ssd => Ok(t
                .iter()
                .zip(i)
                .map(|(a, b)| (a - b) * (a - b))
                .sum()),
            Metric::CrossCorrelation => Ok(t.iter().zip(i).map(|(a, b)| a * b).sum()),
            Metric::NormalizedCrossCorrelation => {
                let t_bar = reference.mean();
                let i_bar = candidate.mean();

                let mut cross = 0.0;
                let mut t_energy = 0.0;
                let mut i_energy = 0.0;
                for (a, b) in t.iter().zip(i) {
                    let t_hat = a - t_bar;
                    let i_hat = b - i_bar;
                    cross += t_hat * i_hat;
                    t_energy += t_hat * t_hat;
                    i_energy += i_hat * i_hat;
                }

                let denominator = (t_energy * i_energy).sqrt();
                let ncc = cross / denominator;
                if denominator <= 0.0 || !ncc.is_finite() {
                    return Err(TrackError::DegenerateVariance);
                }
                Ok(ncc)
            }
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ssd" => Ok(Metric::Ssd),
            "cc" | "cross_correlation" => Ok(Metric::CrossCorrelation),
            "ncc" | "normalized_cross_correlation" => Ok(Metric::NormalizedCrossCorrelation),
            other => Err(format!(
                "unknown metric '{other}', expected 'ssd', 'cc' or 'ncc'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(samples: &[f64]) -> Patch {
        Patch::from_samples(2, samples.len() / 2, 1, samples.to_vec()).unwrap()
    }

    #[test]
    fn test_ssd_identical_is_zero() {
        let p = patch(&[1.0, 5.0, 9.0, 200.0]);
        assert_eq!(Metric::Ssd.score(&p, &p).unwrap(), 0.0);
    }

    #[test]
    fn test_ssd_does_not_wrap() {
        let t = patch(&[0.0, 0.0, 0.0, 0.0]);
        let i = patch(&[255.0, 0.0, 0.0, 0.0]);
        assert_eq!(Metric::Ssd.score(&t, &i).unwrap(), 65025.0);
    }

    #[test]
    fn test_cross_correlation() {
        let t = patch(&[1.0, 2.0, 3.0, 4.0]);
        let i = patch(&[2.0, 0.0, 1.0, 1.0]);
        assert_eq!(Metric::CrossCorrelation.score(&t, &i).unwrap(), 9.0);
    }

    #[test]
    fn test_ncc_bounds() {
        let t = patch(&[1.0, 2.0, 3.0, 4.0]);
        let same = Metric::NormalizedCrossCorrelation.score(&t, &t).unwrap();
        assert!((same - 1.0).abs() < 1e-12);

        let inverted = patch(&[4.0, 3.0, 2.0, 1.0]);
        let opposite = Metric::NormalizedCrossCorrelation
            .score(&t, &inverted)
            .unwrap();
        assert!((opposite + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ncc_constant_patch_is_degenerate() {
        let t = patch(&[1.0, 2.0, 3.0, 4.0]);
        let flat = patch(&[7.0, 7.0, 7.0, 7.0]);
        assert!(matches!(
            Metric::NormalizedCrossCorrelation.score(&t, &flat),
            Err(TrackError::DegenerateVariance)
        ));
        assert!(matches!(
            Metric::NormalizedCrossCorrelation.score(&flat, &t),
            Err(TrackError::DegenerateVariance)
        ));
        // The other metrics have no such degeneracy
        assert!(Metric::Ssd.score(&flat, &flat).is_ok());
        assert!(Metric::CrossCorrelation.score(&flat, &flat).is_ok());
    }

    #[test]
    fn test_scale_invariance_only_for_ncc() {
        let t = patch(&[10.0, 40.0, 25.0, 5.0, 30.0, 60.0]);
        let i = patch(&[12.0, 35.0, 20.0, 9.0, 33.0, 50.0]);
        let scaled = patch(&i.samples().iter().map(|v| v * 2.5).collect::<Vec<_>>());

        let ncc = Metric::NormalizedCrossCorrelation;
        let before = ncc.score(&t, &i).unwrap();
        let after = ncc.score(&t, &scaled).unwrap();
        assert!((before - after).abs() < 1e-12, "{before} vs {after}");

        for metric in [Metric::Ssd, Metric::CrossCorrelation] {
            let before = metric.score(&t, &i).unwrap();
            let after = metric.score(&t, &scaled).unwrap();
            assert_ne!(before, after, "{metric} should depend on scale");
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let t = Patch::from_samples(2, 2, 1, vec![0.0; 4]).unwrap();
        let i = Patch::from_samples(1, 4, 1, vec![0.0; 4]).unwrap();
        for metric in Metric::ALL {
            assert!(matches!(
                metric.score(&t, &i),
                Err(TrackError::PatchShapeMismatch { .. })
            ));
        }
    }

    #[test]
    fn test_direction_rank() {
        assert_eq!(Direction::Minimize.rank(1.0, 2.0), Ordering::Less);
        assert_eq!(Direction::Maximize.rank(1.0, 2.0), Ordering::Greater);
        assert_eq!(Direction::Maximize.rank(0.5, 0.5), Ordering::Equal);
        assert_eq!(Direction::Minimize.rank(-0.0, 0.0), Ordering::Equal);
        assert_eq!(
            Direction::Minimize.rank(f64::INFINITY, f64::MAX),
            Ordering::Greater
        );
        assert_eq!(
            Direction::Maximize.rank(f64::NEG_INFINITY, f64::MIN),
            Ordering::Greater
        );
    }

    #[test]
    fn test_parse_and_defaults() {
        assert_eq!("SSD".parse::<Metric>(), Ok(Metric::Ssd));
        assert_eq!("cc".parse::<Metric>(), Ok(Metric::CrossCorrelation));
        assert_eq!(
            "ncc".parse::<Metric>(),
            Ok(Metric::NormalizedCrossCorrelation)
        );
        assert!("sad".parse::<Metric>().is_err());

        assert_eq!(Metric::Ssd.default_radius(), 6);
        assert_eq!(Metric::CrossCorrelation.default_radius(), 2);
        assert_eq!(Metric::NormalizedCrossCorrelation.default_radius(), 2);
    }
}
