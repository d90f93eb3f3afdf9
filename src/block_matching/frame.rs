//! Frame and patch pixel storage
//!
//! Samples are kept as `f64` in row-major order with channels interleaved, so
//! metric sums never wrap the way 8-bit arithmetic would.

use super::error::{TrackError, TrackResult};
use super::region::BoundingBox;
use image::{DynamicImage, GrayImage, RgbImage};

/// One video frame, 1 (luma) or 3 (RGB) channels
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    channels: usize,
    samples: Vec<f64>,
}

impl Frame {
    /// Build a frame from raw interleaved samples
    pub fn from_samples(
        width: u32,
        height: u32,
        channels: usize,
        samples: Vec<f64>,
    ) -> TrackResult<Self> {
        if channels != 1 && channels != 3 {
            return Err(TrackError::InvalidFrame {
                description: format!("unsupported channel count {channels}"),
            });
        }
        let expected = width as usize * height as usize * channels;
        check_finite(&samples)?;
        if samples.len() != expected {
            return Err(TrackError::InvalidFrame {
                description: format!(
                    "{}x{}x{} frame needs {} samples, got {}",
                    width,
                    height,
                    channels,
                    expected,
                    samples.len()
                ),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    pub fn from_luma(image: &GrayImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            channels: 1,
            samples: image.as_raw().iter().map(|&v| f64::from(v)).collect(),
        }
    }

    pub fn from_rgb(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            channels: 3,
            samples: image.as_raw().iter().map(|&v| f64::from(v)).collect(),
        }
    }

    /// Grayscale sources stay single channel, everything else becomes RGB
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        if image.color().has_color() {
            Self::from_rgb(&image.to_rgb8())
        } else {
            Self::from_luma(&image.to_luma8())
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(width, height, channels)`
    pub fn shape(&self) -> (u32, u32, usize) {
        (self.width, self.height, self.channels)
    }

    pub fn contains(&self, bbox: &BoundingBox) -> bool {
        bbox.fits_within(self.width, self.height)
    }

    /// Copy out the pixels bounded by `bbox`
    pub fn patch(&self, bbox: &BoundingBox) -> TrackResult<Patch> {
        if !self.contains(bbox) {
            return Err(TrackError::InvalidBox {
                bbox: *bbox,
                width: self.width,
                height: self.height,
            });
        }

        let rows = bbox.height() as usize;
        let cols = bbox.width() as usize;
        let row_stride = self.width as usize * self.channels;
        let mut samples = Vec::with_capacity(rows * cols * self.channels);

        for row in 0..rows {
            let start = (bbox.top_left.0 as usize + row) * row_stride
                + bbox.top_left.1 as usize * self.channels;
            samples.extend_from_slice(&self.samples[start..start + cols * self.channels]);
        }

        Ok(Patch {
            rows,
            cols,
            channels: self.channels,
            samples,
        })
    }
}

fn check_finite(samples: &[f64]) -> TrackResult<()> {
    match samples.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(TrackError::InvalidFrame {
            description: format!("sample {idx} is not finite ({})", samples[idx]),
        }),
        None => Ok(()),
    }
}

/// Pixel content bounded by a box within one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    rows: usize,
    cols: usize,
    channels: usize,
    samples: Vec<f64>,
}

impl Patch {
    pub fn from_samples(
        rows: usize,
        cols: usize,
        channels: usize,
        samples: Vec<f64>,
    ) -> TrackResult<Self> {
        check_finite(&samples)?;
        if samples.len() != rows * cols * channels {
            return Err(TrackError::InvalidFrame {
                description: format!(
                    "{}x{}x{} patch needs {} samples, got {}",
                    rows,
                    cols,
                    channels,
                    rows * cols * channels,
                    samples.len()
                ),
            });
        }
        Ok(Self {
            rows,
            cols,
            channels,
            samples,
        })
    }

    /// `(rows, cols, channels)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, self.channels)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Mean over every sample, channels pooled
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}
