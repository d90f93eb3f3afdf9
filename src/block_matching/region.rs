//! Bounding boxes and displacements in frame coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer `(dv, dh)` shift applied to both corners of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Displacement {
    /// Vertical shift (rows)
    pub dv: i64,
    /// Horizontal shift (columns)
    pub dh: i64,
}

impl Displacement {
    pub const ZERO: Displacement = Displacement { dv: 0, dh: 0 };

    pub fn new(dv: i64, dh: i64) -> Self {
        Self { dv, dh }
    }
}

impl fmt::Display for Displacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+},{:+})", self.dv, self.dh)
    }
}

/// Axis-aligned box given by inclusive `(row, col)` corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top_left: (i64, i64),
    pub bottom_right: (i64, i64),
}

impl BoundingBox {
    pub fn new(top_left: (i64, i64), bottom_right: (i64, i64)) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Number of rows covered, corners inclusive
    pub fn height(&self) -> i64 {
        self.bottom_right.0 - self.top_left.0 + 1
    }

    /// Number of columns covered, corners inclusive
    pub fn width(&self) -> i64 {
        self.bottom_right.1 - self.top_left.1 + 1
    }

    /// Same-size box moved by `shift`
    pub fn translate(&self, shift: Displacement) -> Self {
        Self {
            top_left: (self.top_left.0 + shift.dv, self.top_left.1 + shift.dh),
            bottom_right: (self.bottom_right.0 + shift.dv, self.bottom_right.1 + shift.dh),
        }
    }

    /// Corners are ordered component-wise
    pub fn is_ordered(&self) -> bool {
        self.top_left.0 <= self.bottom_right.0 && self.top_left.1 <= self.bottom_right.1
    }

    /// Ordered and both corners inside `[0, height) x [0, width)`
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let inside = |(row, col): (i64, i64)| {
            (0..i64::from(height)).contains(&row) && (0..i64::from(width)).contains(&col)
        };
        self.is_ordered() && inside(self.top_left) && inside(self.bottom_right)
    }

    /// Parse `ROW,COL,ROW,COL` (top-left then bottom-right)
    pub fn parse(text: &str) -> Option<Self> {
        let parts: Vec<&str> = text.split(',').collect();
        if parts.len() == 4
            && let (Ok(r0), Ok(c0), Ok(r1), Ok(c1)) = (
                parts[0].trim().parse::<i64>(),
                parts[1].trim().parse::<i64>(),
                parts[2].trim().parse::<i64>(),
                parts[3].trim().parse::<i64>(),
            )
        {
            let bbox = Self::new((r0, c0), (r1, c1));
            return bbox.is_ordered().then_some(bbox);
        }
        None
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.top_left.0, self.top_left.1, self.bottom_right.0, self.bottom_right.1
        )
    }
}
