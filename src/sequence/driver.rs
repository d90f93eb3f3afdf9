//! Per-frame driver: feeds consecutive frame pairs to the tracker and
//! carries the box forward

use super::io::{list_frames, load_frame, save_frame};
use super::overlay::draw_box;
use crate::block_matching::{
    BoundingBox, Displacement, Frame, TrackConfig, TrackResult, WindowSearch,
    track_step_with_outcome,
};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Name of the JSON summary written next to the annotated frames
pub const SUMMARY_FILE: &str = "track.json";

#[derive(Debug, Clone)]
pub struct SequenceOptions {
    pub frames_dir: PathBuf,
    pub output_dir: PathBuf,
    pub initial_box: BoundingBox,
    pub config: TrackConfig,
}

/// Tracking result for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedFrame {
    pub file: String,
    pub bbox: BoundingBox,
    /// Shift from the previous frame, zero for the first frame
    pub displacement: Displacement,
    /// Winning score, absent for the first frame
    pub score: Option<f64>,
    /// No candidate could be scored; the box position is not a confident match
    pub all_disqualified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub config: TrackConfig,
    pub frames: Vec<TrackedFrame>,
}

/// Track `initial_box` through in-memory frames.
///
/// Returns one box per frame, starting with `initial_box` itself.
pub fn track_frames(
    frames: &[Frame],
    initial_box: BoundingBox,
    search: &WindowSearch,
) -> TrackResult<Vec<BoundingBox>> {
    let mut boxes = Vec::with_capacity(frames.len());
    let mut bbox = initial_box;
    if let Some(first) = frames.first() {
        // Surface a bad start box even for single-frame input
        first.patch(&bbox)?;
        boxes.push(bbox);
    }
    for pair in frames.windows(2) {
        bbox = track_step_with_outcome(&pair[0], &pair[1], &bbox, search)?.bbox;
        boxes.push(bbox);
    }
    Ok(boxes)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Track through every frame in `frames_dir`, writing annotated copies and a
/// JSON summary to `output_dir`.
pub fn run_sequence(options: &SequenceOptions) -> TrackResult<TrackSummary> {
    let start = Instant::now();
    let paths = list_frames(&options.frames_dir)?;
    fs::create_dir_all(&options.output_dir)?;

    let search = WindowSearch::from_config(&options.config);
    log::info!(
        "Tracking {} through {} frames with {} (radius {})",
        options.initial_box,
        paths.len(),
        search.metric(),
        search.radius()
    );

    let first = load_frame(&paths[0])?;
    let mut annotated = first.to_rgb8();
    draw_box(&mut annotated, &options.initial_box)?;
    save_frame(&annotated, &options.output_dir.join(file_name(&paths[0])))?;

    let mut current = Frame::from_dynamic(&first);
    let mut bbox = options.initial_box;
    let mut frames = vec![TrackedFrame {
        file: file_name(&paths[0]),
        bbox,
        displacement: Displacement::ZERO,
        score: None,
        all_disqualified: false,
    }];

    for (idx, path) in paths.iter().enumerate().skip(1) {
        let image = load_frame(path)?;
        let next = Frame::from_dynamic(&image);
        let outcome = track_step_with_outcome(&current, &next, &bbox, &search)?;
        bbox = outcome.bbox;

        // Annotate a copy so the next step still compares clean pixels
        let mut annotated = image.to_rgb8();
        draw_box(&mut annotated, &bbox)?;
        save_frame(&annotated, &options.output_dir.join(file_name(path)))?;

        log::info!(
            "Frame {}/{} {}: {} shift {}",
            idx + 1,
            paths.len(),
            file_name(path),
            bbox,
            outcome.displacement
        );

        frames.push(TrackedFrame {
            file: file_name(path),
            bbox,
            displacement: outcome.displacement,
            score: Some(outcome.score),
            all_disqualified: outcome.all_disqualified,
        });
        current = next;
    }

    let summary = TrackSummary {
        config: options.config.clone(),
        frames,
    };
    let writer = BufWriter::new(File::create(options.output_dir.join(SUMMARY_FILE))?);
    serde_json::to_writer_pretty(writer, &summary)?;

    log::info!(
        "Tracked {} frames in {}ms, output in {:?}",
        summary.frames.len(),
        start.elapsed().as_millis(),
        options.output_dir
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_matching::{Metric, TrackError, create_ssd_config};
    use image::{Rgb, RgbImage};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "window-tracker-driver-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// 24x24 gray frame with a 4x4 bright block whose top-left is (row, col)
    fn block_image(row: u32, col: u32) -> RgbImage {
        RgbImage::from_fn(24, 24, |x, y| {
            if (row..row + 4).contains(&y) && (col..col + 4).contains(&x) {
                Rgb([230, 230, 230])
            } else {
                Rgb([20, 20, 20])
            }
        })
    }

    #[test]
    fn test_track_frames_in_memory() {
        let frames: Vec<Frame> = [(6, 6), (7, 8), (9, 9), (9, 9)]
            .iter()
            .map(|&(r, c)| Frame::from_rgb(&block_image(r, c)))
            .collect();
        let search = WindowSearch::new(Metric::Ssd, 3);

        let boxes = track_frames(&frames, BoundingBox::new((6, 6), (9, 9)), &search).unwrap();
        assert_eq!(
            boxes,
            vec![
                BoundingBox::new((6, 6), (9, 9)),
                BoundingBox::new((7, 8), (10, 11)),
                BoundingBox::new((9, 9), (12, 12)),
                BoundingBox::new((9, 9), (12, 12)),
            ]
        );
    }

    #[test]
    fn test_track_frames_rejects_bad_start() {
        let frames = vec![Frame::from_rgb(&block_image(0, 0))];
        let search = WindowSearch::new(Metric::Ssd, 1);
        let err = track_frames(&frames, BoundingBox::new((20, 20), (24, 24)), &search).unwrap_err();
        assert!(matches!(err, TrackError::InvalidBox { .. }));
        assert!(track_frames(&[], BoundingBox::new((0, 0), (1, 1)), &search)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_run_sequence_writes_frames_and_summary() {
        let frames_dir = scratch_dir("frames");
        let output_dir = frames_dir.join("out");
        for (i, (r, c)) in [(5, 5), (6, 7), (8, 8)].iter().enumerate() {
            block_image(*r, *c)
                .save(frames_dir.join(format!("{:04}.png", i + 1)))
                .unwrap();
        }

        let options = SequenceOptions {
            frames_dir: frames_dir.clone(),
            output_dir: output_dir.clone(),
            initial_box: BoundingBox::new((5, 5), (8, 8)),
            config: create_ssd_config().with_radius(2),
        };
        let summary = run_sequence(&options).unwrap();

        let boxes: Vec<BoundingBox> = summary.frames.iter().map(|f| f.bbox).collect();
        assert_eq!(
            boxes,
            vec![
                BoundingBox::new((5, 5), (8, 8)),
                BoundingBox::new((6, 7), (9, 10)),
                BoundingBox::new((8, 8), (11, 11)),
            ]
        );
        assert_eq!(summary.frames[1].displacement, Displacement::new(1, 2));
        assert_eq!(summary.frames[1].score, Some(0.0));
        assert_eq!(summary.frames[0].score, None);

        // Annotated frame carries the outline at the tracked box
        let annotated = image::open(output_dir.join("0002.png")).unwrap().to_rgb8();
        assert_eq!(*annotated.get_pixel(7, 6), Rgb([255, 0, 255]));
        assert_eq!(*annotated.get_pixel(10, 9), Rgb([255, 0, 255]));

        let written: TrackSummary =
            serde_json::from_reader(File::open(output_dir.join(SUMMARY_FILE)).unwrap()).unwrap();
        assert_eq!(written, summary);

        let _ = fs::remove_dir_all(&frames_dir);
    }

    #[test]
    fn test_run_sequence_rejects_box_outside_first_frame() {
        let frames_dir = scratch_dir("badbox");
        block_image(0, 0).save(frames_dir.join("0001.png")).unwrap();

        let options = SequenceOptions {
            frames_dir: frames_dir.clone(),
            output_dir: frames_dir.join("out"),
            initial_box: BoundingBox::new((19, 50), (67, 92)),
            config: TrackConfig::default(),
        };
        assert!(matches!(
            run_sequence(&options),
            Err(TrackError::InvalidBox { .. })
        ));
        let _ = fs::remove_dir_all(&frames_dir);
    }
}
