//! Frame sequence storage

use crate::block_matching::{TrackError, TrackResult};
use image::{DynamicImage, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files in `dir`, sorted by file name
pub fn list_frames(dir: &Path) -> TrackResult<Vec<PathBuf>> {
    let mut frames = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_frame_file(&path) {
            frames.push(path);
        }
    }

    if frames.is_empty() {
        return Err(TrackError::EmptySequence {
            path: dir.to_path_buf(),
        });
    }

    frames.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    log::debug!("Found {} frames in {:?}", frames.len(), dir);
    Ok(frames)
}

pub fn load_frame(path: &Path) -> TrackResult<DynamicImage> {
    Ok(image::open(path)?)
}

pub fn save_frame(image: &RgbImage, path: &Path) -> TrackResult<()> {
    image.save(path)?;
    Ok(())
}
