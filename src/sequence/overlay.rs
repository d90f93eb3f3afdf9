//! Box outline drawing on annotated frames

use crate::block_matching::{BoundingBox, TrackError, TrackResult};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

/// Outline color (magenta)
pub const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 255]);

/// Draw a one-pixel outline along the box edges, corners included.
///
/// A box with any corner outside the image is rejected.
pub fn draw_box(image: &mut RgbImage, bbox: &BoundingBox) -> TrackResult<()> {
    if !bbox.fits_within(image.width(), image.height()) {
        return Err(TrackError::InvalidBox {
            bbox: *bbox,
            width: image.width(),
            height: image.height(),
        });
    }

    let rect = Rect::at(bbox.top_left.1 as i32, bbox.top_left.0 as i32)
        .of_size(bbox.width() as u32, bbox.height() as u32);
    draw_hollow_rect_mut(image, rect, BOX_COLOR);
    Ok(())
}
