/// Crop geometry engine
///
/// Pure functions mapping (image size, pointer position, zoom factor) to a
/// clamped crop rectangle, plus the preview rendering that crops and scales
/// back up to the source dimensions. No state lives here; the session calls
/// in on every pointer or zoom event.

use image::imageops::FilterType;
use image::DynamicImage;

/// Zoom changes in discrete 0.1 steps (keys and wheel map to the same delta).
pub const ZOOM_STEP: f32 = 0.1;

/// Axis-aligned crop rectangle in source-image pixel coordinates.
///
/// Invariant: `left < right <= image width` and `top < bottom <= image height`
/// for any rectangle produced by `compute_crop_rect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Clamp a zoom factor to the supported range: at least 1.0, rounded to one
/// decimal place so repeated 0.1 steps don't accumulate float drift.
pub fn clamp_zoom(zoom: f32) -> f32 {
    ((zoom * 10.0).round() / 10.0).max(1.0)
}

/// Compute the crop rectangle for a pointer position at a given zoom.
///
/// The crop is 1/zoom of the source dimensions, centered on the pointer,
/// with the center clamped so the rectangle never leaves the image. The
/// pointer may be outside the image entirely; the clamp absorbs it. At
/// zoom 1.0 the rectangle is always the full frame, which the writer uses
/// as the "copy the original bytes" signal.
pub fn compute_crop_rect(width: u32, height: u32, pointer_x: i32, pointer_y: i32, zoom: f32) -> CropRect {
    // floor(dim / zoom), but never a zero-sized crop
    let crop_w = ((width as f32 / zoom) as u32).clamp(1, width.max(1));
    let crop_h = ((height as f32 / zoom) as u32).clamp(1, height.max(1));

    let half_w = (crop_w / 2) as i64;
    let half_h = (crop_h / 2) as i64;

    let cx = (pointer_x as i64).clamp(half_w, width as i64 - half_w);
    let cy = (pointer_y as i64).clamp(half_h, height as i64 - half_h);

    // Keep the full crop_w x crop_h extent inside the image even when the
    // crop dimension is odd and the half-size rounding would push it out.
    let left = (cx - half_w).clamp(0, width as i64 - crop_w as i64) as u32;
    let top = (cy - half_h).clamp(0, height as i64 - crop_h as i64) as u32;

    CropRect {
        left,
        top,
        right: left + crop_w,
        bottom: top + crop_h,
    }
}

/// Render the preview for a crop rectangle: crop the source, then scale back
/// up to the source dimensions so the preview fills the same canvas area at
/// every zoom level.
pub fn render_preview(image: &DynamicImage, rect: CropRect) -> DynamicImage {
    let cropped = image.crop_imm(rect.left, rect.top, rect.width(), rect.height());
    cropped.resize_exact(image.width(), image.height(), FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_frame_at_zoom_one() {
        // Any pointer position, including far outside the image
        for (px, py) in [(0, 0), (50, 50), (-200, 9999), (100, 0)] {
            let rect = compute_crop_rect(100, 80, px, py, 1.0);
            assert_eq!(rect, CropRect { left: 0, top: 0, right: 100, bottom: 80 });
        }
        // Odd dimensions must still cover the full frame
        let rect = compute_crop_rect(101, 77, 3, 900, 1.0);
        assert_eq!(rect, CropRect { left: 0, top: 0, right: 101, bottom: 77 });
    }

    #[test]
    fn test_rect_stays_inside_image() {
        let sizes = [(100, 80), (101, 77), (50, 50), (3, 3)];
        let zooms = [1.0, 1.1, 1.5, 2.0, 3.3, 10.0];
        let pointers = [(-50, -50), (0, 0), (25, 60), (1000, 1000)];

        for &(w, h) in &sizes {
            for &zoom in &zooms {
                for &(px, py) in &pointers {
                    let rect = compute_crop_rect(w, h, px, py, zoom);
                    assert!(rect.left < rect.right, "{:?}", rect);
                    assert!(rect.top < rect.bottom, "{:?}", rect);
                    assert!(rect.right <= w, "{:?} exceeds width {}", rect, w);
                    assert!(rect.bottom <= h, "{:?} exceeds height {}", rect, h);
                }
            }
        }
    }

    #[test]
    fn test_crop_size_is_floor_of_dim_over_zoom() {
        let rect = compute_crop_rect(100, 80, 50, 40, 2.0);
        assert_eq!(rect.width(), 50);
        assert_eq!(rect.height(), 40);

        // 100 / 3.0 = 33.33 -> 33
        let rect = compute_crop_rect(100, 100, 50, 50, 3.0);
        assert_eq!(rect.width(), 33);
        assert_eq!(rect.height(), 33);
    }

    #[test]
    fn test_center_bias_follows_pointer() {
        let rect = compute_crop_rect(100, 100, 30, 70, 2.0);
        assert_eq!(rect, CropRect { left: 5, top: 45, right: 55, bottom: 95 });
    }

    #[test]
    fn test_clamp_zoom() {
        assert_eq!(clamp_zoom(0.9), 1.0);
        assert_eq!(clamp_zoom(1.0 - ZOOM_STEP), 1.0);
        assert_eq!(clamp_zoom(1.0 + ZOOM_STEP), 1.1);
        // Accumulated float error rounds back onto the 0.1 grid
        assert_eq!(clamp_zoom(1.2999998), 1.3);
    }

    #[test]
    fn test_preview_keeps_source_dimensions() {
        let source = DynamicImage::new_rgba8(64, 48);
        let rect = compute_crop_rect(64, 48, 32, 24, 2.0);
        let preview = render_preview(&source, rect);
        assert_eq!(preview.width(), 64);
        assert_eq!(preview.height(), 48);
    }
}
