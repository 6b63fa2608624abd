use crate::media::{FrameClock, MediaError, MediaFrame, MediaPayload, MediaSource, SourceOrigin};
use async_trait::async_trait;
use image::{Rgb, RgbImage};
use rendezvous_core::{MediaCodec, TimeBase, TrackKind};
use std::path::Path;
use std::sync::Arc;

const DEGREES_PER_SECOND: f64 = 45.0;
const PATTERN_WIDTH: u32 = 320;
const PATTERN_HEIGHT: u32 = 240;

/// Rotation for a frame: `(45 * pts * time_base) mod 360` degrees.
pub fn rotation_angle(pts: u64, time_base: TimeBase) -> f64 {
    (DEGREES_PER_SECOND * time_base.seconds(pts)).rem_euclid(360.0)
}

/// Rotates counter-clockwise about the image centre. Pixels that map
/// outside the source come out black.
pub fn rotate_about_center(image: &RgbImage, degrees: f64) -> RgbImage {
    let (width, height) = image.dimensions();
    let cx = (width as f64 - 1.0) / 2.0;
    let cy = (height as f64 - 1.0) / 2.0;
    let (sin, cos) = degrees.to_radians().sin_cos();

    RgbImage::from_fn(width, height, |x, y| {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        let sx = (cx + dx * cos - dy * sin).round();
        let sy = (cy + dx * sin + dy * cos).round();

        if sx < 0.0 || sy < 0.0 || sx >= width as f64 || sy >= height as f64 {
            Rgb([0, 0, 0])
        } else {
            *image.get_pixel(sx as u32, sy as u32)
        }
    })
}

/// Endless rotating still image. Needs no hardware and cannot fail.
#[derive(Clone)]
pub struct SyntheticPattern {
    image: Arc<RgbImage>,
}

impl SyntheticPattern {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image: Arc::new(even_dimensions(image)),
        }
    }

    /// Reads the still image once; later frames all derive from it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MediaError> {
        let image = image::open(path)?.to_rgb8();
        Ok(Self::new(image))
    }

    /// Built-in gradient used when no still image is configured.
    pub fn test_pattern() -> Self {
        let image = RgbImage::from_fn(PATTERN_WIDTH, PATTERN_HEIGHT, |x, y| {
            let r = (x * 255 / PATTERN_WIDTH) as u8;
            let g = (y * 255 / PATTERN_HEIGHT) as u8;
            // A bright bar on the left edge makes the rotation visible.
            let b = if x < PATTERN_WIDTH / 8 { 255 } else { 96 };
            Rgb([r, g, b])
        });
        Self::new(image)
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

#[async_trait]
impl MediaSource for SyntheticPattern {
    fn kind(&self) -> TrackKind {
        TrackKind::Video
    }

    fn codec(&self) -> MediaCodec {
        MediaCodec::H264
    }

    fn origin(&self) -> SourceOrigin {
        SourceOrigin::SyntheticPattern
    }

    async fn next_frame(
        &mut self,
        clock: &mut FrameClock,
    ) -> Result<Option<MediaFrame>, MediaError> {
        let (pts, time_base) = clock.next_timestamp().await;
        let angle = rotation_angle(pts, time_base);

        let image = Arc::clone(&self.image);
        let rotated = tokio::task::spawn_blocking(move || rotate_about_center(&image, angle))
            .await
            .map_err(|e| MediaError::Worker(e.to_string()))?;

        Ok(Some(MediaFrame {
            payload: MediaPayload::Raw(rotated),
            pts,
            time_base,
            duration: clock.frame_duration(),
        }))
    }
}

/// YUV 4:2:0 needs even sides; drop the odd last row/column.
pub(crate) fn even_dimensions(image: RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let (even_w, even_h) = (width & !1, height & !1);
    if (even_w, even_h) == (width, height) || even_w == 0 || even_h == 0 {
        return image;
    }
    image::imageops::crop_imm(&image, 0, 0, even_w, even_h).to_image()
}
