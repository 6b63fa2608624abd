use crate::media::MediaError;
use bytes::Bytes;
use image::RgbImage;
use openh264::encoder::{Encoder, FrameType};
use openh264::formats::YUVBuffer;
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Annex B H.264 encoder for decoded RGB pictures.
pub struct H264Encoder {
    encoder: Encoder,
    frames: u64,
}

impl H264Encoder {
    pub fn new() -> Result<Self, MediaError> {
        let encoder = Encoder::new().map_err(|e| MediaError::Encoder(e.to_string()))?;
        Ok(Self { encoder, frames: 0 })
    }

    /// Encodes one picture. Both sides must be even.
    pub fn encode(&mut self, image: &RgbImage) -> Result<Bytes, MediaError> {
        let (width, height) = image.dimensions();
        if width % 2 != 0 || height % 2 != 0 {
            return Err(MediaError::Encoder(format!(
                "odd picture size {width}x{height}"
            )));
        }

        let yuv = rgb_to_yuv420(image.as_raw(), width as usize, height as usize);
        let yuv = YUVBuffer::from_vec(yuv, width as usize, height as usize);
        let bitstream = self
            .encoder
            .encode(&yuv)
            .map_err(|e| MediaError::Encoder(e.to_string()))?;

        self.frames += 1;
        if matches!(bitstream.frame_type(), FrameType::IDR | FrameType::I) {
            trace!("Key frame at picture {}", self.frames);
        }
        Ok(Bytes::from(bitstream.to_vec()))
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

// BT.601, full 2x2 chroma subsampling taken from the top-left pixel.
fn rgb_to_yuv420(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let luma = width * height;
    let chroma = (width / 2) * (height / 2);
    let mut yuv = vec![0u8; luma + 2 * chroma];
    let (y_plane, uv) = yuv.split_at_mut(luma);
    let (u_plane, v_plane) = uv.split_at_mut(chroma);

    for row in 0..height {
        for col in 0..width {
            let i = (row * width + col) * 3;
            let (r, g, b) = (rgb[i] as i32, rgb[i + 1] as i32, rgb[i + 2] as i32);

            y_plane[row * width + col] = (((66 * r + 129 * g + 25 * b + 128) >> 8) + 16).clamp(0, 255) as u8;

            if row % 2 == 0 && col % 2 == 0 {
                let j = (row / 2) * (width / 2) + col / 2;
                u_plane[j] = (((-38 * r - 74 * g + 112 * b + 128) >> 8) + 128).clamp(0, 255) as u8;
                v_plane[j] = (((112 * r - 94 * g - 18 * b + 128) >> 8) + 128).clamp(0, 255) as u8;
            }
        }
    }

    yuv
}

/// Runs an [`H264Encoder`] on its own thread so encoding never blocks the
/// async executor. Pictures go in one at a time and come back as Annex B.
pub(crate) struct EncoderWorker {
    pictures: mpsc::Sender<RgbImage>,
    encoded: mpsc::Receiver<Result<Bytes, MediaError>>,
}

impl EncoderWorker {
    pub(crate) fn spawn(name: &str) -> Result<Self, MediaError> {
        let (picture_tx, mut picture_rx) = mpsc::channel::<RgbImage>(1);
        let (encoded_tx, encoded_rx) = mpsc::channel(1);

        thread::Builder::new()
            .name(format!("{name}-encoder"))
            .spawn(move || {
                let mut encoder = match H264Encoder::new() {
                    Ok(encoder) => encoder,
                    Err(e) => {
                        let _ = encoded_tx.blocking_send(Err(e));
                        return;
                    }
                };
                while let Some(picture) = picture_rx.blocking_recv() {
                    if encoded_tx.blocking_send(encoder.encode(&picture)).is_err() {
                        break;
                    }
                }
                debug!("Encoder stopped after {} pictures", encoder.frames());
            })
            .map_err(|e| MediaError::Worker(e.to_string()))?;

        Ok(Self {
            pictures: picture_tx,
            encoded: encoded_rx,
        })
    }

    pub(crate) async fn encode(&mut self, picture: RgbImage) -> Result<Bytes, MediaError> {
        // A failed send means the thread already exited; its reason is queued.
        let _ = self.pictures.send(picture).await;
        match self.encoded.recv().await {
            Some(result) => result,
            None => Err(MediaError::Worker("encoder thread exited".into())),
        }
    }
}
