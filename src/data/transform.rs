//! Image preprocessing pipeline

use ndarray::Array4;

use crate::error::{Error, Result};

/// Preprocessing applied to loaded images: optional bilinear resize, then
/// optional per-channel normalization. Pixel scaling to [0, 1] happens in
/// the loaders before the transform runs.
#[derive(Debug, Clone, Default)]
pub struct Transform {
    /// Target (height, width), if resizing
    pub resize_to: Option<(usize, usize)>,
    /// Per-channel (mean, std), if normalizing
    pub normalize: Option<(Vec<f32>, Vec<f32>)>,
}

impl Transform {
    /// Run the pipeline over a batch of images in NCHW layout.
    pub fn apply(&self, images: Array4<f32>) -> Result<Array4<f32>> {
        let mut images = images;

        if let Some((height, width)) = self.resize_to {
            if height == 0 || width == 0 {
                return Err(Error::ConfigError(format!(
                    "resize_to must be positive, got ({height}, {width})"
                )));
            }
            images = resize_bilinear(&images, height, width);
        }

        if let Some((mean, std)) = &self.normalize {
            let channels = images.shape()[1];
            if mean.len() != channels || std.len() != channels {
                return Err(Error::ConfigError(format!(
                    "normalization stats cover {} channel(s), images have {channels}",
                    mean.len()
                )));
            }
            if let Some(bad) = std.iter().find(|&&s| s <= 0.0) {
                return Err(Error::ConfigError(format!(
                    "normalize_std entries must be positive, got {bad}"
                )));
            }
            for (c, (m, s)) in mean.iter().zip(std).enumerate() {
                images
                    .index_axis_mut(ndarray::Axis(1), c)
                    .mapv_inplace(|v| (v - m) / s);
            }
        }

        Ok(images)
    }
}

/// Bilinear resize with half-pixel centers.
fn resize_bilinear(images: &Array4<f32>, out_h: usize, out_w: usize) -> Array4<f32> {
    let (n, c, in_h, in_w) = images.dim();
    let scale_y = in_h as f32 / out_h as f32;
    let scale_x = in_w as f32 / out_w as f32;

    Array4::from_shape_fn((n, c, out_h, out_w), |(i, ch, y, x)| {
        let src_y = ((y as f32 + 0.5) * scale_y - 0.5).max(0.0);
        let src_x = ((x as f32 + 0.5) * scale_x - 0.5).max(0.0);

        let y0 = (src_y as usize).min(in_h - 1);
        let x0 = (src_x as usize).min(in_w - 1);
        let y1 = (y0 + 1).min(in_h - 1);
        let x1 = (x0 + 1).min(in_w - 1);
        let dy = src_y - y0 as f32;
        let dx = src_x - x0 as f32;

        let top = images[(i, ch, y0, x0)] * (1.0 - dx) + images[(i, ch, y0, x1)] * dx;
        let bottom = images[(i, ch, y1, x0)] * (1.0 - dx) + images[(i, ch, y1, x1)] * dx;
        top * (1.0 - dy) + bottom * dy
    })
}
