use std::path::Path;

use wgpu::util::DeviceExt;
use wgpu::{Device, Queue};

use crate::TextureError;

/// An sRGB RGBA texture sampled by the blend shader.
#[derive(Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Create a texture from raw RGBA8 data.
    pub fn from_rgba(
        device: &Device,
        queue: &Queue,
        data: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Result<Self, TextureError> {
        check_len(data, width, height)?;

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            texture,
            view,
            width,
            height,
        })
    }

    pub fn from_image(
        device: &Device,
        queue: &Queue,
        img: &image::DynamicImage,
        label: &str,
    ) -> Result<Self, TextureError> {
        let rgba = fit_to_limit(img.to_rgba8(), device.limits().max_texture_dimension_2d);
        let (width, height) = rgba.dimensions();
        Self::from_rgba(device, queue, &rgba, width, height, label)
    }

    /// A single-pixel texture of one colour.
    pub fn solid(
        device: &Device,
        queue: &Queue,
        rgba: [u8; 4],
        label: &str,
    ) -> Result<Self, TextureError> {
        Self::from_rgba(device, queue, &rgba, 1, 1, label)
    }

    /// Load a texture from an image file.
    pub fn from_file(device: &Device, queue: &Queue, path: &Path) -> Result<Self, TextureError> {
        let img = image::open(path)?;
        log::info!(
            "Loaded image {} ({}×{})",
            path.display(),
            img.width(),
            img.height()
        );
        Self::from_image(device, queue, &img, &path.display().to_string())
    }

    /// A procedural stand-in used when no image is configured.
    pub fn gradient(
        device: &Device,
        queue: &Queue,
        width: u32,
        height: u32,
        label: &str,
    ) -> Result<Self, TextureError> {
        let data = gradient_rgba(width, height);
        Self::from_rgba(device, queue, &data, width, height, label)
    }

    /// Re-upload pixel data of the same dimensions.
    pub fn write_rgba(&self, queue: &Queue, data: &[u8]) -> Result<(), TextureError> {
        check_len(data, self.width, self.height)?;
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }
}

/// Size of a `width`×`height` image scaled down, aspect preserved, so
/// neither side exceeds `max`. Sides never drop below one pixel.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    let max = max.max(1);
    if width <= max && height <= max {
        return (width, height);
    }
    let ratio = max as f64 / width.max(height) as f64;
    let scale = |side: u32| ((side as f64 * ratio).round() as u32).clamp(1, max);
    (scale(width), scale(height))
}

/// Downscale `img` if either side exceeds the device's texture limit.
pub fn fit_to_limit(img: image::RgbaImage, max: u32) -> image::RgbaImage {
    let (width, height) = img.dimensions();
    let (w, h) = fit_within(width, height, max);
    if (w, h) == (width, height) {
        return img;
    }
    log::warn!("image {width}×{height} exceeds texture limit {max}; downscaling to {w}×{h}");
    image::imageops::resize(&img, w, h, image::imageops::FilterType::Triangle)
}

fn check_len(data: &[u8], width: u32, height: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroSize { width, height });
    }
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(TextureError::SizeMismatch {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Diagonal two-tone gradient in RGBA8.
pub fn gradient_rgba(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    let span = (width + height).saturating_sub(2).max(1) as f32;
    for y in 0..height {
        for x in 0..width {
            let t = (x + y) as f32 / span;
            let lerp = |a: f32, b: f32| (a + (b - a) * t).round() as u8;
            data.extend_from_slice(&[lerp(20.0, 235.0), lerp(40.0, 120.0), lerp(90.0, 60.0), 255]);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_has_expected_size() {
        assert_eq!(gradient_rgba(4, 3).len(), 4 * 3 * 4);
    }

    #[test]
    fn gradient_runs_corner_to_corner() {
        let data = gradient_rgba(8, 8);
        assert_eq!(&data[0..4], &[20, 40, 90, 255]);
        let last = data.len() - 4;
        assert_eq!(&data[last..], &[235, 120, 60, 255]);
    }

    #[test]
    fn gradient_of_single_pixel_is_start_colour() {
        assert_eq!(gradient_rgba(1, 1), vec![20, 40, 90, 255]);
    }

    #[test]
    fn check_len_rejects_short_data() {
        let err = check_len(&[0; 12], 2, 2).unwrap_err();
        match err {
            TextureError::SizeMismatch { expected, actual } => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 12);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fit_within_leaves_small_images_alone() {
        assert_eq!(fit_within(1920, 1080, 8192), (1920, 1080));
        assert_eq!(fit_within(8192, 8192, 8192), (8192, 8192));
    }

    #[test]
    fn fit_within_scales_longest_side_to_limit() {
        assert_eq!(fit_within(10000, 5000, 8192), (8192, 4096));
        assert_eq!(fit_within(3000, 12000, 8192), (2048, 8192));
    }

    #[test]
    fn fit_within_keeps_thin_images_visible() {
        assert_eq!(fit_within(20000, 1, 8192), (8192, 1));
    }

    #[test]
    fn fit_to_limit_downscales_pixels() {
        let img = image::RgbaImage::from_pixel(40, 10, image::Rgba([9, 9, 9, 255]));
        let out = fit_to_limit(img, 16);
        assert_eq!(out.dimensions(), (16, 4));
        assert_eq!(out.get_pixel(0, 0).0, [9, 9, 9, 255]);
    }

    #[test]
    fn check_len_rejects_empty_images() {
        assert!(matches!(
            check_len(&[], 0, 0),
            Err(TextureError::ZeroSize { width: 0, height: 0 })
        ));
        assert!(matches!(
            check_len(&[], 4, 0),
            Err(TextureError::ZeroSize { .. })
        ));
    }

    #[test]
    fn check_len_accepts_exact_data() {
        assert!(check_len(&[0; 16], 2, 2).is_ok());
    }

    /// Skipped on machines without a GPU adapter.
    #[test]
    fn solid_and_empty_textures() {
        let Ok(gpu) = pollster::block_on(crate::context::GpuContext::new_headless()) else {
            eprintln!("no GPU adapter; skipping");
            return;
        };
        let (device, queue) = (&gpu.device, &gpu.queue);

        let solid = Texture::solid(device, queue, [1, 2, 3, 255], "solid").unwrap();
        assert_eq!((solid.width, solid.height), (1, 1));

        let err = Texture::from_rgba(device, queue, &[], 0, 0, "empty").unwrap_err();
        assert!(matches!(err, TextureError::ZeroSize { .. }));
    }
}
