use std::path::{Path, PathBuf};

use image::RgbaImage;
use wgpu::{Device, Queue};

use crate::texture::{fit_to_limit, Texture};
use crate::TextureError;

// ---------------------------------------------------------------------------
// Frame loading (pure, testable)
// ---------------------------------------------------------------------------

/// Image files in `dir`, sorted by file name.
pub fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>, TextureError> {
    let entries = std::fs::read_dir(dir).map_err(|source| TextureError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && image::ImageFormat::from_path(p).is_ok())
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(TextureError::EmptyFrames(dir.to_path_buf()));
    }
    Ok(paths)
}

/// Decode every frame in `dir`. The first frame is downscaled to fit
/// `max_dim`; frames whose size differs from it are resized to match.
pub fn load_frames(dir: &Path, max_dim: u32) -> Result<Vec<RgbaImage>, TextureError> {
    let mut frames: Vec<RgbaImage> = Vec::new();
    for path in frame_paths(dir)? {
        let mut frame = image::open(&path)?.to_rgba8();
        if frames.is_empty() {
            frame = fit_to_limit(frame, max_dim);
        }
        if let Some(first) = frames.first() {
            if frame.dimensions() != first.dimensions() {
                log::debug!("resizing {} to {:?}", path.display(), first.dimensions());
                frame = image::imageops::resize(
                    &frame,
                    first.width(),
                    first.height(),
                    image::imageops::FilterType::Triangle,
                );
            }
        }
        frames.push(frame);
    }
    Ok(frames)
}

/// Index of the frame to show at `time` seconds, looping.
pub fn frame_index(time: f32, fps: f32, len: usize) -> usize {
    if len == 0 || fps.is_nan() || fps <= 0.0 || !time.is_finite() || time < 0.0 {
        return 0;
    }
    (time * fps).floor() as usize % len
}

// ---------------------------------------------------------------------------
// FrameSequence — a looping stack of stills played as video
// ---------------------------------------------------------------------------

pub struct FrameSequence {
    frames: Vec<RgbaImage>,
    fps: f32,
    current: usize,
    texture: Texture,
}

impl FrameSequence {
    pub fn load(device: &Device, queue: &Queue, dir: &Path, fps: f32) -> Result<Self, TextureError> {
        let frames = load_frames(dir, device.limits().max_texture_dimension_2d)?;
        let first = frames
            .first()
            .ok_or_else(|| TextureError::EmptyFrames(dir.to_path_buf()))?;
        let texture = Texture::from_rgba(
            device,
            queue,
            first,
            first.width(),
            first.height(),
            "video frames",
        )?;
        log::info!(
            "Loaded {} video frames from {} ({}×{} @ {fps} fps)",
            frames.len(),
            dir.display(),
            texture.width,
            texture.height
        );
        Ok(Self {
            frames,
            fps,
            current: 0,
            texture,
        })
    }

    /// Upload the frame for `time` if it differs from the one on the GPU.
    pub fn advance(&mut self, queue: &Queue, time: f32) -> Result<(), TextureError> {
        let next = frame_index(time, self.fps, self.frames.len());
        if next == self.current {
            return Ok(());
        }
        self.texture.write_rgba(queue, &self.frames[next])?;
        self.current = next;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FrameSource — what feeds the video slot of the blend
// ---------------------------------------------------------------------------

pub enum FrameSource {
    Sequence(FrameSequence),
    Still(Texture),
}

impl FrameSource {
    pub fn view(&self) -> &wgpu::TextureView {
        match self {
            FrameSource::Sequence(seq) => &seq.texture.view,
            FrameSource::Still(tex) => &tex.view,
        }
    }

    pub fn advance(&mut self, queue: &Queue, time: f32) -> Result<(), TextureError> {
        match self {
            FrameSource::Sequence(seq) => seq.advance(queue, time),
            FrameSource::Still(_) => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
