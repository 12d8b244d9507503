use std::path::PathBuf;

use anyhow::{bail, ensure, Result};
use clap::{ArgAction, Parser, ValueEnum};
use reveal_core::tween::Ease;

/// Command-line names for the scale transition curves.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EaseArg {
    Linear,
    #[default]
    QuadOut,
    QuadIn,
    QuadInOut,
    CubicOut,
    EaseInOut,
}

impl From<EaseArg> for Ease {
    fn from(arg: EaseArg) -> Self {
        match arg {
            EaseArg::Linear => Ease::Linear,
            EaseArg::QuadOut => Ease::QuadOut,
            EaseArg::QuadIn => Ease::QuadIn,
            EaseArg::QuadInOut => Ease::QuadInOut,
            EaseArg::CubicOut => Ease::CubicOut,
            EaseArg::EaseInOut => Ease::EaseInOut,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "reveal",
    version,
    about = "Circle reveal between a looping video and a cover image"
)]
pub struct Config {
    /// Cover image shown inside the reveal circle.
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Directory of numbered image frames played as the background video.
    #[arg(long, value_name = "DIR")]
    pub frames: Option<PathBuf>,

    /// Playback rate of the frame directory.
    #[arg(long, value_name = "FPS", default_value_t = 30.0)]
    pub fps: f32,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Start with the parameter panel hidden (toggle with G).
    #[arg(long)]
    pub no_gui: bool,

    /// Wait for vblank when presenting.
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    pub vsync: bool,

    /// Curve of the press/release scale transition.
    #[arg(long, value_enum, default_value_t = EaseArg::QuadOut)]
    pub ease: EaseArg,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.fps.is_finite() && self.fps > 0.0,
            "--fps must be a positive number, got {}",
            self.fps
        );
        ensure!(
            self.width > 0 && self.height > 0,
            "window size must be non-zero, got {}x{}",
            self.width,
            self.height
        );
        if let Some(image) = &self.image {
            if !image.is_file() {
                bail!("image {} does not exist", image.display());
            }
        }
        if let Some(frames) = &self.frames {
            if !frames.is_dir() {
                bail!("frame directory {} does not exist", frames.display());
            }
        }
        Ok(())
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}
