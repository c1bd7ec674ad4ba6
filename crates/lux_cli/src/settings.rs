//! Render settings: JSON file values, overridden by command line flags.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lux_renderer::{validate_resolution, ConfigError, RenderConfig, SplitMethod};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Render the Cornell box with the Lux path tracer.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// JSON settings file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output image, format chosen by extension
    #[arg(short, long, default_value = "cornell.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Samples per pixel
    #[arg(short, long)]
    pub spp: Option<u32>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// BVH split method
    #[arg(long, value_enum)]
    pub split: Option<SplitArg>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitArg {
    Naive,
    Sah,
}

impl From<SplitArg> for SplitMethod {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::Naive => SplitMethod::Naive,
            SplitArg::Sah => SplitMethod::Sah,
        }
    }
}

/// Everything needed to produce one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub split_method: SplitMethod,
    pub render: RenderConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            split_method: SplitMethod::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse settings JSON")
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Settings for `args`: the config file if given, then flag overrides.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut settings = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        settings.apply(args);
        Ok(settings)
    }

    /// Override values with the flags that were passed.
    pub fn apply(&mut self, args: &Args) {
        if let Some(width) = args.width {
            self.width = width;
        }
        if let Some(height) = args.height {
            self.height = height;
        }
        if let Some(spp) = args.spp {
            self.render.samples_per_pixel = spp;
        }
        if let Some(seed) = args.seed {
            self.render.seed = seed;
        }
        if let Some(split) = args.split {
            self.split_method = split.into();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_resolution(self.width, self.height)?;
        self.render.validate()
    }
}
