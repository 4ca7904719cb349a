use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser};
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::constants::*;
use crate::error::{Result, SlideshowError};
use crate::texture_loader::load_sorted_image_paths;

/// One image of the slideshow. Its identity is its position in the list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideDescriptor {
    #[serde(alias = "src")]
    pub source: String,
    #[serde(alias = "alt", default)]
    pub alt_text: String,
}

impl SlideDescriptor {
    pub fn new(source: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Self { source: source.into(), alt_text: alt_text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SlideshowConfig {
    /// Milliseconds between automatic advances
    pub interval_time: u64,
    /// Milliseconds the transition lock is held after a slide change
    pub transition_duration: u64,
    pub slides: Vec<SlideDescriptor>,
    pub enable_auto_play: bool,
    pub enable_keyboard: bool,
    pub enable_touch: bool,
    /// Horizontal distance (pixels) a swipe must exceed to navigate
    pub swipe_threshold: f32,
    /// Randomize the slide order once at startup
    pub shuffle: bool,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            interval_time: DEFAULT_INTERVAL_MS,
            transition_duration: DEFAULT_TRANSITION_MS,
            slides: Vec::new(),
            enable_auto_play: true,
            enable_keyboard: true,
            enable_touch: true,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            shuffle: false,
        }
    }
}

impl SlideshowConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| SlideshowError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML config file. Relative slide sources are resolved
    /// against the directory holding the file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| SlideshowError::io(path, e))?;
        let mut config = Self::from_toml_str(&raw)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for slide in config.slides.iter_mut() {
            if Path::new(&slide.source).is_relative() {
                slide.source = base.join(&slide.source).to_string_lossy().into_owned();
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // A zero interval would re-arm the autoplay timer at the instant it fires
        if self.interval_time == 0 {
            return Err(SlideshowError::config("intervalTime must be greater than 0"));
        }
        if !self.swipe_threshold.is_finite() || self.swipe_threshold < 0.0 {
            return Err(SlideshowError::config(format!(
                "swipeThreshold must be a non-negative number, got {}",
                self.swipe_threshold
            )));
        }
        Ok(())
    }

    pub fn shuffle_slides<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.shuffle {
            self.slides.shuffle(rng);
        }
    }
}

/// Every image of `dir`, in file name order, with its file stem as alt text.
pub fn slides_from_directory(dir: &Path) -> Result<Vec<SlideDescriptor>> {
    let paths = load_sorted_image_paths(dir)?;
    Ok(paths
        .iter()
        .map(|path| {
            let alt = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
            SlideDescriptor::new(path.to_string_lossy(), alt)
        })
        .collect())
}

#[derive(Parser, Debug)]
#[command(name = "carousel", version, about = "Interactive image slideshow with autoplay, swipe and keyboard navigation")]
#[command(group(ArgGroup::new("input").required(true).multiple(true).args(["directory", "config"])))]
pub struct Args {
    /// Directory of images to show (replaces slides from the config file)
    pub directory: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Milliseconds between automatic advances
    #[arg(long)]
    pub interval: Option<u64>,

    /// Milliseconds a transition locks navigation
    #[arg(long)]
    pub transition: Option<u64>,

    /// Minimum swipe distance in pixels
    #[arg(long)]
    pub swipe_threshold: Option<f32>,

    #[arg(long)]
    pub no_autoplay: bool,

    #[arg(long)]
    pub no_keyboard: bool,

    #[arg(long)]
    pub no_touch: bool,

    /// Randomize the slide order
    #[arg(long)]
    pub shuffle: bool,

    /// Log navigation and timer activity
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Defaults, then the config file, then the image directory, then flags.
    pub fn to_config(&self) -> Result<SlideshowConfig> {
        let mut config = match &self.config {
            Some(path) => SlideshowConfig::load(path)?,
            None => SlideshowConfig::default(),
        };

        if let Some(dir) = &self.directory {
            config.slides = slides_from_directory(dir)?;
        }
        if let Some(interval) = self.interval {
            config.interval_time = interval;
        }
        if let Some(transition) = self.transition {
            config.transition_duration = transition;
        }
        if let Some(threshold) = self.swipe_threshold {
            config.swipe_threshold = threshold;
        }
        config.enable_auto_play &= !self.no_autoplay;
        config.enable_keyboard &= !self.no_keyboard;
        config.enable_touch &= !self.no_touch;
        config.shuffle |= self.shuffle;

        config.validate()?;
        Ok(config)
    }
}
