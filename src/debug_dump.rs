//! Flag-gated persistence of input crops for offline inspection.
//!
//! Crops land in one of two bucket directories depending on the noise
//! verdict, keyed by a per-sink monotonically increasing index. This is a
//! pure I/O side channel: the decision pipeline works identically with the
//! sink disabled.

use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DebugImageSettings;
use crate::frame::Frame;

pub struct DebugImageSink {
    enabled: bool,
    noise_dir: PathBuf,
    number_dir: PathBuf,
    next_index: u64,
}

impl DebugImageSink {
    /// Build the sink; when enabled, both bucket directories are created if
    /// absent and emptied of files left over from a previous run.
    pub fn new(settings: &DebugImageSettings) -> Result<Self> {
        if settings.enabled {
            prepare_bucket(&settings.noise_dir)?;
            prepare_bucket(&settings.number_dir)?;
        }
        Ok(Self {
            enabled: settings.enabled,
            noise_dir: settings.noise_dir.clone(),
            number_dir: settings.number_dir.clone(),
            next_index: 0,
        })
    }

    /// Sink that never writes anything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            noise_dir: PathBuf::new(),
            number_dir: PathBuf::new(),
            next_index: 0,
        }
    }

    /// Persist one crop into the bucket matching the noise verdict.
    /// No-op when the sink is disabled; the index only advances on writes.
    pub fn record(&mut self, crop: &Frame, is_noise: bool) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let dir = if is_noise {
            &self.noise_dir
        } else {
            &self.number_dir
        };
        let path = dir.join(format!("{}.png", self.next_index));
        let img = RgbImage::from_raw(crop.width(), crop.height(), crop.pixels().to_vec())
            .ok_or_else(|| anyhow!("crop does not form a valid RGB image"))?;
        img.save(&path)
            .with_context(|| format!("failed to write debug image {}", path.display()))?;
        self.next_index += 1;
        Ok(())
    }
}

fn prepare_bucket(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create debug directory {}", dir.display()))?;
        return Ok(());
    }
    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to read debug directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove stale file {}", path.display()))?;
        }
    }
    Ok(())
}
