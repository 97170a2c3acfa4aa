use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_HISTORY_CAPACITY: usize = 10;
const DEFAULT_BACKEND: &str = "stub";
const DEFAULT_NOISE_DIR: &str = "debug/noise";
const DEFAULT_NUMBER_DIR: &str = "debug/number";
const DEFAULT_CLASSIFIER_INPUT: u32 = 48;
const DEFAULT_DETECTOR_WIDTH: u32 = 640;
const DEFAULT_DETECTOR_HEIGHT: u32 = 640;
const DEFAULT_DETECTOR_CONFIDENCE: f32 = 0.5;

#[derive(Debug, Deserialize, Default)]
struct LabellerConfigFile {
    history_capacity: Option<usize>,
    backend: Option<String>,
    debug_images: Option<DebugImagesConfigFile>,
    models: Option<ModelsConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct DebugImagesConfigFile {
    enabled: Option<bool>,
    noise_dir: Option<PathBuf>,
    number_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct ModelsConfigFile {
    classifier_path: Option<PathBuf>,
    detector_path: Option<PathBuf>,
    classifier_input: Option<u32>,
    detector_width: Option<u32>,
    detector_height: Option<u32>,
    detector_confidence: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct LabellerConfig {
    pub history_capacity: usize,
    pub backend: String,
    pub debug_images: DebugImageSettings,
    pub models: ModelSettings,
}

#[derive(Debug, Clone)]
pub struct DebugImageSettings {
    pub enabled: bool,
    pub noise_dir: PathBuf,
    pub number_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub classifier_path: Option<PathBuf>,
    pub detector_path: Option<PathBuf>,
    pub classifier_input: u32,
    pub detector_width: u32,
    pub detector_height: u32,
    pub detector_confidence: f32,
}

impl Default for LabellerConfig {
    fn default() -> Self {
        Self::from_file(LabellerConfigFile::default())
    }
}

impl LabellerConfig {
    /// Load configuration: JSON file named by `DOORPLATE_CONFIG` (if set),
    /// then env-var overrides, then validation.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("DOORPLATE_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: LabellerConfigFile) -> Self {
        let history_capacity = file.history_capacity.unwrap_or(DEFAULT_HISTORY_CAPACITY);
        let backend = file.backend.unwrap_or_else(|| DEFAULT_BACKEND.to_string());
        let debug_images = DebugImageSettings {
            enabled: file
                .debug_images
                .as_ref()
                .and_then(|d| d.enabled)
                .unwrap_or(false),
            noise_dir: file
                .debug_images
                .as_ref()
                .and_then(|d| d.noise_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_NOISE_DIR)),
            number_dir: file
                .debug_images
                .and_then(|d| d.number_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_NUMBER_DIR)),
        };
        let models = ModelSettings {
            classifier_path: file.models.as_ref().and_then(|m| m.classifier_path.clone()),
            detector_path: file.models.as_ref().and_then(|m| m.detector_path.clone()),
            classifier_input: file
                .models
                .as_ref()
                .and_then(|m| m.classifier_input)
                .unwrap_or(DEFAULT_CLASSIFIER_INPUT),
            detector_width: file
                .models
                .as_ref()
                .and_then(|m| m.detector_width)
                .unwrap_or(DEFAULT_DETECTOR_WIDTH),
            detector_height: file
                .models
                .as_ref()
                .and_then(|m| m.detector_height)
                .unwrap_or(DEFAULT_DETECTOR_HEIGHT),
            detector_confidence: file
                .models
                .and_then(|m| m.detector_confidence)
                .unwrap_or(DEFAULT_DETECTOR_CONFIDENCE),
        };
        Self {
            history_capacity,
            backend,
            debug_images,
            models,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(capacity) = std::env::var("DOORPLATE_HISTORY_CAPACITY") {
            let parsed: usize = capacity
                .parse()
                .map_err(|_| anyhow!("DOORPLATE_HISTORY_CAPACITY must be a positive integer"))?;
            self.history_capacity = parsed;
        }
        if let Ok(backend) = std::env::var("DOORPLATE_BACKEND") {
            if !backend.trim().is_empty() {
                self.backend = backend;
            }
        }
        if let Ok(flag) = std::env::var("DOORPLATE_SAVE_IMAGES") {
            self.debug_images.enabled = matches!(flag.trim(), "1" | "true" | "yes");
        }
        if let Ok(dir) = std::env::var("DOORPLATE_NOISE_DIR") {
            if !dir.trim().is_empty() {
                self.debug_images.noise_dir = PathBuf::from(dir);
            }
        }
        if let Ok(dir) = std::env::var("DOORPLATE_NUMBER_DIR") {
            if !dir.trim().is_empty() {
                self.debug_images.number_dir = PathBuf::from(dir);
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(anyhow!("history capacity must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.models.detector_confidence) {
            return Err(anyhow!("detector confidence must be within 0..=1"));
        }
        if self.debug_images.enabled && self.debug_images.noise_dir == self.debug_images.number_dir
        {
            return Err(anyhow!("noise and number debug directories must differ"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<LabellerConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
