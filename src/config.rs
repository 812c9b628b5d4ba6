use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_BOX_SIZE: u32 = 100;
const DEFAULT_MOVE_STEP: i32 = 5;

#[derive(Debug, Deserialize, Default)]
struct AnnotatorConfigFile {
    box_size: Option<u32>,
    move_step: Option<i32>,
}

/// Tunables for the edit protocol. Render styling is fixed in `render`.
#[derive(Debug, Clone)]
pub struct AnnotatorConfig {
    /// Side length of user-created boxes, centered on the image.
    pub box_size: u32,
    /// Default translation step for `move_selected`.
    pub move_step: i32,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            box_size: DEFAULT_BOX_SIZE,
            move_step: DEFAULT_MOVE_STEP,
        }
    }
}

impl AnnotatorConfig {
    /// Resolve config: optional JSON file named by `LABELKIT_CONFIG`,
    /// then env overrides, then validation.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("LABELKIT_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => read_config_file(Path::new(path))?,
            None => AnnotatorConfigFile::default(),
        };
        let mut cfg = Self {
            box_size: file_cfg.box_size.unwrap_or(DEFAULT_BOX_SIZE),
            move_step: file_cfg.move_step.unwrap_or(DEFAULT_MOVE_STEP),
        };
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(size) = std::env::var("LABELKIT_BOX_SIZE") {
            self.box_size = size
                .parse()
                .map_err(|_| anyhow!("LABELKIT_BOX_SIZE must be an integer pixel size"))?;
        }
        if let Ok(step) = std::env::var("LABELKIT_MOVE_STEP") {
            self.move_step = step
                .parse()
                .map_err(|_| anyhow!("LABELKIT_MOVE_STEP must be an integer pixel step"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.box_size == 0 {
            return Err(anyhow!("box_size must be greater than zero"));
        }
        if self.move_step <= 0 {
            return Err(anyhow!("move_step must be greater than zero"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<AnnotatorConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
