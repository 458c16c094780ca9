use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::flock::{UpdateMode, check_world};
use crate::Parameters;

/// Everything a run needs. Missing fields in a config file fall back to the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: u32,
    pub height: u32,
    pub boids: usize,
    pub frames: usize,
    /// Fixed seed for a reproducible run; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    pub mode: UpdateMode,
    pub output: PathBuf,
    pub render: bool,
    /// Hex colour the boids are drawn in.
    pub colour: String,
    /// Share of the previous frame's brightness removed before drawing.
    pub trail_fade: f32,
    pub params: Parameters,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            width: 800,
            height: 600,
            boids: 100,
            frames: 1000,
            seed: None,
            mode: UpdateMode::Sequential,
            output: PathBuf::from("./frames"),
            render: true,
            colour: "#34D399".to_string(),
            trail_fade: 0.1,
            params: Parameters::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_world(self.width, self.height)?;
        self.params.validate()
    }
}
