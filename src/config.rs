// src/config.rs

use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::params::SimParams;
use crate::visualisation::FIGURE_PREFIX;

/// Record of one build run, written as config.json beside the snapshots so a
/// data directory is self-describing.
#[derive(Serialize)]
pub struct RunConfig {
    pub grid: GridConfig,
    pub physics: PhysicsConfig,
    pub output: OutputConfig,
}

#[derive(Serialize)]
pub struct GridConfig {
    pub n_cells: usize,
    pub n_ghost: usize,
    pub domain_length: f64,
}

#[derive(Serialize)]
pub struct PhysicsConfig {
    pub cfl: f64,
    pub heat_capacity_ratio: f64,
    pub evolution_time: f64,
}

#[derive(Serialize)]
pub struct OutputConfig {
    pub data_dir: String,
    pub figure_prefix: String,
}

impl RunConfig {
    pub fn from_params(params: &SimParams, data_dir: &Path) -> Self {
        Self {
            grid: GridConfig {
                n_cells: params.n_cells,
                n_ghost: params.n_ghost,
                domain_length: params.domain_length,
            },
            physics: PhysicsConfig {
                cfl: params.cfl,
                heat_capacity_ratio: params.gamma,
                evolution_time: params.evolution_time,
            },
            output: OutputConfig {
                data_dir: data_dir.display().to_string(),
                figure_prefix: FIGURE_PREFIX.to_string(),
            },
        }
    }

    pub fn write_to_dir(&self, out_dir: &Path) -> std::io::Result<()> {
        let path = out_dir.join("config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
