//! Batch configuration.
//!
//! Everything the pipeline needs travels in an explicit
//! [`PrepareConfig`] handed to the entry point; there are no
//! module-level path or region constants. A YAML file can override
//! the built-in defaults, which mirror the NYC sidewalk exports the
//! tool was written for.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tile_mosaic::{GridFallback, DEFAULT_FALLBACK_GRID};
use timeline_common::BoundingBox;

/// Top-level batch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    /// Root of the per-year source exports.
    pub base_dir: PathBuf,

    /// Root of the generated client data directory.
    pub output_dir: PathBuf,

    /// Regions eligible for processing.
    pub regions: Vec<RegionConfig>,

    /// Years to look for, in the order they are processed.
    pub years: Vec<i32>,

    /// Policy for tile sets whose count is not a perfect square.
    #[serde(default)]
    pub grid_policy: GridPolicy,
}

impl PrepareConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: PrepareConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Built-in defaults for the known NYC export areas.
    pub fn builtin(base_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            base_dir,
            output_dir,
            regions: vec![
                RegionConfig {
                    id: "hudson_yards".to_string(),
                    name: "Hudson Yards".to_string(),
                    fallback_bounds: Some(BoundingBox::new(
                        -74.003421, 40.750033, -73.997934, 40.755121,
                    )),
                    layers: default_layers(),
                    layer_colors: default_layer_colors(),
                },
                RegionConfig {
                    id: "east_harlem".to_string(),
                    name: "East Harlem".to_string(),
                    fallback_bounds: Some(BoundingBox::new(
                        -73.979239, 40.777385, -73.970209, 40.784245,
                    )),
                    layers: default_layers(),
                    layer_colors: default_layer_colors(),
                },
            ],
            years: vec![
                2024, 2022, 2020, 2018, 2016, 2014, 2012, 2010, 2008, 2006, 2004,
            ],
            grid_policy: GridPolicy::default(),
        }
    }

    pub fn region(&self, id: &str) -> Option<&RegionConfig> {
        self.regions.iter().find(|r| r.id == id)
    }
}

/// One configured region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Stable identifier; also the prefix of per-year source folders.
    pub id: String,

    /// Display name for the client's region selector.
    pub name: String,

    /// Static bounds used when no vector layer contributed any.
    #[serde(default)]
    pub fallback_bounds: Option<BoundingBox>,

    /// Vector layer names passed through to region metadata.
    #[serde(default)]
    pub layers: Vec<String>,

    /// Display color per layer.
    #[serde(default)]
    pub layer_colors: BTreeMap<String, String>,
}

impl RegionConfig {
    /// Directory and document key for this region's outputs.
    pub fn tile_id(&self) -> String {
        format!("{}_tile_0", self.id)
    }

    /// Configured fallback box, or the generic NYC box.
    pub fn fallback_bounds(&self) -> BoundingBox {
        self.fallback_bounds
            .unwrap_or_else(|| BoundingBox::new(-74.01, 40.70, -73.97, 40.76))
    }
}

/// Degraded-mode grid policy, configurable instead of hardcoded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridPolicy {
    /// Grid dimension assumed for irregular tile counts.
    #[serde(default = "default_fallback_size")]
    pub fallback_size: u32,

    /// Fail the imagery substep instead of assembling a partial mosaic.
    #[serde(default)]
    pub fail_on_irregular: bool,
}

impl Default for GridPolicy {
    fn default() -> Self {
        Self {
            fallback_size: DEFAULT_FALLBACK_GRID,
            fail_on_irregular: false,
        }
    }
}

impl GridPolicy {
    pub fn fallback(&self) -> GridFallback {
        if self.fail_on_irregular {
            GridFallback::Fail
        } else {
            GridFallback::FixedSize(self.fallback_size)
        }
    }
}

fn default_fallback_size() -> u32 {
    DEFAULT_FALLBACK_GRID
}

fn default_layers() -> Vec<String> {
    vec![
        "sidewalk".to_string(),
        "road".to_string(),
        "crosswalk".to_string(),
    ]
}

fn default_layer_colors() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("sidewalk".to_string(), "#4A90E2".to_string()),
        ("road".to_string(), "#FF6B6B".to_string()),
        ("crosswalk".to_string(), "#4ECDC4".to_string()),
    ])
}
