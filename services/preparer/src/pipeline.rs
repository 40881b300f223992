//! Per-region, per-year batch pipeline.
//!
//! Drives the two substeps (network layer conversion, tile mosaic
//! assembly) for every configured year of a region, then writes the
//! region's metadata document. Substep failures degrade the output
//! for that year and are recorded in the report; they never abort the
//! batch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};
use walkdir::WalkDir;

use tile_mosaic::{assemble, discover_tiles, read_tile_side, resolve_grid_size};
use timeline_common::{bbox, BoundingBox, RegionMetadata, RegionReport, StepOutcome, YearReport};
use vector_layer::{find_layer_file, load_layer};

use crate::config::{PrepareConfig, RegionConfig};

/// Process every configured year of one region and write its outputs.
pub fn process_region(config: &PrepareConfig, region: &RegionConfig) -> Result<RegionReport> {
    let tile_id = region.tile_id();
    let tile_dir = config.output_dir.join("tiles").join(&tile_id);
    let imagery_dir = tile_dir.join("imagery");
    let networks_dir = tile_dir.join("networks");
    for dir in [&imagery_dir, &networks_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    info!(region = %region.id, tile_id = %tile_id, "processing region");

    let mut report = RegionReport::new(&region.id, &tile_id);
    let mut bounds_list: Vec<BoundingBox> = Vec::new();

    for &year in &config.years {
        let year_dir = config
            .base_dir
            .join(year.to_string())
            .join(format!("{}_{}", region.id, year));

        if !year_dir.is_dir() {
            warn!(year, path = %year_dir.display(), "year folder not found, skipping");
            let skipped = StepOutcome::Skipped {
                reason: "year folder not found".to_string(),
            };
            report.years.push(YearReport {
                year,
                imagery: skipped.clone(),
                network: skipped,
            });
            continue;
        }

        let network = network_step(&year_dir, &networks_dir, year, &mut bounds_list);
        let imagery = imagery_step(config, &year_dir, &imagery_dir, year);
        report.years.push(YearReport {
            year,
            imagery,
            network,
        });
    }

    let bounds = match bbox::aggregate(&bounds_list) {
        Some(b) => b,
        None => {
            warn!(region = %region.id, "no layer bounds available, using configured fallback");
            region.fallback_bounds()
        }
    };

    let metadata = RegionMetadata {
        tile_id: tile_id.clone(),
        name: region.name.clone(),
        bounds,
        years: report.available_years(),
        layers: region.layers.clone(),
        layer_colors: region.layer_colors.clone(),
    };
    write_json(&tile_dir.join("metadata.json"), &metadata)?;

    info!(
        region = %region.id,
        available_years = metadata.years.len(),
        failed_years = report.failed_years().len(),
        "region complete"
    );

    Ok(report)
}

/// Convert the year's vector layer and record its bounds.
fn network_step(
    year_dir: &Path,
    networks_dir: &Path,
    year: i32,
    bounds_list: &mut Vec<BoundingBox>,
) -> StepOutcome {
    let poly_dir = year_dir.join("polygons");
    if !poly_dir.is_dir() {
        warn!(year, "no polygons folder found");
        return StepOutcome::Skipped {
            reason: "no polygons folder".to_string(),
        };
    }

    let Some(layer_file) = find_layer_file(&poly_dir) else {
        warn!(year, "no geojson layer found in polygons folder");
        return StepOutcome::Skipped {
            reason: "no geojson layer found".to_string(),
        };
    };

    let layer = match load_layer(&layer_file) {
        Ok(layer) => layer,
        Err(e) => {
            warn!(year, error = %e, "layer conversion failed");
            return failed(e);
        }
    };

    if let Err(e) = layer.write_to(&networks_dir.join(format!("{year}.geojson"))) {
        warn!(year, error = %e, "writing network layer failed");
        return failed(e);
    }

    if let Some(b) = layer.bounds {
        bounds_list.push(b);
    }

    info!(year, features = layer.feature_count, "network layer written");
    StepOutcome::Completed {
        detail: format!("{} features", layer.feature_count),
    }
}

/// Stitch the year's tile export into one mosaic image.
fn imagery_step(
    config: &PrepareConfig,
    year_dir: &Path,
    imagery_dir: &Path,
    year: i32,
) -> StepOutcome {
    let stitched_dir = year_dir.join("tiles").join("stitched");
    if !stitched_dir.is_dir() {
        warn!(year, "no stitched tiles folder found");
        return StepOutcome::Skipped {
            reason: "no stitched tiles folder".to_string(),
        };
    }

    let Some(tiles_folder) = first_subdirectory(&stitched_dir) else {
        warn!(year, "no tile subfolder found under stitched/");
        return StepOutcome::Skipped {
            reason: "no tile subfolder".to_string(),
        };
    };

    let tiles = match discover_tiles(&tiles_folder) {
        Ok(tiles) => tiles,
        Err(e) => return failed(e),
    };
    if tiles.is_empty() {
        warn!(year, folder = %tiles_folder.display(), "no tile images found");
        return StepOutcome::Skipped {
            reason: "no tile images found".to_string(),
        };
    }

    // side length comes from the first tile of the set
    let tile_side = match read_tile_side(&tiles[0].path) {
        Ok(side) => side,
        Err(e) => {
            warn!(year, error = %e, "image stitching failed");
            return failed(e);
        }
    };

    let grid_size = match resolve_grid_size(tiles.len(), config.grid_policy.fallback()) {
        Ok(size) => size,
        Err(e) => {
            warn!(year, error = %e, "image stitching failed");
            return failed(e);
        }
    };

    let (canvas, stats) = match assemble(&tiles, grid_size, tile_side) {
        Ok(result) => result,
        Err(e) => {
            warn!(year, error = %e, "image stitching failed");
            return failed(e);
        }
    };

    let out_path = imagery_dir.join(format!("{year}.png"));
    if let Err(e) = canvas.save(&out_path) {
        warn!(year, error = %e, "writing mosaic failed");
        return failed(e);
    }

    info!(
        year,
        placed = stats.placed,
        total = stats.total,
        grid_size,
        "mosaic written"
    );
    StepOutcome::Completed {
        detail: stats.summary(grid_size),
    }
}

/// Build the region index from every metadata document under the
/// output directory, including regions written by earlier runs.
pub fn write_region_index(output_dir: &Path) -> Result<usize> {
    let tiles_root = output_dir.join("tiles");
    let mut summaries = Vec::new();

    for entry in WalkDir::new(&tiles_root)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_name() != "metadata.json" {
            continue;
        }
        let raw = fs::read_to_string(entry.path())
            .with_context(|| format!("reading {}", entry.path().display()))?;
        let metadata: RegionMetadata = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", entry.path().display()))?;
        summaries.push(metadata.summary());
    }

    write_json(&output_dir.join("regions.json"), &summaries)?;
    Ok(summaries.len())
}

/// Persist the machine-readable run report.
pub fn write_run_report(output_dir: &Path, reports: &[RegionReport]) -> Result<()> {
    write_json(&output_dir.join("report.json"), &reports)
}

fn first_subdirectory(dir: &Path) -> Option<PathBuf> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs.into_iter().next()
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

fn failed(error: impl std::error::Error + Send + Sync + 'static) -> StepOutcome {
    StepOutcome::Failed {
        error: format!("{:#}", anyhow::Error::new(error)),
    }
}
