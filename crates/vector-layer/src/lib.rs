//! Per-year GeoJSON network layers.
//!
//! Loads a year's vector layer, computes the bounding box of its
//! features, and writes a normalized pretty-printed copy for the map
//! client. Inputs are expected in WGS84 already; documents declaring
//! another CRS are rejected rather than reprojected.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use timeline_common::BoundingBox;

#[derive(Debug, Error)]
pub enum VectorError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("layer declares unsupported CRS {name}, expected WGS84")]
    UnsupportedCrs { name: String },

    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A loaded per-year vector layer.
#[derive(Debug, Clone)]
pub struct NetworkLayer {
    document: Value,
    pub feature_count: usize,
    /// Componentwise extent of every coordinate position in the
    /// document; `None` when the document carries no positions.
    pub bounds: Option<BoundingBox>,
}

impl NetworkLayer {
    /// Write the layer as 2-space-indented JSON.
    pub fn write_to(&self, path: &Path) -> Result<(), VectorError> {
        let json = serde_json::to_string_pretty(&self.document).map_err(|source| {
            VectorError::Serialize {
                path: path.to_path_buf(),
                source,
            }
        })?;
        std::fs::write(path, json).map_err(|source| VectorError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Find the year's GeoJSON file under `dir`, searched recursively.
///
/// The original exports nest the layer inside a per-format subfolder,
/// so the lookup walks the tree and takes the first `.geojson` in
/// lexical path order.
pub fn find_layer_file(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .and_then(|x| x.to_str())
                    .map(|x| x.eq_ignore_ascii_case("geojson"))
                    .unwrap_or(false)
        })
        .map(|e| e.into_path())
}

/// Load and validate a GeoJSON layer file.
pub fn load_layer(path: &Path) -> Result<NetworkLayer, VectorError> {
    let raw = std::fs::read_to_string(path).map_err(|source| VectorError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&raw).map_err(|source| VectorError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    check_crs(&document)?;

    let feature_count = feature_count(&document);
    let bounds = layer_bounds(&document);
    debug!(path = %path.display(), feature_count, "loaded network layer");

    Ok(NetworkLayer {
        document,
        feature_count,
        bounds,
    })
}

/// Reject documents that declare a non-WGS84 CRS via the legacy
/// GeoJSON `crs` member. Plain documents are WGS84 by the spec.
fn check_crs(document: &Value) -> Result<(), VectorError> {
    let Some(name) = document
        .get("crs")
        .and_then(|c| c.get("properties"))
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
    else {
        return Ok(());
    };

    if name.contains("4326") || name.contains("CRS84") {
        Ok(())
    } else {
        Err(VectorError::UnsupportedCrs {
            name: name.to_string(),
        })
    }
}

/// Number of features in the document (1 for a bare Feature/geometry).
pub fn feature_count(document: &Value) -> usize {
    match document.get("features").and_then(|f| f.as_array()) {
        Some(features) => features.len(),
        None => 1,
    }
}

/// Bounding box over every coordinate position in the document.
pub fn layer_bounds(document: &Value) -> Option<BoundingBox> {
    let mut bounds: Option<BoundingBox> = None;
    collect_bounds(document, &mut bounds);
    bounds
}

fn collect_bounds(value: &Value, bounds: &mut Option<BoundingBox>) {
    if let Some(features) = value.get("features").and_then(|f| f.as_array()) {
        for feature in features {
            collect_bounds(feature, bounds);
        }
        return;
    }
    if let Some(geometry) = value.get("geometry") {
        collect_bounds(geometry, bounds);
        return;
    }
    if let Some(geometries) = value.get("geometries").and_then(|g| g.as_array()) {
        for geometry in geometries {
            collect_bounds(geometry, bounds);
        }
        return;
    }
    if let Some(coordinates) = value.get("coordinates") {
        walk_positions(coordinates, bounds);
    }
}

/// Recurse into nested coordinate arrays down to individual
/// `[lon, lat, ...]` positions.
fn walk_positions(value: &Value, bounds: &mut Option<BoundingBox>) {
    let Some(items) = value.as_array() else {
        return;
    };

    if let (Some(lon), Some(lat)) = (
        items.first().and_then(|v| v.as_f64()),
        items.get(1).and_then(|v| v.as_f64()),
    ) {
        match bounds {
            Some(b) => b.expand_to(lon, lat),
            None => *bounds = Some(BoundingBox::around_point(lon, lat)),
        }
        return;
    }

    for item in items {
        walk_positions(item, bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feature_collection_bounds() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[-74.0, 40.75], [-73.99, 40.76]]
                    },
                    "properties": {}
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [-74.01, 40.74]
                    },
                    "properties": {}
                }
            ]
        });

        let bounds = layer_bounds(&doc).unwrap();
        assert_eq!(bounds, BoundingBox::new(-74.01, 40.74, -73.99, 40.76));
        assert_eq!(feature_count(&doc), 2);
    }

    #[test]
    fn test_multipolygon_rings_are_walked() {
        let doc = json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                [[[-2.0, -2.0], [-1.0, -2.0], [-1.0, -1.0], [-2.0, -2.0]]]
            ]
        });

        let bounds = layer_bounds(&doc).unwrap();
        assert_eq!(bounds, BoundingBox::new(-2.0, -2.0, 1.0, 1.0));
    }

    #[test]
    fn test_geometry_collection() {
        let doc = json!({
            "type": "GeometryCollection",
            "geometries": [
                { "type": "Point", "coordinates": [5.0, 6.0] },
                { "type": "Point", "coordinates": [-5.0, -6.0] }
            ]
        });

        let bounds = layer_bounds(&doc).unwrap();
        assert_eq!(bounds, BoundingBox::new(-5.0, -6.0, 5.0, 6.0));
    }

    #[test]
    fn test_empty_collection_has_no_bounds() {
        let doc = json!({ "type": "FeatureCollection", "features": [] });
        assert_eq!(layer_bounds(&doc), None);
        assert_eq!(feature_count(&doc), 0);
    }

    #[test]
    fn test_projected_crs_is_rejected() {
        let doc = json!({
            "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::2263" } },
            "features": []
        });
        assert!(matches!(
            check_crs(&doc),
            Err(VectorError::UnsupportedCrs { .. })
        ));
    }

    #[test]
    fn test_wgs84_crs_declarations_pass() {
        for name in ["urn:ogc:def:crs:OGC:1.3:CRS84", "EPSG:4326"] {
            let doc = json!({
                "crs": { "type": "name", "properties": { "name": name } }
            });
            assert!(check_crs(&doc).is_ok());
        }
    }

    #[test]
    fn test_load_layer_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("shapefile_export");
        std::fs::create_dir(&nested).unwrap();
        let path = nested.join("2024.geojson");
        std::fs::write(
            &path,
            serde_json::to_string(&json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-73.98, 40.78] },
                    "properties": {}
                }]
            }))
            .unwrap(),
        )
        .unwrap();

        let found = find_layer_file(dir.path()).unwrap();
        assert_eq!(found, path);

        let layer = load_layer(&found).unwrap();
        assert_eq!(layer.feature_count, 1);
        assert_eq!(
            layer.bounds.unwrap(),
            BoundingBox::new(-73.98, 40.78, -73.98, 40.78)
        );

        let out = dir.path().join("out.geojson");
        layer.write_to(&out).unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        // 2-space indentation from the pretty printer
        assert!(written.contains("\n  \"type\""));
    }
}
