//! Region metadata documents consumed by the map client.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::BoundingBox;

/// Metadata written once per region after all of its years are processed.
///
/// `years` holds only years that produced at least one output, sorted
/// descending so the client's timeline starts at the most recent year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionMetadata {
    /// Stable identifier, also the region's directory name under `tiles/`.
    pub tile_id: String,

    /// Human-readable region name for the selector UI.
    pub name: String,

    /// Overall geographic extent of the region's vector layers.
    pub bounds: BoundingBox,

    /// Years with data, descending.
    pub years: Vec<i32>,

    /// Vector layer names present in the network files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<String>,

    /// Display color per layer, as `#rrggbb` strings.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub layer_colors: BTreeMap<String, String>,
}

impl RegionMetadata {
    /// The region-index entry for this metadata document.
    pub fn summary(&self) -> RegionSummary {
        RegionSummary {
            tile_id: self.tile_id.clone(),
            name: self.name.clone(),
            bounds: self.bounds,
        }
    }
}

/// One entry of the region index document used to populate the
/// client's region selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSummary {
    pub tile_id: String,
    pub name: String,
    pub bounds: BoundingBox,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_round_trips_through_json() {
        let meta = RegionMetadata {
            tile_id: "hudson_yards_tile_0".to_string(),
            name: "Hudson Yards".to_string(),
            bounds: BoundingBox::new(-74.003421, 40.750033, -73.997934, 40.755121),
            years: vec![2024, 2022, 2020],
            layers: vec!["sidewalk".to_string(), "road".to_string()],
            layer_colors: BTreeMap::from([("sidewalk".to_string(), "#4A90E2".to_string())]),
        };

        let json = serde_json::to_string_pretty(&meta).unwrap();
        let back: RegionMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tile_id, meta.tile_id);
        assert_eq!(back.years, vec![2024, 2022, 2020]);
        assert_eq!(back.bounds, meta.bounds);
    }

    #[test]
    fn test_empty_layer_fields_are_omitted() {
        let meta = RegionMetadata {
            tile_id: "r".to_string(),
            name: "R".to_string(),
            bounds: BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            years: vec![],
            layers: vec![],
            layer_colors: BTreeMap::new(),
        };

        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("layers"));
        assert!(!json.contains("layer_colors"));
    }

    #[test]
    fn test_summary_carries_bounds() {
        let meta = RegionMetadata {
            tile_id: "east_harlem_tile_0".to_string(),
            name: "East Harlem".to_string(),
            bounds: BoundingBox::new(-73.979239, 40.777385, -73.970209, 40.784245),
            years: vec![2024],
            layers: vec![],
            layer_colors: BTreeMap::new(),
        };

        let summary = meta.summary();
        assert_eq!(summary.tile_id, "east_harlem_tile_0");
        assert_eq!(summary.bounds, meta.bounds);
    }
}
