//! Geographic bounding box type and aggregation.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in WGS84 degrees.
///
/// Serialized with the `west`/`south`/`east`/`north` field names the
/// map client reads from region metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its four extents.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Componentwise union with another box.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }

    /// Grow this box to include a single coordinate position.
    pub fn expand_to(&mut self, lon: f64, lat: f64) {
        self.west = self.west.min(lon);
        self.south = self.south.min(lat);
        self.east = self.east.max(lon);
        self.north = self.north.max(lat);
    }

    /// Degenerate box covering exactly one position. Useful as a
    /// starting point for [`BoundingBox::expand_to`].
    pub fn around_point(lon: f64, lat: f64) -> Self {
        Self {
            west: lon,
            south: lat,
            east: lon,
            north: lat,
        }
    }
}

/// Merge a sequence of per-year boxes into one overall box.
///
/// Componentwise min of west/south, max of east/north. Returns `None`
/// for an empty sequence; the caller substitutes the region's
/// statically configured fallback box. Boxes with inverted extents
/// (west > east) propagate as-is, no validation is performed.
pub fn aggregate<'a, I>(boxes: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a BoundingBox>,
{
    boxes
        .into_iter()
        .copied()
        .reduce(|acc, b| acc.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_two_boxes() {
        let boxes = vec![
            BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            BoundingBox::new(-1.0, -1.0, 0.5, 0.5),
        ];

        let merged = aggregate(&boxes).unwrap();
        assert_eq!(merged.west, -1.0);
        assert_eq!(merged.south, -1.0);
        assert_eq!(merged.east, 1.0);
        assert_eq!(merged.north, 1.0);
    }

    #[test]
    fn test_aggregate_empty_is_none() {
        assert_eq!(aggregate(&[]), None);
    }

    #[test]
    fn test_aggregate_single_box_is_identity() {
        let b = BoundingBox::new(-74.0, 40.7, -73.9, 40.8);
        assert_eq!(aggregate(std::iter::once(&b)), Some(b));
    }

    #[test]
    fn test_malformed_boxes_propagate_unvalidated() {
        // west > east is not rejected, it flows through the reduce
        let boxes = vec![BoundingBox::new(5.0, 0.0, 1.0, 1.0)];
        let merged = aggregate(&boxes).unwrap();
        assert_eq!(merged.west, 5.0);
        assert_eq!(merged.east, 1.0);
    }

    #[test]
    fn test_expand_to() {
        let mut b = BoundingBox::around_point(-73.99, 40.75);
        b.expand_to(-74.01, 40.74);
        b.expand_to(-73.97, 40.76);
        assert_eq!(b.west, -74.01);
        assert_eq!(b.south, 40.74);
        assert_eq!(b.east, -73.97);
        assert_eq!(b.north, 40.76);
    }
}
