//! Common types shared across the timeline preparation crates.

pub mod bbox;
pub mod region;
pub mod report;

pub use bbox::BoundingBox;
pub use region::{RegionMetadata, RegionSummary};
pub use report::{RegionReport, StepOutcome, YearReport};
