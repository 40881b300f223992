//! Library surface of the preparer service, exposed for integration
//! tests and embedding.

pub mod config;
pub mod pipeline;

pub use config::{GridPolicy, PrepareConfig, RegionConfig};
pub use pipeline::{process_region, write_region_index, write_run_report};
