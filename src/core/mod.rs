pub mod config;
pub mod error;
pub mod geometry;
pub mod model;

pub use config::{BackendConfig, GraderConfig, PreprocessConfig};
pub use error::{DocumentRole, GradeError, Result};
