//! Validation utilities for conversion requests
//!
//! This module contains pure functions with no I/O dependencies: path
//! normalization, descriptor parsing and dataset shape checks.

pub mod descriptor;
pub mod dimensions;
pub mod paths;

pub use descriptor::{parse_dataset_descriptor, DatasetDescriptor};
pub use dimensions::check_dimensionality;
pub use paths::{normalize_path, parent_paths};
