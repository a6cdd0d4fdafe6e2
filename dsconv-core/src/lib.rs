#![no_std]

//! dsconv core - Dataset Conversion Definitions
//!
//! This crate provides the metadata types, error taxonomy, storage backend
//! traits and pure validation helpers used to check a chunked-array dataset
//! conversion before it runs. It performs no I/O.

extern crate alloc;

pub mod error;
pub mod format;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
pub use traits::*;
pub use validation::*;
