//! Dataset metadata definitions shared by all storage backends
//!
//! Pure data structures describing datasets inside N5 and Zarr containers.
//! No I/O happens here.

pub mod attributes;
pub mod constants;
pub mod data_type;
pub mod kind;

pub use attributes::{Compression, DatasetAttributes};
pub use data_type::DataType;
pub use kind::DatasetKind;
