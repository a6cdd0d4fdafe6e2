//! dsconv - Pre-flight checks for chunked-array dataset conversion
//!
//! This library checks that converting a dataset from one N5 or Zarr container
//! into another can go ahead: the input must exist and be a dataset, and the
//! output location must be writable without clobbering anything.
//!
//! ## Architecture
//!
//! dsconv follows a clean specification/implementation separation:
//!
//! - **dsconv-core**: Metadata types, error taxonomy, backend traits and pure validation (no I/O)
//! - **dsconv**: Conversion checks plus filesystem and in-memory backends
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dsconv::{ConversionSpec, DatasetKind, FilesystemBackend};
//!
//! fn example() -> dsconv::Result<()> {
//!     let backend = FilesystemBackend::new();
//!     let spec = ConversionSpec::new("/data/raw.n5", "volumes/labels", "/data/out.n5", None)?;
//!
//!     spec.validate_input(&backend)?;
//!     if spec.classify(&backend)? == DatasetKind::Label {
//!         println!("converting {spec} as a label dataset");
//!     }
//!     spec.validate_output(&backend, false)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **N5 and Zarr v2**: Layout inferred from the container location
//! - **Typed failures**: Every failed check has its own error variant
//! - **Batch validation**: Several conversions checked in parallel
//! - **In-memory backend**: Dry runs without touching disk

// Re-export core abstractions and format definitions
pub use dsconv_core::{
    // Backend traits
    ContainerReader, ContainerWriter, LocationKind, StorageBackend,
    // Format definitions
    Compression, DataType, DatasetAttributes, DatasetKind,
    // Error handling
    ConversionError, ErrorCategory, Result,
    // Validation utilities
    check_dimensionality, normalize_path, parse_dataset_descriptor, DatasetDescriptor,
};

// Implementation modules
pub mod batch;
pub mod fs_backend;
pub mod memory_backend;
pub mod spec;

// Public exports
pub use batch::{validate_batch, BatchItem, BatchOutcome, BatchReport};
pub use fs_backend::{ContainerFormat, FilesystemBackend, FsContainer};
pub use memory_backend::{MemoryBackend, MemoryContainer};
pub use spec::ConversionSpec;
