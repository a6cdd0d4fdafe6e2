//! Storage backend traits for chunked-array containers
//!
//! A backend opens containers by location and hands out short-lived reader
//! and writer handles. Paths inside a container are `/`-separated and are
//! normalized by the backend.

use crate::{DatasetAttributes, Result};

/// What occupies a container location on the storage medium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    /// Nothing exists at the location
    Missing,
    /// A directory-like node that can hold a container
    Directory,
    /// A plain file that blocks container creation
    File,
}

impl LocationKind {
    /// Whether anything exists at the location
    pub const fn exists(self) -> bool {
        !matches!(self, LocationKind::Missing)
    }
}

/// Read access to one container
pub trait ContainerReader {
    /// Whether a group or dataset exists at `path`
    fn exists(&self, path: &str) -> bool;

    /// Whether `path` is a leaf dataset rather than a group
    ///
    /// Metadata that cannot be read or parsed is an error, never `false`.
    fn is_dataset(&self, path: &str) -> Result<bool>;

    /// Attributes of the dataset at `path`
    ///
    /// Fails with [`crate::ConversionError::DatasetMissing`] when `path` holds
    /// no dataset attributes.
    fn dataset_attributes(&self, path: &str) -> Result<DatasetAttributes>;
}

/// Write access to one container
///
/// Opening a writer must not create anything on the storage medium. The
/// container comes into existence with the first `create_*` call.
///
/// Datasets are leaves: creating a group or dataset below an existing dataset
/// fails, and so does creating a dataset where a group already exists.
/// Creating a group over an existing node leaves it untouched; creating a
/// dataset over an existing dataset replaces its attributes.
pub trait ContainerWriter {
    /// Whether a group or dataset exists at `path`
    fn exists(&self, path: &str) -> bool;

    /// Create a group and all missing parents
    fn create_group(&self, path: &str) -> Result<()>;

    /// Create a dataset and all missing parent groups
    fn create_dataset(&self, path: &str, attributes: &DatasetAttributes) -> Result<()>;
}

/// Trait for backends that can open chunked-array containers
///
/// Backends may be shared between threads; handles are acquired and dropped
/// within a single check.
pub trait StorageBackend {
    /// Reader handle type
    type Reader: ContainerReader;

    /// Writer handle type
    type Writer: ContainerWriter;

    /// Open an existing container for reading
    ///
    /// Fails with [`crate::ConversionError::BackendUnavailable`] when the
    /// container cannot be opened.
    fn open_for_read(&self, location: &str) -> Result<Self::Reader>;

    /// Open a container for writing without creating it
    fn open_for_write(&self, location: &str) -> Result<Self::Writer>;

    /// Probe what occupies `location`, independent of any handle
    fn location_kind(&self, location: &str) -> LocationKind;
}
