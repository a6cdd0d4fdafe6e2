//! Filesystem backend for N5 and Zarr v2 containers
//!
//! A container is a directory. Groups and datasets are sub-directories whose
//! metadata files decide what they are; the layout specific parts live in the
//! `n5` and `zarr` submodules.

mod n5;
mod zarr;

use dsconv_core::{
    normalize_path, parent_paths, ContainerReader, ContainerWriter, ConversionError,
    DatasetAttributes, LocationKind, Result, StorageBackend,
};
use log::debug;
use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

/// On-disk layout of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    /// N5: `attributes.json` in every node
    N5,
    /// Zarr v2: `.zarray` / `.zgroup` marker files
    Zarr,
}

impl ContainerFormat {
    /// Infer the layout from a container location
    ///
    /// Locations ending in `.zarr` are Zarr, everything else is N5.
    pub fn from_location(location: &str) -> Self {
        let trimmed = location.trim_end_matches(['/', '\\']);
        let is_zarr = trimmed
            .len()
            .checked_sub(dsconv_core::constants::zarr::EXTENSION.len())
            .and_then(|start| trimmed.get(start..))
            .is_some_and(|suffix| {
                suffix.eq_ignore_ascii_case(dsconv_core::constants::zarr::EXTENSION)
            });

        if is_zarr {
            ContainerFormat::Zarr
        } else {
            ContainerFormat::N5
        }
    }
}

impl FromStr for ContainerFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n5" => Ok(ContainerFormat::N5),
            "zarr" => Ok(ContainerFormat::Zarr),
            other => Err(format!("unknown container format `{other}`, expected n5 or zarr")),
        }
    }
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerFormat::N5 => write!(f, "n5"),
            ContainerFormat::Zarr => write!(f, "zarr"),
        }
    }
}

/// Backend that opens containers on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemBackend {
    format: Option<ContainerFormat>,
}

impl FilesystemBackend {
    /// Backend that infers the layout from each location
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that always uses `format`
    pub fn with_format(format: ContainerFormat) -> Self {
        Self {
            format: Some(format),
        }
    }

    /// Layout used for `location`
    pub fn format_for(&self, location: &str) -> ContainerFormat {
        self.format
            .unwrap_or_else(|| ContainerFormat::from_location(location))
    }
}

impl StorageBackend for FilesystemBackend {
    type Reader = FsContainer;
    type Writer = FsContainer;

    fn open_for_read(&self, location: &str) -> Result<FsContainer> {
        let format = self.format_for(location);
        debug!("Opening {format} container {location} for reading");

        match self.location_kind(location) {
            LocationKind::Directory => {}
            LocationKind::Missing => return Err(unavailable(location, "does not exist")),
            LocationKind::File => return Err(unavailable(location, "is not a directory")),
        }

        let container = FsContainer::new(location, format);
        if format == ContainerFormat::N5 {
            n5::check_version(&container.root).map_err(|reason| unavailable(location, &reason))?;
        }
        Ok(container)
    }

    fn open_for_write(&self, location: &str) -> Result<FsContainer> {
        let format = self.format_for(location);
        debug!("Opening {format} container {location} for writing");

        if self.location_kind(location) == LocationKind::File {
            return Err(unavailable(location, "is not a directory"));
        }
        Ok(FsContainer::new(location, format))
    }

    fn location_kind(&self, location: &str) -> LocationKind {
        match fs::metadata(location) {
            Ok(metadata) if metadata.is_dir() => LocationKind::Directory,
            Ok(_) => LocationKind::File,
            Err(_) => LocationKind::Missing,
        }
    }
}

/// Handle on one container directory
#[derive(Debug, Clone)]
pub struct FsContainer {
    location: String,
    root: PathBuf,
    format: ContainerFormat,
}

impl FsContainer {
    fn new(location: &str, format: ContainerFormat) -> Self {
        Self {
            location: location.to_string(),
            root: PathBuf::from(location),
            format,
        }
    }

    /// Container location this handle was opened with
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Layout of this container
    pub fn format(&self) -> ContainerFormat {
        self.format
    }

    /// Directory of the node at `path`
    fn node_dir(&self, path: &str) -> PathBuf {
        resolve(&self.root, path)
    }

    /// Whether a group or dataset exists at `path`
    pub fn exists(&self, path: &str) -> bool {
        let dir = self.node_dir(path);
        match self.format {
            ContainerFormat::N5 => dir.is_dir(),
            ContainerFormat::Zarr => zarr::node_exists(&dir, normalize_path(path).is_empty()),
        }
    }

    fn node_is_dataset(&self, path: &str) -> Result<bool> {
        let dir = self.node_dir(path);
        match self.format {
            ContainerFormat::N5 => n5::is_dataset(&dir),
            ContainerFormat::Zarr => zarr::is_dataset(&dir),
        }
    }

    /// Datasets are leaves: nothing goes below one, and a dataset never replaces a group
    fn check_placement(&self, path: &str, as_dataset: bool) -> Result<()> {
        for parent in parent_paths(path) {
            if self.node_is_dataset(&parent)? {
                return Err(conflict(&self.node_dir(&parent), "parent is a dataset"));
            }
        }

        let is_group = path.is_empty() || (self.exists(path) && !self.node_is_dataset(path)?);
        if as_dataset && is_group {
            return Err(conflict(&self.node_dir(path), "a group already exists here"));
        }
        Ok(())
    }
}

impl ContainerReader for FsContainer {
    fn exists(&self, path: &str) -> bool {
        FsContainer::exists(self, path)
    }

    fn is_dataset(&self, path: &str) -> Result<bool> {
        self.node_is_dataset(path)
    }

    fn dataset_attributes(&self, path: &str) -> Result<DatasetAttributes> {
        let dir = self.node_dir(path);
        let attributes = match self.format {
            ContainerFormat::N5 => n5::dataset_attributes(&dir)?,
            ContainerFormat::Zarr => zarr::dataset_attributes(&dir)?,
        };

        attributes.ok_or_else(|| ConversionError::DatasetMissing {
            container: self.location.clone(),
            dataset: path.to_string(),
        })
    }
}

impl ContainerWriter for FsContainer {
    fn exists(&self, path: &str) -> bool {
        FsContainer::exists(self, path)
    }

    fn create_group(&self, path: &str) -> Result<()> {
        debug!("Creating group {path} in {}", self.location);
        let path = normalize_path(path);
        self.check_placement(&path, false)?;
        match self.format {
            ContainerFormat::N5 => n5::create_group(&self.root, &path),
            ContainerFormat::Zarr => zarr::create_group(&self.root, &path),
        }
    }

    fn create_dataset(&self, path: &str, attributes: &DatasetAttributes) -> Result<()> {
        debug!(
            "Creating {} dataset {path} with dimensions {:?} in {}",
            attributes.data_type, attributes.dimensions, self.location
        );
        let path = normalize_path(path);
        self.check_placement(&path, true)?;
        match self.format {
            ContainerFormat::N5 => n5::create_dataset(&self.root, &path, attributes),
            ContainerFormat::Zarr => zarr::create_dataset(&self.root, &path, attributes),
        }
    }
}

/// Directory of the node at `path` below `root`
fn resolve(root: &Path, path: &str) -> PathBuf {
    let mut dir = root.to_path_buf();
    for segment in normalize_path(path).split('/').filter(|s| !s.is_empty()) {
        dir.push(segment);
    }
    dir
}

fn unavailable(location: &str, reason: &str) -> ConversionError {
    ConversionError::BackendUnavailable {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}

/// A write that would break the group/dataset hierarchy at `path`
fn conflict(path: &Path, reason: &str) -> ConversionError {
    ConversionError::Io {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Map an I/O failure at `path` into a conversion error
fn io_error(path: &Path, err: io::Error) -> ConversionError {
    ConversionError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Read a JSON metadata file, `Ok(None)` if it does not exist
fn read_json(path: &Path) -> Result<Option<serde_json::Value>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_error(path, err)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|err| invalid_metadata(path, err))
}

/// Write a JSON metadata file, creating its directory
fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| io_error(parent, err))?;
    }
    let bytes = serde_json::to_vec_pretty(value).map_err(|err| invalid_metadata(path, err))?;
    fs::write(path, bytes).map_err(|err| io_error(path, err))
}

fn invalid_metadata(path: &Path, err: impl std::fmt::Display) -> ConversionError {
    ConversionError::InvalidMetadata {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
