//! In-memory storage backend
//!
//! Keeps containers as maps from normalized node paths to nodes. Useful for
//! dry runs and for exercising the conversion checks without touching disk.
//! Clones share the same state.

use dsconv_core::{
    normalize_path, parent_paths, ContainerReader, ContainerWriter, ConversionError,
    DatasetAttributes, LocationKind, Result, StorageBackend,
};
use hashbrown::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Group,
    Dataset(DatasetAttributes),
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Container location -> node path -> node. The root node is implicit.
    containers: HashMap<String, HashMap<String, Node>>,
    /// Locations occupied by plain files
    files: HashSet<String>,
}

/// Backend holding all containers in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create an empty container at `location`
    pub fn add_container(&self, location: &str) -> Result<()> {
        let mut state = self.write();
        if state.files.contains(location) {
            return Err(blocked(location));
        }
        state.containers.entry(location.to_string()).or_default();
        Ok(())
    }

    /// Occupy `location` with a plain file
    pub fn add_file(&self, location: &str) -> Result<()> {
        let mut state = self.write();
        if state.containers.contains_key(location) {
            return Err(ConversionError::Io {
                path: location.to_string(),
                reason: "a container already exists here".to_string(),
            });
        }
        state.files.insert(location.to_string());
        Ok(())
    }

    /// Create a group, creating the container if needed
    pub fn insert_group(&self, location: &str, path: &str) -> Result<()> {
        self.open_for_write(location)?.create_group(path)
    }

    /// Create a dataset, creating the container if needed
    pub fn insert_dataset(
        &self,
        location: &str,
        path: &str,
        attributes: &DatasetAttributes,
    ) -> Result<()> {
        self.open_for_write(location)?.create_dataset(path, attributes)
    }
}

impl StorageBackend for MemoryBackend {
    type Reader = MemoryContainer;
    type Writer = MemoryContainer;

    fn open_for_read(&self, location: &str) -> Result<MemoryContainer> {
        match self.location_kind(location) {
            LocationKind::Directory => Ok(self.handle(location)),
            LocationKind::File => Err(ConversionError::BackendUnavailable {
                location: location.to_string(),
                reason: "is not a directory".to_string(),
            }),
            LocationKind::Missing => Err(ConversionError::BackendUnavailable {
                location: location.to_string(),
                reason: "does not exist".to_string(),
            }),
        }
    }

    fn open_for_write(&self, location: &str) -> Result<MemoryContainer> {
        match self.location_kind(location) {
            LocationKind::File => Err(ConversionError::BackendUnavailable {
                location: location.to_string(),
                reason: "is not a directory".to_string(),
            }),
            _ => Ok(self.handle(location)),
        }
    }

    fn location_kind(&self, location: &str) -> LocationKind {
        let state = self.read();
        if state.files.contains(location) {
            LocationKind::File
        } else if state.containers.contains_key(location) {
            LocationKind::Directory
        } else {
            LocationKind::Missing
        }
    }
}

impl MemoryBackend {
    fn handle(&self, location: &str) -> MemoryContainer {
        MemoryContainer {
            location: location.to_string(),
            backend: self.clone(),
        }
    }
}

/// Handle on one in-memory container
#[derive(Debug, Clone)]
pub struct MemoryContainer {
    location: String,
    backend: MemoryBackend,
}

impl MemoryContainer {
    /// Container location this handle was opened with
    pub fn location(&self) -> &str {
        &self.location
    }

    fn node(&self, path: &str) -> Option<Node> {
        let state = self.backend.read();
        let nodes = state.containers.get(&self.location)?;
        let path = normalize_path(path);
        if path.is_empty() {
            return Some(nodes.get(&path).cloned().unwrap_or(Node::Group));
        }
        nodes.get(&path).cloned()
    }

    /// Whether a group or dataset exists at `path`
    pub fn exists(&self, path: &str) -> bool {
        self.node(path).is_some()
    }

    fn insert(&self, path: &str, node: Node) -> Result<()> {
        let mut state = self.backend.write();
        if state.files.contains(&self.location) {
            return Err(blocked(&self.location));
        }

        let path = normalize_path(path);
        let nodes = state.containers.entry(self.location.clone()).or_default();

        let replaces_group = path.is_empty() || matches!(nodes.get(&path), Some(Node::Group));
        if replaces_group && matches!(node, Node::Dataset(_)) {
            return Err(ConversionError::Io {
                path: format!("{}/{path}", self.location),
                reason: "a group already exists here".to_string(),
            });
        }

        for parent in parent_paths(&path) {
            match nodes.get(&parent) {
                Some(Node::Dataset(_)) => {
                    return Err(ConversionError::Io {
                        path: format!("{}/{parent}", self.location),
                        reason: "parent is a dataset".to_string(),
                    });
                }
                Some(Node::Group) => {}
                None => {
                    nodes.insert(parent, Node::Group);
                }
            }
        }

        match node {
            // Creating an existing node as a group keeps it
            Node::Group => {
                nodes.entry(path).or_insert(Node::Group);
            }
            dataset => {
                nodes.insert(path, dataset);
            }
        }
        Ok(())
    }
}

impl ContainerReader for MemoryContainer {
    fn exists(&self, path: &str) -> bool {
        MemoryContainer::exists(self, path)
    }

    fn is_dataset(&self, path: &str) -> Result<bool> {
        Ok(matches!(self.node(path), Some(Node::Dataset(_))))
    }

    fn dataset_attributes(&self, path: &str) -> Result<DatasetAttributes> {
        match self.node(path) {
            Some(Node::Dataset(attributes)) => Ok(attributes),
            _ => Err(ConversionError::DatasetMissing {
                container: self.location.clone(),
                dataset: path.to_string(),
            }),
        }
    }
}

impl ContainerWriter for MemoryContainer {
    fn exists(&self, path: &str) -> bool {
        MemoryContainer::exists(self, path)
    }

    fn create_group(&self, path: &str) -> Result<()> {
        self.insert(path, Node::Group)
    }

    fn create_dataset(&self, path: &str, attributes: &DatasetAttributes) -> Result<()> {
        self.insert(path, Node::Dataset(attributes.clone()))
    }
}

fn blocked(location: &str) -> ConversionError {
    ConversionError::Io {
        path: location.to_string(),
        reason: "location is occupied by a file".to_string(),
    }
}
