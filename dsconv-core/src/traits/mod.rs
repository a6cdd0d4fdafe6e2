//! Abstract interfaces for storage backends
//!
//! This module defines the collaborator contract the conversion checks rely on.
//! Traits are pure interfaces - implementations live in `dsconv`.

pub mod backend;

pub use backend::{ContainerReader, ContainerWriter, LocationKind, StorageBackend};
