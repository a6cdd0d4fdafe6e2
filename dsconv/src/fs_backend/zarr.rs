//! Zarr v2 layout: arrays are marked by `.zarray`, groups by `.zgroup`
//!
//! Zarr lists `shape` and `chunks` slowest-varying first for C-order arrays.
//! They are reversed on the way in and out so callers always see the N5 axis
//! order.

use super::{invalid_metadata, io_error, read_json, resolve, write_json};
use dsconv_core::constants::zarr::*;
use dsconv_core::{parent_paths, Compression, DataType, DatasetAttributes, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{fs, path::Path};

/// Contents of a `.zarray` file
#[derive(Debug, Serialize, Deserialize)]
struct ArrayMetadata {
    zarr_format: u64,
    shape: Vec<u64>,
    chunks: Vec<u32>,
    dtype: String,
    #[serde(default)]
    compressor: Option<Value>,
    #[serde(default)]
    fill_value: Value,
    #[serde(default = "default_order")]
    order: String,
    #[serde(default)]
    filters: Option<Value>,
}

fn default_order() -> String {
    "C".to_string()
}

impl ArrayMetadata {
    fn from_attributes(attributes: &DatasetAttributes) -> Self {
        let compressor = attributes
            .compression
            .as_ref()
            .filter(|compression| compression.name != "raw")
            .map(|compression| json!({ "id": compression.name }));

        Self {
            zarr_format: FORMAT_VERSION,
            shape: attributes.dimensions.iter().rev().copied().collect(),
            chunks: attributes.block_size.iter().rev().copied().collect(),
            dtype: attributes.data_type.zarr_dtype().to_string(),
            compressor,
            fill_value: Value::from(0),
            order: default_order(),
            filters: None,
        }
    }

    fn into_attributes(self, path: &Path) -> Result<DatasetAttributes> {
        if self.zarr_format != FORMAT_VERSION {
            return Err(invalid_metadata(
                path,
                format!("unsupported zarr_format {}", self.zarr_format),
            ));
        }

        let data_type = DataType::from_zarr_dtype(&self.dtype)
            .ok_or_else(|| invalid_metadata(path, format!("unsupported dtype `{}`", self.dtype)))?;

        let (mut dimensions, mut block_size) = (self.shape, self.chunks);
        if self.order != "F" {
            dimensions.reverse();
            block_size.reverse();
        }

        let compression = match self.compressor {
            None | Some(Value::Null) => Compression::raw(),
            Some(compressor) => match compressor.get("id").and_then(Value::as_str) {
                Some(id) => Compression::new(id),
                None => return Err(invalid_metadata(path, "compressor without an id")),
            },
        };

        let attributes = DatasetAttributes {
            dimensions,
            block_size,
            data_type,
            compression: Some(compression),
        };
        if !attributes.is_consistent() {
            return Err(invalid_metadata(path, "chunks do not fit shape"));
        }
        Ok(attributes)
    }
}

/// A node exists when it carries a Zarr marker; the container root always does
pub(super) fn node_exists(dir: &Path, is_root: bool) -> bool {
    dir.is_dir() && (is_root || dir.join(ARRAY_FILE).is_file() || dir.join(GROUP_FILE).is_file())
}

pub(super) fn is_dataset(dir: &Path) -> Result<bool> {
    Ok(dir.join(ARRAY_FILE).is_file())
}

/// Decode `.zarray` of `dir`, `Ok(None)` if the node is not an array
pub(super) fn dataset_attributes(dir: &Path) -> Result<Option<DatasetAttributes>> {
    let path = dir.join(ARRAY_FILE);
    let Some(value) = read_json(&path)? else {
        return Ok(None);
    };

    let metadata: ArrayMetadata =
        serde_json::from_value(value).map_err(|err| invalid_metadata(&path, err))?;
    metadata.into_attributes(&path).map(Some)
}

/// Mark `dir` as a group unless it already is a group or an array
fn ensure_group(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|err| io_error(dir, err))?;
    if dir.join(GROUP_FILE).is_file() || dir.join(ARRAY_FILE).is_file() {
        return Ok(());
    }
    write_json(&dir.join(GROUP_FILE), &json!({ "zarr_format": FORMAT_VERSION }))
}

pub(super) fn create_group(root: &Path, path: &str) -> Result<()> {
    ensure_group(root)?;
    for parent in parent_paths(path) {
        ensure_group(&resolve(root, &parent))?;
    }
    if !path.is_empty() {
        ensure_group(&resolve(root, path))?;
    }
    Ok(())
}

pub(super) fn create_dataset(root: &Path, path: &str, attributes: &DatasetAttributes) -> Result<()> {
    let parent = path.rsplit_once('/').map_or("", |(parent, _)| parent);
    create_group(root, parent)?;

    let dir = resolve(root, path);
    fs::create_dir_all(&dir).map_err(|err| io_error(&dir, err))?;

    let path = dir.join(ARRAY_FILE);
    let value = serde_json::to_value(ArrayMetadata::from_attributes(attributes))
        .map_err(|err| invalid_metadata(&path, err))?;
    write_json(&path, &value)
}
