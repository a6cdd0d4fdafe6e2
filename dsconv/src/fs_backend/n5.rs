//! N5 layout: every node is a directory, datasets carry their shape in `attributes.json`

use super::{invalid_metadata, io_error, read_json, resolve, write_json};
use dsconv_core::constants::n5::*;
use dsconv_core::{Compression, DataType, DatasetAttributes, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Dataset entries of `attributes.json` as stored on disk
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAttributes {
    dimensions: Vec<u64>,
    block_size: Vec<u32>,
    data_type: String,
    #[serde(default)]
    compression: Option<Compression>,
    #[serde(default)]
    compression_type: Option<String>,
}

fn attributes_path(dir: &Path) -> PathBuf {
    dir.join(ATTRIBUTES_FILE)
}

fn has_dataset_keys(value: &Value) -> bool {
    [DIMENSIONS_KEY, BLOCK_SIZE_KEY, DATA_TYPE_KEY]
        .iter()
        .all(|key| value.get(key).is_some_and(|v| !v.is_null()))
}

/// Reject containers written by a newer major N5 version
pub(super) fn check_version(root: &Path) -> std::result::Result<(), String> {
    let attributes = read_json(&attributes_path(root)).map_err(|err| err.to_string())?;
    let Some(version) = attributes
        .as_ref()
        .and_then(|attrs| attrs.get(VERSION_KEY))
        .and_then(Value::as_str)
    else {
        return Ok(());
    };

    let major = version
        .split('.')
        .next()
        .and_then(|major| major.parse::<u32>().ok())
        .ok_or_else(|| format!("malformed N5 version `{version}`"))?;

    if major > SUPPORTED_MAJOR_VERSION {
        return Err(format!(
            "N5 version {version} is newer than supported version {SUPPORTED_MAJOR_VERSION}"
        ));
    }
    Ok(())
}

/// A node is a dataset when its attributes name dimensions, block size and data type
pub(super) fn is_dataset(dir: &Path) -> Result<bool> {
    Ok(read_json(&attributes_path(dir))?.is_some_and(|value| has_dataset_keys(&value)))
}

/// Decode the dataset attributes of `dir`, `Ok(None)` for groups and missing nodes
pub(super) fn dataset_attributes(dir: &Path) -> Result<Option<DatasetAttributes>> {
    let path = attributes_path(dir);
    let Some(value) = read_json(&path)? else {
        return Ok(None);
    };
    if !has_dataset_keys(&value) {
        return Ok(None);
    }

    let stored: StoredAttributes =
        serde_json::from_value(value).map_err(|err| invalid_metadata(&path, err))?;
    let data_type = DataType::from_n5_name(&stored.data_type).ok_or_else(|| {
        invalid_metadata(&path, format!("unknown data type `{}`", stored.data_type))
    })?;
    let compression = stored
        .compression
        .or_else(|| stored.compression_type.map(Compression::new));

    let attributes = DatasetAttributes {
        dimensions: stored.dimensions,
        block_size: stored.block_size,
        data_type,
        compression,
    };
    if !attributes.is_consistent() {
        return Err(invalid_metadata(
            &path,
            format!(
                "block size {:?} does not fit dimensions {:?}",
                attributes.block_size, attributes.dimensions
            ),
        ));
    }
    Ok(Some(attributes))
}

/// Merge `entries` into the attributes of `dir`, keeping unrelated keys
fn merge_attributes(dir: &Path, entries: Map<String, Value>) -> Result<()> {
    let path = attributes_path(dir);
    let mut attributes = match read_json(&path)? {
        Some(Value::Object(existing)) => existing,
        Some(_) => return Err(invalid_metadata(&path, "attributes are not a JSON object")),
        None => Map::new(),
    };
    attributes.extend(entries);
    write_json(&path, &Value::Object(attributes))
}

/// Create the container root and stamp it with the N5 version
fn ensure_root(root: &Path) -> Result<()> {
    fs::create_dir_all(root).map_err(|err| io_error(root, err))?;

    let has_version = read_json(&attributes_path(root))?
        .is_some_and(|attrs| attrs.get(VERSION_KEY).is_some());
    if !has_version {
        let mut entries = Map::new();
        entries.insert(VERSION_KEY.to_string(), Value::from(VERSION));
        merge_attributes(root, entries)?;
    }
    Ok(())
}

pub(super) fn create_group(root: &Path, path: &str) -> Result<()> {
    ensure_root(root)?;
    let dir = resolve(root, path);
    fs::create_dir_all(&dir).map_err(|err| io_error(&dir, err))
}

pub(super) fn create_dataset(root: &Path, path: &str, attributes: &DatasetAttributes) -> Result<()> {
    create_group(root, path)?;

    let dir = resolve(root, path);
    let entries = match serde_json::to_value(attributes) {
        Ok(Value::Object(entries)) => entries,
        Ok(_) => return Err(invalid_metadata(&dir, "attributes did not serialize to an object")),
        Err(err) => return Err(invalid_metadata(&dir, err)),
    };
    merge_attributes(&dir, entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, json: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(attributes_path(dir), json).unwrap();
    }

    #[test]
    fn test_group_without_data_type_is_not_dataset() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("volume");
        write(&dir, r#"{"dimensions": [10, 10], "blockSize": [5, 5]}"#);

        assert!(!is_dataset(&dir).unwrap());
        assert_eq!(dataset_attributes(&dir).unwrap(), None);
    }

    #[test]
    fn test_plain_directory_is_group() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!is_dataset(tmp.path()).unwrap());
        assert_eq!(dataset_attributes(tmp.path()).unwrap(), None);
    }

    #[test]
    fn test_legacy_compression_type() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("raw");
        write(
            &dir,
            r#"{"dimensions": [100, 100, 100], "blockSize": [64, 64, 64],
                "dataType": "float32", "compressionType": "gzip"}"#,
        );

        let attrs = dataset_attributes(&dir).unwrap().unwrap();
        assert_eq!(attrs.data_type, DataType::F32);
        assert_eq!(attrs.compression, Some(Compression::new("gzip")));
    }

    #[test]
    fn test_compression_parameters_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("labels");
        write(
            &dir,
            r#"{"dimensions": [5, 4, 4], "blockSize": [3, 3, 3], "dataType": "uint64",
                "compression": {"type": "gzip", "level": -1}, "resolution": [4, 4, 40]}"#,
        );

        let attrs = dataset_attributes(&dir).unwrap().unwrap();
        assert_eq!(attrs.dimensions, vec![5, 4, 4]);
        assert_eq!(attrs.block_size, vec![3, 3, 3]);
        assert_eq!(attrs.data_type, DataType::U64);
        assert_eq!(attrs.compression, Some(Compression::new("gzip")));
    }

    #[test]
    fn test_unknown_data_type_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("weird");
        write(&dir, r#"{"dimensions": [1], "blockSize": [1], "dataType": "complex64"}"#);

        assert!(is_dataset(&dir).unwrap());
        assert!(matches!(
            dataset_attributes(&dir),
            Err(dsconv_core::ConversionError::InvalidMetadata { .. })
        ));
    }

    #[test]
    fn test_inconsistent_block_size_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();

        let short = tmp.path().join("short");
        write(&short, r#"{"dimensions": [10, 10, 10], "blockSize": [5, 5], "dataType": "uint8"}"#);
        assert!(is_dataset(&short).unwrap());
        assert!(matches!(
            dataset_attributes(&short),
            Err(dsconv_core::ConversionError::InvalidMetadata { .. })
        ));

        let empty = tmp.path().join("empty");
        write(&empty, r#"{"dimensions": [10, 10], "blockSize": [5, 0], "dataType": "uint8"}"#);
        assert!(matches!(
            dataset_attributes(&empty),
            Err(dsconv_core::ConversionError::InvalidMetadata { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "{not json");

        assert!(matches!(
            is_dataset(tmp.path()),
            Err(dsconv_core::ConversionError::InvalidMetadata { .. })
        ));
    }

    #[test]
    fn test_version_check() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(check_version(tmp.path()), Ok(()));

        write(tmp.path(), r#"{"n5": "2.5.1"}"#);
        assert_eq!(check_version(tmp.path()), Ok(()));

        write(tmp.path(), r#"{"n5": "5.0.0"}"#);
        assert!(check_version(tmp.path()).is_err());

        write(tmp.path(), r#"{"n5": "latest"}"#);
        assert!(check_version(tmp.path()).is_err());
    }

    #[test]
    fn test_create_dataset_keeps_existing_attributes() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("out.n5");
        let dir = root.join("volumes/raw");
        write(&dir, r#"{"resolution": [4, 4, 40]}"#);

        let attrs = DatasetAttributes::new(vec![10, 20, 30], vec![8, 8, 8], DataType::U8)
            .with_compression(Compression::raw());
        create_dataset(&root, "volumes/raw", &attrs).unwrap();

        let stored = read_json(&attributes_path(&dir)).unwrap().unwrap();
        assert_eq!(stored["resolution"], serde_json::json!([4, 4, 40]));
        assert_eq!(stored["dataType"], "uint8");
        assert_eq!(stored["compression"]["type"], "raw");

        let root_attrs = read_json(&attributes_path(&root)).unwrap().unwrap();
        assert_eq!(root_attrs[VERSION_KEY], VERSION);
        assert_eq!(dataset_attributes(&dir).unwrap(), Some(attrs));
    }
}
