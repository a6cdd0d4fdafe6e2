//! Shape and element type metadata of a single dataset
//!
//! The serialized form follows the N5 `attributes.json` layout. Dimensions are
//! listed fastest-varying first; Zarr backends reverse their C-order shapes
//! before building a [`DatasetAttributes`].

use alloc::string::String;
use alloc::vec::Vec;

use super::DataType;

/// Compression entry of a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Compression {
    /// Codec name, e.g. `"raw"`, `"gzip"`, `"blosc"`
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub name: String,
}

impl Compression {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Uncompressed blocks
    pub fn raw() -> Self {
        Self::new("raw")
    }
}

/// Dataset attributes as reported by a storage backend
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DatasetAttributes {
    /// Extent along each axis
    pub dimensions: Vec<u64>,
    /// Chunk extent along each axis
    pub block_size: Vec<u32>,
    /// Element type
    pub data_type: DataType,
    /// Compression, if the container records one
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub compression: Option<Compression>,
}

impl DatasetAttributes {
    /// Create attributes without a compression entry
    pub fn new(dimensions: Vec<u64>, block_size: Vec<u32>, data_type: DataType) -> Self {
        Self {
            dimensions,
            block_size,
            data_type,
            compression: None,
        }
    }

    /// Attach a compression entry
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Number of dimensions
    pub fn num_dimensions(&self) -> usize {
        self.dimensions.len()
    }

    /// Total element count, `None` on overflow
    pub fn num_elements(&self) -> Option<u64> {
        self.dimensions
            .iter()
            .try_fold(1u64, |acc, &extent| acc.checked_mul(extent))
    }

    /// Whether block size and dimensions agree in length, every block is
    /// non-empty and the element count fits in a `u64`
    pub fn is_consistent(&self) -> bool {
        self.block_size.len() == self.dimensions.len()
            && self.block_size.iter().all(|&b| b > 0)
            && self.num_elements().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_num_dimensions() {
        let attrs = DatasetAttributes::new(vec![4, 100, 100, 100], vec![1, 64, 64, 64], DataType::U8);
        assert_eq!(attrs.num_dimensions(), 4);
        assert_eq!(attrs.num_elements(), Some(4_000_000));
        assert!(attrs.is_consistent());
    }

    #[test]
    fn test_num_elements_overflow() {
        let attrs = DatasetAttributes::new(vec![u64::MAX, 2], vec![1, 1], DataType::U8);
        assert_eq!(attrs.num_elements(), None);
        assert!(!attrs.is_consistent());
    }

    #[test]
    fn test_inconsistent_block_size() {
        let short = DatasetAttributes::new(vec![10, 10, 10], vec![5, 5], DataType::F32);
        assert!(!short.is_consistent());

        let empty_block = DatasetAttributes::new(vec![10, 10], vec![5, 0], DataType::F32);
        assert!(!empty_block.is_consistent());
    }
}
