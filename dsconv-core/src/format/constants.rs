//! Format constants for N5 and Zarr v2 containers

/// Dimensionality that marks a multi-channel dataset
pub const CHANNEL_NUM_DIMENSIONS: usize = 4;

/// Identifier strings for dataset kinds
pub mod identifiers {
    pub const RAW: &str = "raw";
    pub const LABEL: &str = "label";
    pub const CHANNEL: &str = "channel";
}

/// N5 layout constants
pub mod n5 {
    /// Attribute file present in every N5 node that has attributes
    pub const ATTRIBUTES_FILE: &str = "attributes.json";

    /// Version written into the root attributes of new containers
    pub const VERSION: &str = "4.0.0";

    /// Newest major version readers understand
    pub const SUPPORTED_MAJOR_VERSION: u32 = 4;

    /// Root attribute key holding the format version
    pub const VERSION_KEY: &str = "n5";

    /// Keys that must all be present for a node to be a dataset
    pub const DIMENSIONS_KEY: &str = "dimensions";
    pub const BLOCK_SIZE_KEY: &str = "blockSize";
    pub const DATA_TYPE_KEY: &str = "dataType";
    pub const COMPRESSION_KEY: &str = "compression";

    /// Pre-2.0 spelling of the compression entry
    pub const LEGACY_COMPRESSION_KEY: &str = "compressionType";
}

/// Zarr v2 layout constants
pub mod zarr {
    /// Array metadata file
    pub const ARRAY_FILE: &str = ".zarray";

    /// Group marker file
    pub const GROUP_FILE: &str = ".zgroup";

    /// User attributes file
    pub const ATTRIBUTES_FILE: &str = ".zattrs";

    /// Supported format version
    pub const FORMAT_VERSION: u64 = 2;

    /// Location suffix that selects the Zarr layout
    pub const EXTENSION: &str = ".zarr";
}
