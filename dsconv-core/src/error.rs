//! Error types for dataset conversion checks

use alloc::string::String;

/// Errors that can occur while validating a dataset conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Input and output container are the same string
    SameContainer { container: String },
    /// Input container location does not exist
    InputContainerMissing { container: String },
    /// Input dataset path does not exist inside the container
    InputDatasetMissing { container: String, dataset: String },
    /// Input path exists but is a group rather than a dataset
    InputPathIsGroup { container: String, dataset: String },
    /// Output container location is occupied by a plain file
    OutputContainerIsFile { container: String },
    /// Output group exists and overwriting was not allowed
    OutputAlreadyExists { container: String, group: String },
    /// Storage backend could not open the container
    BackendUnavailable { location: String, reason: String },
    /// Storage backend has no dataset attributes at this path
    DatasetMissing { container: String, dataset: String },
    /// Attribute file could not be decoded
    InvalidMetadata { path: String, reason: String },
    /// Malformed `container,dataset[,kind][,group]` descriptor
    InvalidDescriptor { descriptor: String },
    /// Declared dataset kind disagrees with the classified one
    KindMismatch {
        dataset: String,
        declared: String,
        actual: String,
    },
    /// Two conversions write the same output group
    DuplicateOutput { container: String, group: String },
    /// Write-side I/O failure
    Io { path: String, reason: String },
}

/// Broad classification of a [`ConversionError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The conversion request itself is inconsistent
    Construction,
    /// Something is wrong with the input dataset
    Input,
    /// The output location cannot be written
    Output,
    /// The storage layer failed
    Backend,
    /// Caller supplied malformed arguments
    Usage,
}

impl ConversionError {
    /// Category used to pick a remediation message
    pub const fn category(&self) -> ErrorCategory {
        match self {
            ConversionError::SameContainer { .. } | ConversionError::DuplicateOutput { .. } => {
                ErrorCategory::Construction
            }
            ConversionError::InputContainerMissing { .. }
            | ConversionError::InputDatasetMissing { .. }
            | ConversionError::InputPathIsGroup { .. }
            | ConversionError::KindMismatch { .. } => ErrorCategory::Input,
            ConversionError::OutputContainerIsFile { .. }
            | ConversionError::OutputAlreadyExists { .. } => ErrorCategory::Output,
            ConversionError::BackendUnavailable { .. }
            | ConversionError::DatasetMissing { .. }
            | ConversionError::InvalidMetadata { .. }
            | ConversionError::Io { .. } => ErrorCategory::Backend,
            ConversionError::InvalidDescriptor { .. } => ErrorCategory::Usage,
        }
    }

    /// Short hint on how to resolve the failure
    pub const fn remediation(&self) -> &'static str {
        match self {
            ConversionError::SameContainer { .. } => "write to a different output container",
            ConversionError::InputContainerMissing { .. } => "check the input container path",
            ConversionError::InputDatasetMissing { .. } => "check the input dataset path",
            ConversionError::InputPathIsGroup { .. } => "point at a dataset inside the group",
            ConversionError::OutputContainerIsFile { .. } => {
                "remove the file or choose another output container"
            }
            ConversionError::OutputAlreadyExists { .. } => {
                "choose a different output group or allow overwriting"
            }
            ConversionError::BackendUnavailable { .. } => "make sure the container is readable",
            ConversionError::DatasetMissing { .. } => "check the input dataset path",
            ConversionError::InvalidMetadata { .. } => "repair the dataset attributes",
            ConversionError::InvalidDescriptor { .. } => {
                "use container,dataset[,kind][,output_group]"
            }
            ConversionError::KindMismatch { .. } => "drop or correct the declared dataset kind",
            ConversionError::DuplicateOutput { .. } => "give each conversion its own output group",
            ConversionError::Io { .. } => "check permissions on the output location",
        }
    }
}

impl core::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConversionError::SameContainer { container } => {
                write!(f, "Input container {container} is the same as output container {container}")
            }
            ConversionError::InputContainerMissing { container } => {
                write!(f, "Input container {container} does not exist")
            }
            ConversionError::InputDatasetMissing { container, dataset } => {
                write!(f, "Input dataset {dataset} does not exist in container {container}")
            }
            ConversionError::InputPathIsGroup { container, dataset } => {
                write!(f, "Input dataset {dataset} in container {container} is a group, not a dataset")
            }
            ConversionError::OutputContainerIsFile { container } => {
                write!(f, "Output container {container} exists and is a file")
            }
            ConversionError::OutputAlreadyExists { container, group } => {
                write!(f, "Output group {group} already exists in container {container}")
            }
            ConversionError::BackendUnavailable { location, reason } => {
                write!(f, "Unable to open container {location}: {reason}")
            }
            ConversionError::DatasetMissing { container, dataset } => {
                write!(f, "No dataset attributes for {dataset} in container {container}")
            }
            ConversionError::InvalidMetadata { path, reason } => {
                write!(f, "Invalid metadata at {path}: {reason}")
            }
            ConversionError::InvalidDescriptor { descriptor } => {
                write!(f, "Invalid dataset descriptor `{descriptor}`")
            }
            ConversionError::KindMismatch {
                dataset,
                declared,
                actual,
            } => write!(f, "Dataset {dataset} was declared {declared} but is {actual}"),
            ConversionError::DuplicateOutput { container, group } => {
                write!(f, "Output group {group} in container {container} is targeted more than once")
            }
            ConversionError::Io { path, reason } => write!(f, "I/O error at {path}: {reason}"),
        }
    }
}

impl core::error::Error for ConversionError {}

/// Result type for conversion checks
pub type Result<T> = core::result::Result<T, ConversionError>;
