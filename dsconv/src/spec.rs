//! Addressing and pre-flight checks for a single dataset conversion
//!
//! A [`ConversionSpec`] names an input dataset and the place its converted
//! copy will be written. Before handing it to a conversion pipeline a caller
//! runs, in order:
//!
//! 1. [`ConversionSpec::validate_input`]
//! 2. [`ConversionSpec::classify`] to decide how to convert
//! 3. [`ConversionSpec::validate_output`]
//!
//! [`ConversionSpec::validate`] runs all three. Every check queries the
//! backend afresh and writes nothing.

use dsconv_core::{
    check_dimensionality, normalize_path, ContainerReader, ContainerWriter, ConversionError,
    DatasetAttributes, DatasetDescriptor, DatasetKind, LocationKind, Result, StorageBackend,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Input and output addressing of one conversion
///
/// Input and output containers must differ. The check is a plain string
/// comparison: two spellings of the same directory, or a symlink to it, are
/// not detected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredSpec")]
pub struct ConversionSpec {
    input_container: String,
    input_dataset: String,
    output_container: String,
    output_group: String,
}

/// Serialized form, checked on the way in
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSpec {
    input_container: String,
    input_dataset: String,
    output_container: String,
    #[serde(default)]
    output_group: Option<String>,
}

impl TryFrom<StoredSpec> for ConversionSpec {
    type Error = ConversionError;

    fn try_from(stored: StoredSpec) -> Result<Self> {
        ConversionSpec::new(
            stored.input_container,
            stored.input_dataset,
            stored.output_container,
            stored.output_group,
        )
    }
}

impl ConversionSpec {
    /// Create a spec, writing to `output_group` or to the input dataset path when `None`
    pub fn new(
        input_container: impl Into<String>,
        input_dataset: impl Into<String>,
        output_container: impl Into<String>,
        output_group: Option<String>,
    ) -> Result<Self> {
        let input_container = input_container.into();
        let input_dataset = input_dataset.into();
        let output_container = output_container.into();

        if input_container == output_container {
            return Err(ConversionError::SameContainer {
                container: input_container,
            });
        }

        let output_group = output_group.unwrap_or_else(|| input_dataset.clone());
        Ok(Self {
            input_container,
            input_dataset,
            output_container,
            output_group,
        })
    }

    /// Create a spec from a parsed descriptor, writing into `output_container`
    pub fn from_descriptor(
        descriptor: &DatasetDescriptor,
        output_container: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            descriptor.container.clone(),
            descriptor.dataset.clone(),
            output_container,
            descriptor.output_group.clone(),
        )
    }

    pub fn input_container(&self) -> &str {
        &self.input_container
    }

    pub fn input_dataset(&self) -> &str {
        &self.input_dataset
    }

    pub fn output_container(&self) -> &str {
        &self.output_container
    }

    /// Effective output group
    pub fn output_group(&self) -> &str {
        &self.output_group
    }

    /// Attributes of the input dataset, fetched from the backend on every call
    pub fn attributes<B: StorageBackend>(&self, backend: &B) -> Result<DatasetAttributes> {
        backend
            .open_for_read(&self.input_container)?
            .dataset_attributes(&self.input_dataset)
    }

    /// Classify the input dataset.
    ///
    /// Not cached: callers that need a stable answer should keep the result.
    pub fn classify<B: StorageBackend>(&self, backend: &B) -> Result<DatasetKind> {
        let attributes = self.attributes(backend)?;
        Ok(self.classify_attributes(&attributes))
    }

    fn classify_attributes(&self, attributes: &DatasetAttributes) -> DatasetKind {
        let kind = DatasetKind::classify(attributes);
        debug!(
            "{}:{} has {} dimensions of {} -> {kind}",
            self.input_container,
            self.input_dataset,
            attributes.num_dimensions(),
            attributes.data_type
        );
        kind
    }

    /// Classify the input dataset and compare against a kind the caller declared
    pub fn check_declared_kind<B: StorageBackend>(
        &self,
        backend: &B,
        declared: DatasetKind,
    ) -> Result<DatasetKind> {
        let actual = self.classify(backend)?;
        if actual != declared {
            return Err(ConversionError::KindMismatch {
                dataset: self.input_dataset.clone(),
                declared: declared.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(actual)
    }

    /// Check that the input dataset exists and is a dataset rather than a group.
    ///
    /// The dataset attributes are not decoded here; an unrecognized data type
    /// only fails once the dataset is classified.
    pub fn validate_input<B: StorageBackend>(&self, backend: &B) -> Result<()> {
        debug!("Validating input {}:{}", self.input_container, self.input_dataset);

        if !backend.location_kind(&self.input_container).exists() {
            return Err(ConversionError::InputContainerMissing {
                container: self.input_container.clone(),
            });
        }

        let reader = backend.open_for_read(&self.input_container)?;
        if !reader.exists(&self.input_dataset) {
            return Err(ConversionError::InputDatasetMissing {
                container: self.input_container.clone(),
                dataset: self.input_dataset.clone(),
            });
        }
        if !reader.is_dataset(&self.input_dataset)? {
            return Err(ConversionError::InputPathIsGroup {
                container: self.input_container.clone(),
                dataset: self.input_dataset.clone(),
            });
        }
        Ok(())
    }

    /// Check that the output location can be written.
    ///
    /// Fails when a plain file sits where the output container should be, and,
    /// unless `allow_existing` is set, when the output group already exists.
    /// Nothing is created; a caller that must not race other writers has to
    /// serialize this check with its own writes.
    pub fn validate_output<B: StorageBackend>(&self, backend: &B, allow_existing: bool) -> Result<()> {
        debug!(
            "Validating output {}:{} (existing allowed: {allow_existing})",
            self.output_container, self.output_group
        );

        if backend.location_kind(&self.output_container) == LocationKind::File {
            return Err(ConversionError::OutputContainerIsFile {
                container: self.output_container.clone(),
            });
        }

        if !allow_existing && backend.open_for_write(&self.output_container)?.exists(&self.output_group) {
            return Err(ConversionError::OutputAlreadyExists {
                container: self.output_container.clone(),
                group: self.output_group.clone(),
            });
        }
        Ok(())
    }

    /// Run input validation, classification and output validation in order
    ///
    /// The attributes fetched for classification also go through
    /// [`check_dimensionality`].
    pub fn validate<B: StorageBackend>(&self, backend: &B, allow_existing: bool) -> Result<DatasetKind> {
        self.validate_input(backend)?;
        let attributes = self.attributes(backend)?;
        let kind = self.classify_attributes(&attributes);
        check_dimensionality(kind, attributes.num_dimensions())?;
        self.validate_output(backend, allow_existing)?;
        Ok(kind)
    }

    /// Output container and normalized output group, for detecting collisions
    pub(crate) fn output_target(&self) -> (&str, String) {
        (&self.output_container, normalize_path(&self.output_group))
    }
}

impl std::fmt::Display for ConversionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{}",
            self.input_container, self.input_dataset, self.output_container, self.output_group
        )
    }
}
