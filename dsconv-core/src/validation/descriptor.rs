//! Parsing of dataset descriptors given on a command line
//!
//! A descriptor names one conversion as comma-separated fields:
//!
//! - `container,dataset`
//! - `container,dataset,output_group` or `container,dataset,kind`
//! - `container,dataset,kind,output_group`
//!
//! where `kind` is one of `raw`, `label` or `channel`.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::{ConversionError, DatasetKind, Result};

/// Maximum number of comma-separated fields
const MAX_FIELDS: usize = 4;

/// One parsed dataset descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDescriptor {
    /// Input container location
    pub container: String,
    /// Dataset path inside the input container
    pub dataset: String,
    /// Kind the caller expects the dataset to have
    pub kind: Option<DatasetKind>,
    /// Output group, if different from the dataset path
    pub output_group: Option<String>,
}

/// Parse a `container,dataset[,kind][,output_group]` descriptor
pub fn parse_dataset_descriptor(descriptor: &str) -> Result<DatasetDescriptor> {
    let invalid = || ConversionError::InvalidDescriptor {
        descriptor: descriptor.to_string(),
    };

    let fields: Vec<&str> = descriptor.split(',').map(str::trim).collect();
    if fields.len() < 2 || fields.len() > MAX_FIELDS || fields.iter().any(|f| f.is_empty()) {
        return Err(invalid());
    }

    let (kind, output_group) = match &fields[2..] {
        [] => (None, None),
        [third] => match DatasetKind::from_identifier(third) {
            Some(kind) => (Some(kind), None),
            None => (None, Some(third.to_string())),
        },
        [kind, group] => {
            let kind = DatasetKind::from_identifier(kind).ok_or_else(invalid)?;
            (Some(kind), Some(group.to_string()))
        }
        _ => return Err(invalid()),
    };

    Ok(DatasetDescriptor {
        container: fields[0].to_string(),
        dataset: fields[1].to_string(),
        kind,
        output_group,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_fields() {
        let parsed = parse_dataset_descriptor("/data/raw.n5,volumes/raw").unwrap();
        assert_eq!(parsed.container, "/data/raw.n5");
        assert_eq!(parsed.dataset, "volumes/raw");
        assert_eq!(parsed.kind, None);
        assert_eq!(parsed.output_group, None);
    }

    #[test]
    fn test_three_fields() {
        let with_group = parse_dataset_descriptor("/data/raw.n5,volumes/raw,converted").unwrap();
        assert_eq!(with_group.kind, None);
        assert_eq!(with_group.output_group.as_deref(), Some("converted"));

        let with_kind = parse_dataset_descriptor("/data/raw.n5,volumes/labels,label").unwrap();
        assert_eq!(with_kind.kind, Some(DatasetKind::Label));
        assert_eq!(with_kind.output_group, None);
    }

    #[test]
    fn test_four_fields() {
        let parsed =
            parse_dataset_descriptor("/tmp/c.n5, volumes/labels-source ,label,volumes/labels-converted")
                .unwrap();
        assert_eq!(parsed.dataset, "volumes/labels-source");
        assert_eq!(parsed.kind, Some(DatasetKind::Label));
        assert_eq!(parsed.output_group.as_deref(), Some("volumes/labels-converted"));
    }

    #[test]
    fn test_invalid_descriptors() {
        for descriptor in [
            "",
            "/data/raw.n5",
            "/data/raw.n5,",
            ",volumes/raw",
            "/data/raw.n5,volumes/raw,,out",
            "/data/raw.n5,volumes/raw,segmentation,out",
            "/data/raw.n5,volumes/raw,label,out,extra",
        ] {
            assert_eq!(
                parse_dataset_descriptor(descriptor),
                Err(ConversionError::InvalidDescriptor {
                    descriptor: descriptor.to_string()
                }),
                "descriptor {descriptor:?}"
            );
        }
    }
}
