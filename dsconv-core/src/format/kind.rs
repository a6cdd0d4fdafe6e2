//! Semantic kind of a dataset

use super::constants::{identifiers, CHANNEL_NUM_DIMENSIONS};
use super::DatasetAttributes;
use crate::ConversionError;

/// What a dataset holds, derived from its attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DatasetKind {
    /// Intensity or imaging data
    Raw,
    /// Segment identifiers
    Label,
    /// Multi-channel image data
    Channel,
}

impl DatasetKind {
    /// Classify a dataset by its attributes.
    ///
    /// Four dimensions always mean [`DatasetKind::Channel`], whatever the
    /// element type. Otherwise 64-bit integers and `uint32` mean
    /// [`DatasetKind::Label`] and everything else is [`DatasetKind::Raw`].
    pub fn classify(attributes: &DatasetAttributes) -> Self {
        if attributes.num_dimensions() == CHANNEL_NUM_DIMENSIONS {
            DatasetKind::Channel
        } else if attributes.data_type.is_label_type() {
            DatasetKind::Label
        } else {
            DatasetKind::Raw
        }
    }

    /// Identifier string (`"raw"`, `"label"`, `"channel"`)
    pub const fn identifier(self) -> &'static str {
        match self {
            DatasetKind::Raw => identifiers::RAW,
            DatasetKind::Label => identifiers::LABEL,
            DatasetKind::Channel => identifiers::CHANNEL,
        }
    }

    /// Parse an identifier string
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            identifiers::RAW => Some(DatasetKind::Raw),
            identifiers::LABEL => Some(DatasetKind::Label),
            identifiers::CHANNEL => Some(DatasetKind::Channel),
            _ => None,
        }
    }
}

impl core::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.identifier())
    }
}

impl core::str::FromStr for DatasetKind {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_identifier(s).ok_or_else(|| ConversionError::InvalidDescriptor {
            descriptor: s.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataType;
    use alloc::vec;

    fn attrs(dimensions: &[u64], data_type: DataType) -> DatasetAttributes {
        DatasetAttributes::new(dimensions.to_vec(), vec![64; dimensions.len()], data_type)
    }

    #[test]
    fn test_four_dimensions_is_channel() {
        for data_type in DataType::ALL {
            assert_eq!(
                DatasetKind::classify(&attrs(&[4, 100, 100, 100], data_type)),
                DatasetKind::Channel
            );
        }
    }

    #[test]
    fn test_label_types() {
        assert_eq!(
            DatasetKind::classify(&attrs(&[100, 100, 100], DataType::U64)),
            DatasetKind::Label
        );
        assert_eq!(
            DatasetKind::classify(&attrs(&[100, 100, 100], DataType::I64)),
            DatasetKind::Label
        );
        assert_eq!(
            DatasetKind::classify(&attrs(&[100, 100], DataType::U32)),
            DatasetKind::Label
        );
    }

    #[test]
    fn test_everything_else_is_raw() {
        for data_type in DataType::ALL {
            if data_type.is_label_type() {
                continue;
            }
            assert_eq!(
                DatasetKind::classify(&attrs(&[100, 100, 100], data_type)),
                DatasetKind::Raw
            );
        }
        // Five dimensions fall through to the data type rule
        assert_eq!(
            DatasetKind::classify(&attrs(&[2, 4, 10, 10, 10], DataType::U64)),
            DatasetKind::Label
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!("label".parse::<DatasetKind>(), Ok(DatasetKind::Label));
        assert_eq!(DatasetKind::Channel.identifier(), "channel");
        assert_eq!(DatasetKind::from_identifier("raw"), Some(DatasetKind::Raw));
        assert!("Label".parse::<DatasetKind>().is_err());
    }
}
