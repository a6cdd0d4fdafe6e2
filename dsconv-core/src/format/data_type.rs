//! Element data types of chunked arrays

/// Element type of a dataset, named after the N5 `dataType` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    /// 8-bit unsigned integer
    #[cfg_attr(feature = "serde", serde(rename = "uint8"))]
    U8,
    /// 16-bit unsigned integer
    #[cfg_attr(feature = "serde", serde(rename = "uint16"))]
    U16,
    /// 32-bit unsigned integer
    #[cfg_attr(feature = "serde", serde(rename = "uint32"))]
    U32,
    /// 64-bit unsigned integer
    #[cfg_attr(feature = "serde", serde(rename = "uint64"))]
    U64,
    /// 8-bit signed integer
    #[cfg_attr(feature = "serde", serde(rename = "int8"))]
    I8,
    /// 16-bit signed integer
    #[cfg_attr(feature = "serde", serde(rename = "int16"))]
    I16,
    /// 32-bit signed integer
    #[cfg_attr(feature = "serde", serde(rename = "int32"))]
    I32,
    /// 64-bit signed integer
    #[cfg_attr(feature = "serde", serde(rename = "int64"))]
    I64,
    /// 32-bit floating point
    #[cfg_attr(feature = "serde", serde(rename = "float32"))]
    F32,
    /// 64-bit floating point
    #[cfg_attr(feature = "serde", serde(rename = "float64"))]
    F64,
    /// Opaque serialized objects
    #[cfg_attr(feature = "serde", serde(rename = "object"))]
    Object,
}

impl DataType {
    /// All data types, in N5 declaration order
    pub const ALL: [DataType; 11] = [
        DataType::U8,
        DataType::U16,
        DataType::U32,
        DataType::U64,
        DataType::I8,
        DataType::I16,
        DataType::I32,
        DataType::I64,
        DataType::F32,
        DataType::F64,
        DataType::Object,
    ];

    /// N5 attribute name (`"uint64"`, `"float32"`, ...)
    pub const fn n5_name(self) -> &'static str {
        match self {
            DataType::U8 => "uint8",
            DataType::U16 => "uint16",
            DataType::U32 => "uint32",
            DataType::U64 => "uint64",
            DataType::I8 => "int8",
            DataType::I16 => "int16",
            DataType::I32 => "int32",
            DataType::I64 => "int64",
            DataType::F32 => "float32",
            DataType::F64 => "float64",
            DataType::Object => "object",
        }
    }

    /// Parse an N5 attribute name, ignoring ASCII case
    pub fn from_n5_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|data_type| data_type.n5_name().eq_ignore_ascii_case(name))
    }

    /// Parse a Zarr v2 `dtype` string such as `"<u8"`, `"|u1"` or `">f4"`
    pub fn from_zarr_dtype(dtype: &str) -> Option<Self> {
        let body = match dtype.as_bytes().first()? {
            b'<' | b'>' | b'|' | b'=' => &dtype[1..],
            _ => dtype,
        };

        match body {
            "u1" => Some(DataType::U8),
            "u2" => Some(DataType::U16),
            "u4" => Some(DataType::U32),
            "u8" => Some(DataType::U64),
            "i1" => Some(DataType::I8),
            "i2" => Some(DataType::I16),
            "i4" => Some(DataType::I32),
            "i8" => Some(DataType::I64),
            "f4" => Some(DataType::F32),
            "f8" => Some(DataType::F64),
            "O" => Some(DataType::Object),
            _ => None,
        }
    }

    /// Little-endian Zarr v2 `dtype` string for this type
    pub const fn zarr_dtype(self) -> &'static str {
        match self {
            DataType::U8 => "|u1",
            DataType::U16 => "<u2",
            DataType::U32 => "<u4",
            DataType::U64 => "<u8",
            DataType::I8 => "|i1",
            DataType::I16 => "<i2",
            DataType::I32 => "<i4",
            DataType::I64 => "<i8",
            DataType::F32 => "<f4",
            DataType::F64 => "<f8",
            DataType::Object => "|O",
        }
    }

    /// Whether values of this type are used as segment identifiers
    pub const fn is_label_type(self) -> bool {
        matches!(self, DataType::U64 | DataType::I64 | DataType::U32)
    }
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.n5_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_n5_names() {
        assert_eq!(DataType::from_n5_name("uint64"), Some(DataType::U64));
        assert_eq!(DataType::from_n5_name("FLOAT32"), Some(DataType::F32));
        assert_eq!(DataType::from_n5_name("object"), Some(DataType::Object));
        assert_eq!(DataType::from_n5_name("uint128"), None);
        assert_eq!(DataType::from_n5_name(""), None);

        for data_type in DataType::ALL {
            assert_eq!(DataType::from_n5_name(data_type.n5_name()), Some(data_type));
        }
    }

    #[test]
    fn test_zarr_dtypes() {
        assert_eq!(DataType::from_zarr_dtype("<u8"), Some(DataType::U64));
        assert_eq!(DataType::from_zarr_dtype(">u8"), Some(DataType::U64));
        assert_eq!(DataType::from_zarr_dtype("|u1"), Some(DataType::U8));
        assert_eq!(DataType::from_zarr_dtype("<f4"), Some(DataType::F32));
        assert_eq!(DataType::from_zarr_dtype("i2"), Some(DataType::I16));

        // Complex, datetime and empty strings are not representable
        assert_eq!(DataType::from_zarr_dtype("<c8"), None);
        assert_eq!(DataType::from_zarr_dtype("<M8[ns]"), None);
        assert_eq!(DataType::from_zarr_dtype(""), None);
    }

    #[test]
    fn test_label_types() {
        assert!(DataType::U64.is_label_type());
        assert!(DataType::I64.is_label_type());
        assert!(DataType::U32.is_label_type());

        assert!(!DataType::I32.is_label_type());
        assert!(!DataType::U16.is_label_type());
        assert!(!DataType::F64.is_label_type());
    }
}
