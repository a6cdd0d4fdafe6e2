//! Dimensionality checks against the classified dataset kind

use crate::{DatasetKind, Result};

/// Check that a dataset of `kind` may have `num_dimensions` axes.
///
/// Every combination is accepted at the moment.
// TODO: reject unsupported dimensionalities once the converter publishes its legal set per kind
pub fn check_dimensionality(kind: DatasetKind, num_dimensions: usize) -> Result<()> {
    let _ = (kind, num_dimensions);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_all_dimensionalities() {
        for kind in [DatasetKind::Raw, DatasetKind::Label, DatasetKind::Channel] {
            for num_dimensions in 0..6 {
                assert_eq!(check_dimensionality(kind, num_dimensions), Ok(()));
            }
        }
    }
}
