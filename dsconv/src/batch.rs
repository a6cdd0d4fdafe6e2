//! Validation of several conversions requested together
//!
//! Each conversion is checked independently and in parallel. Conversions that
//! would write the same output group are rejected before any backend query.

use crate::ConversionSpec;
use dsconv_core::{ConversionError, DatasetKind, Result, StorageBackend};
use hashbrown::HashMap;
use log::{info, warn};
use rayon::prelude::*;

/// One conversion of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub spec: ConversionSpec,
    /// Kind the caller expects, checked against the classified kind
    pub declared_kind: Option<DatasetKind>,
}

impl From<ConversionSpec> for BatchItem {
    fn from(spec: ConversionSpec) -> Self {
        Self {
            spec,
            declared_kind: None,
        }
    }
}

/// Result of validating one batch item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub spec: ConversionSpec,
    /// Classified kind, or the first failed check
    pub result: Result<DatasetKind>,
}

/// Outcomes of a batch, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    /// Whether every conversion passed
    pub fn is_ok(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    /// Outcomes that failed
    pub fn failures(&self) -> impl Iterator<Item = (&ConversionSpec, &ConversionError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|err| (&outcome.spec, err)))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Validate every item of a batch.
///
/// Items are validated with [`ConversionSpec::validate`]; an item with a
/// declared kind additionally fails with [`ConversionError::KindMismatch`]
/// when the classification disagrees.
pub fn validate_batch<B>(backend: &B, items: &[BatchItem], allow_existing: bool) -> BatchReport
where
    B: StorageBackend + Sync,
{
    let mut targets: HashMap<(&str, String), usize> = HashMap::new();
    for item in items {
        *targets.entry(item.spec.output_target()).or_insert(0) += 1;
    }

    let outcomes: Vec<BatchOutcome> = items
        .par_iter()
        .map(|item| {
            let (container, group) = item.spec.output_target();
            let result = if targets.get(&(container, group.clone())).copied().unwrap_or(0) > 1 {
                Err(ConversionError::DuplicateOutput {
                    container: container.to_string(),
                    group,
                })
            } else {
                validate_item(backend, item, allow_existing)
            };

            BatchOutcome {
                spec: item.spec.clone(),
                result,
            }
        })
        .collect();

    let report = BatchReport { outcomes };
    for (spec, err) in report.failures() {
        warn!("{spec}: {err}");
    }
    info!(
        "Validated {} conversions, {} failed",
        report.len(),
        report.failures().count()
    );
    report
}

fn validate_item<B: StorageBackend>(
    backend: &B,
    item: &BatchItem,
    allow_existing: bool,
) -> Result<DatasetKind> {
    let kind = item.spec.validate(backend, allow_existing)?;
    match item.declared_kind {
        Some(declared) if declared != kind => Err(ConversionError::KindMismatch {
            dataset: item.spec.input_dataset().to_string(),
            declared: declared.to_string(),
            actual: kind.to_string(),
        }),
        _ => Ok(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;
    use dsconv_core::{DataType, DatasetAttributes};

    const INPUT: &str = "/data/raw.n5";
    const OUTPUT: &str = "/data/out.n5";

    fn backend() -> MemoryBackend {
        let backend = MemoryBackend::new();
        backend
            .insert_dataset(
                INPUT,
                "volumes/raw",
                &DatasetAttributes::new(vec![100, 100, 100], vec![64, 64, 64], DataType::U8),
            )
            .unwrap();
        backend
            .insert_dataset(
                INPUT,
                "volumes/labels",
                &DatasetAttributes::new(vec![100, 100, 100], vec![64, 64, 64], DataType::U64),
            )
            .unwrap();
        backend
    }

    fn item(dataset: &str, group: Option<&str>) -> BatchItem {
        ConversionSpec::new(INPUT, dataset, OUTPUT, group.map(str::to_string))
            .unwrap()
            .into()
    }

    #[test]
    fn test_all_pass() {
        let report = validate_batch(
            &backend(),
            &[item("volumes/raw", None), item("volumes/labels", None)],
            false,
        );

        assert!(report.is_ok());
        assert_eq!(report.len(), 2);
        assert_eq!(report.outcomes[0].result, Ok(DatasetKind::Raw));
        assert_eq!(report.outcomes[1].result, Ok(DatasetKind::Label));
    }

    #[test]
    fn test_outcomes_keep_input_order() {
        let items: Vec<BatchItem> = (0..32)
            .map(|idx| {
                let dataset = if idx % 2 == 0 { "volumes/raw" } else { "volumes/labels" };
                item(dataset, Some(format!("out/{idx}").as_str()))
            })
            .collect();

        let report = validate_batch(&backend(), &items, false);
        for (idx, outcome) in report.outcomes.iter().enumerate() {
            assert_eq!(outcome.spec.output_group(), format!("out/{idx}"));
            let expected = if idx % 2 == 0 { DatasetKind::Raw } else { DatasetKind::Label };
            assert_eq!(outcome.result, Ok(expected));
        }
    }

    #[test]
    fn test_duplicate_outputs() {
        let report = validate_batch(
            &backend(),
            &[
                item("volumes/raw", Some("converted")),
                item("volumes/labels", Some("/converted/")),
                item("volumes/labels", None),
            ],
            true,
        );

        assert!(!report.is_ok());
        assert_eq!(report.failures().count(), 2);
        for outcome in &report.outcomes[..2] {
            assert_eq!(
                outcome.result,
                Err(ConversionError::DuplicateOutput {
                    container: OUTPUT.to_string(),
                    group: "converted".to_string(),
                })
            );
        }
        assert_eq!(report.outcomes[2].result, Ok(DatasetKind::Label));
    }

    #[test]
    fn test_declared_kind_mismatch() {
        let mut declared = item("volumes/raw", None);
        declared.declared_kind = Some(DatasetKind::Label);

        let report = validate_batch(&backend(), &[declared], false);
        assert_eq!(
            report.outcomes[0].result,
            Err(ConversionError::KindMismatch {
                dataset: "volumes/raw".to_string(),
                declared: "label".to_string(),
                actual: "raw".to_string(),
            })
        );
    }

    #[test]
    fn test_first_failure_is_reported() {
        let report = validate_batch(&backend(), &[item("volumes/missing", None)], false);
        assert!(matches!(
            report.outcomes[0].result,
            Err(ConversionError::InputDatasetMissing { .. })
        ));
        assert!(validate_batch(&backend(), &[], false).is_empty());
    }
}
