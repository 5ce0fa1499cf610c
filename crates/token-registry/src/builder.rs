use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::chains::chain_label;
use crate::error::{CollisionError, KeyError, ValidationError};
use crate::index::RegistryIndex;
use crate::key::{build_key, KeyedRecord};
use crate::record::RawTokenRecord;
use crate::resolver;
use crate::validate::{validate, ValidatedRecord};

/// Build phases. Progression is strictly linear; a build never revisits an
/// earlier phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Idle,
    Validating,
    KeyingRecords,
    ResolvingCollisions,
    IndexBuilt,
    Failed,
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildPhase::Idle => "idle",
            BuildPhase::Validating => "validating",
            BuildPhase::KeyingRecords => "keying records",
            BuildPhase::ResolvingCollisions => "resolving collisions",
            BuildPhase::IndexBuilt => "index built",
            BuildPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why one raw record was left out of the index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// One skipped input record, identified by its position in the raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub position: usize,
    /// The raw address string, echoed for report readability.
    pub address: String,
    pub error: RecordError,
}

/// Everything a build dropped. Produced even when the build succeeds, so
/// partial data loss is never silent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub total_records: usize,
    pub indexed: usize,
    /// Records rejected during validation or keying, in input order.
    pub skipped: Vec<SkippedRecord>,
    /// Keys excluded by the collision resolver.
    pub collisions: Vec<CollisionError>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.collisions.is_empty()
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records: {} indexed, {} skipped, {} keys excluded",
            self.total_records,
            self.indexed,
            self.skipped.len(),
            self.collisions.len()
        )?;
        for skipped in &self.skipped {
            write!(
                f,
                "\n  record {} ({}): {}",
                skipped.position, skipped.address, skipped.error
            )?;
        }
        for collision in &self.collisions {
            write!(f, "\n  {} on {}", collision, chain_label(collision.key().chain_id))?;
        }
        Ok(())
    }
}

/// A successful build: the index plus the report of everything excluded.
#[derive(Debug)]
pub struct BuiltRegistry {
    pub index: RegistryIndex,
    pub report: BuildReport,
}

/// Terminal build failure. Still carries the full report so the caller can
/// see exactly which records sank the build.
#[derive(Debug, Error)]
#[error("registry build failed while {phase}: {} record error(s), threshold {threshold}", .report.skipped.len())]
pub struct BuildFailure {
    pub phase: BuildPhase,
    pub threshold: usize,
    pub report: BuildReport,
}

/// Orchestrates validation, keying, collision resolution and index
/// construction over a raw record set.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    max_record_errors: usize,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        // Any malformed record fails the build unless the caller opts into
        // tolerance; collision exclusions never count against this.
        Self {
            max_record_errors: 0,
        }
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tolerate up to `limit` malformed records instead of failing the
    /// whole build.
    pub fn max_record_errors(mut self, limit: usize) -> Self {
        self.max_record_errors = limit;
        self
    }

    /// Run the full pipeline: raw records → validated → keyed →
    /// deduplicated → index. The report lists every skipped record and
    /// excluded key even on success.
    pub fn build(&self, records: &[RawTokenRecord]) -> Result<BuiltRegistry, BuildFailure> {
        let mut report = BuildReport {
            total_records: records.len(),
            ..BuildReport::default()
        };

        let mut phase = BuildPhase::Validating;
        debug!(phase = %phase, total = records.len(), "registry build started");
        let validated = self.validate_records(records, &mut report);
        self.check_threshold(phase, &mut report)?;

        phase = BuildPhase::KeyingRecords;
        debug!(phase = %phase, validated = validated.len(), "deriving keys");
        let keyed = self.key_records(validated, records, &mut report);
        self.check_threshold(phase, &mut report)?;

        phase = BuildPhase::ResolvingCollisions;
        debug!(phase = %phase, keyed = keyed.len(), "resolving collisions");
        let resolution = resolver::resolve(keyed);
        report.collisions = resolution.errors;

        let index = RegistryIndex::from_tokens(resolution.tokens);
        report.indexed = index.len();
        report.skipped.sort_by_key(|s| s.position);

        phase = BuildPhase::IndexBuilt;
        debug!(
            phase = %phase,
            indexed = report.indexed,
            skipped = report.skipped.len(),
            collisions = report.collisions.len(),
            "registry build finished"
        );
        Ok(BuiltRegistry { index, report })
    }

    fn check_threshold(
        &self,
        phase: BuildPhase,
        report: &mut BuildReport,
    ) -> Result<(), BuildFailure> {
        if report.skipped.len() <= self.max_record_errors {
            return Ok(());
        }
        report.skipped.sort_by_key(|s| s.position);
        warn!(
            phase = %phase,
            skipped = report.skipped.len(),
            threshold = self.max_record_errors,
            "registry build failed"
        );
        Err(BuildFailure {
            phase,
            threshold: self.max_record_errors,
            report: std::mem::take(report),
        })
    }

    fn validate_records(
        &self,
        records: &[RawTokenRecord],
        report: &mut BuildReport,
    ) -> Vec<(usize, ValidatedRecord)> {
        let enumerated: Vec<(usize, &RawTokenRecord)> = records.iter().enumerate().collect();
        let outcomes = map_records(enumerated, |(position, raw)| (position, validate(raw)));

        let mut validated = Vec::with_capacity(outcomes.len());
        for (position, outcome) in outcomes {
            match outcome {
                Ok(record) => validated.push((position, record)),
                Err(error) => report.skipped.push(SkippedRecord {
                    position,
                    address: records[position].address.clone(),
                    error: error.into(),
                }),
            }
        }
        validated
    }

    fn key_records(
        &self,
        validated: Vec<(usize, ValidatedRecord)>,
        records: &[RawTokenRecord],
        report: &mut BuildReport,
    ) -> Vec<KeyedRecord> {
        let outcomes = map_records(validated, |(position, record)| {
            (position, build_key(position, record))
        });

        let mut keyed = Vec::with_capacity(outcomes.len());
        for (position, outcome) in outcomes {
            match outcome {
                Ok(record) => keyed.push(record),
                Err(error) => report.skipped.push(SkippedRecord {
                    position,
                    address: records[position].address.clone(),
                    error: error.into(),
                }),
            }
        }
        keyed
    }
}

/// Per-record map for the validation and keying phases. Both are pure and
/// independent per record, so with the `parallel` feature this fans out
/// across a rayon pool; output order matches input order either way.
#[cfg(feature = "parallel")]
fn map_records<I, T, F>(items: Vec<I>, f: F) -> Vec<T>
where
    I: Send,
    T: Send,
    F: Fn(I) -> T + Send + Sync,
{
    items.into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_records<I, T, F>(items: Vec<I>, f: F) -> Vec<T>
where
    I: Send,
    T: Send,
    F: Fn(I) -> T + Send + Sync,
{
    items.into_iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(address: &str, chain_id: i64, symbol: &str, decimals: i64) -> RawTokenRecord {
        RawTokenRecord {
            address: address.to_owned(),
            chain_id,
            decimals,
            name: format!("{symbol} token"),
            symbol: symbol.to_owned(),
            logo_uri: None,
            caip19: format!("eip155:{chain_id}/erc20:{}", address.to_lowercase()),
        }
    }

    const AAA: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const BBB: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    #[test]
    fn test_clean_build() {
        let records = vec![raw(AAA, 1, "AAA", 18), raw(BBB, 137, "BBB", 6)];
        let built = RegistryBuilder::new().build(&records).unwrap();
        assert_eq!(built.index.len(), 2);
        assert!(built.report.is_clean());
        assert_eq!(built.report.indexed, 2);
        assert_eq!(built.report.total_records, 2);
    }

    #[test]
    fn test_malformed_address_fails_build_by_default() {
        let records = vec![raw(AAA, 1, "AAA", 18), raw("0xnothex", 1, "BAD", 18)];
        let failure = RegistryBuilder::new().build(&records).unwrap_err();
        assert_eq!(failure.phase, BuildPhase::Validating);
        assert_eq!(failure.threshold, 0);
        assert_eq!(failure.report.skipped.len(), 1);
        assert_eq!(failure.report.skipped[0].position, 1);
    }

    #[test]
    fn test_threshold_tolerates_bad_records() {
        let records = vec![raw(AAA, 1, "AAA", 18), raw("0xnothex", 1, "BAD", 18)];
        let built = RegistryBuilder::new()
            .max_record_errors(1)
            .build(&records)
            .unwrap();
        assert_eq!(built.index.len(), 1);
        assert_eq!(built.report.skipped.len(), 1);
        assert!(matches!(
            built.report.skipped[0].error,
            RecordError::Validation(_)
        ));
    }

    #[test]
    fn test_caip19_mismatch_fails_during_keying() {
        let mut bad = raw(BBB, 1, "BBB", 18);
        bad.caip19 = format!("eip155:137/erc20:{BBB}");
        let records = vec![raw(AAA, 1, "AAA", 18), bad];

        let failure = RegistryBuilder::new().build(&records).unwrap_err();
        assert_eq!(failure.phase, BuildPhase::KeyingRecords);
        assert!(matches!(
            failure.report.skipped[0].error,
            RecordError::Key(_)
        ));
    }

    #[test]
    fn test_collisions_never_fail_the_build() {
        let records = vec![
            raw(AAA, 1, "AAA", 6),
            raw(AAA, 1, "AAA", 18),
            raw(BBB, 1, "BBB", 18),
        ];
        let built = RegistryBuilder::new().build(&records).unwrap();
        assert_eq!(built.index.len(), 1);
        assert_eq!(built.report.collisions.len(), 1);
        assert_eq!(built.report.indexed, 1);
        assert!(built
            .index
            .by_key(1, AAA.parse().unwrap())
            .is_none());
    }

    #[test]
    fn test_report_display_mentions_everything() {
        let records = vec![
            raw(AAA, 1, "AAA", 6),
            raw(AAA, 1, "AAA", 18),
            raw("0xnothex", 1, "BAD", 18),
        ];
        let built = RegistryBuilder::new()
            .max_record_errors(1)
            .build(&records)
            .unwrap();
        let rendered = built.report.to_string();
        assert!(rendered.contains("3 records"));
        assert!(rendered.contains("record 2 (0xnothex)"));
        assert!(rendered.contains("conflicting decimals"));
        assert!(rendered.contains("Ethereum"));
    }
}
