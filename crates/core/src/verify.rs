//! Comparison of canonical payloads against externally supplied known-good
//! references. Mismatches are collected per region and never abort the sweep;
//! promoting them to fatal errors is the caller's policy.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{CarveError, CarveResult};
use crate::model::{FirmwareSchema, Region, RegionKind};

/// Known-good payloads keyed by resolved region file path (e.g.
/// `firmware/boot_firmware.bin`), the layout of the original source-parts
/// tree.
#[derive(Debug, Default)]
pub struct ReferenceStore {
    payloads: HashMap<String, Vec<u8>>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every file under `dir` (including one level of subdirectories,
    /// for `firmware/`), keyed by its path relative to `dir`.
    pub fn load(dir: &Path) -> CarveResult<Self> {
        let mut store = Self::new();
        store.load_dir(dir, "")?;
        Ok(store)
    }

    fn load_dir(&mut self, dir: &Path, prefix: &str) -> CarveResult<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            if path.is_dir() {
                self.load_dir(&path, &format!("{prefix}{name}/"))?;
            } else {
                self.payloads.insert(format!("{prefix}{name}"), fs::read(&path)?);
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, path_key: impl Into<String>, payload: Vec<u8>) {
        self.payloads.insert(path_key.into(), payload);
    }

    /// Look up a reference payload by resolved region file path.
    pub fn get(&self, path_key: &str) -> Option<&[u8]> {
        self.payloads.get(path_key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

/// Outcome of comparing one region against its reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyStatus {
    Verified,
    Mismatch { expected_len: usize, actual_len: usize, first_diff: usize },
    /// No reference file exists for this region; reported, never an error.
    NoReference,
}

impl VerifyStatus {
    /// Short label for reports and manifests.
    pub fn label(&self) -> &'static str {
        match self {
            VerifyStatus::Verified => "verified",
            VerifyStatus::Mismatch { .. } => "mismatch",
            VerifyStatus::NoReference => "no reference",
        }
    }
}

/// Per-region verification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub region: String,
    pub status: VerifyStatus,
}

impl VerifyReport {
    /// The fatal form of a mismatch, for callers that require verification
    /// to succeed. `None` for verified or unreferenced regions.
    pub fn as_error(&self) -> Option<CarveError> {
        match self.status {
            VerifyStatus::Mismatch { expected_len, actual_len, first_diff } => {
                Some(CarveError::VerificationMismatch {
                    region: self.region.clone(),
                    expected_len,
                    actual_len,
                    first_diff,
                })
            }
            _ => None,
        }
    }
}

/// Compare every region's canonical payload against the store.
///
/// Kind-specific equivalence rules:
/// - schema-1 firmware: the reference's own leading 4 bytes are dropped
///   first (its header convention differs from the dump's 8-byte one);
/// - schema-4 firmware: the canonical payload's 4-byte suffix is excluded;
/// - everything else: exact byte equality.
pub fn verify_regions(regions: &[Region], store: &ReferenceStore) -> Vec<VerifyReport> {
    regions
        .iter()
        .map(|region| {
            let status = match store.get(&region.file_path()) {
                Some(reference) => {
                    let (expected, actual) = comparable_payloads(region, reference);
                    match first_difference(expected, actual) {
                        None => VerifyStatus::Verified,
                        Some(first_diff) => VerifyStatus::Mismatch {
                            expected_len: expected.len(),
                            actual_len: actual.len(),
                            first_diff,
                        },
                    }
                }
                None => VerifyStatus::NoReference,
            };
            VerifyReport { region: region.name().to_string(), status }
        })
        .collect()
}

fn comparable_payloads<'c, 'r>(
    region: &'c Region,
    reference: &'r [u8],
) -> (&'r [u8], &'c [u8]) {
    let canonical = region.canonical_payload();
    match region.kind() {
        RegionKind::Firmware { schema: FirmwareSchema::Schema1, .. } => {
            (reference.get(4..).unwrap_or(&[]), canonical)
        }
        RegionKind::Firmware { schema: FirmwareSchema::Schema4, .. } => {
            (reference, canonical.get(..reference.len()).unwrap_or(canonical))
        }
        _ => (reference, canonical),
    }
}

/// First differing byte index, or the shorter length when one payload is a
/// strict prefix of the other. `None` when equal.
fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    let shared = a.len().min(b.len());
    match a[..shared].iter().zip(&b[..shared]).position(|(x, y)| x != y) {
        Some(index) => Some(index),
        None if a.len() != b.len() => Some(shared),
        None => None,
    }
}
