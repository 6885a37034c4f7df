use std::path::Path;

use anyhow::{anyhow, Context, Result};
use carve_core::decompose::decompose;
use carve_core::image::ImageBuffer;
use carve_core::verify::{verify_regions, ReferenceStore, VerifyStatus};

/// Verify a dump's canonical payloads against a reference directory without
/// writing any output files.
///
/// Regions without a reference file are reported as skipped; any mismatch
/// makes the command fail after the full report is printed.
pub fn verify_command(dump: &Path, reference: &Path) -> Result<()> {
    let image = ImageBuffer::load(dump)
        .with_context(|| format!("Failed to read dump file: {}", dump.display()))?;
    let store = ReferenceStore::load(reference)
        .with_context(|| format!("Failed to read reference directory: {}", reference.display()))?;

    let decomposition = decompose(&image, Some(&store))
        .with_context(|| format!("Failed to decompose {}", dump.display()))?;
    let reports = verify_regions(decomposition.regions(), &store);

    let mut verified = 0usize;
    let mut mismatched = 0usize;
    println!("Verifying {} against {}:", dump.display(), reference.display());
    for report in &reports {
        match &report.status {
            VerifyStatus::Verified => {
                verified += 1;
                println!("  {}: verified", report.region);
            }
            VerifyStatus::Mismatch { expected_len, actual_len, first_diff } => {
                mismatched += 1;
                println!(
                    "  {}: MISMATCH (expected {} bytes, got {}, first difference at {:#x})",
                    report.region, expected_len, actual_len, first_diff
                );
            }
            VerifyStatus::NoReference => {
                println!("  {}: skipped (no reference file)", report.region);
            }
        }
    }
    println!("{} verified, {} mismatched", verified, mismatched);

    if mismatched > 0 {
        return Err(anyhow!("{} region(s) failed verification", mismatched));
    }
    Ok(())
}
