use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use carve_core::decompose::decompose;
use carve_core::image::ImageBuffer;
use carve_core::model::RegionSummary;
use carve_core::verify::{verify_regions, ReferenceStore, VerifyStatus};
use serde::Serialize;

use crate::{sha256_bytes, sha256_file, OutputLayout};

/// JSON extraction manifest written next to the region files.
#[derive(Debug, Serialize)]
struct Manifest {
    tool_version: String,
    dump: String,
    dump_sha256: String,
    image_size: usize,
    extracted_at: String,
    regions: Vec<ManifestRegion>,
}

#[derive(Debug, Serialize)]
struct ManifestRegion {
    #[serde(flatten)]
    summary: RegionSummary,
    sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    verification: Option<String>,
}

/// Decompose a dump and write one file per region, the layout descriptor,
/// and a JSON manifest.
///
/// With a reference directory, every region is verified against it after
/// extraction; `strict` promotes the first mismatch to a fatal error once the
/// full report has been printed.
pub fn split_command(
    dump: &Path,
    out: &Path,
    reference: Option<&Path>,
    strict: bool,
) -> Result<()> {
    let image = ImageBuffer::load(dump)
        .with_context(|| format!("Failed to read dump file: {}", dump.display()))?;

    let references = match reference {
        Some(dir) => Some(
            ReferenceStore::load(dir)
                .with_context(|| format!("Failed to read reference directory: {}", dir.display()))?,
        ),
        None => None,
    };

    // Decompose before touching the output directory, so a failed run leaves
    // no partial output.
    let decomposition = decompose(&image, references.as_ref())
        .with_context(|| format!("Failed to decompose {}", dump.display()))?;

    let layout = OutputLayout::new(out);
    fs::create_dir_all(&layout.firmware_dir).with_context(|| {
        format!("Failed to create firmware dir: {}", layout.firmware_dir.display())
    })?;

    println!(
        "Decomposed {} ({:#x} bytes, {} regions):",
        dump.display(),
        decomposition.image_len(),
        decomposition.regions().len()
    );
    for region in decomposition.regions() {
        let file = region.file_path();
        let path = layout.region_path(&file);
        fs::write(&path, region.canonical_payload())
            .with_context(|| format!("Failed to write region file: {}", path.display()))?;
        println!("  0x{:06x}  {} -> {}", region.offset(), region.name(), file);
    }

    fs::write(&layout.layout_path, decomposition.layout_descriptor()).with_context(|| {
        format!("Failed to write layout descriptor: {}", layout.layout_path.display())
    })?;
    println!("Wrote layout descriptor: {}", layout.layout_path.display());

    let reports = references.as_ref().map(|store| verify_regions(decomposition.regions(), store));

    let manifest = Manifest {
        tool_version: carve_core::version().to_string(),
        dump: dump.display().to_string(),
        dump_sha256: sha256_file(dump)?,
        image_size: decomposition.image_len(),
        extracted_at: chrono::Utc::now().to_rfc3339(),
        regions: decomposition
            .regions()
            .iter()
            .enumerate()
            .map(|(i, region)| ManifestRegion {
                summary: region.summary(),
                sha256: sha256_bytes(region.canonical_payload()),
                verification: reports
                    .as_ref()
                    .map(|reports| reports[i].status.label().to_string()),
            })
            .collect(),
    };
    let manifest_json =
        serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
    fs::write(&layout.manifest_path, manifest_json).with_context(|| {
        format!("Failed to write manifest: {}", layout.manifest_path.display())
    })?;
    println!("Wrote manifest: {}", layout.manifest_path.display());

    if let Some(reports) = &reports {
        println!();
        println!("Verification:");
        for report in reports {
            match &report.status {
                VerifyStatus::Verified => println!("  {}: verified", report.region),
                VerifyStatus::Mismatch { expected_len, actual_len, first_diff } => println!(
                    "  {}: MISMATCH (expected {} bytes, got {}, first difference at {:#x})",
                    report.region, expected_len, actual_len, first_diff
                ),
                VerifyStatus::NoReference => println!("  {}: no reference", report.region),
            }
        }

        if strict {
            if let Some(err) = reports.iter().find_map(|report| report.as_error()) {
                return Err(err.into());
            }
        }
    }

    Ok(())
}
