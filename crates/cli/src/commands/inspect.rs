use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use carve_core::decompose::decompose;
use carve_core::image::ImageBuffer;

/// Print the region table for a dump, optionally as JSON.
pub fn info_command(dump: &Path, json: bool) -> Result<()> {
    let image = ImageBuffer::load(dump)
        .with_context(|| format!("Failed to read dump file: {}", dump.display()))?;
    let decomposition = decompose(&image, None)
        .with_context(|| format!("Failed to decompose {}", dump.display()))?;

    if json {
        let serialized = serde_json::to_string_pretty(&decomposition.summaries())
            .context("Failed to serialize region summaries to JSON")?;
        println!("{}", serialized);
    } else {
        println!(
            "Flash image {} ({:#x} bytes, {} regions):",
            dump.display(),
            decomposition.image_len(),
            decomposition.regions().len()
        );
        for summary in decomposition.summaries() {
            let schema_display = match summary.schema {
                Some(schema) => format!(" schema={}", schema),
                None => String::new(),
            };
            println!(
                "  0x{:06x}  {:<10} [{}]{} -> {}",
                summary.offset,
                format!("{:#x}", summary.size),
                summary.name,
                schema_display,
                summary.file
            );
        }
    }

    Ok(())
}

/// Print the layout descriptor, or write it to a file.
pub fn layout_command(dump: &Path, out: Option<&Path>) -> Result<()> {
    let image = ImageBuffer::load(dump)
        .with_context(|| format!("Failed to read dump file: {}", dump.display()))?;
    let decomposition = decompose(&image, None)
        .with_context(|| format!("Failed to decompose {}", dump.display()))?;

    let descriptor = decomposition.layout_descriptor();
    match out {
        Some(path) => {
            fs::write(path, descriptor)
                .with_context(|| format!("Failed to write layout descriptor: {}", path.display()))?;
            println!("Wrote layout descriptor: {}", path.display());
        }
        None => print!("{}", descriptor),
    }

    Ok(())
}
