use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

pub mod commands;

/// Compute the SHA-256 hash of a byte slice as a hex string.
pub fn sha256_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Compute the SHA-256 hash of a file and return it as a hex string.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open file for hashing: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read file for hashing: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let digest = hasher.finalize();
    Ok(format!("{:x}", digest))
}

/// Derived output paths for one extraction run.
///
/// This does *not* perform any IO itself; the commands are responsible for
/// actually creating directories and files based on this layout.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    /// Root directory of the extraction output.
    pub root: PathBuf,
    /// Directory for firmware parts (firmware/).
    pub firmware_dir: PathBuf,
    /// Path to the textual layout descriptor.
    pub layout_path: PathBuf,
    /// Path to the JSON extraction manifest.
    pub manifest_path: PathBuf,
}

impl OutputLayout {
    /// Compute the layout for an extraction rooted at `root`.
    ///
    /// This does *not* touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let firmware_dir = root.join("firmware");
        let layout_path = root.join("flash_layout.config");
        let manifest_path = root.join("manifest.json");

        Self { root, firmware_dir, layout_path, manifest_path }
    }

    /// Absolute path for a region's resolved relative file path.
    pub fn region_path(&self, region_file: &str) -> PathBuf {
        self.root.join(region_file)
    }
}
