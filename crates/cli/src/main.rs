use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use flashcarve::commands::{info_command, layout_command, split_command, verify_command};

/// Flash firmware dump decomposer CLI.
///
/// This CLI is a thin wrapper around `carve-core` (exposed in code as
/// `carve_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "flashcarve",
    version,
    about = "Structural decomposer for flash firmware dumps",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decompose a dump into one file per region.
    ///
    /// This will:
    /// - Write each region's canonical payload under the output directory.
    /// - Write `flash_layout.config` describing the discovered structure.
    /// - Write `manifest.json` with per-region metadata and SHA-256 digests.
    Split {
        /// The firmware dump file.
        #[arg(long)]
        dump: PathBuf,

        /// Output directory for the extracted regions.
        #[arg(long)]
        out: PathBuf,

        /// Optional directory of known-good payloads to verify against.
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Treat any verification mismatch as a fatal error.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },

    /// Print the layout descriptor for a dump.
    Layout {
        /// The firmware dump file.
        #[arg(long)]
        dump: PathBuf,

        /// Write the descriptor to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show the region table for a dump.
    Info {
        /// The firmware dump file.
        #[arg(long)]
        dump: PathBuf,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Verify a dump against a directory of known-good payloads.
    ///
    /// Fails if any referenced region mismatches; regions without a reference
    /// file are reported as skipped.
    Verify {
        /// The firmware dump file.
        #[arg(long)]
        dump: PathBuf,

        /// Directory of known-good payloads, laid out like extraction output.
        #[arg(long)]
        reference: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Split { dump, out, reference, strict } => {
            split_command(&dump, &out, reference.as_deref(), strict)?
        }
        Command::Layout { dump, out } => layout_command(&dump, out.as_deref())?,
        Command::Info { dump, json } => info_command(&dump, json)?,
        Command::Verify { dump, reference } => verify_command(&dump, &reference)?,
    }

    Ok(())
}
