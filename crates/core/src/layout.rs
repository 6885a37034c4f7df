//! Textual layout descriptor. Pure serialization of an already-computed
//! region list; no decision logic.

use std::fmt::Write as _;

use crate::model::{Region, RegionKind};

/// Render the line-oriented layout descriptor:
///
/// ```text
/// [flash]
/// size is 0x9000
///
/// region at 0x000000 is [boot firmware]
/// ...
///
/// [boot firmware]
/// type is firmware
/// schema is 1
/// prefix is NMIS
/// file is firmware/boot_firmware.bin
/// ```
///
/// Regions must already be in ascending offset order.
pub fn render_layout(regions: &[Region], image_len: usize) -> String {
    let mut out = String::new();
    out.push_str("[flash]\n");
    let _ = writeln!(out, "size is {:#x}", image_len);
    out.push('\n');

    for region in regions {
        let _ = writeln!(out, "region at 0x{:06x} is [{}]", region.offset(), region.name());
    }

    for region in regions {
        out.push('\n');
        let _ = writeln!(out, "[{}]", region.name());
        match region.kind() {
            RegionKind::Firmware { schema, prefix } => {
                out.push_str("type is firmware\n");
                let _ = writeln!(out, "schema is {}", schema.number());
                let _ = writeln!(out, "prefix is {}", String::from_utf8_lossy(prefix));
                let _ = writeln!(out, "file is {}", region.file_path());
            }
            kind => {
                let _ = writeln!(out, "type is {}", kind.label());
            }
        }
    }

    out
}
