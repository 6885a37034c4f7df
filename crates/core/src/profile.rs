//! Static description of the flash map: fixed anchors, firmware magics, and
//! scan windows. All domain constants live here so that adding a sector or a
//! schema variant is a one-place change.

use crate::model::FirmwareSchema;

/// A known metadata sector at a fixed offset. Pure position marker.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnchor {
    pub name: &'static str,
    pub offset: usize,
}

/// A firmware magic to locate by its n-th occurrence in the image.
#[derive(Debug, Clone, Copy)]
pub struct FirmwareSignature {
    pub name: &'static str,
    pub magic: [u8; 4],
    pub schema: FirmwareSchema,
    /// Which occurrence of the magic belongs to this part (0-indexed).
    pub occurrence: usize,
    /// A missing required signature aborts the decomposition.
    pub required: bool,
}

/// Fixed byte window holding the packed http file table.
#[derive(Debug, Clone, Copy)]
pub struct HttpWindow {
    pub start: usize,
    pub end: usize,
    /// Width of the zero-padded, NUL-terminated name field.
    pub name_width: usize,
}

/// Static description of one flash map family.
#[derive(Debug)]
pub struct FlashProfile {
    pub fixed_anchors: &'static [FixedAnchor],
    pub firmware: &'static [FirmwareSignature],
    /// Certificates only appear before this firmware part; its offset bounds
    /// the DER scan.
    pub certificate_bound: &'static str,
    pub http: HttpWindow,
}

impl FlashProfile {
    /// The NMI-family Wi-Fi module flash map this tool was written for.
    pub fn standard() -> &'static FlashProfile {
        &STANDARD
    }
}

static STANDARD: FlashProfile = FlashProfile {
    fixed_anchors: &[
        FixedAnchor { name: "control sector", offset: 0x1000 },
        FixedAnchor { name: "backup sector", offset: 0x2000 },
        FixedAnchor { name: "pll table", offset: 0x3000 },
        FixedAnchor { name: "gain table", offset: 0x3400 },
    ],
    firmware: &[
        // NMIS occurs twice; occurrence 0 is the low-priority boot stub.
        FirmwareSignature {
            name: "boot firmware",
            magic: *b"NMIS",
            schema: FirmwareSchema::Schema1,
            occurrence: 0,
            required: true,
        },
        FirmwareSignature {
            name: "downloader firmware",
            magic: *b"NMIS",
            schema: FirmwareSchema::Schema1,
            occurrence: 1,
            required: true,
        },
        FirmwareSignature {
            name: "wifi firmware",
            magic: *b"NMID",
            schema: FirmwareSchema::Schema2,
            occurrence: 0,
            required: true,
        },
        // Absent from many dumps.
        FirmwareSignature {
            name: "burst tx firmware",
            magic: *b"FTMA",
            schema: FirmwareSchema::Schema4,
            occurrence: 0,
            required: false,
        },
    ],
    certificate_bound: "downloader firmware",
    http: HttpWindow { start: 0x7000, end: 0x8000, name_width: 32 },
};
