use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Header/patch convention applied to a firmware region's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirmwareSchema {
    /// 8-byte dump header (magic + 4 dump-specific bytes), 0xFF fill trim.
    Schema1,
    /// 4-byte header; the first retained byte carries a dump-time +4 patch.
    Schema2,
    /// No header drop; the dump carries a 4-byte suffix past the source length.
    Schema4,
}

impl FirmwareSchema {
    /// The schema number as it appears in layout descriptors.
    pub fn number(self) -> u8 {
        match self {
            FirmwareSchema::Schema1 => 1,
            FirmwareSchema::Schema2 => 2,
            FirmwareSchema::Schema4 => 4,
        }
    }
}

/// Which structural family a region belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionKind {
    /// A known metadata sector at a fixed offset; a pure position marker.
    Fixed,
    /// A magic-tagged firmware blob. `prefix` is the magic the locator matched
    /// and therefore equals the first four raw bytes of the region.
    Firmware { schema: FirmwareSchema, prefix: [u8; 4] },
    /// An embedded DER certificate with a self-described length.
    Certificate,
    /// One entry of the packed http file table. `header` is the size of the
    /// entry's name-plus-length framing, as the profile's table layout
    /// defines it.
    HttpEntry { header: usize },
}

impl RegionKind {
    /// The `type` label used in layout descriptors and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            RegionKind::Fixed => "fixed",
            RegionKind::Firmware { .. } => "firmware",
            RegionKind::Certificate => "tls certificate",
            RegionKind::HttpEntry { .. } => "http file",
        }
    }
}

/// A located region before its extent is resolved.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub offset: usize,
    pub kind: RegionKind,
    /// Self-described byte length (certificates, http entries). `None` means
    /// the extent is implicit and runs to the next region's offset.
    pub explicit_size: Option<usize>,
}

/// A candidate with its extent resolved against the image.
#[derive(Debug, Clone)]
pub struct SizedCandidate<'a> {
    pub name: String,
    pub offset: usize,
    pub size: usize,
    pub kind: RegionKind,
    pub raw: &'a [u8],
}

/// A fully decomposed region. Immutable once built.
#[derive(Debug)]
pub struct Region<'a> {
    name: String,
    offset: usize,
    size: usize,
    kind: RegionKind,
    raw: &'a [u8],
    canonical: Cow<'a, [u8]>,
}

impl<'a> Region<'a> {
    pub(crate) fn new(
        name: String,
        offset: usize,
        size: usize,
        kind: RegionKind,
        raw: &'a [u8],
        canonical: Cow<'a, [u8]>,
    ) -> Self {
        Self { name, offset, size, kind, raw, canonical }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute byte offset into the image.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Resolved byte extent of the raw region.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn kind(&self) -> &RegionKind {
        &self.kind
    }

    /// The untransformed byte slice `[offset, offset + size)`.
    pub fn raw_payload(&self) -> &[u8] {
        self.raw
    }

    /// The payload after schema-specific transform and padding trim.
    pub fn canonical_payload(&self) -> &[u8] {
        &self.canonical
    }

    /// Output file path for this region, relative to the extraction root.
    pub fn file_path(&self) -> String {
        resolve_file_path(&self.name, &self.kind)
    }

    /// Serializable summary of this region's metadata.
    pub fn summary(&self) -> RegionSummary {
        let (schema, prefix) = match &self.kind {
            RegionKind::Firmware { schema, prefix } => (
                Some(schema.number()),
                Some(String::from_utf8_lossy(prefix).into_owned()),
            ),
            _ => (None, None),
        };
        RegionSummary {
            name: self.name.clone(),
            offset: self.offset,
            size: self.size,
            kind: self.kind.label().to_string(),
            schema,
            prefix,
            file: self.file_path(),
        }
    }
}

/// Flat, serializable description of one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub name: String,
    pub offset: usize,
    pub size: usize,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    pub file: String,
}

/// Resolve the output file path for a region name and kind.
///
/// Firmware parts land under `firmware/` with a `.bin` extension, fixed
/// sectors get `.bin`, certificates `.der`, and http entries keep the file
/// name from the table. Spaces and path separators become underscores.
pub fn resolve_file_path(name: &str, kind: &RegionKind) -> String {
    match kind {
        RegionKind::Firmware { .. } => format!("firmware/{}.bin", sanitize_component(name)),
        RegionKind::Fixed => format!("{}.bin", sanitize_component(name)),
        RegionKind::Certificate => format!("{}.der", sanitize_component(name)),
        RegionKind::HttpEntry { .. } => sanitize_component(name),
    }
}

fn sanitize_component(name: &str) -> String {
    name.chars().map(|c| if matches!(c, ' ' | '/' | '\\') { '_' } else { c }).collect()
}
