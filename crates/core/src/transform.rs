//! Schema-specific payload canonicalization: header stripping, byte patching,
//! and trailing-fill trim. Pure functions over byte slices.
//!
//! Schema 4 sizing is ambiguous without a reference: the dump carries a
//! 4-byte suffix past the source length, but with no reference available the
//! trailing-0xFF trim stands in and can eat legitimate 0xFF data bytes at the
//! end of the part. The reference length is treated as ground truth whenever
//! one is present.

use std::borrow::Cow;

use crate::model::{resolve_file_path, FirmwareSchema, Region, RegionKind, SizedCandidate};
use crate::verify::ReferenceStore;

/// Strip trailing 0xFF flash-fill bytes.
///
/// An all-0xFF payload trims to empty. Idempotent.
pub fn trim_trailing_fill(payload: &[u8]) -> &[u8] {
    let end = payload.iter().rposition(|&b| b != 0xFF).map_or(0, |i| i + 1);
    &payload[..end]
}

/// Canonicalize one raw region payload.
///
/// `reference_len` is only consulted for schema-4 firmware, where the
/// known-good reference length fixes the payload end. Raw slices shorter than
/// their header degrade to empty payloads.
pub fn canonical_payload<'a>(
    kind: &RegionKind,
    raw: &'a [u8],
    reference_len: Option<usize>,
) -> Cow<'a, [u8]> {
    match kind {
        RegionKind::Fixed | RegionKind::Certificate => Cow::Borrowed(raw),
        // The name+length header is table framing, not file content.
        RegionKind::HttpEntry { header } => Cow::Borrowed(raw.get(*header..).unwrap_or(&[])),
        RegionKind::Firmware { schema: FirmwareSchema::Schema1, .. } => {
            // Magic plus 4 dump-specific header bytes.
            Cow::Borrowed(trim_trailing_fill(raw.get(8..).unwrap_or(&[])))
        }
        RegionKind::Firmware { schema: FirmwareSchema::Schema2, .. } => {
            let body = raw.get(4..).unwrap_or(&[]);
            if body.is_empty() {
                return Cow::Borrowed(body);
            }
            // Undo the dump-time +4 patch on the first retained byte.
            let mut owned = body.to_vec();
            owned[0] = owned[0].wrapping_sub(4);
            let trimmed = trim_trailing_fill(&owned).len();
            owned.truncate(trimmed);
            Cow::Owned(owned)
        }
        RegionKind::Firmware { schema: FirmwareSchema::Schema4, .. } => match reference_len {
            // The dump appends a 4-byte suffix not present in the source part.
            Some(len) => Cow::Borrowed(&raw[..raw.len().min(len + 4)]),
            None => Cow::Borrowed(trim_trailing_fill(raw)),
        },
    }
}

/// Turn sized candidates into final regions by applying the transform table.
///
/// Only schema-4 firmware consults the reference store, and only for its
/// payload length.
pub fn finalize_regions<'a>(
    sized: Vec<SizedCandidate<'a>>,
    references: Option<&ReferenceStore>,
) -> Vec<Region<'a>> {
    sized
        .into_iter()
        .map(|candidate| {
            let reference_len = match (&candidate.kind, references) {
                (RegionKind::Firmware { schema: FirmwareSchema::Schema4, .. }, Some(store)) => {
                    store.get(&resolve_file_path(&candidate.name, &candidate.kind)).map(<[u8]>::len)
                }
                _ => None,
            };
            let canonical = canonical_payload(&candidate.kind, candidate.raw, reference_len);
            Region::new(
                candidate.name,
                candidate.offset,
                candidate.size,
                candidate.kind,
                candidate.raw,
                canonical,
            )
        })
        .collect()
}
