//! Signature scanning. Enumerates every region anchor in the image and
//! produces unordered candidates with partial metadata; extents are resolved
//! later by the sizer.

use std::collections::HashMap;

use crate::error::{CarveError, CarveResult};
use crate::image::ImageBuffer;
use crate::model::{Candidate, RegionKind};
use crate::profile::FlashProfile;

/// Outer DER SEQUENCE tag with a 2-byte big-endian length.
const DER_SEQUENCE_TAG: [u8; 2] = [0x30, 0x82];

/// Hands out unique region names in discovery order. Repeats get a trailing
/// occurrence counter ("tls certificate", "tls certificate 2", ...).
struct NameAllocator {
    used: HashMap<String, usize>,
}

impl NameAllocator {
    fn new() -> Self {
        Self { used: HashMap::new() }
    }

    fn allocate(&mut self, base: &str) -> String {
        let count = self.used.entry(base.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base.to_string()
        } else {
            format!("{} {}", base, count)
        }
    }
}

/// One parsed entry of the packed http file table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFileEntry {
    pub name: String,
    /// Absolute offset of the entry's name field.
    pub offset: usize,
    /// Full entry size: name field + length field + content.
    pub size: usize,
}

/// Scan the whole image for every region anchor the profile describes.
///
/// A missing fixed anchor or required firmware magic is fatal; certificate
/// and http scanning tolerate zero matches.
pub fn locate_candidates(
    image: &ImageBuffer,
    profile: &FlashProfile,
) -> CarveResult<Vec<Candidate>> {
    let mut names = NameAllocator::new();
    let mut candidates = Vec::new();

    for anchor in profile.fixed_anchors {
        if anchor.offset >= image.len() {
            return Err(CarveError::SignatureNotFound(format!(
                "{} (fixed offset {:#x})",
                anchor.name, anchor.offset
            )));
        }
        candidates.push(Candidate {
            name: names.allocate(anchor.name),
            offset: anchor.offset,
            kind: RegionKind::Fixed,
            explicit_size: None,
        });
    }

    let mut firmware_offsets: HashMap<&str, usize> = HashMap::new();
    for sig in profile.firmware {
        match image.find_nth(&sig.magic, sig.occurrence) {
            Some(offset) => {
                firmware_offsets.insert(sig.name, offset);
                candidates.push(Candidate {
                    name: names.allocate(sig.name),
                    offset,
                    kind: RegionKind::Firmware { schema: sig.schema, prefix: sig.magic },
                    explicit_size: None,
                });
            }
            None if sig.required => {
                return Err(CarveError::SignatureNotFound(format!(
                    "{} (magic \"{}\")",
                    sig.name,
                    String::from_utf8_lossy(&sig.magic)
                )));
            }
            None => {}
        }
    }

    // Certificates never appear interleaved with firmware; the scan stops at
    // the bounding firmware part.
    let cert_bound =
        firmware_offsets.get(profile.certificate_bound).copied().unwrap_or(image.len());
    for (offset, size) in scan_certificates(image, 0, cert_bound)? {
        candidates.push(Candidate {
            name: names.allocate("tls certificate"),
            offset,
            kind: RegionKind::Certificate,
            explicit_size: Some(size),
        });
    }

    for entry in scan_http_entries(image, profile.http.start, profile.http.end, profile.http.name_width)? {
        candidates.push(Candidate {
            name: names.allocate(&entry.name),
            offset: entry.offset,
            kind: RegionKind::HttpEntry { header: profile.http.name_width + 4 },
            explicit_size: Some(entry.size),
        });
    }

    Ok(candidates)
}

/// Scan `[from, to)` for embedded DER certificates.
///
/// Each hit on the sequence tag reads the following 2-byte big-endian length;
/// the region size is `4 + length` (tag + length field + content). The cursor
/// advances past each region end, so certificates are never found inside one
/// another. A hit whose extent would cross the window end is not a
/// certificate and stops the scan.
pub fn scan_certificates(
    image: &ImageBuffer,
    from: usize,
    to: usize,
) -> CarveResult<Vec<(usize, usize)>> {
    let window_end = to.min(image.len());
    let mut found = Vec::new();
    let mut cursor = from;
    while let Some(offset) = image.find(&DER_SEQUENCE_TAG, cursor, window_end) {
        if offset + 4 > window_end {
            break;
        }
        let length = image.read_u16_be(offset + 2)? as usize;
        let size = 4 + length;
        if offset + size > window_end {
            break;
        }
        found.push((offset, size));
        cursor = offset + size;
    }
    Ok(found)
}

/// Parse packed http file table entries inside `[from, to)`.
///
/// Entry layout: `name_width` bytes of zero-padded NUL-terminated name, a
/// 4-byte little-endian content length, then the content. Zero-fill padding
/// between entries is skipped; parsing stops at the first invalid name or
/// when an entry would overrun the window.
pub fn scan_http_entries(
    image: &ImageBuffer,
    from: usize,
    to: usize,
    name_width: usize,
) -> CarveResult<Vec<HttpFileEntry>> {
    let window_end = to.min(image.len());
    let mut cursor = from.min(window_end);
    let mut entries = Vec::new();

    loop {
        while cursor < window_end && image.as_bytes()[cursor] == 0 {
            cursor += 1;
        }
        if cursor + name_width + 4 > window_end {
            break;
        }
        let name = match parse_entry_name(image.slice(cursor, cursor + name_width)?) {
            Some(name) => name,
            None => break,
        };
        let length = image.read_u32_le(cursor + name_width)? as usize;
        let size = name_width + 4 + length;
        if cursor + size > window_end {
            break;
        }
        entries.push(HttpFileEntry { name, offset: cursor, size });
        cursor += size;
    }

    Ok(entries)
}

/// Bytes up to the first NUL. Valid names are non-empty printable ASCII.
fn parse_entry_name(field: &[u8]) -> Option<String> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    let name = &field[..end];
    if name.is_empty() || !name.iter().all(|&b| (0x21..=0x7E).contains(&b)) {
        return None;
    }
    Some(String::from_utf8_lossy(name).into_owned())
}
