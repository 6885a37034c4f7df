//! Extent resolution. Orders candidates by offset and computes each region's
//! byte length from its self-described size or from the next region's start.

use crate::error::{CarveError, CarveResult};
use crate::image::ImageBuffer;
use crate::model::{Candidate, SizedCandidate};

/// Resolve every candidate's extent and raw payload slice.
///
/// Candidates are sorted by offset; equal offsets are a contract violation
/// and fail with `DuplicateOffset`. A candidate without a self-described size
/// runs to the next region's offset, or to end-of-image for the last one, so
/// implicitly sized regions tile the image with no gaps or overlaps.
pub fn resolve_extents<'a>(
    image: &'a ImageBuffer,
    mut candidates: Vec<Candidate>,
) -> CarveResult<Vec<SizedCandidate<'a>>> {
    candidates.sort_by_key(|c| c.offset);

    for pair in candidates.windows(2) {
        if pair[0].offset == pair[1].offset {
            return Err(CarveError::DuplicateOffset {
                offset: pair[0].offset,
                first: pair[0].name.clone(),
                second: pair[1].name.clone(),
            });
        }
    }

    let ends: Vec<usize> = (0..candidates.len())
        .map(|i| candidates.get(i + 1).map_or(image.len(), |next| next.offset))
        .collect();

    let mut sized = Vec::with_capacity(candidates.len());
    for (candidate, end) in candidates.into_iter().zip(ends) {
        let size = match candidate.explicit_size {
            Some(explicit) => explicit,
            None => end - candidate.offset,
        };
        // Corrupt self-described sizes surface here as OutOfRange.
        let raw = image.slice(candidate.offset, candidate.offset + size)?;
        sized.push(SizedCandidate {
            name: candidate.name,
            offset: candidate.offset,
            size,
            kind: candidate.kind,
            raw,
        });
    }

    Ok(sized)
}
