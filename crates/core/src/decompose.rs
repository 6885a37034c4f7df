//! The decomposition pipeline: locate candidates, resolve extents, apply
//! payload transforms. One pass over an immutable image.

use crate::error::CarveResult;
use crate::image::ImageBuffer;
use crate::layout::render_layout;
use crate::locator::locate_candidates;
use crate::model::{Region, RegionSummary};
use crate::profile::FlashProfile;
use crate::sizer::resolve_extents;
use crate::transform::finalize_regions;
use crate::verify::ReferenceStore;

/// The result of one decomposition run: the final ordered region list.
#[derive(Debug)]
pub struct Decomposition<'a> {
    image_len: usize,
    regions: Vec<Region<'a>>,
}

impl<'a> Decomposition<'a> {
    /// Regions in ascending offset order.
    pub fn regions(&self) -> &[Region<'a>] {
        &self.regions
    }

    pub fn image_len(&self) -> usize {
        self.image_len
    }

    /// Render the textual layout descriptor for the discovered structure.
    pub fn layout_descriptor(&self) -> String {
        render_layout(&self.regions, self.image_len)
    }

    /// Serializable summaries of every region.
    pub fn summaries(&self) -> Vec<RegionSummary> {
        self.regions.iter().map(Region::summary).collect()
    }
}

/// Decompose an image against the standard flash profile.
///
/// The reference store, when given, only affects schema-4 firmware sizing;
/// verification itself is a separate step (`verify::verify_regions`).
pub fn decompose<'a>(
    image: &'a ImageBuffer,
    references: Option<&ReferenceStore>,
) -> CarveResult<Decomposition<'a>> {
    decompose_with_profile(image, FlashProfile::standard(), references)
}

/// Decompose an image against an explicit flash profile.
pub fn decompose_with_profile<'a>(
    image: &'a ImageBuffer,
    profile: &FlashProfile,
    references: Option<&ReferenceStore>,
) -> CarveResult<Decomposition<'a>> {
    let candidates = locate_candidates(image, profile)?;
    let sized = resolve_extents(image, candidates)?;
    let regions = finalize_regions(sized, references);
    Ok(Decomposition { image_len: image.len(), regions })
}
