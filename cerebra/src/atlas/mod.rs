//! Reference atlas lookup.
//!
//! The atlas is a grayscale image in which six reserved intensity values mark
//! anatomical regions. [`AtlasRegionSet::build`] scans it once and keeps one
//! coordinate set per [`Region`], so membership tests during classification are
//! hash lookups instead of image scans.


use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::raster::{Coord, GrayImage};

/// Number of atlas regions.
pub const REGION_COUNT: usize = <Region as strum::EnumCount>::COUNT;

/// Anatomical regions encoded in the reference atlas.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
    EnumCount,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Region {
    Frontal,
    Occipital,
    BasalGanglia,
    Temporal,
    Parietal,
    CorpusCallosum,
}

impl Region {
    /// The atlas intensity that marks this region.
    #[inline]
    pub const fn atlas_value(self) -> u8 {
        match self {
            Region::Frontal => 133,
            Region::Occipital => 141,
            Region::BasalGanglia => 63,
            Region::Temporal => 213,
            Region::Parietal => 88,
            Region::CorpusCallosum => 177,
        }
    }

    /// Region marked by `value`, if it is one of the reserved intensities.
    #[inline]
    pub fn from_atlas_value(value: u8) -> Option<Self> {
        Region::iter().find(|region| region.atlas_value() == value)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Per-region pixel coordinates of an atlas image.
///
/// Built once and then shared read-only by every pipeline run. The sets are
/// disjoint because a pixel carries exactly one intensity.
#[derive(Debug, Clone)]
pub struct AtlasRegionSet {
    regions: [HashSet<Coord>; REGION_COUNT],
    width: usize,
    height: usize,
}

impl AtlasRegionSet {
    /// Indexes every pixel of `atlas` whose value is a reserved region value.
    /// Other pixels are ignored.
    pub fn build(atlas: &GrayImage) -> Self {
        let mut regions: [HashSet<Coord>; REGION_COUNT] = Default::default();

        for (row, pixels) in atlas.rows().enumerate() {
            for (col, &value) in pixels.iter().enumerate() {
                if let Some(region) = Region::from_atlas_value(value) {
                    regions[region.index()].insert(Coord::new(row, col));
                }
            }
        }

        let set = Self {
            regions,
            width: atlas.width(),
            height: atlas.height(),
        };

        log::info!(
            "Indexed {}x{} atlas: {}",
            set.width,
            set.height,
            Region::iter()
                .map(|r| format!("{}={}", r, set.len(r)))
                .collect::<Vec<_>>()
                .join(", ")
        );

        set
    }

    /// The region containing `coord`, if any.
    #[inline]
    pub fn region_at(&self, coord: Coord) -> Option<Region> {
        Region::iter().find(|region| self.regions[region.index()].contains(&coord))
    }

    #[inline]
    pub fn contains(&self, region: Region, coord: Coord) -> bool {
        self.regions[region.index()].contains(&coord)
    }

    #[inline]
    pub fn coords(&self, region: Region) -> &HashSet<Coord> {
        &self.regions[region.index()]
    }

    #[inline]
    pub fn len(&self, region: Region) -> usize {
        self.regions[region.index()].len()
    }

    /// Number of labeled pixels over all regions.
    pub fn total_len(&self) -> usize {
        self.regions.iter().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.iter().all(HashSet::is_empty)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)` of the atlas coordinate space.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}
