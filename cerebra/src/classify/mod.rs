//! Atlas-based localization of a detected tumor.

#[cfg(test)]
mod tests;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::atlas::{AtlasRegionSet, REGION_COUNT, Region};
use crate::error::PipelineError;
use crate::tumor::Contour;

/// Regions the contour points fall in, in order of first encounter, each
/// listed once. Points outside every region are skipped.
pub fn classify(contour: &Contour, atlas: &AtlasRegionSet) -> Result<Vec<Region>, PipelineError> {
    if contour.frame() != atlas.dimensions() {
        return Err(PipelineError::ResolutionMismatch {
            expected: atlas.dimensions(),
            actual: contour.frame(),
        });
    }

    let mut seen = [false; REGION_COUNT];
    let mut regions = Vec::new();
    for &point in contour.points() {
        if let Some(region) = atlas.region_at(point)
            && !seen[region.index()]
        {
            seen[region.index()] = true;
            regions.push(region);
        }
    }

    Ok(regions)
}

/// Where the pipeline located the tumor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationResult {
    /// No tumor contour was detected.
    NoTumor,
    /// Regions under the tumor contour. Empty when the contour lies outside
    /// every labeled region.
    Regions(Vec<Region>),
}

impl ClassificationResult {
    pub fn from_detection(
        contour: Option<&Contour>,
        atlas: &AtlasRegionSet,
    ) -> Result<Self, PipelineError> {
        match contour {
            None => Ok(Self::NoTumor),
            Some(contour) => classify(contour, atlas).map(Self::Regions),
        }
    }

    pub fn is_tumor(&self) -> bool {
        matches!(self, Self::Regions(_))
    }

    /// Regions of a detected tumor; empty for [`Self::NoTumor`].
    pub fn regions(&self) -> &[Region] {
        match self {
            Self::NoTumor => &[],
            Self::Regions(regions) => regions,
        }
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTumor => write!(f, "no tumor found"),
            Self::Regions(regions) => {
                for (i, region) in regions.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", region)?;
                }
                Ok(())
            }
        }
    }
}
