//! Scan variants and the heading-prefix lookup used by the report helper.
//!
//! The display vocabulary itself lives with the caller: a [`HeadingLookup`]
//! resolves a [`ScanVariant`] to the prefix placed in front of every report
//! column heading.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the sampling grid was laid over the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScanVariant {
    /// Binary image, every grid placement
    #[default]
    AllGrid,
    /// Binary image, a single grid placement
    OneGrid,
    /// Grayscale image, every grid placement
    GrayAllGrid,
    /// Grayscale image, a single grid placement
    GrayOneGrid,
}

impl ScanVariant {
    /// All variants in declaration order.
    pub const ALL: [ScanVariant; 4] = [
        ScanVariant::AllGrid,
        ScanVariant::OneGrid,
        ScanVariant::GrayAllGrid,
        ScanVariant::GrayOneGrid,
    ];

    /// True for the grayscale (mass-weighted) variants.
    pub fn is_gray(self) -> bool {
        matches!(self, ScanVariant::GrayAllGrid | ScanVariant::GrayOneGrid)
    }

    /// True when the scan used more than one grid placement.
    pub fn is_all_grid(self) -> bool {
        matches!(self, ScanVariant::AllGrid | ScanVariant::GrayAllGrid)
    }
}

impl fmt::Display for ScanVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScanVariant::AllGrid => "all grids",
            ScanVariant::OneGrid => "one grid",
            ScanVariant::GrayAllGrid => "gray all grids",
            ScanVariant::GrayOneGrid => "gray one grid",
        };
        f.write_str(s)
    }
}

/// Resolves the heading prefix for a scan variant.
pub trait HeadingLookup {
    /// Prefix for every column heading of `variant`; empty if none is known.
    fn heading_prefix(&self, variant: ScanVariant) -> String;
}

impl HeadingLookup for BTreeMap<ScanVariant, String> {
    fn heading_prefix(&self, variant: ScanVariant) -> String {
        self.get(&variant).cloned().unwrap_or_default()
    }
}

impl HeadingLookup for HashMap<ScanVariant, String> {
    fn heading_prefix(&self, variant: ScanVariant) -> String {
        self.get(&variant).cloned().unwrap_or_default()
    }
}

/// Lookup without prefixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHeadings;

impl HeadingLookup for NoHeadings {
    fn heading_prefix(&self, _variant: ScanVariant) -> String {
        String::new()
    }
}
