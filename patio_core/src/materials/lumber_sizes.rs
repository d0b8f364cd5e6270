//! Standard Lumber Sizes
//!
//! Built-in North American dimensional lumber tables, expressed as catalog
//! data. Actual sizes follow the dressed (surfaced-dry) dimensions sold for
//! nominal designations:
//!
//! - 2x nominal = 1.5" actual
//! - 4x nominal = 3.5" actual
//! - 8 nominal face = 7.25" actual
//! - stock lengths are sold in 2' steps from 8' to 20'
//!
//! Values are stored in millimeters (1.5" = 38.1 mm).

use once_cell::sync::Lazy;

use super::catalog::{Catalog, CatalogEntry, CatalogSet};
use crate::units::{Feet, Inches};

/// Thickness table: (label, actual mm, nominal)
pub const THICKNESSES: [(&str, f64, Inches); 6] = [
    ("1x", 19.05, Inches(1.0)),
    ("2x", 38.1, Inches(2.0)),
    ("3x", 63.5, Inches(3.0)),
    ("4x", 88.9, Inches(4.0)),
    ("6x", 139.7, Inches(6.0)),
    ("8x", 190.5, Inches(8.0)),
];

/// Face width table: (label, actual mm, nominal)
pub const FACE_WIDTHS: [(&str, f64, Inches); 8] = [
    ("2", 38.1, Inches(2.0)),
    ("3", 63.5, Inches(3.0)),
    ("4", 88.9, Inches(4.0)),
    ("6", 139.7, Inches(6.0)),
    ("8", 184.15, Inches(8.0)),
    ("10", 234.95, Inches(10.0)),
    ("12", 285.75, Inches(12.0)),
    ("14", 336.55, Inches(14.0)),
];

/// Stock length table: (label, actual mm, nominal)
pub const STOCK_LENGTHS: [(&str, f64, Feet); 7] = [
    ("8'", 2438.4, Feet(8.0)),
    ("10'", 3048.0, Feet(10.0)),
    ("12'", 3657.6, Feet(12.0)),
    ("14'", 4267.2, Feet(14.0)),
    ("16'", 4876.8, Feet(16.0)),
    ("18'", 5486.4, Feet(18.0)),
    ("20'", 6096.0, Feet(20.0)),
];

/// Built-in catalogs, validated once on first use
pub static NORTH_AMERICAN: Lazy<CatalogSet> = Lazy::new(|| CatalogSet {
    width: table_catalog("na-thickness", &THICKNESSES),
    height: table_catalog("na-face-width", &FACE_WIDTHS),
    depth: table_catalog("na-stock-length", &STOCK_LENGTHS),
});

fn table_catalog<N: Into<Inches> + Copy>(name: &str, table: &[(&str, f64, N)]) -> Catalog {
    let entries = table
        .iter()
        .map(|&(label, actual_mm, nominal)| CatalogEntry::new(label, actual_mm, nominal))
        .collect();
    // The tables above are constant, positive and ascending
    match Catalog::new(name, entries) {
        Ok(catalog) => catalog,
        Err(e) => unreachable!("built-in lumber table is invalid: {e}"),
    }
}

/// Thickness catalog (x axis)
pub fn thickness_catalog() -> Catalog {
    NORTH_AMERICAN.width.clone()
}

/// Face width catalog (y axis)
pub fn face_width_catalog() -> Catalog {
    NORTH_AMERICAN.height.clone()
}

/// Stock length catalog (z axis)
pub fn stock_length_catalog() -> Catalog {
    NORTH_AMERICAN.depth.clone()
}

// ============================================================================
// TESTS
// ============================================================================
