//! Stock Size Catalogs
//!
//! A [`Catalog`] is an ascending, non-empty list of the stock sizes available
//! for one axis kind (board thickness, face width or length). Catalogs are data:
//! they can be built in code, taken from the built-in tables in
//! [`lumber_sizes`](super::lumber_sizes), or loaded from TOML.
//!
//! ## Lookup Rule
//!
//! [`Catalog::nominal_for`] rounds **up** to the smallest stock size that is at
//! least the measured value. A measurement exactly on a stock size returns that
//! size. Anything larger than the last entry is `OutOfCatalogRange`: no stock
//! member is returned when none is big enough.
//!
//! ## TOML Format
//!
//! ```toml
//! name = "framing"
//!
//! [[entries]]
//! label = "2x"
//! actual_mm = 38.1
//! nominal_in = 2.0
//!
//! [[entries]]
//! label = "4x"
//! actual_mm = 88.9
//! nominal_in = 4.0
//! ```

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{PatioError, PatioResult};
use crate::geometry::Axis;
use crate::units::Inches;

/// One stock size in a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Trade label (e.g., "2x", "10", "12'")
    pub label: String,
    /// Actual size in millimeters, compared against measurements
    pub actual_mm: f64,
    /// Nominal trade size in inches, when the label has one (2.0 for a 2x)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominal_in: Option<f64>,
}

impl CatalogEntry {
    /// Create an entry with a nominal designation (inches, or feet for lengths)
    pub fn new(label: impl Into<String>, actual_mm: f64, nominal: impl Into<Inches>) -> Self {
        Self {
            label: label.into(),
            actual_mm,
            nominal_in: Some(nominal.into().value()),
        }
    }

    /// Nominal designation as a length, if the entry has one
    pub fn nominal(&self) -> Option<Inches> {
        self.nominal_in.map(Inches)
    }

    /// Create an entry that has no nominal inch designation
    pub fn unlabeled(actual_mm: f64) -> Self {
        Self {
            label: format!("{}", actual_mm),
            actual_mm,
            nominal_in: None,
        }
    }
}

impl std::fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Ascending table of stock sizes for one axis kind.
///
/// The entry list is validated on construction and on deserialization, so a
/// `Catalog` value is always non-empty and strictly ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct Catalog {
    name: String,
    entries: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct RawCatalog {
    name: String,
    entries: Vec<CatalogEntry>,
}

impl TryFrom<RawCatalog> for Catalog {
    type Error = PatioError;

    fn try_from(raw: RawCatalog) -> PatioResult<Self> {
        Catalog::new(raw.name, raw.entries)
    }
}

impl Catalog {
    /// Create a catalog, validating the entry table.
    ///
    /// Fails with `InvalidCatalog` when the table is empty, holds a
    /// non-finite or non-positive size, or is not strictly ascending.
    pub fn new(name: impl Into<String>, entries: Vec<CatalogEntry>) -> PatioResult<Self> {
        let name = name.into();

        if entries.is_empty() {
            return Err(PatioError::invalid_catalog(name, "catalog has no entries"));
        }

        for entry in &entries {
            if !entry.actual_mm.is_finite() || entry.actual_mm <= 0.0 {
                return Err(PatioError::invalid_catalog(
                    name,
                    format!("entry '{}' has non-positive size {}", entry.label, entry.actual_mm),
                ));
            }
        }

        if let Some(pair) = entries.windows(2).find(|w| w[0].actual_mm >= w[1].actual_mm) {
            return Err(PatioError::invalid_catalog(
                name,
                format!(
                    "entries must be strictly ascending ('{}' {} mm is followed by '{}' {} mm)",
                    pair[0].label, pair[0].actual_mm, pair[1].label, pair[1].actual_mm
                ),
            ));
        }

        Ok(Self { name, entries })
    }

    /// Create a catalog from bare sizes in millimeters
    ///
    /// # Example
    ///
    /// ```rust
    /// use patio_core::materials::Catalog;
    ///
    /// let catalog = Catalog::from_sizes("framing", &[38.0, 64.0, 89.0, 140.0, 184.0])?;
    /// assert_eq!(catalog.nominal_for(50.0)?.actual_mm, 64.0);
    /// assert_eq!(catalog.nominal_for(140.0)?.actual_mm, 140.0);
    /// assert!(catalog.nominal_for(200.0).is_err());
    /// # Ok::<(), patio_core::errors::PatioError>(())
    /// ```
    pub fn from_sizes(name: impl Into<String>, sizes_mm: &[f64]) -> PatioResult<Self> {
        let entries = sizes_mm.iter().copied().map(CatalogEntry::unlabeled).collect();
        Self::new(name, entries)
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(source: &str) -> PatioResult<Self> {
        toml::from_str(source).map_err(|e| PatioError::config("<inline catalog>", e.to_string()))
    }

    /// Load a catalog from a TOML file
    pub fn load(path: impl AsRef<Path>) -> PatioResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| PatioError::config(path.display().to_string(), e.to_string()))?;
        let catalog: Catalog = toml::from_str(&content)
            .map_err(|e| PatioError::config(path.display().to_string(), e.to_string()))?;
        debug!(
            catalog = catalog.name.as_str(),
            entries = catalog.entries.len(),
            path:% = path.display();
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Catalog name (used in error messages)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in ascending order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Smallest stock size
    pub fn min(&self) -> &CatalogEntry {
        &self.entries[0]
    }

    /// Largest stock size
    pub fn max(&self) -> &CatalogEntry {
        &self.entries[self.entries.len() - 1]
    }

    /// Smallest entry whose size is at least `value_mm`.
    ///
    /// Fails with `InvalidValue` for a non-finite or non-positive measurement
    /// and with `OutOfCatalogRange` when the measurement exceeds every entry.
    pub fn nominal_for(&self, value_mm: f64) -> PatioResult<&CatalogEntry> {
        if !value_mm.is_finite() || value_mm <= 0.0 {
            return Err(PatioError::invalid_value(
                self.name.as_str(),
                value_mm.to_string(),
                "Measured size must be a positive finite number",
            ));
        }

        let index = self.entries.partition_point(|entry| entry.actual_mm < value_mm);
        match self.entries.get(index) {
            Some(entry) => Ok(entry),
            None => {
                let max_mm = self.max().actual_mm;
                debug!(catalog = self.name.as_str(), value_mm, max_mm; "Measurement exceeds catalog");
                Err(PatioError::out_of_catalog_range(self.name.as_str(), value_mm, max_mm))
            }
        }
    }

    /// Entry whose label matches exactly
    pub fn find_label(&self, label: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }
}

/// One catalog per extent axis.
///
/// There is no coupling between axes: each measurement is looked up in its own
/// catalog only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSet {
    /// Catalog for x (thickness)
    pub width: Catalog,
    /// Catalog for y (face)
    pub height: Catalog,
    /// Catalog for z (length)
    pub depth: Catalog,
}

impl CatalogSet {
    /// Bundle three catalogs
    pub fn new(width: Catalog, height: Catalog, depth: Catalog) -> Self {
        Self { width, height, depth }
    }

    /// The same catalog on every axis
    pub fn uniform(catalog: Catalog) -> Self {
        Self {
            width: catalog.clone(),
            height: catalog.clone(),
            depth: catalog,
        }
    }

    /// Catalog for an axis
    pub fn for_axis(&self, axis: Axis) -> &Catalog {
        match axis {
            Axis::Width => &self.width,
            Axis::Height => &self.height,
            Axis::Depth => &self.depth,
        }
    }

    /// Built-in North American dimensional lumber catalogs
    pub fn north_american() -> Self {
        super::lumber_sizes::NORTH_AMERICAN.clone()
    }
}

impl Default for CatalogSet {
    fn default() -> Self {
        Self::north_american()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn framing() -> Catalog {
        Catalog::from_sizes("framing", &[38.0, 64.0, 89.0, 140.0, 184.0]).unwrap()
    }

    #[test]
    fn test_rounds_up_to_next_stock_size() {
        let catalog = framing();
        assert_eq!(catalog.nominal_for(50.0).unwrap().actual_mm, 64.0);
        assert_eq!(catalog.nominal_for(1.0).unwrap().actual_mm, 38.0);
        assert_eq!(catalog.nominal_for(140.0001).unwrap().actual_mm, 184.0);
    }

    #[test]
    fn test_exact_match_returns_entry() {
        let catalog = framing();
        assert_eq!(catalog.nominal_for(140.0).unwrap().actual_mm, 140.0);
        assert_eq!(catalog.nominal_for(184.0).unwrap().actual_mm, 184.0);
    }

    #[test]
    fn test_past_range_fails() {
        let err = framing().nominal_for(200.0).unwrap_err();
        assert_eq!(err, PatioError::out_of_catalog_range("framing", 200.0, 184.0));
    }

    #[test]
    fn test_invalid_measurements() {
        let catalog = framing();
        assert!(matches!(catalog.nominal_for(0.0), Err(PatioError::InvalidValue { .. })));
        assert!(matches!(catalog.nominal_for(-3.0), Err(PatioError::InvalidValue { .. })));
        assert!(matches!(catalog.nominal_for(f64::NAN), Err(PatioError::InvalidValue { .. })));
    }

    #[test]
    fn test_catalog_validation() {
        assert!(matches!(
            Catalog::new("empty", Vec::new()),
            Err(PatioError::InvalidCatalog { .. })
        ));
        assert!(Catalog::from_sizes("unsorted", &[89.0, 38.0]).is_err());
        assert!(Catalog::from_sizes("duplicate", &[38.0, 38.0]).is_err());
        assert!(Catalog::from_sizes("zero", &[0.0, 38.0]).is_err());
        assert!(Catalog::from_sizes("nan", &[38.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_min_max_and_labels() {
        let catalog = framing();
        assert_eq!(catalog.min().actual_mm, 38.0);
        assert_eq!(catalog.max().actual_mm, 184.0);
        assert_eq!(catalog.find_label("89").map(|e| e.actual_mm), Some(89.0));
        assert!(catalog.find_label("2x").is_none());
    }

    #[test]
    fn test_from_toml() {
        let source = r#"
            name = "decking"

            [[entries]]
            label = "5/4"
            actual_mm = 25.4
            nominal_in = 1.25

            [[entries]]
            label = "2x"
            actual_mm = 38.1
            nominal_in = 2.0
        "#;
        let catalog = Catalog::from_toml_str(source).unwrap();
        assert_eq!(catalog.name(), "decking");
        assert_eq!(catalog.entries().len(), 2);
        assert_eq!(catalog.nominal_for(30.0).unwrap().label, "2x");
    }

    #[test]
    fn test_from_toml_rejects_unsorted() {
        let source = r#"
            name = "bad"

            [[entries]]
            label = "b"
            actual_mm = 50.0

            [[entries]]
            label = "a"
            actual_mm = 40.0
        "#;
        let err = Catalog::from_toml_str(source).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_catalog_set_axes() {
        let set = CatalogSet::uniform(framing());
        for axis in Axis::ALL {
            assert_eq!(set.for_axis(axis).name(), "framing");
        }
    }

    #[test]
    fn test_serialization() {
        let catalog = framing();
        let json = serde_json::to_string(&catalog).unwrap();
        let roundtrip: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(catalog, roundtrip);

        let bad = r#"{"name":"x","entries":[]}"#;
        assert!(serde_json::from_str::<Catalog>(bad).is_err());
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn catalog_strategy() -> impl Strategy<Value = Catalog> {
        prop::collection::btree_set(1u32..100_000, 1..12).prop_map(|sizes| {
            let sizes: Vec<f64> = sizes.into_iter().map(|s| s as f64 / 10.0).collect();
            Catalog::from_sizes("generated", &sizes).unwrap()
        })
    }

    /// The result is the smallest entry at least as large as the value.
    fn check_smallest_entry_at_least_value(catalog: &Catalog, value: f64) -> Result<(), TestCaseError> {
        match catalog.nominal_for(value) {
            Ok(entry) => {
                prop_assert!(entry.actual_mm >= value);
                for smaller in catalog.entries().iter().filter(|e| e.actual_mm < entry.actual_mm) {
                    prop_assert!(smaller.actual_mm < value);
                }
            }
            Err(PatioError::OutOfCatalogRange { max_mm, .. }) => {
                prop_assert!(value > max_mm);
                prop_assert_eq!(max_mm, catalog.max().actual_mm);
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
        Ok(())
    }

    /// Looking up a stock size returns that stock size.
    fn check_idempotent_at_catalog_points(catalog: &Catalog) -> Result<(), TestCaseError> {
        for entry in catalog.entries() {
            let found = catalog.nominal_for(entry.actual_mm).map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(found, entry);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn smallest_entry_at_least_value(catalog in catalog_strategy(), value in 0.01f64..12_000.0) {
            check_smallest_entry_at_least_value(&catalog, value)?;
        }

        #[test]
        fn idempotent_at_catalog_points(catalog in catalog_strategy()) {
            check_idempotent_at_catalog_points(&catalog)?;
        }
    }
}
