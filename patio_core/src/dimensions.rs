//! # Dimension Normalization
//!
//! Turns a measured extent into a [`Dimensions`] value with three parallel
//! forms:
//!
//! - **raw**: the measured millimeters, straight from the [`Vector3`]
//!   (width←x, height←y, depth←z)
//! - **actual**: raw converted into the display unit and rounded to the
//!   display precision
//! - **nominal**: each axis independently rounded up to the next stock size in
//!   that axis' [`Catalog`](crate::materials::Catalog)
//!
//! A measurement larger than every stock size is recorded on its nominal axis
//! as `OutOfCatalogRange`. The raw and actual forms are still populated, so the
//! caller can show the numbers and warn that no stock member fits.
//!
//! `Dimensions` is immutable. When an element moves or is resized a new value
//! is built.
//!
//! ## Example
//!
//! ```rust
//! use patio_core::dimensions::NormalizationEngine;
//! use patio_core::geometry::Vector3;
//! use patio_core::units::DisplayUnits;
//!
//! let engine = NormalizationEngine::default().with_units(DisplayUnits::imperial());
//! let dims = engine.from_extent(Vector3::new(36.0, 230.0, 3600.0)?)?;
//!
//! assert_eq!(dims.actual().width, 1.42);
//! assert_eq!(dims.designation()?, "2x10x12'");
//! assert_eq!(dims.board_feet(), Some(20.0));
//! # Ok::<(), patio_core::errors::PatioError>(())
//! ```

use log::{trace, warn};
use serde::Serialize;

use crate::errors::{PatioError, PatioResult};
use crate::geometry::{Axis, Vector3};
use crate::materials::{CatalogEntry, CatalogSet, NORTH_AMERICAN};
use crate::units::{DisplayUnits, Feet};

/// Measured size in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawDimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl RawDimensions {
    /// Read an extent, rejecting any zero or negative component
    pub fn from_extent(extent: Vector3) -> PatioResult<Self> {
        for axis in Axis::ALL {
            let value = axis.component(extent);
            if value <= 0.0 {
                return Err(PatioError::invalid_value(
                    axis.name(),
                    value.to_string(),
                    "A structural member must have positive size",
                ));
            }
        }
        Ok(Self {
            width: extent.x(),
            height: extent.y(),
            depth: extent.z(),
        })
    }

    /// Value on one axis
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Width => self.width,
            Axis::Height => self.height,
            Axis::Depth => self.depth,
        }
    }

    /// The extent these dimensions were measured from
    pub fn to_extent(&self) -> PatioResult<Vector3> {
        Vector3::new(self.width, self.height, self.depth)
    }
}

/// Raw size in display units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActualDimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// Unit system and precision the values are expressed in
    pub units: DisplayUnits,
}

impl ActualDimensions {
    fn from_raw(raw: &RawDimensions, units: DisplayUnits) -> Self {
        Self {
            width: units.convert(raw.width),
            height: units.convert(raw.height),
            depth: units.convert(raw.depth),
            units,
        }
    }

    /// Value on one axis
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Width => self.width,
            Axis::Height => self.height,
            Axis::Depth => self.depth,
        }
    }

    /// Human-readable "w x h x d unit" string
    pub fn display(&self) -> String {
        let p = self.units.precision() as usize;
        format!(
            "{:.*} x {:.*} x {:.*} {}",
            p,
            self.width,
            p,
            self.height,
            p,
            self.depth,
            self.units.system().symbol()
        )
    }
}

/// Catalog lookup result per axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NominalDimensions {
    pub width: PatioResult<CatalogEntry>,
    pub height: PatioResult<CatalogEntry>,
    pub depth: PatioResult<CatalogEntry>,
}

impl NominalDimensions {
    /// Lookup result on one axis
    pub fn get(&self, axis: Axis) -> &PatioResult<CatalogEntry> {
        match axis {
            Axis::Width => &self.width,
            Axis::Height => &self.height,
            Axis::Depth => &self.depth,
        }
    }

    /// True when all three axes found a stock size
    pub fn is_complete(&self) -> bool {
        Axis::ALL.iter().all(|&axis| self.get(axis).is_ok())
    }
}

/// Raw, actual and nominal dimensions of one structural extent.
///
/// Built by [`NormalizationEngine::from_extent`] or [`Dimensions::from_extent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimensions {
    raw: RawDimensions,
    actual: ActualDimensions,
    nominal: NominalDimensions,
}

impl Dimensions {
    /// Normalize against the built-in North American catalogs
    pub fn from_extent(extent: Vector3, units: DisplayUnits) -> PatioResult<Self> {
        normalize(extent, units, &NORTH_AMERICAN)
    }

    /// Measured millimeters
    pub fn raw(&self) -> &RawDimensions {
        &self.raw
    }

    /// Display-unit values
    pub fn actual(&self) -> &ActualDimensions {
        &self.actual
    }

    /// Stock sizes per axis
    pub fn nominal(&self) -> &NominalDimensions {
        &self.nominal
    }

    /// Display units used for `actual`
    pub fn units(&self) -> DisplayUnits {
        self.actual.units
    }

    /// True when every axis fits a stock size
    pub fn is_stock(&self) -> bool {
        self.nominal.is_complete()
    }

    /// Axes whose measurement exceeds the catalog
    pub fn out_of_range_axes(&self) -> Vec<Axis> {
        Axis::ALL
            .into_iter()
            .filter(|&axis| self.nominal.get(axis).is_err())
            .collect()
    }

    /// Errors of the out-of-range axes, in width, height, depth order
    pub fn nominal_errors(&self) -> Vec<&PatioError> {
        Axis::ALL
            .iter()
            .filter_map(|&axis| self.nominal.get(axis).as_ref().err())
            .collect()
    }

    /// Trade designation such as `2x10x12'`.
    ///
    /// Fails with the first out-of-range axis error.
    pub fn designation(&self) -> PatioResult<String> {
        let width = self.nominal.width.as_ref().map_err(PatioError::clone)?;
        let height = self.nominal.height.as_ref().map_err(PatioError::clone)?;
        let depth = self.nominal.depth.as_ref().map_err(PatioError::clone)?;
        Ok(format!(
            "{}x{}x{}",
            width.label.trim_end_matches('x'),
            height.label,
            depth.label
        ))
    }

    /// Board feet from the nominal inch designations.
    ///
    /// `None` if any axis is out of range or its entry has no nominal inches.
    pub fn board_feet(&self) -> Option<f64> {
        let width = self.nominal.width.as_ref().ok()?.nominal()?;
        let height = self.nominal.height.as_ref().ok()?.nominal()?;
        let length = Feet::from(self.nominal.depth.as_ref().ok()?.nominal()?);
        // in x in x ft / 12
        Some(width.value() * height.value() * length.value() / 12.0)
    }
}

/// Builds [`Dimensions`] from extents with a fixed catalog set and display units.
///
/// The engine holds no mutable state; every call is a pure function of the
/// extent and the engine's configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationEngine {
    catalogs: CatalogSet,
    units: DisplayUnits,
}

impl NormalizationEngine {
    /// Create an engine
    pub fn new(catalogs: CatalogSet, units: DisplayUnits) -> Self {
        Self { catalogs, units }
    }

    /// Replace the display units
    pub fn with_units(mut self, units: DisplayUnits) -> Self {
        self.units = units;
        self
    }

    /// Replace the catalogs
    pub fn with_catalogs(mut self, catalogs: CatalogSet) -> Self {
        self.catalogs = catalogs;
        self
    }

    /// Catalogs used for nominal lookup
    pub fn catalogs(&self) -> &CatalogSet {
        &self.catalogs
    }

    /// Default display units
    pub fn units(&self) -> DisplayUnits {
        self.units
    }

    /// Normalize an extent in the engine's display units.
    ///
    /// Fails with `InvalidValue` when any component is zero or negative.
    /// Out-of-range axes do not fail the call; see [`Dimensions::nominal`].
    pub fn from_extent(&self, extent: Vector3) -> PatioResult<Dimensions> {
        normalize(extent, self.units, &self.catalogs)
    }

    /// Normalize an extent in caller-chosen display units
    pub fn from_extent_in(&self, extent: Vector3, units: DisplayUnits) -> PatioResult<Dimensions> {
        normalize(extent, units, &self.catalogs)
    }

    /// Stock size for one axis measurement
    pub fn nominal_for(&self, axis: Axis, value_mm: f64) -> PatioResult<&CatalogEntry> {
        self.catalogs.for_axis(axis).nominal_for(value_mm)
    }
}

impl Default for NormalizationEngine {
    fn default() -> Self {
        Self::new(CatalogSet::north_american(), DisplayUnits::default())
    }
}

fn normalize(extent: Vector3, units: DisplayUnits, catalogs: &CatalogSet) -> PatioResult<Dimensions> {
    let raw = RawDimensions::from_extent(extent)?;
    let actual = ActualDimensions::from_raw(&raw, units);
    let lookup = |axis: Axis| catalogs.for_axis(axis).nominal_for(raw.get(axis)).cloned();
    let nominal = NominalDimensions {
        width: lookup(Axis::Width),
        height: lookup(Axis::Height),
        depth: lookup(Axis::Depth),
    };

    if !nominal.is_complete() {
        warn!(extent:% = extent; "Extent has no stock size on at least one axis");
    }
    trace!(extent:% = extent, units:? = units; "Normalized extent");

    Ok(Dimensions { raw, actual, nominal })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::units::UnitSystem;

    fn extent_strategy() -> impl Strategy<Value = Vector3> {
        (0.001f64..50_000.0, 0.001f64..50_000.0, 0.001f64..50_000.0)
            .prop_map(|(x, y, z)| Vector3::new(x, y, z).unwrap())
    }

    fn units_strategy() -> impl Strategy<Value = DisplayUnits> {
        (prop::sample::select(UnitSystem::ALL.to_vec()), 0u8..6)
            .prop_map(|(system, precision)| DisplayUnits::new(system, precision).unwrap())
    }

    /// actual = raw * factor within the display rounding, and converts back.
    fn check_actual_roundtrip(extent: Vector3, units: DisplayUnits) -> Result<(), TestCaseError> {
        let dims = Dimensions::from_extent(extent, units).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let factor = units.system().factor();
        let inverse = units.system().inverse_factor();
        // Slack for the floating-point error of the multiply itself
        let tolerance = units.tolerance() + 1e-9;

        for axis in Axis::ALL {
            let raw = dims.raw().get(axis);
            let actual = dims.actual().get(axis);
            prop_assert_eq!(raw, axis.component(extent));
            prop_assert!((actual - raw * factor).abs() <= tolerance);
            prop_assert!((actual * inverse - raw).abs() <= tolerance * inverse);
        }
        Ok(())
    }

    /// Nominal entries are always catalog members at least as large as raw.
    fn check_nominal_in_catalog(extent: Vector3) -> Result<(), TestCaseError> {
        let engine = NormalizationEngine::default();
        let dims = engine.from_extent(extent).map_err(|e| TestCaseError::fail(e.to_string()))?;

        for axis in Axis::ALL {
            let catalog = engine.catalogs().for_axis(axis);
            match dims.nominal().get(axis) {
                Ok(entry) => {
                    prop_assert!(catalog.entries().contains(entry));
                    prop_assert!(entry.actual_mm >= dims.raw().get(axis));
                }
                Err(_) => prop_assert!(dims.raw().get(axis) > catalog.max().actual_mm),
            }
        }
        Ok(())
    }

    /// Rebuilding from the same extent gives an equal value.
    fn check_deterministic(extent: Vector3, units: DisplayUnits) -> Result<(), TestCaseError> {
        let a = Dimensions::from_extent(extent, units).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let b = Dimensions::from_extent(extent, units).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(&a, &b);
        prop_assert!(approx_eq!(f64, a.actual().width, b.actual().width));
        Ok(())
    }

    proptest! {
        #[test]
        fn actual_roundtrip(extent in extent_strategy(), units in units_strategy()) {
            check_actual_roundtrip(extent, units)?;
        }

        #[test]
        fn nominal_in_catalog(extent in extent_strategy()) {
            check_nominal_in_catalog(extent)?;
        }

        #[test]
        fn deterministic(extent in extent_strategy(), units in units_strategy()) {
            check_deterministic(extent, units)?;
        }

        #[test]
        fn non_positive_extent_rejected(
            good in 0.001f64..1000.0,
            bad in -1000.0f64..=0.0,
            axis in 0usize..3,
        ) {
            let mut components = [good, good, good];
            components[axis] = bad;
            let extent = Vector3::new(components[0], components[1], components[2]).unwrap();
            let result = Dimensions::from_extent(extent, DisplayUnits::default());
            let rejected = matches!(result, Err(PatioError::InvalidValue { .. }));
            prop_assert!(rejected, "expected InvalidValue, got {:?}", result);
        }
    }
}
