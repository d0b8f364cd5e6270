//! # Unit Types
//!
//! Length newtypes and the display unit selection used for *actual*
//! dimensions. Measurements enter the engine in millimeters; the display unit
//! is only applied when building the actual representation.
//!
//! ## Conversion
//!
//! Conversions are pure multiplicative transforms:
//! - 1 in = 25.4 mm (exact)
//! - 1 ft = 12 in
//!
//! ## Example
//!
//! ```rust
//! use patio_core::units::{Feet, Inches, Millimeters, UnitSystem};
//!
//! let stock = Feet(8.0);
//! let mm: Millimeters = Inches::from(stock).into();
//! assert!((mm.0 - 2438.4).abs() < 1e-9);
//!
//! assert_eq!(UnitSystem::Imperial.to_display(25.4), 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{PatioError, PatioResult};

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Largest supported display precision (decimal places)
pub const MAX_PRECISION: u8 = 9;

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

impl From<Inches> for Millimeters {
    fn from(inches: Inches) -> Self {
        Millimeters(inches.0 * MM_PER_INCH)
    }
}

impl From<Millimeters> for Inches {
    fn from(mm: Millimeters) -> Self {
        Inches(mm.0 / MM_PER_INCH)
    }
}

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

macro_rules! impl_length {
    ($type:ty) => {
        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_length!(Millimeters);
impl_length!(Inches);
impl_length!(Feet);

// ============================================================================
// Unit Systems
// ============================================================================

/// Display unit system for actual dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Millimeters
    #[default]
    Metric,
    /// Inches
    Imperial,
}

impl UnitSystem {
    /// All systems for UI selection
    pub const ALL: [UnitSystem; 2] = [UnitSystem::Metric, UnitSystem::Imperial];

    /// Multiplier taking millimeters to this system's display unit
    pub fn factor(self) -> f64 {
        match self {
            UnitSystem::Metric => 1.0,
            UnitSystem::Imperial => 1.0 / MM_PER_INCH,
        }
    }

    /// Multiplier taking the display unit back to millimeters
    pub fn inverse_factor(self) -> f64 {
        match self {
            UnitSystem::Metric => 1.0,
            UnitSystem::Imperial => MM_PER_INCH,
        }
    }

    /// Millimeters to display unit, unrounded
    pub fn to_display(self, mm: f64) -> f64 {
        match self {
            UnitSystem::Metric => mm,
            UnitSystem::Imperial => Inches::from(Millimeters(mm)).value(),
        }
    }

    /// Display unit back to millimeters
    pub fn from_display(self, value: f64) -> f64 {
        match self {
            UnitSystem::Metric => value,
            UnitSystem::Imperial => Millimeters::from(Inches(value)).value(),
        }
    }

    /// Unit symbol (e.g., "mm", "in")
    pub fn symbol(self) -> &'static str {
        match self {
            UnitSystem::Metric => "mm",
            UnitSystem::Imperial => "in",
        }
    }

    /// Get display name
    pub fn display_name(self) -> &'static str {
        match self {
            UnitSystem::Metric => "Metric (mm)",
            UnitSystem::Imperial => "Imperial (in)",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = PatioError;

    fn from_str(s: &str) -> PatioResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "mm" => Ok(UnitSystem::Metric),
            "imperial" | "in" | "inches" => Ok(UnitSystem::Imperial),
            other => Err(PatioError::invalid_value(
                "unit_system",
                other,
                "Expected 'metric' or 'imperial'",
            )),
        }
    }
}

/// Unit system plus the number of decimal places shown.
///
/// Precision never exceeds [`MAX_PRECISION`]; deserialization goes through
/// [`DisplayUnits::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDisplayUnits")]
pub struct DisplayUnits {
    system: UnitSystem,
    precision: u8,
}

#[derive(Deserialize)]
struct RawDisplayUnits {
    system: UnitSystem,
    precision: u8,
}

impl TryFrom<RawDisplayUnits> for DisplayUnits {
    type Error = PatioError;

    fn try_from(raw: RawDisplayUnits) -> PatioResult<Self> {
        DisplayUnits::new(raw.system, raw.precision)
    }
}

impl DisplayUnits {
    /// Create display units, rejecting precision above [`MAX_PRECISION`]
    pub fn new(system: UnitSystem, precision: u8) -> PatioResult<Self> {
        if precision > MAX_PRECISION {
            return Err(PatioError::invalid_value(
                "precision",
                precision.to_string(),
                format!("Precision must be at most {} decimal places", MAX_PRECISION),
            ));
        }
        Ok(Self { system, precision })
    }

    /// Display unit system
    pub fn system(self) -> UnitSystem {
        self.system
    }

    /// Decimal places kept in actual dimensions
    pub fn precision(self) -> u8 {
        self.precision
    }

    /// Same precision in another unit system
    pub fn with_system(self, system: UnitSystem) -> Self {
        Self { system, ..self }
    }

    /// Metric display at the default precision
    pub fn metric() -> Self {
        Self::default()
    }

    /// Imperial display at the default precision
    pub fn imperial() -> Self {
        Self {
            system: UnitSystem::Imperial,
            ..Self::default()
        }
    }

    /// Round a display value to `precision` decimal places
    pub fn round(self, value: f64) -> f64 {
        let scale = 10f64.powi(self.precision as i32);
        let scaled = value * scale;
        if !scaled.is_finite() {
            return value;
        }
        scaled.round() / scale
    }

    /// Convert millimeters to the rounded display value
    pub fn convert(self, mm: f64) -> f64 {
        self.round(self.system.to_display(mm))
    }

    /// Largest rounding error in display units (half of the last place)
    pub fn tolerance(self) -> f64 {
        0.5 * 10f64.powi(-(self.precision as i32))
    }

    /// Format a value with its unit symbol
    pub fn format(self, value: f64) -> String {
        format!("{:.*} {}", self.precision as usize, value, self.system.symbol())
    }
}

impl Default for DisplayUnits {
    fn default() -> Self {
        Self {
            system: UnitSystem::Metric,
            precision: 2,
        }
    }
}
