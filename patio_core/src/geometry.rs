//! # Geometry
//!
//! [`Vector3`] is the coordinate and extent value everything else is built on.
//! All components are in millimeters.
//!
//! ## Axes
//!
//! ```text
//!        +Y (height)
//!         │
//!         │
//!         └──────► +X (width)
//!        ╱
//!       ╱
//!     +Z (depth / length)
//! ```
//!
//! When a vector is used as an extent, `x` is the member width, `y` its height
//! and `z` its depth (the run of the board).

use serde::{Deserialize, Serialize};

use crate::errors::{PatioError, PatioResult};

/// An immutable 3D coordinate or extent in millimeters.
///
/// Components are always finite. Construction goes through [`Vector3::new`],
/// which rejects NaN and infinities, and the arithmetic re-checks its result,
/// so an overflowing sum is an `InvalidValue` rather than a stored infinity.
///
/// # Examples
///
/// ```
/// # use patio_core::geometry::Vector3;
/// let post = Vector3::new(0.0, 0.0, 1200.0)?;
/// let offset = Vector3::new(1800.0, 0.0, 0.0)?;
///
/// let next = post.checked_add(offset)?;
/// assert_eq!(next.x(), 1800.0);
/// assert_eq!(next.z(), 1200.0);
///
/// let far = Vector3::new(f64::MAX, 0.0, 0.0)?;
/// assert!(far.checked_add(far).is_err());
/// # Ok::<(), patio_core::errors::PatioError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawVector3")]
pub struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
}

/// Unvalidated wire form, checked on the way in.
#[derive(Deserialize)]
struct RawVector3 {
    x: f64,
    y: f64,
    z: f64,
}

impl TryFrom<RawVector3> for Vector3 {
    type Error = PatioError;

    fn try_from(raw: RawVector3) -> PatioResult<Self> {
        Vector3::new(raw.x, raw.y, raw.z)
    }
}

impl Vector3 {
    /// The origin `(0, 0, 0)`
    pub const ORIGIN: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    /// Creates a vector, failing with `InvalidValue` on a non-finite component.
    pub fn new(x: f64, y: f64, z: f64) -> PatioResult<Self> {
        check_finite("x", x)?;
        check_finite("y", y)?;
        check_finite("z", z)?;
        Ok(Self { x, y, z })
    }

    /// Returns the x component
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y component
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns the z component
    pub fn z(self) -> f64 {
        self.z
    }

    /// Components as an `[x, y, z]` array
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Component-wise sum, failing with `InvalidValue` if a component overflows
    pub fn checked_add(self, rhs: Vector3) -> PatioResult<Self> {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }

    /// Component-wise difference, failing with `InvalidValue` if a component overflows
    pub fn checked_sub(self, rhs: Vector3) -> PatioResult<Self> {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    /// Multiplies every component by `factor`.
    ///
    /// A non-finite factor or an overflowing product is `InvalidValue`.
    pub fn scale(self, factor: f64) -> PatioResult<Self> {
        if !factor.is_finite() {
            return Err(PatioError::invalid_value(
                "factor",
                factor.to_string(),
                "Scale factor must be a finite number",
            ));
        }
        Vector3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Euclidean length
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance between two points.
    ///
    /// May be infinite for points at opposite ends of the `f64` range.
    pub fn distance_to(self, other: Vector3) -> f64 {
        let (dx, dy, dz) = (other.x - self.x, other.y - self.y, other.z - self.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// True when every component is greater than zero.
    ///
    /// Only extents need this; positions may sit anywhere.
    pub fn is_strictly_positive(self) -> bool {
        self.x > 0.0 && self.y > 0.0 && self.z > 0.0
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Vector3::ORIGIN
    }
}

impl std::fmt::Display for Vector3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One axis of an extent, in member terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// x: member thickness
    Width,
    /// y: member face
    Height,
    /// z: member run
    Depth,
}

impl Axis {
    /// All axes in x, y, z order
    pub const ALL: [Axis; 3] = [Axis::Width, Axis::Height, Axis::Depth];

    /// The component of `v` this axis reads
    pub fn component(self, v: Vector3) -> f64 {
        match self {
            Axis::Width => v.x,
            Axis::Height => v.y,
            Axis::Depth => v.z,
        }
    }

    /// Lowercase axis name
    pub fn name(self) -> &'static str {
        match self {
            Axis::Width => "width",
            Axis::Height => "height",
            Axis::Depth => "depth",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn check_finite(field: &str, value: f64) -> PatioResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PatioError::invalid_value(
            field,
            value.to_string(),
            "Coordinate must be a finite number",
        ))
    }
}
