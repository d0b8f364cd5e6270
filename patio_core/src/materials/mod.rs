//! # Materials
//!
//! Stock size data for structural members.
//!
//! - [`catalog`] - The catalog type and its round-up lookup
//! - [`lumber_sizes`] - Built-in North American dimensional lumber tables
//!
//! ## Example
//!
//! ```rust
//! use patio_core::materials::CatalogSet;
//!
//! let catalogs = CatalogSet::north_american();
//! let thickness = catalogs.width.nominal_for(36.0)?;
//! assert_eq!(thickness.label, "2x");
//! # Ok::<(), patio_core::errors::PatioError>(())
//! ```

pub mod catalog;
pub mod lumber_sizes;

pub use catalog::{Catalog, CatalogEntry, CatalogSet};
pub use lumber_sizes::{face_width_catalog, stock_length_catalog, thickness_catalog, NORTH_AMERICAN};
