//! # patio_core - Patio Dimensioning Engine
//!
//! `patio_core` turns raw measured extents from a patio/deck design tool into
//! buildable lumber sizes, and keeps the set of dimensioned structural elements
//! that make up a design.
//!
//! ## Design Philosophy
//!
//! - **Immutable values**: `Vector3` and `Dimensions` are rebuilt, never patched
//! - **Catalogs are data**: stock sizes live in tables that can be loaded from TOML
//! - **Round up, never down**: an undersized member is unsafe, so nominal lookup
//!   picks the next stock size and fails past the end of the catalog
//! - **Rich Errors**: structured, serializable error types
//!
//! ## Quick Start
//!
//! ```rust
//! use patio_core::geometry::Vector3;
//! use patio_core::patio::Patio;
//!
//! let mut patio = Patio::new("Backyard deck");
//! let draft = patio.propose(Vector3::ORIGIN, Vector3::new(19.0, 38.0, 2438.4)?)?;
//! let id = patio.commit(draft);
//!
//! let json = serde_json::to_string_pretty(patio.get(id)?).unwrap();
//! assert!(json.contains("nominal"));
//! # Ok::<(), patio_core::errors::PatioError>(())
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - `Vector3` coordinates and extents
//! - [`units`] - Length newtypes and display unit systems
//! - [`materials`] - Stock size catalogs and built-in lumber tables
//! - [`dimensions`] - The dimension normalization engine
//! - [`patio`] - The structural position model
//! - [`controller`] - User intents applied to the model
//! - [`shared`] - Lock wrapper for multi-threaded callers
//! - [`config`] - TOML engine configuration
//! - [`errors`] - Structured error types

pub mod config;
pub mod controller;
pub mod dimensions;
pub mod errors;
pub mod geometry;
pub mod materials;
pub mod patio;
pub mod shared;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use config::EngineConfig;
pub use controller::{Intent, IntentOutcome, OutOfRangePolicy, PatioController};
pub use dimensions::{Dimensions, NormalizationEngine};
pub use errors::{PatioError, PatioResult};
pub use geometry::{Axis, Vector3};
pub use materials::{Catalog, CatalogEntry, CatalogSet};
pub use patio::{Element, ElementDraft, ElementId, ElementKind, Patio};
pub use shared::SharedPatio;
pub use units::{DisplayUnits, UnitSystem};
