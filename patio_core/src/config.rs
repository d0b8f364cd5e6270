//! # Engine Configuration
//!
//! TOML configuration for display units, the out-of-catalog policy and the
//! per-axis catalogs. Every section is optional; anything left out falls back
//! to metric display with two decimals, the `warn` policy and the built-in
//! North American lumber catalogs.
//!
//! ```toml
//! policy = "reject"
//!
//! [units]
//! system = "imperial"
//! precision = 3
//!
//! [catalogs]
//! # Relative paths resolve against the config file's directory
//! depth = "metric_lengths.toml"
//!
//! [catalogs.width]
//! name = "decking-thickness"
//! entries = [
//!     { label = "5/4", actual_mm = 25.4, nominal_in = 1.25 },
//!     { label = "2x", actual_mm = 38.1, nominal_in = 2.0 },
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::controller::{OutOfRangePolicy, PatioController};
use crate::dimensions::NormalizationEngine;
use crate::errors::{PatioError, PatioResult};
use crate::materials::{Catalog, CatalogSet, NORTH_AMERICAN};
use crate::patio::Patio;
use crate::units::{DisplayUnits, UnitSystem};

/// Engine configuration loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Display units for actual dimensions
    #[serde(default)]
    pub units: UnitsConfig,

    /// What the controller does with out-of-catalog elements
    #[serde(default)]
    pub policy: OutOfRangePolicy,

    /// Catalog overrides per axis
    #[serde(default)]
    pub catalogs: CatalogsConfig,

    #[serde(skip)]
    config_file_path: Option<PathBuf>,
}

/// `[units]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitsConfig {
    #[serde(default)]
    pub system: UnitSystem,

    #[serde(default = "default_precision")]
    pub precision: u8,
}

fn default_precision() -> u8 {
    DisplayUnits::default().precision()
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            system: UnitSystem::default(),
            precision: default_precision(),
        }
    }
}

/// `[catalogs]` section; a missing axis uses the built-in table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogsConfig {
    pub width: Option<CatalogSource>,
    pub height: Option<CatalogSource>,
    pub depth: Option<CatalogSource>,
}

/// Where a catalog comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogSource {
    /// Path to a catalog TOML file
    File(PathBuf),
    /// Catalog table written inline
    Inline(Catalog),
}

impl CatalogSource {
    fn resolve(&self, base_dir: Option<&Path>) -> PatioResult<Catalog> {
        match self {
            CatalogSource::Inline(catalog) => Ok(catalog.clone()),
            CatalogSource::File(path) => {
                let path = match base_dir {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path.clone(),
                };
                Catalog::load(path)
            }
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> PatioResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PatioError::config(path.display().to_string(), "file does not exist"));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| PatioError::config(path.display().to_string(), e.to_string()))?;

        let mut config: EngineConfig = toml::from_str(&content)
            .map_err(|e| PatioError::config(path.display().to_string(), e.to_string()))?;

        config.config_file_path = Some(path.to_path_buf());
        info!(path:% = path.display(); "Loaded engine configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(source: &str) -> PatioResult<Self> {
        toml::from_str(source).map_err(|e| PatioError::config("<inline config>", e.to_string()))
    }

    /// Path the configuration was loaded from, if any
    pub fn config_file_path(&self) -> Option<&Path> {
        self.config_file_path.as_deref()
    }

    /// Validated display units
    pub fn display_units(&self) -> PatioResult<DisplayUnits> {
        DisplayUnits::new(self.units.system, self.units.precision)
    }

    /// Resolve the catalog set, loading any catalog files
    pub fn catalog_set(&self) -> PatioResult<CatalogSet> {
        let base_dir = self.config_file_path.as_deref().and_then(Path::parent);
        let resolve = |source: &Option<CatalogSource>, fallback: &Catalog| match source {
            Some(source) => source.resolve(base_dir),
            None => Ok(fallback.clone()),
        };

        let set = CatalogSet::new(
            resolve(&self.catalogs.width, &NORTH_AMERICAN.width)?,
            resolve(&self.catalogs.height, &NORTH_AMERICAN.height)?,
            resolve(&self.catalogs.depth, &NORTH_AMERICAN.depth)?,
        );
        debug!(
            width = set.width.name(),
            height = set.height.name(),
            depth = set.depth.name();
            "Resolved catalogs"
        );
        Ok(set)
    }

    /// Build the normalization engine this configuration describes
    pub fn engine(&self) -> PatioResult<NormalizationEngine> {
        Ok(NormalizationEngine::new(self.catalog_set()?, self.display_units()?))
    }

    /// Build an empty patio behind a controller
    pub fn controller(&self, name: impl Into<String>) -> PatioResult<PatioController> {
        let patio = Patio::with_engine(name, self.engine()?);
        Ok(PatioController::new(patio, self.policy))
    }
}

#[cfg(test)]
mod tests {
    use std::env::temp_dir;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config.display_units().unwrap(), DisplayUnits::default());
        assert_eq!(config.policy, OutOfRangePolicy::Warn);
        assert_eq!(config.catalog_set().unwrap(), CatalogSet::north_american());
        assert!(config.config_file_path().is_none());
    }

    #[test]
    fn test_inline_catalog_and_units() {
        let source = r#"
            policy = "reject"

            [units]
            system = "imperial"
            precision = 3

            [catalogs.width]
            name = "framing"
            entries = [
                { label = "a", actual_mm = 38.0 },
                { label = "b", actual_mm = 64.0 },
            ]
        "#;
        let config = EngineConfig::from_toml_str(source).unwrap();
        assert_eq!(config.policy, OutOfRangePolicy::Reject);
        assert_eq!(
            config.display_units().unwrap(),
            DisplayUnits::new(UnitSystem::Imperial, 3).unwrap()
        );

        let set = config.catalog_set().unwrap();
        assert_eq!(set.width.name(), "framing");
        assert_eq!(set.height, NORTH_AMERICAN.height);

        let controller = config.controller("Deck").unwrap();
        assert_eq!(controller.policy(), OutOfRangePolicy::Reject);
        assert_eq!(controller.patio().meta().name, "Deck");
    }

    #[test]
    fn test_bad_precision() {
        let config = EngineConfig::from_toml_str("[units]\nprecision = 12\n").unwrap();
        assert_eq!(config.display_units().unwrap_err().error_code(), "INVALID_VALUE");
    }

    #[test]
    fn test_invalid_toml() {
        let err = EngineConfig::from_toml_str("policy = 7").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load(temp_dir().join("patio_test_missing.toml")).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_load_with_relative_catalog_file() {
        let dir = temp_dir().join("patio_test_config_relative");
        fs::create_dir_all(&dir).unwrap();

        let catalog_path = dir.join("lengths.toml");
        fs::write(
            &catalog_path,
            r#"
                name = "metric-lengths"

                [[entries]]
                label = "2.4m"
                actual_mm = 2400.0

                [[entries]]
                label = "3.6m"
                actual_mm = 3600.0
            "#,
        )
        .unwrap();

        let config_path = dir.join("patio.toml");
        fs::write(&config_path, "[catalogs]\ndepth = \"lengths.toml\"\n").unwrap();

        let config = EngineConfig::load(&config_path).unwrap();
        assert_eq!(config.config_file_path(), Some(config_path.as_path()));

        let engine = config.engine().unwrap();
        assert_eq!(engine.catalogs().depth.name(), "metric-lengths");
        assert_eq!(
            engine
                .nominal_for(crate::geometry::Axis::Depth, 3000.0)
                .unwrap()
                .label,
            "3.6m"
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_catalog_file() {
        let config = EngineConfig::from_toml_str("[catalogs]\nwidth = \"/nonexistent/patio/catalog.toml\"\n").unwrap();
        assert_eq!(config.catalog_set().unwrap_err().error_code(), "CONFIG_ERROR");
    }
}
