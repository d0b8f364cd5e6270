//! # Shared Model
//!
//! [`SharedPatio`] puts a controller behind one read/write lock for
//! presentation layers that touch the model from several threads. Queries
//! (`get`, `list_all`, `find_near`) may run concurrently with each other;
//! intents take the write lock and run one at a time.
//!
//! ```rust
//! use patio_core::controller::{Intent, OutOfRangePolicy, PatioController};
//! use patio_core::geometry::Vector3;
//! use patio_core::patio::Patio;
//! use patio_core::shared::SharedPatio;
//!
//! let shared = SharedPatio::new(PatioController::new(Patio::new("Deck"), OutOfRangePolicy::Warn));
//! let view = shared.clone();
//!
//! shared.apply(Intent::Remove { id: patio_core::patio::ElementId(1) }).unwrap_err();
//! assert_eq!(view.read(|c| c.patio().len())?, 0);
//! # Ok::<(), patio_core::errors::PatioError>(())
//! ```

use std::sync::{Arc, RwLock};

use crate::controller::{Intent, IntentOutcome, PatioController};
use crate::errors::{PatioError, PatioResult};

/// Cloneable handle to a controller behind a single `RwLock`.
#[derive(Debug, Clone)]
pub struct SharedPatio {
    inner: Arc<RwLock<PatioController>>,
}

impl SharedPatio {
    pub fn new(controller: PatioController) -> Self {
        Self {
            inner: Arc::new(RwLock::new(controller)),
        }
    }

    /// Run a query under the read lock.
    pub fn read<T>(&self, f: impl FnOnce(&PatioController) -> T) -> PatioResult<T> {
        let guard = self
            .inner
            .read()
            .map_err(|e| PatioError::internal(format!("patio lock poisoned: {}", e)))?;
        Ok(f(&guard))
    }

    /// Run a mutation under the write lock.
    pub fn write<T>(&self, f: impl FnOnce(&mut PatioController) -> T) -> PatioResult<T> {
        let mut guard = self
            .inner
            .write()
            .map_err(|e| PatioError::internal(format!("patio lock poisoned: {}", e)))?;
        Ok(f(&mut guard))
    }

    /// Apply an intent under the write lock.
    pub fn apply(&self, intent: Intent) -> PatioResult<IntentOutcome> {
        self.write(|controller| controller.apply(intent))?
    }
}
