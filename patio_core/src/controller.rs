//! # Patio Controller
//!
//! Receives discrete user intents from the presentation layer, runs them
//! through the normalization engine and applies them to the [`Patio`].
//!
//! The controller owns the out-of-catalog decision. Under
//! [`OutOfRangePolicy::Reject`] an element that has no stock size on some axis
//! is refused. Under [`OutOfRangePolicy::Warn`] it is stored and the outcome
//! carries the warnings for the status line.
//!
//! ## Example
//!
//! ```rust
//! use patio_core::controller::{Intent, OutOfRangePolicy, PatioController};
//! use patio_core::geometry::Vector3;
//! use patio_core::patio::{ElementKind, Patio};
//!
//! let mut controller = PatioController::new(Patio::new("Deck"), OutOfRangePolicy::Warn);
//!
//! let outcome = controller.apply(Intent::Add {
//!     position: Vector3::ORIGIN,
//!     extent: Vector3::new(88.9, 88.9, 2438.4)?,
//!     label: "P-1".to_string(),
//!     kind: ElementKind::Post,
//! })?;
//!
//! assert!(outcome.warnings.is_empty());
//! assert_eq!(controller.patio().len(), 1);
//! # Ok::<(), patio_core::errors::PatioError>(())
//! ```

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::dimensions::Dimensions;
use crate::errors::{PatioError, PatioResult};
use crate::geometry::Vector3;
use crate::patio::{ElementDraft, ElementId, ElementKind, Patio};

/// What to do with an element that has no stock size on some axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRangePolicy {
    /// Refuse the intent with the first `OutOfCatalogRange` error
    Reject,
    /// Apply the intent and report the axes as warnings
    #[default]
    Warn,
}

/// A discrete user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent")]
pub enum Intent {
    /// Add a new element
    Add {
        position: Vector3,
        extent: Vector3,
        #[serde(default)]
        label: String,
        #[serde(default)]
        kind: ElementKind,
    },
    /// Remove an element
    Remove { id: ElementId },
    /// Rebuild an element with a new position and extent
    Replace {
        id: ElementId,
        position: Vector3,
        extent: Vector3,
    },
    /// Shift an element, keeping its extent
    Move { id: ElementId, offset: Vector3 },
}

/// Result of an applied intent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentOutcome {
    /// Element the intent acted on
    pub id: ElementId,
    /// Out-of-catalog conditions accepted under [`OutOfRangePolicy::Warn`]
    pub warnings: Vec<PatioError>,
}

/// Serializes user intents onto a [`Patio`].
#[derive(Debug, Clone)]
pub struct PatioController {
    patio: Patio,
    policy: OutOfRangePolicy,
}

impl PatioController {
    pub fn new(patio: Patio, policy: OutOfRangePolicy) -> Self {
        Self { patio, policy }
    }

    /// Read-only view of the model
    pub fn patio(&self) -> &Patio {
        &self.patio
    }

    pub fn policy(&self) -> OutOfRangePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: OutOfRangePolicy) {
        self.policy = policy;
    }

    /// Give the model back to the caller
    pub fn into_patio(self) -> Patio {
        self.patio
    }

    /// Normalize without touching the model, for live positioning feedback.
    pub fn preview(&self, position: Vector3, extent: Vector3) -> PatioResult<ElementDraft> {
        self.patio.propose(position, extent)
    }

    /// Apply one intent.
    ///
    /// Errors leave the model unchanged.
    pub fn apply(&mut self, intent: Intent) -> PatioResult<IntentOutcome> {
        match intent {
            Intent::Add {
                position,
                extent,
                label,
                kind,
            } => {
                let draft = self
                    .patio
                    .propose(position, extent)?
                    .with_label(label)
                    .with_kind(kind);
                let warnings = self.check_policy(draft.dimensions())?;
                let id = self.patio.commit(draft);
                Ok(IntentOutcome { id, warnings })
            }
            Intent::Remove { id } => {
                self.patio.remove(id)?;
                Ok(IntentOutcome {
                    id,
                    warnings: Vec::new(),
                })
            }
            Intent::Replace { id, position, extent } => self.replace(id, position, extent),
            Intent::Move { id, offset } => {
                let (position, extent) = self.patio.get(id)?.translated(offset)?;
                self.replace(id, position, extent)
            }
        }
    }

    fn replace(&mut self, id: ElementId, position: Vector3, extent: Vector3) -> PatioResult<IntentOutcome> {
        // Unknown identities fail before any normalization work
        self.patio.get(id)?;
        let draft = self.patio.propose(position, extent)?;
        let warnings = self.check_policy(draft.dimensions())?;
        self.patio.replace(id, position, extent)?;
        Ok(IntentOutcome { id, warnings })
    }

    fn check_policy(&self, dimensions: &Dimensions) -> PatioResult<Vec<PatioError>> {
        let errors = dimensions.nominal_errors();

        match (self.policy, errors.first()) {
            (_, None) => Ok(Vec::new()),
            (OutOfRangePolicy::Reject, Some(&first)) => {
                info!(axes = errors.len(); "Rejecting intent with out-of-catalog axes");
                Err(first.clone())
            }
            (OutOfRangePolicy::Warn, Some(_)) => {
                for error in &errors {
                    warn!("{}", error);
                }
                Ok(errors.iter().map(|&error| error.clone()).collect())
            }
        }
    }
}

/// One-line message for the presentation layer's status bar
pub fn status_message(error: &PatioError) -> String {
    match error {
        PatioError::InvalidValue { field, value, reason } => {
            format!("Rejected {} = {}: {}", field, value, reason)
        }
        PatioError::OutOfCatalogRange {
            catalog,
            value_mm,
            max_mm,
        } => format!(
            "Warning: {:.1} mm is larger than any stock size in {} (max {:.1} mm)",
            value_mm, catalog, max_mm
        ),
        PatioError::UnknownIdentity { id } => format!("Element {} no longer exists", id),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z).unwrap()
    }

    fn add(extent: Vector3, label: &str) -> Intent {
        Intent::Add {
            position: Vector3::ORIGIN,
            extent,
            label: label.to_string(),
            kind: ElementKind::Joist,
        }
    }

    fn controller(policy: OutOfRangePolicy) -> PatioController {
        PatioController::new(Patio::new("Deck"), policy)
    }

    #[test]
    fn test_add_and_remove() {
        let mut c = controller(OutOfRangePolicy::Warn);
        let outcome = c.apply(add(v(38.1, 234.95, 3657.6), "J-1")).unwrap();
        assert_eq!(outcome.id, ElementId(1));
        assert!(outcome.warnings.is_empty());
        assert_eq!(c.patio().get(outcome.id).unwrap().label(), "J-1");
        assert_eq!(c.patio().get(outcome.id).unwrap().kind(), ElementKind::Joist);

        c.apply(Intent::Remove { id: outcome.id }).unwrap();
        assert!(c.patio().is_empty());

        let err = c.apply(Intent::Remove { id: outcome.id }).unwrap_err();
        assert_eq!(err, PatioError::unknown_identity(outcome.id));
    }

    #[test]
    fn test_warn_policy_keeps_element() {
        let mut c = controller(OutOfRangePolicy::Warn);
        let outcome = c.apply(add(v(38.1, 234.95, 7000.0), "long")).unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].error_code(), "OUT_OF_CATALOG_RANGE");
        assert!(c.patio().contains(outcome.id));
    }

    #[test]
    fn test_reject_policy_refuses_element() {
        let mut c = controller(OutOfRangePolicy::Reject);
        let err = c.apply(add(v(38.1, 234.95, 7000.0), "long")).unwrap_err();
        assert!(matches!(err, PatioError::OutOfCatalogRange { .. }));
        assert!(c.patio().is_empty());
    }

    #[test]
    fn test_reject_policy_on_replace_keeps_old_element() {
        let mut c = controller(OutOfRangePolicy::Reject);
        let id = c.apply(add(v(38.1, 234.95, 3657.6), "J-1")).unwrap().id;
        let before = c.patio().get(id).unwrap().clone();

        let err = c
            .apply(Intent::Replace {
                id,
                position: Vector3::ORIGIN,
                extent: v(400.0, 234.95, 3657.6),
            })
            .unwrap_err();
        assert!(matches!(err, PatioError::OutOfCatalogRange { .. }));
        assert_eq!(*c.patio().get(id).unwrap(), before);
    }

    #[test]
    fn test_replace_and_move() {
        let mut c = controller(OutOfRangePolicy::Warn);
        let id = c.apply(add(v(38.1, 234.95, 3657.6), "J-1")).unwrap().id;

        c.apply(Intent::Replace {
            id,
            position: v(0.0, 0.0, 0.0),
            extent: v(38.1, 184.15, 2438.4),
        })
        .unwrap();
        assert_eq!(c.patio().get(id).unwrap().dimensions().designation().unwrap(), "2x8x8'");

        c.apply(Intent::Move { id, offset: v(406.4, 0.0, 0.0) }).unwrap();
        let moved = c.patio().get(id).unwrap();
        assert_eq!(moved.position(), v(406.4, 0.0, 0.0));
        assert_eq!(moved.dimensions().designation().unwrap(), "2x8x8'");
        assert_eq!(moved.label(), "J-1");
    }

    #[test]
    fn test_move_overflow_is_rejected_under_any_policy() {
        for policy in [OutOfRangePolicy::Warn, OutOfRangePolicy::Reject] {
            let mut c = controller(policy);
            let id = c
                .apply(Intent::Add {
                    position: v(1e308, 0.0, 0.0),
                    extent: v(38.1, 234.95, 3657.6),
                    label: "edge".to_string(),
                    kind: ElementKind::Joist,
                })
                .unwrap()
                .id;

            let err = c
                .apply(Intent::Move {
                    id,
                    offset: v(1e308, 0.0, 0.0),
                })
                .unwrap_err();
            assert_eq!(err.error_code(), "INVALID_VALUE");
            assert_eq!(c.patio().get(id).unwrap().position(), v(1e308, 0.0, 0.0));
        }
    }

    #[test]
    fn test_unknown_identity_on_move() {
        let mut c = controller(OutOfRangePolicy::Warn);
        let err = c
            .apply(Intent::Move {
                id: ElementId(5),
                offset: Vector3::ORIGIN,
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_IDENTITY");
    }

    #[test]
    fn test_preview_does_not_commit() {
        let c = controller(OutOfRangePolicy::Warn);
        let draft = c.preview(Vector3::ORIGIN, v(19.0, 38.0, 2438.4)).unwrap();
        assert_eq!(draft.dimensions().raw().depth, 2438.4);
        assert!(c.patio().is_empty());
    }

    #[test]
    fn test_invalid_extent_is_rejected_under_any_policy() {
        for policy in [OutOfRangePolicy::Warn, OutOfRangePolicy::Reject] {
            let mut c = controller(policy);
            let err = c.apply(add(v(38.1, 0.0, 100.0), "bad")).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_VALUE");
            assert!(c.patio().is_empty());
        }
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            status_message(&PatioError::unknown_identity(ElementId(3))),
            "Element 3 no longer exists"
        );
        assert_eq!(
            status_message(&PatioError::out_of_catalog_range("na-stock-length", 7000.0, 6096.0)),
            "Warning: 7000.0 mm is larger than any stock size in na-stock-length (max 6096.0 mm)"
        );
        assert!(status_message(&PatioError::invalid_value("width", "0", "must be positive")).starts_with("Rejected width"));
    }

    #[test]
    fn test_intent_json() {
        let json = r#"{
            "intent": "Add",
            "position": {"x": 0.0, "y": 0.0, "z": 0.0},
            "extent": {"x": 38.1, "y": 234.95, "z": 3657.6},
            "label": "J-9"
        }"#;
        let intent: Intent = serde_json::from_str(json).unwrap();
        let mut c = controller(OutOfRangePolicy::Warn);
        let outcome = c.apply(intent).unwrap();
        assert_eq!(c.patio().get(outcome.id).unwrap().kind(), ElementKind::Other);
    }
}
