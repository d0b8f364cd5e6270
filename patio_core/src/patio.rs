//! # Structural Position Model
//!
//! The [`Patio`] is the single owner of every committed structural element.
//! Callers never hold references they can mutate; they work through
//! [`ElementId`] handles.
//!
//! ## Element Lifecycle
//!
//! ```text
//! propose(position, extent) ──► ElementDraft        (model untouched)
//!                                    │
//!                              commit(draft)
//!                                    ▼
//!                          Element { id, .. }         (committed)
//!                            │              │
//!             replace / translate         remove(id)
//!          (same id, new Dimensions)        ▼
//!                                       id retired, never reused
//! ```
//!
//! ## Structure
//!
//! ```text
//! Patio
//! ├── meta: PatioMetadata (name, timestamps)
//! ├── engine: NormalizationEngine (catalogs, display units)
//! └── elements: BTreeMap<ElementId, Element>
//! ```
//!
//! Identities are handed out in increasing order, so iterating the map by key
//! is insertion order.
//!
//! ## Example
//!
//! ```rust
//! use patio_core::geometry::Vector3;
//! use patio_core::patio::{ElementKind, Patio};
//!
//! let mut patio = Patio::new("Backyard deck");
//!
//! let draft = patio
//!     .propose(Vector3::ORIGIN, Vector3::new(38.1, 184.15, 3657.6)?)?
//!     .with_label("J-1")
//!     .with_kind(ElementKind::Joist);
//! let id = patio.commit(draft);
//!
//! assert_eq!(patio.get(id)?.dimensions().designation()?, "2x8x12'");
//! # Ok::<(), patio_core::errors::PatioError>(())
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::dimensions::{Dimensions, NormalizationEngine};
use crate::errors::{PatioError, PatioResult};
use crate::geometry::Vector3;

/// Stable handle of a committed element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural role of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ElementKind {
    Post,
    Beam,
    Joist,
    Decking,
    Ledger,
    #[default]
    Other,
}

impl ElementKind {
    /// All kinds for UI selection
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Post,
        ElementKind::Beam,
        ElementKind::Joist,
        ElementKind::Decking,
        ElementKind::Ledger,
        ElementKind::Other,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ElementKind::Post => "Post",
            ElementKind::Beam => "Beam",
            ElementKind::Joist => "Joist",
            ElementKind::Decking => "Decking",
            ElementKind::Ledger => "Ledger",
            ElementKind::Other => "Other",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A normalized element that has not been committed yet.
///
/// Drafts are what the presentation layer shows while the user is still
/// dragging an element around.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementDraft {
    position: Vector3,
    dimensions: Dimensions,
    label: String,
    kind: ElementKind,
}

impl ElementDraft {
    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the structural role
    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }
}

/// A committed structural element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    id: ElementId,
    position: Vector3,
    dimensions: Dimensions,
    label: String,
    kind: ElementKind,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Position and extent after shifting by `offset`.
    ///
    /// Fails with `InvalidValue` if the new position overflows.
    pub fn translated(&self, offset: Vector3) -> PatioResult<(Vector3, Vector3)> {
        let position = self.position.checked_add(offset)?;
        Ok((position, self.dimensions.raw().to_extent()?))
    }
}

impl PartialEq<ElementDraft> for Element {
    fn eq(&self, draft: &ElementDraft) -> bool {
        self.position == draft.position
            && self.dimensions == draft.dimensions
            && self.label == draft.label
            && self.kind == draft.kind
    }
}

/// Patio metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatioMetadata {
    /// Design name
    pub name: String,

    /// When the design was created
    pub created: DateTime<Utc>,

    /// When an element was last committed, replaced or removed
    pub modified: DateTime<Utc>,
}

/// The set of committed structural elements.
#[derive(Debug, Clone, Serialize)]
pub struct Patio {
    meta: PatioMetadata,
    engine: NormalizationEngine,
    elements: BTreeMap<ElementId, Element>,
    next_id: u64,
}

impl Patio {
    /// Create an empty patio using the built-in catalogs and metric display
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_engine(name, NormalizationEngine::default())
    }

    /// Create an empty patio with a configured engine
    pub fn with_engine(name: impl Into<String>, engine: NormalizationEngine) -> Self {
        let now = Utc::now();
        Patio {
            meta: PatioMetadata {
                name: name.into(),
                created: now,
                modified: now,
            },
            engine,
            elements: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn meta(&self) -> &PatioMetadata {
        &self.meta
    }

    /// Engine used for every proposal and replacement
    pub fn engine(&self) -> &NormalizationEngine {
        &self.engine
    }

    /// Normalize an extent into a draft placed at `position`.
    ///
    /// The model is not modified.
    pub fn propose(&self, position: Vector3, extent: Vector3) -> PatioResult<ElementDraft> {
        let dimensions = self.engine.from_extent(extent)?;
        Ok(ElementDraft {
            position,
            dimensions,
            label: String::new(),
            kind: ElementKind::default(),
        })
    }

    /// Store a draft under a fresh identity and return it.
    pub fn commit(&mut self, draft: ElementDraft) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;

        info!(id = id.0, label = draft.label.as_str(), kind:% = draft.kind; "Committing element");
        self.elements.insert(
            id,
            Element {
                id,
                position: draft.position,
                dimensions: draft.dimensions,
                label: draft.label,
                kind: draft.kind,
            },
        );
        self.touch();
        id
    }

    /// Remove an element and retire its identity.
    pub fn remove(&mut self, id: ElementId) -> PatioResult<Element> {
        let element = self
            .elements
            .remove(&id)
            .ok_or_else(|| PatioError::unknown_identity(id))?;
        info!(id = id.0; "Removed element");
        self.touch();
        Ok(element)
    }

    /// Rebuild an element at a new position and extent under the same identity.
    ///
    /// Label and kind are kept. On error the existing element is untouched.
    pub fn replace(&mut self, id: ElementId, position: Vector3, extent: Vector3) -> PatioResult<&Element> {
        let (label, kind) = {
            let current = self.get(id)?;
            (current.label.clone(), current.kind)
        };
        let dimensions = self.engine.from_extent(extent)?;

        self.elements.insert(
            id,
            Element {
                id,
                position,
                dimensions,
                label,
                kind,
            },
        );
        debug!(id = id.0, position:% = position, extent:% = extent; "Replaced element");
        self.touch();
        self.get(id)
    }

    /// Move an element by `offset`, keeping its extent.
    pub fn translate(&mut self, id: ElementId, offset: Vector3) -> PatioResult<&Element> {
        let (position, extent) = self.get(id)?.translated(offset)?;
        self.replace(id, position, extent)
    }

    /// Vector from element `from` to element `to`.
    pub fn offset_between(&self, from: ElementId, to: ElementId) -> PatioResult<Vector3> {
        self.get(to)?.position.checked_sub(self.get(from)?.position)
    }

    /// Look up a committed element.
    pub fn get(&self, id: ElementId) -> PatioResult<&Element> {
        self.elements.get(&id).ok_or_else(|| PatioError::unknown_identity(id))
    }

    /// Whether `id` refers to a committed element
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// All committed elements in insertion order.
    ///
    /// Each call is a fresh pass; nothing is shared between calls.
    pub fn list_all(&self) -> Vec<&Element> {
        self.elements.values().collect()
    }

    /// Elements within `tolerance` millimeters of `position`.
    ///
    /// Sorted nearest first; equal distances are ordered by ascending identity.
    pub fn find_near(&self, position: Vector3, tolerance: f64) -> PatioResult<Vec<&Element>> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(PatioError::invalid_value(
                "tolerance",
                tolerance.to_string(),
                "Tolerance must be a finite, non-negative distance",
            ));
        }

        let mut hits: Vec<(f64, &Element)> = self
            .elements
            .values()
            .map(|element| (element.position.distance_to(position), element))
            .filter(|(distance, _)| *distance <= tolerance)
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));

        Ok(hits.into_iter().map(|(_, element)| element).collect())
    }

    /// Number of committed elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Update the modified timestamp.
    fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Count stock members by designation.
    pub fn takeoff(&self) -> MaterialTakeoff {
        let mut lines: BTreeMap<String, TakeoffLine> = BTreeMap::new();
        let mut non_stock = Vec::new();

        for element in self.elements.values() {
            let dims = &element.dimensions;
            match dims.designation() {
                Ok(designation) => {
                    let line = lines.entry(designation.clone()).or_insert_with(|| TakeoffLine {
                        designation,
                        count: 0,
                        board_feet: 0.0,
                    });
                    line.count += 1;
                    line.board_feet += dims.board_feet().unwrap_or(0.0);
                }
                Err(_) => non_stock.push(element.id),
            }
        }

        let lines: Vec<TakeoffLine> = lines.into_values().collect();
        let total_board_feet = lines.iter().map(|line| line.board_feet).sum();
        MaterialTakeoff {
            lines,
            total_board_feet,
            non_stock,
        }
    }
}

impl Default for Patio {
    fn default() -> Self {
        Patio::new("")
    }
}

/// One line of a material takeoff
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TakeoffLine {
    /// Trade designation (e.g., "2x10x12'")
    pub designation: String,
    /// Number of members
    pub count: usize,
    /// Board feet for all members on this line
    pub board_feet: f64,
}

/// Stock members needed to build the committed design
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialTakeoff {
    /// Lines sorted by designation
    pub lines: Vec<TakeoffLine>,
    /// Sum of board feet over all lines
    pub total_board_feet: f64,
    /// Elements with no stock size on some axis
    pub non_stock: Vec<ElementId>,
}
