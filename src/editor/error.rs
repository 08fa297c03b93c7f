//! Error types for ring editing operations.

use thiserror::Error;

/// Reasons an edit is rejected. The ring set is left untouched whenever one
/// of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A hole would end up partially or fully outside the outer ring.
    #[error("Inner ring cannot extend beyond the outer ring")]
    ContainmentViolation,

    /// The outer ring would drop below three vertices.
    #[error("Outer ring must keep at least {min} points")]
    MinimumVertexViolation { min: usize },

    /// Save attempted with no coordinates.
    #[error("Geometry is empty")]
    EmptyGeometrySave,

    /// Only polygon geometries of non-proxy objects can be edited.
    #[error("Geometry of type {kind} cannot be edited")]
    NotEditable { kind: String },

    /// The stored payload could not be parsed into a geometry.
    #[error("Unable to read geometry data")]
    MissingGeometry,

    /// No edit session is open.
    #[error("No geometry is being edited")]
    NotEditing,

    /// A hole operation was requested on a polygon without holes.
    #[error("Polygon has no inner rings")]
    NoHoles,

    /// Ring or vertex index does not exist.
    #[error("No vertex {point} in ring {ring}")]
    IndexOutOfRange { ring: usize, point: usize },
}

/// Result type alias for editing operations.
pub type EditResult<T> = Result<T, EditError>;
