//! geoedit - Polygon ring editing engine for geo-object map editors

pub mod api;
pub mod config;
pub mod domain;
pub mod editor;
pub mod geometry;
pub mod parser;
pub mod workspace;

pub use domain::{Geometry, LatLng, Ring, RingSet};
pub use editor::{EditError, EditorController, Gesture, GestureOutcome, RingEditor};
pub use geometry::{Project, Projector};
pub use parser::{parse, serialize};
