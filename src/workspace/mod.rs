//! Map-level state around the editor: selection, zoom requests, and draft
//! objects sketched on top of a geosystem.

pub mod drafts;
pub mod selection;

pub use drafts::{DraftBoard, DraftObject, DraftShape, UniteInto};
pub use selection::{Selection, ZoomRequest, ZoomTracker};
