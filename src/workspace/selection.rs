use crate::domain::{GeoObject, Geometry};
use crate::geometry::Bounds;

/// Highlighted geo-object on the map
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    /// Clicking the selected object again deselects it
    pub fn toggle(&mut self, id: &str) {
        if self.is_selected(id) {
            self.selected = None;
        } else {
            self.select(id);
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }
}

/// Request for the map layer to fit its view to an object
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomRequest {
    pub object_id: String,
    pub bounds: Bounds,
    /// Increases on every request, so re-zooming the same object is visible
    /// as a new request
    pub sequence: u64,
}

/// Tracks the zoomed object and issues zoom requests
#[derive(Debug, Clone, Default)]
pub struct ZoomTracker {
    zoomed: Option<String>,
    sequence: u64,
}

impl ZoomTracker {
    /// Zoom to `object`; asking again for the same object re-triggers the zoom
    ///
    /// Returns `None` when the object has no readable geometry.
    pub fn zoom_to(&mut self, object: &GeoObject, geometry: Option<&Geometry>) -> Option<ZoomRequest> {
        let Some(bounds) = geometry.and_then(Bounds::of) else {
            tracing::debug!("Cannot zoom to {}: no geometry", object.id);
            return None;
        };

        self.zoomed = Some(object.id.clone());
        self.sequence += 1;

        Some(ZoomRequest {
            object_id: object.id.clone(),
            bounds,
            sequence: self.sequence,
        })
    }

    pub fn zoomed(&self) -> Option<&str> {
        self.zoomed.as_deref()
    }

    pub fn clear(&mut self) {
        self.zoomed = None;
    }
}
