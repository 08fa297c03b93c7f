//! Gesture dispatch for an edit session
//!
//! Maps clicks, modifier keys and vertex drags from the map layer onto
//! `RingEditor` operations, turns rejections into debounced notices, and
//! tells the map layer when a dragged marker has to snap back.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::error::{EditError, EditResult};
use super::machine::RingEditor;
use super::notice::{DEFAULT_COOLDOWN, Notice, Notifier};
use crate::domain::{GeoObject, GeometryPatch, LatLng, Ring, RingSet};
use crate::geometry::Project;
use crate::parser::{Parser, serialize_rings};

/// Modifier keys held during a click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub ctrl: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(key: Modifier) -> Self {
        let mut modifiers = Self::default();
        match key {
            Modifier::Shift => modifiers.shift = true,
            Modifier::Alt => modifiers.alt = true,
            Modifier::Ctrl => modifiers.ctrl = true,
        }
        modifiers
    }

    pub fn holds(&self, key: Modifier) -> bool {
        match key {
            Modifier::Shift => self.shift,
            Modifier::Alt => self.alt,
            Modifier::Ctrl => self.ctrl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Shift,
    Alt,
    Ctrl,
}

fn default_hole_insert() -> Modifier {
    Modifier::Alt
}
fn default_new_hole() -> Modifier {
    Modifier::Ctrl
}
fn default_delete() -> Modifier {
    Modifier::Shift
}

/// Which modifier selects which click action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    /// Click inserts into the nearest hole
    #[serde(default = "default_hole_insert")]
    pub hole_insert: Modifier,
    /// Click starts a new hole
    #[serde(default = "default_new_hole")]
    pub new_hole: Modifier,
    /// Click on a vertex marker deletes it
    #[serde(default = "default_delete")]
    pub delete: Modifier,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            hole_insert: default_hole_insert(),
            new_hole: default_new_hole(),
            delete: default_delete(),
        }
    }
}

fn default_seed_lat_step() -> f64 {
    0.0003
}
fn default_seed_apex_lat() -> f64 {
    0.0002
}
fn default_seed_apex_lng() -> f64 {
    -0.0003
}

/// Offsets of the starter triangle placed when a new hole is created
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoleSeed {
    #[serde(default = "default_seed_lat_step")]
    pub lat_step: f64,
    #[serde(default = "default_seed_apex_lat")]
    pub apex_lat: f64,
    #[serde(default = "default_seed_apex_lng")]
    pub apex_lng: f64,
}

impl Default for HoleSeed {
    fn default() -> Self {
        Self {
            lat_step: default_seed_lat_step(),
            apex_lat: default_seed_apex_lat(),
            apex_lng: default_seed_apex_lng(),
        }
    }
}

impl HoleSeed {
    /// Triangle anchored at the click location
    pub fn at(&self, (lat, lng): LatLng) -> Ring {
        vec![
            (lat, lng),
            (lat + self.lat_step, lng),
            (lat + self.apex_lat, lng + self.apex_lng),
        ]
    }
}

/// Controller tuning, usually taken from the config file
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub bindings: Bindings,
    pub hole_seed: HoleSeed,
    pub warning_cooldown: Duration,
    pub parser: Parser,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            bindings: Bindings::default(),
            hole_seed: HoleSeed::default(),
            warning_cooldown: DEFAULT_COOLDOWN,
            parser: Parser::default(),
        }
    }
}

/// Raw gesture emitted by the map layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", rename_all = "snake_case")]
pub enum Gesture {
    MapClick {
        at: LatLng,
        #[serde(default)]
        modifiers: Modifiers,
    },
    VertexClick {
        ring: usize,
        point: usize,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DragStart {
        ring: usize,
        point: usize,
    },
    DragMove {
        ring: usize,
        point: usize,
        to: LatLng,
    },
    DragEnd {
        ring: usize,
        point: usize,
        to: LatLng,
    },
}

/// What the map layer should do after a gesture
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// The ring set changed; redraw it
    Updated,
    /// A drag position passed validation but is not committed yet
    Probed,
    /// The edit was refused; state is unchanged
    Rejected(EditError),
    /// Put the dragged marker back at its committed position
    RevertMarker { ring: usize, point: usize, to: LatLng },
    /// Nothing to do
    Ignored,
}

/// Mediates between map gestures and the ring editor for one geo-object
#[derive(Debug)]
pub struct EditorController {
    editor: RingEditor,
    object: Option<GeoObject>,
    notifier: Notifier,
    bindings: Bindings,
    hole_seed: HoleSeed,
    parser: Parser,
    /// Set after a drag revert; swallows the click that follows the drop
    suppress_next_click: bool,
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new(ControllerSettings::default())
    }
}

impl EditorController {
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            editor: RingEditor::new(),
            object: None,
            notifier: Notifier::new(settings.warning_cooldown),
            bindings: settings.bindings,
            hole_seed: settings.hole_seed,
            parser: settings.parser,
            suppress_next_click: false,
        }
    }

    /// Enter edit mode for `object`
    ///
    /// Proxy geosystems, objects without a readable geometry, and
    /// non-polygon geometries are refused with a notice.
    pub fn enter(&mut self, object: GeoObject) -> EditResult<()> {
        self.enter_at(object, Instant::now())
    }

    pub fn enter_at(&mut self, object: GeoObject, now: Instant) -> EditResult<()> {
        let result = self.try_enter(&object);
        match result {
            Ok(()) => {
                self.object = Some(object);
                self.suppress_next_click = false;
                Ok(())
            }
            Err(err) => {
                self.notifier.warn(&err, now);
                Err(err)
            }
        }
    }

    fn try_enter(&mut self, object: &GeoObject) -> EditResult<()> {
        if object.is_proxy() {
            return Err(EditError::NotEditable {
                kind: "proxy".to_string(),
            });
        }

        let geometry = object
            .border()
            .and_then(|raw| self.parser.parse(raw))
            .ok_or(EditError::MissingGeometry)?;

        self.editor.begin(object.id.clone(), &geometry)
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_editing()
    }

    pub fn ring_set(&self) -> Option<&RingSet> {
        self.editor.ring_set()
    }

    pub fn object(&self) -> Option<&GeoObject> {
        self.object.as_ref()
    }

    /// Warnings queued since the last call
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notifier.drain()
    }

    pub fn handle<P: Project + ?Sized>(&mut self, gesture: Gesture, projector: &P) -> GestureOutcome {
        self.handle_at(gesture, projector, Instant::now())
    }

    /// Dispatch a gesture, using `now` for warning debounce
    pub fn handle_at<P: Project + ?Sized>(
        &mut self,
        gesture: Gesture,
        projector: &P,
        now: Instant,
    ) -> GestureOutcome {
        if !self.editor.is_editing() {
            return GestureOutcome::Ignored;
        }

        // Only the gesture right after a reverted drop may be swallowed
        let suppress = std::mem::take(&mut self.suppress_next_click);

        match gesture {
            Gesture::MapClick { at, modifiers } => {
                if suppress {
                    tracing::debug!("Ignoring click that ended a reverted drag");
                    return GestureOutcome::Ignored;
                }
                let result = self.click(at, modifiers, projector);
                self.settle(result, now)
            }
            Gesture::VertexClick {
                ring,
                point,
                modifiers,
            } => {
                if !modifiers.holds(self.bindings.delete) {
                    return GestureOutcome::Ignored;
                }
                let result = self.editor.delete_vertex(ring, point);
                self.settle(result, now)
            }
            Gesture::DragStart { .. } => GestureOutcome::Ignored,
            Gesture::DragMove { ring, point, to } => {
                match self.editor.probe_drag(ring, point, to) {
                    Ok(()) => GestureOutcome::Probed,
                    Err(err) => self.revert(ring, point, err, now),
                }
            }
            Gesture::DragEnd { ring, point, to } => {
                match self.editor.commit_drag(ring, point, to) {
                    Ok(()) => GestureOutcome::Updated,
                    Err(err) => {
                        self.suppress_next_click = true;
                        self.revert(ring, point, err, now)
                    }
                }
            }
        }
    }

    fn click<P: Project + ?Sized>(
        &mut self,
        at: LatLng,
        modifiers: Modifiers,
        projector: &P,
    ) -> EditResult<()> {
        if modifiers.holds(self.bindings.new_hole) {
            return self.editor.add_hole(self.hole_seed.at(at)).map(|_| ());
        }

        let has_holes = self.editor.ring_set().is_some_and(|set| set.len() > 1);
        if modifiers.holds(self.bindings.hole_insert) && has_holes {
            self.editor.insert_hole_point(at, projector)
        } else {
            self.editor.insert_outer_point(at, projector)
        }
    }

    fn settle(&mut self, result: EditResult<()>, now: Instant) -> GestureOutcome {
        match result {
            Ok(()) => GestureOutcome::Updated,
            Err(err) => {
                self.notifier.warn(&err, now);
                GestureOutcome::Rejected(err)
            }
        }
    }

    fn revert(&mut self, ring: usize, point: usize, err: EditError, now: Instant) -> GestureOutcome {
        self.notifier.warn(&err, now);
        match self.editor.vertex(ring, point) {
            Ok(to) => GestureOutcome::RevertMarker { ring, point, to },
            Err(_) => GestureOutcome::Rejected(err),
        }
    }

    /// Close the session and build the partial update for the storage layer
    pub fn save(&mut self) -> EditResult<GeometryPatch> {
        self.save_at(Instant::now())
    }

    pub fn save_at(&mut self, now: Instant) -> EditResult<GeometryPatch> {
        let result = self.editor.save();
        let rings = match result {
            Ok(rings) => rings,
            Err(err) => {
                self.notifier.warn(&err, now);
                return Err(err);
            }
        };

        let object = self.object.take().ok_or(EditError::NotEditing)?;
        Ok(GeometryPatch::for_object(&object, serialize_rings(&rings)))
    }

    /// Leave edit mode without saving
    pub fn cancel(&mut self) {
        self.editor.cancel();
        self.object = None;
        self.suppress_next_click = false;
    }
}
