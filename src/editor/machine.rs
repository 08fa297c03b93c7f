//! Ring-editing state machine
//!
//! `RingEditor` owns the ring set of the single open edit session. Every
//! mutating operation builds a candidate ring list, validates it, and only
//! then replaces the session state, so a rejected edit never leaves a
//! partial change behind.
//!
//! Containment direction:
//! - edits to the outer ring (index 0) re-check every hole
//! - edits to a hole re-check only that hole against the outer ring

use super::error::{EditError, EditResult};
use crate::domain::{Geometry, LatLng, Ring, RingSet};
use crate::geometry::{
    MIN_RING_VERTICES, Project, all_points_inside, close, is_closed, nearest_segment,
    nearest_segment_insertion_index, open_vertices, vertex_count,
};

/// Index of the outer boundary in a ring set
pub const OUTER_RING: usize = 0;

/// One geometry under edit, from "enter edit mode" until save or cancel
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    object_id: String,
    rings: RingSet,
}

impl EditSession {
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    pub fn rings(&self) -> &RingSet {
        &self.rings
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
enum State {
    #[default]
    Idle,
    Editing(EditSession),
}

/// Owner of the live ring set during an edit session
#[derive(Debug, Clone, Default)]
pub struct RingEditor {
    state: State,
}

impl RingEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an edit session for `geometry`
    ///
    /// Only polygons are editable. Rings are closed on entry. A session that
    /// is already open is discarded.
    pub fn begin(&mut self, object_id: impl Into<String>, geometry: &Geometry) -> EditResult<()> {
        let Geometry::Polygon(rings) = geometry else {
            return Err(EditError::NotEditable {
                kind: geometry.kind().to_string(),
            });
        };

        let object_id = object_id.into();
        if let State::Editing(previous) = &self.state {
            tracing::debug!(
                "Discarding edit session for {} to edit {}",
                previous.object_id,
                object_id
            );
        }

        let rings = rings.iter().map(|r| close(r)).collect();
        tracing::debug!("Editing geometry of {}", object_id);
        self.state = State::Editing(EditSession {
            object_id,
            rings: RingSet::new(rings),
        });
        Ok(())
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, State::Editing(_))
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            State::Editing(session) => Some(session),
            State::Idle => None,
        }
    }

    pub fn ring_set(&self) -> Option<&RingSet> {
        self.session().map(|s| &s.rings)
    }

    /// Committed position of a vertex
    pub fn vertex(&self, ring: usize, point: usize) -> EditResult<LatLng> {
        self.current()?
            .ring(ring)
            .and_then(|r| r.get(point))
            .copied()
            .ok_or(EditError::IndexOutOfRange { ring, point })
    }

    /// Insert a point into the outer ring at its nearest segment
    pub fn insert_outer_point<P: Project + ?Sized>(
        &mut self,
        point: LatLng,
        projector: &P,
    ) -> EditResult<()> {
        let mut rings = self.current()?.rings().to_vec();
        let outer = rings
            .get_mut(OUTER_RING)
            .ok_or(EditError::IndexOutOfRange { ring: OUTER_RING, point: 0 })?;
        let index = nearest_segment_insertion_index(outer, point, projector);
        outer.insert(index, point);

        validate(&rings, OUTER_RING)?;
        tracing::debug!("Inserted outer point at index {}", index);
        self.commit(rings);
        Ok(())
    }

    /// Insert a point into whichever hole has the closest segment
    pub fn insert_hole_point<P: Project + ?Sized>(
        &mut self,
        point: LatLng,
        projector: &P,
    ) -> EditResult<()> {
        let mut rings = self.current()?.rings().to_vec();

        let mut best: Option<(usize, usize, f64)> = None;
        for (ring_index, hole) in rings.iter().enumerate().skip(1) {
            if let Some((index, dist)) = nearest_segment(hole, point, projector)
                && best.is_none_or(|(_, _, min)| dist < min)
            {
                best = Some((ring_index, index, dist));
            }
        }

        let (ring_index, index, _) = best.ok_or(EditError::NoHoles)?;
        rings[ring_index].insert(index, point);

        validate(&rings, ring_index)?;
        tracing::debug!("Inserted point into ring {} at index {}", ring_index, index);
        self.commit(rings);
        Ok(())
    }

    /// Append a new hole without validating it
    ///
    /// A hole that starts outside the outer ring is tolerated until its
    /// next edit, or the next edit of the outer ring, checks containment.
    pub fn add_hole(&mut self, seed: Ring) -> EditResult<usize> {
        let mut rings = self.current()?.rings().to_vec();
        rings.push(close(&seed));
        let index = rings.len() - 1;

        tracing::debug!("Added ring {}", index);
        self.commit(rings);
        Ok(index)
    }

    /// Remove a vertex
    ///
    /// The outer ring keeps at least three vertices. Holes left with fewer
    /// than three vertices are removed from the set.
    pub fn delete_vertex(&mut self, ring: usize, point: usize) -> EditResult<()> {
        let current = self.current()?;
        let target = checked_ring(current, ring, point)?;

        if ring == OUTER_RING && vertex_count(target) <= MIN_RING_VERTICES {
            return Err(EditError::MinimumVertexViolation {
                min: MIN_RING_VERTICES,
            });
        }

        let mut rings = current.rings().to_vec();
        rings[ring] = without_vertex(target, point, ring == OUTER_RING);

        if ring == OUTER_RING {
            validate(&rings, OUTER_RING)?;
        }

        let before = rings.len();
        let mut index = 0;
        rings.retain(|r| {
            let keep = index == OUTER_RING || vertex_count(r) >= MIN_RING_VERTICES;
            index += 1;
            keep
        });
        if rings.len() < before {
            tracing::debug!("Dropped {} degenerate ring(s)", before - rings.len());
        }

        tracing::debug!("Deleted vertex {} of ring {}", point, ring);
        self.commit(rings);
        Ok(())
    }

    /// Probe a tentative vertex move without committing it
    pub fn probe_drag(&self, ring: usize, point: usize, to: LatLng) -> EditResult<()> {
        self.drag_candidate(ring, point, to).map(|_| ())
    }

    /// Validate the move once more and apply it
    pub fn commit_drag(&mut self, ring: usize, point: usize, to: LatLng) -> EditResult<()> {
        let rings = self.drag_candidate(ring, point, to)?;
        tracing::debug!("Moved vertex {} of ring {}", point, ring);
        self.commit(rings);
        Ok(())
    }

    /// Hand out the ring set for serialization and close the session
    ///
    /// An empty geometry is rejected and the session stays open.
    pub fn save(&mut self) -> EditResult<RingSet> {
        let current = self.current()?;
        if current.outer().is_none_or(|r| r.is_empty()) {
            return Err(EditError::EmptyGeometrySave);
        }

        match std::mem::take(&mut self.state) {
            State::Editing(session) => {
                tracing::debug!("Saved geometry of {}", session.object_id);
                Ok(session.rings)
            }
            State::Idle => Err(EditError::NotEditing),
        }
    }

    /// Discard the session
    pub fn cancel(&mut self) {
        if let State::Editing(session) = std::mem::take(&mut self.state) {
            tracing::debug!("Discarded edits of {}", session.object_id);
        }
    }

    fn current(&self) -> EditResult<&RingSet> {
        self.ring_set().ok_or(EditError::NotEditing)
    }

    fn commit(&mut self, rings: Vec<Ring>) {
        if let State::Editing(session) = &mut self.state {
            session.rings = RingSet::new(rings);
        }
    }

    fn drag_candidate(&self, ring: usize, point: usize, to: LatLng) -> EditResult<Vec<Ring>> {
        let current = self.current()?;
        let target = checked_ring(current, ring, point)?;

        let mut rings = current.rings().to_vec();
        rings[ring] = with_vertex_moved(target, point, to);
        validate(&rings, ring)?;
        Ok(rings)
    }
}

fn checked_ring(rings: &RingSet, ring: usize, point: usize) -> EditResult<&Ring> {
    rings
        .ring(ring)
        .filter(|r| point < r.len())
        .ok_or(EditError::IndexOutOfRange { ring, point })
}

/// Check containment for a candidate ring list after `changed` was edited
fn validate(rings: &[Ring], changed: usize) -> EditResult<()> {
    let Some(outer) = rings.get(OUTER_RING) else {
        return Ok(());
    };
    let outer = close(outer);

    let inside = if changed == OUTER_RING {
        rings[1..].iter().all(|hole| all_points_inside(&outer, hole))
    } else {
        rings
            .get(changed)
            .is_none_or(|hole| all_points_inside(&outer, hole))
    };

    if inside {
        Ok(())
    } else {
        tracing::debug!("Ring {} edit breaks containment", changed);
        Err(EditError::ContainmentViolation)
    }
}

/// Move a vertex; the first point and closing duplicate of a closed ring
/// move together
fn with_vertex_moved(ring: &[LatLng], point: usize, to: LatLng) -> Ring {
    let mut moved = ring.to_vec();
    let last = moved.len() - 1;
    if last > 0 && is_closed(ring) && (point == 0 || point == last) {
        moved[0] = to;
        moved[last] = to;
    } else {
        moved[point] = to;
    }
    moved
}

/// Remove a vertex; removing the closing duplicate removes the first vertex
fn without_vertex(ring: &[LatLng], point: usize, force_close: bool) -> Ring {
    let was_closed = ring.len() > 1 && is_closed(ring);
    let mut vertices = open_vertices(ring).to_vec();
    let index = if point >= vertices.len() { 0 } else { point };
    vertices.remove(index);

    if was_closed || force_close {
        close(&vertices)
    } else {
        vertices
    }
}
