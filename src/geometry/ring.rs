//! Pure ring primitives used by the editing engine
//!
//! Every function here is total: empty or degenerate rings produce a
//! defined result (false, unchanged ring, index 0) rather than a panic.

use geo::{Intersects, LineString, Polygon};

use super::Project;
use crate::domain::{LatLng, Ring};

/// Minimum number of distinct vertices for a ring to enclose an area
pub const MIN_RING_VERTICES: usize = 3;

/// True if the ring has at least one point and its first and last points
/// are exactly equal
pub fn is_closed(ring: &[LatLng]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => first == last,
        _ => false,
    }
}

/// Return the ring with its first point appended when not already closed
pub fn close(ring: &[LatLng]) -> Ring {
    let mut closed = ring.to_vec();
    if let Some(&first) = ring.first()
        && !is_closed(ring)
    {
        closed.push(first);
    }
    closed
}

/// Vertices of the ring without the closing duplicate
pub fn open_vertices(ring: &[LatLng]) -> &[LatLng] {
    if ring.len() > 1 && is_closed(ring) {
        &ring[..ring.len() - 1]
    } else {
        ring
    }
}

/// Number of vertices, not counting the closing duplicate
pub fn vertex_count(ring: &[LatLng]) -> usize {
    open_vertices(ring).len()
}

fn to_polygon(ring: &[LatLng]) -> Polygon<f64> {
    // geo works in (x, y) = (lon, lat)
    let exterior: LineString<f64> = ring
        .iter()
        .map(|&(lat, lon)| geo::coord! { x: lon, y: lat })
        .collect();
    Polygon::new(exterior, Vec::new())
}

/// Point-in-polygon test against a single ring
///
/// Points on the boundary count as inside. Rings with fewer than three
/// vertices never contain anything.
pub fn point_in_polygon(point: LatLng, outer: &[LatLng]) -> bool {
    if vertex_count(outer) < MIN_RING_VERTICES {
        return false;
    }
    let (lat, lon) = point;
    to_polygon(outer).intersects(&geo::coord! { x: lon, y: lat })
}

/// True if every point of the closed candidate lies inside `outer`
pub fn all_points_inside(outer: &[LatLng], candidate: &[LatLng]) -> bool {
    if vertex_count(outer) < MIN_RING_VERTICES {
        return false;
    }
    let polygon = to_polygon(outer);
    close(candidate)
        .iter()
        .all(|&(lat, lon)| polygon.intersects(&geo::coord! { x: lon, y: lat }))
}

/// Distance from `p` to the segment `a`-`b` in planar space
pub fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq > 0.0 {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let closest = (a.0 + t * dx, a.1 + t * dy);
    (p.0 - closest.0).hypot(p.1 - closest.1)
}

/// Closest segment of the ring to `target`
///
/// Segments wrap from the last point back to the first. Returns the index
/// right after the closest segment's start point together with the planar
/// distance; the first minimum wins on ties.
pub fn nearest_segment<P: Project + ?Sized>(
    ring: &[LatLng],
    target: LatLng,
    projector: &P,
) -> Option<(usize, f64)> {
    if ring.is_empty() {
        return None;
    }

    let click = projector.project(target);
    let projected: Vec<(f64, f64)> = ring.iter().map(|&p| projector.project(p)).collect();

    let mut best: Option<(usize, f64)> = None;
    for i in 0..projected.len() {
        let next = projected[(i + 1) % projected.len()];
        let dist = segment_distance(click, projected[i], next);
        if best.is_none_or(|(_, min)| dist < min) {
            best = Some((i + 1, dist));
        }
    }
    best
}

/// Index at which `target` should be inserted to split the closest segment
pub fn nearest_segment_insertion_index<P: Project + ?Sized>(
    ring: &[LatLng],
    target: LatLng,
    projector: &P,
) -> usize {
    nearest_segment(ring, target, projector)
        .map(|(index, _)| index)
        .unwrap_or(0)
}

/// Insert `target` into the closest segment of the ring
pub fn insert_point<P: Project + ?Sized>(ring: &[LatLng], target: LatLng, projector: &P) -> Ring {
    let index = nearest_segment_insertion_index(ring, target, projector);
    let mut updated = ring.to_vec();
    updated.insert(index, target);
    updated
}
