//! Raw coordinate payload <-> typed geometry
//!
//! The backend stores geometry as a JSON string of nested `[lat, lng]`
//! arrays with no type tag, so the shape is inferred from nesting depth and
//! point count.

use serde_json::Value;

use crate::domain::{Geometry, LatLng, Ring, RingSet};
use crate::geometry::close;

/// Point count at which a flat list of pairs is read as a polygon ring
///
/// This is a policy choice rather than a schema rule: three or fewer points
/// are read as a polyline, four or more as a polygon.
pub const POLYGON_MIN_POINTS: usize = 4;

/// Payload parser with a tunable polygon threshold
#[derive(Debug, Clone, Copy)]
pub struct Parser {
    polygon_threshold: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            polygon_threshold: POLYGON_MIN_POINTS,
        }
    }
}

impl Parser {
    pub fn with_polygon_threshold(polygon_threshold: usize) -> Self {
        Self { polygon_threshold }
    }

    /// Parse a raw payload, returning `None` when it is not a recognizable
    /// coordinate nesting
    ///
    /// # Inference
    /// - `[lat, lng]` or `[[lat, lng]]` → Point
    /// - flat list of pairs → Polygon (closed) at or above the threshold,
    ///   PolyLine below it
    /// - list of rings → Polygon, each ring closed
    /// - list of lists of rings → MultiPolygon, each ring closed
    pub fn parse(&self, raw: &str) -> Option<Geometry> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!("Geometry payload is not valid JSON: {}", e);
                return None;
            }
        };

        let geometry = self.classify(&value);
        if geometry.is_none() {
            tracing::debug!("Unrecognized geometry payload shape");
        }
        geometry
    }

    fn classify(&self, value: &Value) -> Option<Geometry> {
        if let Some(point) = as_pair(value) {
            return Some(Geometry::Point(point));
        }

        let items = value.as_array().filter(|a| !a.is_empty())?;

        match depth(&items[0])? {
            0 => {
                let ring = as_ring(value)?;
                if ring.len() == 1 {
                    Some(Geometry::Point(ring[0]))
                } else if ring.len() >= self.polygon_threshold {
                    Some(Geometry::Polygon(vec![close(&ring)]))
                } else {
                    Some(Geometry::PolyLine(ring))
                }
            }
            1 => as_rings(value).map(Geometry::Polygon),
            2 => items
                .iter()
                .map(as_rings)
                .collect::<Option<Vec<_>>>()
                .map(Geometry::MultiPolygon),
            _ => None,
        }
    }
}

/// Parse with the default polygon threshold
pub fn parse(raw: &str) -> Option<Geometry> {
    Parser::default().parse(raw)
}

/// Encode geometry back into the stored payload format
pub fn serialize(geometry: &Geometry) -> String {
    let value = match geometry {
        Geometry::Point(p) => serde_json::json!([p]),
        Geometry::PolyLine(line) => serde_json::json!(line),
        Geometry::Polygon(rings) => serde_json::json!(rings),
        Geometry::MultiPolygon(polygons) => serde_json::json!(polygons),
    };
    value.to_string()
}

/// Encode an edited ring set as a list of rings
pub fn serialize_rings(rings: &RingSet) -> String {
    serde_json::json!(rings.rings()).to_string()
}

/// Nesting depth below a value: 0 for a `[lat, lng]` pair
fn depth(value: &Value) -> Option<usize> {
    if as_pair(value).is_some() {
        return Some(0);
    }
    let first = value.as_array()?.first()?;
    depth(first).map(|d| d + 1)
}

fn as_pair(value: &Value) -> Option<LatLng> {
    match value.as_array()?.as_slice() {
        [lat, lng] => Some((lat.as_f64()?, lng.as_f64()?)),
        _ => None,
    }
}

fn as_ring(value: &Value) -> Option<Ring> {
    let items = value.as_array().filter(|a| !a.is_empty())?;
    items.iter().map(as_pair).collect()
}

fn as_rings(value: &Value) -> Option<Vec<Ring>> {
    let items = value.as_array().filter(|a| !a.is_empty())?;
    items.iter().map(|r| as_ring(r).map(|ring| close(&ring))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_pair_is_point() {
        assert_eq!(parse("[[1,2]]"), Some(Geometry::Point((1.0, 2.0))));
        assert_eq!(parse("[1,2]"), Some(Geometry::Point((1.0, 2.0))));
    }

    #[test]
    fn test_parse_four_points_is_polygon() {
        let geometry = parse("[[1,2],[3,4],[5,6],[7,8]]").unwrap();
        assert_eq!(
            geometry,
            Geometry::Polygon(vec![vec![
                (1.0, 2.0),
                (3.0, 4.0),
                (5.0, 6.0),
                (7.0, 8.0),
                (1.0, 2.0)
            ]])
        );
    }

    #[test]
    fn test_parse_three_points_is_polyline() {
        let geometry = parse("[[1,2],[3,4],[5,6]]").unwrap();
        assert_eq!(
            geometry,
            Geometry::PolyLine(vec![(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)])
        );
    }

    #[test]
    fn test_parse_closed_flat_ring_not_closed_twice() {
        let geometry = parse("[[0,0],[0,1],[1,1],[0,0]]").unwrap();
        match geometry {
            Geometry::Polygon(rings) => assert_eq!(rings[0].len(), 4),
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_threshold() {
        let parser = Parser::with_polygon_threshold(3);
        assert_eq!(parser.parse("[[1,2],[3,4],[5,6]]").unwrap().kind(), "Polygon");
        assert_eq!(parser.parse("[[1,2],[3,4]]").unwrap().kind(), "PolyLine");
    }

    #[test]
    fn test_parse_ring_list() {
        let raw = "[[[0,0],[0,10],[10,10],[10,0]],[[4,4],[4,6],[6,6],[4,4]]]";
        match parse(raw).unwrap() {
            Geometry::Polygon(rings) => {
                assert_eq!(rings.len(), 2);
                assert_eq!(rings[0].len(), 5);
                assert_eq!(rings[1].len(), 4);
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_multi_polygon() {
        let raw = "[[[[0,0],[0,1],[1,1]]],[[[5,5],[5,6],[6,6]],[[5.2,5.4],[5.4,5.6],[5.2,5.5]]]]";
        match parse(raw).unwrap() {
            Geometry::MultiPolygon(polygons) => {
                assert_eq!(polygons.len(), 2);
                assert_eq!(polygons[1].len(), 2);
                assert!(polygons.iter().flatten().all(|r| r.len() == 4));
            }
            other => panic!("expected multipolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(parse("not json"), None);
        assert_eq!(parse("{\"a\":1}"), None);
        assert_eq!(parse("[]"), None);
        assert_eq!(parse("[[1,2,3]]"), None);
        assert_eq!(parse("[[1,\"2\"]]"), None);
        assert_eq!(parse("[[1,2],[[3,4]]]"), None);
        assert_eq!(parse("[[[1,2]],[]]"), None);
        assert_eq!(parse("[[[[[1,2]]]]]"), None);
    }

    #[test]
    fn test_round_trip_ring_list() {
        let raw = "[[[0.0,0.0],[0.0,10.0],[10.0,10.0],[10.0,0.0],[0.0,0.0]]]";
        let geometry = parse(raw).unwrap();
        assert_eq!(serialize(&geometry), raw);
    }

    #[test]
    fn test_round_trip_point_and_line() {
        let point = parse("[[1.5,2.5]]").unwrap();
        assert_eq!(serialize(&point), "[[1.5,2.5]]");

        let line = parse("[[1.0,2.0],[3.0,4.0]]").unwrap();
        assert_eq!(serialize(&line), "[[1.0,2.0],[3.0,4.0]]");
    }

    #[test]
    fn test_round_trip_closes_open_rings() {
        let geometry = parse("[[[0,0],[0,1],[1,1]]]").unwrap();
        let reparsed = parse(&serialize(&geometry)).unwrap();
        assert_eq!(reparsed, geometry);
    }

    #[test]
    fn test_serialize_rings() {
        let set = RingSet::new(vec![vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0)]]);
        assert_eq!(serialize_rings(&set), "[[[0.0,0.0],[0.0,1.0],[1.0,1.0],[0.0,0.0]]]");
    }
}
