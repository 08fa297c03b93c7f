use serde::Serialize;

/// A geographic coordinate as (lat, lon) in WGS84
pub type LatLng = (f64, f64);

/// Ordered loop of coordinates describing one boundary contour
pub type Ring = Vec<LatLng>;

/// Typed geometry produced once by the parser
///
/// Downstream code matches on the variant instead of re-inspecting the
/// nesting of the raw payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(LatLng),
    PolyLine(Ring),
    /// Outer ring followed by holes
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::PolyLine(_) => "PolyLine",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// All coordinates of the geometry, flattened in storage order
    pub fn points(&self) -> Vec<LatLng> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::PolyLine(line) => line.clone(),
            Geometry::Polygon(rings) => rings.iter().flatten().copied().collect(),
            Geometry::MultiPolygon(polygons) => {
                polygons.iter().flatten().flatten().copied().collect()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(_) => false,
            Geometry::PolyLine(line) => line.is_empty(),
            Geometry::Polygon(rings) => rings.iter().all(|r| r.is_empty()),
            Geometry::MultiPolygon(polygons) => polygons.iter().flatten().all(|r| r.is_empty()),
        }
    }
}

/// Outer boundary at index 0 followed by zero or more holes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RingSet {
    rings: Vec<Ring>,
}

impl RingSet {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    pub fn outer(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn ring(&self, index: usize) -> Option<&Ring> {
        self.rings.get(index)
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn into_rings(self) -> Vec<Ring> {
        self.rings
    }
}

impl From<RingSet> for Geometry {
    fn from(set: RingSet) -> Self {
        Geometry::Polygon(set.into_rings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_set_holes() {
        let set = RingSet::new(vec![
            vec![(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)],
            vec![(4.0, 4.0), (4.0, 6.0), (6.0, 6.0)],
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.holes().len(), 1);
        assert_eq!(set.outer().map(|r| r.len()), Some(3));
        assert!(RingSet::default().holes().is_empty());
    }

    #[test]
    fn test_geometry_json_tagging() {
        let json = serde_json::to_string(&Geometry::Point((1.0, 2.0))).unwrap();
        assert_eq!(json, r#"{"type":"Point","coordinates":[1.0,2.0]}"#);
    }

    #[test]
    fn test_geometry_points_flatten() {
        let geometry = Geometry::MultiPolygon(vec![
            vec![vec![(0.0, 0.0), (1.0, 1.0)]],
            vec![vec![(2.0, 2.0)], vec![(3.0, 3.0)]],
        ]);
        assert_eq!(geometry.points().len(), 4);
        assert!(!geometry.is_empty());
        assert!(Geometry::Polygon(vec![vec![]]).is_empty());
    }
}
