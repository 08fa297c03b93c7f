use crate::domain::{Geometry, LatLng};

/// Geographic bounding box, used to fit the map view to an object
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Create bounds from a set of points
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lon = f64::MAX;
        let mut max_lon = f64::MIN;

        for &(lat, lon) in points {
            min_lat = min_lat.min(lat);
            max_lat = max_lat.max(lat);
            min_lon = min_lon.min(lon);
            max_lon = max_lon.max(lon);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    pub fn of(geometry: &Geometry) -> Option<Self> {
        Self::from_points(&geometry.points())
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn center(&self) -> LatLng {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Arithmetic mean of every coordinate of the geometry
///
/// A point is its own center. Closing duplicates of rings are counted like
/// any other coordinate.
pub fn mean_center(geometry: &Geometry) -> Option<LatLng> {
    if let Geometry::Point(p) = geometry {
        return Some(*p);
    }

    let points = geometry.points();
    if points.is_empty() {
        return None;
    }

    let (lat_sum, lon_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lon), &(p_lat, p_lon)| (lat + p_lat, lon + p_lon));
    let n = points.len() as f64;
    Some((lat_sum / n, lon_sum / n))
}
