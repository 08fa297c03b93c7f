use crate::domain::LatLng;

/// Converts a geographic coordinate into planar (screen or local) space
///
/// The editing core only compares distances in this space, so any
/// projection supplied by the map layer works. Closures taking a `LatLng`
/// implement it directly.
pub trait Project {
    fn project(&self, point: LatLng) -> (f64, f64);
}

impl<F> Project for F
where
    F: Fn(LatLng) -> (f64, f64),
{
    fn project(&self, point: LatLng) -> (f64, f64) {
        self(point)
    }
}

/// Simple Mercator-like projection from WGS84 to local meters
///
/// Uses approximation suitable for city-scale maps:
/// - x = (lon - center_lon) * cos(center_lat) * 111320
/// - y = (lat - center_lat) * 111320
///
/// Used when no map layer is around to supply its own projection
/// (the command line, tests).
#[derive(Debug, Clone)]
pub struct Projector {
    center_lat: f64,
    center_lon: f64,
    cos_lat: f64,
}

impl Projector {
    /// Create a new projector centered at the given (lat, lon)
    pub fn new(center: LatLng) -> Self {
        let (lat, lon) = center;
        Self {
            center_lat: lat,
            center_lon: lon,
            cos_lat: lat.to_radians().cos(),
        }
    }
}

impl Project for Projector {
    fn project(&self, (lat, lon): LatLng) -> (f64, f64) {
        const METERS_PER_DEGREE: f64 = 111320.0;

        let x = (lon - self.center_lon) * self.cos_lat * METERS_PER_DEGREE;
        let y = (lat - self.center_lat) * METERS_PER_DEGREE;

        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projector_center() {
        let proj = Projector::new((37.7749, -122.4194));
        let (x, y) = proj.project((37.7749, -122.4194));
        assert!(x.abs() < 0.01);
        assert!(y.abs() < 0.01);
    }

    #[test]
    fn test_projector_1km() {
        let proj = Projector::new((37.7749, -122.4194));

        // 0.009 degrees of latitude is roughly 1 km
        let (_, y) = proj.project((37.7749 + 0.009, -122.4194));
        assert!((y - 1000.0).abs() < 50.0);
    }

    #[test]
    fn test_closure_projects() {
        let flip = |(lat, lng): LatLng| (lng, lat);
        assert_eq!(flip.project((1.0, 2.0)), (2.0, 1.0));
    }
}
