pub mod geometry;
pub mod object;

pub use geometry::{Geometry, LatLng, Ring, RingSet};
pub use object::{GeoObject, GeometryPatch, GeometryRecord};
