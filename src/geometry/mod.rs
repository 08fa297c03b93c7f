pub mod bounds;
pub mod projection;
pub mod ring;

pub use bounds::{Bounds, mean_center};
pub use projection::{Project, Projector};
pub use ring::{
    MIN_RING_VERTICES, all_points_inside, close, insert_point, is_closed, nearest_segment,
    nearest_segment_insertion_index, open_vertices, point_in_polygon, segment_distance,
    vertex_count,
};
