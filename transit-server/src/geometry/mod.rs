//! Geometry kernel.
//!
//! Point and segment primitives shared by every other module: great-circle
//! distance, projection onto segments, segment crossing and ring containment.
//! Planar operations treat `(lat, lon)` degrees as Cartesian coordinates,
//! which is accurate enough at city scale.

mod error;
mod kernel;
mod point;
mod polygon;

pub use error::GeometryError;
pub use kernel::{
    closest_approach, distance_to_segment, nearest_point_on_segment, segments_intersect,
    segments_walkable,
};
pub use point::{DistanceUnit, EARTH_RADIUS_KM, Point};
pub use polygon::{MIN_RING_POINTS, point_in_polygon};
