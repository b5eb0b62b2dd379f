mod camera;
mod geometry;
mod octree;

pub use camera::OrbitCamera;
pub use geometry::{
    Aabb, Capsule, Contact, Triangle, closest_point_on_segment,
    closest_points_between_segments, triangle_capsule_contact,
};
pub use octree::Octree;
