pub mod camera;
pub mod staleness;

pub use camera::{Camera, CameraMode, FollowTarget, Transform};
pub use staleness::StalenessTracker;
