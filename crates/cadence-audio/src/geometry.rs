/// A point (or direction) in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    pub const ZERO: Point3D = Point3D::new(0.0, 0.0, 0.0);

    /// Facing direction of an entity that was never oriented.
    pub const BASE_DIRECTION: Point3D = Point3D::new(0.0, 0.0, -1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}
