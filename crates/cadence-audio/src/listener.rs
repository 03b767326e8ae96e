use crate::geometry::Point3D;

/// The "ears" used for 3D positioning, usually the camera.
pub trait Listener {
    fn position(&self) -> Point3D;
    fn set_position(&mut self, position: Point3D);
    fn direction(&self) -> Point3D;
    fn set_direction(&mut self, direction: Point3D);
}

/// Listener used before a real one is attached: always at the origin, facing
/// [`Point3D::BASE_DIRECTION`], ignoring every move.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultListener;

impl Listener for DefaultListener {
    fn position(&self) -> Point3D {
        Point3D::ZERO
    }

    fn set_position(&mut self, _position: Point3D) {}

    fn direction(&self) -> Point3D {
        Point3D::BASE_DIRECTION
    }

    fn set_direction(&mut self, _direction: Point3D) {}
}

/// A listener that simply stores what it is given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedListener {
    pub position: Point3D,
    pub direction: Point3D,
}

impl Default for PositionedListener {
    fn default() -> Self {
        Self {
            position: Point3D::ZERO,
            direction: Point3D::BASE_DIRECTION,
        }
    }
}

impl Listener for PositionedListener {
    fn position(&self) -> Point3D {
        self.position
    }

    fn set_position(&mut self, position: Point3D) {
        self.position = position;
    }

    fn direction(&self) -> Point3D {
        self.direction
    }

    fn set_direction(&mut self, direction: Point3D) {
        self.direction = direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listener_ignores_moves() {
        let mut listener = DefaultListener;
        listener.set_position(Point3D::new(5.0, 0.0, 5.0));
        listener.set_direction(Point3D::new(1.0, 0.0, 0.0));
        assert_eq!(listener.position(), Point3D::ZERO);
        assert_eq!(listener.direction(), Point3D::BASE_DIRECTION);
    }

    #[test]
    fn positioned_listener_tracks_moves() {
        let mut listener = PositionedListener::default();
        listener.set_position(Point3D::new(-5.0, 0.0, 5.0));
        assert_eq!(listener.position(), Point3D::new(-5.0, 0.0, 5.0));
    }
}
