use bevy_math::{Mat4, Vec3};

/// Distance from the model origin to the eye.
pub const CAMERA_RADIUS: f32 = 64.0;
/// Half extents of the world window framed at the origin's depth.
pub const FRAME_HALF_WIDTH: f32 = 12.0;
pub const FRAME_HALF_HEIGHT: f32 = 20.0;
/// Points closer to the eye than this are not projected.
pub const NEAR_PLANE: f32 = 1.0;
const MAX_PHI_DEG: f32 = 89.9;

/// Eye on a sphere around the origin, always looking at it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    eye: Vec3,
    view: Mat4,
}

impl Camera {
    /// `theta` turns around the vertical axis, `phi` raises the eye; both in degrees.
    pub fn orbit(theta: f32, phi: f32) -> Self {
        let theta = theta.to_radians();
        let phi = phi.clamp(-MAX_PHI_DEG, MAX_PHI_DEG).to_radians();
        let eye = Vec3::new(
            CAMERA_RADIUS * phi.cos() * theta.sin(),
            CAMERA_RADIUS * phi.sin(),
            CAMERA_RADIUS * phi.cos() * theta.cos(),
        );
        Self {
            eye,
            view: Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y),
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Distance along the view direction, positive in front of the eye.
    pub fn depth(&self, world: Vec3) -> f32 {
        -self.view.transform_point3(world).z
    }

    /// Pixel position (x, y) and view depth (z) of a world point.
    pub fn project(&self, world: Vec3, viewport: Viewport) -> Option<Vec3> {
        let v = self.view.transform_point3(world);
        let depth = -v.z;
        if depth < NEAR_PLANE {
            return None;
        }
        let focal = CAMERA_RADIUS * viewport.pixels_per_unit();
        let (cx, cy) = viewport.center();
        Some(Vec3::new(
            cx + v.x / depth * focal,
            cy - v.y / depth * focal,
            depth,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale at the origin's depth that fits the whole frame window.
    pub fn pixels_per_unit(self) -> f32 {
        let x = self.width as f32 / (2.0 * FRAME_HALF_WIDTH);
        let y = self.height as f32 / (2.0 * FRAME_HALF_HEIGHT);
        x.min(y)
    }

    pub fn center(self) -> (f32, f32) {
        (self.width as f32 * 0.5, self.height as f32 * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orbit_looks_from_the_front() {
        let camera = Camera::orbit(0.0, 0.0);
        assert!(camera.eye().abs_diff_eq(Vec3::new(0.0, 0.0, CAMERA_RADIUS), 1e-4));
        let side = Camera::orbit(90.0, 0.0);
        assert!(side.eye().abs_diff_eq(Vec3::new(CAMERA_RADIUS, 0.0, 0.0), 1e-3));
    }

    #[test]
    fn phi_is_clamped_short_of_the_pole() {
        let camera = Camera::orbit(0.0, 120.0);
        assert!(camera.eye().y < CAMERA_RADIUS);
        assert!(camera.eye().z > 0.0);
        assert!(camera.view().is_finite());
    }

    #[test]
    fn origin_projects_to_the_center() {
        let viewport = Viewport::new(240, 400);
        let camera = Camera::orbit(0.0, 0.0);
        let p = camera.project(Vec3::ZERO, viewport).unwrap();
        assert!((p.x - 120.0).abs() < 1e-3);
        assert!((p.y - 200.0).abs() < 1e-3);
        assert!((p.z - CAMERA_RADIUS).abs() < 1e-3);
        // The window edge lands on the image edge.
        let top = camera.project(Vec3::new(0.0, FRAME_HALF_HEIGHT, 0.0), viewport).unwrap();
        assert!(top.y.abs() < 1e-2);
    }

    #[test]
    fn points_behind_the_eye_are_dropped() {
        let camera = Camera::orbit(0.0, 0.0);
        let behind = Vec3::new(0.0, 0.0, CAMERA_RADIUS + 5.0);
        assert!(camera.project(behind, Viewport::new(10, 10)).is_none());
    }
}
