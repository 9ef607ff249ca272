//! Camera utilities for 3D visualization

use meshpick_algorithms::Ray;
use meshpick_core::{Point2f, Point3f};
use nalgebra::{Matrix4, Perspective3, Point3, Unit, UnitQuaternion, Vector3, Vector4};

/// Maps OpenGL clip-space depth `[-1, 1]` to the `[0, 1]` range wgpu expects
#[rustfmt::skip]
fn opengl_to_wgpu() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

const MIN_DISTANCE: f32 = 1e-4;

/// Size of the drawable area in physical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}

/// A perspective camera orbiting a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix, with depth in wgpu's `[0, 1]` convention
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        opengl_to_wgpu() * perspective.into_inner()
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// Move the camera towards the target; negative amounts move away
    pub fn zoom(&mut self, amount: f32) {
        let offset = self.position - self.target;
        let factor = (1.0 - amount).clamp(0.1, 10.0);
        let scaled = offset * factor;
        if scaled.norm() > MIN_DISTANCE {
            self.position = self.target + scaled;
        }
    }

    /// Rotate the camera around the target.
    ///
    /// `yaw` turns about the up vector, `pitch` about the camera's right
    /// vector. The up vector rotates along so the view never flips.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let offset = self.position - self.target;
        let forward = -offset;
        let Some(right) = forward.cross(&self.up).try_normalize(f32::EPSILON) else {
            return;
        };
        let Some(up) = Unit::try_new(self.up, f32::EPSILON) else {
            return;
        };

        let rotation = UnitQuaternion::from_axis_angle(&up, -yaw)
            * UnitQuaternion::from_axis_angle(&Unit::new_unchecked(right), -pitch);
        self.position = self.target + rotation * offset;
        self.up = rotation * self.up;
    }

    /// Translate camera and target together, in units of the viewing distance.
    ///
    /// Positive `dx` moves the scene content right, positive `dy` moves it down.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = self.target - self.position;
        let Some(right) = forward.cross(&self.up).try_normalize(f32::EPSILON) else {
            return;
        };
        let up = right.cross(&forward).normalize();
        let shift = (up * dy - right * dx) * self.distance();
        self.position += shift;
        self.target += shift;
    }

    /// Frame a bounding box, keeping the current viewing direction
    pub fn fit_bounds(&mut self, min: &Point3f, max: &Point3f) {
        let center = nalgebra::center(min, max);
        let radius = ((max - min).norm() * 0.5).max(MIN_DISTANCE);
        let direction = (self.position - self.target)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::z);
        let distance = radius / (self.fov * 0.5).sin() * 1.1;

        self.target = center;
        self.position = center + direction * distance;
        self.near = distance * 0.01;
        self.far = distance * 10.0;
    }

    /// Project world points to screen pixels, origin at the top-left corner.
    ///
    /// Points at or behind the camera plane map to NaN.
    pub fn world_to_screen(&self, points: &[Point3f], viewport: &Viewport) -> Vec<Point2f> {
        let view_proj = self.view_projection();
        points
            .iter()
            .map(|point| {
                let clip = view_proj * point.to_homogeneous();
                if clip.w <= f32::EPSILON {
                    return Point2f::new(f32::NAN, f32::NAN);
                }
                let ndc_x = clip.x / clip.w;
                let ndc_y = clip.y / clip.w;
                Point2f::new(
                    (ndc_x + 1.0) * 0.5 * viewport.width,
                    (1.0 - ndc_y) * 0.5 * viewport.height,
                )
            })
            .collect()
    }

    /// Ray from the near plane through the given screen pixel
    pub fn screen_ray(&self, screen: &Point2f, viewport: &Viewport) -> Option<Ray> {
        let inverse = self.view_projection().try_inverse()?;
        let ndc_x = 2.0 * screen.x / viewport.width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / viewport.height;

        let unproject = |depth: f32| {
            let world = inverse * Vector4::new(ndc_x, ndc_y, depth, 1.0);
            Point3::from(world.xyz() / world.w)
        };
        Some(Ray::through(unproject(0.0), unproject(1.0)))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            std::f32::consts::FRAC_PI_4,
            Viewport::default().aspect_ratio(),
            0.1,
            100.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_target_projects_to_viewport_center() {
        let camera = Camera::default();
        let viewport = Viewport::default();
        let screen = camera.world_to_screen(&[Point3f::origin()], &viewport);
        assert_relative_eq!(screen[0], Point2f::new(600.0, 400.0), epsilon = 1e-3);
    }

    #[test]
    fn test_screen_axes_orientation() {
        let camera = Camera::default();
        let viewport = Viewport::default();
        let screen = camera.world_to_screen(
            &[Point3f::new(1.0, 0.0, 0.0), Point3f::new(0.0, 1.0, 0.0)],
            &viewport,
        );
        // +x goes right, +y goes up (smaller pixel row)
        assert!(screen[0].x > 600.0);
        assert!(screen[1].y < 400.0);
    }

    #[test]
    fn test_points_behind_camera_are_nan() {
        let camera = Camera::default();
        let screen = camera.world_to_screen(&[Point3f::new(0.0, 0.0, 10.0)], &Viewport::default());
        assert!(screen[0].x.is_nan());
    }

    #[test]
    fn test_screen_ray_round_trip() {
        let camera = Camera::default();
        let viewport = Viewport::default();
        let world = Point3f::new(0.3, -0.4, 0.5);
        let screen = camera.world_to_screen(&[world], &viewport)[0];
        let ray = camera.screen_ray(&screen, &viewport).unwrap();

        // The world point lies on the ray
        let along = (world - ray.origin).dot(&ray.direction);
        assert_relative_eq!(ray.at(along), world, epsilon = 1e-3);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = Camera::default();
        let before = camera.distance();
        camera.orbit(0.7, -0.3);
        assert_relative_eq!(camera.distance(), before, epsilon = 1e-4);
        assert_relative_eq!(camera.up.dot(&(camera.target - camera.position)), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zoom_and_pan() {
        let mut camera = Camera::default();
        camera.zoom(0.5);
        assert_relative_eq!(camera.distance(), 2.5, epsilon = 1e-5);

        camera.pan(0.1, 0.0);
        assert_relative_eq!(camera.distance(), 2.5, epsilon = 1e-5);
        assert!(camera.target.x < 0.0);
    }

    #[test]
    fn test_fit_bounds_frames_box() {
        let mut camera = Camera::default();
        let viewport = Viewport::default();
        camera.aspect_ratio = viewport.aspect_ratio();
        let min = Point3f::new(10.0, 10.0, 10.0);
        let max = Point3f::new(12.0, 14.0, 11.0);
        camera.fit_bounds(&min, &max);

        assert_relative_eq!(camera.target, nalgebra::center(&min, &max));
        let corners = [min, max, Point3f::new(min.x, max.y, min.z), Point3f::new(max.x, min.y, max.z)];
        for p in camera.world_to_screen(&corners, &viewport) {
            assert!(p.x >= 0.0 && p.x <= viewport.width, "{:?} outside", p);
            assert!(p.y >= 0.0 && p.y <= viewport.height, "{:?} outside", p);
        }
    }
}
