/// Perspective camera and projection matrix derivation
use crate::camera::Camera;
use crate::matrix::Matrix4;
use crate::registry::{ObjectKind, Registry, Uuid};
use crate::transform::to_radians;

/// A [`Camera`] with a perspective projection.
///
/// `fov` is the vertical field of view in degrees. Mutate `fov`, `aspect`,
/// `near` or `far` directly, then call [`PerspectiveCamera::update_perspective`]
/// to refresh `projection`. `far == f32::INFINITY` selects an infinite far plane.
/// Copies go through [`PerspectiveCamera::duplicate`] so each one holds its
/// own registry id.
#[derive(Debug)]
pub struct PerspectiveCamera {
    pub camera: Camera,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub projection: Matrix4,
    id: Uuid,
}

impl PerspectiveCamera {
    pub fn new(registry: &mut Registry, fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut projection = Matrix4::new();
        perspective(&mut projection, to_radians(fov), aspect, near, far);

        Self {
            camera: Camera::new(),
            fov,
            aspect,
            near,
            far,
            projection,
            id: registry.register(ObjectKind::Camera),
        }
    }

    pub fn infinite(registry: &mut Registry, fov: f32, aspect: f32, near: f32) -> Self {
        Self::new(registry, fov, aspect, near, f32::INFINITY)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn duplicate(&self, registry: &mut Registry) -> Self {
        Self {
            camera: self.camera.clone(),
            fov: self.fov,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
            projection: self.projection,
            id: registry.register(ObjectKind::Camera),
        }
    }

    pub fn update_perspective(&mut self) -> &mut Matrix4 {
        perspective(
            &mut self.projection,
            to_radians(self.fov),
            self.aspect,
            self.near,
            self.far,
        )
    }
}

/// Write an OpenGL-style perspective projection (clip z in [-1, 1]) into `out`.
///
/// `fovy` is in radians. A non-finite `far` uses the infinite-far-plane terms
/// `-1` and `-2 * near`.
pub fn perspective(out: &mut Matrix4, fovy: f32, aspect: f32, near: f32, far: f32) -> &mut Matrix4 {
    let f = 1.0 / (fovy / 2.0).tan();

    let (m10, m14) = if far.is_finite() {
        let nf = 1.0 / (near - far);
        ((far + near) * nf, 2.0 * far * near * nf)
    } else {
        (-1.0, -2.0 * near)
    };

    out.from_array(&[
        f / aspect, 0.0, 0.0, 0.0, //
        0.0, f, 0.0, 0.0, //
        0.0, 0.0, m10, -1.0, //
        0.0, 0.0, m14, 0.0,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(far: f32) -> PerspectiveCamera {
        let mut registry = Registry::with_seed(3);
        PerspectiveCamera::new(&mut registry, 45.0, 1.0, 0.1, far)
    }

    #[test]
    fn test_finite_projection() {
        let cam = camera(1000.0);
        let p = &cam.projection;
        let (near, far) = (0.1f32, 1000.0f32);

        assert_eq!(p[11], -1.0);
        assert_eq!(p[15], 0.0);
        assert!((p[10] - (far + near) / (near - far)).abs() < 1e-6);
        assert!((p[14] - 2.0 * far * near / (near - far)).abs() < 1e-5);

        let f = 1.0 / (to_radians(45.0) / 2.0).tan();
        assert!((p[5] - f).abs() < 1e-6);
        assert!((p[0] - f).abs() < 1e-6);
    }

    #[test]
    fn test_infinite_projection() {
        let mut registry = Registry::with_seed(4);
        let cam = PerspectiveCamera::infinite(&mut registry, 45.0, 1.0, 0.1);
        assert_eq!(cam.projection[10], -1.0);
        assert_eq!(cam.projection[14], -2.0 * 0.1);
        assert_eq!(cam.projection[11], -1.0);
    }

    #[test]
    fn test_matches_nalgebra() {
        let mut registry = Registry::with_seed(5);
        let cam = PerspectiveCamera::new(&mut registry, 60.0, 16.0 / 9.0, 0.5, 250.0);
        let expected = nalgebra::Matrix4::new_perspective(16.0 / 9.0, to_radians(60.0), 0.5, 250.0);
        let expected = Matrix4::from(expected);
        for i in 0..16 {
            assert!((cam.projection[i] - expected[i]).abs() < 1e-5, "element {}", i);
        }
    }

    #[test]
    fn test_update_perspective_is_pull_based() {
        let mut cam = camera(100.0);
        let before = cam.projection;

        cam.aspect = 2.0;
        assert_eq!(cam.projection, before);

        cam.update_perspective();
        assert!((cam.projection[0] - before[0] / 2.0).abs() < 1e-6);
        assert_eq!(cam.projection[5], before[5]);

        cam.far = f32::INFINITY;
        cam.update_perspective();
        assert_eq!(cam.projection[10], -1.0);
    }

    #[test]
    fn test_duplicate_registers_new_id() {
        let mut registry = Registry::with_seed(10);
        let mut cam = PerspectiveCamera::new(&mut registry, 60.0, 2.0, 0.1, 50.0);
        cam.camera.position = crate::vector::Vector3::new(1.0, 2.0, 3.0);

        let copy = cam.duplicate(&mut registry);
        assert_ne!(copy.id(), cam.id());
        assert_eq!(copy.projection, cam.projection);
        assert_eq!(copy.camera, cam.camera);
        assert_eq!(copy.fov, 60.0);

        registry.unregister(&cam.id());
        assert_eq!(registry.kind(&copy.id()), Some(ObjectKind::Camera));
        assert_eq!(registry.kind(&cam.id()), None);
    }

    #[test]
    fn test_registers_camera() {
        let mut registry = Registry::with_seed(9);
        let cam = PerspectiveCamera::new(&mut registry, 45.0, 1.0, 0.1, 10.0);
        assert_eq!(registry.kind(&cam.id()), Some(ObjectKind::Camera));
        assert_eq!(cam.camera.view, Matrix4::IDENTITY);
    }
}
