/// Angle conversion and transform composition helpers
use crate::matrix::Matrix4;

/// Threshold below which lengths and coordinate differences count as zero.
pub const EPSILON: f32 = 1e-6;

/// Degrees to radians, `degrees * (PI / 180)`.
#[inline]
pub fn to_radians(degrees: f32) -> f32 {
    degrees * (std::f32::consts::PI / 180.0)
}

/// Compose the clip-space transform `projection * view * world`.
pub fn model_view_projection(
    world: &Matrix4,
    view: &Matrix4,
    projection: &Matrix4,
) -> Matrix4 {
    *projection * *view * *world
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{Vector3, Vector4};

    #[test]
    fn test_to_radians() {
        assert!((to_radians(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((to_radians(45.0) - std::f32::consts::FRAC_PI_4).abs() < 1e-7);
        assert_eq!(to_radians(0.0), 0.0);
    }

    #[test]
    fn test_mvp_applies_world_first() {
        let mut world = Matrix4::new();
        world.translate(&Vector3::new(1.0, 0.0, 0.0));
        let mut view = Matrix4::new();
        view.scale(&Vector3::new(2.0, 2.0, 2.0));
        let projection = Matrix4::new();

        let mvp = model_view_projection(&world, &view, &projection);
        let p = mvp.transform_point(&Vector3::ZERO);
        assert_eq!(p, Vector4::new(2.0, 0.0, 0.0, 1.0));
    }
}
