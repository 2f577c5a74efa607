/// Viewer configuration loaded from JSON
///
/// Every field is optional and falls back to its default.
use std::path::Path;

use anyhow::Context;
use phong3d_core::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    /// `null` selects the infinite far plane.
    #[serde(default = "default_far")]
    pub far: Option<f32>,
    #[serde(default = "default_camera_position")]
    pub camera_position: [f32; 3],
    #[serde(default)]
    pub camera_target: [f32; 3],
    /// Radians per frame around +Y applied to the scene's world matrix.
    #[serde(default = "default_spin_speed")]
    pub spin_speed: f32,
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    /// Direction from the surface towards the light.
    #[serde(default = "default_light_direction")]
    pub light_direction: [f32; 3],
    #[serde(default = "default_ambient_light")]
    pub ambient_light: f32,
    #[serde(default)]
    pub emissive_weight: f32,
    /// Width over height of one terminal cell.
    #[serde(default = "default_char_aspect")]
    pub char_aspect: f32,
    #[serde(default = "default_cull_back_faces")]
    pub cull_back_faces: bool,
}

fn default_fov() -> f32 {
    45.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> Option<f32> {
    Some(1000.0)
}

fn default_camera_position() -> [f32; 3] {
    [3.0, 3.0, 3.0]
}

fn default_spin_speed() -> f32 {
    0.01
}

fn default_move_speed() -> f32 {
    0.1
}

fn default_target_fps() -> u32 {
    30
}

fn default_light_direction() -> [f32; 3] {
    [0.5, 0.8, 1.0]
}

fn default_ambient_light() -> f32 {
    0.1
}

fn default_char_aspect() -> f32 {
    0.5
}

fn default_cull_back_faces() -> bool {
    true
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            camera_position: default_camera_position(),
            camera_target: [0.0; 3],
            spin_speed: default_spin_speed(),
            move_speed: default_move_speed(),
            target_fps: default_target_fps(),
            light_direction: default_light_direction(),
            ambient_light: default_ambient_light(),
            emissive_weight: 0.0,
            char_aspect: default_char_aspect(),
            cull_back_faces: default_cull_back_faces(),
        }
    }
}

impl ViewerConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Far plane distance, `f32::INFINITY` when unset.
    pub fn far_plane(&self) -> f32 {
        self.far.unwrap_or(f32::INFINITY)
    }

    pub fn camera_position(&self) -> Vector3 {
        Vector3::from(self.camera_position)
    }

    pub fn camera_target(&self) -> Vector3 {
        Vector3::from(self.camera_target)
    }

    pub fn light_direction(&self) -> Vector3 {
        Vector3::from(self.light_direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.far_plane(), 1000.0);
        assert_eq!(config.camera_position(), Vector3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_null_far_is_infinite() {
        let config = ViewerConfig::from_json_str(r#"{ "far": null, "fov": 60 }"#).unwrap();
        assert_eq!(config.far_plane(), f32::INFINITY);
        assert_eq!(config.fov, 60.0);
        assert_eq!(config.near, 0.1);
    }

    #[test]
    fn test_bad_types_are_rejected() {
        assert!(ViewerConfig::from_json_str(r#"{ "target_fps": "fast" }"#).is_err());
        assert!(ViewerConfig::load("/nonexistent/phong3d.json").is_err());
    }
}
