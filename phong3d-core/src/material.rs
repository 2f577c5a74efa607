/// Surface parameters consumed by the shading step
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque handle to a texture that already lives on the graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureHandle(pub u32);

/// Where a texture map comes from. Paths are resolved by the render step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapSource {
    Path(String),
    Handle(TextureHandle),
}

/// Material parameters as they appear in model JSON. Every key is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaterialJson {
    pub ambient_color: Option<Vec<f32>>,
    pub ambient_intensity: Option<f32>,
    pub ambient_map: Option<MapSource>,
    pub diffuse_color: Option<Vec<f32>>,
    pub diffuse_intensity: Option<f32>,
    pub diffuse_map: Option<MapSource>,
    pub specular_color: Option<Vec<f32>>,
    pub specular_intensity: Option<f32>,
    pub specular_map: Option<MapSource>,
    pub emissive_color: Option<Vec<f32>>,
    pub emissive_intensity: Option<f32>,
    pub emissive_map: Option<MapSource>,
    pub shininess: Option<f32>,
    pub opacity: Option<f32>,
    pub normal_map: Option<MapSource>,
    pub roughness_map: Option<MapSource>,
    pub environment_map: Option<MapSource>,
}

impl MaterialJson {
    /// Key-by-key merge: values present in `self` win over `base`.
    pub fn or(self, base: MaterialJson) -> MaterialJson {
        MaterialJson {
            ambient_color: self.ambient_color.or(base.ambient_color),
            ambient_intensity: self.ambient_intensity.or(base.ambient_intensity),
            ambient_map: self.ambient_map.or(base.ambient_map),
            diffuse_color: self.diffuse_color.or(base.diffuse_color),
            diffuse_intensity: self.diffuse_intensity.or(base.diffuse_intensity),
            diffuse_map: self.diffuse_map.or(base.diffuse_map),
            specular_color: self.specular_color.or(base.specular_color),
            specular_intensity: self.specular_intensity.or(base.specular_intensity),
            specular_map: self.specular_map.or(base.specular_map),
            emissive_color: self.emissive_color.or(base.emissive_color),
            emissive_intensity: self.emissive_intensity.or(base.emissive_intensity),
            emissive_map: self.emissive_map.or(base.emissive_map),
            shininess: self.shininess.or(base.shininess),
            opacity: self.opacity.or(base.opacity),
            normal_map: self.normal_map.or(base.normal_map),
            roughness_map: self.roughness_map.or(base.roughness_map),
            environment_map: self.environment_map.or(base.environment_map),
        }
    }
}

/// Resolved material: every scalar has a value, colors are RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub ambient_map: Option<MapSource>,
    pub diffuse_color: [f32; 3],
    pub diffuse_intensity: f32,
    pub diffuse_map: Option<MapSource>,
    pub specular_color: [f32; 3],
    pub specular_intensity: f32,
    pub specular_map: Option<MapSource>,
    pub emissive_color: [f32; 3],
    pub emissive_intensity: f32,
    pub emissive_map: Option<MapSource>,
    pub shininess: f32,
    pub opacity: f32,
    pub normal_map: Option<MapSource>,
    pub roughness_map: Option<MapSource>,
    pub environment_map: Option<MapSource>,
}

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient_color: WHITE,
            ambient_intensity: 1.0,
            ambient_map: None,
            diffuse_color: WHITE,
            diffuse_intensity: 1.0,
            diffuse_map: None,
            specular_color: WHITE,
            specular_intensity: 1.0,
            specular_map: None,
            emissive_color: WHITE,
            emissive_intensity: 1.0,
            emissive_map: None,
            shininess: 20.0,
            opacity: 1.0,
            normal_map: None,
            roughness_map: None,
            environment_map: None,
        }
    }
}

impl Material {
    /// Resolve `params` with `overrides` applied on top.
    pub fn new(params: &MaterialJson, overrides: &MaterialJson) -> Result<Self> {
        let merged = overrides.clone().or(params.clone());
        Self::from_json(&merged)
    }

    pub fn from_json(params: &MaterialJson) -> Result<Self> {
        let d = Material::default();
        Ok(Self {
            ambient_color: rgb("ambientColor", params.ambient_color.as_deref(), d.ambient_color)?,
            ambient_intensity: params.ambient_intensity.unwrap_or(d.ambient_intensity),
            ambient_map: params.ambient_map.clone(),
            diffuse_color: rgb("diffuseColor", params.diffuse_color.as_deref(), d.diffuse_color)?,
            diffuse_intensity: params.diffuse_intensity.unwrap_or(d.diffuse_intensity),
            diffuse_map: params.diffuse_map.clone(),
            specular_color: rgb("specularColor", params.specular_color.as_deref(), d.specular_color)?,
            specular_intensity: params.specular_intensity.unwrap_or(d.specular_intensity),
            specular_map: params.specular_map.clone(),
            emissive_color: rgb("emissiveColor", params.emissive_color.as_deref(), d.emissive_color)?,
            emissive_intensity: params.emissive_intensity.unwrap_or(d.emissive_intensity),
            emissive_map: params.emissive_map.clone(),
            shininess: params.shininess.unwrap_or(d.shininess),
            opacity: params.opacity.unwrap_or(d.opacity),
            normal_map: params.normal_map.clone(),
            roughness_map: params.roughness_map.clone(),
            environment_map: params.environment_map.clone(),
        })
    }
}

// RGBA input drops alpha.
fn rgb(key: &str, color: Option<&[f32]>, default: [f32; 3]) -> Result<[f32; 3]> {
    match color {
        None => Ok(default),
        Some([r, g, b]) | Some([r, g, b, _]) => Ok([*r, *g, *b]),
        Some(other) => Err(Error::invalid(format!(
            "{} needs 3 or 4 components, got {}",
            key,
            other.len()
        ))),
    }
}
