/// Drawable record pairing shared geometry with a shared material
use std::sync::Arc;

use crate::geometry::Geometry;
use crate::material::Material;

/// A mesh references its geometry and material; several meshes may share
/// either one.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Arc<Geometry>,
    pub material: Arc<Material>,
}

impl Mesh {
    pub fn new(geometry: impl Into<Arc<Geometry>>, material: impl Into<Arc<Material>>) -> Self {
        Self {
            geometry: geometry.into(),
            material: material.into(),
        }
    }
}
