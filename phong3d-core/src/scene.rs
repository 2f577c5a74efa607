/// Scene composition: a world transform plus an ordered list of meshes
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::Geometry;
use crate::material::Material;
use crate::matrix::Matrix4;
use crate::mesh::Mesh;
use crate::model::Model;
use crate::registry::{ObjectKind, Registry, Uuid};

/// Anything [`Scene::add`] accepts.
#[derive(Debug, Clone)]
pub enum SceneItem {
    Mesh(Mesh),
    Model(Model),
}

impl From<Mesh> for SceneItem {
    fn from(mesh: Mesh) -> Self {
        SceneItem::Mesh(mesh)
    }
}

impl From<Model> for SceneItem {
    fn from(model: Model) -> Self {
        SceneItem::Model(model)
    }
}

/// Flat scene. `world` is applied to every child and is meant to be mutated
/// directly between frames. Not `Clone`: a copy needs its own registry id,
/// see [`Scene::duplicate`].
#[derive(Debug)]
pub struct Scene {
    pub world: Matrix4,
    children: Vec<Mesh>,
    id: Uuid,
}

impl Scene {
    pub fn new(registry: &mut Registry) -> Self {
        Self {
            world: Matrix4::new(),
            children: Vec::new(),
            id: registry.register(ObjectKind::Scene),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Copy the world matrix and children into a scene registered under a
    /// fresh id.
    pub fn duplicate(&self, registry: &mut Registry) -> Self {
        Self {
            world: self.world,
            children: self.children.clone(),
            id: registry.register(ObjectKind::Scene),
        }
    }

    /// Append a mesh or expand a model. Returns how many meshes were added.
    pub fn add(&mut self, item: impl Into<SceneItem>) -> Result<usize> {
        match item.into() {
            SceneItem::Mesh(mesh) => {
                self.add_mesh(mesh);
                Ok(1)
            }
            SceneItem::Model(model) => self.add_model(&model),
        }
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> &mut Self {
        self.children.push(mesh);
        self
    }

    /// Build one mesh per sub-mesh, in sub-mesh order, each bound to the
    /// material its `materialindex` points at. A `materialindex` with no
    /// entry in the materials table binds [`Material::default`]. Nothing is
    /// appended if any sub-mesh fails.
    pub fn add_model(&mut self, model: &Model) -> Result<usize> {
        let data = &model.data;
        let mut meshes = Vec::with_capacity(data.meshes.len());

        for sub in &data.meshes {
            let geometry = Geometry::new(sub)?;
            let material = match data.materials.get(sub.material_index) {
                Some(params) => Material::from_json(params)?,
                None => {
                    trace!(
                        mesh = %sub.name,
                        index = sub.material_index,
                        materials = data.materials.len(),
                        "no material entry, using default"
                    );
                    Material::default()
                }
            };
            meshes.push(Mesh::new(Arc::new(geometry), Arc::new(material)));
        }

        let added = meshes.len();
        self.children.extend(meshes);
        debug!(scene = %self.id, added, total = self.children.len(), "expanded model");
        Ok(added)
    }

    pub fn children(&self) -> &[Mesh] {
        &self.children
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
