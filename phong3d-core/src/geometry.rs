/// Vertex, normal, texcoord and index arrays for one drawable mesh
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::MeshJson;
use crate::vector::Vector3;

/// Flat vertex data ready for upload. Positions and normals are packed xyz,
/// texture coordinates packed uv, indices are `u16` triangle lists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    pub name: String,
    pub material_index: usize,
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Geometry {
    pub fn new(mesh: &MeshJson) -> Result<Self> {
        if mesh.vertices.len() % 3 != 0 {
            return Err(Error::invalid(format!(
                "mesh '{}': vertices length {} is not a multiple of 3",
                mesh.name,
                mesh.vertices.len()
            )));
        }
        if mesh.normals.len() % 3 != 0 {
            return Err(Error::invalid(format!(
                "mesh '{}': normals length {} is not a multiple of 3",
                mesh.name,
                mesh.normals.len()
            )));
        }

        let vertex_count = mesh.vertices.len() / 3;
        let mut indices = Vec::with_capacity(mesh.faces.iter().map(Vec::len).sum());
        for &index in mesh.faces.iter().flatten() {
            let index = u16::try_from(index).map_err(|_| {
                Error::invalid(format!("mesh '{}': index {} does not fit u16", mesh.name, index))
            })?;
            if index as usize >= vertex_count {
                return Err(Error::invalid(format!(
                    "mesh '{}': index {} out of range for {} vertices",
                    mesh.name, index, vertex_count
                )));
            }
            indices.push(index);
        }

        let texcoords = mesh
            .texture_coords
            .as_ref()
            .and_then(|channels| channels.first())
            .cloned()
            .unwrap_or_default();

        Ok(Self {
            name: mesh.name.clone(),
            material_index: mesh.material_index,
            vertices: mesh.vertices.clone(),
            normals: mesh.normals.clone(),
            texcoords,
            indices,
        })
    }

    /// Build from an untyped JSON mesh. `vertices`, `normals` and `faces`
    /// must be arrays.
    pub fn from_value(value: &Value) -> Result<Self> {
        for key in ["vertices", "normals", "faces"] {
            if !value.get(key).map_or(false, Value::is_array) {
                return Err(Error::invalid(format!("mesh field '{}' must be an array", key)));
            }
        }
        let mesh = MeshJson::deserialize(value).map_err(|e| Error::invalid(e.to_string()))?;
        Self::new(&mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn position(&self, index: usize) -> Option<Vector3> {
        read_vec3(&self.vertices, index)
    }

    pub fn normal(&self, index: usize) -> Option<Vector3> {
        read_vec3(&self.normals, index)
    }

    /// Index triples; a trailing partial triangle is ignored.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }
}

fn read_vec3(data: &[f32], index: usize) -> Option<Vector3> {
    let chunk = data.get(index * 3..index * 3 + 3)?;
    Some(Vector3::new(chunk[0], chunk[1], chunk[2]))
}
