/// Loader-facing model data: sub-meshes plus a materials table
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::material::MaterialJson;

/// One sub-mesh as handed over by a loader.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshJson {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "materialindex", default)]
    pub material_index: usize,
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    /// UV channels; only channel 0 is used.
    #[serde(rename = "texturecoords", default, skip_serializing_if = "Option::is_none")]
    pub texture_coords: Option<Vec<Vec<f32>>>,
    pub faces: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelJson {
    pub meshes: Vec<MeshJson>,
    #[serde(default)]
    pub materials: Vec<MaterialJson>,
}

impl ModelJson {
    /// Parse the native `{ meshes, materials }` shape.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Axis-aligned cube centred on the origin with flat outward normals and
    /// counter-clockwise front faces, using one default material.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;

        // Each face: normal, then four corners wound counter-clockwise seen
        // from outside.
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            // Front
            ([0.0, 0.0, 1.0], [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]]),
            // Back
            ([0.0, 0.0, -1.0], [[-h, -h, -h], [-h, h, -h], [h, h, -h], [h, -h, -h]]),
            // Top
            ([0.0, 1.0, 0.0], [[-h, h, -h], [-h, h, h], [h, h, h], [h, h, -h]]),
            // Bottom
            ([0.0, -1.0, 0.0], [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]]),
            // Right
            ([1.0, 0.0, 0.0], [[h, -h, -h], [h, h, -h], [h, h, h], [h, -h, h]]),
            // Left
            ([-1.0, 0.0, 0.0], [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]]),
        ];

        let mut mesh = MeshJson {
            name: "cube".to_string(),
            ..Default::default()
        };
        let mut uvs = Vec::with_capacity(48);

        for (face, (normal, corners)) in faces.iter().enumerate() {
            for corner in corners {
                mesh.vertices.extend_from_slice(corner);
                mesh.normals.extend_from_slice(normal);
            }
            uvs.extend_from_slice(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);

            let base = face as u32 * 4;
            mesh.faces.push(vec![base, base + 1, base + 2]);
            mesh.faces.push(vec![base, base + 2, base + 3]);
        }
        mesh.texture_coords = Some(vec![uvs]);

        Self {
            meshes: vec![mesh],
            materials: vec![MaterialJson::default()],
        }
    }
}

/// A loaded model whose materials already carry any caller overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub data: ModelJson,
}

impl Model {
    /// Wrap `data`, merging `overrides` into every material entry. Keys set
    /// in `overrides` win.
    pub fn new(mut data: ModelJson, overrides: MaterialJson) -> Self {
        for material in &mut data.materials {
            *material = overrides.clone().or(material.clone());
        }
        Self { data }
    }

    pub fn mesh_count(&self) -> usize {
        self.data.meshes.len()
    }
}

impl From<ModelJson> for Model {
    fn from(data: ModelJson) -> Self {
        Self::new(data, MaterialJson::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MapSource;

    #[test]
    fn test_parse_native_shape() {
        let json = r#"{
            "meshes": [{
                "name": "body",
                "materialindex": 1,
                "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
                "normals": [0, 0, 1, 0, 0, 1, 0, 0, 1],
                "texturecoords": [[0, 0, 1, 0, 0, 1]],
                "faces": [[0, 1, 2]]
            }],
            "materials": [{}, {"shininess": 64}]
        }"#;
        let model = ModelJson::from_json_str(json).unwrap();
        assert_eq!(model.meshes[0].material_index, 1);
        assert_eq!(model.meshes[0].faces, vec![vec![0, 1, 2]]);
        assert_eq!(model.materials[1].shininess, Some(64.0));
    }

    #[test]
    fn test_cube_shape() {
        let cube = ModelJson::cube(2.0);
        let mesh = &cube.meshes[0];
        assert_eq!(mesh.vertices.len(), 24 * 3);
        assert_eq!(mesh.normals.len(), 24 * 3);
        assert_eq!(mesh.faces.len(), 12);
        assert!(mesh.vertices.iter().all(|v| v.abs() == 1.0));
        assert_eq!(cube.materials.len(), 1);
    }

    #[test]
    fn test_overrides_merge_into_every_material() {
        let mut data = ModelJson::cube(1.0);
        data.materials = vec![
            MaterialJson {
                shininess: Some(5.0),
                ..Default::default()
            },
            MaterialJson {
                opacity: Some(0.5),
                environment_map: Some(MapSource::Path("old".into())),
                ..Default::default()
            },
        ];
        let overrides = MaterialJson {
            environment_map: Some(MapSource::Path("sky".into())),
            ..Default::default()
        };

        let model = Model::new(data, overrides);
        for material in &model.data.materials {
            assert_eq!(material.environment_map, Some(MapSource::Path("sky".into())));
        }
        assert_eq!(model.data.materials[0].shininess, Some(5.0));
        assert_eq!(model.data.materials[1].opacity, Some(0.5));
    }
}
