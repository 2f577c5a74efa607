/// Model JSON loading: the native `{ meshes, materials }` shape or an Assimp export
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::material::{MapSource, MaterialJson};
use crate::model::ModelJson;

#[derive(Debug, Deserialize)]
struct AssimpProperty {
    key: String,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct AssimpMaterial {
    properties: Vec<AssimpProperty>,
}

impl AssimpMaterial {
    // First property with a matching key wins.
    fn get(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| &p.value)
    }

    fn color(&self, key: &str) -> Result<Vec<f32>> {
        match self.get(key) {
            None => Ok(vec![1.0, 1.0, 1.0]),
            Some(value) => Vec::<f32>::deserialize(value)
                .map_err(|_| Error::invalid(format!("material property '{}' is not a color", key))),
        }
    }

    fn scalar(&self, key: &str, default: f32) -> Result<f32> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_f64()
                .map(|v| v as f32)
                .ok_or_else(|| Error::invalid(format!("material property '{}' is not a number", key))),
        }
    }

    fn map(&self, key: &str) -> Result<Option<MapSource>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(path)) => Ok(Some(MapSource::Path(path.clone()))),
            Some(_) => Err(Error::invalid(format!(
                "material property '{}' is not a file path",
                key
            ))),
        }
    }

    fn to_material_json(&self) -> Result<MaterialJson> {
        Ok(MaterialJson {
            ambient_color: Some(self.color("$clr.ambient")?),
            ambient_intensity: Some(1.0),
            ambient_map: self.map("$raw.AmbientColor|file")?,
            diffuse_color: Some(self.color("$clr.diffuse")?),
            diffuse_intensity: Some(1.0),
            diffuse_map: self.map("$raw.DiffuseColor|file")?,
            specular_color: Some(self.color("$clr.specular")?),
            specular_intensity: Some(1.0),
            specular_map: self.map("$raw.SpecularColor|file")?,
            emissive_color: Some(self.color("$clr.emissive")?),
            emissive_intensity: Some(1.0),
            emissive_map: self.map("$raw.EmissiveColor|file")?,
            shininess: Some(self.scalar("$mat.shininess", 20.0)?),
            opacity: Some(self.scalar("$mat.opacity", 1.0)?),
            normal_map: self.map("$raw.NormalMap|file")?,
            roughness_map: self.map("$raw.ShininessExponent|file")?,
            environment_map: None,
        })
    }
}

fn is_assimp_material(value: &Value) -> bool {
    value.get("properties").map_or(false, Value::is_array)
}

/// Parse model JSON text.
///
/// Materials carrying a `properties` list are read as Assimp materials and
/// converted to [`MaterialJson`]; anything else is read as-is.
pub fn parse_model(text: &str) -> Result<ModelJson> {
    let mut root: Value = serde_json::from_str(text)?;

    if let Some(Value::Array(materials)) = root.get_mut("materials") {
        for material in materials.iter_mut() {
            if !is_assimp_material(material) {
                continue;
            }
            let assimp = AssimpMaterial::deserialize(&*material)?;
            let converted = assimp.to_material_json()?;
            *material = serde_json::to_value(converted)?;
        }
    }

    let model = ModelJson::deserialize(root)?;
    debug!(
        meshes = model.meshes.len(),
        materials = model.materials.len(),
        "parsed model"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSIMP: &str = r#"{
        "rootnode": { "name": "root" },
        "meshes": [{
            "name": "Cube",
            "materialindex": 0,
            "primitivetypes": 4,
            "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
            "normals": [0, 0, 1, 0, 0, 1, 0, 0, 1],
            "texturecoords": [[0, 0, 1, 0, 0, 1]],
            "faces": [[0, 1, 2]]
        }],
        "materials": [{
            "properties": [
                { "key": "?mat.name", "semantic": 0, "index": 0, "type": 3, "value": "Material" },
                { "key": "$clr.diffuse", "semantic": 0, "index": 0, "type": 1, "value": [0.8, 0.1, 0.1, 1.0] },
                { "key": "$mat.shininess", "semantic": 0, "index": 0, "type": 1, "value": 50 },
                { "key": "$raw.DiffuseColor|file", "semantic": 0, "index": 0, "type": 3, "value": "body.png" },
                { "key": "$raw.DiffuseColor|file", "semantic": 0, "index": 0, "type": 3, "value": "ignored.png" }
            ]
        }]
    }"#;

    #[test]
    fn test_assimp_materials_are_converted() {
        let model = parse_model(ASSIMP).unwrap();
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].name, "Cube");

        let m = &model.materials[0];
        assert_eq!(m.diffuse_color, Some(vec![0.8, 0.1, 0.1, 1.0]));
        assert_eq!(m.ambient_color, Some(vec![1.0, 1.0, 1.0]));
        assert_eq!(m.shininess, Some(50.0));
        assert_eq!(m.opacity, Some(1.0));
        assert_eq!(m.diffuse_intensity, Some(1.0));
        assert_eq!(m.diffuse_map, Some(MapSource::Path("body.png".into())));
        assert_eq!(m.normal_map, None);
        assert_eq!(m.environment_map, None);
    }

    #[test]
    fn test_native_shape_passes_through() {
        let text = serde_json::to_string(&ModelJson::cube(1.0)).unwrap();
        let model = parse_model(&text).unwrap();
        assert_eq!(model, ModelJson::cube(1.0));
    }

    #[test]
    fn test_invalid_text_is_parse_error() {
        assert!(matches!(parse_model("{ \"meshes\": ["), Err(Error::Parse(_))));
        assert!(matches!(parse_model("not json"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_wrong_shape_is_invalid_argument() {
        assert!(matches!(
            parse_model(r#"{ "meshes": [{ "vertices": "nope", "normals": [], "faces": [] }] }"#),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_model(
                r#"{ "meshes": [], "materials": [{ "properties": [{ "key": "$mat.opacity", "value": "x" }] }] }"#
            ),
            Err(Error::InvalidArgument(_))
        ));
    }
}
