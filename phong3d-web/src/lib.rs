/// phong3d Web - WASM façade over the core for a WebGL2 render step
///
/// Exposes world, view and projection matrices as flat column-major arrays,
/// per-mesh geometry and material data, and uploads them as uniforms to a
/// program compiled by the caller. Shader compilation and buffer upload stay
/// on the JavaScript side.
use phong3d_core::{
    parse_model, MapSource, Material, Mesh, Model, ModelJson, PerspectiveCamera, Registry, Scene,
    Vector3,
};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext, WebGlProgram};

const UP: Vector3 = Vector3::new(0.0, 1.0, 0.0);

/// Texture unit the caller binds the diffuse map to.
pub const DIFFUSE_UNIT: i32 = 0;
/// Texture unit the caller binds the environment cube map to.
pub const ENVIRONMENT_UNIT: i32 = 1;

/// Floats per packed material: four RGB colors, four intensities, shininess
/// and opacity.
pub const MATERIAL_STRIDE: usize = 18;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebViewer {
    registry: Registry,
    scene: Scene,
    camera: PerspectiveCamera,
    target: Vector3,
}

#[wasm_bindgen]
impl WebViewer {
    /// `far` of `Infinity` (or any non-finite value) selects the infinite
    /// far plane.
    #[wasm_bindgen(constructor)]
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> WebViewer {
        let mut registry = Registry::new();
        let scene = Scene::new(&mut registry);
        let mut camera = PerspectiveCamera::new(&mut registry, fov, aspect, near, far);
        camera.camera.position = Vector3::new(3.0, 3.0, 3.0);

        WebViewer {
            registry,
            scene,
            camera,
            target: Vector3::ZERO,
        }
    }

    /// Parse model JSON (native or Assimp) and append its meshes. Returns the
    /// number of meshes added.
    pub fn load_model(&mut self, json: &str) -> Result<usize, JsValue> {
        let data = parse_model(json).map_err(js_err)?;
        self.add(data)
    }

    pub fn load_cube(&mut self, size: f32) -> Result<usize, JsValue> {
        self.add(ModelJson::cube(size))
    }

    pub fn clear(&mut self) {
        self.scene.clear();
    }

    pub fn mesh_count(&self) -> usize {
        self.scene.len()
    }

    /// Post-multiply the world matrix by a rotation around `(x, y, z)`.
    pub fn rotate_world(&mut self, rad: f32, x: f32, y: f32, z: f32) {
        self.scene.world.rotate(rad, &Vector3::new(x, y, z));
    }

    pub fn reset_world(&mut self) {
        self.scene.world.identity();
    }

    pub fn set_camera_position(&mut self, x: f32, y: f32, z: f32) {
        self.camera.camera.position.set(x, y, z);
    }

    pub fn set_target(&mut self, x: f32, y: f32, z: f32) {
        self.target.set(x, y, z);
    }

    /// `direction` is one of `forward`, `backward`, `left`, `right`, `up`,
    /// `down`.
    pub fn move_camera(&mut self, direction: &str, velocity: f32) -> Result<(), JsValue> {
        let camera = &mut self.camera.camera;
        let moved = match direction {
            "forward" => camera.move_forward(velocity).map(|_| ()),
            "backward" => camera.move_backward(velocity).map(|_| ()),
            "left" => camera.move_left(velocity).map(|_| ()),
            "right" => camera.move_right(velocity).map(|_| ()),
            "up" => {
                camera.move_up(velocity);
                Ok(())
            }
            "down" => {
                camera.move_down(velocity);
                Ok(())
            }
            other => return Err(js_err(format!("unknown direction '{}'", other))),
        };
        moved.map_err(js_err)
    }

    pub fn set_perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) {
        self.camera.fov = fov;
        self.camera.aspect = aspect;
        self.camera.near = near;
        self.camera.far = far;
        self.camera.update_perspective();
    }

    /// Match the canvas backing store to its CSS size and refresh the aspect
    /// ratio.
    pub fn resize(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| js_err("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| js_err(format!("no element '{}'", canvas_id)))?
            .dyn_into()
            .map_err(|_| js_err(format!("'{}' is not a canvas", canvas_id)))?;

        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        self.camera.aspect = width as f32 / height as f32;
        self.camera.update_perspective();
        Ok(())
    }

    /// Re-aim the camera at the target from its current position.
    pub fn update_view(&mut self) {
        let target = self.target;
        self.camera.camera.look_at_target(&target, &UP);
    }

    pub fn world_matrix(&self) -> Vec<f32> {
        self.scene.world.to_array().to_vec()
    }

    pub fn view_matrix(&self) -> Vec<f32> {
        self.camera.camera.view.to_array().to_vec()
    }

    pub fn projection_matrix(&self) -> Vec<f32> {
        self.camera.projection.to_array().to_vec()
    }

    pub fn mesh_vertices(&self, index: usize) -> Option<Vec<f32>> {
        self.mesh(index).map(|m| m.geometry.vertices.clone())
    }

    pub fn mesh_normals(&self, index: usize) -> Option<Vec<f32>> {
        self.mesh(index).map(|m| m.geometry.normals.clone())
    }

    pub fn mesh_texcoords(&self, index: usize) -> Option<Vec<f32>> {
        self.mesh(index).map(|m| m.geometry.texcoords.clone())
    }

    pub fn mesh_indices(&self, index: usize) -> Option<Vec<u16>> {
        self.mesh(index).map(|m| m.geometry.indices.clone())
    }

    /// Packed material scalars, see [`MATERIAL_STRIDE`].
    pub fn mesh_material(&self, index: usize) -> Option<Vec<f32>> {
        self.mesh(index).map(|m| pack_material(&m.material))
    }

    /// Path of a texture map for the caller to fetch, if the map is a path.
    /// `slot` is a uniform-style name such as `diffuseMap`.
    pub fn mesh_texture_path(&self, index: usize, slot: &str) -> Option<String> {
        let material = &self.mesh(index)?.material;
        match map_slot(material, slot)? {
            MapSource::Path(path) => Some(path.clone()),
            MapSource::Handle(_) => None,
        }
    }

    /// Upload `matWorld`, `matView`, `matProj` and the material uniforms of
    /// mesh `index` to `program`. Uniforms the program does not declare are
    /// skipped. Samplers use fixed units: the caller binds the diffuse map to
    /// `TEXTURE0` and the environment cube map to `TEXTURE1`.
    pub fn upload_uniforms(
        &self,
        gl: &WebGl2RenderingContext,
        program: &WebGlProgram,
        index: usize,
    ) -> Result<(), JsValue> {
        let mesh = self
            .mesh(index)
            .ok_or_else(|| js_err(format!("mesh index {} out of range", index)))?;
        let material = &mesh.material;

        gl.use_program(Some(program));

        let matrices = [
            ("matWorld", self.scene.world.to_array()),
            ("matView", self.camera.camera.view.to_array()),
            ("matProj", self.camera.projection.to_array()),
        ];
        for (name, m) in &matrices {
            let location = gl.get_uniform_location(program, name);
            gl.uniform_matrix4fv_with_f32_array(location.as_ref(), false, m);
        }

        let colors = [
            ("ambientColor", material.ambient_color),
            ("diffuseColor", material.diffuse_color),
            ("specularColor", material.specular_color),
            ("emissiveColor", material.emissive_color),
        ];
        for (name, c) in &colors {
            let location = gl.get_uniform_location(program, name);
            gl.uniform3fv_with_f32_array(location.as_ref(), c);
        }

        let scalars = [
            ("ambientIntensity", material.ambient_intensity),
            ("diffuseIntensity", material.diffuse_intensity),
            ("specularIntensity", material.specular_intensity),
            ("emissiveIntensity", material.emissive_intensity),
            ("shininess", material.shininess),
            ("opacity", material.opacity),
        ];
        for (name, v) in scalars {
            let location = gl.get_uniform_location(program, name);
            gl.uniform1f(location.as_ref(), v);
        }

        for (name, unit) in sampler_units(material) {
            let location = gl.get_uniform_location(program, name);
            gl.uniform1i(location.as_ref(), unit);
        }

        Ok(())
    }
}

impl WebViewer {
    fn add(&mut self, data: ModelJson) -> Result<usize, JsValue> {
        let added = self.scene.add(Model::from(data)).map_err(js_err)?;
        debug!(added, registered = self.registry.len(), "model added");
        Ok(added)
    }

    fn mesh(&self, index: usize) -> Option<&Mesh> {
        self.scene.children().get(index)
    }
}

/// Flatten material scalars in uniform order: ambient, diffuse, specular and
/// emissive colors, their four intensities, then shininess and opacity.
pub fn pack_material(material: &Material) -> Vec<f32> {
    let mut out = Vec::with_capacity(MATERIAL_STRIDE);
    out.extend_from_slice(&material.ambient_color);
    out.extend_from_slice(&material.diffuse_color);
    out.extend_from_slice(&material.specular_color);
    out.extend_from_slice(&material.emissive_color);
    out.extend_from_slice(&[
        material.ambient_intensity,
        material.diffuse_intensity,
        material.specular_intensity,
        material.emissive_intensity,
        material.shininess,
        material.opacity,
    ]);
    out
}

/// Sampler uniforms to set for `material`, with their fixed texture units.
pub fn sampler_units(material: &Material) -> Vec<(&'static str, i32)> {
    let mut units = Vec::new();
    if material.diffuse_map.is_some() {
        units.push(("diffuseMap", DIFFUSE_UNIT));
    }
    if material.environment_map.is_some() {
        units.push(("environmentMap", ENVIRONMENT_UNIT));
    }
    units
}

fn map_slot<'a>(material: &'a Material, slot: &str) -> Option<&'a MapSource> {
    match slot {
        "ambientMap" => material.ambient_map.as_ref(),
        "diffuseMap" => material.diffuse_map.as_ref(),
        "specularMap" => material.specular_map.as_ref(),
        "emissiveMap" => material.emissive_map.as_ref(),
        "normalMap" => material.normal_map.as_ref(),
        "roughnessMap" => material.roughness_map.as_ref(),
        "environmentMap" => material.environment_map.as_ref(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phong3d_core::TextureHandle;

    #[test]
    fn test_matrices_are_column_major() {
        let mut viewer = WebViewer::new(45.0, 1.0, 0.1, 100.0);
        assert_eq!(viewer.world_matrix()[0], 1.0);

        viewer.set_camera_position(0.0, 0.0, 5.0);
        viewer.update_view();
        let view = viewer.view_matrix();
        assert_eq!(view.len(), 16);
        assert_eq!(view[14], -5.0);

        let projection = viewer.projection_matrix();
        assert_eq!(projection[11], -1.0);

        viewer.set_perspective(45.0, 1.0, 0.1, f32::INFINITY);
        assert_eq!(viewer.projection_matrix()[10], -1.0);
    }

    #[test]
    fn test_cube_geometry_and_material() {
        let mut viewer = WebViewer::new(45.0, 1.0, 0.1, 100.0);
        assert_eq!(viewer.load_cube(2.0).unwrap(), 1);
        assert_eq!(viewer.mesh_count(), 1);
        assert_eq!(viewer.mesh_vertices(0).unwrap().len(), 72);
        assert_eq!(viewer.mesh_indices(0).unwrap().len(), 36);
        assert_eq!(viewer.mesh_texcoords(0).unwrap().len(), 48);
        assert!(viewer.mesh_vertices(1).is_none());

        let packed = viewer.mesh_material(0).unwrap();
        assert_eq!(packed.len(), MATERIAL_STRIDE);
        assert_eq!(packed[16], 20.0);
        assert_eq!(packed[17], 1.0);

        viewer.clear();
        assert_eq!(viewer.mesh_count(), 0);
    }

    #[test]
    fn test_texture_paths() {
        let mut viewer = WebViewer::new(45.0, 1.0, 0.1, 100.0);
        let json = r#"{
            "meshes": [{ "vertices": [0,0,0, 1,0,0, 0,1,0], "normals": [], "faces": [[0,1,2]] }],
            "materials": [{ "diffuseMap": "wood.png", "environmentMap": 2 }]
        }"#;
        viewer.load_model(json).unwrap();
        assert_eq!(viewer.mesh_texture_path(0, "diffuseMap"), Some("wood.png".into()));
        assert_eq!(viewer.mesh_texture_path(0, "environmentMap"), None);
        assert_eq!(viewer.mesh_texture_path(0, "normalMap"), None);
    }

    #[test]
    fn test_samplers_use_fixed_units() {
        assert!(sampler_units(&Material::default()).is_empty());

        let material = Material {
            diffuse_map: Some(MapSource::Path("wood.png".into())),
            environment_map: Some(MapSource::Handle(TextureHandle(7))),
            ..Material::default()
        };
        assert_eq!(
            sampler_units(&material),
            vec![("diffuseMap", 0), ("environmentMap", 1)]
        );

        let cube_only = Material {
            environment_map: Some(MapSource::Handle(TextureHandle(42))),
            ..Material::default()
        };
        assert_eq!(sampler_units(&cube_only), vec![("environmentMap", ENVIRONMENT_UNIT)]);
    }

    #[test]
    fn test_rotate_and_move() {
        let mut viewer = WebViewer::new(45.0, 1.0, 0.1, 100.0);
        viewer.rotate_world(0.5, 0.0, 1.0, 0.0);
        assert_ne!(viewer.world_matrix()[0], 1.0);
        viewer.reset_world();
        assert_eq!(viewer.world_matrix()[0], 1.0);

        viewer.update_view();
        viewer.move_camera("up", 1.0).unwrap();
        viewer.move_camera("backward", 0.0).unwrap();
        assert_eq!(viewer.camera.camera.position.y, 4.0);
    }
}
