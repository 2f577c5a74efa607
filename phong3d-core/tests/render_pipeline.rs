/// End-to-end: load a model, compose a scene, and derive the matrices a
/// render step consumes.
use phong3d_core::{
    model_view_projection, parse_model, Matrix4, MaterialJson, MapSource, Model, ModelJson,
    PerspectiveCamera, Registry, Scene, Vector3, Vector4,
};

const TOL: f32 = 1e-5;

fn ndc(clip: Vector4) -> Vector3 {
    Vector3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w)
}

fn setup(registry: &mut Registry) -> (Scene, PerspectiveCamera) {
    let text = serde_json::to_string(&ModelJson::cube(2.0)).unwrap();
    let data = parse_model(&text).unwrap();
    let overrides = MaterialJson {
        environment_map: Some(MapSource::Path("sky.png".into())),
        ..Default::default()
    };

    let mut scene = Scene::new(registry);
    scene.add(Model::new(data, overrides)).unwrap();

    let mut camera = PerspectiveCamera::new(registry, 45.0, 1.0, 0.1, 1000.0);
    camera.camera.position = Vector3::new(3.0, 3.0, 3.0);
    camera
        .camera
        .look_at_target(&Vector3::ZERO, &Vector3::new(0.0, 1.0, 0.0));

    (scene, camera)
}

#[test]
fn origin_projects_to_screen_centre() {
    let mut registry = Registry::with_seed(11);
    let (scene, camera) = setup(&mut registry);

    let mvp = model_view_projection(&scene.world, &camera.camera.view, &camera.projection);
    let centre = ndc(mvp.transform_point(&Vector3::ZERO));
    assert!(centre.x.abs() < TOL && centre.y.abs() < TOL);
    assert!(centre.z > -1.0 && centre.z < 1.0);

    // Every cube corner sits inside the clip volume from (3, 3, 3).
    let geometry = &scene.children()[0].geometry;
    for i in 0..geometry.vertex_count() {
        let p = ndc(mvp.transform_point(&geometry.position(i).unwrap()));
        assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0 && p.z.abs() <= 1.0, "vertex {}", i);
    }
}

#[test]
fn overrides_reach_every_mesh_material() {
    let mut registry = Registry::with_seed(12);
    let (scene, _) = setup(&mut registry);
    assert_eq!(scene.len(), 1);
    let material = &scene.children()[0].material;
    assert_eq!(material.environment_map, Some(MapSource::Path("sky.png".into())));
    assert_eq!(material.shininess, 20.0);
}

#[test]
fn spinning_world_keeps_origin_fixed() {
    let mut registry = Registry::with_seed(13);
    let (mut scene, camera) = setup(&mut registry);
    let before = model_view_projection(&scene.world, &camera.camera.view, &camera.projection);

    scene.world.rotate_y(0.7);
    let after = model_view_projection(&scene.world, &camera.camera.view, &camera.projection);

    let a = ndc(before.transform_point(&Vector3::ZERO));
    let b = ndc(after.transform_point(&Vector3::ZERO));
    assert!((a - b).magnitude() < TOL);
    assert_ne!(before, after);
}

#[test]
fn flat_multiply_is_reversed_operator_product() {
    let mut a = Matrix4::new();
    a.rotate(0.4, &Vector3::new(1.0, 2.0, 3.0))
        .translate(&Vector3::new(1.0, -2.0, 0.5));
    let mut b = Matrix4::new();
    b.scale(&Vector3::new(2.0, 3.0, 4.0)).rotate_z(1.1);

    let mut flat = a;
    flat.multiply(&b);
    let op = b * a;
    for i in 0..16 {
        assert!((flat[i] - op[i]).abs() < TOL, "element {}", i);
    }
}

#[test]
fn double_inverse_round_trips() {
    let mut m = Matrix4::new();
    m.rotate_x(0.3)
        .rotate_y(-1.2)
        .translate(&Vector3::new(4.0, 5.0, 6.0))
        .scale(&Vector3::new(1.5, 0.5, 2.0));
    let original = m;

    m.invert().unwrap().invert().unwrap();
    for i in 0..16 {
        assert!((m[i] - original[i]).abs() < 1e-4, "element {}", i);
    }
}

#[test]
fn registry_tracks_scene_and_camera() {
    let mut registry = Registry::with_seed(14);
    let (scene, camera) = setup(&mut registry);
    assert_eq!(registry.len(), 2);
    assert!(registry.contains(&scene.id()));
    assert!(registry.contains(&camera.id()));
}
