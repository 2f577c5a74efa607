/// phong3d Core Library - Transform math and scene composition
///
/// This library provides the backend-free core of the renderer: vector and
/// 4x4 matrix math, cameras, materials, model loading and the flat scene that
/// render steps read their world, view and projection matrices from.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod material;
pub mod matrix;
pub mod mesh;
pub mod model;
pub mod projection;
pub mod registry;
pub mod scene;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use camera::Camera;
pub use error::{Error, Result};
pub use geometry::Geometry;
pub use loader::parse_model;
pub use material::{MapSource, Material, MaterialJson, TextureHandle};
pub use matrix::Matrix4;
pub use mesh::Mesh;
pub use model::{MeshJson, Model, ModelJson};
pub use projection::PerspectiveCamera;
pub use registry::{ObjectKind, Registry, Uuid};
pub use scene::{Scene, SceneItem};
pub use transform::{model_view_projection, to_radians, EPSILON};
pub use vector::{Vector2, Vector3, Vector4};
