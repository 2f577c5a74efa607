/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use phong3d_core::{
    model_view_projection, Material, Matrix4, ObjectKind, PerspectiveCamera, Registry, Scene,
    Uuid, Vector3, Vector4,
};
use std::io::Write;
use tracing::trace;

use crate::config::ViewerConfig;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const UP: Vector3 = Vector3::new(0.0, 1.0, 0.0);

/// Light and raster settings for the fixed Phong equation.
#[derive(Debug, Clone, PartialEq)]
pub struct Shading {
    /// Unit direction from the surface towards the light.
    pub light_direction: Vector3,
    pub ambient_light: f32,
    pub emissive_weight: f32,
    pub char_aspect: f32,
    pub cull_back_faces: bool,
}

impl Default for Shading {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

impl From<&ViewerConfig> for Shading {
    fn from(config: &ViewerConfig) -> Self {
        let mut light_direction = config.light_direction();
        light_direction.normalize();
        Self {
            light_direction,
            ambient_light: config.ambient_light,
            emissive_weight: config.emissive_weight,
            char_aspect: config.char_aspect,
            cull_back_faces: config.cull_back_faces,
        }
    }
}

/// Screen-space vertex: cell coordinates plus NDC depth.
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
}

/// ASCII renderer that turns a scene into terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    shading: Shading,
    /// Point the camera is re-aimed at every frame.
    pub target: Vector3,
    id: Uuid,
}

impl AsciiRenderer {
    pub fn new(registry: &mut Registry, width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            shading: Shading::default(),
            target: Vector3::ZERO,
            id: registry.register(ObjectKind::Renderer),
        }
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = shading;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Projection aspect ratio that keeps cells from stretching the image.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 * self.shading.char_aspect / self.height as f32
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.depth_buffer = vec![f32::INFINITY; width * height];
        self.char_buffer = vec![' '; width * height];
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        self.index(x, y).map(|i| self.char_buffer[i])
    }

    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        self.index(x, y).map(|i| self.depth_buffer[i])
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Draw every mesh of `scene` on top of the current buffer contents.
    ///
    /// Re-aims the camera at [`AsciiRenderer::target`] first. Returns the
    /// number of triangles that reached the rasterizer.
    pub fn render(&mut self, scene: &Scene, camera: &mut PerspectiveCamera) -> usize {
        let target = self.target;
        camera.camera.look_at_target(&target, &UP);

        let world = scene.world;
        let mvp = model_view_projection(&world, &camera.camera.view, &camera.projection);

        let mut normal_matrix = world;
        if normal_matrix.invert().is_ok() {
            normal_matrix.transpose();
        } else {
            trace!("world matrix is singular, shading with it directly");
        }

        let eye = camera.camera.position;
        let mut drawn = 0;

        for mesh in scene.children() {
            let geometry = &mesh.geometry;
            for [a, b, c] in geometry.triangles() {
                let (Some(pa), Some(pb), Some(pc)) =
                    (geometry.position(a), geometry.position(b), geometry.position(c))
                else {
                    continue;
                };

                let Some(screen) = self.project(&mvp, [pa, pb, pc]) else {
                    continue;
                };

                let world_positions = [pa, pb, pc].map(|p| world.transform_point(&p).truncate());
                let normal = match (geometry.normal(a), geometry.normal(b), geometry.normal(c)) {
                    (Some(na), Some(nb), Some(nc)) => {
                        let n = normal_matrix.transform_vector4(&(na + nb + nc).extend(0.0));
                        n.truncate()
                    }
                    _ => {
                        let [wa, wb, wc] = world_positions;
                        (wb - wa).cross(&(wc - wa))
                    }
                };

                let centroid = (world_positions[0] + world_positions[1] + world_positions[2]) * (1.0 / 3.0);
                let intensity = self.shade(&mesh.material, normal, eye - centroid);
                self.rasterize_triangle(&screen, character(intensity));
                drawn += 1;
            }
        }

        drawn
    }

    // Clip-space projection, perspective divide and viewport mapping. None
    // for back faces and for any triangle with a vertex at or behind the eye
    // plane (clip w <= EPSILON). Such triangles are dropped whole, not clipped
    // against the near plane.
    fn project(&self, mvp: &Matrix4, points: [Vector3; 3]) -> Option<[ScreenVertex; 3]> {
        let clip: [Vector4; 3] = points.map(|p| mvp.transform_point(&p));
        if clip.iter().any(|c| c.w <= f32::EPSILON) {
            return None;
        }
        let ndc = clip.map(|c| Vector3::new(c.x / c.w, c.y / c.w, c.z / c.w));

        if self.shading.cull_back_faces {
            let area = (ndc[1].x - ndc[0].x) * (ndc[2].y - ndc[0].y)
                - (ndc[2].x - ndc[0].x) * (ndc[1].y - ndc[0].y);
            if area <= 0.0 {
                return None;
            }
        }

        let (w, h) = (self.width as f32, self.height as f32);
        Some(ndc.map(|p| ScreenVertex {
            x: (p.x + 1.0) * 0.5 * w,
            y: (1.0 - p.y) * 0.5 * h,
            depth: p.z,
        }))
    }

    /// Ambient + Lambert diffuse + Phong specular + weighted emissive, times
    /// opacity, as a luminance in [0, 1].
    fn shade(&self, material: &Material, mut normal: Vector3, mut to_eye: Vector3) -> f32 {
        normal.normalize();
        to_eye.normalize();
        let light = self.shading.light_direction;

        let n_dot_l = normal.dot(&light);
        let diffuse = n_dot_l.max(0.0);
        let specular = if n_dot_l > 0.0 {
            let reflected = normal * (2.0 * n_dot_l) - light;
            reflected.dot(&to_eye).max(0.0).powf(material.shininess)
        } else {
            0.0
        };

        let intensity = self.shading.ambient_light
            * material.ambient_intensity
            * luminance(material.ambient_color)
            + diffuse * material.diffuse_intensity * luminance(material.diffuse_color)
            + specular * material.specular_intensity * luminance(material.specular_color)
            + self.shading.emissive_weight
                * material.emissive_intensity
                * luminance(material.emissive_color);

        (intensity * material.opacity).clamp(0.0, 1.0)
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenVertex; 3], character: char) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                if !(-1.0..=1.0).contains(&depth) {
                    continue;
                }

                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    /// One string per row.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.char_buffer
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect())
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn luminance([r, g, b]: [f32; 3]) -> f32 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

// Covered cells never use the blank first ramp entry.
fn character(intensity: f32) -> char {
    let steps = (LUMINOSITY_RAMP.len() - 2) as f32;
    let index = 1 + (intensity * steps).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
