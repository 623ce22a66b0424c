use std::cmp::Ordering;

use bevy_math::{Mat4, Quat, Vec2, Vec3};
use image::{Rgba, RgbaImage};
use sr_model::{Mesh, Model};
use sr_utils::{SkinError, SkinResult};
use tracing::debug;

use super::{CAMERA_RADIUS, Camera, Pose, Viewport};

const AMBIENT: f32 = 0.6;
const DIFFUSE: f32 = 0.4;

/// A triangle in pixel space. `z` of each vertex holds its view depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub vertices: [Vec3; 3],
    pub color: Rgba<u8>,
}

/// A drawing surface. Implementations keep their buffers between frames.
pub trait RasterBackend: Send {
    /// Resizes if needed and clears to transparent.
    fn begin(&mut self, width: u32, height: u32);

    /// Depth-tested fill. Opaque triangles replace and write depth,
    /// translucent ones blend over without writing depth.
    fn fill_triangle(&mut self, triangle: &ScreenTriangle);

    fn finish(&mut self) -> RgbaImage;
}

#[derive(Debug, Default)]
pub struct SoftwareRasterizer {
    color: RgbaImage,
    /// Interpolated 1/depth; larger is closer, 0 is empty.
    depth: Vec<f32>,
}

impl SoftwareRasterizer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

// Positive-area triangles wind clockwise on a y-down screen.
fn is_top_left(a: Vec2, b: Vec2) -> bool {
    (a.y == b.y && b.x > a.x) || b.y < a.y
}

fn covers(w: f32, top_left: bool) -> bool {
    w > 0.0 || (w == 0.0 && top_left)
}

impl RasterBackend for SoftwareRasterizer {
    fn begin(&mut self, width: u32, height: u32) {
        if self.color.dimensions() != (width, height) {
            self.color = RgbaImage::new(width, height);
        } else {
            self.color.fill(0);
        }
        self.depth.clear();
        self.depth.resize((width * height) as usize, 0.0);
    }

    fn fill_triangle(&mut self, triangle: &ScreenTriangle) {
        let [mut v0, mut v1, mut v2] = triangle.vertices;
        let area = edge(v0.truncate(), v1.truncate(), v2.truncate());
        if area == 0.0 || !area.is_finite() {
            return;
        }
        if area < 0.0 {
            std::mem::swap(&mut v1, &mut v2);
        }
        let (p0, p1, p2) = (v0.truncate(), v1.truncate(), v2.truncate());
        let area = area.abs();
        let (width, height) = self.color.dimensions();

        let min = p0.min(p1).min(p2).floor().max(Vec2::ZERO);
        let max = p0.max(p1).max(p2).ceil().min(Vec2::new(width as f32, height as f32));
        if min.x >= max.x || min.y >= max.y {
            return;
        }

        let tl = [is_top_left(p1, p2), is_top_left(p2, p0), is_top_left(p0, p1)];
        let inv_z = [1.0 / v0.z, 1.0 / v1.z, 1.0 / v2.z];
        let alpha = triangle.color[3];
        let opaque = alpha == u8::MAX;

        for y in min.y as u32..max.y as u32 {
            for x in min.x as u32..max.x as u32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(p1, p2, p);
                let w1 = edge(p2, p0, p);
                let w2 = edge(p0, p1, p);
                if !(covers(w0, tl[0]) && covers(w1, tl[1]) && covers(w2, tl[2])) {
                    continue;
                }
                let z = (w0 * inv_z[0] + w1 * inv_z[1] + w2 * inv_z[2]) / area;
                let idx = (y * width + x) as usize;
                if z <= self.depth[idx] {
                    continue;
                }
                if opaque {
                    self.depth[idx] = z;
                    self.color.put_pixel(x, y, triangle.color);
                } else {
                    let dst = self.color.get_pixel_mut(x, y);
                    *dst = source_over(*dst, triangle.color);
                }
            }
        }
    }

    fn finish(&mut self) -> RgbaImage {
        self.color.clone()
    }
}

/// Straight-alpha source-over, rounded per channel.
pub(crate) fn source_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        out[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    Rgba(out)
}

/// Camera and animation for one posed render. Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseParams {
    pub width: u32,
    pub height: u32,
    pub theta: f32,
    pub phi: f32,
    pub time: f32,
}

struct Translucent {
    depth: f32,
    triangles: [ScreenTriangle; 2],
}

struct Frame {
    camera: Camera,
    viewport: Viewport,
    light: Vec3,
    opaque: Vec<ScreenTriangle>,
    translucent: Vec<Translucent>,
}

impl Frame {
    fn project_quad(&self, corners: &[Vec3; 4], transform: Mat4) -> Option<[Vec3; 4]> {
        let mut out = [Vec3::ZERO; 4];
        for (projected, corner) in out.iter_mut().zip(corners) {
            *projected = self
                .camera
                .project(transform.transform_point3(*corner), self.viewport)?;
        }
        Some(out)
    }

    fn push_mesh(&mut self, mesh: &Mesh, transform: Mat4) {
        let eye = self.camera.eye();
        for face in &mesh.faces {
            let normal = transform.transform_vector3(face.normal);
            let center = transform.transform_point3(face.center());
            let facing = normal.dot(center - eye);
            if facing >= 0.0 && !mesh.double_sided {
                continue;
            }
            let normal = if facing >= 0.0 { -normal } else { normal };

            let Some(corners) = self.project_quad(&face.corners, transform) else {
                continue;
            };

            let shade = AMBIENT + DIFFUSE * normal.dot(self.light).max(0.0);
            let [r, g, b] = face.color.map(|c| (c as f32 * shade).round().min(255.0) as u8);
            let color = Rgba([r, g, b, mesh.material(face).alpha]);
            let triangles = [
                ScreenTriangle {
                    vertices: [corners[0], corners[1], corners[2]],
                    color,
                },
                ScreenTriangle {
                    vertices: [corners[0], corners[2], corners[3]],
                    color,
                },
            ];
            if color[3] == u8::MAX {
                self.opaque.extend(triangles);
            } else {
                self.translucent.push(Translucent {
                    depth: self.camera.depth(center),
                    triangles,
                });
            }
        }
    }
}

/// Draws `model` posed and framed per `params` on `backend`.
pub fn render_pose<B: RasterBackend + ?Sized>(
    backend: &mut B,
    model: &Model,
    params: &PoseParams,
) -> SkinResult<RgbaImage> {
    if params.width == 0 || params.height == 0 {
        return Err(SkinError::invalid_parameter(format!(
            "output size {}x{}",
            params.width, params.height
        )));
    }
    if !(params.theta.is_finite() && params.phi.is_finite() && params.time.is_finite()) {
        return Err(SkinError::invalid_parameter("camera angles and time must be finite"));
    }

    let camera = Camera::orbit(params.theta, params.phi);
    let pose = Pose::at(params.time);
    let root = Mat4::from_quat(model.root_rotation());
    let mut frame = Frame {
        camera,
        viewport: Viewport::new(params.width, params.height),
        light: (camera.eye() + Vec3::Y * CAMERA_RADIUS * 0.5).normalize(),
        opaque: Vec::new(),
        translucent: Vec::new(),
    };

    for group in &model.parts {
        let swing = Quat::from_rotation_x(pose.limb_angle(group.part));
        let transform = root
            * Mat4::from_rotation_translation(swing, group.pivot)
            * Mat4::from_translation(group.offset);
        frame.push_mesh(&group.base, transform);
        if let Some(overlay) = &group.overlay {
            frame.push_mesh(overlay, transform);
        }
    }
    if let Some(cape) = &model.cape {
        let rotation = cape.rotation * Quat::from_rotation_x(-pose.cape);
        let transform = root
            * Mat4::from_rotation_translation(rotation, cape.pivot)
            * Mat4::from_translation(cape.offset);
        frame.push_mesh(&cape.mesh, transform);
    }

    frame
        .translucent
        .sort_by(|a, b| b.depth.partial_cmp(&a.depth).unwrap_or(Ordering::Equal));
    debug!(
        width = params.width,
        height = params.height,
        opaque = frame.opaque.len(),
        translucent = frame.translucent.len() * 2,
        "rasterizing pose"
    );

    backend.begin(params.width, params.height);
    for triangle in &frame.opaque {
        backend.fill_triangle(triangle);
    }
    for face in &frame.translucent {
        for triangle in &face.triangles {
            backend.fill_triangle(triangle);
        }
    }
    Ok(backend.finish())
}
