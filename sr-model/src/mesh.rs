use bevy_math::Vec3;

use super::Face;

/// Axis-aligned box in part-local units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub size: Vec3,
    pub center: Vec3,
}

impl BoxGeometry {
    pub fn new(size: Vec3) -> Self {
        Self {
            size,
            center: Vec3::ZERO,
        }
    }

    pub fn from_texels([w, h, d]: [u32; 3]) -> Self {
        Self::new(Vec3::new(w as f32, h as f32, d as f32))
    }

    /// Same center, `amount` added to every dimension.
    pub fn inflated(self, amount: f32) -> Self {
        Self {
            size: self.size + Vec3::splat(amount),
            center: self.center,
        }
    }

    /// Grid of `face`: first corner, full column edge, full row edge and outward normal.
    pub fn face_plane(&self, face: Face) -> FacePlane {
        let s = self.size;
        let (corner, col, row, normal) = match face {
            Face::Front => (
                Vec3::new(-0.5, 0.5, 0.5),
                Vec3::X * s.x,
                Vec3::NEG_Y * s.y,
                Vec3::Z,
            ),
            Face::Back => (
                Vec3::new(-0.5, 0.5, -0.5),
                Vec3::X * s.x,
                Vec3::NEG_Y * s.y,
                Vec3::NEG_Z,
            ),
            Face::Right => (
                Vec3::new(-0.5, 0.5, -0.5),
                Vec3::Z * s.z,
                Vec3::NEG_Y * s.y,
                Vec3::NEG_X,
            ),
            Face::Left => (
                Vec3::new(0.5, 0.5, -0.5),
                Vec3::Z * s.z,
                Vec3::NEG_Y * s.y,
                Vec3::X,
            ),
            Face::Top => (
                Vec3::new(-0.5, 0.5, -0.5),
                Vec3::X * s.x,
                Vec3::Z * s.z,
                Vec3::Y,
            ),
            Face::Bottom => (
                Vec3::new(-0.5, -0.5, -0.5),
                Vec3::X * s.x,
                Vec3::Z * s.z,
                Vec3::NEG_Y,
            ),
        };
        FacePlane {
            origin: self.center + corner * s,
            col,
            row,
            normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePlane {
    pub origin: Vec3,
    pub col: Vec3,
    pub row: Vec3,
    pub normal: Vec3,
}

impl FacePlane {
    /// Corners of cell (`c`, `r`) on a `cols`x`rows` grid.
    pub fn cell_corners(&self, c: u32, r: u32, cols: u32, rows: u32) -> [Vec3; 4] {
        let du = self.col / cols as f32;
        let dv = self.row / rows as f32;
        let p = self.origin + du * c as f32 + dv * r as f32;
        [p, p + du, p + du + dv, p + dv]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Material {
    pub alpha: u8,
}

impl Material {
    pub fn is_opaque(self) -> bool {
        self.alpha == u8::MAX
    }
}

/// One flat-colored quad covering a single texel cell of a box face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexelFace {
    pub face: Face,
    /// Column and row of the cell on the face grid.
    pub cell: [u16; 2],
    pub corners: [Vec3; 4],
    pub normal: Vec3,
    pub color: [u8; 3],
    /// Index into [`Mesh::materials`].
    pub material: u16,
}

impl TexelFace {
    pub fn center(&self) -> Vec3 {
        (self.corners[0] + self.corners[2]) * 0.5
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: BoxGeometry,
    pub faces: Vec<TexelFace>,
    pub materials: Vec<Material>,
    /// Set once any face is translucent, so back faces must be drawn too.
    pub double_sided: bool,
}

impl Mesh {
    pub fn material(&self, face: &TexelFace) -> Material {
        self.materials[face.material as usize]
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}
