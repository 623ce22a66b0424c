use image::RgbaImage;

use super::{BoxGeometry, Face, FaceSet, Material, Mesh, TexelFace};

const NO_MATERIAL: u16 = u16::MAX;

/// Samples `faces` from `image` onto `geometry`, one quad per visible texel.
///
/// Fully transparent texels leave holes, partially transparent ones make the
/// mesh double sided. Texels outside the image read as fully transparent.
/// Returns `None` when nothing visible was sampled.
pub fn color_faces(geometry: &BoxGeometry, image: &RgbaImage, faces: &FaceSet) -> Option<Mesh> {
    let (width, height) = image.dimensions();
    let texels = u64::from(width) * u64::from(height);
    let mut out = Vec::with_capacity(faces.texel_count().min(texels as usize));
    let mut materials = Vec::new();
    let mut material_index = [NO_MATERIAL; 256];
    let mut double_sided = false;

    for (face, rect) in Face::ALL.into_iter().zip(faces.as_array()) {
        let (cols, rows) = (rect.columns(), rect.rows());
        if cols == 0 || rows == 0 {
            continue;
        }
        let plane = geometry.face_plane(face);
        for row in 0..rows {
            for col in 0..cols {
                let (x, y) = rect.texel(col, row);
                if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                    continue;
                }
                let [r, g, b, a] = image.get_pixel(x as u32, y as u32).0;
                if a == 0 {
                    continue;
                }
                if a < u8::MAX {
                    double_sided = true;
                }
                let slot = &mut material_index[a as usize];
                if *slot == NO_MATERIAL {
                    *slot = materials.len() as u16;
                    materials.push(Material { alpha: a });
                }
                out.push(TexelFace {
                    face,
                    cell: [col as u16, row as u16],
                    corners: plane.cell_corners(col, row, cols, rows),
                    normal: plane.normal,
                    color: [r, g, b],
                    material: *slot,
                });
            }
        }
    }

    if out.is_empty() {
        return None;
    }
    Some(Mesh {
        geometry: *geometry,
        faces: out,
        materials,
        double_sided,
    })
}
