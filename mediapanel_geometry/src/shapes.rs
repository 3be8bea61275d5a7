use crate::{
    materials::{MaterialHandle, MaterialRange, OPAQUE_WHITE},
    Mesh,
};
use nalgebra_glm as glm;
use std::f64::consts::PI;

const QUAD_TEXCOORDS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Inside-out UV sphere. Segment counts below 1 are clamped to 1; indices are
/// `u32`, so `(latitudes + 1) * (longitudes + 1)` must fit in one.
pub fn sphere(radius: f32, longitudes: u32, latitudes: u32, material: MaterialHandle) -> Mesh {
    if longitudes == 0 || latitudes == 0 {
        tracing::warn!(
            "Clamping sphere segments {}x{} to at least 1x1",
            longitudes,
            latitudes
        );
    }
    let longitudes = longitudes.max(1);
    let latitudes = latitudes.max(1);

    let vertex_count = (latitudes as usize + 1) * (longitudes as usize + 1);
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut texcoords = Vec::with_capacity(vertex_count);

    for lat in 0..=latitudes {
        let theta = lat as f64 * PI / latitudes as f64;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for lon in 0..=longitudes {
            let phi = lon as f64 * 2.0 * PI / longitudes as f64;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let direction = glm::vec3(
                -(cos_phi * sin_theta) as f32,
                -cos_theta as f32,
                -(sin_phi * sin_theta) as f32,
            );
            normals.push(direction);
            positions.push(direction * radius);
            texcoords.push(glm::vec2(
                1.0 - lon as f32 / longitudes as f32,
                1.0 - lat as f32 / latitudes as f32,
            ));
        }
    }

    let mut indices = Vec::with_capacity(latitudes as usize * longitudes as usize * 6);
    for lat in 0..latitudes {
        for lon in 0..longitudes {
            let first = lat * (longitudes + 1) + lon;
            let second = first + longitudes + 1;
            indices.extend_from_slice(&[first, second, first + 1, second, second + 1, first + 1]);
        }
    }

    tracing::debug!(
        "Generated sphere r={} with {} vertices and {} indices",
        radius,
        positions.len(),
        indices.len()
    );
    Mesh::with_single_material(positions, normals, texcoords, indices, material)
}

pub fn cubemap(size: f32, material: MaterialHandle) -> Mesh {
    let s = size / 2.0;
    // Front, back, left, right, top, bottom.
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        ([[-s, -s, s], [s, -s, s], [s, s, s], [-s, s, s]], [0.0, 0.0, -1.0]),
        ([[s, -s, -s], [-s, -s, -s], [-s, s, -s], [s, s, -s]], [0.0, 0.0, 1.0]),
        ([[-s, -s, -s], [-s, -s, s], [-s, s, s], [-s, s, -s]], [1.0, 0.0, 0.0]),
        ([[s, -s, s], [s, -s, -s], [s, s, -s], [s, s, s]], [-1.0, 0.0, 0.0]),
        ([[-s, s, s], [s, s, s], [s, s, -s], [-s, s, -s]], [0.0, -1.0, 0.0]),
        ([[-s, -s, -s], [s, -s, -s], [s, -s, s], [-s, -s, s]], [0.0, 1.0, 0.0]),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut texcoords = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (face, (corners, normal)) in faces.iter().enumerate() {
        let base = 4 * face as u32;
        positions.extend(corners.iter().map(|c| glm::make_vec3(c)));
        normals.extend([glm::make_vec3(normal); 4]);
        texcoords.extend(QUAD_TEXCOORDS.iter().map(|uv| glm::make_vec2(uv)));
        indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    Mesh::with_single_material(positions, normals, texcoords, indices, material)
}

pub fn quad(width: f32, height: f32, material: MaterialHandle) -> Mesh {
    let w = width / 2.0;
    let h = height / 2.0;
    let positions = vec![
        glm::vec3(-w, -h, 0.0),
        glm::vec3(w, -h, 0.0),
        glm::vec3(w, h, 0.0),
        glm::vec3(-w, h, 0.0),
    ];
    let normals = vec![glm::vec3(0.0, 0.0, 1.0); 4];
    let texcoords = QUAD_TEXCOORDS.iter().map(|uv| glm::make_vec2(uv)).collect();

    Mesh::with_single_material(positions, normals, texcoords, QUAD_INDICES.to_vec(), material)
}

#[derive(Copy, Clone, Debug)]
pub struct SpatialMaterials {
    pub reflect: MaterialHandle,
    pub shadow: MaterialHandle,
    pub hole_punch: MaterialHandle,
}

const SPATIAL_HALF_DEPTH: f32 = 0.1;
const SPATIAL_ROUNDING: f32 = 0.075;

/// Indices `0..6` punch the front, `6..12` reflect, `12..18` shadow.
pub fn spatial_bi_quad(width: f32, height: f32, materials: SpatialMaterials) -> Mesh {
    let w = width / 2.0;
    let h = height / 2.0;
    let d = SPATIAL_HALF_DEPTH;

    let positions = vec![
        glm::vec3(-w, -h, 0.0),
        glm::vec3(w, -h, 0.0),
        glm::vec3(w, h, 0.0),
        glm::vec3(-w, h, 0.0),
        // shadow
        glm::vec3(-w, -h, d),
        glm::vec3(w, -h, d),
        glm::vec3(w, -h, -d),
        glm::vec3(-w, -h, -d),
    ];
    let normals = vec![glm::vec3(0.0, 0.0, 1.0); 8];

    let shadow_uv = glm::vec2(w - SPATIAL_ROUNDING, d - SPATIAL_ROUNDING);
    let mut texcoords: Vec<glm::Vec2> = QUAD_TEXCOORDS.iter().map(|uv| glm::make_vec2(uv)).collect();
    texcoords.extend([shadow_uv; 4]);

    let indices = vec![0, 1, 2, 0, 2, 3, 0, 2, 1, 0, 3, 2, 4, 6, 5, 4, 7, 6];

    Mesh {
        colours: vec![OPAQUE_WHITE; positions.len()],
        positions,
        normals,
        texcoords,
        indices,
        material_ranges: vec![
            MaterialRange::new(6, 6),
            MaterialRange::new(12, 6),
            MaterialRange::new(0, 6),
        ],
        materials: vec![materials.reflect, materials.shadow, materials.hole_punch],
    }
}
