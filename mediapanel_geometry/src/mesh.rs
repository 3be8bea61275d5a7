use crate::{
    bih::BoundingBox,
    materials::{Colour, MaterialHandle, MaterialRange, OPAQUE_WHITE},
};
use itertools::Itertools;
use nalgebra_glm as glm;

#[derive(Clone, Debug)]
pub struct Triangle {
    pub positions: [glm::Vec3; 3],
    pub normals: [glm::Vec3; 3],
    pub texcoords: [glm::Vec2; 3],
    pub material: Option<MaterialHandle>,
}

/// `material_ranges[i]` is drawn with `materials[i]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<glm::Vec3>,
    pub normals: Vec<glm::Vec3>,
    pub texcoords: Vec<glm::Vec2>,
    pub colours: Vec<Colour>,
    pub indices: Vec<u32>,
    pub material_ranges: Vec<MaterialRange>,
    pub materials: Vec<MaterialHandle>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("Index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    #[error("Index {index} at position {position} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        position: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Vertex attribute '{attribute}' has {actual} entries, expected {expected}")]
    AttributeLength {
        attribute: &'static str,
        actual: usize,
        expected: usize,
    },

    #[error("{ranges} material ranges for {materials} materials")]
    MaterialCountMismatch { ranges: usize, materials: usize },

    #[error("Material range {start}..{end} exceeds {index_count} indices")]
    MaterialRangeOutOfBounds {
        start: u32,
        end: u32,
        index_count: usize,
    },
}

impl Mesh {
    pub fn with_single_material(
        positions: Vec<glm::Vec3>,
        normals: Vec<glm::Vec3>,
        texcoords: Vec<glm::Vec2>,
        indices: Vec<u32>,
        material: MaterialHandle,
    ) -> Self {
        let colours = vec![OPAQUE_WHITE; positions.len()];
        let material_ranges = vec![MaterialRange::new(0, indices.len() as u32)];
        Self {
            positions,
            normals,
            texcoords,
            colours,
            indices,
            material_ranges,
            materials: vec![material],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.positions.len();
        for (attribute, actual) in [
            ("normals", self.normals.len()),
            ("texcoords", self.texcoords.len()),
            ("colours", self.colours.len()),
        ] {
            if actual != vertex_count {
                return Err(MeshError::AttributeLength {
                    attribute,
                    actual,
                    expected: vertex_count,
                });
            }
        }

        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(self.indices.len()));
        }
        if let Some((position, &index)) = self
            .indices
            .iter()
            .find_position(|&&i| i as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfBounds {
                position,
                index,
                vertex_count,
            });
        }

        if self.material_ranges.len() != self.materials.len() {
            return Err(MeshError::MaterialCountMismatch {
                ranges: self.material_ranges.len(),
                materials: self.materials.len(),
            });
        }
        if let Some(range) = self
            .material_ranges
            .iter()
            .find(|r| r.end() as usize > self.indices.len())
        {
            return Err(MeshError::MaterialRangeOutOfBounds {
                start: range.start,
                end: range.end(),
                index_count: self.indices.len(),
            });
        }

        Ok(())
    }

    pub fn material_at(&self, index_position: u32) -> Option<MaterialHandle> {
        self.material_ranges
            .iter()
            .zip(self.materials.iter())
            .find(|(range, _)| range.contains(index_position))
            .map(|(_, &material)| material)
    }

    pub fn triangles(&self) -> Vec<Triangle> {
        self.indices
            .iter()
            .tuples::<(_, _, _)>()
            .enumerate()
            .map(|(t, (&a, &b, &c))| Triangle {
                positions: [
                    self.positions[a as usize],
                    self.positions[b as usize],
                    self.positions[c as usize],
                ],
                normals: [
                    self.normals[a as usize],
                    self.normals[b as usize],
                    self.normals[c as usize],
                ],
                texcoords: [
                    self.texcoords[a as usize],
                    self.texcoords[b as usize],
                    self.texcoords[c as usize],
                ],
                material: self.material_at(3 * t as u32),
            })
            .collect()
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::around(self.positions.iter().copied())
    }
}

impl Triangle {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::around(self.positions)
    }

    pub fn centroid(&self) -> glm::Vec3 {
        let [a, b, c] = self.positions;
        (a + b + c) / 3.0
    }
}
