use crate::{
    materials::{MaterialHandle, MaterialRange},
    Mesh,
};
use anyhow::{anyhow, Context};
use nalgebra_glm as glm;
use serde_json as js;

pub fn to_vec3(value: &js::Value) -> anyhow::Result<glm::Vec3> {
    let coords = to_floats(value, 3)?;
    Ok(glm::make_vec3(&coords))
}

pub fn to_vec2(value: &js::Value) -> anyhow::Result<glm::Vec2> {
    let coords = to_floats(value, 2)?;
    Ok(glm::make_vec2(&coords))
}

fn to_floats(value: &js::Value, len: usize) -> anyhow::Result<Vec<f32>> {
    let coords: Vec<f32> = value
        .as_array()
        .ok_or_else(|| anyhow!("Expected an array, got {}", value))?
        .iter()
        .map(|v| {
            v.as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| anyhow!("Expected a number, got {}", v))
        })
        .collect::<anyhow::Result<_>>()?;
    if coords.len() != len {
        return Err(anyhow!("Expected {} components, got {}", len, coords.len()));
    }
    Ok(coords)
}

fn array<'a>(object: &'a js::Value, key: &str) -> anyhow::Result<&'a Vec<js::Value>> {
    object[key]
        .as_array()
        .ok_or_else(|| anyhow!("Missing array '{}'", key))
}

fn to_u32(value: &js::Value) -> anyhow::Result<u32> {
    value
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| anyhow!("Expected an unsigned 32-bit integer, got {}", value))
}

impl Mesh {
    pub fn to_json(&self) -> js::Value {
        js::json!({
            "positions": self.positions.iter().map(|p| [p.x, p.y, p.z]).collect::<Vec<_>>(),
            "normals": self.normals.iter().map(|n| [n.x, n.y, n.z]).collect::<Vec<_>>(),
            "texcoords": self.texcoords.iter().map(|t| [t.x, t.y]).collect::<Vec<_>>(),
            "colours": self.colours,
            "indices": self.indices,
            "material_ranges": self
                .material_ranges
                .iter()
                .map(|r| [r.start, r.count])
                .collect::<Vec<_>>(),
            "materials": self.materials.iter().map(|m| m.0).collect::<Vec<_>>(),
        })
    }

    /// Reads a mesh written by [`Mesh::to_json`] and checks it is well formed.
    pub fn from_json(object: &js::Value) -> anyhow::Result<Self> {
        let positions = array(object, "positions")?
            .iter()
            .map(to_vec3)
            .collect::<anyhow::Result<_>>()
            .context("Invalid positions")?;
        let normals = array(object, "normals")?
            .iter()
            .map(to_vec3)
            .collect::<anyhow::Result<_>>()
            .context("Invalid normals")?;
        let texcoords = array(object, "texcoords")?
            .iter()
            .map(to_vec2)
            .collect::<anyhow::Result<_>>()
            .context("Invalid texcoords")?;
        let colours = array(object, "colours")?
            .iter()
            .map(to_u32)
            .collect::<anyhow::Result<_>>()
            .context("Invalid colours")?;
        let indices = array(object, "indices")?
            .iter()
            .map(to_u32)
            .collect::<anyhow::Result<_>>()
            .context("Invalid indices")?;
        let material_ranges = array(object, "material_ranges")?
            .iter()
            .map(|r| {
                let pair = r
                    .as_array()
                    .filter(|p| p.len() == 2)
                    .ok_or_else(|| anyhow!("Expected a [start, count] pair, got {}", r))?;
                Ok(MaterialRange::new(to_u32(&pair[0])?, to_u32(&pair[1])?))
            })
            .collect::<anyhow::Result<_>>()
            .context("Invalid material ranges")?;
        let materials = array(object, "materials")?
            .iter()
            .map(|m| to_u32(m).map(MaterialHandle))
            .collect::<anyhow::Result<_>>()
            .context("Invalid materials")?;

        let mesh = Self {
            positions,
            normals,
            texcoords,
            colours,
            indices,
            material_ranges,
            materials,
        };
        mesh.validate()?;
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;

    #[test]
    fn spatial_mesh_survives_json() {
        let materials = shapes::SpatialMaterials {
            reflect: MaterialHandle(4),
            shadow: MaterialHandle(5),
            hole_punch: MaterialHandle(6),
        };
        let mesh = shapes::spatial_bi_quad(1.6, 0.9, materials);
        let text = mesh.to_json().to_string();
        let parsed = Mesh::from_json(&js::from_str(&text).unwrap()).unwrap();
        assert_eq!(parsed, mesh);
    }

    #[test]
    fn rejects_out_of_range_index() {
        let mut value = shapes::quad(1.0, 1.0, MaterialHandle(0)).to_json();
        value["indices"] = js::json!([0, 1, 9]);
        value["material_ranges"] = js::json!([[0, 3]]);
        let err = Mesh::from_json(&value).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn rejects_malformed_vectors() {
        let mut value = shapes::quad(1.0, 1.0, MaterialHandle(0)).to_json();
        value["normals"][2] = js::json!([0.0, 1.0]);
        assert!(Mesh::from_json(&value).is_err());

        let value = js::json!({ "positions": [] });
        assert!(Mesh::from_json(&value).is_err());
    }

    #[test]
    fn vec_helpers() {
        assert_eq!(
            to_vec3(&js::json!([1.0, 2.5, -3.0])).unwrap(),
            glm::vec3(1.0, 2.5, -3.0)
        );
        assert_eq!(to_vec2(&js::json!([0.5, 1])).unwrap(), glm::vec2(0.5, 1.0));
        assert!(to_vec2(&js::json!(["a", 1])).is_err());
    }
}
