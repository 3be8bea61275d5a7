pub mod bih;
pub mod json;
pub mod materials;
pub mod mesh;
pub mod shapes;

pub use bih::{Bih, BoundingBox, Hit, Ray};
pub use materials::{MaterialHandle, MaterialRange};
pub use mesh::{Mesh, MeshError, Triangle};

use anyhow::Context;
use serde_json as js;
use std::{fs, path::Path};

/// Loads a mesh previously exported with [`Mesh::to_json`].
pub fn load_mesh<P: AsRef<Path>>(path: P) -> anyhow::Result<Mesh> {
    let path = path.as_ref();
    let file_contents = fs::read_to_string(path)
        .with_context(|| format!("Cannot read mesh file {}", path.display()))?;
    let mesh_json: js::Value = js::from_str(&file_contents)?;
    Mesh::from_json(&mesh_json).with_context(|| format!("Invalid mesh in {}", path.display()))
}

pub fn save_mesh<P: AsRef<Path>>(path: P, mesh: &Mesh) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file_contents = js::to_string_pretty(&mesh.to_json())?;
    fs::write(path, file_contents)
        .with_context(|| format!("Cannot write mesh file {}", path.display()))?;
    tracing::info!(
        "Saved mesh with {} vertices and {} triangles to {}",
        mesh.vertex_count(),
        mesh.triangle_count(),
        path.display()
    );
    Ok(())
}
