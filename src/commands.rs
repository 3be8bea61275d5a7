use crate::cli::LayoutArgs;
use anyhow::Context;
use mediapanel_geometry::{load_mesh, save_mesh, Bih, MaterialHandle, Mesh, Ray};
use mediapanel_layout::{menu_offset, select_layout, LayoutConfig, PanelLayout};
use mediapanel_playback::{compositor_shape, LoadControl, MediaSource, VideoShape};
use nalgebra_glm as glm;
use serde_json as js;
use std::{fs, path::Path};

fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    match path {
        Some(path) => Ok(LayoutConfig::load(path)?),
        None => Ok(LayoutConfig::default()),
    }
}

fn resolve(args: &LayoutArgs) -> anyhow::Result<(PanelLayout, Option<Mesh>, LayoutConfig)> {
    let config = load_config(args.config.as_deref())?;
    let layout = select_layout(&args.media, args.state, &config);
    let mesh = layout.mesh.generate(MaterialHandle(args.material));
    Ok((layout, mesh, config))
}

pub fn layout(args: &LayoutArgs, export: Option<&Path>) -> anyhow::Result<js::Value> {
    let (layout, mesh, config) = resolve(args)?;
    let menu = menu_offset(&args.media, &config);

    let mut report = js::json!({
        "media": args.media,
        "state": args.state,
        "layout": layout,
        "menu_offset": [menu.x, menu.y, menu.z],
    });
    if let Some(mesh) = &mesh {
        let bounds = mesh.bounds();
        report["mesh_stats"] = js::json!({
            "vertices": mesh.vertex_count(),
            "triangles": mesh.triangle_count(),
            "bounds": {
                "min": [bounds.min.x, bounds.min.y, bounds.min.z],
                "max": [bounds.max.x, bounds.max.y, bounds.max.z],
            },
        });
    }

    if let Some(path) = export {
        match &mesh {
            Some(mesh) => save_mesh(path, mesh)?,
            None => tracing::warn!(
                "{:?} is supplied by the runtime, nothing to export",
                layout.mesh
            ),
        }
    }
    Ok(report)
}

pub fn pick(
    args: &LayoutArgs,
    mesh_path: Option<&Path>,
    origin: glm::Vec3,
    direction: glm::Vec3,
) -> anyhow::Result<js::Value> {
    if glm::length(&direction) <= f32::EPSILON {
        anyhow::bail!("Ray direction must not be zero");
    }
    let mesh = match mesh_path {
        Some(path) => load_mesh(path)?,
        None => {
            let (layout, mesh, _) = resolve(args)?;
            mesh.with_context(|| format!("{:?} has no generated mesh to pick", layout.mesh))?
        }
    };

    let bih = Bih::new(&mesh);
    let ray = Ray::new(origin, glm::normalize(&direction));
    let hit = bih.intersect(&ray);
    tracing::debug!("Picking {:?} against {} triangles: {:?}", ray, bih.triangles.len(), hit);

    Ok(match hit {
        Some(hit) => js::json!({
            "hit": true,
            "distance": hit.distance,
            "triangle": hit.triangle_index,
            "position": [hit.position.x, hit.position.y, hit.position.z],
            "texcoord": [hit.texcoord.x, hit.texcoord.y],
            "material": hit.material.map(|m| m.0),
        }),
        None => js::json!({ "hit": false }),
    })
}

pub fn playback(source_path: &Path) -> anyhow::Result<js::Value> {
    let file_contents = fs::read_to_string(source_path)
        .with_context(|| format!("Cannot read media source {}", source_path.display()))?;
    let source: MediaSource = js::from_str(&file_contents)
        .with_context(|| format!("Invalid media source in {}", source_path.display()))?;

    let geometry = match source.video_shape {
        VideoShape::Ybvr => source.geometry.mesh_recipe(),
        _ => None,
    };
    Ok(js::json!({
        "drm_enabled": source.drm_enabled(),
        "dash": source.video_source.is_dash(),
        "load_control": LoadControl::for_source(&source.video_source),
        "compositor_shape": compositor_shape(&source),
        "geometry": geometry,
        "hero_lighting": source.supports_hero_lighting(),
    }))
}
