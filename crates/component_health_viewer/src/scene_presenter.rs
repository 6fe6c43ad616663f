use std::collections::HashMap;

use bevy::color::Alpha;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;

use crate::camera_controls::{OrbitCamera, ViewerCamera};
use crate::catalog::Catalog;
use crate::viewer_config::ViewerConfig;
use crate::viewer_state::ViewerState;

/// Opacity forced onto every displayed mesh material. Fully opaque, so the
/// blend flag changes sorting but not the look of the model.
pub(super) const MODEL_OPACITY: f32 = 1.0;
const KEY_LIGHT_POSITION: Vec3 = Vec3::new(3.0, 3.0, 3.0);

/// Scene handles keyed by variant file path. A path is handed to the asset
/// server at most once; the server keeps the loaded asset alive through the
/// stored handle.
#[derive(Resource, Default)]
pub(super) struct ModelCache {
    scenes: HashMap<String, Handle<Scene>>,
}

impl ModelCache {
    pub(super) fn request<F>(&mut self, path: &str, load: F) -> Handle<Scene>
    where
        F: FnOnce(&str) -> Handle<Scene>,
    {
        if let Some(handle) = self.scenes.get(path) {
            return handle.clone();
        }
        let handle = load(path);
        self.scenes.insert(path.to_string(), handle.clone());
        handle
    }

    pub(super) fn contains(&self, path: &str) -> bool {
        self.scenes.contains_key(path)
    }

    pub(super) fn len(&self) -> usize {
        self.scenes.len()
    }
}

/// The model that should be on screen for the current selection.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub(super) struct ActiveModel {
    pub path: Option<String>,
    pub scene: Option<Handle<Scene>>,
}

/// Root of the scene instance currently attached to the world.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub(super) struct DisplayedModel {
    pub path: String,
}

/// Catalog paths are rooted at the served asset directory; the asset server
/// expects them relative.
pub(super) fn asset_server_path(path: &str) -> &str {
    path.trim_start_matches('/')
}

fn load_model_scene(asset_server: &AssetServer, path: &str) -> Handle<Scene> {
    asset_server.load(GltfAssetLabel::Scene(0).from_asset(asset_server_path(path).to_string()))
}

pub(super) fn setup_viewer_scene(mut commands: Commands, config: Res<ViewerConfig>) {
    let orbit = OrbitCamera::facing_origin(config.camera.distance);
    let mut transform = Transform::default();
    orbit.apply_to_transform(&mut transform);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera.fov_degrees.to_radians(),
            near: 0.01,
            far: 100.0,
            ..default()
        }),
        transform,
        ViewerCamera,
        orbit,
    ));

    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: config.lighting.ambient_brightness,
        affects_lightmapped_meshes: true,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: config.lighting.directional_illuminance,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(KEY_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

pub(super) fn preload_catalog_models(
    catalog: Res<Catalog>,
    asset_server: Res<AssetServer>,
    mut cache: ResMut<ModelCache>,
) {
    if catalog.is_empty() {
        warn!("component catalog is empty; nothing to preload");
        return;
    }
    for entry in catalog.entries() {
        cache.request(&entry.full_health_variant().file_path, |path| {
            load_model_scene(&asset_server, path)
        });
    }
    info!("preloading {} full-health models", cache.len());
}

pub(super) fn resolve_active_model(
    state: Res<ViewerState>,
    catalog: Res<Catalog>,
    asset_server: Res<AssetServer>,
    mut cache: ResMut<ModelCache>,
    mut active: ResMut<ActiveModel>,
) {
    let next_path = state
        .active_variant(&catalog)
        .map(|variant| variant.file_path.as_str());
    if active.path.as_deref() == next_path {
        return;
    }

    let Some(path) = next_path else {
        *active = ActiveModel::default();
        return;
    };
    let cached = cache.contains(path);
    let scene = cache.request(path, |path| load_model_scene(&asset_server, path));
    info!("showing model {} (cached: {})", path, cached);
    *active = ActiveModel {
        path: Some(path.to_string()),
        scene: Some(scene),
    };
}

/// Swaps the displayed scene root to match `ActiveModel`. A root whose scene
/// is still loading is despawned like any other; the cached handle keeps the
/// load going for later reuse.
pub(super) fn attach_active_model(
    mut commands: Commands,
    active: Res<ActiveModel>,
    displayed: Query<(Entity, &DisplayedModel)>,
) {
    let mut already_displayed = false;
    for (entity, model) in &displayed {
        if !already_displayed && active.path.as_deref() == Some(model.path.as_str()) {
            already_displayed = true;
            continue;
        }
        commands.entity(entity).despawn();
    }
    if already_displayed {
        return;
    }

    let (Some(path), Some(scene)) = (active.path.as_ref(), active.scene.as_ref()) else {
        return;
    };
    commands.spawn((
        SceneRoot(scene.clone()),
        Transform::default(),
        DisplayedModel { path: path.clone() },
    ));
}

pub(super) fn needs_opacity_override(material: &StandardMaterial, opacity: f32) -> bool {
    material.alpha_mode != AlphaMode::Blend
        || (material.base_color.alpha() - opacity).abs() > f32::EPSILON
}

pub(super) fn apply_opacity_override(material: &mut StandardMaterial, opacity: f32) {
    material.alpha_mode = AlphaMode::Blend;
    material.base_color.set_alpha(opacity);
}

/// Runs every frame over the displayed model only. Materials already in the
/// target state are left untouched so they are not re-uploaded.
pub(super) fn apply_model_opacity_override(
    displayed: Query<Entity, With<DisplayedModel>>,
    children: Query<&Children>,
    mesh_materials: Query<&MeshMaterial3d<StandardMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for root in &displayed {
        let mut pending = vec![root];
        while let Some(entity) = pending.pop() {
            if let Ok(node_children) = children.get(entity) {
                pending.extend(node_children.iter());
            }
            let Ok(material_handle) = mesh_materials.get(entity) else {
                continue;
            };
            let needs_override = materials
                .get(&material_handle.0)
                .map(|material| needs_opacity_override(material, MODEL_OPACITY))
                .unwrap_or(false);
            if !needs_override {
                continue;
            }
            if let Some(mut material) = materials.get_mut(&material_handle.0) {
                apply_opacity_override(&mut material, MODEL_OPACITY);
            }
        }
    }
}

#[cfg(test)]
#[path = "scene_presenter_tests.rs"]
mod tests;
