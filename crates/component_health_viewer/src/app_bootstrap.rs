use bevy::prelude::*;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};

use crate::camera_controls::{orbit_camera_controls, update_3d_viewport, OrbitDragState};
use crate::catalog::Catalog;
use crate::panel::{load_thumbnails, render_viewer_panel_egui, ThumbnailLibrary};
use crate::scene_presenter::{
    apply_model_opacity_override, attach_active_model, preload_catalog_models,
    resolve_active_model, setup_viewer_scene, ActiveModel, ModelCache,
};
use crate::viewer_config::ViewerConfig;
use crate::viewer_state::ViewerState;

pub(super) fn run_ui(catalog: Catalog, config: ViewerConfig) {
    App::new()
        .insert_resource(catalog)
        .insert_resource(config)
        .insert_resource(ViewerState::with_menu_open(config.menu_open_on_start))
        .insert_resource(ModelCache::default())
        .insert_resource(ActiveModel::default())
        .insert_resource(ThumbnailLibrary::default())
        .insert_resource(OrbitDragState::default())
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Component Health Viewer".to_string(),
                resolution: (1200, 800).into(),
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_systems(
            Startup,
            (setup_viewer_scene, preload_catalog_models, load_thumbnails),
        )
        .add_systems(
            Update,
            (
                resolve_active_model,
                attach_active_model.after(resolve_active_model),
                orbit_camera_controls,
                update_3d_viewport,
            ),
        )
        .add_systems(PostUpdate, apply_model_opacity_override)
        .add_systems(EguiPrimaryContextPass, render_viewer_panel_egui)
        .run();
}
