use std::collections::BTreeMap;

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiTextureHandle};

use crate::catalog::Catalog;
use crate::health::{MAX_HEALTH, MIN_HEALTH};
use crate::scene_presenter::asset_server_path;
use crate::viewer_config::ViewerConfig;
use crate::viewer_state::ViewerState;

pub(super) const PANEL_TITLE: &str = "Model Viewer";
pub(super) const BACK_LABEL: &str = "← Back";
pub(super) const DEGRADATION_HEADING: &str = "Degradation";
pub(super) const AUTO_ROTATE_LABEL: &str = "Auto-Rotate";
pub(super) const MENU_BUTTON_LABEL: &str = "☰ Menu";
const THUMBNAIL_SIZE: f32 = 200.0;
const MENU_BUTTON_MARGIN: f32 = 16.0;

/// Gallery thumbnails, loaded once at startup and keyed by catalog key.
#[derive(Resource, Default)]
pub(super) struct ThumbnailLibrary {
    images: BTreeMap<String, Handle<Image>>,
}

pub(super) fn load_thumbnails(
    catalog: Res<Catalog>,
    asset_server: Res<AssetServer>,
    mut library: ResMut<ThumbnailLibrary>,
) {
    for entry in catalog.entries() {
        let handle = asset_server.load(asset_server_path(&entry.thumbnail).to_string());
        library.images.insert(entry.key.clone(), handle);
    }
}

/// Thumbnails whose image is available, with their on-screen size. Entries
/// still loading (or that failed to load) are left out so the gallery falls
/// back to a label button for them.
fn loaded_thumbnails<'a>(
    library: &'a ThumbnailLibrary,
    images: &Assets<Image>,
) -> Vec<(&'a str, &'a Handle<Image>, egui::Vec2)> {
    library
        .images
        .iter()
        .filter_map(|(key, handle)| {
            let image = images.get(handle)?;
            Some((key.as_str(), handle, thumbnail_display_size(image.size())))
        })
        .collect()
}

/// Fits the image into a square of `THUMBNAIL_SIZE` keeping its aspect ratio.
fn thumbnail_display_size(image_size: UVec2) -> egui::Vec2 {
    let width = image_size.x.max(1) as f32;
    let height = image_size.y.max(1) as f32;
    let scale = THUMBNAIL_SIZE / width.max(height);
    egui::vec2(width * scale, height * scale)
}

pub(super) fn render_viewer_panel_egui(
    mut contexts: EguiContexts,
    catalog: Res<Catalog>,
    config: Res<ViewerConfig>,
    thumbnails: Res<ThumbnailLibrary>,
    images: Res<Assets<Image>>,
    mut state: ResMut<ViewerState>,
) {
    let textures: BTreeMap<&str, egui::load::SizedTexture> =
        loaded_thumbnails(&thumbnails, &images)
            .into_iter()
            .map(|(key, handle, size)| {
                let texture_id = contexts.add_image(EguiTextureHandle::Strong(handle.clone()));
                (key, egui::load::SizedTexture::new(texture_id, size))
            })
            .collect();

    let Ok(context) = contexts.ctx_mut() else {
        return;
    };

    // Work on a copy so the resource only reports a change on real edits.
    let mut next = state.clone();
    let mut panel_right = 0.0;
    if next.menu_open() {
        let panel = egui::SidePanel::left("component-viewer-panel")
            .resizable(false)
            .exact_width(config.panel_width_px)
            .show(context, |ui| {
                render_panel_contents(ui, &catalog, &mut next, |key| textures.get(key).copied());
            });
        panel_right = panel.response.rect.right();
    }

    let anchor = egui::pos2(panel_right + MENU_BUTTON_MARGIN, MENU_BUTTON_MARGIN);
    egui::Area::new(egui::Id::new("component-viewer-menu-toggle"))
        .fixed_pos(anchor)
        .order(egui::Order::Foreground)
        .show(context, |ui| render_menu_button(ui, &mut next));

    state.set_if_neq(next);
}

pub(super) fn render_menu_button(ui: &mut egui::Ui, state: &mut ViewerState) {
    if ui.button(MENU_BUTTON_LABEL).clicked() {
        let open = !state.menu_open();
        state.toggle_menu(open);
    }
}

pub(super) fn render_panel_contents<F>(
    ui: &mut egui::Ui,
    catalog: &Catalog,
    state: &mut ViewerState,
    thumbnail_for: F,
) where
    F: Fn(&str) -> Option<egui::load::SizedTexture>,
{
    ui.spacing_mut().item_spacing = egui::vec2(6.0, 8.0);
    ui.heading(PANEL_TITLE);
    ui.separator();

    if state.selected_component_key().is_none() {
        render_gallery(ui, catalog, state, thumbnail_for);
    } else {
        render_detail(ui, catalog, state);
    }
}

fn render_gallery<F>(ui: &mut egui::Ui, catalog: &Catalog, state: &mut ViewerState, thumbnail_for: F)
where
    F: Fn(&str) -> Option<egui::load::SizedTexture>,
{
    egui::ScrollArea::vertical().show(ui, |ui| {
        for entry in catalog.entries() {
            let clicked = ui
                .vertical_centered(|ui| match thumbnail_for(&entry.key) {
                    Some(texture) => {
                        let thumbnail =
                            egui::Image::from_texture(texture).sense(egui::Sense::click());
                        let clicked = ui.add(thumbnail).clicked();
                        ui.label(entry.label.as_str());
                        clicked
                    }
                    None => ui.button(entry.label.as_str()).clicked(),
                })
                .inner;
            if clicked {
                state.select_component(&entry.key);
            }
            ui.add_space(4.0);
        }
    });
}

fn render_detail(ui: &mut egui::Ui, catalog: &Catalog, state: &mut ViewerState) {
    if ui.button(BACK_LABEL).clicked() {
        state.deselect_component();
        return;
    }
    if let Some(entry) = state.selected_entry(catalog) {
        ui.label(egui::RichText::new(entry.label.as_str()).strong());
    }

    ui.add_space(8.0);
    ui.label(egui::RichText::new(DEGRADATION_HEADING).size(16.0).strong());
    let mut health = state.health_value();
    let slider = egui::Slider::new(&mut health, MIN_HEALTH..=MAX_HEALTH)
        .step_by(1.0)
        .show_value(false);
    if ui.add(slider).changed() {
        state.set_health(i32::from(health));
    }
    ui.label(health_readout(state.health_value()));

    let mut auto_rotate = state.auto_rotate();
    if ui.checkbox(&mut auto_rotate, AUTO_ROTATE_LABEL).changed() {
        state.toggle_auto_rotate(auto_rotate);
    }
}

pub(super) fn health_readout(health: u8) -> String {
    format!("Health: {}%", health)
}

#[cfg(test)]
#[path = "panel_tests.rs"]
mod tests;
