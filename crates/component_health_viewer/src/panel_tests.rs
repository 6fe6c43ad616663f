use super::*;
use bevy::asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use crate::catalog::parse_catalog_json;
use egui_kittest::{kittest::Queryable as _, Harness};

struct PanelHarnessState {
    catalog: Catalog,
    viewer: ViewerState,
}

impl PanelHarnessState {
    fn new() -> Self {
        Self {
            catalog: parse_catalog_json(
                r#"{
  "comp1": {"folder": "comp1", "thumbnail": "t.png", "label": "Comp One"},
  "comp2": {"folder": "comp2", "thumbnail": "u.png", "label": "Comp Two"}
}"#,
            )
            .expect("catalog"),
            viewer: ViewerState::with_menu_open(true),
        }
    }
}

fn panel_harness(state: PanelHarnessState) -> Harness<'static, PanelHarnessState> {
    Harness::new_ui_state(
        |ui, state: &mut PanelHarnessState| {
            render_panel_contents(ui, &state.catalog, &mut state.viewer, |_| None);
        },
        state,
    )
}

#[test]
fn health_readout_formats_percentage() {
    assert_eq!(health_readout(100), "Health: 100%");
    assert_eq!(health_readout(0), "Health: 0%");
}

#[test]
fn gallery_lists_every_catalog_entry() {
    let mut harness = panel_harness(PanelHarnessState::new());
    harness.fit_contents();

    harness.get_by_label(PANEL_TITLE);
    harness.get_by_label("Comp One");
    harness.get_by_label("Comp Two");
    assert!(harness.query_by_label(BACK_LABEL).is_none());
}

#[test]
fn clicking_gallery_entry_selects_component_at_full_health() {
    let mut state = PanelHarnessState::new();
    state.viewer.select_component("comp2");
    state.viewer.set_health(20);
    state.viewer.deselect_component();
    let mut harness = panel_harness(state);

    harness.get_by_label("Comp One").click();
    harness.run();

    assert_eq!(harness.state().viewer.selected_component_key(), Some("comp1"));
    assert_eq!(harness.state().viewer.health_value(), 100);
    harness.get_by_label(BACK_LABEL);
    harness.get_by_label_contains("Health: 100%");
}

#[test]
fn detail_mode_shows_current_health() {
    let mut state = PanelHarnessState::new();
    state.viewer.select_component("comp1");
    state.viewer.set_health(45);
    let mut harness = panel_harness(state);
    harness.fit_contents();

    harness.get_by_label(DEGRADATION_HEADING);
    harness.get_by_label_contains("Health: 45%");
    harness.get_by_label(AUTO_ROTATE_LABEL);
    assert!(harness.query_by_label("Comp Two").is_none());
}

#[test]
fn back_button_returns_to_gallery_and_keeps_health() {
    let mut state = PanelHarnessState::new();
    state.viewer.select_component("comp1");
    state.viewer.set_health(45);
    state.viewer.toggle_auto_rotate(true);
    let mut harness = panel_harness(state);

    harness.get_by_label(BACK_LABEL).click();
    harness.run();

    let viewer = &harness.state().viewer;
    assert_eq!(viewer.selected_component_key(), None);
    assert_eq!(viewer.health_value(), 45);
    assert!(viewer.auto_rotate());
    assert!(viewer.menu_open());
    harness.get_by_label("Comp Two");
}

#[test]
fn auto_rotate_checkbox_toggles_state() {
    let mut state = PanelHarnessState::new();
    state.viewer.select_component("comp1");
    let mut harness = panel_harness(state);

    harness.get_by_label(AUTO_ROTATE_LABEL).click();
    harness.run();
    assert!(harness.state().viewer.auto_rotate());

    harness.get_by_label(AUTO_ROTATE_LABEL).click();
    harness.run();
    assert!(!harness.state().viewer.auto_rotate());
    assert_eq!(harness.state().viewer.selected_component_key(), Some("comp1"));
}

#[test]
fn menu_button_toggles_only_menu_flag() {
    let mut viewer = ViewerState::default();
    viewer.select_component("comp1");
    viewer.set_health(61);
    let mut harness = Harness::new_ui_state(
        |ui, state: &mut ViewerState| render_menu_button(ui, state),
        viewer,
    );

    harness.get_by_label(MENU_BUTTON_LABEL).click();
    harness.run();
    assert!(harness.state().menu_open());
    assert_eq!(harness.state().selected_component_key(), Some("comp1"));
    assert_eq!(harness.state().health_value(), 61);

    harness.get_by_label(MENU_BUTTON_LABEL).click();
    harness.run();
    assert!(!harness.state().menu_open());
    assert_eq!(harness.state().health_value(), 61);
}

fn solid_image(width: u32, height: u32) -> Image {
    Image::new_fill(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[255, 255, 255, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

#[test]
fn thumbnail_size_keeps_aspect_ratio() {
    assert_eq!(thumbnail_display_size(UVec2::new(400, 400)), egui::vec2(200.0, 200.0));
    assert_eq!(thumbnail_display_size(UVec2::new(400, 200)), egui::vec2(200.0, 100.0));
    assert_eq!(thumbnail_display_size(UVec2::new(50, 100)), egui::vec2(100.0, 200.0));
    let degenerate = thumbnail_display_size(UVec2::ZERO);
    assert!(degenerate.x.is_finite() && degenerate.y.is_finite());
}

#[test]
fn only_loaded_thumbnails_reach_the_gallery() {
    let mut images = Assets::<Image>::default();
    let wide = images.add(solid_image(64, 32));
    let mut library = ThumbnailLibrary::default();
    library.images.insert("comp1".to_string(), wide.clone());
    library
        .images
        .insert("comp2".to_string(), Handle::<Image>::default());

    let loaded = loaded_thumbnails(&library, &images);

    assert_eq!(loaded.len(), 1);
    let (key, handle, size) = loaded[0];
    assert_eq!(key, "comp1");
    assert_eq!(handle, &wide);
    assert_eq!(size, egui::vec2(200.0, 100.0));
}
