use bevy::prelude::Resource;

use crate::catalog::{AssetVariant, Catalog, ComponentEntry};
use crate::health::{clamp_health, select_variant, MAX_HEALTH};

/// Runtime selection state. Mutated only through the transitions below, each
/// of which touches exactly the fields it names.
#[derive(Resource, Clone, Debug, PartialEq, Eq)]
pub(super) struct ViewerState {
    selected_component_key: Option<String>,
    health_value: u8,
    auto_rotate: bool,
    menu_open: bool,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            selected_component_key: None,
            health_value: MAX_HEALTH,
            auto_rotate: false,
            menu_open: false,
        }
    }
}

impl ViewerState {
    pub(super) fn with_menu_open(menu_open: bool) -> Self {
        Self {
            menu_open,
            ..Self::default()
        }
    }

    pub(super) fn selected_component_key(&self) -> Option<&str> {
        self.selected_component_key.as_deref()
    }

    pub(super) fn health_value(&self) -> u8 {
        self.health_value
    }

    pub(super) fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub(super) fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub(super) fn select_component(&mut self, key: &str) {
        self.selected_component_key = Some(key.to_string());
        self.health_value = MAX_HEALTH;
    }

    pub(super) fn deselect_component(&mut self) {
        self.selected_component_key = None;
    }

    pub(super) fn set_health(&mut self, value: i32) {
        self.health_value = clamp_health(value);
    }

    pub(super) fn toggle_auto_rotate(&mut self, on: bool) {
        self.auto_rotate = on;
    }

    pub(super) fn toggle_menu(&mut self, open: bool) {
        self.menu_open = open;
    }

    pub(super) fn selected_entry<'a>(&self, catalog: &'a Catalog) -> Option<&'a ComponentEntry> {
        self.selected_component_key
            .as_deref()
            .and_then(|key| catalog.get(key))
    }

    pub(super) fn active_variant<'a>(&self, catalog: &'a Catalog) -> Option<&'a AssetVariant> {
        self.selected_entry(catalog)
            .map(|entry| select_variant(i32::from(self.health_value), &entry.variants))
    }
}
