use bevy::prelude::Resource;

const DEFAULT_CAMERA_DISTANCE: f32 = 2.5;
const DEFAULT_CAMERA_FOV_DEG: f32 = 50.0;
const DEFAULT_CAMERA_MIN_DISTANCE: f32 = 0.5;
const DEFAULT_CAMERA_MAX_DISTANCE: f32 = 20.0;
const DEFAULT_AMBIENT_BRIGHTNESS: f32 = 600.0;
const DEFAULT_DIRECTIONAL_ILLUMINANCE: f32 = 8_000.0;
// One full turn every 30 seconds.
const DEFAULT_AUTO_ROTATE_SPEED: f32 = std::f32::consts::TAU / 30.0;
const DEFAULT_PANEL_WIDTH_PX: f32 = 320.0;
const DEFAULT_MENU_OPEN: bool = false;
const MIN_CAMERA_FOV_DEG: f32 = 10.0;
const MAX_CAMERA_FOV_DEG: f32 = 120.0;
const MIN_PANEL_WIDTH_PX: f32 = 200.0;
const MAX_PANEL_WIDTH_PX: f32 = 640.0;

#[derive(Clone, Copy, Debug, Resource)]
pub(super) struct ViewerConfig {
    pub camera: ViewerCameraConfig,
    pub lighting: ViewerLightingConfig,
    pub auto_rotate_speed: f32,
    pub panel_width_px: f32,
    pub menu_open_on_start: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            camera: ViewerCameraConfig::default(),
            lighting: ViewerLightingConfig::default(),
            auto_rotate_speed: DEFAULT_AUTO_ROTATE_SPEED,
            panel_width_px: DEFAULT_PANEL_WIDTH_PX,
            menu_open_on_start: DEFAULT_MENU_OPEN,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) struct ViewerCameraConfig {
    pub distance: f32,
    pub fov_degrees: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ViewerCameraConfig {
    fn default() -> Self {
        Self {
            distance: DEFAULT_CAMERA_DISTANCE,
            fov_degrees: DEFAULT_CAMERA_FOV_DEG,
            min_distance: DEFAULT_CAMERA_MIN_DISTANCE,
            max_distance: DEFAULT_CAMERA_MAX_DISTANCE,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) struct ViewerLightingConfig {
    pub ambient_brightness: f32,
    pub directional_illuminance: f32,
}

impl Default for ViewerLightingConfig {
    fn default() -> Self {
        Self {
            ambient_brightness: DEFAULT_AMBIENT_BRIGHTNESS,
            directional_illuminance: DEFAULT_DIRECTIONAL_ILLUMINANCE,
        }
    }
}

pub(super) fn resolve_viewer_config() -> ViewerConfig {
    load_viewer_config_from(|key| std::env::var(key).ok())
}

fn load_viewer_config_from<F>(lookup: F) -> ViewerConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ViewerConfig::default();
    if let Some(value) = parse_f32(&lookup, "COMPONENT_VIEWER_CAMERA_DISTANCE") {
        if value.is_finite() && value > 0.0 {
            config.camera.distance = value;
        }
    }
    if let Some(value) = parse_f32(&lookup, "COMPONENT_VIEWER_CAMERA_FOV_DEG") {
        if value.is_finite() && (MIN_CAMERA_FOV_DEG..=MAX_CAMERA_FOV_DEG).contains(&value) {
            config.camera.fov_degrees = value;
        }
    }
    if let Some(value) = parse_f32(&lookup, "COMPONENT_VIEWER_AMBIENT_BRIGHTNESS") {
        if value.is_finite() && value >= 0.0 {
            config.lighting.ambient_brightness = value;
        }
    }
    if let Some(value) = parse_f32(&lookup, "COMPONENT_VIEWER_DIRECTIONAL_ILLUMINANCE") {
        if value.is_finite() && value >= 0.0 {
            config.lighting.directional_illuminance = value;
        }
    }
    if let Some(value) = parse_f32(&lookup, "COMPONENT_VIEWER_AUTO_ROTATE_SPEED") {
        if value.is_finite() {
            config.auto_rotate_speed = value;
        }
    }
    if let Some(value) = parse_f32(&lookup, "COMPONENT_VIEWER_PANEL_WIDTH") {
        if value.is_finite() && (MIN_PANEL_WIDTH_PX..=MAX_PANEL_WIDTH_PX).contains(&value) {
            config.panel_width_px = value;
        }
    }
    if let Some(value) = parse_bool(&lookup, "COMPONENT_VIEWER_MENU_OPEN") {
        config.menu_open_on_start = value;
    }

    // Keep the starting distance inside the zoom range.
    config.camera.distance = config
        .camera
        .distance
        .clamp(config.camera.min_distance, config.camera.max_distance);
    config
}

fn parse_bool<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    })
}

fn parse_f32<F>(lookup: &F, key: &str) -> Option<f32>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| raw.trim().parse::<f32>().ok())
}
