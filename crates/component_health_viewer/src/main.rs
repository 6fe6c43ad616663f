mod app_bootstrap;
mod camera_controls;
mod catalog;
mod headless;
mod health;
mod panel;
mod scene_presenter;
mod viewer_config;
mod viewer_state;

use catalog::CatalogError;

const HEADLESS_ENV: &str = "COMPONENT_VIEWER_HEADLESS";

fn main() {
    let catalog = match catalog::resolve_catalog() {
        Ok(catalog) => catalog,
        Err(err) => exit_on_catalog_error(err),
    };

    if std::env::var(HEADLESS_ENV).is_ok() {
        headless::run_headless(catalog);
    } else {
        app_bootstrap::run_ui(catalog, viewer_config::resolve_viewer_config());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn exit_on_catalog_error(err: CatalogError) -> ! {
    eprintln!("component viewer: failed to load catalog: {err}");
    std::process::exit(1);
}

#[cfg(target_arch = "wasm32")]
fn exit_on_catalog_error(err: CatalogError) -> ! {
    panic!("component viewer: failed to load catalog: {err}");
}
