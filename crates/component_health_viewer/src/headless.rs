use bevy::ecs::message::MessageWriter;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use crate::catalog::Catalog;

/// Loads nothing but the catalog, logs what every entry resolves to, and
/// exits. Used to validate catalog files without a window.
pub(super) fn run_headless(catalog: Catalog) {
    App::new()
        .insert_resource(catalog)
        .add_plugins((MinimalPlugins, LogPlugin::default()))
        .add_systems(Startup, report_catalog_and_exit)
        .run();
}

fn report_catalog_and_exit(catalog: Res<Catalog>, mut exit: MessageWriter<AppExit>) {
    for line in catalog_report_lines(&catalog) {
        info!("{}", line);
    }
    exit.write(AppExit::Success);
}

fn catalog_report_lines(catalog: &Catalog) -> Vec<String> {
    let mut lines = vec![format!("catalog: {} components", catalog.len())];
    for entry in catalog.entries() {
        lines.push(format!(
            "{} ({}) folder={} thumbnail={}",
            entry.key, entry.label, entry.folder_name, entry.thumbnail
        ));
        for variant in &entry.variants {
            lines.push(format!(
                "  health>={:<3} -> {}",
                variant_lower_bound(variant.health_threshold),
                variant.file_path
            ));
        }
    }
    lines
}

fn variant_lower_bound(health_threshold: u8) -> u8 {
    crate::catalog::HEALTH_THRESHOLDS
        .iter()
        .position(|threshold| *threshold == health_threshold)
        .map(crate::health::bucket_lower_bound)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_catalog_json;

    #[test]
    fn report_lists_each_variant_with_its_lower_bound() {
        let catalog = parse_catalog_json(
            r#"{"comp1": {"folder": "comp1", "thumbnail": "t.png", "label": "Comp One"}}"#,
        )
        .expect("catalog");

        let lines = catalog_report_lines(&catalog);

        assert_eq!(
            lines,
            vec![
                "catalog: 1 components".to_string(),
                "comp1 (Comp One) folder=comp1 thumbnail=t.png".to_string(),
                "  health>=90  -> /models/comp1/comp1_100.glb".to_string(),
                "  health>=60  -> /models/comp1/comp1_75.glb".to_string(),
                "  health>=40  -> /models/comp1/comp1_50.glb".to_string(),
                "  health>=10  -> /models/comp1/comp1_25.glb".to_string(),
                "  health>=0   -> /models/comp1/comp1_0.glb".to_string(),
            ]
        );
    }
}
