use std::fmt;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use bevy::prelude::Resource;
use indexmap::IndexMap;
use serde::Deserialize;

pub(super) const VARIANT_COUNT: usize = 5;
/// Health thresholds of the pre-baked variants, highest first.
pub(super) const HEALTH_THRESHOLDS: [u8; VARIANT_COUNT] = [100, 75, 50, 25, 0];
pub(super) const MODEL_EXTENSION: &str = "glb";
const MODEL_ROOT: &str = "/models";
#[cfg(not(target_arch = "wasm32"))]
const CATALOG_PATH_ENV: &str = "COMPONENT_VIEWER_CATALOG_PATH";
const EMBEDDED_CATALOG: &str = include_str!("../assets/components.json");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Read { path: String, reason: String },
    Parse { format: &'static str, reason: String },
    UnsupportedFormat { path: String },
    EmptyKey,
    MissingField { key: String, field: &'static str },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Read { path, reason } => {
                write!(f, "failed to read catalog {}: {}", path, reason)
            }
            CatalogError::Parse { format, reason } => {
                write!(f, "invalid {} catalog: {}", format, reason)
            }
            CatalogError::UnsupportedFormat { path } => {
                write!(f, "unsupported catalog format (expected .json or .toml): {}", path)
            }
            CatalogError::EmptyKey => write!(f, "catalog entry with empty key"),
            CatalogError::MissingField { key, field } => {
                write!(f, "catalog entry {} is missing `{}`", key, field)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Raw catalog entry as written in the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
struct ComponentConfig {
    #[serde(default)]
    folder: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct AssetVariant {
    pub health_threshold: u8,
    pub file_path: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct ComponentEntry {
    pub key: String,
    pub folder_name: String,
    pub thumbnail: String,
    pub label: String,
    pub variants: [AssetVariant; VARIANT_COUNT],
}

impl ComponentEntry {
    pub(super) fn full_health_variant(&self) -> &AssetVariant {
        &self.variants[0]
    }
}

/// Selectable components keyed by catalog key, in the order the
/// configuration lists them. Built once at startup.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub(super) struct Catalog {
    entries: IndexMap<String, ComponentEntry>,
}

impl Catalog {
    pub(super) fn get(&self, key: &str) -> Option<&ComponentEntry> {
        self.entries.get(key)
    }

    pub(super) fn entries(&self) -> impl Iterator<Item = &ComponentEntry> {
        self.entries.values()
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(super) fn variant_file_path(folder: &str, health_threshold: u8) -> String {
    format!(
        "{}/{}/{}_{}.{}",
        MODEL_ROOT, folder, folder, health_threshold, MODEL_EXTENSION
    )
}

fn asset_variants_for(folder: &str) -> [AssetVariant; VARIANT_COUNT] {
    HEALTH_THRESHOLDS.map(|health_threshold| AssetVariant {
        health_threshold,
        file_path: variant_file_path(folder, health_threshold),
    })
}

fn required_field(
    key: &str,
    field: &'static str,
    value: Option<String>,
) -> Result<String, CatalogError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CatalogError::MissingField {
            key: key.to_string(),
            field,
        })
}

fn build_catalog(configs: IndexMap<String, ComponentConfig>) -> Result<Catalog, CatalogError> {
    let mut entries = IndexMap::with_capacity(configs.len());
    for (key, config) in configs {
        if key.trim().is_empty() {
            return Err(CatalogError::EmptyKey);
        }
        let folder_name = required_field(&key, "folder", config.folder)?;
        let thumbnail = required_field(&key, "thumbnail", config.thumbnail)?;
        let label = required_field(&key, "label", config.label)?;
        let variants = asset_variants_for(&folder_name);
        entries.insert(
            key.clone(),
            ComponentEntry {
                key,
                folder_name,
                thumbnail,
                label,
                variants,
            },
        );
    }
    Ok(Catalog { entries })
}

pub(super) fn parse_catalog_json(content: &str) -> Result<Catalog, CatalogError> {
    let configs = serde_json::from_str::<IndexMap<String, ComponentConfig>>(content).map_err(
        |err| CatalogError::Parse {
            format: "json",
            reason: err.to_string(),
        },
    )?;
    build_catalog(configs)
}

#[cfg(not(target_arch = "wasm32"))]
pub(super) fn parse_catalog_toml(content: &str) -> Result<Catalog, CatalogError> {
    let configs = toml::from_str::<IndexMap<String, ComponentConfig>>(content).map_err(|err| {
        CatalogError::Parse {
            format: "toml",
            reason: err.to_string(),
        }
    })?;
    build_catalog(configs)
}

pub(super) fn embedded_catalog() -> Result<Catalog, CatalogError> {
    parse_catalog_json(EMBEDDED_CATALOG)
}

#[cfg(not(target_arch = "wasm32"))]
pub(super) fn load_catalog_file(path: &Path) -> Result<Catalog, CatalogError> {
    let display = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase());
    let content = std::fs::read_to_string(path).map_err(|err| CatalogError::Read {
        path: display.clone(),
        reason: err.to_string(),
    })?;
    match extension.as_deref() {
        Some("json") => parse_catalog_json(&content),
        Some("toml") => parse_catalog_toml(&content),
        _ => Err(CatalogError::UnsupportedFormat { path: display }),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub(super) fn resolve_catalog() -> Result<Catalog, CatalogError> {
    load_catalog_from(|key| std::env::var(key).ok())
}

#[cfg(target_arch = "wasm32")]
pub(super) fn resolve_catalog() -> Result<Catalog, CatalogError> {
    embedded_catalog()
}

#[cfg(not(target_arch = "wasm32"))]
fn load_catalog_from<F>(lookup: F) -> Result<Catalog, CatalogError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(CATALOG_PATH_ENV)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    {
        Some(path) => load_catalog_file(Path::new(&path)),
        None => embedded_catalog(),
    }
}
