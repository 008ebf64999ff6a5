//! Command implementations
//!
//! Each command returns its result as a JSON value; [`render`] prints it in
//! the requested output format.

use crate::config::{Config, OutputFormat};
use crate::flex::{self, MapDelta};
use crate::layout;
use anyhow::{anyhow, Context, Result};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Join parts into a composite ID
///
/// `count` defaults to the number of parts given.
pub fn compose_id(parts: &[String], count: Option<usize>, allow_empty: bool) -> Result<Value> {
    let count = count.unwrap_or(parts.len());
    let id = flex::flatten_resource_id(parts, count, allow_empty)?;
    tracing::info!("Composed ID from {} parts", parts.len());
    Ok(json!({ "id": id }))
}

/// Split a composite ID into its parts
///
/// `count` defaults to the number of parts found.
pub fn decompose_id(id: &str, count: Option<usize>, allow_empty: bool) -> Result<Value> {
    let count = count.unwrap_or_else(|| flex::resource_id_part_count(id));
    let parts = flex::expand_resource_id(id, count, allow_empty)?;
    Ok(json!({ "parts": parts }))
}

/// Split an ID using a registered layout, naming each part
pub fn parse_id(layout_key: &str, id: &str) -> Result<Value> {
    let Some(id_layout) = layout::get_layout(layout_key) else {
        return Err(anyhow!("Unknown layout: {}", layout_key));
    };

    let named = id_layout
        .decompose_named(id)
        .with_context(|| format!("Failed to parse {} ID", id_layout.display_name))?;

    let parts: Vec<Value> = named
        .into_iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect();

    Ok(json!({
        "layout": layout_key,
        "display_name": id_layout.display_name,
        "parts": parts,
    }))
}

/// Describe every registered layout
pub fn list_layouts() -> Value {
    let layouts: Vec<Value> = layout::get_all_layout_keys()
        .into_iter()
        .filter_map(|key| layout::get_layout(key).map(|l| (key, l)))
        .map(|(key, l)| {
            json!({
                "key": key,
                "display_name": l.display_name,
                "service": l.service,
                "parts": l.parts,
                "allow_empty_parts": l.allow_empty_parts,
                "variadic_last": l.variadic_last,
            })
        })
        .collect();

    Value::Array(layouts)
}

/// Diff two attribute maps stored in JSON or YAML files
pub fn diff_files(old: &Path, new: &Path) -> Result<Value> {
    let old_map = read_map(old)?;
    let new_map = read_map(new)?;

    let delta = flex::diff_string_maps(&old_map, &new_map)
        .context("Attribute maps must contain only string values")?;

    Ok(delta_to_value(&delta))
}

/// Convert a delta into JSON with sorted keys
pub fn delta_to_value(delta: &MapDelta<String, String>) -> Value {
    let sorted = |m: &std::collections::HashMap<String, String>| -> BTreeMap<String, String> {
        m.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    };

    json!({
        "add": sorted(&delta.add),
        "remove": sorted(&delta.remove),
        "unchanged": sorted(&delta.unchanged),
    })
}

/// Read a JSON or YAML file (chosen by extension) holding a single map
pub fn read_map(path: &Path) -> Result<Map<String, Value>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let value: Value = if is_yaml {
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse YAML {:?}", path))?
    } else {
        serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON {:?}", path))?
    };

    match value {
        Value::Object(map) => Ok(map),
        // An empty YAML document means an empty map
        Value::Null => Ok(Map::new()),
        other => Err(anyhow!(
            "Expected a map in {:?}, found {}",
            path,
            crate::error::kind_of(&other)
        )),
    }
}

/// Show the configuration stored at `path`
pub fn show_config(path: &Path) -> Result<Value> {
    let config = Config::load_from(path);
    config_to_value(path, &config)
}

/// Update the configuration stored at `path`
///
/// Only the settings given are changed; the rest keep their stored value.
pub fn set_config(
    path: &Path,
    output: Option<OutputFormat>,
    allow_empty_parts: Option<bool>,
) -> Result<Value> {
    let mut config = Config::load_from(path);

    if output.is_some() {
        config.output = output;
    }
    if allow_empty_parts.is_some() {
        config.allow_empty_parts = allow_empty_parts;
    }

    config.save_to(path)?;
    tracing::info!("Saved config to {:?}", path);

    config_to_value(path, &config)
}

fn config_to_value(path: &Path, config: &Config) -> Result<Value> {
    let config = serde_json::to_value(config).context("Failed to serialize config")?;
    Ok(json!({
        "path": path.display().to_string(),
        "config": config,
    }))
}

/// Render a command result
pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to render JSON")
        }
        OutputFormat::Yaml => serde_yaml::to_string(value).context("Failed to render YAML"),
    }
}
