//! Layout Registry - Load composite ID layouts from JSON
//!
//! This module loads the ID layouts of every known resource type from
//! embedded JSON files and provides lookup functions for the rest of the crate.

use crate::error::{FormatError, IdTarget};
use crate::flex::id::{expand_resource_id, flatten_resource_id, resource_id_part_count};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded layout JSON files (compiled into the binary)
const LAYOUT_FILES: &[&str] = &[
    include_str!("../layouts/glue.json"),
    include_str!("../layouts/iot.json"),
    include_str!("../layouts/resiliencehub.json"),
];

/// ID layout of one resource type
#[derive(Debug, Clone, Deserialize)]
pub struct IdLayout {
    pub display_name: String,
    pub service: String,
    /// Attribute names, in the order they appear in the ID
    pub parts: Vec<String>,
    #[serde(default)]
    pub allow_empty_parts: bool,
    /// The last part holds one or more values
    #[serde(default)]
    pub variadic_last: bool,
}

impl IdLayout {
    /// Minimum number of values an ID carries
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Part count to validate against, given how many values were supplied
    fn expected_count(&self, found: usize) -> usize {
        if self.variadic_last {
            found.max(self.part_count())
        } else {
            self.part_count()
        }
    }

    /// Whether the ID joins several attributes
    ///
    /// Single-attribute IDs are used verbatim and may contain the separator.
    pub fn is_composite(&self) -> bool {
        self.parts.len() > 1
    }

    /// Build an ID from attribute values given in layout order
    pub fn compose<S: AsRef<str>>(&self, values: &[S]) -> Result<String, FormatError> {
        if self.is_composite() {
            let expected = self.expected_count(values.len());
            return flatten_resource_id(values, expected, self.allow_empty_parts);
        }

        match values {
            [value] => self.check_single(value.as_ref()).map(str::to_string),
            _ => Err(FormatError::PartCount {
                target: IdTarget::Parts,
                input: format!("{:?}", values.iter().map(AsRef::as_ref).collect::<Vec<&str>>()),
                expected: 1,
                found: values.len(),
                separator: None,
            }),
        }
    }

    /// Split an ID into attribute values in layout order
    pub fn decompose(&self, id: &str) -> Result<Vec<String>, FormatError> {
        if self.is_composite() {
            let expected = self.expected_count(resource_id_part_count(id));
            return expand_resource_id(id, expected, self.allow_empty_parts);
        }

        self.check_single(id).map(|id| vec![id.to_string()])
    }

    /// Split an ID into `(attribute name, value)` pairs
    ///
    /// A variadic last part yields one pair per value, all under its name.
    pub fn decompose_named(&self, id: &str) -> Result<Vec<(&str, String)>, FormatError> {
        let values = self.decompose(id)?;
        let last = self.parts.last().map(String::as_str).unwrap_or_default();
        Ok(self
            .parts
            .iter()
            .map(String::as_str)
            .chain(std::iter::repeat(last))
            .zip(values)
            .collect())
    }

    fn check_single<'a>(&self, value: &'a str) -> Result<&'a str, FormatError> {
        if value.is_empty() && !self.allow_empty_parts {
            return Err(FormatError::BlankParts {
                target: IdTarget::Id,
                input: value.to_string(),
                indexes: vec![0],
            });
        }
        Ok(value)
    }
}

/// Root structure of layouts/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub layouts: HashMap<String, IdLayout>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<LayoutConfig> = OnceLock::new();

/// Get the layout registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static LayoutConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = LayoutConfig {
            layouts: HashMap::new(),
        };

        for content in LAYOUT_FILES {
            let partial: LayoutConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded layout JSON: {}", e));
            final_config.layouts.extend(partial.layouts);
        }

        tracing::debug!("Loaded {} ID layouts", final_config.layouts.len());
        final_config
    })
}

/// Get a layout by resource key
pub fn get_layout(key: &str) -> Option<&'static IdLayout> {
    get_registry().layouts.get(key)
}

/// Get all layout keys, sorted
pub fn get_all_layout_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = get_registry()
        .layouts
        .keys()
        .map(|s| s.as_str())
        .collect();
    keys.sort_unstable();
    keys
}
