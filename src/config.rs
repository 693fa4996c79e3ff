//! Configuration management for an export run.
//!
//! This module holds the formatting knobs of the renderer and the name filter applied before
//! building, plus loading them from a YAML or JSON file.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ExportError;

/// Pure formatting options; none of them changes what is exported, only how it is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Render container properties on the header line instead of one per line.
    pub inline_container_properties: bool,
    /// Render device properties on the header line instead of one per line.
    pub inline_device_properties: bool,
    /// Render endpoint properties on the endpoint line instead of one per line.
    pub inline_endpoint_properties: bool,
    /// Render a variable's links and annotations on the variable line.
    pub inline_variable_entries: bool,
    /// Emit endpoints that carry no properties.
    pub include_default_endpoints: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            inline_container_properties: false,
            inline_device_properties: false,
            inline_endpoint_properties: true,
            inline_variable_entries: false,
            include_default_endpoints: false,
        }
    }
}

/// A compiled record-name filter. The default filter matches every name.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    pattern: Option<Regex>,
}

impl NameFilter {
    /// Compiles `pattern`; an empty pattern matches everything.
    pub fn new(pattern: &str) -> Result<Self, ExportError> {
        if pattern.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self {
            pattern: Some(Regex::new(pattern)?),
        })
    }

    /// True if `name` passes the filter.
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.as_ref().is_none_or(|re| re.is_match(name))
    }
}

/// Everything a run needs besides its input: the filter and the render options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Regular expression applied to device, variable, link and annotation record names.
    pub filter: Option<String>,
    /// Formatting knobs.
    #[serde(flatten)]
    pub render: RenderOptions,
}

impl ExportConfig {
    /// Loads a configuration file; `.json` files are read as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let content = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&content)
                .map_err(|e| ExportError::Config(format!("{}: {}", path.display(), e)))
        } else {
            Ok(serde_yml::from_str(&content)?)
        }
    }

    /// Compiles the configured filter.
    pub fn name_filter(&self) -> Result<NameFilter, ExportError> {
        NameFilter::new(self.filter.as_deref().unwrap_or(""))
    }
}
