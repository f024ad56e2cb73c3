//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Optional TOML file passed by the caller
//!
//! Only layout geometry is configurable; the tree and scheme model have no settings.

use std::path::Path;

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};

/// Geometry constants used by the layout engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    /// Width of every node box
    pub node_width: f64,
    /// Height of the header row (node type)
    pub node_header_height: f64,
    /// Height of the name row, only present on named nodes
    pub node_name_height: f64,
    /// Height of one field row; array fields take one row per element (at least one)
    pub node_field_height: f64,
    /// Gap between a node and the column of its children
    pub horizontal_spacing: f64,
    /// Gap between sibling subtrees
    pub vertical_spacing: f64,
    /// Extra gap around the children of every non-root node
    pub tier_spacing: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            node_width: 350.0,
            node_header_height: 30.0,
            node_name_height: 25.0,
            node_field_height: 25.0,
            horizontal_spacing: 50.0,
            vertical_spacing: 10.0,
            tier_spacing: 25.0,
        }
    }
}

/// Raw layout settings for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub node_width: Option<f64>,
    pub node_header_height: Option<f64>,
    pub node_name_height: Option<f64>,
    pub node_field_height: Option<f64>,
    pub horizontal_spacing: Option<f64>,
    pub vertical_spacing: Option<f64>,
    pub tier_spacing: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: RawLayoutSettings,
}

impl LayoutSettings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    pub fn merge(&self, overlay: &RawLayoutSettings) -> Self {
        Self {
            node_width: overlay.node_width.unwrap_or(self.node_width),
            node_header_height: overlay.node_header_height.unwrap_or(self.node_header_height),
            node_name_height: overlay.node_name_height.unwrap_or(self.node_name_height),
            node_field_height: overlay.node_field_height.unwrap_or(self.node_field_height),
            horizontal_spacing: overlay.horizontal_spacing.unwrap_or(self.horizontal_spacing),
            vertical_spacing: overlay.vertical_spacing.unwrap_or(self.vertical_spacing),
            tier_spacing: overlay.tier_spacing.unwrap_or(self.tier_spacing),
        }
    }

    /// All constants must be finite and non-negative, and nodes must have a width.
    pub fn validate(&self) -> ApplicationResult<()> {
        let values = [
            ("node_width", self.node_width),
            ("node_header_height", self.node_header_height),
            ("node_name_height", self.node_name_height),
            ("node_field_height", self.node_field_height),
            ("horizontal_spacing", self.horizontal_spacing),
            ("vertical_spacing", self.vertical_spacing),
            ("tier_spacing", self.tier_spacing),
        ];
        for (key, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(ApplicationError::Config {
                    message: format!("layout.{key} must be a non-negative number, got {value}"),
                });
            }
        }
        if self.node_width == 0.0 {
            return Err(ApplicationError::Config {
                message: "layout.node_width must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Unified configuration for treescheme.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Layout engine geometry
    pub layout: LayoutSettings,
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `path` - Optional TOML file; keys it does not set keep their compiled default
    pub fn load(path: Option<&Path>) -> ApplicationResult<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder();
        for (key, value) in [
            ("layout.node_width", defaults.layout.node_width),
            ("layout.node_header_height", defaults.layout.node_header_height),
            ("layout.node_name_height", defaults.layout.node_name_height),
            ("layout.node_field_height", defaults.layout.node_field_height),
            ("layout.horizontal_spacing", defaults.layout.horizontal_spacing),
            ("layout.vertical_spacing", defaults.layout.vertical_spacing),
            ("layout.tier_spacing", defaults.layout.tier_spacing),
        ] {
            builder = builder.set_default(key, value).map_err(config_err)?;
        }

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.layout.validate()?;
        tracing::debug!(?settings, "settings loaded");
        Ok(settings)
    }

    /// Parse in-memory TOML layered over the compiled defaults.
    pub fn from_toml_str(content: &str) -> ApplicationResult<Self> {
        let raw: RawSettings = toml::from_str(content).map_err(|e| ApplicationError::Config {
            message: format!("parse config: {e}"),
        })?;
        let settings = Self::default().merge_with(&raw);
        settings.layout.validate()?;
        Ok(settings)
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            layout: self.layout.merge(&overlay.layout),
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treescheme configuration
#
# Every key is optional; unset keys keep the compiled default.

[layout]
# node_width = 350.0
# node_header_height = 30.0
# node_name_height = 25.0
# node_field_height = 25.0
# horizontal_spacing = 50.0
# vertical_spacing = 10.0
# tier_spacing = 25.0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
