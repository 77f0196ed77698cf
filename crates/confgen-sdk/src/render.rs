//! Output rendering for generated configurations
//!
//! Pure serialization; the configuration itself is not altered by any
//! renderer.

use crate::error::Result;
use confgen_engine::GeneratedConfig;

/// Render as device CLI text
pub fn to_cli_text(config: &GeneratedConfig) -> String {
    config.to_text()
}

/// Render as pretty-printed JSON
pub fn to_json(config: &GeneratedConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// Render as YAML
pub fn to_yaml(config: &GeneratedConfig) -> Result<String> {
    Ok(serde_yaml::to_string(config)?)
}
