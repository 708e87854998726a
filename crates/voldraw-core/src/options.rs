//! Configuration options for volume drawing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options shared by every volume's draw cache.
///
/// Builders read these values only from the options they are given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawOptions {
    /// Use the high precision normal layout (16-bit snorm instead of 10-bit).
    ///
    /// Set this when the scene asks for high quality normals, or when the
    /// device needs the precision workaround.
    pub hq_normals: bool,

    /// Value written to every element of the wireframe `wd` buffer.
    pub wire_data_fill: f32,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            hq_normals: false,
            wire_data_fill: 1.0,
        }
    }
}

impl DrawOptions {
    /// Parses options from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let options = Self::from_json_str(&text)?;
        log::debug!("loaded draw options from {}", path.as_ref().display());
        Ok(options)
    }

    /// Serializes the options as pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DrawOptions::default();
        assert!(!options.hq_normals);
        assert_eq!(options.wire_data_fill, 1.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = DrawOptions::from_json_str(r#"{ "hq_normals": true }"#).unwrap();
        assert!(options.hq_normals);
        assert_eq!(options.wire_data_fill, 1.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let options = DrawOptions {
            hq_normals: true,
            wire_data_fill: 0.5,
        };
        let json = options.to_json_string().unwrap();
        assert_eq!(DrawOptions::from_json_str(&json).unwrap(), options);
    }

    #[test]
    fn test_invalid_json() {
        assert!(DrawOptions::from_json_str("{ hq_normals").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = DrawOptions::load("/nonexistent/voldraw/options.json").unwrap_err();
        assert!(matches!(err, crate::VolumeError::IoError(_)));
    }
}
