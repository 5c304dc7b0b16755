//! Demo configuration, with defaults overridable from a JSON file.

use crate::layout::LayoutParams;
use std::{
    fs,
    io,
    path::Path,
};
use serde::Deserialize;
use anyhow::*;
use vek::*;


/// Name of the optional configuration file in the resources directory.
pub const CONFIG_FILE_NAME: &str = "taal.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    /// Frame rate the loop paces itself to, or zero to not pace.
    pub target_fps: u32,
    /// Texture drawn next to the greeting, relative to the resources
    /// directory.
    pub texture: String,
    /// Font for all text, relative to the resources directory.
    pub font: String,
    pub layout: LayoutParams,
    /// World position of the composition.
    pub composition_origin: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
    pub resizable: bool,
    pub msaa: bool,
    pub vsync: bool,
    /// Draw at the display's scale factor rather than at 1.
    pub high_dpi: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            window: WindowConfig::default(),
            target_fps: 144,
            texture: "wabbit_alpha.png".to_owned(),
            font: "font.ttf".to_owned(),
            layout: LayoutParams::tintal(),
            composition_origin: [200.0, 250.0],
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "taal".to_owned(),
            width: 1280,
            height: 800,
            resizable: true,
            msaa: true,
            vsync: true,
            high_dpi: true,
        }
    }
}

impl DemoConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the config file, returning `None` if it does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        let json = match fs::read_to_string(path) {
            std::result::Result::Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context(format!("reading {}", path.display())),
        };
        DemoConfig::from_json(&json)
            .with_context(|| format!("parsing {}", path.display()))
            .map(Some)
    }

    /// Read the config file from the resources directory, falling back to
    /// defaults if it is absent or invalid.
    pub fn load(resources: &Path) -> Self {
        let path = resources.join(CONFIG_FILE_NAME);
        match DemoConfig::read(&path) {
            std::result::Result::Ok(Some(config)) => {
                info!(path = %path.display(), "loaded config");
                config
            }
            std::result::Result::Ok(None) => {
                debug!(path = %path.display(), "no config file, using defaults");
                DemoConfig::default()
            }
            Err(e) => {
                warn!("invalid config, using defaults: {:#}", e);
                DemoConfig::default()
            }
        }
    }

    pub fn composition_origin(&self) -> Vec2<f32> {
        Vec2::from(self.composition_origin)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(DemoConfig::from_json("{}").unwrap(), DemoConfig::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = DemoConfig::from_json(r#"{
            "target_fps": 60,
            "window": { "msaa": false },
            "layout": { "row_len": 4 }
        }"#).unwrap();
        assert_eq!(config.target_fps, 60);
        assert!(!config.window.msaa);
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.layout.row_len, 4);
        assert_eq!(config.layout.cycle_len, 16);
        assert_eq!(config.composition_origin(), Vec2::new(200.0, 250.0));
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(DemoConfig::from_json(r#"{ "target_fps": "fast" }"#).is_err());
    }

    #[test]
    fn missing_file_is_none() {
        let path = Path::new("definitely/not/a/real/dir").join(CONFIG_FILE_NAME);
        assert!(DemoConfig::read(&path).unwrap().is_none());
    }
}
