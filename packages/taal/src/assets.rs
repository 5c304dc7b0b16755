//! Textures and fonts, loaded from the resources directory.

use crate::config::DemoConfig;
use graphics::{
    Renderer,
    frame_content::{
        GpuImage,
        FontId,
    },
};
use std::path::Path;
use anyhow::Result;


/// Loaded assets. A missing or broken asset is `None` and simply not drawn.
#[derive(Debug, Default)]
pub struct Assets {
    pub texture: Option<GpuImage>,
    pub font: Option<FontId>,
}

impl Assets {
    pub fn load(renderer: &mut Renderer, resources: &Path, config: &DemoConfig) -> Self {
        let texture_path = resources.join(&config.texture);
        let texture = ok_or_warn(
            "texture",
            &texture_path,
            renderer.load_image_file(&texture_path),
        );
        if let Some(texture) = texture.as_ref() {
            debug!(size = ?texture.size(), "loaded texture");
        }

        let font_path = resources.join(&config.font);
        let font = ok_or_warn(
            "font",
            &font_path,
            renderer.load_font_file(&font_path),
        );

        Assets {
            texture,
            font,
        }
    }
}

/// Log a failed load and discard the error.
pub fn ok_or_warn<T>(what: &str, path: &Path, result: Result<T>) -> Option<T> {
    match result {
        Ok(asset) => Some(asset),
        Err(e) => {
            warn!(path = %path.display(), "failed to load {}, it will not be drawn: {:#}", what, e);
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn failed_load_becomes_none() {
        let path = Path::new("resources/missing.png");
        assert_eq!(ok_or_warn("texture", path, Ok::<_, anyhow::Error>(3)), Some(3));
        assert_eq!(ok_or_warn::<u32>("texture", path, Err(anyhow!("no such file"))), None);
    }
}
