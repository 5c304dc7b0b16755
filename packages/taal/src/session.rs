//! All state of a running demo, updated and drawn once per frame.

use crate::{
    assets::Assets,
    camera::Camera,
    composition::Composition,
    config::DemoConfig,
    draw::{
        Scene,
        SceneText,
        draw_scene,
    },
    input::FrameInput,
    overlay::{
        FpsCounter,
        OverlayInfo,
        draw_overlay,
    },
};
use graphics::{
    Renderer,
    frame_content::FrameContent,
};
use std::{
    path::Path,
    time::Instant,
};
use anyhow::*;
use vek::*;


#[derive(Debug)]
pub struct Session {
    pub camera: Camera,
    pub composition: Composition,
    pub assets: Assets,
    pub overlay_open: bool,
    scene_text: Option<SceneText>,
    fps: FpsCounter,
    cursor: Vec2<f32>,
    cursor_world: Vec2<f32>,
}

impl Session {
    /// Lay out the composition and take ownership of the assets.
    pub fn new(
        config: &DemoConfig,
        assets: Assets,
        scene_text: Option<SceneText>,
    ) -> Result<Self>
    {
        let mut composition = Composition::tintal_theka(config.composition_origin());
        composition.layout(&config.layout)
            .context("laying out composition")?;
        debug!(num_bols = composition.len(), "laid out composition");

        Ok(Session {
            camera: Camera::default(),
            composition,
            assets,
            overlay_open: true,
            scene_text,
            fps: FpsCounter::new(),
            cursor: Vec2::zero(),
            cursor_world: Vec2::zero(),
        })
    }

    /// Load assets through the renderer, then create the session.
    pub fn load(renderer: &mut Renderer, resources: &Path, config: &DemoConfig) -> Result<Self> {
        let assets = Assets::load(renderer, resources, config);
        let scene_text = assets.font
            .map(|font| SceneText::lay_out(renderer, font));
        Session::new(config, assets, scene_text)
    }

    /// Apply one frame of input.
    pub fn update(&mut self, input: &FrameInput, now: Instant) {
        self.fps.tick(now);
        if input.toggle_overlay {
            self.overlay_open = !self.overlay_open;
            debug!(open = self.overlay_open, "toggled overlay");
        }

        // hover is tested against where the cursor was before the camera
        // moved this frame
        self.cursor = input.cursor;
        self.cursor_world = self.camera.screen_to_world(input.cursor);
        self.camera.update(input.cursor, input.cursor_delta, input.wheel, input.panning);
        self.composition.update_hover(self.cursor_world);
    }

    pub fn overlay_info(&self) -> OverlayInfo {
        OverlayInfo {
            fps: self.fps.fps(),
            zoom: self.camera.zoom,
            target: self.camera.target,
            offset: self.camera.offset,
            cursor_screen: self.cursor,
            cursor_world: self.cursor_world,
            hovered: self.composition.hovered
                .zip(self.composition.hovered_bol()),
        }
    }

    /// Build this frame's display list.
    pub fn draw(&self, renderer: &Renderer) -> FrameContent {
        let mut frame = FrameContent::new();
        let mut canvas = frame.canvas();

        draw_scene(canvas.reborrow(), &Scene {
            camera: &self.camera,
            composition: &self.composition,
            texture: self.assets.texture.as_ref(),
            text: self.scene_text.as_ref(),
        });
        if self.overlay_open {
            draw_overlay(canvas.reborrow(), renderer, self.assets.font, &self.overlay_info());
        }

        frame
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bol::Bol,
        layout::LayoutParams,
    };

    fn session() -> Session {
        Session::new(&DemoConfig::default(), Assets::default(), None).unwrap()
    }

    fn input_at(cursor: Vec2<f32>) -> FrameInput {
        FrameInput {
            cursor,
            ..Default::default()
        }
    }

    #[test]
    fn invalid_layout_fails_session() {
        let config = DemoConfig {
            layout: LayoutParams {
                cycle_len: 12,
                ..LayoutParams::tintal()
            },
            ..Default::default()
        };
        assert!(Session::new(&config, Assets::default(), None).is_err());
    }

    #[test]
    fn hover_follows_cursor() {
        let mut session = session();
        session.update(&input_at(Vec2::new(250.0, 275.0)), Instant::now());
        assert_eq!(session.composition.hovered, Some(0));
        assert_eq!(session.overlay_info().hovered, Some((0, Bol::Dha)));

        session.update(&input_at(Vec2::new(10.0, 10.0)), Instant::now());
        assert_eq!(session.composition.hovered, None);
        assert_eq!(session.overlay_info().hovered, None);
    }

    #[test]
    fn hover_uses_cursor_world_before_zoom() {
        let mut session = session();
        session.camera.zoom = 2.0;
        let input = FrameInput {
            cursor: Vec2::new(500.0, 550.0),
            wheel: -1.0,
            ..Default::default()
        };
        session.update(&input, Instant::now());
        // world (250, 275) is cell 0, under the cursor at zoom 2
        assert_eq!(session.composition.hovered, Some(0));
        assert_eq!(session.camera.zoom, 1.6);
        assert_eq!(session.overlay_info().cursor_world, Vec2::new(250.0, 275.0));
    }

    #[test]
    fn overlay_toggles() {
        let mut session = session();
        assert!(session.overlay_open);
        let toggle = FrameInput {
            toggle_overlay: true,
            ..Default::default()
        };
        session.update(&toggle, Instant::now());
        assert!(!session.overlay_open);
        session.update(&FrameInput::default(), Instant::now());
        assert!(!session.overlay_open);
        session.update(&toggle, Instant::now());
        assert!(session.overlay_open);
    }

    #[test]
    fn wheel_scenario() {
        let mut session = session();
        let input = FrameInput {
            cursor: Vec2::new(400.0, 300.0),
            wheel: 1.0,
            ..Default::default()
        };
        session.update(&input, Instant::now());
        assert_eq!(session.camera.target, Vec2::new(400.0, 300.0));
        assert_eq!(session.camera.zoom, 1.25);
    }
}
