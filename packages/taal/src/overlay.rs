//! Debug overlay, drawn in screen space over the scene.

use crate::{
    bol::Bol,
    palette,
};
use graphics::{
    Renderer,
    frame_content::{
        Canvas2,
        FontId,
        TextBlock,
        TextSpan,
        HAlign,
        VAlign,
    },
};
use std::{
    collections::VecDeque,
    time::{
        Duration,
        Instant,
    },
};
use vek::*;


const PANEL_POS: Vec2<f32> = Vec2 { x: 10.0, y: 10.0 };
const PANEL_WIDTH: f32 = 320.0;
const PANEL_PADDING: f32 = 8.0;
const PANEL_RADIUS: f32 = 6.0;
const FONT_SIZE: f32 = 16.0;
const LINE_HEIGHT: f32 = 20.0;

/// Window over which the frame rate is averaged.
const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Counts frames presented in the last second.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: VecDeque<Instant>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Default::default()
    }

    /// Record a frame at `now`.
    pub fn tick(&mut self, now: Instant) {
        self.frames.push_back(now);
        while self.frames
            .front()
            .map(|&first| now.duration_since(first) > FPS_WINDOW)
            .unwrap_or(false)
        {
            self.frames.pop_front();
        }
    }

    /// Frames per second over the last window.
    pub fn fps(&self) -> f32 {
        match (self.frames.front(), self.frames.back()) {
            (Some(&first), Some(&last)) if self.frames.len() > 1 => {
                let elapsed = last.duration_since(first).as_secs_f32();
                if elapsed > 0.0 {
                    (self.frames.len() - 1) as f32 / elapsed
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }
}

/// What the overlay reports.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OverlayInfo {
    pub fps: f32,
    pub zoom: f32,
    pub target: Vec2<f32>,
    pub offset: Vec2<f32>,
    pub cursor_screen: Vec2<f32>,
    pub cursor_world: Vec2<f32>,
    pub hovered: Option<(usize, Bol)>,
}

impl OverlayInfo {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("{:.0} fps", self.fps),
            format!("zoom {:.3}", self.zoom),
            format!("target {:.1}, {:.1}", self.target.x, self.target.y),
            format!("offset {:.1}, {:.1}", self.offset.x, self.offset.y),
            format!("cursor {:.1}, {:.1}", self.cursor_screen.x, self.cursor_screen.y),
            format!("world {:.1}, {:.1}", self.cursor_world.x, self.cursor_world.y),
            match self.hovered {
                Some((i, bol)) => format!("hovered #{} {}", i, bol),
                None => "hovered none".to_owned(),
            },
        ]
    }
}

/// Size of the panel holding the given number of lines.
pub fn panel_size(num_lines: usize) -> Extent2<f32> {
    Extent2::new(
        PANEL_WIDTH,
        num_lines as f32 * LINE_HEIGHT + 2.0 * PANEL_PADDING,
    )
}

pub fn draw_overlay(
    mut canvas: Canvas2,
    renderer: &Renderer,
    font: Option<FontId>,
    info: &OverlayInfo,
) {
    let lines = info.lines();
    let mut canvas = canvas.reborrow()
        .translate(PANEL_POS);
    canvas.reborrow()
        .color(palette::overlay_background_color())
        .draw_rounded_rect(panel_size(lines.len()), PANEL_RADIUS);

    if let Some(font) = font {
        let text = lines.join("\n");
        let layed_out = renderer.lay_out_text(&TextBlock {
            spans: &[TextSpan {
                text: &text,
                font,
                font_size: FONT_SIZE,
                color: palette::overlay_text_color(),
            }],
            h_align: HAlign::Left,
            v_align: VAlign::Top,
            wrap_width: Some(PANEL_WIDTH - 2.0 * PANEL_PADDING),
        });
        canvas.reborrow()
            .translate([PANEL_PADDING, PANEL_PADDING])
            .draw_text(&layed_out);
    }
}
