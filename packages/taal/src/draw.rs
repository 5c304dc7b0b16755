//! Drawing the world: grid, composition, greeting and texture.

use crate::{
    bol::Bol,
    camera::Camera,
    composition::Composition,
    palette::{
        self,
        BolColors,
    },
};
use graphics::{
    Renderer,
    frame_content::{
        Canvas2,
        GpuImage,
        FontId,
        LayedOutTextBlock,
        TextBlock,
        TextSpan,
        HAlign,
        VAlign,
    },
};
use std::collections::HashMap;
use vek::*;


pub const GRID_SLICES: i32 = 100;
pub const GRID_SPACING: f32 = 50.0;
pub const GRID_CENTER: Vec2<f32> = Vec2 { x: 0.0, y: 1250.0 };

pub const GREETING: &str = "Hello Raylib";
pub const GREETING_POS: Vec2<f32> = Vec2 { x: 200.0, y: 200.0 };
pub const TEXTURE_POS: Vec2<f32> = Vec2 { x: 400.0, y: 200.0 };
pub const FONT_SIZE: f32 = 20.0;

/// Corner roundness of bol cells, as a fraction of half the shorter side.
/// Values above 1 are treated as 1.
pub const BOL_ROUNDNESS: f32 = 4.0;
pub const BOL_OUTLINE_THICKNESS: f32 = 2.0;

/// Corner radius for a rectangle of the given size and roundness.
pub fn corner_radius(size: Extent2<f32>, roundness: f32) -> f32 {
    roundness.clamp(0.0, 1.0) * size.w.min(size.h) / 2.0
}

/// Text layed out once and re-drawn every frame.
///
/// Laid out in white, and tinted with a color modifier when drawn.
#[derive(Debug, Clone)]
pub struct SceneText {
    pub greeting: LayedOutTextBlock,
    pub labels: HashMap<Bol, LayedOutTextBlock>,
}

impl SceneText {
    pub fn lay_out(renderer: &Renderer, font: FontId) -> Self {
        let lay_out = |text: &str, h_align, v_align| renderer
            .lay_out_text(&TextBlock {
                spans: &[TextSpan {
                    text,
                    font,
                    font_size: FONT_SIZE,
                    color: Rgba::white(),
                }],
                h_align,
                v_align,
                wrap_width: None,
            });
        SceneText {
            greeting: lay_out(GREETING, HAlign::Left, VAlign::Top),
            labels: Bol::ALL
                .iter()
                .map(|&bol| (bol, lay_out(bol.as_str(), HAlign::Center, VAlign::Center)))
                .collect(),
        }
    }
}

/// Everything drawn in world space.
#[derive(Debug, Copy, Clone)]
pub struct Scene<'a> {
    pub camera: &'a Camera,
    pub composition: &'a Composition,
    pub texture: Option<&'a GpuImage>,
    pub text: Option<&'a SceneText>,
}

pub fn draw_scene(mut canvas: Canvas2, scene: &Scene) {
    let mut canvas = canvas.reborrow().modify(scene.camera.transform());

    draw_grid(canvas.reborrow(), GRID_SLICES, GRID_SPACING, GRID_CENTER);
    draw_composition(canvas.reborrow(), scene.composition, scene.text);

    if let Some(text) = scene.text {
        canvas.reborrow()
            .translate(GREETING_POS)
            .color(palette::greeting_color())
            .draw_text(&text.greeting);
    }
    if let Some(texture) = scene.texture {
        canvas.reborrow()
            .translate(TEXTURE_POS)
            .draw_image(texture, texture.size().map(|n| n as f32));
    }
}

/// Square grid of `slices` cells on each side, centered on `center`.
pub fn draw_grid(mut canvas: Canvas2, slices: i32, spacing: f32, center: Vec2<f32>) {
    let half = slices / 2;
    let extent = half as f32 * spacing;
    for i in -half..=half {
        let color =
            if i == 0 { palette::grid_axis_color() }
            else { palette::grid_line_color() };
        let along = i as f32 * spacing;
        let mut canvas = canvas.reborrow()
            .translate(center)
            .color(color);
        canvas.reborrow()
            .draw_line([along, -extent], [along, extent]);
        canvas.reborrow()
            .draw_line([-extent, along], [extent, along]);
    }
}

pub fn draw_composition(
    mut canvas: Canvas2,
    composition: &Composition,
    text: Option<&SceneText>,
) {
    for (i, cell) in composition.cells.iter().enumerate() {
        let rect = composition.world_rect(i);
        let size = rect.extent();
        let radius = corner_radius(size, BOL_ROUNDNESS);
        let colors = BolColors::get(composition.hovered == Some(i));

        let mut canvas = canvas.reborrow()
            .translate(rect.position());
        canvas.reborrow()
            .color(colors.background)
            .draw_rounded_rect(size, radius);
        canvas.reborrow()
            .color(colors.border)
            .draw_rounded_rect_outline(size, radius, BOL_OUTLINE_THICKNESS);
        if let Some(label) = text.and_then(|text| text.labels.get(&cell.bol)) {
            canvas.reborrow()
                .translate(Vec2::from(size) / 2.0)
                .color(colors.text)
                .draw_text(label);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutParams;
    use graphics::frame_content::{
        FrameContent,
        FrameItem,
        DrawObj2,
    };

    fn composition() -> Composition {
        let mut composition = Composition::tintal_theka(Vec2::new(200.0, 250.0));
        composition.layout(&LayoutParams::tintal()).unwrap();
        composition
    }

    #[test]
    fn roundness_is_clamped_to_half_the_shorter_side() {
        assert_eq!(corner_radius(Extent2::new(90.0, 40.0), BOL_ROUNDNESS), 20.0);
        assert_eq!(corner_radius(Extent2::new(90.0, 40.0), 0.5), 10.0);
        assert_eq!(corner_radius(Extent2::new(90.0, 40.0), -1.0), 0.0);
    }

    #[test]
    fn grid_draws_two_lines_per_slice() {
        let mut frame = FrameContent::new();
        draw_grid(frame.canvas(), 4, 50.0, Vec2::zero());
        assert_eq!(frame.num_draws(), 10);

        let lines = frame.0
            .iter()
            .filter_map(|(_, item)| match item {
                FrameItem::Draw2(DrawObj2::Line(line)) => Some(*line),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(lines[0].start, Vec2::new(-100.0, -100.0));
        assert_eq!(lines[0].end, Vec2::new(-100.0, 100.0));
        assert_eq!(lines[1].start, Vec2::new(-100.0, -100.0));
        assert_eq!(lines[1].end, Vec2::new(100.0, -100.0));
    }

    #[test]
    fn each_cell_is_filled_and_outlined() {
        let mut frame = FrameContent::new();
        draw_composition(frame.canvas(), &composition(), None);

        let rects = frame.0
            .iter()
            .filter_map(|(_, item)| match item {
                FrameItem::Draw2(DrawObj2::RoundedRect(rect)) => Some(*rect),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(rects.len(), 32);
        assert_eq!(rects[0].thickness, 0.0);
        assert_eq!(rects[1].thickness, BOL_OUTLINE_THICKNESS);
        assert!(rects.iter().all(|rect| rect.size == Extent2::new(90.0, 40.0)));
        assert!(rects.iter().all(|rect| rect.radius == 20.0));
    }

    #[test]
    fn hovered_cell_uses_hover_colors() {
        let mut composition = composition();
        composition.hovered = Some(3);

        let mut frame = FrameContent::new();
        draw_composition(frame.canvas(), &composition, None);
        let xml = frame.to_pseudo_xml();

        let hover = BolColors::hovered().background;
        let hover_tag = format!(
            "<color rgba=\"{:.2},{:.2},{:.2},{:.2}\">",
            hover.r, hover.g, hover.b, hover.a,
        );
        assert_eq!(xml.matches(&hover_tag).count(), 1);
    }

    #[test]
    fn scene_without_assets_draws_grid_and_composition() {
        let camera = Camera::default();
        let composition = composition();
        let mut frame = FrameContent::new();
        draw_scene(frame.canvas(), &Scene {
            camera: &camera,
            composition: &composition,
            texture: None,
            text: None,
        });
        assert_eq!(frame.num_draws(), 2 * 101 + 2 * 16);
    }
}
