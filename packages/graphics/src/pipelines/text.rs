//! Pipeline for drawing text, backed by a glyph_brush glyph cache.

use crate::{
    vertex::{
        VertexStruct,
        vertex_struct,
    },
    shader::load_shader,
    pipelines::{
        color_targets,
        multisample,
        texture_bind_group_layout,
        texture_bind_group,
    },
};
use std::sync::Arc;
use glyph_brush::{
    self as gb,
    ab_glyph::FontArc,
    GlyphBrush,
    GlyphBrushBuilder,
    GlyphPositioner,
};
use wgpu::{
    *,
    util::{
        DeviceExt,
        BufferInitDescriptor,
    },
};
use vek::*;
use anyhow::*;
use tracing::*;


// ==== text block ====


/// Block of text with specification of how to display it.
#[derive(Debug, Copy, Clone)]
pub struct TextBlock<'a> {
    /// The spans of text to flow together.
    pub spans: &'a [TextSpan<'a>],
    /// Where the block sits horizontally relative to the origin.
    pub h_align: HAlign,
    /// Where the block sits vertically relative to the origin.
    pub v_align: VAlign,
    pub wrap_width: Option<f32>,
}

/// Specification of text horizontal align behavior.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Specification of text vertical align behavior.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Index for a font loaded into a `Renderer`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FontId(pub usize);

/// Span of text with specification of how to display it.
#[derive(Debug, Copy, Clone)]
pub struct TextSpan<'a> {
    /// The actual string of text.
    pub text: &'a str,
    /// Which font to use.
    pub font: FontId,
    /// Text height in pixels.
    pub font_size: f32,
    /// Text color.
    pub color: Rgba<f32>,
}


// ==== layed out text block ====

impl<'a> TextBlock<'a> {
    /// Produce a corresponding glyph_brush `Layout`.
    fn to_layout(&self) -> gb::Layout<gb::BuiltInLineBreaker> {
        let gb_h_align = match self.h_align {
            HAlign::Left => gb::HorizontalAlign::Left,
            HAlign::Center => gb::HorizontalAlign::Center,
            HAlign::Right => gb::HorizontalAlign::Right,
        };
        let gb_v_align = match self.v_align {
            VAlign::Top => gb::VerticalAlign::Top,
            VAlign::Center => gb::VerticalAlign::Center,
            VAlign::Bottom => gb::VerticalAlign::Bottom,
        };
        if self.wrap_width.is_some() {
            gb::Layout::Wrap {
                line_breaker: gb::BuiltInLineBreaker::UnicodeLineBreaker,
                h_align: gb_h_align,
                v_align: gb_v_align,
            }
        } else {
            gb::Layout::SingleLine {
                line_breaker: gb::BuiltInLineBreaker::UnicodeLineBreaker,
                h_align: gb_h_align,
                v_align: gb_v_align,
            }
        }
    }

    /// Produce a corresponding glyph_brush `SectionGeometry`.
    fn to_section_geometry(&self) -> gb::SectionGeometry {
        gb::SectionGeometry {
            screen_position: (0.0, 0.0),
            bounds: (
                self.wrap_width.unwrap_or(f32::INFINITY),
                f32::INFINITY,
            ),
        }
    }

    /// View as a slice of glyph_brush `ToSectionText` impls.
    fn as_sections(&self) -> &[impl gb::ToSectionText + 'a] {
        self.spans
    }
}

impl<'a> gb::ToSectionText for TextSpan<'a> {
    fn to_section_text(&self) -> gb::SectionText {
        gb::SectionText {
            text: self.text,
            scale: gb::ab_glyph::PxScale {
                x: self.font_size,
                y: self.font_size,
            },
            font_id: gb::FontId(self.font.0),
        }
    }
}

/// Block of text with a pre-computed plan for how to lay it out.
#[derive(Debug, Clone)]
pub struct LayedOutTextBlock(Arc<LayedOutTextBlockInner>);

#[derive(Debug, Clone)]
struct LayedOutTextBlockInner {
    glyphs: Vec<LayedOutGlyph>,
    bounds: gb::ab_glyph::Rect,
}

#[derive(Debug, Clone)]
struct LayedOutGlyph {
    section_glyph: gb::SectionGlyph,
    color: Rgba<u8>,
}

// ==== pipeline ====

pub struct TextPipeline {
    text_pipeline: RenderPipeline,
    glyph_brush: GlyphBrush<TextQuad, GlyphExtra>,
    fonts: Vec<FontArc>,
    glyph_cache_texture: Texture,
    glyph_cache_sampler: Sampler,
    glyph_cache_bind_group_layout: BindGroupLayout,
    glyph_cache_bind_group: BindGroup,
    text_vertex_state: Option<TextVertexState>,
}

struct TextVertexState {
    text_vertex_buffer: Buffer,
    text_vertex_buffer_len: usize,
    draw_text_call_ranges: Vec<Option<(usize, usize)>>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct GlyphExtra {
    color: Rgba<u8>,
    draw_text_call_index: usize,
}

#[derive(Debug, Clone)]
struct TextQuad {
    src: (Vec2<f32>, Extent2<f32>),
    dst: (Vec2<f32>, Extent2<f32>),
    color: Rgba<u8>,
    draw_text_call_index: usize,
}

#[derive(Debug, Copy, Clone)]
struct TextVertex {
    pos: Vec2<f32>,
    tex: Vec2<f32>,
    color: Rgba<u8>,
}

vertex_struct!(TextVertex {
    (pos:   Vec2<f32>) (@location(0) vec2),
    (tex:   Vec2<f32>) (@location(1) vec2),
    (color: Rgba<u8> ) (@location(2) vec4),
});

pub struct PreRenderer<'a> {
    pipeline: &'a mut TextPipeline,
    next_draw_text_call_index: usize,
}

#[derive(Debug, Copy, Clone)]
pub struct PreppedDrawText(usize);


impl TextPipeline {
    pub(crate) fn new(
        device: &Device,
        format: TextureFormat,
        sample_count: u32,
        modifier_uniform_bind_group_layout: &BindGroupLayout,
    ) -> Self
    {
        let text_module = device
            .create_shader_module(load_shader!("text.wgsl"));
        let glyph_cache_bind_group_layout = texture_bind_group_layout(
            device,
            "glyph cache bind group layout",
            true,
        );
        let text_pipeline_layout = device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some("text pipeline layout"),
                bind_group_layouts: &[
                    modifier_uniform_bind_group_layout,
                    &glyph_cache_bind_group_layout,
                ],
                push_constant_ranges: &[],
            });
        let text_pipeline = device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("text pipeline"),
                layout: Some(&text_pipeline_layout),
                vertex: VertexState {
                    module: &text_module,
                    entry_point: "vs_main",
                    buffers: &[
                        VertexBufferLayout {
                            array_stride: TextVertex::SIZE as u64,
                            step_mode: VertexStepMode::Vertex,
                            attributes: TextVertex::ATTRIBUTES,
                        },
                    ],
                },
                fragment: Some(FragmentState {
                    module: &text_module,
                    entry_point: "fs_main",
                    targets: &color_targets(format),
                }),
                primitive: PrimitiveState::default(),
                depth_stencil: None,
                multisample: multisample(sample_count),
                multiview: None,
            });
        let glyph_brush = GlyphBrushBuilder::using_fonts::<FontArc>(Vec::new())
            .build();
        let glyph_cache_sampler = device
            .create_sampler(&SamplerDescriptor {
                label: Some("glyph cache sampler"),
                mag_filter: FilterMode::Linear,
                min_filter: FilterMode::Linear,
                ..Default::default()
            });
        let (
            glyph_cache_texture,
            glyph_cache_bind_group,
        ) = finish_glyph_cache_creation(
            device,
            &glyph_cache_bind_group_layout,
            &glyph_cache_sampler,
            glyph_brush.texture_dimensions().into(),
        );

        TextPipeline {
            text_pipeline,
            glyph_brush,
            fonts: Vec::new(),
            glyph_cache_sampler,
            glyph_cache_texture,
            glyph_cache_bind_group_layout,
            glyph_cache_bind_group,
            text_vertex_state: None,
        }
    }

    pub(crate) fn begin_pre_render(&mut self) -> PreRenderer {
        PreRenderer {
            pipeline: self,
            next_draw_text_call_index: 0,
        }
    }
}

fn update_glyph_cache_texture(
    glyph_cache_texture: &Texture,
    queue: &Queue,
    rect: gb::Rectangle<u32>,
    unpadded_data: &[u8],
) {
    // pad rows up to the copy alignment
    let unpadded_bytes_per_row = rect.width();
    let padded_bytes_per_row =
        if unpadded_bytes_per_row % COPY_BYTES_PER_ROW_ALIGNMENT == 0 {
            unpadded_bytes_per_row
        } else {
            unpadded_bytes_per_row - (unpadded_bytes_per_row % COPY_BYTES_PER_ROW_ALIGNMENT) + COPY_BYTES_PER_ROW_ALIGNMENT
        };

    let num_rows = rect.height();

    let mut padded_data = Vec::with_capacity((padded_bytes_per_row * num_rows) as usize);
    for row in unpadded_data.chunks(unpadded_bytes_per_row.max(1) as usize) {
        padded_data.extend_from_slice(row);
        padded_data.resize(
            padded_data.len() + (padded_bytes_per_row - unpadded_bytes_per_row) as usize,
            0,
        );
    }

    queue
        .write_texture(
            ImageCopyTexture {
                texture: glyph_cache_texture,
                mip_level: 0,
                origin: Origin3d {
                    x: rect.min[0],
                    y: rect.min[1],
                    z: 0,
                },
                aspect: TextureAspect::All
            },
            &padded_data,
            ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded_bytes_per_row),
                rows_per_image: Some(num_rows),
            },
            Extent3d {
                width: rect.width(),
                height: rect.height(),
                depth_or_array_layers: 1,
            },
        );
}

/// Convert an `ab_glyph::Rect` to a (start, extent) tuple.
fn rect_to_src_extent(rect: gb::ab_glyph::Rect) -> (Vec2<f32>, Extent2<f32>) {
    (
        Vec2::new(rect.min.x, rect.min.y),
        Extent2::new(rect.max.x - rect.min.x, rect.max.y - rect.min.y),
    )
}

/// Expand each quad into two triangles.
fn quads_to_vertices(quads: &[TextQuad]) -> Vec<TextVertex> {
    quads
        .iter()
        .flat_map(|quad| [0, 2, 1, 0, 3, 2]
            .into_iter()
            .map(move |corner| {
                let (a, b) = [
                    (0.0, 0.0),
                    (1.0, 0.0),
                    (1.0, 1.0),
                    (0.0, 1.0),
                ][corner];
                TextVertex {
                    pos: quad.dst.0 + Vec2::new(quad.dst.1.w * a, quad.dst.1.h * b),
                    tex: quad.src.0 + Vec2::new(quad.src.1.w * a, quad.src.1.h * b),
                    color: quad.color,
                }
            }))
        .collect()
}

/// Map each draw text call index to its range of vertices, given quads
/// sorted by draw text call index.
fn draw_call_ranges(
    quads: &[TextQuad],
    num_draw_calls: usize,
) -> Vec<Option<(usize, usize)>>
{
    let mut ranges = Vec::with_capacity(num_draw_calls);
    let mut quad_idx = 0;
    for draw_idx in 0..num_draw_calls {
        let start = quad_idx * 6;
        while
            quad_idx < quads.len()
            && quads[quad_idx].draw_text_call_index == draw_idx
        {
            quad_idx += 1;
        }
        let end = quad_idx * 6;

        if end > start {
            ranges.push(Some((start, end)));
        } else {
            ranges.push(None);
        }
    }
    ranges
}

impl<'a> PreRenderer<'a> {
    pub(crate) fn pre_render(
        &mut self,
        text: &LayedOutTextBlock,
    ) -> PreppedDrawText
    {
        // identify this batch of glyphs
        let draw_text_call_index = self.next_draw_text_call_index;
        self.next_draw_text_call_index += 1;

        let section_glyphs = text.0
            .glyphs
            .iter()
            .map(|glyph| glyph.section_glyph.clone())
            .collect();
        let extra = text.0
            .glyphs
            .iter()
            .map(|glyph| GlyphExtra {
                draw_text_call_index,
                color: glyph.color,
            })
            .collect();

        self.pipeline
            .glyph_brush
            .queue_pre_positioned(
                section_glyphs,
                extra,
                text.0.bounds,
            );

        PreppedDrawText(draw_text_call_index)
    }

    /// Process the queued glyphs, updating the glyph cache texture and the
    /// text vertex buffer as necessary.
    pub(crate) fn finalize_pre_render(
        self,
        device: &Device,
        queue: &Queue,
    ) -> Result<()>
    {
        let pipeline = self.pipeline;
        let num_draw_calls = self.next_draw_text_call_index;

        // loop until glyph cache texture is large enough
        for attempt in 0.. {
            ensure!(attempt < 100, "glyph cache update loop not breaking");
            let result = pipeline.glyph_brush
                .process_queued(
                    |rect, unpadded_data| update_glyph_cache_texture(
                        &pipeline.glyph_cache_texture,
                        queue,
                        rect,
                        unpadded_data,
                    ),
                    |glyph_vertex| TextQuad {
                        src: rect_to_src_extent(glyph_vertex.tex_coords),
                        dst: rect_to_src_extent(glyph_vertex.pixel_coords),
                        color: glyph_vertex.extra.color,
                        draw_text_call_index: glyph_vertex.extra.draw_text_call_index,
                    },
                );
            match result {
                std::result::Result::Ok(gb::BrushAction::Draw(mut quads)) => {
                    quads.sort_by_key(|quad| quad.draw_text_call_index);

                    let vertices = quads_to_vertices(&quads);
                    let ranges = draw_call_ranges(&quads, num_draw_calls);

                    let mut vertex_bytes = Vec::new();
                    for vertex in &vertices {
                        vertex.write(&mut vertex_bytes);
                    }

                    let reusable = pipeline
                        .text_vertex_state
                        .as_mut()
                        .filter(|state| state.text_vertex_buffer_len >= vertex_bytes.len());
                    if let Some(state) = reusable {
                        queue.write_buffer(&state.text_vertex_buffer, 0, &vertex_bytes);
                        state.draw_text_call_ranges = ranges;
                    } else if !vertex_bytes.is_empty() {
                        let text_vertex_buffer = device
                            .create_buffer_init(&BufferInitDescriptor {
                                label: Some("text vertex buffer"),
                                contents: &vertex_bytes,
                                usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
                            });
                        pipeline.text_vertex_state = Some(TextVertexState {
                            text_vertex_buffer,
                            text_vertex_buffer_len: vertex_bytes.len(),
                            draw_text_call_ranges: ranges,
                        });
                    } else {
                        pipeline.text_vertex_state = None;
                    }

                    break;
                },
                // same glyphs as last frame, reuse existing vertex buffer
                std::result::Result::Ok(gb::BrushAction::ReDraw) => break,
                Err(gb::BrushError::TextureTooSmall {
                    suggested: (w, h),
                }) => {
                    trace!(w, h, "increasing glyph cache texture size");
                    pipeline.glyph_brush.resize_texture(w, h);
                    let (glyph_cache_texture, glyph_cache_bind_group) = finish_glyph_cache_creation(
                        device,
                        &pipeline.glyph_cache_bind_group_layout,
                        &pipeline.glyph_cache_sampler,
                        Extent2::new(w, h),
                    );
                    pipeline.glyph_cache_texture = glyph_cache_texture;
                    pipeline.glyph_cache_bind_group = glyph_cache_bind_group;
                },
            };
        }
        Ok(())
    }
}

impl TextPipeline {
    pub(crate) fn render<'a>(
        &'a self,
        text: PreppedDrawText,
        pass: &mut RenderPass<'a>,
    )
    {
        let state = match self.text_vertex_state.as_ref() {
            Some(state) => state,
            None => return,
        };
        let vertex_range = state
            .draw_text_call_ranges
            .get(text.0)
            .copied()
            .flatten();
        if let Some((start, end)) = vertex_range {
            pass.set_pipeline(&self.text_pipeline);
            pass.set_bind_group(1, &self.glyph_cache_bind_group, &[]);
            pass.set_vertex_buffer(0, state.text_vertex_buffer.slice(..));
            pass.draw(start as u32..end as u32, 0..1);
        }
    }

    pub(crate) fn load_font(&mut self, font: FontArc) -> FontId {
        let font_idx = self.glyph_brush.add_font(font.clone()).0;
        self.fonts.push(font);
        FontId(font_idx)
    }

    pub(crate) fn lay_out_text(&self, text: &TextBlock) -> LayedOutTextBlock {
        lay_out_text(&self.fonts, text)
    }
}

/// Lay out a text block with the given fonts, which are indexed by
/// `FontId`.
pub fn lay_out_text(fonts: &[FontArc], text: &TextBlock) -> LayedOutTextBlock {
    let layout = text.to_layout();
    let section_geometry = text.to_section_geometry();

    let section_glyphs = layout
        .calculate_glyphs(
            fonts,
            &section_geometry,
            text.as_sections(),
        );
    let bounds = layout.bounds_rect(&section_geometry);

    // re-associate the color data
    let glyphs = section_glyphs
        .into_iter()
        .map(|section_glyph| LayedOutGlyph {
            color: text
                .spans[section_glyph.section_index]
                .color
                .map(|n| (n.clamp(0.0, 1.0) * 255.0).round() as u8),
            section_glyph,
        })
        .collect();

    LayedOutTextBlock(Arc::new(LayedOutTextBlockInner {
        glyphs,
        bounds,
    }))
}

/// Create a glyph cache texture with the given size, then create a glyph cache
/// bind group using that texture and a pre-created sampler and layout.
///
/// This logic is shared between the initial construction of the glyph cache,
/// and the resizing of the glyph cache.
fn finish_glyph_cache_creation(
    device: &Device,
    glyph_cache_bind_group_layout: &BindGroupLayout,
    glyph_cache_sampler: &Sampler,
    size: Extent2<u32>,
) -> (Texture, BindGroup)
{
    let glyph_cache_texture = device
        .create_texture(&TextureDescriptor {
            label: Some("glyph cache texture"),
            size: Extent3d {
                width: size.w,
                height: size.h,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::R8Unorm,
            usage: TextureUsages::COPY_DST | TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
    let glyph_cache_texture_view = glyph_cache_texture
        .create_view(&TextureViewDescriptor {
            label: Some("glyph cache texture view"),
            ..Default::default()
        });
    let glyph_cache_bind_group = texture_bind_group(
        device,
        "glyph cache bind group",
        glyph_cache_bind_group_layout,
        &glyph_cache_texture_view,
        glyph_cache_sampler,
    );
    (glyph_cache_texture, glyph_cache_bind_group)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn quad(draw_text_call_index: usize) -> TextQuad {
        TextQuad {
            src: (Vec2::zero(), Extent2::new(1.0, 1.0)),
            dst: (Vec2::new(10.0, 20.0), Extent2::new(4.0, 8.0)),
            color: Rgba::white(),
            draw_text_call_index,
        }
    }

    #[test]
    fn quads_expand_to_two_triangles() {
        let vertices = quads_to_vertices(&[quad(0)]);
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[0].pos, Vec2::new(10.0, 20.0));
        assert_eq!(vertices[1].pos, Vec2::new(14.0, 28.0));
        assert_eq!(vertices[2].pos, Vec2::new(14.0, 20.0));
        assert_eq!(vertices[5].tex, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn draw_calls_without_glyphs_get_no_range() {
        let quads = [quad(0), quad(0), quad(2)];
        let ranges = draw_call_ranges(&quads, 3);
        assert_eq!(ranges, vec![Some((0, 12)), None, Some((12, 18))]);
    }
}
