//! 2D renderer for drawing display lists onto a winit window with wgpu.
//!
//! Frames are described by a `FrameContent`, built through a `Canvas2`, in
//! logical pixels with <0,0> at the top-left corner of the window.

use crate::{
    pipelines::{
        rounded::{
            RoundedPipeline,
            RoundedUniformData,
        },
        line::{
            LinePipeline,
            LineUniformData,
        },
        image::{
            ImagePipeline,
            ImageUniformData,
        },
        text::{
            TextPipeline,
            PreppedDrawText,
        },
        uniform_bind_group_layout,
    },
    frame_content::{
        FrameContent,
        DrawObj2,
        GpuImage,
        TextBlock,
        LayedOutTextBlock,
        FontId,
    },
    render_instrs::frame_render_compiler,
    std140::std140_struct,
    uniform_buffer::{
        UniformBuffer,
        UniformPipelines,
    },
};
use std::{
    path::Path,
    sync::Arc,
    fs,
};
use anyhow::*;
use tracing::*;
use winit::window::Window;
use wgpu::*;
use vek::*;
use glyph_brush::ab_glyph::FontArc;


pub mod frame_content;
pub mod modifier;
pub mod render_instrs;
mod pipelines;
mod std140;
mod shader;
mod vertex;
mod uniform_buffer;


/// Number of samples per pixel when multisampling is enabled.
const MSAA_SAMPLE_COUNT: u32 = 4;

/// Transform and color a draw object is rendered with.
#[derive(Debug, Copy, Clone)]
pub(crate) struct ModifierUniformData {
    pub(crate) transform: Mat3<f32>,
    pub(crate) color: Rgba<f32>,
}

std140_struct!(ModifierUniformData {
    transform: Mat3<f32>,
    color: Rgba<f32>,
});

/// Options for creating a `Renderer`.
#[derive(Debug, Copy, Clone)]
pub struct RendererOptions {
    /// Use 4x multisample anti-aliasing, if the surface format supports it.
    pub msaa: bool,
    /// Synchronize presentation with the display's refresh rate.
    pub vsync: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        RendererOptions {
            msaa: true,
            vsync: true,
        }
    }
}

/// Top-level resource for drawing frames onto a window.
pub struct Renderer {
    surface: Surface,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    size: Extent2<u32>,
    scale_factor: f32,
    clear_color: Rgba<f32>,
    sample_count: u32,
    msaa_texture: Option<TextureView>,
    uniform_buffer: UniformBuffer,
    modifier_uniform_bind_group_layout: BindGroupLayout,
    rounded_pipeline: RoundedPipeline,
    line_pipeline: LinePipeline,
    image_pipeline: ImagePipeline,
    text_pipeline: TextPipeline,

    // safety: surface must be dropped before window
    _window: Arc<Window>,
}

/// Draw object with its uniform data already packed.
enum PreppedInstr<'a> {
    RoundedRect(u32),
    Line(u32),
    Image(&'a GpuImage, u32),
    Text(PreppedDrawText),
}

fn create_msaa_texture(
    device: &Device,
    config: &SurfaceConfiguration,
    sample_count: u32,
) -> Option<TextureView>
{
    if sample_count <= 1 {
        return None;
    }
    let texture = device
        .create_texture(&TextureDescriptor {
            label: Some("msaa texture"),
            size: Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: TextureDimension::D2,
            format: config.format,
            usage: TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
    Some(texture.create_view(&TextureViewDescriptor {
        label: Some("msaa texture view"),
        ..Default::default()
    }))
}

fn to_wgpu_color(color: Rgba<f32>) -> Color {
    Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: color.a as f64,
    }
}

impl Renderer {
    /// Create a new renderer on a given window.
    pub async fn new(window: Arc<Window>, options: RendererOptions) -> Result<Self> {
        trace!("beginning initializing renderer");

        let size = window.inner_size();
        let size = Extent2::new(size.width, size.height);
        let scale_factor = window.scale_factor() as f32;

        trace!("creating instance");
        let instance = Instance::new(InstanceDescriptor {
            backends: Backends::PRIMARY,
            ..Default::default()
        });
        trace!("creating surface");
        // safety: surface must be dropped before window
        let surface = unsafe { instance.create_surface(&*window) }
            .context("creating surface")?;

        trace!("creating adapter");
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("failed to find an appropriate adapter"))?;
        debug!(adapter = ?adapter.get_info(), "selected adapter");

        trace!("creating device and queue");
        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: None,
                    features: Features::empty(),
                    limits: Limits::default(),
                },
                None,
            )
            .await?;

        // colors are given as display values, so render to a linear format
        // to have them written unconverted
        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow!("surface supports no formats"))?;
        let alpha_mode = caps.alpha_modes
            .first()
            .copied()
            .unwrap_or(CompositeAlphaMode::Auto);
        let sample_count =
            if options.msaa && adapter
                .get_texture_format_features(format)
                .flags
                .sample_count_supported(MSAA_SAMPLE_COUNT)
            {
                MSAA_SAMPLE_COUNT
            } else {
                if options.msaa {
                    warn!(?format, "surface format does not support msaa, disabling");
                }
                1
            };
        debug!(?format, sample_count, "chose surface format");

        let modifier_uniform_bind_group_layout = uniform_bind_group_layout::<ModifierUniformData>(
            &device,
            "modifier uniform bind group layout",
            ShaderStages::VERTEX | ShaderStages::FRAGMENT,
        );

        trace!("creating pipelines");
        let rounded_pipeline = RoundedPipeline::new(
            &device,
            format,
            sample_count,
            &modifier_uniform_bind_group_layout,
        );
        let line_pipeline = LinePipeline::new(
            &device,
            format,
            sample_count,
            &modifier_uniform_bind_group_layout,
        );
        let image_pipeline = ImagePipeline::new(
            &device,
            format,
            sample_count,
            &modifier_uniform_bind_group_layout,
        );
        let text_pipeline = TextPipeline::new(
            &device,
            format,
            sample_count,
            &modifier_uniform_bind_group_layout,
        );

        trace!("configuring surface");
        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.w.max(1),
            height: size.h.max(1),
            present_mode:
                if options.vsync { PresentMode::AutoVsync }
                else { PresentMode::AutoNoVsync },
            alpha_mode,
            view_formats: Vec::new(),
        };
        surface.configure(&device, &config);
        let msaa_texture = create_msaa_texture(&device, &config, sample_count);
        let uniform_buffer = UniformBuffer::new(&device);

        trace!("done initializing renderer");
        Ok(Renderer {
            surface,
            device,
            queue,
            config,
            size,
            scale_factor,
            clear_color: Rgba::black(),
            sample_count,
            msaa_texture,
            uniform_buffer,
            modifier_uniform_bind_group_layout,
            rounded_pipeline,
            line_pipeline,
            image_pipeline,
            text_pipeline,
            _window: window,
        })
    }

    /// Get the current surface physical size.
    pub fn size(&self) -> Extent2<u32> {
        self.size
    }

    /// Get the current surface size in logical pixels, which is the space
    /// frames are drawn in.
    pub fn logical_size(&self) -> Extent2<f32> {
        self.size.map(|n| n as f32) / self.scale_factor
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Resize the surface, in reponse to a change in window size.
    ///
    /// A zero-sized surface is remembered but not configured, and frames are
    /// skipped until the window has an area again.
    pub fn resize(&mut self, size: Extent2<u32>) {
        self.size = size;
        if size.w == 0 || size.h == 0 {
            trace!("window minimized, not reconfiguring surface");
            return;
        }
        self.config.width = size.w;
        self.config.height = size.h;
        self.surface.configure(&self.device, &self.config);
        self.msaa_texture = create_msaa_texture(&self.device, &self.config, self.sample_count);
    }

    /// Change the ratio between physical and logical pixels.
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
    }

    /// Set the color the frame is cleared to before drawing.
    pub fn set_clear_color(&mut self, color: Rgba<f32>) {
        self.clear_color = color;
    }

    /// Draw a frame and present it to the window.
    pub fn draw_frame(&mut self, content: &FrameContent) -> Result<()> {
        if self.size.w == 0 || self.size.h == 0 {
            return Ok(());
        }

        // acquire frame to draw onto
        trace!("acquiring frame");
        let mut attempts = 0;
        let frame = loop {
            match self.surface.get_current_texture() {
                std::result::Result::Ok(frame) => break frame,
                Err(e) => {
                    if attempts < 10 {
                        trace!(error=%e, "get_current_texture error, retrying");
                        attempts += 1;
                        self.surface.configure(&self.device, &self.config);
                    } else {
                        return Err(e.into());
                    }
                }
            }
        };
        if attempts > 0 {
            trace!("successfully recreated surface");
        }
        let view = frame
            .texture
            .create_view(&TextureViewDescriptor::default());

        // pack uniform data and prepare text
        let logical_size = self.logical_size();
        let mut uniform_packer = self.uniform_buffer.create_packer();
        let mut text_pre_renderer = self.text_pipeline.begin_pre_render();
        let mut instrs = Vec::new();
        for instr in frame_render_compiler(content, logical_size) {
            let modifier_offset = uniform_packer.pack(&ModifierUniformData {
                transform: instr.transform.0,
                color: instr.color,
            });
            let prepped = match instr.obj {
                DrawObj2::RoundedRect(obj) => PreppedInstr::RoundedRect(
                    uniform_packer.pack(&RoundedUniformData::from(obj))
                ),
                DrawObj2::Line(obj) => PreppedInstr::Line(
                    uniform_packer.pack(&LineUniformData {
                        start: obj.start,
                        end: obj.end,
                    })
                ),
                DrawObj2::Image(obj) => PreppedInstr::Image(
                    &obj.image,
                    uniform_packer.pack(&ImageUniformData::from(obj)),
                ),
                DrawObj2::Text(obj) => PreppedInstr::Text(
                    text_pre_renderer.pre_render(obj)
                ),
            };
            instrs.push((modifier_offset, prepped));
        }
        text_pre_renderer.finalize_pre_render(&self.device, &self.queue)?;

        trace!(num_instrs = instrs.len(), "uploading uniform data");
        self.uniform_buffer.upload(
            &uniform_packer,
            &self.device,
            &self.queue,
            &self.modifier_uniform_bind_group_layout,
            UniformPipelines {
                rounded: &self.rounded_pipeline,
                line: &self.line_pipeline,
                image: &self.image_pipeline,
            },
        );

        let mut encoder = self.device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        {
            let (attachment_view, resolve_target) = match self.msaa_texture.as_ref() {
                Some(msaa_view) => (msaa_view, Some(&view)),
                None => (&view, None),
            };
            let mut pass = encoder
                .begin_render_pass(&RenderPassDescriptor {
                    label: Some("frame pass"),
                    color_attachments: &[
                        Some(RenderPassColorAttachment {
                            view: attachment_view,
                            resolve_target,
                            ops: Operations {
                                load: LoadOp::Clear(to_wgpu_color(self.clear_color)),
                                store: true,
                            },
                        }),
                    ],
                    depth_stencil_attachment: None,
                });

            if let Some(bind_groups) = self.uniform_buffer.bind_groups() {
                for (modifier_offset, instr) in instrs {
                    pass.set_bind_group(0, bind_groups.modifier, &[modifier_offset]);
                    match instr {
                        PreppedInstr::RoundedRect(offset) => self.rounded_pipeline
                            .render(&mut pass, bind_groups.rounded, offset),
                        PreppedInstr::Line(offset) => self.line_pipeline
                            .render(&mut pass, bind_groups.line, offset),
                        PreppedInstr::Image(image, offset) => self.image_pipeline
                            .render(&mut pass, image, bind_groups.image, offset),
                        PreppedInstr::Text(text) => self.text_pipeline
                            .render(text, &mut pass),
                    }
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Read a PNG / JPG / etc image from a file and load it onto the GPU.
    pub fn load_image_file(&self, path: impl AsRef<Path>) -> Result<GpuImage> {
        let path = path.as_ref();
        let file_data = fs::read(path)
            .with_context(|| format!("reading image file {}", path.display()))?;
        self.load_image(&file_data)
    }

    /// Load an image onto the GPU from PNG / JPG / etc file data.
    pub fn load_image(&self, file_data: impl AsRef<[u8]>) -> Result<GpuImage> {
        self.image_pipeline
            .load_image_file(&self.device, &self.queue, file_data.as_ref())
    }

    /// Read an OTF / TTF / etc font from a file and load it onto the renderer.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<FontId> {
        let path = path.as_ref();
        let file_data = fs::read(path)
            .with_context(|| format!("reading font file {}", path.display()))?;
        self.load_font(file_data)
    }

    /// Load a font onto the renderer from OTF / TTF / etc file data.
    ///
    /// Be mindful that there is currently no way to un-load a font from the
    /// renderer.
    pub fn load_font(&mut self, file_data: impl Into<Vec<u8>>) -> Result<FontId> {
        let font = FontArc::try_from_vec(file_data.into())?;
        Ok(self.text_pipeline.load_font(font))
    }

    /// Pre-compute the layout for a text block.
    pub fn lay_out_text(&self, text_block: &TextBlock) -> LayedOutTextBlock {
        self.text_pipeline.lay_out_text(text_block)
    }
}
