//! 2D pipeline for drawing an image.

use crate::{
    shader::load_shader,
    std140::std140_struct,
    pipelines::{
        color_targets,
        multisample,
        uniform_bind_group_layout,
        uniform_bind_group,
        texture_bind_group_layout,
        texture_bind_group,
    },
};
use std::{
    sync::Arc,
    fmt::{self, Formatter, Debug},
};
use image::RgbaImage;
use wgpu::{
    *,
    util::DeviceExt,
};
use vek::*;
use anyhow::*;


/// Draw the `tex_start`/`tex_extent` region of an image onto the unit square.
#[derive(Debug, Clone)]
pub struct DrawImage {
    pub image: GpuImage,
    pub tex_start: Vec2<f32>,
    pub tex_extent: Extent2<f32>,
}

#[derive(Debug, Copy, Clone)]
pub struct ImageUniformData {
    pub tex_start: Vec2<f32>,
    pub tex_extent: Extent2<f32>,
}

std140_struct!(ImageUniformData {
    tex_start: Vec2<f32>,
    tex_extent: Extent2<f32>,
});

impl From<&DrawImage> for ImageUniformData {
    fn from(draw: &DrawImage) -> Self {
        ImageUniformData {
            tex_start: draw.tex_start,
            tex_extent: draw.tex_extent,
        }
    }
}

pub struct ImagePipeline {
    image_pipeline: RenderPipeline,
    image_uniform_bind_group_layout: BindGroupLayout,
    image_texture_bind_group_layout: BindGroupLayout,
    image_sampler: Sampler,
}

impl ImagePipeline {
    pub(crate) fn new(
        device: &Device,
        format: TextureFormat,
        sample_count: u32,
        modifier_uniform_bind_group_layout: &BindGroupLayout,
    ) -> Self
    {
        let image_module = device
            .create_shader_module(load_shader!("image.wgsl"));
        let image_uniform_bind_group_layout = uniform_bind_group_layout::<ImageUniformData>(
            device,
            "image uniform bind group layout",
            ShaderStages::VERTEX,
        );
        let image_texture_bind_group_layout = texture_bind_group_layout(
            device,
            "image texture bind group layout",
            true,
        );
        let image_pipeline_layout = device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some("image pipeline layout"),
                bind_group_layouts: &[
                    modifier_uniform_bind_group_layout,
                    &image_uniform_bind_group_layout,
                    &image_texture_bind_group_layout,
                ],
                push_constant_ranges: &[],
            });
        let image_pipeline = device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("image pipeline"),
                layout: Some(&image_pipeline_layout),
                vertex: VertexState {
                    module: &image_module,
                    entry_point: "vs_main",
                    buffers: &[],
                },
                fragment: Some(FragmentState {
                    module: &image_module,
                    entry_point: "fs_main",
                    targets: &color_targets(format),
                }),
                primitive: PrimitiveState::default(),
                depth_stencil: None,
                multisample: multisample(sample_count),
                multiview: None,
            });
        let image_sampler = device
            .create_sampler(&SamplerDescriptor {
                label: Some("image sampler"),
                mag_filter: FilterMode::Linear,
                min_filter: FilterMode::Linear,
                ..Default::default()
            });

        ImagePipeline {
            image_pipeline,
            image_uniform_bind_group_layout,
            image_texture_bind_group_layout,
            image_sampler,
        }
    }

    pub(crate) fn create_image_uniform_bind_group(
        &self,
        device: &Device,
        uniform_buffer: &Buffer,
    ) -> BindGroup
    {
        uniform_bind_group::<ImageUniformData>(
            device,
            "image uniform bind group",
            &self.image_uniform_bind_group_layout,
            uniform_buffer,
        )
    }

    pub(crate) fn render<'a>(
        &'a self,
        pass: &mut RenderPass<'a>,
        image: &'a GpuImage,
        image_uniform_bind_group: &'a BindGroup,
        image_uniform_offset: u32,
    ) {
        pass.set_pipeline(&self.image_pipeline);
        pass.set_bind_group(1, image_uniform_bind_group, &[image_uniform_offset]);
        pass.set_bind_group(2, &image.0.texture_bind_group, &[]);
        pass.draw(0..6, 0..1);
    }

    /// Decode an encoded image file and upload it.
    pub(crate) fn load_image_file(
        &self,
        device: &Device,
        queue: &Queue,
        file_data: &[u8],
    ) -> Result<GpuImage>
    {
        let image = image::load_from_memory(file_data)
            .context("decoding image")?
            .into_rgba8();
        self.load_image(device, queue, &image)
    }

    pub(crate) fn load_image(
        &self,
        device: &Device,
        queue: &Queue,
        image: &RgbaImage,
    ) -> Result<GpuImage>
    {
        self.load_image_raw(
            device,
            queue,
            Extent2::new(image.width(), image.height()),
            image.as_raw(),
        )
    }

    /// Upload tightly packed RGBA8 pixel data.
    pub(crate) fn load_image_raw(
        &self,
        device: &Device,
        queue: &Queue,
        size: Extent2<u32>,
        pixel_data: &[u8],
    ) -> Result<GpuImage>
    {
        ensure!(size.w > 0 && size.h > 0, "image has zero size {:?}", size);
        ensure!(
            pixel_data.len() == size.w as usize * size.h as usize * 4,
            "image pixel data has length {} but size {:?} requires {}",
            pixel_data.len(),
            size,
            size.w as usize * size.h as usize * 4,
        );

        let texture = device
            .create_texture_with_data(
                queue,
                &TextureDescriptor {
                    label: Some("image texture"),
                    size: Extent3d {
                        width: size.w,
                        height: size.h,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: TextureDimension::D2,
                    format: TextureFormat::Rgba8Unorm,
                    usage: TextureUsages::TEXTURE_BINDING,
                    view_formats: &[],
                },
                pixel_data,
            );
        let texture_view = texture
            .create_view(&TextureViewDescriptor {
                label: Some("image texture view"),
                ..Default::default()
            });
        let texture_bind_group = texture_bind_group(
            device,
            "image texture bind group",
            &self.image_texture_bind_group_layout,
            &texture_view,
            &self.image_sampler,
        );

        Ok(GpuImage(Arc::new(GpuImageInner {
            texture_bind_group,
            size,
        })))
    }
}


/// 2D RGBA image loaded into a GPU texture.
///
/// Internally reference-counted.
#[derive(Clone)]
pub struct GpuImage(Arc<GpuImageInner>);

struct GpuImageInner {
    size: Extent2<u32>,
    texture_bind_group: BindGroup,
}

impl GpuImage {
    /// Get image size in pixels.
    pub fn size(&self) -> Extent2<u32> {
        self.0.size
    }
}

impl Debug for GpuImage {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("GpuImage")
            .field("size", &self.0.size)
            .finish_non_exhaustive()
    }
}
