//! Submodules for each renderer pipeline, and the bits of pipeline setup they
//! all share.
//!
//! Every pipeline binds the modifier uniform (transform + color) at group 0
//! with a dynamic offset. Group 1 and beyond are pipeline-specific.

use crate::std140::Std140;
use wgpu::*;

pub mod rounded;
pub mod line;
pub mod image;
pub mod text;


/// Blended color target state for drawing onto the frame.
pub(crate) fn color_targets(format: TextureFormat) -> [Option<ColorTargetState>; 1] {
    [Some(ColorTargetState {
        format,
        blend: Some(BlendState::ALPHA_BLENDING),
        write_mask: ColorWrites::all(),
    })]
}

pub(crate) fn multisample(sample_count: u32) -> MultisampleState {
    MultisampleState {
        count: sample_count,
        ..Default::default()
    }
}

/// Bind group layout for a single dynamically-offset uniform of type `T`.
pub(crate) fn uniform_bind_group_layout<T: Std140>(
    device: &Device,
    label: &'static str,
    visibility: ShaderStages,
) -> BindGroupLayout
{
    device
        .create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility,
                    ty: BindingType::Buffer {
                        ty: BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: BufferSize::new(T::SIZE as u64),
                    },
                    count: None,
                },
            ],
        })
}

/// Bind group binding a `T`-sized window of the shared uniform buffer, to be
/// positioned with a dynamic offset at draw time.
pub(crate) fn uniform_bind_group<T: Std140>(
    device: &Device,
    label: &'static str,
    layout: &BindGroupLayout,
    uniform_buffer: &Buffer,
) -> BindGroup
{
    device
        .create_bind_group(&BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::Buffer(BufferBinding {
                        buffer: uniform_buffer,
                        offset: 0,
                        size: BufferSize::new(T::SIZE as u64),
                    }),
                },
            ],
        })
}

/// Bind group layout for a 2D texture plus its sampler.
pub(crate) fn texture_bind_group_layout(
    device: &Device,
    label: &'static str,
    filterable: bool,
) -> BindGroupLayout
{
    let sampler_type =
        if filterable { SamplerBindingType::Filtering }
        else { SamplerBindingType::NonFiltering };
    device
        .create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(sampler_type),
                    count: None,
                },
            ],
        })
}

pub(crate) fn texture_bind_group(
    device: &Device,
    label: &'static str,
    layout: &BindGroupLayout,
    view: &TextureView,
    sampler: &Sampler,
) -> BindGroup
{
    device
        .create_bind_group(&BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(view),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(sampler),
                },
            ],
        })
}
