//! Pipeline for filling and stroking rounded rectangles.

use crate::{
    shader::load_shader,
    std140::std140_struct,
    pipelines::{
        color_targets,
        multisample,
        uniform_bind_group_layout,
        uniform_bind_group,
    },
};
use wgpu::*;
use vek::*;


/// Rounded rectangle from <0,0> to `size`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawRoundedRect {
    pub size: Extent2<f32>,
    /// Corner radius, clamped to half the shorter side.
    pub radius: f32,
    /// Outline thickness, or zero to fill.
    pub thickness: f32,
}

#[derive(Debug, Copy, Clone)]
pub struct RoundedUniformData {
    pub size: Extent2<f32>,
    pub radius: f32,
    pub thickness: f32,
}

std140_struct!(RoundedUniformData {
    size: Extent2<f32>,
    radius: f32,
    thickness: f32,
});

impl From<&DrawRoundedRect> for RoundedUniformData {
    fn from(rect: &DrawRoundedRect) -> Self {
        RoundedUniformData {
            size: rect.size,
            radius: rect.radius.max(0.0),
            thickness: rect.thickness.max(0.0),
        }
    }
}

#[derive(Debug)]
pub struct RoundedPipeline {
    rounded_pipeline: RenderPipeline,
    rounded_uniform_bind_group_layout: BindGroupLayout,
}

impl RoundedPipeline {
    pub(crate) fn new(
        device: &Device,
        format: TextureFormat,
        sample_count: u32,
        modifier_uniform_bind_group_layout: &BindGroupLayout,
    ) -> Self
    {
        let rounded_module = device
            .create_shader_module(load_shader!("rounded.wgsl"));
        let rounded_uniform_bind_group_layout = uniform_bind_group_layout::<RoundedUniformData>(
            device,
            "rounded uniform bind group layout",
            ShaderStages::VERTEX | ShaderStages::FRAGMENT,
        );
        let rounded_pipeline_layout = device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some("rounded pipeline layout"),
                bind_group_layouts: &[
                    modifier_uniform_bind_group_layout,
                    &rounded_uniform_bind_group_layout,
                ],
                push_constant_ranges: &[],
            });
        let rounded_pipeline = device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("rounded pipeline"),
                layout: Some(&rounded_pipeline_layout),
                vertex: VertexState {
                    module: &rounded_module,
                    entry_point: "vs_main",
                    buffers: &[],
                },
                fragment: Some(FragmentState {
                    module: &rounded_module,
                    entry_point: "fs_main",
                    targets: &color_targets(format),
                }),
                primitive: PrimitiveState::default(),
                depth_stencil: None,
                multisample: multisample(sample_count),
                multiview: None,
            });

        RoundedPipeline {
            rounded_pipeline,
            rounded_uniform_bind_group_layout,
        }
    }

    pub(crate) fn create_rounded_uniform_bind_group(
        &self,
        device: &Device,
        uniform_buffer: &Buffer,
    ) -> BindGroup
    {
        uniform_bind_group::<RoundedUniformData>(
            device,
            "rounded uniform bind group",
            &self.rounded_uniform_bind_group_layout,
            uniform_buffer,
        )
    }

    pub(crate) fn render<'a>(
        &'a self,
        pass: &mut RenderPass<'a>,
        rounded_uniform_bind_group: &'a BindGroup,
        rounded_uniform_offset: u32,
    ) {
        pass.set_pipeline(&self.rounded_pipeline);
        pass.set_bind_group(1, rounded_uniform_bind_group, &[rounded_uniform_offset]);
        pass.draw(0..6, 0..1);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::std140::Std140;

    #[test]
    fn uniform_fits_in_one_vec4() {
        assert_eq!(RoundedUniformData::SIZE, 16);
    }

    #[test]
    fn negative_radius_and_thickness_are_zeroed() {
        let data = RoundedUniformData::from(&DrawRoundedRect {
            size: Extent2::new(40.0, 40.0),
            radius: -3.0,
            thickness: -1.0,
        });
        assert_eq!(data.radius, 0.0);
        assert_eq!(data.thickness, 0.0);
    }
}
