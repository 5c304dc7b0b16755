//! Pipeline for drawing one pixel wide line segments.

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


/// Line segment from `start` to `end`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawLine {
    pub start: Vec2<f32>,
    pub end: Vec2<f32>,
}

#[derive(Debug, Copy, Clone)]
pub struct LineUniformData {
    pub start: Vec2<f32>,
    pub end: Vec2<f32>,
}

std140_struct!(LineUniformData {
    start: Vec2<f32>,
    end: Vec2<f32>,
});

#[derive(Debug)]
pub struct LinePipeline {
    line_pipeline: RenderPipeline,
    line_uniform_bind_group_layout: BindGroupLayout,
}

impl LinePipeline {
    pub(crate) fn new(
        device: &Device,
        format: TextureFormat,
        sample_count: u32,
        modifier_uniform_bind_group_layout: &BindGroupLayout,
    ) -> Self
    {
        let line_module = device
            .create_shader_module(load_shader!("line.wgsl"));
        let line_uniform_bind_group_layout = uniform_bind_group_layout::<LineUniformData>(
            device,
            "line uniform bind group layout",
            ShaderStages::VERTEX,
        );
        let line_pipeline_layout = device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some("line pipeline layout"),
                bind_group_layouts: &[
                    modifier_uniform_bind_group_layout,
                    &line_uniform_bind_group_layout,
                ],
                push_constant_ranges: &[],
            });
        let line_pipeline = device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("line pipeline"),
                layout: Some(&line_pipeline_layout),
                vertex: VertexState {
                    module: &line_module,
                    entry_point: "vs_main",
                    buffers: &[],
                },
                fragment: Some(FragmentState {
                    module: &line_module,
                    entry_point: "fs_main",
                    targets: &color_targets(format),
                }),
                primitive: PrimitiveState {
                    topology: PrimitiveTopology::LineList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: multisample(sample_count),
                multiview: None,
            });

        LinePipeline {
            line_pipeline,
            line_uniform_bind_group_layout,
        }
    }

    pub(crate) fn create_line_uniform_bind_group(
        &self,
        device: &Device,
        uniform_buffer: &Buffer,
    ) -> BindGroup
    {
        uniform_bind_group::<LineUniformData>(
            device,
            "line uniform bind group",
            &self.line_uniform_bind_group_layout,
            uniform_buffer,
        )
    }

    pub(crate) fn render<'a>(
        &'a self,
        pass: &mut RenderPass<'a>,
        line_uniform_bind_group: &'a BindGroup,
        line_uniform_offset: u32,
    ) {
        pass.set_pipeline(&self.line_pipeline);
        pass.set_bind_group(1, line_uniform_bind_group, &[line_uniform_offset]);
        pass.draw(0..2, 0..1);
    }
}
