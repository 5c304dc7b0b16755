//! The per-frame uniform buffer, which all draw objects' uniform data is packed
//! into and indexed with dynamic offsets.

use crate::{
    std140::{
        Std140,
        pad,
    },
    pipelines::{
        uniform_bind_group,
        rounded::RoundedPipeline,
        line::LinePipeline,
        image::ImagePipeline,
    },
    ModifierUniformData,
};
use wgpu::*;
use tracing::*;


/// Smallest uniform buffer allocated, so that every bind group's binding
/// window fits even when a frame packs little data.
const MIN_UNIFORM_BUFFER_LEN: usize = 256;

#[derive(Debug)]
pub struct UniformBuffer {
    uniform_offset_align: usize,
    state: Option<UniformBufferState>
}

#[derive(Debug)]
struct UniformBufferState {
    uniform_buffer: Buffer,
    uniform_buffer_len: usize,

    modifier_uniform_bind_group: BindGroup,
    rounded_uniform_bind_group: BindGroup,
    line_uniform_bind_group: BindGroup,
    image_uniform_bind_group: BindGroup,
}

/// Bind groups for each kind of uniform data, positioned with the offsets
/// returned by `UniformDataPacker::pack`.
#[derive(Debug, Copy, Clone)]
pub struct UniformBindGroups<'a> {
    pub modifier: &'a BindGroup,
    pub rounded: &'a BindGroup,
    pub line: &'a BindGroup,
    pub image: &'a BindGroup,
}

#[derive(Debug, Clone)]
pub struct UniformDataPacker {
    uniform_offset_align: usize,
    data: Vec<u8>,
}

/// The pipelines which own uniform bind group layouts.
pub struct UniformPipelines<'a> {
    pub rounded: &'a RoundedPipeline,
    pub line: &'a LinePipeline,
    pub image: &'a ImagePipeline,
}


impl UniformBuffer {
    pub fn new(device: &Device) -> Self {
        let uniform_offset_align = device
            .limits()
            .min_uniform_buffer_offset_alignment as usize;
        UniformBuffer {
            uniform_offset_align,
            state: None,
        }
    }

    pub fn create_packer(&self) -> UniformDataPacker {
        UniformDataPacker::new(self.uniform_offset_align)
    }

    pub fn upload(
        &mut self,
        data: &UniformDataPacker,
        device: &Device,
        queue: &Queue,
        modifier_uniform_bind_group_layout: &BindGroupLayout,
        pipelines: UniformPipelines,
    ) {
        if data.data.is_empty() {
            return;
        }

        let dst = self
            .state
            .as_ref()
            .filter(|state| state.uniform_buffer_len >= data.data.len());

        if let Some(dst) = dst {
            trace!("re-using uniform buffer");
            queue.write_buffer(&dst.uniform_buffer, 0, &data.data);
        } else {
            trace!(len = data.data.len(), "creating new uniform buffer");
            let uniform_buffer_len = data.data.len()
                .next_power_of_two()
                .max(MIN_UNIFORM_BUFFER_LEN);
            let uniform_buffer = device
                .create_buffer(&BufferDescriptor {
                    label: Some("uniform buffer"),
                    size: uniform_buffer_len as u64,
                    usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
            queue.write_buffer(&uniform_buffer, 0, &data.data);

            // bind groups reference the buffer, so must be re-created with it
            let modifier_uniform_bind_group = uniform_bind_group::<ModifierUniformData>(
                device,
                "modifier uniform bind group",
                modifier_uniform_bind_group_layout,
                &uniform_buffer,
            );
            let rounded_uniform_bind_group = pipelines.rounded
                .create_rounded_uniform_bind_group(device, &uniform_buffer);
            let line_uniform_bind_group = pipelines.line
                .create_line_uniform_bind_group(device, &uniform_buffer);
            let image_uniform_bind_group = pipelines.image
                .create_image_uniform_bind_group(device, &uniform_buffer);

            self.state = Some(UniformBufferState {
                uniform_buffer,
                uniform_buffer_len,
                modifier_uniform_bind_group,
                rounded_uniform_bind_group,
                line_uniform_bind_group,
                image_uniform_bind_group,
            });
        }
    }

    /// The bind groups, if any data has ever been uploaded.
    pub fn bind_groups(&self) -> Option<UniformBindGroups> {
        self.state
            .as_ref()
            .map(|state| UniformBindGroups {
                modifier: &state.modifier_uniform_bind_group,
                rounded: &state.rounded_uniform_bind_group,
                line: &state.line_uniform_bind_group,
                image: &state.image_uniform_bind_group,
            })
    }
}

impl UniformDataPacker {
    pub fn new(uniform_offset_align: usize) -> Self {
        UniformDataPacker {
            uniform_offset_align,
            data: Vec::new(),
        }
    }

    /// Pack data at the next aligned offset, and return that offset.
    pub fn pack<T: Std140>(&mut self, data: &T) -> u32 {
        pad(&mut self.data, self.uniform_offset_align);
        data.pad_write(&mut self.data) as u32
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use vek::*;

    #[test]
    fn packed_offsets_respect_alignment() {
        let mut packer = UniformDataPacker::new(256);
        let a = packer.pack(&ModifierUniformData {
            transform: Mat3::identity(),
            color: Rgba::white(),
        });
        let b = packer.pack(&1.0f32);
        let c = packer.pack(&Vec2::new(1.0f32, 2.0));
        assert_eq!(a, 0);
        assert_eq!(b, 256);
        assert_eq!(c, 512);
        assert_eq!(packer.data.len(), 512 + 8);
    }
}
