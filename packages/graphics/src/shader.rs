//! Loading shaders.

/// Load the WGSL shader with the given file name from `src/shaders`.
///
/// The source is embedded into the binary at compile time, so the shader
/// can be found regardless of the working directory.
macro_rules! load_shader {
    ($name:expr)=>{
        wgpu::ShaderModuleDescriptor {
            label: Some($name),
            source: wgpu::ShaderSource::Wgsl(
                include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/src/shaders/", $name)).into()
            ),
        }
    };
}

pub(crate) use load_shader;
