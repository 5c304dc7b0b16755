//! Serialization of data into vertex buffers and declaring their structure.

use std::mem::size_of;
use vek::*;
use wgpu::{
    VertexFormat,
    VertexAttribute,
};


/// Uninhabited marker types naming the shader-side type of an attribute.
pub mod shader_types {
    macro_rules! shader_types {
        ($($name:ident),*$(,)?)=>{
            $(
            #[allow(non_camel_case_types)]
            pub enum $name {}
            )*
        };
    }

    shader_types! {
        vec2,
        vec4,
    }
}

pub trait AttributeData<ShaderType> {
    const FORMAT: VertexFormat;
    const SIZE: usize;

    fn write(&self, dst: &mut Vec<u8>);
}

// vectors
macro_rules! attr_vec {
    (
        $shader_type:ident,
        ($($vek_type:ident),*$(,)?),
        $comp_type:ty,
        $format:ident,
        $num_comps:expr $(,)?
    )=>{
        $(
        impl AttributeData<shader_types::$shader_type> for $vek_type<$comp_type> {
            const FORMAT: VertexFormat = VertexFormat::$format;
            const SIZE: usize = size_of::<$comp_type>() * $num_comps;

            fn write(&self, dst: &mut Vec<u8>) {
                for comp in self.into_array() {
                    dst.extend(comp.to_le_bytes());
                }
            }
        }
        )*
    };
}

// positions and texture coordinates
attr_vec!(vec2, (Vec2, Extent2), f32, Float32x2, 2);

// colors, normalized in the shader
attr_vec!(vec4, (Rgba), u8, Unorm8x4, 4);


pub trait VertexStruct {
    const SIZE: usize;
    const ATTRIBUTES: &'static [VertexAttribute];

    fn write(&self, dst: &mut Vec<u8>);
}

macro_rules! vertex_struct {
    ($name:ident {$(
        ($field:ident: $rust_type:ty) (@location($location:expr) $shader_type:ident)
    ),*$(,)?})=>{
        impl $crate::vertex::VertexStruct for $name {
            const SIZE: usize =
                0
                $( + <$rust_type as $crate::vertex::AttributeData<$crate::vertex::shader_types::$shader_type>>::SIZE)*;
            #[allow(unused_assignments)]
            const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &{
                let mut attrs = [$(
                    wgpu::VertexAttribute {
                        format: <$rust_type as $crate::vertex::AttributeData<$crate::vertex::shader_types::$shader_type>>::FORMAT,
                        offset: !0,
                        shader_location: $location,
                    },
                )*];
                let mut offset = 0;
                let mut index = 0;
                $(
                attrs[index].offset = offset as u64;
                offset += <$rust_type as $crate::vertex::AttributeData<$crate::vertex::shader_types::$shader_type>>::SIZE;
                index += 1;
                )*
                attrs
            };

            fn write(&self, dst: &mut Vec<u8>) {
                $(
                <$rust_type as $crate::vertex::AttributeData<$crate::vertex::shader_types::$shader_type>>::write(
                    &self.$field,
                    dst,
                );
                )*
            }
        }
    };
}

pub(crate) use vertex_struct;
