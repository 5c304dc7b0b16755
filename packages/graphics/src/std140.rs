//! Serialization of data into the std140 layout format, suitable for use in
//! uniform buffers, as described in:
//!
//! https://www.oreilly.com/library/view/opengl-programming-guide/9780132748445/app09lev1sec2.html

use vek::*;


/// Type which can serialize into the std140 layout format, suitable for use
/// in uniform buffers. Furthermore, these types have a _statically_ known size
/// and alignment.
pub trait Std140: Sized + Clone {
    /// Required alignment of this type in the uniform buffer.
    const ALIGN: usize;

    /// Amount of size this type takes in the uniform buffer. A multiple of
    /// `Self::ALIGN`.
    const SIZE: usize;

    /// Serialize self into uniform buffer data. Writes exactly `Self::SIZE`
    /// bytes to `dst`. Assumes `dst.len()` is a multiple of `Self::ALIGN`.
    fn write(&self, dst: &mut Vec<u8>);

    /// Write the necessary number of padding bytes to `dst` so as to ensure
    /// necessary alignment, then write self to `dst`. Returns the index in
    /// `dst` where started writing self's actual data (not self's padding
    /// bytes).
    fn pad_write(&self, dst: &mut Vec<u8>) -> usize {
        pad(dst, Self::ALIGN);
        let offset = dst.len();
        self.write(dst);
        offset
    }
}

/// Push zero bytes onto `dst` until its length is a multiple of `align`.
pub fn pad(dst: &mut Vec<u8>, align: usize) {
    while dst.len() % align != 0 {
        dst.push(0);
    }
}

/// Marker trait for `Std140` types which are considered "scalars".
pub trait Std140Scalar {}

/// Marker trait for `Std140` types which are considered either "scalars" or
/// "vectors".
pub trait Std140ScalarOrVector {}

// scalars

macro_rules! std140_scalar {
    ($type:ty)=>{
        impl Std140 for $type {
            const ALIGN: usize = 4;
            const SIZE: usize = 4;

            fn write(&self, dst: &mut Vec<u8>) {
                dst.extend(self.to_le_bytes());
            }
        }

        impl Std140Scalar for $type {}

        impl Std140ScalarOrVector for $type {}
    };
}

std140_scalar!(f32);


// two-component vectors

macro_rules! std140_vec_2 {
    ($type:ident, $x:ident, $y:ident)=>{
        impl<T: Std140 + Std140Scalar> Std140 for $type<T> {
            // "both the size and aligment are twice the size of the underlying scalar
            // type."
            const ALIGN: usize = T::SIZE * 2;
            const SIZE: usize = T::SIZE * 2;

            fn write(&self, dst: &mut Vec<u8>) {
                self.$x.write(dst);
                self.$y.write(dst);
            }
        }

        impl<T: Std140 + Std140Scalar> Std140ScalarOrVector for $type<T> {}
    };
}

std140_vec_2!(Vec2, x, y);
std140_vec_2!(Extent2, w, h);


// three and four-component vectors
//
// "both the size and alignment are four times the size of the underlying
// scalar type."

macro_rules! std140_vec_3 {
    ($type:ident, $x:ident, $y:ident, $z:ident)=>{
        impl<T: Std140 + Std140Scalar> Std140 for $type<T> {
            const ALIGN: usize = T::SIZE * 4;
            const SIZE: usize = T::SIZE * 4;

            fn write(&self, dst: &mut Vec<u8>) {
                self.$x.write(dst);
                self.$y.write(dst);
                self.$z.write(dst);
                for _ in 0..T::SIZE {
                    dst.push(0);
                }
            }
        }

        impl<T: Std140 + Std140Scalar> Std140ScalarOrVector for $type<T> {}
    };
}

std140_vec_3!(Vec3, x, y, z);

macro_rules! std140_vec_4 {
    ($type:ident, $x:ident, $y:ident, $z:ident, $w:ident)=>{
        impl<T: Std140 + Std140Scalar> Std140 for $type<T> {
            const ALIGN: usize = T::SIZE * 4;
            const SIZE: usize = T::SIZE * 4;

            fn write(&self, dst: &mut Vec<u8>) {
                self.$x.write(dst);
                self.$y.write(dst);
                self.$z.write(dst);
                self.$w.write(dst);
            }
        }

        impl<T: Std140 + Std140Scalar> Std140ScalarOrVector for $type<T> {}
    };
}

std140_vec_4!(Rgba, r, g, b, a);


// arrays of scalars or vectors

const fn arr_elem_size(elem_type_size: usize) -> usize {
    // "the size of each element in the array will be the size of the element
    // type, rounded up to a multiple of the size of a vec4"
    if elem_type_size % 16 == 0 {
        elem_type_size
    } else {
        elem_type_size - (elem_type_size % 16) + 16
    }
}

impl<T: Std140 + Std140ScalarOrVector, const LEN: usize> Std140 for [T; LEN] {
    // "this is also the array's alignment."
    const ALIGN: usize = arr_elem_size(T::SIZE);

    // "the array's size will be this rounded-up element's size times the
    // number of elements in the array"
    const SIZE: usize = arr_elem_size(T::SIZE) * LEN;

    fn write(&self, dst: &mut Vec<u8>) {
        for elem in self {
            elem.write(dst);
            for _ in 0..arr_elem_size(T::SIZE) - T::SIZE {
                dst.push(0);
            }
        }
    }
}

// matrices
//
// column-major only, laid out like an array of column vectors. this matches
// WGSL's `mat3x3<f32>` in the uniform address space, whose columns are
// strided by 16 bytes.

impl<T: Std140 + Std140Scalar> Std140 for Mat3<T> {
    const ALIGN: usize = <[Vec3<T>; 3]>::ALIGN;
    const SIZE: usize = <[Vec3<T>; 3]>::SIZE;

    fn write(&self, dst: &mut Vec<u8>) {
        let as_array: [Vec3<T>; 3] = self.cols.clone().into_array();
        as_array.write(dst);
    }
}

// structures

/// Macro for implementing `Std140` on a struct of types which implement
/// `Std140`.
macro_rules! std140_struct {
    ($struct:ident {$(
        $field:ident: $type:ty
    ),*$(,)?})=>{
        impl $crate::std140::Std140 for $struct {
            // "structure alignment will be the alignment for the biggest
            // structure member, according to the previous rules, rounded up
            // to a multiple of the size of a vec4"
            const ALIGN: usize = {
                let mut align = 0;
                $(
                let field_align = <$type as $crate::std140::Std140>::ALIGN;
                if field_align > align {
                    align = field_align;
                }
                )*
                let rem = align % 16;
                if rem == 0 {
                    align
                } else {
                    align - rem + 16
                }
            };

            // "its size will be the space needed by its members, according to
            // the previous rules, rounded up to a multiple of the structure
            // alignment"
            const SIZE: usize = {
                let mut size = 0;
                $(
                let field_align = <$type as $crate::std140::Std140>::ALIGN;
                let field_size = <$type as $crate::std140::Std140>::SIZE;
                if size % field_align != 0 {
                    size += field_align - (size % field_align);
                }
                size += field_size;
                )*
                if size % Self::ALIGN != 0 {
                    size += Self::ALIGN - (size % Self::ALIGN);
                }
                size
            };

            fn write(&self, dst: &mut Vec<u8>) {
                let len_before = dst.len();
                $(
                <$type as $crate::std140::Std140>::pad_write(&self.$field, dst);
                )*
                while dst.len() < len_before + Self::SIZE {
                    dst.push(0);
                }
            }
        }
    };
}

pub(crate) use std140_struct;


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Copy, Clone)]
    struct Mixed {
        transform: Mat3<f32>,
        color: Rgba<f32>,
        pos: Vec2<f32>,
        thickness: f32,
    }

    std140_struct!(Mixed {
        transform: Mat3<f32>,
        color: Rgba<f32>,
        pos: Vec2<f32>,
        thickness: f32,
    });

    #[test]
    fn mat3_columns_are_padded_to_vec4() {
        assert_eq!(<Mat3<f32>>::SIZE, 48);
        let mut buf = Vec::new();
        Mat3::<f32>::identity().write(&mut buf);
        assert_eq!(buf.len(), 48);
        assert_eq!(&buf[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&buf[20..24], &1.0f32.to_le_bytes());
    }

    #[test]
    fn struct_size_rounds_up_to_alignment() {
        // 48 (mat3) + 16 (rgba) + 8 (vec2) + 4 (f32) = 76, rounded up to 80
        assert_eq!(Mixed::ALIGN, 16);
        assert_eq!(Mixed::SIZE, 80);

        let mut buf = vec![0u8; 4];
        let offset = Mixed {
            transform: Mat3::identity(),
            color: Rgba::white(),
            pos: Vec2::zero(),
            thickness: 2.0,
        }.pad_write(&mut buf);
        assert_eq!(offset, 16);
        assert_eq!(buf.len(), 16 + 80);
        assert_eq!(&buf[16 + 72..16 + 76], &2.0f32.to_le_bytes());
    }
}
