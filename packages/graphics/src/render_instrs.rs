//! Flattening of a `FrameContent` modifier tree into a linear sequence of
//! draw instructions with fully accumulated transforms and colors.

use crate::{
    modifier::{
        Modifier2,
        Transform2,
    },
    frame_content::{
        FrameContent,
        FrameItem,
        DrawObj2,
    },
};
use vek::*;


/// Draw a draw object.
#[derive(Debug, Clone)]
pub struct RenderInstr<'a> {
    /// The draw object to draw.
    pub obj: &'a DrawObj2,
    /// Transform from the object's space to normalized device coordinates.
    pub transform: Transform2,
    /// Color by which to multiply the object.
    pub color: Rgba<f32>,
}

/// Transform from logical pixels, with <0,0> at the top-left and `size` at
/// the bottom-right, to normalized device coordinates.
pub fn pixels_to_ndc(size: Extent2<f32>) -> Transform2 {
    Transform2(Mat3::new(
        2.0 / size.w, 0.0, -1.0,
        0.0, -2.0 / size.h, 1.0,
        0.0, 0.0, 1.0,
    ))
}

pub fn frame_render_compiler<'a>(
    content: &'a FrameContent,
    size: Extent2<f32>,
) -> RenderCompiler<impl Iterator<Item=(usize, &'a FrameItem)> + 'a>
{
    let items = content.0
        .iter()
        .map(|&(stack_len, ref item)| (stack_len, item));
    RenderCompiler::new(items, pixels_to_ndc(size))
}

#[derive(Debug, Clone)]
pub struct RenderCompiler<I> {
    inner: I,
    stack: Vec<ModifierKind>,
    cumul_transform_stack: Vec<Transform2>,
    cumul_color_stack: Vec<Rgba<f32>>,
}

#[derive(Debug, Copy, Clone)]
enum ModifierKind {
    Transform,
    Color,
}

impl<I> RenderCompiler<I> {
    pub fn new(inner: I, base_transform: Transform2) -> Self {
        RenderCompiler {
            inner,
            stack: Vec::new(),
            cumul_transform_stack: vec![base_transform],
            cumul_color_stack: vec![Rgba::white()],
        }
    }

    pub fn transform(&self) -> Transform2 {
        // the base entry is never popped
        self.cumul_transform_stack[self.cumul_transform_stack.len() - 1]
    }

    pub fn color(&self) -> Rgba<f32> {
        self.cumul_color_stack[self.cumul_color_stack.len() - 1]
    }
}

impl<'a, I> Iterator for RenderCompiler<I>
where
    I: Iterator<Item=(usize, &'a FrameItem)>,
{
    type Item = RenderInstr<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (stack_len, item) = self.inner.next()?;

            while self.stack.len() > stack_len {
                match self.stack.pop() {
                    Some(ModifierKind::Transform) => {
                        self.cumul_transform_stack.pop();
                    }
                    Some(ModifierKind::Color) => {
                        self.cumul_color_stack.pop();
                    }
                    None => unreachable!(),
                }
            }

            match item {
                &FrameItem::PushModifier2(Modifier2::Transform(t)) => {
                    let cumul = t.then(&self.transform());
                    self.cumul_transform_stack.push(cumul);
                    self.stack.push(ModifierKind::Transform);
                }
                &FrameItem::PushModifier2(Modifier2::Color(c)) => {
                    let cumul = c * self.color();
                    self.cumul_color_stack.push(cumul);
                    self.stack.push(ModifierKind::Color);
                }
                &FrameItem::Draw2(ref obj) => {
                    return Some(RenderInstr {
                        obj,
                        transform: self.transform(),
                        color: self.color(),
                    });
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_ndc() {
        let t = pixels_to_ndc(Extent2::new(1024.0, 512.0));
        assert_eq!(t.apply([0.0, 0.0]), Vec2::new(-1.0, 1.0));
        assert_eq!(t.apply([512.0, 256.0]), Vec2::new(0.0, 0.0));
        assert_eq!(t.apply([1024.0, 512.0]), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn modifiers_accumulate_and_pop() {
        let mut frame = FrameContent::new();
        let mut canvas = frame.canvas();
        {
            let mut inner = canvas.reborrow()
                .translate([10.0, 0.0])
                .color([0.5, 1.0, 1.0, 1.0]);
            inner.reborrow()
                .scale([2.0, 2.0])
                .color([0.5, 1.0, 1.0, 0.5])
                .draw_line([0.0, 0.0], [1.0, 1.0]);
            inner.reborrow().draw_line([0.0, 0.0], [1.0, 1.0]);
        }
        canvas.reborrow().draw_line([0.0, 0.0], [1.0, 1.0]);

        let instrs = RenderCompiler::new(
            frame.0.iter().map(|&(n, ref item)| (n, item)),
            Transform2(Mat3::identity()),
        ).collect::<Vec<_>>();
        assert_eq!(instrs.len(), 3);

        // translate applied outside of scale
        assert_eq!(instrs[0].transform.apply([1.0, 1.0]), Vec2::new(12.0, 2.0));
        assert_eq!(instrs[0].color, Rgba::new(0.25, 1.0, 1.0, 0.5));

        assert_eq!(instrs[1].transform.apply([1.0, 1.0]), Vec2::new(11.0, 1.0));
        assert_eq!(instrs[1].color, Rgba::new(0.5, 1.0, 1.0, 1.0));

        assert_eq!(instrs[2].transform, Transform2(Mat3::identity()));
        assert_eq!(instrs[2].color, Rgba::white());
    }
}
