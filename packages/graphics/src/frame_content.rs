
use crate::modifier::{
    Modifier2,
    Transform2,
};
use vek::*;


pub use crate::pipelines::{
    image::{
        GpuImage,
        DrawImage,
    },
    line::DrawLine,
    rounded::DrawRoundedRect,
    text::{
        TextBlock,
        TextSpan,
        HAlign,
        VAlign,
        LayedOutTextBlock,
        FontId,
    },
};


/// Display list for a single frame.
///
/// Each item is paired with the depth of the modifier stack it sits under, so
/// that popping modifiers is implicit in the next item's stack depth.
#[derive(Debug, Clone, Default)]
pub struct FrameContent(pub Vec<(usize, FrameItem)>);

#[derive(Debug, Clone)]
pub enum FrameItem {
    PushModifier2(Modifier2),
    Draw2(DrawObj2),
}

#[derive(Debug, Clone)]
pub enum DrawObj2 {
    RoundedRect(DrawRoundedRect),
    Line(DrawLine),
    Image(DrawImage),
    Text(LayedOutTextBlock),
}

#[derive(Debug)]
pub struct Canvas2<'b> {
    target: &'b mut FrameContent,
    stack_len: usize,
}

impl FrameContent {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn canvas<'b>(&'b mut self) -> Canvas2<'b> {
        Canvas2 {
            target: self,
            stack_len: 0,
        }
    }

    /// Number of draw objects in the frame.
    pub fn num_draws(&self) -> usize {
        self.0
            .iter()
            .filter(|(_, item)| matches!(item, FrameItem::Draw2(_)))
            .count()
    }

    /// Render the display list as indented pseudo-XML, for debugging.
    pub fn to_pseudo_xml(&self) -> String {
        use std::fmt::Write;

        const INDENT: &str = "    ";

        fn indent(buf: &mut String, depth: usize) {
            for _ in 0..depth {
                buf.push_str(INDENT);
            }
        }

        let mut buf = String::new();
        let mut tag_stack: Vec<&'static str> = Vec::new();

        // writing into a String cannot fail
        for &(stack_len, ref item) in &self.0 {
            while tag_stack.len() > stack_len {
                let tag = tag_stack.pop().unwrap();
                indent(&mut buf, tag_stack.len());
                let _ = writeln!(&mut buf, "</{}>", tag);
            }
            indent(&mut buf, tag_stack.len());
            match item {
                &FrameItem::PushModifier2(Modifier2::Transform(Transform2(mat))) => {
                    let [
                        m00, m01, m02,
                        m10, m11, m12,
                        m20, m21, m22,
                    ] = mat.into_row_array();
                    let _ = writeln!(
                        &mut buf,
                        "<transform mat=\"{:.2},{:.2},{:.2}; {:.2},{:.2},{:.2}; {:.2},{:.2},{:.2}\">",
                        m00, m01, m02,
                        m10, m11, m12,
                        m20, m21, m22,
                    );
                    tag_stack.push("transform");
                }
                &FrameItem::PushModifier2(Modifier2::Color(Rgba { r, g, b, a })) => {
                    let _ = writeln!(&mut buf, "<color rgba=\"{:.2},{:.2},{:.2},{:.2}\">", r, g, b, a);
                    tag_stack.push("color");
                }
                &FrameItem::Draw2(ref obj) => match obj {
                    DrawObj2::RoundedRect(r) => {
                        let _ = writeln!(
                            &mut buf,
                            "<rounded size=\"{:.2},{:.2}\" radius=\"{:.2}\" thickness=\"{:.2}\"/>",
                            r.size.w, r.size.h, r.radius, r.thickness,
                        );
                    }
                    DrawObj2::Line(l) => {
                        let _ = writeln!(
                            &mut buf,
                            "<line start=\"{:.2},{:.2}\" end=\"{:.2},{:.2}\"/>",
                            l.start.x, l.start.y, l.end.x, l.end.y,
                        );
                    }
                    DrawObj2::Image(i) => {
                        let _ = writeln!(
                            &mut buf,
                            "<image texstart=\"{:.2},{:.2}\" texextent=\"{:.2},{:.2}\"/>",
                            i.tex_start.x,
                            i.tex_start.y,
                            i.tex_extent.w,
                            i.tex_extent.h,
                        );
                    }
                    DrawObj2::Text(_) => buf.push_str("<text/>\n"),
                },
            }
        }
        while let Some(tag) = tag_stack.pop() {
            indent(&mut buf, tag_stack.len());
            let _ = writeln!(&mut buf, "</{}>", tag);
        }
        buf
    }
}

impl<'b> Canvas2<'b> {
    pub fn reborrow<'b2>(&'b2 mut self) -> Canvas2<'b2> {
        Canvas2 {
            target: self.target,
            stack_len: self.stack_len,
        }
    }

    fn push(&mut self, item: FrameItem) {
        self.target.0.push((self.stack_len, item));
    }

    pub fn modify<I: Into<Modifier2>>(mut self, modifier: I) -> Self {
        self.push(FrameItem::PushModifier2(modifier.into()));
        self.stack_len += 1;
        self
    }

    pub fn translate<V: Into<Vec2<f32>>>(self, v: V) -> Self {
        self.modify(Transform2::translate(v))
    }

    pub fn scale<V: Into<Vec2<f32>>>(self, v: V) -> Self {
        self.modify(Transform2::scale(v))
    }

    pub fn color<C: Into<Rgba<f32>>>(self, c: C) -> Self {
        self.modify(c.into())
    }

    pub fn draw<I: Into<DrawObj2>>(mut self, obj: I) -> Self {
        self.push(FrameItem::Draw2(obj.into()));
        self
    }

    /// Fill the rectangle from <0,0> to `size` with corners of the given
    /// radius.
    pub fn draw_rounded_rect<V: Into<Extent2<f32>>>(self, size: V, radius: f32) -> Self {
        self.draw(DrawObj2::RoundedRect(DrawRoundedRect {
            size: size.into(),
            radius,
            thickness: 0.0,
        }))
    }

    /// Stroke the inside edge of the rounded rectangle from <0,0> to `size`.
    pub fn draw_rounded_rect_outline<V: Into<Extent2<f32>>>(
        self,
        size: V,
        radius: f32,
        thickness: f32,
    ) -> Self {
        self.draw(DrawObj2::RoundedRect(DrawRoundedRect {
            size: size.into(),
            radius,
            thickness,
        }))
    }

    /// Draw a one pixel wide line segment.
    pub fn draw_line<V1, V2>(self, start: V1, end: V2) -> Self
    where
        V1: Into<Vec2<f32>>,
        V2: Into<Vec2<f32>>,
    {
        self.draw(DrawObj2::Line(DrawLine {
            start: start.into(),
            end: end.into(),
        }))
    }

    pub fn draw_image<V: Into<Extent2<f32>>>(
        self,
        image: &GpuImage,
        size: V,
    ) -> Self
    {
        self
            .draw_image_uv(
                image,
                size,
                [0.0, 0.0],
                [1.0, 1.0],
            )
    }

    pub fn draw_image_uv<V1, V2, V3>(
        mut self,
        image: &GpuImage,
        size: V1,
        tex_start: V2,
        tex_extent: V3,
    ) -> Self
    where
        V1: Into<Extent2<f32>>,
        V2: Into<Vec2<f32>>,
        V3: Into<Extent2<f32>>,
    {
        self
            .reborrow()
            .scale(size.into())
            .draw(DrawObj2::Image(DrawImage {
                image: image.clone(),
                tex_start: tex_start.into(),
                tex_extent: tex_extent.into(),
            }));
        self
    }

    pub fn draw_text(self, text: &LayedOutTextBlock) -> Self {
        self.draw(DrawObj2::Text(text.clone()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reborrowed_modifiers_do_not_leak() {
        let mut frame = FrameContent::new();
        let mut canvas = frame.canvas();
        canvas.reborrow()
            .translate([1.0, 2.0])
            .draw_line([0.0, 0.0], [1.0, 1.0]);
        canvas.reborrow().draw_line([0.0, 0.0], [2.0, 2.0]);

        let depths = frame.0
            .iter()
            .map(|&(depth, _)| depth)
            .collect::<Vec<_>>();
        assert_eq!(depths, vec![0, 1, 0]);
        assert_eq!(frame.num_draws(), 2);
    }

    #[test]
    fn pseudo_xml_closes_tags() {
        let mut frame = FrameContent::new();
        frame.canvas()
            .color([1.0, 0.0, 0.0, 1.0])
            .draw_rounded_rect([10.0, 10.0], 2.0);
        let xml = frame.to_pseudo_xml();
        assert!(xml.starts_with("<color"));
        assert!(xml.contains("<rounded size=\"10.00,10.00\" radius=\"2.00\" thickness=\"0.00\"/>"));
        assert!(xml.trim_end().ends_with("</color>"));
        assert_eq!(xml.matches("<transform").count(), xml.matches("</transform>").count());
    }
}
