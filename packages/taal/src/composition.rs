//! A sequence of bols placed in the world.

use crate::{
    bol::Bol,
    layout::{
        layout,
        LayoutParams,
    },
    hover::locate_hover,
};
use anyhow::*;
use vek::*;


/// A bol and the rectangle it is drawn in, relative to its composition's
/// origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BolCell {
    pub bol: Bol,
    pub rect: Rect<f32, f32>,
}

impl BolCell {
    /// A bol not yet laid out.
    pub fn new(bol: Bol) -> Self {
        BolCell {
            bol,
            rect: Rect::new(0.0, 0.0, 0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub cells: Vec<BolCell>,
    /// World position of the layout's origin.
    pub origin: Vec2<f32>,
    /// Index of the cell under the pointer, as of the last hover update.
    pub hovered: Option<usize>,
}

/// Tintal theka, 16 beats in four vibhags of four.
pub const TINTAL_THEKA: [Bol; 16] = [
    Bol::Dha, Bol::Dhin, Bol::Dhin, Bol::Dha,
    Bol::Dha, Bol::Dhin, Bol::Dhin, Bol::Dha,
    Bol::Dha, Bol::Tin, Bol::Tin, Bol::Ta,
    Bol::Ta, Bol::Dhin, Bol::Dhin, Bol::Dha,
];

impl Composition {
    pub fn new<I>(pattern: I, origin: Vec2<f32>) -> Self
    where
        I: IntoIterator<Item=Bol>,
    {
        Composition {
            cells: pattern.into_iter().map(BolCell::new).collect(),
            origin,
            hovered: None,
        }
    }

    pub fn tintal_theka(origin: Vec2<f32>) -> Self {
        Composition::new(TINTAL_THEKA, origin)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Assign every cell its rectangle.
    pub fn layout(&mut self, params: &LayoutParams) -> Result<()> {
        layout(&mut self.cells, params)
    }

    /// Rectangle of cell `i` in world space.
    ///
    /// Panics if `i` is out of bounds.
    pub fn world_rect(&self, i: usize) -> Rect<f32, f32> {
        let rect = self.cells[i].rect;
        Rect::new(
            rect.x + self.origin.x,
            rect.y + self.origin.y,
            rect.w,
            rect.h,
        )
    }

    /// Recompute which cell is under the pointer.
    pub fn update_hover(&mut self, pointer_world: Vec2<f32>) -> Option<usize> {
        self.hovered = locate_hover(self, pointer_world);
        self.hovered
    }

    /// The hovered bol, if any.
    pub fn hovered_bol(&self) -> Option<Bol> {
        self.hovered
            .and_then(|i| self.cells.get(i))
            .map(|cell| cell.bol)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theka_has_sixteen_beats() {
        let composition = Composition::tintal_theka(Vec2::new(200.0, 250.0));
        assert_eq!(composition.len(), 16);
        assert_eq!(composition.cells[0].bol, Bol::Dha);
        assert_eq!(composition.cells[9].bol, Bol::Tin);
        assert_eq!(composition.cells[15].bol, Bol::Dha);
        assert_eq!(composition.hovered, None);
    }

    #[test]
    fn world_rect_is_translated_by_origin() {
        let mut composition = Composition::tintal_theka(Vec2::new(200.0, 250.0));
        composition.layout(&LayoutParams::tintal()).unwrap();
        assert_eq!(composition.world_rect(0), Rect::new(205.0, 255.0, 90.0, 40.0));
        assert_eq!(composition.world_rect(8).position(), Vec2::new(205.0, 305.0));
    }

    #[test]
    fn update_hover_stores_result() {
        let mut composition = Composition::tintal_theka(Vec2::new(200.0, 250.0));
        composition.layout(&LayoutParams::tintal()).unwrap();

        assert_eq!(composition.update_hover(Vec2::new(350.0, 275.0)), Some(1));
        assert_eq!(composition.hovered, Some(1));
        assert_eq!(composition.hovered_bol(), Some(Bol::Dhin));

        assert_eq!(composition.update_hover(Vec2::new(0.0, 0.0)), None);
        assert_eq!(composition.hovered_bol(), None);
    }
}
