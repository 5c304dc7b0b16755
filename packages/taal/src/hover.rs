//! Finding the bol under the pointer.

use crate::composition::Composition;
use vek::*;


/// Whether `point` lies in `rect`, edges included.
pub fn rect_contains(rect: Rect<f32, f32>, point: Vec2<f32>) -> bool {
    point.x >= rect.x
        && point.x <= rect.x + rect.w
        && point.y >= rect.y
        && point.y <= rect.y + rect.h
}

/// Index of the first cell, in sequence order, whose world rectangle contains
/// the pointer.
pub fn locate_hover(composition: &Composition, pointer_world: Vec2<f32>) -> Option<usize> {
    (0..composition.len())
        .find(|&i| rect_contains(composition.world_rect(i), pointer_world))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bol::Bol,
        composition::BolCell,
        layout::LayoutParams,
    };

    fn laid_out() -> Composition {
        let mut composition = Composition::tintal_theka(Vec2::new(200.0, 250.0));
        composition.layout(&LayoutParams::tintal()).unwrap();
        composition
    }

    #[test]
    fn center_of_each_cell_hovers_it() {
        let composition = laid_out();
        for i in 0..composition.len() {
            let center = composition.world_rect(i).center();
            assert_eq!(locate_hover(&composition, center), Some(i));
        }
    }

    #[test]
    fn margins_and_outside_hover_nothing() {
        let composition = laid_out();
        // gap between cells 0 and 1
        assert_eq!(locate_hover(&composition, Vec2::new(297.0, 270.0)), None);
        assert_eq!(locate_hover(&composition, Vec2::new(-1000.0, 0.0)), None);
        assert_eq!(locate_hover(&composition, Vec2::new(1000.0, 1000.0)), None);
    }

    #[test]
    fn edges_are_inclusive() {
        let composition = laid_out();
        let rect = composition.world_rect(0);
        assert_eq!(locate_hover(&composition, rect.position()), Some(0));
        assert_eq!(
            locate_hover(&composition, Vec2::new(rect.x + rect.w, rect.y + rect.h)),
            Some(0),
        );
    }

    #[test]
    fn first_overlapping_cell_wins() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let composition = Composition {
            cells: vec![
                BolCell { bol: Bol::Na, rect: Rect::new(50.0, 50.0, 10.0, 10.0) },
                BolCell { bol: Bol::Ta, rect },
                BolCell { bol: Bol::Ge, rect },
            ],
            origin: Vec2::zero(),
            hovered: None,
        };
        assert_eq!(locate_hover(&composition, Vec2::new(5.0, 5.0)), Some(1));
    }

    #[test]
    fn empty_composition_hovers_nothing() {
        let composition = Composition::new(Vec::<Bol>::new(), Vec2::zero());
        assert_eq!(locate_hover(&composition, Vec2::zero()), None);
    }
}
