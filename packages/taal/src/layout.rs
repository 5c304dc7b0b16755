//! Arranging bols into rows and cycles.

use crate::composition::BolCell;
use anyhow::*;
use vek::*;


/// Parameters for laying out a sequence of bols.
#[derive(Debug, Copy, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Bols per row.
    pub row_len: usize,
    /// Bols per cycle, a multiple of `row_len`.
    pub cycle_len: usize,
    /// Horizontal space each bol occupies, including its margins.
    pub cell_width: f32,
    /// Vertical space each bol occupies, including its margins.
    pub cell_height: f32,
    /// Space on each side of a bol's rectangle.
    pub margin: f32,
    /// Additional vertical space before each cycle after the first.
    pub cycle_gap: f32,
}

impl LayoutParams {
    /// Rows of 8 and cycles of 16, as for tintal.
    pub fn tintal() -> Self {
        LayoutParams {
            row_len: 8,
            cycle_len: 16,
            cell_width: 100.0,
            cell_height: 50.0,
            margin: 5.0,
            cycle_gap: 50.0,
        }
    }

    /// Size of each bol's rectangle.
    pub fn rect_size(&self) -> Extent2<f32> {
        Extent2::new(
            self.cell_width - 2.0 * self.margin,
            self.cell_height - 2.0 * self.margin,
        )
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.row_len > 0, "layout row length must be positive");
        ensure!(self.cycle_len > 0, "layout cycle length must be positive");
        ensure!(
            self.cycle_len % self.row_len == 0,
            "layout cycle length {} is not a multiple of row length {}",
            self.cycle_len,
            self.row_len,
        );
        ensure!(
            self.margin.is_finite() && self.margin >= 0.0,
            "layout margin {} must be finite and non-negative",
            self.margin,
        );
        ensure!(
            self.cycle_gap.is_finite() && self.cycle_gap >= 0.0,
            "layout cycle gap {} must be finite and non-negative",
            self.cycle_gap,
        );
        let size = self.rect_size();
        ensure!(
            size.w.is_finite() && size.h.is_finite() && size.w > 0.0 && size.h > 0.0,
            "layout cell {}x{} leaves no room inside margin {}",
            self.cell_width,
            self.cell_height,
            self.margin,
        );
        Ok(())
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        LayoutParams::tintal()
    }
}

/// Assign each cell its rectangle, left to right and top to bottom from
/// `<margin, margin>`.
///
/// Crossing a row boundary starts a new line one cell lower. Crossing a cycle
/// boundary additionally starts a new line `cycle_gap + margin` lower. Both
/// advances apply when a boundary is both.
///
/// Fails if `params` is invalid. Besides positive lengths, this requires
/// `cycle_len` to be a multiple of `row_len`, so that every cycle starts on
/// a new row.
pub fn layout(cells: &mut [BolCell], params: &LayoutParams) -> Result<()> {
    params.validate()?;

    let size = params.rect_size();
    let mut pos = Vec2::new(params.margin, params.margin);
    for (i, cell) in cells.iter_mut().enumerate() {
        if i > 0 {
            if i % params.row_len == 0 {
                pos.x = params.margin;
                pos.y += size.h + 2.0 * params.margin;
            }
            if i % params.cycle_len == 0 {
                pos.x = params.margin;
                pos.y += params.cycle_gap + params.margin;
            }
        }

        cell.rect = Rect::new(pos.x, pos.y, size.w, size.h);
        pos.x += size.w + 2.0 * params.margin;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::bol::Bol;

    fn cells(n: usize) -> Vec<BolCell> {
        (0..n).map(|_| BolCell::new(Bol::Dha)).collect()
    }

    fn overlaps(a: Rect<f32, f32>, b: Rect<f32, f32>) -> bool {
        a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
    }

    #[test]
    fn tintal_scenario() {
        let mut cells = cells(16);
        layout(&mut cells, &LayoutParams::tintal()).unwrap();

        assert_eq!(cells[0].rect, Rect::new(5.0, 5.0, 90.0, 40.0));
        assert_eq!(cells[1].rect.position(), Vec2::new(105.0, 5.0));
        assert_eq!(cells[7].rect.position(), Vec2::new(705.0, 5.0));
        assert_eq!(cells[8].rect.position(), Vec2::new(5.0, 55.0));
        assert_eq!(cells[15].rect.position(), Vec2::new(705.0, 55.0));
    }

    #[test]
    fn cycle_boundary_adds_gap_to_row_advance() {
        let mut cells = cells(20);
        layout(&mut cells, &LayoutParams {
            row_len: 4,
            cycle_len: 8,
            ..LayoutParams::tintal()
        }).unwrap();

        // rows only
        assert_eq!(cells[4].rect.position(), Vec2::new(5.0, 55.0));
        // row and cycle: 55 + 50 + (50 + 5)
        assert_eq!(cells[8].rect.position(), Vec2::new(5.0, 160.0));
        assert_eq!(cells[12].rect.position(), Vec2::new(5.0, 210.0));
        assert_eq!(cells[16].rect.position(), Vec2::new(5.0, 315.0));
    }

    #[test]
    fn every_rect_has_the_inner_cell_size() {
        let mut cells = cells(16);
        let params = LayoutParams::tintal();
        layout(&mut cells, &params).unwrap();
        for cell in &cells {
            assert_eq!(cell.rect.extent(), params.rect_size());
        }
    }

    #[test]
    fn rects_do_not_overlap() {
        let base = LayoutParams::tintal();
        let params = [
            base,
            LayoutParams { row_len: 3, cycle_len: 9, margin: 0.0, cycle_gap: 0.0, ..base },
            LayoutParams { row_len: 4, cycle_len: 4, ..base },
            LayoutParams { row_len: 1, cycle_len: 1, margin: 0.0, cycle_gap: 0.0, ..base },
            LayoutParams { row_len: 5, cycle_len: 10, margin: 2.5, cycle_gap: 7.0, ..base },
            LayoutParams { row_len: 2, cycle_len: 6, cell_width: 10.0, cell_height: 30.0, margin: 1.0, ..base },
        ];
        for params in params {
            let mut cells = cells(40);
            layout(&mut cells, &params).unwrap();
            for i in 0..cells.len() {
                for j in i + 1..cells.len() {
                    assert!(
                        !overlaps(cells[i].rect, cells[j].rect),
                        "cells {} and {} overlap with {:?}",
                        i,
                        j,
                        params,
                    );
                }
            }
        }
    }

    #[test]
    fn empty_sequence_is_a_no_op() {
        layout(&mut [], &LayoutParams::tintal()).unwrap();
    }

    #[test]
    fn invalid_params_are_rejected() {
        let base = LayoutParams::tintal();
        let invalid = [
            LayoutParams { row_len: 0, ..base },
            LayoutParams { cycle_len: 0, ..base },
            LayoutParams { cycle_len: 12, ..base },
            LayoutParams { margin: -1.0, ..base },
            LayoutParams { margin: f32::NAN, ..base },
            LayoutParams { cycle_gap: f32::INFINITY, ..base },
            LayoutParams { cell_height: 10.0, ..base },
        ];
        for params in invalid {
            assert!(layout(&mut cells(1), &params).is_err(), "{:?}", params);
            assert!(layout(&mut [], &params).is_err(), "{:?}", params);
        }
    }
}
