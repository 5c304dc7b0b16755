//! 2D camera with pan and cursor-anchored zoom.

use graphics::modifier::Transform2;
use vek::*;


/// Smallest zoom the camera allows.
pub const MIN_ZOOM: f32 = 0.125;

/// Largest zoom the camera allows.
pub const MAX_ZOOM: f32 = 64.0;

/// Zoom change per unit of wheel movement.
const ZOOM_INCREMENT: f32 = 0.25;

/// A 2D view transform.
///
/// The world point `target` is shown at the screen point `offset`, scaled by
/// `zoom`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub target: Vec2<f32>,
    pub offset: Vec2<f32>,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            target: Vec2::zero(),
            offset: Vec2::zero(),
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn screen_to_world(&self, screen: Vec2<f32>) -> Vec2<f32> {
        (screen - self.offset) / self.zoom + self.target
    }

    pub fn world_to_screen(&self, world: Vec2<f32>) -> Vec2<f32> {
        (world - self.target) * self.zoom + self.offset
    }

    /// The world to screen transform, for drawing world space content.
    pub fn transform(&self) -> Transform2 {
        Transform2::translate(-self.target)
            .then(&Transform2::scale(self.zoom))
            .then(&Transform2::translate(self.offset))
    }

    /// Apply one frame of pointer input.
    ///
    /// While `panning`, the world drags along with the pointer. A non-zero
    /// `wheel` zooms in (positive) or out (negative) about the pointer, so
    /// that the world point under it stays put. Zoom is within
    /// `[MIN_ZOOM, MAX_ZOOM]` afterwards, even if it was set outside of it.
    pub fn update(
        &mut self,
        pointer_screen: Vec2<f32>,
        pointer_delta: Vec2<f32>,
        wheel: f32,
        panning: bool,
    ) {
        self.zoom = clamp_zoom(self.zoom);
        let pointer_world = self.screen_to_world(pointer_screen);

        if panning {
            self.target += -pointer_delta / self.zoom;
        }

        if wheel != 0.0 {
            self.offset = pointer_screen;
            self.target = pointer_world;

            let mut factor = 1.0 + ZOOM_INCREMENT * wheel.abs();
            if wheel < 0.0 {
                factor = 1.0 / factor;
            }
            self.zoom = clamp_zoom(self.zoom * factor);
        }
    }
}

/// Clamp a zoom into `[MIN_ZOOM, MAX_ZOOM]`, treating NaN as no zoom.
fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() {
        1.0
    } else {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec2<f32>, b: Vec2<f32>) -> bool {
        (a - b).magnitude() < 1e-3
    }

    #[test]
    fn default_is_identity() {
        let camera = Camera::default();
        let p = Vec2::new(12.0, -7.5);
        assert_eq!(camera.screen_to_world(p), p);
        assert_eq!(camera.world_to_screen(p), p);
    }

    #[test]
    fn wheel_zooms_about_cursor() {
        let mut camera = Camera::default();
        camera.update(Vec2::new(400.0, 300.0), Vec2::zero(), 1.0, false);
        assert_eq!(camera.target, Vec2::new(400.0, 300.0));
        assert_eq!(camera.offset, Vec2::new(400.0, 300.0));
        assert_eq!(camera.zoom, 1.25);
    }

    #[test]
    fn zoom_keeps_world_point_under_cursor() {
        let mut camera = Camera {
            target: Vec2::new(30.0, -20.0),
            offset: Vec2::new(100.0, 50.0),
            zoom: 2.0,
        };
        let cursor = Vec2::new(321.0, 123.0);
        for wheel in [1.0, -3.0, 0.5, 2.0] {
            let before = camera.screen_to_world(cursor);
            camera.update(cursor, Vec2::zero(), wheel, false);
            assert!(approx_eq(camera.screen_to_world(cursor), before));
        }
    }

    #[test]
    fn negative_wheel_inverts_factor() {
        let mut camera = Camera::default();
        camera.update(Vec2::zero(), Vec2::zero(), -1.0, false);
        assert_eq!(camera.zoom, 0.8);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.update(Vec2::new(10.0, 10.0), Vec2::zero(), 3.0, false);
            assert!(camera.zoom <= MAX_ZOOM);
        }
        assert_eq!(camera.zoom, MAX_ZOOM);
        for _ in 0..100 {
            camera.update(Vec2::new(10.0, 10.0), Vec2::zero(), -3.0, false);
            assert!(camera.zoom >= MIN_ZOOM);
        }
        assert_eq!(camera.zoom, MIN_ZOOM);
    }

    #[test]
    fn pan_moves_target_against_delta() {
        let mut camera = Camera {
            zoom: 2.0,
            ..Default::default()
        };
        camera.update(Vec2::new(50.0, 50.0), Vec2::new(10.0, -4.0), 0.0, true);
        assert_eq!(camera.target, Vec2::new(-5.0, 2.0));
        assert_eq!(camera.zoom, 2.0);

        // no pan without the button
        camera.update(Vec2::new(50.0, 50.0), Vec2::new(10.0, -4.0), 0.0, false);
        assert_eq!(camera.target, Vec2::new(-5.0, 2.0));
    }

    #[test]
    fn out_of_range_zoom_is_clamped_by_pan() {
        for zoom in [0.0, -2.0, 1000.0, f32::INFINITY, f32::NAN] {
            let mut camera = Camera {
                zoom,
                ..Default::default()
            };
            camera.update(Vec2::new(10.0, 10.0), Vec2::new(4.0, 4.0), 0.0, true);
            assert!(
                camera.zoom >= MIN_ZOOM && camera.zoom <= MAX_ZOOM,
                "zoom {} became {}", zoom, camera.zoom,
            );
            assert!(camera.target.x.is_finite() && camera.target.y.is_finite());
        }
    }

    #[test]
    fn pan_there_and_back_restores_target() {
        let start = Camera {
            target: Vec2::new(37.0, -12.5),
            offset: Vec2::new(640.0, 400.0),
            zoom: 3.0,
        };
        for delta in [Vec2::new(10.0, -4.0), Vec2::new(-250.5, 99.0), Vec2::new(0.25, 0.0)] {
            let mut camera = start;
            camera.update(Vec2::new(300.0, 200.0), delta, 0.0, true);
            assert_ne!(camera.target, start.target);
            camera.update(Vec2::new(300.0, 200.0) + delta, -delta, 0.0, true);
            assert!(approx_eq(camera.target, start.target), "{:?}", camera.target);
            assert_eq!(camera.zoom, start.zoom);
            assert_eq!(camera.offset, start.offset);
        }
    }

    #[test]
    fn world_and_screen_are_inverse() {
        let camera = Camera {
            target: Vec2::new(-40.0, 12.0),
            offset: Vec2::new(640.0, 400.0),
            zoom: 3.5,
        };
        let p = Vec2::new(17.0, 99.0);
        assert!(approx_eq(camera.screen_to_world(camera.world_to_screen(p)), p));
        assert!(approx_eq(camera.transform().apply(p), camera.world_to_screen(p)));
    }
}
