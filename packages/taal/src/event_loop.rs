//! The window, its event loop, and the per-frame update/draw cycle.

use crate::{
    config::DemoConfig,
    input::InputState,
    palette,
    session::Session,
};
use graphics::{
    Renderer,
    RendererOptions,
};
use std::{
    path::Path,
    sync::Arc,
    time::{
        Duration,
        Instant,
    },
};
use winit::{
    dpi::LogicalSize,
    event_loop::{
        ControlFlow,
        EventLoop,
    },
    window::{
        Window,
        WindowBuilder,
    },
    event::{
        Event,
        WindowEvent,
    },
};
use pollster::FutureExt;
use anyhow::*;
use vek::*;


/// Time between frame starts at `target_fps`, or `None` if unpaced.
pub fn frame_duration_target(target_fps: u32) -> Option<Duration> {
    if target_fps == 0 {
        None
    } else {
        Some(Duration::from_secs(1) / target_fps)
    }
}

/// When the frame after one started at `frame_start` is due, or `None` if
/// frames are unpaced and always due.
pub fn next_frame_target(frame_start: Instant, target_fps: u32) -> Option<Instant> {
    frame_duration_target(target_fps).map(|budget| frame_start + budget)
}

/// Whether a frame should be drawn at `now`.
pub fn frame_is_due(now: Instant, next_frame_target: Option<Instant>) -> bool {
    next_frame_target.map(|target| now >= target).unwrap_or(true)
}

pub struct DemoEventLoop {
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    pub renderer: Renderer,
    high_dpi: bool,
}

impl DemoEventLoop {
    /// Open the window and create its renderer.
    pub fn new(config: &DemoConfig) -> Result<Self> {
        let event_loop = EventLoop::new();
        let window = WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
            .with_resizable(config.window.resizable)
            .build(&event_loop)
            .context("failed to build window")?;
        let window = Arc::new(window);

        let mut renderer = Renderer::new(
            Arc::clone(&window),
            RendererOptions {
                msaa: config.window.msaa,
                vsync: config.window.vsync,
            },
        )
            .block_on()
            .context("failed to create renderer")?;
        if !config.window.high_dpi {
            renderer.set_scale_factor(1.0);
        }
        renderer.set_clear_color(palette::clear_color());
        info!(
            size = ?renderer.size(),
            scale_factor = renderer.scale_factor(),
            "opened window",
        );

        Ok(DemoEventLoop {
            event_loop,
            window,
            renderer,
            high_dpi: config.window.high_dpi,
        })
    }

    /// Run the demo until the window is closed.
    pub fn run(self, session: Session, target_fps: u32) -> ! {
        let DemoEventLoop {
            event_loop,
            window,
            mut renderer,
            high_dpi,
        } = self;
        let mut input = InputState::new(renderer.scale_factor());
        let mut session = Some(session);
        let mut next_frame: Option<Instant> = None;

        event_loop.run(move |event, _target, control_flow| match event {
            Event::WindowEvent { event, window_id } if window_id == window.id() => {
                match &event {
                    &WindowEvent::Resized(size) => {
                        renderer.resize(Extent2::new(size.width, size.height));
                    }
                    &WindowEvent::ScaleFactorChanged { scale_factor, ref new_inner_size } => {
                        if high_dpi {
                            renderer.set_scale_factor(scale_factor as f32);
                        }
                        renderer.resize(Extent2::new(new_inner_size.width, new_inner_size.height));
                    }
                    _ => (),
                }
                let scale_event = matches!(event, WindowEvent::ScaleFactorChanged { .. });
                if high_dpi || !scale_event {
                    input.on_window_event(&event);
                }
            }
            Event::MainEventsCleared => {
                let session = match session.as_mut() {
                    Some(session) => session,
                    None => return,
                };

                let now = Instant::now();
                if !frame_is_due(now, next_frame) {
                    return;
                }
                next_frame = next_frame_target(now, target_fps);

                let frame_input = input.sample();
                if frame_input.close_requested {
                    info!("close requested");
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                session.update(&frame_input, now);
                let frame = session.draw(&renderer);
                if let Err(e) = renderer.draw_frame(&frame) {
                    error!("failed to draw frame: {:#}", e);
                }
            }
            Event::RedrawEventsCleared => {
                // wait for the next frame without blocking input events
                if *control_flow != ControlFlow::Exit {
                    *control_flow = match next_frame {
                        Some(target) => ControlFlow::WaitUntil(target),
                        None => ControlFlow::Poll,
                    };
                }
            }
            Event::LoopDestroyed => {
                if let Some(session) = session.take() {
                    info!("releasing session");
                    drop(session);
                }
            }
            _ => (),
        });
    }
}

/// Open the window and run the demo, with resources from the given
/// directory.
pub fn run(config: DemoConfig, resources: &Path) -> Result<()> {
    let mut event_loop = DemoEventLoop::new(&config)?;
    let session = Session::load(&mut event_loop.renderer, resources, &config)?;
    event_loop.run(session, config.target_fps)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_frame_is_one_budget_after_start() {
        let start = Instant::now();
        assert_eq!(frame_duration_target(100), Some(Duration::from_millis(10)));
        assert_eq!(
            next_frame_target(start, 100),
            Some(start + Duration::from_millis(10)),
        );
    }

    #[test]
    fn frame_is_due_only_once_target_is_reached() {
        let start = Instant::now();
        let target = next_frame_target(start, 100);
        assert!(!frame_is_due(start, target));
        assert!(!frame_is_due(start + Duration::from_millis(9), target));
        assert!(frame_is_due(start + Duration::from_millis(10), target));
        assert!(frame_is_due(start + Duration::from_millis(25), target));
    }

    #[test]
    fn unpaced_frames_are_always_due() {
        let start = Instant::now();
        assert_eq!(frame_duration_target(0), None);
        assert_eq!(next_frame_target(start, 0), None);
        assert!(frame_is_due(start, None));
    }
}
