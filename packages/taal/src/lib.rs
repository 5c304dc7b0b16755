//! A pan/zoom view over a composition of tabla bols.

#[macro_use]
extern crate tracing;


pub mod assets;
pub mod bol;
pub mod camera;
pub mod composition;
pub mod config;
pub mod draw;
pub mod event_loop;
pub mod hover;
pub mod input;
pub mod layout;
pub mod logging;
pub mod overlay;
pub mod palette;
pub mod resource_dir;
pub mod session;
