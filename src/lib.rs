//! Puzzle pack generator: an image upload widget controller and the
//! `/generate` server it talks to.

pub mod config;
pub mod console;
pub mod error;
pub mod server;
pub mod widget;

pub use error::{PackError, WidgetError};
