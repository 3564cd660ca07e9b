mod app;
pub(crate) mod markdown;
pub mod render;
mod ui;

pub use app::{App, Message};
