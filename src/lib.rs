/// Interactive command shell
pub mod app;
/// Behavior modules compiled into the binary
pub mod plugins;
