pub mod commands;
pub mod constants;
pub mod overlay;
pub mod render;
