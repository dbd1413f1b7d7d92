//! Line-oriented command surface over a repository.

mod command;
mod render;
mod shell;

pub use render::Renderer;
pub use shell::Shell;
