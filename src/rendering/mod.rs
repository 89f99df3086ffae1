pub mod backend;
pub mod data;
pub mod dfield;
pub mod gl_backend;
pub mod headless;
pub mod shader;
pub mod sprite_renderer;
