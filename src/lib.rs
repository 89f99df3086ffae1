pub mod engine;
pub mod engine_builder;
pub mod error;
pub mod game;
pub mod player;
pub mod rendering;
pub mod systems;
pub mod utils;

pub use env_logger;
pub use log;
pub use nalgebra_glm as glm;
pub use winit;

/// All features that are very common to use.
pub mod prelude {
    pub use crate::engine::Engine;
    pub use crate::engine_builder::EngineAttributes;
    pub use crate::error::{RenderError, Result};
    pub use crate::game::Game;
    pub use crate::glm;
    pub use crate::player::Player;
    pub use crate::rendering::backend::{FrameTarget, GraphicsBackend};
    pub use crate::rendering::data::{Color32, SpriteId, SpriteTransform, TextureHandle};
    pub use crate::rendering::dfield::DistanceField;
    pub use crate::rendering::gl_backend::GlBackend;
    pub use crate::rendering::headless::{HeadlessBackend, HeadlessSurface};
    pub use crate::rendering::sprite_renderer::{SpriteBatcher, SpritePool};
    pub use crate::systems::event_system::events::*;
    pub use crate::utils::constants::{CLEAR_COLOR, MAX_SPRITES, SAMPLER_UNIFORM};
    pub use gl::types::*;
}
