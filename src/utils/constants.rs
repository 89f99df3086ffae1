use gl::types::GLfloat;

pub(crate) const WIN_TITLE: &str = "Small Game";
pub(crate) const DEFAULT_WIN_WIDTH: u32 = 800;
pub(crate) const DEFAULT_WIN_HEIGHT: u32 = 600;

/// maximum number of sprites the demo renderer is created with
pub const MAX_SPRITES: usize = 1024;

/// the sampler uniform every sprite fragment shader has to declare
pub const SAMPLER_UNIFORM: &str = "texture_unit";

/// background color every frame is cleared to
pub const CLEAR_COLOR: [GLfloat; 4] = [1.0, 1.0, 1.0, 1.0];

// default asset files (relative to ./assets)
pub(crate) const SPRITE_VERT: &str = "sprite.vert";
pub(crate) const SPRITE_FRAG: &str = "sprite.frag";
pub(crate) const SHIP_TEXTURE: &str = "spaceship.dfield";

/// time the main loop yields between iterations
pub(crate) const DEFAULT_IDLE_SLEEP_MICROS: u64 = 1000;

/// player physics (per update)
pub mod player {
    pub const ACCELERATION: f32 = 0.0001;
    pub const ACCELERATION_DAMPING: f32 = 0.7;
    pub const ROTATION: f32 = 0.05;
}
