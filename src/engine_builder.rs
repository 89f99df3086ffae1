use crate::engine::Engine;
use crate::error::Result;
use crate::utils::constants::*;
use crate::utils::file::{get_shader_path, get_texture_path};
use std::path::PathBuf;
use std::time::Duration;
use winit::dpi::LogicalSize;
use winit::window::WindowAttributes;

/// all settings the engine is started with
#[derive(Debug, Clone)]
pub struct EngineAttributes {
    pub(crate) title: String,
    pub(crate) size: (u32, u32),
    pub(crate) resizable: bool,
    pub(crate) use_vsync: bool,
    pub(crate) fps_cap: Option<f64>,
    pub(crate) idle_sleep: Duration,
    pub(crate) max_sprites: usize,
    pub(crate) vertex_shader: PathBuf,
    pub(crate) fragment_shader: PathBuf,
    pub(crate) texture: PathBuf,
}

impl EngineAttributes {
    /// the default settings with assets resolved against ``./assets``
    pub fn new() -> Self {
        Self {
            title: WIN_TITLE.to_string(),
            size: (DEFAULT_WIN_WIDTH, DEFAULT_WIN_HEIGHT),
            resizable: true,
            use_vsync: true,
            fps_cap: None,
            idle_sleep: Duration::from_micros(DEFAULT_IDLE_SLEEP_MICROS),
            max_sprites: MAX_SPRITES,
            vertex_shader: get_shader_path(SPRITE_VERT),
            fragment_shader: get_shader_path(SPRITE_FRAG),
            texture: get_texture_path(SHIP_TEXTURE),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// initial inner window size in logical pixels
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn with_resizable(mut self, flag: bool) -> Self {
        self.resizable = flag;
        self
    }

    pub fn with_vsync(mut self, flag: bool) -> Self {
        self.use_vsync = flag;
        self
    }

    /// limits the number of frames per second (default is no cap)
    pub fn with_fps_cap(mut self, cap: Option<f64>) -> Self {
        self.fps_cap = cap;
        self
    }

    /// how long the loop yields between iterations
    pub fn with_idle_sleep(mut self, sleep: Duration) -> Self {
        self.idle_sleep = sleep;
        self
    }

    pub fn with_max_sprites(mut self, max_sprites: usize) -> Self {
        self.max_sprites = max_sprites;
        self
    }

    pub fn with_shaders(mut self, vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        self.vertex_shader = vertex.into();
        self.fragment_shader = fragment.into();
        self
    }

    /// the distance field the ship is drawn with
    pub fn with_texture(mut self, texture: impl Into<PathBuf>) -> Self {
        self.texture = texture.into();
        self
    }

    /// creates the engine (the window opens once the event loop runs)
    pub fn build_engine(self) -> Result<Engine> {
        Engine::new(self)
    }

    /// winit window attributes for these settings
    pub(crate) fn generate_win_attrs(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.size.0, self.size.1))
            .with_resizable(self.resizable)
    }
}

impl Default for EngineAttributes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo() {
        let config = EngineAttributes::default();
        assert_eq!(config.title, "Small Game");
        assert_eq!(config.size, (800, 600));
        assert_eq!(config.max_sprites, 1024);
        assert!(config.vertex_shader.ends_with("shaders/sprite.vert"));
        assert!(config.texture.ends_with("textures/spaceship.dfield"));
    }

    #[test]
    fn builder_overrides() {
        let config = EngineAttributes::new()
            .with_title("Other")
            .with_size(320, 240)
            .with_max_sprites(4)
            .with_fps_cap(Some(30.0))
            .with_shaders("a.vert", "b.frag");
        assert_eq!(config.title, "Other");
        assert_eq!(config.size, (320, 240));
        assert_eq!(config.max_sprites, 4);
        assert_eq!(config.fps_cap, Some(30.0));
        assert_eq!(config.fragment_shader, PathBuf::from("b.frag"));
    }
}
