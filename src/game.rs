use crate::error::Result;
use crate::glm;
use crate::player::Player;
use crate::rendering::backend::{FrameTarget, GraphicsBackend};
use crate::rendering::data::{Color32, SpriteId, TextureHandle};
use crate::rendering::sprite_renderer::SpriteBatcher;
use crate::systems::event_system::{EventObserver, InputEvent};
use crate::utils::timing::FrameCounter;
use std::path::Path;
use std::time::Duration;

const SHIP_COLOR: Color32 = Color32::BLACK;
const SHIP_SCALE: f32 = 0.1;
const SHIP_START: (f32, f32) = (0.5, 0.1);

/// the demo itself: one keyboard controlled ship sprite
pub struct Game<B: GraphicsBackend> {
    batcher: SpriteBatcher<B>,
    player: Player,
    ship: SpriteId,
    frames: FrameCounter,
}

impl<B: GraphicsBackend> Game<B> {
    /// loads the ship texture and spawns the ship
    pub fn new(mut batcher: SpriteBatcher<B>, texture_file: impl AsRef<Path>) -> Result<Self> {
        let texture = batcher.load_texture(texture_file)?;
        Self::with_texture(batcher, texture)
    }

    /// spawns the ship with an already loaded texture
    pub fn with_texture(mut batcher: SpriteBatcher<B>, texture: TextureHandle) -> Result<Self> {
        let ship = batcher.spawn(texture, SHIP_COLOR)?;
        batcher.set_scale(ship, SHIP_SCALE, SHIP_SCALE)?;
        batcher.set_position(ship, SHIP_START.0, SHIP_START.1)?;

        Ok(Self {
            batcher,
            player: Player::new(glm::vec2(SHIP_START.0, SHIP_START.1)),
            ship,
            frames: FrameCounter::default(),
        })
    }

    /// forwards input to the player
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyPress(press) => self.player.on_event(press),
            InputEvent::KeyRelease(release) => self.player.on_event(release),
            _ => (),
        }
    }

    /// one frame: advance the player, move the ship, render, account the frame time
    ///
    /// Yields the average fps whenever a full reporting interval has passed.
    pub fn tick(&mut self, target: &impl FrameTarget, elapsed: Duration) -> Result<Option<f64>> {
        self.player.update();

        let position = self.player.position();
        self.batcher.set_position(self.ship, position.x, position.y)?;
        self.batcher.set_rotation(self.ship, self.player.rotation())?;

        self.batcher.render(target)?;

        Ok(self.frames.tick(elapsed))
    }

    pub fn batcher(&self) -> &SpriteBatcher<B> {
        &self.batcher
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// the sprite of the ship
    pub fn ship(&self) -> SpriteId {
        self.ship
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::dfield::DistanceField;
    use crate::rendering::headless::{HeadlessBackend, HeadlessSurface};
    use crate::systems::event_system::events::KeyPress;
    use winit::keyboard::KeyCode;

    const VERT: &str = "#version 330 core\nvoid main() {}\n";
    const FRAG: &str = "#version 330 core\nuniform sampler2D texture_unit;\nvoid main() {}\n";

    fn game() -> Game<HeadlessBackend> {
        let mut batcher =
            SpriteBatcher::from_sources(HeadlessBackend::new(), FRAG, VERT, 8).unwrap();
        let field = DistanceField::from_samples(2, 2, vec![255; 4]).unwrap();
        let texture = batcher.upload_texture(&field);
        Game::with_texture(batcher, texture).unwrap()
    }

    #[test]
    fn ship_starts_scaled_at_start_position() {
        let game = game();
        let trafo = game.batcher().sprites().transform(game.ship()).unwrap();
        assert_eq!(trafo.to_floats(), [0.5, 0.1, 0.1, 0.1, 0.0]);
        assert_eq!(
            game.batcher().sprites().color(game.ship()).unwrap(),
            Color32::from_rgba(0, 0, 0, 255)
        );
    }

    #[test]
    fn tick_pushes_player_state_into_the_sprite() {
        let mut game = game();
        let surface = HeadlessSurface::new(800, 600);
        game.handle_event(&InputEvent::KeyPress(KeyPress {
            key: KeyCode::ArrowRight,
            is_synthetic: false,
            is_repeat: false,
        }));
        game.tick(&surface, Duration::from_millis(16)).unwrap();

        let player = game.player().clone();
        let trafo = *game.batcher().sprites().transform(game.ship()).unwrap();
        assert_eq!(trafo.rotation, player.rotation());
        assert_eq!(trafo.position, [player.position().x, player.position().y]);

        let tbo = game.batcher().transform_buffer();
        let uploaded = game.batcher().backend().buffer_floats(tbo, 5);
        assert_eq!(uploaded, trafo.to_floats().to_vec());
        assert_eq!(surface.presented(), 1);
    }

    #[test]
    fn tick_reports_fps_every_second() {
        let mut game = game();
        let surface = HeadlessSurface::new(800, 600);
        let frame = Duration::from_millis(100);
        let reports: Vec<f64> = (0..20)
            .filter_map(|_| game.tick(&surface, frame).unwrap())
            .collect();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|fps| (fps - 10.0).abs() < 1e-6));
    }
}
