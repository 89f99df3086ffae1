use crate::engine_builder::EngineAttributes;
use crate::error::{RenderError, Result};
use crate::game::Game;
use crate::rendering::gl_backend::GlBackend;
use crate::rendering::sprite_renderer::SpriteBatcher;
use crate::systems::event_system::{EventObserver, EventSystem, InputEvent};
use crate::systems::video_system::VideoSystem;
use std::error::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

/// main engine: owns the window, the renderer and the game and drives them from the event loop
pub struct Engine {
    config: EngineAttributes,
    game: Option<Game<GlBackend>>,
    exit_state: Option<Result<()>>,
    event_system: EventSystem,
    video_system: VideoSystem,
}

impl Engine {
    /// engine setup on startup
    pub(crate) fn new(config: EngineAttributes) -> Result<Self> {
        Ok(Self {
            video_system: VideoSystem::new(config.clone()),
            config,
            game: None,
            exit_state: Some(Ok(())),
            event_system: EventSystem::new(),
        })
    }

    /// runs the main loop until the window is closed or an error occurs
    pub fn run(&mut self) -> std::result::Result<(), Box<dyn Error>> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(self)?;
        self.exit_state.take().unwrap_or(Ok(()))?;
        Ok(())
    }

    /// creates the renderer on the now current context and sets up the game
    fn init_game(&mut self) -> Result<()> {
        let batcher = SpriteBatcher::new(
            GlBackend::new(),
            &self.config.fragment_shader,
            &self.config.vertex_shader,
            self.config.max_sprites,
        )?;
        self.game = Some(Game::new(batcher, &self.config.texture)?);
        log::info!("game initialized");
        Ok(())
    }

    /// gets called every frame: handles the queued input and runs one game tick
    fn on_frame_redraw(&mut self) -> Result<()> {
        let Some(game) = self.game.as_mut() else {
            return Ok(());
        };
        while let Some(event) = self.event_system.poll() {
            match event {
                InputEvent::WindowResize(resize) => self.video_system.on_event(&resize),
                input => game.handle_event(&input),
            }
        }

        let elapsed = self.video_system.update_draw_timer();
        if let Some(fps) = game.tick(&self.video_system, elapsed)? {
            let title = format!("{} ({fps:.0} fps)", self.video_system.base_title());
            self.video_system.set_window_title(&title);
        }
        Ok(())
    }

    /// stores the first error and stops the event loop
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RenderError) {
        log::error!("{error}");
        if !matches!(self.exit_state, Some(Err(_))) {
            self.exit_state = Some(Err(error));
        }
        event_loop.exit();
    }

    /// access to the engines video system
    pub fn video_system(&self) -> &VideoSystem {
        &self.video_system
    }

    /// access to the running game (present once the window is open)
    pub fn game(&self) -> Option<&Game<GlBackend>> {
        self.game.as_ref()
    }
}

impl ApplicationHandler for Engine {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(e) = self.video_system.on_resumed(event_loop) {
            self.fail(event_loop, e);
            return;
        }
        if self.game.is_none() {
            if let Err(e) = self.init_game() {
                self.fail(event_loop, e);
                return;
            }
        }
        self.video_system.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.on_frame_redraw() {
                    self.fail(event_loop, e);
                }
            }
            _ => {
                self.event_system.parse_winit_window_event(&event);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.video_system.is_ready() && self.video_system.should_redraw() {
            self.video_system.request_redraw();
        }
        std::thread::sleep(self.config.idle_sleep);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.video_system.on_suspended();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // gpu objects have to go while the context is still alive
        self.game = None;
        self.video_system.shutdown();
    }
}
