use crate::engine_builder::EngineAttributes;
use crate::error::{RenderError, Result};
use crate::rendering::backend::FrameTarget;
use crate::systems::event_system::events::WindowResize;
use crate::systems::event_system::EventObserver;
use gl::types::GLsizei;
use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use std::ffi::{CStr, CString};
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

/// holds the window and the OpenGL context/surface it is rendered through
pub struct VideoSystem {
    config_template: ConfigTemplateBuilder,
    display_builder: DisplayBuilder,
    not_current_gl_context: Option<NotCurrentContext>,
    gl_context: Option<PossiblyCurrentContext>,
    gl_surface: Option<Surface<WindowSurface>>,
    window: Option<Window>,
    last_draw_time: Instant,
    fps_cap: Option<f64>,
    stored_config: EngineAttributes,
}

impl VideoSystem {
    /// creates a new video system, nothing is opened until the app is resumed
    pub(crate) fn new(config: EngineAttributes) -> Self {
        let window_attributes = config.generate_win_attrs();

        #[allow(unexpected_cfgs)]
        let config_template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_transparency(cfg!(cgl_backend));

        let display_builder = DisplayBuilder::new().with_window_attributes(Some(window_attributes));

        Self {
            config_template,
            display_builder,
            not_current_gl_context: None,
            gl_context: None,
            gl_surface: None,
            window: None,
            last_draw_time: Instant::now(),
            fps_cap: config.fps_cap,
            stored_config: config,
        }
    }

    /// opens the window, creates a current gl context for it and loads the gl functions
    pub(crate) fn on_resumed(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (mut window, gl_config) = self
            .display_builder
            .clone()
            .build(event_loop, self.config_template.clone(), gl_config_picker)
            .map_err(|e| RenderError::Window(e.to_string()))?;

        log::info!("Picked a config with {} samples", gl_config.num_samples());

        let raw_window_handle = window
            .as_ref()
            .and_then(|window| window.window_handle().ok())
            .map(|handle| handle.as_raw());

        let gl_display = gl_config.display();

        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(raw_window_handle);

        let not_current_gl_context = match self.not_current_gl_context.take() {
            Some(context) => context,
            None => unsafe {
                gl_display
                    .create_context(&gl_config, &context_attributes)
                    .map_err(|e| RenderError::Window(format!("failed to create context: {e}")))?
            },
        };

        let window = match window.take() {
            Some(window) => window,
            None => glutin_winit::finalize_window(
                event_loop,
                self.stored_config.generate_win_attrs(),
                &gl_config,
            )
            .map_err(|e| RenderError::Window(e.to_string()))?,
        };

        let attrs = window
            .build_surface_attributes(Default::default())
            .map_err(|e| RenderError::Window(format!("failed to build surface attributes: {e}")))?;

        let gl_surface = unsafe {
            gl_config
                .display()
                .create_window_surface(&gl_config, &attrs)
                .map_err(|e| RenderError::Window(e.to_string()))?
        };

        // the context has to be current for the function loading and every later gl call
        let gl_context = not_current_gl_context
            .make_current(&gl_surface)
            .map_err(|e| RenderError::Window(e.to_string()))?;

        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });
        log_gl_config();

        self.gl_context = Some(gl_context);
        self.gl_surface = Some(gl_surface);
        self.window = Some(window);

        let vsync = if self.stored_config.use_vsync {
            self.enable_vsync()
        } else {
            self.disable_vsync()
        };
        if let Err(e) = vsync {
            log::warn!("Error setting vsync: {e}");
        }

        Ok(())
    }

    /// called when the app is suspended (only raised on Android)
    pub(crate) fn on_suspended(&mut self) {
        log::info!("Android window removed");

        // un-current the context before the window goes away
        self.gl_surface = None;
        self.window = None;
        if let Some(gl_context) = self.gl_context.take() {
            match gl_context.make_not_current() {
                Ok(context) => self.not_current_gl_context = Some(context),
                Err(e) => log::error!("could not release gl context: {e}"),
            }
        }
    }

    /// releases the gl context and surface first, then the window
    pub(crate) fn shutdown(&mut self) {
        self.gl_surface = None;
        self.gl_context = None;
        self.not_current_gl_context = None;
        self.window = None;
        log::debug!("video system shut down");
    }

    /// wether or not a window with a current context exists
    pub fn is_ready(&self) -> bool {
        self.gl_context.is_some() && self.gl_surface.is_some() && self.window.is_some()
    }

    /// enables vsync for opengl
    pub fn enable_vsync(&mut self) -> Result<()> {
        log::debug!("enabled vsync");
        self.set_swap_interval(SwapInterval::Wait(NonZeroU32::MIN))
    }

    /// disables vsync for opengl
    pub fn disable_vsync(&mut self) -> Result<()> {
        log::debug!("disabled vsync");
        self.set_swap_interval(SwapInterval::DontWait)
    }

    fn set_swap_interval(&self, interval: SwapInterval) -> Result<()> {
        match (self.gl_surface.as_ref(), self.gl_context.as_ref()) {
            (Some(gl_surface), Some(gl_context)) => gl_surface
                .set_swap_interval(gl_context, interval)
                .map_err(|e| RenderError::Window(e.to_string())),
            _ => Err(RenderError::Window("no gl surface".to_string())),
        }
    }

    /// requests a redraw of the winit window
    pub(crate) fn request_redraw(&self) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    /// resets the internal draw timer, yields the time since the last draw
    pub(crate) fn update_draw_timer(&mut self) -> Duration {
        let elapsed_draw_time = self.last_draw_time.elapsed();
        self.last_draw_time = Instant::now();
        elapsed_draw_time
    }

    /// checks wether or not the next frame is due according to the fps cap
    pub(crate) fn should_redraw(&self) -> bool {
        let elapsed = self.last_draw_time.elapsed();
        self.fps_cap
            .map_or(true, |fps| elapsed >= Duration::from_secs_f64(1.0 / fps))
    }

    /// changes the title bar text in the window
    pub fn set_window_title(&self, title: &str) {
        if let Some(window) = self.window.as_ref() {
            window.set_title(title);
        }
    }

    /// the title the window was configured with
    pub fn base_title(&self) -> &str {
        &self.stored_config.title
    }
}

impl FrameTarget for VideoSystem {
    fn frame_size(&self) -> (u32, u32) {
        self.window
            .as_ref()
            .map(|window| {
                let size = window.inner_size();
                (size.width, size.height)
            })
            .unwrap_or(self.stored_config.size)
    }

    fn present(&self) -> Result<()> {
        match (self.gl_surface.as_ref(), self.gl_context.as_ref()) {
            (Some(gl_surface), Some(gl_context)) => gl_surface
                .swap_buffers(gl_context)
                .map_err(|e| RenderError::Window(e.to_string())),
            _ => Ok(()),
        }
    }
}

impl EventObserver<WindowResize> for VideoSystem {
    fn on_event(&mut self, event: &WindowResize) {
        // some platforms (EGL) need the surface resized explicitly
        if let (Some(gl_surface), Some(gl_context), Some(width), Some(height)) = (
            self.gl_surface.as_ref(),
            self.gl_context.as_ref(),
            NonZeroU32::new(event.width),
            NonZeroU32::new(event.height),
        ) {
            gl_surface.resize(gl_context, width, height);
            unsafe {
                gl::Viewport(0, 0, event.width as GLsizei, event.height as GLsizei);
            }
        }
    }
}

/// prints info about the used gl renderer
fn log_gl_config() {
    if let Some(renderer) = get_gl_string(gl::RENDERER) {
        log::info!("Running on {}", renderer.to_string_lossy());
    }
    if let Some(version) = get_gl_string(gl::VERSION) {
        log::info!("OpenGL Version {}", version.to_string_lossy());
    }
    if let Some(shaders_version) = get_gl_string(gl::SHADING_LANGUAGE_VERSION) {
        log::info!("Shaders version on {}", shaders_version.to_string_lossy());
    }
}

/// find the config with the maximum number of samples
fn gl_config_picker(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|accum, config| {
            let transparency_check = config.supports_transparency().unwrap_or(false)
                & !accum.supports_transparency().unwrap_or(false);

            if transparency_check || config.num_samples() > accum.num_samples() {
                config
            } else {
                accum
            }
        })
        .expect("display offers no gl config")
}

/// retrieves a string value from gl
fn get_gl_string(variant: gl::types::GLenum) -> Option<&'static CStr> {
    unsafe {
        let s = gl::GetString(variant);
        (!s.is_null()).then(|| CStr::from_ptr(s.cast()))
    }
}
