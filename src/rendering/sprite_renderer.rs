use crate::error::{RenderError, Result};
use crate::rendering::backend::*;
use crate::rendering::data::*;
use crate::rendering::dfield::DistanceField;
use crate::rendering::shader::ShaderProgram;
use crate::utils::constants::{CLEAR_COLOR, SAMPLER_UNIFORM};
use gl::types::*;
use std::path::Path;

/// the quad every sprite instance is drawn with (triangle strip)
const QUAD_VERTEX_COUNT: GLsizei = 4;

/// fixed-capacity, append-only host storage of all sprite records
#[derive(Debug)]
pub struct SpritePool {
    transforms: Vec<SpriteTransform>,
    colors: Vec<Color32>,
    textures: Vec<TextureHandle>,
    capacity: usize,
    dirty: bool,
}

impl SpritePool {
    /// allocates storage for ``capacity`` sprites up front
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut transforms = Vec::new();
        transforms.try_reserve_exact(capacity)?;
        let mut colors = Vec::new();
        colors.try_reserve_exact(capacity)?;
        let mut textures = Vec::new();
        textures.try_reserve_exact(capacity)?;

        Ok(Self {
            transforms,
            colors,
            textures,
            capacity,
            dirty: true,
        })
    }

    /// appends a sprite at the identity transform
    pub fn spawn(&mut self, texture: TextureHandle, color: Color32) -> Result<SpriteId> {
        if self.transforms.len() == self.capacity {
            return Err(RenderError::PoolExhausted {
                capacity: self.capacity,
            });
        }
        let id = SpriteId(self.transforms.len());
        self.transforms.push(SpriteTransform::IDENTITY);
        self.colors.push(color);
        self.textures.push(texture);
        self.dirty = true;
        Ok(id)
    }

    pub fn set_position(&mut self, id: SpriteId, x: GLfloat, y: GLfloat) -> Result<()> {
        self.record_mut(id)?.position = [x, y];
        Ok(())
    }

    pub fn set_scale(&mut self, id: SpriteId, width: GLfloat, height: GLfloat) -> Result<()> {
        self.record_mut(id)?.scale = [width, height];
        Ok(())
    }

    pub fn set_rotation(&mut self, id: SpriteId, radians: GLfloat) -> Result<()> {
        self.record_mut(id)?.rotation = radians;
        Ok(())
    }

    /// the transform record of a sprite
    pub fn transform(&self, id: SpriteId) -> Result<&SpriteTransform> {
        self.transforms
            .get(id.0)
            .ok_or(RenderError::InvalidHandle(id))
    }

    pub fn color(&self, id: SpriteId) -> Result<Color32> {
        self.colors
            .get(id.0)
            .copied()
            .ok_or(RenderError::InvalidHandle(id))
    }

    /// the texture the sprite was spawned with
    pub fn texture_of(&self, id: SpriteId) -> Result<TextureHandle> {
        self.textures
            .get(id.0)
            .copied()
            .ok_or(RenderError::InvalidHandle(id))
    }

    /// all live transform records in spawn order
    pub fn transforms(&self) -> &[SpriteTransform] {
        &self.transforms
    }

    /// all live colors in spawn order
    pub fn colors(&self) -> &[Color32] {
        &self.colors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// wether or not the records changed since the last gpu sync
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn record_mut(&mut self, id: SpriteId) -> Result<&mut SpriteTransform> {
        let record = self
            .transforms
            .get_mut(id.0)
            .ok_or(RenderError::InvalidHandle(id))?;
        self.dirty = true;
        Ok(record)
    }
}

/// renderer for the sprite pool: mirrors the records into two gpu buffers and draws all sprites
/// with one instanced call
///
/// Only one texture is bound at draw time (the last one loaded). The texture handle passed to
/// ``spawn`` is recorded per sprite but does not influence drawing.
pub struct SpriteBatcher<B: GraphicsBackend> {
    backend: B,
    pool: SpritePool,
    program: ShaderProgram,
    sampler_location: GLint,
    vao: GLuint,
    tbo: GLuint,
    cbo: GLuint,
    textures: Vec<TextureHandle>,
    active_texture: Option<TextureHandle>,
}

impl<B: GraphicsBackend> SpriteBatcher<B> {
    /// creates a renderer for up to ``max_sprites`` sprites with the shaders from the given files
    pub fn new(
        mut backend: B,
        fragment_file: impl AsRef<Path>,
        vertex_file: impl AsRef<Path>,
        max_sprites: usize,
    ) -> Result<Self> {
        check_instance_limit(max_sprites)?;
        let pool = SpritePool::with_capacity(max_sprites)?;
        let program = ShaderProgram::from_files(&mut backend, vertex_file, fragment_file)?;
        Self::with_program(backend, pool, program)
    }

    /// same as ``new`` but with in-memory shader sources
    pub fn from_sources(
        mut backend: B,
        fragment_src: &str,
        vertex_src: &str,
        max_sprites: usize,
    ) -> Result<Self> {
        check_instance_limit(max_sprites)?;
        let pool = SpritePool::with_capacity(max_sprites)?;
        let program = ShaderProgram::from_sources(&mut backend, vertex_src, fragment_src)?;
        Self::with_program(backend, pool, program)
    }

    fn with_program(mut backend: B, pool: SpritePool, program: ShaderProgram) -> Result<Self> {
        let sampler_location = match program.unif_location(&backend, SAMPLER_UNIFORM) {
            Ok(location) => location,
            Err(e) => {
                program.release(&mut backend);
                return Err(e);
            }
        };

        let max_sprites = pool.capacity();
        let vao = backend.create_vertex_array(); // vertex array
        let tbo = backend.create_stream_buffer(vao, max_sprites * size_of::<SpriteTransform>()); // transforms
        let cbo = backend.create_stream_buffer(vao, max_sprites * size_of::<Color32>()); // colors
        backend.enable_alpha_blending();

        log::debug!("created sprite batcher for {max_sprites} sprites");

        Ok(Self {
            backend,
            pool,
            program,
            sampler_location,
            vao,
            tbo,
            cbo,
            textures: Vec::new(),
            active_texture: None,
        })
    }

    /// loads a distance field file and makes it the active texture
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<TextureHandle> {
        let field = DistanceField::load(path.as_ref())?;
        let handle = self.upload_texture(&field);
        log::info!(
            "loaded {}x{} distance field {:?}",
            field.width(),
            field.height(),
            path.as_ref()
        );
        Ok(handle)
    }

    /// uploads an already parsed distance field and makes it the active texture
    pub fn upload_texture(&mut self, field: &DistanceField) -> TextureHandle {
        let handle = self.backend.create_texture(field);
        self.textures.push(handle);
        if let Some(previous) = self.active_texture.replace(handle) {
            log::debug!(
                "texture {} replaces active texture {}",
                handle.id(),
                previous.id()
            );
        }
        handle
    }

    /// adds a sprite with the given color at the identity transform
    pub fn spawn(&mut self, texture: TextureHandle, color: Color32) -> Result<SpriteId> {
        let id = self.pool.spawn(texture, color)?;
        if self.active_texture != Some(texture) {
            log::warn!(
                "sprite {id} uses texture {} which is not the active texture",
                texture.id()
            );
        }
        log::trace!("spawned sprite {id}");
        Ok(id)
    }

    pub fn set_position(&mut self, id: SpriteId, x: GLfloat, y: GLfloat) -> Result<()> {
        self.pool.set_position(id, x, y)
    }

    pub fn set_scale(&mut self, id: SpriteId, width: GLfloat, height: GLfloat) -> Result<()> {
        self.pool.set_scale(id, width, height)
    }

    pub fn set_rotation(&mut self, id: SpriteId, radians: GLfloat) -> Result<()> {
        self.pool.set_rotation(id, radians)
    }

    /// draws all sprites into the target and presents the frame
    ///
    /// Uploads the full records first if anything changed since the last call.
    pub fn render(&mut self, target: &impl FrameTarget) -> Result<()> {
        if self.pool.is_dirty() {
            self.update_buffers();
            self.pool.mark_clean();
        }

        let (width, height) = target.frame_size();
        self.backend.begin_frame(width, height, CLEAR_COLOR);

        self.backend.draw_instanced(&DrawCall {
            program: self.program.id(),
            vertex_array: self.vao,
            texture: self.active_texture.map_or(0, |tex| tex.id()),
            sampler_location: self.sampler_location,
            vertex_count: QUAD_VERTEX_COUNT,
            // bounded by the capacity which is checked on creation
            instance_count: self.pool.len() as GLsizei,
        });

        target.present()
    }

    /// copies all live records to the gpu and rebinds the per-instance attributes
    fn update_buffers(&mut self) {
        self.backend
            .upload_buffer(self.tbo, bytemuck::cast_slice(self.pool.transforms()));
        self.backend
            .upload_buffer(self.cbo, bytemuck::cast_slice(self.pool.colors()));
        self.backend
            .bind_attributes(self.vao, &instance_attributes(self.tbo, self.cbo));
    }

    /// the host side sprite records
    pub fn sprites(&self) -> &SpritePool {
        &self.pool
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// the texture bound when drawing
    pub fn active_texture(&self) -> Option<TextureHandle> {
        self.active_texture
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    pub fn vertex_array(&self) -> GLuint {
        self.vao
    }

    /// the buffer holding the packed transform records
    pub fn transform_buffer(&self) -> GLuint {
        self.tbo
    }

    /// the buffer holding the packed colors
    pub fn color_buffer(&self) -> GLuint {
        self.cbo
    }
}

impl<B: GraphicsBackend> Drop for SpriteBatcher<B> {
    fn drop(&mut self) {
        log::debug!("Dropped SpriteBatcher.");
        for texture in self.textures.drain(..) {
            self.backend.delete_texture(texture);
        }
        self.backend.delete_buffer(self.tbo);
        self.backend.delete_buffer(self.cbo);
        self.backend.delete_vertex_array(self.vao);
        self.program.release(&mut self.backend);
    }
}

/// the instance count of a draw call is a ``GLsizei``, larger pools can never be drawn
fn check_instance_limit(max_sprites: usize) -> Result<()> {
    match GLsizei::try_from(max_sprites) {
        Ok(_) => Ok(()),
        Err(_) => {
            log::error!("{max_sprites} sprites exceed the maximum instance count");
            Err(RenderError::OutOfMemory)
        }
    }
}

/// position (0), scale (1), rotation (2) and color (3), each advancing once per instance
fn instance_attributes(tbo: GLuint, cbo: GLuint) -> [InstanceAttribute; 4] {
    let stride = size_of::<SpriteTransform>() as GLsizei;
    let float = size_of::<GLfloat>();
    let per_instance = |index, buffer, components, ty, stride, offset| InstanceAttribute {
        index,
        buffer,
        components,
        ty,
        stride,
        offset,
        divisor: 1,
    };
    [
        per_instance(0, tbo, 2, AttribType::Float, stride, 0),
        per_instance(1, tbo, 2, AttribType::Float, stride, 2 * float),
        per_instance(2, tbo, 1, AttribType::Float, stride, 4 * float),
        per_instance(
            3,
            cbo,
            4,
            AttribType::UnsignedByte,
            size_of::<Color32>() as GLsizei,
            0,
        ),
    ]
}
