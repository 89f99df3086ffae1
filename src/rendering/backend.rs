use crate::error::Result;
use crate::rendering::data::TextureHandle;
use crate::rendering::dfield::DistanceField;
use gl::types::*;
use std::fmt;

/// the programmable pipeline stages a sprite shader consists of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// the matching gl enum
    pub fn gl_type(&self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// component type of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttribType {
    Float,
    UnsignedByte,
}

impl AttribType {
    pub fn gl_type(&self) -> GLenum {
        match self {
            AttribType::Float => gl::FLOAT,
            AttribType::UnsignedByte => gl::UNSIGNED_BYTE,
        }
    }
}

/// one vertex attribute pointer sourced from a buffer (always unnormalized)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceAttribute {
    pub index: GLuint,
    pub buffer: GLuint,
    pub components: GLint,
    pub ty: AttribType,
    pub stride: GLsizei,
    pub offset: usize,
    /// 1 means one value per instance instead of one per vertex
    pub divisor: GLuint,
}

/// everything needed to issue the instanced sprite draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub program: GLuint,
    pub vertex_array: GLuint,
    pub texture: GLuint,
    pub sampler_location: GLint,
    /// vertices of the triangle strip that makes up one quad
    pub vertex_count: GLsizei,
    pub instance_count: GLsizei,
}

/// the gpu calls the sprite renderer relies on
///
/// ``GlBackend`` talks to the current OpenGL context, ``HeadlessBackend`` keeps everything in host
/// memory so the renderer can be driven without a window.
pub trait GraphicsBackend {
    /// compiles one shader stage, the error carries the compiler log
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<GLuint>;

    /// releases a compiled stage that never got linked
    fn delete_shader(&mut self, shader: GLuint);

    /// links both stages into a program and releases the stage objects
    fn link_program(&mut self, vertex: GLuint, fragment: GLuint) -> Result<GLuint>;

    /// location of a uniform in a linked program if the linker kept it
    fn uniform_location(&self, program: GLuint, name: &str) -> Option<GLint>;

    fn delete_program(&mut self, program: GLuint);

    fn create_vertex_array(&mut self) -> GLuint;

    /// allocates an uninitialized buffer of ``size`` bytes meant to be rewritten every frame
    fn create_stream_buffer(&mut self, vertex_array: GLuint, size: usize) -> GLuint;

    /// overwrites the start of a buffer with ``data``
    fn upload_buffer(&mut self, buffer: GLuint, data: &[u8]);

    /// points the attributes of a vertex array at their buffers
    fn bind_attributes(&mut self, vertex_array: GLuint, attributes: &[InstanceAttribute]);

    fn delete_buffer(&mut self, buffer: GLuint);

    fn delete_vertex_array(&mut self, vertex_array: GLuint);

    /// standard source-over compositing
    fn enable_alpha_blending(&mut self);

    /// uploads a single channel texture with linear filtering and clamped edges
    fn create_texture(&mut self, field: &DistanceField) -> TextureHandle;

    fn delete_texture(&mut self, texture: TextureHandle);

    /// sets the viewport and clears the color buffer
    fn begin_frame(&mut self, width: u32, height: u32, clear_color: [GLfloat; 4]);

    fn draw_instanced(&mut self, call: &DrawCall);
}

/// the surface a frame is rendered into
pub trait FrameTarget {
    /// current size in physical pixels
    fn frame_size(&self) -> (u32, u32);

    /// swaps the presentation buffer
    fn present(&self) -> Result<()>;
}

impl<B: GraphicsBackend + ?Sized> GraphicsBackend for &mut B {
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<GLuint> {
        (**self).compile_shader(stage, source)
    }

    fn delete_shader(&mut self, shader: GLuint) {
        (**self).delete_shader(shader)
    }

    fn link_program(&mut self, vertex: GLuint, fragment: GLuint) -> Result<GLuint> {
        (**self).link_program(vertex, fragment)
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> Option<GLint> {
        (**self).uniform_location(program, name)
    }

    fn delete_program(&mut self, program: GLuint) {
        (**self).delete_program(program)
    }

    fn create_vertex_array(&mut self) -> GLuint {
        (**self).create_vertex_array()
    }

    fn create_stream_buffer(&mut self, vertex_array: GLuint, size: usize) -> GLuint {
        (**self).create_stream_buffer(vertex_array, size)
    }

    fn upload_buffer(&mut self, buffer: GLuint, data: &[u8]) {
        (**self).upload_buffer(buffer, data)
    }

    fn bind_attributes(&mut self, vertex_array: GLuint, attributes: &[InstanceAttribute]) {
        (**self).bind_attributes(vertex_array, attributes)
    }

    fn delete_buffer(&mut self, buffer: GLuint) {
        (**self).delete_buffer(buffer)
    }

    fn delete_vertex_array(&mut self, vertex_array: GLuint) {
        (**self).delete_vertex_array(vertex_array)
    }

    fn enable_alpha_blending(&mut self) {
        (**self).enable_alpha_blending()
    }

    fn create_texture(&mut self, field: &DistanceField) -> TextureHandle {
        (**self).create_texture(field)
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        (**self).delete_texture(texture)
    }

    fn begin_frame(&mut self, width: u32, height: u32, clear_color: [GLfloat; 4]) {
        (**self).begin_frame(width, height, clear_color)
    }

    fn draw_instanced(&mut self, call: &DrawCall) {
        (**self).draw_instanced(call)
    }
}

impl<T: FrameTarget + ?Sized> FrameTarget for &T {
    fn frame_size(&self) -> (u32, u32) {
        (**self).frame_size()
    }

    fn present(&self) -> Result<()> {
        (**self).present()
    }
}
