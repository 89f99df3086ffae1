use crate::error::{RenderError, Result};
use crate::rendering::backend::*;
use crate::rendering::data::TextureHandle;
use crate::rendering::dfield::DistanceField;
use gl::types::*;
use std::ffi::CString;
use std::ptr;

/// backend issuing the calls on the current OpenGL context
///
/// The gl function pointers have to be loaded (``gl::load_with``) and a context has to be current
/// before any method is called. The video system takes care of both.
pub struct GlBackend {
    out_color: CString,
}

impl GlBackend {
    /// creates the backend for the context that is current on this thread
    pub fn new() -> Self {
        Self {
            out_color: c"out_color".to_owned(),
        }
    }
}

impl Default for GlBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsBackend for GlBackend {
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<GLuint> {
        let c_str = CString::new(source.as_bytes()).map_err(|e| RenderError::ShaderCompile {
            stage,
            log: e.to_string(),
        })?;
        unsafe {
            let shader = gl::CreateShader(stage.gl_type());
            gl::ShaderSource(shader, 1, &c_str.as_ptr(), ptr::null());
            gl::CompileShader(shader);

            let mut status = gl::FALSE as GLint;
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);

            if status != (gl::TRUE as GLint) {
                let mut len = 0;
                gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
                let mut buf = vec![0u8; len.max(1) as usize];
                gl::GetShaderInfoLog(
                    shader,
                    len,
                    ptr::null_mut(),
                    buf.as_mut_ptr() as *mut GLchar,
                );
                gl::DeleteShader(shader);
                return Err(RenderError::ShaderCompile {
                    stage,
                    log: info_log_to_string(buf),
                });
            }
            log::trace!("compiled {stage} shader {shader}");
            Ok(shader)
        }
    }

    fn delete_shader(&mut self, shader: GLuint) {
        unsafe {
            gl::DeleteShader(shader);
        }
    }

    fn link_program(&mut self, vertex: GLuint, fragment: GLuint) -> Result<GLuint> {
        unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vertex);
            gl::AttachShader(program, fragment);
            gl::BindFragDataLocation(program, 0, self.out_color.as_ptr());
            gl::LinkProgram(program);

            gl::DetachShader(program, fragment);
            gl::DetachShader(program, vertex);
            gl::DeleteShader(fragment);
            gl::DeleteShader(vertex);

            let mut status = gl::FALSE as GLint;
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);

            if status != (gl::TRUE as GLint) {
                let mut len: GLint = 0;
                gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
                let mut buf = vec![0u8; len.max(1) as usize];
                gl::GetProgramInfoLog(
                    program,
                    len,
                    ptr::null_mut(),
                    buf.as_mut_ptr() as *mut GLchar,
                );
                gl::DeleteProgram(program);
                return Err(RenderError::ShaderLink(info_log_to_string(buf)));
            }
            Ok(program)
        }
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> Option<GLint> {
        let c_name = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(program, c_name.as_ptr()) };
        (location >= 0).then_some(location)
    }

    fn delete_program(&mut self, program: GLuint) {
        unsafe {
            gl::DeleteProgram(program);
        }
    }

    fn create_vertex_array(&mut self) -> GLuint {
        let mut vao = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
        }
        vao
    }

    fn create_stream_buffer(&mut self, vertex_array: GLuint, size: usize) -> GLuint {
        let mut buffer = 0;
        unsafe {
            gl::BindVertexArray(vertex_array);
            gl::GenBuffers(1, &mut buffer);
            gl::BindBuffer(gl::ARRAY_BUFFER, buffer);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                size as GLsizeiptr,
                ptr::null(),
                gl::STREAM_DRAW,
            );
            gl::BindVertexArray(0);
        }
        buffer
    }

    fn upload_buffer(&mut self, buffer: GLuint, data: &[u8]) {
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, buffer);
            gl::BufferSubData(
                gl::ARRAY_BUFFER,
                0,
                data.len() as GLsizeiptr,
                data.as_ptr() as *const GLvoid,
            );
        }
    }

    fn bind_attributes(&mut self, vertex_array: GLuint, attributes: &[InstanceAttribute]) {
        unsafe {
            gl::BindVertexArray(vertex_array);
            for attribute in attributes {
                gl::BindBuffer(gl::ARRAY_BUFFER, attribute.buffer);
                gl::EnableVertexAttribArray(attribute.index);
                gl::VertexAttribPointer(
                    attribute.index,
                    attribute.components,
                    attribute.ty.gl_type(),
                    gl::FALSE,
                    attribute.stride,
                    attribute.offset as *const GLvoid,
                );
                gl::VertexAttribDivisor(attribute.index, attribute.divisor);
            }
            gl::BindVertexArray(0);
        }
    }

    fn delete_buffer(&mut self, buffer: GLuint) {
        unsafe {
            gl::DeleteBuffers(1, &buffer);
        }
    }

    fn delete_vertex_array(&mut self, vertex_array: GLuint) {
        unsafe {
            gl::DeleteVertexArrays(1, &vertex_array);
        }
    }

    fn enable_alpha_blending(&mut self) {
        unsafe {
            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
        }
    }

    fn create_texture(&mut self, field: &DistanceField) -> TextureHandle {
        let mut tex_id = 0;
        unsafe {
            gl::GenTextures(1, &mut tex_id);
            gl::BindTexture(gl::TEXTURE_2D, tex_id);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as GLint);
            // rows are tightly packed
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RED as GLint,
                field.width() as GLsizei,
                field.height() as GLsizei,
                0,
                gl::RED,
                gl::UNSIGNED_BYTE,
                field.samples().as_ptr() as *const GLvoid,
            );
            gl::BindTexture(gl::TEXTURE_2D, 0);
        }
        TextureHandle(tex_id)
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        unsafe {
            gl::DeleteTextures(1, &texture.0);
        }
    }

    fn begin_frame(&mut self, width: u32, height: u32, clear_color: [GLfloat; 4]) {
        let [r, g, b, a] = clear_color;
        unsafe {
            gl::Viewport(0, 0, width as GLsizei, height as GLsizei);
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    fn draw_instanced(&mut self, call: &DrawCall) {
        unsafe {
            gl::BindVertexArray(call.vertex_array);
            gl::UseProgram(call.program);

            gl::ActiveTexture(gl::TEXTURE0);
            gl::BindTexture(gl::TEXTURE_2D, call.texture);
            gl::Uniform1i(call.sampler_location, 0);

            gl::DrawArraysInstanced(
                gl::TRIANGLE_STRIP,
                0,
                call.vertex_count,
                call.instance_count,
            );
            gl::BindVertexArray(0);
        }
    }
}

/// turns a null terminated info log into a string
fn info_log_to_string(mut buf: Vec<u8>) -> String {
    if let Some(end) = buf.iter().position(|b| *b == 0) {
        buf.truncate(end);
    }
    String::from_utf8_lossy(&buf).trim_end().to_string()
}
