use crate::error::{RenderError, Result};
use crate::rendering::backend::{GraphicsBackend, ShaderStage};
use gl::types::*;
use std::fs::read_to_string;
use std::path::Path;

/// shader program to render with
#[derive(Debug)]
pub struct ShaderProgram {
    pub(crate) id: GLuint,
}

impl ShaderProgram {
    /// reads, compiles and links a vertex/fragment shader pair
    pub fn from_files(
        backend: &mut impl GraphicsBackend,
        vertex_file: impl AsRef<Path>,
        fragment_file: impl AsRef<Path>,
    ) -> Result<Self> {
        let vertex_file = vertex_file.as_ref();
        let fragment_file = fragment_file.as_ref();
        let vs_src = read_to_string(vertex_file).map_err(|e| RenderError::io(vertex_file, e))?;
        let fs_src =
            read_to_string(fragment_file).map_err(|e| RenderError::io(fragment_file, e))?;
        log::debug!("loaded shaders {:?} and {:?}", vertex_file, fragment_file);
        Self::from_sources(backend, &vs_src, &fs_src)
    }

    /// compiles and links a program from in-memory sources
    pub fn from_sources(
        backend: &mut impl GraphicsBackend,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self> {
        let vs = backend.compile_shader(ShaderStage::Vertex, vertex_src)?;
        let fs = match backend.compile_shader(ShaderStage::Fragment, fragment_src) {
            Ok(fs) => fs,
            Err(e) => {
                backend.delete_shader(vs);
                return Err(e);
            }
        };
        let id = backend.link_program(vs, fs)?;

        Ok(Self { id })
    }

    /// looks up a uniform location, fails if the program has no such uniform
    pub fn unif_location(&self, backend: &impl GraphicsBackend, name: &str) -> Result<GLint> {
        backend
            .uniform_location(self.id, name)
            .filter(|loc| *loc >= 0)
            .ok_or_else(|| RenderError::UniformNotFound(name.to_string()))
    }

    /// the program name on the backend side
    #[inline]
    pub fn id(&self) -> GLuint {
        self.id
    }

    /// deletes the program
    pub(crate) fn release(&self, backend: &mut impl GraphicsBackend) {
        backend.delete_program(self.id);
    }
}
