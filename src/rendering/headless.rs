use crate::error::{RenderError, Result};
use crate::rendering::backend::*;
use crate::rendering::data::TextureHandle;
use crate::rendering::dfield::DistanceField;
use gl::types::*;
use std::cell::Cell;
use std::collections::HashMap;

/// a texture as the headless backend stores it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessTexture {
    pub width: u8,
    pub height: u8,
    pub samples: Vec<u8>,
}

/// backend keeping all gpu state in host memory
///
/// Records what a real driver would end up holding (buffer contents, attribute bindings, textures)
/// plus every issued draw call and the number of buffer uploads. Shader "compilation" only checks
/// for an entry point and uniform lookups scan the ``uniform`` declarations of the sources.
#[derive(Debug)]
pub struct HeadlessBackend {
    next_id: GLuint,
    shaders: HashMap<GLuint, String>,
    programs: HashMap<GLuint, String>,
    vertex_arrays: HashMap<GLuint, Vec<InstanceAttribute>>,
    buffers: HashMap<GLuint, Vec<u8>>,
    textures: HashMap<GLuint, HeadlessTexture>,
    blending: bool,
    viewport: (u32, u32),
    clear_color: [GLfloat; 4],
    draws: Vec<DrawCall>,
    uploads: usize,
    link_error: Option<String>,
}

impl HeadlessBackend {
    /// creates an empty backend
    pub fn new() -> Self {
        Self {
            next_id: 1,
            shaders: HashMap::new(),
            programs: HashMap::new(),
            vertex_arrays: HashMap::new(),
            buffers: HashMap::new(),
            textures: HashMap::new(),
            blending: false,
            viewport: (0, 0),
            clear_color: [0.0; 4],
            draws: Vec::new(),
            uploads: 0,
            link_error: None,
        }
    }

    /// makes the next link fail with the given linker log
    pub fn fail_next_link(&mut self, log: &str) {
        self.link_error = Some(log.to_string());
    }

    /// number of buffer uploads so far
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    /// all draw calls in the order they were issued
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draws
    }

    pub fn last_draw(&self) -> Option<&DrawCall> {
        self.draws.last()
    }

    /// current contents of a buffer
    pub fn buffer(&self, buffer: GLuint) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(|data| data.as_slice())
    }

    /// the first ``count`` floats stored in a buffer
    pub fn buffer_floats(&self, buffer: GLuint, count: usize) -> Vec<GLfloat> {
        self.buffer(buffer)
            .map(|data| bytemuck::pod_collect_to_vec(&data[..count * size_of::<GLfloat>()]))
            .unwrap_or_default()
    }

    /// the attribute bindings of a vertex array
    pub fn attributes(&self, vertex_array: GLuint) -> &[InstanceAttribute] {
        self.vertex_arrays
            .get(&vertex_array)
            .map(|attributes| attributes.as_slice())
            .unwrap_or_default()
    }

    pub fn texture(&self, texture: TextureHandle) -> Option<&HeadlessTexture> {
        self.textures.get(&texture.0)
    }

    pub fn blending_enabled(&self) -> bool {
        self.blending
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn clear_color(&self) -> [GLfloat; 4] {
        self.clear_color
    }

    /// number of objects not deleted yet
    pub fn live_objects(&self) -> usize {
        self.shaders.len()
            + self.programs.len()
            + self.vertex_arrays.len()
            + self.buffers.len()
            + self.textures.len()
    }

    fn gen_id(&mut self) -> GLuint {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<GLuint> {
        if !source.contains("main") {
            return Err(RenderError::ShaderCompile {
                stage,
                log: "ERROR: 0:1: 'main' : function not defined".to_string(),
            });
        }
        let id = self.gen_id();
        self.shaders.insert(id, source.to_string());
        Ok(id)
    }

    fn delete_shader(&mut self, shader: GLuint) {
        self.shaders.remove(&shader);
    }

    fn link_program(&mut self, vertex: GLuint, fragment: GLuint) -> Result<GLuint> {
        let vs = self.shaders.remove(&vertex);
        let fs = self.shaders.remove(&fragment);
        if let Some(log) = self.link_error.take() {
            return Err(RenderError::ShaderLink(log));
        }
        let (Some(vs), Some(fs)) = (vs, fs) else {
            return Err(RenderError::ShaderLink(
                "attached shader was never compiled".to_string(),
            ));
        };
        let id = self.gen_id();
        self.programs.insert(id, vs + "\n" + &fs);
        Ok(id)
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> Option<GLint> {
        self.programs
            .get(&program)?
            .lines()
            .filter_map(|line| line.trim().strip_prefix("uniform "))
            .filter_map(|decl| decl.trim_end_matches(';').split_whitespace().last())
            .position(|declared| declared == name)
            .map(|pos| pos as GLint)
    }

    fn delete_program(&mut self, program: GLuint) {
        self.programs.remove(&program);
    }

    fn create_vertex_array(&mut self) -> GLuint {
        let id = self.gen_id();
        self.vertex_arrays.insert(id, Vec::new());
        id
    }

    fn create_stream_buffer(&mut self, _vertex_array: GLuint, size: usize) -> GLuint {
        let id = self.gen_id();
        self.buffers.insert(id, vec![0; size]);
        id
    }

    fn upload_buffer(&mut self, buffer: GLuint, data: &[u8]) {
        let storage = self
            .buffers
            .get_mut(&buffer)
            .unwrap_or_else(|| panic!("upload to unknown buffer {buffer}"));
        assert!(
            data.len() <= storage.len(),
            "upload of {} bytes overflows buffer {buffer} of {} bytes",
            data.len(),
            storage.len()
        );
        storage[..data.len()].copy_from_slice(data);
        self.uploads += 1;
    }

    fn bind_attributes(&mut self, vertex_array: GLuint, attributes: &[InstanceAttribute]) {
        let bound = self.vertex_arrays.entry(vertex_array).or_default();
        for attribute in attributes {
            bound.retain(|a| a.index != attribute.index);
            bound.push(*attribute);
        }
        bound.sort_by_key(|a| a.index);
    }

    fn delete_buffer(&mut self, buffer: GLuint) {
        self.buffers.remove(&buffer);
    }

    fn delete_vertex_array(&mut self, vertex_array: GLuint) {
        self.vertex_arrays.remove(&vertex_array);
    }

    fn enable_alpha_blending(&mut self) {
        self.blending = true;
    }

    fn create_texture(&mut self, field: &DistanceField) -> TextureHandle {
        let id = self.gen_id();
        self.textures.insert(
            id,
            HeadlessTexture {
                width: field.width(),
                height: field.height(),
                samples: field.samples().to_vec(),
            },
        );
        TextureHandle(id)
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        self.textures.remove(&texture.0);
    }

    fn begin_frame(&mut self, width: u32, height: u32, clear_color: [GLfloat; 4]) {
        self.viewport = (width, height);
        self.clear_color = clear_color;
    }

    fn draw_instanced(&mut self, call: &DrawCall) {
        self.draws.push(*call);
    }
}

/// frame target without a window, counts the presented frames
#[derive(Debug)]
pub struct HeadlessSurface {
    size: Cell<(u32, u32)>,
    presented: Cell<usize>,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Cell::new((width, height)),
            presented: Cell::new(0),
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.size.set((width, height));
    }

    /// number of frames presented so far
    pub fn presented(&self) -> usize {
        self.presented.get()
    }
}

impl FrameTarget for HeadlessSurface {
    fn frame_size(&self) -> (u32, u32) {
        self.size.get()
    }

    fn present(&self) -> Result<()> {
        self.presented.set(self.presented.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::shader::ShaderProgram;

    const VERT: &str = "#version 330 core\nvoid main() {}\n";
    const FRAG: &str = "#version 330 core\nuniform float fade;\nuniform sampler2D texture_unit;\nvoid main() {}\n";

    #[test]
    fn uniform_lookup_scans_declarations() {
        let mut backend = HeadlessBackend::new();
        let vs = backend.compile_shader(ShaderStage::Vertex, VERT).unwrap();
        let fs = backend.compile_shader(ShaderStage::Fragment, FRAG).unwrap();
        let program = backend.link_program(vs, fs).unwrap();
        assert_eq!(backend.uniform_location(program, "fade"), Some(0));
        assert_eq!(backend.uniform_location(program, "texture_unit"), Some(1));
        assert_eq!(backend.uniform_location(program, "missing"), None);
    }

    #[test]
    fn uploads_overwrite_buffer_prefix() {
        let mut backend = HeadlessBackend::new();
        let vao = backend.create_vertex_array();
        let buffer = backend.create_stream_buffer(vao, 4);
        backend.upload_buffer(buffer, &[1, 2]);
        assert_eq!(backend.buffer(buffer), Some(&[1, 2, 0, 0][..]));
        assert_eq!(backend.upload_count(), 1);
        backend.delete_buffer(buffer);
        backend.delete_vertex_array(vao);
        assert_eq!(backend.live_objects(), 0);
    }

    #[test]
    fn buffers_read_back_as_floats() {
        let mut backend = HeadlessBackend::new();
        let vao = backend.create_vertex_array();
        let buffer = backend.create_stream_buffer(vao, 3 * size_of::<GLfloat>());
        let floats: [GLfloat; 2] = [0.5, -2.0];
        backend.upload_buffer(buffer, bytemuck::cast_slice(&floats));
        assert_eq!(backend.buffer_floats(buffer, 3), vec![0.5, -2.0, 0.0]);
        assert!(backend.buffer_floats(vao, 1).is_empty());
    }

    #[test]
    fn failed_fragment_stage_releases_the_vertex_stage() {
        let mut backend = HeadlessBackend::new();
        let res = ShaderProgram::from_sources(&mut backend, VERT, "#version 330 core\n");
        assert!(matches!(
            res,
            Err(RenderError::ShaderCompile {
                stage: ShaderStage::Fragment,
                ..
            })
        ));
        assert_eq!(backend.live_objects(), 0);
    }

    #[test]
    fn surface_counts_frames() {
        let surface = HeadlessSurface::new(800, 600);
        surface.present().unwrap();
        surface.present().unwrap();
        surface.resize(10, 20);
        assert_eq!(surface.presented(), 2);
        assert_eq!(surface.frame_size(), (10, 20));
    }
}
