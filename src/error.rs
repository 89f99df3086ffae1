use crate::rendering::backend::ShaderStage;
use crate::rendering::data::SpriteId;
use std::path::PathBuf;

/// alias for results of the rendering and asset code
pub type Result<T> = std::result::Result<T, RenderError>;

/// everything that can go wrong while setting up or driving the sprite renderer
///
/// None of these are recoverable. The engine stops the event loop on the first one and hands it
/// back to ``main``.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt distance field {path:?}: expected {expected} bytes, found {actual}")]
    CorruptFile {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
    #[error("compilation error in {stage} shader:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },
    #[error("shader program failed to link:\n{0}")]
    ShaderLink(String),
    #[error("could not get uniform location of {0:?}")]
    UniformNotFound(String),
    #[error("out of memory")]
    OutOfMemory,
    #[error("sprite pool exhausted (capacity {capacity})")]
    PoolExhausted { capacity: usize },
    #[error("invalid sprite handle {0}")]
    InvalidHandle(SpriteId),
    #[error("window error: {0}")]
    Window(String),
}

impl RenderError {
    /// wraps an io error together with the file it happened on
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<std::collections::TryReserveError> for RenderError {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::OutOfMemory
    }
}
