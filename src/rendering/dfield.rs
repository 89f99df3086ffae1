use crate::error::{RenderError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// size of the ``[width][height]`` header
const HEADER_LEN: usize = 2;

/// single channel coverage image stored as ``[width:u8][height:u8][width * height samples]``
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    width: u8,
    height: u8,
    samples: Vec<u8>,
}

impl DistanceField {
    /// reads and validates a distance field file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| RenderError::io(path, e))?;
        log::debug!("read {} bytes from {:?}", bytes.len(), path);
        Self::parse(&bytes).map_err(|e| match e {
            RenderError::CorruptFile {
                expected, actual, ..
            } => RenderError::CorruptFile {
                path: path.to_path_buf(),
                expected,
                actual,
            },
            other => other,
        })
    }

    /// parses the in-memory encoding, the total length has to match the header exactly
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let [width, height, pixels @ ..] = bytes else {
            return Err(RenderError::CorruptFile {
                path: PathBuf::new(),
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        };
        let expected = HEADER_LEN + *width as usize * *height as usize;
        if bytes.len() != expected {
            return Err(RenderError::CorruptFile {
                path: PathBuf::new(),
                expected,
                actual: bytes.len(),
            });
        }

        let mut samples = Vec::new();
        samples.try_reserve_exact(pixels.len())?;
        samples.extend_from_slice(pixels);

        Ok(Self {
            width: *width,
            height: *height,
            samples,
        })
    }

    /// creates a field from raw samples (row-major)
    pub fn from_samples(width: u8, height: u8, samples: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(RenderError::CorruptFile {
                path: PathBuf::new(),
                expected: HEADER_LEN + expected,
                actual: HEADER_LEN + samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    /// the row-major samples
    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }
}
