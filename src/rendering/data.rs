use bytemuck::{Pod, Zeroable};
use gl::types::*;
use std::fmt;

/// number of floats in one packed sprite transform record
pub const TRANSFORM_FLOATS: usize = 5;

/// identifier of a spawned sprite (dense, equal to the spawn order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub(crate) usize);

impl SpriteId {
    /// the index of the sprite in the pool
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// opaque handle of a texture living on the gpu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) GLuint);

impl TextureHandle {
    /// the texture name on the backend side
    #[inline]
    pub fn id(&self) -> GLuint {
        self.0
    }
}

/// 8 bit rgba color, uploaded to the gpu as is
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Color32([u8; 4]);

impl Color32 {
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }

    pub fn a(&self) -> u8 {
        self.0[3]
    }
}

/// per-instance transform of a sprite, laid out exactly as the vertex attributes expect it
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SpriteTransform {
    pub position: [GLfloat; 2],
    pub scale: [GLfloat; 2],
    pub rotation: GLfloat,
}

impl SpriteTransform {
    /// position at the origin, unit scale, no rotation
    pub const IDENTITY: Self = Self {
        position: [0.0, 0.0],
        scale: [1.0, 1.0],
        rotation: 0.0,
    };

    /// the record as the flat float sequence that ends up in the transform buffer
    pub fn to_floats(&self) -> [GLfloat; TRANSFORM_FLOATS] {
        [
            self.position[0],
            self.position[1],
            self.scale[0],
            self.scale[1],
            self.rotation,
        ]
    }
}

impl Default for SpriteTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_is_tightly_packed() {
        assert_eq!(
            size_of::<SpriteTransform>(),
            TRANSFORM_FLOATS * size_of::<GLfloat>()
        );
        assert_eq!(size_of::<Color32>(), 4);
        let trafo = SpriteTransform {
            position: [0.5, 0.1],
            scale: [0.1, 0.1],
            rotation: 2.0,
        };
        let floats: &[GLfloat] = bytemuck::cast_slice(std::slice::from_ref(&trafo));
        assert_eq!(floats, &trafo.to_floats());
    }

    #[test]
    fn color_channels() {
        let color = Color32::from_rgba(1, 2, 3, 4);
        assert_eq!((color.r(), color.g(), color.b(), color.a()), (1, 2, 3, 4));
        assert_eq!(Color32::WHITE.a(), 255);
        assert_eq!(bytemuck::bytes_of(&color), &[1, 2, 3, 4]);
    }
}
