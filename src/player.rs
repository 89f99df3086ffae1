use crate::glm;
use crate::systems::event_system::events::{KeyPress, KeyRelease};
use crate::systems::event_system::EventObserver;
use crate::utils::constants::player::*;
use winit::keyboard::KeyCode;

/// the steering directions the keyboard controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steering {
    Forward,
    Backward,
    Left,
    Right,
}

impl Steering {
    /// arrow keys and WASD
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::ArrowUp | KeyCode::KeyW => Some(Steering::Forward),
            KeyCode::ArrowDown | KeyCode::KeyS => Some(Steering::Backward),
            KeyCode::ArrowLeft | KeyCode::KeyA => Some(Steering::Left),
            KeyCode::ArrowRight | KeyCode::KeyD => Some(Steering::Right),
            _ => None,
        }
    }
}

/// keyboard controlled ship physics
///
/// The rotation is measured clockwise from the +y axis, so a rotation of 0 thrusts straight up.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    position: glm::Vec2,
    velocity: glm::Vec2,
    acceleration: f32,
    rotation: f32,
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
}

impl Player {
    /// creates a resting player at ``position``
    pub fn new(position: glm::Vec2) -> Self {
        Self {
            position,
            velocity: glm::Vec2::zeros(),
            acceleration: 0.0,
            rotation: 0.0,
            forward: false,
            backward: false,
            left: false,
            right: false,
        }
    }

    /// advances the physics by one step
    pub fn update(&mut self) {
        if self.forward {
            self.acceleration += ACCELERATION;
        }
        if self.backward {
            self.acceleration -= ACCELERATION;
        }
        if self.left {
            self.rotation -= ROTATION;
        }
        if self.right {
            self.rotation += ROTATION;
        }

        self.acceleration *= ACCELERATION_DAMPING;

        self.velocity += glm::vec2(self.rotation.sin(), self.rotation.cos()) * self.acceleration;
        self.position += self.velocity;
    }

    /// sets the pressed state of one steering direction
    pub fn steer(&mut self, steering: Steering, pressed: bool) {
        match steering {
            Steering::Forward => self.forward = pressed,
            Steering::Backward => self.backward = pressed,
            Steering::Left => self.left = pressed,
            Steering::Right => self.right = pressed,
        }
    }

    #[inline]
    pub fn position(&self) -> glm::Vec2 {
        self.position
    }

    /// rotation in radians
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(glm::Vec2::zeros())
    }
}

impl EventObserver<KeyPress> for Player {
    fn on_event(&mut self, event: &KeyPress) {
        if let Some(steering) = Steering::from_key(event.key) {
            self.steer(steering, true);
        }
    }
}

impl EventObserver<KeyRelease> for Player {
    fn on_event(&mut self, event: &KeyRelease) {
        if let Some(steering) = Steering::from_key(event.key) {
            self.steer(steering, false);
        }
    }
}
