use crate::systems::event_system::events::*;
use std::collections::VecDeque;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::PhysicalKey;

/// system collecting the window events the game reacts to in a pollable queue
#[derive(Debug, Default)]
pub struct EventSystem {
    event_queue: VecDeque<InputEvent>,
}

impl EventSystem {
    /// creates a new event system
    pub fn new() -> Self {
        Self {
            event_queue: VecDeque::new(),
        }
    }

    /// queue an event
    pub fn trigger(&mut self, event: impl Into<InputEvent>) {
        self.event_queue.push_back(event.into());
    }

    /// takes the oldest queued event
    pub fn poll(&mut self) -> Option<InputEvent> {
        self.event_queue.pop_front()
    }

    /// process the winit window events, returns wether or not the event was of interest
    pub(crate) fn parse_winit_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event,
                is_synthetic,
                ..
            } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return false;
                };
                match event.state {
                    ElementState::Pressed => self.trigger(KeyPress {
                        key,
                        is_synthetic: *is_synthetic,
                        is_repeat: event.repeat,
                    }),
                    ElementState::Released => self.trigger(KeyRelease {
                        key,
                        is_synthetic: *is_synthetic,
                        is_repeat: event.repeat,
                    }),
                }
                true
            }
            WindowEvent::Resized(size) => {
                self.trigger(WindowResize {
                    width: size.width,
                    height: size.height,
                });
                true
            }
            _ => false,
        }
    }
}

/// every struct that is supposed to react to an event type has to implement this trait for it
pub trait EventObserver<T> {
    /// runs on every event of that type
    fn on_event(&mut self, event: &T);
}

/// all events in the queue
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyPress(KeyPress),
    KeyRelease(KeyRelease),
    WindowResize(WindowResize),
}

impl From<KeyPress> for InputEvent {
    fn from(event: KeyPress) -> Self {
        Self::KeyPress(event)
    }
}

impl From<KeyRelease> for InputEvent {
    fn from(event: KeyRelease) -> Self {
        Self::KeyRelease(event)
    }
}

impl From<WindowResize> for InputEvent {
    fn from(event: WindowResize) -> Self {
        Self::WindowResize(event)
    }
}

pub mod events {
    use winit::keyboard::KeyCode;

    /// key press event data
    #[derive(Debug, Clone, PartialEq)]
    pub struct KeyPress {
        pub key: KeyCode,
        pub is_synthetic: bool,
        pub is_repeat: bool,
    }

    /// key release event data
    #[derive(Debug, Clone, PartialEq)]
    pub struct KeyRelease {
        pub key: KeyCode,
        pub is_synthetic: bool,
        pub is_repeat: bool,
    }

    /// window resize event data
    #[derive(Debug, Clone, PartialEq)]
    pub struct WindowResize {
        pub width: u32,
        pub height: u32,
    }
}
