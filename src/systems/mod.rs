pub mod event_system;
pub mod video_system;
