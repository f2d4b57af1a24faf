//! Configuration, types, and shared structures for ditherglass.
//!
//! This crate contains all shared types, traits, and configuration logic
//! used across the ditherglass workspace.

pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use clock::FrameClock;
pub use color::Rgb;
pub use config::RenderConfig;
pub use error::CoreError;
pub use frame::FrameBuffer;
